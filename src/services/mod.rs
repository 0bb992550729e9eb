pub mod collation;
pub mod format;
