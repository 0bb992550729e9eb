pub mod http;
pub mod request;
pub mod traits;
pub mod types;

pub use http::HttpChatApi;
pub use request::{ApiOutcome, ApiRequest};
pub use traits::ChatApi;
pub use types::ApiError;
