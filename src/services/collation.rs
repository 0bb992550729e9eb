//! Locale-aware ordering for conversation titles.

use std::cmp::Ordering;

use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};
use icu_locale_core::Locale;

/// Compares titles the way the user's locale orders words.
pub struct TitleCollator {
    collator: Option<CollatorBorrowed<'static>>,
}

impl Default for TitleCollator {
    fn default() -> Self {
        Self::new("und")
    }
}

impl TitleCollator {
    /// `locale_name` may be a BCP 47 tag (`de-DE`, `zh-cn`) or a POSIX
    /// locale (`zh_CN.UTF-8`). Names that do not parse, such as `C`, use the
    /// root collation.
    pub fn new(locale_name: &str) -> Self {
        let prefs = parse_locale(locale_name)
            .map(CollatorPreferences::from)
            .unwrap_or_default();

        let collator = match Collator::try_new(prefs, CollatorOptions::default()) {
            Ok(collator) => Some(collator),
            Err(e) => {
                tracing::warn!("No collation data for locale {}: {}", locale_name, e);
                None
            }
        };
        Self { collator }
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)),
        }
    }
}

fn parse_locale(name: &str) -> Option<Locale> {
    let tag = name.split(['.', '@']).next().unwrap_or_default();
    tag.replace('_', "-").parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(collator: &TitleCollator, titles: &[&str]) -> Vec<String> {
        let mut titles: Vec<String> = titles.iter().map(|t| t.to_string()).collect();
        titles.sort_by(|a, b| collator.compare(a, b));
        titles
    }

    #[test]
    fn test_accents_and_case_follow_locale_order() {
        let collator = TitleCollator::new("en-US");
        assert_eq!(
            sorted(&collator, &["Zebra", "Éclair", "apple", "Apple"]),
            vec!["apple", "Apple", "Éclair", "Zebra"]
        );
    }

    #[test]
    fn test_chinese_titles_sort_by_pinyin() {
        let collator = TitleCollator::new("zh_CN.UTF-8");
        assert_eq!(
            sorted(&collator, &["上海", "北京", "安徽"]),
            vec!["安徽", "北京", "上海"]
        );
    }

    #[test]
    fn test_unparseable_locale_uses_root() {
        let collator = TitleCollator::new("C");
        assert_eq!(collator.compare("apple", "Banana"), Ordering::Less);
        assert_eq!(collator.compare("Éclair", "Zebra"), Ordering::Less);
        assert_eq!(collator.compare("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_parse_locale_accepts_posix_names() {
        assert!(parse_locale("de_DE.UTF-8").is_some());
        assert!(parse_locale("sr_RS@latin").is_some());
        assert!(parse_locale("en-us").is_some());
        assert!(parse_locale("C").is_none());
    }
}
