//! Per-line keyword matching
//!
//! Matching is case-insensitive substring containment. A keyword counts at
//! most once per line no matter how often it occurs.

use indexmap::IndexSet;
use std::collections::HashMap;

use crate::error::ConfigError;

/// Keyword -> number of lines containing it
pub type KeywordCounts = HashMap<String, u64>;

/// Ordered, de-duplicated set of keywords, stored upper-cased
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: IndexSet<String>,
}

impl KeywordSet {
    /// Build a keyword set. Keywords that differ only in case collapse into the
    /// first occurrence. Empty strings are rejected since they would match
    /// every line.
    pub fn new<I, S>(keywords: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = IndexSet::new();
        for keyword in keywords {
            let keyword = keyword.as_ref();
            if keyword.is_empty() {
                return Err(ConfigError::EmptyKeyword);
            }
            set.insert(keyword.to_uppercase());
        }
        Ok(Self { keywords: set })
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }
}

/// Count which keywords appear in `line`.
///
/// Every keyword found maps to 1; keywords not found are absent from the
/// result rather than present with a zero count.
pub fn count_line(line: &str, keywords: &KeywordSet) -> KeywordCounts {
    let mut counts = KeywordCounts::new();
    if keywords.is_empty() {
        return counts;
    }

    let line = line.to_uppercase();
    for keyword in keywords.iter() {
        if line.contains(keyword) {
            counts.insert(keyword.to_string(), 1);
        }
    }
    counts
}

/// Add every entry of `from` into `into`
pub fn merge_counts(into: &mut KeywordCounts, from: KeywordCounts) {
    for (keyword, count) in from {
        *into.entry(keyword).or_insert(0) += count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(words: &[&str]) -> KeywordSet {
        KeywordSet::new(words.iter().copied()).unwrap()
    }

    fn expected(pairs: &[(&str, u64)]) -> KeywordCounts {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_case_insensitive_matching() {
        assert_eq!(
            count_line("error", &keywords(&["ERROR"])),
            expected(&[("ERROR", 1)])
        );
        assert_eq!(
            count_line("ERROR", &keywords(&["error"])),
            expected(&[("ERROR", 1)])
        );
        assert_eq!(
            count_line("ErRoR", &keywords(&["Error"])),
            expected(&[("ERROR", 1)])
        );
    }

    #[test]
    fn test_substring_matching() {
        assert_eq!(
            count_line("preERRORfix", &keywords(&["ERROR"])),
            expected(&[("ERROR", 1)])
        );
        assert_eq!(
            count_line("ERRORCODE=17", &keywords(&["ERROR"])),
            expected(&[("ERROR", 1)])
        );
    }

    #[test]
    fn test_repeated_keyword_counts_once_per_line() {
        assert_eq!(
            count_line("error error error", &keywords(&["ERROR"])),
            expected(&[("ERROR", 1)])
        );
    }

    #[test]
    fn test_no_match_is_empty() {
        let counts = count_line("nothing here", &keywords(&["ERROR"]));
        assert!(counts.is_empty());
        assert!(!counts.contains_key("ERROR"));
    }

    #[test]
    fn test_multiple_keywords_on_one_line() {
        let kw = keywords(&["DEBUG", "ERROR", "INFO"]);
        assert_eq!(
            count_line("DEBUG, debug, INFO", &kw),
            expected(&[("DEBUG", 1), ("INFO", 1)])
        );
        assert_eq!(count_line("INFO:info", &kw), expected(&[("INFO", 1)]));
        assert!(count_line("no match", &kw).is_empty());
    }

    #[test]
    fn test_empty_keyword_set_never_matches() {
        let kw = KeywordSet::new(Vec::<String>::new()).unwrap();
        assert!(kw.is_empty());
        assert!(count_line("ERROR INFO DEBUG", &kw).is_empty());
    }

    #[test]
    fn test_keyword_set_dedupes_case_variants() {
        let kw = keywords(&["info", "ERROR", "Info", "error", "DEBUG"]);
        assert_eq!(kw.len(), 3);
        assert_eq!(kw.iter().collect::<Vec<_>>(), vec!["INFO", "ERROR", "DEBUG"]);
    }

    #[test]
    fn test_keyword_set_rejects_empty_keyword() {
        assert_eq!(
            KeywordSet::new(["INFO", ""]).unwrap_err(),
            ConfigError::EmptyKeyword
        );
    }

    #[test]
    fn test_merge_counts_accumulates() {
        let mut total = expected(&[("ERROR", 1), ("DEBUG", 2)]);
        merge_counts(&mut total, expected(&[("ERROR", 3), ("INFO", 1)]));
        merge_counts(&mut total, expected(&[("DEBUG", 1)]));
        assert_eq!(total, expected(&[("ERROR", 4), ("DEBUG", 3), ("INFO", 1)]));
    }
}
