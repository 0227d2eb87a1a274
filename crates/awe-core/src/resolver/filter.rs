use crate::config::FilterConfig;
use awe_types::Candidate;
use regex::{Regex, RegexBuilder};
use tracing::warn;

/// One include/exclude pattern, compiled once per resolve
#[derive(Debug, Clone)]
pub enum FilterRule {
    /// Lowercased literal
    Substring(String),
    Regex(Regex),
    /// A `/regex/` that failed to compile; never matches
    Invalid,
}

impl FilterRule {
    /// `/.../` is a case-insensitive regex, anything else a substring.
    #[must_use]
    pub fn compile(pattern: &str) -> Self {
        let body = pattern
            .strip_prefix('/')
            .and_then(|rest| rest.strip_suffix('/'))
            .filter(|_| pattern.len() >= 2);

        let Some(body) = body else {
            return FilterRule::Substring(pattern.to_lowercase());
        };

        match RegexBuilder::new(body).case_insensitive(true).build() {
            Ok(regex) => FilterRule::Regex(regex),
            Err(e) => {
                warn!("Invalid filter regex {pattern}: {e}");
                FilterRule::Invalid
            }
        }
    }

    fn is_match(&self, text: &str) -> bool {
        match self {
            FilterRule::Substring(needle) => text.to_lowercase().contains(needle.as_str()),
            FilterRule::Regex(regex) => regex.is_match(text),
            FilterRule::Invalid => false,
        }
    }

    /// Matches against the primary text or the id.
    #[must_use]
    pub fn matches(&self, candidate: &Candidate) -> bool {
        self.is_match(&candidate.primary_text) || self.is_match(&candidate.id)
    }
}

/// Compiled include and exclude lists of a provider set
#[derive(Debug, Clone, Default)]
pub struct FilterRules {
    include: Vec<FilterRule>,
    exclude: Vec<FilterRule>,
}

impl FilterRules {
    #[must_use]
    pub fn compile(config: &FilterConfig) -> Self {
        Self {
            include: config.include.iter().map(|p| FilterRule::compile(p)).collect(),
            exclude: config.exclude.iter().map(|p| FilterRule::compile(p)).collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Exclude always wins over include.
    #[must_use]
    pub fn keep(&self, candidate: &Candidate) -> bool {
        if self.exclude.iter().any(|rule| rule.matches(candidate)) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|rule| rule.matches(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(include: &[&str], exclude: &[&str]) -> FilterRules {
        FilterRules::compile(&FilterConfig {
            include: include.iter().map(ToString::to_string).collect(),
            exclude: exclude.iter().map(ToString::to_string).collect(),
        })
    }

    #[test]
    fn test_compile_kinds() {
        assert!(matches!(FilterRule::compile("Fire"), FilterRule::Substring(s) if s == "fire"));
        assert!(matches!(FilterRule::compile("/^fi/"), FilterRule::Regex(_)));
        assert!(matches!(FilterRule::compile("/"), FilterRule::Substring(_)));
        assert!(matches!(FilterRule::compile("/(/"), FilterRule::Invalid));
    }

    #[test]
    fn test_substring_matches_primary_or_id_case_insensitively() {
        let rule = FilterRule::compile("FOX");
        assert!(rule.matches(&Candidate::new("a", "Firefox")));
        assert!(rule.matches(&Candidate::new("firefox.desktop", "Browser")));
        assert!(!rule.matches(&Candidate::new("b", "Chromium").with_keywords("fox")));
    }

    #[test]
    fn test_regex_is_case_insensitive() {
        let rule = FilterRule::compile("/^avahi/");
        assert!(rule.matches(&Candidate::new("x", "Avahi Browser")));
        assert!(!rule.matches(&Candidate::new("x", "Zeroconf Avahi")));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let rules = rules(&["fire"], &["nightly"]);
        assert!(rules.keep(&Candidate::new("a", "Firefox")));
        assert!(!rules.keep(&Candidate::new("b", "Firefox Nightly")));
        assert!(!rules.keep(&Candidate::new("c", "Chromium")));
    }

    #[test]
    fn test_empty_rules_keep_everything() {
        let rules = rules(&[], &[]);
        assert!(rules.is_empty());
        assert!(rules.keep(&Candidate::new("a", "Anything")));
    }

    #[test]
    fn test_invalid_regex_never_matches() {
        let rules = rules(&["/[/"], &[]);
        assert!(!rules.keep(&Candidate::new("a", "[")));
        let rules = super::FilterRules::compile(&FilterConfig {
            include: Vec::new(),
            exclude: vec!["/[/".to_string()],
        });
        assert!(rules.keep(&Candidate::new("a", "[")));
    }
}
