mod matcher;
mod ranking;

pub use matcher::{EXACT_SCORE, FuzzyMatcher, MatchResult};
pub use ranking::{ALIAS_SCORE, RankingContext, RankingEngine};
