//! Deterministic fuzzy scoring of a query against a single text field.
//!
//! Scores are tiered so that a case-insensitive exact match beats any
//! prefix match, and a prefix match beats a scattered subsequence for
//! practical query lengths.

/// Score of a case-insensitive exact match
pub const EXACT_SCORE: i64 = 10_000;
const PREFIX_BASE: i64 = 5_000;
const PREFIX_PER_CHAR: i64 = 10;

const CHAR_SCORE: i64 = 100;
const FIRST_CHAR_BONUS: i64 = 50;
const WORD_START_BONUS: i64 = 100;
const CONSECUTIVE_STEP: i64 = 20;
const EXACT_CASE_BONUS: i64 = 10;

/// Outcome of matching one query against one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    pub score: i64,
    /// Char indices into the target that were consumed by the query
    pub positions: Vec<usize>,
    pub matched: bool,
}

impl MatchResult {
    fn miss() -> Self {
        Self::default()
    }
}

/// Stateless fuzzy matcher.
pub struct FuzzyMatcher;

impl FuzzyMatcher {
    /// Match `query` against `target`.
    ///
    /// An empty query is a neutral pass (matched, score 0). Otherwise every
    /// query char must appear in the target in order, compared
    /// case-insensitively; there is no partial credit.
    // Char indices are bounded by the target length, far below i64::MAX
    #[allow(clippy::cast_possible_wrap)]
    pub fn match_str(query: &str, target: &str) -> MatchResult {
        if query.is_empty() {
            return MatchResult {
                score: 0,
                positions: Vec::new(),
                matched: true,
            };
        }

        let query_chars: Vec<char> = query.chars().collect();
        let target_chars: Vec<char> = target.chars().collect();
        let query_folded: Vec<char> = query_chars.iter().copied().map(fold).collect();
        let target_folded: Vec<char> = target_chars.iter().copied().map(fold).collect();

        if query_folded == target_folded {
            return MatchResult {
                score: EXACT_SCORE,
                positions: (0..target_chars.len()).collect(),
                matched: true,
            };
        }

        if target_folded.starts_with(&query_folded) {
            return MatchResult {
                score: PREFIX_BASE + PREFIX_PER_CHAR * query_chars.len() as i64,
                positions: (0..query_chars.len()).collect(),
                matched: true,
            };
        }

        if query_chars.len() > target_chars.len() {
            return MatchResult::miss();
        }

        let mut score = 0;
        let mut positions = Vec::with_capacity(query_chars.len());
        let mut consecutive = 0;
        let mut last: Option<usize> = None;
        let mut qi = 0;

        for (ti, &tc) in target_folded.iter().enumerate() {
            if qi == query_folded.len() {
                break;
            }
            if tc != query_folded[qi] {
                continue;
            }

            score += CHAR_SCORE;
            if ti == 0 {
                score += FIRST_CHAR_BONUS;
            }
            if is_word_start(&target_chars, ti) {
                score += WORD_START_BONUS;
            }
            if last.is_some_and(|prev| prev + 1 == ti) {
                consecutive += CONSECUTIVE_STEP;
                score += consecutive;
            } else {
                consecutive = 0;
            }
            if target_chars[ti] == query_chars[qi] {
                score += EXACT_CASE_BONUS;
            }
            score -= ti as i64;

            positions.push(ti);
            last = Some(ti);
            qi += 1;
        }

        if qi < query_folded.len() {
            return MatchResult::miss();
        }

        // A full subsequence always counts as a hit, even when late-match
        // penalties would push the raw score to zero or below.
        MatchResult {
            score: score.max(1),
            positions,
            matched: true,
        }
    }
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn is_word_start(chars: &[char], index: usize) -> bool {
    if index == 0 {
        return true;
    }
    let prev = chars[index - 1];
    !prev.is_alphanumeric() || (chars[index].is_uppercase() && !prev.is_uppercase())
}
