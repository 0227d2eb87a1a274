use super::matcher::{FuzzyMatcher, MatchResult};
use crate::mru::MruStore;
use awe_types::Candidate;
use std::collections::HashMap;
use tracing::debug;

/// Score given to an alias hit; outranks everything else
pub const ALIAS_SCORE: i64 = 100_000_000;
const PIN_BASE: i64 = 500_000;
const PIN_STEP: i64 = 1_000;

const FALLBACK_ICON: &str = "utilities-terminal";

/// Pins, aliases and fallback policy for the active provider set
#[derive(Debug, Clone, Default)]
pub struct RankingContext {
    /// Highest priority first
    pub pins: Vec<String>,
    /// Typed phrase -> candidate id or literal command
    pub aliases: HashMap<String, String>,
    pub fallback: bool,
}

impl RankingContext {
    /// Set pins come before global pins; set aliases shadow global ones.
    #[must_use]
    pub fn merged(
        set_pins: &[String],
        set_aliases: &HashMap<String, String>,
        global_pins: &[String],
        global_aliases: &HashMap<String, String>,
        fallback: bool,
    ) -> Self {
        let pins = set_pins.iter().chain(global_pins).cloned().collect();

        let mut aliases = global_aliases.clone();
        aliases.extend(set_aliases.iter().map(|(k, v)| (k.clone(), v.clone())));

        Self {
            pins,
            aliases,
            fallback,
        }
    }

    // Pin lists are short; the index always fits in i64
    #[allow(clippy::cast_possible_wrap)]
    fn pin_boost(&self, id: &str) -> i64 {
        self.pins
            .iter()
            .position(|pin| pin == id)
            .map_or(0, |idx| {
                PIN_BASE + (self.pins.len() - idx) as i64 * PIN_STEP
            })
    }
}

/// Ranks the candidate pool of the active set against a query
#[derive(Debug, Default)]
pub struct RankingEngine {
    pool: Vec<Candidate>,
    context: RankingContext,
}

impl RankingEngine {
    #[must_use]
    pub fn new(pool: Vec<Candidate>, context: RankingContext) -> Self {
        Self { pool, context }
    }

    #[must_use]
    pub fn pool(&self) -> &[Candidate] {
        &self.pool
    }

    /// Ordered display list for `query`. Pure with respect to the pool and
    /// the MRU store.
    #[must_use]
    pub fn filter(&self, query: &str, mru: &MruStore) -> Vec<Candidate> {
        if query.is_empty() {
            return self
                .pool
                .iter()
                .map(|c| Candidate {
                    match_positions: Vec::new(),
                    ..c.clone()
                })
                .collect();
        }

        let mut scored: Vec<(i64, Candidate)> = Vec::new();

        let alias_id = self.context.aliases.get(query).map(|target| {
            let candidate = self.alias_candidate(query, target);
            let id = candidate.id.clone();
            scored.push((ALIAS_SCORE, candidate));
            id
        });

        for candidate in &self.pool {
            if alias_id.as_deref() == Some(candidate.id.as_str()) {
                continue;
            }

            let best = best_field_match(query, candidate);
            if best.score <= 0 {
                continue;
            }

            let score =
                best.score + mru.boost(&candidate.id) + self.context.pin_boost(&candidate.id);
            scored.push((
                score,
                Candidate {
                    match_positions: best.positions,
                    ..candidate.clone()
                },
            ));
        }

        scored.sort_by(|a, b| b.0.cmp(&a.0));

        let mut results: Vec<Candidate> = scored.into_iter().map(|(_, c)| c).collect();

        if results.is_empty() && self.context.fallback && !query.trim().is_empty() {
            results.push(fallback_candidate(query));
        }

        debug!(
            "Filter '{}' -> {} of {} candidates",
            query,
            results.len(),
            self.pool.len()
        );
        results
    }

    fn alias_candidate(&self, query: &str, target: &str) -> Candidate {
        if let Some(real) = self.pool.iter().find(|c| c.id == target) {
            return Candidate {
                match_positions: Vec::new(),
                ..real.clone()
            };
        }
        Candidate::new(format!("alias:{query}"), target)
            .with_secondary(format!("Alias: {query}"))
            .with_icon(FALLBACK_ICON)
            .with_exec(target)
            .in_terminal(true)
    }
}

/// Best match across the searchable fields; earlier fields win ties.
fn best_field_match(query: &str, candidate: &Candidate) -> MatchResult {
    let fields = [
        &candidate.primary_text,
        &candidate.secondary_text,
        &candidate.id,
        &candidate.keywords,
        &candidate.categories,
    ];

    let mut best = MatchResult::default();
    for field in fields {
        let result = FuzzyMatcher::match_str(query, field);
        if result.matched && result.score > best.score {
            best = result;
        }
    }
    best
}

fn fallback_candidate(query: &str) -> Candidate {
    Candidate::new(format!("fallback:{query}"), format!("Run '{query}' in terminal"))
        .with_secondary("Custom Command")
        .with_icon(FALLBACK_ICON)
        .with_exec(query)
        .in_terminal(true)
}
