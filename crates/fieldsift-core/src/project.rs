//! Filtering whole collections through a condition set.
//!
//! [`project`] is the engine's entry point for callers: it keeps the records
//! that satisfy every condition, in their original order, without touching
//! the input.

use crate::condition::FilterCondition;
use crate::matching::{matches, matches_all};
use crate::record::Record;
use crate::validate::is_valid;

/// Knobs for projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Leave conditions that fail validation out of the conjunction instead
    /// of evaluating them with permissive defaults.
    pub skip_invalid: bool,
}

impl MatchOptions {
    pub fn skip_invalid() -> Self {
        MatchOptions { skip_invalid: true }
    }
}

/// Returns the records matching every condition, in input order.
pub fn project<'a, R: Record>(records: &'a [R], conditions: &[FilterCondition]) -> Vec<&'a R> {
    project_with(records, conditions, MatchOptions::default())
}

/// Like [`project`], with explicit [`MatchOptions`].
pub fn project_with<'a, R: Record>(
    records: &'a [R],
    conditions: &[FilterCondition],
    options: MatchOptions,
) -> Vec<&'a R> {
    if conditions.is_empty() {
        return records.iter().collect();
    }

    let active = active_conditions(conditions, options);
    let results: Vec<&'a R> = records
        .iter()
        .filter(|record| matches_all(*record, active.iter().copied()))
        .collect();

    log::debug!(
        "projected {} of {} records through {} condition(s)",
        results.len(),
        records.len(),
        active.len()
    );
    results
}

/// Like [`project_with`], cloning the matching records.
pub fn project_cloned<R: Record + Clone>(
    records: &[R],
    conditions: &[FilterCondition],
    options: MatchOptions,
) -> Vec<R> {
    project_with(records, conditions, options)
        .into_iter()
        .cloned()
        .collect()
}

/// Counts matching records.
pub fn count<R: Record>(
    records: &[R],
    conditions: &[FilterCondition],
    options: MatchOptions,
) -> usize {
    let active = active_conditions(conditions, options);
    records
        .iter()
        .filter(|record| active.iter().all(|c| matches(*record, c)))
        .count()
}

fn active_conditions(
    conditions: &[FilterCondition],
    options: MatchOptions,
) -> Vec<&FilterCondition> {
    conditions
        .iter()
        .filter(|condition| {
            let keep = !options.skip_invalid || is_valid(condition);
            if !keep {
                log::trace!("skipping invalid condition {}", condition.id);
            }
            keep
        })
        .collect()
}
