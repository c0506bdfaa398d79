use chrono::NaiveDate;
use tracing::debug;

use crate::types::{BestPeriod, Transaction};

/// Searches a seller's history for the densest run of transaction dates.
///
/// For every run length `count` the shortest span holding `count` consecutive
/// dates is located, and runs are ranked by `count² / span_days`. The search is
/// quadratic in the number of transactions.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestPeriodFinder;

/// Minimal span found for one run length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    start: NaiveDate,
    end: NaiveDate,
    count: u64,
    span_days: u64,
}

impl Candidate {
    /// Compares `count² / span_days` exactly by cross-multiplying.
    fn scores_higher_than(&self, other: &Candidate) -> bool {
        let lhs = u128::from(self.count * self.count) * u128::from(other.span_days);
        let rhs = u128::from(other.count * other.count) * u128::from(self.span_days);
        lhs > rhs
    }
}

impl BestPeriodFinder {
    pub fn new() -> Self {
        Self
    }

    pub fn find(&self, transactions: &[Transaction]) -> BestPeriod {
        let mut timestamps: Vec<_> = transactions.iter().map(|t| t.transaction_date).collect();
        timestamps.sort();
        let dates: Vec<NaiveDate> = timestamps.iter().map(|ts| ts.date_naive()).collect();

        let mut best: Option<Candidate> = None;
        for count in 1..=dates.len() {
            let Some(candidate) = shortest_run(&dates, count) else {
                continue;
            };

            let replace = match &best {
                Some(current) => candidate.scores_higher_than(current),
                None => true,
            };
            if replace {
                best = Some(candidate);
            }
        }

        match best {
            Some(candidate) => {
                debug!(
                    "Best period {}..{} with {} transactions over {} days",
                    candidate.start, candidate.end, candidate.count, candidate.span_days
                );
                BestPeriod {
                    start: Some(candidate.start),
                    end: Some(candidate.end),
                    count: candidate.count as usize,
                }
            }
            None => BestPeriod::default(),
        }
    }
}

/// Shortest span covering `count` consecutive sorted dates. A later window of
/// equal span replaces an earlier one.
fn shortest_run(dates: &[NaiveDate], count: usize) -> Option<Candidate> {
    let mut shortest: Option<Candidate> = None;

    for run in dates.windows(count) {
        let (start, end) = (run[0], run[count - 1]);
        let span_days = (end - start).num_days().unsigned_abs() + 1;

        let replace = match &shortest {
            Some(current) => span_days <= current.span_days,
            None => true,
        };
        if replace {
            shortest = Some(Candidate {
                start,
                end,
                count: count as u64,
                span_days,
            });
        }
    }

    shortest
}
