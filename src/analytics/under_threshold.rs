use bigdecimal::BigDecimal;
use tracing::debug;

use crate::types::{DateWindow, Seller};

/// Selects sellers whose in-window turnover stays strictly below a threshold.
pub struct UnderThresholdFilter {
    threshold: BigDecimal,
    window: DateWindow,
}

impl UnderThresholdFilter {
    pub fn new(threshold: BigDecimal, window: DateWindow) -> Self {
        Self { threshold, window }
    }

    pub fn apply<'a>(&self, sellers: &'a [Seller]) -> Vec<&'a Seller> {
        let selected: Vec<&Seller> = sellers
            .iter()
            .filter(|seller| seller.total_in(&self.window) < self.threshold)
            .collect();

        debug!(
            "{} of {} sellers below threshold {}",
            selected.len(),
            sellers.len(),
            self.threshold
        );

        selected
    }
}
