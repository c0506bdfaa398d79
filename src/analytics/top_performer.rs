use bigdecimal::BigDecimal;
use tracing::debug;

use crate::types::{DateWindow, Seller};

/// Finds the seller with the largest in-window turnover.
pub struct TopPerformerFinder {
    window: DateWindow,
}

impl TopPerformerFinder {
    pub fn new(window: DateWindow) -> Self {
        Self { window }
    }

    /// Sellers without any in-window transaction are not candidates. On equal
    /// totals the earliest seller in `sellers` is kept.
    pub fn find<'a>(&self, sellers: &'a [Seller]) -> Option<&'a Seller> {
        let mut best: Option<(&Seller, BigDecimal)> = None;

        for seller in sellers {
            let mut matched = 0usize;
            let mut total = BigDecimal::from(0);
            for transaction in seller.transactions_in(&self.window) {
                matched += 1;
                total += &transaction.amount;
            }

            if matched == 0 {
                continue;
            }

            let replace = match &best {
                Some((_, best_total)) => total > *best_total,
                None => true,
            };
            if replace {
                best = Some((seller, total));
            }
        }

        match &best {
            Some((seller, total)) => debug!("Top performer is seller {} with {}", seller.id, total),
            None => debug!("No seller had transactions in window"),
        }

        best.map(|(seller, _)| seller)
    }
}
