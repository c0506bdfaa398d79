pub mod best_period;
pub mod period;
pub mod top_performer;
pub mod under_threshold;

pub use best_period::BestPeriodFinder;
pub use period::{Clock, FixedClock, Period, SystemClock};
pub use top_performer::TopPerformerFinder;
pub use under_threshold::UnderThresholdFilter;
