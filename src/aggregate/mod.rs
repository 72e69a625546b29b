pub mod daily;
pub mod rank;

pub use daily::{group_by_day, DailyAggregator, DailyBucket, DailyMeasure};
pub use rank::{customer_label, top_customers, top_n_by, CustomerTotal, RankedGroup, WALK_IN};
