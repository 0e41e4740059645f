//! Analysis stages of the wind atlas pipeline.
//!
//! Both stages are pure functions over the loaded, immutable tables and can
//! run independently of each other:
//! - [`ranking`]: top-N / bottom-N facilities by a metric
//! - [`proximity`]: nearby weather samples per facility, aggregated by a
//!   [`Reducer`]
//! - [`weibull`]: wind speed distribution fit for the selected samples

pub mod proximity;
pub mod ranking;
pub mod reducer;
pub mod weibull;

pub use proximity::{ProximityAggregator, ProximityPolicy};
pub use ranking::{rank_facilities, RankingMetric, Rankings};
pub use reducer::Reducer;
pub use weibull::fit_weibull;
