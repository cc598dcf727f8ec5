pub mod config;
pub mod format;
pub mod funding;
pub mod model;

pub use funding::FundingSummary;
