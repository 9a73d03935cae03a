//! Read-side query types: visibility scope, filters, paging, statistics

mod filter;
mod page;
mod stats;

pub use filter::{GrievanceFilter, GrievanceScope, SortKey};
pub use page::{Page, PageLimits, PageRequest};
pub use stats::GrievanceStats;
