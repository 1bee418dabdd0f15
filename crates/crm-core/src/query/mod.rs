mod engine;
mod params;

pub use engine::run_query;
pub use params::{BirthdayMode, QueryParams, SortConfig, SortDirection, SortKey};
