pub mod domain;
pub mod dto;
pub mod error;
pub mod fixtures;
pub mod present;
pub mod query;
pub mod rules;
pub mod time;

pub use domain::*;
pub use dto::*;
pub use error::CoreError;
pub use query::{run_query, BirthdayMode, QueryParams, SortConfig, SortDirection, SortKey};
pub use rules::*;
