pub mod admin;
pub mod error;
pub mod http;
pub mod loader;
pub mod source;
pub mod wire;

pub use admin::{AdminAction, AdminClient, GenerationReport, Statistics};
pub use error::{ApiError, Result};
pub use http::{ClientOptions, HttpCustomerSource};
pub use loader::{load_customers, FallbackPolicy, LoadOrigin, LoadOutcome};
pub use source::{CustomerSource, FixtureSource};
