use crm_core::domain::CustomerCollection;
use crm_core::fixtures::fallback_customers;
use tracing::{debug, warn};

use crate::source::CustomerSource;
use crate::Result;

/// What to do when the primary source fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Show the built-in sample customers instead.
    Fixtures,
    /// Hand the error back to the caller.
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOrigin {
    Primary { source: &'static str },
    Fallback { reason: String },
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub collection: CustomerCollection,
    pub origin: LoadOrigin,
}

impl LoadOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, LoadOrigin::Fallback { .. })
    }
}

/// Fetches and validates the full collection from `source`.
pub fn fetch_collection(source: &dyn CustomerSource) -> Result<CustomerCollection> {
    let customers = source.fetch_customers()?;
    Ok(CustomerCollection::new(customers)?)
}

pub fn load_customers(source: &dyn CustomerSource, policy: FallbackPolicy) -> Result<LoadOutcome> {
    match fetch_collection(source) {
        Ok(collection) => {
            debug!(source = source.source_name(), count = collection.len(), "customers loaded");
            Ok(LoadOutcome {
                collection,
                origin: LoadOrigin::Primary {
                    source: source.source_name(),
                },
            })
        }
        Err(err) => match policy {
            FallbackPolicy::Fail => Err(err),
            FallbackPolicy::Fixtures => {
                warn!(source = source.source_name(), error = %err, "loading customers failed, using sample data");
                Ok(LoadOutcome {
                    collection: CustomerCollection::new(fallback_customers())?,
                    origin: LoadOrigin::Fallback {
                        reason: err.to_string(),
                    },
                })
            }
        },
    }
}
