use crm_core::domain::Customer;
use crm_core::fixtures::fallback_customers;

use crate::Result;

pub trait CustomerSource {
    fn source_name(&self) -> &'static str;
    fn fetch_customers(&self) -> Result<Vec<Customer>>;
}

/// Serves the built-in sample customers.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureSource;

impl CustomerSource for FixtureSource {
    fn source_name(&self) -> &'static str {
        "fixtures"
    }

    fn fetch_customers(&self) -> Result<Vec<Customer>> {
        Ok(fallback_customers())
    }
}
