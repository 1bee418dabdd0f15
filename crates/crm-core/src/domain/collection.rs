use std::collections::HashSet;

use crate::domain::customer::Customer;
use crate::error::CoreError;

/// The customer set loaded for a session. Ids are non-empty and unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerCollection {
    customers: Vec<Customer>,
}

impl CustomerCollection {
    pub fn new(customers: Vec<Customer>) -> Result<Self, CoreError> {
        validate_ids(&customers)?;
        Ok(Self { customers })
    }

    pub fn as_slice(&self) -> &[Customer] {
        &self.customers
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}

fn validate_ids(customers: &[Customer]) -> Result<(), CoreError> {
    let mut seen = HashSet::with_capacity(customers.len());
    for customer in customers {
        if customer.id.is_blank() {
            return Err(CoreError::EmptyCustomerId);
        }
        if !seen.insert(customer.id.as_str()) {
            return Err(CoreError::DuplicateCustomerId(customer.id.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::CustomerCollection;
    use crate::error::CoreError;
    use crate::fixtures::fallback_customers;

    #[test]
    fn accepts_unique_ids() {
        let collection = CustomerCollection::new(fallback_customers()).expect("collection");
        assert_eq!(collection.len(), 5);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut customers = fallback_customers();
        customers[1].id = customers[0].id.clone();
        let err = CustomerCollection::new(customers).unwrap_err();
        assert_eq!(err, CoreError::DuplicateCustomerId("1".to_string()));
    }

    #[test]
    fn rejects_blank_ids() {
        let mut customers = fallback_customers();
        customers[2].id = " ".into();
        let err = CustomerCollection::new(customers).unwrap_err();
        assert_eq!(err, CoreError::EmptyCustomerId);
    }
}
