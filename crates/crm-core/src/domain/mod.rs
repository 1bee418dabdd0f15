pub mod channel;
pub mod collection;
pub mod customer;
pub mod ids;

pub use channel::Channel;
pub use collection::CustomerCollection;
pub use customer::{Customer, LastInteraction};
pub use ids::CustomerId;
