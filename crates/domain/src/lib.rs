pub mod aggregates;
pub mod errors;
pub mod specifications;

pub use aggregates::order::{Address, CatalogItemOrdered, Order, OrderItem};
pub use errors::DomainError;
pub use specifications::CustomerOrdersWithItemsSpecification;
