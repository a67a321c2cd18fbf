mod order_repository;

pub use order_repository::{OrderRepository, PostgresOrderRepository, ORDERS_SCHEMA};

#[cfg(test)]
pub use order_repository::MockOrderRepository;
