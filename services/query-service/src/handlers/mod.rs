pub mod health;
pub mod my_orders;
