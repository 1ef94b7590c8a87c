pub mod audit;
pub mod group;
pub mod payment;
pub mod recurring_payment;
pub mod transaction;
