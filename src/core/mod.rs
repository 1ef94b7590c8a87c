pub mod balances;
pub mod booking;
pub mod calendar;
pub mod errors;
pub mod models;
pub mod money;
pub mod scheduler;
pub mod services;
