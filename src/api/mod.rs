pub mod handlers;
pub mod models;
pub mod openapi;

use crate::core::services::LedgerService;
use crate::infrastructure::{logging::in_memory::InMemoryLogging, storage::in_memory::InMemoryStore};

pub type AppService = LedgerService<InMemoryLogging, InMemoryStore>;
