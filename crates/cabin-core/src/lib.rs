//! cabin-core
//!
//! Booking pricing, validation, and lifecycle orchestration.
//! Depends on cabin-domain. No CLI, no terminal I/O; persistence is reached
//! only through the [`DataService`] trait.

pub mod action;
pub mod delete_flow;
pub mod error;
pub mod form;
pub mod lifecycle;
pub mod memory;
pub mod pricing;
pub mod reference;
pub mod service;
pub mod settings_provider;
pub mod time;
pub mod transitions;

#[cfg(test)]
mod tests;

pub use action::*;
pub use delete_flow::*;
pub use error::{LifecycleError, ServiceError, ValidationError};
pub use form::*;
pub use lifecycle::*;
pub use memory::MemoryDataService;
pub use pricing::*;
pub use reference::*;
pub use service::*;
pub use settings_provider::SettingsProvider;
pub use time::{Clock, FixedClock, SystemClock};
pub use transitions::*;
