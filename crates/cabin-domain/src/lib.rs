//! cabin-domain
//!
//! Pure domain models (Booking, Cabin, Guest, Settings).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod booking;
pub mod cabin;
pub mod common;
pub mod guest;
pub mod settings;

pub use booking::*;
pub use cabin::*;
pub use common::*;
pub use guest::*;
pub use settings::*;
