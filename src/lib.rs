#![doc(test(attr(deny(warnings))))]

//! Cabin Admin drives the booking lifecycle of a small hotel: pricing and
//! validating stays, checking guests in and out, and deleting bookings.
//! Domain rules live in the `cabin-*` workspace crates; this crate wires
//! them to configuration, logging and the admin shell.

pub mod cli;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing with the default filter.
pub fn init() {
    init_with_filter(None);
}

/// Initializes global tracing, preferring `RUST_LOG`, then `directive`.
pub fn init_with_filter(directive: Option<&str>) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(directive);
        tracing::debug!("Cabin Admin tracing initialized.");
    });
}
