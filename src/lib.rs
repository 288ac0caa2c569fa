//! tallybox - selection counter for checkbox history forms
//!
//! The history page of a ТЗ builder lists past generation runs as checkboxes;
//! this library keeps the "how many are selected" status line of that page
//! current. It carries its own document tree and event harness so the counter
//! installs, runs, and tests the same way outside a browser.

// Deny all clippy warnings in this crate
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata
)]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod dom;
pub mod journal;
pub mod output;
pub mod page;
pub mod scenario;
pub mod selector;
pub mod widget;
