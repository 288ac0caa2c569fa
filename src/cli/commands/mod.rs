//! Command implementations

mod demo;
mod inspect;
mod run;

pub use demo::demo;
pub use inspect::inspect;
pub use run::run_scenario;
