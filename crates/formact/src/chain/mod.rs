//! Action chain processing: execution context and the chain runner.

pub mod context;
pub mod runner;

pub use context::{ContextCell, TriggerElement};
pub use runner::ChainRunner;
