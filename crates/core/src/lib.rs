#![forbid(unsafe_code)]

pub mod model;
pub mod selection;

pub use selection::{
    Completion, CompletedTests, ProgressPolicy, SelectionError, SelectionPhase, SelectionState,
};
