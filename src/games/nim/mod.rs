//! Nim: heaps of beans, take any positive number from one heap per move,
//! whoever takes the last bean wins.
//!
//! - `NimEngine` holds configuration and state and exposes the full
//!   mutation/query surface
//! - `strategy` computes legal and optimal moves from the Nim-sum

mod engine;
pub mod strategy;

pub use engine::{EngineSnapshot, Info, NimEngine, StepResult};
