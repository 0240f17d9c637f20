//! Environment-framework adapter.
//!
//! Translates the reset/step/render contract that RL frameworks expect into
//! calls on `NimEngine`, and describes the action space.

mod environment;
mod space;

pub use environment::{EnvMetadata, Environment, InvalidActionPolicy, NimEnv, ENV_ID};
pub use space::ActionSpace;
