//! Python bindings for the Nim environment.
//!
//! Exposes `NimEnv` with the reset/step/render surface Python RL code
//! expects, returning observations as numpy arrays.
//!
//! # Quick Start
//!
//! ```python
//! import rust_nim
//!
//! env = rust_nim.NimEnv(number_of_heaps=3, max_heap_size=10, seed=42)
//! state = env.reset()
//!
//! while True:
//!     moves = env.get_optimal_moves() or env.get_possible_moves()
//!     state, reward, done, info = env.step(list(moves[0]))
//!     if done:
//!         break
//! ```

use pyo3::prelude::*;

mod py_env;

pub use py_env::*;

/// rust_nim: a Nim environment for reinforcement learning.
#[pymodule]
fn rust_nim(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyNimEnv>()?;
    m.add("ENV_ID", crate::env::ENV_ID)?;

    Ok(())
}
