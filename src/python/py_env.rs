//! Environment bindings for Python.

use numpy::PyArray1;
use pyo3::exceptions::{PyIndexError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::core::{parse_raw_heaps, GameRng, Move, NimConfig, NimError};
use crate::env::{Environment, NimEnv};
use crate::games::nim::StepResult;

fn to_py_err(err: NimError) -> PyErr {
    match err {
        NimError::IndexOutOfRange { .. } => PyIndexError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

fn pairs(moves: &[Move]) -> Vec<(usize, u32)> {
    moves.iter().map(|m| (m.heap, m.beans)).collect()
}

type PyStep<'py> = (Bound<'py, PyArray1<i32>>, f32, bool, Bound<'py, PyDict>);

fn step_to_py<'py>(py: Python<'py>, result: StepResult) -> PyResult<PyStep<'py>> {
    let info = PyDict::new_bound(py);
    for (key, value) in &result.info {
        info.set_item(key, value)?;
    }
    Ok((
        PyArray1::from_slice_bound(py, &result.state.to_i32_vec()),
        result.reward,
        result.done,
        info,
    ))
}

/// Python wrapper for NimEnv.
///
/// Heaps are returned as int32 numpy arrays; moves are `[heap, beans]` lists.
#[pyclass(name = "NimEnv")]
pub struct PyNimEnv {
    inner: NimEnv,
}

#[pymethods]
impl PyNimEnv {
    /// Create a new Nim environment.
    ///
    /// # Arguments
    /// - number_of_heaps: Heap count for random starts (ignored if heaps given)
    /// - max_heap_size: Upper bound for random heap sizes
    /// - heaps: Explicit starting heaps
    /// - seed: RNG seed; drawn from entropy if omitted
    #[new]
    #[pyo3(signature = (number_of_heaps = 4, max_heap_size = 50, heaps = None, seed = None))]
    fn new(
        number_of_heaps: usize,
        max_heap_size: u32,
        heaps: Option<Vec<i64>>,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let mut config = NimConfig::new()
            .with_heap_count(number_of_heaps)
            .with_max_heap_size(max_heap_size);
        if let Some(raw) = heaps {
            config = config.with_starting_heaps(parse_raw_heaps(&raw).map_err(to_py_err)?);
        }
        let rng = seed.map_or_else(GameRng::from_entropy, GameRng::new);
        let inner = NimEnv::with_rng(config, rng).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Change heap count, max heap size and/or starting heaps.
    ///
    /// Unspecified values are kept. Changing the heap count without giving
    /// heaps switches to random starting heaps.
    #[pyo3(signature = (number_of_heaps = None, max_heap_size = None, heaps = None))]
    fn configure<'py>(
        &mut self,
        py: Python<'py>,
        number_of_heaps: Option<usize>,
        max_heap_size: Option<u32>,
        heaps: Option<Vec<i64>>,
    ) -> PyResult<Bound<'py, PyArray1<i32>>> {
        let mut config = self.inner.engine().config().clone();
        if let Some(size) = max_heap_size {
            config = config.with_max_heap_size(size);
        }
        if let Some(count) = number_of_heaps {
            config = config.with_random_heaps().with_heap_count(count);
        }
        if let Some(raw) = heaps {
            config = config.with_starting_heaps(parse_raw_heaps(&raw).map_err(to_py_err)?);
        }
        let state = self.inner.reconfigure(config).map_err(to_py_err)?;
        Ok(PyArray1::from_slice_bound(py, &state.to_i32_vec()))
    }

    /// Reseed the RNG used by future random configurations.
    fn seed(&mut self, seed: u64) {
        self.inner.seed(seed);
    }

    /// Restore the starting heaps.
    fn reset<'py>(&mut self, py: Python<'py>) -> Bound<'py, PyArray1<i32>> {
        let state = self.inner.reset();
        PyArray1::from_slice_bound(py, &state.to_i32_vec())
    }

    /// Apply `[heap, beans]`. Returns `(state, reward, done, info)`.
    fn step<'py>(&mut self, py: Python<'py>, action: Vec<i64>) -> PyResult<PyStep<'py>> {
        let result = self.inner.step_raw(&action).map_err(to_py_err)?;
        step_to_py(py, result)
    }

    /// Apply the move at a flat action index.
    fn step_index<'py>(&mut self, py: Python<'py>, index: i64) -> PyResult<PyStep<'py>> {
        let result = self.inner.step_index(index).map_err(to_py_err)?;
        step_to_py(py, result)
    }

    /// One line per heap.
    fn render(&self) -> String {
        self.inner.render()
    }

    /// Map a flat action index to `(heap, beans)`.
    fn lookup_action(&self, index: i64) -> PyResult<(usize, u32)> {
        let mv = self.inner.lookup_index(index).map_err(to_py_err)?;
        Ok((mv.heap, mv.beans))
    }

    /// The full action-index map.
    fn get_move_list(&self) -> Vec<(usize, u32)> {
        pairs(self.inner.engine().move_list())
    }

    fn get_possible_moves(&self) -> Vec<(usize, u32)> {
        pairs(&self.inner.engine().possible_moves())
    }

    fn get_possible_move_indices(&self) -> Vec<usize> {
        self.inner.engine().possible_move_indices()
    }

    fn get_illegal_move_indices(&self) -> Vec<usize> {
        self.inner.engine().illegal_move_indices()
    }

    /// Moves restoring a zero Nim-sum; empty from a losing position.
    fn get_optimal_moves(&self) -> Vec<(usize, u32)> {
        pairs(&self.inner.engine().optimal_moves())
    }

    /// Boolean legality mask over action indices.
    fn action_mask<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<bool>> {
        PyArray1::from_slice_bound(py, &self.inner.action_mask())
    }

    /// `((low_heap, low_beans), (high_heap, high_beans))`, inclusive.
    #[getter]
    fn action_space(&self) -> ((i64, i64), (i64, i64)) {
        let space = self.inner.action_space();
        let [low_heap, low_beans] = space.low();
        let [high_heap, high_beans] = space.high();
        ((low_heap, low_beans), (high_heap, high_beans))
    }

    #[getter]
    fn action_size(&self) -> usize {
        self.inner.engine().action_size()
    }

    #[getter]
    fn state_size(&self) -> usize {
        self.inner.engine().state_size()
    }

    #[getter]
    fn number_of_heaps(&self) -> usize {
        self.inner.engine().heap_count()
    }

    #[getter]
    fn max_heap_size(&self) -> u32 {
        self.inner.engine().max_heap_size()
    }

    /// Current heaps.
    #[getter]
    fn state<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<i32>> {
        PyArray1::from_slice_bound(py, &self.inner.engine().state().to_i32_vec())
    }

    #[getter]
    fn done(&self) -> bool {
        self.inner.engine().is_terminal()
    }

    fn __repr__(&self) -> String {
        format!(
            "NimEnv(id={}, heaps={}, actions={})",
            self.inner.metadata().id,
            self.inner.engine().state(),
            self.inner.engine().action_size()
        )
    }
}
