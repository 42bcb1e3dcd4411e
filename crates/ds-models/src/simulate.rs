//! Time-history simulation of dynamic stall models.

use std::cell::RefCell;

use ds_sim::{SimError, SimOptions, SimResult, SimStats, TransientModel, run_sim_from};
use rayon::prelude::*;
use tracing::debug;

use crate::error::{ModelError, ModelResult};
use crate::model::{DynamicStallModel, StallCoefficients};

/// States and coefficients of one model on an output time grid.
#[derive(Debug, Clone)]
pub struct StallHistory<S> {
    /// Output times (s)
    pub t: Vec<f64>,
    /// State at each output time
    pub states: Vec<S>,
    /// Coefficients recomputed from each state
    pub coefficients: Vec<StallCoefficients>,
    /// Integration work counters
    pub stats: SimStats,
}

impl<S> StallHistory<S> {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Lift coefficient series.
    pub fn cl(&self) -> Vec<f64> {
        self.coefficients.iter().map(|c| c.cl).collect()
    }

    /// Drag coefficient series, if the model provides drag.
    pub fn cd(&self) -> Option<Vec<f64>> {
        self.coefficients.iter().map(|c| c.cd).collect()
    }

    /// Lagged separation function series.
    pub fn separation(&self) -> Vec<f64> {
        self.coefficients.iter().map(|c| c.separation).collect()
    }
}

/// Adapter exposing a dynamic stall model to the integration driver.
///
/// The driver only carries string errors, so the first model error is kept
/// aside and reported in place of the driver's wrapper.
struct Driven<'a, M> {
    model: &'a M,
    failure: RefCell<Option<ModelError>>,
}

impl<'a, M: DynamicStallModel> Driven<'a, M> {
    fn new(model: &'a M) -> Self {
        Self {
            model,
            failure: RefCell::new(None),
        }
    }

    fn into_model_error(self, err: SimError) -> ModelError {
        self.failure
            .into_inner()
            .unwrap_or(ModelError::Integration(err))
    }
}

impl<M: DynamicStallModel> TransientModel for Driven<'_, M> {
    type State = M::State;

    fn initial_state(&self, t0: f64) -> Self::State {
        self.model.steady_state(t0)
    }

    fn rhs(&self, t: f64, x: &Self::State) -> SimResult<Self::State> {
        self.model.derivative(t, x).map_err(|e| {
            let message = e.to_string();
            self.failure.borrow_mut().get_or_insert(e);
            SimError::Backend { message }
        })
    }
}

/// Simulate `model` on `t_grid`, starting from its steady state at `t_grid[0]`.
pub fn simulate<M: DynamicStallModel>(
    model: &M,
    t_grid: &[f64],
    opts: &SimOptions,
) -> ModelResult<StallHistory<M::State>> {
    let t0 = *t_grid.first().ok_or(ModelError::InvalidArg {
        what: "time grid must not be empty",
    })?;
    simulate_from(model, model.steady_state(t0), t_grid, opts)
}

/// Simulate `model` on `t_grid` from an arbitrary initial state.
pub fn simulate_from<M: DynamicStallModel>(
    model: &M,
    x0: M::State,
    t_grid: &[f64],
    opts: &SimOptions,
) -> ModelResult<StallHistory<M::State>> {
    let driven = Driven::new(model);
    let record = match run_sim_from(&driven, x0, t_grid, opts) {
        Ok(record) => record,
        Err(e) => return Err(driven.into_model_error(e)),
    };

    let coefficients = record
        .t
        .iter()
        .zip(&record.x)
        .map(|(&t, x)| model.outputs(t, x))
        .collect();

    debug!(
        model = model.name(),
        points = record.t.len(),
        rhs_evals = record.stats.rhs_evals,
        "dynamic stall history computed"
    );

    Ok(StallHistory {
        t: record.t,
        states: record.x,
        coefficients,
        stats: record.stats,
    })
}

/// Simulate independent scenarios in parallel; results keep the input order.
pub fn sweep<M>(
    models: &[M],
    t_grid: &[f64],
    opts: &SimOptions,
) -> Vec<ModelResult<StallHistory<M::State>>>
where
    M: DynamicStallModel + Sync,
    M::State: Send,
{
    models
        .par_iter()
        .map(|model| simulate(model, t_grid, opts))
        .collect()
}
