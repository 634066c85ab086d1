//! Analysis options, solver backends and cooperative cancellation

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{FemError, FemResult};

/// Standard gravity used for self-weight loads (m/s²)
pub const GRAVITY: f64 = 9.80665;

/// Linear solver used for the reduced system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverBackend {
    /// Dense Cholesky factorization (nalgebra)
    Dense,
    /// Skyline (banded) Cholesky factorization on sparse storage
    Skyline,
}

impl Default for SolverBackend {
    fn default() -> Self {
        Self::Skyline
    }
}

/// Options for a static analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Linear solver backend
    pub backend: SolverBackend,
    /// Check static equilibrium after the solve
    pub check_statics: bool,
    /// Relative tolerance for the equilibrium check
    pub statics_tolerance: f64,
    /// Scale factor applied to displacements in the deformed shape
    pub deformation_scale: f64,
    /// Add the member self-weight (rho * g * A) as a distributed load
    pub include_self_weight: bool,
    /// Enable per-phase timing output
    pub log: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            backend: SolverBackend::Skyline,
            check_statics: true,
            statics_tolerance: 1e-8,
            deformation_scale: 1.0,
            include_self_weight: false,
            log: false,
        }
    }
}

impl AnalysisOptions {
    /// Select the linear solver backend
    pub fn with_backend(mut self, backend: SolverBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Set the deformed-shape scale factor
    pub fn with_deformation_scale(mut self, scale: f64) -> Self {
        self.deformation_scale = scale;
        self
    }

    /// Include self-weight in the applied loads
    pub fn with_self_weight(mut self) -> Self {
        self.include_self_weight = true;
        self
    }

    /// Set equilibrium tolerance
    pub fn with_statics_tolerance(mut self, tol: f64) -> Self {
        self.statics_tolerance = tol;
        self
    }
}

/// Phases of a compute request, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Meshing,
    Assembly,
    Solve,
    PostProcessing,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Meshing => "mesh generation",
            Phase::Assembly => "stiffness assembly",
            Phase::Solve => "linear solve",
            Phase::PostProcessing => "post-processing",
        };
        f.write_str(name)
    }
}

/// Cooperative cancellation flag shared between a caller and a running request.
///
/// The engine checks the flag between phases only; the linear solve itself is atomic.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Return `Cancelled(phase)` if cancellation was requested
    pub fn checkpoint(&self, phase: Phase) -> FemResult<()> {
        if self.is_cancelled() {
            log::debug!("cancellation observed before {}", phase);
            return Err(FemError::Cancelled(phase));
        }
        Ok(())
    }
}
