//! Error types for the beam solver

use thiserror::Error;

use crate::analysis::Phase;

/// Main error type for beam/bar FEM operations
#[derive(Error, Debug)]
pub enum FemError {
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("Section '{section}' is degenerate: {reason}")]
    DegenerateSection { section: String, reason: String },

    #[error("Material '{material}' is invalid: {reason}")]
    InvalidMaterial { material: String, reason: String },

    #[error("Singular stiffness matrix - {0}")]
    SingularSystem(String),

    #[error("Variant index {index} out of range ({count} variants available)")]
    VariantOutOfRange { index: usize, count: usize },

    #[error("Sub-case index {index} out of range ({count} sub-cases available)")]
    SubCaseOutOfRange { index: usize, count: usize },

    #[error("Variant '{0}' not found in registry")]
    UnknownVariant(String),

    #[error("Unsupported load: {0}")]
    UnsupportedLoad(String),

    #[error("No mesh built - run compute_mesh() first")]
    MeshNotBuilt,

    #[error("Model not analyzed - run solve_static() first")]
    NotAnalyzed,

    #[error("Computation cancelled before {0}")]
    Cancelled(Phase),

    #[error("Static equilibrium violated: residual {residual:e} exceeds tolerance {tolerance:e}")]
    EquilibriumViolated { residual: f64, tolerance: f64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for beam/bar FEM operations
pub type FemResult<T> = Result<T, FemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = FemError::DegenerateSection {
            section: "RHS 100x50".to_string(),
            reason: "area must be positive".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Section 'RHS 100x50' is degenerate: area must be positive"
        );

        let err = FemError::Cancelled(Phase::Solve);
        assert_eq!(err.to_string(), "Computation cancelled before linear solve");
    }
}
