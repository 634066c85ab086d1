//! Beam Solver - A native Rust 1-D finite element engine
//!
//! Static linear analysis of a straight member idealized as:
//! - Axial bar elements (one translation per node)
//! - Euler-Bernoulli beam elements (deflection and rotation per node)
//!
//! A member is meshed into equal elements, the global stiffness matrix is
//! assembled, one of a fixed catalog of support variants is applied and the
//! reduced system is solved with a dense or skyline Cholesky factorization.
//! Post-processing gives reactions, element forces, stresses and the yield check.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use beam_solver::prelude::*;
//!
//! let mut model = BeamModel::new();
//! model.select_variant(0).unwrap(); // Cantilever
//! model.set_material(Arc::new(Material::steel()));
//! model.set_section(Arc::new(Section::rectangular("Rectangle 100x50", 0.1, 0.05)));
//! model.compute_mesh(8).unwrap();
//!
//! // 1 kN downward at the free end
//! let solution = model.solve_static(1000.0, false).unwrap();
//! let tip = solution.node_displacement(8).unwrap();
//! assert!(tip.translation < 0.0);
//!
//! let summary = model.summary().unwrap();
//! assert_eq!(summary.max_disp_node, 8);
//! ```

pub mod analysis;
pub mod assembly;
pub mod elements;
pub mod error;
pub mod loads;
pub mod math;
pub mod mesh;
pub mod model;
pub mod postprocess;
pub mod results;
pub mod solver;
pub mod variants;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{AnalysisOptions, CancelToken, Phase, SolverBackend};
    pub use crate::assembly::{assemble, GlobalStiffness};
    pub use crate::elements::{ElementKind, Material, Section, SectionShape, Support};
    pub use crate::error::{FemError, FemResult};
    pub use crate::loads::{DistributedLoad, Load, NodeLoad};
    pub use crate::mesh::Mesh;
    pub use crate::model::BeamModel;
    pub use crate::postprocess::{post_process, AnalysisEvent, ElementResult, PostProcessed};
    pub use crate::results::{
        AnalysisSummary, NodalRow, NodeDisplacement, Reactions, StaticSolution,
    };
    pub use crate::solver::{solve, Constraints, Displacements};
    pub use crate::variants::{Anchor, SubCase, Variant};
}
