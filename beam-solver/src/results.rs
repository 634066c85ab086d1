//! Result types for static analysis

use serde::{Deserialize, Serialize};

use crate::elements::ElementKind;
use crate::math::Vec as FEVec;
use crate::postprocess::{AnalysisEvent, PostProcessed};

/// Displacement results at a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeDisplacement {
    /// Axial displacement (bar) or deflection (beam)
    pub translation: f64,
    /// Rotation, beams only
    pub rotation: Option<f64>,
}

impl NodeDisplacement {
    /// Create from the DOF values of one node, in DOF order
    pub fn from_slice(values: &[f64]) -> Self {
        Self {
            translation: values.first().copied().unwrap_or(0.0),
            rotation: values.get(1).copied(),
        }
    }
}

/// Reaction forces at a supported node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reactions {
    /// Reaction force along the translational DOF
    pub force: f64,
    /// Reaction moment, beams only
    pub moment: Option<f64>,
}

impl Reactions {
    /// Create from the DOF values of one node, in DOF order
    pub fn from_slice(values: &[f64]) -> Self {
        Self {
            force: values.first().copied().unwrap_or(0.0),
            moment: values.get(1).copied(),
        }
    }
}

/// One row of the nodal results table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodalRow {
    /// 1-based node number
    pub node: usize,
    /// Position along the member in m
    pub x: f64,
    /// Nodal force `K·U` at the translational DOF
    pub force: f64,
    /// Displacement at the translational DOF
    pub displacement: f64,
}

/// Complete result of one static solve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticSolution {
    pub kind: ElementKind,
    /// Nodal displacements
    pub u: FEVec,
    /// Applied load vector
    pub f: FEVec,
    /// Reactions, zero at free DOFs
    pub reactions: FEVec,
    /// Internal nodal forces `K·U`
    pub nodal_forces: FEVec,
    /// Work of the applied loads `Fᵀ·U`
    pub compliance: f64,
    pub free_dofs: usize,
    pub post: PostProcessed,
}

impl StaticSolution {
    /// Displacements of one node
    pub fn node_displacement(&self, node: usize) -> Option<NodeDisplacement> {
        node_slice(&self.u, self.kind, node).map(NodeDisplacement::from_slice)
    }

    /// Reactions at one node
    pub fn node_reactions(&self, node: usize) -> Option<Reactions> {
        node_slice(&self.reactions, self.kind, node).map(Reactions::from_slice)
    }

    pub fn events(&self) -> &[AnalysisEvent] {
        &self.post.events
    }

    /// Sum of the applied loads and reactions on the translational DOFs
    pub fn translational_resultant(&self) -> f64 {
        resultant(&self.f, self.kind) + resultant(&self.reactions, self.kind)
    }
}

fn node_slice(values: &FEVec, kind: ElementKind, node: usize) -> Option<&[f64]> {
    let d = kind.dofs_per_node();
    values.as_slice().get(node * d..(node + 1) * d)
}

/// Sum of the translational components of a nodal vector
pub fn resultant(values: &FEVec, kind: ElementKind) -> f64 {
    values
        .iter()
        .skip(kind.translation_dof())
        .step_by(kind.dofs_per_node())
        .sum()
}

/// Summary of analysis results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Variant display name
    pub variant: String,
    /// Sub-case display name
    pub sub_case: String,
    /// Maximum absolute translational displacement
    pub max_displacement: f64,
    /// Node with maximum displacement
    pub max_disp_node: usize,
    /// Maximum absolute reaction force
    pub max_reaction: f64,
    /// Node with maximum reaction
    pub max_reaction_node: usize,
    /// Peak element stress in Pa
    pub max_stress: f64,
    /// Element with the peak stress
    pub max_stress_element: usize,
    /// Peak stress over yield strength
    pub utilisation: f64,
    pub yield_exceeded: bool,
    /// Total number of nodes
    pub num_nodes: usize,
    /// Total number of elements
    pub num_elements: usize,
    /// Total DOFs
    pub total_dofs: usize,
    /// Free DOFs (unknown)
    pub free_dofs: usize,
}

impl Default for AnalysisSummary {
    fn default() -> Self {
        Self {
            variant: String::new(),
            sub_case: String::new(),
            max_displacement: 0.0,
            max_disp_node: 0,
            max_reaction: 0.0,
            max_reaction_node: 0,
            max_stress: 0.0,
            max_stress_element: 0,
            utilisation: 0.0,
            yield_exceeded: false,
            num_nodes: 0,
            num_elements: 0,
            total_dofs: 0,
            free_dofs: 0,
        }
    }
}
