//! Post-processing: shapes, element end forces, stresses and the yield check

use serde::{Deserialize, Serialize};

use crate::assembly::{element_dofs, element_matrix};
use crate::elements::{ElementKind, Material, Section};
use crate::loads::Load;
use crate::math::{self, Vec as FEVec};
use crate::mesh::Mesh;

/// Notable conditions found while post-processing. These are not errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnalysisEvent {
    /// Peak stress exceeds the material yield strength
    YieldExceeded {
        element: usize,
        stress: f64,
        yield_strength: f64,
    },
}

/// Internal forces and stress of one element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementResult {
    pub element: usize,
    /// End forces `K_e·d_e − f_eq` in local DOF order
    pub end_forces: Vec<f64>,
    /// Axial force (bar, tension positive) or bending moment (beam, sagging positive) at the start
    pub internal_start: f64,
    /// Same quantity at the end node
    pub internal_end: f64,
    /// Largest absolute internal force or moment along the element
    pub peak_internal: f64,
    /// Peak absolute stress in Pa
    pub stress: f64,
}

/// Everything derived from a displacement solution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostProcessed {
    /// Undeformed node positions `(x, 0)`
    pub initial_shape: Vec<(f64, f64)>,
    /// Scaled deformed node positions
    pub deformed_shape: Vec<(f64, f64)>,
    pub elements: Vec<ElementResult>,
    pub max_stress: f64,
    /// Element carrying `max_stress`
    pub max_stress_element: usize,
    pub yield_exceeded: bool,
    pub events: Vec<AnalysisEvent>,
}

/// Bending moment along a beam element from its start end forces.
///
/// `M(s) = −M1 + F1·s + w·s²/2`, sagging positive.
fn beam_moment(f1: f64, m1: f64, w: f64, s: f64) -> f64 {
    -m1 + f1 * s + 0.5 * w * s * s
}

fn element_result(
    index: usize,
    kind: ElementKind,
    end_forces: &FEVec,
    w: f64,
    length: f64,
    section: &Section,
) -> ElementResult {
    let (internal_start, internal_end, peak_internal, stress) = match kind {
        ElementKind::Bar => {
            let n1 = -end_forces[0];
            let n2 = end_forces[1];
            let peak = n1.abs().max(n2.abs());
            (n1, n2, peak, peak / section.area())
        }
        ElementKind::Beam => {
            let (f1, m1) = (end_forces[0], end_forces[1]);
            let m_start = beam_moment(f1, m1, w, 0.0);
            let m_end = beam_moment(f1, m1, w, length);
            let mut peak = m_start.abs().max(m_end.abs());

            // Parabolic moment under a line load may peak inside the element
            if w != 0.0 {
                let s_star = -f1 / w;
                if s_star > 0.0 && s_star < length {
                    peak = peak.max(beam_moment(f1, m1, w, s_star).abs());
                }
            }

            (
                m_start,
                m_end,
                peak,
                peak * section.extreme_fibre() / section.inertia(),
            )
        }
    };

    ElementResult {
        element: index,
        end_forces: end_forces.iter().copied().collect(),
        internal_start,
        internal_end,
        peak_internal,
        stress,
    }
}

/// Derive shapes, element forces and stresses from a displacement vector
pub fn post_process(
    mesh: &Mesh,
    kind: ElementKind,
    u: &FEVec,
    material: &Material,
    section: &Section,
    load: &Load,
    scale: f64,
) -> PostProcessed {
    let d = kind.dofs_per_node();
    let positions = mesh.positions();

    let initial_shape: Vec<(f64, f64)> = positions.iter().map(|&x| (x, 0.0)).collect();
    let deformed_shape: Vec<(f64, f64)> = positions
        .iter()
        .enumerate()
        .map(|(node, &x)| match kind {
            ElementKind::Bar => (x + scale * u[node * d], 0.0),
            ElementKind::Beam => (x, scale * u[node * d]),
        })
        .collect();

    let w = load.line_intensity();
    let mut elements = Vec::with_capacity(mesh.element_count());

    for (index, element) in mesh.elements().iter().enumerate() {
        let dofs = element_dofs(element, kind);
        let d_elem = FEVec::from_fn(dofs.len(), |i, _| u[dofs[i]]);
        let k_elem = element_matrix(element, kind, material, section);
        let f_eq = math::consistent_uniform_load(kind, w, element.length);

        let end_forces = &k_elem * &d_elem - f_eq;
        elements.push(element_result(
            index,
            kind,
            &end_forces,
            w,
            element.length,
            section,
        ));
    }

    let (max_stress_element, max_stress) = elements
        .iter()
        .map(|r| (r.element, r.stress))
        .fold((0, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best });

    let yield_exceeded = max_stress > material.fy;
    let mut events = Vec::new();
    if yield_exceeded {
        log::warn!(
            "yield strength of {} exceeded in element {}: {:.3e} Pa > {:.3e} Pa",
            material.name,
            max_stress_element,
            max_stress,
            material.fy
        );
        events.push(AnalysisEvent::YieldExceeded {
            element: max_stress_element,
            stress: max_stress,
            yield_strength: material.fy,
        });
    }

    PostProcessed {
        initial_shape,
        deformed_shape,
        elements,
        max_stress,
        max_stress_element,
        yield_exceeded,
        events,
    }
}
