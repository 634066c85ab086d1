//! Uniform 1-D mesh generation

use serde::{Deserialize, Serialize};

use crate::elements::ElementKind;
use crate::error::{FemError, FemResult};

/// Largest accepted element count. The global stiffness is stored dense.
pub const MAX_ELEMENTS: i64 = 4096;

/// A two-node line element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Indices of the start and end nodes
    pub nodes: [usize; 2],
    /// Element length in m
    pub length: f64,
}

/// Ordered nodes and elements along a straight member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    length: f64,
    positions: Vec<f64>,
    elements: Vec<Element>,
}

impl Mesh {
    /// Divide a member of the given length into `element_count` equal elements.
    ///
    /// Any count in `1..=MAX_ELEMENTS` is accepted. Nodes sit at `i * length / element_count`.
    pub fn generate(length: f64, element_count: i64) -> FemResult<Self> {
        if !(length.is_finite() && length > 0.0) {
            return Err(FemError::InvalidMesh(format!(
                "length must be positive and finite (got {})",
                length
            )));
        }
        if element_count <= 0 {
            return Err(FemError::InvalidMesh(format!(
                "element count must be positive (got {})",
                element_count
            )));
        }
        if element_count > MAX_ELEMENTS {
            return Err(FemError::InvalidMesh(format!(
                "element count {} exceeds the limit of {}",
                element_count, MAX_ELEMENTS
            )));
        }
        let n = element_count as usize;

        let le = length / n as f64;
        let positions: Vec<f64> = (0..=n).map(|i| length * i as f64 / n as f64).collect();
        let elements: Vec<Element> = (0..n)
            .map(|i| Element {
                nodes: [i, i + 1],
                length: le,
            })
            .collect();

        log::debug!("meshed L={} into {} elements of {:e} m", length, n, le);

        Ok(Self {
            length,
            positions,
            elements,
        })
    }

    /// Total member length in m
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Uniform element length in m
    pub fn element_length(&self) -> f64 {
        self.length / self.elements.len() as f64
    }

    /// Node x coordinates, in node order
    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Node nearest to `fraction * length`, clamped to the member ends
    pub fn node_at_fraction(&self, fraction: f64) -> usize {
        let n = self.element_count();
        let index = (fraction.clamp(0.0, 1.0) * n as f64).round() as usize;
        index.min(n)
    }

    /// Total number of DOFs for the element kind
    pub fn dof_count(&self, kind: ElementKind) -> usize {
        kind.dofs_per_node() * self.node_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniform_spacing() {
        let mesh = Mesh::generate(2.0, 4).unwrap();
        assert_eq!(mesh.node_count(), 5);
        assert_eq!(mesh.element_count(), 4);
        assert_eq!(mesh.positions(), &[0.0, 0.5, 1.0, 1.5, 2.0]);
        assert_eq!(mesh.elements()[3].nodes, [3, 4]);
        assert_relative_eq!(mesh.element_length(), 0.5);
    }

    #[test]
    fn test_accepts_non_power_of_two() {
        let mesh = Mesh::generate(1.0, 3).unwrap();
        assert_eq!(mesh.node_count(), 4);
        assert_eq!(*mesh.positions().last().unwrap(), 1.0);
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert!(matches!(Mesh::generate(1.0, 0), Err(FemError::InvalidMesh(_))));
        assert!(matches!(Mesh::generate(1.0, -1), Err(FemError::InvalidMesh(_))));
        assert!(matches!(Mesh::generate(0.0, 8), Err(FemError::InvalidMesh(_))));
        assert!(matches!(Mesh::generate(-2.0, 8), Err(FemError::InvalidMesh(_))));
        assert!(matches!(Mesh::generate(f64::NAN, 8), Err(FemError::InvalidMesh(_))));
    }

    #[test]
    fn test_element_count_limit() {
        assert!(Mesh::generate(1.0, MAX_ELEMENTS).is_ok());
        assert!(matches!(
            Mesh::generate(1.0, MAX_ELEMENTS + 1),
            Err(FemError::InvalidMesh(_))
        ));
        assert!(matches!(Mesh::generate(1.0, i64::MAX), Err(FemError::InvalidMesh(_))));
    }

    #[test]
    fn test_node_at_fraction() {
        let mesh = Mesh::generate(1.0, 8).unwrap();
        assert_eq!(mesh.node_at_fraction(0.0), 0);
        assert_eq!(mesh.node_at_fraction(0.5), 4);
        assert_eq!(mesh.node_at_fraction(1.0), 8);

        let odd = Mesh::generate(1.0, 5).unwrap();
        assert_eq!(odd.node_at_fraction(0.5), 3);
    }

    #[test]
    fn test_dof_count() {
        let mesh = Mesh::generate(1.0, 8).unwrap();
        assert_eq!(mesh.dof_count(ElementKind::Bar), 9);
        assert_eq!(mesh.dof_count(ElementKind::Beam), 18);
    }
}
