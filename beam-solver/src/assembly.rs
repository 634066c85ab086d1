//! Global stiffness assembly

use serde::{Deserialize, Serialize};

use crate::elements::{ElementKind, Material, Section};
use crate::error::FemResult;
use crate::math::{self, Mat, SparseMatrixBuilder};
use crate::mesh::{Element, Mesh};

/// Assembled global stiffness matrix of one mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalStiffness {
    pub matrix: Mat,
    pub kind: ElementKind,
}

impl GlobalStiffness {
    /// Number of DOFs (rows of K)
    pub fn size(&self) -> usize {
        self.matrix.nrows()
    }

    /// Copy the non-zero entries of a sub-matrix into sparse COO storage
    pub fn sparse_block(&self, dofs: &[usize]) -> SparseMatrixBuilder {
        let mut builder = SparseMatrixBuilder::new(dofs.len());
        for (i, &di) in dofs.iter().enumerate() {
            for (j, &dj) in dofs.iter().enumerate() {
                builder.add(i, j, self.matrix[(di, dj)]);
            }
        }
        builder
    }
}

/// Global DOF indices of an element, in local DOF order
pub fn element_dofs(element: &Element, kind: ElementKind) -> Vec<usize> {
    let d = kind.dofs_per_node();
    element
        .nodes
        .iter()
        .flat_map(|&node| (0..d).map(move |k| node * d + k))
        .collect()
}

/// Local stiffness of one element for the bound material and section
pub fn element_matrix(
    element: &Element,
    kind: ElementKind,
    material: &Material,
    section: &Section,
) -> Mat {
    math::element_stiffness(
        kind,
        material.e,
        section.area(),
        section.inertia(),
        element.length,
    )
}

/// Build the global stiffness matrix.
///
/// Elements are scattered in mesh order, so the same inputs always give a
/// bit-identical, exactly symmetric matrix.
pub fn assemble(
    mesh: &Mesh,
    kind: ElementKind,
    material: &Material,
    section: &Section,
) -> FemResult<GlobalStiffness> {
    material.validate()?;
    section.validate()?;

    let n_dofs = mesh.dof_count(kind);
    let mut k_global = Mat::zeros(n_dofs, n_dofs);

    for element in mesh.elements() {
        let k_elem = element_matrix(element, kind, material, section);
        let dofs = element_dofs(element, kind);

        for (i, &gi) in dofs.iter().enumerate() {
            for (j, &gj) in dofs.iter().enumerate() {
                k_global[(gi, gj)] += k_elem[(i, j)];
            }
        }
    }

    log::debug!(
        "assembled {:?} stiffness: {} elements, {} DOFs",
        kind,
        mesh.element_count(),
        n_dofs
    );

    Ok(GlobalStiffness {
        matrix: k_global,
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FemError;
    use crate::math::rigid_body_modes;

    fn fixtures() -> (Material, Section) {
        (Material::steel(), Section::rectangular("Rectangle 100x50", 0.1, 0.05))
    }

    #[test]
    fn test_element_dofs() {
        let mesh = Mesh::generate(1.0, 3).unwrap();
        let element = &mesh.elements()[1];
        assert_eq!(element_dofs(element, ElementKind::Beam), vec![2, 3, 4, 5]);
        assert_eq!(element_dofs(element, ElementKind::Bar), vec![1, 2]);
    }

    #[test]
    fn test_exact_symmetry() {
        let (material, section) = fixtures();
        let mesh = Mesh::generate(1.0, 7).unwrap();
        for kind in [ElementKind::Bar, ElementKind::Beam] {
            let k = assemble(&mesh, kind, &material, &section).unwrap().matrix;
            assert_eq!(k, k.transpose());
        }
    }

    #[test]
    fn test_bit_reproducible() {
        let (material, section) = fixtures();
        let mesh = Mesh::generate(2.5, 16).unwrap();
        let first = assemble(&mesh, ElementKind::Beam, &material, &section).unwrap();
        let second = assemble(&mesh, ElementKind::Beam, &material, &section).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_null_space_matches_rigid_modes() {
        let (material, section) = fixtures();
        let mesh = Mesh::generate(1.0, 4).unwrap();

        for kind in [ElementKind::Bar, ElementKind::Beam] {
            let k = assemble(&mesh, kind, &material, &section).unwrap().matrix;
            let scale = k.amax();

            let modes = rigid_body_modes(kind, mesh.positions());
            assert!((&k * &modes).amax() < 1e-9 * scale);

            let eigen = k.clone().symmetric_eigen();
            let zero_count = eigen
                .eigenvalues
                .iter()
                .filter(|&&lambda| lambda.abs() < 1e-9 * scale)
                .count();
            assert_eq!(zero_count, kind.rigid_body_modes(), "{:?}", kind);
        }
    }

    #[test]
    fn test_rejects_degenerate_section() {
        let material = Material::steel();
        let section = Section::hollow_rectangular("RHS", 0.1, 0.05, 0.0);
        let mesh = Mesh::generate(1.0, 4).unwrap();
        assert!(matches!(
            assemble(&mesh, ElementKind::Beam, &material, &section),
            Err(FemError::DegenerateSection { .. })
        ));
    }

    #[test]
    fn test_rejects_invalid_material() {
        let material = Material::new("Void", 0.0, 250e6, 7850.0);
        let (_, section) = fixtures();
        let mesh = Mesh::generate(1.0, 4).unwrap();
        assert!(matches!(
            assemble(&mesh, ElementKind::Bar, &material, &section),
            Err(FemError::InvalidMaterial { .. })
        ));
    }

    #[test]
    fn test_sparse_block_matches_dense() {
        let (material, section) = fixtures();
        let mesh = Mesh::generate(1.0, 4).unwrap();
        let k = assemble(&mesh, ElementKind::Beam, &material, &section).unwrap();
        let dofs: Vec<usize> = (2..k.size()).collect();
        let dense = k.sparse_block(&dofs).to_dense();
        assert_eq!(dense, k.matrix.view((2, 2), (8, 8)).into_owned());
    }
}
