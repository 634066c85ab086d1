//! Constraint handling and the reduced linear solve

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::analysis::SolverBackend;
use crate::assembly::GlobalStiffness;
use crate::elements::{ElementKind, Support};
use crate::error::{FemError, FemResult};
use crate::math::{self, Mat, SkylineCholesky, Vec as FEVec};
use crate::mesh::Mesh;

/// Set of fixed (restrained) global DOFs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    fixed: Vec<usize>,
    /// Rank of the rigid-body modes restricted to the fixed DOFs
    restrained_modes: usize,
    rigid_modes: usize,
}

impl Constraints {
    /// Build constraints from explicit global DOF indices
    pub fn new(mesh: &Mesh, kind: ElementKind, mut dofs: Vec<usize>) -> FemResult<Self> {
        dofs.sort_unstable();
        dofs.dedup();

        let n_dofs = mesh.dof_count(kind);
        if let Some(&dof) = dofs.iter().find(|&&dof| dof >= n_dofs) {
            return Err(FemError::InvalidInput(format!(
                "fixed DOF {} outside model of {} DOFs",
                dof, n_dofs
            )));
        }

        Ok(Self::with_rank(mesh, kind, dofs))
    }

    /// Build constraints from supports placed at nodes.
    ///
    /// Nodes beyond the mesh are ignored.
    pub fn from_supports(mesh: &Mesh, kind: ElementKind, supports: &[(usize, Support)]) -> Self {
        let d = kind.dofs_per_node();
        let mut dofs: Vec<usize> = supports
            .iter()
            .filter(|(node, _)| *node < mesh.node_count())
            .flat_map(|(node, support)| {
                support
                    .restraints(kind)
                    .iter()
                    .enumerate()
                    .filter(|(_, restrained)| **restrained)
                    .map(move |(k, _)| node * d + k)
            })
            .collect();
        dofs.sort_unstable();
        dofs.dedup();

        Self::with_rank(mesh, kind, dofs)
    }

    fn with_rank(mesh: &Mesh, kind: ElementKind, fixed: Vec<usize>) -> Self {
        let modes = math::rigid_body_modes(kind, mesh.positions());
        let rigid_modes = modes.ncols();

        // Rows scaled to unit max-norm, so translation and rotation rows weigh alike
        let mut restricted = Mat::from_fn(fixed.len(), rigid_modes, |i, j| modes[(fixed[i], j)]);
        for mut row in restricted.row_iter_mut() {
            let norm = row.amax();
            if norm > 0.0 {
                row /= norm;
            }
        }
        let restrained_modes = if fixed.is_empty() {
            0
        } else {
            restricted.rank(1e-9)
        };

        Self {
            fixed,
            restrained_modes,
            rigid_modes,
        }
    }

    /// Fixed DOFs in ascending order
    pub fn fixed(&self) -> &[usize] {
        &self.fixed
    }

    pub fn is_fixed(&self, dof: usize) -> bool {
        self.fixed.binary_search(&dof).is_ok()
    }

    /// Free DOFs in ascending order
    pub fn free_dofs(&self, n_dofs: usize) -> Vec<usize> {
        (0..n_dofs).filter(|&dof| !self.is_fixed(dof)).collect()
    }

    /// Check that the fixed DOFs suppress every rigid-body mode
    pub fn check_stability(&self) -> FemResult<()> {
        if self.restrained_modes < self.rigid_modes {
            return Err(FemError::SingularSystem(format!(
                "supports restrain {} of {} rigid-body modes",
                self.restrained_modes, self.rigid_modes
            )));
        }
        Ok(())
    }
}

/// Solution of the constrained system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Displacements {
    /// Full displacement vector, zero at fixed DOFs
    pub u: FEVec,
    /// Reactions `K·U − F` at fixed DOFs, zero elsewhere
    pub reactions: FEVec,
    /// Number of unknowns in the reduced system
    pub free_dofs: usize,
}

/// Solve `K·U = F` under the given constraints
pub fn solve(
    k: &GlobalStiffness,
    f: &FEVec,
    constraints: &Constraints,
    backend: SolverBackend,
) -> FemResult<Displacements> {
    let n_dofs = k.size();
    if f.len() != n_dofs {
        return Err(FemError::InvalidInput(format!(
            "load vector has {} entries, stiffness has {} DOFs",
            f.len(),
            n_dofs
        )));
    }
    if let Some(&dof) = constraints.fixed().last() {
        if dof >= n_dofs {
            return Err(FemError::InvalidInput(format!(
                "fixed DOF {} outside model of {} DOFs",
                dof, n_dofs
            )));
        }
    }

    constraints.check_stability()?;

    let free_dofs = constraints.free_dofs(n_dofs);
    let n_free = free_dofs.len();
    let start = Instant::now();

    let mut u = FEVec::zeros(n_dofs);

    if n_free > 0 {
        let p1 = FEVec::from_fn(n_free, |i, _| f[free_dofs[i]]);

        let d1 = match backend {
            SolverBackend::Dense => {
                let k11 = Mat::from_fn(n_free, n_free, |i, j| k.matrix[(free_dofs[i], free_dofs[j])]);
                math::solve_cholesky(&k11, &p1).ok_or_else(|| {
                    FemError::SingularSystem(
                        "Cholesky pivot below tolerance in reduced stiffness".to_string(),
                    )
                })?
            }
            SolverBackend::Skyline => {
                let builder = k.sparse_block(&free_dofs);
                log::debug!(
                    "skyline solve: {} free DOFs, {} non-zeros, sparsity {:.1}%",
                    n_free,
                    builder.nnz(),
                    builder.sparsity() * 100.0
                );
                let mut solver = SkylineCholesky::new(&builder.to_csr());
                solver.factorize()?;
                solver.solve(&p1)?
            }
        };

        for (i, &di) in free_dofs.iter().enumerate() {
            u[di] = d1[i];
        }
    }

    // Reactions are only meaningful on restrained rows
    let residual = &k.matrix * &u - f;
    let mut reactions = FEVec::zeros(n_dofs);
    for &dof in constraints.fixed() {
        reactions[dof] = residual[dof];
    }

    log::debug!(
        "{:?} solve of {} unknowns took {:?}",
        backend,
        n_free,
        start.elapsed()
    );

    Ok(Displacements {
        u,
        reactions,
        free_dofs: n_free,
    })
}
