//! Mathematical utilities for 1-D FEM calculations

pub mod sparse;

use nalgebra::{DMatrix, DVector, Matrix2, Matrix4};

use crate::elements::ElementKind;

pub use sparse::{SkylineCholesky, SparseMatrixBuilder};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;
pub type Mat2 = Matrix2<f64>;
pub type Mat4 = Matrix4<f64>;

/// Smallest accepted ratio of a Cholesky pivot to its original diagonal entry.
///
/// Smaller pivots mean the reduced system still contains a rigid-body mode.
pub const PIVOT_TOLERANCE: f64 = 1e-12;

/// Compute the local stiffness matrix of a two-node axial bar
///
/// # Arguments
/// * `e` - Modulus of elasticity
/// * `a` - Cross-sectional area
/// * `length` - Element length
///
/// # Returns
/// 2x2 stiffness matrix, DOF order [u1, u2]
pub fn bar_local_stiffness(e: f64, a: f64, length: f64) -> Mat2 {
    let ea_l = e * a / length;

    #[rustfmt::skip]
    let data = [
        ea_l,  -ea_l,
        -ea_l, ea_l,
    ];

    Mat2::from_row_slice(&data)
}

/// Compute the local stiffness matrix of a two-node Euler-Bernoulli beam
///
/// # Arguments
/// * `e` - Modulus of elasticity
/// * `i` - Second moment of area about the bending axis
/// * `length` - Element length
///
/// # Returns
/// 4x4 stiffness matrix, DOF order [v1, θ1, v2, θ2]
pub fn beam_local_stiffness(e: f64, i: f64, length: f64) -> Mat4 {
    let l = length;
    let l2 = l * l;
    let l3 = l2 * l;

    let ei_l3 = e * i / l3;
    let ei_l2 = e * i / l2;
    let ei_l = e * i / l;

    #[rustfmt::skip]
    let data = [
        // Row 0: shear at i
        12.0*ei_l3,   6.0*ei_l2,   -12.0*ei_l3,  6.0*ei_l2,
        // Row 1: moment at i
        6.0*ei_l2,    4.0*ei_l,    -6.0*ei_l2,   2.0*ei_l,
        // Row 2: shear at j
        -12.0*ei_l3,  -6.0*ei_l2,  12.0*ei_l3,   -6.0*ei_l2,
        // Row 3: moment at j
        6.0*ei_l2,    2.0*ei_l,    -6.0*ei_l2,   4.0*ei_l,
    ];

    Mat4::from_row_slice(&data)
}

/// Local stiffness matrix for any element kind, sized `kind.dofs_per_element()`
pub fn element_stiffness(kind: ElementKind, e: f64, a: f64, i: f64, length: f64) -> Mat {
    match kind {
        ElementKind::Bar => {
            let k = bar_local_stiffness(e, a, length);
            Mat::from_iterator(2, 2, k.iter().copied())
        }
        ElementKind::Beam => {
            let k = beam_local_stiffness(e, i, length);
            Mat::from_iterator(4, 4, k.iter().copied())
        }
    }
}

/// Consistent nodal load vector for a uniform line load on one element.
///
/// Work-equivalent to the distributed load through the element shape functions:
/// bar `[wL/2, wL/2]`, beam `[wL/2, wL²/12, wL/2, -wL²/12]`.
///
/// # Arguments
/// * `kind` - Element kind
/// * `w` - Load intensity (force per unit length, positive along +u or +v)
/// * `length` - Element length
pub fn consistent_uniform_load(kind: ElementKind, w: f64, length: f64) -> Vec {
    let l = length;
    let l2 = l * l;

    match kind {
        ElementKind::Bar => Vec::from_vec(vec![w * l / 2.0, w * l / 2.0]),
        ElementKind::Beam => Vec::from_vec(vec![
            w * l / 2.0,
            w * l2 / 12.0,
            w * l / 2.0,
            -w * l2 / 12.0,
        ]),
    }
}

/// Rigid-body modes of an unconstrained line of elements, one mode per column.
///
/// Bar: uniform translation. Beam: uniform translation, and rotation about the
/// member centre in span-scaled coordinates (`v = (x - c)/L`, `θ = 1/L`).
pub fn rigid_body_modes(kind: ElementKind, positions: &[f64]) -> Mat {
    let d = kind.dofs_per_node();
    let mut modes = Mat::zeros(d * positions.len(), kind.rigid_body_modes());

    let (first, last) = match (positions.first(), positions.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return modes,
    };
    let centre = 0.5 * (first + last);
    let span = if last > first { last - first } else { 1.0 };

    for (node, &x) in positions.iter().enumerate() {
        match kind {
            ElementKind::Bar => {
                modes[(node, 0)] = 1.0;
            }
            ElementKind::Beam => {
                modes[(2 * node, 0)] = 1.0;
                modes[(2 * node, 1)] = (x - centre) / span;
                modes[(2 * node + 1, 1)] = 1.0 / span;
            }
        }
    }

    modes
}

/// Solve a symmetric positive definite system with a dense Cholesky factorization.
///
/// Returns `None` when a pivot falls below `PIVOT_TOLERANCE` relative to its diagonal entry.
pub fn solve_cholesky(a: &Mat, b: &Vec) -> Option<Vec> {
    let chol = a.clone().cholesky()?;

    let l = chol.l_dirty();
    for i in 0..a.nrows() {
        let pivot = l[(i, i)] * l[(i, i)];
        if !(pivot > PIVOT_TOLERANCE * a[(i, i)].abs()) {
            return None;
        }
    }

    Some(chol.solve(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_beam_local_stiffness_symmetry() {
        let k = beam_local_stiffness(210e9, 4.1667e-6, 0.125);
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(k[(i, j)], k[(j, i)]);
            }
        }
    }

    #[test]
    fn test_beam_local_stiffness_scaling() {
        let (e, i, l) = (200e9, 1e-5, 0.5);
        let k = beam_local_stiffness(e, i, l);
        assert_relative_eq!(k[(0, 0)], 12.0 * e * i / l.powi(3), max_relative = 1e-14);
        assert_relative_eq!(k[(1, 1)], 4.0 * e * i / l, max_relative = 1e-14);
        assert_relative_eq!(k[(1, 3)], 2.0 * e * i / l, max_relative = 1e-14);
    }

    #[test]
    fn test_bar_local_stiffness_scaling() {
        let k = bar_local_stiffness(200e9, 0.01, 2.0);
        assert_relative_eq!(k[(0, 0)], 1e9, max_relative = 1e-14);
        assert_relative_eq!(k[(0, 1)], -1e9, max_relative = 1e-14);
    }

    #[test]
    fn test_rigid_modes_produce_no_element_forces() {
        let positions = [0.0, 0.3];
        let k = element_stiffness(ElementKind::Beam, 200e9, 0.01, 1e-5, 0.3);
        let modes = rigid_body_modes(ElementKind::Beam, &positions);
        let forces = &k * &modes;
        let scale = k.amax();
        assert!(forces.amax() < 1e-12 * scale);
    }

    #[test]
    fn test_consistent_load_totals() {
        let f = consistent_uniform_load(ElementKind::Beam, -500.0, 0.25);
        assert_relative_eq!(f[0] + f[2], -500.0 * 0.25, max_relative = 1e-14);
        // End moments cancel over a single element
        assert_relative_eq!(f[1] + f[3], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_solve_cholesky_rejects_singular() {
        let a = Mat::from_row_slice(2, 2, &[1.0, -1.0, -1.0, 1.0]);
        let b = Vec::from_vec(vec![1.0, 0.0]);
        assert!(solve_cholesky(&a, &b).is_none());
    }

    #[test]
    fn test_solve_cholesky_spd() {
        let a = Mat::from_row_slice(2, 2, &[4.0, 1.0, 1.0, 3.0]);
        let b = Vec::from_vec(vec![1.0, 2.0]);
        let x = solve_cholesky(&a, &b).unwrap();
        let residual = &a * &x - &b;
        assert!(residual.norm() < 1e-12);
    }
}
