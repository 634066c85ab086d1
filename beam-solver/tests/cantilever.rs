//! Cantilever checks against closed-form solutions

use std::sync::Arc;

use approx::assert_relative_eq;
use beam_solver::prelude::*;

const E: f64 = 210e9;
const LENGTH: f64 = 1.0;

fn inertia() -> f64 {
    0.05 * 0.1f64.powi(3) / 12.0
}

fn cantilever(n: i64, backend: SolverBackend) -> BeamModel {
    let mut model =
        BeamModel::new().with_options(AnalysisOptions::default().with_backend(backend));
    model.select_variant(0).unwrap();
    model.set_material(Arc::new(Material::new("Steel S235", E, 250e6, 7850.0)));
    model.set_section(Arc::new(Section::rectangular("Rectangle 100x50", 0.1, 0.05)));
    model.compute_mesh(n).unwrap();
    model
}

#[test]
fn test_reference_scenario() {
    let p = 1000.0;
    let mut model = cantilever(8, SolverBackend::Skyline);
    assert_relative_eq!(model.section().inertia(), 4.1667e-6, max_relative = 1e-4);

    let solution = model.solve_static(p, false).unwrap();
    let expected = p * LENGTH.powi(3) / (3.0 * E * inertia());
    assert_relative_eq!(expected, 3.8095e-4, max_relative = 1e-4);

    let tip = solution.node_displacement(8).unwrap();
    assert_relative_eq!(-tip.translation, expected, max_relative = 0.01);

    let root = solution.node_reactions(0).unwrap();
    assert_relative_eq!(root.force, 1000.0, max_relative = 1e-9);
    assert_relative_eq!(root.moment.unwrap(), 1000.0, max_relative = 1e-9);

    // Free end carries no reaction
    let free = solution.node_reactions(8).unwrap();
    assert_eq!(free.force, 0.0);

    assert!(!solution.post.yield_exceeded);
    assert!(solution.events().is_empty());
}

#[test]
fn test_tip_deflection_any_mesh() {
    let p = 2500.0;
    let expected = p * LENGTH.powi(3) / (3.0 * E * inertia());

    for n in [1, 3, 5, 12, 33] {
        for backend in [SolverBackend::Dense, SolverBackend::Skyline] {
            let mut model = cantilever(n, backend);
            let solution = model.solve_static(p, false).unwrap();
            let tip = solution.node_displacement(n as usize).unwrap();
            assert_relative_eq!(-tip.translation, expected, max_relative = 1e-8);

            let slope = p * LENGTH.powi(2) / (2.0 * E * inertia());
            assert_relative_eq!(-tip.rotation.unwrap(), slope, max_relative = 1e-8);
        }
    }
}

#[test]
fn test_compliance_converges_from_below() {
    let w = 1000.0;
    let exact = w * w * LENGTH.powi(5) / (20.0 * E * inertia());

    let compliance = |n: i64| {
        let mut model = cantilever(n, SolverBackend::Skyline);
        model.solve_static(w, true).unwrap().compliance
    };

    let mut previous_error = f64::INFINITY;
    for n in [1, 2, 4, 8, 16] {
        let c = compliance(n);
        let error = exact - c;
        assert!(error > 0.0, "N={} compliance {} above exact {}", n, c, exact);
        assert!(error < previous_error, "N={} error {} did not decrease", n, error);
        previous_error = error;
    }

    let error_4 = (exact - compliance(4)).abs();
    let error_64 = (exact - compliance(64)).abs();
    assert!(error_4 >= 10.0 * error_64, "{} vs {}", error_4, error_64);

    // Hermite interpolation error of the quartic deflection: exact / (36 N^4)
    assert_relative_eq!(error_4, exact / (36.0 * 4f64.powi(4)), max_relative = 1e-4);
}

#[test]
fn test_uniform_load_tip_deflection() {
    let w = 1000.0;
    let mut model = cantilever(4, SolverBackend::Dense);
    let solution = model.solve_static(w, true).unwrap();

    let expected = w * LENGTH.powi(4) / (8.0 * E * inertia());
    let tip = solution.node_displacement(4).unwrap();
    assert_relative_eq!(-tip.translation, expected, max_relative = 1e-8);

    let root = solution.node_reactions(0).unwrap();
    assert_relative_eq!(root.force, w * LENGTH, max_relative = 1e-9);
    assert_relative_eq!(root.moment.unwrap(), w * LENGTH.powi(2) / 2.0, max_relative = 1e-9);

    // Root moment wL²/2 governs the stress
    let sigma = w * LENGTH.powi(2) / 2.0 * 0.05 / inertia();
    assert_relative_eq!(solution.post.max_stress, sigma, max_relative = 1e-8);
}

#[test]
fn test_reversed_cantilever() {
    let mut model = cantilever(6, SolverBackend::Skyline);
    model.select_sub_case(1).unwrap();
    let solution = model.solve_static(1000.0, false).unwrap();

    let clamp = solution.node_reactions(6).unwrap();
    assert_relative_eq!(clamp.force, 1000.0, max_relative = 1e-9);
    // Load sits on the -x side of the clamp
    assert_relative_eq!(clamp.moment.unwrap(), -1000.0, max_relative = 1e-9);

    let tip = solution.node_displacement(0).unwrap();
    assert_relative_eq!(
        -tip.translation,
        1000.0 / (3.0 * E * inertia()),
        max_relative = 1e-8
    );
}

#[test]
fn test_material_and_section_catalog() {
    let p = 500.0;
    let materials = [
        Material::steel(),
        Material::aluminum(),
        Material::titanium(),
        Material::timber(),
    ];
    let sections = [
        Section::rectangular("Rectangle 100x50", 0.1, 0.05),
        Section::hollow_rectangular("RHS 100x50x5", 0.1, 0.05, 0.005),
        Section::circular("Round 80", 0.08),
        Section::tube("CHS 88.9x5", 0.0889, 0.005),
        Section::i_beam("I 200x100x8", 0.2, 0.1, 0.008),
    ];

    for material in &materials {
        for section in &sections {
            let mut model = cantilever(6, SolverBackend::Skyline);
            model.set_material(Arc::new(material.clone()));
            model.set_section(Arc::new(section.clone()));
            let solution = model.solve_static(p, false).unwrap();

            let ei = material.e * section.inertia();
            let tip = solution.node_displacement(6).unwrap();
            assert_relative_eq!(-tip.translation, p / (3.0 * ei), max_relative = 1e-8);

            // Root moment P·L governs
            let sigma = p * LENGTH * section.extreme_fibre() / section.inertia();
            assert_relative_eq!(solution.post.max_stress, sigma, max_relative = 1e-8);
            assert_eq!(solution.post.yield_exceeded, sigma > material.fy);
        }
    }
}

#[test]
fn test_long_reversed_cantilever() {
    let length = 50_000.0;
    let mut model = cantilever(4, SolverBackend::Skyline);
    model.select_sub_case(1).unwrap();
    model.set_geometry(length, 0.1, 0.05, 0.0).unwrap();
    model.compute_mesh(4).unwrap();

    let solution = model.solve_static(1.0, false).unwrap();
    assert_relative_eq!(solution.node_reactions(4).unwrap().force, 1.0, max_relative = 1e-9);

    let tip = solution.node_displacement(0).unwrap();
    assert_relative_eq!(
        -tip.translation,
        length.powi(3) / (3.0 * E * inertia()),
        max_relative = 1e-8
    );
}

#[test]
fn test_repeated_solves_are_bit_identical() {
    for backend in [SolverBackend::Dense, SolverBackend::Skyline] {
        let mut model = cantilever(32, backend);
        let first = model.solve_static(750.0, true).unwrap().clone();
        let k_first = model.stiffness_matrix().unwrap().clone();

        let second = model.solve_static(750.0, true).unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(&k_first, model.stiffness_matrix().unwrap());
    }
}

#[test]
fn test_invalid_mesh_counts() {
    let mut model = BeamModel::new();
    assert!(matches!(model.compute_mesh(0), Err(FemError::InvalidMesh(_))));
    assert!(matches!(model.compute_mesh(-1), Err(FemError::InvalidMesh(_))));
    assert!(model.mesh().is_none());
}

#[test]
fn test_hollow_section_without_wall() {
    let mut model = cantilever(4, SolverBackend::Skyline);
    model.set_section(Arc::new(Section::hollow_rectangular("RHS 100x50x5", 0.1, 0.05, 0.005)));
    assert!(model.solve_static(1000.0, false).is_ok());

    assert!(matches!(
        model.set_geometry(1.0, 0.1, 0.05, 0.0),
        Err(FemError::DegenerateSection { .. })
    ));

    model.set_section(Arc::new(Section::hollow_rectangular("RHS 100x50x0", 0.1, 0.05, 0.0)));
    assert!(matches!(
        model.solve_static(1000.0, false),
        Err(FemError::DegenerateSection { .. })
    ));
}

#[test]
fn test_yield_exceedance_is_reported_not_raised() {
    let mut model = cantilever(8, SolverBackend::Skyline);
    // sigma = P L c / I = 1.2e4 * P, above 250 MPa from about 20.8 kN
    let solution = model.solve_static(50_000.0, false).unwrap();

    assert!(solution.post.yield_exceeded);
    assert!(matches!(
        solution.events(),
        [AnalysisEvent::YieldExceeded { element: 0, .. }]
    ));
    assert!(model.summary().unwrap().utilisation > 1.0);
}
