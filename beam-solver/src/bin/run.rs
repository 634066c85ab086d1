//! Beam Solver runner - solve one member from a JSON configuration
//!
//! Usage: `beam-run [config.json]`. Without a file the 1 m steel cantilever
//! with a 1 kN tip load is solved.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use beam_solver::prelude::*;
use serde::{Deserialize, Serialize};

/// Everything needed to run one analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct RunConfig {
    /// Variant display name, e.g. "Cantilever"
    variant: String,
    sub_case: usize,
    material: Material,
    section: Section,
    /// Member length in m
    length: f64,
    elements: i64,
    /// N, or N/m when distributed
    load: f64,
    distributed: bool,
    options: AnalysisOptions,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Cantilever.name().to_string(),
            sub_case: 0,
            material: Material::steel(),
            section: Section::default(),
            length: 1.0,
            elements: 8,
            load: 1000.0,
            distributed: false,
            options: AnalysisOptions::default(),
        }
    }
}

impl RunConfig {
    fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }
}

fn build_model(config: &RunConfig) -> Result<BeamModel> {
    let variant = Variant::from_name(&config.variant)?;

    let mut model = BeamModel::new().with_options(config.options.clone());
    model.select_variant(variant.index())?;
    model.select_sub_case(config.sub_case)?;
    model.set_material(Arc::new(config.material.clone()));
    model.set_section(Arc::new(config.section.clone()));

    let section = model.section().clone();
    model.set_geometry(config.length, section.h(), section.b(), section.e())?;
    model.compute_mesh(config.elements)?;
    Ok(model)
}

fn main() -> Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => RunConfig::load(Path::new(&path))?,
        None => RunConfig::default(),
    };

    let mut model = build_model(&config)?;
    let variant = model.variant();

    println!("=== Beam Solver: {} ===\n", variant);
    println!("Sub-case:  {}", model.sub_cases()[model.sub_case_index()]);
    println!("Material:  {}", model.material().name);
    println!(
        "Section:   {} (A={:.4e} m², I={:.4e} m⁴)",
        model.section().name(),
        model.section().area(),
        model.section().inertia()
    );
    println!(
        "Load:      {} {}\n",
        config.load,
        variant.load_unit(config.distributed)
    );

    let solution = model
        .solve_static(config.load, config.distributed)
        .context("static analysis failed")?;
    for event in solution.events() {
        match event {
            AnalysisEvent::YieldExceeded {
                element,
                stress,
                yield_strength,
            } => println!(
                "!! Yield exceeded in element {}: {:.2} MPa > {:.2} MPa\n",
                element,
                stress / 1e6,
                yield_strength / 1e6
            ),
        }
    }

    println!("Nodal Results:");
    println!("  {:>5} {:>10} {:>14} {:>14}", "Node", "x (m)", "Force (N)", "Disp (mm)");
    for row in model.nodal_table()? {
        println!(
            "  {:>5} {:>10.4} {:>14.3} {:>14.6}",
            row.node,
            row.x,
            row.force,
            row.displacement * 1000.0
        );
    }

    let summary = model.summary()?;
    println!("\nSummary:");
    println!(
        "  Max displacement: {:.4}mm at node {}",
        summary.max_displacement * 1000.0,
        summary.max_disp_node + 1
    );
    println!(
        "  Max reaction: {:.2}N at node {}",
        summary.max_reaction,
        summary.max_reaction_node + 1
    );
    println!(
        "  Max stress: {:.2}MPa in element {} (utilisation {:.1}%)",
        summary.max_stress / 1e6,
        summary.max_stress_element + 1,
        summary.utilisation * 100.0
    );
    println!(
        "  DOFs: {} total, {} free",
        summary.total_dofs, summary.free_dofs
    );

    Ok(())
}
