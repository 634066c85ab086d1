//! Beam model - the engine driving one member through mesh, assembly, solve and post-processing

use std::sync::Arc;
use std::time::Instant;

use crate::analysis::{AnalysisOptions, CancelToken, Phase, GRAVITY};
use crate::assembly::{assemble, GlobalStiffness};
use crate::elements::{ElementKind, Material, Section};
use crate::error::{FemError, FemResult};
use crate::loads::{DistributedLoad, Load, NodeLoad};
use crate::math::{Mat, Vec as FEVec};
use crate::mesh::Mesh;
use crate::postprocess::post_process;
use crate::results::{AnalysisSummary, NodalRow, StaticSolution};
use crate::solver::solve;
use crate::variants::{SubCase, Variant};

/// Everything one successful compute request produces
struct Computed {
    mesh: Mesh,
    stiffness: GlobalStiffness,
    solution: StaticSolution,
}

/// Configuration a stored solution was computed with
#[derive(Debug, Clone)]
struct SolvedWith {
    mesh: Mesh,
    variant: Variant,
    sub_case: &'static SubCase,
    yield_strength: f64,
}

/// A single straight member under one boundary-condition variant
///
/// Every setter marks the model stale. Only a successful `solve_static`
/// clears the flag; a failed one also discards earlier results.
#[derive(Debug, Clone)]
pub struct BeamModel {
    variant: Variant,
    sub_case: usize,
    material: Arc<Material>,
    section: Arc<Section>,
    length: f64,
    element_count: Option<i64>,
    options: AnalysisOptions,

    mesh: Option<Mesh>,
    stiffness: Option<GlobalStiffness>,
    solution: Option<StaticSolution>,
    solved_with: Option<SolvedWith>,
    dirty: bool,
}

impl Default for BeamModel {
    fn default() -> Self {
        Self::new()
    }
}

impl BeamModel {
    /// Create a 1 m steel cantilever with the default rectangular section
    pub fn new() -> Self {
        Self {
            variant: Variant::default(),
            sub_case: 0,
            material: Arc::new(Material::default()),
            section: Arc::new(Section::default()),
            length: 1.0,
            element_count: None,
            options: AnalysisOptions::default(),
            mesh: None,
            stiffness: None,
            solution: None,
            solved_with: None,
            dirty: true,
        }
    }

    /// Set analysis options for subsequent solves
    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.set_options(options);
        self
    }

    // ========================
    // Configuration
    // ========================

    /// Display names of all variants, in registry order
    pub fn list_available_variants() -> Vec<&'static str> {
        Variant::ALL.iter().map(|v| v.name()).collect()
    }

    /// Select a variant by registry index; the sub-case resets to 0
    pub fn select_variant(&mut self, index: usize) -> FemResult<()> {
        let variant = Variant::from_index(index)?;
        self.set_variant(variant);
        Ok(())
    }

    /// Select a variant directly; the sub-case resets to 0
    pub fn set_variant(&mut self, variant: Variant) {
        self.variant = variant;
        self.sub_case = 0;
        self.mark_dirty();
    }

    /// Select a sub-case of the current variant by index
    pub fn select_sub_case(&mut self, index: usize) -> FemResult<()> {
        self.variant.sub_case(index)?;
        self.sub_case = index;
        self.mark_dirty();
        Ok(())
    }

    /// Names of the sub-cases offered by the current variant
    pub fn sub_cases(&self) -> Vec<&'static str> {
        self.variant.sub_cases().iter().map(|c| c.name).collect()
    }

    pub fn set_material(&mut self, material: Arc<Material>) {
        self.material = material;
        self.mark_dirty();
    }

    pub fn set_section(&mut self, section: Arc<Section>) {
        self.section = section;
        self.mark_dirty();
    }

    /// Set the member length and edit the bound section's dimensions.
    ///
    /// The edit is made on a private copy, so other holders of the previous
    /// section are unaffected. On error the model is left unchanged.
    pub fn set_geometry(&mut self, length: f64, h: f64, b: f64, e: f64) -> FemResult<()> {
        if !(length.is_finite() && length > 0.0) {
            return Err(FemError::InvalidMesh(format!(
                "length must be positive and finite (got {})",
                length
            )));
        }

        let mut edited = (*self.section).clone();
        edited.set_dimensions(h, b, e);
        edited.validate()?;

        *Arc::make_mut(&mut self.section) = edited;
        self.length = length;
        self.mark_dirty();
        Ok(())
    }

    /// Divide the member into `element_count` equal elements
    pub fn compute_mesh(&mut self, element_count: i64) -> FemResult<()> {
        let mesh = Mesh::generate(self.length, element_count)?;
        self.mesh = Some(mesh);
        self.element_count = Some(element_count);
        self.mark_dirty();
        Ok(())
    }

    pub fn set_options(&mut self, options: AnalysisOptions) {
        self.options = options;
        self.mark_dirty();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    // ========================
    // Accessors
    // ========================

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn sub_case_index(&self) -> usize {
        self.sub_case
    }

    fn current_sub_case(&self) -> FemResult<&'static SubCase> {
        self.variant.sub_case(self.sub_case)
    }

    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }

    pub fn section(&self) -> &Arc<Section> {
        &self.section
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    /// Global stiffness matrix of the last successful solve
    pub fn stiffness_matrix(&self) -> Option<&Mat> {
        self.stiffness.as_ref().map(|k| &k.matrix)
    }

    /// True when configuration changed since the last successful solve
    pub fn is_stale(&self) -> bool {
        self.dirty
    }

    // ========================
    // Analysis
    // ========================

    /// Run a static analysis under the current configuration.
    ///
    /// `load` is a force in N, or an intensity in N/m when `distributed`.
    /// Positive loads act downward on beams and along +x on bars.
    pub fn solve_static(&mut self, load: f64, distributed: bool) -> FemResult<&StaticSolution> {
        self.solve_static_with_cancel(load, distributed, &CancelToken::new())
    }

    /// As `solve_static`, checking `token` between phases
    pub fn solve_static_with_cancel(
        &mut self,
        load: f64,
        distributed: bool,
        token: &CancelToken,
    ) -> FemResult<&StaticSolution> {
        match self.compute(load, distributed, token) {
            Ok(computed) => {
                self.solved_with = Some(SolvedWith {
                    mesh: computed.mesh.clone(),
                    variant: self.variant,
                    sub_case: self.current_sub_case()?,
                    yield_strength: self.material.fy,
                });
                self.mesh = Some(computed.mesh);
                self.stiffness = Some(computed.stiffness);
                self.dirty = false;
                Ok(&*self.solution.insert(computed.solution))
            }
            Err(err) => {
                self.stiffness = None;
                self.solution = None;
                self.solved_with = None;
                self.dirty = true;
                Err(err)
            }
        }
    }

    fn compute(&self, load: f64, distributed: bool, token: &CancelToken) -> FemResult<Computed> {
        let start = Instant::now();
        let mut phase_start = start;
        let log_phase = |phase: Phase, since: &mut Instant| {
            if self.options.log {
                log::info!("{} took {:?}", phase, since.elapsed());
            }
            *since = Instant::now();
        };

        let kind = self.variant.element_kind();
        let sub_case = self.current_sub_case()?;

        if !load.is_finite() {
            return Err(FemError::InvalidInput(format!("load must be finite (got {})", load)));
        }
        if distributed && !self.variant.allows_distributed() {
            return Err(FemError::UnsupportedLoad(format!(
                "{} does not accept distributed loads",
                self.variant
            )));
        }

        token.checkpoint(Phase::Meshing)?;
        let element_count = self.element_count.ok_or(FemError::MeshNotBuilt)?;
        let mesh = Mesh::generate(self.length, element_count)?;
        log_phase(Phase::Meshing, &mut phase_start);

        token.checkpoint(Phase::Assembly)?;
        let stiffness = assemble(&mesh, kind, &self.material, &self.section)?;
        let (f, line_load) = self.load_vector(&mesh, sub_case, kind, load, distributed)?;
        log_phase(Phase::Assembly, &mut phase_start);

        token.checkpoint(Phase::Solve)?;
        let constraints = sub_case.constraints(&mesh, kind);
        log::debug!(
            "{} / {}: {} fixed DOFs {:?}",
            self.variant,
            sub_case.name,
            constraints.fixed().len(),
            constraints.fixed()
        );
        let displacements = solve(&stiffness, &f, &constraints, self.options.backend)?;
        log_phase(Phase::Solve, &mut phase_start);

        token.checkpoint(Phase::PostProcessing)?;
        let post = post_process(
            &mesh,
            kind,
            &displacements.u,
            &self.material,
            &self.section,
            &line_load,
            self.options.deformation_scale,
        );
        let nodal_forces = &stiffness.matrix * &displacements.u;
        let compliance = f.dot(&displacements.u);

        let solution = StaticSolution {
            kind,
            u: displacements.u,
            f,
            reactions: displacements.reactions,
            nodal_forces,
            compliance,
            free_dofs: displacements.free_dofs,
            post,
        };

        if self.options.check_statics {
            self.check_equilibrium(&solution, &stiffness)?;
        }
        log_phase(Phase::PostProcessing, &mut phase_start);

        log::info!(
            "solved {} ({}) with {} elements in {:?}",
            self.variant,
            sub_case.name,
            mesh.element_count(),
            start.elapsed()
        );

        Ok(Computed {
            mesh,
            stiffness,
            solution,
        })
    }

    /// Global load vector, plus the line load seen by each element
    fn load_vector(
        &self,
        mesh: &Mesh,
        sub_case: &SubCase,
        kind: ElementKind,
        load: f64,
        distributed: bool,
    ) -> FemResult<(FEVec, Load)> {
        // Beam loads act along -v, bar loads along +u
        let sign = match kind {
            ElementKind::Beam => -1.0,
            ElementKind::Bar => 1.0,
        };

        let mut line = DistributedLoad::uniform(0.0);
        let mut f = FEVec::zeros(mesh.dof_count(kind));

        if distributed {
            line = line.combined(&DistributedLoad::uniform(sign * load));
        } else {
            let point = Load::Point(NodeLoad::force(sub_case.load_node(mesh), sign * load));
            point.add_to(&mut f, mesh, kind)?;
        }

        if self.options.include_self_weight {
            let weight = self.material.rho * GRAVITY * self.section.area();
            line = line.combined(&DistributedLoad::uniform(sign * weight));
        }

        let line = Load::Distributed(line);
        line.add_to(&mut f, mesh, kind)?;
        Ok((f, line))
    }

    fn check_equilibrium(&self, solution: &StaticSolution, stiffness: &GlobalStiffness) -> FemResult<()> {
        let residual = solution.translational_resultant().abs();
        let applied: f64 = solution
            .f
            .iter()
            .skip(solution.kind.translation_dof())
            .step_by(solution.kind.dofs_per_node())
            .map(|v| v.abs())
            .sum();

        // Floor at the rounding error of forming K·U
        let rounding = stiffness.size() as f64
            * f64::EPSILON
            * stiffness.matrix.amax()
            * solution.u.amax();
        let tolerance = self.options.statics_tolerance * applied + rounding;

        if residual > tolerance {
            log::warn!(
                "equilibrium check failed: residual {:e} > {:e}",
                residual,
                tolerance
            );
            return Err(FemError::EquilibriumViolated {
                residual,
                tolerance,
            });
        }
        Ok(())
    }

    // ========================
    // Results
    // ========================

    /// Results of the last successful solve
    pub fn results(&self) -> FemResult<&StaticSolution> {
        self.solution.as_ref().ok_or(FemError::NotAnalyzed)
    }

    /// Solution together with the configuration it was computed with
    fn solved(&self) -> FemResult<(&StaticSolution, &SolvedWith)> {
        match (&self.solution, &self.solved_with) {
            (Some(solution), Some(solved_with)) => Ok((solution, solved_with)),
            _ => Err(FemError::NotAnalyzed),
        }
    }

    /// Per-node force and displacement on the translational DOF.
    ///
    /// Rows follow the mesh of the last successful solve, even if the model
    /// has been re-meshed since.
    pub fn nodal_table(&self) -> FemResult<Vec<NodalRow>> {
        let (solution, solved_with) = self.solved()?;
        let mesh = &solved_with.mesh;
        let d = solution.kind.dofs_per_node();
        let t = solution.kind.translation_dof();

        Ok(mesh
            .positions()
            .iter()
            .enumerate()
            .map(|(node, &x)| NodalRow {
                node: node + 1,
                x,
                force: solution.nodal_forces[node * d + t],
                displacement: solution.u[node * d + t],
            })
            .collect())
    }

    /// Get analysis summary of the last successful solve
    pub fn summary(&self) -> FemResult<AnalysisSummary> {
        let (solution, solved_with) = self.solved()?;
        let mesh = &solved_with.mesh;
        let d = solution.kind.dofs_per_node();

        let mut summary = AnalysisSummary {
            variant: solved_with.variant.name().to_string(),
            sub_case: solved_with.sub_case.name.to_string(),
            max_stress: solution.post.max_stress,
            max_stress_element: solution.post.max_stress_element,
            utilisation: solution.post.max_stress / solved_with.yield_strength,
            yield_exceeded: solution.post.yield_exceeded,
            num_nodes: mesh.node_count(),
            num_elements: mesh.element_count(),
            total_dofs: solution.u.len(),
            free_dofs: solution.free_dofs,
            ..Default::default()
        };

        for node in 0..mesh.node_count() {
            let disp = solution.u[node * d].abs();
            if disp > summary.max_displacement {
                summary.max_displacement = disp;
                summary.max_disp_node = node;
            }

            let reaction = solution.reactions[node * d].abs();
            if reaction > summary.max_reaction {
                summary.max_reaction = reaction;
                summary.max_reaction_node = node;
            }
        }

        Ok(summary)
    }
}
