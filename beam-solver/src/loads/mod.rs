//! Applied loads and the global load vector

mod distributed;
mod node_load;

use serde::{Deserialize, Serialize};

use crate::elements::ElementKind;
use crate::error::FemResult;
use crate::math::Vec as FEVec;
use crate::mesh::Mesh;

pub use distributed::DistributedLoad;
pub use node_load::NodeLoad;

/// A single load applied to the member
///
/// Magnitudes are signed along the positive DOF direction (+u for bars, +v for beams).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Load {
    /// Concentrated force or moment on one nodal DOF
    Point(NodeLoad),
    /// Uniform line load over the whole member
    Distributed(DistributedLoad),
}

impl Load {
    /// Build the full-length global load vector `F` for the mesh
    pub fn load_vector(&self, mesh: &Mesh, kind: ElementKind) -> FemResult<FEVec> {
        let mut f = FEVec::zeros(mesh.dof_count(kind));
        self.add_to(&mut f, mesh, kind)?;
        Ok(f)
    }

    /// Accumulate this load into an existing global load vector
    pub fn add_to(&self, f: &mut FEVec, mesh: &Mesh, kind: ElementKind) -> FemResult<()> {
        match self {
            Load::Point(load) => load.add_to(f, mesh, kind),
            Load::Distributed(load) => {
                load.add_to(f, mesh, kind);
                Ok(())
            }
        }
    }

    /// Uniform intensity carried by each element, zero for point loads
    pub fn line_intensity(&self) -> f64 {
        match self {
            Load::Point(_) => 0.0,
            Load::Distributed(load) => load.w,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_point_and_distributed_totals_agree() {
        let mesh = Mesh::generate(2.0, 8).unwrap();
        let point = Load::Point(NodeLoad::force(8, -300.0));
        let line = Load::Distributed(DistributedLoad::uniform(-150.0));

        let fp = point.load_vector(&mesh, ElementKind::Beam).unwrap();
        let fd = line.load_vector(&mesh, ElementKind::Beam).unwrap();

        let total = |f: &FEVec| f.iter().step_by(2).sum::<f64>();
        assert_relative_eq!(total(&fp), -300.0);
        assert_relative_eq!(total(&fd), -300.0, max_relative = 1e-12);
    }

    #[test]
    fn test_line_intensity() {
        assert_eq!(Load::Point(NodeLoad::force(0, 1.0)).line_intensity(), 0.0);
        assert_eq!(
            Load::Distributed(DistributedLoad::uniform(12.5)).line_intensity(),
            12.5
        );
    }
}
