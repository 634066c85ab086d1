//! Material properties

use serde::{Deserialize, Serialize};

use crate::error::{FemError, FemResult};

/// Material properties for structural analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Catalog identifier
    pub name: String,
    /// Modulus of elasticity (Young's modulus) in Pa
    pub e: f64,
    /// Yield strength in Pa
    pub fy: f64,
    /// Density in kg/m³
    pub rho: f64,
}

impl Material {
    /// Create a new material with given properties
    pub fn new(name: &str, e: f64, fy: f64, rho: f64) -> Self {
        Self {
            name: name.to_string(),
            e,
            fy,
            rho,
        }
    }

    /// Structural steel
    pub fn steel() -> Self {
        Self::new("Steel", 210e9, 250e6, 7850.0)
    }

    /// Aluminium alloy (6061-T6)
    pub fn aluminum() -> Self {
        Self::new("Aluminium 6061-T6", 68.9e9, 276e6, 2700.0)
    }

    /// Titanium alloy (Ti-6Al-4V)
    pub fn titanium() -> Self {
        Self::new("Titanium Ti-6Al-4V", 113.8e9, 880e6, 4430.0)
    }

    /// Softwood timber, loaded parallel to the grain
    pub fn timber() -> Self {
        Self::new("Timber C24", 11e9, 24e6, 420.0)
    }

    /// Check the properties the stiffness and yield computations rely on
    pub fn validate(&self) -> FemResult<()> {
        let invalid = |reason: &str| FemError::InvalidMaterial {
            material: self.name.clone(),
            reason: reason.to_string(),
        };

        if !(self.e.is_finite() && self.e > 0.0) {
            return Err(invalid("Young's modulus must be positive and finite"));
        }
        if !(self.fy.is_finite() && self.fy > 0.0) {
            return Err(invalid("yield strength must be positive and finite"));
        }
        if !(self.rho.is_finite() && self.rho >= 0.0) {
            return Err(invalid("density must be non-negative and finite"));
        }
        Ok(())
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::steel()
    }
}
