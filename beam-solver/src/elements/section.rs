//! Section properties for bar and beam elements

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{FemError, FemResult};

/// Geometry kind of a cross-section.
///
/// Bending is about the horizontal axis; `h` is always the vertical extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionShape {
    /// Solid rectangle `b` wide and `h` tall
    Rectangular,
    /// Rectangular hollow section with wall thickness `e`
    HollowRectangular,
    /// Solid circle of diameter `h`
    Circular,
    /// Circular tube of outer diameter `h` and wall thickness `e`
    Tube,
    /// Doubly symmetric I-beam: depth `h`, flange width `b`, flange and web thickness `e`
    IBeam,
}

impl SectionShape {
    /// Whether the thickness dimension `e` applies to this shape
    pub fn has_thickness(&self) -> bool {
        matches!(
            self,
            SectionShape::HollowRectangular | SectionShape::Tube | SectionShape::IBeam
        )
    }

    /// Whether the width dimension `b` applies to this shape
    pub fn has_width(&self) -> bool {
        !matches!(self, SectionShape::Circular | SectionShape::Tube)
    }
}

/// Editable dimensions of a section, as stored in a catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SectionData {
    name: String,
    shape: SectionShape,
    h: f64,
    b: f64,
    #[serde(default)]
    e: f64,
}

/// Cross-section of a bar or beam.
///
/// The area and second moment of area are derived from the dimensions and are
/// recomputed on every edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SectionData", into = "SectionData")]
pub struct Section {
    name: String,
    shape: SectionShape,
    h: f64,
    b: f64,
    e: f64,
    area: f64,
    inertia: f64,
}

impl Section {
    /// Create a section from its shape and dimensions (m)
    pub fn new(name: &str, shape: SectionShape, h: f64, b: f64, e: f64) -> Self {
        let mut section = Self {
            name: name.to_string(),
            shape,
            h,
            b,
            e,
            area: 0.0,
            inertia: 0.0,
        };
        section.recompute();
        section
    }

    /// Create a solid rectangular section
    pub fn rectangular(name: &str, h: f64, b: f64) -> Self {
        Self::new(name, SectionShape::Rectangular, h, b, 0.0)
    }

    /// Create a rectangular hollow section
    pub fn hollow_rectangular(name: &str, h: f64, b: f64, e: f64) -> Self {
        Self::new(name, SectionShape::HollowRectangular, h, b, e)
    }

    /// Create a solid circular section
    pub fn circular(name: &str, diameter: f64) -> Self {
        Self::new(name, SectionShape::Circular, diameter, diameter, 0.0)
    }

    /// Create a circular hollow (pipe) section
    pub fn tube(name: &str, outer_diameter: f64, wall_thickness: f64) -> Self {
        Self::new(name, SectionShape::Tube, outer_diameter, outer_diameter, wall_thickness)
    }

    /// Create an I-beam with equal flange and web thickness
    pub fn i_beam(name: &str, depth: f64, flange_width: f64, thickness: f64) -> Self {
        Self::new(name, SectionShape::IBeam, depth, flange_width, thickness)
    }

    /// Update the dimensions and recompute the derived properties
    pub fn set_dimensions(&mut self, h: f64, b: f64, e: f64) {
        self.h = h;
        self.b = b;
        self.e = e;
        self.recompute();
    }

    fn recompute(&mut self) {
        let (h, b, e) = (self.h, self.b, self.e);

        let (area, inertia) = match self.shape {
            SectionShape::Rectangular => (b * h, b * h.powi(3) / 12.0),
            SectionShape::HollowRectangular => {
                let bi = b - 2.0 * e;
                let hi = h - 2.0 * e;
                (b * h - bi * hi, (b * h.powi(3) - bi * hi.powi(3)) / 12.0)
            }
            SectionShape::Circular => (PI * h.powi(2) / 4.0, PI * h.powi(4) / 64.0),
            SectionShape::Tube => {
                let di = h - 2.0 * e;
                (
                    PI * (h.powi(2) - di.powi(2)) / 4.0,
                    PI * (h.powi(4) - di.powi(4)) / 64.0,
                )
            }
            SectionShape::IBeam => {
                let hw = h - 2.0 * e;
                (
                    2.0 * b * e + hw * e,
                    (b * h.powi(3) - (b - e) * hw.powi(3)) / 12.0,
                )
            }
        };

        self.area = area;
        self.inertia = inertia;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> SectionShape {
        self.shape
    }

    /// Height (or outer diameter) in m
    pub fn h(&self) -> f64 {
        self.h
    }

    /// Width in m
    pub fn b(&self) -> f64 {
        self.b
    }

    /// Wall thickness in m (meaningless unless `has_thickness`)
    pub fn e(&self) -> f64 {
        self.e
    }

    pub fn has_thickness(&self) -> bool {
        self.shape.has_thickness()
    }

    /// Cross-sectional area in m²
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Second moment of area about the bending axis in m⁴
    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    /// Distance from the neutral axis to the extreme fibre in m
    pub fn extreme_fibre(&self) -> f64 {
        self.h / 2.0
    }

    /// Check that the section may enter assembly
    pub fn validate(&self) -> FemResult<()> {
        let degenerate = |reason: String| FemError::DegenerateSection {
            section: self.name.clone(),
            reason,
        };

        if !(self.h.is_finite() && self.h > 0.0) {
            return Err(degenerate(format!("height must be positive (got {})", self.h)));
        }
        if self.shape.has_width() && !(self.b.is_finite() && self.b > 0.0) {
            return Err(degenerate(format!("width must be positive (got {})", self.b)));
        }

        if self.shape.has_thickness() {
            if !(self.e.is_finite() && self.e > 0.0) {
                return Err(degenerate(format!(
                    "thickness must be positive (got {})",
                    self.e
                )));
            }
            let limit = match self.shape {
                SectionShape::HollowRectangular => self.h.min(self.b),
                _ => self.h,
            };
            if 2.0 * self.e >= limit {
                return Err(degenerate(format!(
                    "thickness {} leaves no hollow core or web (limit {})",
                    self.e,
                    limit / 2.0
                )));
            }
            if self.shape == SectionShape::IBeam && self.e >= self.b {
                return Err(degenerate(format!(
                    "web thickness {} must be smaller than flange width {}",
                    self.e, self.b
                )));
            }
        }

        if !(self.area.is_finite() && self.area > 0.0) {
            return Err(degenerate(format!("area must be positive (got {})", self.area)));
        }
        if !(self.inertia.is_finite() && self.inertia > 0.0) {
            return Err(degenerate(format!(
                "second moment of area must be positive (got {})",
                self.inertia
            )));
        }
        Ok(())
    }
}

impl From<SectionData> for Section {
    fn from(data: SectionData) -> Self {
        Section::new(&data.name, data.shape, data.h, data.b, data.e)
    }
}

impl From<Section> for SectionData {
    fn from(section: Section) -> Self {
        SectionData {
            name: section.name,
            shape: section.shape,
            h: section.h,
            b: section.b,
            e: section.e,
        }
    }
}

impl Default for Section {
    fn default() -> Self {
        // 100mm x 50mm solid rectangle
        Self::rectangular("Rectangle 100x50", 0.1, 0.05)
    }
}
