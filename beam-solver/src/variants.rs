//! Registry of boundary-condition variants
//!
//! Every variant is a member of a closed enum. Each carries its element kind,
//! whether it accepts a distributed load, and an ordered list of sub-cases
//! that place supports and the point load along the member.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::elements::{ElementKind, Support};
use crate::error::{FemError, FemResult};
use crate::mesh::Mesh;
use crate::solver::Constraints;

/// Position along the member, resolved to a node once a mesh exists
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    Start,
    Middle,
    End,
    /// Fraction of the length in [0, 1]
    Fraction(f64),
}

impl Anchor {
    pub fn fraction(&self) -> f64 {
        match self {
            Anchor::Start => 0.0,
            Anchor::Middle => 0.5,
            Anchor::End => 1.0,
            Anchor::Fraction(t) => *t,
        }
    }

    /// Node index `round(t * N)` for this anchor
    pub fn node(&self, mesh: &Mesh) -> usize {
        mesh.node_at_fraction(self.fraction())
    }
}

/// One support arrangement of a variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubCase {
    pub name: &'static str,
    pub supports: &'static [(Anchor, Support)],
    /// Where the point load acts
    pub load_at: Anchor,
}

impl SubCase {
    /// Fixed DOFs of this sub-case on the given mesh
    pub fn constraints(&self, mesh: &Mesh, kind: ElementKind) -> Constraints {
        let placed: Vec<(usize, Support)> = self
            .supports
            .iter()
            .map(|(anchor, support)| (anchor.node(mesh), *support))
            .collect();
        Constraints::from_supports(mesh, kind, &placed)
    }

    /// Node receiving the point load
    pub fn load_node(&self, mesh: &Mesh) -> usize {
        self.load_at.node(mesh)
    }
}

const CANTILEVER_CASES: &[SubCase] = &[
    SubCase {
        name: "Clamped at start, load at free end",
        supports: &[(Anchor::Start, Support::fixed())],
        load_at: Anchor::End,
    },
    SubCase {
        name: "Clamped at end, load at free start",
        supports: &[(Anchor::End, Support::fixed())],
        load_at: Anchor::Start,
    },
];

const SIMPLY_SUPPORTED_CASES: &[SubCase] = &[
    SubCase {
        name: "Pinned at both ends, load at mid-span",
        supports: &[
            (Anchor::Start, Support::pinned()),
            (Anchor::End, Support::pinned()),
        ],
        load_at: Anchor::Middle,
    },
    SubCase {
        name: "Overhanging, supports at start and mid-span, load at end",
        supports: &[
            (Anchor::Start, Support::pinned()),
            (Anchor::Middle, Support::pinned()),
        ],
        load_at: Anchor::End,
    },
];

const FIXED_FIXED_CASES: &[SubCase] = &[
    SubCase {
        name: "Clamped at both ends, load at mid-span",
        supports: &[
            (Anchor::Start, Support::fixed()),
            (Anchor::End, Support::fixed()),
        ],
        load_at: Anchor::Middle,
    },
    SubCase {
        name: "Clamped at start, guided at end, load at end",
        supports: &[
            (Anchor::Start, Support::fixed()),
            (Anchor::End, Support::guided()),
        ],
        load_at: Anchor::End,
    },
];

const PROPPED_CANTILEVER_CASES: &[SubCase] = &[
    SubCase {
        name: "Clamped at start, pinned at end, load at mid-span",
        supports: &[
            (Anchor::Start, Support::fixed()),
            (Anchor::End, Support::pinned()),
        ],
        load_at: Anchor::Middle,
    },
    SubCase {
        name: "Pinned at start, clamped at end, load at mid-span",
        supports: &[
            (Anchor::Start, Support::pinned()),
            (Anchor::End, Support::fixed()),
        ],
        load_at: Anchor::Middle,
    },
];

const AXIAL_BAR_CASES: &[SubCase] = &[
    SubCase {
        name: "Fixed at start, load at end",
        supports: &[(Anchor::Start, Support::fixed())],
        load_at: Anchor::End,
    },
    SubCase {
        name: "Fixed at both ends, load at mid-span",
        supports: &[
            (Anchor::Start, Support::fixed()),
            (Anchor::End, Support::fixed()),
        ],
        load_at: Anchor::Middle,
    },
];

/// Boundary-condition variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    Cantilever,
    SimplySupported,
    FixedFixed,
    ProppedCantilever,
    AxialBar,
}

impl Variant {
    /// All variants in registry order
    pub const ALL: [Variant; 5] = [
        Variant::Cantilever,
        Variant::SimplySupported,
        Variant::FixedFixed,
        Variant::ProppedCantilever,
        Variant::AxialBar,
    ];

    /// Display name
    pub const fn name(&self) -> &'static str {
        match self {
            Variant::Cantilever => "Cantilever",
            Variant::SimplySupported => "Simply supported",
            Variant::FixedFixed => "Fixed-fixed",
            Variant::ProppedCantilever => "Propped cantilever",
            Variant::AxialBar => "Axial bar",
        }
    }

    pub const fn element_kind(&self) -> ElementKind {
        match self {
            Variant::AxialBar => ElementKind::Bar,
            _ => ElementKind::Beam,
        }
    }

    /// Whether a uniform distributed load may be applied
    pub const fn allows_distributed(&self) -> bool {
        !matches!(self, Variant::AxialBar)
    }

    /// Unit label of the load magnitude
    pub const fn load_unit(&self, distributed: bool) -> &'static str {
        if distributed && self.allows_distributed() {
            "N/m"
        } else {
            "N"
        }
    }

    pub const fn sub_cases(&self) -> &'static [SubCase] {
        match self {
            Variant::Cantilever => CANTILEVER_CASES,
            Variant::SimplySupported => SIMPLY_SUPPORTED_CASES,
            Variant::FixedFixed => FIXED_FIXED_CASES,
            Variant::ProppedCantilever => PROPPED_CANTILEVER_CASES,
            Variant::AxialBar => AXIAL_BAR_CASES,
        }
    }

    /// Sub-case by index
    pub fn sub_case(&self, index: usize) -> FemResult<&'static SubCase> {
        let cases = self.sub_cases();
        cases.get(index).ok_or(FemError::SubCaseOutOfRange {
            index,
            count: cases.len(),
        })
    }

    /// Variant by registry index
    pub fn from_index(index: usize) -> FemResult<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(FemError::VariantOutOfRange {
                index,
                count: Self::ALL.len(),
            })
    }

    /// Variant by display name, ignoring case
    pub fn from_name(name: &str) -> FemResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| FemError::UnknownVariant(name.to_string()))
    }

    /// Position in `Variant::ALL`
    pub fn index(&self) -> usize {
        match self {
            Variant::Cantilever => 0,
            Variant::SimplySupported => 1,
            Variant::FixedFixed => 2,
            Variant::ProppedCantilever => 3,
            Variant::AxialBar => 4,
        }
    }
}

impl Default for Variant {
    fn default() -> Self {
        Variant::Cantilever
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
