use std::{
    fmt,
    path::{Path, PathBuf},
};

use clap::ValueEnum;
use itertools::Itertools;
use serde::Deserialize;
use thiserror::Error;

/// Role of an atom inside a single water molecule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Oxygen,
    H1,
    H2,
    VirtualSite,
}

/// Errors related to construction of molecule layouts
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("molecule stride can't be zero")]
    ZeroStride,

    #[error("offset {1} of {0:?} is beyond the allowed range 1:{2}")]
    OffsetOutOfRange(Role, usize, usize),

    #[error("{0:?} and {1:?} share the same offset {2}")]
    DuplicateOffset(Role, Role, usize),

    #[error("error reading layout file {0}")]
    LayoutIo(PathBuf, #[source] std::io::Error),

    #[error("malformed layout file")]
    Toml(#[from] toml::de::Error),
}

/// Layout of atoms in a water molecule.
///
/// Atom ids are 1-based and computed as `mol * stride + offset`
/// for a 0-based molecule index `mol`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoleculeLayout {
    stride: usize,
    oxygen: usize,
    h1: usize,
    h2: usize,
    virtual_site: Option<usize>,
}

/// On-disk description of a custom layout
#[derive(Debug, Clone, Deserialize)]
struct LayoutDescr {
    stride: usize,
    oxygen: usize,
    h1: usize,
    h2: usize,
    #[serde(default)]
    virtual_site: Option<usize>,
}

impl MoleculeLayout {
    /// Creates a validated layout. All offsets must lie in `1..=stride`
    /// and must not coincide.
    pub fn new(
        stride: usize,
        oxygen: usize,
        h1: usize,
        h2: usize,
        virtual_site: Option<usize>,
    ) -> Result<Self, LayoutError> {
        if stride == 0 {
            return Err(LayoutError::ZeroStride);
        }

        let layout = Self {
            stride,
            oxygen,
            h1,
            h2,
            virtual_site,
        };

        let roles: Vec<_> = layout.iter_roles().collect();

        for &(role, off) in &roles {
            if off == 0 || off > stride {
                return Err(LayoutError::OffsetOutOfRange(role, off, stride));
            }
        }

        for (&(r1, o1), &(r2, o2)) in roles.iter().tuple_combinations() {
            if o1 == o2 {
                return Err(LayoutError::DuplicateOffset(r1, r2, o1));
            }
        }

        Ok(layout)
    }

    /// TIP4P/Ice: OW, HW1, HW2, MW
    pub fn tip4p_ice() -> Self {
        Self {
            stride: 4,
            oxygen: 1,
            h1: 2,
            h2: 3,
            virtual_site: Some(4),
        }
    }

    /// 3-site SPC-type water: OW, HW1, HW2
    pub fn spc() -> Self {
        Self {
            stride: 3,
            oxygen: 1,
            h1: 2,
            h2: 3,
            virtual_site: None,
        }
    }

    /// Parses a layout from its TOML description
    pub fn from_toml(s: &str) -> Result<Self, LayoutError> {
        let d: LayoutDescr = toml::from_str(s)?;
        Self::new(d.stride, d.oxygen, d.h1, d.h2, d.virtual_site)
    }

    /// Reads a layout from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .map_err(|e| LayoutError::LayoutIo(path.to_owned(), e))?;
        Self::from_toml(&s)
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn has_virtual_site(&self) -> bool {
        self.virtual_site.is_some()
    }

    /// Offset of the given role or `None` if the layout has no such atom
    pub fn offset(&self, role: Role) -> Option<usize> {
        match role {
            Role::Oxygen => Some(self.oxygen),
            Role::H1 => Some(self.h1),
            Role::H2 => Some(self.h2),
            Role::VirtualSite => self.virtual_site,
        }
    }

    /// Iterates over roles present in this layout together with their offsets
    pub fn iter_roles(&self) -> impl Iterator<Item = (Role, usize)> + '_ {
        [Role::Oxygen, Role::H1, Role::H2, Role::VirtualSite]
            .into_iter()
            .filter_map(|r| self.offset(r).map(|off| (r, off)))
    }

    pub fn atom_id(&self, mol: usize, role: Role) -> Option<usize> {
        self.offset(role).map(|off| mol * self.stride + off)
    }

    pub fn oxygen(&self, mol: usize) -> usize {
        mol * self.stride + self.oxygen
    }

    pub fn h1(&self, mol: usize) -> usize {
        mol * self.stride + self.h1
    }

    pub fn h2(&self, mol: usize) -> usize {
        mol * self.stride + self.h2
    }

    pub fn virtual_site(&self, mol: usize) -> Option<usize> {
        self.atom_id(mol, Role::VirtualSite)
    }

    /// Total number of atoms in `n_molecules` molecules
    pub fn num_atoms(&self, n_molecules: usize) -> usize {
        n_molecules * self.stride
    }
}

/// Predefined water models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum WaterModel {
    /// 4-site TIP4P/Ice with a virtual site
    #[default]
    #[value(name = "tip4p-ice")]
    Tip4pIce,
    /// 3-site SPC-type water
    #[value(name = "spc")]
    Spc,
}

impl WaterModel {
    pub fn layout(&self) -> MoleculeLayout {
        match self {
            Self::Tip4pIce => MoleculeLayout::tip4p_ice(),
            Self::Spc => MoleculeLayout::spc(),
        }
    }

    /// Number of molecules in the reference ice box of this model
    pub fn default_molecules(&self) -> usize {
        match self {
            Self::Tip4pIce => 432,
            Self::Spc => 632,
        }
    }
}

impl fmt::Display for WaterModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tip4pIce => write!(f, "TIP4P/Ice"),
            Self::Spc => write!(f, "SPC"),
        }
    }
}

//############################################################
//#  Tests
//############################################################
