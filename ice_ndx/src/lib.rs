//! Generation of Gromacs index files for ice water boxes.
//!
//! Atom groups and O-H bond lists are computed from a fixed molecule
//! layout (TIP4P/Ice, SPC or a custom one) and written as `.ndx` files.

use std::path::Path;

use log::warn;
use thiserror::Error;

pub mod groups;
pub mod layout;
pub mod ndx_file;
pub mod summary;

pub mod prelude {
    pub use crate::groups::*;
    pub use crate::layout::*;
    pub use crate::ndx_file::*;
    pub use crate::summary::*;
    pub use crate::{generate, parse_molecule_count, IndexError, DEFAULT_OUTPUT};
}

use groups::GroupSet;
use layout::{LayoutError, MoleculeLayout};
use ndx_file::{NdxError, NdxFile};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the generated index file
pub const DEFAULT_OUTPUT: &str = "ice_bonds.ndx";

/// Top-level error of index generation
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("invalid number of molecules: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Ndx(#[from] NdxError),
}

/// Parses the number of molecules given on the command line.
///
/// Zero and negative counts are accepted and give empty groups.
pub fn parse_molecule_count(arg: &str) -> Result<usize, IndexError> {
    let n: i64 = arg
        .trim()
        .parse()
        .map_err(|_| IndexError::InvalidArgument(arg.to_owned()))?;
    if n <= 0 {
        warn!("Number of molecules is {n}, all groups will be empty");
    }
    usize::try_from(n.max(0)).map_err(|_| IndexError::InvalidArgument(arg.to_owned()))
}

/// Computes all index groups for `n_molecules` and writes them to `path`
pub fn generate(
    layout: &MoleculeLayout,
    n_molecules: usize,
    path: impl AsRef<Path>,
) -> Result<GroupSet, IndexError> {
    let set = GroupSet::generate(layout, n_molecules);
    NdxFile::from(&set).save(path)?;
    Ok(set)
}

pub fn greeting(tool: &str) {
    use comfy_table::modifiers::UTF8_ROUND_CORNERS;
    use comfy_table::presets::UTF8_FULL;
    use comfy_table::{Attribute, Cell, Table};

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .add_row(vec![
            Cell::new("IceNdx - Gromacs index files for ice").add_attributes(vec![Attribute::Bold])
        ])
        .add_row(vec![format!(
            "{}\n{}",
            env!("CARGO_PKG_HOMEPAGE"),
            env!("CARGO_PKG_AUTHORS")
        )])
        .add_row(vec![format!("IceNdx version: {VERSION}")])
        .add_row(vec![format!("Tool: {tool}")]);
    println!("{table}");
}

//############################################################
//#  Tests
//############################################################

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use anyhow::Result;

    #[test]
    fn molecule_count() -> Result<()> {
        assert_eq!(parse_molecule_count("432")?, 432);
        assert_eq!(parse_molecule_count(" 12\n")?, 12);
        assert_eq!(parse_molecule_count("+5")?, 5);
        assert_eq!(parse_molecule_count("0")?, 0);
        assert_eq!(parse_molecule_count("-3")?, 0);
        Ok(())
    }

    #[test]
    fn invalid_molecule_count() {
        for arg in ["abc", "", "1.5", "12abc", "99999999999999999999999"] {
            assert!(
                matches!(parse_molecule_count(arg), Err(IndexError::InvalidArgument(a)) if a == arg),
                "{arg:?} accepted"
            );
        }
    }

    #[test]
    fn generate_writes_file() -> Result<()> {
        let path = std::env::temp_dir().join(format!("ice_ndx_gen_{}.ndx", std::process::id()));
        let set = generate(&MoleculeLayout::tip4p_ice(), 1, &path)?;
        let ndx = NdxFile::read(&path)?;
        std::fs::remove_file(&path)?;

        assert_eq!(set.n_molecules(), 1);
        assert_eq!(ndx.get_group("System")?, [1, 2, 3, 4]);
        assert_eq!(ndx.get_group("All_OH_bonds")?, [1, 2, 1, 3]);
        Ok(())
    }

    #[test]
    fn generate_into_missing_dir() {
        let r = generate(
            &MoleculeLayout::spc(),
            2,
            "/nonexisting/dir/ice_bonds.ndx",
        );
        assert!(matches!(r, Err(IndexError::Ndx(NdxError::NdxWrite(..)))));
    }
}
