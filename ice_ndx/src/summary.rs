use std::{fmt, path::Path};

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Table};

use crate::groups::{GroupKind, GroupSet};

/// Human-readable report of generated groups
pub struct Summary<'a> {
    set: &'a GroupSet,
    outfile: &'a Path,
}

impl<'a> Summary<'a> {
    pub fn new(set: &'a GroupSet, outfile: &'a Path) -> Self {
        Self { set, outfile }
    }

    /// One row per group: name, number of atoms, number of bonds
    pub fn table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec![
                Cell::new("Group").add_attribute(Attribute::Bold),
                Cell::new("Atoms").add_attribute(Attribute::Bold),
                Cell::new("Bonds").add_attribute(Attribute::Bold),
            ]);

        for gr in self.set.iter() {
            let bonds = match gr.kind() {
                GroupKind::Bonds => gr.num_bonds().to_string(),
                GroupKind::Atoms => "-".to_owned(),
            };
            table.add_row(vec![
                Cell::new(gr.name()),
                Cell::new(gr.len()).set_alignment(CellAlignment::Right),
                Cell::new(bonds).set_alignment(CellAlignment::Right),
            ]);
        }
        table
    }
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Generated {} for {} water molecules ({} atoms)",
            self.outfile.display(),
            self.set.n_molecules(),
            self.set.num_atoms()
        )?;
        write!(f, "{}", self.table())
    }
}
