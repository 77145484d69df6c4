use itertools::Itertools;
use log::debug;

use crate::layout::MoleculeLayout;

/// What the indices of a group stand for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// Plain list of atoms
    Atoms,
    /// Flattened list of bonded pairs
    Bonds,
}

/// Named group of 1-based atom indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexGroup {
    name: String,
    kind: GroupKind,
    indices: Vec<usize>,
}

impl IndexGroup {
    pub fn new(name: impl Into<String>, kind: GroupKind, indices: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            kind,
            indices,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of bonds in a bond group, zero for atom groups
    pub fn num_bonds(&self) -> usize {
        match self.kind {
            GroupKind::Bonds => self.indices.len() / 2,
            GroupKind::Atoms => 0,
        }
    }

    /// Iterates over consecutive (a,b) pairs.
    /// Only meaningful for bond groups.
    pub fn iter_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.indices.iter().copied().tuples()
    }
}

/// All index groups generated for a box of water molecules
#[derive(Debug, Clone)]
pub struct GroupSet {
    n_molecules: usize,
    layout: MoleculeLayout,
    groups: Vec<IndexGroup>,
}

impl GroupSet {
    /// Computes index groups for `n_molecules` molecules.
    ///
    /// Layouts with a virtual site get the 4-site group set
    /// (`System`, `Oxygens`, `H1_atoms`, `H2_atoms`, `All_Hydrogens`,
    /// `Virtual_Sites`, `OH1_bonds`, `OH2_bonds`, `All_OH_bonds`),
    /// others get the 3-site one (`System`, `Oxygens`, `Hydrogens`, `OH_bonds`).
    pub fn generate(layout: &MoleculeLayout, n_molecules: usize) -> Self {
        use GroupKind::*;
        let l = layout;
        let mols = || 0..n_molecules;

        let system: Vec<usize> = (1..=l.num_atoms(n_molecules)).collect();
        let oxygens: Vec<usize> = mols().map(|m| l.oxygen(m)).collect();
        let hydrogens: Vec<usize> = mols().flat_map(|m| [l.h1(m), l.h2(m)]).collect();
        let oh_bonds: Vec<usize> = mols()
            .flat_map(|m| [l.oxygen(m), l.h1(m), l.oxygen(m), l.h2(m)])
            .collect();

        let groups = if l.has_virtual_site() {
            vec![
                IndexGroup::new("System", Atoms, system),
                IndexGroup::new("Oxygens", Atoms, oxygens),
                IndexGroup::new("H1_atoms", Atoms, mols().map(|m| l.h1(m)).collect()),
                IndexGroup::new("H2_atoms", Atoms, mols().map(|m| l.h2(m)).collect()),
                IndexGroup::new("All_Hydrogens", Atoms, hydrogens),
                IndexGroup::new(
                    "Virtual_Sites",
                    Atoms,
                    mols().filter_map(|m| l.virtual_site(m)).collect(),
                ),
                IndexGroup::new(
                    "OH1_bonds",
                    Bonds,
                    mols().flat_map(|m| [l.oxygen(m), l.h1(m)]).collect(),
                ),
                IndexGroup::new(
                    "OH2_bonds",
                    Bonds,
                    mols().flat_map(|m| [l.oxygen(m), l.h2(m)]).collect(),
                ),
                IndexGroup::new("All_OH_bonds", Bonds, oh_bonds),
            ]
        } else {
            vec![
                IndexGroup::new("System", Atoms, system),
                IndexGroup::new("Oxygens", Atoms, oxygens),
                IndexGroup::new("Hydrogens", Atoms, hydrogens),
                IndexGroup::new("OH_bonds", Bonds, oh_bonds),
            ]
        };

        for gr in &groups {
            debug!("group {}: {} indices", gr.name(), gr.len());
        }

        Self {
            n_molecules,
            layout: layout.clone(),
            groups,
        }
    }

    pub fn n_molecules(&self) -> usize {
        self.n_molecules
    }

    pub fn layout(&self) -> &MoleculeLayout {
        &self.layout
    }

    pub fn num_atoms(&self) -> usize {
        self.layout.num_atoms(self.n_molecules)
    }

    pub fn groups(&self) -> &[IndexGroup] {
        &self.groups
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexGroup> {
        self.groups.iter()
    }

    /// Get a group by name
    pub fn get(&self, name: impl AsRef<str>) -> Option<&IndexGroup> {
        self.groups.iter().find(|g| g.name() == name.as_ref())
    }
}

//############################################################
//#  Tests
//############################################################

#[cfg(test)]
mod tests {
    use super::*;

    fn indices<'a>(set: &'a GroupSet, name: &str) -> &'a [usize] {
        set.get(name).unwrap().indices()
    }

    #[test]
    fn tip4p_single_molecule() {
        let set = GroupSet::generate(&MoleculeLayout::tip4p_ice(), 1);
        assert_eq!(indices(&set, "System"), [1, 2, 3, 4]);
        assert_eq!(indices(&set, "Oxygens"), [1]);
        assert_eq!(indices(&set, "H1_atoms"), [2]);
        assert_eq!(indices(&set, "H2_atoms"), [3]);
        assert_eq!(indices(&set, "All_Hydrogens"), [2, 3]);
        assert_eq!(indices(&set, "Virtual_Sites"), [4]);
        assert_eq!(indices(&set, "OH1_bonds"), [1, 2]);
        assert_eq!(indices(&set, "OH2_bonds"), [1, 3]);
        assert_eq!(indices(&set, "All_OH_bonds"), [1, 2, 1, 3]);
    }

    #[test]
    fn spc_two_molecules() {
        let set = GroupSet::generate(&MoleculeLayout::spc(), 2);
        let names: Vec<_> = set.iter().map(|g| g.name()).collect();
        assert_eq!(names, ["System", "Oxygens", "Hydrogens", "OH_bonds"]);
        assert_eq!(indices(&set, "System"), [1, 2, 3, 4, 5, 6]);
        assert_eq!(indices(&set, "Oxygens"), [1, 4]);
        assert_eq!(indices(&set, "Hydrogens"), [2, 3, 5, 6]);
        assert_eq!(indices(&set, "OH_bonds"), [1, 2, 1, 3, 4, 5, 4, 6]);
    }

    #[test]
    fn tip4p_group_order() {
        let set = GroupSet::generate(&MoleculeLayout::tip4p_ice(), 3);
        let names: Vec<_> = set.iter().map(|g| g.name()).collect();
        assert_eq!(
            names,
            [
                "System",
                "Oxygens",
                "H1_atoms",
                "H2_atoms",
                "All_Hydrogens",
                "Virtual_Sites",
                "OH1_bonds",
                "OH2_bonds",
                "All_OH_bonds"
            ]
        );
    }

    #[test]
    fn system_covers_all_atoms() {
        for n in [1, 2, 7, 432] {
            let set = GroupSet::generate(&MoleculeLayout::tip4p_ice(), n);
            let sys = indices(&set, "System");
            assert_eq!(sys.len(), 4 * n);
            assert!(sys.iter().copied().eq(1..=4 * n));
            assert_eq!(sys.iter().unique().count(), 4 * n);
        }
    }

    #[test]
    fn oxygens_are_ordered() {
        for n in [1, 5, 432] {
            let set = GroupSet::generate(&MoleculeLayout::tip4p_ice(), n);
            let ox = indices(&set, "Oxygens");
            assert_eq!(ox.len(), n);
            assert!(ox.iter().all(|i| i % 4 == 1));
            assert!(ox.iter().tuple_windows().all(|(a, b)| a < b));
        }
    }

    #[test]
    fn bonds_stay_within_molecule() {
        let n = 100;
        let layout = MoleculeLayout::tip4p_ice();
        let set = GroupSet::generate(&layout, n);
        let bonds = set.get("All_OH_bonds").unwrap();
        assert_eq!(bonds.len(), 4 * n);
        assert_eq!(bonds.num_bonds(), 2 * n);

        let pairs: Vec<_> = bonds.iter_pairs().collect();
        assert_eq!(pairs.len(), 2 * n);
        for (m, mol_pairs) in pairs.chunks(2).enumerate() {
            // Both bonds of a molecule start from its own oxygen
            assert_eq!(mol_pairs[0].0, layout.oxygen(m));
            assert_eq!(mol_pairs[1].0, layout.oxygen(m));
            assert_eq!(mol_pairs[0].1, layout.h1(m));
            assert_eq!(mol_pairs[1].1, layout.h2(m));
        }
    }

    #[test]
    fn group_sizes_are_multiples() {
        let n = 13;
        let set = GroupSet::generate(&MoleculeLayout::tip4p_ice(), n);
        for gr in set.iter() {
            assert_eq!(gr.len() % n, 0, "group {}", gr.name());
        }
        assert_eq!(set.get("OH1_bonds").unwrap().num_bonds(), n);
        assert_eq!(set.get("Oxygens").unwrap().num_bonds(), 0);
    }

    #[test]
    fn custom_layout_virtual_site_first() -> anyhow::Result<()> {
        let layout = MoleculeLayout::new(4, 1, 3, 4, Some(2))?;
        let set = GroupSet::generate(&layout, 2);
        assert_eq!(indices(&set, "Virtual_Sites"), [2, 6]);
        assert_eq!(indices(&set, "All_Hydrogens"), [3, 4, 7, 8]);
        assert_eq!(indices(&set, "All_OH_bonds"), [1, 3, 1, 4, 5, 7, 5, 8]);
        Ok(())
    }

    #[test]
    fn zero_molecules() {
        let set = GroupSet::generate(&MoleculeLayout::spc(), 0);
        assert_eq!(set.groups().len(), 4);
        assert!(set.iter().all(|g| g.is_empty()));
        assert_eq!(set.num_atoms(), 0);
    }
}
