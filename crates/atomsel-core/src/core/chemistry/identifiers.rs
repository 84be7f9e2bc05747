use crate::core::models::atom::ResidueNamed;
use phf::{Set, phf_set};

static WATER_RESIDUE_NAMES: Set<&'static str> = phf_set! {
    "HOH", "OH2", "SOL", "WAT", "H2O", "DOD",
    "TIP", "TIP3", "TIP3P", "TIP4", "TIP4P", "TIP5", "TIP5P", "TIP7P",
    "T3P", "T4P", "T5P", "SPC", "SPCE",
};

static BACKBONE_ATOM_NAMES: Set<&'static str> = phf_set! {
    "N", "CA", "C", "O",
};

static MAIN_CHAIN_ATOM_NAMES: Set<&'static str> = phf_set! {
    "N", "H", "HN", "CA", "HA", "C", "O", "OXT", "H1", "H2", "H3", "NT",
    "HT1", "HT2", "HT3", "OT1", "OT2", "HC", "HOXT", "HA1", "HA2", "HA3", "1HA", "2HA",
};

/// Whether the residue name is one of the known water names.
///
/// This is an exact, case-sensitive membership test on a fixed name list and is
/// independent of the residue chemistry table.
pub fn is_water_residue(residue_name: &str) -> bool {
    WATER_RESIDUE_NAMES.contains(residue_name.trim())
}

pub fn is_water(item: &impl ResidueNamed) -> bool {
    is_water_residue(item.residue_name())
}

/// Whether the atom name is a protein main-chain heavy atom (N, CA, C, O).
pub fn is_backbone_atom(atom_name: &str) -> bool {
    BACKBONE_ATOM_NAMES.contains(atom_name.trim())
}

/// Whether the atom name belongs to the protein main chain, including its
/// hydrogens and terminal variants.
pub fn is_main_chain_atom(atom_name: &str) -> bool {
    MAIN_CHAIN_ATOM_NAMES.contains(atom_name.trim())
}

pub fn is_hydrogen_name(atom_name: &str) -> bool {
    let first_char = atom_name
        .trim()
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase());
    matches!(first_char, Some('H') | Some('D'))
}
