use crate::core::models::atom::Atom;
use crate::engine::error::SelectionError;
use crate::engine::selection::Selection;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Compiles `query` and returns clones of the atoms it selects, in input order.
///
/// # Errors
///
/// Returns [`SelectionError::Syntax`] for an invalid query and
/// [`SelectionError::Empty`] when nothing matches.
pub fn select(atoms: &[Atom], query: &str) -> Result<Vec<Atom>, SelectionError> {
    let selection = Selection::parse(query)?;
    select_with(atoms, &selection)
}

/// Applies an already compiled selection to `atoms`.
///
/// With the `parallel` feature the atoms are evaluated on the rayon pool; the
/// result keeps the input order either way.
#[instrument(level = "debug", skip_all, fields(query = %selection.query(), atoms = atoms.len()))]
pub fn select_with(atoms: &[Atom], selection: &Selection<'_>) -> Result<Vec<Atom>, SelectionError> {
    #[cfg(not(feature = "parallel"))]
    let iterator = atoms.iter();

    #[cfg(feature = "parallel")]
    let iterator = atoms.par_iter();

    let selected: Vec<Atom> = iterator
        .filter(|atom| selection.matches(atom))
        .cloned()
        .collect();

    debug!(selected = selected.len(), "Selection applied.");
    if selected.is_empty() {
        return Err(SelectionError::Empty {
            query: selection.query().to_string(),
        });
    }
    Ok(selected)
}

/// Positions (0-based, into `atoms`) of the atoms accepted by `selection`.
///
/// Unlike [`select_with`], an empty result is not an error.
pub fn select_indices(atoms: &[Atom], selection: &Selection<'_>) -> Vec<usize> {
    atoms
        .iter()
        .enumerate()
        .filter(|(_, atom)| selection.matches(atom))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peptide() -> Vec<Atom> {
        let mut atoms = Vec::new();
        for (resnum, residue) in [(1, "ALA"), (2, "GLU"), (3, "PHE")] {
            for name in ["N", "CA", "C", "O", "CB"] {
                atoms.push(Atom::new(name, residue, resnum));
            }
        }
        atoms.push(Atom::new("O", "HOH", 101));
        atoms
    }

    #[test]
    fn select_keeps_input_order() {
        let atoms = peptide();
        let selected = select(&atoms, "name CA").unwrap();
        let residues: Vec<&str> = selected.iter().map(|a| a.residue_name.as_str()).collect();
        assert_eq!(residues, vec!["ALA", "GLU", "PHE"]);
    }

    #[test]
    fn select_reports_empty_results() {
        let atoms = peptide();
        assert_eq!(
            select(&atoms, "resname TRP"),
            Err(SelectionError::Empty {
                query: "resname TRP".to_string()
            })
        );
    }

    #[test]
    fn select_propagates_syntax_errors() {
        assert!(matches!(
            select(&peptide(), "name CA and"),
            Err(SelectionError::Syntax { .. })
        ));
    }

    #[test]
    fn select_indices_tolerates_no_matches() {
        let atoms = peptide();
        let water = Selection::parse("water").unwrap();
        assert_eq!(select_indices(&atoms, &water), vec![15]);
        let none = Selection::parse("resname TRP").unwrap();
        assert!(select_indices(&atoms, &none).is_empty());
    }

    #[test]
    fn sidechain_excludes_backbone_and_water() {
        let atoms = peptide();
        let selected = select(&atoms, "sidechain").unwrap();
        assert_eq!(selected.len(), 3);
        assert!(selected.iter().all(|a| a.name == "CB"));
    }
}
