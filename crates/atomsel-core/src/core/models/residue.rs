use super::atom::{Atom, ResidueNamed};
use std::iter::FusedIterator;
use std::ops::RangeInclusive;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ResidueError {
    #[error("Cannot build a residue from an empty atom range")]
    EmptyRange,

    #[error("Residue range {start}..={end} is out of bounds for {len} atoms")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error(
        "Atoms {start}..={end} do not belong to a single residue (group {expected} != {found} at atom {at})"
    )]
    Heterogeneous {
        start: usize,
        end: usize,
        at: usize,
        expected: usize,
        found: usize,
    },
}

/// A non-owning window over the atoms of one residue.
///
/// The view borrows a contiguous, inclusive range of an atom slice in which every
/// atom shares the same `residue_group_id`. Residue-level metadata is cached from
/// the first atom of the range.
#[derive(Debug, Clone, Copy)]
pub struct Residue<'a> {
    atoms: &'a [Atom],
    start: usize,
    end: usize,
    name: &'a str,
    chain_id: &'a str,
    residue_sequence_number: i32,
    model_number: i32,
    segment_name: &'a str,
}

impl<'a> Residue<'a> {
    /// Builds a residue view over `atoms[range]`, validating the range first.
    ///
    /// # Errors
    ///
    /// Returns [`ResidueError`] if the range is empty, out of bounds, or spans
    /// more than one residue group.
    pub fn new(atoms: &'a [Atom], range: RangeInclusive<usize>) -> Result<Self, ResidueError> {
        let (start, end) = range.into_inner();
        if start > end {
            return Err(ResidueError::EmptyRange);
        }
        if end >= atoms.len() {
            return Err(ResidueError::OutOfBounds {
                start,
                end,
                len: atoms.len(),
            });
        }
        let expected = atoms[start].residue_group_id;
        if let Some((offset, atom)) = atoms[start..=end]
            .iter()
            .enumerate()
            .find(|(_, a)| a.residue_group_id != expected)
        {
            return Err(ResidueError::Heterogeneous {
                start,
                end,
                at: start + offset,
                expected,
                found: atom.residue_group_id,
            });
        }
        Ok(Self::new_unchecked(atoms, start, end))
    }

    // Callers guarantee `start <= end < atoms.len()` and a homogeneous range.
    fn new_unchecked(atoms: &'a [Atom], start: usize, end: usize) -> Self {
        let first = &atoms[start];
        Self {
            atoms,
            start,
            end,
            name: &first.residue_name,
            chain_id: &first.chain_id,
            residue_sequence_number: first.residue_sequence_number,
            model_number: first.model_number,
            segment_name: &first.segment_name,
        }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn chain_id(&self) -> &'a str {
        self.chain_id
    }

    pub fn residue_sequence_number(&self) -> i32 {
        self.residue_sequence_number
    }

    pub fn model_number(&self) -> i32 {
        self.model_number
    }

    pub fn segment_name(&self) -> &'a str {
        self.segment_name
    }

    pub fn residue_group_id(&self) -> usize {
        self.atoms[self.start].residue_group_id
    }

    /// The inclusive index range of this residue within the parent slice.
    pub fn range(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// The atoms of this residue, borrowed from the parent slice.
    pub fn atoms(&self) -> &'a [Atom] {
        &self.atoms[self.start..=self.end]
    }

    pub fn iter(&self) -> std::slice::Iter<'a, Atom> {
        self.atoms().iter()
    }

    /// Looks up an atom of this residue by name.
    pub fn atom(&self, name: &str) -> Option<&'a Atom> {
        self.atoms().iter().find(|a| a.name == name)
    }
}

impl ResidueNamed for Residue<'_> {
    fn residue_name(&self) -> &str {
        self.name
    }
}

impl<'a> IntoIterator for &Residue<'a> {
    type Item = &'a Atom;
    type IntoIter = std::slice::Iter<'a, Atom>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazily groups an ordered atom slice into [`Residue`] views.
///
/// The iterator keeps only a cursor: each call to `next` advances while the
/// `residue_group_id` stays equal to that of the window's first atom.
#[derive(Debug, Clone)]
pub struct ResidueIter<'a> {
    atoms: &'a [Atom],
    cursor: usize,
}

impl<'a> ResidueIter<'a> {
    pub fn new(atoms: &'a [Atom]) -> Self {
        Self { atoms, cursor: 0 }
    }
}

impl<'a> Iterator for ResidueIter<'a> {
    type Item = Residue<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.atoms.len() {
            return None;
        }
        let start = self.cursor;
        let group = self.atoms[start].residue_group_id;
        self.cursor += 1;
        while self.cursor < self.atoms.len() && self.atoms[self.cursor].residue_group_id == group
        {
            self.cursor += 1;
        }
        Some(Residue::new_unchecked(self.atoms, start, self.cursor - 1))
    }
}

impl FusedIterator for ResidueIter<'_> {}

/// Iterates over the residues of an ordered atom slice.
pub fn residues(atoms: &[Atom]) -> ResidueIter<'_> {
    ResidueIter::new(atoms)
}
