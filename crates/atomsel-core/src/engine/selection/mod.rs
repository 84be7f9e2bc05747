pub mod keywords;
pub mod node;
pub mod parser;

use self::keywords::KeywordTable;
use self::node::Node;
use super::error::SelectionError;
use crate::core::chemistry::table::ChemistryTable;
use crate::core::io::traits::AtomFilter;
use crate::core::models::atom::Atom;
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// Compiles query strings against a keyword table and a residue chemistry table.
#[derive(Debug, Clone, Copy)]
pub struct SelectionCompiler<'t> {
    keywords: &'t KeywordTable,
    chemistry: &'t ChemistryTable,
}

impl SelectionCompiler<'static> {
    /// A compiler over the built-in keyword and chemistry tables.
    pub fn standard() -> Self {
        Self::new(KeywordTable::standard(), ChemistryTable::standard())
    }
}

impl<'t> SelectionCompiler<'t> {
    pub fn new(keywords: &'t KeywordTable, chemistry: &'t ChemistryTable) -> Self {
        Self {
            keywords,
            chemistry,
        }
    }

    /// Compiles `query` into a reusable [`Selection`].
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::Syntax`] carrying the original query text if it
    /// uses an unknown keyword, a malformed comparison, a non-numeric literal for a
    /// numeric field, a dangling combinator, or parentheses.
    pub fn compile(&self, query: &str) -> Result<Selection<'t>, SelectionError> {
        let syntax_error = || SelectionError::Syntax {
            query: query.to_string(),
        };
        let tokens: Vec<&str> = parser::tokenize(query)
            .ok_or_else(syntax_error)?
            .into_iter()
            .map(|token| self.keywords.rewrite(token))
            .collect();
        let root = parser::parse(&tokens, self.keywords).ok_or_else(syntax_error)?;
        trace!(query, compiled = %root, "Compiled selection.");
        Ok(Selection {
            query: query.to_string(),
            root,
            chemistry: self.chemistry,
        })
    }
}

/// A compiled, immutable atom predicate.
///
/// Compiling once and evaluating many times never re-parses the query, and
/// evaluation has no side effects, so a selection can be shared freely between
/// threads and reused across files.
#[derive(Debug, Clone)]
pub struct Selection<'t> {
    query: String,
    root: Node,
    chemistry: &'t ChemistryTable,
}

impl Selection<'static> {
    /// Compiles `query` with the built-in tables.
    pub fn parse(query: &str) -> Result<Self, SelectionError> {
        SelectionCompiler::standard().compile(query)
    }
}

impl<'t> Selection<'t> {
    #[inline]
    pub fn matches(&self, atom: &Atom) -> bool {
        self.root.eval(atom, self.chemistry)
    }

    /// The query text as written by the caller.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// A fully parenthesized rendering of the compiled tree.
    ///
    /// Two queries with the same canonical form select the same atoms.
    pub fn canonical(&self) -> String {
        self.root.to_string()
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Iterates over the atoms of `atoms` accepted by this selection, in order.
    pub fn filter<'a>(&'a self, atoms: &'a [Atom]) -> impl Iterator<Item = &'a Atom> + 'a {
        atoms.iter().filter(move |atom| self.matches(atom))
    }
}

impl FromStr for Selection<'static> {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selection::parse(s)
    }
}

impl fmt::Display for Selection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query)
    }
}

impl AtomFilter for Selection<'_> {
    fn matches(&self, atom: &Atom) -> bool {
        Selection::matches(self, atom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(name: &str, residue: &str, resnum: i32) -> Atom {
        Atom::new(name, residue, resnum)
    }

    fn names<'a>(selection: &Selection<'_>, atoms: &'a [Atom]) -> Vec<&'a str> {
        atoms
            .iter()
            .filter(|a| selection.matches(a))
            .map(|a| a.name.as_str())
            .collect()
    }

    #[test]
    fn residue_and_atom_name_selects_only_alpha_carbon() {
        let atoms = vec![
            atom("N", "ALA", 1),
            atom("CA", "ALA", 1),
            atom("C", "ALA", 1),
            atom("CA", "GLY", 2),
        ];
        let selection = Selection::parse("resname ALA and name CA").unwrap();
        assert_eq!(names(&selection, &atoms), vec!["CA"]);
        assert_eq!(selection.filter(&atoms).count(), 1);
    }

    #[test]
    fn operator_spacing_does_not_change_meaning() {
        let spaced = Selection::parse("name = CA").unwrap();
        let packed = Selection::parse("name=CA").unwrap();
        let implied = Selection::parse("name CA").unwrap();
        assert_eq!(spaced.canonical(), packed.canonical());
        assert_eq!(spaced.canonical(), implied.canonical());
        assert_eq!(packed.query(), "name=CA");
        assert_eq!(packed.to_string(), "name=CA");
    }

    #[test]
    fn evaluation_is_repeatable() {
        let selection = Selection::parse("protein and not backbone").unwrap();
        let cb = atom("CB", "SER", 4);
        let first = selection.matches(&cb);
        for _ in 0..3 {
            assert_eq!(selection.matches(&cb), first);
        }
        assert!(first);
    }

    #[test]
    fn integer_fields_compare_numerically() {
        let atoms: Vec<Atom> = (1..=12).map(|n| atom("CA", "ALA", n)).collect();
        let selection = Selection::parse("resnum <= 10").unwrap();
        assert_eq!(selection.filter(&atoms).count(), 10);
        let selection = Selection::parse("resid > 9").unwrap();
        let kept: Vec<i32> = selection
            .filter(&atoms)
            .map(|a| a.residue_sequence_number)
            .collect();
        assert_eq!(kept, vec![10, 11, 12]);
    }

    #[test]
    fn float_fields_compare_numerically() {
        let mut low = atom("CA", "ALA", 1);
        low.temperature_factor = 9.5;
        let mut high = low.clone();
        high.temperature_factor = 30.0;
        let selection = Selection::parse("beta >= 10").unwrap();
        assert!(!selection.matches(&low));
        assert!(selection.matches(&high));
    }

    #[test]
    fn acidic_selects_glutamate_but_not_phenylalanine() {
        let selection = Selection::parse("acidic").unwrap();
        assert!(selection.matches(&atom("CA", "GLU", 1)));
        assert!(!selection.matches(&atom("CA", "PHE", 2)));
    }

    #[test]
    fn every_special_keyword_selects_its_class() {
        // keyword, accepted (atom, residue), rejected (atom, residue), expected on HOH and LIG.
        let cases: [(&str, (&str, &str), Option<(&str, &str)>, (bool, bool)); 15] = [
            ("water", ("O", "HOH"), Some(("CA", "ALA")), (true, false)),
            ("protein", ("CA", "ALA"), None, (false, false)),
            ("polar", ("CA", "SER"), Some(("CA", "ALA")), (false, false)),
            ("nonpolar", ("CA", "ALA"), Some(("CA", "SER")), (false, false)),
            ("basic", ("CA", "LYS"), Some(("CA", "GLU")), (false, false)),
            ("acidic", ("CA", "ASP"), Some(("CA", "LYS")), (false, false)),
            ("charged", ("CA", "ARG"), Some(("CA", "ALA")), (false, false)),
            ("aliphatic", ("CA", "LEU"), Some(("CA", "PHE")), (false, false)),
            ("aromatic", ("CA", "TRP"), Some(("CA", "LEU")), (false, false)),
            ("hydrophobic", ("CA", "ILE"), Some(("CA", "SER")), (false, false)),
            ("neutral", ("CA", "GLY"), Some(("CA", "GLU")), (false, false)),
            ("backbone", ("CA", "ALA"), Some(("CB", "ALA")), (false, false)),
            ("sidechain", ("CB", "ALA"), Some(("CA", "ALA")), (false, false)),
            ("heavy", ("CA", "ALA"), Some(("HA", "ALA")), (true, true)),
            ("all", ("HA", "GLY"), None, (true, true)),
        ];
        for (keyword, (name, residue), rejected, (on_water, on_ligand)) in cases {
            let selection = Selection::parse(keyword).unwrap();
            assert!(selection.matches(&atom(name, residue, 1)), "{keyword} on {residue}");
            if let Some((name, residue)) = rejected {
                assert!(
                    !selection.matches(&atom(name, residue, 1)),
                    "{keyword} on {name}/{residue}"
                );
            }
            assert_eq!(selection.matches(&atom("O", "HOH", 2)), on_water, "{keyword} on HOH");
            assert_eq!(selection.matches(&atom("C1", "LIG", 3)), on_ligand, "{keyword} on LIG");
        }
    }

    #[test]
    fn root_exposes_the_compiled_tree() {
        let selection = Selection::parse("not water and name CA").unwrap();
        match selection.root() {
            Node::And(lhs, rhs) => {
                assert!(matches!(**lhs, Node::Not(_)));
                assert!(matches!(**rhs, Node::Text { .. }));
            }
            other => panic!("unexpected tree: {other}"),
        }
    }

    #[test]
    fn unknown_residue_names_are_not_protein() {
        let selection = Selection::parse("protein").unwrap();
        assert!(!selection.matches(&atom("C1", "LIG", 1)));
        assert!(!selection.matches(&atom("O", "HOH", 2)));
    }

    #[test]
    fn parentheses_are_a_syntax_error_carrying_the_query() {
        let err = Selection::parse("(name CA)").unwrap_err();
        assert_eq!(
            err,
            SelectionError::Syntax {
                query: "(name CA)".to_string()
            }
        );
    }

    #[test]
    fn malformed_queries_are_syntax_errors() {
        for query in [
            "",
            "ligand",
            "resnum abc",
            "name CA CB",
            "name CA and",
            "or water",
            "NAME CA",
        ] {
            assert!(
                matches!(
                    Selection::parse(query),
                    Err(SelectionError::Syntax { query: ref q }) if q == query
                ),
                "{query:?}"
            );
        }
    }

    #[test]
    fn or_binds_looser_than_and() {
        let selection = Selection::parse("name CA and resname ALA or water").unwrap();
        assert_eq!(
            selection.canonical(),
            "((name = CA and residue_name = ALA) or water)"
        );
        assert!(selection.matches(&atom("O", "HOH", 9)));
        assert!(!selection.matches(&atom("CA", "GLY", 1)));
    }

    #[test]
    fn selection_acts_as_an_atom_filter() {
        let selection = Selection::parse("name CA").unwrap();
        let filter: &dyn AtomFilter = &selection;
        assert!(filter.matches(&atom("CA", "GLY", 1)));
        assert!(!filter.matches(&atom("CB", "GLY", 1)));
    }

    #[test]
    fn compiler_uses_the_supplied_chemistry_table() {
        let chemistry = ChemistryTable::from_toml_str(
            r#"
            [SEP]
            name = "Phosphoserine"
            one_letter = "S"
            category = "Acidic"
            polar = true
            hydrophobic = false
            mono_isotopic_mass = 167.00
            average_mass = 167.06
            charge = -2
            "#,
        )
        .unwrap();
        let compiler = SelectionCompiler::new(KeywordTable::standard(), &chemistry);
        let selection = compiler.compile("acidic").unwrap();
        assert!(selection.matches(&atom("P", "SEP", 3)));
        assert!(!selection.matches(&atom("CA", "GLU", 4)));
    }

    #[test]
    fn custom_aliases_compile() {
        let keywords = KeywordTable::standard()
            .clone()
            .with_alias("atomname", crate::core::models::field::Field::Name);
        let compiler = SelectionCompiler::new(&keywords, ChemistryTable::standard());
        let selection = compiler.compile("atomname CA").unwrap();
        assert_eq!(selection.canonical(), "name = CA");
    }
}
