use crate::core::chemistry::identifiers::{
    is_backbone_atom, is_hydrogen_name, is_main_chain_atom, is_water,
};
use crate::core::chemistry::table::ChemistryTable;
use crate::core::models::atom::Atom;
use crate::core::models::field::{Field, FloatAccessor, IntAccessor, TextAccessor};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Lt,
    Gt,
    Le,
    Ge,
}

impl CompareOp {
    #[inline]
    pub fn apply<T: PartialOrd + ?Sized>(self, lhs: &T, rhs: &T) -> bool {
        match self {
            CompareOp::Eq => lhs == rhs,
            CompareOp::Lt => lhs < rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Le => lhs <= rhs,
            CompareOp::Ge => lhs >= rhs,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::Le => "<=",
            CompareOp::Ge => ">=",
        }
    }
}

impl FromStr for CompareOp {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(CompareOp::Eq),
            "<" => Ok(CompareOp::Lt),
            ">" => Ok(CompareOp::Gt),
            "<=" => Ok(CompareOp::Le),
            ">=" => Ok(CompareOp::Ge),
            _ => Err(()),
        }
    }
}

/// Argument-free selection keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Special {
    Water,
    Protein,
    Polar,
    Nonpolar,
    Basic,
    Acidic,
    Charged,
    Aliphatic,
    Aromatic,
    Hydrophobic,
    Neutral,
    Backbone,
    Sidechain,
    Heavy,
    All,
}

impl Special {
    pub const ALL: [Special; 15] = [
        Special::Water,
        Special::Protein,
        Special::Polar,
        Special::Nonpolar,
        Special::Basic,
        Special::Acidic,
        Special::Charged,
        Special::Aliphatic,
        Special::Aromatic,
        Special::Hydrophobic,
        Special::Neutral,
        Special::Backbone,
        Special::Sidechain,
        Special::Heavy,
        Special::All,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Special::Water => "water",
            Special::Protein => "protein",
            Special::Polar => "polar",
            Special::Nonpolar => "nonpolar",
            Special::Basic => "basic",
            Special::Acidic => "acidic",
            Special::Charged => "charged",
            Special::Aliphatic => "aliphatic",
            Special::Aromatic => "aromatic",
            Special::Hydrophobic => "hydrophobic",
            Special::Neutral => "neutral",
            Special::Backbone => "backbone",
            Special::Sidechain => "sidechain",
            Special::Heavy => "heavy",
            Special::All => "all",
        }
    }

    pub fn matches(self, atom: &Atom, chemistry: &ChemistryTable) -> bool {
        match self {
            Special::Water => is_water(atom),
            Special::Protein => chemistry.is_protein(atom),
            Special::Polar => chemistry.is_polar(atom),
            Special::Nonpolar => chemistry.is_nonpolar(atom),
            Special::Basic => chemistry.is_basic(atom),
            Special::Acidic => chemistry.is_acidic(atom),
            Special::Charged => chemistry.is_charged(atom),
            Special::Aliphatic => chemistry.is_aliphatic(atom),
            Special::Aromatic => chemistry.is_aromatic(atom),
            Special::Hydrophobic => chemistry.is_hydrophobic(atom),
            Special::Neutral => chemistry.is_neutral(atom),
            Special::Backbone => chemistry.is_protein(atom) && is_backbone_atom(&atom.name),
            Special::Sidechain => chemistry.is_protein(atom) && !is_main_chain_atom(&atom.name),
            Special::Heavy => {
                if atom.element.is_empty() {
                    !is_hydrogen_name(&atom.name)
                } else {
                    !atom.is_hydrogen()
                }
            }
            Special::All => true,
        }
    }
}

impl FromStr for Special {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Special::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or(())
    }
}

/// A compiled selection tree.
///
/// Leaves carry the field accessor resolved at compile time, so evaluation never
/// looks a field up by name.
#[derive(Debug, Clone)]
pub enum Node {
    Int {
        field: Field,
        get: IntAccessor,
        op: CompareOp,
        value: i64,
    },
    Float {
        field: Field,
        get: FloatAccessor,
        op: CompareOp,
        value: f64,
    },
    Text {
        field: Field,
        get: TextAccessor,
        op: CompareOp,
        value: String,
    },
    Special(Special),
    Not(Box<Node>),
    And(Box<Node>, Box<Node>),
    Or(Box<Node>, Box<Node>),
}

impl Node {
    pub fn eval(&self, atom: &Atom, chemistry: &ChemistryTable) -> bool {
        match self {
            Node::Int { get, op, value, .. } => op.apply(&get(atom), value),
            Node::Float { get, op, value, .. } => op.apply(&get(atom), value),
            Node::Text { get, op, value, .. } => op.apply(get(atom), value.as_str()),
            Node::Special(special) => special.matches(atom, chemistry),
            Node::Not(inner) => !inner.eval(atom, chemistry),
            Node::And(lhs, rhs) => lhs.eval(atom, chemistry) && rhs.eval(atom, chemistry),
            Node::Or(lhs, rhs) => lhs.eval(atom, chemistry) || rhs.eval(atom, chemistry),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Int {
                field, op, value, ..
            } => write!(f, "{} {} {}", field, op.as_str(), value),
            Node::Float {
                field, op, value, ..
            } => write!(f, "{} {} {}", field, op.as_str(), value),
            Node::Text {
                field, op, value, ..
            } => write!(f, "{} {} {}", field, op.as_str(), value),
            Node::Special(special) => f.write_str(special.as_str()),
            Node::Not(inner) => write!(f, "not ({inner})"),
            Node::And(lhs, rhs) => write!(f, "({lhs} and {rhs})"),
            Node::Or(lhs, rhs) => write!(f, "({lhs} or {rhs})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(name: &str, residue: &str, element: &str) -> Atom {
        let mut atom = Atom::new(name, residue, 1);
        atom.element = element.to_string();
        atom
    }

    #[test]
    fn compare_op_orders_numbers_and_strings() {
        assert!(CompareOp::Le.apply(&3, &3));
        assert!(CompareOp::Lt.apply(&2.5, &3.0));
        assert!(!CompareOp::Gt.apply(&2, &3));
        assert!(CompareOp::Ge.apply("CB", "CA"));
        assert!(CompareOp::Eq.apply("CA", "CA"));
        assert_eq!("<=".parse::<CompareOp>(), Ok(CompareOp::Le));
        assert!("=<".parse::<CompareOp>().is_err());
    }

    #[test]
    fn special_keywords_round_trip_through_names() {
        for special in Special::ALL {
            assert_eq!(special.as_str().parse::<Special>(), Ok(special));
        }
        assert!("ligand".parse::<Special>().is_err());
    }

    #[test]
    fn backbone_and_sidechain_partition_protein_heavy_atoms() {
        let chemistry = ChemistryTable::standard();
        let ca = atom("CA", "ALA", "C");
        let cb = atom("CB", "ALA", "C");
        let ha = atom("HA", "ALA", "H");
        let water_o = atom("O", "HOH", "O");

        assert!(Special::Backbone.matches(&ca, chemistry));
        assert!(!Special::Sidechain.matches(&ca, chemistry));
        assert!(Special::Sidechain.matches(&cb, chemistry));
        assert!(!Special::Backbone.matches(&ha, chemistry));
        assert!(!Special::Sidechain.matches(&ha, chemistry));
        assert!(!Special::Backbone.matches(&water_o, chemistry));
        assert!(Special::Water.matches(&water_o, chemistry));
    }

    #[test]
    fn heavy_uses_element_then_falls_back_to_name() {
        let chemistry = ChemistryTable::standard();
        assert!(Special::Heavy.matches(&atom("CA", "ALA", "C"), chemistry));
        assert!(!Special::Heavy.matches(&atom("HA", "ALA", "H"), chemistry));
        assert!(!Special::Heavy.matches(&atom("HB1", "ALA", ""), chemistry));
        assert!(Special::Heavy.matches(&atom("CB", "ALA", ""), chemistry));
    }

    #[test]
    fn combinators_evaluate_children() {
        let chemistry = ChemistryTable::standard();
        let ca = atom("CA", "GLU", "C");
        let protein = Box::new(Node::Special(Special::Protein));
        let water = Box::new(Node::Special(Special::Water));
        assert!(Node::Or(protein.clone(), water.clone()).eval(&ca, chemistry));
        assert!(!Node::And(protein.clone(), water.clone()).eval(&ca, chemistry));
        assert!(Node::Not(water).eval(&ca, chemistry));
    }
}
