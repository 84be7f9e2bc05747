use nalgebra::Point3;

/// Anything that carries a residue name.
///
/// Chemistry predicates are written against this trait so that they accept an
/// [`Atom`] record and a [`Residue`](super::residue::Residue) view alike.
pub trait ResidueNamed {
    /// The residue name as written in the source file (e.g. "ALA", "HOH").
    fn residue_name(&self) -> &str;
}

/// One decoded atom record.
///
/// This is the fixed-shape unit of data that flows through the whole crate: the
/// reader emits it, selections evaluate against it, and residue views borrow it.
/// Fields that the input file does not declare keep the defaults documented on
/// [`Atom::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// 1-based position in the emitted (filtered) sequence.
    pub index: usize,
    /// 1-based position among all records decoded from the source.
    pub index_in_source: usize,
    /// The atom serial written in the file, when the file declares one.
    pub serial: Option<i64>,
    /// The atom name (e.g. "CA", "N", "O").
    pub name: String,
    /// The residue name (e.g. "ALA", "HOH").
    pub residue_name: String,
    /// The chain identifier.
    pub chain_id: String,
    /// Author-facing residue number; may repeat across chains and models.
    pub residue_sequence_number: i32,
    /// Internal grouping key assigned by the reader, one per detected residue.
    pub residue_group_id: usize,
    /// Cartesian coordinates in Angstroms.
    pub position: Point3<f64>,
    /// Isotropic temperature factor (B-factor).
    pub temperature_factor: f64,
    /// Site occupancy.
    pub occupancy: f64,
    /// 1-based model number.
    pub model_number: i32,
    /// Segment name.
    pub segment_name: String,
    /// Chemical element symbol (e.g. "C", "N").
    pub element: String,
    /// Formal charge, if the file provides one.
    pub formal_charge: Option<i32>,
}

impl Atom {
    /// Creates a new `Atom` with default values for everything but its identity.
    ///
    /// Defaults: indices and residue group `0`, coordinates at the origin,
    /// temperature factor `0.0`, occupancy `1.0`, model `1`, empty chain, segment
    /// and element, no serial and no formal charge.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the atom.
    /// * `residue_name` - The name of the residue this atom belongs to.
    /// * `residue_sequence_number` - The author residue number.
    pub fn new(name: &str, residue_name: &str, residue_sequence_number: i32) -> Self {
        Self {
            name: name.to_string(),
            residue_name: residue_name.to_string(),
            residue_sequence_number,
            ..Self::default()
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.position.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.position.y
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.position.z
    }

    /// Whether `other` belongs to the same residue as `self`.
    ///
    /// Two atoms share a residue when residue name, residue sequence number,
    /// chain and model all agree. The reader uses this test to decide when a new
    /// residue group starts.
    pub fn same_residue(&self, other: &Atom) -> bool {
        self.residue_sequence_number == other.residue_sequence_number
            && self.model_number == other.model_number
            && self.residue_name == other.residue_name
            && self.chain_id == other.chain_id
    }

    /// Whether the element symbol marks a hydrogen (or deuterium).
    pub fn is_hydrogen(&self) -> bool {
        matches!(self.element.trim(), "H" | "D" | "h" | "d")
    }
}

impl Default for Atom {
    fn default() -> Self {
        Self {
            index: 0,
            index_in_source: 0,
            serial: None,
            name: String::new(),
            residue_name: String::new(),
            chain_id: String::new(),
            residue_sequence_number: 0,
            residue_group_id: 0,
            position: Point3::origin(),
            temperature_factor: 0.0,
            occupancy: 1.0,
            model_number: 1,
            segment_name: String::new(),
            element: String::new(),
            formal_charge: None,
        }
    }
}

impl ResidueNamed for Atom {
    fn residue_name(&self) -> &str {
        &self.residue_name
    }
}
