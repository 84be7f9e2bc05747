use crate::core::models::atom::Atom;
use crate::core::models::field::Field;
use phf::{Map, phf_map};
use std::collections::HashMap;
use thiserror::Error;

static DEFAULT_COLUMNS: Map<&'static str, Field> = phf_map! {
    "id" => Field::Serial,
    "type_symbol" => Field::Element,
    "label_atom_id" => Field::Name,
    "label_comp_id" => Field::ResidueName,
    "label_asym_id" => Field::ChainId,
    "label_seq_id" => Field::ResidueSequenceNumber,
    "Cartn_x" => Field::X,
    "Cartn_y" => Field::Y,
    "Cartn_z" => Field::Z,
    "occupancy" => Field::Occupancy,
    "B_iso_or_equiv" => Field::TemperatureFactor,
    "pdbx_formal_charge" => Field::FormalCharge,
    "auth_asym_id" => Field::SegmentName,
    "pdbx_PDB_model_num" => Field::ModelNumber,
};

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum AssignError {
    #[error("Field '{0}' is assigned by the reader and cannot be mapped to a column")]
    ReservedField(Field),
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum DecodeError {
    #[error("Invalid integer '{value}' in column '{column}'")]
    InvalidInt { column: String, value: String },
    #[error("Invalid float '{value}' in column '{column}'")]
    InvalidFloat { column: String, value: String },
}

/// Maps file column names to the [`Field`] they populate.
///
/// The default table covers the mmCIF `_atom_site` columns. Columns missing from
/// the table are ignored by the reader.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnTable {
    columns: HashMap<String, Field>,
}

impl Default for ColumnTable {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS
                .entries()
                .map(|(column, field)| (column.to_string(), *field))
                .collect(),
        }
    }
}

impl ColumnTable {
    pub fn empty() -> Self {
        Self {
            columns: HashMap::new(),
        }
    }

    /// Returns a table where `column` populates `field`.
    ///
    /// Any other column that previously targeted `field` is unmapped so that a
    /// field is never written from two columns.
    ///
    /// # Errors
    ///
    /// Returns [`AssignError::ReservedField`] for the fields the reader computes
    /// itself (`index`, `index_in_source`, `residue_group_id`).
    pub fn with_assignment(mut self, column: &str, field: Field) -> Result<Self, AssignError> {
        if matches!(
            field,
            Field::Index | Field::IndexInSource | Field::ResidueGroupId
        ) {
            return Err(AssignError::ReservedField(field));
        }
        self.columns.retain(|_, f| *f != field);
        self.columns.insert(column.to_string(), field);
        Ok(self)
    }

    pub fn without_column(mut self, column: &str) -> Self {
        self.columns.remove(column);
        self
    }

    pub fn field_for(&self, column: &str) -> Option<Field> {
        self.columns.get(column).copied()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// mmCIF placeholders for unknown (`?`) and inapplicable (`.`) values.
pub fn is_missing(value: &str) -> bool {
    matches!(value, "." | "?")
}

fn parse_int(column: &str, value: &str) -> Result<i64, DecodeError> {
    value.parse().map_err(|_| DecodeError::InvalidInt {
        column: column.to_string(),
        value: value.to_string(),
    })
}

fn parse_i32(column: &str, value: &str) -> Result<i32, DecodeError> {
    i32::try_from(parse_int(column, value)?).map_err(|_| DecodeError::InvalidInt {
        column: column.to_string(),
        value: value.to_string(),
    })
}

fn parse_float(column: &str, value: &str) -> Result<f64, DecodeError> {
    value.parse().map_err(|_| DecodeError::InvalidFloat {
        column: column.to_string(),
        value: value.to_string(),
    })
}

/// Parses `value` as `field`'s type and stores it on `atom`.
///
/// Missing-value placeholders leave the atom untouched. Text values lose any
/// surrounding double quotes.
pub fn assign(atom: &mut Atom, field: Field, column: &str, value: &str) -> Result<(), DecodeError> {
    if is_missing(value) {
        return Ok(());
    }
    let text = || value.trim_matches('"').to_string();
    match field {
        Field::Serial => atom.serial = Some(parse_int(column, value)?),
        Field::ResidueSequenceNumber => atom.residue_sequence_number = parse_i32(column, value)?,
        Field::ModelNumber => atom.model_number = parse_i32(column, value)?,
        Field::FormalCharge => atom.formal_charge = Some(parse_i32(column, value)?),
        Field::X => atom.position.x = parse_float(column, value)?,
        Field::Y => atom.position.y = parse_float(column, value)?,
        Field::Z => atom.position.z = parse_float(column, value)?,
        Field::TemperatureFactor => atom.temperature_factor = parse_float(column, value)?,
        Field::Occupancy => atom.occupancy = parse_float(column, value)?,
        Field::Name => atom.name = text(),
        Field::ResidueName => atom.residue_name = text(),
        Field::ChainId => atom.chain_id = text(),
        Field::SegmentName => atom.segment_name = text(),
        Field::Element => atom.element = text(),
        // Reader-computed; `ColumnTable::with_assignment` never maps them.
        Field::Index | Field::IndexInSource | Field::ResidueGroupId => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_maps_label_columns() {
        let table = ColumnTable::default();
        assert_eq!(table.field_for("label_atom_id"), Some(Field::Name));
        assert_eq!(table.field_for("label_seq_id"), Some(Field::ResidueSequenceNumber));
        assert_eq!(table.field_for("Cartn_z"), Some(Field::Z));
        assert_eq!(table.field_for("auth_seq_id"), None);
        assert_eq!(table.field_for("group_PDB"), None);
    }

    #[test]
    fn with_assignment_moves_a_field_to_another_column() {
        let table = ColumnTable::default()
            .with_assignment("auth_seq_id", Field::ResidueSequenceNumber)
            .unwrap();
        assert_eq!(
            table.field_for("auth_seq_id"),
            Some(Field::ResidueSequenceNumber)
        );
        assert_eq!(table.field_for("label_seq_id"), None);
    }

    #[test]
    fn tables_can_be_built_up_from_empty_or_pruned_from_default() {
        let minimal = ColumnTable::empty()
            .with_assignment("atom_name", Field::Name)
            .unwrap();
        assert_eq!(minimal.len(), 1);
        assert_eq!(minimal.field_for("atom_name"), Some(Field::Name));
        assert_eq!(minimal.field_for("label_atom_id"), None);
        assert!(ColumnTable::empty().is_empty());

        let default = ColumnTable::default();
        let pruned = default.clone().without_column("type_symbol");
        assert_eq!(pruned.len(), default.len() - 1);
        assert_eq!(pruned.field_for("type_symbol"), None);
        assert_eq!(pruned.field_for("label_atom_id"), Some(Field::Name));
    }

    #[test]
    fn with_assignment_rejects_reader_computed_fields() {
        let err = ColumnTable::default()
            .with_assignment("id", Field::Index)
            .unwrap_err();
        assert_eq!(err, AssignError::ReservedField(Field::Index));
    }

    #[test]
    fn assign_parses_each_kind() {
        let mut atom = Atom::default();
        assign(&mut atom, Field::Name, "label_atom_id", "CA").unwrap();
        assign(&mut atom, Field::ResidueSequenceNumber, "label_seq_id", "42").unwrap();
        assign(&mut atom, Field::X, "Cartn_x", "-1.5").unwrap();
        assign(&mut atom, Field::FormalCharge, "pdbx_formal_charge", "-1").unwrap();
        assert_eq!(atom.name, "CA");
        assert_eq!(atom.residue_sequence_number, 42);
        assert_eq!(atom.x(), -1.5);
        assert_eq!(atom.formal_charge, Some(-1));
    }

    #[test]
    fn assign_keeps_defaults_for_missing_values() {
        let mut atom = Atom::default();
        assign(&mut atom, Field::Occupancy, "occupancy", "?").unwrap();
        assign(&mut atom, Field::ResidueSequenceNumber, "label_seq_id", ".").unwrap();
        assert_eq!(atom.occupancy, 1.0);
        assert_eq!(atom.residue_sequence_number, 0);
    }

    #[test]
    fn assign_strips_quotes_from_text() {
        let mut atom = Atom::default();
        assign(&mut atom, Field::Name, "label_atom_id", "\"C1'\"").unwrap();
        assert_eq!(atom.name, "C1'");
    }

    #[test]
    fn assign_reports_bad_numbers_with_column() {
        let mut atom = Atom::default();
        assert_eq!(
            assign(&mut atom, Field::Y, "Cartn_y", "abc"),
            Err(DecodeError::InvalidFloat {
                column: "Cartn_y".into(),
                value: "abc".into()
            })
        );
        assert!(matches!(
            assign(&mut atom, Field::ModelNumber, "pdbx_PDB_model_num", "99999999999"),
            Err(DecodeError::InvalidInt { .. })
        ));
    }
}
