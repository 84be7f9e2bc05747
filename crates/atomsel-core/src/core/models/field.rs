use super::atom::Atom;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The value type a field is decoded as and compared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Integer,
    Float,
    Text,
}

/// Closed enumeration of the [`Atom`] attributes that readers can populate and
/// selections can compare against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Index,
    IndexInSource,
    Serial,
    Name,
    ResidueName,
    ChainId,
    ResidueSequenceNumber,
    ResidueGroupId,
    X,
    Y,
    Z,
    TemperatureFactor,
    Occupancy,
    ModelNumber,
    SegmentName,
    Element,
    FormalCharge,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown atom field '{0}'")]
pub struct ParseFieldError(pub String);

/// Integer field accessor resolved once per compiled predicate.
pub type IntAccessor = fn(&Atom) -> i64;
/// Float field accessor resolved once per compiled predicate.
pub type FloatAccessor = fn(&Atom) -> f64;
/// Text field accessor resolved once per compiled predicate.
pub type TextAccessor = fn(&Atom) -> &str;

impl Field {
    pub const ALL: [Field; 17] = [
        Field::Index,
        Field::IndexInSource,
        Field::Serial,
        Field::Name,
        Field::ResidueName,
        Field::ChainId,
        Field::ResidueSequenceNumber,
        Field::ResidueGroupId,
        Field::X,
        Field::Y,
        Field::Z,
        Field::TemperatureFactor,
        Field::Occupancy,
        Field::ModelNumber,
        Field::SegmentName,
        Field::Element,
        Field::FormalCharge,
    ];

    /// The internal snake_case name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Index => "index",
            Field::IndexInSource => "index_in_source",
            Field::Serial => "serial",
            Field::Name => "name",
            Field::ResidueName => "residue_name",
            Field::ChainId => "chain_id",
            Field::ResidueSequenceNumber => "residue_sequence_number",
            Field::ResidueGroupId => "residue_group_id",
            Field::X => "x",
            Field::Y => "y",
            Field::Z => "z",
            Field::TemperatureFactor => "temperature_factor",
            Field::Occupancy => "occupancy",
            Field::ModelNumber => "model_number",
            Field::SegmentName => "segment_name",
            Field::Element => "element",
            Field::FormalCharge => "formal_charge",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::Index
            | Field::IndexInSource
            | Field::Serial
            | Field::ResidueSequenceNumber
            | Field::ResidueGroupId
            | Field::ModelNumber
            | Field::FormalCharge => FieldKind::Integer,
            Field::X | Field::Y | Field::Z | Field::TemperatureFactor | Field::Occupancy => {
                FieldKind::Float
            }
            Field::Name
            | Field::ResidueName
            | Field::ChainId
            | Field::SegmentName
            | Field::Element => FieldKind::Text,
        }
    }

    /// Accessor for integer fields; `None` for other kinds.
    ///
    /// Optional fields read as `0` when unset.
    pub fn int_accessor(self) -> Option<IntAccessor> {
        let accessor: IntAccessor = match self {
            Field::Index => |a| a.index as i64,
            Field::IndexInSource => |a| a.index_in_source as i64,
            Field::Serial => |a| a.serial.unwrap_or(0),
            Field::ResidueSequenceNumber => |a| i64::from(a.residue_sequence_number),
            Field::ResidueGroupId => |a| a.residue_group_id as i64,
            Field::ModelNumber => |a| i64::from(a.model_number),
            Field::FormalCharge => |a| i64::from(a.formal_charge.unwrap_or(0)),
            _ => return None,
        };
        Some(accessor)
    }

    pub fn float_accessor(self) -> Option<FloatAccessor> {
        let accessor: FloatAccessor = match self {
            Field::X => |a| a.position.x,
            Field::Y => |a| a.position.y,
            Field::Z => |a| a.position.z,
            Field::TemperatureFactor => |a| a.temperature_factor,
            Field::Occupancy => |a| a.occupancy,
            _ => return None,
        };
        Some(accessor)
    }

    pub fn text_accessor(self) -> Option<TextAccessor> {
        let accessor: TextAccessor = match self {
            Field::Name => |a| a.name.as_str(),
            Field::ResidueName => |a| a.residue_name.as_str(),
            Field::ChainId => |a| a.chain_id.as_str(),
            Field::SegmentName => |a| a.segment_name.as_str(),
            Field::Element => |a| a.element.as_str(),
            _ => return None,
        };
        Some(accessor)
    }
}

impl FromStr for Field {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ParseFieldError(s.to_string()))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
