use super::parser::tokenize;
use crate::core::models::field::{Field, FieldKind};
use std::sync::LazyLock;

/// Keyword vocabulary of the selection language.
///
/// Holds the user-facing aliases (e.g. `resname`) and the field keywords they
/// rewrite to (e.g. `residue_name`). Aliases are applied in table order by
/// whole-token substitution, so an alias never matches inside a longer word.
#[derive(Debug, Clone)]
pub struct KeywordTable {
    aliases: Vec<(String, Field)>,
    numeric: Vec<Field>,
    text: Vec<Field>,
}

static STANDARD_KEYWORDS: LazyLock<KeywordTable> = LazyLock::new(KeywordTable::builtin);

impl KeywordTable {
    /// The built-in keyword table shared by the whole process.
    pub fn standard() -> &'static KeywordTable {
        &STANDARD_KEYWORDS
    }

    fn builtin() -> Self {
        let aliases = [
            ("resname", Field::ResidueName),
            ("resnum", Field::ResidueSequenceNumber),
            ("resid", Field::ResidueSequenceNumber),
            ("residue", Field::ResidueGroupId),
            ("chain", Field::ChainId),
            ("segname", Field::SegmentName),
            ("beta", Field::TemperatureFactor),
            ("occup", Field::Occupancy),
            ("model", Field::ModelNumber),
            ("index_pdb", Field::Serial),
        ];
        Self {
            aliases: aliases
                .into_iter()
                .map(|(alias, field)| (alias.to_string(), field))
                .collect(),
            numeric: vec![
                Field::Index,
                Field::IndexInSource,
                Field::Serial,
                Field::ResidueSequenceNumber,
                Field::ResidueGroupId,
                Field::TemperatureFactor,
                Field::Occupancy,
                Field::ModelNumber,
            ],
            text: vec![
                Field::Name,
                Field::SegmentName,
                Field::ResidueName,
                Field::ChainId,
                Field::Element,
            ],
        }
    }

    /// Returns a table with an extra alias, applied after the existing ones.
    ///
    /// The field also becomes a keyword of its kind if it was not one already.
    pub fn with_alias(mut self, alias: &str, field: Field) -> Self {
        self.aliases.push((alias.to_string(), field));
        let keywords = match field.kind() {
            FieldKind::Text => &mut self.text,
            FieldKind::Integer | FieldKind::Float => &mut self.numeric,
        };
        if !keywords.contains(&field) {
            keywords.push(field);
        }
        self
    }

    /// Rewrites an alias token to its field keyword; other tokens pass through.
    pub fn rewrite<'a>(&self, token: &'a str) -> &'a str {
        self.aliases
            .iter()
            .find(|(alias, _)| alias == token)
            .map_or(token, |(_, field)| field.as_str())
    }

    /// The normalized form of a query: tokenized, with every alias rewritten.
    ///
    /// Returns `None` for input the tokenizer rejects (parentheses).
    pub fn normalize_query(&self, query: &str) -> Option<String> {
        let tokens = tokenize(query)?;
        Some(
            tokens
                .into_iter()
                .map(|t| self.rewrite(t))
                .collect::<Vec<_>>()
                .join(" "),
        )
    }

    pub fn numeric_field(&self, keyword: &str) -> Option<Field> {
        self.numeric.iter().copied().find(|f| f.as_str() == keyword)
    }

    pub fn text_field(&self, keyword: &str) -> Option<Field> {
        self.text.iter().copied().find(|f| f.as_str() == keyword)
    }
}
