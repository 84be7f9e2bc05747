use crate::core::models::atom::ResidueNamed;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

/// Side-chain chemistry class of a residue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ResidueCategory {
    Aliphatic,
    Aromatic,
    Basic,
    Acidic,
    Amide,
    Sulfuric,
    Hydroxylic,
    Cyclic,
}

#[derive(Debug, Error)]
#[error("Invalid residue category string")]
pub struct ParseResidueCategoryError;

impl FromStr for ResidueCategory {
    type Err = ParseResidueCategoryError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aliphatic" => Ok(ResidueCategory::Aliphatic),
            "aromatic" => Ok(ResidueCategory::Aromatic),
            "basic" => Ok(ResidueCategory::Basic),
            "acidic" => Ok(ResidueCategory::Acidic),
            "amide" => Ok(ResidueCategory::Amide),
            "sulfuric" => Ok(ResidueCategory::Sulfuric),
            "hydroxylic" => Ok(ResidueCategory::Hydroxylic),
            "cyclic" => Ok(ResidueCategory::Cyclic),
            _ => Err(ParseResidueCategoryError),
        }
    }
}

impl fmt::Display for ResidueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ResidueCategory::Aliphatic => "Aliphatic",
                ResidueCategory::Aromatic => "Aromatic",
                ResidueCategory::Basic => "Basic",
                ResidueCategory::Acidic => "Acidic",
                ResidueCategory::Amide => "Amide",
                ResidueCategory::Sulfuric => "Sulfuric",
                ResidueCategory::Hydroxylic => "Hydroxylic",
                ResidueCategory::Cyclic => "Cyclic",
            }
        )
    }
}

/// Chemical properties of one residue type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResidueProperties {
    pub name: String,
    pub one_letter: char,
    pub category: ResidueCategory,
    pub polar: bool,
    pub hydrophobic: bool,
    pub mono_isotopic_mass: f64,
    pub average_mass: f64,
    pub charge: i32,
}

#[derive(Debug, Error)]
pub enum ChemistryLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error: {source}")]
    Toml {
        #[from]
        source: toml::de::Error,
    },
    #[error("Invalid residue entry '{code}': {reason}")]
    Invalid { code: String, reason: String },
}

/// Immutable lookup table from residue codes to their chemistry.
///
/// Keys are canonical upper-case residue codes. The built-in table covers the 20
/// standard amino acids plus the CHARMM/AMBER histidine protonation states and is
/// shared process-wide through [`ChemistryTable::standard`].
#[derive(Debug, Clone, Default)]
pub struct ChemistryTable {
    entries: HashMap<String, ResidueProperties>,
}

static STANDARD_TABLE: LazyLock<ChemistryTable> = LazyLock::new(ChemistryTable::builtin);

#[rustfmt::skip]
const BUILTIN_RESIDUES: &[(&str, &str, char, ResidueCategory, bool, bool, f64, f64, i32)] = {
    use ResidueCategory::*;
    &[
        // code, name, one-letter, category, polar, hydrophobic, mono-isotopic, average, charge
        ("ALA", "Alanine",       'A', Aliphatic,  false, true,   71.03711,  71.0779,  0),
        ("ARG", "Arginine",      'R', Basic,      true,  false, 156.10111, 156.1857,  1),
        ("ASN", "Asparagine",    'N', Amide,      true,  false, 114.04293, 114.1026,  0),
        ("ASP", "Aspartic acid", 'D', Acidic,     true,  false, 115.02694, 115.0874, -1),
        ("CYS", "Cysteine",      'C', Sulfuric,   false, false, 103.00919, 103.1429,  0),
        ("GLN", "Glutamine",     'Q', Amide,      true,  false, 128.05858, 128.1292,  0),
        ("GLU", "Glutamic acid", 'E', Acidic,     true,  false, 129.04259, 129.1140, -1),
        ("GLY", "Glycine",       'G', Aliphatic,  false, false,  57.02146,  57.0513,  0),
        ("HIS", "Histidine",     'H', Aromatic,   true,  false, 137.05891, 137.1393,  0),
        ("ILE", "Isoleucine",    'I', Aliphatic,  false, true,  113.08406, 113.1576,  0),
        ("LEU", "Leucine",       'L', Aliphatic,  false, true,  113.08406, 113.1576,  0),
        ("LYS", "Lysine",        'K', Basic,      true,  false, 128.09496, 128.1723,  1),
        ("MET", "Methionine",    'M', Sulfuric,   false, true,  131.04049, 131.1961,  0),
        ("PHE", "Phenylalanine", 'F', Aromatic,   false, true,  147.06841, 147.1739,  0),
        ("PRO", "Proline",       'P', Cyclic,     false, false,  97.05276,  97.1152,  0),
        ("SER", "Serine",        'S', Hydroxylic, true,  false,  87.03203,  87.0773,  0),
        ("THR", "Threonine",     'T', Hydroxylic, true,  false, 101.04768, 101.1039,  0),
        ("TRP", "Tryptophan",    'W', Aromatic,   false, true,  186.07931, 186.2099,  0),
        ("TYR", "Tyrosine",      'Y', Aromatic,   true,  false, 163.06333, 163.1733,  0),
        ("VAL", "Valine",        'V', Aliphatic,  false, true,   99.06841,  99.1311,  0),
        // Force-field protonation states of histidine.
        ("HSD", "Histidine (delta-protonated)",   'H', Aromatic, true, false, 137.05891, 137.1393, 0),
        ("HID", "Histidine (AMBER delta)",        'H', Aromatic, true, false, 137.05891, 137.1393, 0),
        ("HSE", "Histidine (epsilon-protonated)", 'H', Aromatic, true, false, 137.05891, 137.1393, 0),
        ("HIE", "Histidine (AMBER epsilon)",      'H', Aromatic, true, false, 137.05891, 137.1393, 0),
        ("HSP", "Histidine (doubly protonated)",  'H', Basic,    true, false, 138.06619, 138.1472, 1),
        ("HIP", "Histidine (AMBER protonated)",   'H', Basic,    true, false, 138.06619, 138.1472, 1),
    ]
};

// Canonical codes win one-letter lookups over the protonation aliases that share a letter.
const CANONICAL_CODES: usize = 20;

impl ChemistryTable {
    /// The built-in table shared by the whole process.
    pub fn standard() -> &'static ChemistryTable {
        &STANDARD_TABLE
    }

    fn builtin() -> Self {
        let entries = BUILTIN_RESIDUES
            .iter()
            .map(
                |&(code, name, one_letter, category, polar, hydrophobic, mono, average, charge)| {
                    (
                        code.to_string(),
                        ResidueProperties {
                            name: name.to_string(),
                            one_letter,
                            category,
                            polar,
                            hydrophobic,
                            mono_isotopic_mass: mono,
                            average_mass: average,
                            charge,
                        },
                    )
                },
            )
            .collect();
        Self { entries }
    }

    /// Loads a custom table from a TOML file with one `[CODE]` table per residue.
    pub fn load(path: &Path) -> Result<Self, ChemistryLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ChemistryLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ChemistryLoadError> {
        let raw: HashMap<String, ResidueProperties> = toml::from_str(content)?;
        let mut entries = HashMap::with_capacity(raw.len());
        for (code, properties) in raw {
            let canonical = code.trim().to_ascii_uppercase();
            if canonical.is_empty() {
                return Err(ChemistryLoadError::Invalid {
                    code,
                    reason: "residue code is empty".into(),
                });
            }
            if !properties.one_letter.is_ascii_alphabetic() {
                return Err(ChemistryLoadError::Invalid {
                    code,
                    reason: format!("'{}' is not a one-letter code", properties.one_letter),
                });
            }
            if entries.insert(canonical.clone(), properties).is_some() {
                return Err(ChemistryLoadError::Invalid {
                    code: canonical,
                    reason: "duplicate residue code".into(),
                });
            }
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a residue by code, upper-casing it first.
    pub fn get(&self, code: &str) -> Option<&ResidueProperties> {
        match self.entries.get(code) {
            Some(properties) => Some(properties),
            None => self.entries.get(&code.trim().to_ascii_uppercase()),
        }
    }

    /// Resolves a one-letter code, three-letter code or full name to its table entry.
    ///
    /// Matching is case-insensitive and tried in priority order: canonical code,
    /// then one-letter code, then full name. Returns the canonical code with the
    /// properties.
    pub fn resolve(&self, query: &str) -> Option<(&str, &ResidueProperties)> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        let upper = query.to_ascii_uppercase();
        if let Some((code, properties)) = self.entries.get_key_value(&upper) {
            return Some((code.as_str(), properties));
        }
        let mut chars = upper.chars();
        if let (Some(letter), None) = (chars.next(), chars.next()) {
            let mut candidates: Vec<_> = self
                .entries
                .iter()
                .filter(|(_, p)| p.one_letter.to_ascii_uppercase() == letter)
                .collect();
            // Prefer the canonical 20, then the lexicographically first alias.
            candidates.sort_by(|a, b| {
                (!self.is_canonical(a.0), a.0).cmp(&(!self.is_canonical(b.0), b.0))
            });
            if let Some((code, properties)) = candidates.into_iter().next() {
                return Some((code.as_str(), properties));
            }
        }
        self.entries
            .iter()
            .find(|(_, p)| p.name.eq_ignore_ascii_case(query))
            .map(|(code, properties)| (code.as_str(), properties))
    }

    fn is_canonical(&self, code: &str) -> bool {
        BUILTIN_RESIDUES[..CANONICAL_CODES]
            .iter()
            .any(|entry| entry.0 == code)
    }

    fn category_is(&self, item: &impl ResidueNamed, category: ResidueCategory) -> bool {
        self.get(item.residue_name())
            .is_some_and(|p| p.category == category)
    }

    pub fn is_protein(&self, item: &impl ResidueNamed) -> bool {
        self.get(item.residue_name()).is_some()
    }

    pub fn is_acidic(&self, item: &impl ResidueNamed) -> bool {
        self.category_is(item, ResidueCategory::Acidic)
    }

    pub fn is_aliphatic(&self, item: &impl ResidueNamed) -> bool {
        self.category_is(item, ResidueCategory::Aliphatic)
    }

    pub fn is_aromatic(&self, item: &impl ResidueNamed) -> bool {
        self.category_is(item, ResidueCategory::Aromatic)
    }

    pub fn is_basic(&self, item: &impl ResidueNamed) -> bool {
        self.category_is(item, ResidueCategory::Basic)
    }

    pub fn is_charged(&self, item: &impl ResidueNamed) -> bool {
        self.get(item.residue_name()).is_some_and(|p| p.charge != 0)
    }

    pub fn is_neutral(&self, item: &impl ResidueNamed) -> bool {
        self.get(item.residue_name()).is_some_and(|p| p.charge == 0)
    }

    pub fn is_hydrophobic(&self, item: &impl ResidueNamed) -> bool {
        self.get(item.residue_name()).is_some_and(|p| p.hydrophobic)
    }

    pub fn is_polar(&self, item: &impl ResidueNamed) -> bool {
        self.get(item.residue_name()).is_some_and(|p| p.polar)
    }

    pub fn is_nonpolar(&self, item: &impl ResidueNamed) -> bool {
        self.get(item.residue_name()).is_some_and(|p| !p.polar)
    }
}
