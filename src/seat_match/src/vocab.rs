//! Declared enumerations a catalog is validated against.
//!
//! A [`Vocabulary`] holds three closed term sets: reservation categories,
//! genders, and counselling phases. Terms are looked up by a normalized key
//! (uppercase, whitespace / `-` / `_` removed), so `bc_a`, `BC-A` and `Bc A`
//! all resolve to the canonical spelling `BC-A`. Aliases map display variants
//! onto one canonical term (`Boys` → `Male`).
//!
//! An axis declared with no terms does not participate in matching: windows
//! must not carry a value for it and queries must not select on it.

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// One of the three selector axes a catalog may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Reservation category (OC, SC, BC-A, ...).
    Category,
    /// Applicant gender (Male/Female, alias Boys/Girls).
    Gender,
    /// Counselling phase (Phase 1, Final Phase, ...).
    Phase,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Axis::Category => "category",
            Axis::Gender => "gender",
            Axis::Phase => "phase",
        };
        f.write_str(s)
    }
}

/// A term declaration: either a bare name or a name with aliases.
///
/// ```toml
/// categories = ["OC", "SC"]
/// genders = [{ name = "Male", aliases = ["Boys"] }]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TermCfg {
    /// Canonical name only.
    Plain(String),
    /// Canonical name plus alternative spellings.
    WithAliases {
        /// Canonical display name.
        name: String,
        /// Alternative spellings resolving to `name`.
        #[serde(default)]
        aliases: Vec<String>,
    },
}

impl TermCfg {
    fn name(&self) -> &str {
        match self {
            TermCfg::Plain(n) => n,
            TermCfg::WithAliases { name, .. } => name,
        }
    }

    fn aliases(&self) -> &[String] {
        match self {
            TermCfg::Plain(_) => &[],
            TermCfg::WithAliases { aliases, .. } => aliases,
        }
    }
}

/// The `[schema]` table of a catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VocabularyCfg {
    /// Reservation categories; empty means categories do not partition windows.
    #[serde(default)]
    pub categories: Vec<TermCfg>,
    /// Genders; empty means gender does not partition windows.
    #[serde(default)]
    pub genders: Vec<TermCfg>,
    /// Counselling phases; empty means offers carry no phase.
    #[serde(default)]
    pub phases: Vec<TermCfg>,
}

impl Default for VocabularyCfg {
    /// TS EAMCET vocabulary.
    fn default() -> Self {
        let plain = |xs: &[&str]| xs.iter().map(|s| TermCfg::Plain(s.to_string())).collect();
        Self {
            categories: plain(&[
                "OC", "SC", "ST", "BC-A", "BC-B", "BC-C", "BC-D", "BC-E", "EWS",
            ]),
            genders: vec![
                TermCfg::WithAliases {
                    name: "Male".into(),
                    aliases: vec!["Boys".into(), "M".into()],
                },
                TermCfg::WithAliases {
                    name: "Female".into(),
                    aliases: vec!["Girls".into(), "F".into()],
                },
            ],
            phases: plain(&["Phase 1", "Phase 2", "Final Phase"]),
        }
    }
}

/// Lookup key for a term: uppercase with whitespace, `-` and `_` removed.
pub fn normalize_key(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_uppercase)
        .collect()
}

/// The resolved terms of one axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terms {
    axis: Axis,
    canonical: Vec<String>,
    index: HashMap<String, usize>,
}

impl Terms {
    fn build(axis: Axis, cfg: &[TermCfg]) -> Result<Self, SchemaError> {
        let mut canonical = Vec::with_capacity(cfg.len());
        let mut index = HashMap::new();

        for term in cfg {
            let name = term.name().trim();
            if name.is_empty() {
                return Err(SchemaError::Vocabulary(format!("{axis} name cannot be empty")));
            }
            let slot = canonical.len();
            canonical.push(name.to_string());

            for spelling in std::iter::once(name).chain(term.aliases().iter().map(|a| a.trim())) {
                let key = normalize_key(spelling);
                if key.is_empty() {
                    return Err(SchemaError::Vocabulary(format!(
                        "{axis} `{name}` has an empty alias"
                    )));
                }
                if let Some(prev) = index.insert(key, slot) {
                    if prev != slot {
                        return Err(SchemaError::Vocabulary(format!(
                            "{axis} spelling `{spelling}` is declared by both `{}` and `{name}`",
                            canonical[prev]
                        )));
                    }
                }
            }
        }

        Ok(Self {
            axis,
            canonical,
            index,
        })
    }

    /// Which axis these terms belong to.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Whether the axis partitions windows (at least one term declared).
    pub fn participates(&self) -> bool {
        !self.canonical.is_empty()
    }

    /// Resolves any declared spelling to the canonical term.
    pub fn resolve(&self, raw: &str) -> Option<&str> {
        self.index
            .get(&normalize_key(raw))
            .map(|&i| self.canonical[i].as_str())
    }

    /// Canonical terms in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.canonical.iter().map(String::as_str)
    }
}

/// The declared vocabulary of a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    categories: Terms,
    genders: Terms,
    phases: Terms,
}

impl Vocabulary {
    /// Builds a vocabulary, rejecting empty names and conflicting spellings.
    pub fn from_cfg(cfg: &VocabularyCfg) -> Result<Self, SchemaError> {
        Ok(Self {
            categories: Terms::build(Axis::Category, &cfg.categories)?,
            genders: Terms::build(Axis::Gender, &cfg.genders)?,
            phases: Terms::build(Axis::Phase, &cfg.phases)?,
        })
    }

    /// The default TS EAMCET vocabulary.
    pub fn eamcet() -> Self {
        // The default table is static and conflict-free.
        match Self::from_cfg(&VocabularyCfg::default()) {
            Ok(v) => v,
            Err(e) => unreachable!("default vocabulary is invalid: {e}"),
        }
    }

    /// Terms for one axis.
    pub fn terms(&self, axis: Axis) -> &Terms {
        match axis {
            Axis::Category => &self.categories,
            Axis::Gender => &self.genders,
            Axis::Phase => &self.phases,
        }
    }

    /// Shorthand for `self.terms(axis).resolve(raw)`.
    pub fn resolve(&self, axis: Axis, raw: &str) -> Option<&str> {
        self.terms(axis).resolve(raw)
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::eamcet()
    }
}
