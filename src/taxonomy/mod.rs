//! Event taxonomy.
//!
//! A fixed three-level vocabulary used to classify both catalog events and
//! user requests:
//!
//! | Level | Example |
//! |-------|---------|
//! | Primary category | `Music` |
//! | Secondary category | `Jazz/Blues`, `Live Music` |
//! | Interest | `Jazz`, `Acoustic` |
//!
//! The structure is nesting only: every secondary category and interest
//! belongs to exactly one primary node, and there are no cross-links.
//! Names are unique within each level.
//!
//! The built-in vocabulary is loaded once into a process-wide
//! [`LazyLock`] and shared by reference; it is never mutated after load.

mod builtin;

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

/// The three levels of the taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxonomyLevel {
    /// Top-level category.
    Primary,
    /// Second-level category.
    Secondary,
    /// Fine-grained interest.
    Interest,
}

impl TaxonomyLevel {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Interest => "interest",
        }
    }
}

impl std::fmt::Display for TaxonomyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One primary category with its nested names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyNode {
    /// Primary category name.
    pub primary: String,
    /// Secondary category names.
    #[serde(default)]
    pub secondary: Vec<String>,
    /// Interest names.
    #[serde(default)]
    pub interests: Vec<String>,
}

/// A name found in the taxonomy together with its location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxonomyEntry<'a> {
    /// Canonical spelling of the name.
    pub name: &'a str,
    /// Level the name lives on.
    pub level: TaxonomyLevel,
    /// Primary category the name is nested under (itself for primaries).
    pub primary: &'a str,
}

/// Immutable three-level vocabulary.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    nodes: Vec<TaxonomyNode>,
    /// Lowercased name → (node index, level, position), one map per level.
    index: HashMap<(TaxonomyLevel, String), (usize, usize)>,
}

static BUILTIN: LazyLock<Taxonomy> = LazyLock::new(|| {
    // The built-in data is covered by `test_builtin_is_valid`; an invalid entry
    // degrades to an unindexed duplicate rather than aborting the process.
    Taxonomy::new(builtin::nodes()).unwrap_or_else(|err| {
        tracing::error!(error = %err, "Built-in taxonomy failed validation");
        Taxonomy::unchecked(builtin::nodes())
    })
});

impl Taxonomy {
    /// Builds a taxonomy, validating that names are unique per level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if a name is empty or repeated within a level.
    pub fn new(nodes: Vec<TaxonomyNode>) -> Result<Self> {
        let mut seen: HashSet<(TaxonomyLevel, String)> = HashSet::new();
        for node in &nodes {
            let names = std::iter::once((TaxonomyLevel::Primary, &node.primary))
                .chain(node.secondary.iter().map(|s| (TaxonomyLevel::Secondary, s)))
                .chain(node.interests.iter().map(|s| (TaxonomyLevel::Interest, s)));
            for (level, name) in names {
                let key = name.trim().to_lowercase();
                if key.is_empty() {
                    return Err(Error::InvalidInput(format!(
                        "empty {level} name under '{}'",
                        node.primary
                    )));
                }
                if !seen.insert((level, key)) {
                    return Err(Error::InvalidInput(format!(
                        "duplicate {level} name '{name}'"
                    )));
                }
            }
        }
        Ok(Self::unchecked(nodes))
    }

    fn unchecked(nodes: Vec<TaxonomyNode>) -> Self {
        let mut index = HashMap::new();
        for (node_idx, node) in nodes.iter().enumerate() {
            index
                .entry((TaxonomyLevel::Primary, node.primary.to_lowercase()))
                .or_insert((node_idx, 0));
            for (pos, name) in node.secondary.iter().enumerate() {
                index
                    .entry((TaxonomyLevel::Secondary, name.to_lowercase()))
                    .or_insert((node_idx, pos));
            }
            for (pos, name) in node.interests.iter().enumerate() {
                index
                    .entry((TaxonomyLevel::Interest, name.to_lowercase()))
                    .or_insert((node_idx, pos));
            }
        }
        Self { nodes, index }
    }

    /// Returns the shared built-in vocabulary.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Parses and validates a taxonomy from a JSON array of nodes.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json(json: &str) -> Result<Self> {
        let nodes: Vec<TaxonomyNode> = serde_json::from_str(json)
            .map_err(|e| Error::InvalidInput(format!("taxonomy json: {e}")))?;
        Self::new(nodes)
    }

    /// Loads a taxonomy JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::operation("read_taxonomy_file", format!("{}: {e}", path.display()))
        })?;
        Self::from_json(&contents)
    }

    /// Returns all primary nodes.
    #[must_use]
    pub fn nodes(&self) -> &[TaxonomyNode] {
        &self.nodes
    }

    /// Finds a node by primary name (case-insensitive).
    #[must_use]
    pub fn node(&self, primary: &str) -> Option<&TaxonomyNode> {
        self.index
            .get(&(TaxonomyLevel::Primary, primary.trim().to_lowercase()))
            .map(|&(idx, _)| &self.nodes[idx])
    }

    /// Looks a name up on one level and returns its canonical spelling.
    #[must_use]
    pub fn lookup(&self, level: TaxonomyLevel, name: &str) -> Option<TaxonomyEntry<'_>> {
        let &(idx, pos) = self.index.get(&(level, name.trim().to_lowercase()))?;
        let node = &self.nodes[idx];
        let canonical = match level {
            TaxonomyLevel::Primary => node.primary.as_str(),
            TaxonomyLevel::Secondary => node.secondary[pos].as_str(),
            TaxonomyLevel::Interest => node.interests[pos].as_str(),
        };
        Some(TaxonomyEntry {
            name: canonical,
            level,
            primary: node.primary.as_str(),
        })
    }

    /// Returns whether `name` exists on `level`.
    #[must_use]
    pub fn contains(&self, level: TaxonomyLevel, name: &str) -> bool {
        self.lookup(level, name).is_some()
    }

    /// Iterates every name on every level.
    pub fn entries(&self) -> impl Iterator<Item = TaxonomyEntry<'_>> {
        self.nodes.iter().flat_map(|node| {
            let primary = node.primary.as_str();
            std::iter::once(TaxonomyEntry {
                name: primary,
                level: TaxonomyLevel::Primary,
                primary,
            })
            .chain(node.secondary.iter().map(move |s| TaxonomyEntry {
                name: s.as_str(),
                level: TaxonomyLevel::Secondary,
                primary,
            }))
            .chain(node.interests.iter().map(move |s| TaxonomyEntry {
                name: s.as_str(),
                level: TaxonomyLevel::Interest,
                primary,
            }))
        })
    }

    /// Renders the vocabulary as an indented outline for model prompts.
    #[must_use]
    pub fn outline(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            out.push_str("- ");
            out.push_str(&node.primary);
            out.push('\n');
            if !node.secondary.is_empty() {
                out.push_str("  secondary: ");
                out.push_str(&node.secondary.join(", "));
                out.push('\n');
            }
            if !node.interests.is_empty() {
                out.push_str("  interests: ");
                out.push_str(&node.interests.join(", "));
                out.push('\n');
            }
        }
        out
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(primary: &str, secondary: &[&str], interests: &[&str]) -> TaxonomyNode {
        TaxonomyNode {
            primary: primary.to_string(),
            secondary: secondary.iter().map(ToString::to_string).collect(),
            interests: interests.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_builtin_is_valid() {
        let result = Taxonomy::new(builtin::nodes());
        assert!(result.is_ok(), "built-in taxonomy invalid: {result:?}");
        assert!(Taxonomy::builtin().nodes().len() >= 10);
    }

    #[test]
    fn test_lookup_is_case_insensitive_and_canonical() {
        let taxonomy = Taxonomy::builtin();
        let entry = taxonomy
            .lookup(TaxonomyLevel::Secondary, "jazz/blues")
            .unwrap();
        assert_eq!(entry.name, "Jazz/Blues");
        assert_eq!(entry.primary, "Music");

        assert!(taxonomy.contains(TaxonomyLevel::Primary, "MUSIC"));
        assert!(!taxonomy.contains(TaxonomyLevel::Primary, "Jazz/Blues"));
    }

    #[test]
    fn test_duplicate_names_rejected_per_level() {
        let nodes = vec![
            node("Music", &["Live Music"], &["Jazz"]),
            node("Nightlife", &["Live Music"], &[]),
        ];
        let err = Taxonomy::new(nodes).unwrap_err();
        assert!(err.to_string().contains("duplicate secondary"));
    }

    #[test]
    fn test_same_name_allowed_on_different_levels() {
        let nodes = vec![node("Yoga", &["Yoga"], &["Yoga"])];
        assert!(Taxonomy::new(nodes).is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        let nodes = vec![node("Music", &["  "], &[])];
        assert!(Taxonomy::new(nodes).is_err());
    }

    #[test]
    fn test_from_json() {
        let json = r#"[{"primary": "Comedy", "secondary": ["Stand-up"], "interests": []},
                       {"primary": "Food"}]"#;
        let taxonomy = Taxonomy::from_json(json).unwrap();
        assert_eq!(taxonomy.nodes().len(), 2);
        assert!(taxonomy.node("food").unwrap().secondary.is_empty());
    }

    #[test]
    fn test_from_json_malformed() {
        assert!(matches!(
            Taxonomy::from_json("{not json"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taxonomy.json");
        std::fs::write(&path, r#"[{"primary": "Music", "secondary": ["Jazz"]}]"#).unwrap();
        let taxonomy = Taxonomy::load_from_file(&path).unwrap();
        assert!(taxonomy.contains(TaxonomyLevel::Secondary, "jazz"));

        let missing = Taxonomy::load_from_file(&dir.path().join("missing.json"));
        assert!(matches!(missing, Err(Error::OperationFailed { .. })));
    }

    #[test]
    fn test_entries_cover_all_levels() {
        let taxonomy = Taxonomy::builtin();
        let interests = taxonomy
            .entries()
            .filter(|e| e.level == TaxonomyLevel::Interest)
            .count();
        assert!(interests > 20);
        assert!(
            taxonomy
                .entries()
                .any(|e| e.name == "Jazz" && e.primary == "Music")
        );
    }

    #[test]
    fn test_outline_mentions_every_primary() {
        let taxonomy = Taxonomy::builtin();
        let outline = taxonomy.outline();
        for node in taxonomy.nodes() {
            assert!(outline.contains(&node.primary));
        }
    }
}
