//! Named SQL statement registry.

use super::parser::{parse_statements, ParsedStatement};
use cardstack_core::{CardstackError, CardstackResult};
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

/// A loaded statement and the resource it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatementDefinition {
    pub name: String,
    pub text: String,
    pub resource: String,
}

/// In-memory table of named SQL statements.
///
/// Built once at startup and shared read-only through `Arc`. Names form one
/// namespace across every loaded resource; when two resources define the same
/// name the one loaded last wins.
#[derive(Clone, Debug, Default)]
pub struct SqlStatementRegistry {
    statements: HashMap<String, StatementDefinition>,
}

impl SqlStatementRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry loaded from `locations`.
    pub fn from_locations<I, S>(locations: I) -> CardstackResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::new();
        registry.load(locations)?;
        Ok(registry)
    }

    /// Loads every resource matching `locations`, in order.
    ///
    /// A location is a file path whose final component may contain `*` and
    /// `?` wildcards; matches load in lexical order. Nothing is registered
    /// unless every resource reads and parses.
    pub fn load<I, S>(&mut self, locations: I) -> CardstackResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut staged = Vec::new();
        for location in locations {
            for path in resolve_location(location.as_ref())? {
                let resource = path.display().to_string();
                debug!("Reading sql resource {}", resource);
                let contents =
                    fs::read_to_string(&path).map_err(|e| CardstackError::ResourceRead {
                        location: resource.clone(),
                        message: e.to_string(),
                    })?;
                let statements = parse_statements(&resource, &contents)?;
                staged.push((resource, statements));
            }
        }

        for (resource, statements) in staged {
            self.merge(&resource, statements);
        }
        info!("Sql statement registry holds {} statements", self.statements.len());
        Ok(())
    }

    /// Loads statements from in-process text labelled `resource`.
    pub fn load_str(&mut self, resource: &str, contents: &str) -> CardstackResult<()> {
        let statements = parse_statements(resource, contents)?;
        self.merge(resource, statements);
        Ok(())
    }

    fn merge(&mut self, resource: &str, statements: Vec<ParsedStatement>) {
        if statements.is_empty() {
            warn!("Sql resource {} defines no statements", resource);
        }
        for statement in statements {
            let definition = StatementDefinition {
                name: statement.name.clone(),
                text: statement.text,
                resource: resource.to_string(),
            };
            if let Some(previous) = self.statements.insert(statement.name, definition) {
                warn!(
                    "Statement {} from {} overrides the definition from {}",
                    previous.name, resource, previous.resource
                );
            }
        }
    }

    /// Returns the text of the statement called `name`.
    pub fn get(&self, name: &str) -> CardstackResult<&str> {
        trace!("Looking up sql statement {}", name);
        self.statements
            .get(name)
            .map(|definition| definition.text.as_str())
            .ok_or_else(|| CardstackError::StatementNotFound(name.to_string()))
    }

    /// Returns the full definition of the statement called `name`.
    #[must_use]
    pub fn definition(&self, name: &str) -> Option<&StatementDefinition> {
        self.statements.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.statements.contains_key(name)
    }

    /// Fails with the first of `names` that is not loaded.
    pub fn require<S: AsRef<str>>(&self, names: &[S]) -> CardstackResult<()> {
        for name in names {
            self.get(name.as_ref())?;
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Statement names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.statements.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn resolve_location(location: &str) -> CardstackResult<Vec<PathBuf>> {
    let path = Path::new(location);
    let Some(file_pattern) = path.file_name().and_then(|name| name.to_str()) else {
        return Err(resource_error(location, "location does not name a file"));
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if dir.to_str().is_some_and(has_wildcard) {
        return Err(resource_error(
            location,
            "wildcards are only supported in the final path component",
        ));
    }

    if !has_wildcard(file_pattern) {
        return Ok(vec![path.to_path_buf()]);
    }

    let matcher = wildcard_regex(file_pattern)
        .map_err(|e| resource_error(location, format!("invalid pattern: {}", e)))?;

    let entries = fs::read_dir(dir).map_err(|e| resource_error(location, e.to_string()))?;
    let mut matches = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| resource_error(location, e.to_string()))?;
        let entry_path = entry.path();
        let is_match = entry
            .file_name()
            .to_str()
            .is_some_and(|name| matcher.is_match(name));
        if is_match && entry_path.is_file() {
            matches.push(entry_path);
        }
    }

    if matches.is_empty() {
        return Err(resource_error(location, "pattern matched no resources"));
    }
    matches.sort();
    Ok(matches)
}

fn has_wildcard(s: &str) -> bool {
    s.contains(['*', '?'])
}

fn wildcard_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let mut expr = String::from("^");
    for c in pattern.chars() {
        match c {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            other => expr.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    expr.push('$');
    Regex::new(&expr)
}

fn resource_error(location: &str, message: impl Into<String>) -> CardstackError {
    CardstackError::ResourceRead {
        location: location.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, contents: &str) -> String {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path.to_string_lossy().to_string()
    }

    fn pattern(dir: &TempDir, file_pattern: &str) -> String {
        dir.path().join(file_pattern).to_string_lossy().to_string()
    }

    #[test]
    fn test_disjoint_resources_both_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.sql", "-- name: readCard\nSELECT 1");
        let b = write(dir.path(), "b.sql", "-- name: deleteCard\nDELETE FROM card");

        let registry = SqlStatementRegistry::from_locations([a, b]).unwrap();

        assert_eq!(registry.get("readCard").unwrap(), "SELECT 1");
        assert_eq!(registry.get("deleteCard").unwrap(), "DELETE FROM card");
        assert_eq!(registry.names(), vec!["deleteCard", "readCard"]);
    }

    #[test]
    fn test_unknown_name() {
        let registry = SqlStatementRegistry::new();
        let err = registry.get("readCard").unwrap_err();
        assert!(matches!(err, CardstackError::StatementNotFound(ref name) if name == "readCard"));
        assert_eq!(
            err.to_string(),
            "No SQL statement with name readCard found in store"
        );
    }

    #[test]
    fn test_wildcard_loads_in_lexical_order_and_last_wins() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "02-override.sql", "-- name: readCard\nSELECT 2");
        write(dir.path(), "01-base.sql", "-- name: readCard\nSELECT 1\n-- name: deleteCard\nDELETE");
        write(dir.path(), "notes.txt", "not sql");

        let registry = SqlStatementRegistry::from_locations([pattern(&dir, "*.sql")]).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("readCard").unwrap(), "SELECT 2");
        assert!(registry
            .definition("readCard")
            .unwrap()
            .resource
            .ends_with("02-override.sql"));
    }

    #[test]
    fn test_question_mark_wildcard() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "v1.sql", "-- name: a\nSELECT 1");
        write(dir.path(), "v10.sql", "-- name: b\nSELECT 2");

        let registry = SqlStatementRegistry::from_locations([pattern(&dir, "v?.sql")]).unwrap();

        assert!(registry.contains("a"));
        assert!(!registry.contains("b"));
    }

    #[test]
    fn test_missing_file_is_resource_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = SqlStatementRegistry::from_locations([pattern(&dir, "absent.sql")]);
        assert!(matches!(result, Err(CardstackError::ResourceRead { .. })));
    }

    #[test]
    fn test_pattern_without_matches_is_resource_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = SqlStatementRegistry::from_locations([pattern(&dir, "*.sql")]);
        assert!(matches!(
            result,
            Err(CardstackError::ResourceRead { message, .. }) if message.contains("no resources")
        ));
    }

    #[test]
    fn test_wildcard_in_directory_is_rejected() {
        let result = SqlStatementRegistry::from_locations(["sql*/card.sql"]);
        assert!(matches!(
            result,
            Err(CardstackError::ResourceRead { message, .. }) if message.contains("final path component")
        ));
    }

    #[test]
    fn test_failed_load_registers_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(dir.path(), "good.sql", "-- name: readCard\nSELECT 1");
        let bad = write(dir.path(), "bad.sql", "SELECT before marker");

        let mut registry = SqlStatementRegistry::new();
        registry.load_str("inline", "-- name: existing\nSELECT 0").unwrap();

        let result = registry.load([good, bad]);

        assert!(matches!(result, Err(CardstackError::Parse { .. })));
        assert_eq!(registry.names(), vec!["existing"]);
    }

    #[test]
    fn test_require_reports_first_missing() {
        let mut registry = SqlStatementRegistry::new();
        registry
            .load_str("inline", "-- name: createCard\nINSERT\n-- name: readCard\nSELECT")
            .unwrap();

        assert!(registry.require(&["createCard", "readCard"]).is_ok());
        let err = registry
            .require(&["createCard", "updateCard", "deleteCard"])
            .unwrap_err();
        assert!(matches!(err, CardstackError::StatementNotFound(name) if name == "updateCard"));
    }

    #[test]
    fn test_bundled_card_statements_parse() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../sql/card.sql");
        let registry = SqlStatementRegistry::from_locations([path]).unwrap();
        registry
            .require(&["createCard", "readCard", "updateCard", "deleteCard"])
            .unwrap();
    }
}
