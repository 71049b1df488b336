//! Statement-file grammar.
//!
//! ```text
//! -- name: createCard
//! INSERT INTO card (card_name, ...) VALUES (:card_name, ...);
//! ```
//!
//! A block starts at a `-- name: <identifier>` marker and runs until the next
//! marker or the end of the resource. Blank lines and other `--` lines are
//! ignored, and one trailing `;` is stripped from each statement.

use cardstack_core::{CardstackError, CardstackResult};
use regex::Regex;
use std::collections::HashSet;

const MARKER_PATTERN: &str = r"(?i)^--\s*name\s*:(.*)$";
const NAME_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_.-]*$";

/// Compiled marker-line and statement-name patterns.
struct Grammar {
    marker: Regex,
    name: Regex,
}

impl Grammar {
    fn new() -> CardstackResult<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| {
                CardstackError::internal(format!("invalid statement grammar pattern: {}", e))
            })
        };
        Ok(Self {
            marker: compile(MARKER_PATTERN)?,
            name: compile(NAME_PATTERN)?,
        })
    }

    /// `None` for lines that are not markers, `Some(Err)` for malformed ones.
    fn parse_marker(&self, trimmed: &str) -> Option<Result<String, String>> {
        let captures = self.marker.captures(trimmed)?;
        let name = captures.get(1).map_or("", |m| m.as_str()).trim();
        if name.is_empty() {
            return Some(Err("statement name is missing".to_string()));
        }
        if !self.name.is_match(name) {
            return Some(Err(format!("invalid statement name '{}'", name)));
        }
        Some(Ok(name.to_string()))
    }
}

/// A statement as it appeared in one resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedStatement {
    pub name: String,
    pub text: String,
    /// 1-based line of the name marker.
    pub line: usize,
}

struct Block<'a> {
    name: String,
    line: usize,
    lines: Vec<&'a str>,
}

/// Parses every statement block of `contents`.
///
/// `resource` only labels errors.
pub fn parse_statements(resource: &str, contents: &str) -> CardstackResult<Vec<ParsedStatement>> {
    let grammar = Grammar::new()?;
    let mut statements = Vec::new();
    let mut seen = HashSet::new();
    let mut current: Option<Block<'_>> = None;

    for (index, raw) in contents.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();

        if let Some(marker) = grammar.parse_marker(trimmed) {
            let name = marker.map_err(|message| parse_error(resource, line, message))?;
            if let Some(block) = current.take() {
                statements.push(finish(resource, block)?);
            }
            if !seen.insert(name.clone()) {
                return Err(parse_error(
                    resource,
                    line,
                    format!("statement {} is defined more than once", name),
                ));
            }
            current = Some(Block {
                name,
                line,
                lines: Vec::new(),
            });
            continue;
        }

        if trimmed.is_empty() || trimmed.starts_with("--") {
            continue;
        }

        match current.as_mut() {
            Some(block) => block.lines.push(raw.trim_end()),
            None => {
                return Err(parse_error(
                    resource,
                    line,
                    "statement text before the first '-- name:' marker",
                ))
            }
        }
    }

    if let Some(block) = current.take() {
        statements.push(finish(resource, block)?);
    }

    Ok(statements)
}

fn finish(resource: &str, block: Block<'_>) -> CardstackResult<ParsedStatement> {
    let joined = block.lines.join("\n");
    let text = joined.trim();
    let text = text.strip_suffix(';').unwrap_or(text).trim_end();

    if text.is_empty() {
        return Err(parse_error(
            resource,
            block.line,
            format!("statement {} is empty", block.name),
        ));
    }

    Ok(ParsedStatement {
        name: block.name,
        text: text.to_string(),
        line: block.line,
    })
}

fn parse_error(resource: &str, line: usize, message: impl Into<String>) -> CardstackError {
    CardstackError::Parse {
        resource: resource.to_string(),
        line,
        message: message.into(),
    }
}
