//! Rewriting of `:name` placeholders into positional `?` binds.

use super::{BindParameters, SqlValue};
use cardstack_core::{CardstackError, CardstackResult};

/// A statement ready for a positional-parameter driver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedStatement {
    /// SQL text with every placeholder replaced by `?`.
    pub sql: String,
    /// Values in placeholder order. A name used twice appears twice.
    pub values: Vec<SqlValue>,
}

/// Rewrites `:name` placeholders in `sql` and collects their values from `params`.
///
/// Quoted strings, quoted identifiers, `--`, `#` and `/* */` comments and
/// `::` casts are left untouched. A placeholder without a value is an
/// [`CardstackError::InvalidArgument`].
pub fn bind_named(sql: &str, params: &BindParameters) -> CardstackResult<NamedStatement> {
    let mut out = String::with_capacity(sql.len());
    let mut values = Vec::new();
    let mut chars = sql.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '\'' | '"' | '`' => {
                out.push(c);
                while let Some((_, q)) = chars.next() {
                    out.push(q);
                    if q == '\\' {
                        if let Some((_, escaped)) = chars.next() {
                            out.push(escaped);
                        }
                    } else if q == c {
                        break;
                    }
                }
            }
            '#' | '-' if c == '#' || sql[i..].starts_with("--") => {
                out.push(c);
                for (_, rest) in chars.by_ref() {
                    out.push(rest);
                    if rest == '\n' {
                        break;
                    }
                }
            }
            '/' if sql[i..].starts_with("/*") => {
                out.push(c);
                let mut previous = '/';
                if let Some((_, star)) = chars.next() {
                    out.push(star);
                }
                for (_, rest) in chars.by_ref() {
                    out.push(rest);
                    if previous == '*' && rest == '/' {
                        break;
                    }
                    previous = rest;
                }
            }
            ':' if sql[i..].starts_with("::") => {
                out.push_str("::");
                chars.next();
            }
            ':' if chars.peek().is_some_and(|(_, n)| is_name_start(*n)) => {
                let start = i + 1;
                let mut end = start;
                while let Some(&(j, n)) = chars.peek() {
                    if !is_name_char(n) {
                        break;
                    }
                    end = j + n.len_utf8();
                    chars.next();
                }
                let name = &sql[start..end];
                let value = params.get(name).ok_or_else(|| {
                    CardstackError::invalid_argument(format!(
                        "No value bound for placeholder :{}",
                        name
                    ))
                })?;
                values.push(value.clone());
                out.push('?');
            }
            _ => out.push(c),
        }
    }

    Ok(NamedStatement { sql: out, values })
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
