use crate::prefixes::PrefixMap;
use oxrdf::NamedNode;
use regex::Regex;
use spargebra::algebra::GraphPattern;
use spargebra::{Query, SparqlSyntaxError, Update};
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryParseError {
    #[error(transparent)]
    Syntax(#[from] SparqlSyntaxError),
    #[error("the text is not a graph pattern fragment")]
    NotAPatternFragment,
}

/// A parsed query together with the prefixes in scope for it.
///
/// `star_projection` records whether the query text used `SELECT *`. The
/// parser expands the star into the list of in-scope variables, so this is
/// the only place the distinction survives.
#[derive(Debug, Clone)]
pub struct ParsedQuery {
    pub query: Query,
    pub prefixes: PrefixMap,
    pub star_projection: bool,
}

fn prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bprefix\s+([A-Za-z][\w.-]*)?:\s*<([^>]*)>").unwrap())
}

fn select_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bselect\b").unwrap())
}

fn star_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bselect\s+(?:distinct\s+|reduced\s+)?\*").unwrap())
}

/// Parses a query with `base_prefixes` in scope. Prefixes declared in the
/// text itself are layered on top and win over the base declarations.
pub fn parse_query(text: &str, base_prefixes: &PrefixMap) -> Result<ParsedQuery, QueryParseError> {
    let stripped = strip_comments(text);
    let mut prefixes = base_prefixes.clone();
    for caps in prefix_regex().captures_iter(&stripped) {
        let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        if let Ok(iri) = NamedNode::new(&caps[2]) {
            prefixes.declare(prefix, iri);
        }
    }
    let full_text = format!("{}{}", base_prefixes.declarations(), text);
    let query = Query::parse(&full_text, None)?;
    Ok(ParsedQuery {
        query,
        prefixes,
        star_projection: has_star_projection(&stripped),
    })
}

pub fn parse_update(text: &str, base_prefixes: &PrefixMap) -> Result<Update, QueryParseError> {
    let full_text = format!("{}{}", base_prefixes.declarations(), text);
    Ok(Update::parse(&full_text, None)?)
}

/// Parses a bare group graph pattern fragment, such as the body of a WHERE
/// clause, by wrapping it in a SELECT and stripping the projection again.
pub fn parse_patterns(
    text: &str,
    base_prefixes: &PrefixMap,
) -> Result<GraphPattern, QueryParseError> {
    let wrapped = format!("SELECT * WHERE {{\n{}\n}}", text);
    let parsed = parse_query(&wrapped, base_prefixes)?;
    match parsed.query {
        Query::Select {
            pattern: GraphPattern::Project { inner, .. },
            ..
        } => Ok(*inner),
        _ => Err(QueryParseError::NotAPatternFragment),
    }
}

// The first SELECT keyword in comment-stripped text belongs to the outer
// query, so the star check only has to look at that occurrence. String
// literal and IRI contents are blanked out first so the keyword scan cannot
// match inside them.
fn has_star_projection(stripped: &str) -> bool {
    let masked = mask_delimited(stripped);
    match (select_regex().find(&masked), star_regex().find(&masked)) {
        (Some(select), Some(star)) => select.start() == star.start(),
        _ => false,
    }
}

/// Replaces string literal and IRI contents by spaces, keeping the
/// delimiters and all positions intact.
fn mask_delimited(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut delimiter: Option<char> = None;
    while let Some(c) = chars.next() {
        match delimiter {
            Some(d) => {
                if d != '>' && c == '\\' {
                    out.push(' ');
                    if chars.next().is_some() {
                        out.push(' ');
                    }
                } else if c == d {
                    delimiter = None;
                    out.push(c);
                } else {
                    out.push(if c == '\n' { '\n' } else { ' ' });
                }
            }
            None => {
                match c {
                    '"' | '\'' => delimiter = Some(c),
                    '<' => {
                        if chars
                            .peek()
                            .is_some_and(|n| !n.is_whitespace() && *n != '=' && *n != '<')
                        {
                            delimiter = Some('>');
                        }
                    }
                    _ => {}
                }
                out.push(c);
            }
        }
    }
    out
}

/// Removes `#` comments while leaving string literals and IRIs intact.
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut delimiter: Option<char> = None;
    while let Some(c) = chars.next() {
        match delimiter {
            Some(d) => {
                out.push(c);
                if d != '>' && c == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if c == d {
                    delimiter = None;
                }
            }
            None => match c {
                '#' => {
                    for n in chars.by_ref() {
                        if n == '\n' {
                            out.push('\n');
                            break;
                        }
                    }
                }
                '"' | '\'' => {
                    delimiter = Some(c);
                    out.push(c);
                }
                '<' => {
                    // Only an IRI opener when it does not read as a comparison
                    // operator.
                    if chars
                        .peek()
                        .is_some_and(|n| !n.is_whitespace() && *n != '=' && *n != '<')
                    {
                        delimiter = Some('>');
                    }
                    out.push(c);
                }
                _ => out.push(c),
            },
        }
    }
    out
}
