use crate::errors::TransformError;
use crate::parsing::{parse_patterns, parse_query, parse_update, QueryParseError};
use crate::prefixes::PrefixMap;
use crate::query_info::{
    collect_pattern_info, collect_query_info, collect_update_info, QueryForm, QueryInfo,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Parse(#[from] QueryParseError),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error("a {expected} query is expected but the text is a {actual}")]
    UnexpectedForm { expected: QueryForm, actual: String },
    #[error("the query must use a ?{0} variable")]
    MissingVariable(String),
    #[error("the query must project a ?{0} variable")]
    MissingProjection(String),
}

/// Requirements a query text has to satisfy, checked by [`validate_query`]
/// and friends. All checks are optional and off by default.
#[derive(Debug, Clone, Default)]
pub struct QueryConstraints {
    form: Option<QueryForm>,
    required_variables: Vec<String>,
    required_projection: Vec<String>,
}

impl QueryConstraints {
    pub fn new() -> QueryConstraints {
        Default::default()
    }

    pub fn with_form(mut self, form: QueryForm) -> QueryConstraints {
        self.form = Some(form);
        self
    }

    pub fn with_required_variable(mut self, name: impl Into<String>) -> QueryConstraints {
        self.required_variables.push(name.into());
        self
    }

    pub fn with_required_projection(mut self, name: impl Into<String>) -> QueryConstraints {
        self.required_projection.push(name.into());
        self
    }
}

/// Checks `text` against the constraints and returns every violation found.
/// An empty vector means the text is valid. A text that does not parse yields
/// a single `Parse` error, since nothing else can be checked.
pub fn validate_query(
    text: &str,
    prefixes: &PrefixMap,
    constraints: &QueryConstraints,
) -> Vec<ValidationError> {
    let parsed = match parse_query(text, prefixes) {
        Ok(parsed) => parsed,
        Err(e) => return vec![e.into()],
    };
    let info = match collect_query_info(&parsed) {
        Ok(info) => info,
        Err(e) => return vec![e.into()],
    };
    check_constraints(&info, parsed.star_projection, constraints)
}

pub fn validate_update(
    text: &str,
    prefixes: &PrefixMap,
    constraints: &QueryConstraints,
) -> Vec<ValidationError> {
    let update = match parse_update(text, prefixes) {
        Ok(update) => update,
        Err(e) => return vec![e.into()],
    };
    let info = match collect_update_info(&update) {
        Ok(info) => info,
        Err(e) => return vec![e.into()],
    };
    check_constraints(&info, false, constraints)
}

pub fn validate_patterns(
    text: &str,
    prefixes: &PrefixMap,
    constraints: &QueryConstraints,
) -> Vec<ValidationError> {
    let pattern = match parse_patterns(text, prefixes) {
        Ok(pattern) => pattern,
        Err(e) => return vec![e.into()],
    };
    let info = match collect_pattern_info(&pattern) {
        Ok(info) => info,
        Err(e) => return vec![e.into()],
    };
    check_constraints(&info, false, constraints)
}

fn check_constraints(
    info: &QueryInfo,
    star_projection: bool,
    constraints: &QueryConstraints,
) -> Vec<ValidationError> {
    let mut errors = vec![];
    if let Some(expected) = constraints.form {
        if info.form != Some(expected) {
            errors.push(ValidationError::UnexpectedForm {
                expected,
                actual: match info.form {
                    Some(form) => format!("{} query", form),
                    None => "pattern fragment".to_string(),
                },
            });
        }
    }
    for name in &constraints.required_variables {
        if !info.all_variables.contains(name) {
            errors.push(ValidationError::MissingVariable(name.clone()));
        }
    }
    for name in &constraints.required_projection {
        // A star projects everything in scope, so any used variable counts.
        let satisfied = if star_projection {
            info.all_variables.contains(name)
        } else {
            info.projection_variables.contains(name)
        };
        if !satisfied {
            errors.push(ValidationError::MissingProjection(name.clone()));
        }
    }
    errors
}
