//! Rewriting, inspection and validation of SPARQL queries as parsed trees.
//!
//! The core is a generic walk over `spargebra` queries and updates driven by
//! term-level hooks, see [`transformer`]. On top of it sit concrete rewrites
//! (variable and IRI [`binding`], literal [`text_binding`]) and read-only
//! inspection ([`query_info`], [`validation`]).

pub mod binding;
pub mod errors;
pub mod parsing;
pub mod prefixes;
pub mod query_context;
pub mod query_info;
pub mod text_binding;
pub mod transformer;
pub mod validation;

pub use binding::{
    parametrize_query, set_bindings, set_update_bindings, Bindings, ValuesRow, VariableBinder,
};
pub use errors::TransformError;
pub use parsing::{parse_patterns, parse_query, parse_update, ParsedQuery, QueryParseError};
pub use prefixes::PrefixMap;
pub use query_info::{collect_pattern_info, collect_query_info, collect_update_info, QueryForm, QueryInfo};
pub use text_binding::{set_text_bindings, TextBinder, TextReplacement};
pub use transformer::{QueryTransformer, TermTransformer};
pub use validation::{validate_patterns, validate_query, validate_update, QueryConstraints, ValidationError};
