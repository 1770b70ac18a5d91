use crate::errors::TransformError;
use crate::query_context::Context;
use crate::transformer::{QueryTransformer, TermTransformer};
use oxrdf::vocab::xsd;
use oxrdf::Literal;
use regex::Regex;
use spargebra::term::TermPattern;
use spargebra::Query;

/// A textual substitution rule applied to literal lexical forms.
#[derive(Debug, Clone)]
pub struct TextReplacement {
    pattern: Regex,
    replacement: String,
}

impl TextReplacement {
    pub fn new(pattern: Regex, replacement: impl Into<String>) -> TextReplacement {
        TextReplacement {
            pattern,
            replacement: replacement.into(),
        }
    }
}

/// Rewrites the lexical form of every literal whose text matches one of the
/// replacement rules. The first matching rule wins and replaces the first
/// match of its pattern; language tags and datatypes are preserved.
pub struct TextBinder<'a> {
    replacements: &'a [TextReplacement],
}

impl<'a> TextBinder<'a> {
    pub fn new(replacements: &'a [TextReplacement]) -> TextBinder<'a> {
        TextBinder { replacements }
    }
}

impl TermTransformer for TextBinder<'_> {
    fn literal(&mut self, literal: &Literal, _context: &Context) -> Option<TermPattern> {
        let rule = self
            .replacements
            .iter()
            .find(|r| r.pattern.is_match(literal.value()))?;
        let new_value = rule
            .pattern
            .replace(literal.value(), rule.replacement.as_str())
            .into_owned();
        let new_literal = if let Some(language) = literal.language() {
            Literal::new_language_tagged_literal_unchecked(new_value, language)
        } else if literal.datatype() == xsd::STRING {
            Literal::new_simple_literal(new_value)
        } else {
            Literal::new_typed_literal(new_value, literal.datatype().into_owned())
        };
        Some(TermPattern::Literal(new_literal))
    }
}

/// Returns a copy of `query` with the text replacements applied to its
/// literals.
pub fn set_text_bindings(
    query: &Query,
    replacements: &[TextReplacement],
) -> Result<Query, TransformError> {
    if replacements.is_empty() {
        return Ok(query.clone());
    }
    let mut binder = TextBinder::new(replacements);
    QueryTransformer::new(&mut binder).transform_query(query.clone())
}
