use super::{QueryTransformer, TermTransformer};
use crate::errors::TransformError;
use crate::query_context::{Context, PathEntry};
use oxrdf::{NamedNode, Variable};
use spargebra::algebra::PropertyPathExpression;
use spargebra::term::{
    GroundTerm, GroundTermPattern, NamedNodePattern, TermPattern, TriplePattern,
};
use std::fmt;

pub(crate) fn unexpected(
    expected: &'static str,
    context: &Context,
    actual: impl fmt::Display,
) -> TransformError {
    TransformError::UnexpectedTermKind {
        expected,
        position: context.to_string(),
        actual: actual.to_string(),
    }
}

impl<T: TermTransformer> QueryTransformer<'_, T> {
    pub fn transform_triple_pattern(
        &mut self,
        triple: TriplePattern,
        context: &Context,
    ) -> Result<TriplePattern, TransformError> {
        let TriplePattern {
            subject,
            predicate,
            object,
        } = triple;
        Ok(TriplePattern {
            subject: self
                .visit_term_pattern(subject, &context.extension_with(PathEntry::TripleSubject)),
            predicate: self.visit_named_node_pattern(
                predicate,
                &context.extension_with(PathEntry::TriplePredicate),
            )?,
            object: self
                .visit_term_pattern(object, &context.extension_with(PathEntry::TripleObject)),
        })
    }

    pub fn transform_property_path(
        &mut self,
        path: PropertyPathExpression,
        context: &Context,
    ) -> Result<PropertyPathExpression, TransformError> {
        Ok(match path {
            PropertyPathExpression::NamedNode(nn) => {
                PropertyPathExpression::NamedNode(self.visit_iri(nn, context)?)
            }
            PropertyPathExpression::Reverse(inner) => PropertyPathExpression::Reverse(Box::new(
                self.transform_property_path(*inner, context)?,
            )),
            PropertyPathExpression::Sequence(left, right) => PropertyPathExpression::Sequence(
                Box::new(self.transform_property_path(*left, context)?),
                Box::new(self.transform_property_path(*right, context)?),
            ),
            PropertyPathExpression::Alternative(left, right) => {
                PropertyPathExpression::Alternative(
                    Box::new(self.transform_property_path(*left, context)?),
                    Box::new(self.transform_property_path(*right, context)?),
                )
            }
            PropertyPathExpression::ZeroOrMore(inner) => PropertyPathExpression::ZeroOrMore(
                Box::new(self.transform_property_path(*inner, context)?),
            ),
            PropertyPathExpression::OneOrMore(inner) => PropertyPathExpression::OneOrMore(
                Box::new(self.transform_property_path(*inner, context)?),
            ),
            PropertyPathExpression::ZeroOrOne(inner) => PropertyPathExpression::ZeroOrOne(
                Box::new(self.transform_property_path(*inner, context)?),
            ),
            PropertyPathExpression::NegatedPropertySet(nns) => {
                let mut new_nns = Vec::with_capacity(nns.len());
                for nn in nns {
                    new_nns.push(self.visit_iri(nn, context)?);
                }
                PropertyPathExpression::NegatedPropertySet(new_nns)
            }
        })
    }

    // Subject and object slots admit any term kind, so replacement here is
    // unconditional.
    pub(crate) fn visit_term_pattern(
        &mut self,
        term: TermPattern,
        context: &Context,
    ) -> TermPattern {
        let replacement = match &term {
            TermPattern::NamedNode(nn) => self.transformer.named_node(nn, context),
            TermPattern::BlankNode(bn) => self.transformer.blank_node(bn, context),
            TermPattern::Literal(l) => self.transformer.literal(l, context),
            TermPattern::Variable(v) => self.transformer.variable(v, context),
        };
        replacement.unwrap_or(term)
    }

    pub(crate) fn visit_named_node_pattern(
        &mut self,
        pattern: NamedNodePattern,
        context: &Context,
    ) -> Result<NamedNodePattern, TransformError> {
        let replacement = match &pattern {
            NamedNodePattern::NamedNode(nn) => self.transformer.named_node(nn, context),
            NamedNodePattern::Variable(v) => self.transformer.variable(v, context),
        };
        match replacement {
            None => Ok(pattern),
            Some(TermPattern::NamedNode(nn)) => Ok(NamedNodePattern::NamedNode(nn)),
            Some(TermPattern::Variable(v)) => Ok(NamedNodePattern::Variable(v)),
            Some(other) => Err(unexpected("an IRI or a variable", context, other)),
        }
    }

    pub(crate) fn visit_iri(
        &mut self,
        named_node: NamedNode,
        context: &Context,
    ) -> Result<NamedNode, TransformError> {
        match self.transformer.named_node(&named_node, context) {
            None => Ok(named_node),
            Some(TermPattern::NamedNode(nn)) => Ok(nn),
            Some(other) => Err(unexpected("an IRI", context, other)),
        }
    }

    // Positions that must stay variables and where a non-variable replacement
    // is a contract violation, such as BIND targets and VALUES columns.
    pub(crate) fn visit_strict_variable(
        &mut self,
        variable: Variable,
        context: &Context,
    ) -> Result<Variable, TransformError> {
        match self.transformer.variable(&variable, context) {
            None => Ok(variable),
            Some(TermPattern::Variable(v)) => Ok(v),
            Some(other) => Err(unexpected("a variable", context, other)),
        }
    }

    // Positions that must stay variables but where a term replacement simply
    // does not apply: projections, GROUP BY variables, BOUND arguments.
    // Binding a projected variable rewrites its occurrences in the body while
    // the projection itself keeps the name.
    pub(crate) fn visit_lenient_variable(
        &mut self,
        variable: Variable,
        context: &Context,
    ) -> Variable {
        match self.transformer.variable(&variable, context) {
            None => variable,
            Some(TermPattern::Variable(v)) => v,
            Some(other) => {
                log::warn!(
                    "Skipping replacement of ?{} by `{}` at {}: only a variable can appear here",
                    variable.as_str(),
                    other,
                    context
                );
                variable
            }
        }
    }

    pub(crate) fn visit_ground_term(
        &mut self,
        term: GroundTerm,
        context: &Context,
    ) -> Result<GroundTerm, TransformError> {
        let replacement = match &term {
            GroundTerm::NamedNode(nn) => self.transformer.named_node(nn, context),
            GroundTerm::Literal(l) => self.transformer.literal(l, context),
        };
        match replacement {
            None => Ok(term),
            Some(TermPattern::NamedNode(nn)) => Ok(GroundTerm::NamedNode(nn)),
            Some(TermPattern::Literal(l)) => Ok(GroundTerm::Literal(l)),
            Some(other) => Err(unexpected("a ground term (IRI or literal)", context, other)),
        }
    }

    pub(crate) fn visit_ground_term_pattern(
        &mut self,
        term: GroundTermPattern,
        context: &Context,
    ) -> Result<GroundTermPattern, TransformError> {
        let replacement = match &term {
            GroundTermPattern::NamedNode(nn) => self.transformer.named_node(nn, context),
            GroundTermPattern::Literal(l) => self.transformer.literal(l, context),
            GroundTermPattern::Variable(v) => self.transformer.variable(v, context),
        };
        match replacement {
            None => Ok(term),
            Some(TermPattern::NamedNode(nn)) => Ok(GroundTermPattern::NamedNode(nn)),
            Some(TermPattern::Literal(l)) => Ok(GroundTermPattern::Literal(l)),
            Some(TermPattern::Variable(v)) => Ok(GroundTermPattern::Variable(v)),
            Some(other) => Err(unexpected(
                "an IRI, literal or variable",
                context,
                other,
            )),
        }
    }
}
