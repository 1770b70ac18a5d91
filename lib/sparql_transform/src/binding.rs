use crate::errors::TransformError;
use crate::query_context::Context;
use crate::transformer::{QueryTransformer, TermTransformer};
use oxrdf::{NamedNode, Term, Variable};
use spargebra::algebra::GraphPattern;
use spargebra::term::{GroundTerm, TermPattern};
use spargebra::{Query, Update};
use std::collections::{BTreeMap, HashMap};

/// Replacement terms for a rewrite, keyed by variable name and by IRI.
///
/// Variable keys match `?key` occurrences anywhere in the query body; IRI keys
/// match occurrences of that exact IRI. Values are concrete RDF terms.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    variables: HashMap<String, Term>,
    iris: HashMap<NamedNode, Term>,
}

impl Bindings {
    pub fn new() -> Bindings {
        Default::default()
    }

    pub fn bind_variable(mut self, name: impl Into<String>, term: impl Into<Term>) -> Bindings {
        self.variables.insert(name.into(), term.into());
        self
    }

    pub fn bind_iri(mut self, iri: NamedNode, term: impl Into<Term>) -> Bindings {
        self.iris.insert(iri, term.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty() && self.iris.is_empty()
    }
}

fn term_as_pattern(term: &Term) -> TermPattern {
    match term {
        Term::NamedNode(nn) => TermPattern::NamedNode(nn.clone()),
        Term::BlankNode(bn) => TermPattern::BlankNode(bn.clone()),
        Term::Literal(l) => TermPattern::Literal(l.clone()),
    }
}

/// Substitutes bound variables and IRIs by their replacement terms wherever
/// they occur.
pub struct VariableBinder<'a> {
    bindings: &'a Bindings,
}

impl<'a> VariableBinder<'a> {
    pub fn new(bindings: &'a Bindings) -> VariableBinder<'a> {
        VariableBinder { bindings }
    }
}

impl TermTransformer for VariableBinder<'_> {
    fn variable(&mut self, variable: &Variable, _context: &Context) -> Option<TermPattern> {
        self.bindings
            .variables
            .get(variable.as_str())
            .map(term_as_pattern)
    }

    fn named_node(&mut self, named_node: &NamedNode, _context: &Context) -> Option<TermPattern> {
        self.bindings.iris.get(named_node).map(term_as_pattern)
    }
}

/// Returns a copy of `query` with all bindings substituted. The input query is
/// left untouched, also when the substitution fails partway.
pub fn set_bindings(query: &Query, bindings: &Bindings) -> Result<Query, TransformError> {
    if bindings.is_empty() {
        return Ok(query.clone());
    }
    let mut binder = VariableBinder::new(bindings);
    QueryTransformer::new(&mut binder).transform_query(query.clone())
}

pub fn set_update_bindings(update: &Update, bindings: &Bindings) -> Result<Update, TransformError> {
    if bindings.is_empty() {
        return Ok(update.clone());
    }
    let mut binder = VariableBinder::new(bindings);
    QueryTransformer::new(&mut binder).transform_update(update.clone())
}

/// One row of parameter values. Missing columns become UNDEF in the injected
/// VALUES block.
pub type ValuesRow = BTreeMap<Variable, GroundTerm>;

/// Returns a copy of `query` with a VALUES block joined into its body, one
/// row per entry of `rows`. The block is placed beneath the solution
/// modifiers, so projection, ordering, slicing and grouping still apply to
/// the parametrized solutions.
///
/// With no rows the query is returned unchanged.
pub fn parametrize_query(query: &Query, rows: &[ValuesRow]) -> Query {
    if rows.is_empty() {
        return query.clone();
    }
    let mut variables = Vec::new();
    for row in rows {
        for v in row.keys() {
            if !variables.contains(v) {
                variables.push(v.clone());
            }
        }
    }
    let bindings = rows
        .iter()
        .map(|row| variables.iter().map(|v| row.get(v).cloned()).collect())
        .collect();
    let values = GraphPattern::Values {
        variables,
        bindings,
    };

    let mut new_query = query.clone();
    let pattern = match &mut new_query {
        Query::Select { pattern, .. }
        | Query::Construct { pattern, .. }
        | Query::Describe { pattern, .. }
        | Query::Ask { pattern, .. } => pattern,
    };
    let inner = std::mem::replace(pattern, GraphPattern::Bgp { patterns: vec![] });
    *pattern = join_beneath_modifiers(inner, values);
    new_query
}

fn join_beneath_modifiers(pattern: GraphPattern, values: GraphPattern) -> GraphPattern {
    match pattern {
        GraphPattern::Project { inner, variables } => GraphPattern::Project {
            inner: Box::new(join_beneath_modifiers(*inner, values)),
            variables,
        },
        GraphPattern::Distinct { inner } => GraphPattern::Distinct {
            inner: Box::new(join_beneath_modifiers(*inner, values)),
        },
        GraphPattern::Reduced { inner } => GraphPattern::Reduced {
            inner: Box::new(join_beneath_modifiers(*inner, values)),
        },
        GraphPattern::Slice {
            inner,
            start,
            length,
        } => GraphPattern::Slice {
            inner: Box::new(join_beneath_modifiers(*inner, values)),
            start,
            length,
        },
        GraphPattern::OrderBy { inner, expression } => GraphPattern::OrderBy {
            inner: Box::new(join_beneath_modifiers(*inner, values)),
            expression,
        },
        GraphPattern::Group {
            inner,
            variables,
            aggregates,
        } => GraphPattern::Group {
            inner: Box::new(join_beneath_modifiers(*inner, values)),
            variables,
            aggregates,
        },
        other => GraphPattern::Join {
            left: Box::new(values),
            right: Box::new(other),
        },
    }
}
