mod expressions;
mod graph_patterns;
mod terms;
mod update_operations;

use crate::errors::TransformError;
use crate::query_context::{Context, PathEntry};
use oxrdf::{BlankNode, Literal, NamedNode, Variable};
use spargebra::algebra::QueryDataset;
use spargebra::term::TermPattern;
use spargebra::{Query, Update};

/// Term-level rewrite hooks invoked by [`QueryTransformer`] at every leaf of
/// the tree. Returning `None` keeps the visited term as it is; returning a
/// replacement substitutes it, subject to the coercion rules of the position
/// it occupies (a predicate slot rejects literals, a FROM clause rejects
/// everything but IRIs, and so on).
///
/// Implementations override only the hooks relevant to their rewrite.
pub trait TermTransformer {
    fn variable(&mut self, _variable: &Variable, _context: &Context) -> Option<TermPattern> {
        None
    }

    fn named_node(&mut self, _named_node: &NamedNode, _context: &Context) -> Option<TermPattern> {
        None
    }

    fn literal(&mut self, _literal: &Literal, _context: &Context) -> Option<TermPattern> {
        None
    }

    fn blank_node(&mut self, _blank_node: &BlankNode, _context: &Context) -> Option<TermPattern> {
        None
    }
}

/// Generic walk over a parsed query or update, driven by a [`TermTransformer`].
///
/// The engine consumes the tree and rebuilds it node by node, substituting
/// whatever the hooks return. Structural invariants are enforced on the way
/// back up: a replacement that does not fit its position is a
/// [`TransformError`], never a silently corrupted tree. Callers that need to
/// keep the original clone it first, which is what [`set_bindings`] and
/// friends do.
///
/// [`set_bindings`]: crate::binding::set_bindings
pub struct QueryTransformer<'a, T: TermTransformer> {
    transformer: &'a mut T,
}

impl<'a, T: TermTransformer> QueryTransformer<'a, T> {
    pub fn new(transformer: &'a mut T) -> QueryTransformer<'a, T> {
        QueryTransformer { transformer }
    }

    pub fn transform_query(&mut self, query: Query) -> Result<Query, TransformError> {
        let context = Context::new();
        match query {
            Query::Select {
                dataset,
                pattern,
                base_iri,
            } => Ok(Query::Select {
                dataset: self.transform_dataset(dataset, &context)?,
                pattern: self.transform_graph_pattern(pattern, &context)?,
                base_iri,
            }),
            Query::Construct {
                template,
                dataset,
                pattern,
                base_iri,
            } => {
                let mut new_template = Vec::with_capacity(template.len());
                for (i, t) in template.into_iter().enumerate() {
                    new_template.push(self.transform_triple_pattern(
                        t,
                        &context.extension_with(PathEntry::ConstructTemplate(i as u16)),
                    )?);
                }
                Ok(Query::Construct {
                    template: new_template,
                    dataset: self.transform_dataset(dataset, &context)?,
                    pattern: self.transform_graph_pattern(pattern, &context)?,
                    base_iri,
                })
            }
            Query::Describe {
                dataset,
                pattern,
                base_iri,
            } => Ok(Query::Describe {
                dataset: self.transform_dataset(dataset, &context)?,
                pattern: self.transform_graph_pattern(pattern, &context)?,
                base_iri,
            }),
            Query::Ask {
                dataset,
                pattern,
                base_iri,
            } => Ok(Query::Ask {
                dataset: self.transform_dataset(dataset, &context)?,
                pattern: self.transform_graph_pattern(pattern, &context)?,
                base_iri,
            }),
        }
    }

    pub fn transform_update(&mut self, update: Update) -> Result<Update, TransformError> {
        let Update {
            base_iri,
            operations,
        } = update;
        let context = Context::new();
        let mut new_operations = Vec::with_capacity(operations.len());
        for (i, operation) in operations.into_iter().enumerate() {
            new_operations.push(self.transform_update_operation(
                operation,
                &context.extension_with(PathEntry::UpdateOperation(i as u16)),
            )?);
        }
        Ok(Update {
            base_iri,
            operations: new_operations,
        })
    }

    // FROM / USING clauses admit IRIs only.
    pub(crate) fn transform_dataset(
        &mut self,
        dataset: Option<QueryDataset>,
        context: &Context,
    ) -> Result<Option<QueryDataset>, TransformError> {
        let Some(QueryDataset { default, named }) = dataset else {
            return Ok(None);
        };
        let mut new_default = Vec::with_capacity(default.len());
        for (i, nn) in default.into_iter().enumerate() {
            new_default.push(self.visit_iri(
                nn,
                &context.extension_with(PathEntry::DatasetDefault(i as u16)),
            )?);
        }
        let new_named = if let Some(named) = named {
            let mut new_named = Vec::with_capacity(named.len());
            for (i, nn) in named.into_iter().enumerate() {
                new_named.push(self.visit_iri(
                    nn,
                    &context.extension_with(PathEntry::DatasetNamed(i as u16)),
                )?);
            }
            Some(new_named)
        } else {
            None
        };
        Ok(Some(QueryDataset {
            default: new_default,
            named: new_named,
        }))
    }
}
