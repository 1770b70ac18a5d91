use super::{QueryTransformer, TermTransformer};
use crate::errors::TransformError;
use crate::query_context::{Context, PathEntry};
use oxrdf::Variable;
use spargebra::algebra::GraphPattern;
use spargebra::term::GroundTerm;

impl<T: TermTransformer> QueryTransformer<'_, T> {
    pub fn transform_graph_pattern(
        &mut self,
        graph_pattern: GraphPattern,
        context: &Context,
    ) -> Result<GraphPattern, TransformError> {
        match graph_pattern {
            GraphPattern::Bgp { patterns } => {
                let bgp_context = context.extension_with(PathEntry::Bgp);
                let mut new_patterns = Vec::with_capacity(patterns.len());
                for p in patterns {
                    new_patterns.push(self.transform_triple_pattern(p, &bgp_context)?);
                }
                Ok(GraphPattern::Bgp {
                    patterns: new_patterns,
                })
            }
            GraphPattern::Path {
                subject,
                path,
                object,
            } => {
                let path_context = context.extension_with(PathEntry::Path);
                Ok(GraphPattern::Path {
                    subject: self.visit_term_pattern(
                        subject,
                        &path_context.extension_with(PathEntry::TripleSubject),
                    ),
                    path: self.transform_property_path(
                        path,
                        &path_context.extension_with(PathEntry::TriplePredicate),
                    )?,
                    object: self.visit_term_pattern(
                        object,
                        &path_context.extension_with(PathEntry::TripleObject),
                    ),
                })
            }
            GraphPattern::Join { left, right } => Ok(GraphPattern::Join {
                left: Box::new(self.transform_graph_pattern(
                    *left,
                    &context.extension_with(PathEntry::JoinLeftSide),
                )?),
                right: Box::new(self.transform_graph_pattern(
                    *right,
                    &context.extension_with(PathEntry::JoinRightSide),
                )?),
            }),
            GraphPattern::LeftJoin {
                left,
                right,
                expression,
            } => Ok(GraphPattern::LeftJoin {
                left: Box::new(self.transform_graph_pattern(
                    *left,
                    &context.extension_with(PathEntry::LeftJoinLeftSide),
                )?),
                right: Box::new(self.transform_graph_pattern(
                    *right,
                    &context.extension_with(PathEntry::LeftJoinRightSide),
                )?),
                expression: if let Some(expression) = expression {
                    Some(self.transform_expression(
                        expression,
                        &context.extension_with(PathEntry::LeftJoinExpression),
                    )?)
                } else {
                    None
                },
            }),
            GraphPattern::Filter { expr, inner } => Ok(GraphPattern::Filter {
                expr: self.transform_expression(
                    expr,
                    &context.extension_with(PathEntry::FilterExpression),
                )?,
                inner: Box::new(self.transform_graph_pattern(
                    *inner,
                    &context.extension_with(PathEntry::FilterInner),
                )?),
            }),
            GraphPattern::Union { left, right } => Ok(GraphPattern::Union {
                left: Box::new(self.transform_graph_pattern(
                    *left,
                    &context.extension_with(PathEntry::UnionLeftSide),
                )?),
                right: Box::new(self.transform_graph_pattern(
                    *right,
                    &context.extension_with(PathEntry::UnionRightSide),
                )?),
            }),
            GraphPattern::Graph { name, inner } => Ok(GraphPattern::Graph {
                name: self
                    .visit_named_node_pattern(name, &context.extension_with(PathEntry::GraphName))?,
                inner: Box::new(self.transform_graph_pattern(
                    *inner,
                    &context.extension_with(PathEntry::GraphInner),
                )?),
            }),
            GraphPattern::Extend {
                inner,
                variable,
                expression,
            } => Ok(GraphPattern::Extend {
                inner: Box::new(self.transform_graph_pattern(
                    *inner,
                    &context.extension_with(PathEntry::ExtendInner),
                )?),
                variable: self.visit_strict_variable(
                    variable,
                    &context.extension_with(PathEntry::ExtendVariable),
                )?,
                expression: self.transform_expression(
                    expression,
                    &context.extension_with(PathEntry::ExtendExpression),
                )?,
            }),
            GraphPattern::Minus { left, right } => Ok(GraphPattern::Minus {
                left: Box::new(self.transform_graph_pattern(
                    *left,
                    &context.extension_with(PathEntry::MinusLeftSide),
                )?),
                right: Box::new(self.transform_graph_pattern(
                    *right,
                    &context.extension_with(PathEntry::MinusRightSide),
                )?),
            }),
            GraphPattern::Values {
                variables,
                bindings,
            } => self.transform_values(
                variables,
                bindings,
                &context.extension_with(PathEntry::Values),
            ),
            GraphPattern::OrderBy { inner, expression } => {
                let mut new_expression = Vec::with_capacity(expression.len());
                for (i, oe) in expression.into_iter().enumerate() {
                    new_expression.push(self.transform_order_expression(
                        oe,
                        &context.extension_with(PathEntry::OrderByExpression(i as u16)),
                    )?);
                }
                Ok(GraphPattern::OrderBy {
                    inner: Box::new(self.transform_graph_pattern(
                        *inner,
                        &context.extension_with(PathEntry::OrderByInner),
                    )?),
                    expression: new_expression,
                })
            }
            GraphPattern::Project { inner, variables } => {
                let mut new_variables = Vec::with_capacity(variables.len());
                for (i, v) in variables.into_iter().enumerate() {
                    new_variables.push(self.visit_lenient_variable(
                        v,
                        &context.extension_with(PathEntry::ProjectVariable(i as u16)),
                    ));
                }
                Ok(GraphPattern::Project {
                    inner: Box::new(self.transform_graph_pattern(
                        *inner,
                        &context.extension_with(PathEntry::ProjectInner),
                    )?),
                    variables: new_variables,
                })
            }
            GraphPattern::Distinct { inner } => Ok(GraphPattern::Distinct {
                inner: Box::new(self.transform_graph_pattern(
                    *inner,
                    &context.extension_with(PathEntry::DistinctInner),
                )?),
            }),
            GraphPattern::Reduced { inner } => Ok(GraphPattern::Reduced {
                inner: Box::new(self.transform_graph_pattern(
                    *inner,
                    &context.extension_with(PathEntry::ReducedInner),
                )?),
            }),
            GraphPattern::Slice {
                inner,
                start,
                length,
            } => Ok(GraphPattern::Slice {
                inner: Box::new(self.transform_graph_pattern(
                    *inner,
                    &context.extension_with(PathEntry::SliceInner),
                )?),
                start,
                length,
            }),
            GraphPattern::Group {
                inner,
                variables,
                aggregates,
            } => {
                let mut new_variables = Vec::with_capacity(variables.len());
                for (i, v) in variables.into_iter().enumerate() {
                    new_variables.push(self.visit_lenient_variable(
                        v,
                        &context.extension_with(PathEntry::GroupVariable(i as u16)),
                    ));
                }
                let mut new_aggregates = Vec::with_capacity(aggregates.len());
                for (i, (v, a)) in aggregates.into_iter().enumerate() {
                    let aggregation_context =
                        context.extension_with(PathEntry::GroupAggregation(i as u16));
                    new_aggregates.push((
                        self.visit_lenient_variable(v, &aggregation_context),
                        self.transform_aggregate_expression(a, &aggregation_context)?,
                    ));
                }
                Ok(GraphPattern::Group {
                    inner: Box::new(self.transform_graph_pattern(
                        *inner,
                        &context.extension_with(PathEntry::GroupInner),
                    )?),
                    variables: new_variables,
                    aggregates: new_aggregates,
                })
            }
            GraphPattern::Service {
                name,
                inner,
                silent,
            } => Ok(GraphPattern::Service {
                name: self.visit_named_node_pattern(
                    name,
                    &context.extension_with(PathEntry::ServiceName),
                )?,
                inner: Box::new(self.transform_graph_pattern(
                    *inner,
                    &context.extension_with(PathEntry::ServiceInner),
                )?),
                silent,
            }),
        }
    }

    // A renamed VALUES column rewrites the shared header, so the rename is
    // atomic across every row by construction.
    pub(crate) fn transform_values(
        &mut self,
        variables: Vec<Variable>,
        bindings: Vec<Vec<Option<GroundTerm>>>,
        context: &Context,
    ) -> Result<GraphPattern, TransformError> {
        let mut new_variables = Vec::with_capacity(variables.len());
        for (i, v) in variables.into_iter().enumerate() {
            new_variables.push(self.visit_strict_variable(
                v,
                &context.extension_with(PathEntry::ValuesColumn(i as u16)),
            )?);
        }
        let mut new_bindings = Vec::with_capacity(bindings.len());
        for (i, row) in bindings.into_iter().enumerate() {
            let row_context = context.extension_with(PathEntry::ValuesRow(i as u16));
            let mut new_row = Vec::with_capacity(row.len());
            for (j, cell) in row.into_iter().enumerate() {
                new_row.push(match cell {
                    Some(term) => Some(self.visit_ground_term(
                        term,
                        &row_context.extension_with(PathEntry::ValuesColumn(j as u16)),
                    )?),
                    None => None,
                });
            }
            new_bindings.push(new_row);
        }
        Ok(GraphPattern::Values {
            variables: new_variables,
            bindings: new_bindings,
        })
    }
}
