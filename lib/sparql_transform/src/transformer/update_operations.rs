use super::terms::unexpected;
use super::{QueryTransformer, TermTransformer};
use crate::errors::TransformError;
use crate::query_context::{Context, PathEntry};
use spargebra::term::{
    GraphName, GraphNamePattern, GroundQuad, GroundQuadPattern, GroundSubject, Quad, QuadPattern,
    Subject, Term, TermPattern,
};
use spargebra::GraphUpdateOperation;

impl<T: TermTransformer> QueryTransformer<'_, T> {
    pub(crate) fn transform_update_operation(
        &mut self,
        operation: GraphUpdateOperation,
        context: &Context,
    ) -> Result<GraphUpdateOperation, TransformError> {
        match operation {
            GraphUpdateOperation::InsertData { data } => {
                let mut new_data = Vec::with_capacity(data.len());
                for (i, quad) in data.into_iter().enumerate() {
                    new_data.push(self.transform_quad(
                        quad,
                        &context.extension_with(PathEntry::InsertQuads(i as u16)),
                    )?);
                }
                Ok(GraphUpdateOperation::InsertData { data: new_data })
            }
            GraphUpdateOperation::DeleteData { data } => {
                let mut new_data = Vec::with_capacity(data.len());
                for (i, quad) in data.into_iter().enumerate() {
                    new_data.push(self.transform_ground_quad(
                        quad,
                        &context.extension_with(PathEntry::DeleteQuads(i as u16)),
                    )?);
                }
                Ok(GraphUpdateOperation::DeleteData { data: new_data })
            }
            GraphUpdateOperation::DeleteInsert {
                delete,
                insert,
                using,
                pattern,
            } => {
                let mut new_delete = Vec::with_capacity(delete.len());
                for (i, quad) in delete.into_iter().enumerate() {
                    new_delete.push(self.transform_ground_quad_pattern(
                        quad,
                        &context.extension_with(PathEntry::DeleteQuads(i as u16)),
                    )?);
                }
                let mut new_insert = Vec::with_capacity(insert.len());
                for (i, quad) in insert.into_iter().enumerate() {
                    new_insert.push(self.transform_quad_pattern(
                        quad,
                        &context.extension_with(PathEntry::InsertQuads(i as u16)),
                    )?);
                }
                Ok(GraphUpdateOperation::DeleteInsert {
                    delete: new_delete,
                    insert: new_insert,
                    using: self.transform_dataset(
                        using,
                        &context.extension_with(PathEntry::UsingDataset),
                    )?,
                    pattern: Box::new(self.transform_graph_pattern(
                        *pattern,
                        &context.extension_with(PathEntry::UpdateWhere),
                    )?),
                })
            }
            GraphUpdateOperation::Load {
                silent,
                source,
                destination,
            } => Ok(GraphUpdateOperation::Load {
                silent,
                source: self.visit_iri(source, context)?,
                destination: self.visit_graph_name(destination, context)?,
            }),
            GraphUpdateOperation::Clear { silent, graph } => Ok(GraphUpdateOperation::Clear {
                silent,
                graph: self.visit_graph_target(graph, context)?,
            }),
            GraphUpdateOperation::Create { silent, graph } => Ok(GraphUpdateOperation::Create {
                silent,
                graph: self.visit_iri(graph, context)?,
            }),
            GraphUpdateOperation::Drop { silent, graph } => Ok(GraphUpdateOperation::Drop {
                silent,
                graph: self.visit_graph_target(graph, context)?,
            }),
        }
    }

    fn transform_quad(&mut self, quad: Quad, context: &Context) -> Result<Quad, TransformError> {
        let Quad {
            subject,
            predicate,
            object,
            graph_name,
        } = quad;
        Ok(Quad {
            subject: self
                .visit_subject(subject, &context.extension_with(PathEntry::TripleSubject))?,
            predicate: self
                .visit_iri(predicate, &context.extension_with(PathEntry::TriplePredicate))?,
            object: self.visit_term(object, &context.extension_with(PathEntry::TripleObject))?,
            graph_name: self.visit_graph_name(graph_name, context)?,
        })
    }

    fn transform_ground_quad(
        &mut self,
        quad: GroundQuad,
        context: &Context,
    ) -> Result<GroundQuad, TransformError> {
        let GroundQuad {
            subject,
            predicate,
            object,
            graph_name,
        } = quad;
        let subject_context = context.extension_with(PathEntry::TripleSubject);
        Ok(GroundQuad {
            subject: match subject {
                GroundSubject::NamedNode(nn) => {
                    GroundSubject::NamedNode(self.visit_iri(nn, &subject_context)?)
                }
            },
            predicate: self
                .visit_iri(predicate, &context.extension_with(PathEntry::TriplePredicate))?,
            object: self
                .visit_ground_term(object, &context.extension_with(PathEntry::TripleObject))?,
            graph_name: self.visit_graph_name(graph_name, context)?,
        })
    }

    fn transform_quad_pattern(
        &mut self,
        quad: QuadPattern,
        context: &Context,
    ) -> Result<QuadPattern, TransformError> {
        let QuadPattern {
            subject,
            predicate,
            object,
            graph_name,
        } = quad;
        Ok(QuadPattern {
            subject: self
                .visit_term_pattern(subject, &context.extension_with(PathEntry::TripleSubject)),
            predicate: self.visit_named_node_pattern(
                predicate,
                &context.extension_with(PathEntry::TriplePredicate),
            )?,
            object: self
                .visit_term_pattern(object, &context.extension_with(PathEntry::TripleObject)),
            graph_name: self.visit_graph_name_pattern(graph_name, context)?,
        })
    }

    fn transform_ground_quad_pattern(
        &mut self,
        quad: GroundQuadPattern,
        context: &Context,
    ) -> Result<GroundQuadPattern, TransformError> {
        let GroundQuadPattern {
            subject,
            predicate,
            object,
            graph_name,
        } = quad;
        Ok(GroundQuadPattern {
            subject: self.visit_ground_term_pattern(
                subject,
                &context.extension_with(PathEntry::TripleSubject),
            )?,
            predicate: self.visit_named_node_pattern(
                predicate,
                &context.extension_with(PathEntry::TriplePredicate),
            )?,
            object: self.visit_ground_term_pattern(
                object,
                &context.extension_with(PathEntry::TripleObject),
            )?,
            graph_name: self.visit_graph_name_pattern(graph_name, context)?,
        })
    }

    fn visit_subject(
        &mut self,
        subject: Subject,
        context: &Context,
    ) -> Result<Subject, TransformError> {
        let replacement = match &subject {
            Subject::NamedNode(nn) => self.transformer.named_node(nn, context),
            Subject::BlankNode(bn) => self.transformer.blank_node(bn, context),
        };
        match replacement {
            None => Ok(subject),
            Some(TermPattern::NamedNode(nn)) => Ok(Subject::NamedNode(nn)),
            Some(TermPattern::BlankNode(bn)) => Ok(Subject::BlankNode(bn)),
            Some(other) => Err(unexpected("an IRI or a blank node", context, other)),
        }
    }

    fn visit_term(&mut self, term: Term, context: &Context) -> Result<Term, TransformError> {
        let replacement = match &term {
            Term::NamedNode(nn) => self.transformer.named_node(nn, context),
            Term::BlankNode(bn) => self.transformer.blank_node(bn, context),
            Term::Literal(l) => self.transformer.literal(l, context),
        };
        match replacement {
            None => Ok(term),
            Some(TermPattern::NamedNode(nn)) => Ok(Term::NamedNode(nn)),
            Some(TermPattern::BlankNode(bn)) => Ok(Term::BlankNode(bn)),
            Some(TermPattern::Literal(l)) => Ok(Term::Literal(l)),
            Some(other) => Err(unexpected(
                "an IRI, blank node or literal",
                context,
                other,
            )),
        }
    }

    fn visit_graph_name(
        &mut self,
        graph_name: GraphName,
        context: &Context,
    ) -> Result<GraphName, TransformError> {
        match graph_name {
            GraphName::NamedNode(nn) => Ok(GraphName::NamedNode(self.visit_iri(nn, context)?)),
            GraphName::DefaultGraph => Ok(GraphName::DefaultGraph),
        }
    }

    fn visit_graph_name_pattern(
        &mut self,
        graph_name: GraphNamePattern,
        context: &Context,
    ) -> Result<GraphNamePattern, TransformError> {
        let replacement = match &graph_name {
            GraphNamePattern::NamedNode(nn) => self.transformer.named_node(nn, context),
            GraphNamePattern::Variable(v) => self.transformer.variable(v, context),
            GraphNamePattern::DefaultGraph => return Ok(graph_name),
        };
        match replacement {
            None => Ok(graph_name),
            Some(TermPattern::NamedNode(nn)) => Ok(GraphNamePattern::NamedNode(nn)),
            Some(TermPattern::Variable(v)) => Ok(GraphNamePattern::Variable(v)),
            Some(other) => Err(unexpected("an IRI or a variable", context, other)),
        }
    }

    fn visit_graph_target(
        &mut self,
        graph: spargebra::algebra::GraphTarget,
        context: &Context,
    ) -> Result<spargebra::algebra::GraphTarget, TransformError> {
        use spargebra::algebra::GraphTarget;
        match graph {
            GraphTarget::NamedNode(nn) => Ok(GraphTarget::NamedNode(self.visit_iri(nn, context)?)),
            other => Ok(other),
        }
    }
}
