use super::terms::unexpected;
use super::{QueryTransformer, TermTransformer};
use crate::errors::TransformError;
use crate::query_context::{Context, PathEntry};
use spargebra::algebra::{AggregateExpression, Expression, OrderExpression};
use spargebra::term::TermPattern;

fn term_pattern_to_expression(
    term: TermPattern,
    context: &Context,
) -> Result<Expression, TransformError> {
    match term {
        TermPattern::NamedNode(nn) => Ok(Expression::NamedNode(nn)),
        TermPattern::Literal(l) => Ok(Expression::Literal(l)),
        TermPattern::Variable(v) => Ok(Expression::Variable(v)),
        TermPattern::BlankNode(bn) => Err(unexpected(
            "an expression term (IRI, literal or variable)",
            context,
            bn,
        )),
    }
}

impl<T: TermTransformer> QueryTransformer<'_, T> {
    pub fn transform_expression(
        &mut self,
        expression: Expression,
        context: &Context,
    ) -> Result<Expression, TransformError> {
        Ok(match expression {
            Expression::NamedNode(nn) => match self.transformer.named_node(&nn, context) {
                None => Expression::NamedNode(nn),
                Some(replacement) => term_pattern_to_expression(replacement, context)?,
            },
            Expression::Literal(l) => match self.transformer.literal(&l, context) {
                None => Expression::Literal(l),
                Some(replacement) => term_pattern_to_expression(replacement, context)?,
            },
            Expression::Variable(v) => match self.transformer.variable(&v, context) {
                None => Expression::Variable(v),
                Some(replacement) => term_pattern_to_expression(replacement, context)?,
            },
            Expression::Or(left, right) => {
                let (left, right) = self.transform_binary(left, right, context)?;
                Expression::Or(left, right)
            }
            Expression::And(left, right) => {
                let (left, right) = self.transform_binary(left, right, context)?;
                Expression::And(left, right)
            }
            Expression::Equal(left, right) => {
                let (left, right) = self.transform_binary(left, right, context)?;
                Expression::Equal(left, right)
            }
            Expression::SameTerm(left, right) => {
                let (left, right) = self.transform_binary(left, right, context)?;
                Expression::SameTerm(left, right)
            }
            Expression::Greater(left, right) => {
                let (left, right) = self.transform_binary(left, right, context)?;
                Expression::Greater(left, right)
            }
            Expression::GreaterOrEqual(left, right) => {
                let (left, right) = self.transform_binary(left, right, context)?;
                Expression::GreaterOrEqual(left, right)
            }
            Expression::Less(left, right) => {
                let (left, right) = self.transform_binary(left, right, context)?;
                Expression::Less(left, right)
            }
            Expression::LessOrEqual(left, right) => {
                let (left, right) = self.transform_binary(left, right, context)?;
                Expression::LessOrEqual(left, right)
            }
            Expression::In(expr, list) => Expression::In(
                Box::new(
                    self.transform_expression(
                        *expr,
                        &context.extension_with(PathEntry::BinaryLeft),
                    )?,
                ),
                self.transform_expression_list(list, context)?,
            ),
            Expression::Add(left, right) => {
                let (left, right) = self.transform_binary(left, right, context)?;
                Expression::Add(left, right)
            }
            Expression::Subtract(left, right) => {
                let (left, right) = self.transform_binary(left, right, context)?;
                Expression::Subtract(left, right)
            }
            Expression::Multiply(left, right) => {
                let (left, right) = self.transform_binary(left, right, context)?;
                Expression::Multiply(left, right)
            }
            Expression::Divide(left, right) => {
                let (left, right) = self.transform_binary(left, right, context)?;
                Expression::Divide(left, right)
            }
            Expression::UnaryPlus(inner) => Expression::UnaryPlus(Box::new(
                self.transform_expression(
                    *inner,
                    &context.extension_with(PathEntry::UnaryArgument),
                )?,
            )),
            Expression::UnaryMinus(inner) => Expression::UnaryMinus(Box::new(
                self.transform_expression(
                    *inner,
                    &context.extension_with(PathEntry::UnaryArgument),
                )?,
            )),
            Expression::Not(inner) => Expression::Not(Box::new(self.transform_expression(
                *inner,
                &context.extension_with(PathEntry::UnaryArgument),
            )?)),
            Expression::Exists(inner) => Expression::Exists(Box::new(
                self.transform_graph_pattern(*inner, &context.extension_with(PathEntry::Exists))?,
            )),
            Expression::Bound(v) => Expression::Bound(
                self.visit_lenient_variable(v, &context.extension_with(PathEntry::Bound)),
            ),
            Expression::If(first, second, third) => Expression::If(
                Box::new(self.transform_expression(
                    *first,
                    &context.extension_with(PathEntry::TernaryFirst),
                )?),
                Box::new(self.transform_expression(
                    *second,
                    &context.extension_with(PathEntry::TernarySecond),
                )?),
                Box::new(self.transform_expression(
                    *third,
                    &context.extension_with(PathEntry::TernaryThird),
                )?),
            ),
            Expression::Coalesce(list) => {
                Expression::Coalesce(self.transform_expression_list(list, context)?)
            }
            Expression::FunctionCall(function, args) => Expression::FunctionCall(
                function,
                self.transform_expression_list(args, context)?,
            ),
        })
    }

    fn transform_binary(
        &mut self,
        left: Box<Expression>,
        right: Box<Expression>,
        context: &Context,
    ) -> Result<(Box<Expression>, Box<Expression>), TransformError> {
        Ok((
            Box::new(
                self.transform_expression(*left, &context.extension_with(PathEntry::BinaryLeft))?,
            ),
            Box::new(
                self.transform_expression(
                    *right,
                    &context.extension_with(PathEntry::BinaryRight),
                )?,
            ),
        ))
    }

    fn transform_expression_list(
        &mut self,
        expressions: Vec<Expression>,
        context: &Context,
    ) -> Result<Vec<Expression>, TransformError> {
        let mut new_expressions = Vec::with_capacity(expressions.len());
        for (i, e) in expressions.into_iter().enumerate() {
            new_expressions.push(self.transform_expression(
                e,
                &context.extension_with(PathEntry::NaryArgument(i as u16)),
            )?);
        }
        Ok(new_expressions)
    }

    pub(crate) fn transform_aggregate_expression(
        &mut self,
        aggregate: AggregateExpression,
        context: &Context,
    ) -> Result<AggregateExpression, TransformError> {
        Ok(match aggregate {
            AggregateExpression::CountSolutions { distinct } => {
                AggregateExpression::CountSolutions { distinct }
            }
            AggregateExpression::FunctionCall {
                name,
                expr,
                distinct,
            } => AggregateExpression::FunctionCall {
                name,
                expr: self.transform_expression(
                    expr,
                    &context.extension_with(PathEntry::AggregationExpression),
                )?,
                distinct,
            },
        })
    }

    pub(crate) fn transform_order_expression(
        &mut self,
        order_expression: OrderExpression,
        context: &Context,
    ) -> Result<OrderExpression, TransformError> {
        let expression_context = context.extension_with(PathEntry::OrderingExpression);
        Ok(match order_expression {
            OrderExpression::Asc(e) => {
                OrderExpression::Asc(self.transform_expression(e, &expression_context)?)
            }
            OrderExpression::Desc(e) => {
                OrderExpression::Desc(self.transform_expression(e, &expression_context)?)
            }
        })
    }
}
