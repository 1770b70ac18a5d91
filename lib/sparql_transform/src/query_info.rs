use crate::errors::TransformError;
use crate::parsing::ParsedQuery;
use crate::query_context::{Context, PathEntry};
use crate::transformer::{QueryTransformer, TermTransformer};
use oxrdf::Variable;
use spargebra::algebra::GraphPattern;
use spargebra::term::TermPattern;
use spargebra::{GraphUpdateOperation, Query, Update};
use std::collections::HashSet;
use std::fmt;

/// The outer form of a query or of an update operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryForm {
    Select,
    Construct,
    Ask,
    Describe,
    DeleteInsert,
    InsertData,
    DeleteData,
    Load,
    Clear,
    Create,
    Drop,
}

impl fmt::Display for QueryForm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QueryForm::Select => write!(f, "SELECT"),
            QueryForm::Construct => write!(f, "CONSTRUCT"),
            QueryForm::Ask => write!(f, "ASK"),
            QueryForm::Describe => write!(f, "DESCRIBE"),
            QueryForm::DeleteInsert => write!(f, "DELETE/INSERT"),
            QueryForm::InsertData => write!(f, "INSERT DATA"),
            QueryForm::DeleteData => write!(f, "DELETE DATA"),
            QueryForm::Load => write!(f, "LOAD"),
            QueryForm::Clear => write!(f, "CLEAR"),
            QueryForm::Create => write!(f, "CREATE"),
            QueryForm::Drop => write!(f, "DROP"),
        }
    }
}

/// What a query mentions: its form, every variable occurring anywhere in it,
/// and the explicitly projected variables.
///
/// A `SELECT *` reports an empty projection, since the star stands for
/// whatever happens to be in scope rather than for a commitment to specific
/// names.
#[derive(Debug, Clone, Default)]
pub struct QueryInfo {
    pub form: Option<QueryForm>,
    pub all_variables: HashSet<String>,
    pub projection_variables: Vec<String>,
}

#[derive(Default)]
struct VariableCollector {
    names: HashSet<String>,
    // Fresh variables the parser invents to bind aggregate results. They are
    // bound at the Group aggregation slot and referenced once by the Extend
    // that exposes the user-visible alias, and belong in neither set of
    // reported names.
    aggregate_bindings: HashSet<String>,
}

impl TermTransformer for VariableCollector {
    fn variable(&mut self, variable: &Variable, context: &Context) -> Option<TermPattern> {
        if let Some(PathEntry::GroupAggregation(_)) = context.path.last() {
            self.aggregate_bindings.insert(variable.as_str().to_string());
            return None;
        }
        if !self.aggregate_bindings.contains(variable.as_str()) {
            self.names.insert(variable.as_str().to_string());
        }
        None
    }
}

pub fn collect_query_info(parsed: &ParsedQuery) -> Result<QueryInfo, TransformError> {
    let mut collector = VariableCollector::default();
    QueryTransformer::new(&mut collector).transform_query(parsed.query.clone())?;
    let form = match &parsed.query {
        Query::Select { .. } => QueryForm::Select,
        Query::Construct { .. } => QueryForm::Construct,
        Query::Describe { .. } => QueryForm::Describe,
        Query::Ask { .. } => QueryForm::Ask,
    };
    let projection_variables = match (&parsed.query, parsed.star_projection) {
        (Query::Select { pattern, .. }, false) => find_projection(pattern),
        _ => vec![],
    };
    Ok(QueryInfo {
        form: Some(form),
        all_variables: collector.names,
        projection_variables,
    })
}

/// The reported form of a multi-operation update is that of its last
/// operation.
pub fn collect_update_info(update: &Update) -> Result<QueryInfo, TransformError> {
    let mut collector = VariableCollector::default();
    QueryTransformer::new(&mut collector).transform_update(update.clone())?;
    let form = update.operations.last().map(|op| match op {
        GraphUpdateOperation::InsertData { .. } => QueryForm::InsertData,
        GraphUpdateOperation::DeleteData { .. } => QueryForm::DeleteData,
        GraphUpdateOperation::DeleteInsert { .. } => QueryForm::DeleteInsert,
        GraphUpdateOperation::Load { .. } => QueryForm::Load,
        GraphUpdateOperation::Clear { .. } => QueryForm::Clear,
        GraphUpdateOperation::Create { .. } => QueryForm::Create,
        GraphUpdateOperation::Drop { .. } => QueryForm::Drop,
    });
    Ok(QueryInfo {
        form,
        all_variables: collector.names,
        projection_variables: vec![],
    })
}

pub fn collect_pattern_info(pattern: &GraphPattern) -> Result<QueryInfo, TransformError> {
    let mut collector = VariableCollector::default();
    QueryTransformer::new(&mut collector)
        .transform_graph_pattern(pattern.clone(), &Context::new())?;
    Ok(QueryInfo {
        form: None,
        all_variables: collector.names,
        projection_variables: vec![],
    })
}

fn find_projection(pattern: &GraphPattern) -> Vec<String> {
    match pattern {
        GraphPattern::Project { variables, .. } => variables
            .iter()
            .map(|v| v.as_str().to_string())
            .collect(),
        GraphPattern::Distinct { inner }
        | GraphPattern::Reduced { inner }
        | GraphPattern::Slice { inner, .. }
        | GraphPattern::OrderBy { inner, .. } => find_projection(inner),
        _ => vec![],
    }
}
