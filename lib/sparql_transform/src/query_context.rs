use std::fmt;
use std::fmt::Formatter;

/// One step of the traversal path, used to report where in a query a
/// transformation went wrong.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathEntry {
    Bgp,
    Path,
    JoinLeftSide,
    JoinRightSide,
    LeftJoinLeftSide,
    LeftJoinRightSide,
    LeftJoinExpression,
    UnionLeftSide,
    UnionRightSide,
    MinusLeftSide,
    MinusRightSide,
    FilterInner,
    FilterExpression,
    GraphInner,
    GraphName,
    ServiceInner,
    ServiceName,
    ExtendInner,
    ExtendExpression,
    ExtendVariable,
    Values,
    ValuesColumn(u16),
    ValuesRow(u16),
    OrderByInner,
    OrderByExpression(u16),
    ProjectInner,
    ProjectVariable(u16),
    DistinctInner,
    ReducedInner,
    SliceInner,
    GroupInner,
    GroupVariable(u16),
    GroupAggregation(u16),
    AggregationExpression,
    OrderingExpression,
    UnaryArgument,
    BinaryLeft,
    BinaryRight,
    TernaryFirst,
    TernarySecond,
    TernaryThird,
    NaryArgument(u16),
    Exists,
    Bound,
    ConstructTemplate(u16),
    DatasetDefault(u16),
    DatasetNamed(u16),
    UpdateOperation(u16),
    InsertQuads(u16),
    DeleteQuads(u16),
    UpdateWhere,
    UsingDataset,
    TripleSubject,
    TriplePredicate,
    TripleObject,
}

impl fmt::Display for PathEntry {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            PathEntry::Bgp => write!(f, "BGP"),
            PathEntry::Path => write!(f, "Path"),
            PathEntry::JoinLeftSide => write!(f, "JoinLeftSide"),
            PathEntry::JoinRightSide => write!(f, "JoinRightSide"),
            PathEntry::LeftJoinLeftSide => write!(f, "LeftJoinLeftSide"),
            PathEntry::LeftJoinRightSide => write!(f, "LeftJoinRightSide"),
            PathEntry::LeftJoinExpression => write!(f, "LeftJoinExpression"),
            PathEntry::UnionLeftSide => write!(f, "UnionLeftSide"),
            PathEntry::UnionRightSide => write!(f, "UnionRightSide"),
            PathEntry::MinusLeftSide => write!(f, "MinusLeftSide"),
            PathEntry::MinusRightSide => write!(f, "MinusRightSide"),
            PathEntry::FilterInner => write!(f, "FilterInner"),
            PathEntry::FilterExpression => write!(f, "FilterExpression"),
            PathEntry::GraphInner => write!(f, "GraphInner"),
            PathEntry::GraphName => write!(f, "GraphName"),
            PathEntry::ServiceInner => write!(f, "ServiceInner"),
            PathEntry::ServiceName => write!(f, "ServiceName"),
            PathEntry::ExtendInner => write!(f, "ExtendInner"),
            PathEntry::ExtendExpression => write!(f, "ExtendExpression"),
            PathEntry::ExtendVariable => write!(f, "ExtendVariable"),
            PathEntry::Values => write!(f, "Values"),
            PathEntry::ValuesColumn(i) => write!(f, "ValuesColumn({})", i),
            PathEntry::ValuesRow(i) => write!(f, "ValuesRow({})", i),
            PathEntry::OrderByInner => write!(f, "OrderByInner"),
            PathEntry::OrderByExpression(i) => write!(f, "OrderByExpression({})", i),
            PathEntry::ProjectInner => write!(f, "ProjectInner"),
            PathEntry::ProjectVariable(i) => write!(f, "ProjectVariable({})", i),
            PathEntry::DistinctInner => write!(f, "DistinctInner"),
            PathEntry::ReducedInner => write!(f, "ReducedInner"),
            PathEntry::SliceInner => write!(f, "SliceInner"),
            PathEntry::GroupInner => write!(f, "GroupInner"),
            PathEntry::GroupVariable(i) => write!(f, "GroupVariable({})", i),
            PathEntry::GroupAggregation(i) => write!(f, "GroupAggregation({})", i),
            PathEntry::AggregationExpression => write!(f, "AggregationExpression"),
            PathEntry::OrderingExpression => write!(f, "OrderingExpression"),
            PathEntry::UnaryArgument => write!(f, "UnaryArgument"),
            PathEntry::BinaryLeft => write!(f, "BinaryLeft"),
            PathEntry::BinaryRight => write!(f, "BinaryRight"),
            PathEntry::TernaryFirst => write!(f, "TernaryFirst"),
            PathEntry::TernarySecond => write!(f, "TernarySecond"),
            PathEntry::TernaryThird => write!(f, "TernaryThird"),
            PathEntry::NaryArgument(i) => write!(f, "NaryArgument({})", i),
            PathEntry::Exists => write!(f, "Exists"),
            PathEntry::Bound => write!(f, "Bound"),
            PathEntry::ConstructTemplate(i) => write!(f, "ConstructTemplate({})", i),
            PathEntry::DatasetDefault(i) => write!(f, "DatasetDefault({})", i),
            PathEntry::DatasetNamed(i) => write!(f, "DatasetNamed({})", i),
            PathEntry::UpdateOperation(i) => write!(f, "UpdateOperation({})", i),
            PathEntry::InsertQuads(i) => write!(f, "InsertQuads({})", i),
            PathEntry::DeleteQuads(i) => write!(f, "DeleteQuads({})", i),
            PathEntry::UpdateWhere => write!(f, "UpdateWhere"),
            PathEntry::UsingDataset => write!(f, "UsingDataset"),
            PathEntry::TripleSubject => write!(f, "TripleSubject"),
            PathEntry::TriplePredicate => write!(f, "TriplePredicate"),
            PathEntry::TripleObject => write!(f, "TripleObject"),
        }
    }
}

/// The position of the node currently being visited, as the path of entries
/// leading to it from the root of the query.
///
/// Contexts are passed explicitly through the walk, so a transformer carries
/// no traversal state of its own and may be reused across calls.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Context {
    string_rep: String,
    pub path: Vec<PathEntry>,
}

impl Context {
    pub fn new() -> Context {
        Context {
            string_rep: "".to_string(),
            path: vec![],
        }
    }

    pub fn as_str(&self) -> &str {
        &self.string_rep
    }

    pub fn extension_with(&self, p: PathEntry) -> Context {
        let mut path = self.path.clone();
        let mut string_rep = self.string_rep.clone();
        if !path.is_empty() {
            string_rep += "-";
        }
        string_rep += p.to_string().as_str();
        path.push(p);
        Context { path, string_rep }
    }
}

impl Default for Context {
    fn default() -> Context {
        Context::new()
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.string_rep.is_empty() {
            write!(f, "the query root")
        } else {
            write!(f, "{}", self.string_rep)
        }
    }
}
