use oxrdf::{BlankNode, NamedNode, Variable};
use spargebra::algebra::GraphPattern;
use spargebra::term::TermPattern;
use spargebra::{Query, Update};
use sparql_transform::query_context::Context;
use sparql_transform::{QueryTransformer, TermTransformer};

struct Noop;

impl TermTransformer for Noop {}

#[test]
fn default_hooks_leave_queries_unchanged() {
    let texts = [
        "SELECT ?s ?p WHERE { ?s ?p ?o . FILTER(?o > 1 && BOUND(?p)) }",
        "SELECT DISTINCT * WHERE { ?s <https://example.com/p>/<https://example.com/q>* ?o } LIMIT 5",
        "CONSTRUCT { ?s a <https://example.com/T> } FROM <https://example.com/g> WHERE { ?s ?p ?o }",
        "ASK { GRAPH ?g { ?s ?p ?o } MINUS { ?s a <https://example.com/X> } }",
        "SELECT ?g (COUNT(?s) AS ?n) WHERE { VALUES ?g { <https://example.com/a> } ?s ?p ?g } GROUP BY ?g",
    ];
    for text in texts {
        let query = Query::parse(text, None).unwrap();
        let transformed = QueryTransformer::new(&mut Noop)
            .transform_query(query.clone())
            .unwrap();
        assert_eq!(transformed, query, "{}", text);
    }
}

#[test]
fn default_hooks_leave_updates_unchanged() {
    let texts = [
        "INSERT DATA { <https://example.com/s> <https://example.com/p> \"v\"@en }",
        "DELETE DATA { GRAPH <https://example.com/g> { <https://example.com/s> <https://example.com/p> 1 } }",
        "DELETE { ?s ?p ?o } INSERT { ?s ?p \"x\" } USING <https://example.com/g> WHERE { ?s ?p ?o }",
        "LOAD <https://example.com/data> INTO GRAPH <https://example.com/g>",
        "CLEAR NAMED ; CREATE GRAPH <https://example.com/g> ; DROP DEFAULT",
    ];
    for text in texts {
        let update = Update::parse(text, None).unwrap();
        let transformed = QueryTransformer::new(&mut Noop)
            .transform_update(update.clone())
            .unwrap();
        assert_eq!(transformed, update, "{}", text);
    }
}

struct VariableRenamer {
    from: String,
    to: String,
}

impl TermTransformer for VariableRenamer {
    fn variable(&mut self, variable: &Variable, _context: &Context) -> Option<TermPattern> {
        if variable.as_str() == self.from {
            Some(TermPattern::Variable(Variable::new_unchecked(&self.to)))
        } else {
            None
        }
    }
}

struct BlankNodeGrounder;

impl TermTransformer for BlankNodeGrounder {
    fn blank_node(&mut self, blank_node: &BlankNode, _context: &Context) -> Option<TermPattern> {
        Some(TermPattern::NamedNode(NamedNode::new_unchecked(format!(
            "https://example.com/node/{}",
            blank_node.as_str()
        ))))
    }
}

#[test]
fn renames_variable_everywhere_including_projection() {
    let query = Query::parse(
        r#"
    SELECT ?old WHERE {
        ?old a <https://example.com/Thing> .
        FILTER(BOUND(?old))
    } ORDER BY ?old
    "#,
        None,
    )
    .unwrap();
    let mut renamer = VariableRenamer {
        from: "old".to_string(),
        to: "new".to_string(),
    };
    let renamed = QueryTransformer::new(&mut renamer)
        .transform_query(query)
        .unwrap();
    let expected = Query::parse(
        r#"
    SELECT ?new WHERE {
        ?new a <https://example.com/Thing> .
        FILTER(BOUND(?new))
    } ORDER BY ?new
    "#,
        None,
    )
    .unwrap();
    assert_eq!(renamed, expected);
}

#[test]
fn renames_values_column_atomically() {
    let query = Query::parse(
        r#"
    SELECT ?s WHERE {
        VALUES (?old ?other) { (1 2) (3 4) }
        ?s <https://example.com/p> ?old .
    }
    "#,
        None,
    )
    .unwrap();
    let mut renamer = VariableRenamer {
        from: "old".to_string(),
        to: "new".to_string(),
    };
    let renamed = QueryTransformer::new(&mut renamer)
        .transform_query(query)
        .unwrap();
    let expected = Query::parse(
        r#"
    SELECT ?s WHERE {
        VALUES (?new ?other) { (1 2) (3 4) }
        ?s <https://example.com/p> ?new .
    }
    "#,
        None,
    )
    .unwrap();
    assert_eq!(renamed, expected);
}

#[test]
fn renames_group_by_and_aggregate_variables() {
    let query = Query::parse(
        r#"
    SELECT ?old (COUNT(?item) AS ?n) WHERE {
        ?item <https://example.com/in> ?old .
    } GROUP BY ?old
    "#,
        None,
    )
    .unwrap();
    let mut renamer = VariableRenamer {
        from: "old".to_string(),
        to: "new".to_string(),
    };
    let renamed = QueryTransformer::new(&mut renamer)
        .transform_query(query)
        .unwrap();
    // The parser invents a fresh name for the aggregate result binding on
    // every parse, so the renamed slots are checked structurally instead of
    // against a re-parsed query.
    let Query::Select { pattern, .. } = renamed else {
        panic!("expected a SELECT");
    };
    let GraphPattern::Project { variables, inner } = pattern else {
        panic!("expected a projection");
    };
    assert_eq!(
        variables,
        vec![Variable::new_unchecked("new"), Variable::new_unchecked("n")]
    );
    let GraphPattern::Extend { inner, .. } = *inner else {
        panic!("expected the aggregate alias binding");
    };
    let GraphPattern::Group {
        inner,
        variables,
        aggregates,
    } = *inner
    else {
        panic!("expected a GROUP BY");
    };
    assert_eq!(variables, vec![Variable::new_unchecked("new")]);
    assert_eq!(aggregates.len(), 1);
    let GraphPattern::Bgp { patterns } = *inner else {
        panic!("expected a BGP");
    };
    assert_eq!(
        patterns[0].object,
        TermPattern::Variable(Variable::new_unchecked("new"))
    );
}

#[test]
fn renames_inside_exists_and_subqueries() {
    let query = Query::parse(
        r#"
    SELECT ?s WHERE {
        ?s a <https://example.com/Thing> .
        FILTER(EXISTS { ?s <https://example.com/p> ?old })
        { SELECT ?s WHERE { ?s <https://example.com/q> ?old } }
    }
    "#,
        None,
    )
    .unwrap();
    let mut renamer = VariableRenamer {
        from: "old".to_string(),
        to: "new".to_string(),
    };
    let renamed = QueryTransformer::new(&mut renamer)
        .transform_query(query)
        .unwrap();
    let expected = Query::parse(
        r#"
    SELECT ?s WHERE {
        ?s a <https://example.com/Thing> .
        FILTER(EXISTS { ?s <https://example.com/p> ?new })
        { SELECT ?s WHERE { ?s <https://example.com/q> ?new } }
    }
    "#,
        None,
    )
    .unwrap();
    assert_eq!(renamed, expected);
}

#[test]
fn grounds_blank_nodes_to_iris() {
    let query = Query::parse(
        "SELECT ?o WHERE { _:b <https://example.com/p> ?o }",
        None,
    )
    .unwrap();
    let renamed = QueryTransformer::new(&mut BlankNodeGrounder)
        .transform_query(query)
        .unwrap();
    let expected = Query::parse(
        "SELECT ?o WHERE { <https://example.com/node/b> <https://example.com/p> ?o }",
        None,
    )
    .unwrap();
    assert_eq!(renamed, expected);
}

#[test]
fn transformer_is_reusable_across_queries() {
    let mut renamer = VariableRenamer {
        from: "a".to_string(),
        to: "b".to_string(),
    };
    for _ in 0..2 {
        let query = Query::parse("ASK { ?a ?p ?o }", None).unwrap();
        let renamed = QueryTransformer::new(&mut renamer)
            .transform_query(query)
            .unwrap();
        let expected = Query::parse("ASK { ?b ?p ?o }", None).unwrap();
        assert_eq!(renamed, expected);
    }
}
