use oxrdf::vocab::xsd;
use oxrdf::{Literal, NamedNode, Term, Variable};
use spargebra::term::GroundTerm;
use spargebra::{Query, Update};
use sparql_transform::errors::TransformError;
use sparql_transform::{
    collect_query_info, parametrize_query, set_bindings, set_update_bindings, Bindings,
    ParsedQuery, PrefixMap, ValuesRow,
};

#[test]
fn binds_variable_in_all_term_positions() {
    let query = Query::parse(
        r#"
    SELECT ?p WHERE {
        ?thing ?p ?thing .
        ?thing <https://example.com/label> "name" .
    }
    "#,
        None,
    )
    .unwrap();
    let bindings = Bindings::new().bind_variable(
        "thing",
        NamedNode::new_unchecked("https://example.com/Thing"),
    );
    let bound = set_bindings(&query, &bindings).unwrap();
    let expected = Query::parse(
        r#"
    SELECT ?p WHERE {
        <https://example.com/Thing> ?p <https://example.com/Thing> .
        <https://example.com/Thing> <https://example.com/label> "name" .
    }
    "#,
        None,
    )
    .unwrap();
    assert_eq!(bound, expected);
}

#[test]
fn binds_predicate_variable_to_iri() {
    let query = Query::parse("SELECT ?s WHERE { ?s ?rel ?o }", None).unwrap();
    let bindings =
        Bindings::new().bind_variable("rel", NamedNode::new_unchecked("https://example.com/rel"));
    let bound = set_bindings(&query, &bindings).unwrap();
    let expected =
        Query::parse("SELECT ?s WHERE { ?s <https://example.com/rel> ?o }", None).unwrap();
    assert_eq!(bound, expected);
}

#[test]
fn binds_variable_inside_expressions() {
    let query = Query::parse(
        "SELECT ?s WHERE { ?s <https://example.com/age> ?age . FILTER(?age > ?limit) }",
        None,
    )
    .unwrap();
    let bindings = Bindings::new().bind_variable(
        "limit",
        Literal::new_typed_literal("18", xsd::INTEGER.into_owned()),
    );
    let bound = set_bindings(&query, &bindings).unwrap();
    let expected = Query::parse(
        "SELECT ?s WHERE { ?s <https://example.com/age> ?age . FILTER(?age > 18) }",
        None,
    )
    .unwrap();
    assert_eq!(bound, expected);
}

#[test]
fn binding_projected_variable_rewrites_body_only() {
    let _ = env_logger::try_init();
    let query = Query::parse("SELECT ?s ?o WHERE { ?s <https://example.com/p> ?o }", None).unwrap();
    let bindings = Bindings::new().bind_variable("o", Literal::new_simple_literal("fixed"));
    let bound = set_bindings(&query, &bindings).unwrap();
    // The projection keeps ?o, only the body occurrence is replaced.
    let expected =
        Query::parse("SELECT ?s ?o WHERE { ?s <https://example.com/p> \"fixed\" }", None).unwrap();
    assert_eq!(bound, expected);
}

#[test]
fn binds_iri_occurrences() {
    let query = Query::parse(
        "SELECT ?s WHERE { ?s <https://example.com/old> ?o . ?o a <https://example.com/old> }",
        None,
    )
    .unwrap();
    let bindings = Bindings::new().bind_iri(
        NamedNode::new_unchecked("https://example.com/old"),
        NamedNode::new_unchecked("https://example.com/new"),
    );
    let bound = set_bindings(&query, &bindings).unwrap();
    let expected = Query::parse(
        "SELECT ?s WHERE { ?s <https://example.com/new> ?o . ?o a <https://example.com/new> }",
        None,
    )
    .unwrap();
    assert_eq!(bound, expected);
}

#[test]
fn binds_iri_inside_property_path() {
    let query = Query::parse(
        "SELECT ?s WHERE { ?s <https://example.com/broader>+ ?o }",
        None,
    )
    .unwrap();
    let bindings = Bindings::new().bind_iri(
        NamedNode::new_unchecked("https://example.com/broader"),
        NamedNode::new_unchecked("https://example.com/narrower"),
    );
    let bound = set_bindings(&query, &bindings).unwrap();
    let expected = Query::parse(
        "SELECT ?s WHERE { ?s <https://example.com/narrower>+ ?o }",
        None,
    )
    .unwrap();
    assert_eq!(bound, expected);
}

#[test]
fn binds_values_cells() {
    let query = Query::parse(
        r#"
    SELECT ?s WHERE {
        VALUES ?type { <https://example.com/Old> }
        ?s a ?type .
    }
    "#,
        None,
    )
    .unwrap();
    let bindings = Bindings::new().bind_iri(
        NamedNode::new_unchecked("https://example.com/Old"),
        NamedNode::new_unchecked("https://example.com/New"),
    );
    let bound = set_bindings(&query, &bindings).unwrap();
    let expected = Query::parse(
        r#"
    SELECT ?s WHERE {
        VALUES ?type { <https://example.com/New> }
        ?s a ?type .
    }
    "#,
        None,
    )
    .unwrap();
    assert_eq!(bound, expected);
}

#[test]
fn binding_from_clause_to_literal_is_an_error() {
    let query = Query::parse(
        "SELECT ?s FROM <https://example.com/graph> WHERE { ?s ?p ?o }",
        None,
    )
    .unwrap();
    let bindings = Bindings::new().bind_iri(
        NamedNode::new_unchecked("https://example.com/graph"),
        Literal::new_simple_literal("not a graph"),
    );
    let err = set_bindings(&query, &bindings).unwrap_err();
    let TransformError::UnexpectedTermKind { position, .. } = err;
    assert!(position.contains("DatasetDefault"), "{}", position);
}

#[test]
fn binding_bind_target_to_literal_is_an_error() {
    let query = Query::parse(
        "SELECT ?s WHERE { ?s ?p ?o . BIND(1 AS ?x) }",
        None,
    )
    .unwrap();
    let bindings = Bindings::new().bind_variable("x", Literal::new_simple_literal("v"));
    let err = set_bindings(&query, &bindings).unwrap_err();
    let TransformError::UnexpectedTermKind { position, .. } = err;
    assert!(position.contains("ExtendVariable"), "{}", position);
}

#[test]
fn failed_binding_leaves_input_untouched() {
    let query = Query::parse(
        "SELECT ?s FROM <https://example.com/graph> WHERE { ?s ?p ?o }",
        None,
    )
    .unwrap();
    let original = query.clone();
    let bindings = Bindings::new().bind_iri(
        NamedNode::new_unchecked("https://example.com/graph"),
        Literal::new_simple_literal("nope"),
    );
    assert!(set_bindings(&query, &bindings).is_err());
    assert_eq!(query, original);
}

#[test]
fn binds_update_operations() {
    let update = Update::parse(
        r#"
    DELETE { ?item <https://example.com/state> ?old }
    INSERT { ?item <https://example.com/state> "done" }
    WHERE { ?item <https://example.com/state> ?old }
    "#,
        None,
    )
    .unwrap();
    let bindings = Bindings::new()
        .bind_variable("item", NamedNode::new_unchecked("https://example.com/task1"));
    let bound = set_update_bindings(&update, &bindings).unwrap();
    let expected = Update::parse(
        r#"
    DELETE { <https://example.com/task1> <https://example.com/state> ?old }
    INSERT { <https://example.com/task1> <https://example.com/state> "done" }
    WHERE { <https://example.com/task1> <https://example.com/state> ?old }
    "#,
        None,
    )
    .unwrap();
    assert_eq!(bound, expected);
}

#[test]
fn binds_insert_data_iris() {
    let update = Update::parse(
        "INSERT DATA { <https://example.com/s> <https://example.com/p> \"v\" }",
        None,
    )
    .unwrap();
    let bindings = Bindings::new().bind_iri(
        NamedNode::new_unchecked("https://example.com/p"),
        NamedNode::new_unchecked("https://example.com/q"),
    );
    let bound = set_update_bindings(&update, &bindings).unwrap();
    let expected = Update::parse(
        "INSERT DATA { <https://example.com/s> <https://example.com/q> \"v\" }",
        None,
    )
    .unwrap();
    assert_eq!(bound, expected);
}

#[test]
fn bound_variable_disappears_from_body() {
    let query = Query::parse(
        r#"
    SELECT ?s WHERE {
        ?s <https://example.com/p> ?v .
        FILTER(EXISTS { ?v <https://example.com/q> ?s })
        { SELECT ?s WHERE { ?s <https://example.com/r> ?v } }
    }
    "#,
        None,
    )
    .unwrap();
    let bindings = Bindings::new()
        .bind_variable("v", NamedNode::new_unchecked("https://example.com/val"));
    let bound = set_bindings(&query, &bindings).unwrap();
    let info = collect_query_info(&ParsedQuery {
        query: bound,
        prefixes: PrefixMap::new(),
        star_projection: false,
    })
    .unwrap();
    assert!(!info.all_variables.contains("v"), "{:?}", info.all_variables);
    assert!(info.all_variables.contains("s"));
}

#[test]
fn empty_bindings_return_clone() {
    let query = Query::parse("ASK { ?s ?p ?o }", None).unwrap();
    let bound = set_bindings(&query, &Bindings::new()).unwrap();
    assert_eq!(bound, query);
}

fn integer(value: &str) -> GroundTerm {
    GroundTerm::Literal(Literal::new_typed_literal(value, xsd::INTEGER.into_owned()))
}

#[test]
fn parametrize_joins_values_beneath_modifiers() {
    let query = Query::parse(
        "SELECT ?s ?p WHERE { ?s ?p ?o } ORDER BY ?s",
        None,
    )
    .unwrap();
    let rows: Vec<ValuesRow> = vec![
        ValuesRow::from([(Variable::new_unchecked("o"), integer("1"))]),
        ValuesRow::from([(Variable::new_unchecked("o"), integer("2"))]),
    ];
    let parametrized = parametrize_query(&query, &rows);
    let expected = Query::parse(
        "SELECT ?s ?p WHERE { VALUES ?o { 1 2 } ?s ?p ?o } ORDER BY ?s",
        None,
    )
    .unwrap();
    assert_eq!(parametrized, expected);
}

#[test]
fn parametrize_fills_missing_columns_with_undef() {
    let query = Query::parse("SELECT ?s WHERE { ?s ?a ?b }", None).unwrap();
    let rows: Vec<ValuesRow> = vec![
        ValuesRow::from([
            (Variable::new_unchecked("a"), integer("1")),
            (Variable::new_unchecked("b"), integer("2")),
        ]),
        ValuesRow::from([(Variable::new_unchecked("a"), integer("3"))]),
    ];
    let parametrized = parametrize_query(&query, &rows);
    let expected = Query::parse(
        "SELECT ?s WHERE { VALUES (?a ?b) { (1 2) (3 UNDEF) } ?s ?a ?b }",
        None,
    )
    .unwrap();
    assert_eq!(parametrized, expected);
}

#[test]
fn parametrize_without_rows_is_identity() {
    let query = Query::parse("SELECT ?s WHERE { ?s ?p ?o }", None).unwrap();
    assert_eq!(parametrize_query(&query, &[]), query);
}

#[test]
fn bindings_accept_any_term_kind() {
    let bindings = Bindings::new()
        .bind_variable("a", NamedNode::new_unchecked("https://example.com/a"))
        .bind_variable("b", Literal::new_simple_literal("b"))
        .bind_variable("c", Term::Literal(Literal::new_simple_literal("c")));
    assert!(!bindings.is_empty());
}
