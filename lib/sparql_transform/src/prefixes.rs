use oxrdf::NamedNode;
use std::collections::HashMap;

const COMMON_PREFIXES: [(&str, &str); 7] = [
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("skos", "http://www.w3.org/2004/02/skos/core#"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
    ("dcterms", "http://purl.org/dc/terms/"),
];

/// A two-layer prefix table: a shared default layer and a local overlay.
///
/// Lookups fall through the overlay into the defaults, and a locally declared
/// prefix shadows a default one without modifying it. Cloning a map clones
/// both layers, so maps derived from a shared set of defaults never leak
/// declarations into each other.
#[derive(Debug, Clone, Default)]
pub struct PrefixMap {
    defaults: HashMap<String, NamedNode>,
    local: HashMap<String, NamedNode>,
}

impl PrefixMap {
    pub fn new() -> PrefixMap {
        Default::default()
    }

    /// A map preseeded with well-known vocabulary prefixes.
    pub fn common() -> PrefixMap {
        let mut defaults = HashMap::with_capacity(COMMON_PREFIXES.len());
        for (prefix, iri) in COMMON_PREFIXES {
            defaults.insert(prefix.to_string(), NamedNode::new_unchecked(iri));
        }
        PrefixMap {
            defaults,
            local: HashMap::new(),
        }
    }

    pub fn with_defaults(defaults: HashMap<String, NamedNode>) -> PrefixMap {
        PrefixMap {
            defaults,
            local: HashMap::new(),
        }
    }

    pub fn declare(&mut self, prefix: impl Into<String>, iri: NamedNode) {
        self.local.insert(prefix.into(), iri);
    }

    pub fn resolve(&self, prefix: &str) -> Option<&NamedNode> {
        self.local.get(prefix).or_else(|| self.defaults.get(prefix))
    }

    pub fn is_declared(&self, prefix: &str) -> bool {
        self.local.contains_key(prefix) || self.defaults.contains_key(prefix)
    }

    /// Expands a `prefix:local` form into a full IRI if the prefix is known.
    pub fn expand(&self, curie: &str) -> Option<NamedNode> {
        let (prefix, local) = curie.split_once(':')?;
        let base = self.resolve(prefix)?;
        NamedNode::new(format!("{}{}", base.as_str(), local)).ok()
    }

    /// All effective declarations as PREFIX lines, in a deterministic order.
    /// Shadowed defaults are omitted.
    pub fn declarations(&self) -> String {
        let mut entries: Vec<(&String, &NamedNode)> = self
            .defaults
            .iter()
            .filter(|(prefix, _)| !self.local.contains_key(*prefix))
            .chain(self.local.iter())
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        let mut out = String::new();
        for (prefix, iri) in entries {
            out.push_str(&format!("PREFIX {}: <{}>\n", prefix, iri.as_str()));
        }
        out
    }
}
