// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Transitive validity analysis.
//!
//! A node "has validations" when a rule is attached to it directly or to
//! anything reachable from it through pointee, field, key and element
//! edges. An alias contributes its own rules and the rules reachable from
//! its representation's fields and positions, but not the type rules of the
//! aliased type.
//!
//! The walk is an explicit-stack DFS with a visited set, so cycles
//! terminate. Results are memoized per analyzer: a negative answer is
//! cached for every node the walk visited (none of them reaches a rule),
//! a positive answer only for the queried node.

use std::collections::{HashMap, HashSet};

use super::{FieldBinding, Graph, NodeId, NodeKind};

/// Memoized "has any validation" queries over one [`Graph`].
#[derive(Debug)]
pub struct Analyzer<'g> {
    graph: &'g Graph,
    cache: HashMap<NodeId, bool>
}

impl<'g> Analyzer<'g> {
    /// Analyzer with an empty cache.
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            cache: HashMap::new()
        }
    }

    /// Check if validation code would be emitted for values of node `id`.
    pub fn has_validations(&mut self, id: NodeId) -> bool {
        if let Some(&known) = self.cache.get(&id) {
            return known;
        }

        let mut visited = HashSet::from([id]);
        let mut stack = vec![id];
        let mut found = false;
        while let Some(current) = stack.pop() {
            if self.cache.get(&current) == Some(&true) || self.has_direct_rules(current) {
                found = true;
                break;
            }
            for child in self.children(current) {
                if self.cache.get(&child) == Some(&false) {
                    continue;
                }
                if visited.insert(child) {
                    stack.push(child);
                }
            }
        }

        if found {
            self.cache.insert(id, true);
        } else {
            self.cache.extend(visited.into_iter().map(|v| (v, false)));
        }
        tracing::trace!(node = %id, ty = %self.graph.node(id).ty, found, "analyzed");
        found
    }

    fn has_direct_rules(&self, id: NodeId) -> bool {
        let node = self.graph.node(id);
        if !node.rules.is_empty() {
            return true;
        }
        if self.graph.fields_of(id).iter().any(FieldBinding::has_rules) {
            return true;
        }
        let (key, elem) = self.graph.positions_of(id);
        key.is_some_and(|k| !k.rules.is_empty()) || elem.is_some_and(|e| !e.rules.is_empty())
    }

    fn children(&self, id: NodeId) -> Vec<NodeId> {
        let node = self.graph.node(id);
        let mut children = Vec::new();
        match node.kind {
            NodeKind::Builtin => {}
            NodeKind::Pointer => children.extend(node.pointee),
            NodeKind::Struct | NodeKind::Alias => {
                children.extend(self.graph.fields_of(id).iter().map(|f| f.node));
            }
            NodeKind::Slice | NodeKind::Array | NodeKind::Map => {}
        }
        let (key, elem) = self.graph.positions_of(id);
        children.extend(key.map(|k| k.node));
        children.extend(elem.map(|e| e.node));
        children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::GeneratorConfig, graph::Builder, loader::Loader, tags::ValidatorRegistry,
        universe::TypeName
    };

    fn graph(file: syn::File) -> Graph {
        let mut loader = Loader::new("api");
        loader.load_file(&file).unwrap();
        let loaded = loader.finish().unwrap();
        let registry = ValidatorRegistry::with_builtins();
        let config = GeneratorConfig::new(["api"]);
        Builder::new(&loaded.universe, &registry, &config)
            .discover(&loaded.roots)
            .unwrap()
    }

    fn id(graph: &Graph, name: &str) -> NodeId {
        graph
            .lookup(&TypeName::new("api", name))
            .or_else(|| graph.lookup(&TypeName::anonymous(name)))
            .unwrap_or_else(|| panic!("{name} not discovered"))
    }

    #[test]
    fn rules_propagate_through_containers_and_pointers() {
        let graph = graph(syn::parse_quote! {
            //! +k8s:validation-gen=*

            pub struct Leaf {
                /// +k8s:maxLength=3
                pub name: String,
            }

            pub struct Branch {
                pub leaves: Option<Vec<Leaf>>,
            }

            pub struct Bare {
                pub name: String,
                pub tags: Vec<String>,
            }
        });
        let mut analyzer = Analyzer::new(&graph);
        assert!(analyzer.has_validations(id(&graph, "Leaf")));
        assert!(analyzer.has_validations(id(&graph, "Branch")));
        assert!(analyzer.has_validations(id(&graph, "Vec<Leaf>")));
        assert!(!analyzer.has_validations(id(&graph, "Bare")));
        assert!(!analyzer.has_validations(id(&graph, "String")));
    }

    #[test]
    fn cycles_without_rules_are_negative() {
        let graph = graph(syn::parse_quote! {
            //! +k8s:validation-gen=*

            pub struct Ping {
                pub pong: Option<Box<Pong>>,
            }

            pub struct Pong {
                pub pings: Vec<Ping>,
            }
        });
        let mut analyzer = Analyzer::new(&graph);
        assert!(!analyzer.has_validations(id(&graph, "Ping")));
        assert!(!analyzer.has_validations(id(&graph, "Pong")));
    }

    #[test]
    fn cycle_with_rule_is_positive_from_every_member() {
        let graph = graph(syn::parse_quote! {
            //! +k8s:validation-gen=*

            pub struct Ping {
                pub pong: Option<Box<Pong>>,
            }

            pub struct Pong {
                pub pings: Vec<Ping>,
                /// +k8s:immutable
                pub id: String,
            }
        });
        let mut analyzer = Analyzer::new(&graph);
        assert!(analyzer.has_validations(id(&graph, "Ping")));
        assert!(analyzer.has_validations(id(&graph, "Pong")));
    }

    #[test]
    fn alias_ignores_rules_of_the_aliased_type() {
        let graph = graph(syn::parse_quote! {
            //! +k8s:validation-gen=*

            /// +validateFalse="type Inner"
            pub struct Inner {
                pub name: String,
            }

            pub type Outer = Inner;

            /// +k8s:eachVal=+k8s:maxLength=4
            pub type Names = Vec<String>;

            pub struct Holder {
                pub outer: Outer,
                pub names: Names,
            }
        });
        let mut analyzer = Analyzer::new(&graph);
        assert!(analyzer.has_validations(id(&graph, "Inner")));
        assert!(!analyzer.has_validations(id(&graph, "Outer")));
        assert!(analyzer.has_validations(id(&graph, "Names")));
        assert!(!analyzer.has_validations(id(&graph, "Vec<String>")));
    }

    #[test]
    fn answers_are_stable_across_query_order() {
        let source: syn::File = syn::parse_quote! {
            //! +k8s:validation-gen=*

            pub struct A {
                pub b: Option<Box<B>>,
            }

            pub struct B {
                pub c: Vec<C>,
            }

            pub struct C {
                pub a: Option<Box<A>>,
                /// +k8s:format=dns-label
                pub name: String,
            }

            pub struct D {
                pub d: Option<Box<D>>,
            }
        };
        let graph = graph(source);
        let names = ["A", "B", "C", "D"];

        let mut forward = Analyzer::new(&graph);
        let forward: Vec<bool> = names
            .iter()
            .map(|n| forward.has_validations(id(&graph, n)))
            .collect();
        let mut backward = Analyzer::new(&graph);
        let mut reverse: Vec<bool> = names
            .iter()
            .rev()
            .map(|n| backward.has_validations(id(&graph, n)))
            .collect();
        reverse.reverse();

        assert_eq!(forward, vec![true, true, true, false]);
        assert_eq!(forward, reverse);
    }
}
