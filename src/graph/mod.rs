mod builder;
mod unit;

pub use builder::UnitGraphBuilder;
pub use unit::{is_class_member, unit_name_for_member, Unit};

use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// The reference graph of all units on a classpath
///
/// Built once per run by [`UnitGraphBuilder`] and read-only afterwards.
#[derive(Debug)]
pub struct UnitGraph {
    /// Nodes are unit names, edges are direct references
    inner: DiGraph<String, ()>,

    /// Map from unit name to node index
    node_map: HashMap<String, NodeIndex>,

    /// Map from unit name to unit details
    units: HashMap<String, Unit>,
}

impl UnitGraph {
    pub fn new() -> Self {
        Self {
            inner: DiGraph::new(),
            node_map: HashMap::new(),
            units: HashMap::new(),
        }
    }

    /// Add a unit, replacing any previous unit of the same name
    ///
    /// Returns the replaced unit.
    pub fn add_unit(&mut self, unit: Unit) -> Option<Unit> {
        if !self.node_map.contains_key(&unit.name) {
            let node_idx = self.inner.add_node(unit.name.clone());
            self.node_map.insert(unit.name.clone(), node_idx);
        }
        self.units.insert(unit.name.clone(), unit)
    }

    /// Add an edge between two known units; unknown endpoints are ignored
    pub fn add_reference(&mut self, from: &str, to: &str) -> bool {
        match (self.node_map.get(from), self.node_map.get(to)) {
            (Some(&from_idx), Some(&to_idx)) => {
                self.inner.update_edge(from_idx, to_idx, ());
                true
            }
            _ => false,
        }
    }

    pub fn get_unit(&self, name: &str) -> Option<&Unit> {
        self.units.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.units.contains_key(name)
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    pub fn unit_names(&self) -> impl Iterator<Item = &String> {
        self.units.keys()
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn reference_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Names of the known units the given unit refers to
    pub fn get_references_from(&self, name: &str) -> Vec<&str> {
        let Some(&node_idx) = self.node_map.get(name) else {
            return Vec::new();
        };

        self.inner
            .neighbors_directed(node_idx, petgraph::Direction::Outgoing)
            .filter_map(|idx| self.inner.node_weight(idx).map(String::as_str))
            .collect()
    }

    /// Get the underlying petgraph for traversal
    pub fn inner(&self) -> &DiGraph<String, ()> {
        &self.inner
    }

    pub fn node_index(&self, name: &str) -> Option<NodeIndex> {
        self.node_map.get(name).copied()
    }
}

impl Default for UnitGraph {
    fn default() -> Self {
        Self::new()
    }
}
