use super::RemovableSet;
use crate::graph::UnitGraph;
use petgraph::visit::Dfs;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info};

/// Analyzer for finding unreachable units via graph traversal
pub struct ReachabilityAnalyzer;

impl ReachabilityAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Find all units reachable from the entry points
    ///
    /// Entry points without a graph node are treated as roots that reach
    /// nothing further. They are still part of the result.
    pub fn find_reachable(&self, graph: &UnitGraph, entry_points: &BTreeSet<String>) -> HashSet<String> {
        let mut reachable: HashSet<String> = entry_points.iter().cloned().collect();
        let inner_graph = graph.inner();

        // One Dfs shared by all roots, so no node is visited twice
        let mut dfs = Dfs::empty(inner_graph);

        for entry in entry_points {
            let Some(start_idx) = graph.node_index(entry) else {
                debug!("Entry point {} is not defined on the classpath", entry);
                continue;
            };

            if dfs.discovered.contains(start_idx.index()) {
                continue;
            }
            dfs.move_to(start_idx);

            while let Some(node_idx) = dfs.next(inner_graph) {
                if let Some(name) = inner_graph.node_weight(node_idx) {
                    reachable.insert(name.clone());
                }
            }
        }

        reachable
    }

    /// Units that no entry point reaches
    pub fn removable_set(&self, graph: &UnitGraph, entry_points: &BTreeSet<String>) -> RemovableSet {
        let reachable = self.find_reachable(graph, entry_points);

        let removable: HashSet<String> = graph
            .unit_names()
            .filter(|name| !reachable.contains(*name))
            .cloned()
            .collect();

        info!(
            "Reachability: {} reachable, {} removable of {} units",
            graph.unit_count() - removable.len(),
            removable.len(),
            graph.unit_count()
        );

        RemovableSet::new(removable)
    }
}

impl Default for ReachabilityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
