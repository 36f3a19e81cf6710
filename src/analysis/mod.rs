//! Entry-point resolution and reachability over the unit graph

mod entry_points;
pub mod properties;
mod reachability;

pub use entry_points::EntryPointResolver;
pub use reachability::ReachabilityAnalyzer;

use crate::graph::unit_name_for_member;
use std::collections::HashSet;

/// Units that may be dropped from the classpath
///
/// Never contains an entry point. Members that are not class files are
/// always retained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovableSet {
    units: HashSet<String>,
}

impl RemovableSet {
    pub fn new(units: HashSet<String>) -> Self {
        Self { units }
    }

    pub fn contains(&self, unit: &str) -> bool {
        self.units.contains(unit)
    }

    /// Whether an archive member survives minification
    pub fn retains(&self, member_name: &str) -> bool {
        match unit_name_for_member(member_name) {
            Some(unit) => !self.units.contains(&unit),
            None => true,
        }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Removable unit names in lexical order
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.units.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
