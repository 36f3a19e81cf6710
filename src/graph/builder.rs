use super::{unit_name_for_member, Unit, UnitGraph};
use crate::archive::{open_archive, MemberHeader};
use crate::classfile;
use crate::error::{Error, Result};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Builder for constructing the unit graph of a classpath
///
/// Archives are scanned in classpath order. When two archives define the
/// same unit, the later archive wins.
pub struct UnitGraphBuilder {
    /// The graph being built
    graph: UnitGraph,

    /// Number of archives scanned so far
    archive_count: usize,
}

impl UnitGraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: UnitGraph::new(),
            archive_count: 0,
        }
    }

    /// Register every class member of an archive; returns the number of units found
    pub fn process_archive(&mut self, path: &Path) -> Result<usize> {
        debug!("Scanning archive: {}", path.display());

        let mut archive = open_archive(path)?;
        let mut buffer = Vec::new();
        let mut found = 0;

        for index in 0..archive.len() {
            let header = MemberHeader::read(&mut archive, path, index)?;
            if header.is_dir {
                continue;
            }
            let Some(unit_name) = unit_name_for_member(&header.name) else {
                continue;
            };
            header.ensure_supported(path)?;

            let member_name = header.name;
            let mut member = archive.by_index(index).map_err(|e| Error::zip(path, e))?;

            buffer.clear();
            member
                .read_to_end(&mut buffer)
                .map_err(|e| Error::parse(path, Some(&member_name), e.to_string()))?;

            let class = classfile::parse(&buffer)
                .map_err(|e| Error::parse(path, Some(&member_name), e.to_string()))?;

            let mut references = classfile::referenced_classes(&class);
            references.remove(&unit_name);

            let unit = Unit::new(unit_name, path.to_path_buf(), references);
            if let Some(previous) = self.graph.add_unit(unit) {
                debug!(
                    "Unit {} from {} replaces the one from {}",
                    previous.name,
                    path.display(),
                    previous.archive.display()
                );
            }
            found += 1;
        }

        self.archive_count += 1;
        Ok(found)
    }

    pub fn archive_count(&self) -> usize {
        self.archive_count
    }

    /// Build the final graph, resolving references into edges
    pub fn build(mut self) -> UnitGraph {
        let edges: Vec<(String, String)> = self
            .graph
            .units()
            .flat_map(|unit| {
                unit.references
                    .iter()
                    .map(move |target| (unit.name.clone(), target.clone()))
            })
            .collect();

        for (from, to) in edges {
            self.graph.add_reference(&from, &to);
        }

        debug!(
            "Unit graph: {} units, {} references from {} archives",
            self.graph.unit_count(),
            self.graph.reference_count(),
            self.archive_count
        );

        self.graph
    }
}

impl Default for UnitGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
