use super::properties::{property_values, service_names};
use crate::archive::{open_archive, read_member};
use crate::config::MinifyConfig;
use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info};

/// Collects the unit names that are reachable a priori
///
/// Sources, unioned: configured literal names, the values of configured
/// property-file members, and the lines of configured service members.
pub struct EntryPointResolver<'a> {
    config: &'a MinifyConfig,
}

impl<'a> EntryPointResolver<'a> {
    pub fn new(config: &'a MinifyConfig) -> Self {
        Self { config }
    }

    /// Resolve entry points across every archive of the classpath
    pub fn resolve<P: AsRef<Path>>(&self, archives: &[P]) -> Result<BTreeSet<String>> {
        let mut entry_points: BTreeSet<String> = self.config.entry_points.iter().cloned().collect();

        for archive in archives {
            entry_points.extend(self.resolve_archive(archive.as_ref())?);
        }

        info!("Resolved {} entry points", entry_points.len());
        Ok(entry_points)
    }

    /// Entry points declared by members embedded in one archive
    pub fn resolve_archive(&self, path: &Path) -> Result<BTreeSet<String>> {
        let mut result = BTreeSet::new();

        if self.config.property_entry_points.is_empty() && self.config.service_entry_points.is_empty() {
            return Ok(result);
        }

        let mut archive = open_archive(path)?;

        for member in &self.config.property_entry_points {
            let Some(bytes) = read_member(&mut archive, path, member)? else {
                continue;
            };
            let text = decode_text(path, member, bytes)?;
            for value in property_values(&text) {
                debug!("Property entry point: {} ({})", value, member);
                result.insert(value);
            }
        }

        for member in &self.config.service_entry_points {
            let Some(bytes) = read_member(&mut archive, path, member)? else {
                continue;
            };
            let text = decode_text(path, member, bytes)?;
            for name in service_names(&text) {
                debug!("Service entry point: {} ({})", name, member);
                result.insert(name);
            }
        }

        Ok(result)
    }
}

fn decode_text(archive: &Path, member: &str, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| Error::parse(archive, Some(member), e.to_string()))
}
