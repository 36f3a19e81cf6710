//! Artifact coordinates and library-directory discovery

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

const JAR: &str = "jar";

fn default_kind() -> String {
    JAR.to_string()
}

/// A packaged artifact: coordinates plus the file holding it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    #[serde(rename = "group", alias = "groupId")]
    pub group_id: String,

    #[serde(rename = "artifact", alias = "artifactId")]
    pub artifact_id: String,

    pub version: String,

    /// Packaging type, which is also the output extension
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,

    pub file: PathBuf,
}

impl Artifact {
    pub fn new(group_id: &str, artifact_id: &str, version: &str, file: PathBuf) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
            kind: default_kind(),
            file,
        }
    }

    /// `group:artifact`
    pub fn coordinates(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    pub fn extension(&self) -> &str {
        &self.kind
    }

    pub fn is_jar(&self) -> bool {
        self.kind == JAR
    }

    /// `<artifactId>-<version>.<ext>`
    pub fn copy_file_name(&self) -> String {
        format!("{}-{}.{}", self.artifact_id, self.version, self.extension())
    }

    /// `<artifactId>-<version>-repackaged.<ext>`
    pub fn repackaged_file_name(&self) -> String {
        format!("{}-{}-repackaged.{}", self.artifact_id, self.version, self.extension())
    }
}

/// Finds `*.jar` files below library directories
pub struct ArtifactFinder<'a> {
    directories: &'a [PathBuf],
}

impl<'a> ArtifactFinder<'a> {
    pub fn new(directories: &'a [PathBuf]) -> Self {
        Self { directories }
    }

    /// Discover artifacts, sorted by path for a stable result
    pub fn find_artifacts(&self) -> Vec<Artifact> {
        let mut artifacts = Vec::new();

        for dir in self.directories {
            if !dir.exists() {
                trace!("Directory does not exist: {}", dir.display());
                continue;
            }

            for entry in WalkDir::new(dir)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some(JAR) {
                    continue;
                }
                if let Some(artifact) = infer_artifact(path) {
                    trace!("Discovered {} at {}", artifact.coordinates(), path.display());
                    artifacts.push(artifact);
                }
            }
        }

        debug!("Found {} artifacts in library directories", artifacts.len());
        artifacts
    }
}

/// Infer coordinates from `<dir>/<artifact>-<version>.jar`
pub fn infer_artifact(path: &Path) -> Option<Artifact> {
    let stem = path.file_stem()?.to_str()?;
    let group = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .unwrap_or("");

    let (artifact_id, version) = split_version(stem);
    if artifact_id.is_empty() {
        return None;
    }

    Some(Artifact::new(group, artifact_id, version, path.to_path_buf()))
}

/// The version starts at the first `-` followed by a digit
fn split_version(stem: &str) -> (&str, &str) {
    let bytes = stem.as_bytes();
    for (i, window) in bytes.windows(2).enumerate() {
        if window[0] == b'-' && window[1].is_ascii_digit() {
            return (&stem[..i], &stem[i + 1..]);
        }
    }
    (stem, "0")
}
