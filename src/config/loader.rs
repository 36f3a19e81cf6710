use super::selector::validate_selector;
use crate::artifact::Artifact;
use crate::error::{Error, Result};
use crate::transform::TransformerKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Configuration for a jarslim run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory receiving the archives and `classpath.txt`
    #[serde(alias = "outputDirectory")]
    pub output_directory: Option<PathBuf>,

    /// Deflate level for repackaged archives
    #[serde(alias = "compressionLevel")]
    pub compression_level: CompressionLevel,

    /// Refuse to overwrite existing output files
    pub strict: bool,

    /// The project's own artifact
    pub project: Option<Artifact>,

    /// Dependency artifacts, in any order
    pub dependencies: Vec<Artifact>,

    /// Directories scanned for additional `*.jar` dependencies
    #[serde(alias = "libraryDirectories")]
    pub library_directories: Vec<PathBuf>,

    /// Reachability-based minification
    pub minify: Option<MinifyConfig>,

    /// Class-file transformation
    pub modify: Option<ModifyConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinifyConfig {
    /// `group:artifact` selectors of the archives to minify
    pub artifacts: Vec<String>,

    /// Literal entry point names
    #[serde(alias = "entryPoints")]
    pub entry_points: Vec<String>,

    /// Property-file members whose values are entry points
    #[serde(alias = "propertyEntryPoints")]
    pub property_entry_points: Vec<String>,

    /// Service-registration members whose lines are entry points
    #[serde(alias = "serviceEntryPoints")]
    pub service_entry_points: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifyConfig {
    /// `group:artifact` selectors of the archives to transform
    pub artifacts: Vec<String>,

    /// Class transformers, applied in order
    pub transformers: Vec<TransformerKind>,
}

/// Deflate level: the writer default, or 0 (none) through 9 (best)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawCompressionLevel", into = "RawCompressionLevel")]
pub enum CompressionLevel {
    #[default]
    Default,
    Level(i64),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawCompressionLevel {
    Number(i64),
    Name(String),
}

impl CompressionLevel {
    pub const MAX: i64 = 9;

    /// Level handed to the archive writer
    pub fn zip_level(self) -> Option<i64> {
        match self {
            CompressionLevel::Default => None,
            CompressionLevel::Level(level) => Some(level),
        }
    }

    fn from_number(level: i64) -> Self {
        if level == -1 {
            CompressionLevel::Default
        } else {
            CompressionLevel::Level(level)
        }
    }
}

impl TryFrom<RawCompressionLevel> for CompressionLevel {
    type Error = String;

    fn try_from(raw: RawCompressionLevel) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawCompressionLevel::Number(level) => Ok(Self::from_number(level)),
            RawCompressionLevel::Name(name) => name.parse(),
        }
    }
}

impl From<CompressionLevel> for RawCompressionLevel {
    fn from(level: CompressionLevel) -> Self {
        match level {
            CompressionLevel::Default => RawCompressionLevel::Name("default".to_string()),
            CompressionLevel::Level(level) => RawCompressionLevel::Number(level),
        }
    }
}

impl FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("default") {
            return Ok(CompressionLevel::Default);
        }
        s.parse::<i64>()
            .map(Self::from_number)
            .map_err(|_| format!("invalid compression level '{}'", s))
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionLevel::Default => write!(f, "default"),
            CompressionLevel::Level(level) => write!(f, "{}", level),
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let parsed = match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents).map_err(|e| e.to_string()),
            "toml" => toml::from_str(&contents).map_err(|e| e.to_string()),
            _ => {
                // Try YAML first, then TOML
                serde_yaml::from_str(&contents)
                    .or_else(|_| toml::from_str(&contents))
                    .map_err(|e| e.to_string())
            }
        };

        parsed.map_err(|reason| {
            Error::Configuration(format!("Failed to parse {}: {}", path.display(), reason))
        })
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(project_root: &Path) -> Result<Self> {
        let default_names = [
            ".jarslim.yml",
            ".jarslim.yaml",
            ".jarslim.toml",
            "jarslim.yml",
            "jarslim.yaml",
            "jarslim.toml",
        ];

        for name in &default_names {
            let path = project_root.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        // No config file found, use defaults
        Ok(Self::default())
    }

    /// Resolve relative paths against the directory the run is rooted at
    pub fn resolve_paths(&mut self, root: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = root.join(&*path);
            }
        };

        if let Some(dir) = self.output_directory.as_mut() {
            resolve(dir);
        }
        if let Some(project) = self.project.as_mut() {
            resolve(&mut project.file);
        }
        for dependency in &mut self.dependencies {
            resolve(&mut dependency.file);
        }
        for dir in &mut self.library_directories {
            resolve(dir);
        }
    }

    /// Reject configurations that cannot produce a classpath
    pub fn validate(&self) -> Result<()> {
        if self.output_directory.is_none() {
            return Err(Error::Configuration("output_directory is required".to_string()));
        }

        if let CompressionLevel::Level(level) = self.compression_level {
            if !(0..=CompressionLevel::MAX).contains(&level) {
                return Err(Error::Configuration(format!(
                    "compression_level must be 'default' or 0..={}, got {}",
                    CompressionLevel::MAX,
                    level
                )));
            }
        }

        if let Some(minify) = &self.minify {
            validate_selectors("minify", &minify.artifacts)?;
        }
        if let Some(modify) = &self.modify {
            validate_selectors("modify", &modify.artifacts)?;
        }

        Ok(())
    }
}

fn validate_selectors(task: &str, selectors: &[String]) -> Result<()> {
    if selectors.is_empty() {
        return Err(Error::Configuration(format!("{}.artifacts must not be empty", task)));
    }
    selectors.iter().try_for_each(|s| validate_selector(s))
}
