//! Assembles the output classpath from the configured artifacts

mod manifest;

pub use manifest::{write_manifest, MANIFEST_FILE_NAME};

use crate::analysis::{EntryPointResolver, ReachabilityAnalyzer, RemovableSet};
use crate::archive::{copy_archive, ArchiveRewriter, RewriteStats};
use crate::artifact::{Artifact, ArtifactFinder};
use crate::config::{matches_any, Config};
use crate::error::{Error, Result};
use crate::graph::UnitGraphBuilder;
use crate::transform::TransformPipeline;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// How an artifact reached the output directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryAction {
    Copied,
    Repackaged,
}

/// One element of the assembled classpath
#[derive(Debug, Clone, Serialize)]
pub struct ClasspathEntry {
    pub coordinates: String,
    pub source: PathBuf,
    pub file_name: String,
    pub action: EntryAction,
    pub minified: bool,
    pub transformed: bool,
    pub stats: Option<RewriteStats>,
}

/// Outcome of one run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClasspathSummary {
    pub output_directory: PathBuf,
    pub manifest: PathBuf,
    pub entries: Vec<ClasspathEntry>,
    /// Units on the classpath; zero unless minifying
    pub unit_count: usize,
    pub entry_point_count: usize,
    /// Removable unit names, sorted
    pub removable: Vec<String>,
}

impl ClasspathSummary {
    /// Output file names in classpath order
    pub fn file_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.file_name.as_str()).collect()
    }

    pub fn removed_members(&self) -> usize {
        self.entries.iter().filter_map(|e| e.stats).map(|s| s.removed).sum()
    }

    pub fn transformed_members(&self) -> usize {
        self.entries.iter().filter_map(|e| e.stats).map(|s| s.transformed).sum()
    }
}

/// Produces the output archives and `classpath.txt` for a configuration
pub struct ClasspathAssembler<'a> {
    config: &'a Config,
}

impl<'a> ClasspathAssembler<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Project first when it is a jar, then jar dependencies by artifact id
    pub fn ordered_artifacts(&self) -> Vec<Artifact> {
        let mut artifacts = Vec::new();

        if let Some(project) = &self.config.project {
            if project.is_jar() {
                artifacts.push(project.clone());
            } else {
                debug!("Project {} is of type {}, not on the classpath", project.coordinates(), project.kind);
            }
        }

        let mut dependencies = self.config.dependencies.clone();
        dependencies.extend(ArtifactFinder::new(&self.config.library_directories).find_artifacts());
        dependencies.sort_by(|left, right| left.artifact_id.cmp(&right.artifact_id));

        for dependency in dependencies {
            if dependency.is_jar() {
                artifacts.push(dependency);
            } else {
                warn!("Skipping {} of type {}", dependency.coordinates(), dependency.kind);
            }
        }

        artifacts
    }

    pub fn assemble(&self) -> Result<ClasspathSummary> {
        self.assemble_with_progress(|_| {})
    }

    /// Assemble the classpath, calling `on_artifact` before each archive is written
    pub fn assemble_with_progress<F>(&self, mut on_artifact: F) -> Result<ClasspathSummary>
    where
        F: FnMut(&Artifact),
    {
        self.config.validate()?;
        let output_directory = self
            .config
            .output_directory
            .clone()
            .ok_or_else(|| Error::Configuration("output_directory is required".to_string()))?;

        let artifacts = self.ordered_artifacts();
        info!("Assembling classpath of {} artifacts", artifacts.len());

        if !output_directory.exists() {
            std::fs::create_dir_all(&output_directory).map_err(|e| Error::io(&output_directory, e))?;
        }

        let mut summary = ClasspathSummary {
            output_directory: output_directory.clone(),
            ..ClasspathSummary::default()
        };

        if self.config.minify.is_some() || self.config.modify.is_some() {
            let removable = self.removable_set(&artifacts, &mut summary)?;
            let pipeline = self
                .config
                .modify
                .as_ref()
                .map(|modify| TransformPipeline::from_kinds(&modify.transformers));

            for artifact in &artifacts {
                on_artifact(artifact);
                let entry = self.repackage(artifact, &output_directory, removable.as_ref(), pipeline.as_ref())?;
                summary.entries.push(entry);
            }
        } else {
            for artifact in &artifacts {
                on_artifact(artifact);
                summary.entries.push(self.copy(artifact, &output_directory)?);
            }
        }

        let manifest = write_manifest(&output_directory, &summary.file_names(), self.config.strict)?;
        summary.manifest = manifest;

        info!(
            "Wrote {} ({} entries)",
            summary.manifest.display(),
            summary.entries.len()
        );

        Ok(summary)
    }

    /// Build the unit graph and removable set over the whole classpath
    fn removable_set(&self, artifacts: &[Artifact], summary: &mut ClasspathSummary) -> Result<Option<RemovableSet>> {
        let Some(minify) = &self.config.minify else {
            return Ok(None);
        };

        let files: Vec<&Path> = artifacts.iter().map(|a| a.file.as_path()).collect();

        let mut builder = UnitGraphBuilder::new();
        for file in &files {
            builder.process_archive(file)?;
        }
        let graph = builder.build();

        let entry_points = EntryPointResolver::new(minify).resolve(&files)?;
        let removable = ReachabilityAnalyzer::new().removable_set(&graph, &entry_points);

        summary.unit_count = graph.unit_count();
        summary.entry_point_count = entry_points.len();
        summary.removable = removable.sorted_names().into_iter().map(str::to_string).collect();

        Ok(Some(removable))
    }

    fn repackage(
        &self,
        artifact: &Artifact,
        output_directory: &Path,
        removable: Option<&RemovableSet>,
        pipeline: Option<&TransformPipeline>,
    ) -> Result<ClasspathEntry> {
        let file_name = artifact.repackaged_file_name();
        let output = output_directory.join(&file_name);

        let mut rewriter = ArchiveRewriter::new()
            .with_compression_level(self.config.compression_level.zip_level())
            .with_strict(self.config.strict);

        let minified = match (removable, &self.config.minify) {
            (Some(removable), Some(minify)) if matches_any(&minify.artifacts, artifact) => {
                rewriter = rewriter.with_removable(removable);
                true
            }
            _ => false,
        };

        let transformed = match (pipeline, &self.config.modify) {
            (Some(pipeline), Some(modify)) if matches_any(&modify.artifacts, artifact) => {
                rewriter = rewriter.with_transform(pipeline);
                true
            }
            _ => false,
        };

        debug!(
            "Repackaging {} (minify: {}, modify: {})",
            artifact.coordinates(),
            minified,
            transformed
        );

        let stats = rewriter.rewrite(&artifact.file, &output)?;

        Ok(ClasspathEntry {
            coordinates: artifact.coordinates(),
            source: artifact.file.clone(),
            file_name,
            action: EntryAction::Repackaged,
            minified,
            transformed,
            stats: Some(stats),
        })
    }

    fn copy(&self, artifact: &Artifact, output_directory: &Path) -> Result<ClasspathEntry> {
        let file_name = artifact.copy_file_name();
        let output = output_directory.join(&file_name);

        let bytes = copy_archive(&artifact.file, &output, self.config.strict)?;
        debug!("Copied {} ({} bytes)", artifact.coordinates(), bytes);

        Ok(ClasspathEntry {
            coordinates: artifact.coordinates(),
            source: artifact.file.clone(),
            file_name,
            action: EntryAction::Copied,
            minified: false,
            transformed: false,
            stats: None,
        })
    }
}
