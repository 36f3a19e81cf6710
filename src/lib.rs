//! jarslim - Classpath assembly with reachability-based JAR minification
//!
//! This library copies a project's JAR and its dependency JARs into one
//! output directory and writes a `classpath.txt` manifest listing them.
//! Selected archives can be minified (unreachable classes dropped) and
//! transformed (class files rewritten) on the way.
//!
//! # Architecture
//!
//! The pipeline consists of:
//! 1. **Configuration** - Load and validate the artifacts and tasks
//! 2. **Graph Building** - Parse every class member into a unit graph
//! 3. **Entry Point Resolution** - Literal names, property and service files
//! 4. **Reachability Analysis** - Compute the removable set
//! 5. **Rewriting** - Stream each archive, filtering and transforming members
//! 6. **Assembly** - Order the archives and write the manifest

pub mod analysis;
pub mod archive;
pub mod artifact;
pub mod classfile;
pub mod classpath;
pub mod config;
pub mod error;
pub mod graph;
pub mod report;
pub mod transform;

pub use analysis::{EntryPointResolver, ReachabilityAnalyzer, RemovableSet};
pub use archive::{ArchiveRewriter, RewriteStats};
pub use artifact::{Artifact, ArtifactFinder};
pub use classpath::{ClasspathAssembler, ClasspathSummary};
pub use config::{CompressionLevel, Config, MinifyConfig, ModifyConfig};
pub use error::{Error, Result};
pub use graph::{Unit, UnitGraph, UnitGraphBuilder};
pub use report::{ReportFormat, Reporter};
pub use transform::{ByteTransform, ClassTransformer, RemoveDebugInformation, TransformPipeline, TransformerKind};
