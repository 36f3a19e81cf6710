use super::{create_output, open_archive, MemberHeader};
use crate::analysis::RemovableSet;
use crate::error::{Error, Result};
use crate::graph::is_class_member;
use crate::transform::ByteTransform;
use serde::Serialize;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, trace};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Counts of what happened to the members of one archive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RewriteStats {
    /// Members written to the output archive
    pub retained: usize,
    /// Class members omitted because they are unreachable
    pub removed: usize,
    /// Class members passed through the byte transform
    pub transformed: usize,
}

/// Streams one archive into a new one, dropping removable classes and
/// optionally transforming the bytes of retained classes
pub struct ArchiveRewriter<'a> {
    removable: Option<&'a RemovableSet>,
    transform: Option<&'a dyn ByteTransform>,
    compression_level: Option<i64>,
    strict: bool,
}

impl<'a> ArchiveRewriter<'a> {
    pub fn new() -> Self {
        Self {
            removable: None,
            transform: None,
            compression_level: None,
            strict: false,
        }
    }

    /// Omit members whose unit is in the removable set
    pub fn with_removable(mut self, removable: &'a RemovableSet) -> Self {
        self.removable = Some(removable);
        self
    }

    /// Pass every retained class member through `transform`
    pub fn with_transform(mut self, transform: &'a dyn ByteTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Deflate level for compressed members; `None` uses the writer default
    ///
    /// Level 0 writes deflated members stored.
    pub fn with_compression_level(mut self, level: Option<i64>) -> Self {
        self.compression_level = level;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Write the filtered copy of `input` to `output`
    ///
    /// Members keep their relative order. Only stored and deflated members
    /// are accepted; anything else aborts the archive.
    pub fn rewrite(&self, input: &Path, output: &Path) -> Result<RewriteStats> {
        debug!("Rewriting {} -> {}", input.display(), output.display());

        let mut archive = open_archive(input)?;
        let file = create_output(output, self.strict)?;
        let mut writer = ZipWriter::new(BufWriter::new(file));
        let mut stats = RewriteStats::default();

        for index in 0..archive.len() {
            let header = MemberHeader::read(&mut archive, input, index)?;
            let name = header.name.clone();

            if let Some(removable) = self.removable {
                if !removable.retains(&name) {
                    trace!("Dropping {}", name);
                    stats.removed += 1;
                    continue;
                }
            }

            header.ensure_supported(input)?;
            let mut options = self.member_options(header.method);

            let mut member = archive.by_index(index).map_err(|e| Error::zip(input, e))?;
            if let Some(mode) = member.unix_mode() {
                options = options.unix_permissions(mode);
            }
            if let Some(modified) = member.last_modified() {
                options = options.last_modified_time(modified);
            }

            if member.is_dir() {
                writer
                    .add_directory(name.clone(), options)
                    .map_err(|e| Error::zip(output, e))?;
                stats.retained += 1;
                continue;
            }

            writer
                .start_file(name.clone(), options)
                .map_err(|e| Error::zip(output, e))?;

            match self.transform {
                Some(transform) if is_class_member(&name) => {
                    let mut bytes = Vec::with_capacity(member.size() as usize);
                    member
                        .read_to_end(&mut bytes)
                        .map_err(|e| Error::parse(input, Some(&name), e.to_string()))?;

                    let bytes = transform.transform(&name, bytes).map_err(|source| {
                        Error::Transform {
                            archive: input.to_path_buf(),
                            member: name.clone(),
                            source,
                        }
                    })?;

                    writer.write_all(&bytes).map_err(|e| Error::io(output, e))?;
                    stats.transformed += 1;
                }
                _ => {
                    std::io::copy(&mut member, &mut writer).map_err(|e| Error::io(input, e))?;
                }
            }

            stats.retained += 1;
        }

        writer
            .finish()
            .map_err(|e| Error::zip(output, e))?
            .flush()
            .map_err(|e| Error::io(output, e))?;

        debug!(
            "{}: {} retained, {} removed, {} transformed",
            input.display(),
            stats.retained,
            stats.removed,
            stats.transformed
        );

        Ok(stats)
    }

    /// Storage for a retained member of a supported `method`
    fn member_options(&self, method: CompressionMethod) -> SimpleFileOptions {
        let options = SimpleFileOptions::default();
        match (method, self.compression_level) {
            (CompressionMethod::Deflated, Some(0)) => options.compression_method(CompressionMethod::Stored),
            // The compressed size is recomputed by the writer
            (CompressionMethod::Deflated, level) => options
                .compression_method(CompressionMethod::Deflated)
                .compression_level(level),
            (other, _) => options.compression_method(other),
        }
    }
}

impl Default for ArchiveRewriter<'_> {
    fn default() -> Self {
        Self::new()
    }
}
