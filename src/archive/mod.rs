//! Reading, copying and rewriting ZIP/JAR archives

mod rewriter;

pub use rewriter::{ArchiveRewriter, RewriteStats};

use crate::error::{Error, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Seek};
use std::path::Path;
use zip::result::ZipError;
use zip::{CompressionMethod, ZipArchive};

/// Name and storage of one member, read without selecting a decompressor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberHeader {
    pub name: String,
    pub method: CompressionMethod,
    pub is_dir: bool,
}

impl MemberHeader {
    /// Read the header of the member at `index`
    pub fn read<R: Read + Seek>(archive: &mut ZipArchive<R>, archive_path: &Path, index: usize) -> Result<Self> {
        let raw = archive
            .by_index_raw(index)
            .map_err(|e| Error::zip(archive_path, e))?;
        Ok(Self {
            name: raw.name().to_string(),
            method: raw.compression(),
            is_dir: raw.is_dir(),
        })
    }

    /// Only stored and deflated members can be read and written back
    pub fn ensure_supported(&self, archive_path: &Path) -> Result<()> {
        match self.method {
            CompressionMethod::Stored | CompressionMethod::Deflated => Ok(()),
            other => Err(Error::UnsupportedStorage {
                archive: archive_path.to_path_buf(),
                member: self.name.clone(),
                method: format!("{:?}", other),
            }),
        }
    }
}

/// Open an archive for random access
///
/// A file that is not a readable ZIP container is a parse error.
pub fn open_archive(path: &Path) -> Result<ZipArchive<BufReader<File>>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    ZipArchive::new(BufReader::new(file)).map_err(|e| match e {
        ZipError::Io(source) => Error::io(path, source),
        other => Error::parse(path, None, other.to_string()),
    })
}

/// Read a member's decompressed bytes, or `None` if the archive has no such member
pub fn read_member<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    archive_path: &Path,
    name: &str,
) -> Result<Option<Vec<u8>>> {
    let Some(index) = archive.index_for_name(name) else {
        return Ok(None);
    };
    MemberHeader::read(archive, archive_path, index)?.ensure_supported(archive_path)?;

    let mut member = archive.by_index(index).map_err(|e| Error::zip(archive_path, e))?;

    let mut bytes = Vec::with_capacity(member.size() as usize);
    member
        .read_to_end(&mut bytes)
        .map_err(|e| Error::parse(archive_path, Some(name), e.to_string()))?;
    Ok(Some(bytes))
}

/// Copy an archive byte for byte
pub fn copy_archive(input: &Path, output: &Path, strict: bool) -> Result<u64> {
    let mut source = File::open(input).map_err(|e| Error::io(input, e))?;
    let mut target = BufWriter::new(create_output(output, strict)?);
    let copied = std::io::copy(&mut source, &mut target).map_err(|e| Error::io(output, e))?;
    target
        .into_inner()
        .map_err(|e| Error::io(output, e.into_error()))?;
    Ok(copied)
}

/// Create an output file; in strict mode an existing file is an error
pub(crate) fn create_output(path: &Path, strict: bool) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true);
    if strict {
        options.create_new(true);
    } else {
        options.create(true).truncate(true);
    }
    options.open(path).map_err(|e| Error::io(path, e))
}
