use crate::archive::create_output;
use crate::error::{Error, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE_NAME: &str = "classpath.txt";

/// Write `classpath.txt`: one file name per line, no trailing newline
pub fn write_manifest(output_directory: &Path, names: &[&str], strict: bool) -> Result<PathBuf> {
    let path = output_directory.join(MANIFEST_FILE_NAME);
    let mut file = create_output(&path, strict)?;

    file.write_all(names.join("\n").as_bytes())
        .and_then(|_| file.flush())
        .map_err(|e| Error::io(&path, e))?;

    Ok(path)
}
