//! Manifest file location and YAML deserialization.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::{LinkEntry, Manifest, parse_operation};
use crate::error::DotfilerError;
use crate::logging::Log;

/// Name every manifest file must have.
pub const MANIFEST_FILE_NAME: &str = "dotfiler.yml";

/// One record as it appears in the manifest file, before validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
    op: String,
    src_file_path: PathBuf,
    dst_file_path: PathBuf,
    #[serde(rename = "targetOS")]
    target_os: Vec<String>,
    target_arch: Vec<String>,
}

/// Resolve the manifest file path.
///
/// With no explicit path, the manifest is looked for in `cwd`.  Relative
/// paths are resolved against `cwd`.  A path whose text does not end in
/// [`MANIFEST_FILE_NAME`] is taken to be the containing directory.
pub fn resolve_path(explicit: Option<&Path>, cwd: &Path, log: &dyn Log) -> PathBuf {
    let path = explicit.map_or_else(|| cwd.join(MANIFEST_FILE_NAME), |p| cwd.join(p));
    if path
        .as_os_str()
        .as_encoded_bytes()
        .ends_with(MANIFEST_FILE_NAME.as_bytes())
    {
        return path;
    }
    log.warn(
        "The given manifest file path was not terminated with the manifest filename. \
         We assume it is the containing directory.",
    );
    path.join(MANIFEST_FILE_NAME)
}

/// Read and validate the manifest at `path`.
///
/// # Errors
///
/// - [`DotfilerError::ManifestNotFound`] if `path` is not an existing file
/// - [`DotfilerError::ManifestRead`] if it cannot be read
/// - [`DotfilerError::ManifestParse`] if it is not a sequence of link records
/// - [`DotfilerError::UnsupportedOperation`] if any record's `op` is unknown
pub fn load(path: &Path) -> Result<Manifest, DotfilerError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => {
            return Err(DotfilerError::ManifestNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(DotfilerError::ManifestNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(DotfilerError::ManifestRead {
                path: path.to_path_buf(),
                source,
            });
        }
    }

    let content = std::fs::read_to_string(path).map_err(|source| DotfilerError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;

    let source_dir = path.parent().map_or_else(PathBuf::new, Path::to_path_buf);
    let entries = parse_entries(&content).map_err(|source| DotfilerError::ManifestParse {
        path: path.to_path_buf(),
        source,
    })?;

    let entries = entries
        .into_iter()
        .enumerate()
        .map(|(i, raw)| {
            Ok(LinkEntry {
                operation: parse_operation(&raw.op, i + 1)?,
                source_path: raw.src_file_path,
                destination_path: raw.dst_file_path,
                target_platforms: raw.target_os.into_iter().collect(),
                target_architectures: raw.target_arch.into_iter().collect(),
            })
        })
        .collect::<Result<Vec<_>, DotfilerError>>()?;

    Ok(Manifest {
        source_dir,
        entries,
    })
}

/// Deserialize manifest text; a blank document is an empty manifest.
fn parse_entries(content: &str) -> Result<Vec<RawEntry>, serde_yaml::Error> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_yaml::from_str(content)
}
