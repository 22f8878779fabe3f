use crate::guard::ApprovedPath;
use serde::Serialize;
use std::{fs, io};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "isDir")]
    pub is_dir: bool,
    pub size: u64,
}

#[derive(Debug, Error)]
pub enum ListError {
    #[error("{0}")]
    Open(#[source] io::Error),
    #[error("{0}")]
    Read(#[source] io::Error),
}

/// Immediate children of an approved directory, in the order the filesystem
/// returns them. Symlinks are reported as themselves, not followed.
pub fn list(dir: &ApprovedPath) -> Result<Vec<DirEntry>, ListError> {
    let parent = dir.as_path();
    let reader = fs::read_dir(parent).map_err(ListError::Open)?;

    let mut out = Vec::new();
    for entry in reader {
        let entry = entry.map_err(ListError::Read)?;
        let meta = match entry.metadata() {
            Ok(m) => m,
            // removed between readdir and lstat
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(ListError::Read(e)),
        };
        let name = entry.file_name();
        out.push(DirEntry {
            name: name.to_string_lossy().into_owned(),
            path: parent.join(&name).to_string_lossy().into_owned(),
            is_dir: meta.is_dir(),
            size: meta.len(),
        });
    }
    Ok(out)
}
