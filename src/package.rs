use crate::args::{Value, ValueKind};
use crate::error::CompileError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const PACKAGE_FILE: &str = "blueprint.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(rename = "type")]
    pub kind: ValueKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub depends_on: Vec<String>,
    /// Name of a bool parameter; the resource exists only when it is true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,
}

/// A blueprint package: the entrypoint's parameters and the resources it declares.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, Parameter>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl Package {
    pub fn load(path: &Path) -> Result<Self, CompileError> {
        debug!("Loading package from: {}", path.display());
        let file = fs::File::open(path).map_err(|source| CompileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CompileError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Turns a user-supplied package path into the package file to read; a
/// directory means the package file inside it.
pub fn resolve_package_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(PACKAGE_FILE)
    } else {
        path.to_path_buf()
    }
}

/// Walks up from `start` looking for a package file.
pub fn find_package(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(PACKAGE_FILE))
        .find(|candidate| candidate.is_file())
}
