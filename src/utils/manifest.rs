// project version lookup from package manifests

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// read the project version from `Cargo.toml`, or `package.json` when there
/// is no Cargo manifest
///
/// returns `None` when neither file exists or neither declares a version
pub fn read_project_version<P: AsRef<Path>>(directory: P) -> Result<Option<String>> {
    let directory = directory.as_ref();

    if let Some(version) = read_cargo_version(directory)? {
        return Ok(Some(version));
    }

    read_package_json_version(directory)
}

/// `[package].version` from `Cargo.toml`
pub fn read_cargo_version<P: AsRef<Path>>(directory: P) -> Result<Option<String>> {
    let path = directory.as_ref().join("Cargo.toml");
    if !path.is_file() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path).map_err(|e| Error::FileReadError {
        path: path.clone(),
        source: e,
    })?;
    let manifest: toml::Table = toml::from_str(&content).map_err(|e| Error::TomlParseError {
        path: path.clone(),
        source: e,
    })?;

    let version = manifest
        .get("package")
        .and_then(|p| p.get("version"))
        .and_then(|v| v.as_str())
        .map(str::to_string);

    debug!(path = %path.display(), ?version, "read cargo manifest");
    Ok(version)
}

/// top-level `version` from `package.json`
pub fn read_package_json_version<P: AsRef<Path>>(directory: P) -> Result<Option<String>> {
    let path = directory.as_ref().join("package.json");
    if !path.is_file() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path).map_err(|e| Error::FileReadError {
        path: path.clone(),
        source: e,
    })?;
    let package: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| Error::JsonParseError {
            path: path.clone(),
            source: e,
        })?;

    let version = package
        .get("version")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    debug!(path = %path.display(), ?version, "read package.json");
    Ok(version)
}
