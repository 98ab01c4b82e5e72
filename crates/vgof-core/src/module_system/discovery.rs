use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use crate::module_system::error::ModuleSystemError;

/// List the module names available in `dir`.
///
/// Only regular files directly inside `dir` whose extension is exactly
/// `extension` count; the name is the file name without that extension.
/// Names come back sorted so discovery order does not depend on the file
/// system.
pub fn discover_modules(dir: &Path, extension: &str) -> Result<Vec<String>, ModuleSystemError> {
    let extension = extension.trim_start_matches('.');
    let entries = fs::read_dir(dir)
        .map_err(|e| ModuleSystemError::io(e, "read_dir", dir.to_path_buf()))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ModuleSystemError::io(e, "read_dir_entry", dir.to_path_buf()))?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(OsStr::to_str) != Some(extension) {
            continue;
        }
        match path.file_stem().and_then(OsStr::to_str) {
            Some(stem) if !stem.is_empty() => names.push(stem.to_string()),
            _ => log::warn!("Skipping module file with unusable name: {}", path.display()),
        }
    }

    if names.is_empty() {
        return Err(ModuleSystemError::NoModulesFound {
            location: dir.display().to_string(),
            extension: extension.to_string(),
        });
    }

    names.sort();
    log::debug!("Discovered {} module(s) in {}: {:?}", names.len(), dir.display(), names);
    Ok(names)
}
