// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of usd-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::path::{Component, Path, PathBuf};

/// Scene file extensions accepted by the cache, compared case-insensitively.
pub const SCENE_EXTENSIONS: [&str; 4] = ["usd", "usda", "usdc", "usdz"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("File path cannot be empty")]
    Empty,
    #[error("File does not exist: {0}")]
    NotFound(String),
    #[error("Path is not a file: {0}")]
    NotAFile(String),
    #[error("File is not readable: {0}")]
    NotReadable(String),
    #[error("File does not have a valid USD extension: {0}")]
    InvalidExtension(String),
}

/// Checks that `path` names an existing, readable scene file.
///
/// Checks run in a fixed order and the first failure wins.
pub fn validate_scene_path(path: &str) -> Result<(), PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }

    let fs_path = Path::new(path);
    let metadata = match fs::metadata(fs_path) {
        Ok(metadata) => metadata,
        Err(_) => return Err(PathError::NotFound(path.to_owned())),
    };
    if !metadata.is_file() {
        return Err(PathError::NotAFile(path.to_owned()));
    }
    if fs::File::open(fs_path).is_err() {
        return Err(PathError::NotReadable(path.to_owned()));
    }
    if !has_scene_extension(fs_path) {
        return Err(PathError::InvalidExtension(path.to_owned()));
    }
    Ok(())
}

pub fn has_scene_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SCENE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

/// Absolute, normalized form of `path` used as the cache key.
///
/// Existing paths are resolved through the filesystem. Missing ones are made absolute against
/// the current directory and cleaned lexically so entries stay addressable after deletion.
pub fn canonicalize(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    normalize_lexically(&absolute)
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
