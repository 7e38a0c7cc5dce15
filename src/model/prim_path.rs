// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of usd-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

const INVALID_PRIM_PATH_CHARS: [char; 6] = ['<', '>', '"', '|', '?', '*'];

/// An absolute prim path such as `/World/Geom/sphere`.
///
/// Only the shape callers can get wrong is checked here (absolute, no reserved characters);
/// whether the path names an authored prim is a stage lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimPath {
    value: String,
}

impl PrimPath {
    pub fn new(value: impl Into<String>) -> Result<Self, PrimPathError> {
        let value = value.into();
        validate_prim_path(&value)?;
        Ok(Self { value })
    }

    /// The pseudo-root path `/`.
    pub fn root() -> Self {
        Self { value: "/".to_owned() }
    }

    pub fn is_root(&self) -> bool {
        self.value == "/"
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Last path element; empty for the pseudo-root.
    pub fn name(&self) -> &str {
        self.value.rsplit('/').next().unwrap_or_default()
    }

    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        match self.value.rfind('/') {
            Some(0) | None => Some(Self::root()),
            Some(idx) => Some(Self { value: self.value[..idx].to_owned() }),
        }
    }

    pub(crate) fn child(&self, name: &str) -> Self {
        let value =
            if self.is_root() { format!("/{name}") } else { format!("{}/{name}", self.value) };
        Self { value }
    }
}

impl fmt::Display for PrimPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for PrimPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for PrimPath {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for PrimPath {
    type Err = PrimPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimPathError {
    #[error("Prim path cannot be empty")]
    Empty,
    #[error("Prim path must start with '/'")]
    NotAbsolute,
    #[error("Prim path contains invalid character '{ch}': {path}")]
    InvalidChar { ch: char, path: String },
}

fn validate_prim_path(value: &str) -> Result<(), PrimPathError> {
    if value.is_empty() {
        return Err(PrimPathError::Empty);
    }
    if !value.starts_with('/') {
        return Err(PrimPathError::NotAbsolute);
    }
    if let Some(ch) = value.chars().find(|ch| INVALID_PRIM_PATH_CHARS.contains(ch)) {
        return Err(PrimPathError::InvalidChar { ch, path: value.to_owned() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{PrimPath, PrimPathError};

    #[test]
    fn rejects_empty_and_relative_paths() {
        assert_eq!(PrimPath::new(""), Err(PrimPathError::Empty));
        assert_eq!(PrimPath::new("hello/world"), Err(PrimPathError::NotAbsolute));
    }

    #[test]
    fn rejects_reserved_characters() {
        let err = PrimPath::new("/hello/wor*ld").unwrap_err();
        assert_eq!(
            err,
            PrimPathError::InvalidChar { ch: '*', path: "/hello/wor*ld".to_owned() }
        );
        assert_eq!(
            err.to_string(),
            "Prim path contains invalid character '*': /hello/wor*ld"
        );
    }

    #[test]
    fn child_and_parent_walk_the_namespace() {
        let root = PrimPath::root();
        let hello = root.child("hello");
        let world = hello.child("world");

        assert_eq!(hello.as_str(), "/hello");
        assert_eq!(world.as_str(), "/hello/world");
        assert_eq!(world.name(), "world");
        assert_eq!(world.parent(), Some(hello.clone()));
        assert_eq!(hello.parent(), Some(PrimPath::root()));
        assert_eq!(root.parent(), None);
        assert_eq!(root.name(), "");
    }
}
