// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of usd-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Scene engine seam.
//!
//! The stage cache only ever talks to an engine through [`SceneEngine`] and to the handles it
//! returns through [`StageHandle`]. [`UsdaEngine`] is the bundled engine for text layers.

use std::fs;
use std::path::{Path, PathBuf};

use crate::format::usda::{parse_usda, UsdaParseError};
use crate::model::Stage;

const USDC_MAGIC: &[u8] = b"PXR-USDC";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// An opened stage as seen by the cache.
pub trait StageHandle {
    /// Root layer identifier, used for diagnostics only.
    fn identifier(&self) -> &str;

    /// Cheap liveness check: can the root layer still be resolved?
    fn root_resolvable(&self) -> bool;

    fn has_default_prim(&self) -> bool {
        false
    }
}

/// Opens stages from canonical file paths.
///
/// Repeated calls with the same path must return independent handles.
pub trait SceneEngine {
    type Stage: StageHandle;

    fn open(&self, path: &Path) -> Result<Self::Stage, OpenError>;
}

impl<E: SceneEngine + ?Sized> SceneEngine for Box<E> {
    type Stage = E::Stage;

    fn open(&self, path: &Path) -> Result<Self::Stage, OpenError> {
        (**self).open(path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("layer is not valid UTF-8: {}", path.display())]
    InvalidUtf8 { path: PathBuf },
    #[error("{0}")]
    Parse(#[from] UsdaParseError),
    #[error("unsupported layer encoding `{encoding}`: {}", path.display())]
    UnsupportedEncoding { encoding: &'static str, path: PathBuf },
}

/// Outline engine for `.usda` text layers.
///
/// `.usd` files are accepted when they carry the text header. Binary crate files and usdz
/// packages are rejected with [`OpenError::UnsupportedEncoding`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UsdaEngine;

impl UsdaEngine {
    pub fn new() -> Self {
        Self
    }
}

impl SceneEngine for UsdaEngine {
    type Stage = Stage;

    fn open(&self, path: &Path) -> Result<Stage, OpenError> {
        let bytes =
            fs::read(path).map_err(|source| OpenError::Io { path: path.to_path_buf(), source })?;

        if let Some(encoding) = sniff_binary_encoding(&bytes) {
            return Err(OpenError::UnsupportedEncoding { encoding, path: path.to_path_buf() });
        }

        let source = String::from_utf8(bytes)
            .map_err(|_| OpenError::InvalidUtf8 { path: path.to_path_buf() })?;
        Ok(parse_usda(&source, path)?)
    }
}

fn sniff_binary_encoding(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(USDC_MAGIC) {
        Some("usdc")
    } else if bytes.starts_with(ZIP_MAGIC) {
        Some("usdz")
    } else {
        None
    }
}

impl StageHandle for Stage {
    fn identifier(&self) -> &str {
        Stage::identifier(self)
    }

    fn root_resolvable(&self) -> bool {
        self.root_layer().is_file()
    }

    fn has_default_prim(&self) -> bool {
        Stage::has_default_prim(self)
    }
}
