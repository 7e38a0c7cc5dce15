// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of usd-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Outline reader for `.usda` text layers.
//!
//! Produces the prim tree of a single layer. Composition arcs are not followed and property
//! values are stored as their authored source text.

mod lexer;
mod parser;

pub use parser::parse_usda;

/// Magic prefix every text layer starts with.
pub const USDA_HEADER: &str = "#usda";

/// Deepest prim nesting a layer may author.
pub const MAX_PRIM_DEPTH: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct UsdaParseError {
    pub line: usize,
    pub kind: UsdaParseErrorKind,
}

impl UsdaParseError {
    pub fn new(line: usize, kind: UsdaParseErrorKind) -> Self {
        Self { line, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsdaParseErrorKind {
    #[error("missing `#usda` header")]
    MissingHeader,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("unterminated string")]
    UnterminatedString,
    #[error("unterminated asset path")]
    UnterminatedAsset,
    #[error("unterminated prim path")]
    UnterminatedPath,
    #[error("expected {expected}, found `{found}`")]
    UnexpectedToken { expected: &'static str, found: String },
    #[error("unexpected end of layer, expected {expected}")]
    UnexpectedEof { expected: &'static str },
    #[error("invalid prim name `{name}`")]
    InvalidPrimName { name: String },
    #[error("unbalanced `{open}`")]
    Unbalanced { open: char },
    #[error("prims nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

#[cfg(test)]
mod tests;
