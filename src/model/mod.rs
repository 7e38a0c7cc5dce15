// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of usd-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Scene data model.
//!
//! A stage is the prim tree of one root layer; prims carry their property declarations with
//! values kept as authored text.

pub mod prim;
pub mod prim_path;
pub mod stage;

pub use prim::{Attribute, Prim, PrimId, Property, Relationship, Specifier, Variability};
pub use prim_path::{PrimPath, PrimPathError};
pub use stage::{LayerMetadata, Stage, Traverse, DEFAULT_TIME_CODES_PER_SECOND};
