// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of usd-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// MCP server helper functions:
/// error mapping for cache and query failures, prim path argument checks, path display.
fn stage_error_to_mcp(err: StageError, file_path: &str) -> ErrorData {
    let data = Some(serde_json::json!({ "file_path": file_path }));
    match err {
        StageError::InvalidPath(err) => ErrorData::invalid_params(err.to_string(), data),
        StageError::Open { .. } | StageError::Unusable { .. } => {
            ErrorData::invalid_request(err.to_string(), data)
        }
    }
}

/// `stage` enables "did you mean" suggestions for missing prims.
fn query_error_to_mcp(err: QueryError, stage: Option<&Stage>, prim_path: &str) -> ErrorData {
    match err {
        QueryError::InvalidPrimPath(err) => ErrorData::invalid_params(
            err.to_string(),
            Some(serde_json::json!({ "prim_path": prim_path })),
        ),
        QueryError::PrimNotFound(_) => {
            let suggestions = stage
                .map(|stage| query::similar_prim_paths(stage, prim_path))
                .unwrap_or_default();
            ErrorData::resource_not_found(
                err.to_string(),
                Some(serde_json::json!({ "prim_path": prim_path, "suggestions": suggestions })),
            )
        }
        QueryError::InvalidMaxDepth(max_depth) => ErrorData::invalid_params(
            err.to_string(),
            Some(serde_json::json!({ "max_depth": max_depth })),
        ),
    }
}

fn validate_prim_path_param(prim_path: &str) -> Result<(), ErrorData> {
    PrimPath::new(prim_path)
        .map(|_| ())
        .map_err(|err| query_error_to_mcp(QueryError::InvalidPrimPath(err), None, prim_path))
}

fn canonical_display(file_path: &str) -> String {
    canonicalize(std::path::Path::new(file_path)).display().to_string()
}
