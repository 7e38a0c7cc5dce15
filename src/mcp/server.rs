// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of usd-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::num::NonZeroUsize;
use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::{Json, Parameters};
use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData, ServerHandler, ServiceExt};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::cache::{canonicalize, PathError, StageCache, StageError};
use crate::engine::{SceneEngine, UsdaEngine};
use crate::model::{PrimPath, Stage};
use crate::query::{self, QueryError, UNLIMITED_DEPTH};
use crate::render::render_hierarchy_text;

use super::types::*;

/// Engine type held by the server's cache.
pub type DynSceneEngine = Box<dyn SceneEngine<Stage = Stage> + Send + Sync>;

/// MCP tool server over one shared [`StageCache`].
///
/// Every tool that needs a stage goes through [`StageCache::load`] while holding the cache lock,
/// so concurrent requests never open the same file twice.
#[derive(Clone)]
pub struct UsdMcp {
    cache: Arc<Mutex<StageCache<DynSceneEngine>>>,
    tool_router: ToolRouter<Self>,
}

impl Default for UsdMcp {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl UsdMcp {
    pub fn new() -> Self {
        Self::with_capacity(None)
    }

    pub fn with_capacity(capacity: Option<NonZeroUsize>) -> Self {
        Self::with_engine(Box::new(UsdaEngine::new()), capacity)
    }

    pub fn with_engine(engine: DynSceneEngine, capacity: Option<NonZeroUsize>) -> Self {
        let cache = match capacity {
            Some(capacity) => StageCache::with_capacity(engine, capacity),
            None => StageCache::new(engine),
        };
        Self { cache: Arc::new(Mutex::new(cache)), tool_router: Self::tool_router() }
    }

    pub async fn serve_stdio(self) -> Result<(), rmcp::RmcpError> {
        info!("serving MCP over stdio");
        let service = self.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
        service.waiting().await?;
        Ok(())
    }

    async fn load_stage(&self, file_path: &str) -> Result<Arc<Stage>, ErrorData> {
        let mut cache = self.cache.lock().await;
        cache.load(file_path).map_err(|err| stage_error_to_mcp(err, file_path))
    }

    /// Load a scene file into the stage cache and summarize it; start here.
    #[tool(name = "stage.load")]
    async fn stage_load(
        &self,
        params: Parameters<StageLoadParams>,
    ) -> Result<Json<StageLoadResponse>, ErrorData> {
        let StageLoadParams { file_path } = params.0;
        let stage = self.load_stage(&file_path).await?;

        Ok(Json(StageLoadResponse {
            file_path: canonical_display(&file_path),
            stage: query::stage_info(&stage),
        }))
    }

    /// Prim tree from the pseudo-root, as structured nodes and as indented text; use
    /// `max_depth` to cut large scenes short.
    #[tool(name = "stage.hierarchy")]
    async fn stage_hierarchy(
        &self,
        params: Parameters<StageHierarchyParams>,
    ) -> Result<Json<StageHierarchyResponse>, ErrorData> {
        let StageHierarchyParams { file_path, max_depth } = params.0;
        let max_depth = max_depth.unwrap_or(UNLIMITED_DEPTH);
        if max_depth < UNLIMITED_DEPTH {
            return Err(query_error_to_mcp(QueryError::InvalidMaxDepth(max_depth), None, ""));
        }

        let stage = self.load_stage(&file_path).await?;
        let hierarchy = query::hierarchy(&stage, max_depth)
            .map_err(|err| query_error_to_mcp(err, Some(&stage), ""))?;
        let text = render_hierarchy_text(&hierarchy);

        Ok(Json(StageHierarchyResponse {
            file_path: canonical_display(&file_path),
            max_depth,
            total_prims: hierarchy.count(),
            hierarchy,
            text,
        }))
    }

    /// Full detail for one prim: metadata flags, parent, visible children and properties.
    #[tool(name = "prim.inspect")]
    async fn prim_inspect(
        &self,
        params: Parameters<PrimTargetParams>,
    ) -> Result<Json<PrimInspectResponse>, ErrorData> {
        let PrimTargetParams { file_path, prim_path } = params.0;
        validate_prim_path_param(&prim_path)?;

        let stage = self.load_stage(&file_path).await?;
        let prim = query::inspect_prim(&stage, &prim_path)
            .map_err(|err| query_error_to_mcp(err, Some(&stage), &prim_path))?;

        Ok(Json(PrimInspectResponse { file_path: canonical_display(&file_path), prim }))
    }

    /// Properties (attributes and relationships) declared on one prim.
    #[tool(name = "prim.properties")]
    async fn prim_properties(
        &self,
        params: Parameters<PrimTargetParams>,
    ) -> Result<Json<PrimPropertiesResponse>, ErrorData> {
        let PrimTargetParams { file_path, prim_path } = params.0;
        validate_prim_path_param(&prim_path)?;

        let stage = self.load_stage(&file_path).await?;
        let properties = query::prim_properties(&stage, &prim_path)
            .map_err(|err| query_error_to_mcp(err, Some(&stage), &prim_path))?;

        Ok(Json(PrimPropertiesResponse {
            file_path: canonical_display(&file_path),
            prim_path,
            property_count: properties.len() as u64,
            properties,
        }))
    }

    /// Every active, defined, non-abstract prim; optionally only those of one exact type.
    #[tool(name = "prim.list")]
    async fn prim_list(
        &self,
        params: Parameters<PrimListParams>,
    ) -> Result<Json<PrimListResponse>, ErrorData> {
        let PrimListParams { file_path, prim_type } = params.0;
        let stage = self.load_stage(&file_path).await?;
        let prims = query::list_prims(&stage, prim_type.as_deref());

        Ok(Json(PrimListResponse {
            file_path: canonical_display(&file_path),
            count: prims.len() as u64,
            prims,
        }))
    }

    /// Prims whose name equals `name_pattern` exactly.
    #[tool(name = "prim.find")]
    async fn prim_find(
        &self,
        params: Parameters<PrimFindParams>,
    ) -> Result<Json<PrimListResponse>, ErrorData> {
        let PrimFindParams { file_path, name_pattern } = params.0;
        if name_pattern.is_empty() {
            return Err(ErrorData::invalid_params(
                "name_pattern cannot be empty",
                Some(serde_json::json!({ "name_pattern": name_pattern })),
            ));
        }

        let stage = self.load_stage(&file_path).await?;
        let prims = query::find_prims_by_name(&stage, &name_pattern);

        Ok(Json(PrimListResponse {
            file_path: canonical_display(&file_path),
            count: prims.len() as u64,
            prims,
        }))
    }

    /// Cached stages with their validity; never loads or evicts anything.
    #[tool(name = "cache.info")]
    async fn cache_info(&self) -> Result<Json<CacheInfoResponse>, ErrorData> {
        let cache = self.cache.lock().await;
        let entries = cache.cache_info();

        Ok(Json(CacheInfoResponse {
            count: entries.len() as u64,
            capacity: cache.capacity().map(|capacity| capacity.get() as u64),
            entries,
        }))
    }

    /// Drop one stage from the cache so the next request reopens it.
    #[tool(name = "cache.remove")]
    async fn cache_remove(
        &self,
        params: Parameters<CacheRemoveParams>,
    ) -> Result<Json<CacheRemoveResponse>, ErrorData> {
        let CacheRemoveParams { file_path } = params.0;
        if file_path.is_empty() {
            return Err(stage_error_to_mcp(StageError::InvalidPath(PathError::Empty), &file_path));
        }

        let removed = self.cache.lock().await.remove(&file_path);
        debug!(file_path = %file_path, removed, "cache.remove");

        Ok(Json(CacheRemoveResponse { file_path: canonical_display(&file_path), removed }))
    }

    /// Drop every cached stage.
    #[tool(name = "cache.clear")]
    async fn cache_clear(&self) -> Result<Json<CacheClearResponse>, ErrorData> {
        let cleared = self.cache.lock().await.clear();
        Ok(Json(CacheClearResponse { cleared: cleared as u64 }))
    }
}

#[tool_handler]
impl ServerHandler for UsdMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "USD scene inspection server (tools: stage.load, stage.hierarchy, prim.inspect, prim.properties, prim.list, prim.find, cache.info, cache.remove, cache.clear). Text layers are read as an outline: composition arcs are reported but not resolved, and attribute values are returned as authored text."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// Error mapping and small argument helpers for the tool handlers.
include!("server/helpers.rs");
