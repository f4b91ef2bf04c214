// ABOUTME: Command implementations for pantry-cli
// ABOUTME: Loads request, catalog, and config files, runs the engine, and renders JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use pantry_chef::collaborators::{FixtureDiscovery, HeuristicArbiter};
use pantry_chef::config::EngineConfig;
use pantry_chef::engine::{Recommendation, RecommendationEngine};
use pantry_core::models::ConstraintsRequest;
use serde::Deserialize;
use serde_json::json;
use tokio::fs;
use tracing::info;

/// Request file: the pantry plus every constraint field at the top level
#[derive(Debug, Deserialize)]
struct RequestFile {
    ingredients: Vec<String>,
    #[serde(flatten)]
    constraints: ConstraintsRequest,
}

/// Engine configuration from a JSON file, or from the environment when none is given
pub async fn load_engine_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::from_env());
    };
    let raw = fs::read_to_string(path)
        .await
        .map_err(|e| anyhow!("cannot read config {}: {e}", path.display()))?;
    EngineConfig::from_json(&raw).map_err(|e| anyhow!("invalid config {}: {e}", path.display()))
}

async fn run(
    config: EngineConfig,
    request_path: &Path,
    recipes_path: &Path,
) -> Result<Recommendation> {
    let raw = fs::read_to_string(request_path)
        .await
        .map_err(|e| anyhow!("cannot read request {}: {e}", request_path.display()))?;
    let request: RequestFile = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid request {}: {e}", request_path.display()))?;

    let discovery = FixtureDiscovery::from_path(recipes_path).await?;
    info!(recipes = discovery.len(), "Recipe catalog loaded");

    let engine = RecommendationEngine::new(
        config,
        Arc::new(discovery),
        Arc::new(HeuristicArbiter::new()),
    )?;
    Ok(engine
        .recommend(&request.ingredients, &request.constraints)
        .await?)
}

/// Run the engine and render the recommendation
pub async fn recommend(
    config: EngineConfig,
    request_path: &Path,
    recipes_path: &Path,
    pretty: bool,
) -> Result<String> {
    let recommendation = run(config, request_path, recipes_path).await?;
    let rendered = if pretty {
        serde_json::to_string_pretty(&recommendation)?
    } else {
        serde_json::to_string(&recommendation)?
    };
    Ok(rendered)
}

/// Run the engine and render one candidate's explanation
pub async fn explain(
    config: EngineConfig,
    request_path: &Path,
    recipes_path: &Path,
    candidate_id: &str,
) -> Result<String> {
    let recommendation = run(config, request_path, recipes_path).await?;
    let explanation = recommendation.explain(candidate_id).ok_or_else(|| {
        anyhow!(
            "candidate {candidate_id} was not evaluated; evaluated: {}",
            recommendation.evaluated_ids().join(", ")
        )
    })?;
    let returned = recommendation.items.iter().any(|item| item.id == candidate_id);
    Ok(serde_json::to_string_pretty(&json!({
        "request_id": recommendation.request_id,
        "returned": returned,
        "explanation": explanation,
    }))?)
}
