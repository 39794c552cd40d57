//! Runtime initialization and setup
//!
//! Wires storage, the AI provider and the decision engine into an orchestrator.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use crate::ai::provider_from_config;
use crate::app::{config::AppConfig, logging::init_logging};
use crate::error::Error;
use crate::storage::StorageFactory;
use crate::workflow::{DecisionEngine, InterviewOrchestrator};

/// Build the orchestrator described by `config`
pub async fn build_orchestrator(config: &AppConfig) -> Result<InterviewOrchestrator> {
    let storage = StorageFactory::from_config(&config.storage)
        .await
        .map_err(Error::from)?;
    let ai = provider_from_config(&config.ai)?;
    let engine = DecisionEngine::with_defaults()?;

    if config.ai.api_key.is_none() {
        warn!("OPENAI_API_KEY not set, using the mock AI provider");
    }
    info!(
        backend = ?config.storage.backend,
        live_state = ?config.storage.live_state,
        model = %config.ai.model,
        "Runtime initialized"
    );

    Ok(InterviewOrchestrator::new(storage, ai, engine))
}

/// Initialize logging and build the application runtime
pub async fn initialize_app(config: &AppConfig) -> Result<Arc<InterviewOrchestrator>> {
    init_logging(config);
    Ok(Arc::new(build_orchestrator(config).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_config_builds_in_memory_runtime() {
        let orchestrator = build_orchestrator(&AppConfig::default()).await.unwrap();
        let screening = orchestrator
            .engine()
            .config(crate::domain::RoundType::Screening);
        assert_eq!(screening.pass_threshold, 60);
    }
}
