use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use aos_config::AosConfig;
use aos_core::entities::AnalysisResult;
use aos_db::retry::RetryConfig;
use aos_db::service::AosService;
use aos_oracle::{AnalysisContext, AnalysisGateway, ChatOracle, ChatOracleConfig, OracleError};
use aos_orchestrator::{EscalationEngine, FeedbackOrchestrator};
use async_trait::async_trait;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: AosService,
    pub config: AosConfig,
    pub escalation: EscalationEngine,
    pub feedback: FeedbackOrchestrator,
}

impl AppContext {
    /// Open the store and wire the orchestrators from `config`.
    pub async fn init(project_root: &Path, config: AosConfig) -> anyhow::Result<Self> {
        let db_path = resolve_store_path(project_root, &config.store.db_path);
        let trail_dir = config
            .store
            .trail_path()
            .map(|dir| resolve_under(project_root, &dir));

        let service = AosService::new_local(&db_path, trail_dir)
            .await
            .context("failed to initialize aos-db service")?;

        let escalation = EscalationEngine::new(
            config.escalation.policy(),
            RetryConfig {
                max_attempts: config.escalation.cas_max_attempts,
                base_delay: config.escalation.base_delay(),
                max_delay: config.escalation.max_delay(),
            },
        );

        let feedback = FeedbackOrchestrator::new(build_gateway(&config)?, config.oracle.timeout())
            .with_default_supervisor(
                &config.general.default_supervisor_id,
                &config.general.default_supervisor_name,
            );

        Ok(Self {
            service,
            config,
            escalation,
            feedback,
        })
    }
}

/// Load config with the project root as the working directory, so
/// `.aos/config.toml` and `.env` are found there.
pub fn load_config(project_root: &Path) -> anyhow::Result<AosConfig> {
    std::env::set_current_dir(project_root).with_context(|| {
        format!("failed to enter project root {}", project_root.display())
    })?;
    AosConfig::load_with_dotenv().context("failed to load aos configuration")
}

fn build_gateway(config: &AosConfig) -> anyhow::Result<Arc<dyn AnalysisGateway>> {
    if !config.oracle.is_configured() {
        return Ok(Arc::new(OfflineGateway));
    }
    let oracle = ChatOracle::new(ChatOracleConfig {
        base_url: config.oracle.base_url.clone(),
        api_key: config.oracle.api_key.clone(),
        model: config.oracle.model.clone(),
        temperature: config.oracle.temperature,
    })
    .context("failed to build oracle client")?;
    Ok(Arc::new(oracle))
}

/// Stand-in when no oracle is configured. Every analysis fails as
/// unavailable, so submissions still land as `error` sessions that can be
/// resubmitted once credentials exist.
pub struct OfflineGateway;

#[async_trait]
impl AnalysisGateway for OfflineGateway {
    async fn analyze(&self, _ctx: &AnalysisContext) -> Result<AnalysisResult, OracleError> {
        Err(OracleError::NotConfigured)
    }
}

fn resolve_store_path(root: &Path, db_path: &str) -> String {
    if db_path == ":memory:" {
        return db_path.to_string();
    }
    resolve_under(root, Path::new(db_path))
        .to_string_lossy()
        .into_owned()
}

fn resolve_under(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use pretty_assertions::assert_eq;

    use super::{resolve_store_path, resolve_under};

    #[test]
    fn relative_store_paths_land_under_the_project() {
        let root = Path::new("/work/acme");
        assert_eq!(resolve_store_path(root, ".aos/aos.db"), "/work/acme/.aos/aos.db");
        assert_eq!(resolve_store_path(root, "/var/lib/aos.db"), "/var/lib/aos.db");
        assert_eq!(resolve_store_path(root, ":memory:"), ":memory:");
        assert_eq!(
            resolve_under(root, Path::new(".aos/trail")),
            PathBuf::from("/work/acme/.aos/trail")
        );
    }
}
