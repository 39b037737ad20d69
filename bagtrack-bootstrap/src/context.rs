use std::sync::Arc;

use anyhow::Result;
use clickhouse::Client;
use tracing::info;

use bagtrack_application::{AppState, Metrics};
use bagtrack_domain::{Clock, RuntimeConfig, ScanEventRepository, StorageBackend, StorageConfig};
use bagtrack_infrastructure::{
    AppConfig, ClickhouseScanRepository, InMemoryScanRepository, SqliteScanRepository,
    SystemClock,
};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let scan_repo = open_scan_repository(&config.to_storage_config()).await?;
        Ok(Self::from_parts(
            config.to_runtime_config(),
            scan_repo,
            Arc::new(SystemClock),
        ))
    }

    pub fn from_parts(
        config: RuntimeConfig,
        scan_repo: Arc<dyn ScanEventRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let state = AppState {
            config,
            scan_repo,
            clock,
            metrics: Arc::new(Metrics::default()),
        };
        Self { state }
    }
}

/// Opens the configured scan log and makes sure its table exists.
pub async fn open_scan_repository(
    storage: &StorageConfig,
) -> Result<Arc<dyn ScanEventRepository>> {
    let repo: Arc<dyn ScanEventRepository> = match storage.backend {
        StorageBackend::Memory => Arc::new(InMemoryScanRepository::new()),
        StorageBackend::Sqlite => Arc::new(SqliteScanRepository::open(&storage.sqlite_path)?),
        StorageBackend::Clickhouse => {
            let mut client = Client::default()
                .with_url(&storage.clickhouse_url)
                .with_database(&storage.clickhouse_database);
            if let Some(user) = &storage.clickhouse_user {
                client = client.with_user(user);
            }
            if let Some(password) = &storage.clickhouse_password {
                client = client.with_password(password);
            }
            Arc::new(ClickhouseScanRepository::new(
                client,
                storage.clickhouse_database.clone(),
            ))
        }
    };
    repo.ensure_schema().await?;
    info!("scan log backend: {}", storage.backend);
    Ok(repo)
}
