use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tree_ledger::config::AppConfig;
use tree_ledger::error::AppError;
use tree_ledger::identity::IdentityToolkitVerifier;
use tree_ledger::records::RecordService;
use tree_ledger::storage::SheetsRecordStore;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type LedgerService = RecordService<SheetsRecordStore, IdentityToolkitVerifier>;

/// One outbound client shared by the sheet store and the identity verifier.
pub(crate) fn http_client(config: &AppConfig) -> Result<reqwest::Client, AppError> {
    let client = reqwest::Client::builder()
        .timeout(config.upstream_timeout)
        .user_agent(format!("tree-ledger/{}", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

pub(crate) fn ledger_service(config: &AppConfig) -> Result<LedgerService, AppError> {
    let client = http_client(config)?;
    let store = SheetsRecordStore::new(client.clone(), &config.sheets)?;
    let verifier = IdentityToolkitVerifier::new(client, &config.identity);
    Ok(RecordService::new(Arc::new(store), Arc::new(verifier)))
}
