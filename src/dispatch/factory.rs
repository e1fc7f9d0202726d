//! Dispatch adapter factory

use std::sync::Arc;

use crate::config::ProviderConfig;

use super::adapter::{AccountSelector, DispatchAdapter};
use super::http_sender::HttpSender;
use super::log_sender::LogSender;
use super::types::{MessageSender, ProviderAccount, SendError};

/// Create the dispatch adapter described by configuration.
///
/// - `kind = "http"`: an `HttpSender` posting to `endpoint`
/// - `kind = "log"` (default): a `LogSender` dry run
///
/// Any other kind is rejected. When `clients` is non-empty, accounts are
/// selected per client and the global account (if it has a from-address)
/// serves recipients without one.
pub fn create_dispatch_adapter(config: &ProviderConfig) -> Result<DispatchAdapter, SendError> {
    let sender: Arc<dyn MessageSender> = match config.kind.as_str() {
        "http" => {
            tracing::info!(endpoint = %config.endpoint, "Creating HTTP message sender");
            Arc::new(HttpSender::new(config.endpoint.clone(), config.timeout_secs)?)
        }
        "log" => {
            tracing::warn!(
                provider = "log",
                "Dry-run message sender active; no text messages will be delivered"
            );
            Arc::new(LogSender::new())
        }
        other => {
            return Err(SendError::Misconfigured(format!(
                "unknown provider kind {:?} (expected \"http\" or \"log\")",
                other
            )));
        }
    };

    let global = ProviderAccount::new(
        config.from_address.clone(),
        config.account_id.clone(),
        config.auth_token.clone(),
    );

    let accounts = if config.clients.is_empty() {
        AccountSelector::Global(global)
    } else {
        let clients = config
            .clients
            .iter()
            .map(|(name, account)| {
                (
                    name.clone(),
                    ProviderAccount::new(
                        account.from_address.clone(),
                        account.account_id.clone(),
                        account.auth_token.clone(),
                    ),
                )
            })
            .collect();
        let fallback = (!config.from_address.is_empty()).then_some(global);
        tracing::info!(clients = config.clients.len(), "Per-client provider accounts configured");
        AccountSelector::PerClient { clients, fallback }
    };

    let adapter = DispatchAdapter::new(sender, accounts);
    Ok(match &config.address_prefix {
        Some(prefix) => adapter.with_address_prefix(prefix.clone()),
        None => adapter,
    })
}
