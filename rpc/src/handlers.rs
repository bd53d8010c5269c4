//! Request handlers and their wire types.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use chainwatch_types::Transaction;
use chainwatch_watcher::WatcherService;

use crate::error::RpcError;

/// Shared state for all handlers.
pub struct ApiState {
    pub service: Arc<WatcherService>,
}

// ── Subscribe ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub address: String,
}

#[derive(Serialize)]
pub struct SubscribeResponse {
    pub subscribed: bool,
}

/// `POST /subscribe`: watch an address.
///
/// `subscribed` is `true` for a new subscription and `false` when the
/// address (in any case variant) was already watched.
pub async fn subscribe(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<SubscribeRequest>,
) -> Result<Json<SubscribeResponse>, RpcError> {
    if request.address.is_empty() {
        return Err(RpcError::InvalidRequest("address is required".into()));
    }
    let subscribed = state.service.subscribe(&request.address).await;
    Ok(Json(SubscribeResponse { subscribed }))
}

// ── Transactions ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct TransactionsQuery {
    #[serde(default)]
    pub address: String,
}

/// `GET /transactions?address=...`: recorded transactions, oldest first.
///
/// An unknown address answers with an empty array, never an error.
pub async fn transactions(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Json<Vec<Transaction>>, RpcError> {
    if query.address.is_empty() {
        return Err(RpcError::InvalidRequest(
            "address query parameter is required".into(),
        ));
    }
    Ok(Json(state.service.transactions(&query.address)))
}

// ── Current block ────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CurrentBlockResponse {
    #[serde(rename = "currentBlock")]
    pub current_block: u64,
}

/// `GET /currentBlock`: highest block fully ingested.
pub async fn current_block(State(state): State<Arc<ApiState>>) -> Json<CurrentBlockResponse> {
    Json(CurrentBlockResponse {
        current_block: state.service.current_block(),
    })
}

// ── Metrics ──────────────────────────────────────────────────────────────

/// `GET /metrics`: Prometheus text exposition. Only routed when metrics
/// are enabled.
pub async fn metrics(State(state): State<Arc<ApiState>>) -> String {
    state.service.metrics().encode()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainwatch_gateway::LedgerGateway;
    use chainwatch_nullables::{transfer, NullGateway};
    use chainwatch_watcher::WatcherConfig;

    fn state() -> Arc<ApiState> {
        let config = WatcherConfig {
            catch_up_on_subscribe: false,
            ..Default::default()
        };
        let service = WatcherService::new(&config, Arc::new(NullGateway::new()));
        Arc::new(ApiState {
            service: Arc::new(service),
        })
    }

    #[tokio::test]
    async fn subscribe_rejects_missing_address() {
        let result = subscribe(
            State(state()),
            Json(SubscribeRequest {
                address: String::new(),
            }),
        )
        .await;
        assert!(matches!(result, Err(RpcError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn subscribe_reports_new_then_existing() {
        let state = state();
        let request = |addr: &str| {
            Json(SubscribeRequest {
                address: addr.to_string(),
            })
        };

        let first = subscribe(State(Arc::clone(&state)), request("0xABC"))
            .await
            .expect("valid request");
        assert!(first.0.subscribed);

        let second = subscribe(State(state), request("0xabc"))
            .await
            .expect("valid request");
        assert!(!second.0.subscribed);
    }

    #[tokio::test]
    async fn transactions_rejects_missing_address() {
        let result = transactions(
            State(state()),
            Query(TransactionsQuery {
                address: String::new(),
            }),
        )
        .await;
        assert!(matches!(result, Err(RpcError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn transactions_for_unknown_address_is_empty_array() {
        let response = transactions(
            State(state()),
            Query(TransactionsQuery {
                address: "0xdead".to_string(),
            }),
        )
        .await
        .expect("valid request");
        assert!(response.0.is_empty());
    }

    #[tokio::test]
    async fn current_block_starts_at_zero() {
        let response = current_block(State(state())).await;
        assert_eq!(response.0.current_block, 0);
    }

    #[tokio::test]
    async fn subscribe_then_catch_up_is_visible_through_the_api() {
        let gateway = Arc::new(NullGateway::new());
        gateway.push_height(7);
        gateway.set_block(7, vec![transfer("0x1", "0xAAA", "0xbbb")]);

        let service = WatcherService::new(
            &WatcherConfig::default(),
            Arc::clone(&gateway) as Arc<dyn LedgerGateway>,
        );
        let state = Arc::new(ApiState {
            service: Arc::new(service),
        });

        subscribe(
            State(Arc::clone(&state)),
            Json(SubscribeRequest {
                address: "0xaaa".to_string(),
            }),
        )
        .await
        .expect("valid request");

        let recorded = transactions(
            State(state),
            Query(TransactionsQuery {
                address: "0xAAA".to_string(),
            }),
        )
        .await
        .expect("valid request");
        assert_eq!(recorded.0.len(), 1);
    }
}
