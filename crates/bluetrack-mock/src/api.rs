//! REST API handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use bluetrack_core::{ActionKind, Device, Mac};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::state::{Behavior, MockState};

/// Scan duration used when the request does not name one
const DEFAULT_SCAN_SECS: u64 = 8;

#[derive(Serialize)]
struct DevicesResponse {
    devices: Vec<Device>,
}

async fn apply_delay(behavior: &Behavior) {
    if !behavior.delay.is_zero() {
        tokio::time::sleep(behavior.delay).await;
    }
}

/// List all known devices
pub async fn list_devices(State(state): State<Arc<MockState>>) -> impl IntoResponse {
    state.record("GET", "/api/devices", None).await;
    let behavior = state.behavior().await;
    apply_delay(&behavior).await;

    if behavior.malformed {
        debug!("Answering device list without devices field");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"error": "adapter unavailable"})),
        )
            .into_response();
    }

    Json(DevicesResponse {
        devices: state.devices().await,
    })
    .into_response()
}

/// Run a simulated scan
pub async fn scan(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let duration = body
        .get("duration")
        .and_then(Value::as_u64)
        .unwrap_or(DEFAULT_SCAN_SECS);
    state.record("POST", "/api/scan", Some(body)).await;

    let behavior = state.behavior().await;
    apply_delay(&behavior).await;

    let scan_time = Duration::from_secs(duration).mul_f64(behavior.scan_time_scale.max(0.0));
    info!(duration, wait_ms = scan_time.as_millis() as u64, "Simulating scan");
    if !scan_time.is_zero() {
        tokio::time::sleep(scan_time).await;
    }

    if behavior.malformed {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"success": false})),
        )
            .into_response();
    }

    Json(json!({
        "success": true,
        "devices": state.devices().await,
    }))
    .into_response()
}

/// Pair with a device
pub async fn pair(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    device_command(&state, ActionKind::Pair, body, |d| d.paired = Some(true)).await
}

/// Connect to a device
pub async fn connect(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    device_command(&state, ActionKind::Connect, body, |d| d.connected = true).await
}

/// Disconnect from a device
pub async fn disconnect(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    device_command(&state, ActionKind::Disconnect, body, |d| d.connected = false).await
}

async fn device_command(
    state: &MockState,
    action: ActionKind,
    body: Value,
    update: impl FnOnce(&mut Device),
) -> (StatusCode, Json<Value>) {
    let mac = body.get("mac").and_then(Value::as_str).map(Mac::from);
    state
        .record("POST", &format!("/api/{}", action.as_str()), Some(body))
        .await;

    let behavior = state.behavior().await;
    apply_delay(&behavior).await;

    let Some(mac) = mac else {
        return (StatusCode::BAD_REQUEST, Json(json!({"success": false})));
    };

    if behavior.fail_actions {
        info!(mac = %mac, action = %action, "Failing device command on request");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"success": false})),
        );
    }

    if state.update_device(&mac, update).await {
        (StatusCode::OK, Json(json!({"success": true})))
    } else {
        debug!(mac = %mac, action = %action, "Unknown device");
        (StatusCode::NOT_FOUND, Json(json!({"success": false})))
    }
}
