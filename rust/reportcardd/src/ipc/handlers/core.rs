use crate::ipc::error::{ok, respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "recordId": state.card.record().id,
            "subjectCount": state.card.record().subjects.len(),
            "openSessions": state.sessions.len(),
        }),
    )
}

fn handle_config_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, json!({ "config": state.card.config() }))
}

fn config_update(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let patch = req
        .params
        .get("patch")
        .unwrap_or(&req.params);
    state
        .card
        .config_mut()
        .apply_patch(patch)
        .map_err(HandlerErr::bad_params)?;
    tracing::info!(config = ?state.card.config(), "config updated");
    Ok(json!({ "config": state.card.config() }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "config.get" => Some(handle_config_get(state, req)),
        "config.update" => Some(respond(&req.id, config_update(state, req))),
        _ => None,
    }
}
