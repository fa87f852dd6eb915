use crate::ipc::error::{ok, respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::model::StudentRecord;
use crate::notice::Notice;
use crate::render::{card_view, render_print_html};
use serde_json::json;

fn handle_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, state.snapshot())
}

fn handle_view(state: &mut AppState, req: &Request) -> serde_json::Value {
    let view = card_view(&state.card, &state.sessions);
    ok(&req.id, json!({ "view": view }))
}

fn load(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let raw = req
        .params
        .get("record")
        .ok_or_else(|| HandlerErr::bad_params("missing params.record"))?;
    let record: StudentRecord = serde_json::from_value(raw.clone())
        .map_err(|e| HandlerErr::bad_params(format!("invalid record: {}", e)))?;
    state.sessions.clear();
    state.card.load(record);
    Ok(state.snapshot())
}

fn handle_reset(state: &mut AppState, req: &Request) -> serde_json::Value {
    state.sessions.clear();
    let notice = state.card.reset();
    let mut result = state.snapshot();
    result["notice"] = json!(notice);
    ok(&req.id, result)
}

fn handle_print(state: &mut AppState, req: &Request) -> serde_json::Value {
    let html = render_print_html(&state.card);
    tracing::info!(bytes = html.len(), "print document rendered");
    ok(
        &req.id,
        json!({
            "html": html,
            "notice": Notice::printed(),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "card.get" => Some(handle_get(state, req)),
        "card.view" => Some(handle_view(state, req)),
        "card.load" => Some(respond(&req.id, load(state, req))),
        "card.reset" => Some(handle_reset(state, req)),
        "card.print" => Some(handle_print(state, req)),
        _ => None,
    }
}
