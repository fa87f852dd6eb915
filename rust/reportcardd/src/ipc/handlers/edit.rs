use crate::edit::EditKey;
use crate::ipc::error::{ok, respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::session::{EditTarget, SessionEnd};
use serde_json::json;

fn session_id(req: &Request) -> Result<&str, HandlerErr> {
    req.params
        .get("sessionId")
        .and_then(|v| v.as_str())
        .ok_or_else(|| HandlerErr::bad_params("missing params.sessionId"))
}

fn begin(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let raw = req
        .params
        .get("target")
        .ok_or_else(|| HandlerErr::bad_params("missing params.target"))?;
    let target = EditTarget::parse(raw)?;
    let id = state.sessions.begin(&state.card, target)?;
    let draft = state
        .sessions
        .find(target)
        .map(|(_, f)| f.shown().to_json())
        .unwrap_or(serde_json::Value::Null);
    Ok(json!({ "sessionId": id, "target": target.to_json(), "draft": draft }))
}

fn input(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let id = session_id(req)?;
    let text = req
        .params
        .get("text")
        .and_then(|v| v.as_str())
        .ok_or_else(|| HandlerErr::bad_params("missing params.text"))?;
    let draft = state.sessions.input(id, text)?;
    Ok(json!({ "sessionId": id, "draft": draft.to_json(), "display": draft.display() }))
}

fn ended(state: &AppState, end: SessionEnd) -> serde_json::Value {
    let mut result = state.snapshot();
    match end {
        SessionEnd::Committed { value, notice } => {
            result["committed"] = json!(true);
            result["value"] = value.to_json();
            result["notice"] = json!(notice);
        }
        SessionEnd::Cancelled => {
            result["committed"] = json!(false);
        }
    }
    result
}

fn key(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let id = session_id(req)?;
    let raw = req
        .params
        .get("key")
        .and_then(|v| v.as_str())
        .ok_or_else(|| HandlerErr::bad_params("missing params.key"))?;
    let Some(k) = EditKey::parse(raw) else {
        return Err(HandlerErr::bad_params("key must be one of: Enter, Escape")
            .with_details(json!({ "key": raw })));
    };
    let end = state.sessions.key(&mut state.card, id, k)?;
    Ok(ended(state, end))
}

fn blur(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let id = session_id(req)?;
    let end = state.sessions.blur(&mut state.card, id)?;
    Ok(ended(state, end))
}

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, json!({ "sessions": state.sessions.summaries() }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "edit.begin" => Some(respond(&req.id, begin(state, req))),
        "edit.input" => Some(respond(&req.id, input(state, req))),
        "edit.key" => Some(respond(&req.id, key(state, req))),
        "edit.blur" => Some(respond(&req.id, blur(state, req))),
        "edit.list" => Some(handle_list(state, req)),
        _ => None,
    }
}
