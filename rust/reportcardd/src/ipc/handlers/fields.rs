use crate::fields::{FieldKind, FieldValue, StudentField, SubjectField};
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

/// `null` stands for NaN, so it is only accepted for numeric fields.
fn required_value(req: &Request, kind: FieldKind) -> Result<FieldValue, HandlerErr> {
    let raw = req
        .params
        .get("value")
        .ok_or_else(|| HandlerErr::bad_params("missing params.value"))?;
    if raw.is_null() && kind == FieldKind::Text {
        return Err(HandlerErr::bad_params("value for a text field must be a string"));
    }
    FieldValue::from_json(raw)
        .ok_or_else(|| HandlerErr::bad_params("value must be a string or number"))
}

fn required_field(req: &Request) -> Result<&str, HandlerErr> {
    req.params
        .get("field")
        .and_then(|v| v.as_str())
        .ok_or_else(|| HandlerErr::bad_params("missing params.field"))
}

fn unknown_field(name: &str) -> HandlerErr {
    HandlerErr {
        code: "unknown_field",
        message: format!("unknown field: {}", name),
        details: None,
    }
}

fn student_update(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let name = required_field(req)?;
    let field = StudentField::parse(name).ok_or_else(|| unknown_field(name))?;
    let value = required_value(req, field.kind())?;
    let notice = state.card.update_field(field.edit(&value));
    let mut result = state.snapshot();
    result["notice"] = json!(notice);
    Ok(result)
}

fn subject_update(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let index = req
        .params
        .get("index")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| HandlerErr::bad_params("missing params.index"))?;
    let name = required_field(req)?;
    let field = SubjectField::parse(name).ok_or_else(|| unknown_field(name))?;
    let value = required_value(req, field.kind())?;
    let notice = state
        .card
        .update_subject(index as usize, field.edit(&value))?;
    let mut result = state.snapshot();
    result["notice"] = json!(notice);
    Ok(result)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "student.update" => Some(respond(&req.id, student_update(state, req))),
        "subject.update" => Some(respond(&req.id, subject_update(state, req))),
        _ => None,
    }
}
