use serde_json::json;

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn bad_params(message: impl Into<String>) -> Self {
        Self {
            code: "bad_params",
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        tracing::warn!(id, code = self.code, message = %self.message, "request rejected");
        err(id, self.code, self.message, self.details)
    }
}

impl From<crate::session::SessionError> for HandlerErr {
    fn from(e: crate::session::SessionError) -> Self {
        Self {
            code: e.code(),
            message: e.to_string(),
            details: None,
        }
    }
}

impl From<crate::card::CardError> for HandlerErr {
    fn from(e: crate::card::CardError) -> Self {
        let details = match &e {
            crate::card::CardError::SubjectIndex { index, len } => {
                json!({ "index": index, "subjectCount": len })
            }
        };
        Self {
            code: "not_found",
            message: e.to_string(),
            details: Some(details),
        }
    }
}

/// Collapse a handler result into a response envelope.
pub fn respond(id: &str, res: Result<serde_json::Value, HandlerErr>) -> serde_json::Value {
    match res {
        Ok(v) => ok(id, v),
        Err(e) => e.response(id),
    }
}
