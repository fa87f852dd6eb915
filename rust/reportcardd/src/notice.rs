use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeKind {
    Updated,
    Reset,
    Printed,
}

/// Ephemeral acknowledgement for the host to toast. Nothing waits on it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
    pub at: DateTime<Utc>,
}

impl Notice {
    fn new(kind: NoticeKind, title: &str, description: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.to_string(),
            description: description.into(),
            at: Utc::now(),
        }
    }

    pub fn updated(field: &str) -> Self {
        Self::new(
            NoticeKind::Updated,
            "Updated successfully",
            format!("{} updated", field),
        )
    }

    pub fn reset() -> Self {
        Self::new(
            NoticeKind::Reset,
            "تمت إعادة الضبط",
            "تم استعادة البيانات الأصلية",
        )
    }

    pub fn printed() -> Self {
        Self::new(
            NoticeKind::Printed,
            "تمت الطباعة",
            "تم إرسال المستند إلى الطابعة",
        )
    }
}
