use crate::card::{CardError, ReportCard};
use crate::edit::{EditKey, EditableField};
use crate::fields::{FieldKind, FieldValue, StudentField, SubjectField};
use crate::notice::Notice;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// The single field an edit session is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditTarget {
    Student(StudentField),
    Subject { index: usize, field: SubjectField },
}

impl EditTarget {
    pub fn parse(v: &serde_json::Value) -> Result<Self, SessionError> {
        let scope = v.get("scope").and_then(|s| s.as_str()).unwrap_or("student");
        let field = v
            .get("field")
            .and_then(|s| s.as_str())
            .ok_or_else(|| SessionError::BadTarget("missing target.field".to_string()))?;
        match scope {
            "student" => StudentField::parse(field)
                .map(Self::Student)
                .ok_or_else(|| SessionError::UnknownField(field.to_string())),
            "subject" => {
                let index = v
                    .get("index")
                    .and_then(|i| i.as_u64())
                    .ok_or_else(|| SessionError::BadTarget("missing target.index".to_string()))?;
                let field = SubjectField::parse(field)
                    .ok_or_else(|| SessionError::UnknownField(field.to_string()))?;
                Ok(Self::Subject {
                    index: index as usize,
                    field,
                })
            }
            other => Err(SessionError::BadTarget(format!(
                "target.scope must be student or subject, got {}",
                other
            ))),
        }
    }

    pub fn to_json(self) -> serde_json::Value {
        match self {
            Self::Student(f) => serde_json::json!({ "scope": "student", "field": f.wire_name() }),
            Self::Subject { index, field } => serde_json::json!({
                "scope": "subject",
                "index": index,
                "field": field.wire_name(),
            }),
        }
    }

    fn current(self, card: &ReportCard) -> Result<(FieldValue, FieldKind), SessionError> {
        match self {
            Self::Student(f) => Ok((f.current(card.record()), f.kind())),
            Self::Subject { index, field } => {
                let subjects = &card.record().subjects;
                let subject = subjects.get(index).ok_or(SessionError::Card(
                    CardError::SubjectIndex {
                        index,
                        len: subjects.len(),
                    },
                ))?;
                let value = field
                    .current(subject)
                    .ok_or(SessionError::NotEditable(field.wire_name()))?;
                Ok((value, field.kind()))
            }
        }
    }

    fn commit(self, card: &mut ReportCard, value: &FieldValue) -> Result<Notice, CardError> {
        match self {
            Self::Student(f) => Ok(card.update_field(f.edit(value))),
            Self::Subject { index, field } => card.update_subject(index, field.edit(value)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    BadTarget(String),
    UnknownField(String),
    NotEditable(&'static str),
    UnknownSession(String),
    Card(CardError),
}

impl SessionError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadTarget(_) | Self::NotEditable(_) => "bad_params",
            Self::UnknownField(_) => "unknown_field",
            Self::UnknownSession(_) | Self::Card(_) => "not_found",
        }
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadTarget(m) => write!(f, "{}", m),
            Self::UnknownField(name) => write!(f, "unknown field: {}", name),
            Self::NotEditable(name) => write!(f, "{} is not present on this subject", name),
            Self::UnknownSession(id) => write!(f, "no edit session {}", id),
            Self::Card(e) => write!(f, "{}", e),
        }
    }
}

impl From<CardError> for SessionError {
    fn from(e: CardError) -> Self {
        Self::Card(e)
    }
}

#[derive(Debug, Clone)]
pub struct EditSession {
    pub target: EditTarget,
    pub field: EditableField,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    pub target: serde_json::Value,
    pub draft: serde_json::Value,
    pub display: String,
}

/// Outcome of a key press or blur.
#[derive(Debug, Clone)]
pub enum SessionEnd {
    Committed { value: FieldValue, notice: Notice },
    Cancelled,
}

/// Open edit sessions. A target has at most one session; beginning a
/// second one on the same target returns the existing id.
#[derive(Debug, Default)]
pub struct EditSessions {
    open: HashMap<String, EditSession>,
}

impl EditSessions {
    pub fn begin(&mut self, card: &ReportCard, target: EditTarget) -> Result<String, SessionError> {
        if let Some((id, _)) = self.find(target) {
            return Ok(id.to_string());
        }
        let (value, kind) = target.current(card)?;
        let mut field = EditableField::new(value, kind);
        field.activate();
        let id = Uuid::new_v4().to_string();
        self.open.insert(id.clone(), EditSession { target, field });
        tracing::debug!(session = %id, target = %target.to_json(), "edit session opened");
        Ok(id)
    }

    pub fn input(&mut self, id: &str, text: &str) -> Result<FieldValue, SessionError> {
        let session = self
            .open
            .get_mut(id)
            .ok_or_else(|| SessionError::UnknownSession(id.to_string()))?;
        session.field.input(text);
        Ok(session.field.shown().clone())
    }

    pub fn key(
        &mut self,
        card: &mut ReportCard,
        id: &str,
        key: EditKey,
    ) -> Result<SessionEnd, SessionError> {
        let mut session = self
            .open
            .remove(id)
            .ok_or_else(|| SessionError::UnknownSession(id.to_string()))?;
        match session.field.key(key) {
            Some(value) => Self::finish(card, session.target, value),
            None => {
                tracing::debug!(session = %id, "edit session cancelled");
                Ok(SessionEnd::Cancelled)
            }
        }
    }

    pub fn blur(&mut self, card: &mut ReportCard, id: &str) -> Result<SessionEnd, SessionError> {
        let mut session = self
            .open
            .remove(id)
            .ok_or_else(|| SessionError::UnknownSession(id.to_string()))?;
        match session.field.blur() {
            Some(value) => Self::finish(card, session.target, value),
            None => Ok(SessionEnd::Cancelled),
        }
    }

    fn finish(
        card: &mut ReportCard,
        target: EditTarget,
        value: FieldValue,
    ) -> Result<SessionEnd, SessionError> {
        let notice = target.commit(card, &value)?;
        Ok(SessionEnd::Committed { value, notice })
    }

    pub fn find(&self, target: EditTarget) -> Option<(&str, &EditableField)> {
        self.open
            .iter()
            .find(|(_, s)| s.target == target)
            .map(|(id, s)| (id.as_str(), &s.field))
    }

    /// Drop every open session. Used when the record is replaced wholesale.
    pub fn clear(&mut self) {
        self.open.clear();
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn summaries(&self) -> Vec<SessionSummary> {
        let mut out: Vec<SessionSummary> = self
            .open
            .iter()
            .map(|(id, s)| SessionSummary {
                session_id: id.clone(),
                target: s.target.to_json(),
                draft: s.field.shown().to_json(),
                display: s.field.shown().display(),
            })
            .collect();
        out.sort_by(|a, b| a.session_id.cmp(&b.session_id));
        out
    }
}
