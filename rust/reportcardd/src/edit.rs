use crate::fields::{coerce_number, FieldKind, FieldValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Enter,
    Escape,
}

impl EditKey {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Enter" => Some(Self::Enter),
            "Escape" => Some(Self::Escape),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditState {
    Display,
    Editing { draft: FieldValue },
}

/// Inline editor bound to one scalar. The draft lives only while editing;
/// the owner sees a value only when the edit commits.
#[derive(Debug, Clone, PartialEq)]
pub struct EditableField {
    value: FieldValue,
    kind: FieldKind,
    state: EditState,
}

impl EditableField {
    pub fn new(value: FieldValue, kind: FieldKind) -> Self {
        Self {
            value,
            kind,
            state: EditState::Display,
        }
    }

    #[allow(dead_code)]
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    #[allow(dead_code)]
    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing { .. })
    }

    /// Current draft while editing, otherwise the bound value.
    pub fn shown(&self) -> &FieldValue {
        match &self.state {
            EditState::Editing { draft } => draft,
            EditState::Display => &self.value,
        }
    }

    pub fn activate(&mut self) {
        if let EditState::Display = self.state {
            self.state = EditState::Editing {
                draft: self.value.clone(),
            };
        }
    }

    /// Replace the draft with the input's full text. Numeric fields coerce
    /// on every keystroke, so malformed text becomes NaN here.
    pub fn input(&mut self, text: &str) {
        if let EditState::Editing { draft } = &mut self.state {
            *draft = match self.kind {
                FieldKind::Numeric => FieldValue::Number(coerce_number(text)),
                FieldKind::Text => FieldValue::Text(text.to_string()),
            };
        }
    }

    pub fn key(&mut self, key: EditKey) -> Option<FieldValue> {
        match key {
            EditKey::Enter => self.commit(),
            EditKey::Escape => {
                self.cancel();
                None
            }
        }
    }

    pub fn blur(&mut self) -> Option<FieldValue> {
        self.commit()
    }

    pub fn cancel(&mut self) {
        self.state = EditState::Display;
    }

    fn commit(&mut self) -> Option<FieldValue> {
        match std::mem::replace(&mut self.state, EditState::Display) {
            EditState::Editing { draft } => {
                let committed = draft.coerce(self.kind);
                self.value = committed.clone();
                Some(committed)
            }
            EditState::Display => None,
        }
    }
}
