use crate::calc::format_number;
use crate::model::{StudentRecord, Subject};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Text,
    Numeric,
}

/// A loosely typed scalar as it arrives from the host or sits in an
/// edit draft.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    pub fn from_json(v: &serde_json::Value) -> Option<Self> {
        match v {
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            serde_json::Value::Number(n) => n.as_f64().map(Self::Number),
            serde_json::Value::Null => Some(Self::Number(f64::NAN)),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::Number(x) => serde_json::json!(x),
        }
    }

    pub fn as_number(&self) -> f64 {
        match self {
            Self::Number(x) => *x,
            Self::Text(s) => coerce_number(s),
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(x) => format_number(*x),
        }
    }

    pub fn coerce(&self, kind: FieldKind) -> Self {
        match kind {
            FieldKind::Numeric => Self::Number(self.as_number()),
            FieldKind::Text => Self::Text(self.as_text()),
        }
    }

    pub fn display(&self) -> String {
        self.as_text()
    }
}

/// Numeric coercion of typed input, matching the host's `Number(text)`:
/// surrounding whitespace is ignored, an empty string is 0, anything that
/// does not parse is NaN. No bounds are applied.
pub fn coerce_number(text: &str) -> f64 {
    let t = text.trim();
    match t {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        // Rust also accepts "inf" and "nan"; the host does not.
        _ if t
            .chars()
            .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') =>
        {
            f64::NAN
        }
        _ => t.parse::<f64>().unwrap_or(f64::NAN),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StudentField {
    Name,
    ArabicName,
    ClassName,
    RegistrationNumber,
    RimNumber,
    SchoolYear,
    Semester,
    OverallAverage,
    Mention,
}

impl StudentField {
    pub const ALL: [StudentField; 9] = [
        Self::Name,
        Self::ArabicName,
        Self::ClassName,
        Self::RegistrationNumber,
        Self::RimNumber,
        Self::SchoolYear,
        Self::Semester,
        Self::OverallAverage,
        Self::Mention,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.wire_name() == s)
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::ArabicName => "arabicName",
            Self::ClassName => "className",
            Self::RegistrationNumber => "registrationNumber",
            Self::RimNumber => "rimNumber",
            Self::SchoolYear => "schoolYear",
            Self::Semester => "semester",
            Self::OverallAverage => "overallAverage",
            Self::Mention => "mention",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Self::RegistrationNumber | Self::OverallAverage => FieldKind::Numeric,
            _ => FieldKind::Text,
        }
    }

    pub fn current(self, record: &StudentRecord) -> FieldValue {
        match self {
            Self::Name => FieldValue::Text(record.name.clone()),
            Self::ArabicName => FieldValue::Text(record.arabic_name.clone().unwrap_or_default()),
            Self::ClassName => FieldValue::Text(record.class_name.clone()),
            Self::RegistrationNumber => FieldValue::Number(record.registration_number),
            Self::RimNumber => FieldValue::Text(record.rim_number.clone()),
            Self::SchoolYear => FieldValue::Text(record.school_year.clone()),
            Self::Semester => FieldValue::Text(record.semester.clone()),
            Self::OverallAverage => FieldValue::Number(record.overall_average),
            Self::Mention => FieldValue::Text(record.mention.clone()),
        }
    }

    pub fn edit(self, value: &FieldValue) -> StudentEdit {
        match self {
            Self::Name => StudentEdit::Name(value.as_text()),
            Self::ArabicName => StudentEdit::ArabicName(value.as_text()),
            Self::ClassName => StudentEdit::ClassName(value.as_text()),
            Self::RegistrationNumber => StudentEdit::RegistrationNumber(value.as_number()),
            Self::RimNumber => StudentEdit::RimNumber(value.as_text()),
            Self::SchoolYear => StudentEdit::SchoolYear(value.as_text()),
            Self::Semester => StudentEdit::Semester(value.as_text()),
            Self::OverallAverage => StudentEdit::OverallAverage(value.as_number()),
            Self::Mention => StudentEdit::Mention(value.as_text()),
        }
    }
}

/// A replacement value for one identity or footer field.
#[derive(Debug, Clone, PartialEq)]
pub enum StudentEdit {
    Name(String),
    ArabicName(String),
    ClassName(String),
    RegistrationNumber(f64),
    RimNumber(String),
    SchoolYear(String),
    Semester(String),
    OverallAverage(f64),
    Mention(String),
}

impl StudentEdit {
    pub fn field(&self) -> StudentField {
        match self {
            Self::Name(_) => StudentField::Name,
            Self::ArabicName(_) => StudentField::ArabicName,
            Self::ClassName(_) => StudentField::ClassName,
            Self::RegistrationNumber(_) => StudentField::RegistrationNumber,
            Self::RimNumber(_) => StudentField::RimNumber,
            Self::SchoolYear(_) => StudentField::SchoolYear,
            Self::Semester(_) => StudentField::Semester,
            Self::OverallAverage(_) => StudentField::OverallAverage,
            Self::Mention(_) => StudentField::Mention,
        }
    }

    pub fn write_into(self, record: &mut StudentRecord) {
        match self {
            Self::Name(v) => record.name = v,
            Self::ArabicName(v) => record.arabic_name = Some(v),
            Self::ClassName(v) => record.class_name = v,
            Self::RegistrationNumber(v) => record.registration_number = v,
            Self::RimNumber(v) => record.rim_number = v,
            Self::SchoolYear(v) => record.school_year = v,
            Self::Semester(v) => record.semester = v,
            Self::OverallAverage(v) => record.overall_average = v,
            Self::Mention(v) => record.mention = v,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SubjectField {
    Name,
    NameAr,
    Coefficient,
    Average,
    ExamScore,
    HomeworkScore,
}

impl SubjectField {
    pub const ALL: [SubjectField; 6] = [
        Self::Name,
        Self::NameAr,
        Self::Coefficient,
        Self::Average,
        Self::ExamScore,
        Self::HomeworkScore,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "displayName" => Some(Self::Name),
            "displayNameArabic" => Some(Self::NameAr),
            _ => Self::ALL.into_iter().find(|f| f.wire_name() == s),
        }
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::NameAr => "nameAr",
            Self::Coefficient => "coefficient",
            Self::Average => "average",
            Self::ExamScore => "examScore",
            Self::HomeworkScore => "homeworkScore",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Self::Name | Self::NameAr => FieldKind::Text,
            _ => FieldKind::Numeric,
        }
    }

    /// `None` for a homework score the subject does not have.
    pub fn current(self, subject: &Subject) -> Option<FieldValue> {
        match self {
            Self::Name => Some(FieldValue::Text(subject.display_name.clone())),
            Self::NameAr => Some(FieldValue::Text(
                subject.display_name_arabic.clone().unwrap_or_default(),
            )),
            Self::Coefficient => Some(FieldValue::Number(subject.coefficient)),
            Self::Average => Some(FieldValue::Number(subject.average)),
            Self::ExamScore => Some(FieldValue::Number(subject.exam_score)),
            Self::HomeworkScore => subject.homework_score.map(FieldValue::Number),
        }
    }

    pub fn edit(self, value: &FieldValue) -> SubjectEdit {
        match self {
            Self::Name => SubjectEdit::Name(value.as_text()),
            Self::NameAr => SubjectEdit::NameAr(value.as_text()),
            Self::Coefficient => SubjectEdit::Coefficient(value.as_number()),
            Self::Average => SubjectEdit::Average(value.as_number()),
            Self::ExamScore => SubjectEdit::ExamScore(value.as_number()),
            Self::HomeworkScore => SubjectEdit::HomeworkScore(value.as_number()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubjectEdit {
    Name(String),
    NameAr(String),
    Coefficient(f64),
    Average(f64),
    ExamScore(f64),
    HomeworkScore(f64),
}

impl SubjectEdit {
    pub fn field(&self) -> SubjectField {
        match self {
            Self::Name(_) => SubjectField::Name,
            Self::NameAr(_) => SubjectField::NameAr,
            Self::Coefficient(_) => SubjectField::Coefficient,
            Self::Average(_) => SubjectField::Average,
            Self::ExamScore(_) => SubjectField::ExamScore,
            Self::HomeworkScore(_) => SubjectField::HomeworkScore,
        }
    }

    pub fn write_into(self, subject: &mut Subject) {
        match self {
            Self::Name(v) => subject.display_name = v,
            Self::NameAr(v) => subject.display_name_arabic = Some(v),
            Self::Coefficient(v) => subject.coefficient = v,
            Self::Average(v) => subject.average = v,
            Self::ExamScore(v) => subject.exam_score = v,
            Self::HomeworkScore(v) => subject.homework_score = Some(v),
        }
    }
}
