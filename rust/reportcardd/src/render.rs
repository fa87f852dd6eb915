//! View model for the host's render surface and the printable document.
//!
//! The host draws the card from `CardView`; it never computes totals or
//! formats numbers itself. `render_print_html` produces the print layout:
//! committed values only, no edit affordances, fixed A4 page.

use crate::calc::{format_number, format_total};
use crate::card::{AverageSource, ReportCard};
use crate::fields::{FieldKind, FieldValue, StudentField, SubjectField};
use crate::session::{EditSessions, EditTarget};
use serde::Serialize;
use std::fmt::Write as _;

const REPORT_TITLE: &str = "كشف الدرجات";

/// Identity rows in card order: (field, French label, Arabic label).
const IDENTITY_ROWS: [(StudentField, &str, &str); 5] = [
    (StudentField::Name, "Nom:", ":الإسم"),
    (StudentField::ClassName, "Classe:", ":القسم"),
    (StudentField::RegistrationNumber, "Matricule", ":رقم التسجيل"),
    (StudentField::RimNumber, "RIM:", ":الرقم التربوي"),
    (StudentField::SchoolYear, "Annee Scolaire:", ":السنة الدراسية"),
];

/// Subject table headers: (Arabic, French).
const SUBJECT_COLUMNS: [(&str, &str); 6] = [
    ("المادة", "Matiere"),
    ("نتائج الاختبارات", "Note Devoir"),
    ("نتائج الامتحان", "Note Compo"),
    ("المعدل", "Moyenne"),
    ("المعامل", "Coef"),
    ("المجموع", "Total"),
];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldCell {
    pub target: serde_json::Value,
    pub kind: FieldKind,
    pub display: String,
    pub editing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabeledRow {
    pub label_fr: &'static str,
    pub label_ar: &'static str,
    pub cell: FieldCell,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnHeader {
    pub label_ar: &'static str,
    pub label_fr: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRow {
    pub index: usize,
    pub name: FieldCell,
    /// `None` renders as "-" for exam-only subjects.
    pub homework: Option<FieldCell>,
    pub exam: FieldCell,
    pub average: FieldCell,
    pub coefficient: FieldCell,
    pub total: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageRow {
    pub label_fr: &'static str,
    pub label_ar: &'static str,
    pub cell: FieldCell,
    pub source: AverageSource,
    pub suggested: Option<f64>,
    pub suggested_display: String,
    /// Stored value differs from the recomputed one.
    pub diverges: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub show_edit_icons: bool,
    pub identity: Vec<LabeledRow>,
    pub semester: FieldCell,
    pub title: &'static str,
    pub columns: Vec<ColumnHeader>,
    pub subjects: Vec<SubjectRow>,
    pub overall_average: AverageRow,
    pub mention: LabeledRow,
}

struct CellBuilder<'a> {
    sessions: &'a EditSessions,
    step: f64,
}

impl CellBuilder<'_> {
    fn cell(&self, target: EditTarget, kind: FieldKind, value: FieldValue) -> FieldCell {
        let open = self.sessions.find(target);
        let shown = match open {
            Some((_, field)) => field.shown().clone(),
            None => value,
        };
        FieldCell {
            target: target.to_json(),
            kind,
            display: shown.display(),
            editing: open.map(|(_, f)| f.is_editing()).unwrap_or(false),
            session_id: open.map(|(id, _)| id.to_string()),
            step: match kind {
                FieldKind::Numeric => Some(self.step),
                FieldKind::Text => None,
            },
        }
    }

    fn student(&self, card: &ReportCard, field: StudentField) -> FieldCell {
        self.cell(
            EditTarget::Student(field),
            field.kind(),
            field.current(card.record()),
        )
    }
}

pub fn card_view(card: &ReportCard, sessions: &EditSessions) -> CardView {
    let cfg = card.config();
    let record = card.record();
    let b = CellBuilder {
        sessions,
        step: cfg.numeric_step,
    };

    let identity = IDENTITY_ROWS
        .iter()
        .map(|&(field, fr, ar)| LabeledRow {
            label_fr: fr,
            label_ar: ar,
            cell: b.student(card, field),
        })
        .collect();

    let subjects = record
        .subjects
        .iter()
        .enumerate()
        .map(|(index, s)| {
            let sub = |field: SubjectField| {
                field.current(s).map(|v| {
                    b.cell(EditTarget::Subject { index, field }, field.kind(), v)
                })
            };
            let blank = |field: SubjectField| {
                b.cell(
                    EditTarget::Subject { index, field },
                    field.kind(),
                    FieldValue::Text(String::new()),
                )
            };
            SubjectRow {
                index,
                name: sub(SubjectField::NameAr).unwrap_or_else(|| blank(SubjectField::NameAr)),
                homework: sub(SubjectField::HomeworkScore),
                exam: sub(SubjectField::ExamScore).unwrap_or_else(|| blank(SubjectField::ExamScore)),
                average: sub(SubjectField::Average).unwrap_or_else(|| blank(SubjectField::Average)),
                coefficient: sub(SubjectField::Coefficient)
                    .unwrap_or_else(|| blank(SubjectField::Coefficient)),
                total: format_total(s, cfg.total_digits),
            }
        })
        .collect();

    let suggested = card.suggested_average();
    let source = card.average_source();
    let mut avg_cell = b.student(card, StudentField::OverallAverage);
    if source == AverageSource::NoGradeData && !avg_cell.editing {
        avg_cell.display = "-".to_string();
    }
    let diverges = match suggested {
        Some(v) => v != record.overall_average,
        None => !record.overall_average.is_nan(),
    };

    CardView {
        show_edit_icons: cfg.show_edit_icons,
        identity,
        semester: b.student(card, StudentField::Semester),
        title: REPORT_TITLE,
        columns: SUBJECT_COLUMNS
            .iter()
            .map(|&(ar, fr)| ColumnHeader {
                label_ar: ar,
                label_fr: fr,
            })
            .collect(),
        subjects,
        overall_average: AverageRow {
            label_fr: "Moyenne generale",
            label_ar: "المعدل العام",
            cell: avg_cell,
            source,
            suggested,
            suggested_display: suggested.map(format_number).unwrap_or_else(|| "-".to_string()),
            diverges,
        },
        mention: LabeledRow {
            label_fr: "Mention",
            label_ar: "التقدير",
            cell: b.student(card, StudentField::Mention),
        },
    }
}

fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const PRINT_CSS: &str = "@page{size:A4;margin:10mm}\
body{font-family:'Cairo',sans-serif;margin:0}\
.card{width:19cm;margin:0 auto}\
.row{display:flex;justify-content:space-between;margin:2px 0}\
.ar{direction:rtl;unicode-bidi:embed}\
.title{text-align:center;font-weight:bold;margin:8px 0}\
table{width:100%;border-collapse:collapse}\
th,td{border:1px solid #000;padding:3px;text-align:center}";

/// Printable card built from committed values. Open edit sessions are not
/// shown.
pub fn render_print_html(card: &ReportCard) -> String {
    let view = card_view(card, &EditSessions::default());
    let mut h = String::new();

    let _ = write!(
        h,
        "<!DOCTYPE html><html lang=\"fr\"><head><meta charset=\"utf-8\"><title>{}</title><style>{}</style></head><body><div class=\"card\">",
        esc(&card.record().name),
        PRINT_CSS
    );

    h.push_str("<section class=\"identity\">");
    for row in &view.identity {
        labeled_row(&mut h, row);
    }
    h.push_str("</section>");

    let _ = write!(
        h,
        "<div class=\"title\">{}</div><div class=\"title ar\" dir=\"rtl\">{}</div>",
        esc(&view.semester.display),
        esc(view.title)
    );

    h.push_str("<table><thead><tr>");
    for c in &view.columns {
        let _ = write!(
            h,
            "<th><span class=\"ar\" dir=\"rtl\">{}</span><br>{}</th>",
            esc(c.label_ar),
            esc(c.label_fr)
        );
    }
    h.push_str("</tr></thead><tbody>");
    for s in &view.subjects {
        let homework = s
            .homework
            .as_ref()
            .map(|c| c.display.as_str())
            .unwrap_or("-");
        let _ = write!(
            h,
            "<tr><td class=\"ar\" dir=\"rtl\">{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            esc(&s.name.display),
            esc(homework),
            esc(&s.exam.display),
            esc(&s.average.display),
            esc(&s.coefficient.display),
            esc(&s.total)
        );
    }
    h.push_str("</tbody></table>");

    h.push_str("<section class=\"footer\">");
    let avg = &view.overall_average;
    let _ = write!(
        h,
        "<div class=\"row\"><span>{}</span><span>{}</span><span class=\"ar\" dir=\"rtl\">{}</span></div>",
        esc(avg.label_fr),
        esc(&avg.cell.display),
        esc(avg.label_ar)
    );
    labeled_row(&mut h, &view.mention);
    h.push_str("</section></div></body></html>");
    h
}

fn labeled_row(h: &mut String, row: &LabeledRow) {
    let _ = write!(
        h,
        "<div class=\"row\"><span>{}</span><span>{}</span><span class=\"ar\" dir=\"rtl\">{}</span></div>",
        esc(row.label_fr),
        esc(&row.cell.display),
        esc(row.label_ar)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CardConfig, ZeroWeightPolicy};
    use crate::edit::EditKey;
    use crate::fields::SubjectEdit;
    use serde_json::json;

    #[test]
    fn sample_view_formats_totals_and_missing_homework() {
        let card = ReportCard::new(CardConfig::default());
        let view = card_view(&card, &EditSessions::default());
        assert_eq!(view.identity.len(), 5);
        assert_eq!(view.identity[1].cell.display, "6MA");
        assert_eq!(view.identity[2].cell.display, "4");
        assert_eq!(view.subjects.len(), 10);
        assert_eq!(view.subjects[0].total, "30");
        assert_eq!(view.subjects[3].total, "31.5");
        assert!(view.subjects[3].homework.is_none());
        assert_eq!(view.subjects[0].name.display, "اللغة العربية");
        assert_eq!(view.overall_average.cell.display, "12.4");
        assert_eq!(view.overall_average.suggested, Some(12.6));
        assert!(view.overall_average.diverges);
        assert_eq!(view.overall_average.source, AverageSource::Sample);
    }

    #[test]
    fn fixed_digit_policy_applies_to_every_row() {
        let cfg = CardConfig {
            total_digits: crate::calc::TotalDigits::Fixed(1),
            ..CardConfig::default()
        };
        let card = ReportCard::new(cfg);
        let view = card_view(&card, &EditSessions::default());
        assert_eq!(view.subjects[0].total, "30.0");
        assert_eq!(view.subjects[6].total, "73.5");
    }

    #[test]
    fn open_session_shows_draft() {
        let mut card = ReportCard::new(CardConfig::default());
        let mut sessions = EditSessions::default();
        let target = EditTarget::Subject {
            index: 1,
            field: SubjectField::Average,
        };
        let id = sessions.begin(&card, target).expect("begin");
        sessions.input(&id, "19").expect("input");

        let view = card_view(&card, &sessions);
        let cell = &view.subjects[1].average;
        assert!(cell.editing);
        assert_eq!(cell.display, "19");
        assert_eq!(cell.session_id.as_deref(), Some(id.as_str()));
        assert_eq!(cell.step, Some(0.5));
        assert_eq!(cell.target, json!({ "scope": "subject", "index": 1, "field": "average" }));

        sessions.key(&mut card, &id, EditKey::Escape).expect("escape");
        let view = card_view(&card, &sessions);
        assert_eq!(view.subjects[1].average.display, "14");
        assert!(!view.subjects[1].average.editing);
    }

    #[test]
    fn no_grade_data_shows_dash() {
        let cfg = CardConfig {
            zero_weight: ZeroWeightPolicy::NoGradeData,
            ..CardConfig::default()
        };
        let mut card = ReportCard::new(cfg);
        for i in 0..card.record().subjects.len() {
            card.update_subject(i, SubjectEdit::Coefficient(0.0))
                .expect("update");
        }
        let view = card_view(&card, &EditSessions::default());
        assert_eq!(view.overall_average.cell.display, "-");
        assert_eq!(view.overall_average.suggested_display, "-");
        assert_eq!(view.overall_average.source, AverageSource::NoGradeData);
    }

    #[test]
    fn print_html_is_escaped_and_static() {
        let mut card = ReportCard::new(CardConfig::default());
        card.update_field(crate::fields::StudentEdit::Mention("<b>Bien</b>".into()));
        let html = render_print_html(&card);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("size:A4"));
        assert!(html.contains("&lt;b&gt;Bien&lt;/b&gt;"));
        assert!(html.contains("Note Compo"));
        assert!(!html.contains("<input"));
        assert!(!html.contains('✎'));
    }

    #[test]
    fn print_html_marks_arabic_labels_rtl() {
        let html = render_print_html(&ReportCard::new(CardConfig::default()));
        let arabic = html.matches("class=\"ar\"").count();
        assert!(arabic > 0);
        assert_eq!(html.matches("class=\"ar\" dir=\"rtl\"").count(), arabic);
        assert!(html.contains("class=\"title ar\" dir=\"rtl\""));
    }
}
