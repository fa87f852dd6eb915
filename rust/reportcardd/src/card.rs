use crate::calc::{round_off_1_decimal, weighted_average};
use crate::config::{CardConfig, OverridePolicy, ZeroWeightPolicy};
use crate::fields::{StudentEdit, SubjectEdit};
use crate::model::{sample_record, StudentRecord};
use crate::notice::Notice;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CardError {
    SubjectIndex { index: usize, len: usize },
}

impl fmt::Display for CardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SubjectIndex { index, len } => {
                write!(f, "subject index {} out of range (0..{})", index, len)
            }
        }
    }
}

impl std::error::Error for CardError {}

/// Where the stored overall average last came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AverageSource {
    /// Shipped with the sample record.
    Sample,
    /// Supplied with a record loaded by the host.
    Loaded,
    /// Recomputed by the last subject edit.
    Computed,
    /// Typed directly by the user.
    Override,
    /// Last recompute found no coefficient weight; the stored value is stale.
    NoGradeData,
}

/// New record with one identity/footer field replaced. Nothing is
/// recomputed, including when the field is the overall average.
pub fn apply_student_edit(record: &StudentRecord, edit: StudentEdit) -> StudentRecord {
    let mut next = record.clone();
    edit.write_into(&mut next);
    next
}

/// New record with one subject field replaced and the overall average
/// recomputed across every subject.
pub fn apply_subject_edit(
    record: &StudentRecord,
    index: usize,
    edit: SubjectEdit,
    zero_weight: ZeroWeightPolicy,
) -> Result<(StudentRecord, AverageSource), CardError> {
    let len = record.subjects.len();
    if index >= len {
        return Err(CardError::SubjectIndex { index, len });
    }

    let mut next = record.clone();
    edit.write_into(&mut next.subjects[index]);
    let source = recompute_into(&mut next, zero_weight);
    Ok((next, source))
}

/// A zero coefficient sum under `Propagate` stores the raw quotient: NaN
/// for 0/0, and +/-Infinity when negative coefficients cancel a non-zero
/// weighted sum.
fn recompute_into(record: &mut StudentRecord, zero_weight: ZeroWeightPolicy) -> AverageSource {
    let avg = weighted_average(&record.subjects);
    match (avg.value, zero_weight) {
        (Some(v), _) => {
            record.overall_average = v;
            AverageSource::Computed
        }
        (None, ZeroWeightPolicy::Propagate) => {
            record.overall_average = round_off_1_decimal(avg.weighted_sum / avg.coefficient_sum);
            AverageSource::Computed
        }
        (None, ZeroWeightPolicy::NoGradeData) => AverageSource::NoGradeData,
    }
}

/// Sole owner of the current record. Every mutation replaces the record
/// wholesale.
#[derive(Debug, Clone)]
pub struct ReportCard {
    record: StudentRecord,
    average_source: AverageSource,
    config: CardConfig,
}

impl ReportCard {
    pub fn new(config: CardConfig) -> Self {
        Self {
            record: sample_record(),
            average_source: AverageSource::Sample,
            config,
        }
    }

    pub fn record(&self) -> &StudentRecord {
        &self.record
    }

    pub fn average_source(&self) -> AverageSource {
        self.average_source
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut CardConfig {
        &mut self.config
    }

    /// Fresh weighted average of the current subjects, never stored.
    pub fn suggested_average(&self) -> Option<f64> {
        weighted_average(&self.record.subjects).value
    }

    pub fn update_field(&mut self, edit: StudentEdit) -> Notice {
        let field = edit.field();
        let is_average = matches!(edit, StudentEdit::OverallAverage(_));
        let mut next = apply_student_edit(&self.record, edit);

        if is_average {
            self.average_source = match self.config.override_policy {
                OverridePolicy::Verbatim => AverageSource::Override,
                OverridePolicy::Recompute => {
                    next.overall_average = self.record.overall_average;
                    recompute_into(&mut next, self.config.zero_weight)
                }
            };
        }

        self.record = next;
        tracing::info!(field = field.wire_name(), "student field updated");
        Notice::updated(field.wire_name())
    }

    pub fn update_subject(&mut self, index: usize, edit: SubjectEdit) -> Result<Notice, CardError> {
        let field = edit.field();
        let (next, source) = apply_subject_edit(&self.record, index, edit, self.config.zero_weight)?;
        self.record = next;
        self.average_source = source;
        tracing::info!(
            index,
            field = field.wire_name(),
            overall_average = self.record.overall_average,
            "subject field updated"
        );
        Ok(Notice::updated(field.wire_name()))
    }

    /// Replace the record wholesale. The stored average is taken as given.
    pub fn load(&mut self, record: StudentRecord) {
        tracing::info!(id = %record.id, subjects = record.subjects.len(), "record loaded");
        self.record = record;
        self.average_source = AverageSource::Loaded;
    }

    pub fn reset(&mut self) -> Notice {
        self.record = sample_record();
        self.average_source = AverageSource::Sample;
        tracing::info!("record reset to sample");
        Notice::reset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Subject;
    use crate::notice::NoticeKind;

    fn subj(average: f64, coefficient: f64) -> Subject {
        Subject {
            display_name: "s".into(),
            display_name_arabic: None,
            coefficient,
            average,
            exam_score: average,
            homework_score: None,
        }
    }

    fn two_subject_record() -> StudentRecord {
        let mut r = sample_record();
        r.subjects = vec![subj(15.0, 2.0), subj(10.0, 3.0)];
        r.overall_average = 12.0;
        r
    }

    fn card_with(record: StudentRecord, config: CardConfig) -> ReportCard {
        let mut card = ReportCard::new(config);
        card.load(record);
        card
    }

    #[test]
    fn subject_edit_recomputes_over_all_subjects() {
        let mut card = card_with(two_subject_record(), CardConfig::default());
        let notice = card
            .update_subject(0, SubjectEdit::Average(18.0))
            .expect("update");
        assert_eq!(notice.kind, NoticeKind::Updated);
        assert_eq!(card.record().overall_average, 13.2);
        assert_eq!(card.record().subjects[0].average, 18.0);
        assert_eq!(card.average_source(), AverageSource::Computed);
    }

    #[test]
    fn exam_score_edit_still_recomputes_from_averages() {
        let mut r = two_subject_record();
        r.overall_average = 1.0;
        let mut card = card_with(r, CardConfig::default());
        card.update_subject(1, SubjectEdit::ExamScore(20.0))
            .expect("update");
        assert_eq!(card.record().overall_average, 12.0);
        assert_eq!(card.record().subjects[1].average, 10.0);
    }

    #[test]
    fn identity_edit_leaves_subjects_and_average() {
        let before = sample_record();
        let after = apply_student_edit(&before, StudentEdit::ClassName("6MB".into()));
        assert_eq!(after.class_name, "6MB");
        assert_eq!(after.subjects, before.subjects);
        assert_eq!(after.overall_average, before.overall_average);
    }

    #[test]
    fn direct_average_edit_is_kept_verbatim_until_next_subject_edit() {
        let mut card = card_with(two_subject_record(), CardConfig::default());
        card.update_field(StudentEdit::OverallAverage(19.5));
        assert_eq!(card.record().overall_average, 19.5);
        assert_eq!(card.average_source(), AverageSource::Override);
        assert_eq!(card.suggested_average(), Some(12.0));

        card.update_subject(0, SubjectEdit::Name("Maths".into()))
            .expect("update");
        assert_eq!(card.record().overall_average, 12.0);
    }

    #[test]
    fn recompute_override_policy_ignores_typed_average() {
        let cfg = CardConfig {
            override_policy: OverridePolicy::Recompute,
            ..CardConfig::default()
        };
        let mut card = card_with(two_subject_record(), cfg);
        card.update_field(StudentEdit::OverallAverage(19.5));
        assert_eq!(card.record().overall_average, 12.0);
        assert_eq!(card.average_source(), AverageSource::Computed);
    }

    #[test]
    fn recompute_override_with_no_grade_data_keeps_previous_value() {
        let cfg = CardConfig {
            override_policy: OverridePolicy::Recompute,
            zero_weight: ZeroWeightPolicy::NoGradeData,
            ..CardConfig::default()
        };
        let mut r = two_subject_record();
        r.subjects = vec![subj(15.0, 0.0)];
        r.overall_average = 11.0;
        let mut card = card_with(r, cfg);
        card.update_field(StudentEdit::OverallAverage(19.5));
        assert_eq!(card.record().overall_average, 11.0);
        assert_eq!(card.average_source(), AverageSource::NoGradeData);
    }

    #[test]
    fn cancelling_coefficients_store_infinity() {
        let mut card = card_with(two_subject_record(), CardConfig::default());
        card.update_subject(1, SubjectEdit::Coefficient(-2.0))
            .expect("update");
        assert_eq!(card.record().overall_average, f64::INFINITY);
        assert_eq!(card.average_source(), AverageSource::Computed);
        assert_eq!(card.suggested_average(), None);

        card.update_subject(1, SubjectEdit::Average(15.0))
            .expect("update");
        assert!(card.record().overall_average.is_nan());
    }

    #[test]
    fn zero_weight_propagates_nan_by_default() {
        let mut card = card_with(two_subject_record(), CardConfig::default());
        card.update_subject(0, SubjectEdit::Coefficient(0.0))
            .expect("update");
        card.update_subject(1, SubjectEdit::Coefficient(0.0))
            .expect("update");
        assert!(card.record().overall_average.is_nan());
    }

    #[test]
    fn zero_weight_no_grade_data_keeps_stored_value() {
        let cfg = CardConfig {
            zero_weight: ZeroWeightPolicy::NoGradeData,
            ..CardConfig::default()
        };
        let mut card = card_with(two_subject_record(), cfg);
        card.update_subject(0, SubjectEdit::Coefficient(0.0))
            .expect("update");
        assert_eq!(card.record().overall_average, 10.0);
        card.update_subject(1, SubjectEdit::Coefficient(0.0))
            .expect("update");
        assert_eq!(card.record().overall_average, 10.0);
        assert_eq!(card.average_source(), AverageSource::NoGradeData);
        assert_eq!(card.suggested_average(), None);
    }

    #[test]
    fn malformed_coefficient_stores_nan() {
        let mut card = card_with(two_subject_record(), CardConfig::default());
        card.update_subject(0, SubjectEdit::Coefficient(f64::NAN))
            .expect("update");
        assert!(card.record().subjects[0].coefficient.is_nan());
        assert!(card.record().overall_average.is_nan());
    }

    #[test]
    fn out_of_range_subject_is_rejected_and_record_unchanged() {
        let mut card = card_with(two_subject_record(), CardConfig::default());
        let before = card.record().clone();
        let e = card
            .update_subject(2, SubjectEdit::Average(1.0))
            .expect_err("index");
        assert_eq!(e, CardError::SubjectIndex { index: 2, len: 2 });
        assert_eq!(card.record(), &before);
    }

    #[test]
    fn homework_edit_adds_missing_score() {
        let mut card = ReportCard::new(CardConfig::default());
        card.update_subject(3, SubjectEdit::HomeworkScore(11.0))
            .expect("update");
        assert_eq!(card.record().subjects[3].homework_score, Some(11.0));
        assert_eq!(card.record().overall_average, 12.6);
    }

    #[test]
    fn reset_restores_sample() {
        let mut card = ReportCard::new(CardConfig::default());
        card.update_field(StudentEdit::Name("Someone".into()));
        card.update_subject(0, SubjectEdit::Average(20.0))
            .expect("update");
        let notice = card.reset();
        assert_eq!(notice.kind, NoticeKind::Reset);
        assert_eq!(card.record(), &sample_record());
        assert_eq!(card.average_source(), AverageSource::Sample);
    }
}
