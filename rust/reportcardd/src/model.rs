use serde::{Deserialize, Deserializer, Serialize};

/// One graded course entry. `average` is the only score that feeds the
/// overall average; exam and homework scores are informational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    #[serde(rename = "name", alias = "displayName")]
    pub display_name: String,
    #[serde(
        rename = "nameAr",
        alias = "displayNameArabic",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub display_name_arabic: Option<String>,
    #[serde(deserialize_with = "nan_if_null")]
    pub coefficient: f64,
    #[serde(deserialize_with = "nan_if_null")]
    pub average: f64,
    #[serde(deserialize_with = "nan_if_null")]
    pub exam_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homework_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arabic_name: Option<String>,
    pub class_name: String,
    #[serde(deserialize_with = "nan_if_null")]
    pub registration_number: f64,
    pub rim_number: String,
    pub school_year: String,
    pub semester: String,
    pub subjects: Vec<Subject>,
    /// Stored as last written. Only a subject edit recomputes it.
    #[serde(deserialize_with = "nan_if_null")]
    pub overall_average: f64,
    pub mention: String,
}

// serde_json writes non-finite floats as null; read them back as NaN so a
// record carrying a failed recompute can be reloaded unchanged.
fn nan_if_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

fn subject(
    name: &str,
    name_ar: &str,
    coefficient: f64,
    average: f64,
    exam_score: f64,
    homework_score: Option<f64>,
) -> Subject {
    Subject {
        display_name: name.to_string(),
        display_name_arabic: Some(name_ar.to_string()),
        coefficient,
        average,
        exam_score,
        homework_score,
    }
}

/// The card shown on first load and restored by reset.
pub fn sample_record() -> StudentRecord {
    StudentRecord {
        id: "1".to_string(),
        name: "Elhaj Ebou Imaaly Ammy - الحاج أبو المعالي عمي".to_string(),
        arabic_name: Some("الحاج أبو المعالي عمي".to_string()),
        class_name: "6MA".to_string(),
        registration_number: 4.0,
        rim_number: "RIM25454658".to_string(),
        school_year: "2025 - 2024".to_string(),
        semester: "Premier Trimestre".to_string(),
        subjects: vec![
            subject("Francais", "اللغة العربية", 2.0, 15.0, 15.0, Some(14.0)),
            subject("Arabe", "Francais", 2.0, 14.0, 14.0, Some(14.0)),
            subject("Anglais", "الإنجليزية", 2.0, 15.0, 15.0, Some(14.0)),
            subject("Science Naturelles", "Science Naturelles", 3.0, 10.5, 10.5, None),
            subject("Education Islamique", "التربية الإسلامية", 2.0, 16.0, 16.0, Some(15.0)),
            subject("Physique et Chimie", "Physique et Chimie", 6.0, 12.0, 12.0, Some(8.0)),
            subject("Mathematique", "Mathematique", 7.0, 10.5, 10.5, Some(10.0)),
            subject("Histoire et Geographie", "التاريخ والجغرافيا", 2.0, 15.0, 15.0, Some(15.0)),
            subject("Philosophie", "الفلسفة", 2.0, 10.0, 10.0, Some(10.0)),
            subject("Education Physique", "التربية البدنية", 2.0, 16.0, 16.0, None),
        ],
        overall_average: 12.4,
        mention: "Plaque d'honneur - لوحة شرف".to_string(),
    }
}
