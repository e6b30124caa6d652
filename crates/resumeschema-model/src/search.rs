use resumeschema_core::{record_field_value, Check, FieldReader, Record};
use serde::Serialize;

use crate::intention::SALARY;
use crate::resume::WORK_YEARS;

const KEYWORD: Check = Check::MinLength(1);

/// Filters accepted by the résumé search endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeSearchParams {
    pub keyword: String,
    pub skills: Option<Vec<String>>,
    /// Minimum years of work experience
    pub min_experience: Option<u64>,
    pub max_salary: Option<u64>,
}

impl Record for ResumeSearchParams {
    const NAME: &'static str = "ResumeSearchParams";
    const FIELDS: &'static [&'static str] = &["keyword", "skills", "min_experience", "max_salary"];

    fn read(reader: &mut FieldReader<'_, '_>) -> Option<Self> {
        let keyword = reader.required_checked("keyword", KEYWORD);
        let skills = reader.optional("skills");
        let min_experience = reader.optional_checked("min_experience", WORK_YEARS);
        let max_salary = reader.optional_checked("max_salary", SALARY);

        Some(Self {
            keyword: keyword?,
            skills: skills?,
            min_experience: min_experience?,
            max_salary: max_salary?,
        })
    }
}

record_field_value!(ResumeSearchParams);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use resumeschema_core::ViolationCode;
    use serde_json::json;

    #[test]
    fn keyword_only() {
        let params = ResumeSearchParams::from_value(&json!({"keyword": "rust"})).unwrap();
        assert_eq!(
            params,
            ResumeSearchParams {
                keyword: "rust".to_string(),
                skills: None,
                min_experience: None,
                max_salary: None,
            }
        );
    }

    #[test]
    fn empty_keyword_is_rejected() {
        let err = ResumeSearchParams::from_value(&json!({"keyword": ""})).unwrap_err();
        assert_eq!(err.codes_at("keyword"), vec![ViolationCode::FieldConstraintViolation]);
    }

    #[test]
    fn large_filters_are_accepted() {
        let params = ResumeSearchParams::from_value(&json!({
            "keyword": "rust",
            "min_experience": 4_294_967_296u64,
            "max_salary": 5_000_000_000u64,
        }))
        .unwrap();

        assert_eq!(params.min_experience, Some(4_294_967_296));
        assert_eq!(params.max_salary, Some(5_000_000_000));
    }

    #[test]
    fn filters_are_bounded_below() {
        let err = ResumeSearchParams::from_value(&json!({
            "keyword": "rust",
            "skills": ["sql", 3],
            "min_experience": -1,
            "max_salary": -100,
        }))
        .unwrap_err();

        assert_eq!(err.codes_at("skills[1]"), vec![ViolationCode::FieldTypeMismatch]);
        assert_eq!(err.codes_at("min_experience"), vec![ViolationCode::FieldConstraintViolation]);
        assert_eq!(err.codes_at("max_salary"), vec![ViolationCode::FieldConstraintViolation]);
    }
}
