//! The résumé aggregate

use chrono::NaiveDate;
use resumeschema_core::{record_field_value, Check, FieldReader, IntRange, Pattern, Record};
use serde::Serialize;

use crate::enums::Gender;
use crate::history::{Certificate, Education, LeadershipExperience, ProjectExperience, WorkExperience};
use crate::intention::JobIntention;

/// Language tag used when a résumé does not state one
pub const DEFAULT_LANGUAGE: &str = "Chinese";

pub(crate) const ID_NUMBER: Check = Check::Pattern(Pattern::IdNumber);
pub(crate) const PHONE: Check = Check::Pattern(Pattern::Phone);
pub(crate) const EMAIL: Check = Check::Pattern(Pattern::Email);
pub(crate) const GRADUATE_YEAR: Check = Check::Range(IntRange::between(1900, 2100));
pub(crate) const WORK_YEARS: Check = Check::Range(IntRange::at_least(0));
pub(crate) const COMPLETION_PERCENT: Check = Check::Range(IntRange::between(0, 100));
pub(crate) const FREE_TEXT: Check = Check::MinLength(1);

/// A complete résumé
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resume {
    // Identity
    pub student_key: String,
    pub name: String,
    pub gender: Gender,
    pub id_number: String,
    pub nationality: Option<String>,
    pub birth_place: String,
    pub phone: String,
    pub email: String,
    pub birthday: NaiveDate,
    pub political_status: Option<String>,

    // Education and work status
    pub highest_degree: String,
    pub graduate_year: u16,
    pub work_years: u64,
    pub current_status: Option<String>,

    pub skill_description: String,
    pub self_introduction: String,

    pub education_experience: Vec<Education>,
    pub work_experience: Vec<WorkExperience>,
    pub project_experience: Vec<ProjectExperience>,
    pub leadership_experience: Vec<LeadershipExperience>,
    pub certificates: Vec<Certificate>,
    pub job_intention: JobIntention,

    // Publication state
    pub is_public: bool,
    pub language: String,
    pub completion_percent: u8,
    pub last_updated: NaiveDate,
}

impl Record for Resume {
    const NAME: &'static str = "Resume";
    const FIELDS: &'static [&'static str] = &[
        "student_key",
        "name",
        "gender",
        "id_number",
        "nationality",
        "birth_place",
        "phone",
        "email",
        "birthday",
        "political_status",
        "highest_degree",
        "graduate_year",
        "work_years",
        "current_status",
        "skill_description",
        "self_introduction",
        "education_experience",
        "work_experience",
        "project_experience",
        "leadership_experience",
        "certificates",
        "job_intention",
        "is_public",
        "language",
        "completion_percent",
        "last_updated",
    ];

    fn read(reader: &mut FieldReader<'_, '_>) -> Option<Self> {
        let student_key = reader.required("student_key");
        let name = reader.required("name");
        let gender = reader.required("gender");
        let id_number = reader.required_checked("id_number", ID_NUMBER);
        let nationality = reader.optional("nationality");
        let birth_place = reader.required("birth_place");
        let phone = reader.required_checked("phone", PHONE);
        let email = reader.required_checked("email", EMAIL);
        let birthday = reader.required("birthday");
        let political_status = reader.optional("political_status");

        let highest_degree = reader.required("highest_degree");
        let graduate_year = reader.required_checked("graduate_year", GRADUATE_YEAR);
        let work_years = reader.or_default_checked("work_years", 0, WORK_YEARS);
        let current_status = reader.optional("current_status");

        let skill_description = reader.required_checked("skill_description", FREE_TEXT);
        let self_introduction = reader.required_checked("self_introduction", FREE_TEXT);

        let education_experience = reader.or_default("education_experience", Vec::new());
        let work_experience = reader.or_default("work_experience", Vec::new());
        let project_experience = reader.or_default("project_experience", Vec::new());
        let leadership_experience = reader.or_default("leadership_experience", Vec::new());
        let certificates = reader.or_default("certificates", Vec::new());
        let job_intention = reader.required("job_intention");

        let is_public = reader.or_default("is_public", false);
        let language = reader.or_default("language", DEFAULT_LANGUAGE.to_string());
        let completion_percent = reader.or_default_checked("completion_percent", 0, COMPLETION_PERCENT);
        let last_updated = reader.required("last_updated");

        Some(Self {
            student_key: student_key?,
            name: name?,
            gender: gender?,
            id_number: id_number?,
            nationality: nationality?,
            birth_place: birth_place?,
            phone: phone?,
            email: email?,
            birthday: birthday?,
            political_status: political_status?,
            highest_degree: highest_degree?,
            graduate_year: graduate_year?,
            work_years: work_years?,
            current_status: current_status?,
            skill_description: skill_description?,
            self_introduction: self_introduction?,
            education_experience: education_experience?,
            work_experience: work_experience?,
            project_experience: project_experience?,
            leadership_experience: leadership_experience?,
            certificates: certificates?,
            job_intention: job_intention?,
            is_public: is_public?,
            language: language?,
            completion_percent: completion_percent?,
            last_updated: last_updated?,
        })
    }
}

record_field_value!(Resume);

impl Resume {
    /// Total entries across every history list
    pub fn history_len(&self) -> usize {
        self.education_experience.len()
            + self.work_experience.len()
            + self.project_experience.len()
            + self.leadership_experience.len()
            + self.certificates.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use resumeschema_core::ViolationCode;
    use serde_json::{json, Value};

    fn minimal() -> Value {
        json!({
            "student_key": "s1",
            "name": "Li",
            "gender": "female",
            "id_number": "11010119900307891X",
            "birth_place": "Beijing",
            "phone": "13800001111",
            "email": "a@b.com",
            "birthday": "1990-03-07",
            "highest_degree": "bachelor",
            "graduate_year": 2012,
            "skill_description": "Rust, SQL",
            "self_introduction": "Backend engineer",
            "job_intention": {
                "industry": "tech",
                "province": "Beijing",
                "city": "Beijing",
                "salary_min": 5000,
                "salary_max": 9000,
                "job_type": "full-time",
                "category": "engineer"
            },
            "last_updated": "2024-01-01"
        })
    }

    #[test]
    fn defaults_are_filled_in() {
        let resume = Resume::from_value(&minimal()).unwrap();

        assert_eq!(resume.work_years, 0);
        assert!(!resume.is_public);
        assert_eq!(resume.language, DEFAULT_LANGUAGE);
        assert_eq!(resume.completion_percent, 0);
        assert_eq!(resume.history_len(), 0);
        assert_eq!(resume.nationality, None);
    }

    #[test]
    fn graduate_year_boundaries() {
        for (year, ok) in [(1899, false), (1900, true), (2100, true), (2101, false)] {
            let mut value = minimal();
            value["graduate_year"] = json!(year);
            assert_eq!(Resume::from_value(&value).is_ok(), ok, "graduate_year = {}", year);
        }
    }

    #[test]
    fn completion_percent_boundaries() {
        for (percent, ok) in [(-1, false), (0, true), (100, true), (101, false)] {
            let mut value = minimal();
            value["completion_percent"] = json!(percent);
            assert_eq!(Resume::from_value(&value).is_ok(), ok, "completion_percent = {}", percent);
        }
    }

    #[test]
    fn empty_free_text_is_rejected() {
        let mut value = minimal();
        value["skill_description"] = json!("");
        value["self_introduction"] = json!("");

        let err = Resume::from_value(&value).unwrap_err();
        assert_eq!(err.codes_at("skill_description"), vec![ViolationCode::FieldConstraintViolation]);
        assert_eq!(err.codes_at("self_introduction"), vec![ViolationCode::FieldConstraintViolation]);
    }

    #[test]
    fn whitespace_free_text_is_accepted() {
        let mut value = minimal();
        value["skill_description"] = json!("  ");
        value["self_introduction"] = json!("\n");

        let resume = Resume::from_value(&value).unwrap();
        assert_eq!(resume.skill_description, "  ");
        assert_eq!(resume.self_introduction, "\n");
    }

    #[test]
    fn nested_violations_carry_full_paths() {
        let mut value = minimal();
        value["job_intention"]["salary_max"] = json!(-5);
        value["education_experience"] = json!([
            {
                "school_name": "PKU",
                "major": "CS",
                "degree": "bachelor",
                "start_date": "2008-09-01",
                "end_date": "2012-07-01"
            },
            {
                "school_name": "PKU",
                "major": "CS",
                "degree": "master",
                "start_date": "2012-09-01"
            }
        ]);

        let err = Resume::from_value(&value).unwrap_err();
        assert_eq!(
            err.codes_at("job_intention.salary_max"),
            vec![ViolationCode::FieldConstraintViolation]
        );
        assert_eq!(
            err.codes_at("education_experience[1].end_date"),
            vec![ViolationCode::FieldMissing]
        );
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn missing_job_intention() {
        let mut value = minimal();
        value.as_object_mut().unwrap().remove("job_intention");

        let err = Resume::from_value(&value).unwrap_err();
        assert_eq!(err.codes_at("job_intention"), vec![ViolationCode::FieldMissing]);
    }

    #[test]
    fn deserialize_goes_through_validation() {
        let text = minimal().to_string();
        let resume: Resume = serde_json::from_str(&text).unwrap();
        assert_eq!(resume.gender, Gender::Female);

        let mut bad = minimal();
        bad["phone"] = json!("12345");
        let err = serde_json::from_str::<Resume>(&bad.to_string()).unwrap_err();
        assert!(err.to_string().contains("phone"));
    }
}
