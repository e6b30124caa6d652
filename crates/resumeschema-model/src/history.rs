//! Sub-records listed on a résumé: certificates and experience history

use chrono::NaiveDate;
use resumeschema_core::{record_field_value, FieldReader, Record};
use serde::Serialize;

/// A certificate or qualification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Certificate {
    pub certificate_name: String,
    pub certificate_date: Option<NaiveDate>,
    pub certificate_desc: Option<String>,
}

impl Record for Certificate {
    const NAME: &'static str = "Certificate";
    const FIELDS: &'static [&'static str] = &["certificate_name", "certificate_date", "certificate_desc"];

    fn read(reader: &mut FieldReader<'_, '_>) -> Option<Self> {
        let certificate_name = reader.required("certificate_name");
        let certificate_date = reader.optional("certificate_date");
        let certificate_desc = reader.nullable_or("certificate_desc", String::new());

        Some(Self {
            certificate_name: certificate_name?,
            certificate_date: certificate_date?,
            certificate_desc: certificate_desc?,
        })
    }
}

/// Employment history entry; `end_date` is `None` for a current position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkExperience {
    pub company_name: String,
    pub position: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub department: Option<String>,
    pub company_industry: Option<String>,
    pub company_nature: Option<String>,
    pub company_scale: Option<String>,
    pub experience_description: String,
}

impl Record for WorkExperience {
    const NAME: &'static str = "WorkExperience";
    const FIELDS: &'static [&'static str] = &[
        "company_name",
        "position",
        "start_date",
        "end_date",
        "department",
        "company_industry",
        "company_nature",
        "company_scale",
        "experience_description",
    ];

    fn read(reader: &mut FieldReader<'_, '_>) -> Option<Self> {
        let company_name = reader.required("company_name");
        let position = reader.required("position");
        let start_date = reader.required("start_date");
        let end_date = reader.optional("end_date");
        let department = reader.nullable_or("department", String::new());
        let company_industry = reader.nullable_or("company_industry", String::new());
        let company_nature = reader.nullable_or("company_nature", String::new());
        let company_scale = reader.nullable_or("company_scale", String::new());
        let experience_description = reader.required("experience_description");

        Some(Self {
            company_name: company_name?,
            position: position?,
            start_date: start_date?,
            end_date: end_date?,
            department: department?,
            company_industry: company_industry?,
            company_nature: company_nature?,
            company_scale: company_scale?,
            experience_description: experience_description?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Education {
    pub school_name: String,
    pub major: String,
    pub degree: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub major_description: Option<String>,
    pub gpa: Option<String>,
}

impl Record for Education {
    const NAME: &'static str = "Education";
    const FIELDS: &'static [&'static str] = &[
        "school_name",
        "major",
        "degree",
        "start_date",
        "end_date",
        "major_description",
        "gpa",
    ];

    fn read(reader: &mut FieldReader<'_, '_>) -> Option<Self> {
        let school_name = reader.required("school_name");
        let major = reader.required("major");
        let degree = reader.required("degree");
        let start_date = reader.required("start_date");
        let end_date = reader.required("end_date");
        let major_description = reader.nullable_or("major_description", String::new());
        let gpa = reader.nullable_or("gpa", String::new());

        Some(Self {
            school_name: school_name?,
            major: major?,
            degree: degree?,
            start_date: start_date?,
            end_date: end_date?,
            major_description: major_description?,
            gpa: gpa?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectExperience {
    pub project_name: String,
    /// Company the project was delivered for, if any
    pub company_name: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub project_description: String,
    pub responsibility: String,
}

impl Record for ProjectExperience {
    const NAME: &'static str = "ProjectExperience";
    const FIELDS: &'static [&'static str] = &[
        "project_name",
        "company_name",
        "start_date",
        "end_date",
        "project_description",
        "responsibility",
    ];

    fn read(reader: &mut FieldReader<'_, '_>) -> Option<Self> {
        let project_name = reader.required("project_name");
        let company_name = reader.optional("company_name");
        let start_date = reader.required("start_date");
        let end_date = reader.required("end_date");
        let project_description = reader.required("project_description");
        let responsibility = reader.required("responsibility");

        Some(Self {
            project_name: project_name?,
            company_name: company_name?,
            start_date: start_date?,
            end_date: end_date?,
            project_description: project_description?,
            responsibility: responsibility?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadershipExperience {
    pub position: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub experience_description: String,
}

impl Record for LeadershipExperience {
    const NAME: &'static str = "LeadershipExperience";
    const FIELDS: &'static [&'static str] = &["position", "start_date", "end_date", "experience_description"];

    fn read(reader: &mut FieldReader<'_, '_>) -> Option<Self> {
        let position = reader.required("position");
        let start_date = reader.required("start_date");
        let end_date = reader.required("end_date");
        let experience_description = reader.required("experience_description");

        Some(Self {
            position: position?,
            start_date: start_date?,
            end_date: end_date?,
            experience_description: experience_description?,
        })
    }
}

record_field_value!(
    Certificate,
    WorkExperience,
    Education,
    ProjectExperience,
    LeadershipExperience,
);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use resumeschema_core::ViolationCode;
    use serde_json::json;

    #[test]
    fn certificate_defaults() {
        let cert = Certificate::from_value(&json!({"certificate_name": "CET-6"})).unwrap();
        assert_eq!(cert.certificate_date, None);
        assert_eq!(cert.certificate_desc.as_deref(), Some(""));

        let cert = Certificate::from_value(&json!({
            "certificate_name": "CET-6",
            "certificate_desc": null,
        }))
        .unwrap();
        assert_eq!(cert.certificate_desc, None);
    }

    #[test]
    fn open_ended_employment() {
        let work = WorkExperience::from_value(&json!({
            "company_name": "Acme",
            "position": "Engineer",
            "start_date": "2020-07-01",
            "experience_description": "Backend services",
        }))
        .unwrap();

        assert_eq!(work.end_date, None);
        assert_eq!(work.department.as_deref(), Some(""));
        assert_eq!(
            work.to_map().unwrap().get("start_date"),
            Some(&json!("2020-07-01"))
        );
    }

    #[test]
    fn education_requires_both_dates() {
        let err = Education::from_value(&json!({
            "school_name": "PKU",
            "major": "CS",
            "degree": "bachelor",
            "start_date": "2008-09-01",
            "end_date": "2012/06/30",
        }))
        .unwrap_err();

        assert_eq!(err.codes_at("end_date"), vec![ViolationCode::FieldTypeMismatch]);
    }

    #[test]
    fn leadership_reports_all_missing_fields() {
        let err = LeadershipExperience::from_value(&json!({"position": "Chair"})).unwrap_err();
        assert_eq!(err.violations().len(), 3);
        assert!(err.violations().iter().all(|v| v.code == ViolationCode::FieldMissing));
    }

    #[test]
    fn project_ignores_undeclared_fields() {
        let project = ProjectExperience::from_value(&json!({
            "project_name": "Search",
            "start_date": "2021-01-01",
            "end_date": "2021-12-31",
            "project_description": "Full text search",
            "responsibility": "Indexing",
            "stars": 12,
        }))
        .unwrap();

        assert!(!project.to_map().unwrap().contains_key("stars"));
    }
}
