//! Read-side shapes returned by the API layer

use chrono::NaiveDate;
use resumeschema_core::{
    record_field_value, Check, ExtraFields, FieldReader, IntRange, Record, ValidationError,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::resume::Resume;

const COUNT: Check = Check::Range(IntRange::at_least(0));

/// A stored résumé as returned to clients
///
/// Open record: fields beyond the declared set are kept in `extra` and
/// written back out next to the declared ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeResponse {
    #[serde(flatten)]
    pub resume: Resume,
    pub id: String,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for ResumeResponse {
    const NAME: &'static str = "ResumeResponse";
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
        "id",
        "created_at",
        "updated_at",
    ];
    const EXTRA_FIELDS: ExtraFields = ExtraFields::Allow;

    fn read(reader: &mut FieldReader<'_, '_>) -> Option<Self> {
        let resume = Resume::read(reader);
        let id = reader.required("id");
        let created_at = reader.required("created_at");
        let updated_at = reader.required("updated_at");
        let extra = reader.take_unvisited();

        Some(Self {
            resume: resume?,
            id: id?,
            created_at: created_at?,
            updated_at: updated_at?,
            extra,
        })
    }
}

impl ResumeResponse {
    pub fn new(resume: Resume, id: impl Into<String>, created_at: NaiveDate, updated_at: NaiveDate) -> Self {
        Self {
            resume,
            id: id.into(),
            created_at,
            updated_at,
            extra: Map::new(),
        }
    }
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginatedResponse {
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub results: Vec<ResumeResponse>,
}

impl Record for PaginatedResponse {
    const NAME: &'static str = "PaginatedResponse";
    const FIELDS: &'static [&'static str] = &["total", "page", "page_size", "results"];

    fn read(reader: &mut FieldReader<'_, '_>) -> Option<Self> {
        let total = reader.required_checked("total", COUNT);
        let page = reader.required_checked("page", COUNT);
        let page_size = reader.required_checked("page_size", COUNT);
        let results = reader.required("results");

        Some(Self {
            total: total?,
            page: page?,
            page_size: page_size?,
            results: results?,
        })
    }
}

/// Error envelope returned by the API layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl Record for ErrorResponse {
    const NAME: &'static str = "ErrorResponse";
    const FIELDS: &'static [&'static str] = &["detail"];

    fn read(reader: &mut FieldReader<'_, '_>) -> Option<Self> {
        let detail = reader.required("detail");
        Some(Self { detail: detail? })
    }
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self { detail: detail.into() }
    }
}

impl From<&ValidationError> for ErrorResponse {
    fn from(err: &ValidationError) -> Self {
        Self::new(err.to_string())
    }
}

impl From<ValidationError> for ErrorResponse {
    fn from(err: ValidationError) -> Self {
        Self::from(&err)
    }
}

record_field_value!(ResumeResponse, PaginatedResponse, ErrorResponse);
