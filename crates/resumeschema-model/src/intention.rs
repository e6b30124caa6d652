use resumeschema_core::{record_field_value, Check, FieldReader, IntRange, Record};
use serde::Serialize;

use crate::enums::WorkType;

/// Job intention: where and what the candidate wants to work
///
/// `salary_min` and `salary_max` are independent; an inverted range is only
/// reported by the advisory checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobIntention {
    pub industry: String,
    pub company_property: Option<String>,
    pub province: String,
    pub city: String,
    pub salary_min: u64,
    pub salary_max: u64,
    pub job_type: WorkType,
    pub category: String,
    pub second_category: Option<String>,
    pub parent_category: Option<String>,
}

pub(crate) const SALARY: Check = Check::Range(IntRange::at_least(0));

impl Record for JobIntention {
    const NAME: &'static str = "JobIntention";
    const FIELDS: &'static [&'static str] = &[
        "industry",
        "company_property",
        "province",
        "city",
        "salary_min",
        "salary_max",
        "job_type",
        "category",
        "second_category",
        "parent_category",
    ];

    fn read(reader: &mut FieldReader<'_, '_>) -> Option<Self> {
        let industry = reader.required("industry");
        let company_property = reader.optional("company_property");
        let province = reader.required("province");
        let city = reader.required("city");
        let salary_min = reader.required_checked("salary_min", SALARY);
        let salary_max = reader.required_checked("salary_max", SALARY);
        let job_type = reader.required("job_type");
        let category = reader.required("category");
        let second_category = reader.optional("second_category");
        let parent_category = reader.optional("parent_category");

        Some(Self {
            industry: industry?,
            company_property: company_property?,
            province: province?,
            city: city?,
            salary_min: salary_min?,
            salary_max: salary_max?,
            job_type: job_type?,
            category: category?,
            second_category: second_category?,
            parent_category: parent_category?,
        })
    }
}

record_field_value!(JobIntention);
