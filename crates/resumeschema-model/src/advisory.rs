//! Advisory checks on a constructed résumé
//!
//! These never reject a record. They report combinations of individually
//! valid fields that are probably a data entry mistake.

use chrono::NaiveDate;
use resumeschema_core::{Diagnostic, FieldPath, Severity, ViolationCode};

use crate::resume::Resume;

/// Run every advisory check, returning warnings in field order
pub fn advise(resume: &Resume) -> Vec<Diagnostic> {
    advise_at(resume, &FieldPath::root())
}

/// [`advise`] for a résumé nested at `root`, e.g. `results[3]` of a page
pub fn advise_at(resume: &Resume, root: &FieldPath) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let intention = &resume.job_intention;
    if intention.salary_min > intention.salary_max {
        diagnostics.push(
            Diagnostic::new(
                ViolationCode::SalaryRangeInverted,
                Severity::Warn,
                root.child("job_intention"),
                format!(
                    "salary_min ({}) is greater than salary_max ({})",
                    intention.salary_min, intention.salary_max
                ),
            )
            .with_comparison(
                format!("salary_min <= {}", intention.salary_max),
                intention.salary_min.to_string(),
            ),
        );
    }

    let education = resume
        .education_experience
        .iter()
        .map(|e| (e.start_date, Some(e.end_date)));
    check_history(&mut diagnostics, &root.child("education_experience"), education);

    let work = resume.work_experience.iter().map(|w| (w.start_date, w.end_date));
    check_history(&mut diagnostics, &root.child("work_experience"), work);

    let projects = resume
        .project_experience
        .iter()
        .map(|p| (p.start_date, Some(p.end_date)));
    check_history(&mut diagnostics, &root.child("project_experience"), projects);

    let leadership = resume
        .leadership_experience
        .iter()
        .map(|l| (l.start_date, Some(l.end_date)));
    check_history(&mut diagnostics, &root.child("leadership_experience"), leadership);

    tracing::trace!(warnings = diagnostics.len(), "advisory checks finished");
    diagnostics
}

/// Flag entries whose end date precedes their start date; open-ended entries pass
fn check_history(
    diagnostics: &mut Vec<Diagnostic>,
    list: &FieldPath,
    entries: impl Iterator<Item = (NaiveDate, Option<NaiveDate>)>,
) {
    for (i, (start, end)) in entries.enumerate() {
        let Some(end) = end else { continue };
        if end >= start {
            continue;
        }

        diagnostics.push(
            Diagnostic::new(
                ViolationCode::DateRangeInverted,
                Severity::Warn,
                list.index(i).child("end_date"),
                format!("end_date {} is before start_date {}", end, start),
            )
            .with_comparison(format!("on or after {}", start), end.to_string()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use resumeschema_core::Record;
    use serde_json::{json, Value};

    fn resume(extra: Value) -> Resume {
        let mut value = json!({
            "student_key": "s1",
            "name": "Li",
            "gender": "male",
            "id_number": "110101199003078911",
            "birth_place": "Beijing",
            "phone": "13800001111",
            "email": "li@example.com",
            "birthday": "1990-03-07",
            "highest_degree": "master",
            "graduate_year": 2015,
            "skill_description": "Rust",
            "self_introduction": "Hello",
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
        });
        if let (Value::Object(base), Value::Object(extra)) = (&mut value, extra) {
            base.extend(extra);
        }
        Resume::from_value(&value).unwrap()
    }

    #[test]
    fn consistent_resume_has_no_warnings() {
        assert!(advise(&resume(json!({}))).is_empty());
    }

    #[test]
    fn inverted_salary_range() {
        let mut r = resume(json!({}));
        r.job_intention.salary_min = 12000;

        let warnings = advise(&r);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, ViolationCode::SalaryRangeInverted);
        assert_eq!(warnings[0].severity, Severity::Warn);
        assert_eq!(warnings[0].path.as_str(), "job_intention");
    }

    #[test]
    fn inverted_dates_report_entry_index() {
        let r = resume(json!({
            "work_experience": [
                {
                    "company_name": "Acme",
                    "position": "Engineer",
                    "start_date": "2020-07-01",
                    "experience_description": "current job"
                },
                {
                    "company_name": "Initech",
                    "position": "Intern",
                    "start_date": "2019-07-01",
                    "end_date": "2019-01-01",
                    "experience_description": "summer"
                }
            ],
            "leadership_experience": [
                {
                    "position": "Chair",
                    "start_date": "2012-01-01",
                    "end_date": "2011-01-01",
                    "experience_description": "club"
                }
            ]
        }));

        let warnings = advise(&r);
        let paths: Vec<&str> = warnings.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["work_experience[1].end_date", "leadership_experience[0].end_date"]
        );
    }

    #[test]
    fn nested_resume_paths_are_prefixed() {
        let mut r = resume(json!({}));
        r.job_intention.salary_max = 0;

        let warnings = advise_at(&r, &FieldPath::root().child("results").index(2));
        assert_eq!(warnings[0].path.as_str(), "results[2].job_intention");
    }
}
