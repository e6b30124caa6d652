//! Partial updates
//!
//! A [`ResumeUpdate`] is a closed record: every field is optional, and any
//! field outside the declared set rejects the whole update. Applying it
//! overwrites exactly the fields that were sent.

use chrono::NaiveDate;
use resumeschema_core::{
    record_field_value, ExtraFields, FieldPath, FieldReader, NullPolicy, Patch, Record,
    ValidationError, Violations,
};
use serde::Serialize;
use serde_json::Value;

use crate::enums::Gender;
use crate::history::{Certificate, Education, ProjectExperience, WorkExperience};
use crate::intention::JobIntention;
use crate::resume::{Resume, EMAIL, FREE_TEXT, GRADUATE_YEAR, PHONE, WORK_YEARS};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResumeUpdate {
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub name: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub gender: Patch<Gender>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub phone: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub email: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub birthday: Patch<NaiveDate>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub highest_degree: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub graduate_year: Patch<u16>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub work_years: Patch<u64>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub skill_description: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub self_introduction: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub education_experience: Patch<Vec<Education>>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub work_experience: Patch<Vec<WorkExperience>>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub project_experience: Patch<Vec<ProjectExperience>>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub certificates: Patch<Vec<Certificate>>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub job_intention: Patch<JobIntention>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub is_public: Patch<bool>,
}

impl Record for ResumeUpdate {
    const NAME: &'static str = "ResumeUpdate";
    const FIELDS: &'static [&'static str] = &[
        "name",
        "gender",
        "phone",
        "email",
        "birthday",
        "highest_degree",
        "graduate_year",
        "work_years",
        "skill_description",
        "self_introduction",
        "education_experience",
        "work_experience",
        "project_experience",
        "certificates",
        "job_intention",
        "is_public",
    ];
    const EXTRA_FIELDS: ExtraFields = ExtraFields::Forbid;

    fn read(reader: &mut FieldReader<'_, '_>) -> Option<Self> {
        let name = reader.patch("name");
        let gender = reader.patch("gender");
        let phone = reader.patch_checked("phone", PHONE);
        let email = reader.patch_checked("email", EMAIL);
        let birthday = reader.patch("birthday");
        let highest_degree = reader.patch("highest_degree");
        let graduate_year = reader.patch_checked("graduate_year", GRADUATE_YEAR);
        let work_years = reader.patch_checked("work_years", WORK_YEARS);
        let skill_description = reader.patch_checked("skill_description", FREE_TEXT);
        let self_introduction = reader.patch_checked("self_introduction", FREE_TEXT);
        let education_experience = reader.patch("education_experience");
        let work_experience = reader.patch("work_experience");
        let project_experience = reader.patch("project_experience");
        let certificates = reader.patch("certificates");
        let job_intention = reader.patch("job_intention");
        let is_public = reader.patch("is_public");

        Some(Self {
            name: name?,
            gender: gender?,
            phone: phone?,
            email: email?,
            birthday: birthday?,
            highest_degree: highest_degree?,
            graduate_year: graduate_year?,
            work_years: work_years?,
            skill_description: skill_description?,
            self_introduction: self_introduction?,
            education_experience: education_experience?,
            work_experience: work_experience?,
            project_experience: project_experience?,
            certificates: certificates?,
            job_intention: job_intention?,
            is_public: is_public?,
        })
    }
}

record_field_value!(ResumeUpdate);

/// Overwrite `slot` when the patch carries a value
fn assign<T: Clone>(patch: &Patch<T>, slot: &mut T) {
    if let Patch::Set(value) = patch {
        *slot = value.clone();
    }
}

impl ResumeUpdate {
    /// Presence of each declared field, in declaration order
    fn presence(&self) -> [(&'static str, bool, bool); 16] {
        macro_rules! state {
            ($this:expr; $($field:ident),*) => {
                [$((stringify!($field), !$this.$field.is_absent(), $this.$field.is_null())),*]
            };
        }
        state!(
            self;
            name,
            gender,
            phone,
            email,
            birthday,
            highest_degree,
            graduate_year,
            work_years,
            skill_description,
            self_introduction,
            education_experience,
            work_experience,
            project_experience,
            certificates,
            job_intention,
            is_public
        )
    }

    /// Names of the fields the update sends, `null` included
    pub fn present_fields(&self) -> Vec<&'static str> {
        self.presence()
            .into_iter()
            .filter(|(_, present, _)| *present)
            .map(|(field, _, _)| field)
            .collect()
    }

    /// Names of the fields sent as explicit `null`
    pub fn null_fields(&self) -> Vec<&'static str> {
        self.presence()
            .into_iter()
            .filter(|(_, _, null)| *null)
            .map(|(field, _, _)| field)
            .collect()
    }

    /// True when the update sends nothing
    pub fn is_empty(&self) -> bool {
        self.present_fields().is_empty()
    }

    /// Merge into a stored résumé.
    ///
    /// Fields with a value overwrite the target; absent fields are left
    /// alone. Explicit nulls follow `policy`. On error the target is not
    /// modified.
    pub fn apply_to(&self, target: &mut Resume, policy: NullPolicy) -> Result<(), ValidationError> {
        if policy == NullPolicy::Reject {
            let nulls = self.null_fields();
            if !nulls.is_empty() {
                let mut sink = Violations::new();
                for field in nulls {
                    sink.constraint(
                        FieldPath::root().child(field),
                        "must not be null when null_policy is reject",
                        &Value::Null,
                    );
                }
                return Err(ValidationError::new(Self::NAME, sink.into_vec()));
            }
        }

        assign(&self.name, &mut target.name);
        assign(&self.gender, &mut target.gender);
        assign(&self.phone, &mut target.phone);
        assign(&self.email, &mut target.email);
        assign(&self.birthday, &mut target.birthday);
        assign(&self.highest_degree, &mut target.highest_degree);
        assign(&self.graduate_year, &mut target.graduate_year);
        assign(&self.work_years, &mut target.work_years);
        assign(&self.skill_description, &mut target.skill_description);
        assign(&self.self_introduction, &mut target.self_introduction);
        assign(&self.education_experience, &mut target.education_experience);
        assign(&self.work_experience, &mut target.work_experience);
        assign(&self.project_experience, &mut target.project_experience);
        assign(&self.certificates, &mut target.certificates);
        assign(&self.job_intention, &mut target.job_intention);
        assign(&self.is_public, &mut target.is_public);

        tracing::debug!(fields = ?self.present_fields(), "applied resume update");
        Ok(())
    }

    /// Non-mutating variant of [`ResumeUpdate::apply_to`]
    pub fn merged(&self, target: &Resume, policy: NullPolicy) -> Result<Resume, ValidationError> {
        let mut merged = target.clone();
        self.apply_to(&mut merged, policy)?;
        Ok(merged)
    }
}
