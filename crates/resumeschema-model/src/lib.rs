//! Résumé record types
//!
//! Every type here is a [`resumeschema_core::Record`]: construct it with
//! `from_value` (or serde) to get either a valid value or every violation.

pub mod advisory;
pub mod enums;
pub mod history;
pub mod intention;
pub mod response;
pub mod resume;
pub mod search;
pub mod update;

pub use advisory::{advise, advise_at};
pub use enums::{DutyTime, Gender, WorkType};
pub use history::{Certificate, Education, LeadershipExperience, ProjectExperience, WorkExperience};
pub use intention::JobIntention;
pub use response::{ErrorResponse, PaginatedResponse, ResumeResponse};
pub use resume::{Resume, DEFAULT_LANGUAGE};
pub use search::ResumeSearchParams;
pub use update::ResumeUpdate;
