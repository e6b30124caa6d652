//! Closed label sets
//!
//! Each enumeration serializes to its English label. Input also accepts the
//! Chinese labels used by the source forms.

use resumeschema_core::{labeled_field_value, Labeled};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
}

impl Labeled for Gender {
    const VARIANTS: &'static [Self] = &[Self::Male, Self::Female];
    const ALIASES: &'static [(&'static str, Self)] = &[("男", Self::Male), ("女", Self::Female)];

    fn label(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

/// Employment type sought in a job intention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkType {
    FullTime,
    PartTime,
    Internship,
    FullOrPartTime,
}

impl Labeled for WorkType {
    const VARIANTS: &'static [Self] = &[
        Self::FullTime,
        Self::PartTime,
        Self::Internship,
        Self::FullOrPartTime,
    ];
    const ALIASES: &'static [(&'static str, Self)] = &[
        ("全职", Self::FullTime),
        ("兼职", Self::PartTime),
        ("实习", Self::Internship),
        ("全/兼职", Self::FullOrPartTime),
    ];

    fn label(&self) -> &'static str {
        match self {
            Self::FullTime => "full-time",
            Self::PartTime => "part-time",
            Self::Internship => "internship",
            Self::FullOrPartTime => "full-or-part-time",
        }
    }
}

/// How soon a candidate can start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DutyTime {
    Immediately,
    WithinWeek,
    WithinMonth,
    WithinThreeMonths,
    ToBeDetermined,
}

impl Labeled for DutyTime {
    const VARIANTS: &'static [Self] = &[
        Self::Immediately,
        Self::WithinWeek,
        Self::WithinMonth,
        Self::WithinThreeMonths,
        Self::ToBeDetermined,
    ];
    const ALIASES: &'static [(&'static str, Self)] = &[
        ("随时", Self::Immediately),
        ("1周内", Self::WithinWeek),
        ("1个月内", Self::WithinMonth),
        ("3个月内", Self::WithinThreeMonths),
        ("待定", Self::ToBeDetermined),
    ];

    fn label(&self) -> &'static str {
        match self {
            Self::Immediately => "immediately",
            Self::WithinWeek => "within-week",
            Self::WithinMonth => "within-month",
            Self::WithinThreeMonths => "within-three-months",
            Self::ToBeDetermined => "to-be-determined",
        }
    }
}

labeled_field_value!(Gender, WorkType, DutyTime);
