//! Reading records out of untyped JSON
//!
//! A [`Record`] is constructed from a JSON object through a [`FieldReader`],
//! which decodes each declared field, applies its [`Check`], and records every
//! problem in a shared [`Violations`] sink instead of stopping at the first.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::diagnostic::{FieldPath, Violations};
use crate::error::ValidationError;
use crate::rules::Check;

/// Calendar date wire format
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// What a record does with fields it does not declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraFields {
    /// Drop them silently
    Ignore,

    /// Reject the record with `FIELD_UNKNOWN`
    Forbid,

    /// Keep them and pass them through on serialization
    Allow,
}

impl std::fmt::Display for ExtraFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ignore => write!(f, "ignore"),
            Self::Forbid => write!(f, "forbid"),
            Self::Allow => write!(f, "allow"),
        }
    }
}

/// A value that can be decoded from one JSON field
pub trait FieldValue: Sized {
    /// Decode `value`, recording violations under `path`.
    ///
    /// Returns `None` only after at least one violation was recorded.
    fn decode(value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<Self>;
}

impl FieldValue for String {
    fn decode(value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            other => {
                sink.type_mismatch(path.clone(), "string", other);
                None
            }
        }
    }
}

impl FieldValue for bool {
    fn decode(value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            other => {
                sink.type_mismatch(path.clone(), "boolean", other);
                None
            }
        }
    }
}

macro_rules! integer_field_value {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn decode(value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<Self> {
                    let Value::Number(number) = value else {
                        sink.type_mismatch(path.clone(), "integer", value);
                        return None;
                    };

                    if !(number.is_i64() || number.is_u64()) {
                        sink.type_mismatch(path.clone(), "integer", value);
                        return None;
                    }

                    let converted = number
                        .as_i64()
                        .and_then(|n| <$ty>::try_from(n).ok())
                        .or_else(|| number.as_u64().and_then(|n| <$ty>::try_from(n).ok()));

                    if converted.is_none() {
                        sink.constraint(
                            path.clone(),
                            concat!("must fit in ", stringify!($ty)),
                            value,
                        );
                    }
                    converted
                }
            }
        )*
    };
}

integer_field_value!(i64, i32, u64, u32, u16, u8);

impl FieldValue for NaiveDate {
    fn decode(value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<Self> {
        match value {
            Value::String(s) => match NaiveDate::parse_from_str(s, DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(_) => {
                    sink.type_mismatch(path.clone(), "date (YYYY-MM-DD)", value);
                    None
                }
            },
            other => {
                sink.type_mismatch(path.clone(), "date (YYYY-MM-DD)", other);
                None
            }
        }
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn decode(value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<Self> {
        let Value::Array(items) = value else {
            sink.type_mismatch(path.clone(), "array", value);
            return None;
        };

        // Decode every element so each bad entry is reported
        let decoded: Vec<Option<T>> = items
            .iter()
            .enumerate()
            .map(|(i, item)| T::decode(item, &path.index(i), sink))
            .collect();

        decoded.into_iter().collect()
    }
}

/// A closed enumeration with a canonical label per variant
///
/// Input additionally accepts the aliases listed in [`Labeled::ALIASES`].
pub trait Labeled: Sized + Copy + 'static {
    /// Every variant, in declaration order
    const VARIANTS: &'static [Self];

    /// Extra accepted spellings, `(alias, variant)`
    const ALIASES: &'static [(&'static str, Self)] = &[];

    /// Canonical serialized label
    fn label(&self) -> &'static str;

    fn from_label(label: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|v| v.label() == label)
            .or_else(|| {
                Self::ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == label)
                    .map(|(_, v)| *v)
            })
    }

    /// Rule text listing the canonical labels
    fn describe() -> String {
        let labels: Vec<String> = Self::VARIANTS
            .iter()
            .map(|v| format!("\"{}\"", v.label()))
            .collect();
        format!("must be one of {}", labels.join(", "))
    }
}

/// Decode a [`Labeled`] enumeration from a JSON string
pub fn decode_labeled<L: Labeled>(value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<L> {
    let Value::String(label) = value else {
        sink.type_mismatch(path.clone(), "string", value);
        return None;
    };

    let decoded = L::from_label(label);
    if decoded.is_none() {
        sink.constraint(path.clone(), L::describe(), value);
    }
    decoded
}

/// Serialize a [`Labeled`] enumeration as its canonical label
pub fn serialize_labeled<L: Labeled, S: Serializer>(value: &L, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.label())
}

/// Presence state of a field in a partial update
#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
    /// Field not sent
    Absent,

    /// Field sent as explicit `null`
    Null,

    /// Field sent with a value
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            _ => None,
        }
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Set(value) => value.serialize(serializer),
            Self::Absent | Self::Null => serializer.serialize_none(),
        }
    }
}

enum Slot<T> {
    Absent,
    Null,
    Invalid,
    Value(T),
}

/// Cursor over one JSON object being turned into a record
pub struct FieldReader<'v, 's> {
    record: &'static str,
    path: FieldPath,
    object: &'v Map<String, Value>,
    visited: Vec<&'static str>,
    extras_taken: bool,
    sink: &'s mut Violations,
}

impl<'v, 's> FieldReader<'v, 's> {
    pub fn new(
        record: &'static str,
        path: FieldPath,
        object: &'v Map<String, Value>,
        sink: &'s mut Violations,
    ) -> Self {
        Self {
            record,
            path,
            object,
            visited: Vec::new(),
            extras_taken: false,
            sink,
        }
    }

    /// Path of the object being read
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    fn read<T: FieldValue>(&mut self, field: &'static str, check: Option<Check>) -> Slot<T> {
        self.visited.push(field);

        let Some(value) = self.object.get(field) else {
            return Slot::Absent;
        };
        if value.is_null() {
            return Slot::Null;
        }

        let path = self.path.child(field);
        if let Some(check) = check {
            if let Err(rule) = check.apply(value) {
                self.sink.constraint(path, rule, value);
                return Slot::Invalid;
            }
        }

        match T::decode(value, &path, self.sink) {
            Some(decoded) => Slot::Value(decoded),
            None => Slot::Invalid,
        }
    }

    fn required_slot<T>(&mut self, field: &'static str, slot: Slot<T>) -> Option<T> {
        match slot {
            Slot::Value(value) => Some(value),
            Slot::Absent => {
                self.sink.missing(self.path.child(field));
                None
            }
            Slot::Null => {
                self.sink
                    .type_mismatch(self.path.child(field), "a non-null value", &Value::Null);
                None
            }
            Slot::Invalid => None,
        }
    }

    /// A field that must be present and non-null
    pub fn required<T: FieldValue>(&mut self, field: &'static str) -> Option<T> {
        let slot = self.read(field, None);
        self.required_slot(field, slot)
    }

    /// A required field with a rule
    pub fn required_checked<T: FieldValue>(&mut self, field: &'static str, check: Check) -> Option<T> {
        let slot = self.read(field, Some(check));
        self.required_slot(field, slot)
    }

    /// A field that may be absent or `null`.
    ///
    /// The outer `None` means the field was present but invalid.
    pub fn optional<T: FieldValue>(&mut self, field: &'static str) -> Option<Option<T>> {
        self.optional_inner(field, None)
    }

    pub fn optional_checked<T: FieldValue>(&mut self, field: &'static str, check: Check) -> Option<Option<T>> {
        self.optional_inner(field, Some(check))
    }

    fn optional_inner<T: FieldValue>(&mut self, field: &'static str, check: Option<Check>) -> Option<Option<T>> {
        match self.read(field, check) {
            Slot::Value(value) => Some(Some(value)),
            Slot::Absent | Slot::Null => Some(None),
            Slot::Invalid => None,
        }
    }

    /// A field that falls back to `default` when absent; `null` is rejected
    pub fn or_default<T: FieldValue>(&mut self, field: &'static str, default: T) -> Option<T> {
        self.or_default_inner(field, default, None)
    }

    pub fn or_default_checked<T: FieldValue>(&mut self, field: &'static str, default: T, check: Check) -> Option<T> {
        self.or_default_inner(field, default, Some(check))
    }

    fn or_default_inner<T: FieldValue>(&mut self, field: &'static str, default: T, check: Option<Check>) -> Option<T> {
        match self.read(field, check) {
            Slot::Absent => Some(default),
            slot => self.required_slot(field, slot),
        }
    }

    /// A nullable field whose absence means `default`; explicit `null` stays `None`
    pub fn nullable_or<T: FieldValue>(&mut self, field: &'static str, default: T) -> Option<Option<T>> {
        match self.read(field, None) {
            Slot::Value(value) => Some(Some(value)),
            Slot::Absent => Some(Some(default)),
            Slot::Null => Some(None),
            Slot::Invalid => None,
        }
    }

    /// A field of a partial update, keeping absent and `null` apart
    pub fn patch<T: FieldValue>(&mut self, field: &'static str) -> Option<Patch<T>> {
        self.patch_inner(field, None)
    }

    pub fn patch_checked<T: FieldValue>(&mut self, field: &'static str, check: Check) -> Option<Patch<T>> {
        self.patch_inner(field, Some(check))
    }

    fn patch_inner<T: FieldValue>(&mut self, field: &'static str, check: Option<Check>) -> Option<Patch<T>> {
        match self.read(field, check) {
            Slot::Value(value) => Some(Patch::Set(value)),
            Slot::Absent => Some(Patch::Absent),
            Slot::Null => Some(Patch::Null),
            Slot::Invalid => None,
        }
    }

    /// Return every field not read so far; they are no longer policed by [`FieldReader::finish`]
    pub fn take_unvisited(&mut self) -> Map<String, Value> {
        self.extras_taken = true;
        self.object
            .iter()
            .filter(|(key, _)| !self.visited.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Apply the unknown-field policy to whatever was not read
    pub fn finish(self, policy: ExtraFields) {
        if self.extras_taken {
            return;
        }
        for key in self.object.keys() {
            if self.visited.contains(&key.as_str()) {
                continue;
            }
            match policy {
                ExtraFields::Forbid => self.sink.unknown(self.path.child(key), self.record),
                ExtraFields::Ignore | ExtraFields::Allow => {
                    tracing::trace!(record = self.record, field = %key, "dropping undeclared field");
                }
            }
        }
    }
}

/// A record type with a declared field set and an unknown-field policy
pub trait Record: Sized {
    /// Type name used in violation messages
    const NAME: &'static str;

    /// Declared fields, in wire order
    const FIELDS: &'static [&'static str];

    /// Treatment of undeclared fields
    const EXTRA_FIELDS: ExtraFields = ExtraFields::Ignore;

    /// Read every declared field; return `None` if any of them failed
    fn read(reader: &mut FieldReader<'_, '_>) -> Option<Self>;

    /// Decode a nested record at `path`, recording violations in `sink`
    fn decode_at(value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<Self> {
        let Value::Object(object) = value else {
            sink.type_mismatch(path.clone(), "object", value);
            return None;
        };

        let before = sink.len();
        let mut reader = FieldReader::new(Self::NAME, path.clone(), object, sink);
        let record = Self::read(&mut reader);
        reader.finish(Self::EXTRA_FIELDS);

        if sink.len() > before {
            None
        } else {
            record
        }
    }

    /// Construct from untyped input, reporting every violation at once
    fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let mut sink = Violations::new();
        let record = Self::decode_at(value, &FieldPath::root(), &mut sink);

        match record {
            Some(record) if sink.is_empty() => {
                tracing::debug!(record = Self::NAME, "record validated");
                Ok(record)
            }
            _ => {
                tracing::debug!(record = Self::NAME, violations = sink.len(), "record rejected");
                Err(ValidationError::new(Self::NAME, sink.into_vec()))
            }
        }
    }

    /// Serialize to a plain field-name to value mapping
    fn to_map(&self) -> Result<Map<String, Value>, serde_json::Error>
    where
        Self: Serialize,
    {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(serde::ser::Error::custom(format!(
                "{} serialized to {} instead of an object",
                Self::NAME,
                crate::diagnostic::json_type_name(&other)
            ))),
        }
    }
}

/// Implement [`FieldValue`] and serde `Deserialize` for record types by
/// routing through [`Record::decode_at`] / [`Record::from_value`].
#[macro_export]
macro_rules! record_field_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::FieldValue for $ty {
                fn decode(
                    value: &::serde_json::Value,
                    path: &$crate::FieldPath,
                    sink: &mut $crate::Violations,
                ) -> Option<Self> {
                    <$ty as $crate::Record>::decode_at(value, path, sink)
                }
            }

            impl<'de> ::serde::Deserialize<'de> for $ty {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: ::serde::Deserializer<'de>,
                {
                    let value = <::serde_json::Value as ::serde::Deserialize>::deserialize(deserializer)?;
                    <$ty as $crate::Record>::from_value(&value).map_err(::serde::de::Error::custom)
                }
            }
        )*
    };
}

/// Implement [`FieldValue`], `Serialize` and `Deserialize` for [`Labeled`] enumerations
#[macro_export]
macro_rules! labeled_field_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::FieldValue for $ty {
                fn decode(
                    value: &::serde_json::Value,
                    path: &$crate::FieldPath,
                    sink: &mut $crate::Violations,
                ) -> Option<Self> {
                    $crate::record::decode_labeled(value, path, sink)
                }
            }

            impl ::serde::Serialize for $ty {
                fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    $crate::record::serialize_labeled(self, serializer)
                }
            }

            impl<'de> ::serde::Deserialize<'de> for $ty {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: ::serde::Deserializer<'de>,
                {
                    let label = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                    <$ty as $crate::Labeled>::from_label(&label).ok_or_else(|| {
                        ::serde::de::Error::custom(format!(
                            "'{}' {}",
                            label,
                            <$ty as $crate::Labeled>::describe()
                        ))
                    })
                }
            }

            impl ::std::fmt::Display for $ty {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    f.write_str($crate::Labeled::label(self))
                }
            }
        )*
    };
}
