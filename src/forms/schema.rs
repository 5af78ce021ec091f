use super::{FileGroup, SubmittedForm};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Non-negative, finite floating point
    Number,
    /// JSON array or comma-delimited strings
    List,
    Files(FileGroup),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

/// Every form field, in the order missing fields are reported. All are required on create.
pub const FIELDS: &[FieldSpec] = &[
    field("name", FieldKind::Text),
    field("degree", FieldKind::Text),
    field("type", FieldKind::Text),
    field("photo", FieldKind::Files(FileGroup::Photo)),
    field("description", FieldKind::Text),
    field("height", FieldKind::Number),
    field("weight", FieldKind::Number),
    field("male_gender_ratio", FieldKind::Number),
    field("female_gender_ratio", FieldKind::Number),
    field("abilities", FieldKind::List),
    field("egg_groups", FieldKind::List),
    field("evolution_description", FieldKind::Text),
    field("evolution_photo", FieldKind::Files(FileGroup::EvolutionPhoto)),
];

/// Finds a field by its form name; file inputs also answer to their `[]` form.
pub fn lookup(name: &str) -> Option<&'static FieldSpec> {
    let name = FileGroup::from_field_name(name).map_or(name, |group| group.field_name());
    FIELDS.iter().find(|f| f.name == name)
}

pub fn parse_number(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::invalid(field, format!("'{}' is not a number", raw)))?;

    if !value.is_finite() {
        return Err(ValidationError::invalid(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(ValidationError::invalid(field, "must not be negative"));
    }
    Ok(value)
}

/// Flattens every submitted value of a list field into trimmed, non-empty entries.
///
/// A value starting with `[` must be a JSON array of strings; anything else is split on
/// commas. Repeated fields are concatenated in submission order.
pub fn parse_string_list(
    field: &'static str,
    values: &[String],
) -> Result<Vec<String>, ValidationError> {
    let mut items = Vec::new();

    for value in values {
        let value = value.trim();
        if value.starts_with('[') {
            let parsed: Vec<String> = serde_json::from_str(value)
                .map_err(|e| ValidationError::invalid(field, format!("invalid JSON list: {}", e)))?;
            items.extend(parsed.iter().map(|s| s.trim().to_string()));
        } else {
            items.extend(value.split(',').map(|s| s.trim().to_string()));
        }
    }

    items.retain(|s| !s.is_empty());
    Ok(items)
}

/// Whether a required field counts as supplied. Malformed values count as present so
/// that they are reported as invalid rather than missing.
pub fn is_present(entry: &FieldSpec, form: &SubmittedForm) -> bool {
    match entry.kind {
        FieldKind::Text | FieldKind::Number => form.text(entry.name).is_some(),
        FieldKind::List => parse_string_list(entry.name, form.values(entry.name))
            .map(|items| !items.is_empty())
            .unwrap_or(true),
        FieldKind::Files(group) => form.has_files(group),
    }
}
