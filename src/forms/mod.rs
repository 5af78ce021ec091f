//! Multipart form intake.
//!
//! A request body is first drained into a [`SubmittedForm`] (text values grouped by field
//! name, file parts in arrival order), then turned into a typed request by
//! [`requests::CreateRequest`] or [`requests::UpdateRequest`] using the field table in
//! [`schema`].

pub mod requests;
pub mod schema;

use std::collections::BTreeMap;

use axum::extract::Multipart;
use bytes::Bytes;

use crate::error::PokedexError;

/// The two file inputs of the Pokémon forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileGroup {
    Photo,
    EvolutionPhoto,
}

impl FileGroup {
    /// Browsers post multi-file inputs as `photo[]`; the bare name is accepted too.
    pub fn from_field_name(name: &str) -> Option<Self> {
        match name {
            "photo" | "photo[]" => Some(FileGroup::Photo),
            "evolution_photo" | "evolution_photo[]" => Some(FileGroup::EvolutionPhoto),
            _ => None,
        }
    }

    pub fn field_name(&self) -> &'static str {
        match self {
            FileGroup::Photo => "photo",
            FileGroup::EvolutionPhoto => "evolution_photo",
        }
    }
}

/// A file part held for the lifetime of one request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub group: FileGroup,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

#[derive(Debug, Default, Clone)]
pub struct SubmittedForm {
    text: BTreeMap<String, Vec<String>>,
    files: Vec<UploadedFile>,
}

impl SubmittedForm {
    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.text.entry(name.into()).or_default().push(value.into());
    }

    pub fn push_file(&mut self, file: UploadedFile) {
        self.files.push(file);
    }

    /// First non-blank value of a text field, trimmed.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.values(name)
            .iter()
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
    }

    pub fn values(&self, name: &str) -> &[String] {
        self.text.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn text_field_names(&self) -> impl Iterator<Item = &str> {
        self.text.keys().map(String::as_str)
    }

    pub fn has_files(&self, group: FileGroup) -> bool {
        self.files.iter().any(|f| f.group == group)
    }

    /// Removes and returns the files of one group, preserving submission order.
    pub fn take_files(&mut self, group: FileGroup) -> Vec<UploadedFile> {
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|f| f.group == group);
        self.files = kept;
        taken
    }
}

/// Drains a multipart body into a [`SubmittedForm`].
pub async fn read_multipart(mut multipart: Multipart) -> Result<SubmittedForm, PokedexError> {
    let mut form = SubmittedForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| PokedexError::Request(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        // Only parts with a filename are uploads; a plain `photo` value stays text
        let group = FileGroup::from_field_name(&name).filter(|_| field.file_name().is_some());

        if let Some(group) = group {
            let file_name = field
                .file_name()
                .map(str::to_string)
                .filter(|n| !n.is_empty());
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| PokedexError::Request(e.to_string()))?;

            // An untouched file input still submits an empty, nameless part
            if data.is_empty() && file_name.is_none() {
                continue;
            }

            form.push_file(UploadedFile {
                group,
                file_name,
                content_type,
                data,
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| PokedexError::Request(e.to_string()))?;
            form.push_text(name, value);
        }
    }

    Ok(form)
}
