use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::api::handlers::{CreatedResponse, DeletedResponse, ListResponse};
use crate::db::entities::pokemon;
use crate::forms::FileGroup;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Server returned {status}: {message}")]
    Api {
        status: u16,
        message: String,
        missing_fields: Vec<String>,
    },
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(rename = "missingFields", default)]
    missing_fields: Vec<String>,
}

fn api_error(status: u16, text: &str) -> ClientError {
    let body: ApiErrorBody = serde_json::from_str(text).unwrap_or_else(|_| ApiErrorBody {
        message: text.to_string(),
        ..Default::default()
    });
    ClientError::Api {
        status,
        message: body.message,
        missing_fields: body.missing_fields,
    }
}

/// An image picked in a form's file input.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text { name: &'static str, value: String },
    File { group: FileGroup, file: ImageFile },
}

fn into_form(parts: Vec<FormPart>) -> Result<Form, ClientError> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name, value),
            FormPart::File { group, file } => {
                let part = Part::bytes(file.data.to_vec())
                    .file_name(file.file_name)
                    .mime_str(&file.content_type)?;
                form.part(format!("{}[]", group.field_name()), part)
            }
        };
    }
    Ok(form)
}

/// Splits the ", "-separated text typed into the abilities and egg group inputs.
fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Inputs of the create and edit form pages, as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PokemonDraft {
    pub name: String,
    pub degree: String,
    pub pokemon_type: String,
    pub description: String,
    pub height: String,
    pub weight: String,
    pub male_gender_ratio: String,
    pub female_gender_ratio: String,
    pub abilities: String,
    pub egg_groups: String,
    pub evolution_description: String,
    pub photos: Vec<ImageFile>,
    pub evolution_photos: Vec<ImageFile>,
}

impl PokemonDraft {
    /// Pre-fills the edit form from a stored record. Images stay on the server, so no
    /// files are attached.
    pub fn from_record(record: &pokemon::Model) -> Self {
        Self {
            name: record.name.clone(),
            degree: record.degree.clone(),
            pokemon_type: record.pokemon_type.clone(),
            description: record.description.clone(),
            height: record.height.to_string(),
            weight: record.weight.to_string(),
            male_gender_ratio: record.male_gender_ratio.to_string(),
            female_gender_ratio: record.female_gender_ratio.to_string(),
            abilities: record.abilities.join(", "),
            egg_groups: record.egg_groups.join(", "),
            evolution_description: record.evolution_description.clone(),
            photos: Vec::new(),
            evolution_photos: Vec::new(),
        }
    }

    fn text_fields(&self) -> [(&'static str, &str); 9] {
        [
            ("name", &self.name),
            ("degree", &self.degree),
            ("type", &self.pokemon_type),
            ("description", &self.description),
            ("height", &self.height),
            ("weight", &self.weight),
            ("male_gender_ratio", &self.male_gender_ratio),
            ("female_gender_ratio", &self.female_gender_ratio),
            ("evolution_description", &self.evolution_description),
        ]
    }

    fn file_parts(&self) -> impl Iterator<Item = FormPart> + '_ {
        let photos = self.photos.iter().map(|file| FormPart::File {
            group: FileGroup::Photo,
            file: file.clone(),
        });
        let evolution = self.evolution_photos.iter().map(|file| FormPart::File {
            group: FileGroup::EvolutionPhoto,
            file: file.clone(),
        });
        photos.chain(evolution)
    }

    /// The full create payload. List inputs are sent comma-joined.
    pub fn parts(&self) -> Vec<FormPart> {
        let mut parts: Vec<FormPart> = self
            .text_fields()
            .into_iter()
            .map(|(name, value)| FormPart::Text {
                name,
                value: value.trim().to_string(),
            })
            .collect();
        parts.push(FormPart::Text {
            name: "abilities",
            value: split_list(&self.abilities).join(","),
        });
        parts.push(FormPart::Text {
            name: "egg_groups",
            value: split_list(&self.egg_groups).join(","),
        });
        parts.extend(self.file_parts());
        parts
    }
}

/// Sparse update payload: only the inputs that differ from the stored record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PokemonEdit {
    parts: Vec<FormPart>,
}

impl PokemonEdit {
    pub fn between(current: &pokemon::Model, draft: &PokemonDraft) -> Self {
        let mut parts = Vec::new();

        let mut text = |name: &'static str, value: &str, unchanged: bool| {
            let value = value.trim();
            if !value.is_empty() && !unchanged {
                parts.push(FormPart::Text {
                    name,
                    value: value.to_string(),
                });
            }
        };
        let same_number =
            |value: &str, stored: f64| value.trim().parse::<f64>().is_ok_and(|v| v == stored);

        text("name", &draft.name, draft.name.trim() == current.name);
        text("degree", &draft.degree, draft.degree.trim() == current.degree);
        text(
            "type",
            &draft.pokemon_type,
            draft.pokemon_type.trim() == current.pokemon_type,
        );
        text(
            "description",
            &draft.description,
            draft.description.trim() == current.description,
        );
        text("height", &draft.height, same_number(&draft.height, current.height));
        text("weight", &draft.weight, same_number(&draft.weight, current.weight));
        text(
            "male_gender_ratio",
            &draft.male_gender_ratio,
            same_number(&draft.male_gender_ratio, current.male_gender_ratio),
        );
        text(
            "female_gender_ratio",
            &draft.female_gender_ratio,
            same_number(&draft.female_gender_ratio, current.female_gender_ratio),
        );
        text(
            "evolution_description",
            &draft.evolution_description,
            draft.evolution_description.trim() == current.evolution_description,
        );

        for (name, input, stored) in [
            ("abilities", &draft.abilities, &current.abilities),
            ("egg_groups", &draft.egg_groups, &current.egg_groups),
        ] {
            let list = split_list(input);
            if !list.is_empty() && &list != stored {
                parts.push(FormPart::Text {
                    name,
                    value: serde_json::Value::from(list).to_string(),
                });
            }
        }

        parts.extend(draft.file_parts());
        Self { parts }
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }
}

/// Typed client for the `/pokemon` endpoints.
#[derive(Debug, Clone)]
pub struct PokedexClient {
    http: reqwest::Client,
    base: Url,
}

impl PokedexClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base.join(path)?)
    }

    fn list_url(&self, search: Option<&str>, filter: Option<&str>) -> Result<Url, ClientError> {
        let mut url = self.endpoint("pokemon")?;
        let params: Vec<_> = [("search", search), ("filter", filter)]
            .into_iter()
            .filter_map(|(key, value)| Some((key, value?.trim())))
            .filter(|(_, value)| !value.is_empty())
            .collect();
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    pub async fn list(
        &self,
        search: Option<&str>,
        filter: Option<&str>,
    ) -> Result<Vec<pokemon::Model>, ClientError> {
        let res = self.http.get(self.list_url(search, filter)?).send().await?;
        let body: ListResponse = decode(res).await?;
        Ok(body.pokemons)
    }

    pub async fn get(&self, id: i32) -> Result<pokemon::Model, ClientError> {
        let res = self
            .http
            .get(self.endpoint(&format!("pokemon/{id}"))?)
            .send()
            .await?;
        decode(res).await
    }

    pub async fn create(&self, draft: &PokemonDraft) -> Result<pokemon::Model, ClientError> {
        let form = into_form(draft.parts())?;
        let res = self
            .http
            .post(self.endpoint("pokemon")?)
            .multipart(form)
            .send()
            .await?;
        let body: CreatedResponse = decode(res).await?;
        tracing::info!(id = body.pokemon.id, "{}", body.message);
        Ok(body.pokemon)
    }

    pub async fn update(&self, id: i32, edit: &PokemonEdit) -> Result<pokemon::Model, ClientError> {
        let form = into_form(edit.parts.clone())?;
        let res = self
            .http
            .put(self.endpoint(&format!("pokemon/{id}"))?)
            .multipart(form)
            .send()
            .await?;
        decode(res).await
    }

    pub async fn delete(&self, id: i32) -> Result<pokemon::Model, ClientError> {
        let res = self
            .http
            .delete(self.endpoint(&format!("pokemon/{id}"))?)
            .send()
            .await?;
        let body: DeletedResponse = decode(res).await?;
        Ok(body.deleted_pokemon)
    }
}

async fn decode<T: DeserializeOwned>(res: reqwest::Response) -> Result<T, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res.json().await?);
    }
    let text = res.text().await.unwrap_or_default();
    tracing::debug!(status = status.as_u16(), body = %text, "Request rejected");
    Err(api_error(status.as_u16(), &text))
}
