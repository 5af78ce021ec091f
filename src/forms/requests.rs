use super::schema::{self, FieldKind, FIELDS};
use super::{FileGroup, SubmittedForm, UploadedFile};
use crate::error::ValidationError;

/// Scalar part of a creation request after coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPokemon {
    pub name: String,
    pub degree: String,
    pub pokemon_type: String,
    pub description: String,
    pub height: f64,
    pub weight: f64,
    pub male_gender_ratio: f64,
    pub female_gender_ratio: f64,
    pub abilities: Vec<String>,
    pub egg_groups: Vec<String>,
    pub evolution_description: String,
}

/// `POST /pokemon`: every field plus at least one file in each group.
#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub pokemon: NewPokemon,
    pub photos: Vec<UploadedFile>,
    pub evolution_photos: Vec<UploadedFile>,
}

impl CreateRequest {
    pub fn from_form(mut form: SubmittedForm) -> Result<Self, ValidationError> {
        let missing: Vec<&'static str> = FIELDS
            .iter()
            .filter(|entry| !schema::is_present(entry, &form))
            .map(|entry| entry.name)
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        let pokemon = NewPokemon {
            name: text(&form, "name"),
            degree: text(&form, "degree"),
            pokemon_type: text(&form, "type"),
            description: text(&form, "description"),
            height: number(&form, "height")?,
            weight: number(&form, "weight")?,
            male_gender_ratio: number(&form, "male_gender_ratio")?,
            female_gender_ratio: number(&form, "female_gender_ratio")?,
            abilities: schema::parse_string_list("abilities", form.values("abilities"))?,
            egg_groups: schema::parse_string_list("egg_groups", form.values("egg_groups"))?,
            evolution_description: text(&form, "evolution_description"),
        };

        Ok(Self {
            pokemon,
            photos: form.take_files(FileGroup::Photo),
            evolution_photos: form.take_files(FileGroup::EvolutionPhoto),
        })
    }
}

fn text(form: &SubmittedForm, name: &str) -> String {
    form.text(name).unwrap_or_default().to_string()
}

fn number(form: &SubmittedForm, name: &'static str) -> Result<f64, ValidationError> {
    schema::parse_number(name, form.text(name).unwrap_or_default())
}

/// Fields to overwrite on an existing record; `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PokemonPatch {
    pub name: Option<String>,
    pub degree: Option<String>,
    pub pokemon_type: Option<String>,
    pub photo: Option<String>,
    pub description: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub male_gender_ratio: Option<f64>,
    pub female_gender_ratio: Option<f64>,
    pub abilities: Option<Vec<String>>,
    pub egg_groups: Option<Vec<String>>,
    pub evolution_description: Option<String>,
    pub evolution_photo: Option<Vec<String>>,
}

impl PokemonPatch {
    pub fn is_empty(&self) -> bool {
        *self == PokemonPatch::default()
    }

    fn set_text(&mut self, name: &str, value: String) {
        let slot = match name {
            "name" => &mut self.name,
            "degree" => &mut self.degree,
            "type" => &mut self.pokemon_type,
            "description" => &mut self.description,
            "evolution_description" => &mut self.evolution_description,
            _ => return,
        };
        *slot = Some(value);
    }

    fn set_number(&mut self, name: &str, value: f64) {
        let slot = match name {
            "height" => &mut self.height,
            "weight" => &mut self.weight,
            "male_gender_ratio" => &mut self.male_gender_ratio,
            "female_gender_ratio" => &mut self.female_gender_ratio,
            _ => return,
        };
        *slot = Some(value);
    }

    fn set_list(&mut self, name: &str, value: Vec<String>) {
        let slot = match name {
            "abilities" => &mut self.abilities,
            "egg_groups" => &mut self.egg_groups,
            _ => return,
        };
        *slot = Some(value);
    }
}

/// `PUT /pokemon/:id`: a sparse form. Only submitted, non-blank fields are applied.
#[derive(Debug, Clone, Default)]
pub struct UpdateRequest {
    pub patch: PokemonPatch,
    pub photos: Vec<UploadedFile>,
    pub evolution_photos: Vec<UploadedFile>,
}

impl UpdateRequest {
    pub fn from_form(mut form: SubmittedForm) -> Result<Self, ValidationError> {
        let mut patch = PokemonPatch::default();

        for name in form.text_field_names() {
            let entry = schema::lookup(name)
                .ok_or_else(|| ValidationError::UnknownField(name.to_string()))?;

            match entry.kind {
                FieldKind::Text => {
                    if let Some(value) = form.text(entry.name) {
                        patch.set_text(entry.name, value.to_string());
                    }
                }
                FieldKind::Number => {
                    if let Some(raw) = form.text(entry.name) {
                        patch.set_number(entry.name, schema::parse_number(entry.name, raw)?);
                    }
                }
                FieldKind::List => {
                    let items = schema::parse_string_list(entry.name, form.values(entry.name))?;
                    if !items.is_empty() {
                        patch.set_list(entry.name, items);
                    }
                }
                FieldKind::Files(_) => {
                    return Err(ValidationError::invalid(entry.name, "expected a file upload"));
                }
            }
        }

        Ok(Self {
            patch,
            photos: form.take_files(FileGroup::Photo),
            evolution_photos: form.take_files(FileGroup::EvolutionPhoto),
        })
    }
}
