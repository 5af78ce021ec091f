use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pokemons")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Display identifier, e.g. a zero-padded Pokédex number
    pub degree: String,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub pokemon_type: String,
    #[sea_orm(column_type = "Text")]
    pub photo: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub height: f64,
    pub weight: f64,
    pub male_gender_ratio: f64,
    pub female_gender_ratio: f64,
    pub abilities: Vec<String>,
    pub egg_groups: Vec<String>,
    #[sea_orm(column_type = "Text")]
    pub evolution_description: String,
    pub evolution_photo: Vec<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
