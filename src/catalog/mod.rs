//! Record Store operations on the `pokemons` table.

pub mod search;

use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::db::entities::pokemon;
use crate::error::{PokedexError, Result};
use crate::forms::requests::{NewPokemon, PokemonPatch};
pub use search::SearchParams;

pub async fn list(
    db: &DatabaseConnection,
    params: &SearchParams,
) -> std::result::Result<Vec<pokemon::Model>, DbErr> {
    pokemon::Entity::find()
        .filter(params.condition())
        .order_by_asc(pokemon::Column::Id)
        .all(db)
        .await
}

pub async fn find(db: &DatabaseConnection, id: i32) -> Result<pokemon::Model> {
    pokemon::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(PokedexError::NotFound(id))
}

pub async fn insert(
    db: &DatabaseConnection,
    new: NewPokemon,
    photo: String,
    evolution_photo: Vec<String>,
) -> std::result::Result<pokemon::Model, DbErr> {
    new_active_model(new, photo, evolution_photo)
        .insert(db)
        .await
}

/// Writes the patched columns of `existing` and returns the stored row.
pub async fn apply_patch(
    db: &DatabaseConnection,
    existing: pokemon::Model,
    patch: PokemonPatch,
) -> std::result::Result<pokemon::Model, DbErr> {
    if patch.is_empty() {
        return Ok(existing);
    }
    patched_active_model(existing, patch).update(db).await
}

pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<pokemon::Model> {
    let existing = find(db, id).await?;

    let result = pokemon::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        // Removed by a concurrent request between the lookup and the delete
        return Err(PokedexError::NotFound(id));
    }

    Ok(existing)
}

fn new_active_model(
    new: NewPokemon,
    photo: String,
    evolution_photo: Vec<String>,
) -> pokemon::ActiveModel {
    pokemon::ActiveModel {
        id: NotSet,
        name: Set(new.name),
        degree: Set(new.degree),
        pokemon_type: Set(new.pokemon_type),
        photo: Set(photo),
        description: Set(new.description),
        height: Set(new.height),
        weight: Set(new.weight),
        male_gender_ratio: Set(new.male_gender_ratio),
        female_gender_ratio: Set(new.female_gender_ratio),
        abilities: Set(new.abilities),
        egg_groups: Set(new.egg_groups),
        evolution_description: Set(new.evolution_description),
        evolution_photo: Set(evolution_photo),
    }
}

fn patched_active_model(existing: pokemon::Model, patch: PokemonPatch) -> pokemon::ActiveModel {
    let mut active: pokemon::ActiveModel = existing.into();

    if let Some(v) = patch.name {
        active.name = Set(v);
    }
    if let Some(v) = patch.degree {
        active.degree = Set(v);
    }
    if let Some(v) = patch.pokemon_type {
        active.pokemon_type = Set(v);
    }
    if let Some(v) = patch.photo {
        active.photo = Set(v);
    }
    if let Some(v) = patch.description {
        active.description = Set(v);
    }
    if let Some(v) = patch.height {
        active.height = Set(v);
    }
    if let Some(v) = patch.weight {
        active.weight = Set(v);
    }
    if let Some(v) = patch.male_gender_ratio {
        active.male_gender_ratio = Set(v);
    }
    if let Some(v) = patch.female_gender_ratio {
        active.female_gender_ratio = Set(v);
    }
    if let Some(v) = patch.abilities {
        active.abilities = Set(v);
    }
    if let Some(v) = patch.egg_groups {
        active.egg_groups = Set(v);
    }
    if let Some(v) = patch.evolution_description {
        active.evolution_description = Set(v);
    }
    if let Some(v) = patch.evolution_photo {
        active.evolution_photo = Set(v);
    }

    active
}
