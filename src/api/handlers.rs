use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::catalog::{self, SearchParams};
use crate::db::entities::pokemon;
use crate::error::{parse_id, PokedexError};
use crate::forms::read_multipart;
use crate::forms::requests::{CreateRequest, UpdateRequest};
use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse {
    pub message: String,
    pub pokemons: Vec<pokemon::Model>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    pub pokemon: pokemon::Model,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub message: String,
    #[serde(rename = "deletedPokemon")]
    pub deleted_pokemon: pokemon::Model,
}

/// GET /pokemon?search=&filter=
pub async fn list_pokemons(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ListResponse>, PokedexError> {
    let pokemons = catalog::list(&state.db, &params).await?;
    tracing::debug!(
        search = ?params.search,
        filter = ?params.filter,
        count = pokemons.len(),
        "Listed Pokémon"
    );

    Ok(Json(ListResponse {
        message: "Pokémon retrieved successfully.".to_string(),
        pokemons,
    }))
}

/// POST /pokemon (multipart)
pub async fn create_pokemon(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), PokedexError> {
    let form = read_multipart(multipart?).await?;
    let request = CreateRequest::from_form(form)?;
    let pokemon = state.coordinator.create(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "New Pokémon created successfully.".to_string(),
            pokemon,
        }),
    ))
}

/// GET /pokemon/:id
pub async fn get_pokemon(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<pokemon::Model>, PokedexError> {
    let id = parse_id(&id)?;
    Ok(Json(catalog::find(&state.db, id).await?))
}

/// PUT /pokemon/:id (sparse multipart)
pub async fn update_pokemon(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<pokemon::Model>, PokedexError> {
    let id = parse_id(&id)?;
    let form = read_multipart(multipart?).await?;
    let request = UpdateRequest::from_form(form)?;
    Ok(Json(state.coordinator.update(id, request).await?))
}

/// DELETE /pokemon/:id
pub async fn delete_pokemon(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, PokedexError> {
    let id = parse_id(&id)?;
    let deleted_pokemon = catalog::delete(&state.db, id).await?;
    tracing::info!(id, name = %deleted_pokemon.name, "Pokémon deleted");

    Ok(Json(DeletedResponse {
        message: "Pokémon deleted successfully".to_string(),
        deleted_pokemon,
    }))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Result<Json<serde_json::Value>, PokedexError> {
    state.db.ping().await?;
    Ok(Json(serde_json::json!({ "status": "ok" })))
}
