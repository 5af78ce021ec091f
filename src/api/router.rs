use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;

use crate::api::handlers;
use crate::AppState;

/// Simple request logger middleware
async fn log_middleware(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    tracing::info!(">>> {} {}", method, uri);
    let res = next.run(req).await;
    tracing::info!("<<< {} {} -> {}", method, uri, res.status());
    res
}

/// Build the Pokédex API router
pub fn build_router(state: AppState, upload_max_bytes: usize) -> Router {
    Router::new()
        .route(
            "/pokemon",
            get(handlers::list_pokemons).post(handlers::create_pokemon),
        )
        .route(
            "/pokemon/:id",
            get(handlers::get_pokemon)
                .put(handlers::update_pokemon)
                .delete(handlers::delete_pokemon),
        )
        .route("/health", get(handlers::health))
        .layer(middleware::from_fn(log_middleware))
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(upload_max_bytes))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::bulbasaur;
    use crate::db::entities::pokemon;
    use crate::storage::tests::MemoryStore;
    use axum::body::Body;
    use axum::http::{header, Method, StatusCode};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    const BOUNDARY: &str = "pokedex-test-boundary";

    #[derive(Default)]
    struct MultipartBody(Vec<u8>);

    impl MultipartBody {
        fn text(mut self, name: &str, value: &str) -> Self {
            self.0.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
            self
        }

        fn file(mut self, name: &str, file_name: &str) -> Self {
            self.0.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
                )
                .as_bytes(),
            );
            self.0.extend_from_slice(b"\x89PNG\r\n\x1a\n");
            self.0.extend_from_slice(b"\r\n");
            self
        }

        fn finish(mut self) -> Body {
            self.0
                .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
            Body::from(self.0)
        }
    }

    fn multipart_request(method: Method, uri: &str, body: MultipartBody) -> Request {
        axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(body.finish())
            .unwrap()
    }

    fn empty_request(method: Method, uri: &str) -> Request {
        axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn app(db: &DatabaseConnection, store: Arc<MemoryStore>) -> Router {
        build_router(AppState::new(db.clone(), store), 1024 * 1024)
    }

    async fn send(app: Router, request: Request) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn bulbasaur_form() -> MultipartBody {
        MultipartBody::default()
            .text("name", "Bulbasaur")
            .text("degree", "001")
            .text("type", "Grass")
            .text("description", "A strange seed was planted on its back at birth.")
            .text("height", "0.7")
            .text("weight", "6.9")
            .text("male_gender_ratio", "87.5")
            .text("female_gender_ratio", "12.5")
            .text("abilities", "Overgrow")
            .text("egg_groups", "Monster,Grass")
            .text("evolution_description", "Evolves into Ivysaur at level 16.")
            .file("photo[]", "bulbasaur.png")
            .file("evolution_photo[]", "ivysaur.png")
    }

    #[tokio::test]
    async fn test_create_missing_fields_is_400_without_side_effects() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let store = Arc::new(MemoryStore::default());
        let body = MultipartBody::default()
            .text("name", "Bulbasaur")
            .text("type", "Grass")
            .file("photo[]", "bulbasaur.png");

        let (status, json) = send(
            app(&db, store.clone()),
            multipart_request(Method::POST, "/pokemon", body),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Missing required fields");
        assert_eq!(
            json["missingFields"],
            serde_json::json!([
                "degree",
                "description",
                "height",
                "weight",
                "male_gender_ratio",
                "female_gender_ratio",
                "abilities",
                "egg_groups",
                "evolution_description",
                "evolution_photo"
            ])
        );
        assert!(store.keys().is_empty());
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_create_returns_201_with_record() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![bulbasaur()]])
            .into_connection();
        let store = Arc::new(MemoryStore::default());

        let (status, json) = send(
            app(&db, store.clone()),
            multipart_request(Method::POST, "/pokemon", bulbasaur_form()),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["message"], "New Pokémon created successfully.");
        let created: pokemon::Model = serde_json::from_value(json["pokemon"].clone()).unwrap();
        assert_eq!(created, bulbasaur());
        assert_eq!(json["pokemon"]["type"], "Grass");

        let mut keys = store.keys();
        keys.sort();
        assert_eq!(keys, vec!["bulbasaur.png", "ivysaur.png"]);
    }

    #[tokio::test]
    async fn test_create_storage_failure_is_500() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let store = Arc::new(MemoryStore::failing_on("ivysaur.png"));

        let (status, json) = send(
            app(&db, store),
            multipart_request(Method::POST, "/pokemon", bulbasaur_form()),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["message"], "Failed to upload image");
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_list_wraps_records() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![bulbasaur()]])
            .into_connection();

        let (status, json) = send(
            app(&db, Arc::new(MemoryStore::default())),
            empty_request(Method::GET, "/pokemon?search=bulb&filter=grass"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Pokémon retrieved successfully.");
        assert_eq!(json["pokemons"].as_array().unwrap().len(), 1);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("%bulb%"), "{}", log);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![bulbasaur()]])
            .into_connection();

        let (status, json) = send(
            app(&db, Arc::new(MemoryStore::default())),
            empty_request(Method::GET, "/pokemon/1"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let fetched: pokemon::Model = serde_json::from_value(json).unwrap();
        assert_eq!(fetched, bulbasaur());
    }

    #[tokio::test]
    async fn test_get_missing_is_404() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<pokemon::Model>::new()])
            .into_connection();

        let (status, json) = send(
            app(&db, Arc::new(MemoryStore::default())),
            empty_request(Method::GET, "/pokemon/151"),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "Pokémon not found");
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_400_before_store_access() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let store = Arc::new(MemoryStore::default());

        for method in [Method::GET, Method::DELETE] {
            let (status, json) = send(
                app(&db, store.clone()),
                empty_request(method, "/pokemon/pikachu"),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["message"], "Invalid or missing Pokémon ID");
        }

        let (status, _) = send(
            app(&db, store),
            multipart_request(
                Method::PUT,
                "/pokemon/pikachu",
                MultipartBody::default().text("name", "Raichu"),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_delete_existing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![bulbasaur()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let (status, json) = send(
            app(&db, Arc::new(MemoryStore::default())),
            empty_request(Method::DELETE, "/pokemon/1"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Pokémon deleted successfully");
        assert_eq!(json["deletedPokemon"]["name"], "Bulbasaur");
    }

    #[tokio::test]
    async fn test_delete_missing_is_404() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<pokemon::Model>::new()])
            .into_connection();

        let (status, _) = send(
            app(&db, Arc::new(MemoryStore::default())),
            empty_request(Method::DELETE, "/pokemon/999"),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_name_only() {
        let mut renamed = bulbasaur();
        renamed.name = "Bulby".to_string();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![bulbasaur()], vec![renamed.clone()]])
            .into_connection();
        let store = Arc::new(MemoryStore::default());

        let (status, json) = send(
            app(&db, store.clone()),
            multipart_request(
                Method::PUT,
                "/pokemon/1",
                MultipartBody::default().text("name", "Bulby"),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let stored: pokemon::Model = serde_json::from_value(json).unwrap();
        assert_eq!(stored, renamed);
        assert!(store.keys().is_empty());
    }

    #[tokio::test]
    async fn test_create_without_multipart_body_is_request_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let request = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/pokemon")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":"Bulbasaur"}"#))
            .unwrap();

        let (status, json) = send(app(&db, Arc::new(MemoryStore::default())), request).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["message"], "Error parsing form data");
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_update_with_photo_as_text_is_400_without_upload() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let store = Arc::new(MemoryStore::default());

        for name in ["photo", "photo[]"] {
            let (status, json) = send(
                app(&db, store.clone()),
                multipart_request(
                    Method::PUT,
                    "/pokemon/1",
                    MultipartBody::default().text(name, "https://cdn.test/old.png"),
                ),
            )
            .await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "{name}");
            assert_eq!(json["field"], "photo", "{name}");
        }

        assert!(store.keys().is_empty());
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_field_is_400() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let (status, json) = send(
            app(&db, Arc::new(MemoryStore::default())),
            multipart_request(
                Method::PUT,
                "/pokemon/1",
                MultipartBody::default().text("legendary", "true"),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["field"], "legendary");
    }

    #[tokio::test]
    async fn test_update_missing_is_404() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<pokemon::Model>::new()])
            .into_connection();

        let (status, _) = send(
            app(&db, Arc::new(MemoryStore::default())),
            multipart_request(
                Method::PUT,
                "/pokemon/12",
                MultipartBody::default().text("weight", "10"),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
