//! Card CRUD controller.

use crate::{
    responses::{created, ok, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use cardstack_core::{Card, CardstackError};
use tracing::debug;

/// Creates the card router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_card).put(update_card))
        .route("/:id", get(read_card).delete(delete_card))
}

/// Create a card. The body must not carry an identity.
async fn create_card(
    State(state): State<AppState>,
    Json(mut card): Json<Card>,
) -> Result<(StatusCode, Json<Card>), AppError> {
    debug!("Create card request: {}", card.card_name);

    state.card_dao.create(&mut card).await?;
    Ok(created(card))
}

/// Read a card by identity.
async fn read_card(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Card> {
    debug!("Read card request: {}", id);

    match state.card_dao.read(id).await? {
        Some(card) => ok(card),
        None => Err(CardstackError::not_found(format!("Card {} not found", id)).into()),
    }
}

/// Update every field of a persisted card.
async fn update_card(State(state): State<AppState>, Json(card): Json<Card>) -> ApiResult<Card> {
    debug!("Update card request: {:?}", card.id);

    state.card_dao.update(&card).await?;
    ok(card)
}

/// Delete a card by identity.
async fn delete_card(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    debug!("Delete card request: {}", id);

    match state.card_dao.delete(id).await {
        Ok(()) => Ok(StatusCode::OK),
        Err(e) if e.is_not_found() => {
            Err(CardstackError::not_found(format!("Card {} not found", id)).into())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use cardstack_core::testing::card_with_test_values;
    use cardstack_core::{CardstackResult, Entity, ErrorResponse};
    use cardstack_repository::Dao;
    use http_body_util::BodyExt;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    /// Identity the in-memory store reports as matching several rows.
    const AMBIGUOUS_ID: i64 = 666;

    #[derive(Default)]
    struct InMemoryCardDao {
        cards: Mutex<BTreeMap<i64, Card>>,
    }

    #[async_trait]
    impl Dao<Card> for InMemoryCardDao {
        async fn create(&self, card: &mut Card) -> CardstackResult<i64> {
            if card.is_persisted() {
                return Err(CardstackError::invalid_argument("Card already has an identity"));
            }
            let mut cards = self.cards.lock().unwrap();
            let id = cards.keys().next_back().copied().unwrap_or(0) + 1;
            card.set_id(id);
            cards.insert(id, card.clone());
            Ok(id)
        }

        async fn read(&self, id: i64) -> CardstackResult<Option<Card>> {
            Ok(self.cards.lock().unwrap().get(&id).cloned())
        }

        async fn update(&self, card: &Card) -> CardstackResult<()> {
            let id = card
                .id
                .ok_or_else(|| CardstackError::invalid_argument("Card has no identity"))?;
            let mut cards = self.cards.lock().unwrap();
            match cards.get_mut(&id) {
                Some(stored) => {
                    *stored = card.clone();
                    Ok(())
                }
                None => Err(CardstackError::persistence_not_found("Failed attempt to update Card: no row")),
            }
        }

        async fn delete(&self, id: i64) -> CardstackResult<()> {
            if id == AMBIGUOUS_ID {
                return Err(CardstackError::persistence("Failed attempt to delete Card: affected 2 rows"));
            }
            match self.cards.lock().unwrap().remove(&id) {
                Some(_) => Ok(()),
                None => Err(CardstackError::persistence_not_found("Failed attempt to delete Card: not found")),
            }
        }
    }

    fn app() -> (Router, Arc<InMemoryCardDao>) {
        let dao = Arc::new(InMemoryCardDao::default());
        let state = AppState::new(dao.clone());
        (router().with_state(state), dao)
    }

    fn json_request(method: &str, uri: &str, card: &Card) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(card).unwrap()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_returns_created_card() {
        let (app, dao) = app();
        let card = card_with_test_values();

        let response = app.oneshot(json_request("POST", "/", &card)).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let created: Card = body_json(response).await;
        assert_eq!(created, card);
        assert_eq!(created.id, Some(1));
        assert_eq!(dao.cards.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_with_identity_is_precondition_failed() {
        let (app, dao) = app();
        let card = card_with_test_values().with_id(4);

        let response = app.oneshot(json_request("POST", "/", &card)).await.unwrap();

        assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);
        let error: ErrorResponse = body_json(response).await;
        assert_eq!(error.code, "INVALID_ARGUMENT");
        assert!(dao.cards.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_existing_and_missing() {
        let (app, dao) = app();
        let mut card = card_with_test_values().with_description("foil");
        dao.create(&mut card).await.unwrap();

        let response = app
            .clone()
            .oneshot(empty_request("GET", "/1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let read: Card = body_json(response).await;
        assert_eq!(read, card);

        let response = app.oneshot(empty_request("GET", "/2")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ErrorResponse = body_json(response).await;
        assert_eq!(error.code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_update_returns_body() {
        let (app, dao) = app();
        let mut card = card_with_test_values();
        dao.create(&mut card).await.unwrap();
        let changed = card.clone().with_description("updated");

        let response = app.oneshot(json_request("PUT", "/", &changed)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Card = body_json(response).await;
        assert_eq!(body, changed);
        assert_eq!(dao.cards.lock().unwrap().get(&1), Some(&changed));
    }

    #[tokio::test]
    async fn test_update_without_identity_is_precondition_failed() {
        let (app, _) = app();
        let card = card_with_test_values();

        let response = app.oneshot(json_request("PUT", "/", &card)).await.unwrap();

        assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);
    }

    #[tokio::test]
    async fn test_update_missing_card_is_server_error() {
        let (app, _) = app();
        let card = card_with_test_values().with_id(99);

        let response = app.oneshot(json_request("PUT", "/", &card)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let error: ErrorResponse = body_json(response).await;
        assert_eq!(error.code, "PERSISTENCE_ERROR");
    }

    #[tokio::test]
    async fn test_delete_then_missing() {
        let (app, dao) = app();
        let mut card = card_with_test_values();
        dao.create(&mut card).await.unwrap();

        let response = app
            .clone()
            .oneshot(empty_request("DELETE", "/1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(dao.cards.lock().unwrap().is_empty());

        let response = app.oneshot(empty_request("DELETE", "/1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_row_count_anomaly_is_server_error() {
        let (app, _) = app();

        let response = app
            .oneshot(empty_request("DELETE", &format!("/{}", AMBIGUOUS_ID)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let error: ErrorResponse = body_json(response).await;
        assert_eq!(error.code, "PERSISTENCE_ERROR");
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let (app, dao) = app();
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"cardName\": 3}"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert!(response.status().is_client_error());
        assert!(dao.cards.lock().unwrap().is_empty());
    }
}
