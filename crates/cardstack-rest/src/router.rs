//! Main application router.

use crate::{
    controllers::{card_controller, health_controller},
    middleware::logging_middleware,
    state::AppState,
};
use axum::{middleware, Router};
use cardstack_config::ServerConfig;
use tower_http::{
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Base path of the card resource.
pub const CARD_BASE_PATH: &str = "/service/card";

/// Creates the main application router.
pub fn create_router(state: AppState, server_config: &ServerConfig) -> Router {
    let router = Router::new()
        .merge(health_controller::router())
        .nest(CARD_BASE_PATH, card_controller::router())
        .with_state(state)
        .layer(TimeoutLayer::new(server_config.request_timeout()))
        .layer(create_cors_layer(server_config))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware));

    info!("Router created with card endpoints at {}", CARD_BASE_PATH);
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if server_config.cors_enabled {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use cardstack_core::{Card, CardstackResult};
    use cardstack_repository::Dao;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct EmptyDao;

    #[async_trait]
    impl Dao<Card> for EmptyDao {
        async fn create(&self, card: &mut Card) -> CardstackResult<i64> {
            card.id = Some(1);
            Ok(1)
        }

        async fn read(&self, _id: i64) -> CardstackResult<Option<Card>> {
            Ok(None)
        }

        async fn update(&self, _card: &Card) -> CardstackResult<()> {
            Ok(())
        }

        async fn delete(&self, _id: i64) -> CardstackResult<()> {
            Ok(())
        }
    }

    fn app() -> Router {
        create_router(AppState::new(Arc::new(EmptyDao)), &ServerConfig::default())
    }

    #[tokio::test]
    async fn test_health_is_mounted() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_without_pool() {
        let response = app()
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cards_are_nested_under_base_path() {
        let response = app()
            .oneshot(Request::get("/service/card/5").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app()
            .oneshot(Request::delete("/service/card/5").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_non_numeric_identity_is_rejected() {
        let response = app()
            .oneshot(Request::get("/service/card/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
