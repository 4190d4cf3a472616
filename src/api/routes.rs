use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use super::{
    handlers,
    middleware::{cors, logging},
    service::GameService,
};

pub fn create_router(service: Arc<GameService>, enable_cors: bool) -> Router {
    let router = Router::new()
        .route("/api/games", post(handlers::create_game).get(handlers::list_sessions))
        .route("/api/games/stats", get(handlers::get_stats))
        .route("/api/games/:id", get(handlers::get_game).delete(handlers::delete_game))
        .route("/api/games/:id/move", post(handlers::make_move))
        .route("/api/games/:id/restart", post(handlers::restart_game))
        .route("/api/games/:id/hints", put(handlers::set_hints))
        .route("/api/games/:id/history", get(handlers::get_history))
        .route("/health", get(handlers::health_check))
        .with_state(service);

    let router = if enable_cors {
        router.layer(middleware::from_fn(cors))
    } else {
        router
    };

    // ログは最外層に置き、CORS付与後のレスポンスを記録する
    router.layer(middleware::from_fn(logging))
}
