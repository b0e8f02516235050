use axum::{routing::get, Router};

use crate::handlers::{self, SharedLibrary};

pub fn router(library: SharedLibrary) -> Router {
    Router::new()
        .route("/songs", get(handlers::list_songs).post(handlers::create_song))
        .route(
            "/songs/:id",
            get(handlers::get_song)
                .put(handlers::update_song)
                .delete(handlers::delete_song),
        )
        .route("/songs/:id/text", get(handlers::song_text))
        .with_state(library)
}
