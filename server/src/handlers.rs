use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use database::{Page, Song, SongFilter, SongMetadata};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{error::ApiError, library::SongLibrary};

pub type SharedLibrary = Arc<SongLibrary>;

#[derive(Debug, Deserialize)]
pub struct PageParams {
    limit: Option<String>,
    offset: Option<String>,
}

impl PageParams {
    fn page(&self) -> Page {
        Page::from_params(self.limit.as_deref(), self.offset.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub struct NewSongRequest {
    group: String,
    song: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TextResponse {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// `GET /songs?group=&song=&limit=&offset=`
#[instrument(skip(library))]
pub async fn list_songs(
    State(library): State<SharedLibrary>,
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<Json<Vec<Song>>, ApiError> {
    let Query(mut params) = params?;
    let page = Page::from_params(
        params.remove("limit").as_deref(),
        params.remove("offset").as_deref(),
    );
    let filter = SongFilter::from_pairs(params)?;

    let songs = library.list(&filter, page).await?;
    info!(n_songs = songs.len(), "listed songs");
    Ok(Json(songs))
}

/// `GET /songs/{id}`
#[instrument(skip(library))]
pub async fn get_song(
    State(library): State<SharedLibrary>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Song>, ApiError> {
    let Path(id) = id?;
    Ok(Json(library.get(id).await?))
}

/// `GET /songs/{id}/text?limit=&offset=`
#[instrument(skip(library))]
pub async fn song_text(
    State(library): State<SharedLibrary>,
    id: Result<Path<i64>, PathRejection>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<TextResponse>, ApiError> {
    let (Path(id), Query(params)) = (id?, params?);
    let text = library.text(id, params.page()).await?;
    Ok(Json(TextResponse { text }))
}

/// `DELETE /songs/{id}`
#[instrument(skip(library))]
pub async fn delete_song(
    State(library): State<SharedLibrary>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = id?;
    library.delete(id).await?;
    info!("deleted song");
    Ok(Json(MessageResponse {
        message: "Song deleted".to_string(),
    }))
}

/// `PUT /songs/{id}` with a full song body. The id comes from the path.
#[instrument(skip(library, body))]
pub async fn update_song(
    State(library): State<SharedLibrary>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<SongMetadata>, JsonRejection>,
) -> Result<Json<Song>, ApiError> {
    let (Path(id), Json(metadata)) = (id?, body?);
    let song = library.update(id, metadata).await?;
    info!("updated song");
    Ok(Json(song))
}

/// `POST /songs` with `{group, song}`.
#[instrument(skip(library, body))]
pub async fn create_song(
    State(library): State<SharedLibrary>,
    body: Result<Json<NewSongRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Song>), ApiError> {
    let Json(request) = body?;
    let song = library.create(&request.group, &request.song).await?;
    Ok((StatusCode::CREATED, Json(song)))
}
