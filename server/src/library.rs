use std::sync::Arc;

use database::{Page, Song, SongFilter, SongMetadata, SongRepository};
use lookup::MetadataLookup;
use tracing::{info, instrument};

use crate::error::ApiError;

/// Song operations as exposed over HTTP: the store plus the info lookup that
/// has to succeed before a song can be created.
pub struct SongLibrary {
    repository: Arc<dyn SongRepository>,
    lookup: Arc<dyn MetadataLookup>,
}

impl SongLibrary {
    pub fn new(repository: Arc<dyn SongRepository>, lookup: Arc<dyn MetadataLookup>) -> Self {
        Self { repository, lookup }
    }

    pub async fn list(&self, filter: &SongFilter, page: Page) -> Result<Vec<Song>, ApiError> {
        Ok(self.repository.list(filter, page).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Song, ApiError> {
        Ok(self.repository.get(id).await?)
    }

    pub async fn text(&self, id: i64, page: Page) -> Result<String, ApiError> {
        Ok(self.repository.text(id, page).await?)
    }

    pub async fn update(&self, id: i64, metadata: SongMetadata) -> Result<Song, ApiError> {
        Ok(self.repository.update(&metadata.into_song(id)).await?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        Ok(self.repository.delete(id).await?)
    }

    /// Resolves the song's details, then stores it. Nothing is written when the
    /// lookup fails.
    #[instrument(skip(self))]
    pub async fn create(&self, group: &str, title: &str) -> Result<Song, ApiError> {
        if group.trim().is_empty() || title.trim().is_empty() {
            return Err(ApiError::Validation(
                "group and song must not be empty".to_string(),
            ));
        }

        let detail = self.lookup.lookup(group, title).await?;
        let metadata = SongMetadata {
            group: group.to_string(),
            title: title.to_string(),
            release_date: detail.release_date,
            text: detail.text,
            link: detail.link,
        };

        let song = self.repository.insert(&metadata).await?;
        info!(song_id = song.id, "created song");
        Ok(song)
    }
}
