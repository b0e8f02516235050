use std::{str::FromStr, time::Duration};

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tracing::{debug, info, instrument};

pub mod error;
pub mod lyrics;
pub mod models;
pub mod query;

pub use error::{Result, StoreError};
pub use models::{Song, SongMetadata};
pub use query::{FilterField, Page, SongFilter};

use query::SONG_COLUMNS;

/// Durable storage of songs.
#[async_trait]
pub trait SongRepository: Send + Sync {
    /// Songs matching every predicate of `filter`, ordered by id, inside `page`.
    async fn list(&self, filter: &SongFilter, page: Page) -> Result<Vec<Song>>;

    async fn get(&self, id: i64) -> Result<Song>;

    /// The window of lyric lines selected by `page`, or `NotFound` for an unknown id.
    async fn text(&self, id: i64, page: Page) -> Result<String>;

    /// Persists a new song and returns it with its assigned id.
    async fn insert(&self, metadata: &SongMetadata) -> Result<Song>;

    /// Replaces every column but the id. `NotFound` if no row has `song.id`.
    async fn update(&self, song: &Song) -> Result<Song>;

    /// Removes a song. Deleting an id that does not exist is not an error.
    async fn delete(&self, id: i64) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    /// Server-side cap on each statement, sent as `statement_timeout`.
    pub statement_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
            statement_timeout: Duration::from_secs(5),
        }
    }
}

pub struct Database {
    pool: sqlx::Pool<sqlx::Postgres>,
}

impl Database {
    pub async fn connect(url: &str, settings: &PoolSettings) -> Result<Self> {
        let statement_timeout = settings.statement_timeout.as_millis().to_string();
        let options = PgConnectOptions::from_str(url)?
            .options([("statement_timeout", statement_timeout.as_str())]);

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Creates the songs table if it is missing.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            create table if not exists songs (
                id bigserial primary key,
                "group" text not null,
                song text not null,
                release_date timestamptz not null,
                text text not null,
                link text not null
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        info!("songs table ready");
        Ok(())
    }
}

#[async_trait]
impl SongRepository for Database {
    #[instrument(skip(self), err, level = "debug")]
    async fn list(&self, filter: &SongFilter, page: Page) -> Result<Vec<Song>> {
        let songs = query::select_songs(filter, page)
            .build_query_as::<Song>()
            .fetch_all(&self.pool)
            .await?;

        debug!(n_songs = songs.len(), "fetched songs");
        Ok(songs)
    }

    #[instrument(skip(self), err, level = "debug")]
    async fn get(&self, id: i64) -> Result<Song> {
        sqlx::query_as::<_, Song>(&format!("select {SONG_COLUMNS} from songs where id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound { id })
    }

    #[instrument(skip(self), err, level = "debug")]
    async fn text(&self, id: i64, page: Page) -> Result<String> {
        let (text,): (String,) = sqlx::query_as("select text from songs where id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound { id })?;

        Ok(lyrics::page_lines(&text, page))
    }

    #[instrument(skip(self, metadata), fields(group = %metadata.group, title = %metadata.title), err, level = "debug")]
    async fn insert(&self, metadata: &SongMetadata) -> Result<Song> {
        let song = sqlx::query_as::<_, Song>(&format!(
            r#"
            insert into songs("group", song, release_date, text, link)
            values ($1, $2, $3, $4, $5)
            returning {SONG_COLUMNS}
        "#
        ))
        .bind(&metadata.group)
        .bind(&metadata.title)
        .bind(metadata.release_date)
        .bind(&metadata.text)
        .bind(&metadata.link)
        .fetch_one(&self.pool)
        .await?;

        debug!(song_id = song.id, "inserted song");
        Ok(song)
    }

    #[instrument(skip(self, song), fields(song_id = song.id), err, level = "debug")]
    async fn update(&self, song: &Song) -> Result<Song> {
        sqlx::query_as::<_, Song>(&format!(
            r#"
            update songs
            set "group" = $1, song = $2, release_date = $3, text = $4, link = $5
            where id = $6
            returning {SONG_COLUMNS}
        "#
        ))
        .bind(&song.group)
        .bind(&song.title)
        .bind(song.release_date)
        .bind(&song.text)
        .bind(&song.link)
        .bind(song.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound { id: song.id })
    }

    #[instrument(skip(self), err, level = "debug")]
    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("delete from songs where id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(n_rows = result.rows_affected(), "affected rows");
        Ok(())
    }
}
