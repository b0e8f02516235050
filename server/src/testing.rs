use async_trait::async_trait;
use database::{Page, Song, SongFilter, SongMetadata, SongRepository};
use lookup::{MetadataLookup, SongDetail};
use mockall::mock;
use time::macros::datetime;

mock! {
    pub Repository {}

    #[async_trait]
    impl SongRepository for Repository {
        async fn list(&self, filter: &SongFilter, page: Page) -> database::Result<Vec<Song>>;
        async fn get(&self, id: i64) -> database::Result<Song>;
        async fn text(&self, id: i64, page: Page) -> database::Result<String>;
        async fn insert(&self, metadata: &SongMetadata) -> database::Result<Song>;
        async fn update(&self, song: &Song) -> database::Result<Song>;
        async fn delete(&self, id: i64) -> database::Result<()>;
    }
}

mock! {
    pub Lookup {}

    #[async_trait]
    impl MetadataLookup for Lookup {
        async fn lookup(&self, group: &str, title: &str) -> lookup::Result<SongDetail>;
    }
}

pub fn sample_metadata() -> SongMetadata {
    SongMetadata {
        group: "Muse".to_string(),
        title: "Supermassive Black Hole".to_string(),
        release_date: datetime!(2006-07-16 0:00 UTC),
        text: "Ooh baby, don't you know I suffer?\nOoh baby, can you hear me moan?".to_string(),
        link: "https://www.youtube.com/watch?v=Xsp3_a-PMTw".to_string(),
    }
}
