use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A stored song. `title` is the `song` column and the `song` JSON key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Song {
    pub id: i64,
    pub group: String,
    #[serde(rename = "song")]
    #[sqlx(rename = "song")]
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub release_date: OffsetDateTime,
    pub text: String,
    pub link: String,
}

/// Every column of a song except the store-assigned id.
///
/// This is what gets written on insert and on a full-record update, and it is
/// also the accepted body of an update request (a stray `id` key is ignored).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongMetadata {
    pub group: String,
    #[serde(rename = "song")]
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub release_date: OffsetDateTime,
    pub text: String,
    pub link: String,
}

impl SongMetadata {
    pub fn into_song(self, id: i64) -> Song {
        Song {
            id,
            group: self.group,
            title: self.title,
            release_date: self.release_date,
            text: self.text,
            link: self.link,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn song_serializes_title_as_song() {
        let song = SongMetadata {
            group: "Muse".to_string(),
            title: "Supermassive Black Hole".to_string(),
            release_date: datetime!(2006-07-16 0:00 UTC),
            text: "Ooh baby".to_string(),
            link: "https://example.com".to_string(),
        }
        .into_song(7);

        let value = serde_json::to_value(&song).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["song"], "Supermassive Black Hole");
        assert_eq!(value["release_date"], "2006-07-16T00:00:00Z");
        assert!(value.get("title").is_none());
    }

    #[test]
    fn metadata_ignores_id_in_body() {
        let body = r#"{
            "id": 99,
            "group": "Muse",
            "song": "Uprising",
            "release_date": "2009-09-07T00:00:00Z",
            "text": "Paranoia is in bloom",
            "link": "https://example.com/uprising"
        }"#;

        let metadata: SongMetadata = serde_json::from_str(body).unwrap();
        assert_eq!(metadata.title, "Uprising");
        assert_eq!(metadata.release_date, datetime!(2009-09-07 0:00 UTC));
    }
}
