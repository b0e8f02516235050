//! Filter and pagination window for song listings, and the SQL built from them.

use std::{collections::BTreeMap, str::FromStr};

use sqlx::{Postgres, QueryBuilder};

use crate::error::StoreError;

pub(crate) const SONG_COLUMNS: &str = r#"id, "group", song, release_date, text, link"#;

/// Columns a listing may be narrowed by.
///
/// The declaration order is the order predicates are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterField {
    Group,
    Title,
}

impl FilterField {
    pub const ALL: [Self; 2] = [Self::Group, Self::Title];

    /// Name used in query strings and filter maps.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Title => "song",
        }
    }

    fn column(&self) -> &'static str {
        match self {
            Self::Group => r#""group""#,
            Self::Title => "song",
        }
    }
}

impl FromStr for FilterField {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| StoreError::InvalidFilter(format!("unknown filter field '{s}'")))
    }
}

/// Exact-match predicates, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongFilter {
    predicates: BTreeMap<FilterField, String>,
}

impl SongFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: FilterField, value: impl Into<String>) -> Self {
        self.predicates.insert(field, value.into());
        self
    }

    /// Builds a filter from raw key/value pairs, rejecting keys outside the allow-list.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        pairs.into_iter().try_fold(Self::new(), |filter, (key, value)| {
            let field = key.as_ref().parse::<FilterField>()?;
            Ok(filter.with(field, value))
        })
    }

    pub fn get(&self, field: FilterField) -> Option<&str> {
        self.predicates.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FilterField, &str)> {
        self.predicates
            .iter()
            .map(|(field, value)| (*field, value.as_str()))
    }
}

/// A `[offset, offset + limit)` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
        }
    }
}

impl Page {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    /// Lenient parse of raw query values: anything missing, non-numeric or
    /// negative falls back to the default for that half of the window.
    pub fn from_params(limit: Option<&str>, offset: Option<&str>) -> Self {
        let default = Self::default();
        let parse = |raw: Option<&str>, fallback: u32| {
            raw.and_then(|value| value.trim().parse::<u32>().ok())
                .unwrap_or(fallback)
        };

        Self {
            limit: parse(limit, default.limit),
            offset: parse(offset, default.offset),
        }
    }
}

/// `select` over songs, narrowed by `filter`, ordered by id and windowed by `page`.
pub(crate) fn select_songs(filter: &SongFilter, page: Page) -> QueryBuilder<'_, Postgres> {
    let mut builder = QueryBuilder::new(format!("select {SONG_COLUMNS} from songs where true"));

    for (field, value) in filter.iter() {
        builder
            .push(" and ")
            .push(field.column())
            .push(" = ")
            .push_bind(value);
    }

    builder
        .push(" order by id limit ")
        .push_bind(i64::from(page.limit))
        .push(" offset ")
        .push_bind(i64::from(page.offset));

    builder
}
