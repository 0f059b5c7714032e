use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoStatus {
    #[default]
    Draft,
    Published,
}

#[derive(Debug, Error)]
#[error("unknown photo status: {0}")]
pub struct UnknownStatus(pub String);

impl PhotoStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PhotoStatus::Draft => "draft",
            PhotoStatus::Published => "published",
        }
    }
}

impl TryFrom<String> for PhotoStatus {
    type Error = UnknownStatus;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "draft" => Ok(PhotoStatus::Draft),
            "published" => Ok(PhotoStatus::Published),
            _ => Err(UnknownStatus(s)),
        }
    }
}

/// Photo record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub thumbnail_url: String,
    pub category: String,
    pub location: String,
    pub is_featured: bool,
    pub display_order: i32,
    #[sqlx(try_from = "String")]
    pub status: PhotoStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

pub(crate) const PHOTO_COLUMNS: &str = "id, title, description, image_url, thumbnail_url, \
     category, location, is_featured, display_order, status, created_at, updated_at";

/// Filters for listing photos; `None` leaves a column unconstrained.
#[derive(Debug, Clone, Default)]
pub struct PhotoFilters {
    pub status: Option<PhotoStatus>,
    pub category: Option<String>,
    pub is_featured: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub order_by: OrderBy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    DisplayOrder,
    CreatedAt,
    UpdatedAt,
    Title,
    Id,
}

/// Whitelisted ORDER BY clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: SortColumn,
    pub descending: bool,
}

impl Default for OrderBy {
    fn default() -> Self {
        Self {
            column: SortColumn::DisplayOrder,
            descending: false,
        }
    }
}

impl OrderBy {
    /// Accepts `"column"`, `"column ASC"` or `"column DESC"`.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split_whitespace();
        let column = match parts.next()?.to_ascii_lowercase().as_str() {
            "display_order" => SortColumn::DisplayOrder,
            "created_at" => SortColumn::CreatedAt,
            "updated_at" => SortColumn::UpdatedAt,
            "title" => SortColumn::Title,
            "id" => SortColumn::Id,
            _ => return None,
        };
        let descending = match parts.next().map(|d| d.to_ascii_uppercase()) {
            None => false,
            Some(d) if d == "ASC" => false,
            Some(d) if d == "DESC" => true,
            Some(_) => return None,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(Self { column, descending })
    }

    pub fn to_sql(self) -> String {
        let col = match self.column {
            SortColumn::DisplayOrder => "display_order",
            SortColumn::CreatedAt => "created_at",
            SortColumn::UpdatedAt => "updated_at",
            SortColumn::Title => "title",
            SortColumn::Id => "id",
        };
        let dir = if self.descending { "DESC" } else { "ASC" };
        // id as tie-breaker keeps pagination stable
        if self.column == SortColumn::Id {
            format!("{} {}", col, dir)
        } else {
            format!("{} {}, id ASC", col, dir)
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub thumbnail_url: String,
    pub category: String,
    pub location: String,
    pub is_featured: bool,
    pub display_order: i32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayOrderUpdate {
    pub id: i64,
    #[serde(alias = "order")]
    pub display_order: i32,
}
