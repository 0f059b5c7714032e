use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;

use crate::photos::repo_types::{Photo, PhotoStatus};

pub const MAX_COMPONENT_NAME_LEN: usize = 100;

/// Per-assignment display overrides, stored as JSONB.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentPhotoProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Placement of a photo inside a named front-end component.
#[derive(Debug, Clone, FromRow)]
pub struct ComponentPhoto {
    pub id: i64,
    pub component_name: String,
    pub photo_id: i64,
    pub sort_order: i32,
    pub props: Json<ComponentPhotoProps>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

pub(crate) const COMPONENT_PHOTO_COLUMNS: &str =
    "id, component_name, photo_id, sort_order, props, created_at, updated_at";

/// One row of `component_photos JOIN photos`; photo columns carry a `p_` prefix.
#[derive(Debug, FromRow)]
pub struct ComponentPhotoRow {
    pub id: i64,
    pub component_name: String,
    pub photo_id: i64,
    pub sort_order: i32,
    pub props: Json<ComponentPhotoProps>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub p_title: String,
    pub p_description: String,
    pub p_image_url: String,
    pub p_thumbnail_url: String,
    pub p_category: String,
    pub p_location: String,
    pub p_is_featured: bool,
    pub p_display_order: i32,
    #[sqlx(try_from = "String")]
    pub p_status: PhotoStatus,
    pub p_created_at: OffsetDateTime,
    pub p_updated_at: OffsetDateTime,
}

pub(crate) const JOINED_SELECT: &str = r#"
    SELECT cp.id, cp.component_name, cp.photo_id, cp.sort_order, cp.props,
           cp.created_at, cp.updated_at,
           p.title AS p_title, p.description AS p_description, p.image_url AS p_image_url,
           p.thumbnail_url AS p_thumbnail_url, p.category AS p_category,
           p.location AS p_location, p.is_featured AS p_is_featured,
           p.display_order AS p_display_order, p.status AS p_status,
           p.created_at AS p_created_at, p.updated_at AS p_updated_at
      FROM component_photos cp
      JOIN photos p ON p.id = cp.photo_id
"#;

/// API shape of an assignment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPhotoView {
    pub id: i64,
    pub component_name: String,
    pub photo_id: i64,
    pub order: i32,
    pub props: ComponentPhotoProps,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<Photo>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<ComponentPhoto> for ComponentPhotoView {
    fn from(cp: ComponentPhoto) -> Self {
        Self {
            id: cp.id,
            component_name: cp.component_name,
            photo_id: cp.photo_id,
            order: cp.sort_order,
            props: cp.props.0,
            photo: None,
            created_at: cp.created_at,
            updated_at: cp.updated_at,
        }
    }
}

impl From<ComponentPhotoRow> for ComponentPhotoView {
    fn from(r: ComponentPhotoRow) -> Self {
        let photo = Photo {
            id: r.photo_id,
            title: r.p_title,
            description: r.p_description,
            image_url: r.p_image_url,
            thumbnail_url: r.p_thumbnail_url,
            category: r.p_category,
            location: r.p_location,
            is_featured: r.p_is_featured,
            display_order: r.p_display_order,
            status: r.p_status,
            created_at: r.p_created_at,
            updated_at: r.p_updated_at,
        };
        Self {
            id: r.id,
            component_name: r.component_name,
            photo_id: r.photo_id,
            order: r.sort_order,
            props: r.props.0,
            photo: Some(photo),
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewComponentPhoto {
    pub component_name: String,
    pub photo_id: i64,
    pub sort_order: i32,
    pub props: ComponentPhotoProps,
}
