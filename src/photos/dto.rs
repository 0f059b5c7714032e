use serde::{Deserialize, Serialize};

use crate::photos::repo_types::{DisplayOrderUpdate, Photo, PhotoStatus};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePhotoRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub image_url: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub display_order: i32,
}

/// Partial update: absent fields keep their current value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePhotoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub is_featured: Option<bool>,
    pub display_order: Option<i32>,
    pub status: Option<PhotoStatus>,
}

impl UpdatePhotoRequest {
    pub fn has_updates(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.image_url.is_some()
            || self.thumbnail_url.is_some()
            || self.category.is_some()
            || self.location.is_some()
            || self.is_featured.is_some()
            || self.display_order.is_some()
            || self.status.is_some()
    }

    pub fn apply(self, photo: &mut Photo) {
        fn set<T>(target: &mut T, source: Option<T>) {
            if let Some(v) = source {
                *target = v;
            }
        }
        set(&mut photo.title, self.title);
        set(&mut photo.description, self.description);
        set(&mut photo.image_url, self.image_url);
        set(&mut photo.thumbnail_url, self.thumbnail_url);
        set(&mut photo.category, self.category);
        set(&mut photo.location, self.location);
        set(&mut photo.is_featured, self.is_featured);
        set(&mut photo.display_order, self.display_order);
        set(&mut photo.status, self.status);
    }
}

/// Query string of `GET /photos`. Unparseable values are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub category: Option<String>,
    pub featured: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub order_by: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    #[serde(alias = "updates")]
    pub orders: Vec<DisplayOrderUpdate>,
}

#[derive(Debug, Serialize)]
pub struct PhotoList {
    pub data: Vec<Photo>,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
