use sqlx::PgPool;
use tracing::{info, warn};

use crate::error::AppError;
use crate::photos::dto::{CreatePhotoRequest, ListQuery, UpdatePhotoRequest};
use crate::photos::repo;
use crate::photos::repo_types::{
    DisplayOrderUpdate, NewPhoto, OrderBy, Photo, PhotoFilters, PhotoStatus,
};
use crate::db::StoreError;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_URL_LEN: usize = 500;
pub const MAX_CATEGORY_LEN: usize = 50;
pub const MAX_LOCATION_LEN: usize = 200;
pub const MAX_LIST_LIMIT: i64 = 100;
const PHOTO_NOT_FOUND: &str = "Photo not found";

/// Column widths match `migrations/0001_init.sql`.
fn validate_max_len(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::bad_request(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

fn validate_title(title: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::bad_request("title is required"));
    }
    validate_max_len("title", title, MAX_TITLE_LEN)
}

fn validate_image_url(url: &str) -> Result<(), AppError> {
    if url.trim().is_empty() {
        return Err(AppError::bad_request("imageUrl is required"));
    }
    validate_max_len("imageUrl", url, MAX_URL_LEN)
}

fn validate_optional_fields(
    thumbnail_url: Option<&str>,
    category: Option<&str>,
    location: Option<&str>,
) -> Result<(), AppError> {
    if let Some(v) = thumbnail_url {
        validate_max_len("thumbnailUrl", v, MAX_URL_LEN)?;
    }
    if let Some(v) = category {
        validate_max_len("category", v, MAX_CATEGORY_LEN)?;
    }
    if let Some(v) = location {
        validate_max_len("location", v, MAX_LOCATION_LEN)?;
    }
    Ok(())
}

/// Turns the raw query string into filters. Values that don't parse are
/// dropped instead of rejected.
pub fn filters_from_query(q: ListQuery) -> PhotoFilters {
    let status = q
        .status
        .and_then(|s| PhotoStatus::try_from(s.to_ascii_lowercase()).ok());
    let is_featured = q.featured.and_then(|f| match f.as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    });
    let limit = q
        .limit
        .and_then(|l| l.parse::<i64>().ok())
        .filter(|l| *l > 0)
        .map(|l| l.min(MAX_LIST_LIMIT));
    let offset = q
        .offset
        .and_then(|o| o.parse::<i64>().ok())
        .filter(|o| *o >= 0);
    let order_by = match q.order_by.as_deref() {
        Some(raw) => OrderBy::parse(raw).unwrap_or_else(|| {
            warn!(order_by = %raw, "ignoring unsupported order_by");
            OrderBy::default()
        }),
        None => OrderBy::default(),
    };

    PhotoFilters {
        status,
        category: q.category.filter(|c| !c.is_empty()),
        is_featured,
        limit,
        offset,
        order_by,
    }
}

pub async fn create_photo(db: &PgPool, req: CreatePhotoRequest) -> Result<Photo, AppError> {
    validate_title(&req.title)?;
    validate_image_url(&req.image_url)?;
    validate_optional_fields(
        Some(&req.thumbnail_url),
        Some(&req.category),
        Some(&req.location),
    )?;

    let photo = repo::create(
        db,
        &NewPhoto {
            title: req.title.trim().to_string(),
            description: req.description,
            image_url: req.image_url,
            thumbnail_url: req.thumbnail_url,
            category: req.category,
            location: req.location,
            is_featured: req.is_featured,
            display_order: req.display_order,
        },
    )
    .await?;
    info!(photo_id = photo.id, "photo created");
    Ok(photo)
}

pub async fn get_photo(db: &PgPool, id: i64) -> Result<Photo, AppError> {
    repo::get(db, id)
        .await?
        .ok_or_else(|| AppError::not_found(PHOTO_NOT_FOUND))
}

pub async fn list_photos(db: &PgPool, filters: &PhotoFilters) -> Result<(Vec<Photo>, i64), AppError> {
    Ok(repo::list(db, filters).await?)
}

pub async fn update_photo(
    db: &PgPool,
    id: i64,
    req: UpdatePhotoRequest,
) -> Result<Photo, AppError> {
    if !req.has_updates() {
        return Err(AppError::bad_request("no fields to update"));
    }
    if let Some(title) = &req.title {
        validate_title(title)?;
    }
    if let Some(url) = &req.image_url {
        validate_image_url(url)?;
    }
    validate_optional_fields(
        req.thumbnail_url.as_deref(),
        req.category.as_deref(),
        req.location.as_deref(),
    )?;

    let mut photo = get_photo(db, id).await?;
    req.apply(&mut photo);
    photo.title = photo.title.trim().to_string();

    match repo::update(db, &photo).await {
        Ok(p) => Ok(p),
        // deleted between read and write
        Err(StoreError::NotFound) => Err(AppError::not_found(PHOTO_NOT_FOUND)),
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_photo(db: &PgPool, id: i64) -> Result<(), AppError> {
    match repo::delete(db, id).await {
        Ok(()) => {
            info!(photo_id = id, "photo deleted");
            Ok(())
        }
        Err(StoreError::NotFound) => Err(AppError::not_found(PHOTO_NOT_FOUND)),
        Err(e) => Err(e.into()),
    }
}

pub async fn reorder_photos(db: &PgPool, orders: &[DisplayOrderUpdate]) -> Result<(), AppError> {
    if orders.is_empty() {
        return Err(AppError::bad_request("orders must not be empty"));
    }
    match repo::batch_update_display_order(db, orders).await {
        Ok(()) => Ok(()),
        Err(StoreError::NotFound) => Err(AppError::not_found(PHOTO_NOT_FOUND)),
        Err(e) => Err(e.into()),
    }
}
