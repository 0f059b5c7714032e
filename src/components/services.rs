use sqlx::PgPool;
use tracing::info;

use crate::components::dto::{AssignPhotoRequest, UpdateAssignmentRequest};
use crate::components::repo;
use crate::components::repo_types::{
    ComponentPhotoView, NewComponentPhoto, MAX_COMPONENT_NAME_LEN,
};
use crate::db::StoreError;
use crate::error::AppError;
use crate::photos;

const ALREADY_ASSIGNED: &str = "Photo is already assigned to this component";
const ASSIGNMENT_NOT_FOUND: &str = "Component photo not found";

fn validate_component_name(name: &str) -> Result<(), AppError> {
    if name.is_empty() {
        return Err(AppError::bad_request("componentName is required"));
    }
    if name.chars().count() > MAX_COMPONENT_NAME_LEN {
        return Err(AppError::bad_request(format!(
            "componentName must be at most {} characters",
            MAX_COMPONENT_NAME_LEN
        )));
    }
    Ok(())
}

pub async fn assign_photo(
    db: &PgPool,
    req: AssignPhotoRequest,
) -> Result<ComponentPhotoView, AppError> {
    let component_name = req.component_name.trim().to_string();
    validate_component_name(&component_name)?;

    // 404 for an unknown photo rather than a foreign key error
    photos::services::get_photo(db, req.photo_id).await?;

    if repo::exists(db, &component_name, req.photo_id).await? {
        return Err(AppError::Conflict(ALREADY_ASSIGNED.into()));
    }

    let created = repo::insert(
        db,
        &NewComponentPhoto {
            component_name,
            photo_id: req.photo_id,
            sort_order: req.order,
            props: req.props,
        },
    )
    .await
    .map_err(|e| match e {
        // lost a race against a concurrent assign
        StoreError::Duplicate => AppError::Conflict(ALREADY_ASSIGNED.into()),
        other => other.into(),
    })?;

    info!(
        assignment_id = created.id,
        component = %created.component_name,
        photo_id = created.photo_id,
        "photo assigned to component"
    );
    Ok(created.into())
}

pub async fn update_assignment(
    db: &PgPool,
    id: i64,
    req: UpdateAssignmentRequest,
) -> Result<ComponentPhotoView, AppError> {
    if req.order.is_none() && req.props.is_none() {
        return Err(AppError::bad_request("no fields to update"));
    }
    match repo::update(db, id, req.order, req.props.as_ref()).await {
        Ok(cp) => Ok(cp.into()),
        Err(StoreError::NotFound) => Err(AppError::not_found(ASSIGNMENT_NOT_FOUND)),
        Err(e) => Err(e.into()),
    }
}

pub async fn remove_assignment(db: &PgPool, id: i64) -> Result<(), AppError> {
    match repo::delete(db, id).await {
        Ok(()) => Ok(()),
        Err(StoreError::NotFound) => Err(AppError::not_found(ASSIGNMENT_NOT_FOUND)),
        Err(e) => Err(e.into()),
    }
}

/// Component names are free-form; an unknown name yields an empty list.
pub async fn photos_for_component(
    db: &PgPool,
    component_name: &str,
) -> Result<Vec<ComponentPhotoView>, AppError> {
    Ok(repo::list_by_component(db, component_name).await?)
}

pub async fn components_for_photo(
    db: &PgPool,
    photo_id: i64,
) -> Result<Vec<ComponentPhotoView>, AppError> {
    Ok(repo::list_by_photo(db, photo_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::repo_types::ComponentPhotoProps;

    #[test]
    fn component_name_bounds() {
        assert!(validate_component_name("hero-carousel").is_ok());
        assert!(validate_component_name("").is_err());
        assert!(validate_component_name(&"c".repeat(MAX_COMPONENT_NAME_LEN)).is_ok());
        assert!(validate_component_name(&"c".repeat(MAX_COMPONENT_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn assign_request_defaults_order_and_props() {
        let req: AssignPhotoRequest =
            serde_json::from_str(r#"{"componentName":"hero","photoId":5}"#).unwrap();
        assert_eq!(req.order, 0);
        assert_eq!(req.props, ComponentPhotoProps::default());
    }
}
