use sqlx::{types::Json, PgPool};

use crate::components::repo_types::{
    ComponentPhoto, ComponentPhotoProps, ComponentPhotoRow, ComponentPhotoView,
    NewComponentPhoto, COMPONENT_PHOTO_COLUMNS, JOINED_SELECT,
};
use crate::db::StoreError;

pub async fn exists(db: &PgPool, component_name: &str, photo_id: i64) -> Result<bool, StoreError> {
    let found: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM component_photos WHERE component_name = $1 AND photo_id = $2)",
    )
    .bind(component_name)
    .bind(photo_id)
    .fetch_one(db)
    .await?;
    Ok(found)
}

/// A second assignment of the same pair surfaces as [`StoreError::Duplicate`].
pub async fn insert(db: &PgPool, n: &NewComponentPhoto) -> Result<ComponentPhoto, StoreError> {
    let cp = sqlx::query_as::<_, ComponentPhoto>(&format!(
        r#"
        INSERT INTO component_photos (component_name, photo_id, sort_order, props)
        VALUES ($1, $2, $3, $4)
        RETURNING {COMPONENT_PHOTO_COLUMNS}
        "#
    ))
    .bind(&n.component_name)
    .bind(n.photo_id)
    .bind(n.sort_order)
    .bind(Json(&n.props))
    .fetch_one(db)
    .await?;
    Ok(cp)
}

/// `None` leaves the column as it is.
pub async fn update(
    db: &PgPool,
    id: i64,
    sort_order: Option<i32>,
    props: Option<&ComponentPhotoProps>,
) -> Result<ComponentPhoto, StoreError> {
    let cp = sqlx::query_as::<_, ComponentPhoto>(&format!(
        r#"
        UPDATE component_photos
           SET sort_order = COALESCE($2, sort_order),
               props      = COALESCE($3, props),
               updated_at = now()
         WHERE id = $1
        RETURNING {COMPONENT_PHOTO_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(sort_order)
    .bind(props.map(Json))
    .fetch_optional(db)
    .await?;
    cp.ok_or(StoreError::NotFound)
}

pub async fn delete(db: &PgPool, id: i64) -> Result<(), StoreError> {
    let res = sqlx::query("DELETE FROM component_photos WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    if res.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

pub async fn list_by_component(
    db: &PgPool,
    component_name: &str,
) -> Result<Vec<ComponentPhotoView>, StoreError> {
    let rows = sqlx::query_as::<_, ComponentPhotoRow>(&format!(
        "{JOINED_SELECT} WHERE cp.component_name = $1 ORDER BY cp.sort_order ASC, cp.id ASC"
    ))
    .bind(component_name)
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn list_by_photo(db: &PgPool, photo_id: i64) -> Result<Vec<ComponentPhotoView>, StoreError> {
    let rows = sqlx::query_as::<_, ComponentPhotoRow>(&format!(
        "{JOINED_SELECT} WHERE cp.photo_id = $1 ORDER BY cp.component_name ASC, cp.sort_order ASC"
    ))
    .bind(photo_id)
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{dto::AssignPhotoRequest, services};
    use crate::photos::{repo as photo_repo, repo_types::NewPhoto};
    use axum::http::StatusCode;

    async fn photo(db: &PgPool, title: &str) -> i64 {
        photo_repo::create(
            db,
            &NewPhoto {
                title: title.into(),
                description: String::new(),
                image_url: format!("https://img.test/{}.jpg", title),
                thumbnail_url: String::new(),
                category: String::new(),
                location: String::new(),
                is_featured: false,
                display_order: 0,
            },
        )
        .await
        .unwrap()
        .id
    }

    fn assignment(name: &str, photo_id: i64, sort_order: i32) -> NewComponentPhoto {
        NewComponentPhoto {
            component_name: name.into(),
            photo_id,
            sort_order,
            props: ComponentPhotoProps {
                caption: Some(format!("caption {}", sort_order)),
                ..Default::default()
            },
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn same_pair_twice_is_a_duplicate(db: PgPool) {
        let p = photo(&db, "a").await;
        insert(&db, &assignment("hero", p, 0)).await.unwrap();
        assert!(exists(&db, "hero", p).await.unwrap());

        let err = insert(&db, &assignment("hero", p, 1)).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate));

        let err = services::assign_photo(
            &db,
            AssignPhotoRequest {
                component_name: "hero".into(),
                photo_id: p,
                order: 0,
                props: Default::default(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn assigning_unknown_photo_is_not_found(db: PgPool) {
        let err = services::assign_photo(
            &db,
            AssignPhotoRequest {
                component_name: "hero".into(),
                photo_id: 4242,
                order: 0,
                props: Default::default(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn component_listing_is_ordered_and_embeds_photo(db: PgPool) {
        let a = photo(&db, "a").await;
        let b = photo(&db, "b").await;
        insert(&db, &assignment("gallery", a, 2)).await.unwrap();
        insert(&db, &assignment("gallery", b, 1)).await.unwrap();
        insert(&db, &assignment("other", a, 0)).await.unwrap();

        let items = list_by_component(&db, "gallery").await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].photo_id, b);
        assert_eq!(items[1].photo_id, a);
        assert_eq!(items[0].photo.as_ref().unwrap().title, "b");
        assert_eq!(items[0].props.caption.as_deref(), Some("caption 1"));

        assert_eq!(list_by_photo(&db, a).await.unwrap().len(), 2);
        assert!(list_by_component(&db, "nobody").await.unwrap().is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn update_keeps_unset_columns_and_delete_reports_missing(db: PgPool) {
        let p = photo(&db, "a").await;
        let cp = insert(&db, &assignment("hero", p, 3)).await.unwrap();

        let updated = update(&db, cp.id, Some(7), None).await.unwrap();
        assert_eq!(updated.sort_order, 7);
        assert_eq!(updated.props.0.caption.as_deref(), Some("caption 3"));

        assert!(matches!(
            update(&db, cp.id + 1000, Some(1), None).await,
            Err(StoreError::NotFound)
        ));

        delete(&db, cp.id).await.unwrap();
        assert!(matches!(delete(&db, cp.id).await, Err(StoreError::NotFound)));
    }
}
