use anyhow::Context;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::StoreError;
use crate::photos::repo_types::{
    DisplayOrderUpdate, NewPhoto, Photo, PhotoFilters, PHOTO_COLUMNS,
};

pub async fn create(db: &PgPool, p: &NewPhoto) -> Result<Photo, StoreError> {
    let photo = sqlx::query_as::<_, Photo>(&format!(
        r#"
        INSERT INTO photos (title, description, image_url, thumbnail_url, category,
                            location, is_featured, display_order, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'draft')
        RETURNING {PHOTO_COLUMNS}
        "#
    ))
    .bind(&p.title)
    .bind(&p.description)
    .bind(&p.image_url)
    .bind(&p.thumbnail_url)
    .bind(&p.category)
    .bind(&p.location)
    .bind(p.is_featured)
    .bind(p.display_order)
    .fetch_one(db)
    .await?;
    Ok(photo)
}

pub async fn get(db: &PgPool, id: i64) -> Result<Option<Photo>, StoreError> {
    let photo = sqlx::query_as::<_, Photo>(&format!(
        "SELECT {PHOTO_COLUMNS} FROM photos WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(photo)
}

fn push_filters(q: &mut QueryBuilder<'_, Postgres>, f: &PhotoFilters) {
    let mut sep = " WHERE ";
    if let Some(status) = f.status {
        q.push(sep).push("status = ").push_bind(status.as_str());
        sep = " AND ";
    }
    if let Some(category) = &f.category {
        q.push(sep).push("category = ").push_bind(category.clone());
        sep = " AND ";
    }
    if let Some(featured) = f.is_featured {
        q.push(sep).push("is_featured = ").push_bind(featured);
    }
}

/// Returns the requested page and the size of the whole filtered set.
pub async fn list(db: &PgPool, f: &PhotoFilters) -> Result<(Vec<Photo>, i64), StoreError> {
    let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM photos");
    push_filters(&mut count, f);
    let (total,): (i64,) = count
        .build_query_as()
        .fetch_one(db)
        .await
        .context("count photos")?;

    let mut q = QueryBuilder::<Postgres>::new(format!("SELECT {PHOTO_COLUMNS} FROM photos"));
    push_filters(&mut q, f);
    q.push(" ORDER BY ").push(f.order_by.to_sql());
    if let Some(limit) = f.limit {
        q.push(" LIMIT ").push_bind(limit);
    }
    if let Some(offset) = f.offset {
        q.push(" OFFSET ").push_bind(offset);
    }
    let rows = q
        .build_query_as::<Photo>()
        .fetch_all(db)
        .await
        .context("list photos")?;

    Ok((rows, total))
}

/// Writes every mutable column of `p`.
pub async fn update(db: &PgPool, p: &Photo) -> Result<Photo, StoreError> {
    let photo = sqlx::query_as::<_, Photo>(&format!(
        r#"
        UPDATE photos
           SET title = $2, description = $3, image_url = $4, thumbnail_url = $5,
               category = $6, location = $7, is_featured = $8, display_order = $9,
               status = $10, updated_at = now()
         WHERE id = $1
        RETURNING {PHOTO_COLUMNS}
        "#
    ))
    .bind(p.id)
    .bind(&p.title)
    .bind(&p.description)
    .bind(&p.image_url)
    .bind(&p.thumbnail_url)
    .bind(&p.category)
    .bind(&p.location)
    .bind(p.is_featured)
    .bind(p.display_order)
    .bind(p.status.as_str())
    .fetch_one(db)
    .await?;
    Ok(photo)
}

/// Deletes the photo together with its component assignments.
pub async fn delete(db: &PgPool, id: i64) -> Result<(), StoreError> {
    let mut tx = db.begin().await.context("begin tx")?;

    sqlx::query("DELETE FROM component_photos WHERE photo_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let res = sqlx::query("DELETE FROM photos WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if res.rows_affected() == 0 {
        // dropping tx rolls back
        return Err(StoreError::NotFound);
    }

    tx.commit().await.context("commit tx")?;
    Ok(())
}

/// All-or-nothing: an unknown id aborts the whole batch.
pub async fn batch_update_display_order(
    db: &PgPool,
    orders: &[DisplayOrderUpdate],
) -> Result<(), StoreError> {
    let mut tx = db.begin().await.context("begin tx")?;
    for o in orders {
        let res = sqlx::query(
            "UPDATE photos SET display_order = $2, updated_at = now() WHERE id = $1",
        )
        .bind(o.id)
        .bind(o.display_order)
        .execute(&mut *tx)
        .await?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
    }
    tx.commit().await.context("commit tx")?;
    Ok(())
}
