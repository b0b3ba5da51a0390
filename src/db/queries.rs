use crate::models::FridgeItem;
use sqlx::{PgConnection, PgPool};

/// Distinct catalogued ingredient names, lower-cased with whitespace collapsed
pub async fn list_ingredient_names(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT DISTINCT lower(btrim(regexp_replace(name, '\s+', ' ', 'g'))) AS name
        FROM ingredient
        ORDER BY name
        "#
    )
    .fetch_all(pool)
    .await
}

/// Distinct fridge item names, lower-cased with whitespace collapsed
pub async fn list_fridge_names(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT DISTINCT lower(btrim(regexp_replace(name, '\s+', ' ', 'g'))) AS name
        FROM fridge_item
        ORDER BY name
        "#
    )
    .fetch_all(pool)
    .await
}

/// Locks the fridge item whose normalized name equals `name` for the rest of the transaction
pub async fn lock_fridge_item(
    conn: &mut PgConnection,
    name: &str,
) -> Result<Option<FridgeItem>, sqlx::Error> {
    sqlx::query_as::<_, FridgeItem>(
        r#"
        SELECT id, name, quantity, unit, updated_at
        FROM fridge_item
        WHERE lower(btrim(regexp_replace(name, '\s+', ' ', 'g'))) = $1
        ORDER BY id
        LIMIT 1
        FOR UPDATE
        "#
    )
    .bind(name)
    .fetch_optional(conn)
    .await
}

/// Adds to an item's quantity, returning the new total
pub async fn increment_quantity(
    conn: &mut PgConnection,
    item_id: i64,
    amount: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        UPDATE fridge_item
        SET quantity = quantity + $2,
            updated_at = now()
        WHERE id = $1
        RETURNING quantity
        "#
    )
    .bind(item_id)
    .bind(amount)
    .fetch_one(conn)
    .await
}

/// Inserts a new fridge item, returning its id
pub async fn insert_fridge_item(
    conn: &mut PgConnection,
    name: &str,
    quantity: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO fridge_item (name, quantity, unit, updated_at)
        VALUES ($1, $2, NULL, now())
        RETURNING id
        "#
    )
    .bind(name)
    .bind(quantity)
    .fetch_one(conn)
    .await
}
