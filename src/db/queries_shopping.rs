use crate::models::{
    FoodItem, Ingredient, ListStatus, Recipe, ShoppingItem, ShoppingItemDraft, ShoppingList,
    SourceType,
};
use sqlx::PgPool;

const ITEM_COLUMNS: &str = "id, list_id, name, quantity, unit, category, source_type, purchased";

/// Recipes by id, with their ingredients attached
pub async fn list_recipes_with_ingredients(
    pool: &PgPool,
    recipe_ids: &[i64],
) -> Result<Vec<Recipe>, sqlx::Error> {
    let mut recipes = sqlx::query_as::<_, Recipe>(
        r#"
        SELECT id, title, servings, trip_id, owner_id, parent_id
        FROM recipes
        WHERE id = ANY($1)
        ORDER BY id
        "#,
    )
    .bind(recipe_ids)
    .fetch_all(pool)
    .await?;

    let ingredients = sqlx::query_as::<_, Ingredient>(
        r#"
        SELECT id, recipe_id, name, quantity, unit, category, food_item_id
        FROM ingredients
        WHERE recipe_id = ANY($1)
        ORDER BY recipe_id, position, id
        "#,
    )
    .bind(recipe_ids)
    .fetch_all(pool)
    .await?;

    for ingredient in ingredients {
        if let Some(recipe) = recipes.iter_mut().find(|r| r.id == ingredient.recipe_id) {
            recipe.ingredients.push(ingredient);
        }
    }

    Ok(recipes)
}

pub async fn list_food_items(pool: &PgPool, ids: &[i64]) -> Result<Vec<FoodItem>, sqlx::Error> {
    sqlx::query_as::<_, FoodItem>(
        r#"
        SELECT id, name, standard_unit, unit_type, category
        FROM food_items
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await
}

/// Current (draft/active) list of a trip, creating a draft when missing.
///
/// A partial unique index on (trip_id) for current lists makes concurrent
/// creation collapse onto one row.
pub async fn get_or_create_current_list(
    pool: &PgPool,
    trip_id: i64,
) -> Result<ShoppingList, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO shopping_lists (trip_id, status)
        VALUES ($1, 'draft')
        ON CONFLICT (trip_id) WHERE status IN ('draft', 'active') DO NOTHING
        "#,
    )
    .bind(trip_id)
    .execute(pool)
    .await?;

    sqlx::query_as::<_, ShoppingList>(
        r#"
        SELECT id, trip_id, status, people_count
        FROM shopping_lists
        WHERE trip_id = $1 AND status IN ('draft', 'active')
        ORDER BY id
        LIMIT 1
        "#,
    )
    .bind(trip_id)
    .fetch_one(pool)
    .await
}

/// Swap the recipe-sourced items of a list and move it to active, in one transaction
pub async fn replace_recipe_items(
    pool: &PgPool,
    list_id: i64,
    people_count: Option<i32>,
    items: &[ShoppingItemDraft],
) -> Result<Vec<ShoppingItem>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE shopping_lists SET status = $2, people_count = $3 WHERE id = $1")
        .bind(list_id)
        .bind(ListStatus::Active.as_str())
        .bind(people_count)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM shopping_items WHERE list_id = $1 AND source_type = $2")
        .bind(list_id)
        .bind(SourceType::Recipe.as_str())
        .execute(&mut *tx)
        .await?;

    let mut inserted = Vec::with_capacity(items.len());
    // bind parameters are capped at 65535 per statement
    for chunk in items.chunks(1000) {
        let mut query_builder = sqlx::QueryBuilder::new(
            "INSERT INTO shopping_items (list_id, name, quantity, unit, category, source_type) ",
        );
        query_builder.push_values(chunk, |mut b, item| {
            b.push_bind(list_id)
                .push_bind(&item.name)
                .push_bind(item.quantity.clone())
                .push_bind(&item.unit)
                .push_bind(&item.category)
                .push_bind(item.source_type.as_str());
        });
        query_builder.push(" RETURNING ");
        query_builder.push(ITEM_COLUMNS);

        let rows = query_builder
            .build_query_as::<ShoppingItem>()
            .fetch_all(&mut *tx)
            .await?;
        inserted.extend(rows);
    }

    tx.commit().await?;
    Ok(inserted)
}

pub async fn list_items(pool: &PgPool, list_id: i64) -> Result<Vec<ShoppingItem>, sqlx::Error> {
    sqlx::query_as::<_, ShoppingItem>(&format!(
        "SELECT {} FROM shopping_items WHERE list_id = $1 ORDER BY category, id",
        ITEM_COLUMNS
    ))
    .bind(list_id)
    .fetch_all(pool)
    .await
}

pub async fn insert_item(
    pool: &PgPool,
    list_id: i64,
    item: &ShoppingItemDraft,
) -> Result<ShoppingItem, sqlx::Error> {
    sqlx::query_as::<_, ShoppingItem>(&format!(
        r#"
        INSERT INTO shopping_items (list_id, name, quantity, unit, category, source_type)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {}
        "#,
        ITEM_COLUMNS
    ))
    .bind(list_id)
    .bind(&item.name)
    .bind(&item.quantity)
    .bind(&item.unit)
    .bind(&item.category)
    .bind(item.source_type.as_str())
    .fetch_one(pool)
    .await
}

pub async fn set_purchased(
    pool: &PgPool,
    item_id: i64,
    purchased: bool,
) -> Result<Option<ShoppingItem>, sqlx::Error> {
    sqlx::query_as::<_, ShoppingItem>(&format!(
        "UPDATE shopping_items SET purchased = $2 WHERE id = $1 RETURNING {}",
        ITEM_COLUMNS
    ))
    .bind(item_id)
    .bind(purchased)
    .fetch_optional(pool)
    .await
}
