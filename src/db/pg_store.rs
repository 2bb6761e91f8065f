use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::repository::{ExpenseRepository, RecipeRepository};
use crate::db::{queries, queries_shopping};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Expense, ExpenseId, ExpenseParticipant, FoodItem, FoodItemId, Member, NewExpense,
    ParticipantShare, Recipe, RecipeId, ShoppingItem, ShoppingItemDraft, ShoppingItemId,
    ShoppingList, Trip, TripId,
};

/// Postgres-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExpenseRepository for PgStore {
    async fn find_trip(&self, trip_id: TripId) -> LedgerResult<Option<Trip>> {
        Ok(queries::get_trip(&self.pool, trip_id).await?)
    }

    async fn list_members(&self, trip_id: TripId) -> LedgerResult<Vec<Member>> {
        Ok(queries::list_members(&self.pool, trip_id).await?)
    }

    async fn find_expense(&self, expense_id: ExpenseId) -> LedgerResult<Option<Expense>> {
        Ok(queries::get_expense(&self.pool, expense_id).await?)
    }

    async fn list_expenses(&self, trip_id: TripId) -> LedgerResult<Vec<Expense>> {
        Ok(queries::list_expenses(&self.pool, trip_id).await?)
    }

    async fn list_trip_participants(&self, trip_id: TripId) -> LedgerResult<Vec<ExpenseParticipant>> {
        Ok(queries::list_trip_participants(&self.pool, trip_id).await?)
    }

    async fn list_participants(&self, expense_id: ExpenseId) -> LedgerResult<Vec<ExpenseParticipant>> {
        Ok(queries::list_participants(&self.pool, expense_id).await?)
    }

    async fn insert_expense(
        &self,
        trip_id: TripId,
        expense: &NewExpense,
        currency: &str,
    ) -> LedgerResult<Expense> {
        Ok(queries::insert_expense(&self.pool, trip_id, expense, currency).await?)
    }

    async fn replace_participants(
        &self,
        expense_id: ExpenseId,
        expected_version: i64,
        shares: &[ParticipantShare],
    ) -> LedgerResult<Expense> {
        queries::replace_participants(&self.pool, expense_id, expected_version, shares)
            .await?
            .ok_or(LedgerError::ConcurrencyConflict { expense_id })
    }
}

#[async_trait]
impl RecipeRepository for PgStore {
    async fn find_trip(&self, trip_id: TripId) -> LedgerResult<Option<Trip>> {
        Ok(queries::get_trip(&self.pool, trip_id).await?)
    }

    async fn find_recipes(&self, recipe_ids: &[RecipeId]) -> LedgerResult<Vec<Recipe>> {
        Ok(queries_shopping::list_recipes_with_ingredients(&self.pool, recipe_ids).await?)
    }

    async fn find_food_items(&self, food_item_ids: &[FoodItemId]) -> LedgerResult<Vec<FoodItem>> {
        Ok(queries_shopping::list_food_items(&self.pool, food_item_ids).await?)
    }

    async fn current_list(&self, trip_id: TripId) -> LedgerResult<ShoppingList> {
        Ok(queries_shopping::get_or_create_current_list(&self.pool, trip_id).await?)
    }

    async fn replace_recipe_items(
        &self,
        list_id: i64,
        people_count: Option<i32>,
        items: &[ShoppingItemDraft],
    ) -> LedgerResult<Vec<ShoppingItem>> {
        Ok(queries_shopping::replace_recipe_items(&self.pool, list_id, people_count, items).await?)
    }

    async fn list_items(&self, list_id: i64) -> LedgerResult<Vec<ShoppingItem>> {
        Ok(queries_shopping::list_items(&self.pool, list_id).await?)
    }

    async fn insert_item(&self, list_id: i64, item: &ShoppingItemDraft) -> LedgerResult<ShoppingItem> {
        Ok(queries_shopping::insert_item(&self.pool, list_id, item).await?)
    }

    async fn set_purchased(
        &self,
        item_id: ShoppingItemId,
        purchased: bool,
    ) -> LedgerResult<Option<ShoppingItem>> {
        Ok(queries_shopping::set_purchased(&self.pool, item_id, purchased).await?)
    }
}
