use async_trait::async_trait;

use crate::error::LedgerResult;
use crate::models::{
    Expense, ExpenseId, ExpenseParticipant, FoodItem, FoodItemId, Member, NewExpense,
    ParticipantShare, Recipe, RecipeId, ShoppingItem, ShoppingItemDraft, ShoppingItemId,
    ShoppingList, Trip, TripId,
};

/// Read/write access to trips, expenses and their participants
#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    async fn find_trip(&self, trip_id: TripId) -> LedgerResult<Option<Trip>>;

    /// Trip members in membership order
    async fn list_members(&self, trip_id: TripId) -> LedgerResult<Vec<Member>>;

    async fn find_expense(&self, expense_id: ExpenseId) -> LedgerResult<Option<Expense>>;

    async fn list_expenses(&self, trip_id: TripId) -> LedgerResult<Vec<Expense>>;

    /// Participant rows of every expense of the trip
    async fn list_trip_participants(&self, trip_id: TripId) -> LedgerResult<Vec<ExpenseParticipant>>;

    /// Participant rows of one expense, in split order
    async fn list_participants(&self, expense_id: ExpenseId) -> LedgerResult<Vec<ExpenseParticipant>>;

    async fn insert_expense(
        &self,
        trip_id: TripId,
        expense: &NewExpense,
        currency: &str,
    ) -> LedgerResult<Expense>;

    /// Atomically swap the participant set of an expense.
    ///
    /// Succeeds only while the stored version equals `expected_version`;
    /// otherwise returns `ConcurrencyConflict` and leaves the old set in place.
    /// Returns the expense with its bumped version.
    async fn replace_participants(
        &self,
        expense_id: ExpenseId,
        expected_version: i64,
        shares: &[ParticipantShare],
    ) -> LedgerResult<Expense>;
}

/// Recipes, food items and the trip shopping list
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Trip owning the shopping list
    async fn find_trip(&self, trip_id: TripId) -> LedgerResult<Option<Trip>>;

    /// Recipes with their ingredients; unknown ids are simply absent
    async fn find_recipes(&self, recipe_ids: &[RecipeId]) -> LedgerResult<Vec<Recipe>>;

    async fn find_food_items(&self, food_item_ids: &[FoodItemId]) -> LedgerResult<Vec<FoodItem>>;

    /// The trip's draft/active list, created as draft when there is none
    async fn current_list(&self, trip_id: TripId) -> LedgerResult<ShoppingList>;

    /// Replace all recipe-sourced items of a list and mark it active.
    /// Manual items are kept.
    async fn replace_recipe_items(
        &self,
        list_id: i64,
        people_count: Option<i32>,
        items: &[ShoppingItemDraft],
    ) -> LedgerResult<Vec<ShoppingItem>>;

    async fn list_items(&self, list_id: i64) -> LedgerResult<Vec<ShoppingItem>>;

    async fn insert_item(&self, list_id: i64, item: &ShoppingItemDraft) -> LedgerResult<ShoppingItem>;

    async fn set_purchased(
        &self,
        item_id: ShoppingItemId,
        purchased: bool,
    ) -> LedgerResult<Option<ShoppingItem>>;
}
