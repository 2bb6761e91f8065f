use async_trait::async_trait;
use bigdecimal::BigDecimal;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::db::repository::{ExpenseRepository, RecipeRepository};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Expense, ExpenseId, ExpenseParticipant, FoodItem, FoodItemId, Ingredient, ListStatus, Member,
    MemberId, NewExpense, ParticipantShare, Recipe, RecipeId, Role, ShoppingItem,
    ShoppingItemDraft, ShoppingItemId, ShoppingList, SourceType, Trip, TripId, UnitType,
};

/// Ingredient input for seeding recipes
#[derive(Debug, Clone)]
pub struct NewIngredient {
    pub name: String,
    pub quantity: BigDecimal,
    pub unit: String,
    pub category: String,
    pub food_item_id: Option<FoodItemId>,
}

/// In-process store with the same atomicity guarantees as the Postgres one.
///
/// Participant sets and recipe items are swapped as whole vectors while the
/// owning row's map entry is held, so readers see either the old or the new
/// set, never a partial one.
#[derive(Default)]
pub struct MemoryStore {
    next_id: AtomicI64,
    trips: DashMap<TripId, Trip>,
    members: DashMap<TripId, Vec<Member>>,
    expenses: DashMap<ExpenseId, Expense>,
    participants: DashMap<ExpenseId, Vec<ExpenseParticipant>>,
    food_items: DashMap<FoodItemId, FoodItem>,
    recipes: DashMap<RecipeId, Recipe>,
    lists: DashMap<i64, ShoppingList>,
    current_lists: DashMap<TripId, i64>,
    items: DashMap<i64, Vec<ShoppingItem>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn insert_trip(&self, name: &str, currency: &str) -> Trip {
        let trip = Trip {
            id: self.next_id(),
            name: name.to_string(),
            currency: currency.to_string(),
        };
        self.trips.insert(trip.id, trip.clone());
        trip
    }

    /// Append a member to the trip's membership list
    pub fn add_member(&self, trip_id: TripId, name: &str, role: Role) -> Member {
        let mut members = self.members.entry(trip_id).or_default();
        let member = Member {
            trip_id,
            member_id: self.next_id(),
            name: name.to_string(),
            role,
            position: members.len() as i32,
        };
        members.push(member.clone());
        member
    }

    pub fn insert_food_item(
        &self,
        name: &str,
        standard_unit: &str,
        unit_type: UnitType,
        category: &str,
    ) -> FoodItem {
        let food = FoodItem {
            id: self.next_id(),
            name: name.to_string(),
            standard_unit: standard_unit.to_string(),
            unit_type,
            category: category.to_string(),
        };
        self.food_items.insert(food.id, food.clone());
        food
    }

    pub fn insert_recipe(
        &self,
        title: &str,
        servings: i32,
        trip_id: Option<TripId>,
        owner_id: Option<MemberId>,
        ingredients: Vec<NewIngredient>,
    ) -> Recipe {
        let id = self.next_id();
        let ingredients = ingredients
            .into_iter()
            .map(|i| Ingredient {
                id: self.next_id(),
                recipe_id: id,
                name: i.name,
                quantity: i.quantity,
                unit: i.unit,
                category: i.category,
                food_item_id: i.food_item_id,
            })
            .collect();
        let recipe = Recipe {
            id,
            title: title.to_string(),
            servings,
            trip_id,
            owner_id,
            parent_id: None,
            ingredients,
        };
        self.recipes.insert(id, recipe.clone());
        recipe
    }

    /// Copy a recipe, keeping lineage through `parent_id`
    pub fn copy_recipe(&self, recipe_id: RecipeId, trip_id: Option<TripId>) -> Option<Recipe> {
        let source = self.recipes.get(&recipe_id)?.clone();
        let id = self.next_id();
        let copy = Recipe {
            id,
            trip_id,
            parent_id: Some(source.id),
            ingredients: source
                .ingredients
                .iter()
                .map(|i| Ingredient {
                    id: self.next_id(),
                    recipe_id: id,
                    ..i.clone()
                })
                .collect(),
            ..source
        };
        self.recipes.insert(id, copy.clone());
        Some(copy)
    }

    fn create_list(&self, trip_id: TripId) -> i64 {
        let list = ShoppingList {
            id: self.next_id(),
            trip_id,
            status: ListStatus::Draft,
            people_count: None,
        };
        let id = list.id;
        self.lists.insert(id, list);
        id
    }
}

#[async_trait]
impl ExpenseRepository for MemoryStore {
    async fn find_trip(&self, trip_id: TripId) -> LedgerResult<Option<Trip>> {
        Ok(self.trips.get(&trip_id).map(|t| t.clone()))
    }

    async fn list_members(&self, trip_id: TripId) -> LedgerResult<Vec<Member>> {
        Ok(self
            .members
            .get(&trip_id)
            .map(|m| m.clone())
            .unwrap_or_default())
    }

    async fn find_expense(&self, expense_id: ExpenseId) -> LedgerResult<Option<Expense>> {
        Ok(self.expenses.get(&expense_id).map(|e| e.clone()))
    }

    async fn list_expenses(&self, trip_id: TripId) -> LedgerResult<Vec<Expense>> {
        let mut expenses: Vec<Expense> = self
            .expenses
            .iter()
            .filter(|e| e.trip_id == trip_id)
            .map(|e| e.clone())
            .collect();
        expenses.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        Ok(expenses)
    }

    async fn list_trip_participants(&self, trip_id: TripId) -> LedgerResult<Vec<ExpenseParticipant>> {
        let mut expense_ids: Vec<ExpenseId> = self
            .expenses
            .iter()
            .filter(|e| e.trip_id == trip_id)
            .map(|e| e.id)
            .collect();
        expense_ids.sort_unstable();

        Ok(expense_ids
            .into_iter()
            .filter_map(|id| self.participants.get(&id).map(|p| p.clone()))
            .flatten()
            .collect())
    }

    async fn list_participants(&self, expense_id: ExpenseId) -> LedgerResult<Vec<ExpenseParticipant>> {
        Ok(self
            .participants
            .get(&expense_id)
            .map(|p| p.clone())
            .unwrap_or_default())
    }

    async fn insert_expense(
        &self,
        trip_id: TripId,
        expense: &NewExpense,
        currency: &str,
    ) -> LedgerResult<Expense> {
        let stored = Expense {
            id: self.next_id(),
            trip_id,
            payer_id: expense.payer_id,
            amount: expense.amount.clone(),
            currency: currency.to_string(),
            category: expense.category,
            description: expense.description.clone(),
            date: expense.date,
            version: 0,
        };
        self.expenses.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn replace_participants(
        &self,
        expense_id: ExpenseId,
        expected_version: i64,
        shares: &[ParticipantShare],
    ) -> LedgerResult<Expense> {
        // the expense entry stays locked until the new set is in place
        let mut expense = self
            .expenses
            .get_mut(&expense_id)
            .ok_or_else(|| LedgerError::not_found("Expense", expense_id))?;
        if expense.version != expected_version {
            return Err(LedgerError::ConcurrencyConflict { expense_id });
        }

        let rows = shares
            .iter()
            .map(|share| ExpenseParticipant {
                expense_id,
                member_id: share.member_id,
                amount_owed: share.amount_owed.clone(),
            })
            .collect();
        self.participants.insert(expense_id, rows);
        expense.version += 1;

        Ok(expense.clone())
    }
}

#[async_trait]
impl RecipeRepository for MemoryStore {
    async fn find_trip(&self, trip_id: TripId) -> LedgerResult<Option<Trip>> {
        Ok(self.trips.get(&trip_id).map(|t| t.clone()))
    }

    async fn find_recipes(&self, recipe_ids: &[RecipeId]) -> LedgerResult<Vec<Recipe>> {
        Ok(recipe_ids
            .iter()
            .filter_map(|id| self.recipes.get(id).map(|r| r.clone()))
            .collect())
    }

    async fn find_food_items(&self, food_item_ids: &[FoodItemId]) -> LedgerResult<Vec<FoodItem>> {
        Ok(food_item_ids
            .iter()
            .filter_map(|id| self.food_items.get(id).map(|f| f.clone()))
            .collect())
    }

    async fn current_list(&self, trip_id: TripId) -> LedgerResult<ShoppingList> {
        let mut current = self
            .current_lists
            .entry(trip_id)
            .or_insert_with(|| self.create_list(trip_id));
        let still_current = self
            .lists
            .get(&*current)
            .map(|list| list.status.is_current())
            .unwrap_or(false);
        if !still_current {
            *current = self.create_list(trip_id);
        }

        let list_id = *current;
        self.lists
            .get(&list_id)
            .map(|list| list.clone())
            .ok_or_else(|| LedgerError::not_found("Shopping list", list_id))
    }

    async fn replace_recipe_items(
        &self,
        list_id: i64,
        people_count: Option<i32>,
        items: &[ShoppingItemDraft],
    ) -> LedgerResult<Vec<ShoppingItem>> {
        let mut list = self
            .lists
            .get_mut(&list_id)
            .ok_or_else(|| LedgerError::not_found("Shopping list", list_id))?;

        let inserted: Vec<ShoppingItem> = items
            .iter()
            .map(|draft| ShoppingItem {
                id: self.next_id(),
                list_id,
                name: draft.name.clone(),
                quantity: draft.quantity.clone(),
                unit: draft.unit.clone(),
                category: draft.category.clone(),
                source_type: draft.source_type,
                purchased: false,
            })
            .collect();

        let mut stored = self.items.entry(list_id).or_default();
        stored.retain(|item| item.source_type != SourceType::Recipe);
        stored.extend(inserted.iter().cloned());

        list.status = ListStatus::Active;
        list.people_count = people_count;

        Ok(inserted)
    }

    async fn list_items(&self, list_id: i64) -> LedgerResult<Vec<ShoppingItem>> {
        let mut items = self
            .items
            .get(&list_id)
            .map(|i| i.clone())
            .unwrap_or_default();
        items.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn insert_item(&self, list_id: i64, item: &ShoppingItemDraft) -> LedgerResult<ShoppingItem> {
        if !self.lists.contains_key(&list_id) {
            return Err(LedgerError::not_found("Shopping list", list_id));
        }
        let stored = ShoppingItem {
            id: self.next_id(),
            list_id,
            name: item.name.clone(),
            quantity: item.quantity.clone(),
            unit: item.unit.clone(),
            category: item.category.clone(),
            source_type: item.source_type,
            purchased: false,
        };
        self.items.entry(list_id).or_default().push(stored.clone());
        Ok(stored)
    }

    async fn set_purchased(
        &self,
        item_id: ShoppingItemId,
        purchased: bool,
    ) -> LedgerResult<Option<ShoppingItem>> {
        for mut entry in self.items.iter_mut() {
            if let Some(item) = entry.value_mut().iter_mut().find(|i| i.id == item_id) {
                item.purchased = purchased;
                return Ok(Some(item.clone()));
            }
        }
        Ok(None)
    }
}
