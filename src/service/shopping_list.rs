use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexSet;
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::RecipeRepository;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    FoodItem, FoodItemId, Recipe, RecipeId, ShoppingItem, ShoppingItemDraft, ShoppingItemId,
    ShoppingList, SourceType, TripId,
};
use crate::service::{aggregator, export};

/// Shopping list generation from recipes, plus manual list upkeep
pub struct ShoppingListService {
    repo: Arc<dyn RecipeRepository>,
}

impl ShoppingListService {
    pub fn new(repo: Arc<dyn RecipeRepository>) -> Self {
        Self { repo }
    }

    async fn ensure_trip(&self, trip_id: TripId) -> LedgerResult<()> {
        match self.repo.find_trip(trip_id).await? {
            Some(_) => Ok(()),
            None => Err(LedgerError::not_found("Trip", trip_id)),
        }
    }

    /// Current list of an existing trip; unknown trips never get one
    async fn trip_list(&self, trip_id: TripId) -> LedgerResult<ShoppingList> {
        self.ensure_trip(trip_id).await?;
        self.repo.current_list(trip_id).await
    }

    /// The trip's current list (draft or active), created on first use
    pub async fn current_list(&self, trip_id: TripId) -> LedgerResult<ShoppingList> {
        self.trip_list(trip_id).await
    }

    /// Regenerate the recipe lines of the trip's current list.
    ///
    /// Manual lines are left alone. Returns the generated lines.
    pub async fn generate_shopping_list(
        &self,
        trip_id: TripId,
        recipe_ids: &[RecipeId],
        people_count: Option<i32>,
    ) -> LedgerResult<Vec<ShoppingItemDraft>> {
        let recipe_ids: IndexSet<RecipeId> = recipe_ids.iter().copied().collect();
        if recipe_ids.is_empty() {
            return Err(LedgerError::invalid("select at least one recipe"));
        }
        if matches!(people_count, Some(p) if p <= 0) {
            return Err(LedgerError::invalid("people count must be positive"));
        }

        self.ensure_trip(trip_id).await?;

        let recipes = self.load_recipes(&recipe_ids).await?;
        let food_items = self.load_food_items(&recipes).await?;
        let drafts = aggregator::aggregate(&recipes, people_count, &food_items)?;

        let list = self.repo.current_list(trip_id).await?;
        self.repo
            .replace_recipe_items(list.id, people_count, &drafts)
            .await?;

        tracing::info!(
            "Trip {}: shopping list {} generated from {} recipes, {} lines",
            trip_id,
            list.id,
            recipes.len(),
            drafts.len()
        );
        Ok(drafts)
    }

    /// Recipes in requested order; any unknown id fails the whole run
    async fn load_recipes(&self, recipe_ids: &IndexSet<RecipeId>) -> LedgerResult<Vec<Recipe>> {
        let ids: Vec<RecipeId> = recipe_ids.iter().copied().collect();
        let mut found: HashMap<RecipeId, Recipe> = self
            .repo
            .find_recipes(&ids)
            .await?
            .into_iter()
            .map(|r| (r.id, r))
            .collect();

        ids.iter()
            .map(|id| {
                found
                    .remove(id)
                    .ok_or_else(|| LedgerError::not_found("Recipe", *id))
            })
            .collect()
    }

    async fn load_food_items(
        &self,
        recipes: &[Recipe],
    ) -> LedgerResult<HashMap<FoodItemId, FoodItem>> {
        let ids: Vec<FoodItemId> = recipes
            .iter()
            .flat_map(|r| r.ingredients.iter().filter_map(|i| i.food_item_id))
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let food_items: HashMap<FoodItemId, FoodItem> = self
            .repo
            .find_food_items(&ids)
            .await?
            .into_iter()
            .map(|f| (f.id, f))
            .collect();
        if let Some(missing) = ids.iter().find(|id| !food_items.contains_key(id)) {
            return Err(LedgerError::not_found("Food item", *missing));
        }
        Ok(food_items)
    }

    pub async fn list_items(&self, trip_id: TripId) -> LedgerResult<(ShoppingList, Vec<ShoppingItem>)> {
        let list = self.trip_list(trip_id).await?;
        let items = self.repo.list_items(list.id).await?;
        Ok((list, items))
    }

    /// Add a hand-written line; survives later regenerations
    pub async fn add_manual_item(
        &self,
        trip_id: TripId,
        name: &str,
        quantity: BigDecimal,
        unit: &str,
        category: &str,
    ) -> LedgerResult<ShoppingItem> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::invalid("item name is required"));
        }
        if quantity <= BigDecimal::zero() {
            return Err(LedgerError::invalid(format!(
                "quantity must be positive, got {}",
                quantity
            )));
        }

        let list = self.trip_list(trip_id).await?;
        let draft = ShoppingItemDraft {
            name: name.to_string(),
            quantity: quantity.round(1),
            unit: unit.trim().to_string(),
            category: category.trim().to_string(),
            source_type: SourceType::Manual,
        };
        self.repo.insert_item(list.id, &draft).await
    }

    pub async fn set_purchased(&self, item_id: ShoppingItemId, purchased: bool) -> LedgerResult<ShoppingItem> {
        self.repo
            .set_purchased(item_id, purchased)
            .await?
            .ok_or_else(|| LedgerError::not_found("Shopping item", item_id))
    }

    /// Current list as CSV text
    pub async fn export_csv(&self, trip_id: TripId) -> LedgerResult<String> {
        let (_, items) = self.list_items(trip_id).await?;

        let mut out = Vec::new();
        export::write_items_csv(&items, &mut out).map_err(|e| LedgerError::Export(e.to_string()))?;
        String::from_utf8(out).map_err(|e| LedgerError::Export(e.to_string()))
    }
}
