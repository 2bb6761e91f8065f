use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexMap;
use std::collections::HashMap;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{FoodItem, FoodItemId, Ingredient, Recipe, ShoppingItemDraft, SourceType};
use crate::service::units;

/// Merge key for shopping lines
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum LineKey {
    FoodItem(FoodItemId),
    Named { name: String, unit: String },
}

/// Build recipe shopping lines from the selected recipes.
///
/// Each recipe is scaled by `people_count / servings` (1 when no head count
/// is given) and every scaled quantity is rounded to one decimal. Ingredients
/// bound to a food item are converted to its standard unit and merged per
/// food item; the rest merge on (name, unit). Lines keep first-seen order.
pub fn aggregate(
    recipes: &[Recipe],
    people_count: Option<i32>,
    food_items: &HashMap<FoodItemId, FoodItem>,
) -> LedgerResult<Vec<ShoppingItemDraft>> {
    if let Some(people) = people_count {
        if people <= 0 {
            return Err(LedgerError::invalid(format!(
                "people count must be positive, got {}",
                people
            )));
        }
    }

    let mut lines: IndexMap<LineKey, ShoppingItemDraft> = IndexMap::new();

    for recipe in recipes {
        if recipe.servings <= 0 {
            return Err(LedgerError::invalid(format!(
                "recipe {} has non-positive servings ({})",
                recipe.id, recipe.servings
            )));
        }
        let scale = match people_count {
            Some(people) => BigDecimal::from(people) / BigDecimal::from(recipe.servings),
            None => BigDecimal::from(1),
        };

        for ingredient in &recipe.ingredients {
            if ingredient.quantity <= BigDecimal::zero() {
                tracing::warn!(
                    "Recipe {}: skipping ingredient {} with quantity {}",
                    recipe.id,
                    ingredient.name,
                    ingredient.quantity
                );
                continue;
            }

            let scaled = (&ingredient.quantity * &scale).round(1);
            let (key, line) = line_for(ingredient, scaled, food_items)?;

            match lines.get_mut(&key) {
                Some(existing) => existing.quantity += &line.quantity,
                None => {
                    lines.insert(key, line);
                }
            }
        }
    }

    Ok(lines
        .into_values()
        .map(|mut line| {
            line.quantity = line.quantity.round(1);
            line
        })
        .collect())
}

fn line_for(
    ingredient: &Ingredient,
    scaled: BigDecimal,
    food_items: &HashMap<FoodItemId, FoodItem>,
) -> LedgerResult<(LineKey, ShoppingItemDraft)> {
    if let Some(food_item_id) = ingredient.food_item_id {
        let food = food_items
            .get(&food_item_id)
            .ok_or_else(|| LedgerError::not_found("Food item", food_item_id))?;

        match units::unit_type(&ingredient.unit) {
            Some(family) if family != food.unit_type => {
                tracing::warn!(
                    "Ingredient {} is measured in {} ({}) but {} is tracked by {}, listing separately",
                    ingredient.name,
                    ingredient.unit,
                    family,
                    food.name,
                    food.unit_type
                );
            }
            _ => {
                let quantity = units::convert(&scaled, &ingredient.unit, &food.standard_unit);
                return Ok((
                    LineKey::FoodItem(food.id),
                    ShoppingItemDraft {
                        name: food.name.clone(),
                        quantity,
                        unit: food.standard_unit.clone(),
                        category: food.category.clone(),
                        source_type: SourceType::Recipe,
                    },
                ));
            }
        }
    }

    Ok((
        LineKey::Named {
            name: ingredient.name.clone(),
            unit: ingredient.unit.clone(),
        },
        ShoppingItemDraft {
            name: ingredient.name.clone(),
            quantity: scaled,
            unit: ingredient.unit.clone(),
            category: ingredient.category.clone(),
            source_type: SourceType::Recipe,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UnitType;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn food(id: FoodItemId, name: &str, unit: &str, unit_type: UnitType) -> FoodItem {
        FoodItem {
            id,
            name: name.to_string(),
            standard_unit: unit.to_string(),
            unit_type,
            category: "produce".to_string(),
        }
    }

    fn ingredient(name: &str, quantity: &str, unit: &str, food_item_id: Option<FoodItemId>) -> Ingredient {
        Ingredient {
            id: 0,
            recipe_id: 0,
            name: name.to_string(),
            quantity: dec(quantity),
            unit: unit.to_string(),
            category: "other".to_string(),
            food_item_id,
        }
    }

    fn recipe(id: i64, servings: i32, ingredients: Vec<Ingredient>) -> Recipe {
        Recipe {
            id,
            title: format!("recipe {}", id),
            servings,
            trip_id: None,
            owner_id: None,
            parent_id: None,
            ingredients,
        }
    }

    fn pantry(items: Vec<FoodItem>) -> HashMap<FoodItemId, FoodItem> {
        items.into_iter().map(|f| (f.id, f)).collect()
    }

    #[test]
    fn same_food_item_merges_across_recipes() {
        let foods = pantry(vec![food(1, "Onions", "g", UnitType::Weight)]);
        let recipes = vec![
            recipe(1, 4, vec![ingredient("onion", "200", "g", Some(1))]),
            recipe(2, 2, vec![ingredient("red onion", "150", "g", Some(1))]),
        ];

        let lines = aggregate(&recipes, None, &foods).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].name, "Onions");
        assert_eq!(lines[0].quantity, dec("350"));
        assert_eq!(lines[0].unit, "g");
        assert_eq!(lines[0].category, "produce");
        assert_eq!(lines[0].source_type, SourceType::Recipe);
    }

    #[test]
    fn converts_to_the_standard_unit_before_summing() {
        let foods = pantry(vec![
            food(1, "Flour", "g", UnitType::Weight),
            food(2, "Milk", "ml", UnitType::Volume),
        ]);
        let recipes = vec![
            recipe(1, 2, vec![ingredient("flour", "1.5", "kg", Some(1)), ingredient("milk", "0.5", "l", Some(2))]),
            recipe(2, 2, vec![ingredient("flour", "250", "g", Some(1)), ingredient("milk", "200", "ml", Some(2))]),
        ];

        let lines = aggregate(&recipes, None, &foods).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!((lines[0].name.as_str(), lines[0].quantity.clone()), ("Flour", dec("1750")));
        assert_eq!((lines[1].name.as_str(), lines[1].quantity.clone()), ("Milk", dec("700")));
    }

    #[test]
    fn scales_by_people_count_and_rounds_to_one_decimal() {
        let recipes = vec![recipe(1, 3, vec![ingredient("eggs", "2", "pieces", None)])];
        let lines = aggregate(&recipes, Some(4), &HashMap::new()).unwrap();
        // 2 * 4/3 = 2.666...
        assert_eq!(lines[0].quantity, dec("2.7"));
    }

    #[test]
    fn unbound_ingredients_group_by_name_and_unit() {
        let recipes = vec![
            recipe(1, 1, vec![ingredient("Salt", "1", "tsp", None), ingredient("Salt", "5", "g", None)]),
            recipe(2, 1, vec![ingredient("Salt", "2", "tsp", None)]),
        ];
        let lines = aggregate(&recipes, None, &HashMap::new()).unwrap();
        let summary: Vec<(String, BigDecimal, String)> = lines
            .into_iter()
            .map(|l| (l.name, l.quantity, l.unit))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Salt".to_string(), dec("3"), "tsp".to_string()),
                ("Salt".to_string(), dec("5"), "g".to_string()),
            ]
        );
    }

    #[test]
    fn incompatible_family_is_not_merged_into_the_food_line() {
        let foods = pantry(vec![food(1, "Butter", "g", UnitType::Weight)]);
        let recipes = vec![recipe(
            1,
            1,
            vec![ingredient("butter", "100", "g", Some(1)), ingredient("butter", "50", "ml", Some(1))],
        )];
        let lines = aggregate(&recipes, None, &foods).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!((lines[0].quantity.clone(), lines[0].unit.as_str()), (dec("100"), "g"));
        assert_eq!((lines[1].quantity.clone(), lines[1].unit.as_str()), (dec("50"), "ml"));
    }

    #[test]
    fn unknown_unit_on_a_food_item_passes_through() {
        let foods = pantry(vec![food(1, "Sugar", "g", UnitType::Weight)]);
        let recipes = vec![recipe(1, 1, vec![ingredient("sugar", "2", "tbsp", Some(1))])];
        let lines = aggregate(&recipes, None, &foods).unwrap();
        assert_eq!((lines[0].quantity.clone(), lines[0].unit.as_str()), (dec("2"), "g"));
    }

    #[test]
    fn missing_food_item_is_not_found() {
        let recipes = vec![recipe(1, 1, vec![ingredient("saffron", "1", "g", Some(9))])];
        assert!(matches!(
            aggregate(&recipes, None, &HashMap::new()),
            Err(LedgerError::NotFound { id: 9, .. })
        ));
    }

    #[test]
    fn rejects_non_positive_counts() {
        let recipes = vec![recipe(1, 0, vec![ingredient("rice", "1", "kg", None)])];
        assert!(matches!(aggregate(&recipes, None, &HashMap::new()), Err(LedgerError::InvalidInput(_))));

        let recipes = vec![recipe(1, 2, vec![ingredient("rice", "1", "kg", None)])];
        assert!(matches!(aggregate(&recipes, Some(0), &HashMap::new()), Err(LedgerError::InvalidInput(_))));
    }
}
