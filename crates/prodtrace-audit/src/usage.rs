//! Scaled ingredient quantities for a planned run.
//!
//! Quantities are derived on demand and never stored: the planned quantity
//! can change until the run is confirmed.

use serde::Serialize;

use prodtrace_model::Recipe;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientUsage {
    pub description: String,
    pub prod_code: String,
    pub recipe_use: f64,
    pub scaled_qty: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// `recipe_use * planned_qty` for every ingredient, in recipe order.
pub fn scaled_usage(recipe: &Recipe, planned_qty: f64) -> Vec<IngredientUsage> {
    recipe
        .ingredients
        .iter()
        .map(|ingredient| IngredientUsage {
            description: ingredient.description.clone(),
            prod_code: ingredient.prod_code.clone(),
            recipe_use: ingredient.recipe_use,
            scaled_qty: ingredient.recipe_use * planned_qty,
            unit: ingredient.unit.clone(),
        })
        .collect()
}
