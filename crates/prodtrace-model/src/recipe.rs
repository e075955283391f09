use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::DepartmentCode;

/// The identity used to look up a supplier for an ingredient.
///
/// Keys are not globally unique: the same description can appear in several
/// departments with different suppliers, so lookups are scoped per department.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IngredientKey {
    ProdCode(String),
    Description(String),
}

impl IngredientKey {
    pub fn as_str(&self) -> &str {
        match self {
            Self::ProdCode(value) | Self::Description(value) => value,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::ProdCode(_) => "prod_code",
            Self::Description(_) => "description",
        }
    }
}

impl fmt::Display for IngredientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.kind(), self.as_str())
    }
}

/// One line of a recipe: an ingredient and how much of it one unit of yield uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub description: String,
    #[serde(default)]
    pub prod_code: String,
    /// Quantity used per unit of yield.
    pub recipe_use: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl RecipeIngredient {
    /// Lookup keys in resolution order: product code first, then description.
    pub fn keys(&self) -> Vec<IngredientKey> {
        let mut keys = Vec::with_capacity(2);
        let code = self.prod_code.trim();
        if !code.is_empty() {
            keys.push(IngredientKey::ProdCode(code.to_string()));
        }
        let description = self.description.trim();
        if !description.is_empty() {
            keys.push(IngredientKey::Description(description.to_string()));
        }
        keys
    }
}

/// A named production formula with an ordered ingredient list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub code: String,
    pub description: String,
    pub department: DepartmentCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yield_qty: Option<f64>,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
