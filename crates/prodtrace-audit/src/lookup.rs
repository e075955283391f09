use std::collections::{BTreeMap, HashMap};

use prodtrace_model::Recipe;

/// Read access to recipe reference data by recipe code.
pub trait RecipeLookup {
    fn recipe(&self, code: &str) -> Option<&Recipe>;
}

impl RecipeLookup for [Recipe] {
    fn recipe(&self, code: &str) -> Option<&Recipe> {
        let code = code.trim();
        self.iter().find(|recipe| recipe.code.trim() == code)
    }
}

impl RecipeLookup for Vec<Recipe> {
    fn recipe(&self, code: &str) -> Option<&Recipe> {
        self.as_slice().recipe(code)
    }
}

impl RecipeLookup for HashMap<String, Recipe> {
    fn recipe(&self, code: &str) -> Option<&Recipe> {
        self.get(code.trim())
    }
}

impl RecipeLookup for BTreeMap<String, Recipe> {
    fn recipe(&self, code: &str) -> Option<&Recipe> {
        self.get(code.trim())
    }
}
