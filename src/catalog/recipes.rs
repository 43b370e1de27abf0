use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A dish and the ingredients it needs.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Recipe {
    pub ingredients: Vec<String>,
    pub suggestion: String,
}

impl Recipe {
    pub fn new<I, S>(ingredients: I, suggestion: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Recipe {
            ingredients: ingredients.into_iter().map(Into::into).collect(),
            suggestion: suggestion.to_string(),
        }
    }

    /// True when every ingredient is among `available`, ignoring case.
    pub fn can_be_made_from<S: AsRef<str>>(&self, available: &[S]) -> bool {
        self.ingredients.iter().all(|ingredient| {
            available
                .iter()
                .any(|label| label.as_ref().eq_ignore_ascii_case(ingredient))
        })
    }
}

/// A caller supplied table mapping ingredient sets to suggestions.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
}

impl RecipeBook {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        RecipeBook { recipes }
    }

    /// A small table used when no recipe file is given.
    pub fn demo() -> Self {
        RecipeBook::new(vec![
            Recipe::new(["Apple"], "Apple Salad"),
            Recipe::new(["Carrot"], "Carrot Soup"),
            Recipe::new(["Milk"], "Cereal with Milk"),
        ])
    }

    /// Loads a JSON array of `{"ingredients": [...], "suggestion": "..."}` objects.
    pub fn from_json_file(filepath: &Path) -> Result<Self, ScanError> {
        let contents = fs::read_to_string(filepath).map_err(|source| ScanError::Io {
            path: filepath.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ScanError::Json {
            path: filepath.to_path_buf(),
            source,
        })
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Suggestions whose ingredients are all present in `labels`, in table order.
    pub fn suggest<S: AsRef<str>>(&self, labels: &[S]) -> Vec<&str> {
        self.recipes
            .iter()
            .filter(|recipe| recipe.can_be_made_from(labels))
            .map(|recipe| recipe.suggestion.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn suggests_recipes_whose_ingredients_are_present() {
        let book = RecipeBook::demo();
        assert_eq!(book.suggest(&["Milk", "Apple"]), vec!["Apple Salad", "Cereal with Milk"]);
    }

    #[test]
    fn needs_every_ingredient() {
        let book = RecipeBook::new(vec![Recipe::new(["Carrot", "Onion"], "Carrot Soup")]);
        assert!(book.suggest(&["Carrot"]).is_empty());
        assert_eq!(book.suggest(&["onion", "CARROT"]), vec!["Carrot Soup"]);
    }

    #[test]
    fn nothing_detected_means_nothing_suggested() {
        let labels: Vec<String> = Vec::new();
        assert!(RecipeBook::demo().suggest(&labels).is_empty());
    }

    #[test]
    fn example_table_extends_the_demo() {
        let book: RecipeBook =
            serde_json::from_str(include_str!("../../recipes.example.json")).unwrap();
        assert_eq!(&book.recipes()[..3], RecipeBook::demo().recipes());
        assert_eq!(
            book.suggest(&["Egg", "Milk"]),
            vec!["Cereal with Milk", "Pancakes"]
        );
    }

    #[test]
    fn loads_table_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"ingredients": ["Egg", "Milk"], "suggestion": "Pancakes"}}]"#
        )
        .unwrap();
        let book = RecipeBook::from_json_file(file.path()).unwrap();
        assert_eq!(book.recipes().len(), 1);
        assert_eq!(book.suggest(&["Milk", "Egg", "Butter"]), vec!["Pancakes"]);
    }
}
