//! Turns a detection set into what the user sees: item names and recipe suggestions.

use crate::annotations::bounding_box::BoundingBox;
use crate::annotations::detection::DetectionSet;
use crate::catalog::class_names::ClassNames;
use crate::catalog::recipes::RecipeBook;
use itertools::Itertools;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FridgeItem {
    pub name: String,
    pub class_id: usize,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScanReport {
    pub image: PathBuf,
    pub items: Vec<FridgeItem>,
    pub recipes: Vec<String>,
}

impl ScanReport {
    pub fn new(
        image: &Path,
        detections: &DetectionSet,
        class_names: &ClassNames,
        recipe_book: &RecipeBook,
    ) -> Self {
        let items: Vec<FridgeItem> = detections
            .iter()
            .map(|detection| FridgeItem {
                name: class_names.resolve(detection.class_id()).into_owned(),
                class_id: detection.class_id(),
                confidence: detection.confidence(),
                bbox: *detection.bbox(),
            })
            .collect();
        let labels: Vec<&str> = items.iter().map(|item| item.name.as_str()).unique().collect();
        let recipes = recipe_book
            .suggest(&labels)
            .into_iter()
            .map(str::to_string)
            .collect();
        ScanReport {
            image: image.to_path_buf(),
            items,
            recipes,
        }
    }
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Items in {}:", self.image.display())?;
        if self.items.is_empty() {
            writeln!(f, "No items found in the fridge.")?;
        } else {
            for item in &self.items {
                writeln!(
                    f,
                    "- {} ({:.2}%) at {}",
                    item.name,
                    item.confidence * 100.0,
                    item.bbox
                )?;
            }
        }
        writeln!(f)?;
        writeln!(f, "Suggested recipes:")?;
        if self.recipes.is_empty() {
            writeln!(f, "No recipes found with the available ingredients.")?;
        } else {
            for recipe in &self.recipes {
                writeln!(f, "You can make: {}", recipe)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::detection::{Candidate, Detection};

    fn detections(class_ids: &[usize]) -> DetectionSet {
        DetectionSet::from(
            class_ids
                .iter()
                .map(|&class_id| {
                    Detection::from(Candidate::new(
                        class_id,
                        0.9,
                        BoundingBox::new(0.0, 0.0, 10.0, 10.0),
                    ))
                })
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn resolves_labels_and_suggests_recipes() {
        let names = ClassNames::new(vec!["Apple".into(), "Carrot".into(), "Milk".into()]);
        let report = ScanReport::new(
            Path::new("fridge.jpg"),
            &detections(&[2, 0, 0]),
            &names,
            &RecipeBook::demo(),
        );
        let item_names: Vec<&str> = report.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(item_names, vec!["Milk", "Apple", "Apple"]);
        assert_eq!(report.recipes, vec!["Apple Salad", "Cereal with Milk"]);
        let text = report.to_string();
        assert!(text.contains("- Milk (90.00%) at (0, 0, 10x10)"));
        assert!(text.contains("You can make: Apple Salad"));
    }

    #[test]
    fn empty_scan_reports_nothing_found() {
        let report = ScanReport::new(
            Path::new("fridge.jpg"),
            &DetectionSet::default(),
            &ClassNames::default(),
            &RecipeBook::demo(),
        );
        let text = report.to_string();
        assert!(text.contains("No items found in the fridge."));
        assert!(text.contains("No recipes found with the available ingredients."));
    }
}
