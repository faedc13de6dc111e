//! Category registry: the nine fixed collage slots.
//!
//! Registry order is the collage order: index `i` lands in row `i / 3`,
//! column `i % 3`.

use serde::Serialize;

/// Number of slots in the collage grid.
pub const CATEGORY_COUNT: usize = 9;

/// One named slot of the collage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: usize,
    pub name: &'static str,
    pub description: &'static str,
}

pub static CATEGORIES: [Category; CATEGORY_COUNT] = [
    Category { id: 0, name: "Animal", description: "Your favorite animal" },
    Category { id: 1, name: "Place", description: "A special place" },
    Category { id: 2, name: "Plant", description: "A beautiful plant" },
    Category { id: 3, name: "Character", description: "Your favorite character" },
    Category { id: 4, name: "Season", description: "Your favorite season" },
    Category { id: 5, name: "Hobby", description: "What you love doing" },
    Category { id: 6, name: "Color", description: "Your favorite color" },
    Category { id: 7, name: "Drink", description: "Your favorite drink" },
    Category { id: 8, name: "Food", description: "Your favorite food" },
];

/// Look up a category by name. Matching ignores ASCII case so route paths
/// like `/slots/animal` resolve.
#[must_use]
pub fn find(name: &str) -> Option<&'static Category> {
    CATEGORIES
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
}
