use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

/// Closed set of transaction categories.
///
/// The declaration order is the display order used by grouped views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Food,
    #[serde(rename = "Monthly Bills")]
    MonthlyBills,
    Clothes,
    Transportation,
    Entertainment,
    Healthcare,
    Shopping,
    Salary,
    Freelance,
    Investment,
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 11] = [
        Category::Food,
        Category::MonthlyBills,
        Category::Clothes,
        Category::Transportation,
        Category::Entertainment,
        Category::Healthcare,
        Category::Shopping,
        Category::Salary,
        Category::Freelance,
        Category::Investment,
        Category::Other,
    ];

    /// Human-readable name, identical to the stored form.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::MonthlyBills => "Monthly Bills",
            Category::Clothes => "Clothes",
            Category::Transportation => "Transportation",
            Category::Entertainment => "Entertainment",
            Category::Healthcare => "Healthcare",
            Category::Shopping => "Shopping",
            Category::Salary => "Salary",
            Category::Freelance => "Freelance",
            Category::Investment => "Investment",
            Category::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses a category name case-insensitively.
/// Spaces, dashes and underscores are interchangeable ("monthly-bills" works).
impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        if wanted.is_empty() {
            return Err(CoreError::UnknownCategory(s.to_string()));
        }
        Category::ALL
            .iter()
            .copied()
            .find(|c| normalize(c.name()) == wanted)
            .ok_or_else(|| CoreError::UnknownCategory(s.to_string()))
    }
}

fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Category selector for filtered views: one category, or the `All` wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => *wanted == category,
        }
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("All"),
            CategoryFilter::Only(category) => category.fmt(f),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            s.parse().map(CategoryFilter::Only)
        }
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        CategoryFilter::Only(category)
    }
}
