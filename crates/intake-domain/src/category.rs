//! Request categories offered by the intake picker.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use strsim::levenshtein;

use crate::ParseValueError;

const FUZZY_MAX_DISTANCE: usize = 2;

/// Kind of request a member is opening a case for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Provider,
    Billing,
    Medication,
    Service,
    Benefits,
    Plan,
    Question,
}

/// Catalog row shown by the category picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryEntry {
    pub category: Category,
    pub label: &'static str,
    pub icon: &'static str,
}

const CATALOG: [CategoryEntry; 7] = [
    CategoryEntry {
        category: Category::Provider,
        label: "Find a Provider",
        icon: "stethoscope",
    },
    CategoryEntry {
        category: Category::Billing,
        label: "Billing & Claims",
        icon: "receipt",
    },
    CategoryEntry {
        category: Category::Medication,
        label: "Medications & Pharmacy",
        icon: "pill",
    },
    CategoryEntry {
        category: Category::Service,
        label: "Schedule a Service",
        icon: "calendar",
    },
    CategoryEntry {
        category: Category::Benefits,
        label: "Understand My Benefits",
        icon: "shield",
    },
    CategoryEntry {
        category: Category::Plan,
        label: "Plan Selection & Changes",
        icon: "clipboard",
    },
    CategoryEntry {
        category: Category::Question,
        label: "General Question",
        icon: "help-circle",
    },
];

impl Category {
    /// Ordered catalog backing the picker.
    pub fn catalog() -> &'static [CategoryEntry] {
        &CATALOG
    }

    pub fn id(self) -> &'static str {
        match self {
            Category::Provider => "provider",
            Category::Billing => "billing",
            Category::Medication => "medication",
            Category::Service => "service",
            Category::Benefits => "benefits",
            Category::Plan => "plan",
            Category::Question => "question",
        }
    }

    pub fn entry(self) -> &'static CategoryEntry {
        CATALOG
            .iter()
            .find(|entry| entry.category == self)
            .unwrap_or(&CATALOG[0])
    }

    pub fn label(self) -> &'static str {
        self.entry().label
    }

    pub fn icon(self) -> &'static str {
        self.entry().icon
    }

    /// Lenient lookup used by interactive pickers: accepts an id, a label, a
    /// 1-based catalog index, or an id within a small edit distance.
    pub fn resolve_fuzzy(input: &str) -> Option<Category> {
        let needle = input.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return None;
        }
        if let Ok(category) = needle.parse::<Category>() {
            return Some(category);
        }
        if let Ok(index) = needle.parse::<usize>() {
            return index
                .checked_sub(1)
                .and_then(|idx| CATALOG.get(idx))
                .map(|entry| entry.category);
        }
        if let Some(entry) = CATALOG
            .iter()
            .find(|entry| entry.label.to_ascii_lowercase() == needle)
        {
            return Some(entry.category);
        }

        CATALOG
            .iter()
            .map(|entry| (levenshtein(entry.category.id(), &needle), entry.category))
            .filter(|(distance, _)| *distance <= FUZZY_MAX_DISTANCE)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, category)| category)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        CATALOG
            .iter()
            .map(|entry| entry.category)
            .find(|category| category.id() == normalized)
            .ok_or_else(|| ParseValueError::new("category", s.trim()))
    }
}
