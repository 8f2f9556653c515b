use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Menu section. Declaration order is the order sections appear on the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Appetizers,
    #[serde(rename = "Main Courses")]
    MainCourses,
    Desserts,
    Beverages,
    Sides,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Self::Appetizers,
        Self::MainCourses,
        Self::Desserts,
        Self::Beverages,
        Self::Sides,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Appetizers => "Appetizers",
            Self::MainCourses => "Main Courses",
            Self::Desserts => "Desserts",
            Self::Beverages => "Beverages",
            Self::Sides => "Sides",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionalInfo {
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbohydrates: Option<f64>,
    pub fat: Option<f64>,
    #[serde(default)]
    pub allergens: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizationChoice {
    pub name: String,
    #[serde(default)]
    pub price_adjustment: f64,
}

/// A named group of choices, e.g. "Spice level" with "Mild" and "Hot".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomizationOption {
    pub name: String,
    #[serde(default)]
    pub options: Vec<CustomizationChoice>,
}

/// A dish on the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub is_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutritional_info: Option<NutritionalInfo>,
    pub customization_options: Vec<CustomizationOption>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated menu item ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMenuItem {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: Category,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub nutritional_info: Option<NutritionalInfo>,
    pub customization_options: Vec<CustomizationOption>,
}

/// A validated partial update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutritional_info: Option<NutritionalInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customization_options: Option<Vec<CustomizationOption>>,
}

impl MenuItem {
    pub fn from_new(id: String, item: NewMenuItem, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: item.name,
            description: item.description,
            price: item.price,
            category: item.category,
            image_url: item.image_url,
            is_available: item.is_available,
            nutritional_info: item.nutritional_info,
            customization_options: item.customization_options,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a patch in place and bump `updated_at`.
    pub fn apply(&mut self, patch: MenuItemPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = Some(image_url);
        }
        if let Some(is_available) = patch.is_available {
            self.is_available = is_available;
        }
        if let Some(info) = patch.nutritional_info {
            self.nutritional_info = Some(info);
        }
        if let Some(options) = patch.customization_options {
            self.customization_options = options;
        }
        self.updated_at = now;
    }
}

/// Group items by category, keeping the input order within each category.
/// Categories with no items are left out.
pub fn group_by_category(items: Vec<MenuItem>) -> BTreeMap<Category, Vec<MenuItem>> {
    let mut grouped: BTreeMap<Category, Vec<MenuItem>> = BTreeMap::new();
    for item in items {
        grouped.entry(item.category).or_default().push(item);
    }
    grouped
}
