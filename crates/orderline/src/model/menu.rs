use crate::model::{Addon, MealOption, MenuOption, Sauce};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Menu item identifier. Generated ids read `item_N`; seeded menus may use slugs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuItemId(pub String);

impl From<u32> for MenuItemId {
    fn from(id: u32) -> Self {
        Self(format!("item_{id}"))
    }
}

impl From<&str> for MenuItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for MenuItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u32);

impl From<u32> for CategoryId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "category_{}", self.0)
    }
}

/// A menu entry and the choices it offers. Prices are before option adjustments.
///
/// # Actor Framework
/// Managed by a [`ResourceActor`](orderline_actor::ResourceActor); see
/// [`crate::menu_actor`] for creation, updates and the availability switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Unavailable items stay on the admin list but cannot be ordered.
    pub available: bool,
    #[serde(default)]
    pub featured: bool,
    /// Sizes or variants; one must be picked when `option_required` is set.
    #[serde(default)]
    pub options: Vec<MenuOption>,
    #[serde(default)]
    pub option_required: bool,
    #[serde(default)]
    pub addons: Vec<Addon>,
    #[serde(default)]
    pub meal_options: Vec<MealOption>,
    #[serde(default)]
    pub sauces: Vec<Sauce>,
    pub created_at: DateTime<Utc>,
}

impl MenuItem {
    /// An available item without choices.
    pub fn new(id: impl Into<MenuItemId>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            price,
            image_url: None,
            category_id: None,
            available: true,
            featured: false,
            options: Vec::new(),
            option_required: false,
            addons: Vec::new(),
            meal_options: Vec::new(),
            sauces: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// Payload for adding a menu item.
#[derive(Debug, Clone)]
pub struct MenuItemCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    pub category_id: Option<CategoryId>,
    pub available: bool,
    pub featured: bool,
    pub options: Vec<MenuOption>,
    pub option_required: bool,
    pub addons: Vec<Addon>,
    pub meal_options: Vec<MealOption>,
    pub sauces: Vec<Sauce>,
}

impl MenuItemCreate {
    /// An available, plain item.
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            description: None,
            price,
            image_url: None,
            category_id: None,
            available: true,
            featured: false,
            options: Vec::new(),
            option_required: false,
            addons: Vec::new(),
            meal_options: Vec::new(),
            sauces: Vec::new(),
        }
    }

    pub fn in_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

/// Partial edit; `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub category_id: Option<CategoryId>,
    pub available: Option<bool>,
    pub featured: Option<bool>,
    pub options: Option<Vec<MenuOption>>,
    pub option_required: Option<bool>,
    pub addons: Option<Vec<Addon>>,
    pub meal_options: Option<Vec<MealOption>>,
    pub sauces: Option<Vec<Sauce>>,
}

/// Filter for menu listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuQuery {
    pub available_only: bool,
    pub category_id: Option<CategoryId>,
}

impl MenuQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn available() -> Self {
        Self {
            available_only: true,
            ..Self::default()
        }
    }

    pub fn in_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn accepts(&self, item: &MenuItem) -> bool {
        (!self.available_only || item.available)
            && self
                .category_id
                .map_or(true, |category| item.category_id == Some(category))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CategoryCreate {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Admin list row: an item with its category joined in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuListing {
    #[serde(flatten)]
    pub item: MenuItem,
    pub category: Option<Category>,
}

/// What the storefront shows: categories by name, orderable items by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Menu {
    pub categories: Vec<Category>,
    pub items: Vec<MenuItem>,
}

impl Menu {
    pub fn item(&self, id: &MenuItemId) -> Option<&MenuItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn in_category(&self, category_id: CategoryId) -> impl Iterator<Item = &MenuItem> {
        self.items
            .iter()
            .filter(move |item| item.category_id == Some(category_id))
    }
}
