//! Line items and their option selections.
//!
//! `ItemOptions` is built once when an item enters the cart; absent selections
//! deserialize to `None` / empty lists, so downstream code never normalizes again.

use crate::money::{to_decimal, to_f64};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuOption {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price_adjustment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Addon {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price: f64,
}

/// Meal upgrade (side, drink, size).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealOption {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sauce {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ItemOptions {
    pub selected_option: Option<MenuOption>,
    pub selected_addons: Vec<Addon>,
    pub selected_meal_options: Vec<MealOption>,
    pub selected_sauce: Option<Sauce>,
}

impl ItemOptions {
    /// Sum of every price the selections add to the base price.
    pub fn price_adjustment(&self) -> f64 {
        let option = self
            .selected_option
            .as_ref()
            .map(|o| to_decimal(o.price_adjustment))
            .unwrap_or_default();
        let addons: Decimal = self.selected_addons.iter().map(|a| to_decimal(a.price)).sum();
        let meals: Decimal = self
            .selected_meal_options
            .iter()
            .map(|m| to_decimal(m.price))
            .sum();
        to_f64(option + addons + meals)
    }
}

/// One row of an order's `metadata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub menu_item_id: String,
    pub name: String,
    pub quantity: u32,
    /// Unit price after option adjustments.
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub options: ItemOptions,
}

impl OrderLineItem {
    pub fn line_total(&self) -> f64 {
        to_f64(to_decimal(self.price) * Decimal::from(self.quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_options_deserialize_to_empty() {
        let options: ItemOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, ItemOptions::default());

        let options: ItemOptions = serde_json::from_str(
            r#"{"selectedOption": null, "selectedAddons": [{"id": "a1", "name": "Cheese", "price": 1.25}]}"#,
        )
        .unwrap();
        assert!(options.selected_option.is_none());
        assert_eq!(options.selected_addons.len(), 1);
        assert!(options.selected_meal_options.is_empty());
        assert!(options.selected_sauce.is_none());
    }

    #[test]
    fn test_price_adjustment_sums_selections() {
        let options = ItemOptions {
            selected_option: Some(MenuOption {
                id: "large".into(),
                name: "Large".into(),
                price_adjustment: 2.0,
            }),
            selected_addons: vec![Addon {
                id: "bacon".into(),
                name: "Bacon".into(),
                price: 1.5,
            }],
            selected_meal_options: vec![MealOption {
                id: "fries".into(),
                name: "Fries".into(),
                price: 2.99,
            }],
            selected_sauce: Some(Sauce {
                id: "bbq".into(),
                name: "BBQ".into(),
            }),
        };
        assert_eq!(options.price_adjustment(), 6.49);
    }
}
