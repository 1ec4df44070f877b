//! The customer's cart. It lives on the client until checkout turns it into an order.

use crate::checkout::CartError;
use crate::model::{ItemOptions, MenuItem, OrderLineItem};
use crate::money::{to_decimal, to_f64};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub image_url: Option<String>,
    /// Base price plus option adjustments.
    pub unit_price: f64,
    pub quantity: u32,
    pub options: ItemOptions,
}

impl CartItem {
    pub fn line_total(&self) -> f64 {
        to_f64(to_decimal(self.unit_price) * Decimal::from(self.quantity))
    }

    pub fn to_line_item(&self) -> OrderLineItem {
        OrderLineItem {
            menu_item_id: self.product_id.clone(),
            name: self.name.clone(),
            quantity: self.quantity,
            price: self.unit_price,
            image_url: self.image_url.clone(),
            options: self.options.clone(),
        }
    }
}

/// Lines are addressed by position: the same product with different options is a
/// separate line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds one unit of `item` with `options` and returns its line.
    ///
    /// Selections are matched by id against what `item` offers and replaced by the menu's
    /// own entries, so prices always come from the menu. An existing line with the same
    /// product and identical options gets its quantity bumped instead.
    pub fn add(
        &mut self,
        item: &MenuItem,
        options: ItemOptions,
        restaurant_open: bool,
    ) -> Result<usize, CartError> {
        if !restaurant_open {
            return Err(CartError::RestaurantClosed);
        }
        if !item.available {
            return Err(CartError::Unavailable(item.name.clone()));
        }
        let options = resolve_options(item, options)?;
        let product_id = item.id.to_string();
        if let Some(line) = self
            .items
            .iter()
            .position(|existing| existing.product_id == product_id && existing.options == options)
        {
            self.items[line].quantity += 1;
            return Ok(line);
        }
        let unit_price = to_f64(to_decimal(item.price) + to_decimal(options.price_adjustment()));
        self.items.push(CartItem {
            product_id,
            name: item.name.clone(),
            image_url: item.image_url.clone(),
            unit_price,
            quantity: 1,
            options,
        });
        Ok(self.items.len() - 1)
    }

    /// A quantity below 1 removes the line.
    pub fn update_quantity(&mut self, line: usize, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return self.remove(line).map(|_| ());
        }
        let item = self.items.get_mut(line).ok_or(CartError::NoSuchLine(line))?;
        item.quantity = quantity;
        Ok(())
    }

    pub fn remove(&mut self, line: usize) -> Result<CartItem, CartError> {
        if line >= self.items.len() {
            return Err(CartError::NoSuchLine(line));
        }
        Ok(self.items.remove(line))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn subtotal(&self) -> f64 {
        to_f64(self.items.iter().map(|item| to_decimal(item.line_total())).sum())
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn to_line_items(&self) -> Vec<OrderLineItem> {
        self.items.iter().map(CartItem::to_line_item).collect()
    }
}

fn resolve_options(item: &MenuItem, chosen: ItemOptions) -> Result<ItemOptions, CartError> {
    let unknown = |kind: &'static str, id: &str| CartError::UnknownChoice {
        item: item.name.clone(),
        kind,
        id: id.to_string(),
    };

    let selected_option = match chosen.selected_option {
        Some(choice) => Some(
            item.options
                .iter()
                .find(|offered| offered.id == choice.id)
                .cloned()
                .ok_or_else(|| unknown("option", &choice.id))?,
        ),
        None if item.option_required => return Err(CartError::OptionRequired(item.name.clone())),
        None => None,
    };
    let selected_addons = chosen
        .selected_addons
        .iter()
        .map(|choice| {
            item.addons
                .iter()
                .find(|offered| offered.id == choice.id)
                .cloned()
                .ok_or_else(|| unknown("add-on", &choice.id))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let selected_meal_options = chosen
        .selected_meal_options
        .iter()
        .map(|choice| {
            item.meal_options
                .iter()
                .find(|offered| offered.id == choice.id)
                .cloned()
                .ok_or_else(|| unknown("meal option", &choice.id))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let selected_sauce = chosen
        .selected_sauce
        .map(|choice| {
            item.sauces
                .iter()
                .find(|offered| offered.id == choice.id)
                .cloned()
                .ok_or_else(|| unknown("sauce", &choice.id))
        })
        .transpose()?;

    Ok(ItemOptions {
        selected_option,
        selected_addons,
        selected_meal_options,
        selected_sauce,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Addon, MealOption, MenuOption, Sauce};

    fn bacon(price: f64) -> Addon {
        Addon {
            id: "bacon".to_string(),
            name: "Bacon".to_string(),
            price,
        }
    }

    fn bbq() -> Sauce {
        Sauce {
            id: "bbq".to_string(),
            name: "BBQ".to_string(),
        }
    }

    fn burger() -> MenuItem {
        let mut burger = MenuItem::new("burger", "Burger", 8.0);
        burger.addons = vec![bacon(1.5)];
        burger.sauces = vec![bbq()];
        burger.meal_options = vec![MealOption {
            id: "fries".to_string(),
            name: "Fries".to_string(),
            price: 2.99,
        }];
        burger
    }

    fn with_bacon() -> ItemOptions {
        ItemOptions {
            selected_addons: vec![bacon(1.5)],
            ..ItemOptions::default()
        }
    }

    #[test]
    fn test_same_options_merge_different_options_split() {
        let burger = burger();
        let mut cart = Cart::new();

        assert_eq!(cart.add(&burger, ItemOptions::default(), true), Ok(0));
        assert_eq!(cart.add(&burger, ItemOptions::default(), true), Ok(0));
        assert_eq!(cart.add(&burger, with_bacon(), true), Ok(1));

        let with_sauce = ItemOptions {
            selected_sauce: Some(bbq()),
            ..with_bacon()
        };
        assert_eq!(cart.add(&burger, with_sauce, true), Ok(2));

        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.items()[1].unit_price, 9.5);
        assert_eq!(cart.item_count(), 4);
        assert_eq!(cart.subtotal(), 35.0);
    }

    #[test]
    fn test_prices_come_from_the_menu() {
        let mut cart = Cart::new();
        let tampered = ItemOptions {
            selected_addons: vec![bacon(0.0)],
            ..ItemOptions::default()
        };
        cart.add(&burger(), tampered, true).unwrap();
        assert_eq!(cart.items()[0].unit_price, 9.5);
        assert_eq!(cart.items()[0].options, with_bacon());

        // Same choice, same line, whatever price the caller sent.
        assert_eq!(cart.add(&burger(), with_bacon(), true), Ok(0));
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_menu_rules_are_enforced() {
        let mut cart = Cart::new();

        let mut sold_out = burger();
        sold_out.available = false;
        assert_eq!(
            cart.add(&sold_out, ItemOptions::default(), true),
            Err(CartError::Unavailable("Burger".to_string()))
        );

        let ketchup = ItemOptions {
            selected_sauce: Some(Sauce {
                id: "ketchup".to_string(),
                name: "Ketchup".to_string(),
            }),
            ..ItemOptions::default()
        };
        assert_eq!(
            cart.add(&burger(), ketchup, true),
            Err(CartError::UnknownChoice {
                item: "Burger".to_string(),
                kind: "sauce",
                id: "ketchup".to_string()
            })
        );

        let mut pizza = MenuItem::new("pizza", "Pizza", 12.0);
        pizza.option_required = true;
        pizza.options = vec![MenuOption {
            id: "large".to_string(),
            name: "Large".to_string(),
            price_adjustment: 3.0,
        }];
        assert_eq!(
            cart.add(&pizza, ItemOptions::default(), true),
            Err(CartError::OptionRequired("Pizza".to_string()))
        );
        let large = ItemOptions {
            selected_option: pizza.options.first().cloned(),
            ..ItemOptions::default()
        };
        assert_eq!(cart.add(&pizza, large, true), Ok(0));
        assert_eq!(cart.subtotal(), 15.0);
    }

    #[test]
    fn test_closed_restaurant_refuses_items() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.add(&MenuItem::new("fries", "Fries", 3.0), ItemOptions::default(), false),
            Err(CartError::RestaurantClosed)
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_quantity_below_one_removes_line() {
        let mut cart = Cart::new();
        cart.add(&MenuItem::new("fries", "Fries", 3.0), ItemOptions::default(), true)
            .unwrap();
        cart.update_quantity(0, 3).unwrap();
        assert_eq!(cart.subtotal(), 9.0);

        cart.update_quantity(0, 0).unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.update_quantity(0, 2), Err(CartError::NoSuchLine(0)));
    }
}
