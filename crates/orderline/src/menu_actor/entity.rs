//! [`ActorEntity`] implementations for [`MenuItem`] and [`Category`].

use crate::menu_actor::{MenuAction, MenuContext, MenuError};
use crate::model::{
    Category, CategoryCreate, CategoryId, CategoryUpdate, MenuItem, MenuItemCreate, MenuItemId,
    MenuItemUpdate, MenuQuery,
};
use async_trait::async_trait;
use chrono::Utc;
use orderline_actor::ActorEntity;
use std::collections::HashSet;
use tracing::info;

#[async_trait]
impl ActorEntity for MenuItem {
    type Id = MenuItemId;
    type Create = MenuItemCreate;
    type Update = MenuItemUpdate;
    type Action = MenuAction;
    type ActionResult = MenuItem;
    type Query = MenuQuery;
    type Context = MenuContext;
    type Error = MenuError;
    const TABLE: &'static str = "menu_items";

    fn from_create_params(id: MenuItemId, params: MenuItemCreate) -> Result<Self, Self::Error> {
        let item = Self {
            id,
            name: params.name,
            description: params.description,
            price: params.price,
            image_url: params.image_url,
            category_id: params.category_id,
            available: params.available,
            featured: params.featured,
            options: params.options,
            option_required: params.option_required,
            addons: params.addons,
            meal_options: params.meal_options,
            sauces: params.sauces,
            created_at: Utc::now(),
        };
        item.validate()?;
        Ok(item)
    }

    fn matches(&self, query: &MenuQuery) -> bool {
        query.accepts(self)
    }

    async fn on_create(&mut self, ctx: &MenuContext) -> Result<(), Self::Error> {
        check_category(self.category_id, ctx).await
    }

    async fn on_update(&mut self, update: MenuItemUpdate, ctx: &MenuContext) -> Result<(), Self::Error> {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description).filter(|text| !text.trim().is_empty());
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(image_url) = update.image_url {
            self.image_url = Some(image_url).filter(|url| !url.trim().is_empty());
        }
        if let Some(category_id) = update.category_id {
            check_category(Some(category_id), ctx).await?;
            self.category_id = Some(category_id);
        }
        if let Some(available) = update.available {
            self.available = available;
        }
        if let Some(featured) = update.featured {
            self.featured = featured;
        }
        if let Some(options) = update.options {
            self.options = options;
        }
        if let Some(option_required) = update.option_required {
            self.option_required = option_required;
        }
        if let Some(addons) = update.addons {
            self.addons = addons;
        }
        if let Some(meal_options) = update.meal_options {
            self.meal_options = meal_options;
        }
        if let Some(sauces) = update.sauces {
            self.sauces = sauces;
        }
        self.validate()
    }

    async fn handle_action(
        &mut self,
        action: MenuAction,
        _ctx: &MenuContext,
    ) -> Result<MenuItem, Self::Error> {
        match action {
            MenuAction::SetAvailable(available) => {
                if self.available != available {
                    info!(item_id = %self.id, available, "Availability changed");
                }
                self.available = available;
            }
        }
        Ok(self.clone())
    }
}

impl MenuItem {
    fn validate(&self) -> Result<(), MenuError> {
        let invalid = |msg: String| Err(MenuError::ValidationError(msg));

        if self.name.trim().is_empty() {
            return invalid("menu item name cannot be blank".to_string());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return invalid(format!("{}: price must be non-negative", self.name));
        }
        let extras = self
            .addons
            .iter()
            .map(|addon| addon.price)
            .chain(self.meal_options.iter().map(|meal| meal.price));
        if self.options.iter().any(|o| !o.price_adjustment.is_finite())
            || extras.into_iter().any(|price| !price.is_finite() || price < 0.0)
        {
            return invalid(format!("{}: option prices must be valid amounts", self.name));
        }
        if self.option_required && self.options.is_empty() {
            return invalid(format!("{}: a required option needs choices", self.name));
        }
        let lists = [
            ("option", self.options.iter().map(|o| o.id.as_str()).collect::<Vec<_>>()),
            ("addon", self.addons.iter().map(|a| a.id.as_str()).collect()),
            ("meal option", self.meal_options.iter().map(|m| m.id.as_str()).collect()),
            ("sauce", self.sauces.iter().map(|s| s.id.as_str()).collect()),
        ];
        for (kind, ids) in lists {
            let mut seen = HashSet::new();
            if let Some(duplicate) = ids.into_iter().find(|id| !seen.insert(*id)) {
                return invalid(format!("{}: duplicate {kind} id {duplicate}", self.name));
            }
        }
        Ok(())
    }
}

async fn check_category(category_id: Option<CategoryId>, ctx: &MenuContext) -> Result<(), MenuError> {
    let Some(category_id) = category_id else {
        return Ok(());
    };
    let found = ctx
        .categories
        .get(category_id)
        .await
        .map_err(|e| MenuError::ActorCommunicationError(e.to_string()))?;
    match found {
        Some(_) => Ok(()),
        None => Err(MenuError::UnknownCategory(category_id.to_string())),
    }
}

#[async_trait]
impl ActorEntity for Category {
    type Id = CategoryId;
    type Create = CategoryCreate;
    type Update = CategoryUpdate;
    type Action = ();
    type ActionResult = ();
    type Query = ();
    type Context = ();
    type Error = MenuError;
    const TABLE: &'static str = "categories";

    fn from_create_params(id: CategoryId, params: CategoryCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            id,
            name: category_name(params.name)?,
            description: params.description,
        })
    }

    async fn on_update(&mut self, update: CategoryUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(name) = update.name {
            self.name = category_name(name)?;
        }
        if let Some(description) = update.description {
            self.description = Some(description).filter(|text| !text.trim().is_empty());
        }
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), Self::Error> {
        Ok(())
    }
}

fn category_name(name: String) -> Result<String, MenuError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(MenuError::ValidationError(
            "category name cannot be blank".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Addon, MenuOption};

    fn addon(id: &str) -> Addon {
        Addon {
            id: id.to_string(),
            name: id.to_string(),
            price: 1.0,
        }
    }

    #[test]
    fn test_item_validation() {
        let mut item = MenuItem::new("wings", "Wings", 9.0);
        assert_eq!(item.validate(), Ok(()));

        item.addons = vec![addon("ranch"), addon("ranch")];
        assert!(matches!(item.validate(), Err(MenuError::ValidationError(msg)) if msg.contains("duplicate addon id ranch")));

        item.addons = vec![addon("ranch")];
        item.option_required = true;
        assert!(item.validate().is_err());
        item.options = vec![MenuOption {
            id: "12pc".to_string(),
            name: "12 pieces".to_string(),
            price_adjustment: 6.0,
        }];
        assert_eq!(item.validate(), Ok(()));

        item.price = -1.0;
        assert!(item.validate().is_err());
    }

    #[test]
    fn test_category_names_are_trimmed() {
        assert_eq!(category_name("  Drinks ".to_string()), Ok("Drinks".to_string()));
        assert!(category_name("   ".to_string()).is_err());
    }
}
