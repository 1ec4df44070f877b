//! # Menu Client
//!
//! Admin and storefront API over the menu item and category actors.
use crate::menu_actor::{MenuAction, MenuError};
use crate::model::{
    Category, CategoryCreate, CategoryId, CategoryUpdate, Menu, MenuItem, MenuItemCreate,
    MenuItemId, MenuItemUpdate, MenuListing, MenuQuery,
};
use async_trait::async_trait;
use orderline_actor::{ActorClient, FrameworkError, ResourceClient};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Client for the menu actors. `get`/`list`/`delete` from [`ActorClient`] address items.
#[derive(Clone)]
pub struct MenuClient {
    items: ResourceClient<MenuItem>,
    categories: ResourceClient<Category>,
}

#[async_trait]
impl ActorClient<MenuItem> for MenuClient {
    type Error = MenuError;

    fn inner(&self) -> &ResourceClient<MenuItem> {
        &self.items
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => MenuError::NotFound(id),
            other => other
                .downcast_entity::<MenuError>()
                .unwrap_or_else(|e| MenuError::ActorCommunicationError(e.to_string())),
        }
    }
}

impl MenuClient {
    pub fn new(items: ResourceClient<MenuItem>, categories: ResourceClient<Category>) -> Self {
        Self { items, categories }
    }

    #[instrument(skip(self, params), fields(name = %params.name))]
    pub async fn add_item(&self, params: MenuItemCreate) -> Result<MenuItemId, MenuError> {
        debug!("Sending request");
        self.items.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self, update))]
    pub async fn update_item(&self, id: MenuItemId, update: MenuItemUpdate) -> Result<MenuItem, MenuError> {
        self.items.update(id, update).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: MenuItemId) -> Result<(), MenuError> {
        self.delete(id.clone()).await?;
        info!(item_id = %id, "Menu item deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn set_available(&self, id: MenuItemId, available: bool) -> Result<MenuItem, MenuError> {
        self.items
            .perform_action(id, MenuAction::SetAvailable(available))
            .await
            .map_err(Self::map_error)
    }

    /// Like `get`, but a missing item is an error.
    pub async fn item(&self, id: MenuItemId) -> Result<MenuItem, MenuError> {
        self.get(id.clone())
            .await?
            .ok_or_else(|| MenuError::NotFound(id.to_string()))
    }

    /// Admin list: every item, newest first, with its category.
    #[instrument(skip(self))]
    pub async fn items_with_category(&self) -> Result<Vec<MenuListing>, MenuError> {
        let mut items = self.list(MenuQuery::all()).await?;
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        let categories: HashMap<CategoryId, Category> = self
            .categories()
            .await?
            .into_iter()
            .map(|category| (category.id, category))
            .collect();
        Ok(items
            .into_iter()
            .map(|item| MenuListing {
                category: item.category_id.and_then(|id| categories.get(&id).cloned()),
                item,
            })
            .collect())
    }

    /// Storefront menu: categories and orderable items, both by name.
    #[instrument(skip(self))]
    pub async fn storefront(&self) -> Result<Menu, MenuError> {
        let mut items = self.list(MenuQuery::available()).await?;
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Menu {
            categories: self.categories().await?,
            items,
        })
    }

    /// Every category, by name.
    pub async fn categories(&self) -> Result<Vec<Category>, MenuError> {
        let mut categories = self
            .categories
            .list(())
            .await
            .map_err(Self::map_error)?;
        categories.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(categories)
    }

    #[instrument(skip(self, params), fields(name = %params.name))]
    pub async fn add_category(&self, params: CategoryCreate) -> Result<CategoryId, MenuError> {
        self.categories.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self, update))]
    pub async fn update_category(
        &self,
        id: CategoryId,
        update: CategoryUpdate,
    ) -> Result<Category, MenuError> {
        self.categories
            .update(id, update)
            .await
            .map_err(Self::map_error)
    }

    /// Refuses while items still point at the category.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: CategoryId) -> Result<(), MenuError> {
        let items = self.list(MenuQuery::all().in_category(id)).await?;
        if !items.is_empty() {
            return Err(MenuError::CategoryInUse {
                category: id.to_string(),
                items: items.len(),
            });
        }
        self.categories.delete(id).await.map_err(Self::map_error)
    }
}
