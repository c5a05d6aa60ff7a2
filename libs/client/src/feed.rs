//! Home feed filtering
//!
//! The feed downloads today's menus once and narrows them locally as the
//! user toggles filters, so every predicate here works on already fetched
//! [`MenuWithRestaurant`] values.

use domain::{DietaryOption, MenuType, MenuWithRestaurant};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedFilter {
    pub menu_type: Option<MenuType>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub cuisine_type: Option<String>,
    pub dietary_option: Option<DietaryOption>,
    pub search: Option<String>,
}

impl FeedFilter {
    pub fn is_empty(&self) -> bool {
        *self == FeedFilter::default()
    }

    pub fn matches(&self, item: &MenuWithRestaurant) -> bool {
        let menu = &item.menu;

        if self.menu_type.is_some_and(|t| t != menu.menu_type) {
            return false;
        }

        // The price range only applies once both ends are chosen
        if let (Some(min), Some(max)) = (self.price_min, self.price_max) {
            if menu.price < min || menu.price > max {
                return false;
            }
        }

        if let Some(cuisine) = &self.cuisine_type {
            let same = item
                .restaurant
                .as_ref()
                .is_some_and(|r| r.cuisine_type == *cuisine);
            if !same {
                return false;
            }
        }

        if let Some(option) = self.dietary_option {
            let offered = item
                .restaurant
                .as_ref()
                .is_some_and(|r| r.dietary_options.contains(&option));
            if !offered {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => search_matches(item, &term.to_lowercase()),
            _ => true,
        }
    }

    pub fn apply<'a>(&self, items: &'a [MenuWithRestaurant]) -> Vec<&'a MenuWithRestaurant> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}

fn search_matches(item: &MenuWithRestaurant, term: &str) -> bool {
    let menu = &item.menu;
    let contains = |text: &str| text.to_lowercase().contains(term);

    contains(menu.starter.as_str())
        || contains(menu.main.as_str())
        || menu.dessert.as_deref().is_some_and(contains)
        || menu.tags.iter().any(|tag| contains(tag.as_str()))
}
