//! Menus of the day, their payloads and listing filters

use std::{fmt, str::FromStr};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{ValidationError, clean_list, require_text},
    restaurant::{RestaurantSummary, parse_f64},
};

/// Serving hours used when the owner does not give any
pub const DEFAULT_MENU_HOURS: &str = "12-4 PM";

/// Day-part a menu is served in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MenuType {
    #[default]
    Lunch,
    Dinner,
}

impl MenuType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuType::Lunch => "lunch",
            MenuType::Dinner => "dinner",
        }
    }
}

impl fmt::Display for MenuType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MenuType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "lunch" => Ok(MenuType::Lunch),
            "dinner" => Ok(MenuType::Dinner),
            other => Err(ValidationError::new(
                "type",
                format!("Menu type must be 'lunch' or 'dinner', got '{other}'"),
            )),
        }
    }
}

/// Menu document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    #[serde(rename = "type")]
    pub menu_type: MenuType,
    pub starter: String,
    pub main: String,
    pub dessert: Option<String>,
    pub price: f64,
    pub photo_url: Option<String>,
    pub tags: Vec<String>,
    pub is_exclusive: bool,
    pub hours: String,
    pub date: DateTime<Utc>,
    pub includes_drink: bool,
    pub drink_options: Vec<String>,
    pub additional_info: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Menu together with the restaurant it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuWithRestaurant {
    #[serde(flatten)]
    pub menu: Menu,
    pub restaurant: Option<RestaurantSummary>,
}

/// Menu creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMenu {
    pub restaurant_id: Uuid,
    #[serde(rename = "type", default)]
    pub menu_type: MenuType,
    pub starter: String,
    pub main: String,
    #[serde(default)]
    pub dessert: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_exclusive: bool,
    #[serde(default)]
    pub hours: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub includes_drink: bool,
    #[serde(default)]
    pub drink_options: Vec<String>,
    #[serde(default)]
    pub additional_info: Option<String>,
}

impl NewMenu {
    /// Check constraints and normalise list fields
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        require_text(&self.starter, "starter", "Starter")?;
        require_text(&self.main, "main", "Main course")?;
        validate_price(self.price)?;
        self.tags = clean_list(&self.tags);
        self.drink_options = clean_list(&self.drink_options);
        Ok(())
    }

    pub fn hours_or_default(&self) -> &str {
        self.hours
            .as_deref()
            .filter(|h| !h.trim().is_empty())
            .unwrap_or(DEFAULT_MENU_HOURS)
    }
}

/// Partial menu update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMenu {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub menu_type: Option<MenuType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dessert: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_exclusive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub includes_drink: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drink_options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

impl UpdateMenu {
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        if let Some(starter) = &self.starter {
            require_text(starter, "starter", "Starter")?;
        }
        if let Some(main) = &self.main {
            require_text(main, "main", "Main course")?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(tags) = &self.tags {
            self.tags = Some(clean_list(tags));
        }
        if let Some(drinks) = &self.drink_options {
            self.drink_options = Some(clean_list(drinks));
        }
        Ok(())
    }
}

fn validate_price(price: f64) -> Result<(), ValidationError> {
    if !price.is_finite() {
        return Err(ValidationError::new("price", "Price must be a number"));
    }
    if price < 0.0 {
        return Err(ValidationError::new("price", "Price cannot be negative"));
    }
    Ok(())
}

/// Raw `GET /api/menus` query parameters, kept as strings so parse errors
/// can be reported as validation failures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub menu_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_min: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_max: Option<String>,
    /// Comma-separated, matches menus carrying any of them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_exclusive: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Validated menu listing predicate
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuFilter {
    pub restaurant_id: Option<Uuid>,
    pub menu_type: Option<MenuType>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub tags: Vec<String>,
    pub is_exclusive: Option<bool>,
    pub search: Option<String>,
    /// Inclusive lower bound on `date`
    pub date_from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `date`
    pub date_to: Option<DateTime<Utc>>,
}

impl MenuFilter {
    pub fn for_restaurant(restaurant_id: Uuid) -> Self {
        Self {
            restaurant_id: Some(restaurant_id),
            ..Self::default()
        }
    }

    /// Menus dated within the UTC calendar day containing `now`
    pub fn today(now: DateTime<Utc>) -> Self {
        let start = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|naive| naive.and_utc())
            .unwrap_or(now);
        Self {
            date_from: Some(start),
            date_to: Some(start + Duration::days(1)),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl TryFrom<MenuQuery> for MenuFilter {
    type Error = ValidationError;

    fn try_from(query: MenuQuery) -> Result<Self, Self::Error> {
        let restaurant_id = non_blank(query.restaurant_id.as_deref())
            .map(|raw| {
                Uuid::parse_str(raw).map_err(|_| {
                    ValidationError::new("restaurant_id", "restaurant_id must be a valid id")
                })
            })
            .transpose()?;

        let menu_type = non_blank(query.menu_type.as_deref())
            .map(str::parse::<MenuType>)
            .transpose()?;

        let price_min = non_blank(query.price_min.as_deref())
            .map(|raw| parse_f64(raw, "price_min", "price_min"))
            .transpose()?;
        let price_max = non_blank(query.price_max.as_deref())
            .map(|raw| parse_f64(raw, "price_max", "price_max"))
            .transpose()?;
        if let (Some(min), Some(max)) = (price_min, price_max) {
            if min > max {
                return Err(ValidationError::new(
                    "price_min",
                    "price_min cannot be greater than price_max",
                ));
            }
        }

        let tags = non_blank(query.tags.as_deref())
            .map(split_comma_list)
            .unwrap_or_default();

        let is_exclusive = non_blank(query.is_exclusive.as_deref())
            .map(|raw| match raw {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(ValidationError::new(
                    "is_exclusive",
                    "is_exclusive must be 'true' or 'false'",
                )),
            })
            .transpose()?;

        let search = non_blank(query.search.as_deref()).map(str::to_string);

        Ok(Self {
            restaurant_id,
            menu_type,
            price_min,
            price_max,
            tags,
            is_exclusive,
            search,
            date_from: None,
            date_to: None,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Split a comma-separated list, trimming entries and dropping blanks
pub fn split_comma_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Structured fields extracted from a photographed menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedMenu {
    pub starter: String,
    pub main: String,
    pub dessert: Option<String>,
    pub price: f64,
    pub tags: Vec<String>,
}

/// Response of `POST /api/menus/upload`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedMenuResponse {
    #[serde(flatten)]
    pub menu: ParsedMenu,
    pub photo_url: String,
    pub restaurant_id: Uuid,
}
