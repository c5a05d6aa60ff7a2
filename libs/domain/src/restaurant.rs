//! Restaurant documents, payloads and search parameters

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ValidationError, require_text};

/// Default nearby search radius in kilometres
pub const DEFAULT_NEARBY_KM: f64 = 5.0;

/// Maximum length of a restaurant description
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Dietary options a restaurant can advertise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietaryOption {
    Vegetarian,
    Vegan,
    GlutenFree,
    DairyFree,
    NutFree,
    Pescatarian,
    Halal,
    Kosher,
}

impl DietaryOption {
    pub const ALL: [DietaryOption; 8] = [
        DietaryOption::Vegetarian,
        DietaryOption::Vegan,
        DietaryOption::GlutenFree,
        DietaryOption::DairyFree,
        DietaryOption::NutFree,
        DietaryOption::Pescatarian,
        DietaryOption::Halal,
        DietaryOption::Kosher,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DietaryOption::Vegetarian => "vegetarian",
            DietaryOption::Vegan => "vegan",
            DietaryOption::GlutenFree => "gluten-free",
            DietaryOption::DairyFree => "dairy-free",
            DietaryOption::NutFree => "nut-free",
            DietaryOption::Pescatarian => "pescatarian",
            DietaryOption::Halal => "halal",
            DietaryOption::Kosher => "kosher",
        }
    }
}

impl fmt::Display for DietaryOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DietaryOption {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DietaryOption::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| {
                ValidationError::new("dietary_options", format!("Unknown dietary option '{s}'"))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    #[default]
    Base,
    Premium,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Base => "base",
            SubscriptionTier::Premium => "premium",
        }
    }
}

impl FromStr for SubscriptionTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" => Ok(SubscriptionTier::Base),
            "premium" => Ok(SubscriptionTier::Premium),
            other => Err(ValidationError::new(
                "subscription_tier",
                format!("Unknown subscription tier '{other}'"),
            )),
        }
    }
}

/// GeoJSON-style discriminator, always `"Point"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PointKind {
    #[default]
    Point,
}

/// Restaurant position and street address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "type", default)]
    pub kind: PointKind,
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
    pub address: String,
}

impl Location {
    pub fn new(longitude: f64, latitude: f64, address: impl Into<String>) -> Self {
        Self {
            kind: PointKind::Point,
            coordinates: [longitude, latitude],
            address: address.into(),
        }
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_coordinates(self.latitude(), self.longitude())?;
        require_text(&self.address, "location.address", "Address")
    }
}

fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), ValidationError> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(ValidationError::new(
            "lat",
            "Latitude must be between -90 and 90",
        ));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(ValidationError::new(
            "lng",
            "Longitude must be between -180 and 180",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DayHours {
    pub open: Option<String>,
    pub close: Option<String>,
}

/// Weekly opening hours; days without an entry are unspecified
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OpeningHours {
    pub monday: Option<DayHours>,
    pub tuesday: Option<DayHours>,
    pub wednesday: Option<DayHours>,
    pub thursday: Option<DayHours>,
    pub friday: Option<DayHours>,
    pub saturday: Option<DayHours>,
    pub sunday: Option<DayHours>,
}

/// Restaurant document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    pub location: Location,
    pub cuisine_type: String,
    pub dietary_options: Vec<DietaryOption>,
    pub phone_number: String,
    pub subscription_tier: SubscriptionTier,
    pub owner: Uuid,
    pub description: Option<String>,
    pub photos: Vec<String>,
    pub opening_hours: OpeningHours,
    pub average_rating: f64,
    pub review_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Restaurant {
    pub fn summary(&self) -> RestaurantSummary {
        RestaurantSummary {
            id: self.id,
            name: self.name.clone(),
            location: self.location.clone(),
            cuisine_type: self.cuisine_type.clone(),
            dietary_options: self.dietary_options.clone(),
            phone_number: self.phone_number.clone(),
        }
    }
}

/// Subset of a restaurant embedded in menu listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantSummary {
    pub id: Uuid,
    pub name: String,
    pub location: Location,
    pub cuisine_type: String,
    pub dietary_options: Vec<DietaryOption>,
    pub phone_number: String,
}

/// Restaurant creation payload; the owner is always the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRestaurant {
    pub name: String,
    pub location: Location,
    pub cuisine_type: String,
    #[serde(default)]
    pub dietary_options: Vec<DietaryOption>,
    pub phone_number: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub opening_hours: OpeningHours,
}

impl NewRestaurant {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.name, "name", "Restaurant name")?;
        self.location.validate()?;
        require_text(&self.cuisine_type, "cuisine_type", "Cuisine type")?;
        require_text(&self.phone_number, "phone_number", "Phone number")?;
        validate_description(self.description.as_deref())
    }
}

/// Partial restaurant update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRestaurant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_options: Option<Vec<DietaryOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_tier: Option<SubscriptionTier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<OpeningHours>,
}

impl UpdateRestaurant {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require_text(name, "name", "Restaurant name")?;
        }
        if let Some(location) = &self.location {
            location.validate()?;
        }
        if let Some(cuisine) = &self.cuisine_type {
            require_text(cuisine, "cuisine_type", "Cuisine type")?;
        }
        if let Some(phone) = &self.phone_number {
            require_text(phone, "phone_number", "Phone number")?;
        }
        validate_description(self.description.as_deref())
    }
}

fn validate_description(description: Option<&str>) -> Result<(), ValidationError> {
    match description {
        Some(text) if text.chars().count() > MAX_DESCRIPTION_LEN => Err(ValidationError::new(
            "description",
            "Description cannot be more than 500 characters",
        )),
        _ => Ok(()),
    }
}

/// Raw `GET /api/restaurants` query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_option: Option<String>,
}

/// Equality filters applied to restaurant listings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestaurantFilter {
    pub cuisine_type: Option<String>,
    pub dietary_option: Option<DietaryOption>,
}

impl TryFrom<RestaurantQuery> for RestaurantFilter {
    type Error = ValidationError;

    fn try_from(query: RestaurantQuery) -> Result<Self, Self::Error> {
        let cuisine_type = query
            .cuisine_type
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        let dietary_option = query
            .dietary_option
            .as_deref()
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::parse)
            .transpose()?;

        Ok(Self {
            cuisine_type,
            dietary_option,
        })
    }
}

/// Raw `GET /api/restaurants/nearby` query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NearbyQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<String>,
    /// Radius in kilometres
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
}

/// Validated proximity search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyFilter {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
}

impl NearbyFilter {
    pub fn radius_meters(&self) -> f64 {
        self.radius_km * 1000.0
    }
}

impl TryFrom<NearbyQuery> for NearbyFilter {
    type Error = ValidationError;

    fn try_from(query: NearbyQuery) -> Result<Self, Self::Error> {
        let (Some(lat), Some(lng)) = (query.lat.as_deref(), query.lng.as_deref()) else {
            return Err(ValidationError::new(
                "lat",
                "Latitude and longitude are required",
            ));
        };

        let latitude = parse_f64(lat, "lat", "Latitude")?;
        let longitude = parse_f64(lng, "lng", "Longitude")?;
        validate_coordinates(latitude, longitude)?;

        let radius_km = match query.distance.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_NEARBY_KM,
            Some(d) => parse_f64(d, "distance", "Distance")?,
        };
        if !(radius_km > 0.0) || !radius_km.is_finite() {
            return Err(ValidationError::new(
                "distance",
                "Distance must be a positive number of kilometres",
            ));
        }

        Ok(Self {
            latitude,
            longitude,
            radius_km,
        })
    }
}

pub(crate) fn parse_f64(raw: &str, field: &'static str, label: &str) -> Result<f64, ValidationError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::new(field, format!("{label} must be a number")))
}
