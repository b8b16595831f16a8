//! Villa domain entity

use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::domain::booking::PricingParameters;

/// A rentable villa
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Villa {
    pub id: i64,
    pub title: String,
    /// Image URLs. The villa service stores them comma-separated.
    #[serde(default, deserialize_with = "deserialize_images")]
    pub images: Vec<String>,
    pub city: String,
    pub address: String,
    pub base_capacity: u32,
    pub maximum_capacity: u32,
    /// Floor area in square meters
    pub area: f64,
    pub bed_count: u32,
    #[serde(default)]
    pub has_pool: bool,
    #[serde(default)]
    pub has_cooling_system: bool,
    pub base_price_per_night: Decimal,
    pub extra_person_price: Decimal,
    #[serde(default)]
    pub rating: f64,
}

impl Villa {
    pub fn pricing(&self) -> PricingParameters {
        PricingParameters {
            base_capacity: self.base_capacity,
            maximum_capacity: self.maximum_capacity,
            base_price_per_night: self.base_price_per_night,
            extra_person_price: self.extra_person_price,
        }
    }
}

/// Villa attributes an admin submits when creating or updating a villa.
///
/// Images travel separately as a [`VillaImage`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "capacity_range"))]
pub struct VillaInput {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub city: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub address: String,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub base_capacity: u32,
    /// Not below `base_capacity`
    pub maximum_capacity: u32,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub area: f64,
    pub bed_count: u32,
    #[serde(default)]
    pub has_pool: bool,
    #[serde(default)]
    pub has_cooling_system: bool,
    #[validate(custom(function = "non_negative"))]
    pub base_price_per_night: Decimal,
    #[validate(custom(function = "non_negative"))]
    pub extra_person_price: Decimal,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 5.0, message = "must be between 0 and 5"))]
    pub rating: f64,
}

impl VillaInput {
    /// Villa record with `id` and `images` filled in.
    pub fn into_villa(self, id: i64, images: Vec<String>) -> Villa {
        Villa {
            id,
            title: self.title,
            images,
            city: self.city,
            address: self.address,
            base_capacity: self.base_capacity,
            maximum_capacity: self.maximum_capacity,
            area: self.area,
            bed_count: self.bed_count,
            has_pool: self.has_pool,
            has_cooling_system: self.has_cooling_system,
            base_price_per_night: self.base_price_per_night,
            extra_person_price: self.extra_person_price,
            rating: self.rating,
        }
    }
}

fn capacity_range(input: &VillaInput) -> Result<(), ValidationError> {
    if input.maximum_capacity >= input.base_capacity {
        return Ok(());
    }
    let mut err = ValidationError::new("capacity_range");
    err.message = Some(Cow::from(
        "maximum_capacity must not be below base_capacity",
    ));
    Err(err)
}

fn non_negative(price: &Decimal) -> Result<(), ValidationError> {
    if !price.is_sign_negative() {
        return Ok(());
    }
    let mut err = ValidationError::new("non_negative");
    err.message = Some(Cow::from("must not be negative"));
    Err(err)
}

/// Image file uploaded with a villa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VillaImage {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Accepts either a JSON array or a comma-separated string (or null).
fn deserialize_images<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Images {
        List(Vec<String>),
        Joined(String),
    }

    Ok(match Option::<Images>::deserialize(deserializer)? {
        Some(Images::List(list)) => list,
        Some(Images::Joined(joined)) => split_images(&joined),
        None => Vec::new(),
    })
}

pub(crate) fn split_images(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Search filters for the villa list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VillaFilter {
    /// Exact city name
    pub city: Option<String>,
    /// Villas that can host at least this many people
    pub min_capacity: Option<u32>,
    /// Highest acceptable base price per night
    pub max_price: Option<Decimal>,
}

impl VillaFilter {
    pub fn matches(&self, villa: &Villa) -> bool {
        if let Some(city) = &self.city {
            if &villa.city != city {
                return false;
            }
        }
        if let Some(min_capacity) = self.min_capacity {
            if villa.maximum_capacity < min_capacity {
                return false;
            }
        }
        if let Some(max_price) = self.max_price {
            if villa.base_price_per_night > max_price {
                return false;
            }
        }
        true
    }

    /// Set filters as query parameters, in a stable order
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(city) = self.city.as_ref().filter(|c| !c.is_empty()) {
            pairs.push(("city", city.clone()));
        }
        if let Some(min_capacity) = self.min_capacity {
            pairs.push(("min_capacity", min_capacity.to_string()));
        }
        if let Some(max_price) = self.max_price {
            pairs.push(("max_price", max_price.to_string()));
        }
        pairs
    }
}
