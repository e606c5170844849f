//! Line prices, delivery zones, and order totals.

use serde::{Deserialize, Serialize};

use crate::cart::CartLine;
use crate::catalog::{collation_key, fold};
use crate::model::{Fulfillment, MenuItem, Pesos};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Errors raised while pricing an order.
pub enum PricingError {
    /// The (city, neighborhood) pair has no delivery fee.
    #[error("No delivery to {neighborhood}, {city}")]
    UnknownZone {
        /// Requested city.
        city: String,
        /// Requested neighborhood.
        neighborhood: String,
    },
}

/// Price of one unit, adding the takeaway surcharge when packed for takeaway.
#[must_use]
pub fn unit_price(item: &MenuItem, takeaway: bool) -> Pesos {
    let surcharge = if takeaway {
        item.takeaway_surcharge.unwrap_or(Pesos::ZERO)
    } else {
        Pesos::ZERO
    };
    item.price + surcharge
}

/// Sum of all line totals.
#[must_use]
pub fn subtotal(lines: &[CartLine]) -> Pesos {
    lines.iter().map(CartLine::total).sum()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Neighborhood with a flat delivery fee.
pub struct Neighborhood {
    /// Neighborhood name.
    pub name: String,
    /// Delivery fee.
    pub price: Pesos,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// City and the neighborhoods served in it.
pub struct City {
    /// City name.
    pub name: String,
    /// Served neighborhoods.
    pub neighborhoods: Vec<Neighborhood>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Delivery fee table keyed by (city, neighborhood).
pub struct DeliveryZones {
    /// Served cities.
    pub cities: Vec<City>,
}

fn zone(name: &str, neighborhoods: &[(&str, u64)]) -> City {
    City {
        name: name.to_owned(),
        neighborhoods: neighborhoods
            .iter()
            .map(|&(neighborhood, price)| Neighborhood {
                name: neighborhood.to_owned(),
                price: Pesos(price),
            })
            .collect(),
    }
}

impl Default for DeliveryZones {
    fn default() -> Self {
        Self {
            cities: vec![
                zone(
                    "Floridablanca",
                    &[
                        ("Caldas", 4_000),
                        ("Cañaveral", 4_000),
                        ("Lagos", 4_000),
                        ("Valencia", 5_000),
                    ],
                ),
                zone(
                    "Bucaramanga",
                    &[
                        ("Cabecera", 5_000),
                        ("Sotomayor", 5_000),
                        ("Real de Minas", 6_000),
                    ],
                ),
                zone("Piedecuesta", &[("Centro", 7_000), ("Refugio", 7_000)]),
                zone("Girón", &[("Carrizal", 6_000), ("Poblado", 6_000)]),
            ],
        }
    }
}

impl DeliveryZones {
    /// Look up a city by exact name.
    #[must_use]
    pub fn city(&self, name: &str) -> Option<&City> {
        self.cities.iter().find(|city| city.name == name)
    }

    /// Delivery fee for a neighborhood, `None` when it is not served.
    #[must_use]
    pub fn fee(&self, city: &str, neighborhood: &str) -> Option<Pesos> {
        self.city(city)?
            .neighborhoods
            .iter()
            .find(|entry| entry.name == neighborhood)
            .map(|entry| entry.price)
    }

    /// Neighborhoods of a city whose name contains `search`, ignoring case and accents,
    /// sorted by name.
    #[must_use]
    pub fn neighborhoods(&self, city: &str, search: &str) -> Vec<&Neighborhood> {
        let Some(city) = self.city(city) else {
            return Vec::new();
        };
        let needle = fold(search.trim());
        let mut matches: Vec<&Neighborhood> = city
            .neighborhoods
            .iter()
            .filter(|entry| fold(&entry.name).contains(&needle))
            .collect();
        matches.sort_by_cached_key(|entry| collation_key(&entry.name));
        matches
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Money breakdown of an order.
pub struct Quote {
    /// Sum of line totals.
    pub subtotal: Pesos,
    /// Delivery fee, zero for pickup.
    pub delivery_fee: Pesos,
    /// Amount to pay.
    pub total: Pesos,
}

/// Price an order.
///
/// # Errors
///
/// Returns [`PricingError::UnknownZone`] when a delivery goes to a neighborhood
/// without a configured fee.
pub fn quote(
    lines: &[CartLine],
    fulfillment: &Fulfillment,
    zones: &DeliveryZones,
) -> Result<Quote, PricingError> {
    let subtotal = subtotal(lines);
    let delivery_fee = match fulfillment {
        Fulfillment::Pickup => Pesos::ZERO,
        Fulfillment::Delivery {
            city, neighborhood, ..
        } => zones
            .fee(city, neighborhood)
            .ok_or_else(|| PricingError::UnknownZone {
                city: city.clone(),
                neighborhood: neighborhood.clone(),
            })?,
    };

    Ok(Quote {
        subtotal,
        delivery_fee,
        total: subtotal + delivery_fee,
    })
}
