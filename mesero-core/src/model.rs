//! Domain data structures for menu items, money, and customers.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier of a menu item as issued by the menu source.
pub struct ItemId(pub String);

impl fmt::Display for ItemId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Meal services the kitchen runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    /// Midday service.
    Lunch,
    /// Evening service.
    Dinner,
}

impl Service {
    /// Both services in serving order.
    pub const ALL: [Service; 2] = [Service::Lunch, Service::Dinner];

    /// Parse the service names used by the menu webhook.
    ///
    /// `comida` is an older name for the evening service and maps to [`Service::Dinner`].
    #[must_use]
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "almuerzo" | "lunch" => Some(Service::Lunch),
            "cena" | "comida" | "dinner" => Some(Service::Dinner),
            _ => None,
        }
    }

    /// The other service.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Service::Lunch => Service::Dinner,
            Service::Dinner => Service::Lunch,
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Service::Lunch => "Lunch",
            Service::Dinner => "Dinner",
        };
        formatter.write_str(label)
    }
}

/// Whole Colombian pesos. Prices never carry minor units.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Pesos(pub u64);

impl Pesos {
    /// Zero pesos.
    pub const ZERO: Pesos = Pesos(0);

    /// Raw amount.
    #[must_use]
    pub fn amount(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Pesos {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (idx, digit) in digits.chars().enumerate() {
            if idx > 0 && (digits.len() - idx) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(digit);
        }
        write!(formatter, "${grouped}")
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid amount: {0:?}")]
/// Text could not be read back as an amount of pesos.
pub struct ParsePesosError(pub String);

impl FromStr for Pesos {
    type Err = ParsePesosError;

    /// Accepts the display form (`$13.000`) as well as bare digits.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let unsigned = trimmed.strip_prefix('$').unwrap_or(trimmed).trim_start();
        let digits: String = unsigned.chars().filter(|ch| *ch != '.').collect();
        if digits.is_empty() || !digits.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(ParsePesosError(raw.to_owned()));
        }
        digits
            .parse()
            .map(Pesos)
            .map_err(|_err| ParsePesosError(raw.to_owned()))
    }
}

impl Add for Pesos {
    type Output = Pesos;

    fn add(self, rhs: Pesos) -> Pesos {
        Pesos(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Pesos {
    type Output = Pesos;

    fn mul(self, quantity: u32) -> Pesos {
        Pesos(self.0.saturating_mul(u64::from(quantity)))
    }
}

impl Sum for Pesos {
    fn sum<I: Iterator<Item = Pesos>>(iter: I) -> Pesos {
        iter.fold(Pesos::ZERO, Add::add)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A dish or drink as published by the restaurant.
pub struct MenuItem {
    /// Unique identifier.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Base price per unit.
    pub price: Pesos,
    /// Services the item is offered in. Empty means every service.
    pub services: Vec<Service>,
    /// Category tags used for filtering.
    pub categories: Vec<String>,
    /// Weekdays the item is offered on. Empty means every day.
    pub days: Vec<Weekday>,
    /// Whether the kitchen can currently prepare it.
    pub available: bool,
    /// Whether the item can be packed for takeaway.
    pub takeaway: bool,
    /// Extra charge per unit when packed for takeaway.
    pub takeaway_surcharge: Option<Pesos>,
    /// Optional picture of the dish.
    pub image_url: Option<String>,
}

impl MenuItem {
    /// Whether the item is offered in the given service.
    #[must_use]
    pub fn served_in(&self, service: Service) -> bool {
        self.services.is_empty() || self.services.contains(&service)
    }

    /// Whether the item is offered on the given weekday.
    #[must_use]
    pub fn served_on(&self, weekday: Weekday) -> bool {
        self.days.is_empty() || self.days.contains(&weekday)
    }

    /// Whether the item carries the category tag.
    #[must_use]
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|tag| tag == category)
    }

    /// Whether the item can be added to a cart.
    #[must_use]
    pub fn orderable(&self) -> bool {
        self.available
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
/// How the order reaches the customer.
pub enum Fulfillment {
    /// Courier delivery to an address inside a delivery zone.
    Delivery {
        /// Street address.
        address: String,
        /// City of the delivery zone.
        city: String,
        /// Neighborhood of the delivery zone.
        neighborhood: String,
    },
    /// Customer collects the order at the restaurant.
    Pickup,
}

impl Fulfillment {
    /// Whether this is a delivery.
    #[must_use]
    pub fn is_delivery(&self) -> bool {
        matches!(self, Fulfillment::Delivery { .. })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// How the customer pays.
pub enum PaymentMethod {
    /// Cash on delivery or at the counter.
    #[default]
    Cash,
    /// Bank transfer before preparation.
    Transfer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Complete contact and fulfillment details of a customer.
pub struct CustomerInfo {
    /// Customer name.
    pub name: String,
    /// Contact phone.
    pub phone: String,
    /// Delivery or pickup.
    pub fulfillment: Fulfillment,
    /// Payment method.
    pub payment: PaymentMethod,
}
