//! High-level service facade used by front-ends.

use std::sync::Arc;

use chrono::{Datelike, NaiveDateTime, Utc};
use tracing::{info, warn};

use crate::cart::Cart;
use crate::catalog::{Menu, MenuSource};
use crate::config::RestaurantConfig;
use crate::model::{CustomerInfo, Fulfillment, Pesos, Service};
use crate::order::{format_message, whatsapp_link};
use crate::plugin::MenuPlugin;
use crate::ports::SourceMeta;
use crate::pricing::{PricingError, Quote, quote};
use crate::schedule::{Availability, Opening};

fn reopening_hint(next_opening: Option<&Opening>) -> String {
    next_opening
        .map(|opening| format!("; next opening: {opening}"))
        .unwrap_or_default()
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Reasons an order cannot be sent.
pub enum OrderError {
    /// Nothing to order.
    #[error("The cart is empty")]
    EmptyCart,
    /// The service is outside its ordering window, or the restaurant is closed.
    #[error("{service} is not taking orders right now{}", reopening_hint(.next_opening.as_ref()))]
    ServiceClosed {
        /// Service the order was for.
        service: Service,
        /// When the service takes orders again, if within the lookahead.
        next_opening: Option<Opening>,
    },
    /// A cart item is not offered in the ordered service or on this weekday.
    #[error("{item} is not offered for {service} today")]
    NotOffered {
        /// Item name.
        item: String,
        /// Service the order was for.
        service: Service,
    },
    /// The restaurant is not delivering.
    #[error("Delivery is not available, please choose pickup")]
    DeliveryDisabled,
    /// Delivery subtotal under the configured minimum.
    #[error("Delivery orders start at {minimum} (current subtotal {subtotal})")]
    BelowMinimum {
        /// Configured minimum.
        minimum: Pesos,
        /// Current subtotal.
        subtotal: Pesos,
    },
    /// Pricing failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Order ready to hand off to WhatsApp.
pub struct OrderDispatch {
    /// Customer the order is for.
    pub customer: CustomerInfo,
    /// Money breakdown.
    pub quote: Quote,
    /// Plain-text message.
    pub message: String,
    /// `wa.me` link carrying the encoded message.
    pub link: String,
}

/// Public entry point for loading the menu and pricing and sending orders.
pub struct MeseroService {
    config: Arc<RestaurantConfig>,
    plugin: MenuPlugin,
}

impl MeseroService {
    /// Create a new service bound to the configuration and menu plugin.
    #[must_use]
    pub fn new(config: Arc<RestaurantConfig>, plugin: MenuPlugin) -> Self {
        Self { config, plugin }
    }

    /// Restaurant configuration.
    #[must_use]
    pub fn config(&self) -> &RestaurantConfig {
        &self.config
    }

    /// Metadata of the menu backend.
    #[must_use]
    pub fn source(&self) -> &SourceMeta {
        &self.plugin.meta
    }

    /// Fetch the menu, substituting the built-in catalog when the backend fails.
    pub async fn load_menu(&self) -> Menu {
        match self.plugin.menu_port.fetch_menu().await {
            Ok(items) => {
                let menu = Menu::new(items, MenuSource::Remote);
                info!(
                    source = %self.plugin.meta.id,
                    items = menu.items().len(),
                    "menu loaded"
                );
                menu
            }
            Err(err) => {
                warn!(
                    source = %self.plugin.meta.id,
                    error = %err,
                    "menu unavailable, using built-in catalog"
                );
                Menu::new(self.plugin.fallback.clone(), MenuSource::Fallback)
            }
        }
    }

    /// Current restaurant local time.
    #[must_use]
    pub fn now(&self) -> NaiveDateTime {
        Utc::now()
            .with_timezone(&self.config.timezone())
            .naive_local()
    }

    /// Service availability at a local instant.
    #[must_use]
    pub fn availability(&self, now: NaiveDateTime) -> Availability {
        self.config.timetable.availability(now)
    }

    /// Check that `service` takes orders at the local instant `at`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::ServiceClosed`] with the next opening when it does not.
    pub fn ensure_open(&self, service: Service, at: NaiveDateTime) -> Result<(), OrderError> {
        let availability = self.availability(at);
        if availability.is_open(service) {
            return Ok(());
        }
        Err(OrderError::ServiceClosed {
            service,
            next_opening: availability.status(service).next_opening,
        })
    }

    /// Price the cart for a fulfillment choice.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Pricing`] when the delivery zone is unknown.
    pub fn quote(&self, cart: &Cart, fulfillment: &Fulfillment) -> Result<Quote, OrderError> {
        Ok(quote(cart.lines(), fulfillment, &self.config.zones)?)
    }

    /// Validate, price, and format an order for `service` placed at the local instant `at`.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderError`] for an empty cart, a closed service, an item not offered
    /// for the service, disabled delivery, a delivery below the minimum order, or an
    /// unknown delivery zone.
    pub fn compose_order(
        &self,
        cart: &Cart,
        customer: &CustomerInfo,
        service: Service,
        at: NaiveDateTime,
    ) -> Result<OrderDispatch, OrderError> {
        if cart.is_empty() {
            return Err(OrderError::EmptyCart);
        }
        self.ensure_open(service, at)?;
        if let Some(line) = cart
            .lines()
            .iter()
            .find(|line| !line.item.served_in(service) || !line.item.served_on(at.weekday()))
        {
            return Err(OrderError::NotOffered {
                item: line.item.name.clone(),
                service,
            });
        }

        let delivery = &self.config.delivery;
        if customer.fulfillment.is_delivery() {
            if !delivery.enabled {
                return Err(OrderError::DeliveryDisabled);
            }
            let subtotal = cart.subtotal();
            if subtotal < delivery.minimum_order {
                return Err(OrderError::BelowMinimum {
                    minimum: delivery.minimum_order,
                    subtotal,
                });
            }
        }

        let quote = self.quote(cart, &customer.fulfillment)?;
        let message = format_message(
            cart.lines(),
            customer,
            &quote,
            self.config.bank_account.as_deref(),
        );
        let link = whatsapp_link(&self.config.info.whatsapp, &message);
        info!(
            lines = cart.lines().len(),
            total = quote.total.amount(),
            delivery = customer.fulfillment.is_delivery(),
            %service,
            "order composed"
        );

        Ok(OrderDispatch {
            customer: customer.clone(),
            quote,
            message,
            link,
        })
    }
}
