//! Checkout wizard: collects customer details step by step.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::model::{CustomerInfo, Fulfillment, PaymentMethod};
use crate::pricing::DeliveryZones;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Reasons a checkout step cannot be completed.
pub enum CheckoutError {
    /// Nothing to order.
    #[error("The cart is empty")]
    EmptyCart,
    /// Name not filled in.
    #[error("Please enter your name")]
    MissingName,
    /// Phone not filled in.
    #[error("Please enter a phone number")]
    MissingPhone,
    /// Delivery without street address.
    #[error("Please enter the delivery address")]
    MissingAddress,
    /// Delivery without city.
    #[error("Please choose a city")]
    MissingCity,
    /// Delivery to a neighborhood that has no fee.
    #[error("We do not deliver to {neighborhood:?} in {city}")]
    UnknownNeighborhood {
        /// Chosen city.
        city: String,
        /// Chosen neighborhood.
        neighborhood: String,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Fulfillment choice before the address is known.
pub enum FulfillmentKind {
    /// Courier delivery.
    #[default]
    Delivery,
    /// Pickup at the restaurant.
    Pickup,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Checkout form fields as typed so far.
pub struct CustomerDraft {
    /// Customer name.
    pub name: String,
    /// Contact phone.
    pub phone: String,
    /// Street address.
    pub address: String,
    /// Delivery city.
    pub city: String,
    /// Delivery neighborhood.
    pub neighborhood: String,
    /// Payment method.
    pub payment: PaymentMethod,
    /// Delivery or pickup.
    pub fulfillment: FulfillmentKind,
}

impl CustomerDraft {
    /// Choose a city, resetting the neighborhood.
    pub fn select_city(&mut self, city: &str) {
        if self.city != city {
            city.clone_into(&mut self.city);
            self.neighborhood.clear();
        }
    }

    fn check_contact(&self) -> Result<(), CheckoutError> {
        if self.name.trim().is_empty() {
            return Err(CheckoutError::MissingName);
        }
        if self.phone.trim().is_empty() {
            return Err(CheckoutError::MissingPhone);
        }
        Ok(())
    }

    fn check_address(&self, zones: &DeliveryZones) -> Result<(), CheckoutError> {
        if self.fulfillment == FulfillmentKind::Pickup {
            return Ok(());
        }
        if self.city.is_empty() {
            return Err(CheckoutError::MissingCity);
        }
        if zones.fee(&self.city, &self.neighborhood).is_none() {
            return Err(CheckoutError::UnknownNeighborhood {
                city: self.city.clone(),
                neighborhood: self.neighborhood.clone(),
            });
        }
        if self.address.trim().is_empty() {
            return Err(CheckoutError::MissingAddress);
        }
        Ok(())
    }

    /// Validate every field and build the customer record.
    ///
    /// # Errors
    ///
    /// Returns the first [`CheckoutError`] found.
    pub fn finish(&self, zones: &DeliveryZones) -> Result<CustomerInfo, CheckoutError> {
        self.check_contact()?;
        self.check_address(zones)?;

        let fulfillment = match self.fulfillment {
            FulfillmentKind::Pickup => Fulfillment::Pickup,
            FulfillmentKind::Delivery => Fulfillment::Delivery {
                address: self.address.trim().to_owned(),
                city: self.city.clone(),
                neighborhood: self.neighborhood.clone(),
            },
        };
        Ok(CustomerInfo {
            name: self.name.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            fulfillment,
            payment: self.payment,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Wizard steps in order.
pub enum CheckoutStep {
    /// Reviewing the cart.
    Cart,
    /// Choosing delivery or pickup.
    Fulfillment,
    /// Name and phone.
    PersonalInfo,
    /// City, neighborhood, and street address; deliveries only.
    Address,
    /// Cash or transfer.
    Payment,
    /// Order ready to send.
    Dispatch,
}

impl CheckoutStep {
    const ORDER: [CheckoutStep; 6] = [
        CheckoutStep::Cart,
        CheckoutStep::Fulfillment,
        CheckoutStep::PersonalInfo,
        CheckoutStep::Address,
        CheckoutStep::Payment,
        CheckoutStep::Dispatch,
    ];

    /// Short title for headers.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            CheckoutStep::Cart => "Cart",
            CheckoutStep::Fulfillment => "Delivery or pickup",
            CheckoutStep::PersonalInfo => "Personal details",
            CheckoutStep::Address => "Address",
            CheckoutStep::Payment => "Payment",
            CheckoutStep::Dispatch => "Send order",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Wizard state: current step plus the draft being filled in.
pub struct Checkout {
    step: CheckoutStep,
    /// Form fields.
    pub draft: CustomerDraft,
}

impl Checkout {
    /// Start at the cart step with a pre-filled draft.
    #[must_use]
    pub fn new(draft: CustomerDraft) -> Self {
        Self {
            step: CheckoutStep::Cart,
            draft,
        }
    }

    /// Current step.
    #[must_use]
    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    /// Steps that apply to the current fulfillment choice.
    #[must_use]
    pub fn steps(&self) -> Vec<CheckoutStep> {
        CheckoutStep::ORDER
            .into_iter()
            .filter(|step| self.applies(*step))
            .collect()
    }

    /// One-based position of the current step and the number of steps.
    #[must_use]
    pub fn progress(&self) -> (usize, usize) {
        let steps = self.steps();
        let position = steps
            .iter()
            .position(|step| *step == self.step)
            .map_or(1, |idx| idx + 1);
        (position, steps.len())
    }

    fn applies(&self, step: CheckoutStep) -> bool {
        step != CheckoutStep::Address || self.draft.fulfillment == FulfillmentKind::Delivery
    }

    /// Check that the current step is complete.
    ///
    /// # Errors
    ///
    /// Returns the [`CheckoutError`] blocking the step.
    pub fn validate(&self, cart: &Cart, zones: &DeliveryZones) -> Result<(), CheckoutError> {
        match self.step {
            CheckoutStep::Cart => {
                if cart.is_empty() {
                    Err(CheckoutError::EmptyCart)
                } else {
                    Ok(())
                }
            }
            CheckoutStep::Fulfillment => Ok(()),
            CheckoutStep::PersonalInfo => self.draft.check_contact(),
            CheckoutStep::Address => self.draft.check_address(zones),
            CheckoutStep::Payment | CheckoutStep::Dispatch => {
                if cart.is_empty() {
                    return Err(CheckoutError::EmptyCart);
                }
                self.draft.finish(zones).map(|_| ())
            }
        }
    }

    /// Advance to the next applicable step once the current one is complete.
    ///
    /// # Errors
    ///
    /// Returns the [`CheckoutError`] blocking the current step; the step does not change.
    pub fn next(
        &mut self,
        cart: &Cart,
        zones: &DeliveryZones,
    ) -> Result<CheckoutStep, CheckoutError> {
        self.validate(cart, zones)?;
        let following = CheckoutStep::ORDER
            .into_iter()
            .skip_while(|step| *step != self.step)
            .skip(1)
            .find(|step| self.applies(*step));
        if let Some(next) = following {
            self.step = next;
        }
        Ok(self.step)
    }

    /// Go back to the previous applicable step.
    pub fn back(&mut self) -> CheckoutStep {
        let preceding = CheckoutStep::ORDER
            .into_iter()
            .rev()
            .skip_while(|step| *step != self.step)
            .skip(1)
            .find(|step| self.applies(*step));
        if let Some(previous) = preceding {
            self.step = previous;
        }
        self.step
    }

    /// Return to the cart, keeping the draft.
    pub fn restart(&mut self) {
        self.step = CheckoutStep::Cart;
    }
}
