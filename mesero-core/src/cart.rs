//! Session cart holding the lines a customer is about to order.

use crate::model::{ItemId, MenuItem, Pesos};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Errors raised while editing the cart.
pub enum CartError {
    /// The item is marked as not available.
    #[error("{0} is not available right now")]
    Unavailable(String),
    /// Lines need at least one unit.
    #[error("Quantity must be at least 1")]
    ZeroQuantity,
    /// No line for the given item.
    #[error("Item {0} is not in the cart")]
    NotInCart(ItemId),
}

#[derive(Debug, Clone, PartialEq)]
/// One menu item with quantity and kitchen notes.
pub struct CartLine {
    /// Ordered item.
    pub item: MenuItem,
    /// Units, always at least one.
    pub quantity: u32,
    /// Free-text instructions for the kitchen.
    pub notes: String,
    /// Packed for takeaway, which may add a surcharge.
    pub takeaway: bool,
}

impl CartLine {
    /// Price of a single unit, including the takeaway surcharge when it applies.
    #[must_use]
    pub fn unit_price(&self) -> Pesos {
        crate::pricing::unit_price(&self.item, self.takeaway)
    }

    /// Price of the whole line.
    #[must_use]
    pub fn total(&self) -> Pesos {
        self.unit_price() * self.quantity
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Ordered collection of cart lines, at most one per item.
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add units of an item.
    ///
    /// An item already in the cart gets its quantity increased; non-empty notes replace
    /// the old ones and the takeaway choice follows the latest add. Takeaway is ignored
    /// for items that cannot be packed.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Unavailable`] for unavailable items and
    /// [`CartError::ZeroQuantity`] when `quantity` is zero.
    pub fn add(
        &mut self,
        item: &MenuItem,
        quantity: u32,
        notes: &str,
        takeaway: bool,
    ) -> Result<(), CartError> {
        if !item.orderable() {
            return Err(CartError::Unavailable(item.name.clone()));
        }
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        let takeaway = takeaway && item.takeaway;
        let notes = notes.trim();

        if let Some(line) = self.line_mut(&item.id) {
            line.quantity = line.quantity.saturating_add(quantity);
            if !notes.is_empty() {
                notes.clone_into(&mut line.notes);
            }
            line.takeaway = takeaway;
            return Ok(());
        }

        self.lines.push(CartLine {
            item: item.clone(),
            quantity,
            notes: notes.to_owned(),
            takeaway,
        });
        Ok(())
    }

    /// Drop the line for an item. Missing items are ignored.
    pub fn remove(&mut self, id: &ItemId) {
        self.lines.retain(|line| &line.item.id != id);
    }

    /// Set the quantity of a line; anything below one removes it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotInCart`] when the item has no line.
    pub fn set_quantity(&mut self, id: &ItemId, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            if !self.contains(id) {
                return Err(CartError::NotInCart(id.clone()));
            }
            self.remove(id);
            return Ok(());
        }
        let line = self
            .line_mut(id)
            .ok_or_else(|| CartError::NotInCart(id.clone()))?;
        line.quantity = quantity;
        Ok(())
    }

    /// Replace the notes of a line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotInCart`] when the item has no line.
    pub fn set_notes(&mut self, id: &ItemId, notes: &str) -> Result<(), CartError> {
        let line = self
            .line_mut(id)
            .ok_or_else(|| CartError::NotInCart(id.clone()))?;
        notes.trim().clone_into(&mut line.notes);
        Ok(())
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether an item has a line.
    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.lines.iter().any(|line| &line.item.id == id)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Pesos {
        crate::pricing::subtotal(&self.lines)
    }

    fn line_mut(&mut self, id: &ItemId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| &line.item.id == id)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::Service;

    pub(crate) fn dish(id: &str, name: &str, price: u64, surcharge: Option<u64>) -> MenuItem {
        MenuItem {
            id: ItemId(id.to_owned()),
            name: name.to_owned(),
            description: None,
            price: Pesos(price),
            services: vec![Service::Lunch],
            categories: vec!["almuerzo".to_owned()],
            days: Vec::new(),
            available: true,
            takeaway: true,
            takeaway_surcharge: surcharge.map(Pesos),
            image_url: None,
        }
    }

    #[test]
    fn adding_twice_merges_lines() {
        let carne = dish("carne", "Carne fresca", 13_000, Some(1_000));
        let mut cart = Cart::new();

        cart.add(&carne, 1, "sin cebolla", true).expect("add");
        cart.add(&carne, 2, "", true).expect("add again");

        assert_eq!(cart.lines().len(), 1);
        let line = cart.lines().first().expect("one line");
        assert_eq!(line.quantity, 3);
        assert_eq!(line.notes, "sin cebolla");
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn rejects_unavailable_and_zero_quantity() {
        let mut agotado = dish("x", "Mojarra", 20_000, None);
        agotado.available = false;
        let mut cart = Cart::new();

        assert_eq!(
            cart.add(&agotado, 1, "", false),
            Err(CartError::Unavailable("Mojarra".to_owned()))
        );
        assert_eq!(
            cart.add(&dish("y", "Sopa", 5_000, None), 0, "", false),
            Err(CartError::ZeroQuantity)
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn quantity_below_one_removes_line() {
        let sopa = dish("sopa", "Sopa", 5_000, None);
        let mut cart = Cart::new();
        cart.add(&sopa, 2, "", false).expect("add");

        cart.set_quantity(&sopa.id, 4).expect("update");
        assert_eq!(cart.item_count(), 4);

        cart.set_quantity(&sopa.id, 0).expect("remove");
        assert!(cart.is_empty());
        assert_eq!(
            cart.set_quantity(&sopa.id, 1),
            Err(CartError::NotInCart(sopa.id.clone()))
        );
    }

    #[test]
    fn takeaway_needs_packable_item() {
        let mut jugo = dish("jugo", "Jugo natural", 4_000, Some(500));
        jugo.takeaway = false;
        let mut cart = Cart::new();
        cart.add(&jugo, 1, "", true).expect("add");

        let line = cart.lines().first().expect("line");
        assert!(!line.takeaway);
        assert_eq!(line.total(), Pesos(4_000));
    }

    #[test]
    fn notes_and_clear() {
        let sopa = dish("sopa", "Sopa", 5_000, None);
        let mut cart = Cart::new();
        cart.add(&sopa, 1, "", false).expect("add");
        cart.set_notes(&sopa.id, "  bien caliente ").expect("notes");

        assert_eq!(
            cart.lines().first().map(|line| line.notes.as_str()),
            Some("bien caliente")
        );

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Pesos::ZERO);
    }
}
