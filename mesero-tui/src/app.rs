use std::sync::Arc;

use chrono::{Datelike, NaiveDateTime, Utc};
use mesero_core::{
    cache::CustomerCache,
    cart::Cart,
    catalog::{Menu, MenuFilter},
    checkout::{Checkout, CheckoutStep, FulfillmentKind},
    model::{ItemId, MenuItem, PaymentMethod, Pesos, Service},
    pricing::{City, Neighborhood, Quote, unit_price},
    schedule::Availability,
    service::{MeseroService, OrderDispatch, OrderError},
};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Menu,
    ItemDetail,
    Checkout,
}

/// Text field with keyboard focus on the form steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    Name,
    Phone,
    City,
    Neighborhood,
    Address,
}

impl Field {
    fn for_step(step: CheckoutStep) -> &'static [Field] {
        match step {
            CheckoutStep::PersonalInfo => &[Field::Name, Field::Phone],
            CheckoutStep::Address => &[Field::City, Field::Neighborhood, Field::Address],
            _ => &[],
        }
    }
}

/// Item being configured before it goes into the cart.
#[derive(Debug, Clone)]
pub(crate) struct ItemDraft {
    pub item: MenuItem,
    pub quantity: u32,
    pub notes: String,
    pub takeaway: bool,
}

impl ItemDraft {
    pub(crate) fn line_total(&self) -> Pesos {
        unit_price(&self.item, self.takeaway) * self.quantity
    }
}

pub(crate) struct App {
    pub service: Arc<MeseroService>,
    pub cache: Option<CustomerCache>,

    pub screen: Screen,
    pub menu: Menu,
    pub availability: Availability,
    /// Service the calculator suggested at the last refresh
    pub suggested_service: Service,
    pub service_tab: Service,
    pub category_index: usize,
    pub item_index: usize,

    pub detail: Option<ItemDraft>,

    pub cart: Cart,
    pub cart_index: usize,
    pub notes_input: Option<String>,

    pub checkout: Checkout,
    pub field: Field,
    pub neighborhood_search: String,
    pub neighborhood_index: usize,
    pub dispatch: Option<OrderDispatch>,

    pub is_loading: bool,
    pub error_message: Option<String>,
    pub notice: Option<String>,
}

impl App {
    pub(crate) fn new(
        service: Arc<MeseroService>,
        menu: Menu,
        cache: Option<CustomerCache>,
    ) -> Self {
        let availability = service.availability(service.now());
        let suggested_service = availability.suggested_service();
        let service_tab = service.config().auto_switch.initial(suggested_service);

        let draft = cache
            .as_ref()
            .and_then(|cache| cache.load(Utc::now()))
            .filter(|cached| cached.is_useful())
            .map(|cached| cached.to_draft())
            .unwrap_or_default();
        let notice = (!draft.name.is_empty()).then(|| format!("Welcome back, {}", draft.name));

        let mut app = Self {
            service,
            cache,
            screen: Screen::Menu,
            menu,
            availability,
            suggested_service,
            service_tab,
            category_index: 0,
            item_index: 0,
            detail: None,
            cart: Cart::new(),
            cart_index: 0,
            notes_input: None,
            checkout: Checkout::new(draft),
            field: Field::Name,
            neighborhood_search: String::new(),
            neighborhood_index: 0,
            dispatch: None,
            is_loading: false,
            error_message: None,
            notice,
        };
        app.ensure_city();
        app
    }

    pub(crate) fn refresh_availability(&mut self) {
        let now = self.service.now();
        self.set_clock(now);
    }

    /// Recompute availability for a local instant and follow the auto-switch rules.
    pub(crate) fn set_clock(&mut self, now: NaiveDateTime) {
        self.availability = self.service.availability(now);
        let suggested = self.availability.suggested_service();
        let followed = self.service.config().auto_switch.follow(
            self.service_tab,
            self.suggested_service,
            suggested,
        );
        self.suggested_service = suggested;
        if followed != self.service_tab && self.screen == Screen::Menu {
            info!(from = %self.service_tab, to = %followed, "switching service automatically");
            self.service_tab = followed;
            self.item_index = 0;
        }
    }

    /// Why the browsed service cannot take orders right now.
    pub(crate) fn ordering_problem(&self) -> Option<OrderError> {
        self.service
            .ensure_open(self.service_tab, self.availability.at)
            .err()
    }

    pub(crate) fn set_menu(&mut self, menu: Menu) {
        self.menu = menu;
        self.category_index = 0;
        self.item_index = 0;
    }

    pub(crate) fn clear_messages(&mut self) {
        self.error_message = None;
        self.notice = None;
    }

    // --- menu ---

    pub(crate) fn selected_category(&self) -> Option<&str> {
        let idx = self.category_index.checked_sub(1)?;
        self.menu.categories().get(idx).map(String::as_str)
    }

    pub(crate) fn filter(&self) -> MenuFilter {
        MenuFilter {
            service: self.service_tab,
            weekday: self.availability.at.weekday(),
            category: self.selected_category().map(str::to_owned),
        }
    }

    pub(crate) fn visible_items(&self) -> Vec<&MenuItem> {
        self.menu.visible(&self.filter())
    }

    /// Toggle lunch/dinner; a service that does not run today cannot be selected.
    pub(crate) fn switch_service(&mut self) {
        let target = self.service_tab.toggled();
        if !self.availability.status(target).enabled_today {
            self.error_message = Some(format!("No {target} service today"));
            return;
        }
        self.service_tab = target;
        self.item_index = 0;
    }

    pub(crate) fn cycle_category(&mut self, forward: bool) {
        // slot 0 is "all categories"
        let slots = self.menu.categories().len() + 1;
        self.category_index = if forward {
            (self.category_index + 1) % slots
        } else {
            (self.category_index + slots - 1) % slots
        };
        self.item_index = 0;
    }

    pub(crate) fn open_detail(&mut self) {
        let Some(item) = self.visible_items().get(self.item_index).map(|item| (*item).clone())
        else {
            return;
        };
        if !item.orderable() {
            self.error_message = Some(format!("{} is not available right now", item.name));
            return;
        }
        if let Some(problem) = self.ordering_problem() {
            self.error_message = Some(problem.to_string());
            return;
        }

        let existing = self
            .cart
            .lines()
            .iter()
            .find(|line| line.item.id == item.id)
            .map(|line| (line.notes.clone(), line.takeaway));
        let (notes, takeaway) = existing.unwrap_or_default();

        self.detail = Some(ItemDraft {
            item,
            quantity: 1,
            notes,
            takeaway,
        });
        self.screen = Screen::ItemDetail;
    }

    pub(crate) fn add_detail_to_cart(&mut self) {
        let Some(draft) = self.detail.take() else {
            self.screen = Screen::Menu;
            return;
        };

        match self
            .cart
            .add(&draft.item, draft.quantity, &draft.notes, draft.takeaway)
        {
            Ok(()) => {
                self.notice = Some(format!("Added {}x {}", draft.quantity, draft.item.name));
                self.screen = Screen::Menu;
            }
            Err(err) => {
                self.error_message = Some(err.to_string());
                self.detail = Some(draft);
            }
        }
    }

    // --- cart ---

    pub(crate) fn open_cart(&mut self) {
        self.checkout.restart();
        self.dispatch = None;
        self.clamp_cart_index();
        self.screen = Screen::Checkout;
    }

    fn clamp_cart_index(&mut self) {
        self.cart_index = self.cart_index.min(self.cart.lines().len().saturating_sub(1));
    }

    fn selected_line_id(&self) -> Option<ItemId> {
        self.cart
            .lines()
            .get(self.cart_index)
            .map(|line| line.item.id.clone())
    }

    pub(crate) fn change_quantity(&mut self, increase: bool) {
        let Some(line) = self.cart.lines().get(self.cart_index) else {
            return;
        };
        let id = line.item.id.clone();
        let quantity = if increase {
            line.quantity.saturating_add(1)
        } else {
            line.quantity.saturating_sub(1)
        };

        if let Err(err) = self.cart.set_quantity(&id, quantity) {
            self.error_message = Some(err.to_string());
        }
        self.clamp_cart_index();
    }

    pub(crate) fn remove_line(&mut self) {
        if let Some(id) = self.selected_line_id() {
            self.cart.remove(&id);
            self.clamp_cart_index();
        }
    }

    pub(crate) fn start_notes_edit(&mut self) {
        if let Some(line) = self.cart.lines().get(self.cart_index) {
            self.notes_input = Some(line.notes.clone());
        }
    }

    pub(crate) fn commit_notes(&mut self) {
        let Some(notes) = self.notes_input.take() else {
            return;
        };
        if let Some(id) = self.selected_line_id()
            && let Err(err) = self.cart.set_notes(&id, &notes)
        {
            self.error_message = Some(err.to_string());
        }
    }

    // --- checkout ---

    pub(crate) fn cities(&self) -> &[City] {
        &self.service.config().zones.cities
    }

    pub(crate) fn neighborhoods(&self) -> Vec<&Neighborhood> {
        self.service
            .config()
            .zones
            .neighborhoods(&self.checkout.draft.city, &self.neighborhood_search)
    }

    fn ensure_city(&mut self) {
        if self.checkout.draft.city.is_empty()
            && let Some(first) = self.cities().first().map(|city| city.name.clone())
        {
            self.checkout.draft.select_city(&first);
        }
        self.neighborhood_index = self
            .neighborhoods()
            .iter()
            .position(|neighborhood| neighborhood.name == self.checkout.draft.neighborhood)
            .unwrap_or(0);
    }

    pub(crate) fn cycle_city(&mut self, forward: bool) {
        let count = self.cities().len();
        if count == 0 {
            return;
        }
        let current = self
            .cities()
            .iter()
            .position(|city| city.name == self.checkout.draft.city)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % count
        } else {
            (current + count - 1) % count
        };

        if let Some(name) = self.cities().get(next).map(|city| city.name.clone()) {
            self.checkout.draft.select_city(&name);
        }
        self.neighborhood_search.clear();
        self.neighborhood_index = 0;
    }

    pub(crate) fn move_neighborhood(&mut self, down: bool) {
        let count = self.neighborhoods().len();
        if down {
            if self.neighborhood_index + 1 < count {
                self.neighborhood_index += 1;
            }
        } else {
            self.neighborhood_index = self.neighborhood_index.saturating_sub(1);
        }
    }

    fn sync_neighborhood(&mut self) {
        let chosen = self
            .neighborhoods()
            .get(self.neighborhood_index)
            .map(|neighborhood| neighborhood.name.clone());
        match chosen {
            Some(name) => self.checkout.draft.neighborhood = name,
            None => self.checkout.draft.neighborhood.clear(),
        }
    }

    pub(crate) fn step(&self) -> CheckoutStep {
        self.checkout.step()
    }

    fn focus_first_field(&mut self) {
        if let Some(first) = Field::for_step(self.step()).first() {
            self.field = *first;
        }
    }

    pub(crate) fn cycle_field(&mut self, forward: bool) {
        let fields = Field::for_step(self.step());
        let Some(current) = fields.iter().position(|field| *field == self.field) else {
            self.focus_first_field();
            return;
        };
        let count = fields.len();
        let next = if forward {
            (current + 1) % count
        } else {
            (current + count - 1) % count
        };
        if let Some(field) = fields.get(next) {
            self.field = *field;
        }
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        let draft = &mut self.checkout.draft;
        match self.field {
            Field::Name => Some(&mut draft.name),
            Field::Phone => Some(&mut draft.phone),
            Field::Address => Some(&mut draft.address),
            Field::Neighborhood => Some(&mut self.neighborhood_search),
            Field::City => None,
        }
    }

    pub(crate) fn type_char(&mut self, ch: char) {
        if let Some(text) = self.focused_text() {
            text.push(ch);
        }
        if self.field == Field::Neighborhood {
            self.neighborhood_index = 0;
        }
    }

    pub(crate) fn backspace(&mut self) {
        if let Some(text) = self.focused_text() {
            text.pop();
        }
        if self.field == Field::Neighborhood {
            self.neighborhood_index = 0;
        }
    }

    pub(crate) fn toggle_fulfillment(&mut self) {
        let draft = &mut self.checkout.draft;
        draft.fulfillment = match draft.fulfillment {
            FulfillmentKind::Delivery => FulfillmentKind::Pickup,
            FulfillmentKind::Pickup => FulfillmentKind::Delivery,
        };
    }

    pub(crate) fn toggle_payment(&mut self) {
        let draft = &mut self.checkout.draft;
        draft.payment = match draft.payment {
            PaymentMethod::Cash => PaymentMethod::Transfer,
            PaymentMethod::Transfer => PaymentMethod::Cash,
        };
    }

    /// Reason the current cart cannot be delivered.
    pub(crate) fn delivery_problem(&self) -> Option<OrderError> {
        let delivery = &self.service.config().delivery;
        if !delivery.enabled {
            return Some(OrderError::DeliveryDisabled);
        }
        let subtotal = self.cart.subtotal();
        (subtotal < delivery.minimum_order).then_some(OrderError::BelowMinimum {
            minimum: delivery.minimum_order,
            subtotal,
        })
    }

    /// Totals for the details entered so far.
    pub(crate) fn quote(&self) -> Option<Quote> {
        let customer = self
            .checkout
            .draft
            .finish(&self.service.config().zones)
            .ok()?;
        self.service.quote(&self.cart, &customer.fulfillment).ok()
    }

    pub(crate) fn advance(&mut self) {
        if let Some(problem) = self.ordering_problem() {
            self.error_message = Some(problem.to_string());
            return;
        }
        if self.step() == CheckoutStep::Fulfillment
            && self.checkout.draft.fulfillment == FulfillmentKind::Delivery
            && let Some(problem) = self.delivery_problem()
        {
            self.error_message = Some(problem.to_string());
            return;
        }
        if self.step() == CheckoutStep::Address {
            self.sync_neighborhood();
        }

        match self.checkout.next(&self.cart, &self.service.config().zones) {
            Ok(CheckoutStep::Dispatch) => self.compose(),
            Ok(CheckoutStep::Address) => {
                self.ensure_city();
                self.focus_first_field();
            }
            Ok(_) => self.focus_first_field(),
            Err(err) => self.error_message = Some(err.to_string()),
        }
    }

    fn compose(&mut self) {
        let composed = self
            .checkout
            .draft
            .finish(&self.service.config().zones)
            .map_err(|err| err.to_string())
            .and_then(|customer| {
                self.service
                    .compose_order(
                        &self.cart,
                        &customer,
                        self.service_tab,
                        self.availability.at,
                    )
                    .map_err(|err| err.to_string())
            });

        match composed {
            Ok(dispatch) => self.dispatch = Some(dispatch),
            Err(message) => {
                self.error_message = Some(message);
                self.checkout.back();
                self.focus_first_field();
            }
        }
    }

    pub(crate) fn go_back(&mut self) {
        if self.step() == CheckoutStep::Cart {
            self.screen = Screen::Menu;
            return;
        }
        self.dispatch = None;
        self.checkout.back();
        self.focus_first_field();
    }

    /// Remember the customer and hand back the link to open.
    pub(crate) fn finish_dispatch(&mut self) -> Option<String> {
        let dispatch = self.dispatch.take()?;

        if let Some(cache) = &self.cache
            && let Err(err) = cache.save(&self.checkout.draft, Utc::now())
        {
            warn!(error = %err, path = %cache.path().display(), "could not store customer details");
        }
        info!(total = dispatch.quote.total.amount(), "order handed off to WhatsApp");

        self.cart.clear();
        self.checkout = Checkout::new(self.checkout.draft.clone());
        Some(dispatch.link)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use mesero_core::{
        catalog::MenuSource,
        config::{AutoSwitch, RestaurantConfig},
    };
    use mesero_provider_webhook::{fallback_menu, plugin};
    use reqwest::Client;

    use super::*;

    fn instant(month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
            .expect("valid test instant")
    }

    fn app_with(config: RestaurantConfig, cache: Option<CustomerCache>) -> App {
        // never fetched: the menu is passed in directly
        let bundle = plugin(Client::new(), "http://127.0.0.1:9/menu");
        let service = Arc::new(MeseroService::new(Arc::new(config), bundle));
        let mut app = App::new(
            service,
            Menu::new(fallback_menu(), MenuSource::Fallback),
            cache,
        );
        app.service_tab = Service::Lunch;
        // Tuesday, lunch open
        app.set_clock(instant(12, 17, 12, 30));
        app
    }

    fn app() -> App {
        app_with(RestaurantConfig::default(), None)
    }

    fn add_carne(app: &mut App, quantity: u32) {
        app.item_index = 0;
        app.open_detail();
        let detail = app.detail.as_mut().expect("detail open");
        detail.quantity = quantity;
        app.add_detail_to_cart();
    }

    #[test]
    fn browsing_filters_by_service_and_category() {
        let mut app = app();
        assert_eq!(app.visible_items().len(), 2);

        app.switch_service();
        assert!(app.visible_items().is_empty(), "fallback menu is lunch only");

        app.switch_service();
        app.cycle_category(true);
        assert_eq!(app.selected_category(), Some("almuerzo"));
        app.cycle_category(true);
        assert_eq!(app.selected_category(), None);
        app.cycle_category(false);
        assert_eq!(app.selected_category(), Some("almuerzo"));
    }

    #[test]
    fn detail_adds_to_cart() {
        let mut app = app();
        add_carne(&mut app, 2);

        assert_eq!(app.screen, Screen::Menu);
        assert_eq!(app.cart.item_count(), 2);
        assert_eq!(app.cart.subtotal(), Pesos(26_000));
        assert!(app.notice.is_some());
    }

    #[test]
    fn cart_edits() {
        let mut app = app();
        add_carne(&mut app, 1);
        app.open_cart();

        app.change_quantity(true);
        assert_eq!(app.cart.item_count(), 2);

        app.start_notes_edit();
        app.notes_input = Some("sin cebolla".to_owned());
        app.commit_notes();
        assert_eq!(
            app.cart.lines().first().map(|line| line.notes.as_str()),
            Some("sin cebolla")
        );

        app.remove_line();
        assert!(app.cart.is_empty());
    }

    #[test]
    fn pickup_checkout_reaches_dispatch() {
        let mut app = app();
        add_carne(&mut app, 1);
        app.open_cart();

        app.advance();
        assert_eq!(app.step(), CheckoutStep::Fulfillment);
        app.toggle_fulfillment();
        app.advance();
        assert_eq!(app.step(), CheckoutStep::PersonalInfo);

        app.advance();
        assert!(app.error_message.is_some(), "name is required");
        app.clear_messages();

        for ch in "Ana".chars() {
            app.type_char(ch);
        }
        app.cycle_field(true);
        for ch in "3005550101".chars() {
            app.type_char(ch);
        }
        app.advance();
        assert_eq!(app.step(), CheckoutStep::Payment, "pickup skips the address");

        app.advance();
        assert_eq!(app.step(), CheckoutStep::Dispatch);
        let dispatch = app.dispatch.as_ref().expect("composed");
        assert_eq!(dispatch.quote.total, Pesos(13_000));
        assert!(dispatch.message.contains("Para recoger en el local"));

        let link = app.finish_dispatch().expect("link");
        assert!(link.starts_with("https://wa.me/573166193963?text="));
        assert!(app.cart.is_empty());
    }

    #[test]
    fn delivery_checks_minimum_then_prices_zone() {
        let mut app = app();
        add_carne(&mut app, 1);
        app.open_cart();
        app.advance();

        app.advance();
        assert_eq!(app.step(), CheckoutStep::Fulfillment, "13.000 is below the minimum");
        assert!(app.error_message.is_some());
        app.clear_messages();

        app.screen = Screen::Menu;
        add_carne(&mut app, 1);
        app.open_cart();
        app.advance();
        app.advance();
        assert_eq!(app.step(), CheckoutStep::PersonalInfo);

        app.checkout.draft.name = "Ana".to_owned();
        app.checkout.draft.phone = "3005550101".to_owned();
        app.advance();
        assert_eq!(app.step(), CheckoutStep::Address);
        assert_eq!(app.checkout.draft.city, "Floridablanca");
        assert_eq!(app.field, Field::City);

        app.cycle_field(true);
        for ch in "cal".chars() {
            app.type_char(ch);
        }
        assert_eq!(
            app.neighborhoods().first().map(|hood| hood.name.as_str()),
            Some("Caldas")
        );
        app.cycle_field(true);
        for ch in "Calle 200 #10-20".chars() {
            app.type_char(ch);
        }
        app.advance();
        assert_eq!(app.step(), CheckoutStep::Payment);
        assert_eq!(app.checkout.draft.neighborhood, "Caldas");
        assert_eq!(app.quote().map(|quote| quote.total), Some(Pesos(30_000)));
    }

    #[test]
    fn cached_customer_prefills_and_is_saved() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("customer.json");

        let mut app = app_with(
            RestaurantConfig::default(),
            Some(CustomerCache::new(&path)),
        );
        add_carne(&mut app, 1);
        app.checkout.draft.name = "Ana".to_owned();
        app.checkout.draft.phone = "3005550101".to_owned();
        app.checkout.draft.fulfillment = FulfillmentKind::Pickup;
        app.open_cart();
        for _ in 0..4 {
            app.advance();
        }
        assert_eq!(app.step(), CheckoutStep::Dispatch);
        app.finish_dispatch().expect("link");

        let again = app_with(
            RestaurantConfig::default(),
            Some(CustomerCache::new(&path)),
        );
        assert_eq!(again.checkout.draft.name, "Ana");
        assert_eq!(again.checkout.draft.fulfillment, FulfillmentKind::Pickup);
        assert!(again.notice.is_some());
    }

    #[test]
    fn unavailable_items_cannot_be_opened() {
        let mut items = fallback_menu();
        if let Some(first) = items.first_mut() {
            first.available = false;
        }
        let mut app = app();
        app.set_menu(Menu::new(items, MenuSource::Remote));

        app.open_detail();
        assert_eq!(app.screen, Screen::Menu);
        assert!(app.error_message.is_some());
        assert!(!app.cart.contains(&ItemId(
            "a4d1a8ea-e0ae-4491-8c1f-3461bf56c726".to_owned()
        )));
    }

    #[test]
    fn closed_monday_blocks_ordering() {
        let mut app = app();
        app.set_clock(instant(12, 16, 12, 0));

        app.open_detail();
        assert_eq!(app.screen, Screen::Menu);
        let message = app.error_message.take().expect("closed message");
        assert!(message.contains("Lunch on Tue 17/12 at 11:00"), "{message}");

        app.switch_service();
        assert_eq!(app.service_tab, Service::Lunch, "no dinner on a closed day");
    }

    #[test]
    fn christmas_blocks_checkout_of_a_filled_cart() {
        let mut app = app();
        add_carne(&mut app, 2);
        app.checkout.draft.name = "Ana".to_owned();
        app.checkout.draft.phone = "3005550101".to_owned();
        app.checkout.draft.fulfillment = FulfillmentKind::Pickup;
        app.open_cart();
        app.advance();
        app.advance();
        app.advance();
        assert_eq!(app.step(), CheckoutStep::Payment);

        app.set_clock(instant(12, 25, 12, 0));
        app.advance();
        assert_eq!(app.step(), CheckoutStep::Payment);
        assert!(app.dispatch.is_none());
        assert!(app.error_message.is_some());
    }

    #[test]
    fn dinner_before_its_window_cannot_be_ordered() {
        let mut app = app();
        app.set_clock(instant(12, 17, 10, 0));
        app.switch_service();
        assert_eq!(app.service_tab, Service::Dinner, "dinner runs later today");

        assert!(matches!(
            app.ordering_problem(),
            Some(OrderError::ServiceClosed {
                service: Service::Dinner,
                ..
            })
        ));
    }

    #[test]
    fn auto_switch_moves_to_dinner_when_it_opens() {
        let mut app = app();
        app.set_clock(instant(12, 17, 14, 59));
        assert_eq!(app.service_tab, Service::Lunch);

        app.set_clock(instant(12, 17, 18, 0));
        assert_eq!(app.service_tab, Service::Dinner);

        let mut config = RestaurantConfig::default();
        config.auto_switch = AutoSwitch {
            to_lunch: true,
            to_dinner: false,
        };
        let mut manual = app_with(config, None);
        manual.set_clock(instant(12, 17, 18, 0));
        assert_eq!(manual.service_tab, Service::Lunch);
    }
}
