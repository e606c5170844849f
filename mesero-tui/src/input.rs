use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use mesero_core::checkout::CheckoutStep;

use crate::app::{App, Field, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    Quit,
    /// Fetch the menu again
    ReloadMenu,
    /// Leave the UI and hand the composed order to WhatsApp
    SendOrder,
}

fn is_plain(key: KeyEvent) -> bool {
    !key.modifiers.contains(KeyModifiers::CONTROL) && !key.modifiers.contains(KeyModifiers::ALT)
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{BackTab, Backspace, Char, Down, Enter, Esc, Left, Right, Tab, Up};

    // Global quit shortcut; plain `q` only quits where nothing is typed
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    app.clear_messages();
    let mut action = Action::None;

    match app.screen {
        Screen::Menu => match key.code {
            Char('q') if key.modifiers.is_empty() => action = Action::Quit,
            Up | Char('k') => {
                app.item_index = app.item_index.saturating_sub(1);
            }
            Down | Char('j') => {
                if app.item_index + 1 < app.visible_items().len() {
                    app.item_index += 1;
                }
            }
            Tab | BackTab | Char('s') => app.switch_service(),
            Right | Char('l') => app.cycle_category(true),
            Left | Char('h') => app.cycle_category(false),
            Enter | Char(' ') => app.open_detail(),
            Char('c') => app.open_cart(),
            Char('r') => action = Action::ReloadMenu,
            _ => {}
        },

        Screen::ItemDetail => {
            let Some(detail) = app.detail.as_mut() else {
                app.screen = Screen::Menu;
                return action;
            };
            match key.code {
                Up | Right => detail.quantity = detail.quantity.saturating_add(1),
                Down | Left => {
                    if detail.quantity > 1 {
                        detail.quantity -= 1;
                    }
                }
                Tab => {
                    if detail.item.takeaway {
                        detail.takeaway = !detail.takeaway;
                    }
                }
                Char(character) if is_plain(key) => detail.notes.push(character),
                Backspace => {
                    detail.notes.pop();
                }
                Enter => app.add_detail_to_cart(),
                Esc => {
                    app.detail = None;
                    app.screen = Screen::Menu;
                }
                _ => {}
            }
        }

        Screen::Checkout => action = handle_checkout_key(key, app),
    }
    action
}

fn handle_checkout_key(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{BackTab, Backspace, Char, Delete, Down, Enter, Esc, Left, Right, Tab, Up};

    if let Some(notes) = app.notes_input.as_mut() {
        match key.code {
            Char(character) if is_plain(key) => notes.push(character),
            Backspace => {
                notes.pop();
            }
            Enter => app.commit_notes(),
            Esc => app.notes_input = None,
            _ => {}
        }
        return Action::None;
    }

    match (app.step(), key.code) {
        (_, Esc) => app.go_back(),

        (CheckoutStep::Cart, Up | Char('k')) => {
            app.cart_index = app.cart_index.saturating_sub(1);
        }
        (CheckoutStep::Cart, Down | Char('j')) => {
            if app.cart_index + 1 < app.cart.lines().len() {
                app.cart_index += 1;
            }
        }
        (CheckoutStep::Cart, Right | Char('+')) => app.change_quantity(true),
        (CheckoutStep::Cart, Left | Char('-')) => app.change_quantity(false),
        (CheckoutStep::Cart, Delete | Char('d')) => app.remove_line(),
        (CheckoutStep::Cart, Char('n')) => app.start_notes_edit(),
        (CheckoutStep::Cart, Char('q')) if key.modifiers.is_empty() => return Action::Quit,

        (CheckoutStep::Fulfillment, Up | Down | Left | Right | Tab | BackTab) => {
            app.toggle_fulfillment();
        }
        (CheckoutStep::Payment, Up | Down | Left | Right | Tab | BackTab) => {
            app.toggle_payment();
        }

        (CheckoutStep::PersonalInfo | CheckoutStep::Address, Tab) => app.cycle_field(true),
        (CheckoutStep::PersonalInfo | CheckoutStep::Address, BackTab) => app.cycle_field(false),
        (CheckoutStep::Address, Left) if app.field == Field::City => app.cycle_city(false),
        (CheckoutStep::Address, Right) if app.field == Field::City => app.cycle_city(true),
        (CheckoutStep::Address, Up) if app.field == Field::Neighborhood => {
            app.move_neighborhood(false);
        }
        (CheckoutStep::Address, Down) if app.field == Field::Neighborhood => {
            app.move_neighborhood(true);
        }
        (CheckoutStep::PersonalInfo | CheckoutStep::Address, Char(character)) if is_plain(key) => {
            app.type_char(character);
        }
        (CheckoutStep::PersonalInfo | CheckoutStep::Address, Backspace) => app.backspace(),

        (CheckoutStep::Dispatch, Enter) => return Action::SendOrder,
        (_, Enter) => app.advance(),
        _ => {}
    }
    Action::None
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use mesero_core::{
        catalog::{Menu, MenuSource},
        config::RestaurantConfig,
        model::Service,
        service::MeseroService,
    };
    use mesero_provider_webhook::{fallback_menu, plugin};
    use reqwest::Client;

    use super::*;

    fn app() -> App {
        let bundle = plugin(Client::new(), "http://127.0.0.1:9/menu");
        let service = Arc::new(MeseroService::new(
            Arc::new(RestaurantConfig::default()),
            bundle,
        ));
        let mut app = App::new(
            service,
            Menu::new(fallback_menu(), MenuSource::Fallback),
            None,
        );
        app.service_tab = Service::Lunch;
        let tuesday_lunch = NaiveDate::from_ymd_opt(2024, 12, 17)
            .and_then(|date| date.and_hms_opt(12, 30, 0))
            .expect("valid instant");
        app.set_clock(tuesday_lunch);
        app
    }

    fn press(app: &mut App, code: KeyCode) -> Action {
        handle_key_event(KeyEvent::new(code, KeyModifiers::NONE), app)
    }

    fn type_text(app: &mut App, text: &str) {
        for character in text.chars() {
            press(app, KeyCode::Char(character));
        }
    }

    #[test]
    fn quit_shortcuts() {
        let mut app = app();
        assert_eq!(
            handle_key_event(
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                &mut app
            ),
            Action::Quit
        );
        assert_eq!(press(&mut app, KeyCode::Char('q')), Action::Quit);
        assert_eq!(press(&mut app, KeyCode::Char('r')), Action::ReloadMenu);
    }

    #[test]
    fn typing_q_in_a_form_does_not_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::ItemDetail);

        type_text(&mut app, "queso");
        assert_eq!(
            app.detail.as_ref().map(|detail| detail.notes.as_str()),
            Some("queso")
        );

        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::Menu);

        let line = app.cart.lines().first().expect("line added");
        assert_eq!(line.quantity, 2);
        assert!(line.takeaway);
        assert_eq!(line.notes, "queso");
    }

    #[test]
    fn closed_service_keeps_the_menu() {
        let mut app = app();
        let christmas = NaiveDate::from_ymd_opt(2024, 12, 25)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .expect("valid instant");
        app.set_clock(christmas);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::Menu);
        assert!(app.error_message.is_some());
        assert!(app.cart.is_empty());
    }

    #[test]
    fn keyboard_checkout_for_pickup() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.screen, Screen::Checkout);

        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "bien asada");
        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.cart.lines().first().map(|line| line.notes.as_str()),
            Some("bien asada")
        );

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.step(), CheckoutStep::PersonalInfo);

        type_text(&mut app, "Ana");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "3005550101");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.step(), CheckoutStep::Payment);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.step(), CheckoutStep::Dispatch);
        let message = app
            .dispatch
            .as_ref()
            .map(|dispatch| dispatch.message.clone())
            .unwrap_or_default();
        assert!(message.contains("Transferencia al número: 300 123 4567"));
        assert!(message.contains("Notas: bien asada"));

        assert_eq!(press(&mut app, KeyCode::Enter), Action::SendOrder);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.step(), CheckoutStep::Payment);
        assert!(app.dispatch.is_none());
    }
}
