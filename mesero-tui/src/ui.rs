use chrono::NaiveDate;
use mesero_core::{
    catalog::MenuSource,
    checkout::{CheckoutStep, FulfillmentKind},
    model::{PaymentMethod, Service},
    schedule::{Opening, ServiceStatus},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, Tabs, Wrap},
};

use crate::app::{App, Field, Screen};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    let info = &app.service.config().info;
    let header = Paragraph::new(format!(
        "{} · {} · cart: {} item(s), {}",
        info.name,
        info.address,
        app.cart.item_count(),
        app.cart.subtotal()
    ))
    .block(Block::default().borders(Borders::ALL).title("Mesero"));
    frame.render_widget(header, *header_area);

    match app.screen {
        Screen::Menu => draw_menu(frame, app, *content_area),
        Screen::ItemDetail => draw_item_detail(frame, app, *content_area),
        Screen::Checkout => draw_checkout(frame, app, *content_area),
    }

    let nav_hint = nav_hint(app);
    let status_text = if app.is_loading {
        format!("Loading… · {nav_hint}")
    } else if let Some(msg) = app.error_message.as_ref().or(app.notice.as_ref()) {
        format!("{msg} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else if app.is_loading {
        Style::default().fg(Color::Yellow)
    } else if app.notice.is_some() {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn nav_hint(app: &App) -> &'static str {
    match app.screen {
        Screen::Menu => {
            "↑/↓ move · Tab lunch/dinner · ←/→ category · Enter choose · c cart · r reload · q quit"
        }
        Screen::ItemDetail => "↑/↓ quantity · Tab takeaway · type notes · Enter add · Esc back",
        Screen::Checkout if app.notes_input.is_some() => "Type notes · Enter save · Esc cancel",
        Screen::Checkout => match app.step() {
            CheckoutStep::Cart => {
                "↑/↓ move · ←/→ quantity · n notes · d remove · Enter continue · Esc menu"
            }
            CheckoutStep::Fulfillment | CheckoutStep::Payment => {
                "↑/↓ change · Enter continue · Esc back"
            }
            CheckoutStep::PersonalInfo => "Type · Tab next field · Enter continue · Esc back",
            CheckoutStep::Address => {
                "Tab field · ←/→ city · type to search, ↑/↓ pick neighborhood · Enter continue"
            }
            CheckoutStep::Dispatch => "Enter send via WhatsApp · Esc back · Ctrl-C quit",
        },
    }
}

fn highlight() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

fn bordered(title: impl Into<String>) -> Block<'static> {
    Block::default().borders(Borders::ALL).title(title.into())
}

// --- menu ---

fn draw_menu(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // availability and daily menu
            Constraint::Length(3), // service tabs
            Constraint::Min(0),    // items
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [banner_area, tabs_area, list_area] = chunks else {
        return;
    };

    frame.render_widget(availability_banner(app), *banner_area);

    let category = app.selected_category().unwrap_or("all");
    let tabs = Tabs::new(
        Service::ALL
            .iter()
            .map(|service| {
                let status = app.availability.status(*service);
                if status.open_now {
                    Line::from(format!("{service} ●"))
                } else if status.enabled_today {
                    Line::from(service.to_string())
                } else {
                    Line::styled(service.to_string(), Style::default().fg(Color::DarkGray))
                }
            })
            .collect::<Vec<_>>(),
    )
    .select(usize::from(app.service_tab == Service::Dinner))
    .highlight_style(highlight())
    .block(bordered(format!("Service · category: {category} (←/→)")));
    frame.render_widget(tabs, *tabs_area);

    if app.availability.closed_today {
        let reason = app.availability.reason.as_deref().unwrap_or("Closed today");
        let mut lines = vec![
            Line::styled(format!("Closed today: {reason}"), highlight()),
            Line::from(""),
        ];
        if let Some(opening) = app.availability.next_opening() {
            lines.push(Line::from(format!("We take orders again: {opening}.")));
        }
        let closed = Paragraph::new(lines)
            .block(bordered("Menu"))
            .wrap(Wrap { trim: true });
        frame.render_widget(closed, *list_area);
        return;
    }

    let visible = app.visible_items();
    let items = if visible.is_empty() {
        vec![ListItem::new(format!(
            "Nothing on the {} menu for this category today.",
            app.service_tab
        ))]
    } else {
        visible
            .iter()
            .map(|item| {
                let price = item.price.to_string();
                let mut label = format!("{:<32} {price:>9}", item.name);
                if !item.available {
                    label.push_str("  sold out");
                } else if item.takeaway {
                    label.push_str("  para llevar");
                }
                let style = if item.orderable() {
                    Style::default()
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                ListItem::new(label).style(style)
            })
            .collect()
    };

    let title = match app.menu.source() {
        MenuSource::Remote => "Menu (Enter to choose)",
        MenuSource::Fallback => "Menu (offline catalog, r to retry)",
    };
    let list = List::new(items)
        .block(bordered(title))
        .highlight_style(highlight());

    let mut state = ListState::default();
    if !visible.is_empty() {
        state.select(Some(app.item_index));
    }
    frame.render_stateful_widget(list, *list_area, &mut state);
}

fn availability_banner(app: &App) -> Paragraph<'static> {
    let availability = &app.availability;
    let today = availability.at.date();
    let mut lines = Vec::new();
    let daily_menu = &app.service.config().daily_menu;

    if availability.closed_today {
        let reason = availability.reason.as_deref().unwrap_or("Closed today");
        lines.push(Line::styled(
            format!("Closed today: {reason}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    } else if let Some(reason) = availability.reason.as_deref() {
        lines.push(Line::styled(
            format!("Special schedule: {reason}"),
            Style::default().fg(Color::Cyan),
        ));
    }

    for service in Service::ALL {
        lines.push(service_line(availability.status(service), today));
    }

    if !availability.any_open()
        && let Some(opening) = availability.next_opening()
    {
        lines.push(Line::from(format!(
            "Orders are taken again {}",
            opening_label(opening, today)
        )));
    }

    if let Some(specials) = daily_menu.specials() {
        lines.push(Line::styled(
            format!("Hoy: {specials}"),
            Style::default().fg(Color::Cyan),
        ));
    }
    lines.push(Line::styled(
        format!("Menu board: {}", daily_menu.current_image(availability.at)),
        Style::default().fg(Color::DarkGray),
    ));

    Paragraph::new(lines)
        .block(bordered(format!(
            "Hours · {}",
            availability.at.format("%a %d/%m %H:%M")
        )))
        .wrap(Wrap { trim: true })
}

fn service_line(status: &ServiceStatus, today: NaiveDate) -> Line<'static> {
    let service = status.service;
    if status.open_now {
        let until = status
            .window
            .map(|window| format!(" until {}", window.end.format("%H:%M")))
            .unwrap_or_default();
        return Line::styled(
            format!("{service}: open now{until}"),
            Style::default().fg(Color::Green),
        );
    }
    match &status.next_opening {
        Some(opening) => Line::styled(
            format!("{service}: opens {}", opening_label(opening, today)),
            Style::default().fg(Color::Yellow),
        ),
        None => Line::styled(
            format!("{service}: not scheduled"),
            Style::default().fg(Color::DarkGray),
        ),
    }
}

fn opening_label(opening: &Opening, today: NaiveDate) -> String {
    let time = opening.start.format("%H:%M");
    match (opening.date - today).num_days() {
        0 => format!("today at {time}"),
        1 => format!("tomorrow at {time}"),
        _ => format!("{} at {time}", opening.date.format("%a %d/%m")),
    }
}

// --- item detail ---

fn draw_item_detail(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(detail) = &app.detail else {
        return;
    };
    let item = &detail.item;

    let mut lines = vec![
        Line::styled(item.name.clone(), highlight()),
        Line::from(item.description.clone().unwrap_or_default()),
        Line::from(""),
        Line::from(format!("Price: {}", item.price)),
    ];
    if item.takeaway {
        let surcharge = item
            .takeaway_surcharge
            .map(|amount| format!(" (+{amount})"))
            .unwrap_or_default();
        let mark = if detail.takeaway { "[x]" } else { "[ ]" };
        lines.push(Line::from(format!("{mark} Para llevar{surcharge}  (Tab)")));
    }
    lines.push(Line::from(format!("Quantity: {}  (↑/↓)", detail.quantity)));
    lines.push(Line::from(format!("Notes: {}_", detail.notes)));
    lines.push(Line::from(""));
    lines.push(Line::styled(
        format!("Line total: {}", detail.line_total()),
        Style::default().add_modifier(Modifier::BOLD),
    ));

    let paragraph = Paragraph::new(lines)
        .block(bordered("Add to cart (Enter)"))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

// --- checkout ---

fn draw_checkout(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [progress_area, body_area] = chunks else {
        return;
    };

    let (position, total) = app.checkout.progress();
    let steps = app
        .checkout
        .steps()
        .iter()
        .map(|step| {
            if *step == app.step() {
                format!("[{}]", step.title())
            } else {
                step.title().to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" › ");
    let progress = Paragraph::new(steps).block(bordered(format!(
        "Step {position} of {total}"
    )));
    frame.render_widget(progress, *progress_area);

    match app.step() {
        CheckoutStep::Cart => draw_cart(frame, app, *body_area),
        CheckoutStep::Fulfillment => draw_fulfillment(frame, app, *body_area),
        CheckoutStep::PersonalInfo => draw_personal_info(frame, app, *body_area),
        CheckoutStep::Address => draw_address(frame, app, *body_area),
        CheckoutStep::Payment => draw_payment(frame, app, *body_area),
        CheckoutStep::Dispatch => draw_dispatch(frame, app, *body_area),
    }
}

fn draw_cart(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(4)])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [table_area, footer_area] = chunks else {
        return;
    };

    if app.cart.is_empty() {
        let paragraph = Paragraph::new("Your cart is empty. Press Esc to browse the menu.")
            .block(bordered("Cart"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, *table_area);
    } else {
        let rows = app.cart.lines().iter().enumerate().map(|(idx, line)| {
            let mut name = line.item.name.clone();
            if line.takeaway {
                name.push_str(" (para llevar)");
            }
            let style = if idx == app.cart_index {
                highlight()
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(format!("{}x", line.quantity)),
                Cell::from(name),
                Cell::from(line.notes.clone()),
                Cell::from(line.total().to_string()),
            ])
            .style(style)
        });

        let column_widths = [
            Constraint::Length(5),
            Constraint::Min(20),
            Constraint::Min(16),
            Constraint::Length(10),
        ];
        let table = Table::new(rows, column_widths)
            .header(
                Row::new(vec!["Qty", "Item", "Notes", "Total"])
                    .style(Style::default().add_modifier(Modifier::BOLD)),
            )
            .block(bordered("Cart"))
            .column_spacing(1);
        frame.render_widget(table, *table_area);
    }

    let footer = if let Some(notes) = &app.notes_input {
        Paragraph::new(format!("{notes}_")).block(
            bordered("Notes for the selected line (Enter saves)")
                .border_style(Style::default().fg(Color::Yellow)),
        )
    } else {
        let delivery = &app.service.config().delivery;
        Paragraph::new(vec![
            Line::styled(
                format!("Subtotal: {}", app.cart.subtotal()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Line::from(format!(
                "Delivery orders start at {}",
                delivery.minimum_order
            )),
        ])
        .block(bordered("Totals"))
    };
    frame.render_widget(footer, *footer_area);
}

fn draw_choice(frame: &mut Frame<'_>, area: Rect, title: &str, options: &[&str], selected: usize) {
    let items = options
        .iter()
        .map(|option| ListItem::new(*option))
        .collect::<Vec<ListItem<'_>>>();
    let list = List::new(items)
        .block(bordered(title))
        .highlight_style(highlight())
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_fulfillment(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [choice_area, info_area] = chunks else {
        return;
    };

    let selected = usize::from(app.checkout.draft.fulfillment == FulfillmentKind::Pickup);
    draw_choice(
        frame,
        *choice_area,
        "How do you want your order?",
        &["Delivery", "Pickup at the restaurant"],
        selected,
    );

    let mut lines = vec![Line::from(format!(
        "Pickup address: {}",
        app.service.config().info.address
    ))];
    if let Some(problem) = app.delivery_problem() {
        lines.push(Line::styled(
            problem.to_string(),
            Style::default().fg(Color::Yellow),
        ));
    }
    let info = Paragraph::new(lines)
        .block(bordered("Details"))
        .wrap(Wrap { trim: true });
    frame.render_widget(info, *info_area);
}

fn input_box<'a>(label: &'a str, value: &'a str, focused: bool) -> Paragraph<'a> {
    let (text, border) = if focused {
        (format!("{value}_"), Style::default().fg(Color::Yellow))
    } else {
        (value.to_owned(), Style::default())
    };
    Paragraph::new(text).block(bordered(label).border_style(border))
}

fn draw_personal_info(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [name_area, phone_area, _] = chunks else {
        return;
    };

    let draft = &app.checkout.draft;
    frame.render_widget(
        input_box("Name", &draft.name, app.field == Field::Name),
        *name_area,
    );
    frame.render_widget(
        input_box("Phone", &draft.phone, app.field == Field::Phone),
        *phone_area,
    );
}

fn draw_address(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // city
            Constraint::Length(3), // neighborhood search
            Constraint::Min(3),    // neighborhood list
            Constraint::Length(3), // street address
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [city_area, search_area, list_area, address_area] = chunks else {
        return;
    };

    let draft = &app.checkout.draft;
    let city = format!("‹ {} ›", draft.city);
    frame.render_widget(
        input_box("City (←/→)", &city, app.field == Field::City),
        *city_area,
    );
    frame.render_widget(
        input_box(
            "Search neighborhood",
            &app.neighborhood_search,
            app.field == Field::Neighborhood,
        ),
        *search_area,
    );

    let neighborhoods = app.neighborhoods();
    let items = if neighborhoods.is_empty() {
        vec![ListItem::new("No matching neighborhood, we may not deliver there.")]
    } else {
        neighborhoods
            .iter()
            .map(|neighborhood| {
                ListItem::new(format!(
                    "{:<24} delivery {}",
                    neighborhood.name, neighborhood.price
                ))
            })
            .collect()
    };
    let list = List::new(items)
        .block(bordered(format!("Neighborhoods in {}", draft.city)))
        .highlight_style(highlight())
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !neighborhoods.is_empty() {
        state.select(Some(app.neighborhood_index));
    }
    frame.render_stateful_widget(list, *list_area, &mut state);

    frame.render_widget(
        input_box(
            "Street address",
            &draft.address,
            app.field == Field::Address,
        ),
        *address_area,
    );
}

fn draw_payment(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [choice_area, summary_area] = chunks else {
        return;
    };

    let draft = &app.checkout.draft;
    let selected = usize::from(draft.payment == PaymentMethod::Transfer);
    draw_choice(
        frame,
        *choice_area,
        "Payment method",
        &["Cash", "Bank transfer"],
        selected,
    );

    let mut lines = Vec::new();
    if let Some(quote) = app.quote() {
        lines.push(Line::from(format!("Subtotal: {}", quote.subtotal)));
        if draft.fulfillment == FulfillmentKind::Delivery {
            lines.push(Line::from(format!("Delivery: {}", quote.delivery_fee)));
        }
        lines.push(Line::styled(
            format!("Total: {}", quote.total),
            Style::default().add_modifier(Modifier::BOLD),
        ));

        if draft.payment == PaymentMethod::Transfer {
            lines.push(Line::from(""));
            match app.service.config().bank_account.as_deref() {
                Some(account) => lines.push(Line::styled(
                    format!("Transfer {} to account {account}.", quote.total),
                    Style::default().fg(Color::Cyan),
                )),
                None => lines.push(Line::from("The restaurant will send transfer details.")),
            }
            if let Some(nequi) = app.service.config().daily_menu.nequi.as_deref() {
                lines.push(Line::from(format!("Nequi: {nequi}")));
            }
            lines.push(Line::from("Send the receipt in the WhatsApp chat."));
        }
    }

    let summary = Paragraph::new(lines)
        .block(bordered("Summary"))
        .wrap(Wrap { trim: true });
    frame.render_widget(summary, *summary_area);
}

fn draw_dispatch(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(dispatch) = &app.dispatch else {
        let paragraph = Paragraph::new("Preparing order…").block(bordered("Send order"));
        frame.render_widget(paragraph, area);
        return;
    };

    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(4)])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [message_area, link_area] = chunks else {
        return;
    };

    let message = Paragraph::new(dispatch.message.as_str())
        .block(bordered("WhatsApp message"))
        .wrap(Wrap { trim: false });
    frame.render_widget(message, *message_area);

    let link = Paragraph::new(dispatch.link.as_str())
        .block(bordered(
            "Press Enter to finish; the link is printed when the app closes",
        ))
        .style(Style::default().fg(Color::Green))
        .wrap(Wrap { trim: false });
    frame.render_widget(link, *link_area);
}
