//! WhatsApp order message: formatting, link encoding, and reading a message back.

use url::{Url, form_urlencoded};

use crate::cart::CartLine;
use crate::model::{CustomerInfo, Fulfillment, ParsePesosError, PaymentMethod, Pesos};
use crate::pricing::Quote;

const GREETING: &str = "¡Hola! Me gustaría hacer un pedido:";
const CUSTOMER_HEADER: &str = "DATOS DEL CLIENTE:";
const ORDER_HEADER: &str = "PEDIDO:";
const SUMMARY_HEADER: &str = "RESUMEN:";
const BULLET: &str = "• ";
const TAKEAWAY_MARK: &str = " (para llevar)";
const NOTES_PREFIX: &str = "Notas: ";

/// Collapse a free-text field onto a single line.
fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Item name as printed; the takeaway mark only ever comes from the line flag.
fn item_label(name: &str) -> String {
    let mut label = one_line(name);
    while let Some(stripped) = label.strip_suffix(TAKEAWAY_MARK) {
        label = stripped.trim_end().to_owned();
    }
    label
}

fn format_line(line: &CartLine) -> String {
    let takeaway = if line.takeaway { TAKEAWAY_MARK } else { "" };
    let mut entry = format!(
        "{BULLET}{}x {}{takeaway} - {}",
        line.quantity,
        item_label(&line.item.name),
        line.total()
    );
    let notes = one_line(&line.notes);
    if !notes.is_empty() {
        entry.push('\n');
        entry.push_str(NOTES_PREFIX);
        entry.push_str(&notes);
    }
    entry
}

/// Render the order as the text sent to the restaurant.
///
/// The output depends only on the arguments. `bank_account` is quoted in the transfer
/// instructions when the customer pays by transfer.
#[must_use]
pub fn format_message(
    lines: &[CartLine],
    customer: &CustomerInfo,
    quote: &Quote,
    bank_account: Option<&str>,
) -> String {
    let mut customer_block = vec![
        CUSTOMER_HEADER.to_owned(),
        format!("Nombre: {}", one_line(&customer.name)),
        format!("Teléfono: {}", one_line(&customer.phone)),
    ];
    match &customer.fulfillment {
        Fulfillment::Delivery {
            address,
            city,
            neighborhood,
        } => {
            customer_block.push(format!("Dirección: {}", one_line(address)));
            customer_block.push(format!("Barrio: {neighborhood}"));
            customer_block.push(format!("Ciudad: {city}"));
        }
        Fulfillment::Pickup => customer_block.push("Para recoger en el local".to_owned()),
    }
    match customer.payment {
        PaymentMethod::Cash => customer_block.push("Método de pago: Efectivo".to_owned()),
        PaymentMethod::Transfer => {
            customer_block.push("Método de pago: Transferencia".to_owned());
            if let Some(account) = bank_account {
                customer_block.push(format!("Transferencia al número: {account}"));
            }
            customer_block.push("Enviaré el comprobante por este chat.".to_owned());
        }
    }

    let items = lines
        .iter()
        .map(format_line)
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut summary = vec![
        SUMMARY_HEADER.to_owned(),
        format!("Subtotal: {}", quote.subtotal),
    ];
    if customer.fulfillment.is_delivery() {
        summary.push(format!("Domicilio: {}", quote.delivery_fee));
    }
    summary.push(format!("Total: {}", quote.total));

    [
        GREETING.to_owned(),
        customer_block.join("\n"),
        format!("{ORDER_HEADER}\n{items}"),
        summary.join("\n"),
    ]
    .join("\n\n")
}

/// Percent-encode text for use as a URL query value.
///
/// Spaces become `%20`, so the result decodes the same way `encodeURIComponent` output does.
#[must_use]
pub fn encode_component(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// `wa.me` deep link opening a chat with `number` and the message pre-filled.
#[must_use]
pub fn whatsapp_link(number: &str, message: &str) -> String {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    format!("https://wa.me/{digits}?text={}", encode_component(message))
}

/// Extract the pre-filled message from a `wa.me` link.
#[must_use]
pub fn message_from_link(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "text")
        .map(|(_, value)| value.into_owned())
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Errors raised while reading an order message.
pub enum OrderParseError {
    /// A required section header is absent.
    #[error("Missing section {0}")]
    MissingSection(&'static str),
    /// An item line does not follow the `• Nx name - $price` shape.
    #[error("Malformed item line: {0}")]
    BadLine(String),
    /// An amount could not be read.
    #[error(transparent)]
    BadAmount(#[from] ParsePesosError),
    /// The summary has no total.
    #[error("Missing total")]
    MissingTotal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Item line read back from a message.
pub struct ParsedLine {
    /// Units ordered.
    pub quantity: u32,
    /// Item name.
    pub name: String,
    /// Packed for takeaway.
    pub takeaway: bool,
    /// Line total.
    pub total: Pesos,
    /// Kitchen notes.
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Order read back from a message.
pub struct ParsedOrder {
    /// Customer name.
    pub customer_name: Option<String>,
    /// Customer phone.
    pub phone: Option<String>,
    /// Pickup orders carry no address.
    pub pickup: bool,
    /// Item lines in message order.
    pub lines: Vec<ParsedLine>,
    /// Subtotal as printed.
    pub subtotal: Option<Pesos>,
    /// Delivery fee, present for deliveries.
    pub delivery_fee: Option<Pesos>,
    /// Total as printed.
    pub total: Pesos,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Customer,
    Order,
    Summary,
}

fn parse_item(raw: &str) -> Result<ParsedLine, OrderParseError> {
    let bad = || OrderParseError::BadLine(raw.to_owned());
    let (quantity, rest) = raw.split_once("x ").ok_or_else(bad)?;
    let quantity: u32 = quantity.trim().parse().map_err(|_err| bad())?;
    let (label, price) = rest.rsplit_once(" - ").ok_or_else(bad)?;
    let (name, takeaway) = match label.strip_suffix(TAKEAWAY_MARK) {
        Some(name) => (name, true),
        None => (label, false),
    };
    Ok(ParsedLine {
        quantity,
        name: name.to_owned(),
        takeaway,
        total: price.parse()?,
        notes: None,
    })
}

/// Read a message produced by [`format_message`] back into its parts.
///
/// # Errors
///
/// Returns an [`OrderParseError`] when a section is missing or a line is malformed.
pub fn parse_message(text: &str) -> Result<ParsedOrder, OrderParseError> {
    let mut section = Section::Preamble;
    let mut seen_order = false;
    let mut order = ParsedOrder {
        customer_name: None,
        phone: None,
        pickup: false,
        lines: Vec::new(),
        subtotal: None,
        delivery_fee: None,
        total: Pesos::ZERO,
    };
    let mut total = None;

    for raw in text.lines().map(str::trim).filter(|raw| !raw.is_empty()) {
        match raw {
            CUSTOMER_HEADER => {
                section = Section::Customer;
                continue;
            }
            ORDER_HEADER => {
                section = Section::Order;
                seen_order = true;
                continue;
            }
            SUMMARY_HEADER => {
                section = Section::Summary;
                continue;
            }
            _ => {}
        }

        match section {
            Section::Preamble => {}
            Section::Customer => {
                if let Some(name) = raw.strip_prefix("Nombre: ") {
                    order.customer_name = Some(name.to_owned());
                } else if let Some(phone) = raw.strip_prefix("Teléfono: ") {
                    order.phone = Some(phone.to_owned());
                } else if raw == "Para recoger en el local" {
                    order.pickup = true;
                }
            }
            Section::Order => {
                if let Some(item) = raw.strip_prefix(BULLET) {
                    order.lines.push(parse_item(item)?);
                } else if let Some(notes) = raw.strip_prefix(NOTES_PREFIX) {
                    let line = order
                        .lines
                        .last_mut()
                        .ok_or_else(|| OrderParseError::BadLine(raw.to_owned()))?;
                    line.notes = Some(notes.to_owned());
                } else {
                    return Err(OrderParseError::BadLine(raw.to_owned()));
                }
            }
            Section::Summary => {
                if let Some(amount) = raw.strip_prefix("Subtotal: ") {
                    order.subtotal = Some(amount.parse()?);
                } else if let Some(amount) = raw.strip_prefix("Domicilio: ") {
                    order.delivery_fee = Some(amount.parse()?);
                } else if let Some(amount) = raw.strip_prefix("Total: ") {
                    total = Some(amount.parse()?);
                }
            }
        }
    }

    if !seen_order {
        return Err(OrderParseError::MissingSection(ORDER_HEADER));
    }
    order.total = total.ok_or(OrderParseError::MissingTotal)?;
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{Cart, tests::dish};
    use crate::pricing::{DeliveryZones, quote};

    fn delivery_customer(payment: PaymentMethod) -> CustomerInfo {
        CustomerInfo {
            name: "Ana María".to_owned(),
            phone: "300 555 0101".to_owned(),
            fulfillment: Fulfillment::Delivery {
                address: "Cra 27 #45-10 apto 301".to_owned(),
                city: "Floridablanca".to_owned(),
                neighborhood: "Caldas".to_owned(),
            },
            payment,
        }
    }

    fn sample_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(&dish("carne", "Carne fresca", 13_000, Some(1_000)), 2, "sin cebolla\ny bien asada", true)
            .expect("add");
        cart.add(&dish("sopa", "Sopa - del día", 5_000, None), 1, "", false)
            .expect("add");
        cart
    }

    #[test]
    fn formats_delivery_order() {
        let cart = sample_cart();
        let customer = delivery_customer(PaymentMethod::Cash);
        let quote = quote(cart.lines(), &customer.fulfillment, &DeliveryZones::default())
            .expect("zone");

        let message = format_message(cart.lines(), &customer, &quote, Some("300 123 4567"));
        let expected = "\
¡Hola! Me gustaría hacer un pedido:

DATOS DEL CLIENTE:
Nombre: Ana María
Teléfono: 300 555 0101
Dirección: Cra 27 #45-10 apto 301
Barrio: Caldas
Ciudad: Floridablanca
Método de pago: Efectivo

PEDIDO:
• 2x Carne fresca (para llevar) - $28.000
Notas: sin cebolla y bien asada

• 1x Sopa - del día - $5.000

RESUMEN:
Subtotal: $33.000
Domicilio: $4.000
Total: $37.000";
        assert_eq!(message, expected);
    }

    #[test]
    fn transfer_and_pickup_blocks() {
        let cart = sample_cart();
        let customer = CustomerInfo {
            fulfillment: Fulfillment::Pickup,
            ..delivery_customer(PaymentMethod::Transfer)
        };
        let quote = quote(cart.lines(), &customer.fulfillment, &DeliveryZones::default())
            .expect("pickup");
        let message = format_message(cart.lines(), &customer, &quote, Some("300 123 4567"));

        assert!(message.contains("Para recoger en el local"));
        assert!(message.contains("Transferencia al número: 300 123 4567"));
        assert!(!message.contains("Domicilio:"));
        assert!(message.ends_with("Total: $33.000"));
    }

    #[test]
    fn encodes_like_encode_uri_component() {
        assert_eq!(encode_component("a b&c=d\n¡"), "a%20b%26c%3Dd%0A%C2%A1");
        assert_eq!(encode_component("1+1"), "1%2B1");
    }

    #[test]
    fn link_round_trip() {
        let cart = sample_cart();
        let customer = delivery_customer(PaymentMethod::Transfer);
        let quote = quote(cart.lines(), &customer.fulfillment, &DeliveryZones::default())
            .expect("zone");
        let message = format_message(cart.lines(), &customer, &quote, None);

        let link = whatsapp_link("+57 316 619 3963", &message);
        assert!(link.starts_with("https://wa.me/573166193963?text="));
        assert!(!link.contains(' '));

        let decoded = message_from_link(&link).expect("text parameter");
        assert_eq!(decoded, message);

        let parsed = parse_message(&decoded).expect("parse");
        assert_eq!(parsed.customer_name.as_deref(), Some("Ana María"));
        assert!(!parsed.pickup);
        assert_eq!(parsed.total, quote.total);
        assert_eq!(parsed.subtotal, Some(quote.subtotal));
        assert_eq!(parsed.delivery_fee, Some(Pesos(4_000)));

        let recovered: Vec<(u32, &str, Pesos)> = parsed
            .lines
            .iter()
            .map(|line| (line.quantity, line.name.as_str(), line.total))
            .collect();
        let in_cart: Vec<(u32, &str, Pesos)> = cart
            .lines()
            .iter()
            .map(|line| (line.quantity, line.item.name.as_str(), line.total()))
            .collect();
        assert_eq!(recovered, in_cart);
        assert_eq!(
            parsed.lines.first().and_then(|line| line.notes.as_deref()),
            Some("sin cebolla y bien asada")
        );
    }

    #[test]
    fn takeaway_flag_survives_names_that_mimic_the_mark() {
        let mut cart = Cart::new();
        cart.add(&dish("pollo", "Pollo (para llevar)", 12_000, Some(1_000)), 1, "", false)
            .expect("add");
        cart.add(&dish("res", "Res (para llevar)", 14_000, Some(1_000)), 1, "", true)
            .expect("add");
        let customer = CustomerInfo {
            fulfillment: Fulfillment::Pickup,
            ..delivery_customer(PaymentMethod::Cash)
        };
        let quote = quote(cart.lines(), &customer.fulfillment, &DeliveryZones::default())
            .expect("pickup");
        let message = format_message(cart.lines(), &customer, &quote, None);

        assert!(message.contains("• 1x Pollo - $12.000"));
        assert!(message.contains("• 1x Res (para llevar) - $15.000"));

        let parsed = parse_message(&message).expect("parse");
        let flags: Vec<(&str, bool)> = parsed
            .lines
            .iter()
            .map(|line| (line.name.as_str(), line.takeaway))
            .collect();
        assert_eq!(flags, vec![("Pollo", false), ("Res", true)]);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(
            parse_message("hola"),
            Err(OrderParseError::MissingSection(ORDER_HEADER))
        );
        assert_eq!(
            parse_message("PEDIDO:\n• dos carnes\nRESUMEN:\nTotal: $1"),
            Err(OrderParseError::BadLine("dos carnes".to_owned()))
        );
        assert_eq!(
            parse_message("PEDIDO:\n• 1x Sopa - $5.000"),
            Err(OrderParseError::MissingTotal)
        );
    }
}
