//! Menu provider reading the restaurant's JSON webhook.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Weekday;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use mesero_core::{
    model::{ItemId, MenuItem, Pesos, Service},
    plugin::MenuPlugin,
    ports::{MenuPort, PortError, SourceMeta},
};

/// `null` reads as an empty list.
fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Whole number from a JSON integer, an integral float such as `6000.0`, or a numeric string.
fn whole_number(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.is_finite() && float.fract().abs() < f64::EPSILON)
                .and_then(|float| format!("{float:.0}").parse().ok())
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn text_or_number(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Single entry of the webhook's JSON array.
///
/// Fields are read leniently; an entry that still fails to decode is skipped on its own.
#[derive(Debug, Deserialize)]
struct WireItem {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default, rename = "nombre")]
    name: Option<String>,
    #[serde(default, rename = "descripcion")]
    description: Option<String>,
    #[serde(default, rename = "servicios", deserialize_with = "nullable_list")]
    services: Vec<String>,
    #[serde(default, rename = "categorias", deserialize_with = "nullable_list")]
    categories: Vec<String>,

    // 0 = Sunday, as in JavaScript's Date#getDay
    #[serde(default, rename = "dias", deserialize_with = "nullable_list")]
    days: Vec<Value>,

    #[serde(default, rename = "disponible")]
    available: Option<bool>,
    #[serde(default, rename = "para_llevar")]
    takeaway: Option<bool>,
    #[serde(default, rename = "url_imagen")]
    image_url: Option<String>,
    #[serde(default, rename = "precio_adicional_llevar")]
    takeaway_surcharge: Option<Value>,

    // older payloads call it "precio"
    #[serde(default, rename = "valor", alias = "precio")]
    price: Option<Value>,
}

fn weekday_from_js(day: i64) -> Option<Weekday> {
    match day {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

fn positive(amount: Option<&Value>) -> Option<Pesos> {
    amount
        .and_then(whole_number)
        .and_then(|value| u64::try_from(value).ok())
        .filter(|value| *value > 0)
        .map(Pesos)
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

impl WireItem {
    /// Convert to a domain item; entries without a name or a positive price are dropped.
    fn into_item(self, position: usize) -> Option<MenuItem> {
        let name = non_blank(self.name)?;
        let price = positive(self.price.as_ref())?;
        let id = non_blank(text_or_number(self.id)).unwrap_or_else(|| format!("item-{position}"));

        let mut services: Vec<Service> = self
            .services
            .iter()
            .filter_map(|raw| Service::from_wire(raw))
            .collect();
        services.sort_unstable();
        services.dedup();

        Some(MenuItem {
            id: ItemId(id),
            name,
            description: non_blank(self.description),
            price,
            services,
            categories: self
                .categories
                .into_iter()
                .map(|category| category.trim().to_owned())
                .filter(|category| !category.is_empty())
                .collect(),
            days: self
                .days
                .iter()
                .filter_map(whole_number)
                .filter_map(weekday_from_js)
                .collect(),
            available: self.available.unwrap_or(true),
            takeaway: self.takeaway.unwrap_or(false),
            takeaway_surcharge: positive(self.takeaway_surcharge.as_ref()),
            image_url: non_blank(self.image_url),
        })
    }
}

/// Decode one array entry; `None` when it is unusable.
fn decode_entry(position: usize, entry: Value) -> Option<MenuItem> {
    match serde_json::from_value::<WireItem>(entry) {
        Ok(wire) => wire.into_item(position),
        Err(err) => {
            debug!(position, error = %err, "skipping undecodable menu entry");
            None
        }
    }
}

/// Menu port fetching the webhook with a single GET.
pub struct WebhookMenuPort {
    client: Client,
    url: String,
    meta: SourceMeta,
}

impl WebhookMenuPort {
    /// Create a new menu port bound to the given HTTP client and endpoint.
    #[must_use]
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            client,
            meta: SourceMeta {
                id: String::from("webhook"),
                name: url.clone(),
            },
            url,
        }
    }
}

#[async_trait]
impl MenuPort for WebhookMenuPort {
    fn source(&self) -> &SourceMeta {
        &self.meta
    }

    async fn fetch_menu(&self) -> Result<Vec<MenuItem>, PortError> {
        let entries = fetch_json::<Vec<Value>>(self.client.get(&self.url)).await?;
        let received = entries.len();

        let items: Vec<MenuItem> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(position, entry)| decode_entry(position, entry))
            .collect();

        if items.len() < received {
            debug!(
                received,
                kept = items.len(),
                "skipped malformed or incomplete menu entries"
            );
        }
        Ok(items)
    }
}

/// Built-in catalog served when the webhook is unreachable.
#[must_use]
pub fn fallback_menu() -> Vec<MenuItem> {
    let lunch_plate = |id: &str, name: &str, description: &str| MenuItem {
        id: ItemId(id.to_owned()),
        name: name.to_owned(),
        description: Some(description.to_owned()),
        price: Pesos(13_000),
        services: vec![Service::Lunch],
        categories: vec!["almuerzo".to_owned()],
        days: Vec::new(),
        available: true,
        takeaway: true,
        takeaway_surcharge: None,
        image_url: None,
    };

    vec![
        lunch_plate(
            "a4d1a8ea-e0ae-4491-8c1f-3461bf56c726",
            "Carne fresca",
            "Carne de res a la plancha",
        ),
        lunch_plate(
            "c3bd7189-b3b7-4262-ad09-70ebb5759d48",
            "Semioreada",
            "Carne semisecada estilo de la casa",
        ),
    ]
}

/// Build the plugin bundle for the webhook provider.
#[must_use]
pub fn plugin(client: Client, url: impl Into<String>) -> MenuPlugin {
    MenuPlugin::new(Arc::new(WebhookMenuPort::new(client, url)), fallback_menu())
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, PortError> {
    req.send()
        .await
        .map_err(PortError::from)?
        .error_for_status()
        .map_err(PortError::from)?
        .json()
        .await
        .map_err(|err| {
            if err.is_decode() {
                PortError::Decode(err.to_string())
            } else {
                PortError::from(err)
            }
        })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use httpmock::prelude::*;
    use mesero_core::{catalog::MenuSource, config::RestaurantConfig, service::MeseroService};

    use super::*;

    const MENU: &str = r#"[
        {
            "id": "1",
            "nombre": "Mojarra frita",
            "descripcion": "Con patacón y arroz",
            "servicios": ["almuerzo", "cena", "desayuno"],
            "categorias": ["pescados", " "],
            "dias": [5, 6, 9],
            "disponible": true,
            "para_llevar": true,
            "url_imagen": null,
            "precio_adicional_llevar": 1000,
            "valor": 25000
        },
        {
            "id": "2",
            "nombre": "Carne fresca",
            "servicios": ["almuerzo"],
            "categorias": ["almuerzo"],
            "precio": 13000
        },
        { "id": "3", "nombre": "  ", "valor": 9000 },
        { "id": "4", "nombre": "Limonada", "valor": 0 },
        { "id": "5", "nombre": "Agua", "valor": -2000 },
        { "nombre": "Sopa del día", "valor": 6000, "disponible": false }
    ]"#;

    #[tokio::test]
    async fn decodes_and_filters_entries() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/menu");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .body(MENU);
            })
            .await;

        let port = WebhookMenuPort::new(Client::new(), server.url("/menu"));
        let items = port.fetch_menu().await.expect("menu");
        mock.assert_async().await;

        let names: Vec<&str> = items.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, ["Mojarra frita", "Carne fresca", "Sopa del día"]);

        let mojarra = items.first().expect("first item");
        assert_eq!(mojarra.services, [Service::Lunch, Service::Dinner]);
        assert_eq!(mojarra.categories, ["pescados"]);
        assert_eq!(mojarra.days, [Weekday::Fri, Weekday::Sat]);
        assert_eq!(mojarra.takeaway_surcharge, Some(Pesos(1_000)));
        assert_eq!(mojarra.price, Pesos(25_000));

        let carne = items.get(1).expect("second item");
        assert_eq!(carne.price, Pesos(13_000));
        assert!(carne.available, "availability defaults to true");
        assert!(!carne.takeaway);

        let sopa = items.get(2).expect("third item");
        assert_eq!(sopa.id, ItemId("item-5".to_owned()));
        assert!(!sopa.available);
    }

    #[tokio::test]
    async fn one_bad_entry_does_not_discard_the_menu() {
        let body = r#"[
            { "id": 7, "nombre": "Carne fresca", "servicios": ["almuerzo"], "valor": 13000 },
            { "nombre": "Sopa", "valor": 6000, "dias": null, "servicios": null },
            { "nombre": "Bandeja paisa", "valor": 18000.0, "disponible": null, "dias": [2.0, 3] },
            { "nombre": "Jugo", "valor": 4500.5 },
            { "nombre": ["no es texto"], "valor": 5000 },
            "ni siquiera un objeto"
        ]"#;
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/menu");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .body(body);
            })
            .await;

        let port = WebhookMenuPort::new(Client::new(), server.url("/menu"));
        let items = port.fetch_menu().await.expect("valid entries survive");

        let names: Vec<&str> = items.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, ["Carne fresca", "Sopa", "Bandeja paisa"]);

        let carne = items.first().expect("carne");
        assert_eq!(carne.id, ItemId("7".to_owned()));

        let sopa = items.get(1).expect("sopa");
        assert!(sopa.days.is_empty(), "null days means every day");
        assert!(sopa.services.is_empty(), "null services means every service");

        let bandeja = items.get(2).expect("bandeja");
        assert_eq!(bandeja.price, Pesos(18_000));
        assert!(bandeja.available, "null availability defaults to true");
        assert_eq!(bandeja.days, [Weekday::Tue, Weekday::Wed]);
    }

    #[tokio::test]
    async fn server_errors_are_network_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/menu");
                then.status(503);
            })
            .await;

        let port = WebhookMenuPort::new(Client::new(), server.url("/menu"));
        assert!(matches!(port.fetch_menu().await, Err(PortError::Network(_))));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/menu");
                then.status(200).body(r#"{"error": "workflow paused"}"#);
            })
            .await;

        let port = WebhookMenuPort::new(Client::new(), server.url("/menu"));
        assert!(matches!(port.fetch_menu().await, Err(PortError::Decode(_))));
    }

    #[tokio::test]
    async fn service_falls_back_when_webhook_fails() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/menu");
                then.status(500);
            })
            .await;

        let service = MeseroService::new(
            Arc::new(RestaurantConfig::default()),
            plugin(Client::new(), server.url("/menu")),
        );
        let menu = service.load_menu().await;

        assert_eq!(menu.source(), MenuSource::Fallback);
        assert_eq!(menu.items().len(), fallback_menu().len());
        assert_eq!(service.source().id, "webhook");
    }
}
