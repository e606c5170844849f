//! Restaurant configuration: contact details, hours, delivery zones.
//!
//! Every section has built-in defaults, so a TOML file only needs the sections it changes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::board::DailyMenu;
use crate::model::{Pesos, Service};
use crate::pricing::DeliveryZones;
use crate::schedule::Timetable;

/// Webhook publishing the menu.
pub const DEFAULT_MENU_URL: &str = "https://n8n.alliasoft.com/webhook/luis-res/menu";

#[derive(thiserror::Error, Debug)]
/// Errors raised while loading configuration.
pub enum ConfigError {
    /// The file could not be read.
    #[error("Cannot read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// The file is not valid TOML for this schema.
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// UTC offset outside ±23 hours.
    #[error("Invalid UTC offset: {0} hours")]
    InvalidOffset(i32),
    /// WhatsApp number without digits.
    #[error("WhatsApp number {0:?} contains no digits")]
    InvalidWhatsapp(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Public contact details.
pub struct RestaurantInfo {
    /// Restaurant name.
    pub name: String,
    /// WhatsApp number receiving orders, international format without `+`.
    pub whatsapp: String,
    /// Landline.
    pub phone: String,
    /// Street address for pickups.
    pub address: String,
    /// Contact e-mail.
    pub email: Option<String>,
}

impl Default for RestaurantInfo {
    fn default() -> Self {
        Self {
            name: "Luis Res".to_owned(),
            whatsapp: "573166193963".to_owned(),
            phone: "6363610".to_owned(),
            address: "Cra 37 #109-24, Floridablanca - Barrio Caldas".to_owned(),
            email: Some("info@luisres.com".to_owned()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Delivery rules.
pub struct DeliverySettings {
    /// Whether deliveries are offered at all.
    pub enabled: bool,
    /// Smallest subtotal accepted for delivery.
    pub minimum_order: Pesos,
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            minimum_order: Pesos(15_000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Whether the browsed service follows the clock when availability changes.
pub struct AutoSwitch {
    /// Move to lunch when lunch becomes the suggested service.
    pub to_lunch: bool,
    /// Move to dinner when dinner opens.
    pub to_dinner: bool,
}

impl Default for AutoSwitch {
    fn default() -> Self {
        Self {
            to_lunch: true,
            to_dinner: true,
        }
    }
}

impl AutoSwitch {
    /// Whether an automatic move to `service` is allowed.
    #[must_use]
    pub fn allows(self, service: Service) -> bool {
        match service {
            Service::Lunch => self.to_lunch,
            Service::Dinner => self.to_dinner,
        }
    }

    /// Service to browse first, given the calculator's suggestion.
    #[must_use]
    pub fn initial(self, suggested: Service) -> Service {
        if self.allows(suggested) {
            suggested
        } else {
            suggested.toggled()
        }
    }

    /// Service to browse after the suggestion moved from `previous` to `suggested`.
    ///
    /// A manual choice is only overridden when the suggestion itself changes.
    #[must_use]
    pub fn follow(self, current: Service, previous: Service, suggested: Service) -> Service {
        if suggested != previous && self.allows(suggested) {
            suggested
        } else {
            current
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Everything the ordering flow needs to know about the restaurant.
pub struct RestaurantConfig {
    /// Account quoted in transfer instructions.
    pub bank_account: Option<String>,
    /// Offset of restaurant local time from UTC, in hours.
    pub utc_offset_hours: i32,
    /// Menu webhook.
    pub menu_url: String,
    /// Contact details.
    pub info: RestaurantInfo,
    /// Delivery rules.
    pub delivery: DeliverySettings,
    /// Automatic lunch/dinner switching.
    pub auto_switch: AutoSwitch,
    /// Dishes of the day and menu board images.
    pub daily_menu: DailyMenu,
    /// Opening hours.
    pub timetable: Timetable,
    /// Delivery fee table.
    pub zones: DeliveryZones,
}

impl Default for RestaurantConfig {
    fn default() -> Self {
        Self {
            bank_account: Some("300 123 4567".to_owned()),
            utc_offset_hours: -5,
            menu_url: DEFAULT_MENU_URL.to_owned(),
            info: RestaurantInfo::default(),
            delivery: DeliverySettings::default(),
            auto_switch: AutoSwitch::default(),
            daily_menu: DailyMenu::default(),
            timetable: Timetable::default(),
            zones: DeliveryZones::default(),
        }
    }
}

impl RestaurantConfig {
    /// Parse and validate TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML, or a validation error.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`RestaurantConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check values the type system cannot.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.utc_offset().is_none() {
            return Err(ConfigError::InvalidOffset(self.utc_offset_hours));
        }
        if !self.info.whatsapp.chars().any(|ch| ch.is_ascii_digit()) {
            return Err(ConfigError::InvalidWhatsapp(self.info.whatsapp.clone()));
        }
        Ok(())
    }

    fn utc_offset(&self) -> Option<FixedOffset> {
        self.utc_offset_hours
            .checked_mul(3_600)
            .and_then(FixedOffset::east_opt)
    }

    /// Restaurant local time zone; UTC when the offset is invalid.
    #[must_use]
    pub fn timezone(&self) -> FixedOffset {
        self.utc_offset().unwrap_or_else(|| Utc.fix())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime, Weekday};

    use super::*;

    const PARTIAL: &str = r#"
bank_account = "311 000 0000"

[info]
whatsapp = "573000000000"

[delivery]
enabled = false

[auto_switch]
to_dinner = false

[daily_menu]
soup = "sancocho"
weekday_lunch_end = "14:30"

[[timetable.special_dates]]
date = "2025-01-06"
reason = "Festivo de Reyes"

[timetable.special_dates.schedule]
closed = true
lunch = { start = "11:00", end = "15:00", enabled = false }
dinner = { start = "18:00", end = "21:00" }
"#;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = RestaurantConfig::from_toml_str(PARTIAL).expect("valid");

        assert_eq!(config.info.whatsapp, "573000000000");
        assert_eq!(config.info.name, "Luis Res");
        assert!(!config.delivery.enabled);
        assert_eq!(config.delivery.minimum_order, Pesos(15_000));
        assert_eq!(config.zones, DeliveryZones::default());
        assert_eq!(config.utc_offset_hours, -5);
        assert!(config.auto_switch.to_lunch);
        assert!(!config.auto_switch.to_dinner);
        assert_eq!(config.daily_menu.soup, "sancocho");
        assert_eq!(config.daily_menu.side, "lentejas");
        assert_eq!(
            config.daily_menu.weekday_lunch_end,
            NaiveTime::from_hms_opt(14, 30, 0).expect("time")
        );

        let reyes = NaiveDate::from_ymd_opt(2025, 1, 6).expect("date");
        let day = config.timetable.day(reyes);
        assert!(day.closed);
        assert!(day.dinner.enabled, "enabled defaults to true");
        assert!(!day.serves(Service::Dinner), "closed day serves nothing");
    }

    #[test]
    fn single_weekday_override() {
        let text = r#"
[timetable.weekly.monday]
lunch = { start = "12:00", end = "15:00" }
dinner = { start = "18:00", end = "21:00", enabled = false }
"#;
        let config = RestaurantConfig::from_toml_str(text).expect("valid");
        let defaults = Timetable::default();

        let monday = config.timetable.weekly.day(Weekday::Mon);
        assert!(!monday.closed);
        assert!(monday.serves(Service::Lunch));
        assert!(!monday.serves(Service::Dinner));
        assert_eq!(
            config.timetable.weekly.day(Weekday::Sun),
            defaults.weekly.day(Weekday::Sun)
        );
        assert_eq!(config.timetable.special_dates, defaults.special_dates);
    }

    #[test]
    fn auto_switch_follows_only_changes_of_suggestion() {
        let both = AutoSwitch::default();
        assert_eq!(both.initial(Service::Dinner), Service::Dinner);
        assert_eq!(
            both.follow(Service::Lunch, Service::Lunch, Service::Dinner),
            Service::Dinner,
            "dinner opened"
        );
        assert_eq!(
            both.follow(Service::Dinner, Service::Lunch, Service::Lunch),
            Service::Dinner,
            "manual choice kept while the suggestion is unchanged"
        );

        let lunch_only = AutoSwitch {
            to_lunch: true,
            to_dinner: false,
        };
        assert_eq!(lunch_only.initial(Service::Dinner), Service::Lunch);
        assert_eq!(
            lunch_only.follow(Service::Lunch, Service::Lunch, Service::Dinner),
            Service::Lunch
        );
        assert_eq!(
            lunch_only.follow(Service::Dinner, Service::Dinner, Service::Lunch),
            Service::Lunch
        );
    }

    #[test]
    fn defaults_survive_toml() {
        let text = toml::to_string(&RestaurantConfig::default()).expect("serialize");
        let parsed = RestaurantConfig::from_toml_str(&text).expect("parse");
        assert_eq!(parsed, RestaurantConfig::default());
        assert!(text.contains("start = \"11:00\""));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            RestaurantConfig::from_toml_str("utc_offset_hours = 30"),
            Err(ConfigError::InvalidOffset(30))
        ));
        assert!(matches!(
            RestaurantConfig::from_toml_str("[info]\nwhatsapp = \"n/a\""),
            Err(ConfigError::InvalidWhatsapp(_))
        ));
        assert!(matches!(
            RestaurantConfig::from_toml_str("[timetable.weekly.monday]\nclosed = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("mesero.toml");
        assert!(matches!(
            RestaurantConfig::load(&missing),
            Err(ConfigError::Io { .. })
        ));

        fs::write(&missing, "utc_offset_hours = -3").expect("write");
        let config = RestaurantConfig::load(&missing).expect("valid");
        assert_eq!(config.timezone().local_minus_utc(), -3 * 3_600);
    }
}
