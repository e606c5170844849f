//! Daily specials and the menu board image shown for the time of day.

use chrono::{Datelike, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::schedule::{at, hhmm, minute_of_day};

const IMAGE_BASE: &str = "https://alliasoft.s3.us-east-2.amazonaws.com/restaurante-luisres";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Which printed menu applies.
pub enum MenuBoard {
    /// Monday to Friday lunch, also shown outside service hours.
    WeekdayLunch,
    /// Saturday lunch.
    SaturdayLunch,
    /// Sunday lunch.
    SundayLunch,
    /// Evening menu.
    Dinner,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Image URL for each menu board.
pub struct MenuImages {
    /// Weekday lunch board.
    pub weekday_lunch: String,
    /// Saturday lunch board.
    pub saturday_lunch: String,
    /// Sunday lunch board.
    pub sunday_lunch: String,
    /// Dinner board.
    pub dinner: String,
}

impl Default for MenuImages {
    fn default() -> Self {
        Self {
            weekday_lunch: format!("{IMAGE_BASE}/MENU+ALMUERZO.png"),
            saturday_lunch: format!("{IMAGE_BASE}/MENU+ALMUERZO+SABADO.png"),
            sunday_lunch: format!("{IMAGE_BASE}/MENU+ALMUERZO+DOMINGO.png"),
            dinner: format!("{IMAGE_BASE}/MENU+COMIDA.png"),
        }
    }
}

impl MenuImages {
    /// URL of a board.
    #[must_use]
    pub fn url(&self, board: MenuBoard) -> &str {
        match board {
            MenuBoard::WeekdayLunch => &self.weekday_lunch,
            MenuBoard::SaturdayLunch => &self.saturday_lunch,
            MenuBoard::SundayLunch => &self.sunday_lunch,
            MenuBoard::Dinner => &self.dinner,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Dishes of the day and the hours used to pick the menu board.
///
/// These hours only choose which board is shown; ordering follows the timetable.
pub struct DailyMenu {
    /// Soup of the day.
    pub soup: String,
    /// Salad of the day.
    pub salad: String,
    /// Side dish of the day ("principio").
    pub side: String,
    /// Nequi wallet number for transfers.
    pub nequi: Option<String>,
    /// Lunch board from this time on.
    #[serde(with = "hhmm")]
    pub lunch_start: NaiveTime,
    /// Lunch board until this time, Monday to Friday.
    #[serde(with = "hhmm")]
    pub weekday_lunch_end: NaiveTime,
    /// Lunch board until this time on weekends.
    #[serde(with = "hhmm")]
    pub weekend_lunch_end: NaiveTime,
    /// Dinner board from this time until midnight.
    #[serde(with = "hhmm")]
    pub dinner_start: NaiveTime,
    /// Board images.
    pub images: MenuImages,
}

impl Default for DailyMenu {
    fn default() -> Self {
        Self {
            soup: "arroz".to_owned(),
            salad: "cebolla y tomate".to_owned(),
            side: "lentejas".to_owned(),
            nequi: Some("3175816061".to_owned()),
            lunch_start: at(11, 0),
            weekday_lunch_end: at(14, 0),
            weekend_lunch_end: at(15, 0),
            dinner_start: at(18, 0),
            images: MenuImages::default(),
        }
    }
}

impl DailyMenu {
    /// Board for a local instant.
    ///
    /// The dinner board wins from `dinner_start` on. During lunch hours the weekday decides.
    /// Any other time shows the weekday lunch board.
    #[must_use]
    pub fn board(&self, now: NaiveDateTime) -> MenuBoard {
        let minute = minute_of_day(now.time());
        let weekday = now.weekday();
        let lunch_end = match weekday {
            Weekday::Sat | Weekday::Sun => self.weekend_lunch_end,
            _ => self.weekday_lunch_end,
        };

        if minute >= minute_of_day(self.dinner_start) {
            return MenuBoard::Dinner;
        }
        if (minute_of_day(self.lunch_start)..minute_of_day(lunch_end)).contains(&minute) {
            return match weekday {
                Weekday::Sun => MenuBoard::SundayLunch,
                Weekday::Sat => MenuBoard::SaturdayLunch,
                _ => MenuBoard::WeekdayLunch,
            };
        }
        MenuBoard::WeekdayLunch
    }

    /// Image URL of the board for a local instant.
    #[must_use]
    pub fn current_image(&self, now: NaiveDateTime) -> &str {
        self.images.url(self.board(now))
    }

    /// One-line summary of the dishes of the day; `None` when nothing is set.
    #[must_use]
    pub fn specials(&self) -> Option<String> {
        let parts: Vec<String> = [
            ("Sopa", &self.soup),
            ("Ensalada", &self.salad),
            ("Principio", &self.side),
        ]
        .into_iter()
        .filter(|(_, dish)| !dish.trim().is_empty())
        .map(|(label, dish)| format!("{label}: {}", dish.trim()))
        .collect();
        (!parts.is_empty()).then(|| parts.join(" · "))
    }
}
