//! Weekly opening hours, special dates, and the service availability calculator.

use std::fmt;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::model::Service;

/// Upper bound on the number of calendar days searched for the next opening.
pub const MAX_LOOKAHEAD_DAYS: u64 = 14;

/// `HH:MM` (de)serialization for window boundaries.
pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    const FORMAT: &str = "%H:%M";

    pub(crate) fn serialize<S: Serializer>(
        time: &NaiveTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(raw.trim(), FORMAT).map_err(D::Error::custom)
    }
}

pub(crate) fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

pub(crate) fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

const fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Half-open `[start, end)` time range during which a service takes orders.
pub struct TimeWindow {
    /// First minute of service.
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    /// Closing minute; the service is closed from this minute on.
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    /// Disabled windows never open.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl TimeWindow {
    /// Enabled window from `start` to `end`.
    #[must_use]
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start,
            end,
            enabled: true,
        }
    }

    /// Same window, switched off.
    #[must_use]
    pub fn disabled(self) -> Self {
        Self {
            enabled: false,
            ..self
        }
    }

    /// Whether the window can ever be open.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.enabled && minute_of_day(self.start) < minute_of_day(self.end)
    }

    /// Whether `time` falls inside the window, compared at minute resolution.
    #[must_use]
    pub fn contains(&self, time: NaiveTime) -> bool {
        let minute = minute_of_day(time);
        self.is_usable() && minute_of_day(self.start) <= minute && minute < minute_of_day(self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Opening hours of one calendar day.
pub struct DaySchedule {
    /// A closed day serves nothing, whatever the windows say.
    #[serde(default)]
    pub closed: bool,
    /// Why the day is closed or special.
    #[serde(default)]
    pub reason: Option<String>,
    /// Lunch window.
    pub lunch: TimeWindow,
    /// Dinner window.
    pub dinner: TimeWindow,
}

impl DaySchedule {
    /// Regular day serving both services.
    #[must_use]
    pub fn open(lunch: TimeWindow, dinner: TimeWindow) -> Self {
        Self {
            lunch,
            dinner,
            closed: false,
            reason: None,
        }
    }

    /// Day without service.
    #[must_use]
    pub fn closed(reason: impl Into<String>) -> Self {
        Self {
            lunch: TimeWindow::new(at(11, 0), at(15, 0)).disabled(),
            dinner: TimeWindow::new(at(18, 0), at(21, 0)).disabled(),
            closed: true,
            reason: Some(reason.into()),
        }
    }

    /// Window configured for a service.
    #[must_use]
    pub fn window(&self, service: Service) -> &TimeWindow {
        match service {
            Service::Lunch => &self.lunch,
            Service::Dinner => &self.dinner,
        }
    }

    /// Whether the service runs at all on this day.
    #[must_use]
    pub fn serves(&self, service: Service) -> bool {
        !self.closed && self.window(service).is_usable()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Default opening hours per weekday.
pub struct WeeklySchedule {
    /// Monday.
    pub monday: DaySchedule,
    /// Tuesday.
    pub tuesday: DaySchedule,
    /// Wednesday.
    pub wednesday: DaySchedule,
    /// Thursday.
    pub thursday: DaySchedule,
    /// Friday.
    pub friday: DaySchedule,
    /// Saturday.
    pub saturday: DaySchedule,
    /// Sunday.
    pub sunday: DaySchedule,
}

impl WeeklySchedule {
    /// Schedule for a weekday.
    #[must_use]
    pub fn day(&self, weekday: Weekday) -> &DaySchedule {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }
}

impl Default for WeeklySchedule {
    fn default() -> Self {
        let lunch = TimeWindow::new(at(11, 0), at(15, 0));
        let dinner = TimeWindow::new(at(18, 0), at(21, 0));
        let late_dinner = TimeWindow::new(at(18, 0), at(22, 0));

        Self {
            monday: DaySchedule::closed("Día de descanso del personal"),
            tuesday: DaySchedule::open(lunch, dinner),
            wednesday: DaySchedule::open(lunch, dinner),
            thursday: DaySchedule::open(lunch, dinner),
            friday: DaySchedule::open(lunch, late_dinner),
            saturday: DaySchedule::open(lunch, late_dinner),
            sunday: DaySchedule::open(lunch, dinner.disabled()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Date-specific override of the weekly schedule.
pub struct SpecialDate {
    /// Calendar date the override applies to.
    pub date: NaiveDate,
    /// Announcement shown to customers.
    pub reason: String,
    /// Hours replacing the weekday default.
    pub schedule: DaySchedule,
}

/// Built-in holiday overrides.
fn default_special_dates() -> Vec<SpecialDate> {
    let christmas_eve_eve = NaiveDate::from_ymd_opt(2024, 12, 23).map(|date| SpecialDate {
        date,
        schedule: DaySchedule {
            reason: Some("Apertura especial por festividad".to_owned()),
            ..DaySchedule::open(
                TimeWindow::new(at(12, 0), at(16, 0)),
                TimeWindow::new(at(19, 0), at(22, 0)),
            )
        },
        reason: "Apertura especial - Víspera de Navidad".to_owned(),
    });
    let christmas = NaiveDate::from_ymd_opt(2024, 12, 25).map(|date| SpecialDate {
        date,
        schedule: DaySchedule::closed("Celebración navideña"),
        reason: "Cerrado por Navidad".to_owned(),
    });
    [christmas_eve_eve, christmas].into_iter().flatten().collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Weekly hours plus date overrides.
pub struct Timetable {
    /// Default hours per weekday.
    #[serde(default)]
    pub weekly: WeeklySchedule,
    /// Overrides keyed by exact date.
    #[serde(default = "default_special_dates")]
    pub special_dates: Vec<SpecialDate>,
}

impl Default for Timetable {
    fn default() -> Self {
        Self {
            weekly: WeeklySchedule::default(),
            special_dates: default_special_dates(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Future start of a service.
pub struct Opening {
    /// Service that opens.
    pub service: Service,
    /// Calendar date of the opening.
    pub date: NaiveDate,
    /// Weekday of `date`, kept for labels.
    pub weekday: Weekday,
    /// Start time.
    pub start: NaiveTime,
}

impl fmt::Display for Opening {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{} on {} at {}",
            self.service,
            self.date.format("%a %d/%m"),
            self.start.format("%H:%M")
        )
    }
}

impl Opening {
    fn sort_key(&self) -> (NaiveDate, NaiveTime) {
        (self.date, self.start)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// State of one service at a given instant.
pub struct ServiceStatus {
    /// The service described.
    pub service: Service,
    /// Whether the service runs at all today.
    pub enabled_today: bool,
    /// Whether orders are accepted right now.
    pub open_now: bool,
    /// Today's window, when the service runs today.
    pub window: Option<TimeWindow>,
    /// Next start when not open now.
    pub next_opening: Option<Opening>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome of the availability calculation for an instant.
pub struct Availability {
    /// Instant the calculation was made for, in restaurant local time.
    pub at: NaiveDateTime,
    /// Whole day closed.
    pub closed_today: bool,
    /// Today's hours come from a special date.
    pub special_day: bool,
    /// Closure or special-day announcement.
    pub reason: Option<String>,
    /// Lunch status.
    pub lunch: ServiceStatus,
    /// Dinner status.
    pub dinner: ServiceStatus,
}

impl Availability {
    /// Status of a service.
    #[must_use]
    pub fn status(&self, service: Service) -> &ServiceStatus {
        match service {
            Service::Lunch => &self.lunch,
            Service::Dinner => &self.dinner,
        }
    }

    /// Whether the service accepts orders now.
    #[must_use]
    pub fn is_open(&self, service: Service) -> bool {
        self.status(service).open_now
    }

    /// Whether any service accepts orders now.
    #[must_use]
    pub fn any_open(&self) -> bool {
        self.lunch.open_now || self.dinner.open_now
    }

    /// Earliest upcoming opening across services that are not open.
    #[must_use]
    pub fn next_opening(&self) -> Option<&Opening> {
        [&self.lunch, &self.dinner]
            .into_iter()
            .filter_map(|status| status.next_opening.as_ref())
            .min_by_key(|opening| opening.sort_key())
    }

    /// Service the menu should show first.
    #[must_use]
    pub fn suggested_service(&self) -> Service {
        if self.dinner.open_now {
            return Service::Dinner;
        }
        if self.lunch.open_now {
            return Service::Lunch;
        }
        self.next_opening()
            .map_or(Service::Lunch, |opening| opening.service)
    }
}

impl Timetable {
    /// Override registered for the exact date.
    #[must_use]
    pub fn special_date(&self, date: NaiveDate) -> Option<&SpecialDate> {
        self.special_dates.iter().find(|special| special.date == date)
    }

    /// Effective hours of a date.
    #[must_use]
    pub fn day(&self, date: NaiveDate) -> &DaySchedule {
        self.special_date(date)
            .map_or_else(|| self.weekly.day(date.weekday()), |special| &special.schedule)
    }

    /// Next start of `service` strictly after `now`.
    ///
    /// Searches at most [`MAX_LOOKAHEAD_DAYS`] calendar days starting with today, so a
    /// timetable that never serves the service yields `None`.
    #[must_use]
    pub fn next_opening(&self, service: Service, now: NaiveDateTime) -> Option<Opening> {
        let today = now.date();
        let now_minute = minute_of_day(now.time());

        for offset in 0..MAX_LOOKAHEAD_DAYS {
            let date = today.checked_add_days(Days::new(offset))?;
            let day = self.day(date);
            if !day.serves(service) {
                continue;
            }
            let window = day.window(service);
            if offset == 0 && minute_of_day(window.start) <= now_minute {
                continue;
            }
            return Some(Opening {
                service,
                date,
                weekday: date.weekday(),
                start: window.start,
            });
        }
        None
    }

    /// Compute which services accept orders at `now`.
    #[must_use]
    pub fn availability(&self, now: NaiveDateTime) -> Availability {
        let date = now.date();
        let special = self.special_date(date);
        let day = self.day(date);

        let status = |service: Service| {
            let enabled_today = day.serves(service);
            let open_now = enabled_today && day.window(service).contains(now.time());
            ServiceStatus {
                service,
                enabled_today,
                open_now,
                window: enabled_today.then(|| *day.window(service)),
                next_opening: if open_now {
                    None
                } else {
                    self.next_opening(service, now)
                },
            }
        };

        Availability {
            at: now,
            closed_today: day.closed,
            special_day: special.is_some(),
            reason: day
                .reason
                .clone()
                .or_else(|| special.map(|special| special.reason.clone())),
            lunch: status(Service::Lunch),
            dinner: status(Service::Dinner),
        }
    }
}
