//! Detection of recurring appointment series that are about to end.
//!
//! Works on appointment data already fetched from the calendar API; the
//! HTTP client itself lives elsewhere.

use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, Duration};

use crate::search::Searchable;

/// Default look-ahead for [`lookahead_window`], in days.
pub const DEFAULT_LOOKAHEAD_DAYS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: u64,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub calendar: Option<CalendarRef>,
    #[serde(default)]
    pub start_date: Option<String>,
    /// Zero or absent for one-off appointments.
    #[serde(default)]
    pub repeat_id: Option<u64>,
    #[serde(default)]
    pub repeat_until: Option<String>,
    #[serde(default)]
    pub additionals: Option<Vec<AdditionalDate>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarRef {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

/// An extra occurrence added to a series by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalDate {
    #[serde(default)]
    pub date: Option<String>,
}

/// The API returns either plain appointments or calculated occurrences
/// wrapping their base appointment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AppointmentRecord {
    Calculated { base: Appointment },
    Base(Appointment),
}

impl AppointmentRecord {
    pub fn base(&self) -> &Appointment {
        match self {
            AppointmentRecord::Calculated { base } | AppointmentRecord::Base(base) => base,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesEnd {
    /// Last known occurrence.
    Ends(Date),
    /// No end date could be determined; the series is treated as ongoing.
    Open,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiringSeries {
    pub appointment: Appointment,
    pub end: SeriesEnd,
}

impl Appointment {
    pub fn is_recurring(&self) -> bool {
        self.repeat_id.is_some_and(|id| id != 0)
    }

    /// End of the series. A non-empty `repeatUntil` decides on its own;
    /// otherwise the latest parseable additional date is used.
    ///
    /// `None` when `repeatUntil` is set but is not a date: such a series has
    /// no usable end and cannot be classified.
    pub fn effective_end(&self) -> Option<SeriesEnd> {
        if let Some(until) = self.repeat_until.as_deref().filter(|s| !s.is_empty()) {
            return parse_date(until).map(SeriesEnd::Ends);
        }
        let latest = self
            .additionals
            .iter()
            .flatten()
            .filter_map(|a| a.date.as_deref().and_then(parse_date))
            .max();
        Some(latest.map_or(SeriesEnd::Open, SeriesEnd::Ends))
    }
}

/// Parse the `YYYY-MM-DD` prefix of an API date or timestamp.
pub fn parse_date(value: &str) -> Option<Date> {
    let prefix = value.get(..10)?;
    Date::parse(prefix, &format_description!("[year]-[month]-[day]")).ok()
}

/// Date range to fetch appointments for: today through `days` ahead.
pub fn lookahead_window(today: Date, days: i64) -> (Date, Date) {
    let end = today.checked_add(Duration::days(days)).unwrap_or(Date::MAX);
    (today, end)
}

/// Recurring series whose end lies on or after `today`, plus open-ended
/// series, de-duplicated by appointment id.
///
/// The first occurrence of an id fixes its position in the output; later
/// occurrences replace its data.
pub fn find_expiring_series(records: &[AppointmentRecord], today: Date) -> Vec<ExpiringSeries> {
    let mut series: Vec<ExpiringSeries> = Vec::new();
    let mut positions: HashMap<u64, usize> = HashMap::new();

    for record in records {
        let base = record.base();
        if !base.is_recurring() {
            continue;
        }
        let end = match base.effective_end() {
            Some(SeriesEnd::Ends(end)) if end < today => continue,
            Some(end) => end,
            None => {
                log::debug!("appointment {} has an unreadable repeatUntil", base.id);
                continue;
            }
        };
        let entry = ExpiringSeries {
            appointment: base.clone(),
            end,
        };
        match positions.get(&base.id) {
            Some(&index) => series[index] = entry,
            None => {
                positions.insert(base.id, series.len());
                series.push(entry);
            }
        }
    }

    log::debug!("{} of {} appointments belong to expiring series", series.len(), records.len());
    series
}

impl Searchable for Appointment {
    const INDEXED_FIELDS: &'static [&'static str] = &["caption", "calendar", "startDate"];

    fn field_text(&self, field: &str) -> Option<Cow<'_, str>> {
        let value = match field {
            "caption" => self.caption.as_str(),
            "calendar" => self.calendar.as_ref()?.name.as_str(),
            "startDate" => self.start_date.as_deref()?,
            _ => return None,
        };
        (!value.is_empty()).then_some(Cow::Borrowed(value))
    }
}
