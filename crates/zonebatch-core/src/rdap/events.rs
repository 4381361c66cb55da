//! Registration interval from the `events` of an RDAP domain object (RFC 9083 §4.5).

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use super::error::LookupError;

/// Events whose dates bound a registration.
pub const INFORMATIVE_EVENTS: [&str; 5] = [
    "registration",
    "reregistration",
    "expiration",
    "deletion",
    "reinstantiation",
];

/// Administrative events that say nothing about when the name was registered.
pub const IGNORABLE_EVENTS: [&str; 7] = [
    "last changed",
    "transfer",
    "locked",
    "unlocked",
    "last update of RDAP database",
    "registrar expiration",
    "enum validation expiration",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Informative,
    Ignorable,
}

/// Unknown actions are rejected so new registry vocabulary is noticed.
pub fn classify(action: &str) -> Result<EventKind, LookupError> {
    if INFORMATIVE_EVENTS.contains(&action) {
        Ok(EventKind::Informative)
    } else if IGNORABLE_EVENTS.contains(&action) {
        Ok(EventKind::Ignorable)
    } else {
        Err(LookupError::UnknownEvent(action.to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub struct DomainRecord {
    #[serde(default)]
    pub events: Option<Vec<Event>>,
}

#[derive(Debug, Deserialize)]
pub struct Event {
    #[serde(rename = "eventAction")]
    pub action: Option<String>,
    #[serde(rename = "eventDate")]
    pub date: Option<String>,
}

/// Calendar date of an RDAP timestamp, in the timestamp's own offset.
pub fn parse_event_date(text: &str) -> Result<NaiveDate, LookupError> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Ok(stamp.date_naive());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.date());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| LookupError::EventDate(text.to_string()))
}

/// Registration interval `[start, until]`; `None` ends are unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Interval {
    pub start: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

impl Interval {
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Earliest and latest of `dates`; unbounded when empty.
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        dates.into_iter().fold(Self::unbounded(), |acc, date| Self {
            start: Some(acc.start.map_or(date, |s| s.min(date))),
            until: Some(acc.until.map_or(date, |u| u.max(date))),
        })
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.until.is_none()
    }
}

/// Interval from a raw RDAP domain response.
pub fn interval_from_json(payload: &[u8]) -> Result<Interval, LookupError> {
    let record: DomainRecord = serde_json::from_slice(payload)?;
    let mut dates = Vec::new();
    for event in record.events.unwrap_or_default() {
        let (Some(action), Some(date)) = (&event.action, &event.date) else {
            return Err(LookupError::EventFormat(format!("{:?}", event)));
        };
        if classify(action)? == EventKind::Informative {
            dates.push(parse_event_date(date)?);
        }
    }
    Ok(Interval::from_dates(dates))
}
