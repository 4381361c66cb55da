//! Rate-limited RDAP domain lookups and registration intervals.

mod error;
mod events;
mod fqdn;
mod lookup;
mod sink;
mod task;

pub use error::LookupError;
pub use events::{
    classify, interval_from_json, parse_event_date, DomainRecord, Event, EventKind, Interval,
    IGNORABLE_EVENTS, INFORMATIVE_EVENTS,
};
pub use fqdn::Fqdn;
pub use lookup::{RdapLookup, Registration};
pub use sink::{IntervalSink, ReportWriter, RDAP_SOURCE};
pub use task::RdapTask;
