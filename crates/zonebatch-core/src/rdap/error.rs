use std::io;

use thiserror::Error;

use crate::rate_limit::RateError;
use crate::task::TaskError;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("unexpected FQDN: {0:?}")]
    Fqdn(String),

    #[error("unexpected event: {0:?}")]
    UnknownEvent(String),

    #[error("unexpected JSON format for event: {0}")]
    EventFormat(String),

    #[error("unparseable event date: {0:?}")]
    EventDate(String),

    #[error("parse RDAP response")]
    Payload(#[from] serde_json::Error),

    #[error(transparent)]
    Rate(#[from] RateError),

    #[error(transparent)]
    Task(#[from] TaskError),

    #[error("write report")]
    Report(#[source] io::Error),
}
