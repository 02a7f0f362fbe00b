//! Client library for the upstream yard-management API.
//!
//! Wraps token exchange, appointment search, trailer check-in, condition-code
//! lookup, and document upload behind typed methods on [`YardClient`], and
//! normalizes the upstream's heterogeneous success/failure response shapes
//! into results a kiosk client can display.

mod auth;
mod checkin;
mod client;
mod config;
mod documents;
mod error;
mod search;
mod types;

pub use client::YardClient;
pub use config::UpstreamConfig;
pub use documents::SignatureUpload;
pub use error::YardError;
pub use search::{format_date, format_status, tokenize_criteria, SearchMode, SearchOutcome};
pub use types::{Appointment, CheckInOutcome, CheckInRequest, ConditionCode};
