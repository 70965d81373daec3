//! # linkgen-notify
//!
//! Lead-submission notification for linkgen.
//!
//! A submitted lead produces two deterministic texts: an acknowledgment
//! addressed to the submitter (returned in the HTTP response) and an
//! internal notification carrying all submission fields, delivered as a
//! single SMS to a fixed admin number.
//!
//! The `SmsGateway` trait abstracts the messaging provider; production
//! uses `TwilioGateway`, tests use `MockSmsGateway`.

mod error;
mod gateway;
mod lead;
mod twilio;

pub use error::{NotifyError, Result};
pub use gateway::{MockSmsGateway, SentSms, SmsGateway, SmsReceipt};
pub use lead::{acknowledgment_message, internal_notification, LeadSubmission};
pub use twilio::{TwilioConfig, TwilioGateway};
