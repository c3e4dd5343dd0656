//! Core library for the contact relay: submission validation, email rendering, and Mailgun delivery.

mod error;
mod mailgun;
mod submission;

pub use error::{RelayError, Result, ValidationError};
pub use mailgun::{
    render_html, DeliveryOutcome, MailgunClient, MailgunSettings, DEFAULT_BASE_URL, SUBJECT,
};
pub use submission::{
    ContactForm, ContactSubmission, MESSAGE_MIN_CHARS, NAME_MAX_CHARS, NAME_MIN_CHARS,
};
