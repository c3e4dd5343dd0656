mod contact;
mod health;

pub use contact::submit_contact;
pub use health::{favicon, greeting};
