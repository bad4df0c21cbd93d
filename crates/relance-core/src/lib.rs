pub mod client;
pub mod config;
pub mod error;
pub mod template;
pub mod tz;
pub mod validate;

pub use client::{Client, ClientPatch, NewClient};
pub use error::{RelanceError, Result};
