pub mod channel;
pub mod email;
pub mod error;
pub mod phone;
pub mod sms;

pub use channel::{Channel, OutboundReminder};
pub use email::EmailChannel;
pub use error::ChannelError;
pub use sms::SmsChannel;
