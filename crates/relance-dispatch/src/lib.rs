pub mod dispatcher;
pub mod report;
pub mod selector;

pub use dispatcher::Dispatcher;
pub use report::{ChannelOutcome, ClientOutcome, DispatchErrorDetail, RunReport};
pub use selector::select_due_clients;

#[cfg(test)]
mod testutil;
