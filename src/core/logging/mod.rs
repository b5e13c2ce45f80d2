pub mod logging_models;
pub mod logging_service;

pub use logging_models::{
    CommandOrigin, ErrorReport, PrefixInvocation, SlashInvocation,
};
pub use logging_service::{EventLog, LogSink, OwnerNotifier};
