// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "managed/json_store.rs"]
pub mod managed;

#[path = "logging/file_sink.rs"]
pub mod logging;

#[path = "preview/mod.rs"]
pub mod preview;
