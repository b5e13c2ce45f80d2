// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "managed/mod.rs"]
pub mod managed;

#[path = "cleanup/bulk_clear.rs"]
pub mod cleanup;

#[path = "collection/collection_service.rs"]
pub mod collection;

#[path = "customization/mod.rs"]
pub mod customization;

#[path = "logging/mod.rs"]
pub mod logging;
