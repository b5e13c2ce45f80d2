// Discord side of the event log: who invoked what, and how the owner hears about errors.

pub mod notifier;
pub mod origin;
