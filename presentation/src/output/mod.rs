//! Output formatting and console notifications

pub mod console;
pub mod messages;
pub mod notifier;
pub mod status;
