//! Alert delivery for date reminders.
//!
//! This crate provides:
//! - `AlertSink` trait for pluggable delivery channels
//! - Log and webhook sink implementations
//! - Delivery capability state machine (`Unrequested -> Requested -> Granted | Denied`)
//! - Dispatcher that fans an alert out to every configured sink

pub mod capability;
pub mod dispatcher;
pub mod log;
pub mod traits;
pub mod webhook;

pub use capability::{Capability, CapabilityGate, CapabilityState, FixedCapability, GrantPrompt};
pub use dispatcher::Dispatcher;
pub use log::LogSink;
pub use traits::{Alert, AlertSink, DispatchResult, NotifyError};
pub use webhook::WebhookSink;
