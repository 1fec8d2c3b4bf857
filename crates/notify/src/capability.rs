//! Delivery capability state machine.
//!
//! ```text
//! Unrequested ──request_grant()──▶ Requested ──prompt──▶ Granted
//!                                              └───────▶ Denied
//! ```
//!
//! Only `Granted` lets alerts reach a sink. The transition out of
//! `Unrequested` happens on an explicit `request_grant()` call and the
//! external prompt is shown at most once per gate. `Granted` and `Denied`
//! are terminal.

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityState {
    Unrequested,
    Requested,
    Granted,
    Denied,
}

impl CapabilityState {
    pub fn is_granted(self) -> bool {
        self == CapabilityState::Granted
    }

    /// Whether the state can no longer change.
    pub fn is_settled(self) -> bool {
        matches!(self, CapabilityState::Granted | CapabilityState::Denied)
    }
}

impl fmt::Display for CapabilityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CapabilityState::Unrequested => "unrequested",
            CapabilityState::Requested => "requested",
            CapabilityState::Granted => "granted",
            CapabilityState::Denied => "denied",
        };
        f.write_str(s)
    }
}

/// Host capability to deliver alerts.
#[async_trait::async_trait]
pub trait Capability: Send + Sync {
    /// Current state; cheap, never prompts.
    fn state(&self) -> CapabilityState;

    /// Ask for permission. Settled states are returned unchanged.
    async fn request_grant(&self) -> CapabilityState;
}

/// The external prompt shown to the user. Returns `true` when granted.
#[async_trait::async_trait]
pub trait GrantPrompt: Send + Sync {
    async fn ask(&self) -> bool;
}

/// Capability with a preset state that never changes.
#[derive(Debug, Clone, Copy)]
pub struct FixedCapability(pub CapabilityState);

impl FixedCapability {
    pub fn granted() -> Self {
        Self(CapabilityState::Granted)
    }

    pub fn denied() -> Self {
        Self(CapabilityState::Denied)
    }
}

#[async_trait::async_trait]
impl Capability for FixedCapability {
    fn state(&self) -> CapabilityState {
        self.0
    }

    async fn request_grant(&self) -> CapabilityState {
        self.0
    }
}

/// Capability backed by a one-shot [`GrantPrompt`].
pub struct CapabilityGate<P> {
    prompt: P,
    state: Mutex<CapabilityState>,
}

impl<P: GrantPrompt> CapabilityGate<P> {
    pub fn new(prompt: P) -> Self {
        Self {
            prompt,
            state: Mutex::new(CapabilityState::Unrequested),
        }
    }

    fn read(&self) -> CapabilityState {
        match self.state.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn write(&self, next: CapabilityState) {
        match self.state.lock() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }

    /// Move `Unrequested -> Requested`; returns false if another caller got there first.
    fn claim_request(&self) -> bool {
        let mut guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if *guard == CapabilityState::Unrequested {
            *guard = CapabilityState::Requested;
            true
        } else {
            false
        }
    }
}

#[async_trait::async_trait]
impl<P: GrantPrompt> Capability for CapabilityGate<P> {
    fn state(&self) -> CapabilityState {
        self.read()
    }

    async fn request_grant(&self) -> CapabilityState {
        if !self.claim_request() {
            return self.read();
        }

        let next = if self.prompt.ask().await {
            CapabilityState::Granted
        } else {
            CapabilityState::Denied
        };
        self.write(next);
        tracing::info!(state = %next, "delivery capability settled");
        next
    }
}

#[async_trait::async_trait]
impl<C: Capability + ?Sized> Capability for Arc<C> {
    fn state(&self) -> CapabilityState {
        (**self).state()
    }

    async fn request_grant(&self) -> CapabilityState {
        (**self).request_grant().await
    }
}
