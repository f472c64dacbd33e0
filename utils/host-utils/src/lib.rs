//! Shared helpers for tracker hosts: reducer plumbing, panic capture at event
//! boundaries, and JSON field decoding.

pub mod decode;
mod error;

pub use error::{Error, Result};

pub mod guard {
    use std::any::Any;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    /// Details about a captured panic payload.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum PanicInfo {
        /// A panic with a string message.
        Message(String),
        /// A panic without a string payload.
        Unknown,
    }

    impl PanicInfo {
        /// Render the panic payload as a human-readable message.
        pub fn render(&self) -> String {
            match self {
                Self::Message(msg) => msg.clone(),
                Self::Unknown => "panic payload: <non-string>".to_string(),
            }
        }
    }

    fn from_payload(payload: &(dyn Any + Send)) -> PanicInfo {
        if let Some(msg) = payload.downcast_ref::<&str>() {
            return PanicInfo::Message((*msg).to_string());
        }
        if let Some(msg) = payload.downcast_ref::<String>() {
            return PanicInfo::Message(msg.clone());
        }
        PanicInfo::Unknown
    }

    /// Execute `f`, returning a `PanicInfo` if a panic occurs.
    pub fn catch_unwind_result<F, R>(f: F) -> Result<R, PanicInfo>
    where
        F: FnOnce() -> R,
    {
        match catch_unwind(AssertUnwindSafe(f)) {
            Ok(value) => Ok(value),
            Err(payload) => Err(from_payload(payload.as_ref())),
        }
    }

    /// Execute `f`, returning `fallback` on panic and invoking `on_panic`.
    pub fn with_panic<F, R, G>(fallback: R, f: F, on_panic: G) -> R
    where
        F: FnOnce() -> R,
        G: FnOnce(PanicInfo),
    {
        match catch_unwind_result(f) {
            Ok(value) => value,
            Err(info) => {
                on_panic(info);
                fallback
            }
        }
    }

    /// Execute an event handler, logging a panic under `label` instead of
    /// unwinding into the host.
    pub fn run_logged<F, R>(label: &str, fallback: R, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        with_panic(fallback, f, |info| {
            tracing::error!(handler = label, panic = %info.render(), "guard:panic");
        })
    }
}

pub mod state_machine {
    /// Reducer output: effect list to execute and an optional command to dispatch.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Transition<E, C> {
        pub effects: Vec<E>,
        pub command: Option<C>,
    }

    impl<E, C> Default for Transition<E, C> {
        fn default() -> Self {
            Self {
                effects: Vec::new(),
                command: None,
            }
        }
    }

    impl<E, C> Transition<E, C> {
        pub fn with_effect(effect: E) -> Self {
            Self {
                effects: vec![effect],
                command: None,
            }
        }

        pub fn push_effect(&mut self, effect: E) {
            self.effects.push(effect);
        }

        pub fn set_command(&mut self, command: C) {
            self.command = Some(command);
        }

        pub fn is_empty(&self) -> bool {
            self.effects.is_empty() && self.command.is_none()
        }

        /// True when the reducer changed state that has to be written back.
        pub fn has_effects(&self) -> bool {
            !self.effects.is_empty()
        }
    }

    /// Generic reducer contract for state machines that emit effects and commands.
    pub trait Machine {
        type Event;
        type Effect;
        type Command;

        fn reduce(&mut self, event: Self::Event) -> Transition<Self::Effect, Self::Command>;
    }
}
