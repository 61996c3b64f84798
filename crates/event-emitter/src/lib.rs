//! Named-event publish/subscribe.
//!
//! [`Emitter`] keeps an ordered list of listeners per event name and fires
//! them synchronously, in registration order, on [`Emitter::emit`].
//!
//! # Modules
//!
//! - [`emitter`] — the registry and dispatch ([`Emitter`], [`Callback`]).
//! - [`args`] — positional JSON argument helpers.
//! - [`target`] — [`EventTarget`], for types that expose an owned emitter.
//! - [`options`] — [`EmitterOptions`].
//! - [`error`] — [`EmitterError`].

pub mod args;
pub mod emitter;
pub mod error;
pub mod options;
pub mod target;

pub use args::{arg, to_args};
pub use emitter::{Callback, Emitter, ListenerFn, ListenerId};
pub use error::EmitterError;
pub use options::EmitterOptions;
pub use target::EventTarget;
