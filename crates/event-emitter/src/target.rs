//! EventTarget — turn any type that owns an [`Emitter`] into an emitter.
//!
//! Implementors provide [`EventTarget::emitter`]; the registration and
//! dispatch methods are forwarded to it.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use crate::emitter::{Callback, Emitter, ListenerId};

pub trait EventTarget {
    /// Argument payload passed to listeners.
    type Args: ?Sized;
    /// Event name type.
    type Event: Hash + Eq + Clone + fmt::Debug;

    fn emitter(&self) -> &Emitter<Self::Args, Self::Event>;

    fn register(
        &self,
        event: impl Into<Self::Event>,
        callback: &Callback<Self::Args>,
    ) -> ListenerId {
        self.emitter().register(event, callback)
    }

    fn register_once(
        &self,
        event: impl Into<Self::Event>,
        callback: &Callback<Self::Args>,
    ) -> ListenerId {
        self.emitter().register_once(event, callback)
    }

    fn deregister<Q>(&self, event: &Q, callback: &Callback<Self::Args>) -> bool
    where
        Self::Event: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.emitter().deregister(event, callback)
    }

    fn deregister_all<Q>(&self, event: &Q)
    where
        Self::Event: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.emitter().deregister_all(event)
    }

    fn emit<Q>(&self, event: &Q, args: &Self::Args)
    where
        Self::Event: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.emitter().emit(event, args)
    }
}
