//! Emitter<A, E> — a named-event pub/sub registry.
//!
//! Each event name maps to one ordered list of listeners. Once-listeners and
//! persistent listeners share that list, so dispatch order is always
//! registration order.
//!
//! Snapshot-on-emit semantics mean:
//!   - A listener added *during* emission is NOT called until the next emit.
//!   - A listener removed *during* emission, before its turn, is not called.
//!   - A once-listener is taken out of the registry right before it runs, so
//!     nested emits of the same event can never fire it twice.
//!
//! Panics inside a listener propagate to the caller and abort the rest of
//! that dispatch. There is no error isolation at this level.
//!
//! All methods take `&self` (interior mutability via `parking_lot::Mutex`).
//! The lock is never held while a callback runs, so listeners may register,
//! deregister or emit on the same emitter without deadlocking.

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;

use crate::{args::to_args, error::Result, options::EmitterOptions};

/// An ID returned by every registration, accepted by
/// [`Emitter::remove_listener`].
pub type ListenerId = u64;

/// Closure type for event listeners.
pub type ListenerFn<A> = dyn Fn(&A) + Send + Sync;

// ============================================================================
// Callback
// ============================================================================

/// A shareable listener callback.
///
/// Equality is identity: two `Callback`s are equal when they are clones of
/// the same [`Callback::new`] call. This is what [`Emitter::deregister`]
/// matches on.
pub struct Callback<A: ?Sized = [Value]>(Arc<ListenerFn<A>>);

impl<A: ?Sized> Callback<A> {
    /// Wrap `f`. Every call creates a new identity.
    pub fn new(f: impl Fn(&A) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Invoke the callback directly.
    pub fn call(&self, args: &A) {
        (self.0)(args)
    }
}

impl<A: ?Sized> Clone for Callback<A> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<A: ?Sized> PartialEq for Callback<A> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl<A: ?Sized> Eq for Callback<A> {}

impl<A: ?Sized> fmt::Debug for Callback<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callback")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

// ============================================================================
// Registry
// ============================================================================

struct Entry<A: ?Sized> {
    id: ListenerId,
    callback: Callback<A>,
    once: bool,
    /// Shared with every snapshot of this entry; cleared on removal.
    alive: Arc<AtomicBool>,
}

impl<A: ?Sized> Clone for Entry<A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            callback: self.callback.clone(),
            once: self.once,
            alive: Arc::clone(&self.alive),
        }
    }
}

struct Registry<A: ?Sized, E> {
    /// Live listeners per event. Empty lists are removed eagerly.
    listeners: HashMap<E, Vec<Entry<A>>>,
    /// Events that already triggered the `max_listeners` warning.
    warned: HashSet<E>,
}

// Removed entries are returned, never dropped here. Callers drop them after
// releasing the lock, since a callback's captures may touch the emitter on drop.
impl<A: ?Sized, E: Hash + Eq> Registry<A, E> {
    /// Remove the first entry of `event` matching `pred`.
    fn take<Q>(&mut self, event: &Q, pred: impl Fn(&Entry<A>) -> bool) -> Option<Entry<A>>
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let list = self.listeners.get_mut(event)?;
        let pos = list.iter().position(pred)?;
        let entry = list.remove(pos);
        entry.alive.store(false, Ordering::Release);
        if list.is_empty() {
            self.remove_event(event);
        }
        Some(entry)
    }

    /// Remove every entry of `event`.
    fn remove_event<Q>(&mut self, event: &Q) -> Vec<Entry<A>>
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.warned.remove(event);
        let list = self.listeners.remove(event).unwrap_or_default();
        for entry in &list {
            entry.alive.store(false, Ordering::Release);
        }
        list
    }

    /// Remove every entry of every event.
    fn remove_all(&mut self) -> HashMap<E, Vec<Entry<A>>> {
        self.warned.clear();
        let listeners = std::mem::take(&mut self.listeners);
        for entry in listeners.values().flatten() {
            entry.alive.store(false, Ordering::Release);
        }
        listeners
    }
}

// ============================================================================
// Emitter
// ============================================================================

/// Synchronous named-event emitter.
///
/// `A` is the argument payload handed to every listener (positional JSON
/// values by default) and `E` the event name type.
pub struct Emitter<A: ?Sized = [Value], E = String> {
    registry: Mutex<Registry<A, E>>,
    next_id: AtomicU64,
    options: EmitterOptions,
}

impl<A: ?Sized, E> Emitter<A, E>
where
    E: Hash + Eq + Clone + fmt::Debug,
{
    /// Create a new, empty emitter.
    pub fn new() -> Self {
        Self::with_options(EmitterOptions::default())
    }

    /// Create a new, empty emitter configured by `options`.
    pub fn with_options(options: EmitterOptions) -> Self {
        Self {
            registry: Mutex::new(Registry {
                listeners: HashMap::new(),
                warned: HashSet::new(),
            }),
            next_id: AtomicU64::new(1),
            options,
        }
    }

    /// Append a persistent listener for `event`.
    ///
    /// Registering the same callback twice adds two entries; both fire.
    pub fn register(&self, event: impl Into<E>, callback: &Callback<A>) -> ListenerId {
        self.add(event.into(), callback, false)
    }

    /// Append a listener that fires on the next emit of `event` only.
    pub fn register_once(&self, event: impl Into<E>, callback: &Callback<A>) -> ListenerId {
        self.add(event.into(), callback, true)
    }

    /// Remove the first entry for `event` whose callback is `callback`,
    /// whether persistent or once. Returns `false` if nothing matched.
    pub fn deregister<Q>(&self, event: &Q, callback: &Callback<A>) -> bool
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let removed = self
            .registry
            .lock()
            .take(event, |entry| entry.callback == *callback);
        removed.is_some()
    }

    /// Remove every listener for `event`.
    pub fn deregister_all<Q>(&self, event: &Q)
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let removed = self.registry.lock().remove_event(event);
        drop(removed);
    }

    /// Remove the listener registered under `id`, on whatever event.
    ///
    /// Does nothing if `id` is not present (safe to call multiple times).
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let removed = {
            let mut registry = self.registry.lock();
            let Some(event) = registry
                .listeners
                .iter()
                .find(|(_, list)| list.iter().any(|entry| entry.id == id))
                .map(|(event, _)| event.clone())
            else {
                return false;
            };
            registry.take(&event, |entry| entry.id == id)
        };
        removed.is_some()
    }

    /// Call every listener registered for `event`, in registration order.
    pub fn emit<Q>(&self, event: &Q, args: &A)
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let snapshot: Vec<Entry<A>> = match self.registry.lock().listeners.get(event) {
            Some(list) => list.clone(),
            None => return,
        };
        tracing::trace!(listeners = snapshot.len(), "emit");

        for entry in snapshot {
            // Lock is released before the callback runs.
            if self.claim(event, &entry) {
                entry.callback.call(args);
            }
        }
    }

    /// Number of listeners currently registered for `event`.
    pub fn listener_count<Q>(&self, event: &Q) -> usize
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.registry.lock().listeners.get(event).map_or(0, Vec::len)
    }

    /// Whether `event` has at least one listener.
    pub fn has_listeners<Q>(&self, event: &Q) -> bool
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.listener_count(event) > 0
    }

    /// Events that currently have at least one listener, in no particular
    /// order.
    pub fn event_names(&self) -> Vec<E> {
        self.registry.lock().listeners.keys().cloned().collect()
    }

    /// Whether no event has any listener.
    pub fn is_empty(&self) -> bool {
        self.registry.lock().listeners.is_empty()
    }

    /// Remove every listener for every event.
    pub fn clear(&self) {
        let removed = self.registry.lock().remove_all();
        drop(removed);
    }

    // ------------------------------------------------------------------------
    // Aliases
    // ------------------------------------------------------------------------

    /// Alias for [`Emitter::register`].
    pub fn listen(&self, event: impl Into<E>, callback: &Callback<A>) -> ListenerId {
        self.register(event, callback)
    }

    /// Alias for [`Emitter::register`].
    pub fn on(&self, event: impl Into<E>, callback: &Callback<A>) -> ListenerId {
        self.register(event, callback)
    }

    /// Alias for [`Emitter::register_once`].
    pub fn listen_once(&self, event: impl Into<E>, callback: &Callback<A>) -> ListenerId {
        self.register_once(event, callback)
    }

    /// Alias for [`Emitter::register_once`].
    pub fn once(&self, event: impl Into<E>, callback: &Callback<A>) -> ListenerId {
        self.register_once(event, callback)
    }

    /// Alias for [`Emitter::deregister`].
    pub fn unlisten<Q>(&self, event: &Q, callback: &Callback<A>) -> bool
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.deregister(event, callback)
    }

    /// Alias for [`Emitter::deregister`].
    pub fn off<Q>(&self, event: &Q, callback: &Callback<A>) -> bool
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.deregister(event, callback)
    }

    /// Alias for [`Emitter::deregister_all`].
    pub fn unlisten_all<Q>(&self, event: &Q)
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.deregister_all(event)
    }

    /// Alias for [`Emitter::emit`].
    pub fn trigger<Q>(&self, event: &Q, args: &A)
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.emit(event, args)
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn add(&self, event: E, callback: &Callback<A>, once: bool) -> ListenerId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut registry = self.registry.lock();
        let Registry { listeners, warned } = &mut *registry;

        let list = listeners.entry(event.clone()).or_default();
        list.push(Entry {
            id,
            callback: callback.clone(),
            once,
            alive: Arc::new(AtomicBool::new(true)),
        });

        if let Some(limit) = self.options.max_listeners {
            if list.len() > limit && warned.insert(event.clone()) {
                tracing::warn!(
                    event = ?event,
                    count = list.len(),
                    limit,
                    "listener count exceeds max_listeners, possible leak"
                );
            }
        }
        id
    }

    /// Decide whether a snapshotted entry still fires. Once-entries are
    /// claimed by clearing their flag, so only one dispatch can ever win them.
    fn claim<Q>(&self, event: &Q, entry: &Entry<A>) -> bool
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if !entry.once {
            return entry.alive.load(Ordering::Acquire);
        }
        if !entry.alive.swap(false, Ordering::AcqRel) {
            return false;
        }
        let removed = self.registry.lock().take(event, |live| live.id == entry.id);
        drop(removed);
        true
    }
}

impl<E> Emitter<[Value], E>
where
    E: Hash + Eq + Clone + fmt::Debug,
{
    /// Serialize `args` with [`to_args`] and emit the result.
    ///
    /// ```ignore
    /// emitter.emit_with("moved", (10, 20))?;
    /// ```
    pub fn emit_with<Q, T>(&self, event: &Q, args: T) -> Result<()>
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        T: Serialize,
    {
        let args = to_args(args)?;
        self.emit(event, &args);
        Ok(())
    }
}

impl<A: ?Sized, E> Default for Emitter<A, E>
where
    E: Hash + Eq + Clone + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ?Sized, E: fmt::Debug> fmt::Debug for Emitter<A, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.lock();
        let counts: Vec<(&E, usize)> = registry
            .listeners
            .iter()
            .map(|(event, list)| (event, list.len()))
            .collect();
        f.debug_struct("Emitter")
            .field("listeners", &counts)
            .field("options", &self.options)
            .finish()
    }
}
