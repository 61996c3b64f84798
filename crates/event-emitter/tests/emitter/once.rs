//! Tests for once-listeners.

use event_emitter::Emitter;

use super::support::{counter, hits, logger, make_log};

#[test]
fn once_listener_fires_only_on_the_first_emit() {
    let ee: Emitter = Emitter::new();
    let (handle_foo, foo) = counter();
    ee.register_once("foo", &handle_foo);

    ee.emit("foo", &[]);
    assert_eq!(hits(&foo), 1);

    ee.emit("foo", &[]);
    assert_eq!(hits(&foo), 1);
    assert!(!ee.has_listeners("foo"));
}

#[test]
fn once_listener_can_be_deregistered_by_its_callback() {
    let ee: Emitter = Emitter::new();
    let (handle_foo, foo) = counter();
    ee.register_once("foo", &handle_foo);

    assert!(ee.deregister("foo", &handle_foo));

    ee.emit("foo", &[]);
    assert_eq!(hits(&foo), 0);
}

#[test]
fn once_and_persistent_registrations_are_independent() {
    let ee: Emitter = Emitter::new();
    let (cb, count) = counter();

    ee.register("ev", &cb);
    ee.register_once("ev", &cb);

    ee.emit("ev", &[]);
    assert_eq!(hits(&count), 2);

    ee.emit("ev", &[]);
    assert_eq!(hits(&count), 3);
    assert_eq!(ee.listener_count("ev"), 1);
}

#[test]
fn deregister_removes_whichever_registration_came_first() {
    let ee: Emitter = Emitter::new();
    let (cb, count) = counter();

    ee.register_once("ev", &cb);
    ee.register("ev", &cb);

    // The once-entry was first, so the persistent one survives.
    ee.deregister("ev", &cb);
    ee.emit("ev", &[]);
    ee.emit("ev", &[]);

    assert_eq!(hits(&count), 2);
}

#[test]
fn once_listeners_keep_their_place_in_registration_order() {
    let ee: Emitter = Emitter::new();
    let log = make_log();

    ee.register_once("ev", &logger(&log, "once-1"));
    ee.register("ev", &logger(&log, "always"));
    ee.register_once("ev", &logger(&log, "once-2"));

    ee.emit("ev", &[]);
    ee.emit("ev", &[]);

    assert_eq!(
        *log.lock().unwrap(),
        vec!["once-1", "always", "once-2", "always"]
    );
}
