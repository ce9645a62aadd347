//! Integration tests for the errata-internals crate.
//!
//! ## Abandonment
//! - `test_abandon_called_once_for_shared_block`: the handler runs once, when
//!   the last of several handles is released
//! - `test_abandon_skipped_for_empty_block`: blocks without annotations are
//!   destroyed silently
//! - `test_abandon_across_threads`: handles released concurrently on many
//!   threads still report exactly once
//! - `test_release_silently_suppresses_report`: a discarded block is not
//!   reported
//! - `test_fork_reports_independently`: a copy-on-write fork is a block of its
//!   own
//!
//! ## Content
//! - `test_handler_sees_full_stack`: the handler observes every annotation,
//!   its severity and its text
//! - `test_append_into_shared_receiver`: appending through `make_mut` leaves
//!   the other handles untouched
//! - `test_many_rendered_annotations`: rendering across many arena chunks
//!   keeps every text intact

use std::{
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
};

use errata_internals::{
    RawErratum, RawErratumRef, handlers::AbandonHandler, severity::Severity,
};

macro_rules! counting_handler {
    ($name:ident, $counter:ident) => {
        static $counter: AtomicUsize = AtomicUsize::new(0);

        struct $name;

        impl AbandonHandler for $name {
            fn abandoned(_erratum: RawErratumRef<'_>) {
                $counter.fetch_add(1, Ordering::SeqCst);
            }
        }
    };
}

#[test]
fn test_abandon_called_once_for_shared_block() {
    counting_handler!(Handler, COUNT);

    let mut raw = RawErratum::new::<Handler>();
    raw.make_mut().push_static(Severity::Error, "lost");
    let first = raw.clone();
    let second = first.clone();
    assert_eq!(raw.strong_count(), 3);

    drop(raw);
    drop(first);
    assert_eq!(COUNT.load(Ordering::SeqCst), 0);
    drop(second);
    assert_eq!(COUNT.load(Ordering::SeqCst), 1);
}

#[test]
fn test_abandon_skipped_for_empty_block() {
    counting_handler!(Handler, COUNT);

    let raw = RawErratum::new::<Handler>();
    drop(raw.clone());
    drop(raw);

    let mut cleared = RawErratum::new::<Handler>();
    let mut data = cleared.make_mut();
    data.push_str(Severity::Warn, "temporary");
    data.clear();
    drop(cleared);

    assert_eq!(COUNT.load(Ordering::SeqCst), 0);
}

#[test]
fn test_abandon_across_threads() {
    counting_handler!(Handler, COUNT);

    for round in 0..20 {
        let mut raw = RawErratum::new::<Handler>();
        raw.make_mut()
            .push_fmt(Severity::Error, format_args!("round {round}"));

        let handles: Vec<RawErratum> = (0..8).map(|_| raw.clone()).collect();
        drop(raw);

        thread::scope(|scope| {
            for handle in handles {
                scope.spawn(move || drop(handle));
            }
        });

        assert_eq!(COUNT.load(Ordering::SeqCst), round + 1);
    }
}

#[test]
fn test_release_silently_suppresses_report() {
    counting_handler!(Handler, COUNT);

    let mut raw = RawErratum::new::<Handler>();
    raw.make_mut().push_static(Severity::Error, "acknowledged");
    let alias = raw.clone();

    // Shared: only this handle goes away
    assert!(!raw.release_silently());
    assert_eq!(alias.as_ref().len(), 1);

    // Last handle: the annotations are discarded
    assert!(alias.release_silently());
    assert_eq!(COUNT.load(Ordering::SeqCst), 0);
}

#[test]
fn test_fork_reports_independently() {
    counting_handler!(Handler, COUNT);

    let mut raw = RawErratum::new::<Handler>();
    raw.make_mut().push_static(Severity::Warn, "original");
    let mut fork = raw.clone();
    fork.make_mut().push_static(Severity::Error, "forked");
    assert!(!raw.ptr_eq(&fork));

    drop(raw);
    assert_eq!(COUNT.load(Ordering::SeqCst), 1);
    drop(fork);
    assert_eq!(COUNT.load(Ordering::SeqCst), 2);
}

static SEEN: Mutex<Vec<(Severity, u32, String)>> = Mutex::new(Vec::new());

struct RecordingHandler;

impl AbandonHandler for RecordingHandler {
    fn abandoned(erratum: RawErratumRef<'_>) {
        let mut seen = SEEN.lock().unwrap();
        assert_eq!(erratum.severity(), Severity::Error);
        for note in erratum.notes() {
            seen.push((note.severity(), note.level(), note.text().to_owned()));
        }
    }
}

#[test]
fn test_handler_sees_full_stack() {
    let mut donor = RawErratum::new::<RecordingHandler>();
    donor
        .make_mut()
        .push_str(Severity::Error, &String::from("disk full"));

    let mut raw = RawErratum::new::<RecordingHandler>();
    let mut data = raw.make_mut();
    data.push_static(Severity::Info, "saving");
    data.append(donor.as_ref());
    let written = 512;
    data.push_fmt(Severity::Diag, format_args!("{written} bytes"));
    assert!(donor.release_silently());
    drop(raw);

    let seen = SEEN.lock().unwrap();
    assert_eq!(
        *seen,
        [
            (Severity::Info, 0, "saving".to_owned()),
            (Severity::Error, 1, "disk full".to_owned()),
            (Severity::Diag, 0, "512 bytes".to_owned()),
        ]
    );
}

#[test]
fn test_append_into_shared_receiver() {
    counting_handler!(Handler, COUNT);

    let mut receiver = RawErratum::new::<Handler>();
    receiver.make_mut().push_static(Severity::Info, "mine");
    let observer = receiver.clone();

    let mut donor = RawErratum::new::<Handler>();
    donor.make_mut().push_str(Severity::Warn, "theirs");

    receiver.make_mut().append(donor.as_ref());
    assert_eq!(receiver.as_ref().len(), 2);
    assert_eq!(receiver.as_ref().severity(), Severity::Warn);
    assert_eq!(observer.as_ref().len(), 1);
    assert_eq!(observer.as_ref().severity(), Severity::Info);

    for handle in [receiver, observer, donor] {
        handle.release_silently();
    }
    assert_eq!(COUNT.load(Ordering::SeqCst), 0);
}

#[test]
fn test_many_rendered_annotations() {
    counting_handler!(Handler, COUNT);

    let mut raw = RawErratum::new::<Handler>();
    let mut data = raw.make_mut();
    for index in 0..2_000 {
        data.push_fmt(
            Severity::Diag,
            format_args!("annotation number {index:>6} {}", "-".repeat(index % 97)),
        );
    }

    for (index, note) in raw.as_ref().notes().iter().enumerate() {
        let expected = format!("annotation number {index:>6} {}", "-".repeat(index % 97));
        assert_eq!(note.text(), expected);
    }
    assert!(raw.release_silently());
    assert_eq!(COUNT.load(Ordering::SeqCst), 0);
}
