//! Shared test collaborators.
//!
//! `Recorder` implements every sink trait and keeps an ordered event list.
//! Its terminator records the call and then panics with [`Halt`], which tests
//! catch to observe that nothing after termination ran.

#![allow(dead_code)]

use hresult_escalation::{
    AlertStyle, AlertSurface, Alert, BuiltinLookup, DebugChannel, LanguageId, LogSink, Reporter,
    StatusCode, StatusLookup, Terminator,
};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Debug(String),
    Log(String),
    Alert {
        title: String,
        body: String,
        style: AlertStyle,
    },
    Terminate,
}

/// Panic payload standing in for process termination.
#[derive(Debug)]
pub struct Halt;

#[derive(Debug, Default)]
pub struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl LogSink for Recorder {
    fn write_line(&self, line: &str) {
        self.push(Event::Log(line.to_owned()));
    }
}

impl DebugChannel for Recorder {
    fn emit(&self, text: &str) {
        self.push(Event::Debug(text.to_owned()));
    }
}

impl AlertSurface for Recorder {
    fn show(&self, alert: &Alert<'_>) {
        self.push(Event::Alert {
            title: alert.title.to_owned(),
            body: alert.body.to_owned(),
            style: alert.style,
        });
    }
}

impl Terminator for Recorder {
    fn terminate(&self) -> ! {
        self.push(Event::Terminate);
        panic::panic_any(Halt)
    }
}

/// Lookup that never knows anything.
pub struct NoLookup;

impl StatusLookup for NoLookup {
    fn lookup(&self, _: StatusCode, _: LanguageId) -> Option<String> {
        None
    }
}

pub fn reporter_with(recorder: &Arc<Recorder>, lookup: impl StatusLookup + 'static) -> Reporter {
    Reporter::builder()
        .app_name("TestApp")
        .status_lookup(lookup)
        .log_sink(Arc::clone(recorder))
        .debug_channel(Arc::clone(recorder))
        .alert_surface(Arc::clone(recorder))
        .terminator(Arc::clone(recorder))
        .build()
}

pub fn reporter(recorder: &Arc<Recorder>) -> Reporter {
    reporter_with(recorder, BuiltinLookup)
}

/// Run `f`, returning `true` if it stopped at the test terminator.
pub fn halts<F: FnOnce()>(f: F) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(()) => false,
        Err(payload) => payload.is::<Halt>(),
    }
}
