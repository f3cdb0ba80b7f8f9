//! Bounded in-memory log sink.
//!
//! Keeps the most recent log lines in a fixed-size buffer with FIFO eviction,
//! for processes that want to show "recent errors" without a log file, and
//! for tests that need to inspect what was written.
//!
//! # Design Principles
//!
//! - **Bounded memory**: fixed number of entries, each capped in bytes
//! - **FIFO eviction**: the oldest line goes first
//! - **RwLock-based**: concurrent readers, exclusive writers
//! - **Cheap reads**: entries hold `Arc<str>`, so cloning them is a refcount bump
//!
//! # Example
//!
//! ```rust
//! use hresult_escalation::ring_buffer::RingBufferLog;
//! use hresult_escalation::LogSink;
//!
//! let log = RingBufferLog::new(2, 1024);
//! log.write_line("one");
//! log.write_line("two");
//! log.write_line("three");
//!
//! let recent: Vec<String> = log.get_recent(10).iter().map(|e| e.line.to_string()).collect();
//! assert_eq!(recent, ["three", "two"]);
//! assert_eq!(log.eviction_count(), 1);
//! ```

use crate::sinks::LogSink;
use std::borrow::Cow;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Appended to lines cut at the per-entry cap.
pub const TRUNCATION_INDICATOR: &str = "...[TRUNC]";

/// One retained log line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    /// Monotonic write sequence, starting at 0
    pub sequence: u64,
    /// Stored text, possibly cut at the per-entry cap
    pub line: Arc<str>,
    /// Whether the line was cut to fit the per-entry cap
    pub truncated: bool,
}

/// Log sink that retains the last `max_entries` lines.
///
/// Clones share the same buffer, so one clone can be handed to a
/// [`Reporter`](crate::Reporter) while another is kept for reading.
#[derive(Clone)]
pub struct RingBufferLog {
    entries: Arc<RwLock<VecDeque<LogEntry>>>,
    max_entries: usize,
    max_entry_bytes: usize,
    sequence: Arc<AtomicU64>,
    eviction_count: Arc<AtomicU64>,
}

impl RingBufferLog {
    /// Create a buffer of `max_entries` lines (at least one), each capped at
    /// `max_entry_bytes`.
    pub fn new(max_entries: usize, max_entry_bytes: usize) -> Self {
        let max_entries = max_entries.max(1);
        Self {
            entries: Arc::new(RwLock::new(VecDeque::with_capacity(max_entries))),
            max_entries,
            max_entry_bytes,
            sequence: Arc::new(AtomicU64::new(0)),
            eviction_count: Arc::new(AtomicU64::new(0)),
        }
    }

    #[inline]
    fn read_entries(&self) -> RwLockReadGuard<'_, VecDeque<LogEntry>> {
        match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[inline]
    fn write_entries(&self) -> RwLockWriteGuard<'_, VecDeque<LogEntry>> {
        match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// The `count` most recent entries, newest first.
    pub fn get_recent(&self, count: usize) -> Vec<LogEntry> {
        self.read_entries().iter().rev().take(count).cloned().collect()
    }

    /// Retained lines in write order, oldest first.
    pub fn lines(&self) -> Vec<Arc<str>> {
        self.read_entries().iter().map(|e| Arc::clone(&e.line)).collect()
    }

    /// Number of retained entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    /// No line has been written yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of evictions since creation.
    #[inline]
    pub fn eviction_count(&self) -> u64 {
        self.eviction_count.load(Ordering::Relaxed)
    }
}

impl LogSink for RingBufferLog {
    fn write_line(&self, line: &str) {
        let stored = truncate_to_bytes(line, self.max_entry_bytes);
        let truncated = stored.len() < line.len();

        let mut entries = self.write_entries();
        // Sequence is taken under the lock so retained entries stay ordered.
        let entry = LogEntry {
            sequence: self.sequence.fetch_add(1, Ordering::Relaxed),
            line: Arc::from(stored.as_ref()),
            truncated,
        };
        if entries.len() == self.max_entries {
            entries.pop_front();
            self.eviction_count.fetch_add(1, Ordering::Relaxed);
        }
        entries.push_back(entry);
    }
}

/// Truncate to at most `max_bytes`, on a UTF-8 boundary, marking the cut.
fn truncate_to_bytes(s: &str, max_bytes: usize) -> Cow<'_, str> {
    if s.len() <= max_bytes {
        return Cow::Borrowed(s);
    }
    if max_bytes <= TRUNCATION_INDICATOR.len() {
        return Cow::Borrowed(&TRUNCATION_INDICATOR[..max_bytes]);
    }
    let max_content = max_bytes - TRUNCATION_INDICATOR.len();

    let mut idx = max_content;
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }

    if idx == 0 {
        return Cow::Borrowed(TRUNCATION_INDICATOR);
    }

    let mut out = String::with_capacity(idx + TRUNCATION_INDICATOR.len());
    out.push_str(&s[..idx]);
    out.push_str(TRUNCATION_INDICATOR);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest() {
        let log = RingBufferLog::new(3, 1024);
        for i in 0..5 {
            log.write_line(&format!("error {}", i));
        }

        assert_eq!(log.len(), 3);
        assert_eq!(log.eviction_count(), 2);

        let entries = log.get_recent(10);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].line.as_ref(), "error 4");
        assert_eq!(entries[2].line.as_ref(), "error 2");
        assert_eq!(entries[0].sequence, 4);
    }

    #[test]
    fn lines_are_oldest_first() {
        let log = RingBufferLog::new(10, 1024);
        log.write_line("a");
        log.write_line("b");
        let lines: Vec<String> = log.lines().iter().map(|l| l.to_string()).collect();
        assert_eq!(lines, ["a", "b"]);
    }

    #[test]
    fn respects_entry_size_limit() {
        let log = RingBufferLog::new(10, 128);
        log.write_line(&"A".repeat(10_000));

        let entry = &log.get_recent(1)[0];
        assert!(entry.line.len() <= 128);
        assert!(entry.line.ends_with(TRUNCATION_INDICATOR));
        assert!(entry.truncated);
    }

    #[test]
    fn short_line_is_not_marked_truncated() {
        let log = RingBufferLog::new(10, 128);
        log.write_line("short");
        assert!(!log.get_recent(1)[0].truncated);
    }

    #[test]
    fn zero_capacity_is_bumped_to_one() {
        let log = RingBufferLog::new(0, 64);
        assert!(log.is_empty());
        log.write_line("x");
        log.write_line("y");
        assert_eq!(log.lines().len(), 1);
        assert_eq!(log.lines()[0].as_ref(), "y");
    }

    #[test]
    fn clone_shares_state() {
        let log1 = RingBufferLog::new(100, 1024);
        let log2 = log1.clone();
        log1.write_line("shared");
        assert_eq!(log2.len(), 1);
        assert_eq!(log2.lines()[0].as_ref(), "shared");
    }

    #[test]
    fn sequences_stay_ordered_after_eviction() {
        let log = RingBufferLog::new(2, 1024);
        for i in 0..5 {
            log.write_line(&format!("line {}", i));
        }
        let sequences: Vec<u64> = log.get_recent(10).iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, [4, 3]);
    }

    #[test]
    fn truncate_respects_utf8() {
        let fire = "🔥".repeat(100);
        let truncated = truncate_to_bytes(&fire, 50);
        assert!(std::str::from_utf8(truncated.as_bytes()).is_ok());
        assert!(truncated.len() <= 50);
    }

    #[test]
    fn truncate_borrows_when_short() {
        let truncated = truncate_to_bytes("short", 100);
        assert!(matches!(truncated, Cow::Borrowed("short")));
    }

    #[test]
    fn concurrent_writes() {
        use std::thread;

        let log = RingBufferLog::new(128, 256);
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let log = log.clone();
                thread::spawn(move || {
                    for j in 0..100 {
                        log.write_line(&format!("t{}-{}", i, j));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("thread panicked");
        }

        assert_eq!(log.len(), 128);
        assert_eq!(log.eviction_count(), 800 - 128);
    }
}
