use hresult_escalation::ring_buffer::RingBufferLog;
use hresult_escalation::{BuiltinLookup, FileLogSink, Level, LogSink, Reporter, StatusCode, escalate};
use std::sync::Arc;

/// Writes every line to a file and keeps the last few in memory.
struct Tee {
    file: FileLogSink,
    recent: RingBufferLog,
}

impl LogSink for Tee {
    fn write_line(&self, line: &str) {
        self.file.write_line(line);
        self.recent.write_line(line);
    }
}

fn main() -> std::io::Result<()> {
    let path = std::env::temp_dir().join("hresult_escalation_demo.log");
    let recent = RingBufferLog::new(3, 512);

    let reporter = Arc::new(
        Reporter::builder()
            .app_name("File Logging")
            .status_lookup(BuiltinLookup)
            .log_sink(Tee {
                file: FileLogSink::open(&path)?,
                recent: recent.clone(),
            })
            .build(),
    );

    for (code, what) in [
        (StatusCode::E_OUTOFMEMORY, "allocate the icon cache"),
        (StatusCode::E_HANDLE, "query the taskbar"),
        (StatusCode::from_win32(1400), "attach to the window"),
        (StatusCode::from_bits(0x8123_4567), "talk to the shell"),
    ] {
        escalate!(reporter => code, Level::Log, "Failed to {}", what);
    }

    println!("Log written to {}", path.display());
    println!("Most recent entries ({} evicted):", recent.eviction_count());
    for entry in recent.get_recent(3) {
        println!("  #{} {}", entry.sequence, entry.line);
    }
    Ok(())
}
