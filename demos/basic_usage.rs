use hresult_escalation::{
    BuiltinLookup, FacadeLogSink, Level, Reporter, StatusCode, escalate, install,
};

fn load_settings(path: &str) -> StatusCode {
    // Simulate a missing settings file
    if path == "missing.json" {
        return StatusCode::from_win32(2);
    }
    StatusCode::S_OK
}

fn main() {
    // RUST_LOG=error shows what the log sink receives
    env_logger::init();

    let reporter = Reporter::builder()
        .app_name("Basic Usage")
        .status_lookup(BuiltinLookup)
        .log_sink(FacadeLogSink::new())
        .build();
    if install(reporter).is_err() {
        eprintln!("a reporter was already installed");
    }

    println!("--- Basic Usage Example ---\n");

    // 1. Success: nothing is written anywhere
    let ok = escalate!(load_settings("settings.json"), Level::Error, "Failed to load settings");
    println!("settings.json loaded: {}", ok);

    // 2. Log level: one line to the log sink, the program carries on
    let ok = escalate!(load_settings("missing.json"), Level::Log, "Failed to load settings");
    println!("missing.json loaded: {}", ok);

    // 3. Debug level: goes to the debug channel only
    escalate!(StatusCode::E_NOTIMPL, Level::Debug, "Blur is not available on this system");

    // 4. Error level: log line plus a warning alert
    escalate!(
        StatusCode::E_ACCESSDENIED,
        Level::Error,
        "Failed to register hotkey {}",
        "Ctrl+Alt+T"
    );

    println!("\nStill running after a Level::Error report.");
}
