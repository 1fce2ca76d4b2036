// src/backend/utils/logging.rs
use std::io;

/// Forwards formatted log lines to the canister debug log.
struct CanisterLog;

impl io::Write for CanisterLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let line = String::from_utf8_lossy(buf);
        ic_cdk::print(line.trim_end());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Installs the global tracing subscriber. Only meaningful inside a canister;
/// a second call (e.g. after upgrade in the same instance) is ignored.
pub fn init_logging() {
    let result = tracing_subscriber::fmt()
        .with_writer(|| CanisterLog)
        .with_max_level(tracing::Level::INFO)
        .without_time()
        .with_ansi(false)
        .with_target(false)
        .try_init();
    if result.is_err() {
        tracing::debug!("Logging already initialized");
    }
}
