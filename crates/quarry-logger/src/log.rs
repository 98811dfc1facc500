use crate::severity::LogSeverity;
use crate::time::now;
use once_cell::sync::OnceCell;

static THRESHOLD: OnceCell<LogSeverity> = OnceCell::new();

/// Sets the minimum severity that gets printed. Only the first call has any
/// effect; later calls return `false`.
pub fn init(min: LogSeverity) -> bool {
    THRESHOLD.set(min).is_ok()
}

pub fn enabled(log_severity: LogSeverity) -> bool {
    log_severity >= *THRESHOLD.get().unwrap_or(&LogSeverity::Info)
}

pub fn log(msg: String, log_severity: LogSeverity) {
    if !enabled(log_severity) {
        return;
    }
    match log_severity {
        LogSeverity::Error | LogSeverity::Fatal => {
            eprintln!("[{}] {} {}", log_severity, now(), msg)
        }
        _ => println!("[{}] {} {}", log_severity, now(), msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_defaults_and_sticks() {
        // Tests share the process-wide threshold, so only this one sets it.
        assert!(init(LogSeverity::Warning));
        assert!(!init(LogSeverity::Debug));
        assert!(!enabled(LogSeverity::Info));
        assert!(enabled(LogSeverity::Warning));
        assert!(enabled(LogSeverity::Fatal));
        log("suppressed".to_string(), LogSeverity::Debug);
    }
}
