//! Timestamped, coloured log macros.
//!
//! Every line goes to stderr: stdout is reserved for the outbound command
//! stream of the transport bridge.

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        eprintln!("\x1b[32m[INFO] [{}]\x1b[0m {}", chrono::Utc::now().format("%H:%M:%S%.3f"), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        eprintln!("\x1b[35m[WARN] [{}]\x1b[0m {}", chrono::Utc::now().format("%H:%M:%S%.3f"), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        eprintln!("\x1b[31m[ERROR][{}]\x1b[0m {}", chrono::Utc::now().format("%H:%M:%S%.3f"), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! fatal {
    ($($arg:tt)*) => {
        panic!("\x1b[1;31m[FATAL][{}]\x1b[0m {}", chrono::Utc::now().format("%H:%M:%S%.3f"), format!($($arg)*))
    };
}

/// Flight phase transitions.
#[macro_export]
macro_rules! phase {
    ($($arg:tt)*) => {
        eprintln!("\x1b[1;34m[PHASE][{}]\x1b[0m {}", chrono::Utc::now().format("%H:%M:%S%.3f"), format!($($arg)*))
    };
}

/// Per-tick traces, only printed when `LOG_CONTROLLER_EVENTS` is set.
#[macro_export]
macro_rules! event {
    ($($arg:tt)*) => {
        if std::env::var("LOG_CONTROLLER_EVENTS").is_ok() {
            eprintln!("\x1b[36m[EVENT][{}]\x1b[0m {}", chrono::Utc::now().format("%H:%M:%S%.3f"), format!($($arg)*))
        }
    };
}
