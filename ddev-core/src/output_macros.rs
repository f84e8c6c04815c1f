//! Output macros for user-facing lines.
//!
//! Diagnostics go through `tracing`; these macros are for the handful of lines
//! a user is meant to read (warnings before a recoverable decision, the final
//! error, success notes). Everything except `ddev_println!` goes to stderr so
//! command output stays parseable.

#[macro_export]
macro_rules! ddev_println {
    () => {
        println!();
    };
    ($($arg:tt)*) => {
        println!("{}", format!($($arg)*));
    }
}

#[macro_export]
macro_rules! ddev_error {
    ($($arg:tt)*) => {
        eprintln!("❌ {}", format!($($arg)*));
    }
}

#[macro_export]
macro_rules! ddev_error_hint {
    ($($arg:tt)*) => {
        eprintln!("💡 {}", format!($($arg)*));
    };
}

#[macro_export]
macro_rules! ddev_success {
    ($($arg:tt)*) => {
        eprintln!("✓ {}", format!($($arg)*));
    };
}

#[macro_export]
macro_rules! ddev_info {
    ($($arg:tt)*) => {
        eprintln!("ℹ {}", format!($($arg)*));
    };
}

/// Print a warning and mirror it into the tracing stream.
#[macro_export]
macro_rules! ddev_warning {
    ($($arg:tt)*) => {{
        let message = format!($($arg)*);
        tracing::warn!("{}", message);
        eprintln!("⚠ {}", message);
    }};
}

#[macro_export]
macro_rules! ddev_progress {
    ($($arg:tt)*) => {
        eprintln!("▶ {}", format!($($arg)*));
    };
}
