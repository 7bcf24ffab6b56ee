//! Human-readable error reports
//!
//! The CLI and the viewer use these to show configuration and frame
//! errors with enough context to fix the offending file.

use crate::config::ConfigError;

/// Format a config error, quoting the offending line for JSON errors
pub fn format_config_error(error: &ConfigError, source: &str) -> String {
    let mut msg = format!("Config error: {}", error);

    if let ConfigError::Json(json) = error {
        // serde_json lines are 1-based; 0 means no position is known
        let line = json.line();
        if line > 0 {
            if let Some(text) = source.lines().nth(line - 1) {
                msg.push_str(&format!("\n  at line {}: {}", line, text));
            }
        }
    }

    msg
}

/// Format a runtime error with context
pub fn format_runtime_error(error: &dyn std::error::Error) -> String {
    format!("Runtime error: {}", error)
}
