/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

/// Colour for an attempt result: sends green, plain attempts yellow.
pub fn color_for_result(is_send: bool) -> &'static str {
    if is_send { GREEN } else { YELLOW }
}

/// Grey out empty values and placeholders.
///
/// Example:
/// `colorize_optional("")` → "<grey>--<reset>"
pub fn colorize_optional(value: &str) -> String {
    let v = value.trim();
    if v.is_empty() || v == "--" || v == "—" {
        let shown = if v.is_empty() { "--" } else { v };
        format!("{GREY}{shown}{RESET}")
    } else {
        value.to_string()
    }
}
