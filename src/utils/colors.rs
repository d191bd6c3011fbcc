/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";

/// Green in remote mode, yellow once fallen back to local storage.
pub fn color_for_mode(remote: bool) -> &'static str {
    if remote { GREEN } else { YELLOW }
}

pub fn paint(color: &str, value: &str) -> String {
    format!("{color}{value}{RESET}")
}
