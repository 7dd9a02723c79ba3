use terminal_size::{terminal_size, Width};

/// Text width for wrapping: terminal width minus a margin, capped at 120,
/// or 80 when there is no terminal.
pub fn get_wrap_width() -> usize {
    const MAX_WIDTH: usize = 120;
    const DEFAULT_WIDTH: usize = 80;
    const MARGIN: usize = 2;

    if let Some((Width(w), _)) = terminal_size() {
        std::cmp::min((w as usize).saturating_sub(MARGIN), MAX_WIDTH)
    } else {
        DEFAULT_WIDTH
    }
}

pub fn get_wrap_width_with_indent(indent_size: usize) -> usize {
    get_wrap_width().saturating_sub(indent_size)
}

/// Shorten `text` to at most `max` characters, ending in `…` when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_wrap_width_returns_reasonable_value() {
        let width = get_wrap_width();
        assert!(width > 0);
        assert!(width <= 120);
    }

    #[test]
    fn test_get_wrap_width_with_large_indent() {
        assert_eq!(get_wrap_width_with_indent(200), 0);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("https://example.com/long", 10), "https://e…");
    }
}
