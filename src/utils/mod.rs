use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = "recipe_editor=info".parse() {
            filter = filter.add_directive(directive);
        }

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

/// Shortens `text` to at most `max_chars` characters, ending with an
/// ellipsis when anything was cut.
pub fn tidy_text(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut shortened: String = trimmed.chars().take(keep).collect();
    shortened.truncate(shortened.trim_end().len());
    shortened.push_str("...");
    shortened
}

/// Rounds to two decimals for display.
pub fn round_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
