//! Output and accessibility configuration for the command-line tool.
//!
//! Supports `NO_COLOR` (disable ANSI colors) and `--no-unicode` (ASCII-only output).

use std::sync::atomic::{AtomicBool, Ordering};

static NO_UNICODE: AtomicBool = AtomicBool::new(false);
static COLORS_ENABLED: AtomicBool = AtomicBool::new(true);

/// Global output/accessibility configuration.
pub struct OutputConfig;

impl OutputConfig {
    /// Configure from CLI flags and environment.
    /// Call once at startup after parsing args.
    pub fn configure(no_unicode: bool) {
        NO_UNICODE.store(no_unicode, Ordering::Relaxed);
        // NO_COLOR: if set and not empty, disable ANSI colors
        let no_color = std::env::var("NO_COLOR")
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false);
        COLORS_ENABLED.store(!no_color, Ordering::Relaxed);
    }

    /// Whether `--no-unicode` is active (use ASCII-only output).
    #[inline]
    pub fn no_unicode() -> bool {
        NO_UNICODE.load(Ordering::Relaxed)
    }

    /// Whether ANSI colors are enabled (false when NO_COLOR is set and not empty).
    #[inline]
    pub fn colors_enabled() -> bool {
        COLORS_ENABLED.load(Ordering::Relaxed)
    }

    /// Replace tree-drawing glyphs with ASCII when `--no-unicode` is set.
    pub fn to_ascii(s: &str) -> String {
        if !Self::no_unicode() {
            return s.to_string();
        }
        s.chars().map(Self::replace_unicode_char).collect()
    }

    fn replace_unicode_char(c: char) -> char {
        match c {
            '├' | '└' => '+',
            '─' => '-',
            '│' => '|',
            '═' => '=',
            _ => c,
        }
    }

    /// Double-line rule character for headers.
    pub fn double_rule_char() -> &'static str {
        if Self::no_unicode() {
            "="
        } else {
            "\u{2550}" // ═
        }
    }

    /// A double horizontal rule line (for headers).
    pub fn double_rule_line(len: usize) -> String {
        Self::double_rule_char().repeat(len)
    }
}
