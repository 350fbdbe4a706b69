//! Colored report output

use owo_colors::{colors::css, OwoColorize};

/// Detects whether stdout accepts colors
fn color_enabled() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

fn paint(text: &str, style: impl FnOnce(&str) -> String) -> String {
    if color_enabled() {
        style(text)
    } else {
        text.to_string()
    }
}

/// Extension trait for coloring report text
pub trait Colorize: AsRef<str> {
    /// Color as success (green)
    fn success(&self) -> String {
        paint(self.as_ref(), |text| text.fg::<css::Green>().to_string())
    }

    /// Color as warning (amber)
    fn warning(&self) -> String {
        paint(self.as_ref(), |text| text.fg::<css::Orange>().to_string())
    }

    /// Color as info (blue)
    fn info(&self) -> String {
        paint(self.as_ref(), |text| text.fg::<css::LightBlue>().to_string())
    }

    /// Dim the text
    fn dim(&self) -> String {
        paint(self.as_ref(), |text| text.dimmed().to_string())
    }
}

impl<T: AsRef<str> + ?Sized> Colorize for T {}
