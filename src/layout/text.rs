use crate::config::LayoutConfig;
use crate::text_metrics;
use crate::theme::Theme;

use super::TextBlock;

pub(super) fn measure_label(text: &str, theme: &Theme, config: &LayoutConfig) -> TextBlock {
    measure_label_with_font_size(text, theme.font_size, theme.font_family.as_str(), config)
}

pub(super) fn measure_label_with_font_size(
    text: &str,
    font_size: f32,
    font_family: &str,
    config: &LayoutConfig,
) -> TextBlock {
    let mut lines = split_lines(text);
    if lines.is_empty() {
        lines.push(String::new());
    }
    let width = lines
        .iter()
        .map(|line| text_width(line, font_size, font_family, config.fast_text_metrics))
        .fold(0.0, f32::max);
    let height = lines.len() as f32 * font_size * config.label_line_height;
    TextBlock {
        lines,
        width,
        height,
    }
}

pub(super) fn char_width_factor(ch: char) -> f32 {
    // Average advance per em for a typical sans-serif face.
    match ch {
        ' ' => 0.278,
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '|' | '!' | '\'' => 0.25,
        'f' | 't' | 'r' | 'I' | '(' | ')' | '[' | ']' | '-' => 0.333,
        'm' | 'w' | 'M' | 'W' | '@' | '%' => 0.85,
        'A'..='Z' => 0.667,
        'a'..='z' => 0.54,
        '0'..='9' => 0.556,
        _ => 0.6,
    }
}

pub(super) fn split_lines(text: &str) -> Vec<String> {
    text.replace("\\n", "\n")
        .split('\n')
        .map(|line| line.trim().to_string())
        .collect()
}

pub(super) fn text_width(text: &str, font_size: f32, font_family: &str, fast_metrics: bool) -> f32 {
    if fast_metrics {
        return fallback_text_width(text, font_size);
    }
    text_metrics::measure_text_width(text, font_size, font_family)
        .unwrap_or_else(|| fallback_text_width(text, font_size))
}

fn fallback_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(char_width_factor).sum::<f32>() * font_size
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> LayoutConfig {
        LayoutConfig {
            fast_text_metrics: true,
            ..Default::default()
        }
    }

    #[test]
    fn split_lines_handles_escaped_newlines() {
        assert_eq!(split_lines("a\\nb"), vec!["a", "b"]);
        assert_eq!(split_lines("  yes  \n no "), vec!["yes", "no"]);
    }

    #[test]
    fn char_width_factor_returns_positive_values() {
        for ch in ['a', 'Z', ' ', '0', '@', '\u{4e2d}'] {
            assert!(char_width_factor(ch) > 0.0, "char {:?} has zero width", ch);
        }
    }

    #[test]
    fn fallback_text_width_scales_with_font_size() {
        let w12 = fallback_text_width("start", 12.0);
        let w24 = fallback_text_width("start", 24.0);
        assert!((w24 - w12 * 2.0).abs() < 0.01);
    }

    #[test]
    fn measure_label_uses_widest_line() {
        let config = fast_config();
        let block = measure_label_with_font_size("No\\nNot at all", 10.0, "sans-serif", &config);
        assert_eq!(block.lines.len(), 2);
        assert!((block.width - fallback_text_width("Not at all", 10.0)).abs() < 1e-4);
        assert!((block.height - 2.0 * 10.0 * config.label_line_height).abs() < 1e-4);
    }

    #[test]
    fn empty_label_is_one_empty_line() {
        let block = measure_label("", &Theme::classic(), &fast_config());
        assert_eq!(block.lines, vec![String::new()]);
        assert_eq!(block.width, 0.0);
    }
}
