use std::fmt;

use super::ansi::{bg_rgb, fg_rgb, hyperlink, visible_width, FG_WHITE, RESET};

/// An RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Linear interpolation toward `to`; `t` is the fraction of the way there.
    /// Each channel is rounded and clamped independently.
    pub fn lerp(self, to: Rgb, t: f64) -> Rgb {
        fn channel(from: u8, to: u8, t: f64) -> u8 {
            let v = from as f64 + (to as f64 - from as f64) * t;
            v.round().clamp(0.0, 255.0) as u8
        }
        Rgb(
            channel(self.0, to.0, t),
            channel(self.1, to.1, t),
            channel(self.2, to.2, t),
        )
    }
}

/// The fixed badge background palette. Muted so white text stays readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeColor {
    Blue,
    Green,
    Orange,
    Purple,
    Cyan,
    Rose,
    Gold,
    Steel,
    Olive,
    Charcoal,
}

impl BadgeColor {
    pub const fn rgb(self) -> Rgb {
        match self {
            BadgeColor::Blue => Rgb(38, 60, 100),
            BadgeColor::Green => Rgb(38, 75, 48),
            BadgeColor::Orange => Rgb(95, 58, 28),
            BadgeColor::Purple => Rgb(65, 45, 88),
            BadgeColor::Cyan => Rgb(28, 75, 82),
            BadgeColor::Rose => Rgb(90, 38, 50),
            BadgeColor::Gold => Rgb(85, 70, 28),
            BadgeColor::Steel => Rgb(52, 56, 66),
            BadgeColor::Olive => Rgb(58, 68, 32),
            BadgeColor::Charcoal => Rgb(46, 48, 54),
        }
    }
}

/// Foreground used for the "+added" half of the lines-changed badge.
pub const FG_ADDED: Rgb = Rgb(140, 220, 140);
/// Foreground used for the "-removed" half of the lines-changed badge.
pub const FG_REMOVED: Rgb = Rgb(220, 130, 130);
/// Foreground of the horizontal rule row.
pub const RULE_GRAY: Rgb = Rgb(60, 60, 60);

// ---------------------------------------------------------------------------
// Badge
// ---------------------------------------------------------------------------

/// One colored statusline fragment. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge(String);

impl Badge {
    /// Palette background, white text, one space of padding on each side.
    pub fn solid(color: BadgeColor, text: &str) -> Self {
        Self::gradient(color.rgb(), text)
    }

    /// Arbitrary RGB background, otherwise identical to [`Badge::solid`].
    pub fn gradient(bg: Rgb, text: &str) -> Self {
        Badge(format!("{}{} {} {}", bg_rgb(bg), FG_WHITE, text, RESET))
    }

    /// Palette background and white text with no padding added. `text` may
    /// carry its own color changes; the caller controls spacing.
    pub fn rich(color: BadgeColor, text: &str) -> Self {
        Badge(format!("{}{}{}{}", bg_rgb(color.rgb()), FG_WHITE, text, RESET))
    }

    /// Wrap the badge in an OSC 8 hyperlink.
    pub fn linked(self, url: &str) -> Self {
        Badge(hyperlink(url, &self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Visible column width.
    pub fn width(&self) -> usize {
        visible_width(&self.0)
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Gradients
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradientStop {
    pub threshold: u32,
    pub color: Rgb,
}

/// Piecewise-linear color ramp over strictly ascending stops.
#[derive(Debug, Clone, Copy)]
pub struct Gradient {
    stops: &'static [GradientStop],
}

impl Gradient {
    /// Panics (at compile time when used in a `const`) if `stops` is empty
    /// or not strictly ascending.
    pub const fn new(stops: &'static [GradientStop]) -> Self {
        assert!(!stops.is_empty(), "gradient needs at least one stop");
        let mut i = 1;
        while i < stops.len() {
            assert!(
                stops[i - 1].threshold < stops[i].threshold,
                "gradient stops must be strictly ascending"
            );
            i += 1;
        }
        Self { stops }
    }

    /// Color at `value`, clamped to the first and last stops.
    pub fn color_at(&self, value: f64) -> Rgb {
        let first = self.stops[0];
        let last = self.stops[self.stops.len() - 1];
        if value <= first.threshold as f64 {
            return first.color;
        }
        if value >= last.threshold as f64 {
            return last.color;
        }
        for pair in self.stops.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if value <= hi.threshold as f64 {
                let span = (hi.threshold - lo.threshold) as f64;
                let t = (value - lo.threshold as f64) / span;
                return lo.color.lerp(hi.color, t);
            }
        }
        last.color
    }
}

/// Session length in minutes: green, gold after an hour, purple after three.
pub const DURATION_GRADIENT: Gradient = Gradient::new(&[
    GradientStop { threshold: 0, color: BadgeColor::Green.rgb() },
    GradientStop { threshold: 60, color: BadgeColor::Gold.rgb() },
    GradientStop { threshold: 180, color: BadgeColor::Purple.rgb() },
]);

/// Session cost in USD.
pub const COST_GRADIENT: Gradient = Gradient::new(&[
    GradientStop { threshold: 0, color: BadgeColor::Green.rgb() },
    GradientStop { threshold: 10, color: BadgeColor::Gold.rgb() },
    GradientStop { threshold: 50, color: BadgeColor::Orange.rgb() },
    GradientStop { threshold: 100, color: BadgeColor::Rose.rgb() },
]);

// ---------------------------------------------------------------------------
// Bars
// ---------------------------------------------------------------------------

/// Percentages at which a bar turns yellow and then red.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarThresholds {
    pub red: u32,
    pub yellow: u32,
}

pub const CONTEXT_THRESHOLDS: BarThresholds = BarThresholds { red: 85, yellow: 70 };
pub const USAGE_THRESHOLDS: BarThresholds = BarThresholds { red: 90, yellow: 70 };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fill {
    Red,
    Yellow,
    Green,
}

impl Fill {
    fn for_percent(percent: u32, thresholds: BarThresholds) -> Self {
        if percent >= thresholds.red {
            Fill::Red
        } else if percent >= thresholds.yellow {
            Fill::Yellow
        } else {
            Fill::Green
        }
    }

    fn background(self) -> Rgb {
        match self {
            Fill::Red => Rgb(140, 60, 60),
            Fill::Yellow => Rgb(140, 120, 40),
            Fill::Green => Rgb(50, 110, 50),
        }
    }

    fn foreground(self) -> Rgb {
        match self {
            Fill::Red => Rgb(200, 100, 100),
            Fill::Yellow => Rgb(200, 180, 80),
            Fill::Green => Rgb(100, 180, 100),
        }
    }
}

const SPLIT_EMPTY_BG: Rgb = Rgb(45, 48, 55);
const BLOCK_EMPTY_FG: Rgb = Rgb(80, 80, 80);

fn filled_cells(percent: u32, cells: usize) -> usize {
    let filled = (percent as f64 / 100.0 * cells as f64).round() as usize;
    filled.min(cells)
}

/// Render `text` as a percentage bar: the first `round(percent% * len)`
/// characters sit on the fill color, the rest on a dark background.
/// The text stays readable; only the background encodes the level.
pub fn split_fill(percent: u32, text: &str, thresholds: BarThresholds) -> String {
    let len = text.chars().count();
    let split = filled_cells(percent, len);
    let at = text.char_indices().nth(split).map_or(text.len(), |(i, _)| i);
    let (filled, empty) = text.split_at(at);

    let mut out = String::with_capacity(text.len() + 48);
    if !filled.is_empty() {
        let bg = Fill::for_percent(percent, thresholds).background();
        out.push_str(&bg_rgb(bg));
        out.push_str(FG_WHITE);
        out.push_str(filled);
    }
    if !empty.is_empty() {
        out.push_str(&bg_rgb(SPLIT_EMPTY_BG));
        out.push_str(FG_WHITE);
        out.push_str(empty);
    }
    out
}

/// A literal `█░` bar `width` cells wide.
pub fn block_bar(percent: u32, width: usize, thresholds: BarThresholds) -> String {
    let filled = filled_cells(percent, width);
    let fg = Fill::for_percent(percent, thresholds).foreground();
    format!(
        "{}{}{}{}{}",
        fg_rgb(fg),
        "█".repeat(filled),
        fg_rgb(BLOCK_EMPTY_FG),
        "░".repeat(width - filled),
        RESET
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_badge_bytes() {
        let badge = Badge::solid(BadgeColor::Blue, "Opus");
        assert_eq!(badge.as_str(), "\x1b[48;2;38;60;100m\x1b[97m Opus \x1b[0m");
        assert_eq!(badge.width(), 6);
    }

    #[test]
    fn test_rich_badge_has_no_padding() {
        let badge = Badge::rich(BadgeColor::Olive, "x");
        assert_eq!(badge.as_str(), "\x1b[48;2;58;68;32m\x1b[97mx\x1b[0m");
        assert_eq!(badge.width(), 1);
    }

    #[test]
    fn test_linked_badge_keeps_width() {
        let badge = Badge::solid(BadgeColor::Blue, "PR#42").linked("https://x/pull/42");
        assert!(badge.as_str().starts_with("\x1b]8;;https://x/pull/42\x07"));
        assert!(badge.as_str().ends_with("\x1b]8;;\x07"));
        assert_eq!(badge.width(), 7);
    }

    #[test]
    fn test_gradient_exact_at_stops() {
        assert_eq!(DURATION_GRADIENT.color_at(0.0), BadgeColor::Green.rgb());
        assert_eq!(DURATION_GRADIENT.color_at(60.0), BadgeColor::Gold.rgb());
        assert_eq!(DURATION_GRADIENT.color_at(180.0), BadgeColor::Purple.rgb());
        assert_eq!(COST_GRADIENT.color_at(10.0), BadgeColor::Gold.rgb());
        assert_eq!(COST_GRADIENT.color_at(50.0), BadgeColor::Orange.rgb());
        assert_eq!(COST_GRADIENT.color_at(100.0), BadgeColor::Rose.rgb());
    }

    #[test]
    fn test_gradient_clamps_outside_range() {
        assert_eq!(COST_GRADIENT.color_at(-5.0), BadgeColor::Green.rgb());
        assert_eq!(COST_GRADIENT.color_at(1e9), BadgeColor::Rose.rgb());
    }

    #[test]
    fn test_gradient_interpolates_midpoint() {
        // Halfway between green (38,75,48) and gold (85,70,28).
        assert_eq!(DURATION_GRADIENT.color_at(30.0), Rgb(62, 73, 38));
    }

    #[test]
    #[should_panic(expected = "strictly ascending")]
    fn test_gradient_rejects_unordered_stops() {
        static STOPS: [GradientStop; 2] = [
            GradientStop { threshold: 10, color: Rgb(0, 0, 0) },
            GradientStop { threshold: 5, color: Rgb(1, 1, 1) },
        ];
        let _ = Gradient::new(&STOPS);
    }

    #[test]
    fn test_split_fill_splits_at_rounded_position() {
        let bar = split_fill(47, " 95k=47% ", CONTEXT_THRESHOLDS);
        // 9 chars * 0.47 = 4.23 -> 4 filled.
        let expected = "\x1b[48;2;50;110;50m\x1b[97m 95k\x1b[48;2;45;48;55m\x1b[97m=47% ";
        assert_eq!(bar, expected);
    }

    #[test]
    fn test_split_fill_thresholds() {
        assert!(split_fill(85, "abcd", CONTEXT_THRESHOLDS).starts_with("\x1b[48;2;140;60;60m"));
        assert!(split_fill(85, "abcd", USAGE_THRESHOLDS).starts_with("\x1b[48;2;140;120;40m"));
        assert!(split_fill(90, "abcd", USAGE_THRESHOLDS).starts_with("\x1b[48;2;140;60;60m"));
    }

    #[test]
    fn test_split_fill_extremes() {
        assert_eq!(split_fill(0, "ab", CONTEXT_THRESHOLDS), "\x1b[48;2;45;48;55m\x1b[97mab");
        assert_eq!(split_fill(150, "ab", CONTEXT_THRESHOLDS), "\x1b[48;2;140;60;60m\x1b[97mab");
    }

    #[test]
    fn test_block_bar() {
        let bar = block_bar(50, 10, CONTEXT_THRESHOLDS);
        assert_eq!(visible_width(&bar), 10);
        assert_eq!(bar.matches('█').count(), 5);
        assert_eq!(bar.matches('░').count(), 5);
    }
}
