use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lower bound of the brightness/contrast/saturation sliders (percent).
pub const ADJUSTMENT_MIN: u16 = 0;
/// Upper bound of the brightness/contrast/saturation sliders (percent).
pub const ADJUSTMENT_MAX: u16 = 200;
/// Neutral value (percent).
pub const ADJUSTMENT_NEUTRAL: u16 = 100;

/// Blur radius of the `Blur` style, in pixels.
pub const STYLE_BLUR_RADIUS: f32 = 4.0;

/// Named stylistic filter layered on top of the numeric adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleFilter {
    #[default]
    None,
    Grayscale,
    Sepia,
    Invert,
    Blur,
    /// Sepia with reduced brightness.
    Vintage,
    /// Slightly brighter, hue rotated 180°.
    Cold,
    /// Slightly brighter, hue rotated 30°.
    Warm,
}

impl StyleFilter {
    pub const ALL: [StyleFilter; 8] = [
        Self::None,
        Self::Grayscale,
        Self::Sepia,
        Self::Invert,
        Self::Blur,
        Self::Vintage,
        Self::Cold,
        Self::Warm,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::None => "Normal",
            Self::Grayscale => "Grayscale",
            Self::Sepia => "Sepia",
            Self::Invert => "Invert",
            Self::Blur => "Blur",
            Self::Vintage => "Vintage",
            Self::Cold => "Cold",
            Self::Warm => "Warm",
        }
    }

    /// Primitive operations this style expands to.
    pub fn operations(&self) -> Vec<FilterOp> {
        match self {
            Self::None => Vec::new(),
            Self::Grayscale => vec![FilterOp::Grayscale(1.0)],
            Self::Sepia => vec![FilterOp::Sepia(1.0)],
            Self::Invert => vec![FilterOp::Invert(1.0)],
            Self::Blur => vec![FilterOp::Blur(STYLE_BLUR_RADIUS)],
            Self::Vintage => vec![FilterOp::Sepia(1.0), FilterOp::Brightness(0.75)],
            Self::Cold => vec![FilterOp::Brightness(1.1), FilterOp::HueRotate(180.0)],
            Self::Warm => vec![FilterOp::Brightness(1.1), FilterOp::HueRotate(30.0)],
        }
    }
}

impl FromStr for StyleFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted.is_empty() || wanted.eq_ignore_ascii_case("none") {
            return Ok(Self::None);
        }
        Self::ALL
            .into_iter()
            .find(|f| f.display_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown filter: {}", s))
    }
}

/// One primitive visual transform, with CSS filter-function semantics.
///
/// Amounts are fractions (`1.0` = 100%), hue rotation is in degrees and blur
/// is a radius in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterOp {
    Brightness(f32),
    Contrast(f32),
    Saturate(f32),
    Grayscale(f32),
    Sepia(f32),
    Invert(f32),
    HueRotate(f32),
    Blur(f32),
}

impl FilterOp {
    /// CSS filter-function form, e.g. `brightness(110%)`.
    pub fn css(&self) -> String {
        fn pct(v: f32) -> String {
            format!("{}%", (v * 100.0).round() as i32)
        }
        match *self {
            Self::Brightness(v) => format!("brightness({})", pct(v)),
            Self::Contrast(v) => format!("contrast({})", pct(v)),
            Self::Saturate(v) => format!("saturate({})", pct(v)),
            Self::Grayscale(v) => format!("grayscale({})", pct(v)),
            Self::Sepia(v) => format!("sepia({})", pct(v)),
            Self::Invert(v) => format!("invert({})", pct(v)),
            Self::HueRotate(deg) => format!("hue-rotate({}deg)", deg),
            Self::Blur(px) => format!("blur({}px)", px),
        }
    }
}

/// Brightness/contrast/saturation plus an optional named style.
///
/// A pure value: the live preview and the photo render pass both read the
/// same `operations()` chain, so a capture always looks like the preview did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdjustmentState {
    brightness: u16,
    contrast: u16,
    saturation: u16,
    filter: StyleFilter,
}

impl Default for AdjustmentState {
    fn default() -> Self {
        Self {
            brightness: ADJUSTMENT_NEUTRAL,
            contrast: ADJUSTMENT_NEUTRAL,
            saturation: ADJUSTMENT_NEUTRAL,
            filter: StyleFilter::None,
        }
    }
}

impl AdjustmentState {
    pub fn brightness(&self) -> u16 {
        self.brightness
    }

    pub fn contrast(&self) -> u16 {
        self.contrast
    }

    pub fn saturation(&self) -> u16 {
        self.saturation
    }

    pub fn filter(&self) -> StyleFilter {
        self.filter
    }

    pub fn set_brightness(&mut self, percent: i32) {
        self.brightness = clamp_percent(percent);
    }

    pub fn set_contrast(&mut self, percent: i32) {
        self.contrast = clamp_percent(percent);
    }

    pub fn set_saturation(&mut self, percent: i32) {
        self.saturation = clamp_percent(percent);
    }

    pub fn set_filter(&mut self, filter: StyleFilter) {
        self.filter = filter;
    }

    /// Back to neutral in one step.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }

    /// Ordered transform chain: numeric adjustments first, then the style.
    /// Neutral adjustments are left out.
    pub fn operations(&self) -> Vec<FilterOp> {
        let mut ops = Vec::new();
        if self.brightness != ADJUSTMENT_NEUTRAL {
            ops.push(FilterOp::Brightness(fraction(self.brightness)));
        }
        if self.contrast != ADJUSTMENT_NEUTRAL {
            ops.push(FilterOp::Contrast(fraction(self.contrast)));
        }
        if self.saturation != ADJUSTMENT_NEUTRAL {
            ops.push(FilterOp::Saturate(fraction(self.saturation)));
        }
        ops.extend(self.filter.operations());
        ops
    }

    /// CSS `filter` value for preview surfaces (`none` when neutral).
    pub fn css_filter(&self) -> String {
        let ops = self.operations();
        if ops.is_empty() {
            return "none".to_string();
        }
        ops.iter().map(FilterOp::css).collect::<Vec<_>>().join(" ")
    }
}

fn clamp_percent(percent: i32) -> u16 {
    percent.clamp(ADJUSTMENT_MIN as i32, ADJUSTMENT_MAX as i32) as u16
}

fn fraction(percent: u16) -> f32 {
    percent as f32 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_neutral() {
        let state = AdjustmentState::default();
        assert_eq!(state.brightness(), 100);
        assert_eq!(state.contrast(), 100);
        assert_eq!(state.saturation(), 100);
        assert_eq!(state.filter(), StyleFilter::None);
        assert!(state.operations().is_empty());
        assert_eq!(state.css_filter(), "none");
    }

    #[test]
    fn setters_clamp_to_slider_range() {
        let mut state = AdjustmentState::default();
        state.set_brightness(-20);
        state.set_contrast(450);
        state.set_saturation(150);
        assert_eq!(state.brightness(), 0);
        assert_eq!(state.contrast(), 200);
        assert_eq!(state.saturation(), 150);
    }

    #[test]
    fn reset_restores_every_field() {
        let mut state = AdjustmentState::default();
        state.set_brightness(30);
        state.set_contrast(180);
        state.set_saturation(0);
        state.set_filter(StyleFilter::Vintage);

        state.reset();
        assert_eq!(state, AdjustmentState::default());
        assert!(state.is_neutral());
    }

    #[test]
    fn adjustments_come_before_style() {
        let mut state = AdjustmentState::default();
        state.set_contrast(120);
        state.set_filter(StyleFilter::Warm);
        assert_eq!(
            state.operations(),
            vec![
                FilterOp::Contrast(1.2),
                FilterOp::Brightness(1.1),
                FilterOp::HueRotate(30.0),
            ]
        );
        assert_eq!(state.css_filter(), "contrast(120%) brightness(110%) hue-rotate(30deg)");
    }

    #[test]
    fn vintage_expands_to_sepia_and_dimming() {
        assert_eq!(
            StyleFilter::Vintage.operations(),
            vec![FilterOp::Sepia(1.0), FilterOp::Brightness(0.75)]
        );
        assert_eq!(
            StyleFilter::Cold.operations(),
            vec![FilterOp::Brightness(1.1), FilterOp::HueRotate(180.0)]
        );
    }

    #[test]
    fn parse_filter_names() {
        assert_eq!("sepia".parse::<StyleFilter>().unwrap(), StyleFilter::Sepia);
        assert_eq!("Normal".parse::<StyleFilter>().unwrap(), StyleFilter::None);
        assert_eq!("".parse::<StyleFilter>().unwrap(), StyleFilter::None);
        assert_eq!(" WARM ".parse::<StyleFilter>().unwrap(), StyleFilter::Warm);
        assert!("sparkle".parse::<StyleFilter>().is_err());
    }

    #[test]
    fn css_of_blur() {
        assert_eq!(FilterOp::Blur(4.0).css(), "blur(4px)");
        assert_eq!(FilterOp::Invert(1.0).css(), "invert(100%)");
    }
}
