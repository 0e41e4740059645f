//! Style configuration for map layers.
//!
//! Tier colors and heatmap gradients are plain configuration handed to the
//! layer composer; nothing here is global state.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::RankTier;

/// An RGB color.
///
/// Read from "#rrggbb", "#rrggbbaa" or a basic CSS color name. Alpha is
/// dropped; layers carry their own opacity. Anything else fails to
/// deserialize, so a loaded style always has a real color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Canonical "#rrggbb" form.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.strip_prefix('#') {
            Some(hex) => {
                parse_hex_color(hex).ok_or_else(|| ColorParseError::InvalidHex(s.to_string()))
            }
            None => named_color(s).ok_or_else(|| ColorParseError::UnknownName(s.to_string())),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_hex()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ColorParseError {
    #[error("Invalid hex color '{0}'. Expected '#rrggbb' or '#rrggbbaa'")]
    InvalidHex(String),

    #[error("Unknown color name '{0}'")]
    UnknownName(String),
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    if !matches!(hex.len(), 6 | 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
}

fn named_color(name: &str) -> Option<Color> {
    let rgb = match name.to_lowercase().as_str() {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "lime" => (0, 255, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "cyan" => (0, 255, 255),
        "magenta" => (255, 0, 255),
        "orange" => (255, 165, 0),
        "purple" => (128, 0, 128),
        "gray" | "grey" => (128, 128, 128),
        _ => return None,
    };
    Some(Color::rgb(rgb.0, rgb.1, rgb.2))
}

/// How markers of one rank tier are drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierStyle {
    pub color: Color,

    /// Circle marker radius in pixels.
    #[serde(default = "default_marker_radius")]
    pub radius: f64,

    #[serde(default = "default_fill_opacity")]
    pub fill_opacity: f64,
}

fn default_marker_radius() -> f64 {
    8.0
}

fn default_fill_opacity() -> f64 {
    0.8
}

impl TierStyle {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            radius: default_marker_radius(),
            fill_opacity: default_fill_opacity(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(format!("marker radius must be > 0, got {}", self.radius));
        }
        if !(0.0..=1.0).contains(&self.fill_opacity) {
            return Err(format!(
                "fill_opacity must be within [0, 1], got {}",
                self.fill_opacity
            ));
        }
        Ok(())
    }
}

/// Mapping from rank tier (plus candidate sites) to marker style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierStyles {
    #[serde(default = "default_top_style")]
    pub top: TierStyle,
    #[serde(default = "default_bottom_style")]
    pub bottom: TierStyle,
    #[serde(default = "default_candidate_style")]
    pub candidate: TierStyle,
}

fn default_top_style() -> TierStyle {
    TierStyle::new(Color::rgb(0x1a, 0x98, 0x50))
}

fn default_bottom_style() -> TierStyle {
    TierStyle::new(Color::rgb(0xd7, 0x30, 0x27))
}

fn default_candidate_style() -> TierStyle {
    TierStyle {
        color: Color::rgb(0x45, 0x75, 0xb4),
        radius: 6.0,
        fill_opacity: 0.6,
    }
}

impl Default for TierStyles {
    fn default() -> Self {
        Self {
            top: default_top_style(),
            bottom: default_bottom_style(),
            candidate: default_candidate_style(),
        }
    }
}

impl TierStyles {
    /// Style for a ranked tier. Unranked facilities only appear on the
    /// candidate layer, so they share its style.
    pub fn for_tier(&self, tier: RankTier) -> &TierStyle {
        match tier {
            RankTier::Top => &self.top,
            RankTier::Bottom => &self.bottom,
            RankTier::Unranked => &self.candidate,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        self.top.validate().map_err(|e| format!("top: {}", e))?;
        self.bottom.validate().map_err(|e| format!("bottom: {}", e))?;
        self.candidate
            .validate()
            .map_err(|e| format!("candidate: {}", e))
    }
}

/// A color stop in a gradient. `value` is a normalized position in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub value: f64,
    pub color: Color,
}

/// Heatmap layer appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatStyle {
    /// Radius of each heat point in pixels.
    #[serde(default = "default_heat_radius")]
    pub radius: f64,

    #[serde(default = "default_heat_blur")]
    pub blur: f64,

    #[serde(default = "default_min_opacity")]
    pub min_opacity: f64,

    #[serde(default = "default_heat_gradient")]
    pub gradient: Vec<ColorStop>,
}

fn default_heat_radius() -> f64 {
    25.0
}

fn default_heat_blur() -> f64 {
    15.0
}

fn default_min_opacity() -> f64 {
    0.3
}

fn default_heat_gradient() -> Vec<ColorStop> {
    vec![
        ColorStop {
            value: 0.2,
            color: Color::rgb(0x31, 0x36, 0x95),
        },
        ColorStop {
            value: 0.5,
            color: Color::rgb(0x74, 0xad, 0xd1),
        },
        ColorStop {
            value: 0.8,
            color: Color::rgb(0xfd, 0xae, 0x61),
        },
        ColorStop {
            value: 1.0,
            color: Color::rgb(0xa5, 0x00, 0x26),
        },
    ]
}

impl Default for HeatStyle {
    fn default() -> Self {
        Self {
            radius: default_heat_radius(),
            blur: default_heat_blur(),
            min_opacity: default_min_opacity(),
            gradient: default_heat_gradient(),
        }
    }
}

impl HeatStyle {
    pub fn validate(&self) -> Result<(), String> {
        if self.gradient.len() < 2 {
            return Err("Gradient must have at least 2 color stops".to_string());
        }

        for i in 1..self.gradient.len() {
            if self.gradient[i].value <= self.gradient[i - 1].value {
                return Err("Color stops must be in ascending value order".to_string());
            }
        }

        if self
            .gradient
            .iter()
            .any(|s| !(0.0..=1.0).contains(&s.value))
        {
            return Err("Color stop values must lie within [0, 1]".to_string());
        }

        if !(self.radius > 0.0 && self.blur >= 0.0) {
            return Err("radius must be > 0 and blur >= 0".to_string());
        }

        Ok(())
    }

    /// Gradient as ordered (position, "#rrggbb") pairs.
    pub fn gradient_hex(&self) -> Vec<(f64, String)> {
        self.gradient
            .iter()
            .map(|s| (s.value, s.color.to_hex()))
            .collect()
    }
}
