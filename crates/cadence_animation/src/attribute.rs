//! Animatable attributes
//!
//! An attribute is one named channel with a from/to pair. Numeric channels
//! carry a unit and run through the easing curve; color channels interpolate
//! each RGBA component linearly in time.

use cadence_core::{format_fixed, normalize_color, parse_leading_f64, Color};

/// Substrings marking a property as color-bearing
const COLOR_KEYWORDS: [&str; 4] = ["background", "color", "border-color", "shadow"];

/// Channels composed into the `transform` property
const TRANSFORM_CHANNELS: [&str; 11] = [
    "scaleX",
    "scaleY",
    "scale",
    "rotateX",
    "rotateY",
    "rotate",
    "translateX",
    "translateY",
    "translate",
    "skewX",
    "skewY",
];

/// Channels that never carry a unit
const UNITLESS_CHANNELS: [&str; 2] = ["opacity", "z-index"];

/// Name of the composed transform property
pub const TRANSFORM_PROPERTY: &str = "transform";

/// Whether a property carries a color value
///
/// Matching is by substring and ignores ASCII case, so `backgroundColor`,
/// `border-color` and `boxShadow` all qualify.
pub fn is_color_property(property: &str) -> bool {
    let lower = property.to_ascii_lowercase();
    COLOR_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

/// Whether a property is a transform function channel
pub fn is_transform_property(property: &str) -> bool {
    TRANSFORM_CHANNELS.contains(&property)
}

fn is_scale_channel(property: &str) -> bool {
    matches!(property, "scale" | "scaleX" | "scaleY")
}

/// Infer the unit of a raw value
///
/// The unit is what remains after stripping digits, signs and decimal
/// points. Unitless channels get an empty unit; anything else without an
/// explicit unit gets `px`.
pub fn extract_unit(value: &str, property: &str) -> String {
    if UNITLESS_CHANNELS.contains(&property) {
        return String::new();
    }
    let unit: String = value
        .chars()
        .filter(|c| !c.is_ascii_digit() && !matches!(c, '-' | '+' | '.'))
        .collect();
    if unit.is_empty() {
        "px".to_string()
    } else {
        unit
    }
}

fn parse_magnitude(property: &str, raw: &str) -> f64 {
    parse_leading_f64(raw).unwrap_or_else(|| {
        tracing::warn!(
            "Attribute: '{}' value '{}' is not numeric, using 0",
            property,
            raw
        );
        0.0
    })
}

/// Stored from/to values of an attribute
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    Numeric { from: f64, to: f64 },
    Color { from: String, to: String },
}

/// A value computed for one frame
#[derive(Clone, Debug, PartialEq)]
pub enum RenderedValue {
    /// Write `value` to the property of the same name
    Style { property: String, value: String },
    /// One function of the composed `transform` property, e.g. `rotate(45.00deg)`
    Transform { channel: String, function: String },
}

/// One animatable property
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    property: String,
    value: AttributeValue,
    unit: String,
    progress: f64,
}

impl Attribute {
    /// Classify and normalize a raw from/to pair
    pub fn new(property: impl Into<String>, from: &str, to: &str) -> Self {
        let property = property.into();
        if is_color_property(&property) {
            Self {
                value: AttributeValue::Color {
                    from: normalize_color(from),
                    to: normalize_color(to),
                },
                unit: String::new(),
                property,
                progress: 0.0,
            }
        } else {
            Self {
                value: AttributeValue::Numeric {
                    from: parse_magnitude(&property, from),
                    to: parse_magnitude(&property, to),
                },
                unit: extract_unit(from, &property),
                property,
                progress: 0.0,
            }
        }
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn value(&self) -> &AttributeValue {
        &self.value
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn is_color(&self) -> bool {
        matches!(self.value, AttributeValue::Color { .. })
    }

    pub fn is_transform(&self) -> bool {
        is_transform_property(&self.property)
    }

    /// Raw progress of the last frame that updated this attribute
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub(crate) fn set_progress(&mut self, progress: f64) {
        self.progress = progress;
    }

    /// Surface property this attribute writes to
    pub fn target_property(&self) -> &str {
        if self.is_transform() {
            TRANSFORM_PROPERTY
        } else {
            &self.property
        }
    }

    /// Interpolated numeric value for eased progress
    ///
    /// When `reversed`, from and to are swapped before interpolating.
    pub fn numeric_at(&self, eased: f64, reversed: bool) -> Option<f64> {
        match self.value {
            AttributeValue::Numeric { from, to } => {
                let (start, end) = if reversed { (to, from) } else { (from, to) };
                Some(start + (end - start) * eased)
            }
            AttributeValue::Color { .. } => None,
        }
    }

    /// Interpolated color for raw progress
    pub fn color_at(&self, progress: f64, reversed: bool) -> Option<Color> {
        match &self.value {
            AttributeValue::Color { from, to } => {
                let (start, end) = if reversed { (to, from) } else { (from, to) };
                Some(Color::parse(start).lerp(&Color::parse(end), progress))
            }
            AttributeValue::Numeric { .. } => None,
        }
    }

    /// Compute the serialized value for a frame
    ///
    /// `eased` applies to numeric channels only; colors use the raw `progress`.
    pub fn render(&self, progress: f64, eased: f64, reversed: bool) -> RenderedValue {
        match &self.value {
            AttributeValue::Color { .. } => {
                let color = self.color_at(progress, reversed).unwrap_or_default();
                RenderedValue::Style {
                    property: self.property.clone(),
                    value: color.to_css(),
                }
            }
            AttributeValue::Numeric { .. } => {
                let current = self.numeric_at(eased, reversed).unwrap_or_default();
                let text = format_fixed(current, 2);
                if self.is_transform() {
                    RenderedValue::Transform {
                        channel: self.property.clone(),
                        function: self.transform_function(&text),
                    }
                } else {
                    RenderedValue::Style {
                        property: self.property.clone(),
                        value: format!("{}{}", text, self.unit),
                    }
                }
            }
        }
    }

    fn transform_function(&self, text: &str) -> String {
        if is_scale_channel(&self.property) {
            format!("{}({})", self.property, text)
        } else if self.property == "translate" {
            format!("translate({0}{1},{0}{1})", text, self.unit)
        } else {
            format!("{}({}{})", self.property, text, self.unit)
        }
    }
}
