//! Effect presets
//!
//! Ready-made effects built purely from the public builder API: each one sets
//! a duration, registers attributes and, where it needs one, an easing curve
//! and loop policy.
//!
//! ```rust
//! use cadence_animation::{Animation, Effect};
//! use cadence_core::RecordingSurface;
//! use cadence_platform::VsyncScheduler;
//! use std::rc::Rc;
//!
//! let scheduler = Rc::new(VsyncScheduler::new());
//! let anim = Animation::with_target(RecordingSurface::shared(), scheduler).slide_in_left(300);
//! assert_eq!(anim.attribute_count(), 2);
//!
//! let effect: Effect = "shake".parse().unwrap();
//! assert_eq!(effect.default_duration_ms(), 500);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::engine::Animation;
use crate::options::INFINITE_LOOP;

/// Overshooting curve shared by bounce and elastic-out
const BACK_CURVE: [f64; 4] = [0.68, -0.55, 0.265, 1.55];
const ELASTIC_IN_CURVE: [f64; 4] = [0.175, 0.885, 0.32, 1.275];

impl Animation {
    pub fn fade_in(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms).opacity("0", "1")
    }

    pub fn fade_out(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms).opacity("1", "0")
    }

    pub fn slide_in_left(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms)
            .translate_x("-100%", "0%")
            .opacity("0", "1")
    }

    pub fn slide_in_right(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms)
            .translate_x("100%", "0%")
            .opacity("0", "1")
    }

    pub fn slide_in_up(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms)
            .translate_y("-100%", "0%")
            .opacity("0", "1")
    }

    pub fn slide_in_down(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms)
            .translate_y("100%", "0%")
            .opacity("0", "1")
    }

    pub fn slide_out_left(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms)
            .translate_x("0%", "-100%")
            .opacity("1", "0")
    }

    pub fn slide_out_right(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms)
            .translate_x("0%", "100%")
            .opacity("1", "0")
    }

    pub fn slide_out_up(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms)
            .translate_y("0%", "-100%")
            .opacity("1", "0")
    }

    pub fn slide_out_down(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms)
            .translate_y("0%", "100%")
            .opacity("1", "0")
    }

    pub fn zoom_in(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms)
            .scale("0", "1")
            .opacity("0", "1")
    }

    pub fn zoom_out(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms)
            .scale("1", "0")
            .opacity("1", "0")
    }

    /// Spin in by `degrees` while fading in
    pub fn rotate_in(self, duration_ms: u32, degrees: f64) -> Self {
        self.set_duration(duration_ms)
            .rotate("0deg", &format!("{}deg", degrees))
            .opacity("0", "1")
    }

    pub fn rotate_out(self, duration_ms: u32, degrees: f64) -> Self {
        self.set_duration(duration_ms)
            .rotate("0deg", &format!("{}deg", degrees))
            .opacity("1", "0")
    }

    /// Pulse up and back with an overshooting curve
    pub fn bounce(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms)
            .add_custom_easing("bounce", &BACK_CURVE)
            .set_easing("bounce")
            .scale("1", "1.1")
            .set_alternate(true)
            .set_loop_count(2)
    }

    pub fn shake(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms)
            .translate_x("0px", "10px")
            .set_alternate(true)
            .set_loop_count(6)
    }

    pub fn flip_x(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms)
            .transform("rotateX", "0deg", "180deg")
            .set_easing("ease")
    }

    pub fn flip_y(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms)
            .transform("rotateY", "0deg", "180deg")
            .set_easing("ease")
    }

    pub fn elastic_in(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms)
            .scale("0", "1")
            .opacity("0", "1")
            .add_custom_easing("elastic-in", &ELASTIC_IN_CURVE)
            .set_easing("elastic-in")
    }

    pub fn elastic_out(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms)
            .scale("1", "0")
            .opacity("1", "0")
            .add_custom_easing("elastic-out", &BACK_CURVE)
            .set_easing("elastic-out")
    }

    pub fn rubber_band(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms)
            .transform("scaleX", "1", "1.25")
            .transform("scaleY", "1", "0.75")
            .set_alternate(true)
            .set_loop_count(2)
            .set_easing("ease")
    }

    pub fn swing(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms)
            .rotate("0deg", "15deg")
            .set_alternate(true)
            .set_loop_count(4)
            .set_easing("ease")
    }

    pub fn wobble(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms)
            .translate_x("0px", "25px")
            .rotate("0deg", "5deg")
            .set_alternate(true)
            .set_loop_count(4)
    }

    pub fn roll_in(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms)
            .translate_x("-100%", "0%")
            .rotate("-120deg", "0deg")
            .opacity("0", "1")
    }

    pub fn roll_out(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms)
            .translate_x("0%", "100%")
            .rotate("0deg", "120deg")
            .opacity("1", "0")
    }

    pub fn light_speed(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms)
            .translate_x("-100%", "0%")
            .transform("skewX", "-30deg", "0deg")
            .opacity("0", "1")
            .set_easing("ease-out-quad")
    }

    /// Drift up and down until stopped
    pub fn float(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms)
            .translate_y("0px", "-10px")
            .set_alternate(true)
            .set_loop_count(INFINITE_LOOP)
            .set_easing("ease")
    }

    pub fn breathe(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms)
            .scale("1", "1.1")
            .set_alternate(true)
            .set_loop_count(INFINITE_LOOP)
            .set_easing("ease")
    }

    /// Pulse a white shadow's alpha until stopped
    pub fn glow(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms)
            .add_attribute(
                "shadow-color",
                "rgba(255,255,255,0.5)",
                "rgba(255,255,255,1)",
            )
            .set_alternate(true)
            .set_loop_count(INFINITE_LOOP)
            .set_easing("ease")
    }

    /// Grow `width` from 0% to `percent`%
    pub fn progress_bar(self, duration_ms: u32, percent: f64) -> Self {
        self.set_duration(duration_ms)
            .add_attribute("width", "0%", &format!("{}%", percent))
            .set_easing("ease-out-quad")
    }

    pub fn modal_in(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms)
            .scale("0.7", "1")
            .opacity("0", "1")
            .set_easing("ease-out-quad")
    }

    pub fn modal_out(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms)
            .scale("1", "0.7")
            .opacity("1", "0")
            .set_easing("ease-in")
    }

    pub fn card_flip(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms)
            .transform("rotateY", "0deg", "180deg")
            .set_easing("ease")
    }

    pub fn ripple(self, duration_ms: u32) -> Self {
        self.set_duration(duration_ms)
            .scale("0", "4")
            .opacity("0.7", "0")
            .set_easing("ease-out-quad")
    }
}

/// A named effect with its default parameters
///
/// Used where effects are picked by name, such as configuration files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Effect {
    FadeIn,
    FadeOut,
    SlideInLeft,
    SlideInRight,
    SlideInUp,
    SlideInDown,
    SlideOutLeft,
    SlideOutRight,
    SlideOutUp,
    SlideOutDown,
    ZoomIn,
    ZoomOut,
    RotateIn,
    RotateOut,
    Bounce,
    Shake,
    FlipX,
    FlipY,
    ElasticIn,
    ElasticOut,
    RubberBand,
    Swing,
    Wobble,
    RollIn,
    RollOut,
    LightSpeed,
    Float,
    Breathe,
    Glow,
    ProgressBar,
    ModalIn,
    ModalOut,
    CardFlip,
    Ripple,
}

impl Effect {
    pub const ALL: [Effect; 34] = [
        Effect::FadeIn,
        Effect::FadeOut,
        Effect::SlideInLeft,
        Effect::SlideInRight,
        Effect::SlideInUp,
        Effect::SlideInDown,
        Effect::SlideOutLeft,
        Effect::SlideOutRight,
        Effect::SlideOutUp,
        Effect::SlideOutDown,
        Effect::ZoomIn,
        Effect::ZoomOut,
        Effect::RotateIn,
        Effect::RotateOut,
        Effect::Bounce,
        Effect::Shake,
        Effect::FlipX,
        Effect::FlipY,
        Effect::ElasticIn,
        Effect::ElasticOut,
        Effect::RubberBand,
        Effect::Swing,
        Effect::Wobble,
        Effect::RollIn,
        Effect::RollOut,
        Effect::LightSpeed,
        Effect::Float,
        Effect::Breathe,
        Effect::Glow,
        Effect::ProgressBar,
        Effect::ModalIn,
        Effect::ModalOut,
        Effect::CardFlip,
        Effect::Ripple,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Effect::FadeIn => "fade-in",
            Effect::FadeOut => "fade-out",
            Effect::SlideInLeft => "slide-in-left",
            Effect::SlideInRight => "slide-in-right",
            Effect::SlideInUp => "slide-in-up",
            Effect::SlideInDown => "slide-in-down",
            Effect::SlideOutLeft => "slide-out-left",
            Effect::SlideOutRight => "slide-out-right",
            Effect::SlideOutUp => "slide-out-up",
            Effect::SlideOutDown => "slide-out-down",
            Effect::ZoomIn => "zoom-in",
            Effect::ZoomOut => "zoom-out",
            Effect::RotateIn => "rotate-in",
            Effect::RotateOut => "rotate-out",
            Effect::Bounce => "bounce",
            Effect::Shake => "shake",
            Effect::FlipX => "flip-x",
            Effect::FlipY => "flip-y",
            Effect::ElasticIn => "elastic-in",
            Effect::ElasticOut => "elastic-out",
            Effect::RubberBand => "rubber-band",
            Effect::Swing => "swing",
            Effect::Wobble => "wobble",
            Effect::RollIn => "roll-in",
            Effect::RollOut => "roll-out",
            Effect::LightSpeed => "light-speed",
            Effect::Float => "float",
            Effect::Breathe => "breathe",
            Effect::Glow => "glow",
            Effect::ProgressBar => "progress-bar",
            Effect::ModalIn => "modal-in",
            Effect::ModalOut => "modal-out",
            Effect::CardFlip => "card-flip",
            Effect::Ripple => "ripple",
        }
    }

    pub fn default_duration_ms(&self) -> u32 {
        match self {
            Effect::FadeIn
            | Effect::FadeOut
            | Effect::SlideInLeft
            | Effect::SlideInRight
            | Effect::SlideInUp
            | Effect::SlideInDown
            | Effect::SlideOutLeft
            | Effect::SlideOutRight
            | Effect::SlideOutUp
            | Effect::SlideOutDown
            | Effect::ZoomIn
            | Effect::ZoomOut
            | Effect::ModalIn
            | Effect::ModalOut => 300,
            Effect::RotateIn | Effect::RotateOut | Effect::Shake | Effect::LightSpeed => 500,
            Effect::Bounce
            | Effect::FlipX
            | Effect::FlipY
            | Effect::ElasticIn
            | Effect::ElasticOut
            | Effect::RollIn
            | Effect::RollOut
            | Effect::CardFlip
            | Effect::Ripple => 600,
            Effect::RubberBand | Effect::Swing | Effect::Wobble | Effect::ProgressBar => 1000,
            Effect::Glow => 1500,
            Effect::Breathe => 2000,
            Effect::Float => 3000,
        }
    }

    /// Apply with the default duration
    pub fn apply(&self, animation: Animation) -> Animation {
        self.apply_with_duration(animation, self.default_duration_ms())
    }

    /// Apply with an explicit duration
    ///
    /// Effects with extra parameters use their defaults: a full turn for the
    /// rotations, 100% for the progress bar.
    pub fn apply_with_duration(&self, animation: Animation, duration_ms: u32) -> Animation {
        match self {
            Effect::FadeIn => animation.fade_in(duration_ms),
            Effect::FadeOut => animation.fade_out(duration_ms),
            Effect::SlideInLeft => animation.slide_in_left(duration_ms),
            Effect::SlideInRight => animation.slide_in_right(duration_ms),
            Effect::SlideInUp => animation.slide_in_up(duration_ms),
            Effect::SlideInDown => animation.slide_in_down(duration_ms),
            Effect::SlideOutLeft => animation.slide_out_left(duration_ms),
            Effect::SlideOutRight => animation.slide_out_right(duration_ms),
            Effect::SlideOutUp => animation.slide_out_up(duration_ms),
            Effect::SlideOutDown => animation.slide_out_down(duration_ms),
            Effect::ZoomIn => animation.zoom_in(duration_ms),
            Effect::ZoomOut => animation.zoom_out(duration_ms),
            Effect::RotateIn => animation.rotate_in(duration_ms, 360.0),
            Effect::RotateOut => animation.rotate_out(duration_ms, 360.0),
            Effect::Bounce => animation.bounce(duration_ms),
            Effect::Shake => animation.shake(duration_ms),
            Effect::FlipX => animation.flip_x(duration_ms),
            Effect::FlipY => animation.flip_y(duration_ms),
            Effect::ElasticIn => animation.elastic_in(duration_ms),
            Effect::ElasticOut => animation.elastic_out(duration_ms),
            Effect::RubberBand => animation.rubber_band(duration_ms),
            Effect::Swing => animation.swing(duration_ms),
            Effect::Wobble => animation.wobble(duration_ms),
            Effect::RollIn => animation.roll_in(duration_ms),
            Effect::RollOut => animation.roll_out(duration_ms),
            Effect::LightSpeed => animation.light_speed(duration_ms),
            Effect::Float => animation.float(duration_ms),
            Effect::Breathe => animation.breathe(duration_ms),
            Effect::Glow => animation.glow(duration_ms),
            Effect::ProgressBar => animation.progress_bar(duration_ms, 100.0),
            Effect::ModalIn => animation.modal_in(duration_ms),
            Effect::ModalOut => animation.modal_out(duration_ms),
            Effect::CardFlip => animation.card_flip(duration_ms),
            Effect::Ripple => animation.ripple(duration_ms),
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error parsing an effect name
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Unknown effect: {0}")]
pub struct UnknownEffect(pub String);

impl FromStr for Effect {
    type Err = UnknownEffect;

    /// Accepts kebab-case (`slide-in-left`), snake_case and camelCase names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Effect::ALL
            .into_iter()
            .find(|effect| effect.name().replace('-', "") == normalized)
            .ok_or_else(|| UnknownEffect(s.to_string()))
    }
}
