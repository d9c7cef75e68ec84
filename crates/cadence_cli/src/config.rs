//! Animation documents
//!
//! `cadence preview` reads a TOML file describing one animation:
//!
//! ```toml
//! effect = "fade-in"          # optional, applied before the attributes below
//!                             # runs for its own duration unless duration_ms is set
//!
//! [options]
//! duration_ms = 800
//! loop = 2
//! easing = "wiggle"
//!
//! [[easings]]
//! name = "wiggle"
//! points = [0.3, -0.4, 0.7, 1.4]
//!
//! [[attributes]]
//! property = "translateX"
//! from = "0px"
//! to = "120px"
//! ```

use anyhow::{Context, Result};
use cadence_animation::{Animation, AnimationOptions, Effect};
use cadence_core::SurfaceHandle;
use cadence_platform::SchedulerRef;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One animation described in TOML
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AnimationDocument {
    /// Named effect from the preset library
    #[serde(default)]
    pub effect: Option<String>,
    #[serde(default)]
    pub options: AnimationOptions,
    /// Custom easing presets, registered before `options.easing` is resolved
    #[serde(default)]
    pub easings: Vec<EasingEntry>,
    #[serde(default)]
    pub attributes: Vec<AttributeEntry>,
    /// Whether `[options]` named a duration
    #[serde(skip)]
    explicit_duration: bool,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct EasingEntry {
    pub name: String,
    pub points: Vec<f64>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AttributeEntry {
    pub property: String,
    pub from: String,
    pub to: String,
    /// Replace an earlier attribute for the same property
    #[serde(default = "default_unique")]
    pub unique: bool,
}

fn default_unique() -> bool {
    true
}

impl AnimationDocument {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: toml::Table = content.parse()?;
        let mut document: Self = toml::from_str(content)?;
        document.explicit_duration = table
            .get("options")
            .and_then(|options| options.get("duration_ms"))
            .is_some();
        if let Some(name) = &document.effect {
            // Fail at load time rather than at build time
            name.parse::<Effect>()?;
        }
        Ok(document)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize animation document")
    }

    /// Build the described animation
    ///
    /// Custom easings are registered first, then options are applied, then
    /// the effect (which may pick its own easing and loop policy), then the
    /// explicit attributes. The effect keeps its own duration unless the
    /// document sets one.
    pub fn build(&self, target: Option<SurfaceHandle>, scheduler: SchedulerRef) -> Result<Animation> {
        let mut animation = Animation::new(target, scheduler, AnimationOptions::default());

        for easing in &self.easings {
            if easing.points.len() != 4 {
                tracing::warn!(
                    "Easing '{}' needs 4 control points, got {}",
                    easing.name,
                    easing.points.len()
                );
            }
            animation = animation.add_custom_easing(&easing.name, &easing.points);
        }
        animation = animation.apply_options(&self.options);

        if let Some(name) = &self.effect {
            let effect: Effect = name.parse()?;
            tracing::debug!("Applying effect {}", effect);
            animation = if self.explicit_duration {
                effect.apply_with_duration(animation, self.options.duration_ms)
            } else {
                effect.apply(animation)
            };
        }

        for attribute in &self.attributes {
            animation = animation.add_attribute_with(
                &attribute.property,
                &attribute.from,
                &attribute.to,
                attribute.unique,
            );
        }
        Ok(animation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::RecordingSurface;
    use cadence_platform::VsyncScheduler;
    use std::rc::Rc;
    use std::time::Duration;

    const DOCUMENT: &str = r##"
[options]
duration_ms = 200
loop = 2
easing = "snap"

[[easings]]
name = "snap"
points = [0.9, 0.0, 0.1, 1.0]

[[attributes]]
property = "width"
from = "0px"
to = "50px"

[[attributes]]
property = "backgroundColor"
from = "#000000"
to = "#ffffff"
"##;

    #[test]
    fn test_parse_document() {
        let document = AnimationDocument::from_toml_str(DOCUMENT).unwrap();
        assert_eq!(document.options.duration_ms, 200);
        assert_eq!(document.options.loop_count, 2);
        assert_eq!(document.easings.len(), 1);
        assert_eq!(document.attributes.len(), 2);
        assert!(document.attributes[0].unique);
        assert!(document.effect.is_none());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let document = AnimationDocument::from_toml_str("").unwrap();
        assert_eq!(document.options, AnimationOptions::default());
        assert!(document.attributes.is_empty());
    }

    #[test]
    fn test_unknown_effect_rejected() {
        let err = AnimationDocument::from_toml_str("effect = \"teleport\"").unwrap_err();
        assert!(err.to_string().contains("teleport"));
    }

    #[test]
    fn test_build_registers_custom_easing_before_options() {
        let document = AnimationDocument::from_toml_str(DOCUMENT).unwrap();
        let scheduler = Rc::new(VsyncScheduler::new());
        let anim = document.build(None, scheduler).unwrap();

        assert_eq!(anim.duration_ms(), 200);
        assert_eq!(anim.loop_count(), 2);
        assert_eq!(
            anim.easing().map(|curve| curve.control_points()),
            Some([0.9, 0.0, 0.1, 1.0])
        );
        assert_eq!(anim.attribute_count(), 2);
    }

    #[test]
    fn test_build_with_effect_and_play() {
        let document = AnimationDocument::from_toml_str(
            r#"
effect = "fade-in"

[options]
duration_ms = 100

[[attributes]]
property = "translateY"
from = "10px"
to = "0px"
"#,
        )
        .unwrap();

        let scheduler = Rc::new(VsyncScheduler::new());
        let surface = RecordingSurface::shared();
        let anim = document
            .build(Some(surface.clone() as SurfaceHandle), scheduler.clone())
            .unwrap();
        anim.play();

        let mut now = 0;
        while scheduler.has_pending() && now < 1000 {
            scheduler.dispatch_frame(Duration::from_millis(now));
            now += 10;
        }
        assert_eq!(surface.get("opacity").as_deref(), Some("1.00"));
        assert_eq!(surface.get("transform").as_deref(), Some("translateY(0.00px)"));
    }

    #[test]
    fn test_effect_keeps_its_duration_unless_set() {
        let scheduler = Rc::new(VsyncScheduler::new());

        let document = AnimationDocument::from_toml_str("effect = \"float\"").unwrap();
        let anim = document.build(None, scheduler.clone()).unwrap();
        assert_eq!(anim.duration_ms(), Effect::Float.default_duration_ms());
        assert_eq!(anim.duration_ms(), 3000);

        let document = AnimationDocument::from_toml_str(
            r#"
effect = "float"

[options]
duration_ms = 800
"#,
        )
        .unwrap();
        let anim = document.build(None, scheduler).unwrap();
        assert_eq!(anim.duration_ms(), 800);
    }

    #[test]
    fn test_round_trip_through_toml() {
        let document = AnimationDocument::from_toml_str(DOCUMENT).unwrap();
        let text = document.to_toml().unwrap();
        let again = AnimationDocument::from_toml_str(&text).unwrap();
        assert_eq!(again.options, document.options);
        assert_eq!(again.attributes.len(), 2);
    }
}
