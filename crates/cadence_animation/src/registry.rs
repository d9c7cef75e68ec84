//! Easing preset registry
//!
//! Every engine owns its own registry, seeded from [`BUILTIN_PRESETS`].
//! Registering a custom curve on one engine never affects another.

use rustc_hash::FxHashMap;

use crate::easing::CubicBezier;
use crate::error::EasingError;

/// Built-in easing curves as `(name, [x1, y1, x2, y2])`
pub const BUILTIN_PRESETS: [(&str, [f64; 4]); 26] = [
    ("linear", [0.0, 0.0, 1.0, 1.0]),
    ("ease", [0.25, 0.1, 0.25, 1.0]),
    ("ease-in", [0.42, 0.0, 1.0, 1.0]),
    ("ease-out", [0.0, 0.0, 0.58, 1.0]),
    ("ease-in-out", [0.42, 0.0, 0.58, 1.0]),
    ("ease-in-quad", [0.55, 0.085, 0.68, 0.53]),
    ("ease-out-quad", [0.25, 0.46, 0.45, 0.94]),
    ("ease-in-out-quad", [0.455, 0.03, 0.515, 0.955]),
    ("ease-in-cubic", [0.55, 0.055, 0.675, 0.19]),
    ("ease-out-cubic", [0.215, 0.61, 0.355, 1.0]),
    ("ease-in-out-cubic", [0.645, 0.045, 0.355, 1.0]),
    ("ease-in-quart", [0.895, 0.03, 0.685, 0.22]),
    ("ease-out-quart", [0.165, 0.84, 0.44, 1.0]),
    ("ease-in-out-quart", [0.77, 0.0, 0.175, 1.0]),
    ("ease-in-quint", [0.755, 0.05, 0.855, 0.06]),
    ("ease-out-quint", [0.23, 1.0, 0.32, 1.0]),
    ("ease-in-out-quint", [0.86, 0.0, 0.07, 1.0]),
    ("ease-in-sine", [0.47, 0.0, 0.745, 0.715]),
    ("ease-out-sine", [0.39, 0.575, 0.565, 1.0]),
    ("ease-in-out-sine", [0.445, 0.05, 0.55, 0.95]),
    ("ease-in-expo", [0.95, 0.05, 0.795, 0.035]),
    ("ease-out-expo", [0.19, 1.0, 0.22, 1.0]),
    ("ease-in-out-expo", [1.0, 0.0, 0.0, 1.0]),
    ("ease-in-circ", [0.6, 0.04, 0.98, 0.335]),
    ("ease-out-circ", [0.075, 0.82, 0.165, 1.0]),
    ("ease-in-out-back", [0.68, -0.55, 0.265, 1.55]),
];

/// Named easing control points
#[derive(Clone, Debug)]
pub struct PresetRegistry {
    presets: FxHashMap<String, [f64; 4]>,
}

impl PresetRegistry {
    /// Create a registry holding the built-in presets
    pub fn new() -> Self {
        let mut presets = FxHashMap::default();
        presets.reserve(BUILTIN_PRESETS.len());
        for (name, points) in BUILTIN_PRESETS {
            presets.insert(name.to_string(), points);
        }
        Self { presets }
    }

    /// Create a registry with no presets
    pub fn empty() -> Self {
        Self {
            presets: FxHashMap::default(),
        }
    }

    pub fn get(&self, name: &str) -> Option<[f64; 4]> {
        self.presets.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.presets.contains_key(name)
    }

    /// Register or overwrite a preset
    ///
    /// Anything other than exactly four values is ignored and `false` is
    /// returned. The values are stored as given; a curve with out-of-range
    /// x-coordinates fails later, in [`PresetRegistry::resolve`].
    pub fn set(&mut self, name: impl Into<String>, points: &[f64]) -> bool {
        let name = name.into();
        match points {
            [x1, y1, x2, y2] => {
                tracing::debug!("PresetRegistry: set '{}' = {:?}", name, points);
                self.presets.insert(name, [*x1, *y1, *x2, *y2]);
                true
            }
            _ => {
                tracing::debug!(
                    "PresetRegistry: ignoring '{}' with {} control points",
                    name,
                    points.len()
                );
                false
            }
        }
    }

    /// Look up a preset and build its curve
    pub fn resolve(&self, name: &str) -> Result<CubicBezier, EasingError> {
        let [x1, y1, x2, y2] = self
            .get(name)
            .ok_or_else(|| EasingError::UnknownPreset(name.to_string()))?;
        CubicBezier::new(x1, y1, x2, y2)
    }

    /// All preset names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.presets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_presets_resolve() {
        let registry = PresetRegistry::new();
        assert_eq!(registry.len(), BUILTIN_PRESETS.len());
        for name in registry.names() {
            assert!(registry.resolve(name).is_ok(), "preset {} invalid", name);
        }
        assert_eq!(registry.get("ease"), Some([0.25, 0.1, 0.25, 1.0]));
        assert!(registry.resolve("linear").unwrap().is_linear());
    }

    #[test]
    fn test_set_overwrites() {
        let mut registry = PresetRegistry::new();
        assert!(registry.set("ease", &[0.1, 0.2, 0.3, 0.4]));
        assert_eq!(registry.get("ease"), Some([0.1, 0.2, 0.3, 0.4]));
        assert_eq!(registry.len(), BUILTIN_PRESETS.len());
    }

    #[test]
    fn test_set_wrong_length_ignored() {
        let mut registry = PresetRegistry::new();
        assert!(!registry.set("short", &[0.1, 0.2]));
        assert!(!registry.set("ease", &[0.1, 0.2, 0.3, 0.4, 0.5]));
        assert!(!registry.contains("short"));
        assert_eq!(registry.get("ease"), Some([0.25, 0.1, 0.25, 1.0]));
    }

    #[test]
    fn test_invalid_curve_stored_but_unresolvable() {
        let mut registry = PresetRegistry::new();
        assert!(registry.set("x", &[2.0, 0.0, 1.0, 1.0]));
        assert!(registry.contains("x"));
        assert_eq!(
            registry.resolve("x"),
            Err(EasingError::ControlPointOutOfRange { x1: 2.0, x2: 1.0 })
        );
    }

    #[test]
    fn test_unknown_preset() {
        let registry = PresetRegistry::empty();
        assert!(registry.is_empty());
        assert_eq!(
            registry.resolve("ease"),
            Err(EasingError::UnknownPreset("ease".to_string()))
        );
    }

    #[test]
    fn test_registries_are_independent() {
        let mut a = PresetRegistry::new();
        let b = PresetRegistry::new();
        a.set("custom", &[0.1, 0.1, 0.9, 0.9]);
        assert!(a.contains("custom"));
        assert!(!b.contains("custom"));
    }
}
