//! Target surfaces
//!
//! A target surface is whatever an animation writes its values to: a view's
//! style block, a native layer, or the [`RecordingSurface`] used headless.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Property-setter interface driven by an animation
///
/// Methods take `&self`; implementations backed by mutable state use interior
/// mutability, the same way a host view handle would.
pub trait TargetSurface {
    /// Set a named visual property to a serialized value
    fn set_property(&self, name: &str, value: &str);

    /// Return a property to its unset state
    fn clear_property(&self, name: &str);
}

/// Shared handle to a target surface
pub type SurfaceHandle = Rc<dyn TargetSurface>;

/// A single write recorded by [`RecordingSurface`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropertyWrite {
    Set { name: String, value: String },
    Clear { name: String },
}

impl PropertyWrite {
    pub fn name(&self) -> &str {
        match self {
            PropertyWrite::Set { name, .. } | PropertyWrite::Clear { name } => name,
        }
    }
}

/// Surface that records every write and keeps the current property values
#[derive(Debug, Default)]
pub struct RecordingSurface {
    values: RefCell<FxHashMap<String, String>>,
    writes: RefCell<Vec<PropertyWrite>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recording surface behind a shared handle
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    /// Current value of a property, if set
    pub fn get(&self, name: &str) -> Option<String> {
        self.values.borrow().get(name).cloned()
    }

    /// Every value written to `name`, oldest first
    pub fn history(&self, name: &str) -> Vec<String> {
        self.writes
            .borrow()
            .iter()
            .filter_map(|write| match write {
                PropertyWrite::Set { name: n, value } if n == name => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    /// All recorded writes, oldest first
    pub fn writes(&self) -> Vec<PropertyWrite> {
        self.writes.borrow().clone()
    }

    /// Take the recorded writes, leaving the log empty
    ///
    /// Current property values are kept.
    pub fn take_writes(&self) -> Vec<PropertyWrite> {
        std::mem::take(&mut *self.writes.borrow_mut())
    }

    pub fn write_count(&self) -> usize {
        self.writes.borrow().len()
    }

    /// Forget all values and writes
    pub fn clear(&self) {
        self.values.borrow_mut().clear();
        self.writes.borrow_mut().clear();
    }
}

impl TargetSurface for RecordingSurface {
    fn set_property(&self, name: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        self.writes.borrow_mut().push(PropertyWrite::Set {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    fn clear_property(&self, name: &str) {
        self.values.borrow_mut().remove(name);
        self.writes.borrow_mut().push(PropertyWrite::Clear {
            name: name.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_surface_tracks_values() {
        let surface = RecordingSurface::new();
        surface.set_property("opacity", "0.00");
        surface.set_property("opacity", "0.50");
        surface.set_property("width", "10.00px");

        assert_eq!(surface.get("opacity").as_deref(), Some("0.50"));
        assert_eq!(surface.history("opacity"), vec!["0.00", "0.50"]);
        assert_eq!(surface.write_count(), 3);
    }

    #[test]
    fn test_clear_property() {
        let surface = RecordingSurface::new();
        surface.set_property("transform", "scale(1.00)");
        surface.clear_property("transform");

        assert_eq!(surface.get("transform"), None);
        assert_eq!(
            surface.writes().last(),
            Some(&PropertyWrite::Clear {
                name: "transform".to_string()
            })
        );
    }

    #[test]
    fn test_take_writes_keeps_values() {
        let surface = RecordingSurface::new();
        surface.set_property("left", "4.00px");
        let taken = surface.take_writes();

        assert_eq!(taken.len(), 1);
        assert_eq!(taken[0].name(), "left");
        assert_eq!(surface.write_count(), 0);
        assert_eq!(surface.get("left").as_deref(), Some("4.00px"));
    }

    #[test]
    fn test_shared_handle_coerces() {
        let surface = RecordingSurface::shared();
        let handle: SurfaceHandle = surface.clone();
        handle.set_property("opacity", "1.00");
        assert_eq!(surface.get("opacity").as_deref(), Some("1.00"));
    }
}
