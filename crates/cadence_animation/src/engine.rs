//! Playback state machine
//!
//! [`Animation`] is a cheap, clonable handle to one engine instance. Builder
//! methods consume and return the handle so configuration chains; playback
//! controls take `&self`.
//!
//! # State machine
//!
//! ```text
//! Idle --play--> Running --pause--> Paused --resume--> Running
//!                   |
//!                   +--cycle done, loops left--> Running
//!                   +--cycle done, no loops left--> Completed
//!                   +--stop--> Stopped
//! any --reset--> Idle
//! ```
//!
//! Frames arrive from the injected [`FrameScheduler`](cadence_platform::FrameScheduler).
//! A pending frame holds a strong handle, so a playing animation keeps itself
//! alive until it completes or is stopped.
//!
//! User callbacks and surface writes always run with the engine unborrowed,
//! so callbacks may freely call back into the animation.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use cadence_core::SurfaceHandle;
use cadence_platform::{FrameHandle, FrameScheduler, SchedulerRef};
use indexmap::{IndexMap, IndexSet};
use smallvec::SmallVec;
use tokio::sync::oneshot;

use crate::attribute::{Attribute, RenderedValue, TRANSFORM_PROPERTY};
use crate::completion::PlayAsync;
use crate::easing::CubicBezier;
use crate::options::{AnimationOptions, INFINITE_LOOP};
use crate::registry::PresetRegistry;

/// Called once when playback starts
pub type StartCallback = Rc<dyn Fn()>;
/// Called after every frame that does not end a cycle, with raw progress
pub type FrameProgressCallback = Rc<dyn Fn(f64)>;
/// Called once when the last cycle finishes
pub type CompleteCallback = Rc<dyn Fn()>;

/// Property writes produced by one frame
type FrameWrites = SmallVec<[(String, String); 4]>;

/// Coarse playback state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlaybackState {
    /// Constructed or reset, never played since
    #[default]
    Idle,
    Running,
    /// Frozen by `pause()`, resumable
    Paused,
    /// Forced to a halt by `stop()`
    Stopped,
    /// Every cycle finished
    Completed,
}

/// Mutable playback record of one engine
#[derive(Clone, Debug, PartialEq)]
pub struct EngineState {
    pub is_running: bool,
    pub is_paused: bool,
    pub is_stopping: bool,
    /// Progress carried into the current cycle, set when pausing
    pub current_progress: f64,
    pub current_loop: i32,
    pub loop_count: i32,
    pub is_alternate: bool,
    pub is_alternate_reversed: bool,
    pub is_reversed: bool,
    pub is_sequential: bool,
    pub current_attribute_index: usize,
    /// Frame time the current cycle is measured from
    pub start_timestamp: Option<Duration>,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            is_running: false,
            is_paused: false,
            is_stopping: true,
            current_progress: 0.0,
            current_loop: 0,
            loop_count: 1,
            is_alternate: false,
            is_alternate_reversed: false,
            is_reversed: false,
            is_sequential: false,
            current_attribute_index: 0,
            start_timestamp: None,
        }
    }
}

enum FrameStep {
    Paused,
    CycleDone,
    Continue(Option<FrameProgressCallback>),
}

enum CycleOutcome {
    Restart,
    Complete(Option<CompleteCallback>, SmallVec<[oneshot::Sender<()>; 1]>),
}

struct EngineInner {
    target: Option<SurfaceHandle>,
    scheduler: SchedulerRef,
    registry: PresetRegistry,
    duration_ms: u32,
    state: EngineState,
    playback: PlaybackState,
    attributes: Vec<Attribute>,
    easing: Option<CubicBezier>,
    /// Latest function per transform channel, in registration order
    transforms: IndexMap<String, String>,
    frame: Option<FrameHandle>,
    last_progress: f64,
    on_start: Option<StartCallback>,
    on_frame: Option<FrameProgressCallback>,
    on_complete: Option<CompleteCallback>,
    /// Pending `play_async` futures, resolved on completion
    completion_waiters: SmallVec<[oneshot::Sender<()>; 1]>,
}

impl EngineInner {
    fn cancel_frame(&mut self) {
        if let Some(handle) = self.frame.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    fn apply_frame(&mut self, progress: f64, writes: &mut FrameWrites) {
        let reversed = self.state.is_reversed || self.state.is_alternate_reversed;
        let eased = self
            .easing
            .as_ref()
            .map_or(progress, |curve| curve.solve(progress));

        let count = self.attributes.len();
        let range = if self.state.is_sequential {
            let index = self.state.current_attribute_index.min(count);
            index..(index + 1).min(count)
        } else {
            0..count
        };

        let mut transform_changed = false;
        for attribute in &mut self.attributes[range] {
            attribute.set_progress(progress);
            match attribute.render(progress, eased, reversed) {
                RenderedValue::Style { property, value } => writes.push((property, value)),
                RenderedValue::Transform { channel, function } => {
                    self.transforms.insert(channel, function);
                    transform_changed = true;
                }
            }
        }

        if transform_changed {
            let composed = self
                .transforms
                .values()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" ");
            writes.push((TRANSFORM_PROPERTY.to_string(), composed));
        }
    }

    fn set_easing_by_name(&mut self, name: &str) {
        self.easing = match self.registry.resolve(name) {
            Ok(curve) => Some(curve),
            Err(err) => {
                tracing::warn!("Animation: easing '{}' unusable ({}), running linear", name, err);
                None
            }
        };
    }
}

/// Handle to a timed property animation
#[derive(Clone)]
pub struct Animation {
    inner: Rc<RefCell<EngineInner>>,
}

impl Animation {
    /// Create an animation writing to `target`
    ///
    /// Without a target the animation still advances and fires callbacks;
    /// property writes are dropped.
    pub fn new(
        target: Option<SurfaceHandle>,
        scheduler: SchedulerRef,
        options: AnimationOptions,
    ) -> Self {
        let animation = Self {
            inner: Rc::new(RefCell::new(EngineInner {
                target,
                scheduler,
                registry: PresetRegistry::new(),
                duration_ms: options.duration_ms,
                state: EngineState::default(),
                playback: PlaybackState::Idle,
                attributes: Vec::new(),
                easing: None,
                transforms: IndexMap::new(),
                frame: None,
                last_progress: 0.0,
                on_start: None,
                on_frame: None,
                on_complete: None,
                completion_waiters: SmallVec::new(),
            })),
        };
        animation.apply_options(&options)
    }

    /// Create an animation with default options
    pub fn with_target(target: SurfaceHandle, scheduler: SchedulerRef) -> Self {
        Self::new(Some(target), scheduler, AnimationOptions::default())
    }

    /// Apply every field of `options`
    ///
    /// An unusable easing configuration leaves the animation linear.
    pub fn apply_options(self, options: &AnimationOptions) -> Self {
        {
            let mut inner = self.inner.borrow_mut();
            inner.duration_ms = options.duration_ms;
            inner.state.loop_count = options.loop_count;
            inner.state.is_alternate = options.alternate;
            inner.state.is_sequential = options.sequential;
            inner.state.is_reversed = options.reverse;

            if let Some(points) = options.bezier.as_ref().filter(|points| points.len() != 4) {
                tracing::debug!(
                    "Animation: ignoring bezier with {} control points",
                    points.len()
                );
            }

            match options.resolve_easing(&inner.registry) {
                Ok(Some(curve)) => inner.easing = Some(curve),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!("Animation: {}, running linear", err);
                    inner.easing = None;
                }
            }
        }
        self
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Set the duration of one cycle
    pub fn set_duration(self, duration_ms: u32) -> Self {
        self.inner.borrow_mut().duration_ms = duration_ms;
        self
    }

    /// Set the number of cycles (-1 = infinite)
    pub fn set_loop_count(self, count: i32) -> Self {
        self.inner.borrow_mut().state.loop_count = count;
        self
    }

    pub fn set_alternate(self, alternate: bool) -> Self {
        self.inner.borrow_mut().state.is_alternate = alternate;
        self
    }

    pub fn set_sequential(self, sequential: bool) -> Self {
        self.inner.borrow_mut().state.is_sequential = sequential;
        self
    }

    /// Set the reversed flag, or toggle it with `None`
    pub fn set_reverse(self, reverse: Option<bool>) -> Self {
        {
            let mut inner = self.inner.borrow_mut();
            inner.state.is_reversed = reverse.unwrap_or(!inner.state.is_reversed);
        }
        self
    }

    /// Use a named preset from this animation's registry
    ///
    /// Unknown names and invalid curves fall back to linear timing.
    pub fn set_easing(self, name: &str) -> Self {
        self.inner.borrow_mut().set_easing_by_name(name);
        self
    }

    /// Use a custom `[x1, y1, x2, y2]` curve
    ///
    /// Out-of-range x-coordinates fall back to linear timing.
    pub fn set_bezier(self, points: [f64; 4]) -> Self {
        {
            let [x1, y1, x2, y2] = points;
            let mut inner = self.inner.borrow_mut();
            inner.easing = match CubicBezier::new(x1, y1, x2, y2) {
                Ok(curve) => Some(curve),
                Err(err) => {
                    tracing::warn!("Animation: {}, running linear", err);
                    None
                }
            };
        }
        self
    }

    /// Register a named curve in this animation's preset registry
    ///
    /// Slices that are not exactly four values long are ignored.
    pub fn add_custom_easing(self, name: &str, points: &[f64]) -> Self {
        self.inner.borrow_mut().registry.set(name, points);
        self
    }

    pub fn on_start<F>(self, callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.inner.borrow_mut().on_start = Some(Rc::new(callback));
        self
    }

    pub fn on_frame<F>(self, callback: F) -> Self
    where
        F: Fn(f64) + 'static,
    {
        self.inner.borrow_mut().on_frame = Some(Rc::new(callback));
        self
    }

    pub fn on_complete<F>(self, callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.inner.borrow_mut().on_complete = Some(Rc::new(callback));
        self
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    /// Animate `property` from `from` to `to`, replacing an existing
    /// attribute of the same name
    pub fn add_attribute(self, property: &str, from: &str, to: &str) -> Self {
        self.add_attribute_with(property, from, to, true)
    }

    /// Animate `property`, appending a second attribute for the same name
    /// when `unique` is false
    pub fn add_attribute_with(self, property: &str, from: &str, to: &str, unique: bool) -> Self {
        {
            let attribute = Attribute::new(property, from, to);
            let mut inner = self.inner.borrow_mut();
            let existing = if unique {
                inner
                    .attributes
                    .iter()
                    .position(|attr| attr.property() == property)
            } else {
                None
            };
            match existing {
                Some(index) => inner.attributes[index] = attribute,
                None => inner.attributes.push(attribute),
            }
        }
        self
    }

    /// Remove every attribute
    pub fn clear_attributes(self) -> Self {
        {
            let mut inner = self.inner.borrow_mut();
            inner.attributes.clear();
            inner.transforms.clear();
        }
        self
    }

    /// Animate a transform channel such as `skewX` or `rotateY`
    pub fn transform(self, channel: &str, from: &str, to: &str) -> Self {
        self.add_attribute(channel, from, to)
    }

    pub fn translate(self, from_x: &str, from_y: &str, to_x: &str, to_y: &str) -> Self {
        self.add_attribute("translateX", from_x, to_x)
            .add_attribute("translateY", from_y, to_y)
    }

    pub fn translate_x(self, from: &str, to: &str) -> Self {
        self.add_attribute("translateX", from, to)
    }

    pub fn translate_y(self, from: &str, to: &str) -> Self {
        self.add_attribute("translateY", from, to)
    }

    pub fn scale(self, from: &str, to: &str) -> Self {
        self.add_attribute("scale", from, to)
    }

    pub fn rotate(self, from: &str, to: &str) -> Self {
        self.add_attribute("rotate", from, to)
    }

    pub fn opacity(self, from: &str, to: &str) -> Self {
        self.add_attribute("opacity", from, to)
    }

    // ========================================================================
    // Playback
    // ========================================================================

    /// Start playback from the first attribute and loop
    ///
    /// No-op while running.
    pub fn play(&self) -> &Self {
        let on_start = {
            let mut inner = self.inner.borrow_mut();
            if inner.state.is_running {
                return self;
            }
            let state = &mut inner.state;
            state.is_running = true;
            state.is_stopping = false;
            state.is_paused = false;
            state.current_loop = 0;
            state.current_attribute_index = 0;
            inner.last_progress = inner.state.current_progress;
            inner.playback = PlaybackState::Running;
            tracing::debug!(
                "Animation: play ({} attributes, {}ms, loop {}) on {}",
                inner.attributes.len(),
                inner.duration_ms,
                inner.state.loop_count,
                inner.scheduler.name()
            );
            inner.on_start.clone()
        };

        if let Some(on_start) = on_start {
            on_start();
        }
        // on_start may have stopped us
        if self.inner.borrow().state.is_running {
            self.start_cycle();
        }
        self
    }

    /// Play and resolve when the animation completes
    ///
    /// The completion callback still runs first. Each future is resolved
    /// once and then forgotten.
    pub fn play_async(&self) -> PlayAsync {
        let (sender, receiver) = oneshot::channel();
        self.inner.borrow_mut().completion_waiters.push(sender);
        self.play();
        PlayAsync::new(receiver)
    }

    /// Freeze on the next frame
    pub fn pause(&self) -> &Self {
        self.inner.borrow_mut().state.is_paused = true;
        tracing::debug!("Animation: pause requested");
        self
    }

    /// Continue from the paused progress
    ///
    /// Only acts when paused. Loop count and sequential position are kept.
    pub fn resume(&self) -> &Self {
        let restart = {
            let mut inner = self.inner.borrow_mut();
            if !inner.state.is_paused {
                return self;
            }
            let playback = inner.playback;
            match playback {
                PlaybackState::Running => {
                    // The pause was never observed by a frame
                    inner.state.is_paused = false;
                    false
                }
                PlaybackState::Paused => {
                    inner.state.is_paused = false;
                    inner.state.is_running = true;
                    inner.state.is_stopping = false;
                    inner.playback = PlaybackState::Running;
                    tracing::debug!(
                        "Animation: resume at progress {:.3}",
                        inner.state.current_progress
                    );
                    true
                }
                _ => return self,
            }
        };
        if restart {
            self.start_cycle();
        }
        self
    }

    /// Halt immediately without firing the completion callback
    ///
    /// Idempotent.
    pub fn stop(&self) -> &Self {
        let mut inner = self.inner.borrow_mut();
        inner.state.is_stopping = true;
        inner.state.is_paused = false;
        inner.state.current_progress = 0.0;
        inner.state.current_attribute_index = inner.attributes.len();
        inner.cancel_frame();
        inner.state.is_running = false;
        inner.last_progress = 0.0;
        if matches!(inner.playback, PlaybackState::Running | PlaybackState::Paused) {
            inner.playback = PlaybackState::Stopped;
            tracing::debug!("Animation: stopped");
        }
        self
    }

    /// Stop, clear every driven property on the target, and forget attributes,
    /// easing and callbacks
    ///
    /// Duration, loop count, alternate and sequential settings are kept.
    pub fn reset(&self) -> &Self {
        self.stop();

        let (target, cleared, callbacks) = {
            let mut inner = self.inner.borrow_mut();
            let cleared: IndexSet<String> = inner
                .attributes
                .iter()
                .map(|attr| attr.target_property().to_string())
                .collect();

            inner.attributes.clear();
            inner.transforms.clear();
            inner.easing = None;
            let callbacks = (
                inner.on_start.take(),
                inner.on_frame.take(),
                inner.on_complete.take(),
                std::mem::take(&mut inner.completion_waiters),
            );

            let state = &mut inner.state;
            state.current_progress = 0.0;
            state.current_loop = 0;
            state.current_attribute_index = 0;
            state.is_alternate_reversed = false;
            state.is_reversed = false;
            state.is_paused = false;
            state.is_stopping = true;
            state.start_timestamp = None;

            inner.cancel_frame();
            inner.playback = PlaybackState::Idle;
            inner.last_progress = 0.0;
            tracing::debug!("Animation: reset, clearing {} properties", cleared.len());
            (inner.target.clone(), cleared, callbacks)
        };

        // Dropping callbacks can cancel pending play_async futures
        drop(callbacks);

        if let Some(target) = target {
            for property in &cleared {
                target.clear_property(property);
            }
        }
        self
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Raw progress of the most recent frame
    ///
    /// Zero before the first frame and after `stop()`; 1.0 once completed.
    pub fn progress(&self) -> f64 {
        self.inner.borrow().last_progress
    }

    pub fn is_animating(&self) -> bool {
        self.inner.borrow().state.is_running
    }

    pub fn is_paused(&self) -> bool {
        self.inner.borrow().state.is_paused
    }

    /// Number of cycles finished in the current run
    pub fn current_loop(&self) -> i32 {
        self.inner.borrow().state.current_loop
    }

    pub fn attribute_count(&self) -> usize {
        self.inner.borrow().attributes.len()
    }

    pub fn state(&self) -> PlaybackState {
        self.inner.borrow().playback
    }

    /// Snapshot of the full playback record
    pub fn engine_state(&self) -> EngineState {
        self.inner.borrow().state.clone()
    }

    pub fn duration_ms(&self) -> u32 {
        self.inner.borrow().duration_ms
    }

    pub fn loop_count(&self) -> i32 {
        self.inner.borrow().state.loop_count
    }

    pub fn is_reversed(&self) -> bool {
        self.inner.borrow().state.is_reversed
    }

    /// The active easing curve, `None` when linear
    pub fn easing(&self) -> Option<CubicBezier> {
        self.inner.borrow().easing.clone()
    }

    /// Control points of a preset in this animation's registry
    pub fn easing_preset(&self, name: &str) -> Option<[f64; 4]> {
        self.inner.borrow().registry.get(name)
    }

    pub fn attributes(&self) -> Vec<Attribute> {
        self.inner.borrow().attributes.clone()
    }

    /// Name of the frame scheduler back end driving this animation
    pub fn scheduler_name(&self) -> &'static str {
        self.inner.borrow().scheduler.name()
    }

    pub(crate) fn target(&self) -> Option<SurfaceHandle> {
        self.inner.borrow().target.clone()
    }

    pub(crate) fn scheduler(&self) -> SchedulerRef {
        self.inner.borrow().scheduler.clone()
    }

    /// Wrap the completion callback so `next` runs after it
    pub(crate) fn chain_on_complete<F>(&self, next: F)
    where
        F: Fn() + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let original = inner.on_complete.take();
        inner.on_complete = Some(Rc::new(move || {
            if let Some(original) = &original {
                original();
            }
            next();
        }));
    }

    // ========================================================================
    // Frame driving
    // ========================================================================

    fn start_cycle(&self) {
        self.inner.borrow_mut().state.start_timestamp = None;
        self.schedule_frame();
    }

    fn schedule_frame(&self) {
        let scheduler = {
            let mut inner = self.inner.borrow_mut();
            inner.cancel_frame();
            inner.scheduler.clone()
        };
        let this = self.clone();
        let handle = scheduler.request_frame(Box::new(move |now| this.advance(now)));
        self.inner.borrow_mut().frame = Some(handle);
    }

    fn advance(&self, now: Duration) {
        let mut writes = FrameWrites::new();

        let (target, progress, step) = {
            let mut inner = self.inner.borrow_mut();
            inner.frame = None;
            if !inner.state.is_running {
                return;
            }

            let start = *inner.state.start_timestamp.get_or_insert(now);
            let progress = if inner.duration_ms == 0 {
                1.0
            } else {
                let elapsed_ms = now.saturating_sub(start).as_nanos() as f64 / 1_000_000.0;
                (elapsed_ms / f64::from(inner.duration_ms) + inner.state.current_progress).min(1.0)
            };
            inner.last_progress = progress;
            inner.apply_frame(progress, &mut writes);

            let step = if inner.state.is_paused {
                inner.state.current_progress = progress;
                inner.state.is_running = false;
                inner.playback = PlaybackState::Paused;
                tracing::debug!("Animation: paused at progress {:.3}", progress);
                FrameStep::Paused
            } else if progress >= 1.0 || inner.state.is_stopping {
                FrameStep::CycleDone
            } else {
                FrameStep::Continue(inner.on_frame.clone())
            };
            (inner.target.clone(), progress, step)
        };

        if let Some(target) = target {
            for (property, value) in &writes {
                target.set_property(property, value);
            }
        }

        match step {
            FrameStep::Paused => {}
            FrameStep::CycleDone => self.complete_cycle(),
            FrameStep::Continue(on_frame) => {
                if let Some(on_frame) = on_frame {
                    on_frame(progress);
                }
                let reschedule = {
                    let inner = self.inner.borrow();
                    inner.state.is_running && inner.frame.is_none()
                };
                if reschedule {
                    self.schedule_frame();
                }
            }
        }
    }

    fn complete_cycle(&self) {
        let outcome = {
            let mut inner = self.inner.borrow_mut();
            let count = inner.attributes.len();

            if inner.state.is_sequential && inner.state.current_attribute_index + 1 < count {
                inner.state.current_attribute_index += 1;
                inner.state.current_progress = 0.0;
                inner.last_progress = 0.0;
                tracing::trace!(
                    "Animation: sequential step to attribute {}",
                    inner.state.current_attribute_index
                );
                CycleOutcome::Restart
            } else {
                inner.cancel_frame();
                inner.state.current_attribute_index = 0;
                inner.state.current_progress = 0.0;
                if inner.state.is_alternate {
                    inner.state.is_alternate_reversed = !inner.state.is_alternate_reversed;
                }

                if inner.state.loop_count == INFINITE_LOOP {
                    inner.last_progress = 0.0;
                    CycleOutcome::Restart
                } else {
                    inner.state.current_loop += 1;
                    if inner.state.current_loop < inner.state.loop_count {
                        inner.last_progress = 0.0;
                        tracing::debug!(
                            "Animation: loop {}/{}",
                            inner.state.current_loop + 1,
                            inner.state.loop_count
                        );
                        CycleOutcome::Restart
                    } else {
                        inner.state.is_running = false;
                        inner.playback = PlaybackState::Completed;
                        tracing::debug!(
                            "Animation: completed after {} cycles",
                            inner.state.current_loop
                        );
                        CycleOutcome::Complete(
                            inner.on_complete.clone(),
                            std::mem::take(&mut inner.completion_waiters),
                        )
                    }
                }
            }
        };

        match outcome {
            CycleOutcome::Restart => self.start_cycle(),
            CycleOutcome::Complete(on_complete, waiters) => {
                if let Some(on_complete) = on_complete {
                    on_complete();
                }
                for waiter in waiters {
                    let _ = waiter.send(());
                }
            }
        }
    }
}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("Animation")
                .field("playback", &inner.playback)
                .field("duration_ms", &inner.duration_ms)
                .field("attributes", &inner.attributes.len())
                .field("progress", &inner.last_progress)
                .field("state", &inner.state)
                .finish(),
            Err(_) => f.write_str("Animation { <borrowed> }"),
        }
    }
}
