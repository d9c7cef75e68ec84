//! Multi-phase animation sequences
//!
//! A [`Sequence`] holds an ordered list of phases. Each phase configures a
//! fresh [`Animation`] on the shared target; when one phase completes (after
//! its own completion callback has run) the next one is built and played.
//!
//! ```rust
//! use cadence_animation::{Animation, Sequence};
//! use cadence_core::{RecordingSurface, SurfaceHandle};
//! use cadence_platform::VsyncScheduler;
//! use std::rc::Rc;
//! use std::time::Duration;
//!
//! let scheduler = Rc::new(VsyncScheduler::new());
//! let surface = RecordingSurface::shared();
//!
//! let sequence = Sequence::new(Some(surface.clone() as SurfaceHandle), scheduler.clone())
//!     .then(|a: Animation| a.fade_in(100))
//!     .then(|a: Animation| a.scale("1", "2").set_duration(100));
//! sequence.play();
//!
//! let mut now = 0;
//! while scheduler.has_pending() {
//!     scheduler.dispatch_frame(Duration::from_millis(now));
//!     now += 10;
//! }
//! assert!(sequence.is_finished());
//! assert_eq!(surface.get("transform").as_deref(), Some("scale(2.00)"));
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use cadence_core::SurfaceHandle;
use cadence_platform::{FrameScheduler, SchedulerRef};

use crate::engine::{Animation, CompleteCallback};
use crate::options::AnimationOptions;

/// Configures one phase of a sequence
pub type PhaseFn = Box<dyn FnOnce(Animation) -> Animation>;

enum NextStep {
    Phase(PhaseFn, Option<SurfaceHandle>, SchedulerRef),
    Finished(Option<CompleteCallback>),
}

struct SequenceInner {
    target: Option<SurfaceHandle>,
    scheduler: SchedulerRef,
    phases: VecDeque<PhaseFn>,
    current: Option<Animation>,
    started: usize,
    total: usize,
    finished: bool,
    on_complete: Option<CompleteCallback>,
}

/// Coordinator playing animation phases one after another
#[derive(Clone)]
pub struct Sequence {
    inner: Rc<RefCell<SequenceInner>>,
}

impl Sequence {
    pub fn new(target: Option<SurfaceHandle>, scheduler: SchedulerRef) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SequenceInner {
                target,
                scheduler,
                phases: VecDeque::new(),
                current: None,
                started: 0,
                total: 0,
                finished: false,
                on_complete: None,
            })),
        }
    }

    /// Build a sequence from boxed phases
    pub fn from_phases(
        target: Option<SurfaceHandle>,
        scheduler: SchedulerRef,
        phases: Vec<PhaseFn>,
    ) -> Self {
        let sequence = Self::new(target, scheduler);
        {
            let mut inner = sequence.inner.borrow_mut();
            inner.total = phases.len();
            inner.phases.extend(phases);
        }
        sequence
    }

    /// Append a phase
    pub fn then<F>(self, phase: F) -> Self
    where
        F: FnOnce(Animation) -> Animation + 'static,
    {
        {
            let mut inner = self.inner.borrow_mut();
            inner.phases.push_back(Box::new(phase));
            inner.total += 1;
        }
        self
    }

    /// Called once after the last phase completes
    pub fn on_complete<F>(self, callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.inner.borrow_mut().on_complete = Some(Rc::new(callback));
        self
    }

    /// Start the first phase
    ///
    /// No-op once the sequence has started.
    pub fn play(&self) -> &Self {
        let idle = {
            let inner = self.inner.borrow();
            inner.started == 0 && !inner.finished
        };
        if idle {
            tracing::debug!("Sequence: play ({} phases)", self.phase_count());
            self.start_next();
        }
        self
    }

    /// Stop the running phase and drop the remaining ones
    pub fn stop(&self) -> &Self {
        let (current, dropped) = {
            let mut inner = self.inner.borrow_mut();
            inner.finished = true;
            let dropped = std::mem::take(&mut inner.phases);
            (inner.current.take(), dropped)
        };
        if let Some(current) = current {
            current.stop();
        }
        tracing::debug!("Sequence: stopped, {} phases skipped", dropped.len());
        self
    }

    /// The animation of the phase currently playing
    pub fn current(&self) -> Option<Animation> {
        self.inner.borrow().current.clone()
    }

    /// Number of phases started so far
    pub fn phases_started(&self) -> usize {
        self.inner.borrow().started
    }

    pub fn phase_count(&self) -> usize {
        self.inner.borrow().total
    }

    /// Whether the last phase completed or the sequence was stopped
    pub fn is_finished(&self) -> bool {
        self.inner.borrow().finished
    }

    fn start_next(&self) {
        let next = {
            let mut inner = self.inner.borrow_mut();
            if inner.finished {
                return;
            }
            match inner.phases.pop_front() {
                Some(phase) => {
                    inner.started += 1;
                    NextStep::Phase(phase, inner.target.clone(), inner.scheduler.clone())
                }
                None => {
                    inner.finished = true;
                    inner.current = None;
                    NextStep::Finished(inner.on_complete.take())
                }
            }
        };

        match next {
            NextStep::Phase(phase, target, scheduler) => {
                tracing::trace!(
                    "Sequence: phase {} on {}",
                    self.phases_started(),
                    scheduler.name()
                );
                let animation = phase(Animation::new(target, scheduler, AnimationOptions::default()));
                // The phase's own completion callback runs before the next phase starts
                let sequence = self.clone();
                animation.chain_on_complete(move || sequence.start_next());
                self.inner.borrow_mut().current = Some(animation.clone());
                animation.play();
            }
            NextStep::Finished(on_complete) => {
                tracing::debug!("Sequence: finished");
                if let Some(on_complete) = on_complete {
                    on_complete();
                }
            }
        }
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("Sequence")
                .field("started", &inner.started)
                .field("total", &inner.total)
                .field("finished", &inner.finished)
                .finish(),
            Err(_) => f.write_str("Sequence { <borrowed> }"),
        }
    }
}

impl Animation {
    /// Chain phases on this animation's target and scheduler
    ///
    /// Each phase receives a fresh animation; this one is left untouched.
    pub fn sequence(&self, phases: Vec<PhaseFn>) -> Sequence {
        Sequence::from_phases(self.target(), self.scheduler(), phases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::RecordingSurface;
    use cadence_platform::VsyncScheduler;
    use std::cell::Cell;
    use std::time::Duration;

    fn drain(scheduler: &VsyncScheduler, step_ms: u64) {
        let mut now = 0;
        for _ in 0..1000 {
            if !scheduler.has_pending() {
                break;
            }
            scheduler.dispatch_frame(Duration::from_millis(now));
            now += step_ms;
        }
    }

    #[test]
    fn test_phases_run_in_order() {
        let scheduler = Rc::new(VsyncScheduler::new());
        let surface = RecordingSurface::shared();
        let log = Rc::new(RefCell::new(Vec::new()));

        let (a, b, done) = (log.clone(), log.clone(), log.clone());
        let sequence = Sequence::new(Some(surface.clone() as SurfaceHandle), scheduler.clone())
            .then(move |anim: Animation| {
                anim.set_duration(50)
                    .opacity("0", "1")
                    .on_complete(move || a.borrow_mut().push("first"))
            })
            .then(move |anim: Animation| {
                anim.set_duration(50)
                    .add_attribute("width", "0", "10")
                    .on_complete(move || b.borrow_mut().push("second"))
            })
            .on_complete(move || done.borrow_mut().push("done"));

        assert_eq!(sequence.phase_count(), 2);
        sequence.play();
        drain(&scheduler, 10);

        assert_eq!(*log.borrow(), vec!["first", "second", "done"]);
        assert!(sequence.is_finished());
        assert_eq!(sequence.phases_started(), 2);
        assert!(sequence.current().is_none());

        // width only starts once opacity is done
        let writes = surface.writes();
        let last_opacity = writes.iter().rposition(|w| w.name() == "opacity").unwrap();
        let first_width = writes.iter().position(|w| w.name() == "width").unwrap();
        assert!(last_opacity < first_width);
    }

    #[test]
    fn test_stop_skips_remaining() {
        let scheduler = Rc::new(VsyncScheduler::new());
        let second = Rc::new(Cell::new(false));
        let s = second.clone();
        let sequence = Sequence::new(None, scheduler.clone())
            .then(|anim: Animation| anim.set_duration(100).opacity("0", "1"))
            .then(move |anim: Animation| {
                s.set(true);
                anim
            });
        sequence.play();
        scheduler.dispatch_frame(Duration::ZERO);

        sequence.stop();
        drain(&scheduler, 10);
        assert!(!second.get());
        assert!(sequence.is_finished());
    }

    #[test]
    fn test_empty_sequence_completes_immediately() {
        let scheduler = Rc::new(VsyncScheduler::new());
        let done = Rc::new(Cell::new(false));
        let d = done.clone();
        let sequence = Sequence::new(None, scheduler).on_complete(move || d.set(true));
        sequence.play();
        assert!(done.get());
        assert!(sequence.is_finished());
    }

    #[test]
    fn test_animation_sequence_shares_target() {
        let scheduler = Rc::new(VsyncScheduler::new());
        let surface = RecordingSurface::shared();
        let anim = Animation::with_target(surface.clone(), scheduler.clone());

        let sequence = anim.sequence(vec![
            Box::new(|a: Animation| a.set_duration(20).opacity("0", "1")) as PhaseFn,
            Box::new(|a: Animation| a.set_duration(20).opacity("1", "0.5")) as PhaseFn,
        ]);
        sequence.play();
        drain(&scheduler, 10);

        assert_eq!(surface.get("opacity").as_deref(), Some("0.50"));
        assert_eq!(anim.state(), crate::PlaybackState::Idle);
    }
}
