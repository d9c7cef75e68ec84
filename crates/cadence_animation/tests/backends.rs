//! Animations driven by each frame scheduler back end

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use cadence_animation::{Animation, Effect, PlaybackState, Sequence};
use cadence_core::{RecordingSurface, SurfaceHandle};
use cadence_platform::{
    Backend, FrameScheduler, HostCapabilities, NativeFrameClock, NativeFrameScheduler,
    SchedulerRef, TimerScheduler, VsyncScheduler,
};

#[derive(Default)]
struct CountingClock {
    posts: Cell<usize>,
    removals: Cell<usize>,
}

impl NativeFrameClock for CountingClock {
    fn post_frame_callback(&self) {
        self.posts.set(self.posts.get() + 1);
    }

    fn remove_frame_callback(&self) {
        self.removals.set(self.removals.get() + 1);
    }
}

#[test]
fn test_timer_scheduler_drives_animation() {
    let scheduler = Rc::new(TimerScheduler::from_fps(60));
    let surface = RecordingSurface::shared();
    let completed = Rc::new(Cell::new(false));
    let c = completed.clone();
    let anim = Animation::with_target(surface.clone(), scheduler.clone())
        .set_duration(200)
        .opacity("0", "1")
        .on_complete(move || c.set(true));

    assert_eq!(anim.scheduler_name(), "timer");
    anim.play();
    assert_eq!(scheduler.pending_count(), 1);

    scheduler.advance_by(Duration::from_millis(100));
    assert!(!completed.get());
    assert!(anim.progress() > 0.3 && anim.progress() < 0.6);

    scheduler.advance_by(Duration::from_millis(500));
    assert!(completed.get());
    assert_eq!(surface.get("opacity").as_deref(), Some("1.00"));
    assert_eq!(scheduler.next_deadline(), None);
}

#[test]
fn test_timer_scheduler_stop_cancels_pending_timer() {
    let scheduler = Rc::new(TimerScheduler::new());
    let anim = Animation::new(None, scheduler.clone(), Default::default())
        .set_duration(1000)
        .opacity("0", "1");
    anim.play();
    scheduler.advance_by(Duration::from_millis(100));
    assert!(scheduler.next_deadline().is_some());

    anim.stop();
    assert_eq!(scheduler.pending_count(), 0);
    assert_eq!(scheduler.advance_by(Duration::from_secs(1)), 0);
}

#[test]
fn test_native_scheduler_drives_animation() {
    let scheduler = Rc::new(NativeFrameScheduler::new(CountingClock::default()));
    let surface = RecordingSurface::shared();
    let anim = Animation::with_target(surface.clone(), scheduler.clone())
        .set_duration(100)
        .scale("1", "2");
    anim.play();
    assert!(scheduler.is_posted());

    let mut frame_time: i64 = 1_000_000_000;
    let mut frames = 0;
    while scheduler.is_posted() && frames < 100 {
        scheduler.do_frame(frame_time);
        frame_time += 16_666_667;
        frames += 1;
    }

    assert_eq!(anim.state(), PlaybackState::Completed);
    assert_eq!(surface.get("transform").as_deref(), Some("scale(2.00)"));
    // One post per frame, never more than one outstanding
    assert_eq!(scheduler.clock().posts.get(), frames);
    assert_eq!(scheduler.clock().removals.get(), 0);
}

#[test]
fn test_native_scheduler_stop_removes_callback() {
    let scheduler = Rc::new(NativeFrameScheduler::new(CountingClock::default()));
    let anim = Animation::new(None, scheduler.clone(), Default::default()).opacity("0", "1");
    anim.play();
    scheduler.do_frame(0);
    assert!(scheduler.is_posted());

    anim.stop();
    assert!(!scheduler.is_posted());
    assert_eq!(scheduler.clock().removals.get(), 1);
}

#[test]
fn test_selected_backend_builds_scheduler() {
    fn scheduler_for(backend: Backend) -> SchedulerRef {
        match backend {
            Backend::DisplaySync => Rc::new(VsyncScheduler::new()),
            _ => Rc::new(TimerScheduler::new()),
        }
    }

    let headless = Backend::select(HostCapabilities::headless());
    assert_eq!(headless, Backend::Timer);
    assert_eq!(scheduler_for(headless).name(), "timer");

    let synced = Backend::select(HostCapabilities::headless().with_display_sync(true));
    assert_eq!(scheduler_for(synced).name(), "vsync");

    assert!(Backend::NativeClock
        .require(HostCapabilities::headless())
        .is_err());
}

#[test]
fn test_effect_sequence_on_timer() {
    let scheduler = Rc::new(TimerScheduler::with_interval(Duration::from_millis(10)));
    let surface = RecordingSurface::shared();
    let sequence = Sequence::new(Some(surface.clone() as SurfaceHandle), scheduler.clone())
        .then(|a: Animation| Effect::FadeIn.apply_with_duration(a, 100))
        .then(|a: Animation| Effect::ZoomOut.apply_with_duration(a, 100));
    sequence.play();

    scheduler.advance_by(Duration::from_secs(2));
    assert!(sequence.is_finished());
    assert_eq!(sequence.phases_started(), 2);
    assert_eq!(surface.get("opacity").as_deref(), Some("0.00"));
}
