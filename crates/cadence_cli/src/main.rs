//! Cadence CLI
//!
//! Preview animations headless and inspect easing curves.

use anyhow::{Context, Result};
use cadence_animation::{CubicBezier, Effect, PresetRegistry, BUILTIN_PRESETS};
use cadence_core::{PropertyWrite, RecordingSurface, SurfaceHandle};
use cadence_platform::{Backend, HostCapabilities, SchedulerRef, TimerScheduler, VsyncScheduler};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

use config::AnimationDocument;

#[derive(Parser)]
#[command(name = "cadence")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Cadence animation engine CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate an animation document and print every property write
    Preview {
        /// Animation document (TOML)
        file: PathBuf,

        /// Simulated display refresh rate
        #[arg(long, default_value = "60")]
        fps: u32,

        /// Stop after this many frames (infinite loops never finish on their own)
        #[arg(long, default_value = "600")]
        frames: u32,

        /// Frame back end (vsync, timer, native); picked from the host when omitted
        #[arg(short, long)]
        backend: Option<String>,
    },

    /// Print an easing curve sampled over [0, 1]
    Ease {
        /// Preset name or four comma-separated control points
        curve: String,

        /// Number of intervals to sample
        #[arg(short, long, default_value = "10")]
        samples: u32,
    },

    /// List the built-in easing presets
    Presets,

    /// List the effect presets
    Effects,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Preview {
            file,
            fps,
            frames,
            backend,
        } => cmd_preview(&file, fps, frames, backend.as_deref()),

        Commands::Ease { curve, samples } => cmd_ease(&curve, samples),

        Commands::Presets => cmd_presets(),

        Commands::Effects => cmd_effects(),
    }
}

// =============================================================================
// Frame drivers
// =============================================================================

/// The scheduler a preview runs on, plus the loop that pumps it
enum FrameDriver {
    Vsync {
        scheduler: Rc<VsyncScheduler>,
        interval: Duration,
        frame: u32,
    },
    Timer(Rc<TimerScheduler>),
}

impl FrameDriver {
    fn new(backend: Backend, fps: u32) -> Result<Self> {
        let fps = fps.max(1);
        match backend {
            Backend::DisplaySync => Ok(FrameDriver::Vsync {
                scheduler: Rc::new(VsyncScheduler::new()),
                interval: Duration::from_secs_f64(1.0 / f64::from(fps)),
                frame: 0,
            }),
            Backend::Timer => Ok(FrameDriver::Timer(Rc::new(TimerScheduler::from_fps(fps)))),
            Backend::NativeClock => {
                anyhow::bail!("The native frame clock needs a host application")
            }
        }
    }

    fn scheduler(&self) -> SchedulerRef {
        match self {
            FrameDriver::Vsync { scheduler, .. } => scheduler.clone(),
            FrameDriver::Timer(scheduler) => scheduler.clone(),
        }
    }

    /// Run the next frame, returning its timestamp, or `None` once idle
    fn pump(&mut self) -> Option<Duration> {
        match self {
            FrameDriver::Vsync {
                scheduler,
                interval,
                frame,
            } => {
                if !scheduler.has_pending() {
                    return None;
                }
                let now = *interval * *frame;
                scheduler.dispatch_frame(now);
                *frame += 1;
                Some(now)
            }
            FrameDriver::Timer(scheduler) => {
                let deadline = scheduler.next_deadline()?;
                scheduler.advance_to(deadline);
                Some(deadline)
            }
        }
    }
}

/// The CLI pumps its own display loop, so display sync is always available
fn preview_backend(requested: Option<&str>) -> Result<Backend> {
    let caps = HostCapabilities::headless().with_display_sync(true);
    match requested {
        Some(name) => {
            let backend: Backend = name.parse()?;
            Ok(backend.require(caps)?)
        }
        None => Ok(Backend::select(caps)),
    }
}

// =============================================================================
// Commands
// =============================================================================

fn cmd_preview(file: &Path, fps: u32, max_frames: u32, backend: Option<&str>) -> Result<()> {
    let document = AnimationDocument::load(file)?;
    let backend = preview_backend(backend)?;
    let mut driver = FrameDriver::new(backend, fps)?;

    let surface = RecordingSurface::shared();
    let animation = document.build(Some(surface.clone() as SurfaceHandle), driver.scheduler())?;

    info!(
        "Previewing {} ({} attributes, {}ms, {} at {} fps)",
        file.display(),
        animation.attribute_count(),
        animation.duration_ms(),
        backend,
        fps
    );

    animation.play();
    let mut frames = 0;
    while frames < max_frames {
        let Some(now) = driver.pump() else {
            break;
        };
        frames += 1;
        for write in surface.take_writes() {
            if let PropertyWrite::Set { name, value } = write {
                println!("{:>9.2}ms  {:<18} {}", now.as_secs_f64() * 1000.0, name, value);
            }
        }
    }

    if animation.is_animating() {
        animation.stop();
        info!("Stopped after {} frames", frames);
    } else {
        info!("Finished after {} frames ({:?})", frames, animation.state());
    }
    Ok(())
}

fn cmd_ease(curve: &str, samples: u32) -> Result<()> {
    let bezier = parse_curve(curve)?;
    let [x1, y1, x2, y2] = bezier.control_points();
    println!("cubic-bezier({}, {}, {}, {})", x1, y1, x2, y2);
    println!();

    let samples = samples.max(1);
    for i in 0..=samples {
        let x = f64::from(i) / f64::from(samples);
        let y = bezier.solve(x);
        println!("{:.3}  {:>8.4}  {}", x, y, bar(y, 40));
    }
    Ok(())
}

fn cmd_presets() -> Result<()> {
    println!("Easing presets");
    println!("==============");
    for (name, [x1, y1, x2, y2]) in BUILTIN_PRESETS {
        println!("  {:<20} [{}, {}, {}, {}]", name, x1, y1, x2, y2);
    }
    Ok(())
}

fn cmd_effects() -> Result<()> {
    println!("Effects");
    println!("=======");
    for effect in Effect::ALL {
        println!("  {:<16} {}ms", effect.name(), effect.default_duration_ms());
    }
    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

/// Resolve a preset name or an `x1,y1,x2,y2` list
fn parse_curve(curve: &str) -> Result<CubicBezier> {
    if curve.contains(',') {
        let points = curve
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<f64>()
                    .with_context(|| format!("Invalid control point '{}'", part.trim()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(CubicBezier::from_slice(&points)?)
    } else {
        Ok(PresetRegistry::new().resolve(curve.trim())?)
    }
}

/// Horizontal bar for a value, clamped to [-0.5, 1.5]
fn bar(value: f64, width: usize) -> String {
    let cells = ((value.clamp(-0.5, 1.5) + 0.5) / 2.0 * width as f64).round() as usize;
    let origin = width / 4;
    let mut line = vec![' '; width + 1];
    let (lo, hi) = if cells < origin {
        (cells, origin)
    } else {
        (origin, cells)
    };
    for cell in &mut line[lo..=hi.min(width)] {
        *cell = '#';
    }
    line[origin] = '|';
    line.into_iter().collect::<String>().trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_curve_by_name() {
        let curve = parse_curve("ease-in").unwrap();
        assert_eq!(curve.control_points(), [0.42, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_parse_curve_from_points() {
        let curve = parse_curve("0.1, 0.2, 0.3, 0.4").unwrap();
        assert_eq!(curve.control_points(), [0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn test_parse_curve_errors() {
        assert!(parse_curve("nope").is_err());
        assert!(parse_curve("0.1,0.2,0.3").is_err());
        assert!(parse_curve("2,0,1,1").is_err());
        assert!(parse_curve("a,b,c,d").is_err());
    }

    #[test]
    fn test_preview_backend_selection() {
        assert_eq!(preview_backend(None).unwrap(), Backend::DisplaySync);
        assert_eq!(preview_backend(Some("timer")).unwrap(), Backend::Timer);
        assert!(preview_backend(Some("native")).is_err());
        assert!(preview_backend(Some("quantum")).is_err());
    }

    #[test]
    fn test_frame_driver_runs_until_idle() {
        for backend in [Backend::DisplaySync, Backend::Timer] {
            let mut driver = FrameDriver::new(backend, 50).unwrap();
            let anim = cadence_animation::Animation::new(
                None,
                driver.scheduler(),
                Default::default(),
            )
            .set_duration(100)
            .opacity("0", "1");
            anim.play();

            let mut frames = 0;
            while driver.pump().is_some() {
                frames += 1;
                assert!(frames < 100);
            }
            assert_eq!(anim.state(), cadence_animation::PlaybackState::Completed);
        }
    }

    #[test]
    fn test_bar_marks_origin() {
        assert_eq!(bar(0.0, 40), " ".repeat(10) + "|");
        assert!(bar(1.0, 40).ends_with('#'));
        assert_eq!(bar(1.0, 40).len(), 31);
    }
}
