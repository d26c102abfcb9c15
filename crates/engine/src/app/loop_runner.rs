use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::app::metrics::{MetricsAccumulator, MetricsHandle};

/// Loop tuning knobs. Defaults match the shipped game: 60 simulation
/// ticks per second, at most five catch-up ticks per frame, and frame
/// deltas clamped to 250ms so a debugger pause or laptop sleep does not
/// trigger a catch-up spiral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(1),
        }
    }
}

/// What one call to [`FixedTimestep::advance`] decided: how many fixed
/// ticks to run now, and how much backlog (if any) was discarded to stay
/// under the per-frame tick cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepPlan {
    pub ticks_to_run: u32,
    pub dropped_backlog: Duration,
}

/// Fixed-timestep accumulator. Wall-clock time is folded into an
/// accumulator and drained in whole `fixed_dt` steps, so simulation code
/// always sees the same dt regardless of host frame rate.
#[derive(Debug)]
pub struct FixedTimestep {
    fixed_dt: Duration,
    accumulator: Duration,
    max_frame_delta: Duration,
    max_ticks_per_frame: u32,
    paused: bool,
    last_instant: Option<Instant>,
}

impl FixedTimestep {
    pub fn new(config: &LoopConfig) -> Self {
        let target_tps = config.target_tps.max(1);
        let fixed_dt = Duration::from_secs_f64(1.0 / f64::from(target_tps));
        Self {
            fixed_dt,
            accumulator: Duration::ZERO,
            max_frame_delta: config.max_frame_delta.max(fixed_dt),
            max_ticks_per_frame: config.max_ticks_per_frame.max(1),
            paused: false,
            last_instant: None,
        }
    }

    pub fn fixed_dt(&self) -> Duration {
        self.fixed_dt
    }

    pub fn fixed_dt_seconds(&self) -> f32 {
        self.fixed_dt.as_secs_f32()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Freezes the simulation clock. The accumulator is preserved so a
    /// partially-elapsed tick resumes where it left off.
    pub fn pause(&mut self) {
        self.paused = true;
        self.last_instant = None;
    }

    /// Unfreezes the clock. The reference instant is reset, so time spent
    /// paused never becomes catch-up ticks.
    pub fn resume(&mut self) {
        self.paused = false;
        self.last_instant = None;
    }

    /// Advances the clock to `now` and plans the ticks for this frame.
    /// While paused this returns an empty plan and does not accumulate.
    pub fn advance(&mut self, now: Instant) -> StepPlan {
        if self.paused {
            return StepPlan {
                ticks_to_run: 0,
                dropped_backlog: Duration::ZERO,
            };
        }

        let frame_delta = match self.last_instant {
            Some(previous) => now.saturating_duration_since(previous),
            None => Duration::ZERO,
        };
        self.last_instant = Some(now);

        let frame_delta = frame_delta.min(self.max_frame_delta);
        self.accumulator = self.accumulator.saturating_add(frame_delta);

        let mut ticks_to_run = 0u32;
        while self.accumulator >= self.fixed_dt && ticks_to_run < self.max_ticks_per_frame {
            self.accumulator -= self.fixed_dt;
            ticks_to_run += 1;
        }

        let mut dropped_backlog = Duration::ZERO;
        if ticks_to_run == self.max_ticks_per_frame && self.accumulator >= self.fixed_dt {
            dropped_backlog = self.accumulator;
            self.accumulator = Duration::ZERO;
        }

        StepPlan {
            ticks_to_run,
            dropped_backlog,
        }
    }
}

/// Returned by the tick callback each fixed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// Headless simulation driver: plans ticks off a wall clock, runs the
/// tick callback with the fixed dt, publishes loop metrics, and sleeps
/// away the slack. Returns when the callback asks to stop.
pub fn run_simulation<F>(config: &LoopConfig, metrics: MetricsHandle, mut tick: F)
where
    F: FnMut(f32) -> LoopControl,
{
    let mut timestep = FixedTimestep::new(config);
    let mut accumulator = MetricsAccumulator::new(config.metrics_log_interval);
    let fixed_dt = timestep.fixed_dt();
    let dt_seconds = timestep.fixed_dt_seconds();

    'frames: loop {
        let frame_start = Instant::now();
        let plan = timestep.advance(frame_start);

        if plan.dropped_backlog > Duration::ZERO {
            accumulator.record_dropped_backlog(plan.dropped_backlog);
            warn!(
                dropped_backlog_ms = plan.dropped_backlog.as_secs_f32() * 1000.0,
                "sim_clamp_triggered"
            );
        }

        for _ in 0..plan.ticks_to_run {
            let tick_start = Instant::now();
            let control = tick(dt_seconds);
            accumulator.record_tick(tick_start.elapsed());
            if control == LoopControl::Stop {
                break 'frames;
            }
        }

        if let Some(snapshot) = accumulator.maybe_snapshot(Instant::now()) {
            metrics.publish(snapshot);
            info!(
                tps = snapshot.tps,
                tick_time_ms = snapshot.tick_time_ms,
                dropped_backlog_ms = snapshot.dropped_backlog_ms,
                "loop_metrics"
            );
        }

        let elapsed = frame_start.elapsed();
        if elapsed < fixed_dt {
            thread::sleep(fixed_dt - elapsed);
        }
    }

    info!("simulation_stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timestep_60hz() -> FixedTimestep {
        FixedTimestep::new(&LoopConfig::default())
    }

    #[test]
    fn first_advance_runs_no_ticks() {
        let mut timestep = timestep_60hz();
        let plan = timestep.advance(Instant::now());
        assert_eq!(plan.ticks_to_run, 0);
        assert_eq!(plan.dropped_backlog, Duration::ZERO);
    }

    #[test]
    fn exact_fixed_dt_yields_one_tick() {
        let mut timestep = timestep_60hz();
        let base = Instant::now();
        timestep.advance(base);
        let plan = timestep.advance(base + timestep.fixed_dt());
        assert_eq!(plan.ticks_to_run, 1);
    }

    #[test]
    fn slow_frame_yields_multiple_ticks() {
        let mut timestep = timestep_60hz();
        let base = Instant::now();
        timestep.advance(base);
        let plan = timestep.advance(base + timestep.fixed_dt() * 3);
        assert_eq!(plan.ticks_to_run, 3);
    }

    #[test]
    fn sub_dt_frames_accumulate_into_a_tick() {
        let mut timestep = timestep_60hz();
        let base = Instant::now();
        timestep.advance(base);
        let half = timestep.fixed_dt() / 2;
        assert_eq!(timestep.advance(base + half).ticks_to_run, 0);
        assert_eq!(timestep.advance(base + half * 2).ticks_to_run, 1);
    }

    #[test]
    fn huge_stall_is_clamped_and_backlog_dropped() {
        let config = LoopConfig::default();
        let mut timestep = FixedTimestep::new(&config);
        let base = Instant::now();
        timestep.advance(base);

        let plan = timestep.advance(base + Duration::from_secs(10));
        assert_eq!(plan.ticks_to_run, config.max_ticks_per_frame);
        // 250ms clamp minus five 1/60s ticks leaves a dropped backlog.
        assert!(plan.dropped_backlog > Duration::ZERO);

        // The next normal frame is back to a single tick.
        let plan = timestep.advance(base + Duration::from_secs(10) + timestep.fixed_dt());
        assert_eq!(plan.ticks_to_run, 1);
        assert_eq!(plan.dropped_backlog, Duration::ZERO);
    }

    #[test]
    fn backlog_under_cap_is_kept_not_dropped() {
        let mut timestep = timestep_60hz();
        let base = Instant::now();
        timestep.advance(base);
        // 2.5 ticks of time: run 2, keep the half tick.
        let plan = timestep.advance(base + timestep.fixed_dt() * 5 / 2);
        assert_eq!(plan.ticks_to_run, 2);
        assert_eq!(plan.dropped_backlog, Duration::ZERO);
        let plan = timestep.advance(base + timestep.fixed_dt() * 3);
        assert_eq!(plan.ticks_to_run, 1);
    }

    #[test]
    fn paused_clock_plans_nothing() {
        let mut timestep = timestep_60hz();
        let base = Instant::now();
        timestep.advance(base);
        timestep.pause();
        assert!(timestep.is_paused());
        let plan = timestep.advance(base + Duration::from_secs(2));
        assert_eq!(plan.ticks_to_run, 0);
    }

    #[test]
    fn resume_does_not_replay_paused_time() {
        let mut timestep = timestep_60hz();
        let base = Instant::now();
        timestep.advance(base);
        timestep.pause();
        timestep.resume();

        // First advance after resume only re-anchors the clock.
        let after_pause = base + Duration::from_secs(30);
        assert_eq!(timestep.advance(after_pause).ticks_to_run, 0);
        let plan = timestep.advance(after_pause + timestep.fixed_dt());
        assert_eq!(plan.ticks_to_run, 1);
        assert_eq!(plan.dropped_backlog, Duration::ZERO);
    }

    #[test]
    fn pause_preserves_partial_accumulator() {
        let mut timestep = timestep_60hz();
        let base = Instant::now();
        timestep.advance(base);
        let half = timestep.fixed_dt() / 2;
        timestep.advance(base + half);
        timestep.pause();
        timestep.resume();

        let resumed = base + Duration::from_secs(5);
        timestep.advance(resumed);
        // The half tick banked before the pause plus another half completes one tick.
        let plan = timestep.advance(resumed + half);
        assert_eq!(plan.ticks_to_run, 1);
    }

    #[test]
    fn zero_tps_config_is_normalized() {
        let config = LoopConfig {
            target_tps: 0,
            ..LoopConfig::default()
        };
        let timestep = FixedTimestep::new(&config);
        assert_eq!(timestep.fixed_dt(), Duration::from_secs(1));
    }

    #[test]
    fn run_simulation_stops_when_callback_asks() {
        let config = LoopConfig {
            target_tps: 240,
            ..LoopConfig::default()
        };
        let metrics = MetricsHandle::default();
        let mut ticks = 0u32;
        run_simulation(&config, metrics, |dt| {
            assert!((dt - 1.0 / 240.0).abs() < 1e-6);
            ticks += 1;
            if ticks >= 3 {
                LoopControl::Stop
            } else {
                LoopControl::Continue
            }
        });
        assert_eq!(ticks, 3);
    }
}
