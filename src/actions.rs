// src/actions.rs - Turns the per-frame gesture stream into scroll actions and status messages
use crate::gesture::Gesture;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

pub const MSG_SCROLLING_UP: &str = "Scrolling up";
pub const MSG_SCROLLING_DOWN: &str = "Scrolling down";
pub const MSG_STOPPED: &str = "Stopped";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

impl ScrollDirection {
    /// Up moves toward the top of the page, so its delta is negative.
    pub fn signed(self, step: f32) -> f32 {
        match self {
            Self::Up => -step,
            Self::Down => step,
        }
    }

    fn message(self) -> &'static str {
        match self {
            Self::Up => MSG_SCROLLING_UP,
            Self::Down => MSG_SCROLLING_DOWN,
        }
    }
}

/// Whatever gets moved by one scroll step.
pub trait ScrollSurface: Send + Sync {
    fn scroll_by(&self, delta: f32);
}

#[derive(Debug, Clone, Copy)]
pub struct RepeatConfig {
    pub period: Duration,
    pub step: f32,
}

impl Default for RepeatConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(30),
            step: 25.0,
        }
    }
}

struct ActiveScroll {
    direction: ScrollDirection,
    task: JoinHandle<()>,
}

/// Owns the single repeating scroll task.
pub struct ScrollRepeater {
    runtime: Handle,
    surface: Arc<dyn ScrollSurface>,
    config: RepeatConfig,
    active: Option<ActiveScroll>,
}

impl ScrollRepeater {
    pub fn new(runtime: Handle, surface: Arc<dyn ScrollSurface>, config: RepeatConfig) -> Self {
        Self {
            runtime,
            surface,
            config,
            active: None,
        }
    }

    pub fn direction(&self) -> Option<ScrollDirection> {
        self.active.as_ref().map(|a| a.direction)
    }

    /// Starts repeating in `direction`. Re-starting the current direction is a
    /// no-op and returns false; any other running repetition is cancelled first.
    pub fn start(&mut self, direction: ScrollDirection) -> bool {
        if self.direction() == Some(direction) {
            return false;
        }
        self.stop();

        let surface = Arc::clone(&self.surface);
        let period = self.config.period;
        let delta = direction.signed(self.config.step);
        let first_tick = Instant::now() + period;
        let task = self.runtime.spawn(async move {
            let mut ticker = time::interval_at(first_tick, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                surface.scroll_by(delta);
            }
        });

        debug!("Scroll repetition started ({:?})", direction);
        self.active = Some(ActiveScroll { direction, task });
        true
    }

    /// Cancels the running repetition. Returns whether one was running.
    pub fn stop(&mut self) -> bool {
        match self.active.take() {
            Some(active) => {
                active.task.abort();
                debug!("Scroll repetition stopped ({:?})", active.direction);
                true
            }
            None => false,
        }
    }
}

impl Drop for ScrollRepeater {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollState {
    Idle,
    Scrolling(ScrollDirection),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionOutcome {
    pub message: Option<String>,
}

impl ActionOutcome {
    fn none() -> Self {
        Self::default()
    }

    fn say(message: &str) -> Self {
        Self {
            message: Some(message.to_string()),
        }
    }
}

/// Maps gestures onto scroll start/stop. Messages are only produced on transitions.
pub struct ActionDispatcher {
    scroll: ScrollRepeater,
}

impl ActionDispatcher {
    pub fn new(runtime: Handle, surface: Arc<dyn ScrollSurface>) -> Self {
        Self::with_config(runtime, surface, RepeatConfig::default())
    }

    pub fn with_config(runtime: Handle, surface: Arc<dyn ScrollSurface>, config: RepeatConfig) -> Self {
        Self {
            scroll: ScrollRepeater::new(runtime, surface, config),
        }
    }

    pub fn state(&self) -> ScrollState {
        match self.scroll.direction() {
            Some(direction) => ScrollState::Scrolling(direction),
            None => ScrollState::Idle,
        }
    }

    pub fn handle(&mut self, gesture: Gesture) -> ActionOutcome {
        match gesture {
            Gesture::PointUp => self.scroll_toward(ScrollDirection::Up),
            Gesture::PointDown => self.scroll_toward(ScrollDirection::Down),
            Gesture::Fist | Gesture::None => {
                if self.stop() {
                    ActionOutcome::say(MSG_STOPPED)
                } else {
                    ActionOutcome::none()
                }
            }
        }
    }

    /// Forces the idle state. Returns whether a scroll was cancelled.
    pub fn stop(&mut self) -> bool {
        self.scroll.stop()
    }

    fn scroll_toward(&mut self, direction: ScrollDirection) -> ActionOutcome {
        if self.scroll.start(direction) {
            ActionOutcome::say(direction.message())
        } else {
            ActionOutcome::none()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSurface {
        deltas: Mutex<Vec<f32>>,
    }

    impl RecordingSurface {
        fn deltas(&self) -> Vec<f32> {
            self.deltas.lock().unwrap().clone()
        }
    }

    impl ScrollSurface for RecordingSurface {
        fn scroll_by(&self, delta: f32) {
            self.deltas.lock().unwrap().push(delta);
        }
    }

    fn dispatcher() -> (ActionDispatcher, Arc<RecordingSurface>) {
        let surface = Arc::new(RecordingSurface::default());
        let dispatcher = ActionDispatcher::new(Handle::current(), surface.clone());
        (dispatcher, surface)
    }

    fn messages(dispatcher: &mut ActionDispatcher, gestures: &[Gesture]) -> Vec<String> {
        gestures
            .iter()
            .filter_map(|g| dispatcher.handle(*g).message)
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeat_same_direction_emits_once() {
        let (mut dispatcher, _surface) = dispatcher();
        let msgs = messages(
            &mut dispatcher,
            &[Gesture::PointUp, Gesture::PointUp, Gesture::Fist],
        );
        assert_eq!(msgs, vec![MSG_SCROLLING_UP, MSG_STOPPED]);
        assert_eq!(dispatcher.state(), ScrollState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_none_is_silent() {
        let (mut dispatcher, surface) = dispatcher();
        let msgs = messages(&mut dispatcher, &[Gesture::None, Gesture::None, Gesture::Fist]);
        assert!(msgs.is_empty());

        time::sleep(Duration::from_millis(200)).await;
        assert!(surface.deltas().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_losing_the_hand_stops_once() {
        let (mut dispatcher, _surface) = dispatcher();
        let msgs = messages(
            &mut dispatcher,
            &[Gesture::PointDown, Gesture::None, Gesture::None],
        );
        assert_eq!(msgs, vec![MSG_SCROLLING_DOWN, MSG_STOPPED]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_direction_switch_never_overlaps() {
        let (mut dispatcher, surface) = dispatcher();

        assert_eq!(dispatcher.handle(Gesture::PointUp).message.as_deref(), Some(MSG_SCROLLING_UP));
        assert_eq!(dispatcher.state(), ScrollState::Scrolling(ScrollDirection::Up));
        time::sleep(Duration::from_millis(100)).await;

        assert_eq!(
            dispatcher.handle(Gesture::PointDown).message.as_deref(),
            Some(MSG_SCROLLING_DOWN)
        );
        assert_eq!(dispatcher.state(), ScrollState::Scrolling(ScrollDirection::Down));
        time::sleep(Duration::from_millis(100)).await;

        let deltas = surface.deltas();
        let first_down = deltas.iter().position(|d| *d > 0.0).expect("no down steps");
        assert!(first_down > 0);
        assert!(deltas[..first_down].iter().all(|d| *d == -25.0));
        assert!(deltas[first_down..].iter().all(|d| *d == 25.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fist_stops_steps() {
        let (mut dispatcher, surface) = dispatcher();
        dispatcher.handle(Gesture::PointDown);
        time::sleep(Duration::from_millis(95)).await;
        dispatcher.handle(Gesture::Fist);
        let count = surface.deltas().len();
        assert_eq!(count, 3);

        time::sleep(Duration::from_millis(300)).await;
        assert_eq!(surface.deltas().len(), count);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaffirming_direction_keeps_timer_phase() {
        // one sustained gesture
        let (mut sustained, sustained_surface) = dispatcher();
        sustained.handle(Gesture::PointUp);
        time::sleep(Duration::from_millis(315)).await;
        sustained.stop();

        // same gesture re-reported every frame-ish interval
        let (mut repeated, repeated_surface) = dispatcher();
        repeated.handle(Gesture::PointUp);
        for _ in 0..21 {
            time::sleep(Duration::from_millis(15)).await;
            repeated.handle(Gesture::PointUp);
        }
        repeated.stop();

        assert_eq!(sustained_surface.deltas().len(), 10);
        assert_eq!(repeated_surface.deltas().len(), sustained_surface.deltas().len());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent() {
        let surface = Arc::new(RecordingSurface::default());
        let mut repeater = ScrollRepeater::new(Handle::current(), surface, RepeatConfig::default());
        assert!(!repeater.stop());

        assert!(repeater.start(ScrollDirection::Down));
        assert!(!repeater.start(ScrollDirection::Down));
        assert!(repeater.stop());
        assert!(!repeater.stop());
        assert_eq!(repeater.direction(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_dispatcher_cancels_scroll() {
        let (mut dispatcher, surface) = dispatcher();
        dispatcher.handle(Gesture::PointUp);
        drop(dispatcher);

        time::sleep(Duration::from_millis(200)).await;
        assert!(surface.deltas().is_empty());
    }
}
