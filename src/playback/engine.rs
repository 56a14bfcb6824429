use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::core::{BoardDimensions, Sample};
use crate::playback::{
    Clock, FrameReadout, PlaybackConfig, PlaybackError, PlaybackState, SystemClock, TrailBuffer,
    ALLOWED_SPEEDS,
};
use crate::render::{BoardGeometry, Point};

/// What a call to [`PlaybackEngine::tick`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing
    Idle,
    /// Playing, but the next frame is not due yet
    Waiting,
    /// Painted frame `painted` and moved on to the next one
    Advanced { painted: usize },
    /// Painted the last frame and paused
    Finished,
}

/// Everything the frame renderer needs for one paint
#[derive(Debug, Clone, Copy)]
pub struct FrameSnapshot<'a> {
    pub sample: &'a Sample,
    pub board: BoardDimensions,
    pub geometry: &'a BoardGeometry,
    pub trail: &'a TrailBuffer,
    /// Center of pressure on the surface
    pub position: Point,
}

/// Frame currently on screen
#[derive(Debug, Clone, Copy, PartialEq)]
struct ShownFrame {
    index: usize,
    position: Option<Point>,
}

/// Replays a recorded session at its recorded pace
pub struct PlaybackEngine<C: Clock = SystemClock> {
    samples: Vec<Sample>,
    config: PlaybackConfig,
    state: PlaybackState,
    current_position: usize,
    frame_start: Option<Instant>,
    trail: TrailBuffer,
    board: BoardDimensions,
    geometry: Option<BoardGeometry>,
    shown: Option<ShownFrame>,
    frames_painted: u64,
    clock: C,
}

impl PlaybackEngine<SystemClock> {
    pub fn new(samples: Vec<Sample>, board: BoardDimensions, config: PlaybackConfig) -> Self {
        Self::with_clock(samples, board, config, SystemClock)
    }
}

impl Default for PlaybackEngine<SystemClock> {
    fn default() -> Self {
        Self::new(Vec::new(), BoardDimensions::default(), PlaybackConfig::default())
    }
}

impl<C: Clock> PlaybackEngine<C> {
    pub fn with_clock(
        samples: Vec<Sample>,
        board: BoardDimensions,
        config: PlaybackConfig,
        clock: C,
    ) -> Self {
        let speed = if config.speed.is_finite() && config.speed > 0.0 {
            config.speed
        } else {
            warn!("Invalid playback speed {}, using 1x", config.speed);
            1.0
        };
        let mut engine = Self {
            samples,
            trail: TrailBuffer::new(config.trail_len),
            config: PlaybackConfig { speed, ..config },
            state: PlaybackState::Stopped,
            current_position: 0,
            frame_start: None,
            board: board.or_default(),
            geometry: None,
            shown: None,
            frames_painted: 0,
            clock,
        };
        if !engine.samples.is_empty() {
            engine.show_frame(0);
        }
        engine
    }

    /// Get total number of samples
    pub fn total_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Get current playback speed
    pub fn speed(&self) -> f64 {
        self.config.speed
    }

    /// Index of the frame currently on screen
    pub fn shown_index(&self) -> Option<usize> {
        self.shown.map(|shown| shown.index)
    }

    /// Start/resume playback
    pub fn play(&mut self) {
        if self.samples.is_empty() || self.is_playing() {
            return;
        }

        if self.current_position >= self.samples.len() - 1 {
            self.current_position = 0;
            self.trail.clear();
        }

        self.state = PlaybackState::Playing;
        self.frame_start = Some(self.clock.now());
        info!("Playback started at frame {} ({}x)", self.current_position, self.config.speed);
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            info!("Playback paused at frame {}", self.current_position);
        }
        self.state = PlaybackState::Paused;
        self.frame_start = None;
    }

    /// Stop playback and rewind to the first frame
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.frame_start = None;
        if !self.samples.is_empty() {
            self.seek(0);
        }
        info!("Playback stopped");
    }

    pub fn toggle_play(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Jump to a frame, in any state.
    ///
    /// The index is clamped to the session, the trail restarts from the new
    /// frame and a running playback keeps going from there.
    pub fn seek(&mut self, index: usize) {
        if self.samples.is_empty() {
            return;
        }

        let index = index.min(self.samples.len() - 1);
        debug!("Seek to frame {}", index);
        self.trail.clear();
        self.current_position = index;
        if self.is_playing() {
            self.frame_start = Some(self.clock.now());
        }
        self.show_frame(index);
    }

    /// Timeline slider moved; ignored while playing. Returns whether the
    /// move was applied.
    pub fn on_slider_change(&mut self, index: usize) -> bool {
        if self.is_playing() || self.samples.is_empty() {
            return false;
        }
        self.seek(index);
        true
    }

    /// Step forward by one frame
    pub fn step_forward(&mut self) {
        self.pause();
        self.seek(self.current_position.saturating_add(1));
    }

    /// Step backward by one frame
    pub fn step_back(&mut self) {
        self.pause();
        self.seek(self.current_position.saturating_sub(1));
    }

    /// Set playback speed, applied from the next tick
    pub fn set_speed(&mut self, speed: f64) -> Result<(), PlaybackError> {
        if !(speed.is_finite() && speed > 0.0) {
            warn!("Rejected playback speed {}", speed);
            return Err(PlaybackError::InvalidSpeed(speed));
        }
        self.config.speed = speed;
        debug!("Playback speed set to {}x", speed);
        Ok(())
    }

    /// Next faster preset, if any
    pub fn speed_up(&mut self) {
        if let Some(&next) = ALLOWED_SPEEDS.iter().find(|&&s| s > self.config.speed) {
            self.config.speed = next;
        }
    }

    /// Next slower preset, if any
    pub fn speed_down(&mut self) {
        if let Some(&next) = ALLOWED_SPEEDS.iter().rev().find(|&&s| s < self.config.speed) {
            self.config.speed = next;
        }
    }

    /// Drawing surface size changed: refit the board and repaint the shown
    /// frame. The trail and the playback state are left alone.
    pub fn resize(&mut self, width: f32, height: f32) {
        let geometry = BoardGeometry::compute(width, height, self.board);
        if geometry == self.geometry {
            return;
        }
        self.geometry = geometry;
        self.repaint();
    }

    /// Change the trail length, keeping the most recent points
    pub fn set_trail_len(&mut self, trail_len: usize) {
        let mut trail = TrailBuffer::new(trail_len);
        for point in self.trail.iter() {
            trail.push(*point);
        }
        self.trail = trail;
        self.config.trail_len = self.trail.capacity();
    }

    /// Advance playback (call every UI frame).
    ///
    /// Paints at most one frame per call.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != PlaybackState::Playing {
            return TickOutcome::Idle;
        }

        let last = self.samples.len() - 1;
        if self.current_position >= last {
            self.show_frame(last);
            self.state = PlaybackState::Paused;
            self.frame_start = None;
            info!("Reached end of session after {} paints, playback paused", self.frames_painted);
            return TickOutcome::Finished;
        }

        let now = self.clock.now();
        let anchor = *self.frame_start.get_or_insert(now);
        let delay = self.frame_delay(self.current_position);
        if now.saturating_duration_since(anchor) < delay {
            return TickOutcome::Waiting;
        }

        let painted = self.current_position;
        self.show_frame(painted);
        self.current_position += 1;
        self.frame_start = Some(now);
        TickOutcome::Advanced { painted }
    }

    /// Everything needed to paint the shown frame, when there is a board
    /// to paint it on
    pub fn snapshot(&self) -> Option<FrameSnapshot<'_>> {
        let shown = self.shown?;
        let geometry = self.geometry.as_ref()?;
        Some(FrameSnapshot {
            sample: self.samples.get(shown.index)?,
            board: self.board,
            geometry,
            trail: &self.trail,
            position: shown.position?,
        })
    }

    /// Readouts for the shown frame
    pub fn readout(&self) -> FrameReadout {
        let total = self.samples.len();
        self.shown
            .and_then(|shown| {
                self.samples
                    .get(shown.index)
                    .map(|sample| FrameReadout::from_sample(sample, shown.index, total))
            })
            .unwrap_or_else(|| FrameReadout::empty(total))
    }

    /// Wall time between frame `index` and the next one at the current speed
    fn frame_delay(&self, index: usize) -> Duration {
        let (Some(current), Some(next)) = (self.samples.get(index), self.samples.get(index + 1))
        else {
            return Duration::ZERO;
        };
        let millis = (next.t - current.t).max(0.0) / self.config.speed;
        Duration::try_from_secs_f64(millis / 1000.0).unwrap_or(Duration::MAX)
    }

    fn show_frame(&mut self, index: usize) {
        let Some(sample) = self.samples.get(index) else {
            return;
        };
        let position = self.geometry.map(|geometry| geometry.center_of_pressure(sample));
        if let Some(point) = position {
            self.trail.push(point);
        }
        self.shown = Some(ShownFrame { index, position });
        self.frames_painted += 1;
    }

    fn repaint(&mut self) {
        let Some(shown) = self.shown else {
            return;
        };
        let position = match (self.geometry, self.samples.get(shown.index)) {
            (Some(geometry), Some(sample)) => Some(geometry.center_of_pressure(sample)),
            _ => None,
        };
        self.shown = Some(ShownFrame { position, ..shown });
        self.frames_painted += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Clock advanced by hand
    #[derive(Clone)]
    struct ManualClock {
        base: Instant,
        offset: Rc<Cell<Duration>>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                base: Instant::now(),
                offset: Rc::new(Cell::new(Duration::ZERO)),
            }
        }

        fn advance_ms(&self, ms: u64) {
            self.offset.set(self.offset.get() + Duration::from_millis(ms));
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.base + self.offset.get()
        }
    }

    fn sample_at(t: f64) -> Sample {
        Sample::new(t, [1000.0, 1000.0, 1000.0, 1000.0], t / 1000.0, -t / 1000.0)
    }

    fn engine_with(times: &[f64]) -> (PlaybackEngine<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let samples = times.iter().map(|&t| sample_at(t)).collect();
        let mut engine = PlaybackEngine::with_clock(
            samples,
            BoardDimensions::default(),
            PlaybackConfig::default(),
            clock.clone(),
        );
        engine.resize(800.0, 600.0);
        (engine, clock)
    }

    /// Tick until the position changes, returning the elapsed milliseconds
    fn ms_until_advance(engine: &mut PlaybackEngine<ManualClock>, clock: &ManualClock) -> u64 {
        let start = engine.current_position;
        let mut waited = 0;
        while engine.current_position == start {
            assert!(waited < 10_000, "never advanced");
            engine.tick();
            if engine.current_position == start {
                clock.advance_ms(1);
                waited += 1;
            }
        }
        waited
    }

    #[test]
    fn test_new_engine_shows_first_frame() {
        let (engine, _) = engine_with(&[0.0, 100.0]);
        assert_eq!(engine.state, PlaybackState::Stopped);
        assert_eq!(engine.shown_index(), Some(0));
        assert_eq!(engine.readout().frame_label(), "1 / 2");
        assert!(engine.snapshot().is_some());
    }

    #[test]
    fn test_play_from_last_frame_restarts() {
        let (mut engine, _) = engine_with(&[0.0, 100.0, 300.0]);
        engine.seek(2);
        assert_eq!(engine.trail.len(), 1);

        engine.play();
        assert!(engine.is_playing());
        assert_eq!(engine.current_position, 0);
        assert!(engine.trail.is_empty());
    }

    #[test]
    fn test_timing_follows_recorded_deltas() {
        let (mut engine, clock) = engine_with(&[0.0, 100.0, 300.0]);
        engine.play();
        assert_eq!(ms_until_advance(&mut engine, &clock), 100);
        assert_eq!(engine.current_position, 1);
        assert_eq!(ms_until_advance(&mut engine, &clock), 200);
        assert_eq!(engine.current_position, 2);
    }

    #[test]
    fn test_double_speed_halves_delays() {
        let (mut engine, clock) = engine_with(&[0.0, 100.0, 300.0]);
        engine.set_speed(2.0).unwrap();
        engine.play();
        assert_eq!(ms_until_advance(&mut engine, &clock), 50);
        assert_eq!(ms_until_advance(&mut engine, &clock), 100);
    }

    #[test]
    fn test_tick_waits_before_delay() {
        let (mut engine, clock) = engine_with(&[0.0, 100.0]);
        engine.play();
        clock.advance_ms(99);
        assert_eq!(engine.tick(), TickOutcome::Waiting);
        clock.advance_ms(1);
        assert_eq!(engine.tick(), TickOutcome::Advanced { painted: 0 });
    }

    #[test]
    fn test_one_advance_per_tick() {
        let (mut engine, clock) = engine_with(&[0.0, 10.0, 20.0, 30.0]);
        engine.play();
        clock.advance_ms(1000);
        engine.tick();
        assert_eq!(engine.current_position, 1);
    }

    #[test]
    fn test_no_advance_after_pause() {
        let (mut engine, clock) = engine_with(&[0.0, 10.0, 20.0, 30.0]);
        engine.play();
        clock.advance_ms(10);
        engine.tick();
        engine.pause();

        let position = engine.current_position;
        let painted = engine.frames_painted;
        for _ in 0..5 {
            clock.advance_ms(100);
            assert_eq!(engine.tick(), TickOutcome::Idle);
        }
        assert_eq!(engine.current_position, position);
        assert_eq!(engine.frames_painted, painted);
    }

    #[test]
    fn test_shown_frame_matches_readout_after_pause() {
        let (mut engine, clock) = engine_with(&[0.0, 100.0, 200.0]);
        engine.play();
        clock.advance_ms(120);
        assert_eq!(engine.tick(), TickOutcome::Advanced { painted: 0 });
        engine.pause();

        // The index has moved on, the screen still shows frame 0
        assert_eq!(engine.current_position, 1);
        assert_eq!(engine.shown_index(), Some(0));
        assert_eq!(engine.shown_index(), Some(engine.readout().frame - 1));
        assert_eq!(engine.readout().frame_label(), "1 / 3");
    }

    #[test]
    fn test_finishes_on_last_frame() {
        let (mut engine, clock) = engine_with(&[0.0, 10.0]);
        engine.play();
        clock.advance_ms(10);
        assert_eq!(engine.tick(), TickOutcome::Advanced { painted: 0 });
        assert_eq!(engine.tick(), TickOutcome::Finished);
        assert_eq!(engine.state, PlaybackState::Paused);
        assert_eq!(engine.shown_index(), Some(1));
        assert_eq!(engine.tick(), TickOutcome::Idle);
    }

    #[test]
    fn test_single_sample_paints_once_and_pauses() {
        let (mut engine, _) = engine_with(&[42.0]);
        let painted = engine.frames_painted;
        engine.play();
        assert_eq!(engine.tick(), TickOutcome::Finished);
        assert_eq!(engine.frames_painted, painted + 1);
        assert!(!engine.is_playing());
    }

    #[test]
    fn test_seek_clears_trail_in_any_state() {
        let (mut engine, clock) = engine_with(&[0.0, 10.0, 20.0, 30.0, 40.0]);
        engine.play();
        for _ in 0..3 {
            clock.advance_ms(10);
            engine.tick();
        }
        assert!(engine.trail.len() > 1);

        engine.seek(1);
        assert!(engine.is_playing());
        assert_eq!(engine.current_position, 1);
        assert_eq!(engine.trail.len(), 1);

        engine.pause();
        engine.seek(3);
        assert_eq!(engine.current_position, 3);
        assert_eq!(engine.trail.len(), 1);

        engine.stop();
        engine.seek(99);
        assert_eq!(engine.current_position, 4);
        assert_eq!(engine.shown_index(), Some(4));
    }

    #[test]
    fn test_seek_while_playing_resets_anchor() {
        let (mut engine, clock) = engine_with(&[0.0, 100.0, 200.0]);
        engine.play();
        clock.advance_ms(90);
        engine.seek(0);
        clock.advance_ms(20);
        assert_eq!(engine.tick(), TickOutcome::Waiting);
    }

    #[test]
    fn test_slider_ignored_while_playing() {
        let (mut engine, _) = engine_with(&[0.0, 10.0, 20.0]);
        engine.play();
        assert!(!engine.on_slider_change(2));
        assert_eq!(engine.current_position, 0);

        engine.pause();
        assert!(engine.on_slider_change(2));
        assert_eq!(engine.current_position, 2);
    }

    #[test]
    fn test_empty_session_is_inert() {
        let (mut engine, clock) = engine_with(&[]);
        engine.toggle_play();
        assert_eq!(engine.state, PlaybackState::Stopped);

        engine.seek(3);
        engine.step_forward();
        assert!(!engine.on_slider_change(1));
        clock.advance_ms(500);
        assert_eq!(engine.tick(), TickOutcome::Idle);
        engine.resize(1024.0, 768.0);

        assert_eq!(engine.frames_painted, 0);
        assert!(engine.snapshot().is_none());
        assert_eq!(engine.readout().frame_label(), "0 / 0");
    }

    #[test]
    fn test_invalid_speed_is_rejected() {
        let (mut engine, _) = engine_with(&[0.0, 10.0]);
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(engine.set_speed(bad).is_err());
        }
        assert_eq!(engine.speed(), 1.0);
    }

    #[test]
    fn test_every_preset_is_accepted() {
        let (mut engine, _) = engine_with(&[0.0, 10.0]);
        for speed in ALLOWED_SPEEDS {
            assert!(engine.set_speed(speed).is_ok());
            assert_eq!(engine.speed(), speed);
        }
    }

    #[test]
    fn test_speed_presets() {
        let (mut engine, _) = engine_with(&[0.0]);
        engine.speed_up();
        engine.speed_up();
        engine.speed_up();
        assert_eq!(engine.speed(), 4.0);

        for _ in 0..6 {
            engine.speed_down();
        }
        assert_eq!(engine.speed(), 0.25);
    }

    #[test]
    fn test_steps_pause_and_clamp() {
        let (mut engine, _) = engine_with(&[0.0, 10.0, 20.0]);
        engine.play();
        engine.step_forward();
        assert_eq!(engine.state, PlaybackState::Paused);
        assert_eq!(engine.current_position, 1);

        engine.step_back();
        engine.step_back();
        assert_eq!(engine.current_position, 0);
    }

    #[test]
    fn test_resize_keeps_trail_and_state() {
        let (mut engine, clock) = engine_with(&[0.0, 10.0, 20.0, 30.0]);
        engine.play();
        clock.advance_ms(10);
        engine.tick();
        clock.advance_ms(10);
        engine.tick();
        let trail = engine.trail.clone();
        let painted = engine.frames_painted;

        engine.resize(1200.0, 900.0);
        assert_eq!(engine.trail, trail);
        assert!(engine.is_playing());
        assert_eq!(engine.frames_painted, painted + 1);

        let snapshot = engine.snapshot().unwrap();
        assert_eq!(snapshot.geometry.surface_width, 1200.0);
        assert!(snapshot.geometry.contains(snapshot.position));
    }

    #[test]
    fn test_too_small_surface_has_no_snapshot() {
        let (mut engine, _) = engine_with(&[0.0, 10.0]);
        engine.resize(90.0, 90.0);
        assert!(engine.snapshot().is_none());
        assert_eq!(engine.readout().frame_label(), "1 / 2");
    }

    #[test]
    fn test_set_trail_len_keeps_newest() {
        let (mut engine, clock) = engine_with(&[0.0, 10.0, 20.0, 30.0, 40.0]);
        engine.play();
        for _ in 0..4 {
            clock.advance_ms(10);
            engine.tick();
        }
        let newest = *engine.trail.iter().next_back().unwrap();
        engine.set_trail_len(2);
        assert_eq!(engine.trail.len(), 2);
        assert_eq!(engine.trail.iter().next_back(), Some(&newest));
    }
}
