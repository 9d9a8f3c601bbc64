//! Cursor over a run's captured history, driven by explicit step and timer
//! requests.
//!
//! The state machine only decides *what* to display next; the controller
//! turns each [`Frame`] into instances.

use std::time::Duration;

/// Playback mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    SteppingOnce,
    PlayingTimed(Duration),
    /// The cursor ran past the history; the final state stays on screen.
    Done,
}

/// Identifies one timed playback. Ticks carrying a cancelled handle are
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// What the controller should display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    History(usize),
    Final,
}

#[derive(Debug, Clone)]
pub struct Playback {
    state: PlaybackState,
    /// Next history index to display; clamped to `0..=len`.
    cursor: usize,
    len: usize,
    timer: Option<TimerHandle>,
    next_timer: u64,
    elapsed: Duration,
}

impl Playback {
    /// Idle playback over a history of `len` snapshots.
    pub fn new(len: usize) -> Self {
        Self {
            state: PlaybackState::Idle,
            cursor: 0,
            len,
            timer: None,
            next_timer: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Current mode.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Next history index to display.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of snapshots in the history.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The live timer, if timed playback is running.
    pub fn timer(&self) -> Option<TimerHandle> {
        self.timer
    }

    /// Cancel any timer and rewind to `Idle` over a new history of `len`
    /// snapshots. Timer handles stay unique across restarts.
    pub fn restart(&mut self, len: usize) {
        self.cancel();
        self.state = PlaybackState::Idle;
        self.cursor = 0;
        self.len = len;
    }

    /// Stop timed playback. Returns the cancelled handle, if one was live.
    pub fn cancel(&mut self) -> Option<TimerHandle> {
        let handle = self.timer.take()?;
        self.elapsed = Duration::ZERO;
        if matches!(self.state, PlaybackState::PlayingTimed(_)) {
            self.state = PlaybackState::Idle;
        }
        Some(handle)
    }

    /// Display the state under the cursor and advance by exactly one.
    pub fn step_once(&mut self) -> Frame {
        self.cancel();
        if self.state == PlaybackState::Done {
            return Frame::Final;
        }
        self.state = PlaybackState::SteppingOnce;
        let frame = self.advance();
        if self.state == PlaybackState::SteppingOnce {
            self.state = PlaybackState::Idle;
        }
        frame
    }

    /// Start advancing once per `period`. Returns `None` when playback is
    /// already done.
    pub fn play_timed(&mut self, period: Duration) -> Option<TimerHandle> {
        self.cancel();
        if self.state == PlaybackState::Done {
            return None;
        }
        let period = period.max(Duration::from_millis(1));
        let handle = TimerHandle(self.next_timer);
        self.next_timer += 1;
        self.timer = Some(handle);
        self.elapsed = Duration::ZERO;
        self.state = PlaybackState::PlayingTimed(period);
        Some(handle)
    }

    /// One timer firing. Stale handles and non-timed states yield nothing.
    pub fn tick(&mut self, handle: TimerHandle) -> Option<Frame> {
        if self.timer != Some(handle) {
            return None;
        }
        let PlaybackState::PlayingTimed(_) = self.state else {
            return None;
        };
        let frame = self.advance();
        if self.state == PlaybackState::Done {
            self.timer = None;
        }
        Some(frame)
    }

    /// Advance the timer by `dt`, firing once per whole period elapsed.
    pub fn update(&mut self, dt: Duration) -> Vec<Frame> {
        let mut frames = Vec::new();
        let (Some(handle), PlaybackState::PlayingTimed(period)) = (self.timer, self.state) else {
            return frames;
        };
        self.elapsed += dt;
        while self.elapsed >= period {
            self.elapsed -= period;
            match self.tick(handle) {
                Some(frame) => frames.push(frame),
                None => break,
            }
        }
        frames
    }

    fn advance(&mut self) -> Frame {
        if self.cursor >= self.len {
            tracing::warn!(
                cursor = self.cursor,
                len = self.len,
                "playback ran past captured history, showing final state"
            );
            self.state = PlaybackState::Done;
            return Frame::Final;
        }
        let frame = Frame::History(self.cursor);
        self.cursor += 1;
        tracing::debug!(index = self.cursor - 1, "showing state");
        frame
    }
}
