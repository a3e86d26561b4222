//! Smooth scrolling for the message list.
//!
//! Whenever the conversation grows the view chases the bottom using
//! delta-time exponential smoothing, so new messages glide into view instead
//! of jumping. A large distance is mostly covered in one jump first so the
//! animation never crawls through a long history.

use std::time::Instant;

/// Easing speed; at 12.0 about 90% of the distance is covered in ~200ms.
const SCROLL_SMOOTH_SPEED: f32 = 12.0;

/// Below this distance (in lines) the view snaps to the target.
const MIN_SCROLL_THRESHOLD: f32 = 0.5;

/// Distances larger than this are jumped to within [`JUMP_REMAINDER`].
const INITIAL_JUMP_THRESHOLD: usize = 40;

/// Lines left to animate after an initial jump.
const JUMP_REMAINDER: usize = 8;

/// Longest frame time fed into the easing, so a stalled loop does not
/// produce a teleport.
const MAX_TICK_SECS: f32 = 0.1;

/// Scroll position of the message list, in lines from the top.
#[derive(Debug)]
pub struct ScrollState {
    offset: f32,
    max_offset: usize,
    viewport: usize,
    animating: bool,
    last_tick: Instant,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
impl ScrollState {
    pub fn new() -> Self {
        Self {
            offset: 0.0,
            max_offset: 0,
            viewport: 0,
            animating: false,
            last_tick: Instant::now(),
        }
    }

    /// Record the content and viewport heights from the latest render.
    pub fn set_layout(&mut self, content_height: usize, viewport: usize) {
        self.viewport = viewport;
        self.max_offset = content_height.saturating_sub(viewport);
        if self.offset > self.max_offset as f32 {
            self.offset = self.max_offset as f32;
        }
    }

    /// First visible line.
    pub fn position(&self) -> usize {
        (self.offset.max(0.0).round() as usize).min(self.max_offset)
    }

    pub fn max_offset(&self) -> usize {
        self.max_offset
    }

    pub fn viewport(&self) -> usize {
        self.viewport
    }

    pub fn is_at_bottom(&self) -> bool {
        self.position() >= self.max_offset
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Start gliding toward the bottom.
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_to_bottom_at(Instant::now());
    }

    pub fn scroll_to_bottom_at(&mut self, now: Instant) {
        let target = self.max_offset as f32;

        if self.max_offset > INITIAL_JUMP_THRESHOLD
            && target - self.offset > INITIAL_JUMP_THRESHOLD as f32
        {
            self.offset = (self.max_offset - JUMP_REMAINDER) as f32;
        }

        if (target - self.offset).abs() < MIN_SCROLL_THRESHOLD {
            self.offset = target;
            self.animating = false;
            return;
        }

        self.animating = true;
        self.last_tick = now;
    }

    /// Advance the animation. Returns `true` if the position moved.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> bool {
        if !self.animating {
            return false;
        }

        // The target is re-read every tick: it moves if the pane is resized
        // or more content lands mid-animation.
        let target = self.max_offset as f32;
        let distance = target - self.offset;

        if distance.abs() < MIN_SCROLL_THRESHOLD {
            self.offset = target;
            self.animating = false;
            return true;
        }

        let delta = now
            .saturating_duration_since(self.last_tick)
            .as_secs_f32()
            .min(MAX_TICK_SECS);
        self.last_tick = now;

        let factor = 1.0 - (-SCROLL_SMOOTH_SPEED * delta).exp();
        self.offset += distance * factor;
        true
    }

    /// Scroll toward older messages. Cancels any animation.
    pub fn scroll_up(&mut self, lines: usize) {
        self.animating = false;
        self.offset = self.position().saturating_sub(lines) as f32;
    }

    /// Scroll toward newer messages. Cancels any animation.
    pub fn scroll_down(&mut self, lines: usize) {
        self.animating = false;
        self.offset = (self.position() + lines).min(self.max_offset) as f32;
    }
}
