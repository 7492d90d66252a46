//! Timed animations driven by frame deltas.
//!
//! Unlike tweens, a timed animation keeps its own clock. It runs from `from`
//! to `to` over `duration` seconds; a looping one then turns around and runs
//! back, forever, until stopped.

/// What happened during one [`TimedAnimation::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The animation is not running.
    Idle,
    Running,
    /// A looping animation reached an end and reversed; the value sits exactly on that end.
    Bounced,
    /// A one-shot animation reached `to` and stopped.
    Finished,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimedAnimation {
    from: f32,
    to: f32,
    duration: f32,
    looping: bool,
    speed: f32,
    elapsed: f32,
    forward: bool,
    running: bool,
    value: f32,
    last_value: f32,
}

impl TimedAnimation {
    /// `duration` is in seconds for one pass from `from` to `to`.
    pub fn new(from: f32, to: f32, duration: f32, looping: bool) -> Self {
        Self {
            from,
            to,
            duration: duration.max(f32::EPSILON),
            looping,
            speed: 1.0,
            elapsed: 0.0,
            forward: true,
            running: false,
            value: from,
            last_value: from,
        }
    }

    pub fn looping(from: f32, to: f32, duration: f32) -> Self {
        Self::new(from, to, duration, true)
    }

    pub fn one_shot(from: f32, to: f32, duration: f32) -> Self {
        Self::new(from, to, duration, false)
    }

    /// Restarts from `from`.
    pub fn start(&mut self) {
        self.elapsed = 0.0;
        self.forward = true;
        self.running = true;
        self.value = self.from;
        self.last_value = self.from;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_finished(&self) -> bool {
        !self.running
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    /// Current value between `from` and `to`.
    pub fn progress(&self) -> f32 {
        self.value
    }

    /// Change of the value during the last tick.
    pub fn progress_diff(&self) -> f32 {
        self.value - self.last_value
    }

    pub fn tick(&mut self, dt: f32) -> TickOutcome {
        self.last_value = self.value;
        if !self.running {
            return TickOutcome::Idle;
        }

        self.elapsed += dt * self.speed;
        let mut outcome = TickOutcome::Running;
        if self.elapsed >= self.duration {
            self.elapsed = self.duration;
            if self.looping {
                outcome = TickOutcome::Bounced;
            } else {
                self.running = false;
                outcome = TickOutcome::Finished;
            }
        }

        let t = self.elapsed / self.duration;
        let t = if self.forward { t } else { 1.0 - t };
        self.value = if t >= 1.0 {
            self.to
        } else if t <= 0.0 {
            self.from
        } else {
            self.from + (self.to - self.from) * t
        };

        if outcome == TickOutcome::Bounced {
            self.forward = !self.forward;
            self.elapsed = 0.0;
        }
        outcome
    }

    /// True if the last bounce left the value on `to`.
    pub fn is_at_end(&self) -> bool {
        self.value == self.to
    }
}
