//! Linear multi-step animations.
//!
//! A sequence plays its steps one after another: `idle -> step 0 -> step 1 ->
//! ... -> idle`. A step is entered by starting its animation and left only
//! once that animation reports finished.

use crate::animation::timed::TimedAnimation;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceState {
    Idle,
    /// About to start the step's animation.
    Entering(usize),
    Playing(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceEvent {
    None,
    StepStarted(usize),
    StepFinished(usize),
    Completed,
}

#[derive(Clone, Debug)]
pub struct Sequence {
    steps: Vec<TimedAnimation>,
    state: SequenceState,
}

impl Sequence {
    pub fn new(steps: Vec<TimedAnimation>) -> Self {
        Self {
            steps,
            state: SequenceState::Idle,
        }
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != SequenceState::Idle
    }

    /// Begins at step 0. Does nothing while already active.
    pub fn start(&mut self) -> bool {
        if self.is_active() || self.steps.is_empty() {
            return false;
        }
        self.state = SequenceState::Entering(0);
        true
    }

    /// Aborts and returns to idle.
    pub fn reset(&mut self) {
        self.steps.iter_mut().for_each(TimedAnimation::stop);
        self.state = SequenceState::Idle;
    }

    /// Moves the state machine forward by at most one transition.
    pub fn advance(&mut self) -> SequenceEvent {
        match self.state {
            SequenceState::Idle => SequenceEvent::None,
            SequenceState::Entering(i) if i >= self.steps.len() => {
                self.state = SequenceState::Idle;
                SequenceEvent::Completed
            }
            SequenceState::Entering(i) => {
                self.steps[i].start();
                self.state = SequenceState::Playing(i);
                SequenceEvent::StepStarted(i)
            }
            SequenceState::Playing(i) => {
                if self.steps[i].is_finished() {
                    self.state = SequenceState::Entering(i + 1);
                    SequenceEvent::StepFinished(i)
                } else {
                    SequenceEvent::None
                }
            }
        }
    }

    /// Ticks the playing step and returns its index with the value change of this tick.
    pub fn tick(&mut self, dt: f32) -> Option<(usize, f32)> {
        match self.state {
            SequenceState::Playing(i) => {
                let step = &mut self.steps[i];
                step.tick(dt);
                Some((i, step.progress_diff()))
            }
            _ => None,
        }
    }

    pub fn step(&self, i: usize) -> Option<&TimedAnimation> {
        self.steps.get(i)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
