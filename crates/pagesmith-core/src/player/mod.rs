//! Scene player state machine
//!
//! The player owns the current step and the autoplay flag. It reacts to
//! [`Trigger`]s and answers with [`Effect`]s for the host to carry out:
//! notify the scene of a step change, schedule a timer, or cancel one.
//! Timer tokens are single use; a token that is not the pending one is stale
//! and ignored, so a cancelled timer that still fires cannot advance twice.

pub mod clock;

use std::time::Duration;

use crate::scene::StepMetadata;

pub use clock::{autoplay_schedule, TimedEvent, VirtualClock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerToken(u64);

impl TimerToken {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Advance,
    Reset,
    StartAutoplay,
    StopAutoplay,
    ToggleAutoplay,
    TimerFired(TimerToken),
}

impl Trigger {
    /// Keyboard binding by `KeyboardEvent.code`
    pub fn from_key_code(code: &str) -> Option<Trigger> {
        match code {
            "Space" | "ArrowRight" => Some(Trigger::Advance),
            "KeyR" => Some(Trigger::Reset),
            "KeyA" => Some(Trigger::ToggleAutoplay),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StepChanged {
        step: usize,
        subtitle: Option<String>,
    },
    Schedule {
        token: TimerToken,
        delay: Duration,
    },
    Cancel {
        token: TimerToken,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerMode {
    Idle,
    Manual,
    Autoplaying,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerState {
    pub current_step: usize,
    pub is_autoplaying: bool,
}

#[derive(Debug, Clone)]
pub struct Player {
    metadata: Vec<StepMetadata>,
    state: PlayerState,
    pending: Option<TimerToken>,
    next_token: u64,
}

impl Player {
    pub fn new(metadata: Vec<StepMetadata>) -> Self {
        Self {
            metadata,
            state: PlayerState {
                current_step: 0,
                is_autoplaying: false,
            },
            pending: None,
            next_token: 0,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn mode(&self) -> PlayerMode {
        if self.state.is_autoplaying {
            PlayerMode::Autoplaying
        } else if self.state.current_step == 0 {
            PlayerMode::Idle
        } else {
            PlayerMode::Manual
        }
    }

    pub fn metadata(&self) -> &[StepMetadata] {
        &self.metadata
    }

    pub fn pending_timer(&self) -> Option<TimerToken> {
        self.pending
    }

    pub fn handle(&mut self, trigger: Trigger) -> Vec<Effect> {
        let mut effects = Vec::new();
        match trigger {
            Trigger::Advance => {
                self.stop(&mut effects);
                self.set_step(self.state.current_step + 1, &mut effects);
            }
            Trigger::Reset => {
                self.stop(&mut effects);
                self.set_step(0, &mut effects);
            }
            Trigger::StartAutoplay => self.start(&mut effects),
            Trigger::StopAutoplay => self.stop(&mut effects),
            Trigger::ToggleAutoplay => {
                if self.state.is_autoplaying {
                    self.stop(&mut effects);
                } else {
                    self.start(&mut effects);
                }
            }
            Trigger::TimerFired(token) => self.timer_fired(token, &mut effects),
        }
        effects
    }

    fn start(&mut self, effects: &mut Vec<Effect>) {
        if self.state.is_autoplaying {
            return;
        }
        if self.metadata.is_empty() {
            tracing::warn!("no step metadata; autoplay unavailable");
            return;
        }

        self.state.is_autoplaying = true;
        if self.state.current_step == 0 {
            self.set_step(1, effects);
        }
        self.schedule_next(effects);
    }

    fn stop(&mut self, effects: &mut Vec<Effect>) {
        self.state.is_autoplaying = false;
        if let Some(token) = self.pending.take() {
            effects.push(Effect::Cancel { token });
        }
    }

    fn timer_fired(&mut self, token: TimerToken, effects: &mut Vec<Effect>) {
        if self.pending != Some(token) {
            tracing::debug!(token = token.id(), "ignoring stale timer");
            return;
        }
        self.pending = None;
        if !self.state.is_autoplaying {
            return;
        }

        let next = self.state.current_step + 1;
        if self.metadata.get(next - 1).is_none() {
            tracing::debug!(step = self.state.current_step, "timeline exhausted");
            self.state.is_autoplaying = false;
            return;
        }
        self.set_step(next, effects);
        self.schedule_next(effects);
    }

    /// Schedule the advance past the current step, or stop when it has no timing
    fn schedule_next(&mut self, effects: &mut Vec<Effect>) {
        match self.timing_for(self.state.current_step) {
            Some(delay) => {
                let token = TimerToken(self.next_token);
                self.next_token += 1;
                self.pending = Some(token);
                effects.push(Effect::Schedule { token, delay });
            }
            None => {
                tracing::debug!(step = self.state.current_step, "end of timings");
                self.state.is_autoplaying = false;
            }
        }
    }

    /// Autoplay delay for a step; a zero duration counts as absent
    fn timing_for(&self, step: usize) -> Option<Duration> {
        let entry = self.metadata.get(step.checked_sub(1)?)?;
        (entry.duration > 0).then(|| Duration::from_millis(entry.duration))
    }

    fn set_step(&mut self, step: usize, effects: &mut Vec<Effect>) {
        self.state.current_step = step;
        let subtitle = step
            .checked_sub(1)
            .and_then(|index| self.metadata.get(index))
            .and_then(|entry| entry.text.clone());
        effects.push(Effect::StepChanged { step, subtitle });
    }
}
