//! Simulated time for driving a [`Player`]

use serde::Serialize;

use crate::player::{Effect, Player, TimerToken, Trigger};

/// A step change observed at a simulated instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimedEvent {
    /// Milliseconds since the clock started
    pub at: u64,
    pub step: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

/// Runs a player against virtual milliseconds, carrying out its effects
#[derive(Debug)]
pub struct VirtualClock {
    player: Player,
    now: u64,
    /// (due, token), in scheduling order
    timers: Vec<(u64, TimerToken)>,
    events: Vec<TimedEvent>,
}

impl VirtualClock {
    pub fn new(player: Player) -> Self {
        Self {
            player,
            now: 0,
            timers: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn events(&self) -> &[TimedEvent] {
        &self.events
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Deliver a trigger at the current instant
    pub fn dispatch(&mut self, trigger: Trigger) {
        for effect in self.player.handle(trigger) {
            match effect {
                Effect::StepChanged { step, subtitle } => self.events.push(TimedEvent {
                    at: self.now,
                    step,
                    subtitle,
                }),
                Effect::Schedule { token, delay } => {
                    let delay = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
                    self.timers.push((self.now.saturating_add(delay), token));
                }
                Effect::Cancel { token } => self.timers.retain(|(_, t)| *t != token),
            }
        }
    }

    /// Fire every timer due at or before `until`, then move the clock there
    pub fn run_until(&mut self, until: u64) {
        while let Some(index) = self.next_due(until) {
            let (due, token) = self.timers.remove(index);
            self.now = due;
            self.dispatch(Trigger::TimerFired(token));
        }
        self.now = self.now.max(until);
    }

    /// Fire timers until none are pending
    pub fn run_to_completion(&mut self) {
        while let Some(index) = self.next_due(u64::MAX) {
            let (due, token) = self.timers.remove(index);
            self.now = due;
            self.dispatch(Trigger::TimerFired(token));
        }
    }

    fn next_due(&self, until: u64) -> Option<usize> {
        self.timers
            .iter()
            .enumerate()
            .filter(|(_, (due, _))| *due <= until)
            .min_by_key(|(index, (due, _))| (*due, *index))
            .map(|(index, _)| index)
    }
}

/// The full autoplay schedule of a scene, starting from step 0
pub fn autoplay_schedule(player: Player) -> Vec<TimedEvent> {
    let mut clock = VirtualClock::new(player);
    clock.dispatch(Trigger::StartAutoplay);
    clock.run_to_completion();
    clock.events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::StepMetadata;

    fn two_steps() -> Player {
        Player::new(vec![
            StepMetadata::new(100, "a"),
            StepMetadata::new(50, "b"),
        ])
    }

    fn steps_at(events: &[TimedEvent]) -> Vec<(u64, usize)> {
        events.iter().map(|e| (e.at, e.step)).collect()
    }

    #[test]
    fn test_autoplay_timing() {
        let mut clock = VirtualClock::new(two_steps());
        clock.dispatch(Trigger::StartAutoplay);
        assert_eq!(steps_at(clock.events()), vec![(0, 1)]);

        clock.run_until(99);
        assert_eq!(clock.events().len(), 1);

        clock.run_until(100);
        assert_eq!(steps_at(clock.events()), vec![(0, 1), (100, 2)]);

        clock.run_until(1_000);
        assert_eq!(steps_at(clock.events()), vec![(0, 1), (100, 2)]);
        assert_eq!(clock.pending_timers(), 0);
        assert!(!clock.player().state().is_autoplaying);
    }

    #[test]
    fn test_manual_advance_mid_autoplay_does_not_double_advance() {
        let mut clock = VirtualClock::new(two_steps());
        clock.dispatch(Trigger::StartAutoplay);
        clock.run_until(40);
        clock.dispatch(Trigger::Advance);
        assert_eq!(clock.pending_timers(), 0);

        // Past the point where the cancelled timer would have fired
        clock.run_until(250);
        assert_eq!(steps_at(clock.events()), vec![(0, 1), (40, 2)]);
    }

    #[test]
    fn test_restart_after_reset() {
        let mut clock = VirtualClock::new(two_steps());
        clock.dispatch(Trigger::StartAutoplay);
        clock.run_until(120);
        clock.dispatch(Trigger::Reset);
        clock.dispatch(Trigger::StartAutoplay);
        clock.run_to_completion();
        assert_eq!(
            steps_at(clock.events()),
            vec![(0, 1), (100, 2), (120, 0), (120, 1), (220, 2)]
        );
    }

    #[test]
    fn test_autoplay_schedule_subtitles() {
        let events = autoplay_schedule(two_steps());
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].subtitle.as_deref(), Some("b"));
    }
}
