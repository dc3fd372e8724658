//! Sound Events
//!
//! The simulation never talks to the audio backend. It pushes named events
//! into a queue the presentation layer drains once per frame and forwards
//! to whatever backend exists (or to nothing at all). This keeps playback
//! fire-and-forget and the simulation deterministic under test.

/// A queue for events of a single type, collected during the frame and
/// drained at a fixed point.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the queue
    pub fn push(&mut self, event: T) {
        self.events.push(event);
    }

    /// Drain all events (clears the queue)
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }

    /// Iterate without clearing
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Named sound effects the simulation can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEvent {
    Jump,
    Land,
    Step,
    Whip,
    EnemyHit,
    PlayerHit,
    Death,
    Explosion,
    GemPickup,
    RopeThrow,
    ChestOpen,
    Door,
    LevelComplete,
}

impl SoundEvent {
    /// Every effect, for pre-rendering the sound bank
    pub const ALL: [SoundEvent; 13] = [
        SoundEvent::Jump,
        SoundEvent::Land,
        SoundEvent::Step,
        SoundEvent::Whip,
        SoundEvent::EnemyHit,
        SoundEvent::PlayerHit,
        SoundEvent::Death,
        SoundEvent::Explosion,
        SoundEvent::GemPickup,
        SoundEvent::RopeThrow,
        SoundEvent::ChestOpen,
        SoundEvent::Door,
        SoundEvent::LevelComplete,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_queue_drain() {
        let mut queue: EventQueue<i32> = EventQueue::new();
        queue.push(1);
        queue.push(2);
        queue.push(3);
        assert_eq!(queue.len(), 3);

        let collected: Vec<_> = queue.drain().collect();
        assert_eq!(collected, vec![1, 2, 3]);
        assert!(queue.is_empty());
    }
}
