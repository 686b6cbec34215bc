//! Idle behaviour of a spawned beastmaster NPC.

use std::ops::RangeInclusive;

use rand::Rng;

/// Milliseconds between two eat emotes.
pub const EAT_INTERVAL_MS: RangeInclusive<u32> = 30_000..=90_000;

/// Emote timer of one NPC instance, advanced by the host's AI tick.
#[derive(Debug, Clone)]
pub struct IdleEmotes {
    until_eat_ms: u32,
}

impl IdleEmotes {
    /// Schedules the first emote, as on NPC reset.
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        IdleEmotes {
            until_eat_ms: rng.gen_range(EAT_INTERVAL_MS),
        }
    }

    /// Advances the timer by `diff_ms`.
    ///
    /// # Returns
    ///
    /// `true` when the NPC should play its eat emote now. The next emote is
    /// then rescheduled.
    pub fn update<R: Rng>(&mut self, diff_ms: u32, rng: &mut R) -> bool {
        if diff_ms < self.until_eat_ms {
            self.until_eat_ms -= diff_ms;
            return false;
        }
        self.until_eat_ms = rng.gen_range(EAT_INTERVAL_MS);
        true
    }

    pub fn until_eat_ms(&self) -> u32 {
        self.until_eat_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn first_emote_is_scheduled_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let idle = IdleEmotes::new(&mut rng);
            assert!(EAT_INTERVAL_MS.contains(&idle.until_eat_ms()));
        }
    }

    #[test]
    fn fires_once_per_interval() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut idle = IdleEmotes::new(&mut rng);

        let mut fired = 0;
        // ten minutes in one-second ticks
        for _ in 0..600 {
            if idle.update(1_000, &mut rng) {
                fired += 1;
                assert!(EAT_INTERVAL_MS.contains(&idle.until_eat_ms()));
            }
        }
        assert!((6..=20).contains(&fired), "fired {fired} times");
    }
}
