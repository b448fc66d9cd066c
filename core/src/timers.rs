/// # Timers
/// The delay and sound timers count down towards zero once per tick of some external fixed-rate
/// clock (traditionally 60Hz), independently of how fast instructions are executed.
///
/// The buzzer sounds for as long as the sound timer is nonzero.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    /// Decrements each nonzero timer by one
    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    pub fn sound_active(&self) -> bool {
        self.sound != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tick_decrements_both() {
        let mut timers = Timers { delay: 3, sound: 1 };
        timers.tick();
        assert_eq!(timers, Timers { delay: 2, sound: 0 });
    }

    #[test]
    fn test_sound_stops_when_timer_runs_out() {
        let mut timers = Timers { delay: 0, sound: 2 };
        assert!(timers.sound_active());
        timers.tick();
        assert!(timers.sound_active());
        timers.tick();
        assert!(!timers.sound_active());
    }

    proptest! {
        #[test]
        fn prop_ticks_saturate_at_zero(delay in any::<u8>(), sound in any::<u8>(), ticks in 0usize..600) {
            let mut timers = Timers { delay, sound };
            for _ in 0..ticks {
                timers.tick();
            }
            prop_assert_eq!(timers.delay as usize, (delay as usize).saturating_sub(ticks));
            prop_assert_eq!(timers.sound as usize, (sound as usize).saturating_sub(ticks));
            prop_assert_eq!(timers.sound_active(), timers.sound != 0);
        }
    }
}
