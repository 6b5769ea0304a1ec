/// Represents a timer inside of the chip infrastruture, it will count down
/// to zero from what ever number given. The host ticks it once per frame
/// (60Hz).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    /// will store the value of the timer
    value: u8,
}

impl Timer {
    /// Will create a new timer with the given value.
    pub fn new(value: u8) -> Self {
        Self { value }
    }

    /// Will set the value from which the timer shall count down from.
    pub fn set_value(&mut self, value: u8) {
        self.value = value;
    }

    /// Will get the value that the counter is currently at.
    pub fn get_value(&self) -> u8 {
        self.value
    }

    /// Will count down by one, but never below zero.
    /// Returns the value after the tick.
    pub fn tick(&mut self) -> u8 {
        self.value = self.value.saturating_sub(1);
        self.value
    }

    /// Checks if the timer is still running.
    pub fn is_active(&self) -> bool {
        self.value > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::timer;

    #[test]
    fn test_timer() {
        let mut timer = Timer::new(timer::HERZ as u8);
        assert!(timer.is_active());

        for _ in 0..timer::HERZ {
            timer.tick();
        }
        assert_eq!(timer.get_value(), 0);
        assert!(!timer.is_active());
    }

    #[test]
    fn test_timer_floors_at_zero() {
        let mut timer = Timer::new(3);

        assert_eq!(2, timer.tick());
        assert_eq!(1, timer.tick());
        assert_eq!(0, timer.tick());
        assert_eq!(0, timer.tick());
    }
}
