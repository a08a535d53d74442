//! Fighter life pool.

/// Current and maximum life of a fighter.
///
/// `0 <= current <= max` always holds; a fighter is dead iff `current == 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Life {
    current: i32,
    max: i32,
}

impl Life {
    /// Full life pool.
    pub fn new(max: i32) -> Self {
        let max = max.max(0);
        Self { current: max, max }
    }

    /// Partially depleted pool; `current` is clamped into `[0, max]`.
    pub fn with_current(current: i32, max: i32) -> Self {
        let max = max.max(0);
        Self {
            current: current.clamp(0, max),
            max,
        }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// Life lost since the pool was full.
    pub fn lost(&self) -> i32 {
        self.max - self.current
    }

    pub fn is_dead(&self) -> bool {
        self.current == 0
    }

    pub fn is_full(&self) -> bool {
        self.current == self.max
    }

    /// Adds `delta` to current life and returns the change actually applied.
    ///
    /// Dead fighters are not healed back to life.
    pub fn alter(&mut self, delta: i32) -> i32 {
        if self.is_dead() {
            return 0;
        }
        let previous = self.current;
        self.current = previous.saturating_add(delta).clamp(0, self.max);
        self.current - previous
    }

    /// Raises or lowers the maximum and the current life together.
    ///
    /// Returns the change applied to the maximum. Lowering the maximum may
    /// bring current life down to zero.
    pub fn alter_max(&mut self, delta: i32) -> i32 {
        let previous = self.max;
        self.max = previous.saturating_add(delta).max(0);
        let applied = self.max - previous;
        if !self.is_dead() {
            self.current = self.current.saturating_add(applied).clamp(0, self.max);
        } else {
            self.current = 0;
        }
        applied
    }

    /// Sets current life to zero and returns the life removed.
    pub fn kill(&mut self) -> i32 {
        let lost = self.current;
        self.current = 0;
        lost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alter_is_clamped() {
        let mut life = Life::new(100);
        assert_eq!(life.alter(-30), -30);
        assert_eq!(life.alter(50), 30);
        assert!(life.is_full());
        assert_eq!(life.alter(-250), -100);
        assert!(life.is_dead());
        assert_eq!(life.alter(40), 0);
        assert!(life.is_dead());
    }

    #[test]
    fn alter_max_moves_current_with_it() {
        let mut life = Life::with_current(50, 100);
        assert_eq!(life.alter_max(20), 20);
        assert_eq!((life.current(), life.max()), (70, 120));
        assert_eq!(life.alter_max(-20), -20);
        assert_eq!((life.current(), life.max()), (50, 100));
    }

    #[test]
    fn lowering_max_can_kill() {
        let mut life = Life::with_current(10, 100);
        life.alter_max(-50);
        assert!(life.is_dead());
        assert_eq!(life.max(), 50);
    }

    #[test]
    fn with_current_clamps() {
        let life = Life::with_current(500, 100);
        assert_eq!(life.current(), 100);
        assert_eq!(Life::with_current(-5, 10).current(), 0);
    }
}
