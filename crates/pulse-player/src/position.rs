/// Playback direction through the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    /// `+1` forward, `-1` backward.
    pub fn sign(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// Fractional index into the sequence, always within `[0, last]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct PlaybackPosition {
    value: f64,
    last: f64,
}

impl PlaybackPosition {
    /// Position `value` in a sequence whose last index is `last`, clamped.
    pub fn new(value: f64, last: usize) -> Self {
        let last = last as f64;
        let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, last) };
        Self { value, last }
    }

    pub fn start(last: usize) -> Self {
        Self::new(0.0, last)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// `floor(position)`: the frame drawn at full opacity.
    pub fn base_index(&self) -> usize {
        self.value.floor() as usize
    }

    /// Progress from the base frame toward the next one, in `[0, 1)`.
    pub fn fraction(&self) -> f64 {
        self.value - self.value.floor()
    }

    /// Neighbour frame used as blend target: `base + direction`, clamped.
    pub fn neighbour(&self, direction: Direction) -> usize {
        let n = self.base_index() as i64 + direction.sign();
        n.clamp(0, self.last as i64) as usize
    }

    pub fn is_at_end(&self) -> bool {
        self.value >= self.last
    }

    pub fn is_at_start(&self) -> bool {
        self.value <= 0.0
    }

    /// Move by `delta` frames, clamping to the sequence bounds.
    pub fn offset(&self, delta: f64) -> Self {
        Self {
            value: (self.value + delta).clamp(0.0, self.last),
            last: self.last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_clamps_never_wraps() {
        assert_eq!(PlaybackPosition::new(-3.0, 139).value(), 0.0);
        assert_eq!(PlaybackPosition::new(200.0, 139).value(), 139.0);
        assert_eq!(PlaybackPosition::new(f64::NAN, 139).value(), 0.0);
        assert_eq!(PlaybackPosition::new(138.5, 139).offset(5.0).value(), 139.0);
    }

    #[test]
    fn test_position_base_and_fraction() {
        let p = PlaybackPosition::new(47.3, 139);
        assert_eq!(p.base_index(), 47);
        assert!((p.fraction() - 0.3).abs() < 1e-9);
        assert_eq!(PlaybackPosition::new(12.0, 139).fraction(), 0.0);
    }

    #[test]
    fn test_position_neighbour_clamped() {
        let end = PlaybackPosition::new(139.0, 139);
        assert_eq!(end.neighbour(Direction::Forward), 139);
        assert_eq!(end.neighbour(Direction::Backward), 138);
        let start = PlaybackPosition::start(139);
        assert_eq!(start.neighbour(Direction::Backward), 0);
        assert_eq!(start.neighbour(Direction::Forward), 1);
    }

    #[test]
    fn test_direction_sign() {
        assert_eq!(Direction::Forward.sign(), 1);
        assert_eq!(Direction::Forward.reversed(), Direction::Backward);
        assert_eq!(Direction::default(), Direction::Forward);
    }
}
