//! Monitored pin table.
//!
//! Each entry maps a hardware GPIO number to a button index. The index fixes the button's
//! weight in the combination mask (`1 << index`), so table order matters: index 0 is the
//! START button and index 1 the STOP button.

/// Electrical level reported by the hardware callback.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

/// Which level means "pressed".
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Polarity {
    /// Pull-up wiring: the pin reads low while the button is held.
    #[default]
    ActiveLow,
    ActiveHigh,
}

impl Polarity {
    #[inline]
    pub const fn is_asserted(self, level: Level) -> bool {
        matches!(
            (self, level),
            (Polarity::ActiveLow, Level::Low) | (Polarity::ActiveHigh, Level::High)
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ButtonPin {
    pub gpio: u32,
    pub name: &'static str,
}

impl ButtonPin {
    pub const fn new(gpio: u32, name: &'static str) -> Self {
        Self { gpio, name }
    }
}

/// Fixed set of monitored buttons, at most 8.
#[derive(Copy, Clone, Debug)]
pub struct PinMap<const K: usize> {
    pins: [ButtonPin; K],
    polarity: Polarity,
}

impl<const K: usize> PinMap<K> {
    pub const fn new(pins: [ButtonPin; K], polarity: Polarity) -> Self {
        assert!(K > 0 && K <= 8);
        Self { pins, polarity }
    }

    /// Index of the button wired to `gpio`, if it is monitored.
    #[inline]
    pub fn index_of(&self, gpio: u32) -> Option<usize> {
        self.pins.iter().position(|p| p.gpio == gpio)
    }

    #[inline]
    pub fn pin(&self, index: usize) -> Option<&ButtonPin> {
        self.pins.get(index)
    }

    #[inline]
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    #[inline]
    pub fn len(&self) -> usize {
        K
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        K == 0
    }
}

/// Mask weight of button `index`.
#[inline]
pub const fn weight(index: usize) -> u8 {
    1u8 << index
}

/// Armadillo-440 LCD extension board: right, middle and left tact switches.
pub const ARMADILLO_440: PinMap<3> = PinMap::new(
    [
        ButtonPin::new(52, "right"),
        ButtonPin::new(61, "middle"),
        ButtonPin::new(62, "left"),
    ],
    Polarity::ActiveLow,
);

#[cfg(test)]
mod tests {
    use super::{ARMADILLO_440, Level, Polarity, weight};

    #[test]
    fn armadillo_weights_follow_table_order() {
        assert_eq!(ARMADILLO_440.index_of(52), Some(0));
        assert_eq!(ARMADILLO_440.index_of(61), Some(1));
        assert_eq!(ARMADILLO_440.index_of(62), Some(2));
        assert_eq!(ARMADILLO_440.index_of(7), None);

        assert_eq!(weight(0), 1);
        assert_eq!(weight(1), 2);
        assert_eq!(weight(2), 4);
    }

    #[test]
    fn polarity_decides_pressed_level() {
        assert!(Polarity::ActiveLow.is_asserted(Level::Low));
        assert!(!Polarity::ActiveLow.is_asserted(Level::High));
        assert!(Polarity::ActiveHigh.is_asserted(Level::High));
        assert!(!Polarity::ActiveHigh.is_asserted(Level::Low));
    }
}
