//! Combination tracking for concurrently held buttons.
//!
//! The mask is the running sum of the weights of every button pressed since the last
//! release. A button that is already counted is never added twice, so the sum stays a
//! valid bitmask even when the hardware reports a bouncing press. Any release clears
//! the whole mask, whichever button it came from.

use crate::notify::Notification;
use crate::pins::weight;

/// Trigger table: exact mask value to notification.
/// Masks not listed (a lone left button, every chord) fire nothing.
pub const TRIGGERS: [(u8, Notification); 2] = [(1, Notification::Start), (2, Notification::Stop)];

/// Look up the action for `mask`.
#[inline]
pub fn trigger_for(mask: u8) -> Option<Notification> {
    TRIGGERS
        .iter()
        .find(|(m, _)| *m == mask)
        .map(|(_, n)| *n)
}

/// Result of recording a press.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Press {
    /// The mask moved to this value.
    Counted(u8),
    /// The button was already part of the mask; nothing changed.
    AlreadyHeld(u8),
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ComboTracker {
    mask: u8,
}

impl ComboTracker {
    pub const fn new() -> Self {
        Self { mask: 0 }
    }

    /// Add the weight of button `index`.
    pub fn press(&mut self, index: usize) -> Press {
        debug_assert!(index < 8);
        let w = weight(index);
        if self.mask & w != 0 {
            return Press::AlreadyHeld(self.mask);
        }
        self.mask += w;
        Press::Counted(self.mask)
    }

    #[inline]
    pub fn release(&mut self) {
        self.mask = 0;
    }

    #[inline]
    pub fn mask(&self) -> u8 {
        self.mask
    }
}

/// Number of buttons held in `mask`.
#[inline]
pub fn held_count(mask: u8) -> u32 {
    mask.count_ones()
}
