//! Fixed-capacity buffer of raw press/release symbols.
//!
//! # Overview
//! - One producer (interrupt context) appends, one consumer drains.
//! - Capacity `N` is fixed at compile time; storage is inline, nothing allocates.
//! - Overflow policy is drop-new: once full, further appends are discarded and counted.
//! - Draining removes the oldest symbols first; the rest stay queued in order.
//!
//! # Locking
//! `EventBuffer` itself is plain data. [`TactSwitch`](crate::TactSwitch) keeps it inside
//! a critical-section mutex, so every append and drain runs with interrupts masked and
//! never observes a half-updated length.
//!
//! # Notes
//! Symbols carry no pin identity. A consumer sees only the ordered stream of
//! `'1'` (pressed) and `'0'` (released) codes across all monitored pins.

use heapless::Deque;

/// Default buffer capacity in symbols.
pub const EVENT_CAPACITY: usize = 256;

/// One recorded transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Symbol {
    Pressed,
    Released,
}

impl Symbol {
    /// Transport code: `b'1'` for pressed, `b'0'` for released.
    #[inline]
    pub const fn as_byte(self) -> u8 {
        match self {
            Symbol::Pressed => b'1',
            Symbol::Released => b'0',
        }
    }
}

pub struct EventBuffer<const N: usize> {
    symbols: Deque<Symbol, N>,
    dropped: u32,
}

impl<const N: usize> EventBuffer<N> {
    pub const fn new() -> Self {
        Self {
            symbols: Deque::new(),
            dropped: 0,
        }
    }

    /// Append `symbol` if there is room.
    /// Returns false when the buffer is full and the symbol was dropped.
    #[inline]
    pub fn try_append(&mut self, symbol: Symbol) -> bool {
        match self.symbols.push_back(symbol) {
            Ok(()) => true,
            Err(_) => {
                self.dropped = self.dropped.wrapping_add(1);
                false
            }
        }
    }

    /// Remove up to `out.len()` of the oldest symbols, writing their transport codes
    /// into `out`. Returns how many were written.
    pub fn drain_into(&mut self, out: &mut [u8]) -> usize {
        let mut written = 0usize;
        for slot in out.iter_mut() {
            match self.symbols.pop_front() {
                Some(symbol) => {
                    *slot = symbol.as_byte();
                    written += 1;
                }
                None => break,
            }
        }
        assert!(self.symbols.len() <= N);
        written
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Symbols discarded because the buffer was full.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl<const N: usize> Default for EventBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{EventBuffer, Symbol};

    #[test]
    fn drain_empty_returns_zero() {
        let mut buf = EventBuffer::<4>::new();
        let mut out = [0u8; 4];
        assert_eq!(buf.drain_into(&mut out), 0);
        assert!(buf.is_empty());
    }

    #[test]
    fn partial_drain_keeps_remainder_in_order() {
        let mut buf = EventBuffer::<8>::new();
        for s in [Symbol::Pressed, Symbol::Released, Symbol::Pressed, Symbol::Pressed] {
            assert!(buf.try_append(s));
        }

        let mut out = [0u8; 3];
        assert_eq!(buf.drain_into(&mut out), 3);
        assert_eq!(&out, b"101");
        assert_eq!(buf.len(), 1);

        let mut rest = [0u8; 8];
        assert_eq!(buf.drain_into(&mut rest), 1);
        assert_eq!(&rest[..1], b"1");
    }

    #[test]
    fn overflow_drops_newest() {
        let mut buf = EventBuffer::<4>::new();
        for _ in 0..4 {
            assert!(buf.try_append(Symbol::Pressed));
        }
        assert!(!buf.try_append(Symbol::Released));
        assert!(!buf.try_append(Symbol::Released));

        assert_eq!(buf.len(), 4);
        assert_eq!(buf.dropped(), 2);

        let mut out = [0u8; 8];
        assert_eq!(buf.drain_into(&mut out), 4);
        assert_eq!(&out[..4], b"1111");
    }

    #[test]
    fn room_frees_up_after_drain() {
        let mut buf = EventBuffer::<2>::new();
        assert!(buf.try_append(Symbol::Pressed));
        assert!(buf.try_append(Symbol::Released));
        assert!(!buf.try_append(Symbol::Pressed));

        let mut out = [0u8; 1];
        assert_eq!(buf.drain_into(&mut out), 1);
        assert!(buf.try_append(Symbol::Pressed));

        let mut out = [0u8; 2];
        assert_eq!(buf.drain_into(&mut out), 2);
        assert_eq!(&out, b"01");
    }

    #[test]
    fn byte_codes() {
        assert_eq!(Symbol::Pressed.as_byte(), b'1');
        assert_eq!(Symbol::Released.as_byte(), b'0');
    }
}
