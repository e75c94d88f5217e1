//! Tact switch monitor for no-std embedded targets.
//!
//! # Highlights
//! - Interrupt-context button monitor that never blocks or allocates.
//! - Bounded press/release buffer drained by a single blocking reader.
//! - Combination tracking with START/STOP notifications to one registered consumer.
//! - Consumer-side stopwatch driven by those notifications.
//!
//! # Quick start
//! ```
//! use tactsw::{ARMADILLO_440, ConsumerId, Level, Mailbox, Notification, TactSwitch};
//!
//! static MAILBOX: Mailbox = Mailbox::new();
//! static DEVICE: TactSwitch<'static, 3> = TactSwitch::new(ARMADILLO_440);
//!
//! DEVICE.begin_watching(ConsumerId(42), &MAILBOX);
//!
//! // Interrupt context: the right button is pushed (the line goes low).
//! DEVICE.on_transition(52, Level::Low);
//! assert_eq!(MAILBOX.try_receive(), Some(Notification::Start));
//!
//! let mut reader = DEVICE.reader().unwrap();
//! let mut buf = [0u8; 16];
//! let n = reader.read_blocking(&mut buf).unwrap();
//! assert_eq!(&buf[..n], b"1");
//! ```
//!
//! # No-std
//! The crate is `#![no_std]`. Shared state is guarded with `critical-section`, so the
//! final binary must link a critical-section implementation for its target. Tests use the
//! `std` implementation.
//!
//! # Concurrency
//! [`TactSwitch::on_transition`] is the interrupt-context entry point. Exactly one
//! [`Reader`] may exist at a time; [`TactSwitch::reader`] returns [`Error::Busy`]
//! otherwise. Notifications reach the consumer through its [`Mailbox`] and are consumed by
//! a [`Stopwatch`] running in the consumer's own context.
//!
//! # Semantics
//! - The buffer stores `'1'` (pressed) and `'0'` (released) without pin identity.
//! - When the buffer is full, new symbols are dropped.
//! - Any release clears the combination mask; START fires on mask 1, STOP on mask 2.
//! - Registering a new consumer replaces the previous one.
#![no_std]

pub mod combo;
pub mod device;
pub mod error;
pub mod event_buffer;
pub mod notify;
pub mod pins;
pub mod reader;
pub mod stopwatch;

pub use combo::{ComboTracker, Press, TRIGGERS, trigger_for};
pub use device::{IrqReturn, Status, TactSwitch};
pub use error::Error;
pub use event_buffer::{EVENT_CAPACITY, EventBuffer, Symbol};
pub use notify::{ConsumerId, MAILBOX_DEPTH, Mailbox, Notification, Registration};
pub use pins::{ARMADILLO_440, ButtonPin, Level, PinMap, Polarity, weight};
pub use reader::Reader;
pub use stopwatch::{Report, Stopwatch, TickSource, TimerState};

#[cfg(feature = "embassy-time")]
pub use stopwatch::SecondTicker;

#[cfg(test)]
extern crate std;
