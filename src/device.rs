//! Button monitor, consumer registration and notification dispatch.
//!
//! # Execution contexts
//! - [`TactSwitch::on_transition`] runs in interrupt context. It never blocks and never
//!   allocates. Its critical section covers one append and one mask update.
//! - [`Reader`](crate::Reader) runs in the consumer context and may wait indefinitely.
//! - Registration calls come from a normal control path.
//!
//! Every piece of shared state lives behind one `critical_section::Mutex`, so the
//! interrupt handler and the reader exclude each other by masking interrupts rather than
//! by spinning. Notifications are delivered after the critical section ends.
//!
//! # Lifecycle
//! Build one `TactSwitch` at system start (a `static` works, `new` is `const`), hand
//! `&TactSwitch` to the hardware callback and to the consumer, and call
//! [`TactSwitch::close`] at shutdown to release a blocked reader.

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_sync::waitqueue::WakerRegistration;
use log::{debug, info, trace, warn};

use crate::combo::{ComboTracker, Press, held_count, trigger_for};
use crate::error::Error;
use crate::event_buffer::{EVENT_CAPACITY, EventBuffer, Symbol};
use crate::notify::{ConsumerId, Mailbox, Notification, Registration};
use crate::pins::{Level, PinMap, weight};
use crate::reader::Reader;

/// Whether the callback belonged to a monitored pin.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IrqReturn {
    Handled,
    NotHandled,
}

/// Point-in-time view of the device.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Status {
    pub mask: u8,
    pub buffered: usize,
    pub dropped: u32,
    pub consumer: Option<ConsumerId>,
    pub reader_open: bool,
}

pub(crate) struct Shared<'a, const N: usize> {
    pub(crate) events: EventBuffer<N>,
    pub(crate) combo: ComboTracker,
    pub(crate) consumer: Option<Registration<'a>>,
    pub(crate) reader_waker: WakerRegistration,
    pub(crate) reader_open: bool,
    pub(crate) reader_waiting: bool,
    pub(crate) cancel_pending: bool,
    pub(crate) closed: bool,
}

impl<'a, const N: usize> Shared<'a, N> {
    const fn new() -> Self {
        Self {
            events: EventBuffer::new(),
            combo: ComboTracker::new(),
            consumer: None,
            reader_waker: WakerRegistration::new(),
            reader_open: false,
            reader_waiting: false,
            cancel_pending: false,
            closed: false,
        }
    }
}

/// What a transition did, computed under the lock and logged after it.
enum Outcome<'a> {
    Released,
    Duplicate(u8),
    Mask {
        mask: u8,
        fire: Option<(Notification, Option<Registration<'a>>)>,
    },
}

/// Names of every button in `mask`, joined with " & ".
struct HeldNames<'p, const K: usize> {
    pins: &'p PinMap<K>,
    mask: u8,
}

impl<const K: usize> core::fmt::Display for HeldNames<'_, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut names = (0..K)
            .filter(|&i| self.mask & weight(i) != 0)
            .filter_map(|i| self.pins.pin(i).map(|p| p.name));
        if let Some(first) = names.next() {
            f.write_str(first)?;
        }
        for name in names {
            write!(f, " & {name}")?;
        }
        Ok(())
    }
}

/// Monitor for `K` buttons with an `N`-symbol event buffer.
pub struct TactSwitch<'a, const K: usize, const N: usize = EVENT_CAPACITY> {
    pins: PinMap<K>,
    pub(crate) shared: Mutex<RefCell<Shared<'a, N>>>,
}

impl<'a, const K: usize, const N: usize> TactSwitch<'a, K, N> {
    pub const fn new(pins: PinMap<K>) -> Self {
        assert!(N > 0);
        Self {
            pins,
            shared: Mutex::new(RefCell::new(Shared::new())),
        }
    }

    #[inline]
    pub fn pins(&self) -> &PinMap<K> {
        &self.pins
    }

    /// Hardware callback: `gpio` changed to `level`.
    ///
    /// Appends the symbol (dropped if the buffer is full), updates the combination mask
    /// and, when the mask exactly matches a trigger, notifies the registered consumer.
    pub fn on_transition(&self, gpio: u32, level: Level) -> IrqReturn {
        let Some(index) = self.pins.index_of(gpio) else {
            return IrqReturn::NotHandled;
        };
        let symbol = if self.pins.polarity().is_asserted(level) {
            Symbol::Pressed
        } else {
            Symbol::Released
        };

        let outcome = critical_section::with(|cs| {
            let mut shared = self.shared.borrow_ref_mut(cs);
            if shared.closed {
                return None;
            }
            if shared.events.try_append(symbol) {
                shared.reader_waker.wake();
            }
            Some(match symbol {
                Symbol::Released => {
                    shared.combo.release();
                    Outcome::Released
                }
                Symbol::Pressed => match shared.combo.press(index) {
                    Press::AlreadyHeld(mask) => Outcome::Duplicate(mask),
                    Press::Counted(mask) => Outcome::Mask {
                        mask,
                        fire: trigger_for(mask).map(|kind| (kind, shared.consumer)),
                    },
                },
            })
        });

        let name = self.pins.pin(index).map_or("?", |p| p.name);
        match outcome {
            None => trace!("transition on gpio {gpio} after close ignored"),
            Some(Outcome::Released) => trace!("{name} released, mask cleared"),
            Some(Outcome::Duplicate(mask)) => {
                warn!("{name} pressed again without release, mask stays {mask}")
            }
            Some(Outcome::Mask { mask, fire }) => {
                trace!("{name} pressed, mask = {mask}");
                match fire {
                    Some((kind, consumer)) => self.dispatch(kind, consumer, name),
                    None => self.log_combo(mask),
                }
            }
        }
        IrqReturn::Handled
    }

    fn dispatch(&self, kind: Notification, consumer: Option<Registration<'a>>, name: &str) {
        info!("{kind:?} >>>> only {name} button is pressed");
        match consumer {
            Some(reg) => {
                if !reg.notify(kind) {
                    debug!("{} mailbox full, {kind:?} dropped", reg.id);
                }
            }
            None => debug!("no consumer registered, {kind:?} dropped"),
        }
    }

    fn log_combo(&self, mask: u8) {
        let held = held_count(mask);
        if held == 1 {
            if let Some(pin) = self.pins.pin(mask.trailing_zeros() as usize) {
                debug!("only {} button is pressed", pin.name);
            }
        } else if held as usize == K {
            debug!("all buttons are pressed");
        } else {
            let names = HeldNames {
                pins: &self.pins,
                mask,
            };
            debug!("{names} buttons are pressed (mask = {mask})");
        }
    }

    /// Register `id` as the consumer to notify, replacing any previous registration.
    /// Returns the identity that was replaced.
    pub fn begin_watching(&self, id: ConsumerId, mailbox: &'a Mailbox) -> Option<ConsumerId> {
        let previous = critical_section::with(|cs| {
            let mut shared = self.shared.borrow_ref_mut(cs);
            shared
                .consumer
                .replace(Registration { id, mailbox })
                .map(|r| r.id)
        });
        match previous {
            Some(old) if old != id => warn!("{old} replaced by {id} without stop_watching"),
            _ => debug!("{id} watching"),
        }
        previous
    }

    /// Clear the registration. Returns the identity that was removed.
    pub fn stop_watching(&self) -> Option<ConsumerId> {
        let previous = critical_section::with(|cs| {
            self.shared.borrow_ref_mut(cs).consumer.take().map(|r| r.id)
        });
        if let Some(id) = previous {
            debug!("{id} stopped watching");
        }
        previous
    }

    /// Send `kind` to the registered consumer, if any.
    /// Returns true when the notification reached a mailbox.
    pub fn notify(&self, kind: Notification) -> bool {
        let consumer = critical_section::with(|cs| self.shared.borrow_ref(cs).consumer);
        match consumer {
            Some(reg) => reg.notify(kind),
            None => {
                debug!("no consumer registered, {kind:?} dropped");
                false
            }
        }
    }

    /// Open the single reader handle.
    pub fn reader(&self) -> Result<Reader<'_, 'a, K, N>, Error> {
        critical_section::with(|cs| {
            let mut shared = self.shared.borrow_ref_mut(cs);
            if shared.closed {
                return Err(Error::Closed);
            }
            if shared.reader_open {
                return Err(Error::Busy);
            }
            shared.reader_open = true;
            Ok(())
        })?;
        Ok(Reader::new(self))
    }

    /// Cancel a read that is currently blocked; it returns [`Error::Interrupted`].
    /// Has no effect when no read is waiting.
    pub fn interrupt_reader(&self) -> bool {
        critical_section::with(|cs| {
            let mut shared = self.shared.borrow_ref_mut(cs);
            if !shared.reader_waiting {
                return false;
            }
            shared.cancel_pending = true;
            shared.reader_waker.wake();
            true
        })
    }

    /// Tear down: ignore further transitions and release a blocked reader with
    /// [`Error::Closed`].
    pub fn close(&self) {
        let waiting = critical_section::with(|cs| {
            let mut shared = self.shared.borrow_ref_mut(cs);
            shared.closed = true;
            shared.consumer = None;
            shared.reader_waker.wake();
            shared.reader_waiting
        });
        if waiting {
            info!("closing with a waiting reader, waking it");
        }
    }

    pub fn status(&self) -> Status {
        critical_section::with(|cs| {
            let shared = self.shared.borrow_ref(cs);
            Status {
                mask: shared.combo.mask(),
                buffered: shared.events.len(),
                dropped: shared.events.dropped(),
                consumer: shared.consumer.map(|r| r.id),
                reader_open: shared.reader_open,
            }
        })
    }
}
