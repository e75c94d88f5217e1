//! START/STOP notifications and the consumer's receiving end.
//!
//! # Delivery
//! Delivery is fire-and-forget. The sender pushes into the consumer's [`Mailbox`] with a
//! non-blocking `try_send` and never waits for the consumer to act. If the mailbox is
//! full the notification is dropped and counted in [`Mailbox::missed`]. Notifications
//! sent while no consumer is registered are dropped and never replayed.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

#[cfg(not(feature = "portable-atomic"))]
use core::sync::atomic::{AtomicU32, Ordering};
#[cfg(feature = "portable-atomic")]
use portable_atomic::{AtomicU32, Ordering};

/// Pending notifications a mailbox holds before dropping new ones.
pub const MAILBOX_DEPTH: usize = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    Start,
    Stop,
}

/// Identity of a registered consumer (a process id on hosted systems).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConsumerId(pub u32);

impl core::fmt::Display for ConsumerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "consumer#{}", self.0)
    }
}

/// Receiving end owned by the consumer.
pub struct Mailbox {
    queue: Channel<CriticalSectionRawMutex, Notification, MAILBOX_DEPTH>,
    missed: AtomicU32,
}

impl Mailbox {
    pub const fn new() -> Self {
        Self {
            queue: Channel::new(),
            missed: AtomicU32::new(0),
        }
    }

    /// Push without waiting. Safe from interrupt context.
    #[inline]
    pub fn deliver(&self, kind: Notification) -> bool {
        if self.queue.try_send(kind).is_ok() {
            true
        } else {
            self.missed.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    /// Wait for the next notification.
    pub async fn receive(&self) -> Notification {
        self.queue.receive().await
    }

    #[inline]
    pub fn try_receive(&self) -> Option<Notification> {
        self.queue.try_receive().ok()
    }

    /// Deliveries dropped because the mailbox was full.
    #[inline]
    pub fn missed(&self) -> u32 {
        self.missed.load(Ordering::Relaxed)
    }
}

impl Default for Mailbox {
    fn default() -> Self {
        Self::new()
    }
}

/// A consumer identity bound to its mailbox.
#[derive(Copy, Clone)]
pub struct Registration<'a> {
    pub id: ConsumerId,
    pub mailbox: &'a Mailbox,
}

impl<'a> Registration<'a> {
    #[inline]
    pub fn notify(&self, kind: Notification) -> bool {
        self.mailbox.deliver(kind)
    }
}

impl core::fmt::Debug for Registration<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registration").field("id", &self.id).finish()
    }
}
