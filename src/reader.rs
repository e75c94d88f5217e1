//! Consumer-side read interface.
//!
//! A [`Reader`] is the only handle that drains the event buffer. At most one exists per
//! device; [`TactSwitch::reader`](crate::TactSwitch::reader) fails with
//! [`Error::Busy`] while one is alive.
//!
//! [`Reader::read`] waits until at least one symbol is buffered, then drains as many as
//! fit in the destination. The wait ends early with [`Error::Interrupted`] when
//! [`TactSwitch::interrupt_reader`](crate::TactSwitch::interrupt_reader) is called, or with
//! [`Error::Closed`] on teardown. There is no timeout.

use core::future::poll_fn;
use core::task::Poll;

use crate::device::TactSwitch;
use crate::error::Error;

pub struct Reader<'d, 'a, const K: usize, const N: usize> {
    dev: &'d TactSwitch<'a, K, N>,
}

impl<'d, 'a, const K: usize, const N: usize> Reader<'d, 'a, K, N> {
    pub(crate) fn new(dev: &'d TactSwitch<'a, K, N>) -> Self {
        Self { dev }
    }

    /// Wait for events and drain up to `buf.len()` of them as `b'1'`/`b'0'` codes.
    ///
    /// Never returns `Ok(0)`.
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        if buf.is_empty() {
            return Err(Error::InvalidArgument);
        }

        let _waiting = WaitGuard { dev: self.dev };
        poll_fn(|cx| {
            critical_section::with(|cs| {
                let mut shared = self.dev.shared.borrow_ref_mut(cs);
                if shared.closed {
                    return Poll::Ready(Err(Error::Closed));
                }
                if shared.cancel_pending {
                    return Poll::Ready(Err(Error::Interrupted));
                }
                if !shared.events.is_empty() {
                    let n = shared.events.drain_into(&mut *buf);
                    return Poll::Ready(Ok(n));
                }
                shared.reader_waiting = true;
                shared.reader_waker.register(cx.waker());
                Poll::Pending
            })
        })
        .await
    }

    /// [`read`](Self::read) driven to completion on the calling thread.
    ///
    /// This spins: `embassy_futures::block_on` re-polls with a no-op waker, entering and
    /// leaving a critical section on every pass, and the interrupt path contends for the
    /// same lock while it does. Callers with an executor should await `read` instead.
    pub fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        embassy_futures::block_on(self.read(buf))
    }
}

impl<const K: usize, const N: usize> Drop for Reader<'_, '_, K, N> {
    fn drop(&mut self) {
        critical_section::with(|cs| {
            self.dev.shared.borrow_ref_mut(cs).reader_open = false;
        });
    }
}

/// Clears the waiting state when a read finishes or its future is dropped, so a later
/// cancel cannot hit a read that is no longer pending.
struct WaitGuard<'d, 'a, const K: usize, const N: usize> {
    dev: &'d TactSwitch<'a, K, N>,
}

impl<const K: usize, const N: usize> Drop for WaitGuard<'_, '_, K, N> {
    fn drop(&mut self) {
        critical_section::with(|cs| {
            let mut shared = self.dev.shared.borrow_ref_mut(cs);
            shared.reader_waiting = false;
            shared.cancel_pending = false;
        });
    }
}
