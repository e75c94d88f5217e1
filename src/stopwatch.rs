//! Consumer-side elapsed-seconds counter driven by START/STOP notifications.
//!
//! # States
//! - `Idle` (initial): count is 0, no tick source armed.
//! - `Running`: a periodic 1-second tick increments the count.
//!
//! START from either state re-arms the tick and restarts the count at 0. STOP from
//! `Running` cancels the tick, reports the total and resets to `Idle`; STOP while idle
//! does nothing. Ticks are only awaited while running, and the tick source is cancelled
//! on STOP, so a late tick cannot bump a reset counter.

use embassy_futures::select::{Either, select};
use log::{info, trace};

use crate::notify::{Mailbox, Notification};

/// Periodic 1-second tick.
pub trait TickSource {
    /// Arm (or re-arm) the tick; the first tick comes one period from now.
    fn restart(&mut self);
    /// Disarm the tick. Pending ticks are discarded.
    fn cancel(&mut self);
    /// Resolve on the next tick. Only polled while armed.
    fn next_tick(&mut self) -> impl Future<Output = ()>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
}

/// What the consumer reports after handling an input.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Report {
    Started,
    Tick(u32),
    Stopped { total: u32 },
}

pub struct Stopwatch<T: TickSource> {
    ticks: T,
    state: TimerState,
    elapsed: u32,
}

impl<T: TickSource> Stopwatch<T> {
    pub fn new(ticks: T) -> Self {
        Self {
            ticks,
            state: TimerState::Idle,
            elapsed: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> TimerState {
        self.state
    }

    #[inline]
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    #[inline]
    pub fn ticks(&self) -> &T {
        &self.ticks
    }

    pub fn on_notification(&mut self, kind: Notification) -> Option<Report> {
        match (kind, self.state) {
            (Notification::Start, _) => {
                self.ticks.restart();
                self.elapsed = 0;
                self.state = TimerState::Running;
                info!("timer started");
                Some(Report::Started)
            }
            (Notification::Stop, TimerState::Running) => {
                self.ticks.cancel();
                let total = self.elapsed;
                self.elapsed = 0;
                self.state = TimerState::Idle;
                info!("timer stopped, total={total}");
                Some(Report::Stopped { total })
            }
            (Notification::Stop, TimerState::Idle) => None,
        }
    }

    pub fn on_tick(&mut self) -> Option<Report> {
        if self.state != TimerState::Running {
            trace!("tick while idle ignored");
            return None;
        }
        self.elapsed += 1;
        info!("elapsed={}", self.elapsed);
        Some(Report::Tick(self.elapsed))
    }

    /// Wait for the next notification or tick and apply it.
    pub async fn step(&mut self, mailbox: &Mailbox) -> Option<Report> {
        match self.state {
            TimerState::Idle => {
                let kind = mailbox.receive().await;
                self.on_notification(kind)
            }
            TimerState::Running => match select(mailbox.receive(), self.ticks.next_tick()).await {
                Either::First(kind) => self.on_notification(kind),
                Either::Second(()) => self.on_tick(),
            },
        }
    }

    /// Consumer main loop.
    pub async fn run(&mut self, mailbox: &Mailbox) -> ! {
        loop {
            let _ = self.step(mailbox).await;
        }
    }
}

#[cfg(feature = "embassy-time")]
pub use self::ticker::SecondTicker;

#[cfg(feature = "embassy-time")]
mod ticker {
    use embassy_time::{Duration, Ticker};

    use super::TickSource;

    /// [`TickSource`] backed by an `embassy_time::Ticker`.
    #[derive(Default)]
    pub struct SecondTicker {
        ticker: Option<Ticker>,
    }

    impl SecondTicker {
        pub const fn new() -> Self {
            Self { ticker: None }
        }
    }

    impl TickSource for SecondTicker {
        fn restart(&mut self) {
            self.ticker = Some(Ticker::every(Duration::from_secs(1)));
        }

        fn cancel(&mut self) {
            self.ticker = None;
        }

        async fn next_tick(&mut self) {
            match self.ticker.as_mut() {
                Some(ticker) => ticker.next().await,
                None => core::future::pending().await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Report, Stopwatch, TickSource, TimerState};
    use crate::notify::{Mailbox, Notification};
    use embassy_futures::block_on;

    /// Tick source fed by the test: `pending` ticks resolve immediately, none blocks.
    #[derive(Default)]
    struct ManualTicks {
        armed: bool,
        pending: u32,
        restarts: u32,
        cancels: u32,
    }

    impl TickSource for ManualTicks {
        fn restart(&mut self) {
            self.armed = true;
            self.pending = 0;
            self.restarts += 1;
        }

        fn cancel(&mut self) {
            self.armed = false;
            self.pending = 0;
            self.cancels += 1;
        }

        async fn next_tick(&mut self) {
            assert!(self.armed, "tick awaited while disarmed");
            if self.pending == 0 {
                core::future::pending::<()>().await;
            }
            self.pending -= 1;
        }
    }

    fn fire(sw: &mut Stopwatch<ManualTicks>, n: u32) {
        sw.ticks.pending += n;
    }

    #[test]
    fn start_three_ticks_stop_reports_three() {
        let mut sw = Stopwatch::new(ManualTicks::default());
        assert_eq!(sw.on_notification(Notification::Start), Some(Report::Started));
        for expected in 1..=3 {
            assert_eq!(sw.on_tick(), Some(Report::Tick(expected)));
        }
        assert_eq!(
            sw.on_notification(Notification::Stop),
            Some(Report::Stopped { total: 3 })
        );
        assert_eq!(sw.elapsed(), 0);
        assert_eq!(sw.state(), TimerState::Idle);
        assert_eq!(sw.ticks().cancels, 1);

        let _ = sw.on_notification(Notification::Start);
        assert_eq!(sw.on_tick(), Some(Report::Tick(1)));
    }

    #[test]
    fn start_while_running_restarts_from_zero() {
        let mut sw = Stopwatch::new(ManualTicks::default());
        let _ = sw.on_notification(Notification::Start);
        let _ = sw.on_tick();
        let _ = sw.on_tick();
        assert_eq!(sw.on_notification(Notification::Start), Some(Report::Started));
        assert_eq!(sw.elapsed(), 0);
        assert_eq!(sw.ticks().restarts, 2);
        assert_eq!(sw.on_tick(), Some(Report::Tick(1)));
    }

    #[test]
    fn stop_while_idle_is_noop() {
        let mut sw = Stopwatch::new(ManualTicks::default());
        assert_eq!(sw.on_notification(Notification::Stop), None);
        assert_eq!(sw.ticks().cancels, 0);
        assert_eq!(sw.on_tick(), None);
        assert_eq!(sw.elapsed(), 0);
    }

    #[test]
    fn step_interleaves_ticks_and_notifications() {
        let mb = Mailbox::new();
        let mut sw = Stopwatch::new(ManualTicks::default());

        mb.deliver(Notification::Start);
        assert_eq!(block_on(sw.step(&mb)), Some(Report::Started));

        fire(&mut sw, 3);
        for expected in 1..=3 {
            assert_eq!(block_on(sw.step(&mb)), Some(Report::Tick(expected)));
        }

        mb.deliver(Notification::Stop);
        assert_eq!(block_on(sw.step(&mb)), Some(Report::Stopped { total: 3 }));
        assert!(!sw.ticks().armed);

        mb.deliver(Notification::Start);
        assert_eq!(block_on(sw.step(&mb)), Some(Report::Started));
        fire(&mut sw, 1);
        assert_eq!(block_on(sw.step(&mb)), Some(Report::Tick(1)));
    }

    #[test]
    fn notification_wins_over_queued_tick() {
        let mb = Mailbox::new();
        let mut sw = Stopwatch::new(ManualTicks::default());
        let _ = sw.on_notification(Notification::Start);
        fire(&mut sw, 1);

        mb.deliver(Notification::Stop);
        assert_eq!(block_on(sw.step(&mb)), Some(Report::Stopped { total: 0 }));
        // Cancel discarded the queued tick.
        assert_eq!(sw.ticks().pending, 0);
    }
}
