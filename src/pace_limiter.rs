// src/pace_limiter.rs

// pace-limiter: a sliding-window rate limiter with jittered pacing.

// dependencies
use crate::clock::{Clock, MonotonicClock};
use crate::config::PaceLimiterConfig;
use crate::errors::{PaceLimiterError, RequestError};
use crate::jitter::{Jitter, UniformJitter};
use crate::transport::{Method, RequestOptions, Transport};
use crate::window::SlidingWindow;
use parking_lot::Mutex;
use std::fmt;
use std::future::{Future, pending};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// The main PaceLimiter model.
/// T is the transport admitted requests are forwarded to.
/// C is the clock type, defaulting to MonotonicClock.
/// One instance per target host; share it behind an `Arc` between callers.
pub struct PaceLimiter<T, C = MonotonicClock>
where
    T: Transport,
    C: Clock,
{
    config: PaceLimiterConfig,
    window_nanos: u64,
    window: Mutex<SlidingWindow>,
    released: Notify,
    jitter: Arc<dyn Jitter>,
    transport: T,
    clock: C,
}

/// What the admission protocol did for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    /// Total time spent waiting for the hard cap to clear
    pub hard_wait: Duration,
    /// Pacing delay applied; always zero when `hard_wait` is not
    pub jitter: Duration,
    /// Recorded requests still in the window at the moment this one was
    /// recorded, including this one
    pub in_window: usize,
    /// Timestamp recorded for this request (clock nanoseconds)
    pub recorded_at_nanos: u64,
}

impl<T> PaceLimiter<T, MonotonicClock>
where
    T: Transport,
{
    /// Create a limiter with the default window (60s), limit (120) and jitter
    pub fn new(base_url: impl Into<String>, transport: T) -> Result<Self, PaceLimiterError> {
        Self::with_config(
            PaceLimiterConfig::new(base_url),
            transport,
            MonotonicClock::new(),
        )
    }
}

// methods for the PaceLimiter type
impl<T, C> PaceLimiter<T, C>
where
    T: Transport,
    C: Clock,
{
    // method to create a new limiter from a config object
    pub fn with_config(
        config: PaceLimiterConfig,
        transport: T,
        clock: C,
    ) -> Result<Self, PaceLimiterError> {
        config.validate()?;
        let window_nanos = u64::try_from(config.window.as_nanos()).unwrap_or(u64::MAX);

        Ok(Self {
            config,
            window_nanos,
            window: Mutex::new(SlidingWindow::new()),
            released: Notify::new(),
            jitter: Arc::new(UniformJitter),
            transport,
            clock,
        })
    }

    /// Builder-style: replace the pacing strategy
    pub fn with_jitter(self, jitter: impl Jitter + 'static) -> Self {
        self.with_shared_jitter(Arc::new(jitter))
    }

    pub(crate) fn with_shared_jitter(mut self, jitter: Arc<dyn Jitter>) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn config(&self) -> &PaceLimiterConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn window(&self) -> Duration {
        self.config.window
    }

    pub fn request_limit(&self) -> u32 {
        self.config.request_limit
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Recorded timestamps currently held, without pruning first
    pub fn recorded_requests(&self) -> usize {
        self.window.lock().recorded()
    }

    /// Callers admitted but still in their pacing delay
    pub fn pending_requests(&self) -> usize {
        self.window.lock().pending()
    }

    /// True when nothing is recorded and nobody is mid-admission
    pub fn is_idle(&self) -> bool {
        let window = self.window.lock();
        window.recorded() == 0 && window.pending() == 0
    }

    /// Run the admission protocol: prune, check the hard cap, wait, record.
    ///
    /// The lock is never held across a wait. A caller at the cap sleeps until
    /// the oldest entry ages out, or until another caller gives up its
    /// reservation, and then re-runs the whole check. A caller
    /// under the cap takes a reservation, which counts against the cap while
    /// it sleeps through its jitter, and turns it into a record afterwards.
    ///
    /// If `cancel` fires during a wait, nothing is recorded and
    /// `PaceLimiterError::Cancelled` is returned.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<Admission, PaceLimiterError> {
        if cancel.is_cancelled() {
            return Err(PaceLimiterError::Cancelled);
        }

        let limit = self.config.request_limit as usize;
        let mut hard_wait = Duration::ZERO;
        let mut hit_cap = false;

        let reservation = loop {
            // registered before the check so a release in between is not missed
            let released = self.released.notified();
            let now = self.clock.now()?;
            let blocked = {
                let mut window = self.window.lock();
                window.prune(now, self.window_nanos);
                if window.occupancy() < limit {
                    window.reserve();
                    None
                } else {
                    Some((
                        window.wait_for_slot(now, self.window_nanos),
                        window.occupancy(),
                    ))
                }
            };

            match blocked {
                None => break Reservation::new(&self.window, &self.released),
                Some((wait_nanos, occupancy)) => {
                    let wait = Duration::from_nanos(wait_nanos);
                    debug!(
                        base_url = %self.config.base_url,
                        occupancy,
                        limit,
                        wait_ms = wait.as_millis() as u64,
                        "request limit reached, waiting for the window to slide"
                    );
                    hit_cap = true;
                    self.pause(wait, released, cancel).await?;
                    let woke = self.clock.now()?;
                    hard_wait += Duration::from_nanos(woke.saturating_sub(now));
                }
            }
        };

        let jitter = if hit_cap {
            Duration::ZERO
        } else {
            self.jitter.delay(&self.config)
        };
        if !jitter.is_zero() {
            trace!(jitter_ms = jitter.as_millis() as u64, "pacing request");
            self.pause(jitter, pending::<()>(), cancel).await?;
        }

        let now = self.clock.now()?;
        let (recorded_at_nanos, in_window) = reservation.commit(now, self.window_nanos);
        trace!(recorded_at_nanos, in_window, "request recorded");

        Ok(Admission {
            hard_wait,
            jitter,
            in_window,
            recorded_at_nanos,
        })
    }

    // sleep on the clock until it elapses, `wake` fires, or the caller cancels
    async fn pause(
        &self,
        duration: Duration,
        wake: impl Future<Output = ()>,
        cancel: &CancellationToken,
    ) -> Result<(), PaceLimiterError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(base_url = %self.config.base_url, "admission cancelled");
                Err(PaceLimiterError::Cancelled)
            }
            _ = wake => {
                trace!("reservation released, re-checking the window");
                Ok(())
            }
            _ = self.clock.sleep(duration) => Ok(()),
        }
    }

    /// Admit and send a request. `path` is appended to the base URL as is.
    /// The transport's result comes back unmodified; a failed request
    /// still counts against the limit.
    pub async fn request_with_cancel(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
        cancel: &CancellationToken,
    ) -> Result<T::Response, RequestError<T::Error>> {
        self.acquire(cancel).await?;
        let url = combine_url(&self.config.base_url, path);
        self.transport
            .send(method, &url, options)
            .await
            .map_err(RequestError::Transport)
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<T::Response, RequestError<T::Error>> {
        self.request_with_cancel(method, path, options, &CancellationToken::new())
            .await
    }

    pub async fn get(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T::Response, RequestError<T::Error>> {
        self.request(Method::GET, path, options).await
    }

    pub async fn put(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T::Response, RequestError<T::Error>> {
        self.request(Method::PUT, path, options).await
    }

    pub async fn post(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T::Response, RequestError<T::Error>> {
        self.request(Method::POST, path, options).await
    }

    pub async fn patch(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T::Response, RequestError<T::Error>> {
        self.request(Method::PATCH, path, options).await
    }

    pub async fn delete(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T::Response, RequestError<T::Error>> {
        self.request(Method::DELETE, path, options).await
    }

    // method to drop timestamps that have left the window
    pub fn cleanup_stale_requests(&self) -> Result<usize, PaceLimiterError> {
        let now = self.clock.now()?;
        let removed = self.window.lock().prune(now, self.window_nanos);
        if removed > 0 {
            debug!(base_url = %self.config.base_url, removed, "pruned stale requests");
        }
        Ok(removed)
    }
}

impl<T, C> fmt::Debug for PaceLimiter<T, C>
where
    T: Transport,
    C: Clock,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let window = self.window.lock();
        f.debug_struct("PaceLimiter")
            .field("config", &self.config)
            .field("recorded", &window.recorded())
            .field("pending", &window.pending())
            .finish_non_exhaustive()
    }
}

/// Join a base URL and a path. An empty path yields the base URL; anything
/// else is appended verbatim, so `path` should carry its own leading `/`.
pub fn combine_url(base_url: &str, path: &str) -> String {
    if path.is_empty() {
        base_url.to_string()
    } else {
        format!("{base_url}{path}")
    }
}

// A slot taken under the cap. Released on drop unless committed; a release
// wakes callers blocked at the cap.
struct Reservation<'a> {
    window: &'a Mutex<SlidingWindow>,
    released: &'a Notify,
    active: bool,
}

impl<'a> Reservation<'a> {
    fn new(window: &'a Mutex<SlidingWindow>, released: &'a Notify) -> Self {
        Self {
            window,
            released,
            active: true,
        }
    }

    // swap the reservation for a recorded timestamp
    fn commit(mut self, now: u64, window_nanos: u64) -> (u64, usize) {
        let mut window = self.window.lock();
        window.prune(now, window_nanos);
        window.release();
        let stamp = window.record(now);
        self.active = false;
        (stamp, window.recorded())
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if self.active {
            self.window.lock().release();
            self.released.notify_waiters();
        }
    }
}
