// src/registry.rs

//! One shared limiter per target host

// dependencies
use crate::clock::{Clock, MonotonicClock};
use crate::config::PaceLimiterConfig;
use crate::errors::PaceLimiterError;
use crate::jitter::{Jitter, UniformJitter};
use crate::pace_limiter::PaceLimiter;
use crate::transport::Transport;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use tracing::debug;

/// Hands out one `PaceLimiter` per base URL, all sharing the template's
/// window and limit, the transport, the clock and the jitter strategy.
/// We use `DashMap` so hosts can be looked up concurrently.
pub struct LimiterRegistry<T, C = MonotonicClock>
where
    T: Transport + Clone,
    C: Clock + Clone,
{
    template: PaceLimiterConfig,
    transport: T,
    clock: C,
    jitter: Arc<dyn Jitter>,
    limiters: DashMap<String, Arc<PaceLimiter<T, C>>>,
}

impl<T, C> LimiterRegistry<T, C>
where
    T: Transport + Clone,
    C: Clock + Clone,
{
    /// The template's base URL is ignored; each limiter gets its own.
    pub fn new(template: PaceLimiterConfig, transport: T, clock: C) -> Result<Self, PaceLimiterError> {
        // only the window and limit matter here
        template.clone().base_url("template").validate()?;
        Ok(Self {
            template,
            transport,
            clock,
            jitter: Arc::new(UniformJitter),
            limiters: DashMap::new(),
        })
    }

    /// Builder-style: pacing strategy shared by every limiter
    pub fn with_jitter(mut self, jitter: impl Jitter + 'static) -> Self {
        self.jitter = Arc::new(jitter);
        self
    }

    /// The limiter for `base_url`, created on first use
    pub fn limiter_for(&self, base_url: &str) -> Result<Arc<PaceLimiter<T, C>>, PaceLimiterError> {
        if let Some(limiter) = self.limiters.get(base_url) {
            return Ok(Arc::clone(limiter.value()));
        }

        match self.limiters.entry(base_url.to_string()) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let config = self.template.clone().base_url(base_url);
                let limiter = PaceLimiter::with_config(config, self.transport.clone(), self.clock.clone())?
                    .with_shared_jitter(Arc::clone(&self.jitter));
                let limiter = Arc::new(limiter);
                entry.insert(Arc::clone(&limiter));
                debug!(base_url, "created limiter");
                Ok(limiter)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.limiters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limiters.is_empty()
    }

    pub fn contains(&self, base_url: &str) -> bool {
        self.limiters.contains_key(base_url)
    }

    // method to prune every limiter and drop the ones nobody is using
    pub fn cleanup_idle(&self) -> Result<usize, PaceLimiterError> {
        let mut idle = Vec::new();
        for entry in self.limiters.iter() {
            entry.value().cleanup_stale_requests()?;
            if entry.value().is_idle() {
                idle.push(entry.key().clone());
            }
        }

        let mut removed = 0;
        for base_url in idle {
            let dropped = self
                .limiters
                .remove_if(&base_url, |_, limiter| {
                    limiter.is_idle() && Arc::strong_count(limiter) == 1
                })
                .is_some();
            if dropped {
                removed += 1;
            }
        }
        if removed > 0 {
            debug!(removed, "dropped idle limiters");
        }
        Ok(removed)
    }
}
