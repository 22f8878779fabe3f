use crate::errors::AppError;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use std::{num::NonZeroU32, sync::Arc};

/// Process-wide limiter in front of directory listing.
#[derive(Clone)]
pub struct ListLimiter {
    inner: Arc<DefaultDirectRateLimiter>,
}

impl ListLimiter {
    pub fn new(per_second: u32, burst: u32) -> Self {
        let rate = NonZeroU32::new(per_second).unwrap_or(nonzero!(1u32));
        let burst = NonZeroU32::new(burst).unwrap_or(rate);
        let quota = Quota::per_second(rate).allow_burst(burst);
        Self { inner: Arc::new(RateLimiter::direct(quota)) }
    }

    pub fn check(&self) -> Result<(), AppError> {
        self.inner.check().map_err(|_| AppError::RateLimited)
    }
}
