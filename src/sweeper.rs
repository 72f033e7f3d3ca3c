use std::future;
use std::time::Duration;

use actix_web::web;
use tokio::time::{interval, MissedTickBehavior};

use crate::rate_limiter::RateLimiter;

/// Periodically drop rate limiter keys that went quiet, forever
///
/// A zero `period` disables sweeping: the future then never completes.
pub async fn run_sweeper_until_stopped(rate_limiter: web::Data<RateLimiter>, period: Duration) {
    if period.is_zero() {
        tracing::info!("Rate limiter sweeping is disabled");
        return future::pending().await;
    }

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately and there is nothing to sweep yet
    ticker.tick().await;
    loop {
        ticker.tick().await;
        sweep(&rate_limiter);
    }
}

/// Drop idle keys from the rate limiter
#[tracing::instrument(name = "Sweeping idle rate limiter keys", skip_all)]
fn sweep(rate_limiter: &RateLimiter) {
    let dropped = rate_limiter.sweep();
    tracing::debug!(
        dropped,
        remaining = rate_limiter.tracked_keys(),
        "Rate limiter sweep complete"
    );
}
