//! Retry policies for `FLOOD_WAIT` and transient I/O errors.

use std::num::NonZeroU32;
use std::ops::ControlFlow;
use std::time::Duration;

use crate::errors::InvocationError;

/// Decides whether a failed call is sent again, and after how long.
pub trait RetryPolicy: Send + Sync + 'static {
    fn should_retry(&self, ctx: &RetryContext) -> ControlFlow<(), Duration>;
}

/// What [`RetryPolicy::should_retry`] gets to look at.
pub struct RetryContext {
    pub fail_count:   NonZeroU32,
    pub slept_so_far: Duration,
    pub error:        InvocationError,
}

/// Never retry.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRetries;

impl RetryPolicy for NoRetries {
    fn should_retry(&self, _: &RetryContext) -> ControlFlow<(), Duration> {
        ControlFlow::Break(())
    }
}

/// Sleeps through short `FLOOD_WAIT`s and retries one I/O error.
#[derive(Clone, Debug)]
pub struct AutoSleep {
    /// Longer flood waits are returned to the caller.
    pub threshold:             Duration,
    /// Delay before retrying after an I/O error; `None` disables it.
    pub io_errors_as_flood_of: Option<Duration>,
}

impl Default for AutoSleep {
    fn default() -> Self {
        Self {
            threshold:             Duration::from_secs(60),
            io_errors_as_flood_of: Some(Duration::from_secs(1)),
        }
    }
}

impl RetryPolicy for AutoSleep {
    fn should_retry(&self, ctx: &RetryContext) -> ControlFlow<(), Duration> {
        if let Some(secs) = ctx.error.flood_wait_seconds() {
            if ctx.fail_count.get() == 1 && secs <= self.threshold.as_secs() {
                tracing::info!(secs, "FLOOD_WAIT, sleeping before retry");
                return ControlFlow::Continue(Duration::from_secs(secs));
            }
        }
        if matches!(ctx.error, InvocationError::Io(_)) && ctx.fail_count.get() == 1 {
            if let Some(d) = self.io_errors_as_flood_of {
                tracing::info!(delay = ?d, "I/O error, sleeping before retry");
                return ControlFlow::Continue(d);
            }
        }
        ControlFlow::Break(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RpcError;

    fn ctx(fail_count: u32, error: InvocationError) -> RetryContext {
        RetryContext {
            fail_count: NonZeroU32::new(fail_count).unwrap(),
            slept_so_far: Duration::ZERO,
            error,
        }
    }

    #[test]
    fn auto_sleep_waits_out_short_flood() {
        let err = InvocationError::Rpc(RpcError::from_telegram(420, "FLOOD_WAIT_3"));
        assert_eq!(AutoSleep::default().should_retry(&ctx(1, err)), ControlFlow::Continue(Duration::from_secs(3)));
    }

    #[test]
    fn auto_sleep_gives_up_on_long_flood_or_second_failure() {
        let long = InvocationError::Rpc(RpcError::from_telegram(420, "FLOOD_WAIT_3600"));
        assert_eq!(AutoSleep::default().should_retry(&ctx(1, long)), ControlFlow::Break(()));

        let again = InvocationError::Rpc(RpcError::from_telegram(420, "FLOOD_WAIT_3"));
        assert_eq!(AutoSleep::default().should_retry(&ctx(2, again)), ControlFlow::Break(()));
    }

    #[test]
    fn auto_sleep_retries_io_once() {
        let io = || InvocationError::Io(std::io::Error::other("reset"));
        assert_eq!(AutoSleep::default().should_retry(&ctx(1, io())), ControlFlow::Continue(Duration::from_secs(1)));
        assert_eq!(AutoSleep::default().should_retry(&ctx(2, io())), ControlFlow::Break(()));
    }

    #[test]
    fn no_retries_never_retries() {
        let err = InvocationError::Rpc(RpcError::from_telegram(420, "FLOOD_WAIT_1"));
        assert_eq!(NoRetries.should_retry(&ctx(1, err)), ControlFlow::Break(()));
    }
}
