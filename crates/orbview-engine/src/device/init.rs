use std::fmt::Display;
use std::time::Duration;

use anyhow::Result;

/// Bounded retry budget for adapter/device acquisition.
///
/// Acquisition is a blocking, poll-until-ready step that only happens at startup.
/// Once the budget is spent, initialization fails.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AcquireRetry {
    /// Total number of attempts, including the first one. `0` is treated as `1`.
    pub attempts: u32,

    /// Pause between two failed attempts.
    pub interval: Duration,
}

impl Default for AcquireRetry {
    fn default() -> Self {
        Self {
            attempts: 100,
            interval: Duration::from_millis(10),
        }
    }
}

/// Initialization parameters for the GPU layer.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    ///
    /// FIFO is broadly supported and paces the viewer to the display.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Required wgpu features.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface.
    ///
    /// This value is a hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,

    /// Retry budget applied to adapter and device requests.
    pub acquire_retry: AcquireRetry,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
            acquire_retry: AcquireRetry::default(),
        }
    }
}

/// Runs `attempt` until it succeeds or the retry budget is exhausted.
///
/// `what` names the resource in log lines and in the final error.
pub fn acquire_with_retry<T, E, F>(retry: AcquireRetry, what: &str, mut attempt: F) -> Result<T>
where
    F: FnMut() -> std::result::Result<T, E>,
    E: Display,
{
    let attempts = retry.attempts.max(1);
    let mut last_error = String::new();

    for n in 1..=attempts {
        match attempt() {
            Ok(value) => {
                if n > 1 {
                    log::info!("{what} acquired after {n} attempts");
                }
                return Ok(value);
            }
            Err(e) => {
                log::debug!("{what}: attempt {n}/{attempts} failed: {e}");
                last_error = e.to_string();
                if n < attempts {
                    std::thread::sleep(retry.interval);
                }
            }
        }
    }

    anyhow::bail!("failed to acquire {what} after {attempts} attempts: {last_error}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(attempts: u32) -> AcquireRetry {
        AcquireRetry { attempts, interval: Duration::ZERO }
    }

    #[test]
    fn succeeds_on_first_attempt() {
        let mut calls = 0;
        let v: Result<u32> = acquire_with_retry(instant(5), "adapter", || {
            calls += 1;
            Ok::<_, String>(7)
        });
        assert_eq!(v.unwrap(), 7);
        assert_eq!(calls, 1);
    }

    #[test]
    fn retries_until_ready() {
        let mut calls = 0;
        let v = acquire_with_retry(instant(5), "device", || {
            calls += 1;
            if calls < 3 { Err("not ready") } else { Ok(calls) }
        });
        assert_eq!(v.unwrap(), 3);
        assert_eq!(calls, 3);
    }

    #[test]
    fn exhausted_budget_is_an_error() {
        let mut calls = 0;
        let v: Result<()> = acquire_with_retry(instant(4), "adapter", || {
            calls += 1;
            Err("no adapter")
        });
        let err = v.unwrap_err().to_string();
        assert_eq!(calls, 4);
        assert!(err.contains("adapter"));
        assert!(err.contains("no adapter"));
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        let mut calls = 0;
        let _ = acquire_with_retry(instant(0), "adapter", || {
            calls += 1;
            Err::<(), _>("nope")
        });
        assert_eq!(calls, 1);
    }

    #[test]
    fn default_budget_is_one_hundred_attempts() {
        let r = AcquireRetry::default();
        assert_eq!(r.attempts, 100);
        assert_eq!(r.interval, Duration::from_millis(10));
    }
}
