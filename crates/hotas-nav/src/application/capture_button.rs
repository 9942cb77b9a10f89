//! Capture the next physical button pressed on a joystick.
//!
//! The user is asked to press the button they want to bind; this use case
//! watches the device until a button goes down and returns its 1-based
//! number.
//!
//! # Algorithm
//!
//! 1. Take a baseline observation.  A button already held at this point is
//!    not treated as a press.
//! 2. Every poll interval, poll again.  When the bitmask differs from the
//!    previous observation, pick the lowest newly pressed button; if nothing
//!    rose, pick the lowest held button (see
//!    [`ButtonBitmask::capture_candidate`]).  An all-released bitmask does not
//!    resolve.
//! 3. A failed poll is retried on the next interval.
//!
//! # Cancellation
//!
//! The engine has no timeout of its own.  Callers layer one on top by
//! cancelling the [`CancellationToken`].  The token is checked before every
//! poll and raced against every sleep, so cancellation is observed within one
//! poll interval.

use std::time::Duration;

use hotas_core::ButtonBitmask;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::device_query::{JoystickApi, PollError};

/// Poll interval used by interactive captures.
pub const DEFAULT_CAPTURE_POLL_INTERVAL: Duration = Duration::from_millis(30);

/// Why a capture ended without a button.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// The cancellation token fired (timeout, or superseded by a newer capture).
    #[error("capture cancelled")]
    Cancelled,

    /// The baseline observation could not be read.
    #[error("device error: {0}")]
    Device(#[from] PollError),
}

/// Waits for a button press on `device_id` and returns its 1-based number.
///
/// # Errors
///
/// - [`CaptureError::Cancelled`] once `cancel` fires.
/// - [`CaptureError::Device`] if the baseline poll fails.  Later poll
///   failures are retried.
pub async fn capture_next_button(
    joystick: &dyn JoystickApi,
    device_id: u32,
    cancel: &CancellationToken,
    poll_interval: Duration,
) -> Result<u32, CaptureError> {
    if cancel.is_cancelled() {
        return Err(CaptureError::Cancelled);
    }

    let mut last = joystick.poll_buttons(device_id)?;
    debug!(device_id, baseline = last.bits(), "capture armed");

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(device_id, "capture cancelled");
                return Err(CaptureError::Cancelled);
            }
            _ = tokio::time::sleep(poll_interval) => {}
        }

        let current = match joystick.poll_buttons(device_id) {
            Ok(bits) => bits,
            Err(e) => {
                trace!(device_id, "capture poll failed, retrying: {e}");
                continue;
            }
        };

        if let Some(button) = resolve(last, current) {
            debug!(device_id, button, "capture resolved");
            return Ok(button);
        }
        last = current;
    }
}

fn resolve(last: ButtonBitmask, current: ButtonBitmask) -> Option<u32> {
    if current == last {
        return None;
    }
    current.capture_candidate(last)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::infrastructure::joystick::mock::MockJoystick;

    const FAST: Duration = Duration::from_millis(2);

    // ── Resolution ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_new_press_resolves_to_one_based_index() {
        // Arrange
        let joystick = MockJoystick::new();
        joystick.push_bits(0b0000);
        joystick.push_bits(0b0100);
        let cancel = CancellationToken::new();

        // Act
        let result = capture_next_button(&joystick, 0, &cancel, FAST).await;

        // Assert
        assert_eq!(result, Ok(3));
    }

    #[tokio::test]
    async fn test_release_of_held_button_does_not_resolve() {
        // Held before capture, unchanged, released, then pressed again.
        let joystick = MockJoystick::new();
        for bits in [0b0001, 0b0001, 0b0000, 0b0001] {
            joystick.push_bits(bits);
        }
        let cancel = CancellationToken::new();

        let result = capture_next_button(&joystick, 0, &cancel, FAST).await;

        assert_eq!(result, Ok(1));
        assert_eq!(joystick.poll_count(), 4);
    }

    #[tokio::test]
    async fn test_lowest_of_simultaneous_presses_wins() {
        let joystick = MockJoystick::new();
        joystick.push_bits(0);
        joystick.push_bits(0b1010_0000);
        let cancel = CancellationToken::new();

        let result = capture_next_button(&joystick, 0, &cancel, FAST).await;

        assert_eq!(result, Ok(6));
    }

    #[tokio::test]
    async fn test_poll_errors_after_baseline_are_retried() {
        let joystick = MockJoystick::new();
        joystick.push_bits(0);
        joystick.push_error(PollError::Os {
            device_id: 0,
            code: 6,
        });
        joystick.push_error(PollError::Unplugged(0));
        joystick.push_bits(0b10);
        let cancel = CancellationToken::new();

        let result = capture_next_button(&joystick, 0, &cancel, FAST).await;

        assert_eq!(result, Ok(2));
    }

    // ── Failure paths ─────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_baseline_poll_failure_is_a_device_error() {
        let joystick = MockJoystick::new();
        joystick.push_error(PollError::Unplugged(4));
        let cancel = CancellationToken::new();

        let result = capture_next_button(&joystick, 4, &cancel, FAST).await;

        assert_eq!(result, Err(CaptureError::Device(PollError::Unplugged(4))));
    }

    #[tokio::test]
    async fn test_already_cancelled_token_never_polls() {
        let joystick = MockJoystick::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = capture_next_button(&joystick, 0, &cancel, FAST).await;

        assert_eq!(result, Err(CaptureError::Cancelled));
        assert_eq!(joystick.poll_count(), 0);
    }

    #[tokio::test]
    async fn test_constant_bitmask_waits_until_cancelled() {
        // Arrange: button 1 held for the whole capture.
        let joystick = Arc::new(MockJoystick::new());
        joystick.hold_bits(0b0001);
        let cancel = CancellationToken::new();

        let task = {
            let joystick = Arc::clone(&joystick);
            let cancel = cancel.clone();
            tokio::spawn(async move {
                capture_next_button(joystick.as_ref(), 0, &cancel, FAST).await
            })
        };

        // Act
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(!task.is_finished(), "constant input must not resolve");
        cancel.cancel();

        // Assert: returns within a couple of poll intervals.
        let result = tokio::time::timeout(Duration::from_millis(200), task)
            .await
            .expect("capture must observe cancellation promptly")
            .unwrap();
        assert_eq!(result, Err(CaptureError::Cancelled));
    }

    #[tokio::test]
    async fn test_cancellation_is_observed_with_long_poll_interval() {
        let joystick = Arc::new(MockJoystick::new());
        let cancel = CancellationToken::new();

        let task = {
            let joystick = Arc::clone(&joystick);
            let cancel = cancel.clone();
            tokio::spawn(async move {
                capture_next_button(joystick.as_ref(), 0, &cancel, Duration::from_secs(60)).await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        cancel.cancel();

        let result = tokio::time::timeout(Duration::from_millis(200), task)
            .await
            .expect("cancel must interrupt the sleep")
            .unwrap();
        assert_eq!(result, Err(CaptureError::Cancelled));
    }
}
