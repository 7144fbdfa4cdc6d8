//! Fixed-count register polling
//!
//! The coprocessor exposes no ready interrupt, only polled registers. A
//! poll reads up to `max_attempts` times and sleeps `interval_ms` after
//! every read that did not match, so an exhausted window costs exactly
//! `max_attempts` reads and `max_attempts` sleeps.

use embedded_hal::delay::DelayNs;

use lumen_core::camera::TransportError;
use lumen_core::config::PollPolicy;

/// Result of a polling window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollOutcome<T> {
    /// A read matched on the given attempt (1-based)
    Matched { value: T, attempts: u16 },
    /// Window exhausted; `last` is the final value read, if any
    Exhausted { last: Option<T> },
}

impl<T> PollOutcome<T> {
    /// True if a read matched
    pub fn is_matched(&self) -> bool {
        matches!(self, PollOutcome::Matched { .. })
    }
}

/// Read with `read` until `done` accepts a value or the window runs out
///
/// Transport errors abort the poll immediately.
pub fn poll<T, D, R, P>(
    policy: PollPolicy,
    delay: &mut D,
    mut read: R,
    done: P,
) -> Result<PollOutcome<T>, TransportError>
where
    D: DelayNs,
    R: FnMut() -> Result<T, TransportError>,
    P: Fn(&T) -> bool,
{
    let mut last = None;

    for attempt in 1..=policy.max_attempts {
        let value = read()?;
        if done(&value) {
            return Ok(PollOutcome::Matched {
                value,
                attempts: attempt,
            });
        }
        last = Some(value);
        delay.delay_ms(policy.interval_ms);
    }

    Ok(PollOutcome::Exhausted { last })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::sim::SimDelay;

    #[test]
    fn test_matches_on_first_read() {
        let mut delay = SimDelay::new();
        let outcome = poll(PollPolicy::default(), &mut delay, || Ok(0u8), |&v| v == 0).unwrap();

        assert_eq!(
            outcome,
            PollOutcome::Matched {
                value: 0,
                attempts: 1
            }
        );
        assert!(delay.sleeps_ms().is_empty());
    }

    #[test]
    fn test_exhausts_after_max_attempts() {
        let mut delay = SimDelay::new();
        let mut reads = 0u16;
        let outcome = poll(
            PollPolicy::new(5, 10),
            &mut delay,
            || {
                reads += 1;
                Ok(reads)
            },
            |_| false,
        )
        .unwrap();

        assert_eq!(outcome, PollOutcome::Exhausted { last: Some(5) });
        assert_eq!(reads, 5);
        assert_eq!(delay.sleeps_ms(), &[10, 10, 10, 10, 10]);
    }

    #[test]
    fn test_empty_window() {
        let mut delay = SimDelay::new();
        let outcome = poll(PollPolicy::new(0, 10), &mut delay, || Ok(1u8), |_| true).unwrap();

        assert_eq!(outcome, PollOutcome::Exhausted { last: None });
        assert!(!outcome.is_matched());
    }

    #[test]
    fn test_transport_error_aborts() {
        let mut delay = SimDelay::new();
        let mut reads = 0;
        let result: Result<PollOutcome<u8>, _> = poll(
            PollPolicy::default(),
            &mut delay,
            || {
                reads += 1;
                Err(TransportError::Bus)
            },
            |_| true,
        );

        assert_eq!(result, Err(TransportError::Bus));
        assert_eq!(reads, 1);
    }
}
