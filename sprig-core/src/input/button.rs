//! Debounced button
//!
//! Each button collects a fixed window of raw samples, one per control-loop
//! tick. Once the window is full it is evaluated as a batch: the number of
//! high samples is compared against a threshold, the stable state is
//! updated, and the window starts over. Contact bounce inside a window can
//! flip at most the one stable bit produced at the end of it.

use heapless::Vec;

use crate::config::{DebounceConfig, Polarity, ThresholdPolicy};
use crate::traits::ButtonLine;

/// Raw samples per debounce window
pub const HISTORY_LEN: usize = 64;

/// Button operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonError {
    /// Sample window is full; evaluate it before appending more
    HistoryFull,
    /// Sample window is not full yet; keep sampling
    NotReady,
    /// Symbolic button name not found
    UnknownButton,
}

impl ThresholdPolicy {
    /// Minimum count of high samples is `threshold + 1`
    pub const fn threshold(self, window: usize) -> usize {
        match self {
            ThresholdPolicy::Supermajority => 5 * window / 6,
            #[allow(clippy::erasing_op)]
            ThresholdPolicy::Truncated => (5 / 6) * window,
        }
    }

    /// Stable level for a window with `high_count` high samples
    pub const fn decide(self, high_count: usize, window: usize) -> bool {
        high_count > self.threshold(window)
    }
}

/// One physical button with its sample window
pub struct DebouncedButton<L> {
    line: L,
    history: Vec<bool, HISTORY_LEN>,
    last_sample: bool,
    stable: bool,
    policy: ThresholdPolicy,
    polarity: Polarity,
}

impl<L: ButtonLine> DebouncedButton<L> {
    /// Create a button bound to `line`
    ///
    /// The stable state starts at the line's idle level, so the button
    /// reads released until the first window has been evaluated.
    pub fn new(line: L, config: &DebounceConfig) -> Self {
        let idle = config.polarity.idle_level();
        Self {
            line,
            history: Vec::new(),
            last_sample: idle,
            stable: idle,
            policy: config.threshold,
            polarity: config.polarity,
        }
    }

    /// Read the line and append its level to the window
    pub fn sample_from_line(&mut self) -> Result<(), ButtonError> {
        let level = self.line.is_high();
        self.append_sample(level)
    }

    /// Append a raw sample
    ///
    /// Fails with [`ButtonError::HistoryFull`] without touching any state if
    /// the window is already full.
    pub fn append_sample(&mut self, value: bool) -> Result<(), ButtonError> {
        self.history
            .push(value)
            .map_err(|_| ButtonError::HistoryFull)?;
        self.last_sample = value;
        Ok(())
    }

    /// Evaluate a full window and start a new one
    ///
    /// Returns the new stable level, or [`ButtonError::NotReady`] (with no
    /// mutation) if the window is not full yet.
    pub fn evaluate_and_reset(&mut self) -> Result<bool, ButtonError> {
        if !self.history.is_full() {
            return Err(ButtonError::NotReady);
        }

        let high_count = self.history.iter().filter(|&&s| s).count();
        self.history.clear();
        self.stable = self.policy.decide(high_count, HISTORY_LEN);
        Ok(self.stable)
    }

    /// Window write cursor (number of samples collected), `0..=HISTORY_LEN`
    pub fn cursor(&self) -> usize {
        self.history.len()
    }

    /// Check if the window is full and waiting for evaluation
    pub fn is_full(&self) -> bool {
        self.history.is_full()
    }

    /// Most recent raw sample
    pub fn last_sample(&self) -> bool {
        self.last_sample
    }

    /// Debounced line level
    pub fn stable_state(&self) -> bool {
        self.stable
    }

    /// Debounced pressed state, taking the line polarity into account
    pub fn is_pressed(&self) -> bool {
        self.stable == self.polarity.active_level()
    }

    /// Threshold policy in use
    pub fn policy(&self) -> ThresholdPolicy {
        self.policy
    }

    /// Access the underlying line
    pub fn line_mut(&mut self) -> &mut L {
        &mut self.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Mock input line returning a scripted level
    struct MockLine {
        high: bool,
        reads: usize,
    }

    impl MockLine {
        fn new(high: bool) -> Self {
            Self { high, reads: 0 }
        }
    }

    impl ButtonLine for MockLine {
        fn is_high(&mut self) -> bool {
            self.reads += 1;
            self.high
        }
    }

    fn config(threshold: ThresholdPolicy) -> DebounceConfig {
        DebounceConfig {
            threshold,
            polarity: Polarity::ActiveLow,
        }
    }

    fn button(threshold: ThresholdPolicy) -> DebouncedButton<MockLine> {
        DebouncedButton::new(MockLine::new(true), &config(threshold))
    }

    fn fill(b: &mut DebouncedButton<MockLine>, highs: usize) {
        for i in 0..HISTORY_LEN {
            b.append_sample(i < highs).unwrap();
        }
    }

    #[test]
    fn test_starts_released() {
        let b = button(ThresholdPolicy::Supermajority);
        assert_eq!(b.cursor(), 0);
        assert!(b.stable_state());
        assert!(!b.is_pressed());
    }

    #[test]
    fn test_sample_from_line() {
        let mut b = button(ThresholdPolicy::Supermajority);
        b.line_mut().high = false;
        b.sample_from_line().unwrap();
        assert_eq!(b.cursor(), 1);
        assert!(!b.last_sample());
        assert_eq!(b.line_mut().reads, 1);
    }

    #[test]
    fn test_history_full_rejects_without_mutation() {
        let mut b = button(ThresholdPolicy::Supermajority);
        fill(&mut b, HISTORY_LEN);
        assert!(b.is_full());
        assert!(b.last_sample());

        assert_eq!(b.append_sample(false), Err(ButtonError::HistoryFull));
        assert_eq!(b.cursor(), HISTORY_LEN);
        assert!(b.last_sample());
    }

    #[test]
    fn test_not_ready_before_full() {
        let mut b = button(ThresholdPolicy::Supermajority);
        for _ in 0..HISTORY_LEN - 1 {
            b.append_sample(false).unwrap();
        }
        assert_eq!(b.evaluate_and_reset(), Err(ButtonError::NotReady));
        assert_eq!(b.cursor(), HISTORY_LEN - 1);
        assert!(b.stable_state());
    }

    #[test]
    fn test_supermajority_threshold() {
        assert_eq!(ThresholdPolicy::Supermajority.threshold(HISTORY_LEN), 53);

        let mut b = button(ThresholdPolicy::Supermajority);
        fill(&mut b, 54);
        assert_eq!(b.evaluate_and_reset(), Ok(true));
        assert_eq!(b.cursor(), 0);

        fill(&mut b, 53);
        assert_eq!(b.evaluate_and_reset(), Ok(false));
        assert!(b.is_pressed());

        fill(&mut b, 32);
        assert_eq!(b.evaluate_and_reset(), Ok(false));
    }

    #[test]
    fn test_truncated_threshold() {
        assert_eq!(ThresholdPolicy::Truncated.threshold(HISTORY_LEN), 0);

        let mut b = button(ThresholdPolicy::Truncated);
        fill(&mut b, 32);
        assert_eq!(b.evaluate_and_reset(), Ok(true));

        fill(&mut b, 1);
        assert_eq!(b.evaluate_and_reset(), Ok(true));

        fill(&mut b, 0);
        assert_eq!(b.evaluate_and_reset(), Ok(false));
    }

    #[test]
    fn test_active_high_polarity() {
        let cfg = DebounceConfig {
            threshold: ThresholdPolicy::Supermajority,
            polarity: Polarity::ActiveHigh,
        };
        let mut b = DebouncedButton::new(MockLine::new(false), &cfg);
        assert!(!b.is_pressed());
        fill(&mut b, HISTORY_LEN);
        b.evaluate_and_reset().unwrap();
        assert!(b.is_pressed());
    }

    proptest! {
        #[test]
        fn prop_ready_once_per_window(samples in proptest::collection::vec(any::<bool>(), 0..400)) {
            let mut b = button(ThresholdPolicy::Supermajority);
            let mut accepted = 0usize;
            let mut evaluations = 0usize;

            for s in samples {
                match b.append_sample(s) {
                    Ok(()) => accepted += 1,
                    Err(ButtonError::HistoryFull) => {
                        prop_assert_eq!(b.cursor(), HISTORY_LEN);
                        b.evaluate_and_reset().unwrap();
                        evaluations += 1;
                        prop_assert_eq!(b.cursor(), 0);
                        b.append_sample(s).unwrap();
                        accepted += 1;
                    }
                    Err(e) => prop_assert!(false, "unexpected error {:?}", e),
                }
                prop_assert!(b.cursor() <= HISTORY_LEN);
            }

            prop_assert_eq!(evaluations, accepted.saturating_sub(1) / HISTORY_LEN);
        }

        #[test]
        fn prop_stable_matches_count(
            window in proptest::collection::vec(any::<bool>(), HISTORY_LEN)
        ) {
            let mut b = button(ThresholdPolicy::Supermajority);
            for &s in &window {
                b.append_sample(s).unwrap();
            }
            let highs = window.iter().filter(|&&s| s).count();
            prop_assert_eq!(b.evaluate_and_reset(), Ok(highs > 53));
        }
    }
}
