//! Button input line trait

/// A single raw digital input feeding a debounced button
///
/// Implementations read the physical level without any filtering. A read
/// failure should report the line's idle level so a flaky pin never looks
/// pressed.
pub trait ButtonLine {
    /// Current raw level (true = high)
    fn is_high(&mut self) -> bool;
}
