//! Button bank
//!
//! Owns the board's eight debounced buttons in their declared physical
//! order and implements the per-tick polling contract.

use crate::config::DebounceConfig;
use crate::traits::ButtonLine;

use super::button::{ButtonError, DebouncedButton};

/// Number of buttons on the board
pub const BUTTON_COUNT: usize = 8;

/// Symbolic button names, in bank order
pub const BUTTON_NAMES: [&str; BUTTON_COUNT] = ["W", "A", "S", "D", "I", "J", "K", "L"];

/// Board GPIO numbers for each button, in bank order
pub const BUTTON_GPIOS: [u8; BUTTON_COUNT] = [5, 7, 6, 8, 12, 14, 13, 15];

/// Typed button index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ButtonId {
    W = 0,
    A = 1,
    S = 2,
    D = 3,
    I = 4,
    J = 5,
    K = 6,
    L = 7,
}

impl ButtonId {
    /// All buttons in bank order
    pub const ALL: [ButtonId; BUTTON_COUNT] = [
        ButtonId::W,
        ButtonId::A,
        ButtonId::S,
        ButtonId::D,
        ButtonId::I,
        ButtonId::J,
        ButtonId::K,
        ButtonId::L,
    ];

    /// Bank index
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Symbolic name
    pub const fn name(self) -> &'static str {
        BUTTON_NAMES[self as usize]
    }

    /// Look up a button by symbolic name
    pub fn from_name(name: &str) -> Result<Self, ButtonError> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.name() == name)
            .ok_or(ButtonError::UnknownButton)
    }
}

/// Fixed bank of eight debounced buttons
pub struct ButtonBank<L> {
    buttons: [DebouncedButton<L>; BUTTON_COUNT],
}

impl<L: ButtonLine> ButtonBank<L> {
    /// Create a bank from lines given in bank order (W, A, S, D, I, J, K, L)
    pub fn new(lines: [L; BUTTON_COUNT], config: &DebounceConfig) -> Self {
        Self {
            buttons: lines.map(|line| DebouncedButton::new(line, config)),
        }
    }

    /// Map a symbolic name to its bank index
    pub fn lookup(name: &str) -> Result<usize, ButtonError> {
        ButtonId::from_name(name).map(ButtonId::index)
    }

    /// Sample every button once, in bank order
    ///
    /// Returns true only if every button accepted its sample. A `false`
    /// result means at least one window is full and the bank needs a
    /// [`reset_all`](Self::reset_all).
    pub fn poll_all(&mut self) -> bool {
        self.poll_each().iter().all(Result::is_ok)
    }

    /// Sample every button once, reporting each result
    pub fn poll_each(&mut self) -> [Result<(), ButtonError>; BUTTON_COUNT] {
        let mut results = [Ok(()); BUTTON_COUNT];
        for (result, button) in results.iter_mut().zip(self.buttons.iter_mut()) {
            *result = button.sample_from_line();
        }
        results
    }

    /// Evaluate every button's window, in bank order
    ///
    /// Returns true only if every button was ready. Buttons that were not
    /// ready keep their partial window.
    pub fn reset_all(&mut self) -> bool {
        self.reset_each().iter().all(Result::is_ok)
    }

    /// Evaluate every button's window, reporting each new stable level
    pub fn reset_each(&mut self) -> [Result<bool, ButtonError>; BUTTON_COUNT] {
        let mut results = [Err(ButtonError::NotReady); BUTTON_COUNT];
        for (result, button) in results.iter_mut().zip(self.buttons.iter_mut()) {
            *result = button.evaluate_and_reset();
        }
        results
    }

    /// Run one control-loop tick
    ///
    /// Polls every button; if any window was already full the bank is
    /// evaluated and polled again so no sample is dropped. Returns true if
    /// a window was evaluated during this tick.
    pub fn tick(&mut self) -> bool {
        let polled = self.poll_each();
        if polled.iter().all(Result::is_ok) {
            return false;
        }

        self.reset_all();
        // Only buttons that rejected the first poll still need this tick's sample
        for (result, button) in polled.iter().zip(self.buttons.iter_mut()) {
            if *result == Err(ButtonError::HistoryFull) {
                let _ = button.sample_from_line();
            }
        }
        true
    }

    /// Debounced pressed state of one button
    pub fn is_pressed(&self, id: ButtonId) -> bool {
        self.buttons[id.index()].is_pressed()
    }

    /// Debounced line level of one button
    pub fn stable_state(&self, id: ButtonId) -> bool {
        self.buttons[id.index()].stable_state()
    }

    /// Pressed buttons as a bit mask (bit n = bank index n)
    pub fn pressed_mask(&self) -> u8 {
        self.buttons
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_pressed())
            .fold(0u8, |mask, (i, _)| mask | (1 << i))
    }

    /// Access one button
    pub fn button(&self, id: ButtonId) -> &DebouncedButton<L> {
        &self.buttons[id.index()]
    }

    /// Mutable access to one button
    pub fn button_mut(&mut self, id: ButtonId) -> &mut DebouncedButton<L> {
        &mut self.buttons[id.index()]
    }

    /// Iterate over the buttons in bank order
    pub fn iter(&self) -> impl Iterator<Item = &DebouncedButton<L>> {
        self.buttons.iter()
    }
}
