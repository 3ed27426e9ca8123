//! Button input
//!
//! Batch-window debounce for the board's eight buttons.

pub mod bank;
pub mod button;

pub use bank::{ButtonBank, ButtonId, BUTTON_COUNT, BUTTON_GPIOS, BUTTON_NAMES};
pub use button::{ButtonError, DebouncedButton, HISTORY_LEN};
