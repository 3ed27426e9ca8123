//! Control loop task
//!
//! Drives the application at the configured poll interval. Each tick
//! takes exactly one sample per button, so a 64-sample debounce window
//! closes every 64 ticks (16 ms at the default 250 us).

use defmt::*;
use embassy_time::{Duration, Ticker};

use crate::app::App;
use crate::board::BOARD;

/// Ticks between display health reports
const REPORT_INTERVAL_TICKS: u32 = 40_000;

/// Control task - ticks the application forever
#[embassy_executor::task]
pub async fn control_task(mut app: App) {
    info!("Control task started ({} us tick)", BOARD.poll_interval_us);

    app.start();

    let mut ticker = Ticker::every(Duration::from_micros(BOARD.poll_interval_us as u64));
    let mut ticks: u32 = 0;
    let mut reported_errors = 0;

    loop {
        ticker.next().await;
        app.tick();

        ticks = ticks.wrapping_add(1);
        if ticks % REPORT_INTERVAL_TICKS == 0 {
            let errors = app.display_errors();
            if errors != reported_errors {
                warn!("Display transfer errors: {}", errors);
                reported_errors = errors;
            }
        }
    }
}
