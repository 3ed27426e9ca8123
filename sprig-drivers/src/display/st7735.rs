//! ST7735 TFT driver
//!
//! Drives the 160x128 ST7735 panel over a write-only SPI bus with separate
//! chip-select, data/command and reset lines. Pixels are RGB565, sent high
//! byte first through a small chunk buffer so a window is streamed in a
//! few bus transactions instead of one per pixel.
//!
//! The panel is usable only after [`St7735::init`]. Before that, the
//! [`DisplayTransport`] calls do nothing. Bus and pin failures during a
//! transfer are counted and the last one is kept for inspection.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;
use heapless::Vec;
use sprig_core::graphics::Color;
use sprig_core::traits::DisplayTransport;

/// Pixel bytes buffered before a bus write (must be even)
const CHUNK_SIZE: usize = 64;

/// Reset pulse phase length
const RESET_PULSE_MS: u32 = 10;

/// ST7735 commands
#[allow(dead_code)]
mod cmd {
    pub const NOP: u8 = 0x00;
    pub const SWRESET: u8 = 0x01;
    pub const SLPOUT: u8 = 0x11;
    pub const NORON: u8 = 0x13;
    pub const INVOFF: u8 = 0x20;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;
    pub const FRMCTR1: u8 = 0xB1;
    pub const FRMCTR2: u8 = 0xB2;
    pub const FRMCTR3: u8 = 0xB3;
    pub const INVCTR: u8 = 0xB4;
    pub const PWCTR1: u8 = 0xC0;
    pub const PWCTR2: u8 = 0xC1;
    pub const PWCTR3: u8 = 0xC2;
    pub const PWCTR4: u8 = 0xC3;
    pub const PWCTR5: u8 = 0xC4;
    pub const VMCTR1: u8 = 0xC5;
    pub const GMCTRP1: u8 = 0xE0;
    pub const GMCTRN1: u8 = 0xE1;
}

/// MADCTL: column order flipped, vertical refresh flipped, BGR
const MADCTL_LANDSCAPE: u8 = 0x40 | 0x10 | 0x08;

/// COLMOD: 16 bits per pixel
const COLMOD_RGB565: u8 = 0x05;

/// Power-up sequence: (command, parameters, delay after in ms)
const INIT_SEQUENCE: &[(u8, &[u8], u32)] = &[
    (cmd::SWRESET, &[], 150),
    (cmd::SLPOUT, &[], 500),
    (cmd::FRMCTR1, &[0x01, 0x2C, 0x2D], 0),
    (cmd::FRMCTR2, &[0x01, 0x2C, 0x2D], 0),
    // Line inversion mode then dot inversion mode
    (cmd::FRMCTR3, &[0x01, 0x2C, 0x2D, 0x01, 0x2C, 0x2D], 0),
    (cmd::INVCTR, &[0x07], 0),
    (cmd::PWCTR1, &[0xA2, 0x02, 0x84], 0),
    (cmd::PWCTR2, &[0xC5], 0),
    (cmd::PWCTR3, &[0x0A, 0x00], 0),
    (cmd::PWCTR4, &[0x8A, 0x2A], 0),
    (cmd::PWCTR5, &[0x8A, 0xEE], 0),
    (cmd::VMCTR1, &[0x0E], 0),
    (cmd::INVOFF, &[], 0),
    (cmd::MADCTL, &[MADCTL_LANDSCAPE], 0),
    (cmd::COLMOD, &[COLMOD_RGB565], 0),
    (cmd::CASET, &[0x00, 0x00, 0x00, 0x7F], 0),
    (cmd::RASET, &[0x00, 0x00, 0x00, 0x9F], 0),
    (
        cmd::GMCTRP1,
        &[
            0x02, 0x1C, 0x07, 0x12, 0x37, 0x32, 0x29, 0x2D, 0x29, 0x25, 0x2B, 0x39, 0x00, 0x01,
            0x03, 0x10,
        ],
        0,
    ),
    (
        cmd::GMCTRN1,
        &[
            0x03, 0x1D, 0x07, 0x06, 0x2E, 0x2C, 0x29, 0x2D, 0x2E, 0x2E, 0x37, 0x3F, 0x00, 0x00,
            0x02, 0x10,
        ],
        0,
    ),
    (cmd::NORON, &[], 10),
    (cmd::DISPON, &[], 100),
];

/// ST7735 driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum St7735Error<S> {
    /// SPI bus error
    Spi(S),
    /// Chip-select, data/command or reset line error
    Pin,
}

/// ST7735 panel on an SPI bus
pub struct St7735<SPI, CS, DC, RST>
where
    SPI: SpiBus,
{
    spi: SPI,
    cs: CS,
    dc: DC,
    rst: RST,
    initialized: bool,
    /// RAMWR accepted; pixel bytes may go out
    window_open: bool,
    chunk: Vec<u8, CHUNK_SIZE>,
    error_count: u32,
    last_error: Option<St7735Error<SPI::Error>>,
}

impl<SPI, CS, DC, RST> St7735<SPI, CS, DC, RST>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    /// Create a driver; the panel stays inactive until [`init`](Self::init)
    pub fn new(spi: SPI, cs: CS, dc: DC, rst: RST) -> Self {
        Self {
            spi,
            cs,
            dc,
            rst,
            initialized: false,
            window_open: false,
            chunk: Vec::new(),
            error_count: 0,
            last_error: None,
        }
    }

    /// Reset the panel and run the power-up sequence
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), St7735Error<SPI::Error>> {
        self.initialized = false;
        self.window_open = false;
        self.chunk.clear();

        self.cs.set_high().map_err(|_| St7735Error::Pin)?;
        self.dc.set_low().map_err(|_| St7735Error::Pin)?;
        self.hard_reset(delay)?;

        for &(command, params, delay_ms) in INIT_SEQUENCE {
            self.write_command(command, params)?;
            if delay_ms > 0 {
                delay.delay_ms(delay_ms);
            }
        }

        self.initialized = true;
        Ok(())
    }

    fn hard_reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), St7735Error<SPI::Error>> {
        self.rst.set_high().map_err(|_| St7735Error::Pin)?;
        delay.delay_ms(RESET_PULSE_MS);
        self.rst.set_low().map_err(|_| St7735Error::Pin)?;
        delay.delay_ms(RESET_PULSE_MS);
        self.rst.set_high().map_err(|_| St7735Error::Pin)?;
        delay.delay_ms(RESET_PULSE_MS);
        Ok(())
    }

    /// Check if the power-up sequence has completed
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Transfer failures since creation
    pub fn error_count(&self) -> u32 {
        self.error_count
    }

    /// Most recent transfer failure
    pub fn last_error(&self) -> Option<&St7735Error<SPI::Error>> {
        self.last_error.as_ref()
    }

    /// Release the bus and pins
    pub fn release(self) -> (SPI, CS, DC, RST) {
        (self.spi, self.cs, self.dc, self.rst)
    }

    /// Send one command with its parameters in its own CS frame
    fn write_command(&mut self, command: u8, params: &[u8]) -> Result<(), St7735Error<SPI::Error>> {
        self.cs.set_low().map_err(|_| St7735Error::Pin)?;
        let sent = self.send(command, params);
        let released = self.cs.set_high().map_err(|_| St7735Error::Pin);
        sent.and(released)
    }

    /// Command byte with DC low, then parameters with DC high
    fn send(&mut self, command: u8, params: &[u8]) -> Result<(), St7735Error<SPI::Error>> {
        self.dc.set_low().map_err(|_| St7735Error::Pin)?;
        self.spi.write(&[command]).map_err(St7735Error::Spi)?;
        self.spi.flush().map_err(St7735Error::Spi)?;
        if !params.is_empty() {
            self.dc.set_high().map_err(|_| St7735Error::Pin)?;
            self.spi.write(params).map_err(St7735Error::Spi)?;
            self.spi.flush().map_err(St7735Error::Spi)?;
        }
        Ok(())
    }

    fn open_window(
        &mut self,
        x_start: u16,
        x_end: u16,
        y_start: u16,
        y_end: u16,
    ) -> Result<(), St7735Error<SPI::Error>> {
        let [xs_hi, xs_lo] = x_start.to_be_bytes();
        let [xe_hi, xe_lo] = x_end.to_be_bytes();
        let [ys_hi, ys_lo] = y_start.to_be_bytes();
        let [ye_hi, ye_lo] = y_end.to_be_bytes();

        self.chunk.clear();
        self.cs.set_low().map_err(|_| St7735Error::Pin)?;
        self.send(cmd::CASET, &[xs_hi, xs_lo, xe_hi, xe_lo])?;
        self.send(cmd::RASET, &[ys_hi, ys_lo, ye_hi, ye_lo])?;
        self.send(cmd::RAMWR, &[])?;
        // Everything until end_window is pixel data
        self.dc.set_high().map_err(|_| St7735Error::Pin)
    }

    fn flush_chunk(&mut self) -> Result<(), St7735Error<SPI::Error>> {
        if self.chunk.is_empty() {
            return Ok(());
        }
        let written = self.spi.write(&self.chunk).map_err(St7735Error::Spi);
        self.chunk.clear();
        written
    }

    fn close_window(&mut self) -> Result<(), St7735Error<SPI::Error>> {
        let flushed = if self.window_open {
            self.flush_chunk()
                .and_then(|()| self.spi.flush().map_err(St7735Error::Spi))
        } else {
            self.chunk.clear();
            Ok(())
        };
        self.window_open = false;
        let released = self.cs.set_high().map_err(|_| St7735Error::Pin);
        flushed.and(released)
    }

    fn record(&mut self, result: Result<(), St7735Error<SPI::Error>>) {
        if let Err(e) = result {
            self.error_count = self.error_count.saturating_add(1);
            self.last_error = Some(e);
        }
    }
}

impl<SPI, CS, DC, RST> DisplayTransport for St7735<SPI, CS, DC, RST>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    fn begin_window(&mut self, x_start: u16, x_end: u16, y_start: u16, y_end: u16) {
        if !self.initialized {
            return;
        }
        let result = self.open_window(x_start, x_end, y_start, y_end);
        self.window_open = result.is_ok();
        if result.is_err() {
            // DC may be stuck low; keep pixel bytes off the bus
            let _ = self.cs.set_high();
        }
        self.record(result);
    }

    fn push_pixel(&mut self, color: Color) {
        if !self.initialized || !self.window_open {
            return;
        }
        // Capacity is even and drained whenever full, so two bytes always fit
        let _ = self.chunk.extend_from_slice(&color.to_be_bytes());
        if self.chunk.is_full() {
            let result = self.flush_chunk();
            self.record(result);
        }
    }

    fn end_window(&mut self) {
        if !self.initialized {
            return;
        }
        let result = self.close_window();
        self.record(result);
    }

    fn is_ready(&self) -> bool {
        self.initialized
    }
}
