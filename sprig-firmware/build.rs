//! Build script for sprig-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates board.toml at compile time
//! - Generates the `BOARD` configuration constant

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Fastest SPI clock the RP2040 can generate from a 125 MHz system clock
const MAX_SPI_FREQUENCY_HZ: i64 = 62_500_000;

fn main() {
    setup_linker();
    let board = validate_config();
    generate_board(&board);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validated board settings, defaults filled in
struct Board {
    threshold: &'static str,
    polarity: &'static str,
    background: u16,
    rgb8_policy: &'static str,
    spi_frequency_hz: u32,
    white_divisor: u16,
    blue_divisor: u16,
    poll_interval_us: u32,
}

/// Validate board.toml configuration at compile time
fn validate_config() -> Board {
    // Re-run if board.toml changes
    println!("cargo:rerun-if-changed=board.toml");

    let config_path = Path::new("board.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: board.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a board.toml configuration file.          ║\n\
            ║  Please create one in the sprig-firmware directory.              ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read board.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in board.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();

    let debounce = section(&config, "debounce", &mut errors);
    let display = section(&config, "display", &mut errors);
    let leds = section(&config, "leds", &mut errors);
    let control = section(&config, "control", &mut errors);

    let threshold = choice(
        debounce,
        "debounce",
        "threshold",
        &[("supermajority", "Supermajority"), ("truncated", "Truncated")],
        "Supermajority",
        &mut errors,
    );
    let polarity = choice(
        debounce,
        "debounce",
        "polarity",
        &[("active_low", "ActiveLow"), ("active_high", "ActiveHigh")],
        "ActiveLow",
        &mut errors,
    );
    let rgb8_policy = choice(
        display,
        "display",
        "rgb8_policy",
        &[("corrected", "Corrected"), ("compatible", "Compatible")],
        "Corrected",
        &mut errors,
    );

    let background = integer(display, "display", "background", 0, 0, 0xFFFF, &mut errors);
    let spi_frequency_hz = integer(
        display,
        "display",
        "spi_frequency_hz",
        30_000_000,
        1,
        MAX_SPI_FREQUENCY_HZ,
        &mut errors,
    );
    let white_divisor = integer(leds, "leds", "white_divisor", 8, 1, 0xFFFF, &mut errors);
    let blue_divisor = integer(leds, "leds", "blue_divisor", 4, 1, 0xFFFF, &mut errors);
    let poll_interval_us = integer(
        control,
        "control",
        "poll_interval_us",
        250,
        1,
        1_000_000,
        &mut errors,
    );

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid board configuration                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=board.toml validated successfully");

    // Ranges were checked above
    Board {
        threshold,
        polarity,
        background: background as u16,
        rgb8_policy,
        spi_frequency_hz: spi_frequency_hz as u32,
        white_divisor: white_divisor as u16,
        blue_divisor: blue_divisor as u16,
        poll_interval_us: poll_interval_us as u32,
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Optional top-level table
fn section<'a>(
    config: &'a toml::Value,
    name: &str,
    errors: &mut Vec<String>,
) -> Option<&'a toml::value::Table> {
    match config.get(name) {
        Some(toml::Value::Table(t)) => Some(t),
        Some(_) => {
            errors.push(format!("[{}] must be a table", name));
            None
        }
        None => None,
    }
}

/// String key restricted to a set of values, mapped to a variant name
fn choice(
    table: Option<&toml::value::Table>,
    section: &str,
    key: &str,
    options: &[(&str, &'static str)],
    default: &'static str,
    errors: &mut Vec<String>,
) -> &'static str {
    match table.and_then(|t| t.get(key)) {
        None => default,
        Some(toml::Value::String(value)) => {
            match options.iter().find(|(name, _)| *name == value.as_str()) {
                Some(&(_, variant)) => variant,
                None => {
                    let names: Vec<&str> = options.iter().map(|(name, _)| *name).collect();
                    errors.push(format!(
                        "[{}] {} must be one of: {}",
                        section,
                        key,
                        names.join(", ")
                    ));
                    default
                }
            }
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be a string", section, key));
            default
        }
    }
}

/// Integer key with an inclusive range
fn integer(
    table: Option<&toml::value::Table>,
    section: &str,
    key: &str,
    default: i64,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) -> i64 {
    match table.and_then(|t| t.get(key)) {
        None => default,
        Some(toml::Value::Integer(value)) => {
            if *value < min || *value > max {
                errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
                default
            } else {
                *value
            }
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            default
        }
    }
}

/// Write the `BOARD` constant to OUT_DIR/board.rs
fn generate_board(board: &Board) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let code = format!(
        "/// Board configuration generated from board.toml\n\
         pub const BOARD: sprig_core::config::BoardConfig = sprig_core::config::BoardConfig {{\n\
         \x20   debounce: sprig_core::config::DebounceConfig {{\n\
         \x20       threshold: sprig_core::config::ThresholdPolicy::{threshold},\n\
         \x20       polarity: sprig_core::config::Polarity::{polarity},\n\
         \x20   }},\n\
         \x20   display: sprig_core::config::DisplayConfig {{\n\
         \x20       background: sprig_core::graphics::Color({background:#06X}),\n\
         \x20       rgb8_policy: sprig_core::graphics::Rgb8Policy::{rgb8_policy},\n\
         \x20       spi_frequency_hz: {spi},\n\
         \x20   }},\n\
         \x20   leds: sprig_core::config::LedConfig {{\n\
         \x20       white_divisor: {white},\n\
         \x20       blue_divisor: {blue},\n\
         \x20   }},\n\
         \x20   poll_interval_us: {poll},\n\
         }};\n",
        threshold = board.threshold,
        polarity = board.polarity,
        background = board.background,
        rgb8_policy = board.rgb8_policy,
        spi = board.spi_frequency_hz,
        white = board.white_divisor,
        blue = board.blue_divisor,
        poll = board.poll_interval_us,
    );

    let mut f = File::create(out_dir.join("board.rs")).unwrap();
    f.write_all(code.as_bytes()).unwrap();
}
