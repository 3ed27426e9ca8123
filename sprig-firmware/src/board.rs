//! Board configuration
//!
//! `BOARD` is generated from board.toml by the build script.

include!(concat!(env!("OUT_DIR"), "/board.rs"));
