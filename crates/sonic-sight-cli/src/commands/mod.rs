//! CLI command implementations.

pub mod calibrate;
pub mod common;
pub mod compare;
pub mod config;
pub mod detect;
pub mod devices;
pub mod generate;
pub mod listen;
pub mod sounds;
