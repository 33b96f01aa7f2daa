#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

pub mod args;
pub mod config;
pub mod demo;
pub mod logging;
pub mod replay;

mod error;
pub use error::{SnapmapError, SnapmapResult};
