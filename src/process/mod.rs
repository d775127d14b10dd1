//! External process execution with timeouts.

pub mod runner;

pub use runner::{
    FfmpegRunner, ProcessRunner, DEFAULT_CHECK_TIMEOUT, DEFAULT_PROCESS_TIMEOUT,
    PROCESS_LIVENESS_CHECK_INTERVAL,
};
