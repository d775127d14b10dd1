//! Network module.
//!
//! Provides the [`HttpClient`] boundary and its reqwest implementation.

pub mod client;

pub use client::{HttpClient, ReqwestClient};
