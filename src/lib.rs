//! Cardgen: batch image generation for flashcard manifests
//!
//! Reads a manifest of flashcard records, skips frozen records and records whose image
//! already exists, requests one image per remaining record from a generative image
//! service, writes it under the output root, and paces calls to respect rate limits.

pub mod artifact;
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod manifest;
pub mod pacing;
pub mod provider;
