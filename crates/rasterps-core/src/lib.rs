// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// rasterps — Core types, transcoding options and error definitions shared
// across all crates.

pub mod config;
pub mod error;
pub mod types;

pub use config::TranscodeOptions;
pub use error::TranscodeError;
pub use types::*;
