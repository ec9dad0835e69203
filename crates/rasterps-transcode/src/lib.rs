// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// rasterps-transcode — Raster-to-PostScript transcoding engine.
//
// Resolves color models, lays images out on physical pages (splitting tall
// ones), forwards compressed chunks under matching PostScript filters where
// the output level allows it, and otherwise re-encodes decoded samples as
// ASCII85 or hex text.

pub mod alpha;
pub mod color;
pub mod encode;
pub mod filter;
pub mod layout;
pub mod ps;
pub mod session;
pub mod source;
pub mod writer;

// Re-export the primary types so callers can use `rasterps_transcode::DocumentWriter` etc.
pub use alpha::AlphaCompositor;
pub use color::{ColorResolution, ColorSpace, ColorSpaceResolver};
pub use encode::{Ascii85Encoder, HexEncoder, TextEncoding};
pub use filter::{ChunkEncodingPlanner, EncodingPath, EncodingPlan, Filter, FilterGeometry};
pub use layout::{PageGeometry, PageLayoutPlanner};
pub use session::{DocumentState, TranscodeSession};
pub use source::{ChunkKind, DecodedImageSource, MemorySource, RasterSource};
pub use writer::DocumentWriter;
