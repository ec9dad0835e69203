// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document writer — turns raster sources into a paginated PostScript document.
//
// Each image is fully validated and planned (colorspace, sample adjustments,
// per-chunk encoding, page layout) before anything is written for it. The
// image is then drawn into the unit square, one `image` call per chunk, on as
// many physical pages as the layout needs.

use std::fmt::Write as _;
use std::io::Write;

use rasterps_core::config::TranscodeOptions;
use rasterps_core::error::{Result, TranscodeError};
use rasterps_core::types::{
    ChunkRegion, Compression, ImageDescriptor, Photometric, PlanarConfig, row_bytes,
};
use tracing::{debug, info, instrument, warn};

use crate::alpha::{AlphaCompositor, strip_extra_samples};
use crate::color::{ColorResolution, ColorSpace, ColorSpaceResolver, expand_palette, invert_samples};
use crate::encode::HexEncoder;
use crate::filter::{ChunkEncodingPlanner, EncodingPath, EncodingPlan, FilterGeometry};
use crate::layout::{PageGeometry, PageLayoutPlanner};
use crate::ps;
use crate::session::{DocumentState, TranscodeSession};
use crate::source::{ChunkKind, RasterSource};

/// Adjustments applied to decoded samples before they are encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SampleSteps {
    /// Merge separately stored color planes into chunky pixels.
    interleave: bool,
    /// Matte associated alpha onto white.
    composite: bool,
    /// Drop extra samples that are not composited.
    strip_extras: bool,
    /// Replace palette indices by RGB (level 1).
    expand_palette: bool,
    /// Turn MinIsWhite samples into MinIsBlack (level 1).
    invert: bool,
}

impl SampleSteps {
    fn any(&self) -> bool {
        self.interleave || self.composite || self.strip_extras || self.expand_palette || self.invert
    }
}

/// One `image` call.
#[derive(Debug, Clone)]
struct ChunkPlan {
    region: ChunkRegion,
    /// Source chunks read for this output chunk, one per interleaved plane.
    sources: Vec<usize>,
    encoding: EncodingPlan,
    /// Bytes to request from the source.
    read_len: u64,
}

/// Everything decided about an image before output starts.
#[derive(Debug, Clone)]
struct ImagePlan {
    desc: ImageDescriptor,
    color: ColorResolution,
    imagemask: bool,
    steps: SampleSteps,
    /// Components per pixel of the emitted samples.
    components: u16,
    /// Bits per component of the emitted samples.
    bits: u16,
    chunks: Vec<ChunkPlan>,
    pages: Vec<PageGeometry>,
}

/// Writes one PostScript document to a sink.
///
/// ```ignore
/// let mut writer = DocumentWriter::new(File::create("out.ps")?, TranscodeOptions::default());
/// writer.write_image(&mut DecodedImageSource::open("scan.png")?)?;
/// let file = writer.finish()?;
/// ```
pub struct DocumentWriter<W: Write> {
    session: TranscodeSession<W>,
    layout: PageLayoutPlanner,
    planner: ChunkEncodingPlanner,
}

impl<W: Write> DocumentWriter<W> {
    // -- Construction ---------------------------------------------------------

    pub fn new(sink: W, options: TranscodeOptions) -> Self {
        let layout = PageLayoutPlanner::from_options(&options);
        let planner = ChunkEncodingPlanner::new(options.level, options.ascii85);
        Self {
            session: TranscodeSession::new(sink, options),
            layout,
            planner,
        }
    }

    pub fn session(&self) -> &TranscodeSession<W> {
        &self.session
    }

    fn options(&self) -> &TranscodeOptions {
        self.session.options()
    }

    /// Write the trailer and hand back the sink.
    pub fn finish(mut self) -> Result<W> {
        self.end_document()?;
        Ok(self.session.into_inner())
    }

    /// Hand back the sink as is, without a trailer.
    pub fn into_inner(self) -> W {
        self.session.into_inner()
    }

    // -- Document structure ---------------------------------------------------

    /// Write the header comments and the setup section. The bounding box and
    /// origin come from `first`, unless an explicit page size is set.
    pub fn begin_document(&mut self, first: &ImageDescriptor) -> Result<()> {
        if self.session.state() != DocumentState::Unopened {
            return Err(TranscodeError::InvalidState("document already started"));
        }
        let opts = self.options();
        let (width, height) = first.size_in_points(opts.resolution_unit);
        let (box_w, box_h) = self.layout.page_size(width, height);
        let (origin_x, origin_y) = first.position_in_points(opts.resolution_unit);
        let level = opts.level;

        let mut out = String::new();
        out.push_str(if opts.eps {
            "%!PS-Adobe-3.0 EPSF-3.0\n"
        } else {
            "%!PS-Adobe-3.0\n"
        });
        let _ = writeln!(out, "%%Creator: {}", ps::comment_text(&opts.creator));
        let title = opts.title.as_deref().unwrap_or("untitled");
        let _ = writeln!(out, "%%Title: {}", ps::comment_text(title));
        let _ = writeln!(
            out,
            "%%CreationDate: {}",
            chrono::Utc::now().format("%a %b %e %H:%M:%S %Y")
        );
        out.push_str("%%DocumentData: Clean7Bit\n");
        let _ = writeln!(out, "%%Origin: {} {}", ps::number(origin_x), ps::number(origin_y));
        let _ = writeln!(
            out,
            "%%BoundingBox: 0 0 {} {}",
            ps::number(box_w.ceil()),
            ps::number(box_h.ceil())
        );
        let _ = writeln!(out, "%%LanguageLevel: {}", level.number());
        out.push_str(if opts.eps {
            "%%Pages: 1 1\n"
        } else {
            "%%Pages: (atend)\n"
        });
        out.push_str("%%EndComments\n");

        if !opts.eps {
            out.push_str("%%BeginSetup\n");
            if opts.duplex {
                out.push_str(ps::DUPLEX_FEATURE);
            }
            if opts.tumble {
                out.push_str(ps::TUMBLE_FEATURE);
            }
            if self.uses_dead_zone() {
                out.push_str(ps::AVOID_DEAD_ZONE_FEATURE);
            }
            out.push_str("%%EndSetup\n");
        }

        self.session.write_str(&out)?;
        self.session.set_state(DocumentState::PrologWritten);
        debug!(level = level.number(), box_w, box_h, "prolog written");
        Ok(())
    }

    /// Open a physical page.
    pub fn begin_page(&mut self, page: &PageGeometry) -> Result<()> {
        match self.session.state() {
            DocumentState::PrologWritten | DocumentState::PageClosed => {}
            DocumentState::Unopened => return Err(TranscodeError::InvalidState("no prolog written")),
            DocumentState::PageOpen => return Err(TranscodeError::InvalidState("a page is still open")),
            DocumentState::TrailerWritten => {
                return Err(TranscodeError::InvalidState("document already finished"));
            }
        }
        let number = self.session.next_page();
        let (w, h) = (page.page_width, page.page_height);

        let mut out = String::new();
        let _ = writeln!(out, "%%Page: {number} {number}");
        let _ = writeln!(
            out,
            "%%PageBoundingBox: 0 0 {} {}",
            ps::number(w.ceil()),
            ps::number(h.ceil())
        );
        if self.options().level.has_filters() && !self.options().eps {
            let _ = writeln!(
                out,
                "<< /PageSize [ {} {} ] /Policies << /PageSize 3 >> >> setpagedevice",
                ps::number(w),
                ps::number(h)
            );
        }
        out.push_str("gsave\n100 dict begin\n");
        if self.uses_dead_zone() {
            out.push_str(ps::AVOID_DEAD_ZONE_CALL);
        }
        self.session.write_str(&out)?;
        self.session.set_state(DocumentState::PageOpen);
        Ok(())
    }

    /// Close the open page.
    pub fn end_page(&mut self) -> Result<()> {
        if self.session.state() != DocumentState::PageOpen {
            return Err(TranscodeError::InvalidState("no page open"));
        }
        self.session.write_str("end\ngrestore\nshowpage\n")?;
        self.session.set_state(DocumentState::PageClosed);
        Ok(())
    }

    /// Write the trailer. Safe to call more than once; writes nothing when no
    /// page was ever started.
    pub fn end_document(&mut self) -> Result<()> {
        match self.session.state() {
            DocumentState::TrailerWritten => return Ok(()),
            DocumentState::Unopened => {
                self.session.set_state(DocumentState::TrailerWritten);
                return Ok(());
            }
            DocumentState::PageOpen => {
                self.session.abandon_data()?;
                self.end_page()?;
            }
            DocumentState::PrologWritten | DocumentState::PageClosed => {}
        }
        let pages = self.session.pages_emitted();
        self.session
            .write_str(&format!("%%Trailer\n%%Pages: {pages}\n%%EOF\n"))?;
        self.session.flush()?;
        self.session.set_state(DocumentState::TrailerWritten);
        info!(pages, images = self.session.images_seen(), "document finished");
        Ok(())
    }

    fn uses_dead_zone(&self) -> bool {
        let opts = self.options();
        opts.avoid_dead_zone && opts.level.has_filters() && !opts.eps
    }

    // -- Images ---------------------------------------------------------------

    /// Transcode one image onto one or more pages, writing the prolog first if
    /// needed. Returns the number of pages written.
    ///
    /// Errors carry the image index. Nothing is written for an image that
    /// fails validation; a failure while a page is open closes the data
    /// stream and the page before it is returned.
    #[instrument(skip_all, fields(image = self.session.images_seen()))]
    pub fn write_image<S: RasterSource + ?Sized>(&mut self, source: &mut S) -> Result<usize> {
        match self.session.state() {
            DocumentState::TrailerWritten => {
                return Err(TranscodeError::InvalidState("document already finished"));
            }
            DocumentState::PageOpen => return Err(TranscodeError::InvalidState("a page is still open")),
            _ => {}
        }
        let index = self.session.next_image();
        let desc = source.image_metadata().map_err(|err| err.in_image(index))?;
        let plan = self.prepare(desc, source).map_err(|err| err.in_image(index))?;

        if self.session.state() == DocumentState::Unopened {
            self.begin_document(&plan.desc).map_err(|err| err.in_image(index))?;
        }

        info!(
            index,
            width = plan.desc.width,
            height = plan.desc.height,
            chunks = plan.chunks.len(),
            pages = plan.pages.len(),
            passthrough = plan.chunks.first().is_some_and(|c| c.encoding.is_passthrough()),
            "Transcoding image"
        );

        for page in &plan.pages {
            self.begin_page(page).map_err(|err| err.in_image(index))?;
            if let Err(err) = self.emit_page(&plan, page, source) {
                self.recover_page();
                return Err(err.in_image(index));
            }
            self.end_page().map_err(|err| err.in_image(index))?;
        }
        Ok(plan.pages.len())
    }

    fn recover_page(&mut self) {
        let closed = self.session.abandon_data().and_then(|()| self.end_page());
        if let Err(err) = closed {
            warn!(%err, "could not close page after failure");
        }
    }

    /// Validate an image and decide how every chunk will be written.
    fn prepare<S: RasterSource + ?Sized>(&self, desc: ImageDescriptor, source: &S) -> Result<ImagePlan> {
        let opts = self.options();
        let level = self.planner.level();
        let bits = desc.bits_per_sample;
        let color_samples = desc.color_samples();
        let extras = desc.samples_per_pixel - color_samples;

        if !matches!(bits, 1 | 2 | 4 | 8) {
            return Err(TranscodeError::UnsupportedBitDepth(bits));
        }
        if color_samples == 0 {
            return Err(TranscodeError::UnsupportedPhotometric {
                photometric: desc.photometric,
                color_samples,
            });
        }

        let chunks_per_plane = desc.chunks_per_plane()?;
        let needed = desc.chunk_count()?;
        if source.chunk_count() < needed {
            return Err(TranscodeError::ChunkReadFailure {
                chunk: source.chunk_count(),
                detail: format!("source has {} of {needed} chunks", source.chunk_count()),
            });
        }

        let mut steps = SampleSteps::default();
        match desc.planar {
            PlanarConfig::Planar => {
                if color_samples > 1 {
                    if bits != 8 {
                        return Err(TranscodeError::UnsupportedLayout(format!(
                            "separate planes of {bits}-bit samples"
                        )));
                    }
                    steps.interleave = true;
                }
                if extras > 0 {
                    warn!(extra_samples = extras, "ignoring extra samples");
                }
            }
            PlanarConfig::Chunky if extras > 0 => {
                if bits != 8 {
                    return Err(TranscodeError::UnsupportedLayout(format!(
                        "{extras} extra sample(s) with {bits}-bit samples"
                    )));
                }
                if AlphaCompositor::applies(&desc) {
                    steps.composite = true;
                } else {
                    warn!(extra_samples = extras, "ignoring extra samples");
                    steps.strip_extras = true;
                }
            }
            PlanarConfig::Chunky => {}
        }

        let gray = matches!(desc.photometric, Photometric::MinIsBlack | Photometric::MinIsWhite);
        let imagemask = opts.prefer_imagemask && bits == 1 && color_samples == 1 && gray;
        if !level.has_filters() {
            steps.expand_palette = desc.photometric == Photometric::Palette;
            steps.invert = desc.photometric == Photometric::MinIsWhite && !imagemask;
        }

        let first = desc.chunk_region(0)?;
        let path = if steps.any() {
            EncodingPath::Reencode
        } else {
            self.planner.plan(&desc.compression, &filter_geometry(&desc, &first, true))
        };
        let passthrough = matches!(path, EncodingPath::Passthrough(_));

        // Decoded JPEG data is RGB whatever the photometric tag says.
        let delivered = if passthrough || desc.compression.is_jpeg() {
            desc.compression
        } else {
            Compression::None
        };
        let color = ColorSpaceResolver::resolve(
            desc.photometric,
            bits,
            color_samples,
            &delivered,
            desc.colormap.as_ref(),
        )?;

        let (components, out_bits) = if imagemask {
            (1, 1)
        } else if steps.expand_palette {
            (3, 8)
        } else if steps.interleave || steps.composite || steps.strip_extras {
            (color_samples, bits)
        } else {
            (color.colorspace.components(), bits)
        };

        let text = self.planner.text_encoding();
        let mut chunks = Vec::with_capacity(chunks_per_plane);
        for k in 0..chunks_per_plane {
            let region = desc.chunk_region(k)?;
            let sources: Vec<usize> = if steps.interleave {
                (0..color_samples as usize).map(|p| p * chunks_per_plane + k).collect()
            } else {
                vec![k]
            };
            let (path, read_len, declared_len) = if passthrough {
                let geometry = filter_geometry(&desc, &region, !color.invert_via_filter);
                let path = self.planner.plan(&desc.compression, &geometry);
                let stored = source.byte_count_for_chunk(k, ChunkKind::Raw);
                let len = if desc.compression == Compression::None {
                    // The image operator consumes exactly one decoded chunk.
                    let exact = desc.decoded_chunk_len(k)?;
                    if stored < exact {
                        return Err(TranscodeError::ChunkReadFailure {
                            chunk: k,
                            detail: format!("stored chunk holds {stored} of {exact} bytes"),
                        });
                    }
                    if stored > exact {
                        debug!(chunk = k, stored, exact, "ignoring trailing chunk bytes");
                    }
                    exact
                } else {
                    stored
                };
                (path, len, len)
            } else {
                let mut read_len = 0u64;
                for &s in &sources {
                    read_len = read_len
                        .checked_add(desc.decoded_chunk_len(s)?)
                        .ok_or_else(|| TranscodeError::InvalidGeometry(format!("chunk {k} size overflows")))?;
                }
                let declared = row_bytes(region.width, components, out_bits)?
                    .checked_mul(region.height as u64)
                    .ok_or_else(|| TranscodeError::InvalidGeometry(format!("chunk {k} size overflows")))?;
                (EncodingPath::Reencode, read_len, declared)
            };
            chunks.push(ChunkPlan {
                region,
                sources,
                encoding: EncodingPlan {
                    path,
                    text,
                    declared_len,
                },
                read_len,
            });
        }

        let (width, height) = desc.size_in_points(opts.resolution_unit);
        let pages = self.layout.plan_image(width, height)?;
        if opts.eps && self.session.pages_emitted() as usize + pages.len() > 1 {
            return Err(TranscodeError::InvalidState("EPS output holds exactly one page"));
        }

        Ok(ImagePlan {
            desc,
            color,
            imagemask,
            steps,
            components,
            bits: out_bits,
            chunks,
            pages,
        })
    }

    /// Everything between `begin_page` and `end_page` for one image.
    fn emit_page<S: RasterSource + ?Sized>(
        &mut self,
        plan: &ImagePlan,
        page: &PageGeometry,
        source: &mut S,
    ) -> Result<()> {
        let mut out = page.transform();
        out.push_str(ps::UNIT_CLIP);
        if self.planner.level().has_filters() && !plan.imagemask {
            out.push_str(&colorspace_operator(&plan.color)?);
        }
        self.session.write_str(&out)?;

        for (index, chunk) in plan.chunks.iter().enumerate() {
            self.emit_chunk(plan, chunk, source)?;
            debug!(
                chunk = index,
                bytes = chunk.encoding.declared_len,
                split = page.split_index,
                "chunk written"
            );
        }
        Ok(())
    }

    /// Read, adjust and write one chunk. The chunk is read completely before
    /// its `image` operator is written.
    fn emit_chunk<S: RasterSource + ?Sized>(&mut self, plan: &ImagePlan, chunk: &ChunkPlan, source: &mut S) -> Result<()> {
        let mut buf = self.session.take_scratch(chunk.read_len)?;
        let filled = fill_chunk(plan, chunk, source, &mut buf);
        let written = filled.and_then(|()| {
            let header = self.image_operator(plan, chunk);
            self.session.write_str(&header)?;
            self.session.write_data(chunk.encoding.text, &buf)
        });
        self.session.return_scratch(buf);
        written?;
        self.session.finish_data(chunk.encoding.text)
    }

    /// The `image` (or `imagemask`/`colorimage`) call for a chunk.
    fn image_operator(&self, plan: &ImagePlan, chunk: &ChunkPlan) -> String {
        let region = &chunk.region;
        let matrix = image_matrix(&plan.desc, region);
        let mut out = String::new();

        if !self.planner.level().has_filters() {
            let stride = row_bytes(region.width, plan.components, plan.bits).unwrap_or(0);
            let _ = writeln!(out, "/scanline {stride} string def");
            let read_proc = "{currentfile scanline readhexstring pop}";
            let (w, h) = (region.width, region.height);
            if plan.imagemask {
                let _ = writeln!(out, "{w} {h} {} {matrix} {read_proc} imagemask", plan.color.is_inverted());
            } else if plan.components == 1 {
                let _ = writeln!(out, "{w} {h} {} {matrix} {read_proc} image", plan.bits);
            } else {
                let _ = writeln!(
                    out,
                    "{w} {h} {} {matrix} {read_proc} false {} colorimage",
                    plan.bits, plan.components
                );
            }
            return out;
        }

        out.push_str("<<\n  /ImageType 1\n");
        let _ = writeln!(out, "  /Width {}", region.width);
        let _ = writeln!(out, "  /Height {}", region.height);
        if plan.imagemask {
            out.push_str("  /ImageMask true\n");
        }
        let _ = writeln!(out, "  /BitsPerComponent {}", plan.bits);
        let _ = writeln!(out, "  /Decode {}", plan.color.decode_array());
        let _ = writeln!(out, "  /ImageMatrix {matrix}");
        let _ = writeln!(out, "  /DataSource {}", chunk.encoding.data_source());
        if self.options().interpolate {
            out.push_str("  /Interpolate true\n");
        }
        out.push_str(if plan.imagemask { ">> imagemask\n" } else { ">> image\n" });
        out
    }
}

/// Read a chunk's source data into `buf` and apply the sample adjustments.
fn fill_chunk<S: RasterSource + ?Sized>(
    plan: &ImagePlan,
    chunk: &ChunkPlan,
    source: &mut S,
    buf: &mut Vec<u8>,
) -> Result<()> {
    let kind = chunk.encoding.chunk_kind();
    let mut filled = 0usize;
    for &index in &chunk.sources {
        let want = match kind {
            ChunkKind::Raw => buf.len(),
            ChunkKind::Decoded => plan.desc.decoded_chunk_len(index)? as usize,
        };
        let end = filled
            .checked_add(want)
            .filter(|&end| end <= buf.len())
            .ok_or(TranscodeError::AllocationFailure { requested: want })?;
        let n = source.read_chunk(index, kind, &mut buf[filled..end])?;
        if n < want {
            return Err(TranscodeError::ChunkReadFailure {
                chunk: index,
                detail: format!("short read: {n} of {want} bytes"),
            });
        }
        filled += n;
    }
    buf.truncate(filled);

    let desc = &plan.desc;
    let steps = plan.steps;
    let region = &chunk.region;
    if steps.interleave {
        *buf = interleave_planes(buf, chunk.sources.len());
    }
    if steps.composite {
        AlphaCompositor::composite(buf, desc.samples_per_pixel as usize, desc.color_samples() as usize);
    }
    if steps.strip_extras {
        strip_extra_samples(buf, desc.samples_per_pixel as usize, desc.color_samples() as usize);
    }
    if steps.expand_palette {
        if let ColorSpace::Indexed { table, .. } = &plan.color.colorspace {
            *buf = expand_palette(buf, desc.bits_per_sample, region.width, region.height, table)?;
        }
    }
    if steps.invert {
        invert_samples(buf);
    }
    Ok(())
}

/// Chunky pixels from `planes` equally sized 8-bit planes laid end to end.
fn interleave_planes(data: &[u8], planes: usize) -> Vec<u8> {
    if planes <= 1 {
        return data.to_vec();
    }
    let plane_len = data.len() / planes;
    let mut out = Vec::with_capacity(plane_len * planes);
    for i in 0..plane_len {
        for p in 0..planes {
            out.push(data[p * plane_len + i]);
        }
    }
    out
}

fn filter_geometry(desc: &ImageDescriptor, region: &ChunkRegion, black_is_1: bool) -> FilterGeometry {
    FilterGeometry {
        columns: region.width,
        rows: region.height,
        colors: desc.samples_per_chunk(),
        bits_per_sample: desc.bits_per_sample,
        black_is_1,
    }
}

/// Maps the unit square onto the chunk's samples: the full image spans the
/// square with row 0 at the top, offset to the chunk's origin.
fn image_matrix(desc: &ImageDescriptor, region: &ChunkRegion) -> String {
    let tx = -(region.x as i64);
    let ty = desc.height as i64 - region.y as i64;
    format!("[ {} 0 0 -{} {tx} {ty} ]", desc.width, desc.height)
}

fn colorspace_operator(color: &ColorResolution) -> Result<String> {
    match &color.colorspace {
        ColorSpace::Indexed { hival, table } => {
            let mut text = Vec::with_capacity(table.len() * 2 + table.len() / 36 + 2);
            let mut encoder = HexEncoder::new();
            encoder.encode(&mut text, table)?;
            encoder.finish(&mut text, false)?;
            Ok(format!(
                "[ /Indexed /DeviceRGB {hival} <\n{}> ] setcolorspace\n",
                String::from_utf8_lossy(&text)
            ))
        }
        other => Ok(format!(
            "{} setcolorspace\n",
            other.device_name().unwrap_or("/DeviceGray")
        )),
    }
}
