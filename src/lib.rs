//! postcomp renders branded social-media post images.
//!
//! A [`PostRequest`] names an output format, a background photo (or flat color), a
//! [`BrandingConfig`] and optional slogan/title/body text. Rendering is immediate-mode and
//! deterministic:
//!
//! - resolve the format to a [`Canvas`]
//! - fetch background and logo concurrently, recovering from failures
//! - compile an ordered [`RenderPlan`] (background, gradients, logo, text)
//! - paint it on a fresh CPU surface and encode PNG
//!
//! [`render_post`] does all of it in one call; [`PreviewSession`] adds last-render-wins
//! semantics for live previews.
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod assets;
pub(crate) mod compile;
pub(crate) mod config;
pub(crate) mod effects;
pub(crate) mod encode;
pub(crate) mod layout;
/// One-call rendering API.
pub mod pipeline;
pub(crate) mod render;
pub(crate) mod session;
pub(crate) mod text;

pub use crate::foundation::core::{
    Affine, Canvas, LayoutBox, Point, Rect, Rgb8, Rgba8Premul, Vec2,
};
pub use crate::foundation::error::{PostcompError, PostcompResult};

pub use crate::assets::decode::{
    LoadedAsset, PreparedImage, PreparedSvg, decode_asset, decode_image, looks_like_svg,
};
pub use crate::assets::fetch::{AssetFetcher, FetchConfig, ImageSource};
pub use crate::compile::plan::{
    DrawOp, ImageRole, Layer, PlacedLine, RenderPlan, TextOp, TextRole, compile_post,
};
pub use crate::compile::style::{AccentStyle, EditorStyle, TextBlockStyle};
pub use crate::config::branding::{
    BrandingConfig, GRADIENT_HEIGHT_PERCENT_RANGE, GradientPosition, LOGO_SIZE_PERCENT_RANGE,
    SLOGAN_SIZE_PERCENT_RANGE,
};
pub use crate::effects::gradient::{
    BandEdge, BandRaster, GRADIENT_EDGE_ALPHA, GradientBand, band_height, gradient_bands,
    rasterize_band,
};
pub use crate::encode::png::{encode_png, png_data_url};
pub use crate::layout::anchor::{
    AlignX, Anchor, DEFAULT_PADDING_PX, Edge, resolve_anchor, resolve_anchor_token,
};
pub use crate::layout::format::{Format, resolve_format};
pub use crate::pipeline::{
    Compositor, PostAssets, PostImage, PostRequest, RenderContext, plan_post, render_post,
    render_with_assets,
};
pub use crate::render::cpu::{CpuPainter, PaintBackend, execute_plan, render_plan_cpu};
pub use crate::render::surface::{CanvasSurface, FrameRGBA};
pub use crate::session::preview::{PreviewFrame, PreviewOutcome, PreviewSession};
pub use crate::text::shaper::{TextBrushRgba8, TextShaper};
pub use crate::text::wrap::{
    FixedAdvanceMeasure, TextMeasure, VerticalMetrics, WrapParams, WrappedLine, wrap_text,
};
