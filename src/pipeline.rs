use std::{path::Path, sync::Arc};

use anyhow::Context;
use base64::Engine as _;

use crate::{
    assets::{
        decode::LoadedAsset,
        fetch::{AssetFetcher, FetchConfig, ImageSource},
    },
    compile::{
        plan::{ImageRole, RenderPlan, compile_post, request_has_text},
        style::EditorStyle,
    },
    config::branding::BrandingConfig,
    encode::png::{encode_png, png_data_url},
    foundation::{
        core::Rgb8,
        error::{PostcompError, PostcompResult},
    },
    layout::{anchor::DEFAULT_PADDING_PX, format::resolve_format},
    render::{cpu::render_plan_cpu, surface::FrameRGBA},
    text::{shaper::TextShaper, wrap::TextMeasure},
};

fn default_format() -> String {
    "square".to_owned()
}

fn default_background_color() -> Rgb8 {
    Rgb8::new(0x11, 0x18, 0x27)
}

/// Everything needed to render one post.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PostRequest {
    /// Output format tag (`square`, `story` or `landscape`).
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default)]
    pub background_image: Option<ImageSource>,
    /// Flat fill used when there is no background image or it cannot be loaded.
    #[serde(default = "default_background_color")]
    pub background_color: Rgb8,
    #[serde(default)]
    pub branding: BrandingConfig,
    #[serde(default)]
    pub logo: Option<ImageSource>,
    #[serde(default)]
    pub slogan: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl Default for PostRequest {
    fn default() -> Self {
        Self {
            format: default_format(),
            background_image: None,
            background_color: default_background_color(),
            branding: BrandingConfig::default(),
            logo: None,
            slogan: None,
            title: None,
            body: None,
        }
    }
}

impl PostRequest {
    /// Parse a request from JSON and validate its branding block.
    pub fn from_json_str(s: &str) -> PostcompResult<Self> {
        let req: Self =
            serde_json::from_str(s).map_err(|e| PostcompError::serde(e.to_string()))?;
        req.branding.validate()?;
        Ok(req)
    }

    pub fn from_path(path: &Path) -> PostcompResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read post request '{}'", path.display()))?;
        Self::from_json_str(&s)
    }
}

/// Assets that were successfully loaded for a request. Absent entries are recovered failures.
#[derive(Clone, Debug, Default)]
pub struct PostAssets {
    pub background: Option<LoadedAsset>,
    pub logo: Option<LoadedAsset>,
}

impl PostAssets {
    pub fn get(&self, role: ImageRole) -> Option<&LoadedAsset> {
        match role {
            ImageRole::Background => self.background.as_ref(),
            ImageRole::Logo => self.logo.as_ref(),
        }
    }
}

/// Render-wide settings shared by every render. Immutable once built.
#[derive(Clone, Debug)]
pub struct RenderContext {
    /// Font used for slogan, title and body text. Required only when a request has text.
    pub font: Option<Arc<Vec<u8>>>,
    /// Inset of anchored elements from the canvas edges.
    pub padding_px: f64,
    pub slogan_color: Rgb8,
    pub editor: EditorStyle,
    pub fetch: FetchConfig,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            font: None,
            padding_px: DEFAULT_PADDING_PX,
            slogan_color: Rgb8::WHITE,
            editor: EditorStyle::default(),
            fetch: FetchConfig::default(),
        }
    }
}

impl RenderContext {
    pub fn with_font(mut self, font_bytes: Vec<u8>) -> Self {
        self.font = Some(Arc::new(font_bytes));
        self
    }

    pub fn with_font_path(self, path: &Path) -> PostcompResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        Ok(self.with_font(bytes))
    }

    /// A shaper for `request`, or `None` when it has no text to draw.
    fn shaper_for(&self, request: &PostRequest) -> PostcompResult<Option<TextShaper>> {
        if !request_has_text(request) {
            return Ok(None);
        }
        let font = self.font.clone().ok_or_else(|| {
            PostcompError::validation("a font is required to draw slogan, title or body text")
        })?;
        TextShaper::new(font).map(Some)
    }
}

/// A finished post.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostImage {
    pub width: u32,
    pub height: u32,
    /// Lossless PNG encoding of `frame`.
    pub png: Vec<u8>,
    /// Premultiplied pixels, for callers that display or post-process without decoding.
    pub frame: FrameRGBA,
}

impl PostImage {
    /// `data:image/png;base64,...` for displaying the image inline.
    pub fn to_data_url(&self) -> String {
        png_data_url(&self.png)
    }

    pub fn png_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.png)
    }
}

/// Lay out `request` against already-loaded `assets` without painting.
pub fn plan_post(
    request: &PostRequest,
    assets: &PostAssets,
    ctx: &RenderContext,
) -> PostcompResult<RenderPlan> {
    let mut shaper = ctx.shaper_for(request)?;
    compile_post(
        request,
        assets,
        ctx,
        shaper.as_mut().map(|s| s as &mut dyn TextMeasure),
    )
}

/// Render `request` against already-loaded `assets`.
///
/// Pure: the same request, assets and context always produce the same PNG bytes.
#[tracing::instrument(level = "debug", skip_all, fields(format = %request.format))]
pub fn render_with_assets(
    request: &PostRequest,
    assets: &PostAssets,
    ctx: &RenderContext,
) -> PostcompResult<PostImage> {
    let mut shaper = ctx.shaper_for(request)?;
    let plan = compile_post(
        request,
        assets,
        ctx,
        shaper.as_mut().map(|s| s as &mut dyn TextMeasure),
    )?;
    let frame = render_plan_cpu(&plan, assets, shaper)?;
    let png = encode_png(&frame)?;

    Ok(PostImage {
        width: frame.width,
        height: frame.height,
        png,
        frame,
    })
}

/// Fetches a request's assets and renders it.
#[derive(Clone, Debug)]
pub struct Compositor {
    ctx: Arc<RenderContext>,
    fetcher: AssetFetcher,
}

impl Compositor {
    pub fn new(ctx: RenderContext) -> PostcompResult<Self> {
        let fetcher = AssetFetcher::new(ctx.fetch.clone())?;
        Ok(Self {
            ctx: Arc::new(ctx),
            fetcher,
        })
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    /// Load background and logo concurrently. Failures are logged and leave the slot empty.
    pub async fn fetch_assets(&self, request: &PostRequest) -> PostAssets {
        let (background, logo) = tokio::join!(
            self.fetch_optional(request.background_image.as_ref(), ImageRole::Background),
            self.fetch_optional(request.logo.as_ref(), ImageRole::Logo),
        );
        PostAssets { background, logo }
    }

    async fn fetch_optional(
        &self,
        source: Option<&ImageSource>,
        role: ImageRole,
    ) -> Option<LoadedAsset> {
        let source = source?;
        match self.fetcher.fetch(source).await {
            Ok(asset) => Some(asset),
            Err(err) => {
                tracing::warn!(
                    ?role,
                    source = %source.describe(),
                    error = %err,
                    "image unavailable, continuing without it"
                );
                None
            }
        }
    }

    /// Fetch assets, then composite and encode on the blocking pool so concurrent renders do
    /// not stall the async runtime.
    #[tracing::instrument(skip_all, fields(format = %request.format))]
    pub async fn render(&self, request: &PostRequest) -> PostcompResult<PostImage> {
        // Bad format tags fail before any network traffic.
        resolve_format(&request.format)?;
        let assets = self.fetch_assets(request).await;

        let ctx = Arc::clone(&self.ctx);
        let request = request.clone();
        let image =
            tokio::task::spawn_blocking(move || render_with_assets(&request, &assets, &ctx))
                .await
                .map_err(|e| PostcompError::render(format!("render task failed: {e}")))??;
        tracing::info!(
            width = image.width,
            height = image.height,
            png_bytes = image.png.len(),
            "post rendered"
        );
        Ok(image)
    }

    pub async fn plan(&self, request: &PostRequest) -> PostcompResult<RenderPlan> {
        resolve_format(&request.format)?;
        let assets = self.fetch_assets(request).await;
        plan_post(request, &assets, &self.ctx)
    }
}

/// One-shot render: fetch assets, composite, encode.
pub async fn render_post(request: &PostRequest, ctx: RenderContext) -> PostcompResult<PostImage> {
    Compositor::new(ctx)?.render(request).await
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
