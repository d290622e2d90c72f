use std::io::Cursor;

use anyhow::Context;
use base64::Engine as _;

use crate::{
    foundation::{
        error::{PostcompError, PostcompResult},
        math::unpremultiply_rgba8_in_place,
    },
    render::surface::FrameRGBA,
};

/// Encode a frame as PNG (straight alpha RGBA8).
pub fn encode_png(frame: &FrameRGBA) -> PostcompResult<Vec<u8>> {
    let expected = frame.width as usize * frame.height as usize * 4;
    if frame.data.len() != expected {
        return Err(PostcompError::render(format!(
            "frame byte length {} does not match {}x{}",
            frame.data.len(),
            frame.width,
            frame.height
        )));
    }

    let mut data = frame.data.clone();
    if frame.premultiplied {
        unpremultiply_rgba8_in_place(&mut data);
    }
    let img = image::RgbaImage::from_raw(frame.width, frame.height, data)
        .ok_or_else(|| PostcompError::render("frame buffer does not fit its dimensions"))?;

    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(out)
}

pub fn png_data_url(png: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    )
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
