// Role color preview images: the member's avatar and name drawn in the
// candidate color, on Discord's dark and light backgrounds.

use super::preview_files::PreviewFiles;
use crate::core::customization::{PreviewTheme, RoleColor};
use ab_glyph::{point, Font, FontVec, GlyphId, PxScale, ScaleFont};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::path::PathBuf;
use thiserror::Error;

const WIDTH: u32 = 1600;
const HEIGHT: u32 = 250;
const AVATAR_ORIGIN: (u32, u32) = (40, 40);
const AVATAR_SIZE: u32 = 160;
const NAME_SIZE: f32 = 80.0;
const NAME_POSITION: (f32, f32) = (240.0, 110.0);
const CAPTION_SIZE: f32 = 60.0;
const CAPTION_POSITION: (f32, f32) = (240.0, 200.0);
const CAPTION: &str = "This is how the new color will look";

/// Avatars are requested at this size from the CDN.
pub const AVATAR_FETCH_SIZE: u32 = 128;

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("No preview font loaded (looked for {0})")]
    FontUnavailable(String),
    #[error("Avatar download failed: {0}")]
    Download(#[from] reqwest::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct PreviewRenderer {
    http: reqwest::Client,
    font: Option<FontVec>,
    font_path: PathBuf,
    root: PathBuf,
}

impl PreviewRenderer {
    /// A renderer writing under `root`. A missing or unreadable font is not
    /// fatal here; it only makes color previews fail later.
    pub fn new(font_path: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        let font_path = font_path.into();
        let font = match std::fs::read(&font_path) {
            Ok(bytes) => match FontVec::try_from_vec(bytes) {
                Ok(font) => Some(font),
                Err(e) => {
                    tracing::warn!("Preview font {} is invalid: {}", font_path.display(), e);
                    None
                }
            },
            Err(e) => {
                tracing::warn!("Preview font {} not readable: {}", font_path.display(), e);
                None
            }
        };

        Self {
            http: reqwest::Client::new(),
            font,
            font_path,
            root: root.into(),
        }
    }

    pub async fn fetch_avatar(&self, url: &str) -> Result<DynamicImage, PreviewError> {
        let bytes = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(image::load_from_memory(&bytes)?)
    }

    /// Render both themes into a fresh [`PreviewFiles`].
    pub fn write_previews(
        &self,
        avatar: &DynamicImage,
        color: RoleColor,
        display_name: &str,
    ) -> Result<PreviewFiles, PreviewError> {
        let files = PreviewFiles::create_in(&self.root)?;
        for theme in [PreviewTheme::Dark, PreviewTheme::Light] {
            let image = self.render(theme, avatar, color, display_name)?;
            image.save_with_format(files.path(theme), ImageFormat::Png)?;
        }
        Ok(files)
    }

    pub fn render(
        &self,
        theme: PreviewTheme,
        avatar: &DynamicImage,
        color: RoleColor,
        display_name: &str,
    ) -> Result<RgbaImage, PreviewError> {
        let font = self
            .font
            .as_ref()
            .ok_or_else(|| PreviewError::FontUnavailable(self.font_path.display().to_string()))?;

        let [r, g, b] = theme.background();
        let mut canvas = RgbaImage::from_pixel(WIDTH, HEIGHT, Rgba([r, g, b, 255]));

        draw_round_avatar(&mut canvas, avatar);
        draw_text(
            &mut canvas,
            font,
            NAME_SIZE,
            NAME_POSITION,
            color.components(),
            display_name,
        );
        draw_text(
            &mut canvas,
            font,
            CAPTION_SIZE,
            CAPTION_POSITION,
            theme.caption_color(),
            CAPTION,
        );

        Ok(canvas)
    }
}

/// Scale the avatar to `AVATAR_SIZE` and paste it clipped to a circle.
fn draw_round_avatar(canvas: &mut RgbaImage, avatar: &DynamicImage) {
    let scaled = avatar
        .resize_exact(AVATAR_SIZE, AVATAR_SIZE, FilterType::Lanczos3)
        .to_rgba8();
    let radius = AVATAR_SIZE as f32 / 2.0;

    for (x, y, pixel) in scaled.enumerate_pixels() {
        let dx = x as f32 + 0.5 - radius;
        let dy = y as f32 + 0.5 - radius;
        if dx * dx + dy * dy > radius * radius {
            continue;
        }

        let [r, g, b, a] = pixel.0;
        let target = canvas.get_pixel_mut(AVATAR_ORIGIN.0 + x, AVATAR_ORIGIN.1 + y);
        blend(target, [r, g, b], a as f32 / 255.0);
    }
}

/// Draw a single line of text with its baseline at `origin.1`.
fn draw_text(
    canvas: &mut RgbaImage,
    font: &FontVec,
    size: f32,
    origin: (f32, f32),
    color: [u8; 3],
    text: &str,
) {
    let scale = PxScale::from(size);
    let scaled = font.as_scaled(scale);
    let mut caret = origin.0;
    let mut previous: Option<GlyphId> = None;

    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(scale, point(caret, origin.1));
        caret += scaled.h_advance(id);
        previous = Some(id);

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let x = bounds.min.x as i64 + gx as i64;
            let y = bounds.min.y as i64 + gy as i64;
            if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
                return;
            }
            blend(canvas.get_pixel_mut(x as u32, y as u32), color, coverage);
        });
    }
}

fn blend(target: &mut Rgba<u8>, color: [u8; 3], alpha: f32) {
    let alpha = alpha.clamp(0.0, 1.0);
    for (channel, source) in target.0.iter_mut().take(3).zip(color) {
        *channel = (source as f32 * alpha + *channel as f32 * (1.0 - alpha)).round() as u8;
    }
}
