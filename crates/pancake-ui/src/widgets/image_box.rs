//! Embedded images.
//!
//! An [`ImageBox`] stores its image as a base64 payload ready to be placed in a
//! `data:` URI. Inputs are decoded, downscaled to `max_length` and re-encoded
//! with the `image` crate; already encoded bytes are embedded as they are.

use crate::arguments::Arguments;
use crate::error::{ImageError, ImageResult, RenderError, ToppingError, ToppingResult};
use crate::markup::Tag;
use crate::value::{Preprocessed, Value, type_name};
use crate::widget::{PrepareContext, RenderContext, Topping, ToppingKind, ToppingSpec, Widget};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::DynamicImage;
use image::imageops::FilterType;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Longest side, in pixels, when `max_length` is not given.
pub const DEFAULT_MAX_LENGTH: u32 = 500;

/// Encoding used for the embedded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpeg" | "jpg" => Some(ImageFormat::Jpeg),
            _ => None,
        }
    }

    /// Subtype used in the `data:image/...` URI.
    pub fn mime_subtype(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
        }
    }

    fn encoder_format(&self) -> image::ImageFormat {
        match self {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

/// Anything an [`ImageBox`] can show.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// A file to load.
    Path(PathBuf),
    /// Already encoded bytes, embedded without re-encoding.
    Encoded(Vec<u8>),
    /// An in-memory bitmap.
    Bitmap(DynamicImage),
}

impl ImageSource {
    /// Interpret a generic value: a string is a path, an array of bytes is
    /// encoded data.
    pub fn from_value(value: &Value) -> ImageResult<Self> {
        match value {
            Value::String(path) => Ok(ImageSource::Path(PathBuf::from(path))),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_u64().and_then(|b| u8::try_from(b).ok()))
                .collect::<Option<Vec<u8>>>()
                .map(ImageSource::Encoded)
                .ok_or(ImageError::UnsupportedInput { found: "non-byte array" }),
            other => Err(ImageError::UnsupportedInput {
                found: type_name(other),
            }),
        }
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        ImageSource::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Encoded(bytes)
    }
}

impl From<DynamicImage> for ImageSource {
    fn from(image: DynamicImage) -> Self {
        ImageSource::Bitmap(image)
    }
}

/// Encoding settings of one image box.
#[derive(Debug, Clone, Copy)]
struct Encoder {
    format: ImageFormat,
    max_length: Option<u32>,
}

impl Encoder {
    fn encode(&self, source: ImageSource) -> ImageResult<String> {
        let image = match source {
            ImageSource::Encoded(bytes) => return Ok(STANDARD.encode(bytes)),
            ImageSource::Path(path) => {
                let data = std::fs::read(&path).map_err(|source| ImageError::Io {
                    path: path.clone(),
                    source,
                })?;
                image::load_from_memory(&data)?
            }
            ImageSource::Bitmap(image) => image,
        };

        let image = self.downscale(image);
        let image = match self.format {
            // JPEG has no alpha channel
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
            ImageFormat::Png => image,
        };

        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, self.format.encoder_format())?;
        Ok(STANDARD.encode(buffer.into_inner()))
    }

    fn downscale(&self, image: DynamicImage) -> DynamicImage {
        let Some(max_length) = self.max_length else {
            return image;
        };
        let longest = image.width().max(image.height());
        if longest <= max_length || longest == 0 {
            return image;
        }
        let scale = max_length as f64 / longest as f64;
        let width = ((image.width() as f64 * scale) as u32).max(1);
        let height = ((image.height() as f64 * scale) as u32).max(1);
        image.resize_exact(width, height, FilterType::Triangle)
    }

    /// Outcome of encoding for the value pipeline.
    ///
    /// Bad input leaves the widget untouched; a failed conversion clears it
    /// so the placeholder shows.
    fn preprocess(&self, value: Value) -> Preprocessed {
        let result = ImageSource::from_value(&value).and_then(|source| self.encode(source));
        match result {
            Ok(payload) => Preprocessed::Store(Value::from(payload)),
            Err(err @ (ImageError::UnsupportedInput { .. } | ImageError::Io { .. })) => {
                tracing::error!(error = %err, "image input rejected");
                Preprocessed::NoOp
            }
            Err(err) => {
                tracing::error!(error = %err, "image conversion failed");
                Preprocessed::Store(Value::Null)
            }
        }
    }
}

/// Image embedded as a base64 `data:` URI.
///
/// Arguments: `image` (path or bytes), `format` (`"png"` or `"jpeg"`,
/// default png), `max_length` (default 500, `null` disables downscaling),
/// `shadow` (default true).
#[derive(Debug)]
pub struct ImageBox {
    encoder: Encoder,
    shadow: bool,
}

impl ImageBox {
    pub fn spec() -> ToppingSpec {
        ToppingSpec::of::<Self>(Arguments::new())
    }

    /// Encode `source` and show it.
    ///
    /// Unreadable or unsupported input leaves the current image in place. A
    /// failed conversion clears the image so the placeholder renders. Either
    /// way the error is logged and returned.
    pub fn set_image(widget: &Widget, source: impl Into<ImageSource>) -> ImageResult<()> {
        let Some(image_box) = widget.topping::<Self>() else {
            return Err(ImageError::UnsupportedInput {
                found: "widget is not an ImageBox",
            });
        };
        match image_box.encoder.encode(source.into()) {
            Ok(payload) => {
                widget.store_value(Value::from(payload));
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "image conversion failed");
                if matches!(err, ImageError::Processing { .. }) {
                    widget.store_value(Value::Null);
                }
                Err(err)
            }
        }
    }

    pub fn format(&self) -> ImageFormat {
        self.encoder.format
    }

    pub fn max_length(&self) -> Option<u32> {
        self.encoder.max_length
    }
}

impl ToppingKind for ImageBox {
    const KIND: &'static str = "ImageBox";
    const PRIMARY: Option<&'static str> = Some("image");

    fn from_arguments(arguments: &Arguments) -> ToppingResult<Self> {
        let format = match arguments.text(Self::KIND, "format")? {
            None => ImageFormat::Png,
            Some(name) => ImageFormat::parse(&name).ok_or_else(|| ToppingError::InvalidArgument {
                kind: Self::KIND.to_string(),
                argument: "format",
                expected: "\"png\" or \"jpeg\"",
            })?,
        };
        let max_length = match arguments.get("max_length") {
            None => Some(DEFAULT_MAX_LENGTH),
            Some(Value::Null) => None,
            Some(_) => arguments.u32(Self::KIND, "max_length")?,
        };
        Ok(Self {
            encoder: Encoder { format, max_length },
            shadow: arguments.bool(Self::KIND, "shadow", true)?,
        })
    }
}

impl Topping for ImageBox {
    fn prepare(&mut self, cx: &mut PrepareContext<'_>) -> ToppingResult<()> {
        let encoder = self.encoder;
        cx.cell().set_preprocessor(move |value| encoder.preprocess(value));
        let image = cx.arguments().value("image");
        if !image.is_null() {
            cx.init_value(image);
        }
        Ok(())
    }

    fn render(&self, cx: &RenderContext<'_>) -> Result<String, RenderError> {
        let card = Tag::div().class(if self.shadow { "w3-card" } else { "" });
        let img = match cx.value.as_str() {
            Some(payload) => Tag::new("img").attr(
                "src",
                format!("data:image/{};base64,{}", self.encoder.format.mime_subtype(), payload),
            ),
            None => Tag::new("img"),
        };
        Ok(card.child(img.style("width", "100%")).render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bitmap(width: u32, height: u32) -> DynamicImage {
        DynamicImage::new_rgba8(width, height)
    }

    fn decode(widget: &Widget) -> DynamicImage {
        let payload = widget.value();
        let bytes = STANDARD.decode(payload.as_str().unwrap()).unwrap();
        image::load_from_memory(&bytes).unwrap()
    }

    #[test]
    fn test_placeholder_without_image() {
        let image_box = ImageBox::spec().build().unwrap();
        assert_eq!(
            image_box.render(&[]).unwrap(),
            "<div class=\"w3-card\"><img style=\"width:100%\"></div>"
        );
    }

    #[test]
    fn test_bitmap_is_downscaled() {
        let image_box = ImageBox::spec().with("max_length", 50).build().unwrap();
        ImageBox::set_image(&image_box, bitmap(200, 100)).unwrap();
        let decoded = decode(&image_box);
        assert_eq!((decoded.width(), decoded.height()), (50, 25));
        assert!(image_box.render(&[]).unwrap().contains("src=\"data:image/png;base64,"));
    }

    #[test]
    fn test_no_downscale_when_disabled() {
        let image_box = ImageBox::spec().with("max_length", Value::Null).build().unwrap();
        ImageBox::set_image(&image_box, bitmap(600, 10)).unwrap();
        assert_eq!(decode(&image_box).width(), 600);
    }

    #[test]
    fn test_jpeg_drops_alpha() {
        let image_box = ImageBox::spec().with("format", "jpg").build().unwrap();
        ImageBox::set_image(&image_box, bitmap(8, 8)).unwrap();
        assert!(image_box.render(&[]).unwrap().contains("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_encoded_bytes_pass_through() {
        let image_box = ImageBox::spec().build().unwrap();
        assert!(image_box.set_value(json!([1, 2, 3])));
        assert_eq!(image_box.value(), Value::from(STANDARD.encode([1u8, 2, 3])));
    }

    #[test]
    fn test_unsupported_input_is_noop() {
        let image_box = ImageBox::spec().build().unwrap();
        assert!(!image_box.set_value(json!({"not": "an image"})));
        assert!(!image_box.set_value(json!([1, 300])));
        assert_eq!(image_box.cell().version(), 0);
    }

    #[test]
    fn test_missing_file_is_noop() {
        let image_box = ImageBox::spec().build().unwrap();
        ImageBox::set_image(&image_box, bitmap(4, 4)).unwrap();
        let before = image_box.value();
        let err = ImageBox::set_image(&image_box, PathBuf::from("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, ImageError::Io { .. }));
        assert_eq!(image_box.value(), before);
    }

    #[test]
    fn test_invalid_format() {
        let err = ImageBox::spec().with("format", "gif").build().unwrap_err();
        assert!(matches!(err, ToppingError::InvalidArgument { argument: "format", .. }));
    }

    #[test]
    fn test_shadow_flag() {
        let image_box = ImageBox::spec().with("shadow", false).build().unwrap();
        assert!(image_box.render(&[]).unwrap().starts_with("<div><img"));
    }
}
