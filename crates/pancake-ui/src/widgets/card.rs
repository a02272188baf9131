//! Card containers.

use crate::arguments::Arguments;
use crate::error::{ImageError, ImageResult, RenderError, ToppingResult};
use crate::markup::Tag;
use crate::value::Value;
use crate::widget::{PrepareContext, RenderContext, Topping, ToppingKind, ToppingSpec, Widget};
use crate::widgets::{ImageBox, ImageSource};
use std::sync::Arc;

const CARD_CLASS: &str = "w3-card w3-round-large w3-padding w3-margin-bottom";

/// Boxed container for its children.
#[derive(Debug)]
pub struct Card;

impl Card {
    pub fn spec() -> ToppingSpec {
        ToppingSpec::of::<Self>(Arguments::new())
    }
}

impl ToppingKind for Card {
    const KIND: &'static str = "Card";

    fn from_arguments(_: &Arguments) -> ToppingResult<Self> {
        Ok(Card)
    }
}

impl Topping for Card {
    fn render(&self, cx: &RenderContext<'_>) -> Result<String, RenderError> {
        Ok(Tag::div().class(CARD_CLASS).html(cx.children_html()).render())
    }
}

/// Position of a floating card. Numbers are pixels, strings are used as
/// given (`"50%"`).
#[derive(Debug, Clone)]
pub(crate) struct Placement {
    top: String,
    left: String,
    width: Option<String>,
}

impl Placement {
    pub(crate) fn from_arguments(kind: &str, arguments: &Arguments) -> ToppingResult<Self> {
        let length = |key: &'static str| -> ToppingResult<Option<String>> {
            Ok(match arguments.get(key) {
                None | Some(Value::Null) => None,
                Some(Value::Number(n)) => Some(format!("{}px", n)),
                Some(_) => arguments.text(kind, key)?,
            })
        };
        Ok(Self {
            top: length("top")?.unwrap_or_else(|| "16px".to_string()),
            left: length("left")?.unwrap_or_else(|| "16px".to_string()),
            width: length("width")?,
        })
    }

    pub(crate) fn card(&self) -> Tag {
        let mut tag = Tag::div()
            .class(format!("{} w3-white", CARD_CLASS))
            .style("position", "fixed")
            .style("top", self.top.as_str())
            .style("left", self.left.as_str())
            .style("z-index", "10");
        if let Some(width) = &self.width {
            tag = tag.style("width", width.as_str());
        }
        tag
    }
}

/// Card pinned to the viewport.
///
/// Arguments: `top`, `left` (default 16px), `width`.
#[derive(Debug)]
pub struct FloatingCard {
    placement: Placement,
}

impl FloatingCard {
    pub fn spec() -> ToppingSpec {
        ToppingSpec::of::<Self>(Arguments::new())
    }
}

impl ToppingKind for FloatingCard {
    const KIND: &'static str = "FloatingCard";

    fn from_arguments(arguments: &Arguments) -> ToppingResult<Self> {
        Ok(Self {
            placement: Placement::from_arguments(Self::KIND, arguments)?,
        })
    }
}

impl Topping for FloatingCard {
    fn render(&self, cx: &RenderContext<'_>) -> Result<String, RenderError> {
        Ok(self.placement.card().html(cx.children_html()).render())
    }
}

/// Card holding a single [`ImageBox`], configured with the card's own
/// arguments.
#[derive(Debug)]
pub struct ImageCard {
    image_box: Option<Arc<Widget>>,
}

impl ImageCard {
    pub fn spec() -> ToppingSpec {
        ToppingSpec::of::<Self>(Arguments::new())
    }

    /// The inner image box.
    pub fn image_box(widget: &Widget) -> Option<Arc<Widget>> {
        widget.topping::<Self>()?.image_box.clone()
    }

    /// Show `source` in the inner image box.
    pub fn set_image(widget: &Widget, source: impl Into<ImageSource>) -> ImageResult<()> {
        let image_box = Self::image_box(widget).ok_or(ImageError::UnsupportedInput {
            found: "widget is not an ImageCard",
        })?;
        ImageBox::set_image(&image_box, source)
    }
}

impl ToppingKind for ImageCard {
    const KIND: &'static str = "ImageCard";
    const PRIMARY: Option<&'static str> = Some("image");

    fn from_arguments(_: &Arguments) -> ToppingResult<Self> {
        Ok(Self { image_box: None })
    }
}

impl Topping for ImageCard {
    fn prepare(&mut self, cx: &mut PrepareContext<'_>) -> ToppingResult<()> {
        let mut spec = ImageBox::spec();
        for (key, value) in cx.arguments().iter() {
            spec = spec.with(key, value.clone());
        }
        self.image_box = Some(cx.add(spec)?);
        Ok(())
    }

    fn render(&self, cx: &RenderContext<'_>) -> Result<String, RenderError> {
        Ok(Tag::div().class(CARD_CLASS).html(cx.children_html()).render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::Label;
    use image::DynamicImage;

    #[test]
    fn test_card_wraps_children() {
        let card = Card::spec().child(Label::spec("inside")).build().unwrap();
        let html = card.render(&["<b>x</b>".to_string()]).unwrap();
        assert_eq!(html, format!("<div class=\"{}\"><b>x</b></div>", CARD_CLASS));
    }

    #[test]
    fn test_floating_placement() {
        let card = FloatingCard::spec()
            .with("top", 40)
            .with("left", "50%")
            .with("width", 300)
            .build()
            .unwrap();
        let html = card.render(&[]).unwrap();
        assert!(html.contains("position:fixed;top:40px;left:50%;z-index:10;width:300px"));
    }

    #[test]
    fn test_floating_defaults() {
        let card = FloatingCard::spec().build().unwrap();
        assert!(card.render(&[]).unwrap().contains("top:16px;left:16px"));
    }

    #[test]
    fn test_image_card_delegates() {
        let card = ImageCard::spec().with("max_length", 10).build().unwrap();
        let inner = ImageCard::image_box(&card).unwrap();
        assert_eq!(inner.topping::<ImageBox>().unwrap().max_length(), Some(10));

        ImageCard::set_image(&card, DynamicImage::new_rgb8(20, 20)).unwrap();
        assert!(inner.value().is_string());
        assert!(card.cell().raw().is_null());
    }

    #[test]
    fn test_set_image_on_wrong_kind() {
        let label = Label::spec("x").build().unwrap();
        assert!(ImageCard::set_image(&label, vec![1u8, 2]).is_err());
    }
}
