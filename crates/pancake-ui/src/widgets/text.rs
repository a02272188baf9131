//! Static text widgets.

use crate::arguments::Arguments;
use crate::error::{RenderError, ToppingResult};
use crate::markup::Tag;
use crate::value::{Value, display_value};
use crate::widget::{PrepareContext, RenderContext, Topping, ToppingKind, ToppingSpec};
use indexmap::IndexMap;

type Style = IndexMap<String, String>;

fn initial_text(kind: &str, arguments: &Arguments) -> ToppingResult<Value> {
    Ok(Value::from(arguments.text(kind, "text")?.unwrap_or_default()))
}

/// Inline label. Without a `style` it gets a faint text shadow.
#[derive(Debug)]
pub struct Label {
    style: Style,
}

impl Label {
    pub fn spec(text: impl Into<String>) -> ToppingSpec {
        ToppingSpec::of::<Self>(Arguments::new().with("text", text.into()))
    }
}

impl ToppingKind for Label {
    const KIND: &'static str = "Label";
    const PRIMARY: Option<&'static str> = Some("text");

    fn from_arguments(arguments: &Arguments) -> ToppingResult<Self> {
        let style = arguments.style(Self::KIND, "style")?.unwrap_or_else(|| {
            IndexMap::from([("text-shadow".to_string(), "1px 1px 1px #bbb".to_string())])
        });
        Ok(Self { style })
    }
}

impl Topping for Label {
    fn prepare(&mut self, cx: &mut PrepareContext<'_>) -> ToppingResult<()> {
        cx.init_value(initial_text(Self::KIND, cx.arguments())?);
        Ok(())
    }

    fn render(&self, cx: &RenderContext<'_>) -> Result<String, RenderError> {
        Ok(Tag::new("label")
            .styles(self.style.clone())
            .text(display_value(&cx.value))
            .render())
    }
}

/// Block of text with optional alignment and shadow.
#[derive(Debug)]
pub struct Text {
    style: Style,
}

impl Text {
    pub fn spec(text: impl Into<String>) -> ToppingSpec {
        ToppingSpec::of::<Self>(Arguments::new().with("text", text.into()))
    }
}

impl ToppingKind for Text {
    const KIND: &'static str = "Text";
    const PRIMARY: Option<&'static str> = Some("text");

    fn from_arguments(arguments: &Arguments) -> ToppingResult<Self> {
        let mut style = arguments.style(Self::KIND, "style")?.unwrap_or_default();
        if let Some(align) = arguments.text(Self::KIND, "align")? {
            style.insert("text-align".to_string(), align);
        }
        if let Some(shadow) = arguments.f64(Self::KIND, "shadow")? {
            let blur = arguments.f64(Self::KIND, "shadow_blur")?.unwrap_or(shadow);
            style.insert(
                "text-shadow".to_string(),
                format!("{}px {}px {}px #bbb", shadow, shadow, blur),
            );
        }
        Ok(Self { style })
    }
}

impl Topping for Text {
    fn prepare(&mut self, cx: &mut PrepareContext<'_>) -> ToppingResult<()> {
        cx.init_value(initial_text(Self::KIND, cx.arguments())?);
        Ok(())
    }

    fn render(&self, cx: &RenderContext<'_>) -> Result<String, RenderError> {
        Ok(Tag::div()
            .styles(self.style.clone())
            .text(display_value(&cx.value))
            .render())
    }
}

/// A `<p>` paragraph.
#[derive(Debug)]
pub struct Paragraph {
    style: Style,
}

impl Paragraph {
    pub fn spec(text: impl Into<String>) -> ToppingSpec {
        ToppingSpec::of::<Self>(Arguments::new().with("text", text.into()))
    }
}

impl ToppingKind for Paragraph {
    const KIND: &'static str = "Paragraph";
    const PRIMARY: Option<&'static str> = Some("text");

    fn from_arguments(arguments: &Arguments) -> ToppingResult<Self> {
        Ok(Self {
            style: arguments.style(Self::KIND, "style")?.unwrap_or_default(),
        })
    }
}

impl Topping for Paragraph {
    fn prepare(&mut self, cx: &mut PrepareContext<'_>) -> ToppingResult<()> {
        cx.init_value(initial_text(Self::KIND, cx.arguments())?);
        Ok(())
    }

    fn render(&self, cx: &RenderContext<'_>) -> Result<String, RenderError> {
        Ok(Tag::new("p")
            .styles(self.style.clone())
            .text(display_value(&cx.value))
            .render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_label_default_shadow() {
        let label = Label::spec("hi").build().unwrap();
        assert_eq!(
            label.render(&[]).unwrap(),
            "<label style=\"text-shadow:1px 1px 1px #bbb\">hi</label>"
        );
    }

    #[test]
    fn test_label_custom_style_replaces_shadow() {
        let label = ToppingSpec::of::<Label>(
            Arguments::new().with("text", "hi").with("style", json!({"color": "red"})),
        )
        .build()
        .unwrap();
        assert_eq!(label.render(&[]).unwrap(), "<label style=\"color:red\">hi</label>");
    }

    #[test]
    fn test_text_align_and_shadow() {
        let text = Text::spec("t")
            .with("align", "center")
            .with("shadow", 2)
            .build()
            .unwrap();
        let html = text.render(&[]).unwrap();
        assert!(html.contains("text-align:center"));
        assert!(html.contains("text-shadow:2px 2px 2px #bbb"));
    }

    #[test]
    fn test_text_shadow_blur() {
        let text = Text::spec("t").with("shadow", 1).with("shadow_blur", 4).build().unwrap();
        assert!(text.render(&[]).unwrap().contains("text-shadow:1px 1px 4px #bbb"));
    }

    #[test]
    fn test_paragraph() {
        let p = Paragraph::spec("body").build().unwrap();
        assert_eq!(p.render(&[]).unwrap(), "<p>body</p>");
        assert_eq!(p.value(), Value::from("body"));
    }

    #[test]
    fn test_empty_text() {
        let label = ToppingSpec::of::<Label>(Arguments::new()).build().unwrap();
        assert_eq!(label.value(), Value::from(""));
    }
}
