//! Minimal HTML builder used by the built-in widget kinds.
//!
//! Widgets describe their markup with [`Tag`] trees instead of formatting
//! strings by hand, so escaping and the event markers stay consistent.

use indexmap::IndexMap;
use std::borrow::Cow;
use std::fmt::Write;

/// Attribute carrying the client event a node reports back.
pub const EVENT_ATTRIBUTE: &str = "data-pk-event";

/// Marker value for nodes that report clicks.
pub const CLICK_RESPONSE: &str = "onclick";

/// Marker value for inputs that report value changes.
pub const CHANGE_RESPONSE: &str = "value_changed";

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input"];

/// Escapes HTML special characters in a string.
///
/// Returns a borrowed reference if no escaping is needed.
pub fn escape(s: &str) -> Cow<'_, str> {
    if s.contains(['&', '<', '>', '"', '\'']) {
        let mut escaped = String::with_capacity(s.len() + 8);
        for c in s.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&#x27;"),
                _ => escaped.push(c),
            }
        }
        Cow::Owned(escaped)
    } else {
        Cow::Borrowed(s)
    }
}

#[derive(Debug, Clone)]
enum Content {
    Text(String),
    Html(String),
    Tag(Tag),
}

/// An HTML element under construction.
#[derive(Debug, Clone)]
pub struct Tag {
    name: Cow<'static, str>,
    attributes: IndexMap<String, String>,
    style: IndexMap<String, String>,
    content: Vec<Content>,
}

impl Tag {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            style: IndexMap::new(),
            content: Vec::new(),
        }
    }

    pub fn div() -> Self {
        Self::new("div")
    }

    /// Set the `class` attribute. Empty classes are dropped.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if class.is_empty() {
            self.attributes.shift_remove("class");
        } else {
            self.attributes.insert("class".to_string(), class);
        }
        self
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(key.into(), value.into());
        self
    }

    pub fn styles<K, V>(mut self, styles: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.style
            .extend(styles.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Append escaped text.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.content.push(Content::Text(text.into()));
        self
    }

    /// Append pre-rendered markup verbatim.
    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.content.push(Content::Html(html.into()));
        self
    }

    pub fn child(mut self, tag: Tag) -> Self {
        self.content.push(Content::Tag(tag));
        self
    }

    /// Append a child in place, for builders that loop.
    pub fn push(&mut self, tag: Tag) {
        self.content.push(Content::Tag(tag));
    }

    /// Declare that clicks on this node are reported to the server.
    pub fn click_response(self) -> Self {
        self.attr(EVENT_ATTRIBUTE, CLICK_RESPONSE)
    }

    /// Declare that edits of this node's value are reported to the server.
    pub fn change_response(self) -> Self {
        self.attr(EVENT_ATTRIBUTE, CHANGE_RESPONSE)
    }

    pub fn has_attr(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            let _ = write!(out, " {}=\"{}\"", key, escape(value));
        }
        if !self.style.is_empty() {
            let style = self
                .style
                .iter()
                .map(|(k, v)| format!("{}:{}", k, v))
                .collect::<Vec<_>>()
                .join(";");
            let _ = write!(out, " style=\"{}\"", escape(&style));
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&self.name.as_ref()) {
            return;
        }

        for content in &self.content {
            match content {
                Content::Text(text) => out.push_str(&escape(text)),
                Content::Html(html) => out.push_str(html),
                Content::Tag(tag) => tag.render_into(out),
            }
        }
        let _ = write!(out, "</{}>", self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), Cow::Borrowed("plain"));
        assert_eq!(escape("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#x27;");
    }

    #[test]
    fn test_render_nested() {
        let html = Tag::div()
            .class("w3-row")
            .child(Tag::new("label").style("color", "red").text("a < b"))
            .html("<b>raw</b>")
            .render();
        assert_eq!(
            html,
            "<div class=\"w3-row\"><label style=\"color:red\">a &lt; b</label><b>raw</b></div>"
        );
    }

    #[test]
    fn test_void_elements_have_no_closing_tag() {
        let html = Tag::new("input").attr("value", "7").change_response().render();
        assert_eq!(html, "<input value=\"7\" data-pk-event=\"value_changed\">");
    }

    #[test]
    fn test_empty_class_is_dropped() {
        let html = Tag::div().class("w3-card").class("").render();
        assert_eq!(html, "<div></div>");
    }

    #[test]
    fn test_click_marker() {
        let tag = Tag::new("button").click_response();
        assert!(tag.has_attr(EVENT_ATTRIBUTE));
        assert!(tag.render().contains("data-pk-event=\"onclick\""));
    }
}
