use crate::arguments::Arguments;
use crate::error::{RenderError, ToppingError, ToppingResult};
use crate::event::{Event, EventKind};
use crate::markup::Tag;
use crate::value::{Preprocessed, Value, literal_eval};
use crate::widget::{PrepareContext, RenderContext, Topping, ToppingKind, ToppingSpec, Widget};
use crate::widgets::{Column, Input, Row};
use indexmap::IndexMap;
use std::sync::Arc;

/// Argument tagging each generated input with the key it edits.
pub const DICT_KEY: &str = "dict_key";

type Inputs = Arc<IndexMap<String, Arc<Widget>>>;

/// Form with one [`Input`] per key of a dictionary.
///
/// The inputs hold the state. Writing an object to the widget fans the
/// entries out to the matching inputs and leaves the widget's own slot
/// untouched; reading it collects the inputs back into an object.
#[derive(Debug)]
pub struct DictInput {
    default: serde_json::Map<String, Value>,
    horizontal: bool,
    inputs: Inputs,
}

impl DictInput {
    pub fn spec(default: serde_json::Map<String, Value>) -> ToppingSpec {
        ToppingSpec::of::<Self>(Arguments::new().with("default", Value::Object(default)))
    }

    /// Keyed access to the inputs of a `DictInput` widget.
    pub fn view(widget: &Widget) -> Option<DictView> {
        widget.topping::<Self>().map(|dict| DictView {
            inputs: dict.inputs.clone(),
        })
    }
}

/// Caption shown for a key: underscores become spaces, capitalised unless
/// the key is a single character.
fn caption(key: &str) -> String {
    if key.chars().count() <= 1 {
        return key.to_string();
    }
    let spaced = key.replace('_', " ").to_lowercase();
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => spaced,
    }
}

fn collect(inputs: &IndexMap<String, Arc<Widget>>) -> Value {
    Value::Object(
        inputs
            .iter()
            .map(|(key, input)| (key.clone(), literal_eval(&input.value())))
            .collect(),
    )
}

impl ToppingKind for DictInput {
    const KIND: &'static str = "DictInput";
    const PRIMARY: Option<&'static str> = Some("default");

    fn from_arguments(arguments: &Arguments) -> ToppingResult<Self> {
        let default = arguments
            .object(Self::KIND, "default")?
            .ok_or_else(|| ToppingError::MissingArgument {
                kind: Self::KIND.to_string(),
                argument: "default",
            })?;
        Ok(Self {
            default,
            horizontal: arguments.bool(Self::KIND, "horizontal", false)?,
            inputs: Arc::default(),
        })
    }
}

impl Topping for DictInput {
    fn prepare(&mut self, cx: &mut PrepareContext<'_>) -> ToppingResult<()> {
        let grid = if self.horizontal {
            Row::spec()
        } else {
            Column::spec().with("centering", false)
        };
        let grid = cx.add(grid)?;

        let mut inputs = IndexMap::with_capacity(self.default.len());
        for (key, value) in &self.default {
            let input = grid.add(Input::spec(caption(key), value.clone()).with(DICT_KEY, key.as_str()))?;
            inputs.insert(key.clone(), input);
        }
        self.inputs = Arc::new(inputs);

        let fan_out = self.inputs.clone();
        cx.cell().set_preprocessor(move |value| {
            if let Value::Object(entries) = value {
                for (key, value) in entries {
                    match fan_out.get(&key) {
                        Some(input) => {
                            input.set_value(value);
                        }
                        None => tracing::debug!(key = %key, "DictInput has no such key"),
                    }
                }
            }
            Preprocessed::NoOp
        });
        let read_back = self.inputs.clone();
        cx.cell().set_postprocessor(move |_| Ok(collect(&read_back)));
        Ok(())
    }

    fn render(&self, cx: &RenderContext<'_>) -> Result<String, RenderError> {
        let class = if self.inputs.len() > 2 && !self.horizontal {
            "w3-container w3-border w3-round-large"
        } else {
            "w3-container"
        };
        Ok(Tag::div().class(class).html(cx.children_html()).render())
    }

    fn event_preprocessor(&self, event: &Event) -> Option<Value> {
        if event.kind != EventKind::ValueChanged {
            return None;
        }
        let origin = event.origin.as_ref()?;
        let key = origin.arguments().get(DICT_KEY)?.as_str()?;
        // only this form's own inputs, not those of a nested form
        if !self.inputs.get(key).is_some_and(|input| Arc::ptr_eq(input, origin)) {
            return None;
        }
        let mut entry = serde_json::Map::new();
        entry.insert(key.to_string(), event.value.clone().unwrap_or(Value::Null));
        Some(Value::Object(entry))
    }
}

/// Write-through view over a [`DictInput`]'s inputs.
#[derive(Clone)]
pub struct DictView {
    inputs: Inputs,
}

impl DictView {
    /// The value of `key`, parsed as a literal when its text is one.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inputs.get(key).map(|input| literal_eval(&input.value()))
    }

    /// Write `value` to the input for `key`. Returns `false` for unknown keys.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> bool {
        match self.inputs.get(key) {
            Some(input) => {
                input.set_value(value.into());
                true
            }
            None => false,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inputs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// The input widget editing `key`.
    pub fn input(&self, key: &str) -> Option<&Arc<Widget>> {
        self.inputs.get(key)
    }

    pub fn to_value(&self) -> Value {
        collect(&self.inputs)
    }
}

impl std::fmt::Display for DictView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (key, input) in self.inputs.iter() {
            writeln!(f, "{}:{}", key, crate::value::display_value(&input.value()))?;
        }
        Ok(())
    }
}
