//! Ready-made widget kinds built on the public `pancake_ui` API.

use pancake_ui::arguments::Arguments;
use pancake_ui::markup::Tag;
use pancake_ui::registry::KindDescriptor;
use pancake_ui::value::display_value;
use pancake_ui::widgets::{Button, DictInput, Label, Row};
use pancake_ui::{
    PrepareContext, RenderContext, RenderError, Topping, ToppingFactory, ToppingKind,
    ToppingRegistry, ToppingResult, ToppingSpec, Value, Widget,
};
use std::sync::Arc;

/// A button that shouts its title.
///
/// Unlike [`Button`](pancake_ui::widgets::Button) it only reports clicks once
/// a handler is installed.
#[derive(Debug)]
pub struct ExclaimButton {
    title: String,
}

impl ExclaimButton {
    pub fn spec(title: impl Into<String>) -> ToppingSpec {
        ToppingSpec::of::<Self>(Arguments::new().with("title", title.into()))
    }
}

impl ToppingKind for ExclaimButton {
    const KIND: &'static str = "ExclaimButton";
    const PRIMARY: Option<&'static str> = Some("title");

    fn from_arguments(arguments: &Arguments) -> ToppingResult<Self> {
        Ok(Self {
            title: arguments.require_text(Self::KIND, "title")?,
        })
    }
}

impl Topping for ExclaimButton {
    fn prepare(&mut self, cx: &mut PrepareContext<'_>) -> ToppingResult<()> {
        cx.init_value(Value::from(self.title.clone()));
        Ok(())
    }

    fn render(&self, cx: &RenderContext<'_>) -> Result<String, RenderError> {
        let mut button = Tag::new("button").class("button");
        if cx.clickable {
            button = button.click_response();
        }
        Ok(button.text(format!("{}!!!", display_value(&cx.value))).render())
    }
}

/// Keyword arguments passed to a [`FunctionTopping`]'s function.
pub type FunctionArguments = serde_json::Map<String, Value>;

/// Function shown by a [`FunctionTopping`].
pub type ToppingFn = Arc<dyn Fn(&FunctionArguments) -> Value + Send + Sync>;

/// A plain function turned into a widget.
///
/// The widget holds a [`DictInput`] with one field per argument, a button
/// titled with the function's name and a label showing the last result.
/// Clicking the button calls the function with the current field values.
///
/// The kind is registered under the function's name, so a registry can hold
/// any number of them. Arguments given at creation override the defaults of
/// matching keys.
pub struct FunctionTopping {
    name: String,
    defaults: FunctionArguments,
    function: ToppingFn,
    call: Option<Call>,
}

#[derive(Clone)]
struct Call {
    form: Arc<Widget>,
    output: Arc<Widget>,
    function: ToppingFn,
}

impl Call {
    fn invoke(&self) -> Value {
        let arguments = match self.form.value() {
            Value::Object(arguments) => arguments,
            _ => FunctionArguments::new(),
        };
        let result = (self.function)(&arguments);
        self.output.set_value(Value::from(display_value(&result)));
        result
    }
}

impl FunctionTopping {
    /// Spec for a widget running `function`.
    pub fn spec<F>(name: impl Into<String>, defaults: FunctionArguments, function: F) -> ToppingSpec
    where
        F: Fn(&FunctionArguments) -> Value + Send + Sync + 'static,
    {
        let descriptor = Self::descriptor(name, defaults, function);
        ToppingSpec::from_factory(descriptor.name, Arguments::new(), descriptor.factory)
    }

    /// Registry entry for `function`, named after it.
    pub fn descriptor<F>(name: impl Into<String>, defaults: FunctionArguments, function: F) -> KindDescriptor
    where
        F: Fn(&FunctionArguments) -> Value + Send + Sync + 'static,
    {
        let name = name.into();
        let function: ToppingFn = Arc::new(function);
        let kind = name.clone();
        let factory: ToppingFactory = Arc::new(move |arguments: &Arguments| {
            let mut defaults = defaults.clone();
            for (key, value) in arguments.iter() {
                match defaults.get_mut(key) {
                    Some(slot) => *slot = value.clone(),
                    None => tracing::debug!(function = %kind, argument = key, "unknown argument ignored"),
                }
            }
            Ok(Box::new(FunctionTopping {
                name: kind.clone(),
                defaults,
                function: function.clone(),
                call: None,
            }) as Box<dyn Topping>)
        });
        KindDescriptor {
            name,
            primary: None,
            factory,
        }
    }

    /// Call the function of a `FunctionTopping` widget with its current field
    /// values, as a click on its button would.
    pub fn run(widget: &Widget) -> Option<Value> {
        widget
            .topping::<Self>()
            .and_then(|topping| topping.call.as_ref())
            .map(Call::invoke)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The argument form of a `FunctionTopping` widget.
    pub fn form(widget: &Widget) -> Option<Arc<Widget>> {
        let topping = widget.topping::<Self>()?;
        topping.call.as_ref().map(|call| call.form.clone())
    }

    /// The label showing the last result.
    pub fn output(widget: &Widget) -> Option<Arc<Widget>> {
        let topping = widget.topping::<Self>()?;
        topping.call.as_ref().map(|call| call.output.clone())
    }
}

impl std::fmt::Debug for FunctionTopping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionTopping")
            .field("name", &self.name)
            .field("defaults", &self.defaults)
            .finish()
    }
}

impl Topping for FunctionTopping {
    fn prepare(&mut self, cx: &mut PrepareContext<'_>) -> ToppingResult<()> {
        let form = cx.add(DictInput::spec(self.defaults.clone()))?;
        let row = cx.add(Row::spec().with("padding", false))?;
        let button = row.add(Button::spec(self.name.as_str()))?;
        let output = row.add(Label::spec(""))?;

        let call = Call {
            form,
            output,
            function: self.function.clone(),
        };
        let on_click = call.clone();
        button.set_clicked(move |_| {
            on_click.invoke();
        });
        self.call = Some(call);
        Ok(())
    }

    fn render(&self, cx: &RenderContext<'_>) -> Result<String, RenderError> {
        Ok(Tag::div()
            .class("w3-container w3-card w3-round-large")
            .html(cx.children_html())
            .render())
    }
}

/// Register every recipe kind.
pub fn register_recipes(registry: &mut ToppingRegistry) {
    registry.register::<ExclaimButton>();
}

/// Register `function` as a kind named `name`.
pub fn register_function<F>(
    registry: &mut ToppingRegistry,
    name: impl Into<String>,
    defaults: FunctionArguments,
    function: F,
) where
    F: Fn(&FunctionArguments) -> Value + Send + Sync + 'static,
{
    registry.insert(FunctionTopping::descriptor(name, defaults, function));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pancake_ui::markup::EVENT_ATTRIBUTE;

    #[test]
    fn test_marker_follows_handler() {
        let button = ExclaimButton::spec("Go").build().unwrap();
        let html = button.render(&[]).unwrap();
        assert_eq!(html, "<button class=\"button\">Go!!!</button>");
        assert!(!html.contains(EVENT_ATTRIBUTE));

        button.set_clicked(|_| {});
        assert!(button.render(&[]).unwrap().contains(EVENT_ATTRIBUTE));
        button.clear_clicked();
        assert!(!button.render(&[]).unwrap().contains(EVENT_ATTRIBUTE));
    }

    fn sum_defaults() -> FunctionArguments {
        match serde_json::json!({"a": 1, "b": 2}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn sum(arguments: &FunctionArguments) -> Value {
        let total: i64 = arguments.values().filter_map(Value::as_i64).sum();
        Value::from(total)
    }

    #[test]
    fn test_function_topping_layout() {
        let widget = FunctionTopping::spec("sum", sum_defaults(), sum).build().unwrap();
        assert_eq!(widget.kind(), "sum");
        assert_eq!(widget.children()[0].kind(), "DictInput");
        let row = widget.children()[1].clone();
        let button = row.children()[0].clone();
        assert_eq!(button.value(), Value::from("sum"));
        assert!(button.is_clickable());
        assert_eq!(FunctionTopping::output(&widget).unwrap().value(), Value::from(""));
    }

    #[test]
    fn test_function_topping_runs_with_form_values() {
        let widget = FunctionTopping::spec("sum", sum_defaults(), sum).build().unwrap();
        assert_eq!(FunctionTopping::run(&widget), Some(Value::from(3)));
        assert_eq!(FunctionTopping::output(&widget).unwrap().value(), Value::from("3"));

        let form = FunctionTopping::form(&widget).unwrap();
        DictInput::view(&form).unwrap().set("b", 40);
        let button = widget.children()[1].children()[0].clone();
        assert!(button.click());
        assert_eq!(FunctionTopping::output(&widget).unwrap().value(), Value::from("41"));
    }

    #[test]
    fn test_function_registered_under_its_name() {
        let mut registry = ToppingRegistry::builtin();
        register_function(&mut registry, "sum", sum_defaults(), sum);
        let widget = registry
            .spec("sum", Arguments::new().with("a", 10).with("c", 99))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(FunctionTopping::run(&widget), Some(Value::from(12)));
        assert!(FunctionTopping::run(&ExclaimButton::spec("x").build().unwrap()).is_none());
    }

    #[test]
    fn test_registered_by_name() {
        let mut registry = ToppingRegistry::builtin();
        register_recipes(&mut registry);
        let button = registry
            .spec_with_primary("ExclaimButton", "Hey")
            .unwrap()
            .build()
            .unwrap();
        assert!(button.render(&[]).unwrap().contains("Hey!!!"));
    }
}
