//! Built-in widget kinds used through the tree.

use pancake_ui::widgets::{Button, Card, Column, Label, Paragraph, Row, Text, ToolBox};
use pancake_ui::{
    Arguments, DirtyFlags, EventRouter, RenderContext, RenderEngine, RenderError, Topping,
    ToppingError, ToppingKind, ToppingRegistry, ToppingResult, ToppingSpec, Value, WidgetId,
    WidgetTree,
};
use serde_json::json;
use std::sync::Arc;

fn samples() -> Vec<Value> {
    vec![
        json!("text"),
        json!(""),
        json!(42),
        json!(-1.5),
        json!(true),
        Value::Null,
        json!([1, "two", null]),
        json!({"nested": {"k": [1, 2]}}),
    ]
}

#[test]
fn test_value_round_trip_without_hooks() {
    let specs = [
        Label::spec("l"),
        Text::spec("t"),
        Paragraph::spec("p"),
        Button::spec("b"),
        Row::spec(),
        Column::spec(),
        Card::spec(),
    ];
    let tree = WidgetTree::new();
    for spec in specs {
        let kind = spec.kind().to_string();
        let widget = tree.add(spec).unwrap();
        for value in samples() {
            assert!(widget.set_value(value.clone()));
            assert_eq!(widget.value(), value, "{} did not round-trip", kind);
        }
    }
}

#[test]
fn test_button_title_setter_rerenders() {
    let tree = WidgetTree::new();
    let button = tree.add(Button::spec("Go")).unwrap();
    let mut engine = RenderEngine::new();
    let html = engine.full_render(&tree);
    assert!(html.contains(">Go</button>"));

    assert!(Button::set_title(&button, "Stop"));
    assert_eq!(Button::title(&button).as_deref(), Some("Stop"));
    let patch = engine.incremental_render(&tree);
    assert!(patch.get(button.id().unwrap()).unwrap().contains(">Stop</button>"));
}

#[test]
fn test_installing_a_handler_marks_style() {
    let tree = WidgetTree::new();
    let label = tree.add(Label::spec("clickable label")).unwrap();
    RenderEngine::new().full_render(&tree);

    label.set_clicked(|_| {});
    assert!(label.is_clickable());
    assert_eq!(tree.dirty_flags(label.id().unwrap()), DirtyFlags::STYLE);
}

#[test]
fn test_create_by_kind_name() {
    let tree = WidgetTree::new();
    let slider = tree
        .create(
            "Slider",
            Arguments::new()
                .with("label", "Vol")
                .with("range_min", 0)
                .with("range_max", 10)
                .with("value", 3),
        )
        .unwrap();
    assert_eq!(slider.kind(), "Slider");
    assert_eq!(slider.value(), json!(3));
    assert!(slider.is_attached());

    assert!(matches!(
        tree.create("Carousel", Arguments::new()),
        Err(ToppingError::UnknownKind { .. })
    ));
    assert!(matches!(
        tree.create("Slider", Arguments::new().with("label", "Vol").with("range_min", 0)),
        Err(ToppingError::MissingArgument { argument: "range_max", .. })
    ));
}

#[test]
fn test_invalid_arguments_fail_fast() {
    let err = ToppingSpec::of::<Row>(Arguments::new().with("padding", "lots"))
        .build()
        .unwrap_err();
    assert!(matches!(err, ToppingError::InvalidArgument { argument: "padding", .. }));
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_fresh_children_per_construction() {
    let first = Row::spec().build().unwrap();
    let second = Row::spec().build().unwrap();
    first.add(Label::spec("only in first")).unwrap();
    assert_eq!(first.children().len(), 1);
    assert!(second.children().is_empty());
}

#[test]
fn test_toolbox_click_through_router() {
    let tree = WidgetTree::new();
    let toolbox = tree.add(ToolBox::spec().with("kinds", json!(["Button", "Label"]))).unwrap();
    let mut engine = RenderEngine::new();
    engine.full_render(&tree);

    let button_button = toolbox.children()[0].children()[0].clone();
    EventRouter::new(tree.clone()).handle(button_button.id().unwrap(), "onclick", None);

    let spawned = tree.root().children().last().unwrap().clone();
    assert_eq!(spawned.kind(), "Button");
    assert_eq!(
        tree.take_messages(),
        vec![format!("Button {} is created.", spawned.id().unwrap())]
    );
    // the new widget is inside the root fragment
    assert_eq!(engine.incremental_render(&tree).ids(), vec![WidgetId::ROOT]);
}

struct Badge {
    color: String,
}

impl ToppingKind for Badge {
    const KIND: &'static str = "Badge";
    const PRIMARY: Option<&'static str> = Some("color");

    fn from_arguments(arguments: &Arguments) -> ToppingResult<Self> {
        Ok(Self {
            color: arguments.require_text(Self::KIND, "color")?,
        })
    }
}

impl Topping for Badge {
    fn render(&self, cx: &RenderContext<'_>) -> Result<String, RenderError> {
        Ok(format!("<span class=\"badge-{}\">{}</span>", self.color, cx.value))
    }
}

#[test]
fn test_custom_kind_through_registry() {
    let mut registry = ToppingRegistry::builtin();
    registry.register::<Badge>();
    let tree = WidgetTree::with_registry(Arc::new(registry));

    let badge = tree
        .add(tree.registry().spec_with_primary("Badge", "red").unwrap())
        .unwrap();
    badge.set_value(json!(3));
    assert!(badge.topping::<Badge>().is_some());
    assert!(badge.topping::<Label>().is_none());

    let html = RenderEngine::new().full_render(&tree);
    assert!(html.contains("<span class=\"badge-red\">3</span>"));
}
