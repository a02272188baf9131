//! Event routing from decoded client messages into widget values.

use pancake_ui::widgets::{
    Button, DictInput, ImageBox, ImageCard, Input, Label, Paragraph, Row, Slider, Text,
};
use pancake_ui::{Dispatch, EventKind, EventRouter, RenderEngine, Value, WidgetId, WidgetTree};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn object(value: Value) -> serde_json::Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {}", other),
    }
}

#[test]
fn test_input_coerces_client_text() {
    let tree = WidgetTree::new();
    let input = tree.add(Input::spec("Count", 5)).unwrap();
    let router = EventRouter::new(tree.clone());
    let id = input.id().unwrap();

    assert_eq!(router.handle(id, "value_changed", Some(json!("7"))), Dispatch::Handled);
    assert_eq!(input.value(), json!(7));
    assert!(input.value().is_i64());

    assert_eq!(router.handle(id, "value_changed", Some(json!("abc"))), Dispatch::Handled);
    assert_eq!(input.value(), json!("abc"));
}

#[test]
fn test_slider_accepts_numeric_text() {
    let tree = WidgetTree::new();
    let slider = tree.add(Slider::spec("Vol", 0, 10, None)).unwrap();
    assert_eq!(slider.value(), json!(0));

    EventRouter::new(tree.clone()).handle(slider.id().unwrap(), EventKind::ValueChanged, Some(json!("4")));
    assert_eq!(slider.value(), json!(4));
}

#[test]
fn test_passive_widgets_keep_their_value() {
    let tree = WidgetTree::new();
    let widgets = [
        tree.add(Label::spec("static")).unwrap(),
        tree.add(Text::spec("static")).unwrap(),
        tree.add(Paragraph::spec("static")).unwrap(),
        tree.add(Button::spec("static")).unwrap(),
    ];
    let mut engine = RenderEngine::new();
    engine.full_render(&tree);

    let router = EventRouter::new(tree.clone());
    for widget in &widgets {
        let id = widget.id().unwrap();
        assert_eq!(router.handle(id, "value_changed", Some(json!("forged"))), Dispatch::Ignored, "{}", widget.kind());
        assert_eq!(widget.value(), json!("static"), "{}", widget.kind());
    }
    assert!(engine.incremental_render(&tree).is_empty());
}

#[test]
fn test_image_box_never_reads_client_paths() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("secret.png");
    image::RgbImage::new(4, 4).save(&path).unwrap();
    let client_path = json!(path.to_string_lossy());

    let tree = WidgetTree::new();
    let image_box = tree.add(ImageBox::spec()).unwrap();
    let card = tree.add(ImageCard::spec()).unwrap();
    let inner = ImageCard::image_box(&card).unwrap();
    let mut engine = RenderEngine::new();
    engine.full_render(&tree);

    let router = EventRouter::new(tree.clone());
    for widget in [&image_box, &card, &inner] {
        let id = widget.id().unwrap();
        assert_eq!(router.handle(id, "value_changed", Some(client_path.clone())), Dispatch::Ignored);
    }
    assert!(image_box.value().is_null());
    assert!(inner.value().is_null());
    let patch = engine.incremental_render(&tree);
    assert!(patch.is_empty());
}

#[test]
fn test_unknown_widget_is_ignored() {
    let tree = WidgetTree::new();
    let label = tree.add(Label::spec("gone")).unwrap();
    let id = label.id().unwrap();
    tree.detach(&label);

    let router = EventRouter::new(tree.clone());
    assert_eq!(router.handle(id, "onclick", None), Dispatch::Ignored);
    assert_eq!(router.handle(WidgetId::from_raw(9_999), "value_changed", Some(json!(1))), Dispatch::Ignored);
    assert_eq!(tree.len(), 1);
}

#[test]
fn test_click_without_handler_is_ignored() {
    let tree = WidgetTree::new();
    let button = tree.add(Button::spec("idle")).unwrap();
    let router = EventRouter::new(tree.clone());
    assert_eq!(router.handle(button.id().unwrap(), "onclick", None), Dispatch::Ignored);
    assert_eq!(button.value(), json!("idle"));
}

#[test]
fn test_click_calls_handler_once() {
    let tree = WidgetTree::new();
    let button = tree.add(Button::spec("Go")).unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    button.set_clicked(move |click| {
        assert_eq!(click.widget.kind(), "Button");
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let router = EventRouter::new(tree.clone());
    assert_eq!(router.handle(button.id().unwrap(), "onclick", None), Dispatch::Handled);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_panicking_handler_is_contained() {
    let tree = WidgetTree::new();
    let row = tree.add(Row::spec()).unwrap();
    let broken = row.add(Button::spec("broken")).unwrap();
    let working = row.add(Button::spec("working")).unwrap();
    broken.set_clicked(|_| panic!("handler bug"));
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    working.set_clicked(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let router = EventRouter::new(tree.clone());
    assert_eq!(router.handle(broken.id().unwrap(), "onclick", None), Dispatch::Failed);
    assert_eq!(router.handle(working.id().unwrap(), "onclick", None), Dispatch::Handled);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(tree.contains(broken.id().unwrap()));
}

#[test]
fn test_dict_input_fans_out_without_storing() {
    let tree = WidgetTree::new();
    let dict = tree
        .add(DictInput::spec(object(json!({"width": 3, "name": "box"}))))
        .unwrap();
    let view = DictInput::view(&dict).unwrap();

    assert!(!dict.set_value(json!({"width": 12})));
    assert_eq!(view.input("width").unwrap().value(), json!(12));
    assert_eq!(dict.cell().raw(), Value::Null);
    assert_eq!(dict.cell().version(), 0);
    assert_eq!(dict.value(), json!({"width": 12, "name": "box"}));
}

#[test]
fn test_dict_input_child_event_bubbles() {
    let tree = WidgetTree::new();
    let dict = tree.add(DictInput::spec(object(json!({"a": 1, "b": 2})))).unwrap();
    let view = DictInput::view(&dict).unwrap();
    let b = view.input("b").unwrap().clone();

    let router = EventRouter::new(tree.clone());
    assert_eq!(router.handle(b.id().unwrap(), "value_changed", Some(json!("20"))), Dispatch::Handled);
    assert_eq!(view.get("b"), Some(json!(20)));
    assert_eq!(dict.value(), json!({"a": 1, "b": 20}));
    assert_eq!(dict.cell().raw(), Value::Null);
}

#[test]
fn test_dict_input_ignores_foreign_inputs() {
    let tree = WidgetTree::new();
    let dict = tree.add(DictInput::spec(object(json!({"a": 1})))).unwrap();
    let stray = dict.add(Input::spec("A", 0).with("dict_key", "a")).unwrap();

    let router = EventRouter::new(tree.clone());
    assert_eq!(router.handle(stray.id().unwrap(), "value_changed", Some(json!("99"))), Dispatch::Handled);
    assert_eq!(stray.value(), json!(99));
    assert_eq!(dict.value(), json!({"a": 1}));
}

#[test]
fn test_handler_can_spawn_widgets() {
    let tree = WidgetTree::new();
    let button = tree.add(Button::spec("more")).unwrap();
    button.set_clicked(|click| {
        let tree = click.tree.as_ref().unwrap();
        let label = tree.add(Label::spec("new")).unwrap();
        tree.show_message(format!("Label {} is created.", label.id().unwrap()));
    });

    let router = EventRouter::new(tree.clone());
    router.handle(button.id().unwrap(), "onclick", None);
    router.handle(button.id().unwrap(), "onclick", None);
    assert_eq!(tree.root().children().len(), 3);
    assert_eq!(tree.take_messages().len(), 2);
}
