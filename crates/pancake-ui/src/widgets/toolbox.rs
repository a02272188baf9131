use crate::arguments::Arguments;
use crate::error::{RenderError, ToppingResult};
use crate::value::display_value;
use crate::widget::{Click, PrepareContext, RenderContext, Topping, ToppingKind, ToppingSpec};
use crate::widgets::card::Placement;
use crate::widgets::{Button, Row};

/// Kinds offered when `kinds` is not given.
pub const DEFAULT_KINDS: &[&str] = &["Button", "Input", "Label"];

/// Floating palette with one button per widget kind.
///
/// Clicking a button builds that kind through the tree's registry, appends it
/// to the tree root and queues a `"{kind} {id} is created."` message.
#[derive(Debug)]
pub struct ToolBox {
    kinds: Vec<String>,
    placement: Placement,
}

impl ToolBox {
    pub fn spec() -> ToppingSpec {
        ToppingSpec::of::<Self>(Arguments::new())
    }

    pub fn kinds(&self) -> &[String] {
        &self.kinds
    }
}

fn spawn(click: &Click) {
    let Some(tree) = &click.tree else {
        tracing::debug!("tool box button clicked outside a tree");
        return;
    };
    let kind = display_value(&click.widget.value());
    let spawned = tree
        .registry()
        .spec_with_primary(&kind, kind.clone())
        .and_then(|spec| tree.add(spec));
    match spawned {
        Ok(widget) => {
            let id = widget.id().map(|id| id.to_string()).unwrap_or_default();
            tree.show_message(format!("{} {} is created.", kind, id));
        }
        Err(err) => tracing::warn!(kind = %kind, error = %err, "tool box could not create widget"),
    }
}

impl ToppingKind for ToolBox {
    const KIND: &'static str = "ToolBox";

    fn from_arguments(arguments: &Arguments) -> ToppingResult<Self> {
        let kinds = arguments
            .string_list(Self::KIND, "kinds")?
            .unwrap_or_else(|| DEFAULT_KINDS.iter().map(|k| k.to_string()).collect());
        Ok(Self {
            kinds,
            placement: Placement::from_arguments(Self::KIND, arguments)?,
        })
    }
}

impl Topping for ToolBox {
    fn prepare(&mut self, cx: &mut PrepareContext<'_>) -> ToppingResult<()> {
        let row = cx.add(Row::spec().with("padding", false))?;
        for kind in &self.kinds {
            let button = row.add(Button::spec(kind.as_str()))?;
            button.set_clicked(spawn);
        }
        Ok(())
    }

    fn render(&self, cx: &RenderContext<'_>) -> Result<String, RenderError> {
        Ok(self.placement.card().html(cx.children_html()).render())
    }
}
