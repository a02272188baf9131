//! Pages of a plate.
//!
//! A page is built once, when it is added to a [`Plate`](crate::Plate), and
//! kept while other pages are shown. `show_up` runs every time navigation
//! lands on it.

use crate::plate::WeakPlate;
use pancake_ui::{IntoWidget, ToppingResult, Widget};
use std::sync::Arc;

/// What a page's hooks get to work with.
pub struct PageContext<'a> {
    pub(crate) plate: WeakPlate,
    pub(crate) page: &'a Arc<Widget>,
    pub(crate) cake: &'a Arc<Widget>,
}

impl<'a> PageContext<'a> {
    /// Append a widget to this page.
    pub fn add(&self, child: impl IntoWidget) -> ToppingResult<Arc<Widget>> {
        self.page.add(child)
    }

    pub fn add_named(&self, child: impl IntoWidget, name: impl Into<String>) -> ToppingResult<Arc<Widget>> {
        self.page.add_named(child, name)
    }

    /// The page's container.
    pub fn page(&self) -> &Arc<Widget> {
        self.page
    }

    /// The container shared by every page.
    pub fn cake(&self) -> &Arc<Widget> {
        self.cake
    }

    /// Handle for navigation from event handlers.
    pub fn plate(&self) -> WeakPlate {
        self.plate.clone()
    }
}

/// A named page.
///
/// # Example
///
/// ```
/// use pancake::{Page, PageContext};
/// use pancake::widgets::Button;
/// use pancake::ToppingResult;
///
/// struct Waffle;
///
/// impl Page for Waffle {
///     fn name(&self) -> &str {
///         "Waffle"
///     }
///
///     fn decorate(&self, cx: &PageContext<'_>) -> ToppingResult<()> {
///         let plate = cx.plate();
///         let button = cx.add(Button::spec("I want to have a taiyaki!"))?;
///         button.set_clicked(move |_| {
///             plate.go_to("Taiyaki");
///         });
///         Ok(())
///     }
/// }
/// ```
pub trait Page: Send + Sync + 'static {
    fn name(&self) -> &str;

    /// Build the page's widgets. Called once.
    fn decorate(&self, cx: &PageContext<'_>) -> ToppingResult<()>;

    /// Called each time the page becomes active.
    fn show_up(&self, _cx: &PageContext<'_>) {}
}

type ShowUp = Box<dyn Fn(&PageContext<'_>) + Send + Sync>;

/// A page defined by closures.
pub struct FnPage<F>
where
    F: Fn(&PageContext<'_>) -> ToppingResult<()> + Send + Sync + 'static,
{
    name: String,
    decorate_fn: F,
    show_up_fn: Option<ShowUp>,
}

impl<F> FnPage<F>
where
    F: Fn(&PageContext<'_>) -> ToppingResult<()> + Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>, decorate_fn: F) -> Self {
        Self {
            name: name.into(),
            decorate_fn,
            show_up_fn: None,
        }
    }

    pub fn on_show_up(mut self, f: impl Fn(&PageContext<'_>) + Send + Sync + 'static) -> Self {
        self.show_up_fn = Some(Box::new(f));
        self
    }
}

impl<F> Page for FnPage<F>
where
    F: Fn(&PageContext<'_>) -> ToppingResult<()> + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn decorate(&self, cx: &PageContext<'_>) -> ToppingResult<()> {
        (self.decorate_fn)(cx)
    }

    fn show_up(&self, cx: &PageContext<'_>) {
        if let Some(show_up) = &self.show_up_fn {
            show_up(cx);
        }
    }
}
