//! The session object.
//!
//! A [`Plate`] owns one [`WidgetTree`] per client session. The tree root
//! holds two containers: the cake, shared by every page, and the container
//! of the active page. Navigating swaps the page container, and the next
//! [`Plate::poll`] sends the client a full render.

use crate::config::PlateConfig;
use crate::page::{Page, PageContext};
use crate::protocol::{EventError, InboundEvent, RenderMessage};
use crate::recipes::{FunctionArguments, FunctionTopping};
use indexmap::IndexMap;
use pancake_core::logging;
use pancake_core::profiling::{ProfilingBackend, init_profiling};
use pancake_ui::widgets::Column;
use pancake_ui::{
    Dispatch, EventRouter, RenderEngine, ToppingError, ToppingRegistry, ToppingResult, Value,
    Widget, WidgetTree,
};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// Name of the shared container under the tree root.
pub const CAKE_NAME: &str = "cake";

struct Mounted {
    container: Arc<Widget>,
    page: Arc<dyn Page>,
}

#[derive(Default)]
struct Session {
    pages: IndexMap<String, Mounted>,
    active: Option<String>,
    needs_full: bool,
}

struct PlateShared {
    config: PlateConfig,
    tree: WidgetTree,
    router: EventRouter,
    cake: Arc<Widget>,
    session: Mutex<Session>,
    engine: Mutex<RenderEngine>,
}

/// A client session: pages, navigation and the render loop.
///
/// # Example
///
/// ```
/// use pancake::{FnPage, Plate, PlateConfig, RenderMessage};
/// use pancake::widgets::Label;
///
/// let plate = Plate::new(PlateConfig::default());
/// plate.add_page(FnPage::new("Home", |cx| {
///     cx.add(Label::spec("Welcome"))?;
///     Ok(())
/// })).unwrap();
///
/// let RenderMessage::Full { html } = plate.connect() else { unreachable!() };
/// assert!(html.contains("Welcome"));
/// assert!(plate.poll().is_empty());
/// ```
#[derive(Clone)]
pub struct Plate {
    shared: Arc<PlateShared>,
}

impl Plate {
    /// A plate using [`crate::registry`].
    pub fn new(config: PlateConfig) -> Self {
        Self::with_registry(config, Arc::new(crate::registry()))
    }

    pub fn with_registry(config: PlateConfig, registry: Arc<ToppingRegistry>) -> Self {
        let tree = WidgetTree::with_registry(registry);
        let cake = match tree.add_named(container(), CAKE_NAME) {
            Ok(cake) => cake,
            Err(err) => {
                tracing::error!(error = %err, "could not create the cake container, using the root");
                tree.root()
            }
        };
        Self {
            shared: Arc::new(PlateShared {
                router: EventRouter::new(tree.clone()),
                config,
                tree,
                cake,
                session: Mutex::new(Session {
                    needs_full: true,
                    ..Session::default()
                }),
                engine: Mutex::new(RenderEngine::new()),
            }),
        }
    }

    /// Install the log subscriber and, when configured, the profiler.
    pub fn init_logging(&self) {
        match &self.shared.config.log_filter {
            Some(directive) => logging::init_with_filter(directive),
            None => logging::init(),
        }
        if self.shared.config.profiling {
            init_profiling(ProfilingBackend::PuffinHttp);
        }
    }

    pub fn config(&self) -> &PlateConfig {
        &self.shared.config
    }

    pub fn title(&self) -> &str {
        &self.shared.config.title
    }

    pub fn tree(&self) -> &WidgetTree {
        &self.shared.tree
    }

    pub fn registry(&self) -> Arc<ToppingRegistry> {
        self.shared.tree.registry()
    }

    /// The container shared by every page.
    pub fn cake(&self) -> &Arc<Widget> {
        &self.shared.cake
    }

    /// Put `function` on the cake as a form with a run button.
    pub fn add_function<F>(
        &self,
        name: impl Into<String>,
        defaults: FunctionArguments,
        function: F,
    ) -> ToppingResult<Arc<Widget>>
    where
        F: Fn(&FunctionArguments) -> Value + Send + Sync + 'static,
    {
        self.shared.cake.add(FunctionTopping::spec(name, defaults, function))
    }

    pub fn downgrade(&self) -> WeakPlate {
        WeakPlate {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Build `page` and register it under its name.
    ///
    /// The first page added becomes active unless
    /// [`PlateConfig::default_page`] names another one.
    pub fn add_page(&self, page: impl Page) -> ToppingResult<()> {
        let page: Arc<dyn Page> = Arc::new(page);
        let name = page.name().to_string();
        if self.shared.session.lock().pages.contains_key(&name) {
            return Err(ToppingError::DuplicateName { name });
        }

        let container = container().build()?;
        page.decorate(&self.context(&container))?;

        let activate = {
            let mut session = self.shared.session.lock();
            if session.pages.contains_key(&name) {
                return Err(ToppingError::DuplicateName { name });
            }
            session.pages.insert(name.clone(), Mounted { container, page });
            session.active.is_none()
                && self
                    .shared
                    .config
                    .default_page
                    .as_ref()
                    .is_none_or(|default| *default == name)
        };
        tracing::debug!(page = %name, "page added");
        if activate {
            self.go_to(&name);
        }
        Ok(())
    }

    pub fn page_names(&self) -> Vec<String> {
        self.shared.session.lock().pages.keys().cloned().collect()
    }

    /// The container of page `name`.
    pub fn page(&self, name: &str) -> Option<Arc<Widget>> {
        self.shared
            .session
            .lock()
            .pages
            .get(name)
            .map(|mounted| mounted.container.clone())
    }

    pub fn active_page(&self) -> Option<String> {
        self.shared.session.lock().active.clone()
    }

    /// Show page `name` and run its `show_up`. Returns `false` for an unknown
    /// page.
    ///
    /// Safe to call from event handlers.
    pub fn go_to(&self, name: &str) -> bool {
        let (previous, next) = {
            let mut session = self.shared.session.lock();
            let Some(next) = session.pages.get(name) else {
                tracing::warn!(page = %name, "go_to: no such page");
                return false;
            };
            let next = (next.container.clone(), next.page.clone());
            let previous = session
                .active
                .replace(name.to_string())
                .and_then(|active| session.pages.get(&active))
                .map(|mounted| mounted.container.clone());
            session.needs_full = true;
            (previous, next)
        };
        let (container, page) = next;

        if let Some(previous) = previous.filter(|previous| !Arc::ptr_eq(previous, &container)) {
            self.shared.tree.detach(&previous);
        }
        if !container.is_attached() {
            if let Err(err) = self.shared.tree.add(&container) {
                tracing::error!(page = %name, error = %err, "could not mount page");
                return false;
            }
        }
        tracing::debug!(page = %name, "page shown");

        page.show_up(&self.context(&container));
        true
    }

    /// Route a decoded client event into the tree.
    pub fn handle(&self, event: &InboundEvent) -> Dispatch {
        self.shared
            .router
            .handle(event.widget_id, event.kind(), event.value.clone())
    }

    /// Decode and route a raw client message.
    pub fn handle_json(&self, text: &str) -> Result<Dispatch, EventError> {
        let event = InboundEvent::from_json(text)?;
        Ok(self.handle(&event))
    }

    /// Full render for a client that just connected.
    pub fn connect(&self) -> RenderMessage {
        self.shared.session.lock().needs_full = false;
        let html = self.shared.engine.lock().full_render(&self.shared.tree);
        RenderMessage::Full { html }
    }

    /// Everything the client needs since the last call: a full render after
    /// navigation, otherwise a patch when something changed, followed by
    /// queued notifications.
    pub fn poll(&self) -> Vec<RenderMessage> {
        let full = std::mem::take(&mut self.shared.session.lock().needs_full);
        let mut messages = Vec::new();
        {
            let mut engine = self.shared.engine.lock();
            if full {
                messages.push(RenderMessage::Full {
                    html: engine.full_render(&self.shared.tree),
                });
            } else {
                let fragments = engine.incremental_render(&self.shared.tree);
                if !fragments.is_empty() {
                    messages.push(RenderMessage::Patch { fragments });
                }
            }
        }
        messages.extend(
            self.shared
                .tree
                .take_messages()
                .into_iter()
                .map(|text| RenderMessage::Message { text }),
        );
        messages
    }

    fn context<'a>(&'a self, page: &'a Arc<Widget>) -> PageContext<'a> {
        PageContext {
            plate: self.downgrade(),
            page,
            cake: &self.shared.cake,
        }
    }
}

impl std::fmt::Debug for Plate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let session = self.shared.session.lock();
        f.debug_struct("Plate")
            .field("title", &self.shared.config.title)
            .field("pages", &session.pages.keys().collect::<Vec<_>>())
            .field("active", &session.active)
            .finish()
    }
}

/// Non-owning handle to a [`Plate`], for event handlers stored inside its
/// own tree.
#[derive(Clone)]
pub struct WeakPlate {
    shared: Weak<PlateShared>,
}

impl WeakPlate {
    pub fn upgrade(&self) -> Option<Plate> {
        self.shared.upgrade().map(|shared| Plate { shared })
    }

    /// [`Plate::go_to`]; `false` once the plate is gone.
    pub fn go_to(&self, name: &str) -> bool {
        self.upgrade().is_some_and(|plate| plate.go_to(name))
    }
}

fn container() -> pancake_ui::ToppingSpec {
    Column::spec().with("centering", false)
}
