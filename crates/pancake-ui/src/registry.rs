//! Kind-name to factory registry.
//!
//! This is the only dynamic construction path: a [`ToolBox`](crate::widgets::ToolBox)
//! or a transport that receives a kind name looks the factory up here.

use crate::arguments::Arguments;
use crate::error::{ToppingError, ToppingResult};
use crate::value::Value;
use crate::widget::{Topping, ToppingKind, ToppingSpec};
use indexmap::IndexMap;
use std::sync::Arc;

/// Builds a kind's state from validated arguments.
pub type ToppingFactory = Arc<dyn Fn(&Arguments) -> ToppingResult<Box<dyn Topping>> + Send + Sync>;

/// Registry entry for one kind.
#[derive(Clone)]
pub struct KindDescriptor {
    pub name: String,
    /// Argument that receives a single positional value.
    pub primary: Option<&'static str>,
    pub factory: ToppingFactory,
}

impl KindDescriptor {
    pub fn of<T: ToppingKind>() -> Self {
        Self {
            name: T::KIND.to_string(),
            primary: T::PRIMARY,
            factory: Arc::new(|args: &Arguments| Ok(Box::new(T::from_arguments(args)?) as Box<dyn Topping>)),
        }
    }
}

impl std::fmt::Debug for KindDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KindDescriptor")
            .field("name", &self.name)
            .field("primary", &self.primary)
            .finish()
    }
}

/// Registry of widget kinds, keyed by name.
#[derive(Clone, Default)]
pub struct ToppingRegistry {
    kinds: IndexMap<String, KindDescriptor>,
}

impl ToppingRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in kind.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        crate::widgets::register_builtin(&mut registry);
        registry
    }

    /// Register `T` under [`ToppingKind::KIND`], replacing an earlier entry.
    pub fn register<T: ToppingKind>(&mut self) -> &mut Self {
        self.insert(KindDescriptor::of::<T>())
    }

    pub fn insert(&mut self, descriptor: KindDescriptor) -> &mut Self {
        if self.kinds.contains_key(&descriptor.name) {
            tracing::debug!(kind = %descriptor.name, "replacing registered widget kind");
        }
        self.kinds.insert(descriptor.name.clone(), descriptor);
        self
    }

    pub fn get(&self, kind: &str) -> Option<&KindDescriptor> {
        self.kinds.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.kinds.contains_key(kind)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Registered kind names, in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }

    /// Spec for `kind` with the given arguments.
    pub fn spec(&self, kind: &str, arguments: Arguments) -> ToppingResult<ToppingSpec> {
        let descriptor = self.kinds.get(kind).ok_or_else(|| ToppingError::UnknownKind {
            kind: kind.to_string(),
        })?;
        Ok(ToppingSpec::from_factory(
            descriptor.name.clone(),
            arguments,
            descriptor.factory.clone(),
        ))
    }

    /// Spec for `kind` with `value` bound to the kind's primary argument.
    /// Kinds without one get no arguments.
    pub fn spec_with_primary(&self, kind: &str, value: impl Into<Value>) -> ToppingResult<ToppingSpec> {
        let primary = self
            .kinds
            .get(kind)
            .ok_or_else(|| ToppingError::UnknownKind {
                kind: kind.to_string(),
            })?
            .primary;
        let arguments = match primary {
            Some(key) => Arguments::new().with(key, value),
            None => Arguments::new(),
        };
        self.spec(kind, arguments)
    }
}

impl std::fmt::Debug for ToppingRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.kinds.keys()).finish()
    }
}
