//! Reactive value cells.
//!
//! A [`ValueCell`] is the slot behind every widget's externally visible value.
//! Writes pass through an optional preprocessor, reads through an optional
//! postprocessor, and every committed write fires the change hook that marks
//! the owning widget dirty.
//!
//! # Example
//! ```
//! use pancake_ui::value::{Preprocessed, Value, ValueCell};
//!
//! let cell = ValueCell::new(Value::from(1));
//! cell.set_preprocessor(|v| match v.as_i64() {
//!     Some(n) if n < 0 => Preprocessed::NoOp,
//!     _ => Preprocessed::Store(v),
//! });
//!
//! assert!(cell.set(Value::from(5)));
//! assert!(!cell.set(Value::from(-1))); // rejected, nothing stored
//! assert_eq!(cell.get(), Value::from(5));
//! ```

use crate::error::ValueError;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// Dynamically typed widget value.
pub type Value = serde_json::Value;

/// Outcome of a preprocessor.
///
/// `NoOp` is distinct from storing `Value::Null`: composite widgets whose
/// state lives in their children return it to suppress the write and the
/// change notification while still performing their own side effects.
#[derive(Debug, Clone, PartialEq)]
pub enum Preprocessed {
    /// Store this value and notify.
    Store(Value),
    /// Leave the stored value untouched and do not notify.
    NoOp,
}

/// Transforms a value before it is stored.
pub type Preprocessor = Arc<dyn Fn(Value) -> Preprocessed + Send + Sync>;

/// Transforms the stored value on read.
pub type Postprocessor = Arc<dyn Fn(&Value) -> Result<Value, ValueError> + Send + Sync>;

/// Called with `(old, new)` after a value is committed.
pub type ChangeHook = Arc<dyn Fn(&Value, &Value) + Send + Sync>;

#[derive(Clone, Default)]
struct Hooks {
    preprocessor: Option<Preprocessor>,
    postprocessor: Option<Postprocessor>,
    on_change: Option<ChangeHook>,
    observers: Vec<ChangeHook>,
}

struct Slot {
    raw: Value,
    version: u32,
}

/// Typed slot with read/write hooks and change notification.
///
/// Hooks are cloned out before they run and no lock is held while they
/// execute, so a hook may read or write other cells (or this one).
pub struct ValueCell {
    slot: Mutex<Slot>,
    hooks: RwLock<Hooks>,
}

impl ValueCell {
    /// Create a cell holding `initial`.
    pub fn new(initial: Value) -> Self {
        Self {
            slot: Mutex::new(Slot {
                raw: initial,
                version: 0,
            }),
            hooks: RwLock::new(Hooks::default()),
        }
    }

    /// The stored value, without the postprocessor.
    pub fn raw(&self) -> Value {
        self.slot.lock().raw.clone()
    }

    /// Number of committed writes so far.
    pub fn version(&self) -> u32 {
        self.slot.lock().version
    }

    /// Read the value through the postprocessor.
    ///
    /// A failing postprocessor is logged and the stored value is returned
    /// instead.
    pub fn get(&self) -> Value {
        let raw = self.raw();
        let postprocessor = self.hooks.read().postprocessor.clone();
        match postprocessor {
            Some(post) => match post(&raw) {
                Ok(value) => value,
                Err(err) => {
                    tracing::warn!(error = %err, "value getter failed, falling back to stored value");
                    raw
                }
            },
            None => raw,
        }
    }

    /// Write through the preprocessor and notify. Returns `false` when the
    /// preprocessor answered [`Preprocessed::NoOp`].
    pub fn set(&self, value: Value) -> bool {
        self.set_with(value, false)
    }

    /// Write through the preprocessor without notifying.
    pub fn set_silently(&self, value: Value) -> bool {
        self.set_with(value, true)
    }

    /// Write through the preprocessor; `skip_notify` suppresses the change
    /// hook and observers.
    pub fn set_with(&self, value: Value, skip_notify: bool) -> bool {
        let preprocessor = self.hooks.read().preprocessor.clone();
        let value = match preprocessor {
            Some(pre) => match pre(value) {
                Preprocessed::Store(value) => value,
                Preprocessed::NoOp => return false,
            },
            None => value,
        };
        self.commit(value, skip_notify);
        true
    }

    /// Store `value` as-is, bypassing the preprocessor, and notify.
    ///
    /// Typed setters that already produced the final representation (an
    /// encoded image, for instance) use this.
    pub fn store(&self, value: Value) {
        self.commit(value, false);
    }

    fn commit(&self, value: Value, skip_notify: bool) {
        let old = {
            let mut slot = self.slot.lock();
            slot.version = slot.version.wrapping_add(1);
            std::mem::replace(&mut slot.raw, value.clone())
        };
        if skip_notify {
            return;
        }

        let (on_change, observers) = {
            let hooks = self.hooks.read();
            (hooks.on_change.clone(), hooks.observers.clone())
        };
        if let Some(hook) = on_change {
            hook(&old, &value);
        }
        for observer in observers {
            observer(&old, &value);
        }
    }

    /// Install the preprocessor, replacing any previous one.
    pub fn set_preprocessor(&self, f: impl Fn(Value) -> Preprocessed + Send + Sync + 'static) {
        self.hooks.write().preprocessor = Some(Arc::new(f));
    }

    /// Install the postprocessor (getter), replacing any previous one.
    pub fn set_postprocessor(
        &self,
        f: impl Fn(&Value) -> Result<Value, ValueError> + Send + Sync + 'static,
    ) {
        self.hooks.write().postprocessor = Some(Arc::new(f));
    }

    /// Add an observer called with `(old, new)` after every notified write.
    pub fn observe(&self, f: impl Fn(&Value, &Value) + Send + Sync + 'static) {
        self.hooks.write().observers.push(Arc::new(f));
    }

    /// The tree owns this slot: it points it at its dirty set on attach and
    /// clears it on detach.
    pub(crate) fn set_on_change(&self, hook: Option<ChangeHook>) {
        self.hooks.write().on_change = hook;
    }
}

impl Default for ValueCell {
    fn default() -> Self {
        Self::new(Value::Null)
    }
}

impl std::fmt::Debug for ValueCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = self.slot.lock();
        f.debug_struct("ValueCell")
            .field("raw", &slot.raw)
            .field("version", &slot.version)
            .finish()
    }
}

/// Text shown for a value in markup: strings without quotes, null as empty.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse numeric strings into numbers, leaving everything else untouched.
pub fn get_number(value: &Value) -> Value {
    let Value::String(s) = value else {
        return value.clone();
    };
    let trimmed = s.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Value::from(n);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| value.clone())
}

/// Interpret a string as a JSON literal (`"3"`, `"[1, 2]"`, `"true"`), keeping
/// the string when it is not one.
pub fn literal_eval(value: &Value) -> Value {
    match value {
        Value::String(s) => serde_json::from_str(s.trim()).unwrap_or_else(|_| value.clone()),
        other => other.clone(),
    }
}

/// Short name of a value's JSON type, for diagnostics.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
