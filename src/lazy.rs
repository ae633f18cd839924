//! Deferred single initialization.

use std::fmt;

type Initializer<T> = Box<dyn FnOnce() -> T + Send + Sync>;

/// A value produced by an initializer the first time it is needed.
///
/// The initializer runs at most once, either on first access through
/// [`LazyValue::value`] or explicitly through [`LazyValue::force_init`].
/// [`LazyValue::set`] replaces the value and discards a pending initializer.
/// Access needs `&mut self`, so the value is never shared across threads
/// while initializing.
pub struct LazyValue<T> {
    value: Option<T>,
    initializer: Option<Initializer<T>>,
}

impl<T> LazyValue<T> {
    pub fn new(initializer: impl FnOnce() -> T + Send + Sync + 'static) -> Self {
        Self {
            value: None,
            initializer: Some(Box::new(initializer)),
        }
    }

    /// Returns the value, running the initializer if it has not run yet.
    pub fn value(&mut self) -> &mut T {
        self.value.get_or_insert_with(|| {
            let initializer = self
                .initializer
                .take()
                .unwrap_or_else(|| unreachable!("lazy value lost both value and initializer"));
            initializer()
        })
    }

    /// Runs the initializer now if it has not run yet.
    pub fn force_init(&mut self) {
        self.value();
    }

    /// Replaces the value without running the initializer.
    pub fn set(&mut self, value: T) {
        self.initializer = None;
        self.value = Some(value);
    }

    /// The value, if already initialized.
    #[must_use]
    pub const fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.value.is_some()
    }
}

impl<T: fmt::Debug> fmt::Debug for LazyValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => f.debug_tuple("LazyValue").field(value).finish(),
            None => f.write_str("LazyValue(<pending>)"),
        }
    }
}
