//! Lazily created accumulation result

/// The value an action accumulates during one rule invocation.
///
/// Nothing is allocated until the action first touches the part; the
/// factory supplied at registration builds it then. A part that was never
/// touched is built on `take`, so every finished invocation yields a value.
pub struct Part<T> {
    value: Option<T>,
    factory: fn() -> T,
}

impl<T> Part<T> {
    pub fn new(factory: fn() -> T) -> Self {
        Self {
            value: None,
            factory,
        }
    }

    /// The accumulating value, created on first access
    pub fn get(&mut self) -> &mut T {
        let factory = self.factory;
        self.value.get_or_insert_with(factory)
    }

    /// Replace the accumulating value outright
    pub fn set(&mut self, value: T) {
        self.value = Some(value);
    }

    /// The value if it has been created, without creating it
    pub fn peek(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_created(&self) -> bool {
        self.value.is_some()
    }

    pub(crate) fn take(&mut self) -> T {
        let factory = self.factory;
        self.value.take().unwrap_or_else(factory)
    }

    pub fn clear(&mut self) {
        self.value = None;
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Part<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Part").field("value", &self.value).finish()
    }
}
