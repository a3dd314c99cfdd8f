//! Dialog kind registry.
//!
//! Binds symbolic names to component definitions. Registration happens
//! during bootstrap; afterwards the registry is shared read-only, usually
//! as an `Arc<DialogKindRegistry>` handed to the controller.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::component::DialogComponent;
use crate::error::RegistryError;

/// A named, reusable dialog definition.
///
/// Cheap to clone. Instances opened from a kind keep their own reference to
/// the component.
pub struct DialogKind<C> {
    name: Arc<str>,
    component: Arc<C>,
}

impl<C: DialogComponent> DialogKind<C> {
    /// Create a standalone kind, outside any registry.
    pub fn new(name: impl Into<Arc<str>>, component: C) -> Self {
        Self {
            name: name.into(),
            component: Arc::new(component),
        }
    }

    /// The kind's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_arc(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    /// The component definition.
    pub fn component(&self) -> &C {
        &self.component
    }
}

impl<C> Clone for DialogKind<C> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            component: Arc::clone(&self.component),
        }
    }
}

impl<C> fmt::Debug for DialogKind<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogKind")
            .field("name", &self.name)
            .field("component", &std::any::type_name::<C>())
            .finish()
    }
}

/// A dialog kind with its component type erased.
pub struct AnyKind {
    name: Arc<str>,
    type_name: &'static str,
    kind: Arc<dyn Any + Send + Sync>,
}

impl AnyKind {
    /// Erase a component into a named kind.
    pub fn new<C: DialogComponent>(name: &str, component: C) -> Self {
        Self::from_kind(DialogKind::new(name, component))
    }

    fn from_kind<C: DialogComponent>(kind: DialogKind<C>) -> Self {
        Self {
            name: kind.name_arc(),
            type_name: std::any::type_name::<C>(),
            kind: Arc::new(kind),
        }
    }

    fn default_of<C: DialogComponent + Default>(name: &str) -> Self {
        Self::new(name, C::default())
    }

    /// The kind's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type name of the component.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn downcast<C: DialogComponent>(&self) -> Option<DialogKind<C>> {
        self.kind.downcast_ref::<DialogKind<C>>().cloned()
    }
}

/// Static kind registration collected with `inventory`.
///
/// ```ignore
/// inventory::submit! {
///     KindRegistration::new::<ConfirmDialog>("Confirm")
/// }
/// ```
pub struct KindRegistration {
    /// Kind name.
    pub name: &'static str,
    /// Factory creating the erased kind.
    pub factory: fn(&str) -> AnyKind,
}

impl KindRegistration {
    /// Register a default-constructible component under `name`.
    pub const fn new<C: DialogComponent + Default>(name: &'static str) -> Self {
        Self {
            name,
            factory: AnyKind::default_of::<C>,
        }
    }
}

inventory::collect!(KindRegistration);

/// Get all statically registered kinds.
pub fn registered_kinds() -> impl Iterator<Item = &'static KindRegistration> {
    inventory::iter::<KindRegistration>()
}

/// Table of dialog kinds keyed by name.
#[derive(Default)]
pub struct DialogKindRegistry {
    kinds: HashMap<String, AnyKind>,
}

impl DialogKindRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every kind submitted through `inventory`.
    pub fn from_inventory() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for registration in registered_kinds() {
            registry.insert((registration.factory)(registration.name))?;
        }
        log::debug!("Loaded {} dialog kinds from inventory", registry.len());
        Ok(registry)
    }

    /// Register a component under `name`.
    ///
    /// Names are unique; re-registering fails rather than replacing the
    /// existing definition.
    pub fn register<C: DialogComponent>(
        &mut self,
        name: &str,
        component: C,
    ) -> Result<DialogKind<C>, RegistryError> {
        let kind = DialogKind::new(name, component);
        self.insert(AnyKind::from_kind(kind.clone()))?;
        Ok(kind)
    }

    /// Add an already-erased kind.
    pub fn insert(&mut self, kind: AnyKind) -> Result<(), RegistryError> {
        if self.kinds.contains_key(kind.name()) {
            return Err(RegistryError::DuplicateKind(kind.name().to_string()));
        }
        log::debug!("Registered dialog kind '{}' ({})", kind.name(), kind.type_name());
        self.kinds.insert(kind.name().to_string(), kind);
        Ok(())
    }

    /// Look up a kind by name.
    pub fn resolve<C: DialogComponent>(&self, name: &str) -> Result<DialogKind<C>, RegistryError> {
        let entry = self
            .kinds
            .get(name)
            .ok_or_else(|| RegistryError::UnknownKind(name.to_string()))?;
        entry.downcast::<C>().ok_or_else(|| RegistryError::KindMismatch {
            name: name.to_string(),
            expected: std::any::type_name::<C>(),
        })
    }

    /// Whether a kind with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.kinds.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Whether no kinds are registered.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
