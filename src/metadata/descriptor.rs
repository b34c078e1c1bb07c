use crate::{InjectionRequest, KeyInfo, OwnedDynSvc, Service, ServiceInfo};
use std::fmt::{Debug, Formatter};

/// The lifecycle of instances created for an implementation.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
pub enum Scope {
    /// One instance is created the first time the implementation is resolved,
    /// then reused for the lifetime of the container.
    #[default]
    Singleton,

    /// A new instance is created each time the implementation is resolved.
    Transient,
}

/// Everything the metadata store knows about one implementation: the
/// capability it declares, its scope, and the field injections applied when
/// it is instantiated.
pub struct Descriptor {
    service_info: ServiceInfo,
    capability: Option<KeyInfo>,
    scope: Option<Scope>,
    injections: Vec<InjectionRequest>,
    construct: fn() -> OwnedDynSvc,
}

fn construct<T: Service + Default>() -> OwnedDynSvc {
    Box::<T>::default()
}

impl Descriptor {
    pub(crate) fn of<T: Service + Default>() -> Self {
        Descriptor {
            service_info: ServiceInfo::of::<T>(),
            capability: None,
            scope: None,
            injections: Vec::new(),
            construct: construct::<T>,
        }
    }

    /// Gets the implementation this descriptor belongs to.
    #[inline]
    #[must_use]
    pub fn service_info(&self) -> ServiceInfo {
        self.service_info
    }

    /// Gets the key the implementation declared itself injectable for, if it
    /// did.
    #[inline]
    #[must_use]
    pub fn capability(&self) -> Option<KeyInfo> {
        self.capability
    }

    /// Gets the scope the implementation declared, if any.
    #[inline]
    #[must_use]
    pub fn scope(&self) -> Option<Scope> {
        self.scope
    }

    /// Gets the scope instances are resolved with. Implementations without a
    /// declared scope are singletons.
    #[inline]
    #[must_use]
    pub fn effective_scope(&self) -> Scope {
        self.scope.unwrap_or_default()
    }

    /// Gets the declared field injections in declaration order.
    #[inline]
    #[must_use]
    pub fn injections(&self) -> &[InjectionRequest] {
        &self.injections
    }

    /// Gets the injection declared for a field.
    #[must_use]
    pub fn injection(&self, field: &str) -> Option<&InjectionRequest> {
        self.injections
            .iter()
            .find(|injection| injection.field() == field)
    }

    pub(crate) fn set_capability(
        &mut self,
        capability: KeyInfo,
        scope: Option<Scope>,
    ) {
        self.capability = Some(capability);
        self.scope = scope;
    }

    pub(crate) fn push_injection(&mut self, injection: InjectionRequest) {
        self.injections.push(injection);
    }

    /// Creates an instance with no injected fields.
    pub(crate) fn construct(&self) -> OwnedDynSvc {
        (self.construct)()
    }
}

impl Debug for Descriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Descriptor")
            .field("service_info", &self.service_info.name())
            .field("capability", &self.capability)
            .field("scope", &self.scope)
            .field("injections", &self.injections)
            .finish()
    }
}
