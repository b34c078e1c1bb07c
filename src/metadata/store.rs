use crate::{
    metadata::injection::{FieldInjector, MultipleInjector, SingleInjector},
    Cardinality, Descriptor, Field, FieldKind, InjectError, InjectResult,
    InjectionRequest, Interface, InterfaceFor, Key, KeyInfo, Scope, Service,
    ServiceInfo, Svc,
};
use std::{
    collections::HashMap,
    fmt::{Debug, Formatter},
};
use tracing::trace;

/// Per-implementation metadata read by a [`Container`](crate::Container).
///
/// The store is keyed by the implementation type itself, so metadata can be
/// read without constructing an instance. Each declaration is made once, when
/// the application sets up its services, and never changes afterwards. A
/// container only reads the store, and shares it through a service pointer.
///
/// ## Example
///
/// ```
/// use keyed_injector::{interface, Key, MetadataStore, Scope, Service, Svc};
///
/// trait Bird: Service {}
/// interface!(Bird);
///
/// #[derive(Default)]
/// struct Sparrow;
/// impl Bird for Sparrow {}
///
/// #[derive(Default)]
/// struct Aviary {
///     birds: Vec<Svc<dyn Bird>>,
/// }
///
/// let bird: Key<dyn Bird> = Key::new("Bird");
/// let aviary: Key<Aviary> = Key::new("Aviary");
///
/// let mut metadata = MetadataStore::new();
/// metadata
///     .injectable_with_scope::<Sparrow, _>(bird, Scope::Transient)
///     .unwrap()
///     .injectable::<Aviary, _>(aviary)
///     .unwrap()
///     .inject_all("birds", bird, |aviary: &mut Aviary, birds| {
///         aviary.birds = birds;
///     })
///     .unwrap();
///
/// let descriptor = metadata.get::<Aviary>().unwrap();
/// assert_eq!(Some(aviary.info()), descriptor.capability());
/// assert_eq!(1, descriptor.injections().len());
/// ```
#[derive(Default)]
pub struct MetadataStore {
    descriptors: HashMap<ServiceInfo, Descriptor>,
}

impl MetadataStore {
    /// Creates an empty metadata store.
    #[must_use]
    pub fn new() -> Self {
        MetadataStore::default()
    }

    /// Declares that `T` is injectable as an implementation of `key`, using
    /// the default scope ([`Scope::Singleton`]).
    ///
    /// Fails with [`InjectError::DuplicateDeclaration`] if `T` has already
    /// declared a capability.
    pub fn injectable<T, I>(&mut self, key: Key<I>) -> InjectResult<&mut Self>
    where
        T: Service + Default,
        I: ?Sized + InterfaceFor<T>,
    {
        self.declare_injectable::<T>(key.info(), None)
    }

    /// Declares that `T` is injectable as an implementation of `key` with the
    /// given scope.
    ///
    /// Fails with [`InjectError::DuplicateDeclaration`] if `T` has already
    /// declared a capability.
    pub fn injectable_with_scope<T, I>(
        &mut self,
        key: Key<I>,
        scope: Scope,
    ) -> InjectResult<&mut Self>
    where
        T: Service + Default,
        I: ?Sized + InterfaceFor<T>,
    {
        self.declare_injectable::<T>(key.info(), Some(scope))
    }

    /// Declares that a field of `T` is injected with the single
    /// implementation bound to `key`. The setter assigns the resolved service
    /// into the field.
    ///
    /// Fails with [`InjectError::StaticNotSupported`] for static fields, and
    /// with [`InjectError::DuplicateDeclaration`] if the field already has an
    /// injection.
    pub fn inject<T, I, F>(
        &mut self,
        field: impl Into<Field>,
        key: Key<I>,
        setter: F,
    ) -> InjectResult<&mut Self>
    where
        T: Service + Default,
        I: ?Sized + Interface,
        F: Service + Fn(&mut T, Svc<I>),
    {
        let field = field.into();
        self.declare_injection::<T>(
            field,
            key.info(),
            Cardinality::Single,
            Box::new(SingleInjector::<T, I, F>::new(key, setter)),
        )
    }

    /// Declares that a field of `T` is injected with every implementation
    /// bound to `key`, in registration order. The setter assigns the resolved
    /// services into the field.
    ///
    /// Fails with [`InjectError::StaticNotSupported`] for static fields, and
    /// with [`InjectError::DuplicateDeclaration`] if the field already has an
    /// injection.
    pub fn inject_all<T, I, F>(
        &mut self,
        field: impl Into<Field>,
        key: Key<I>,
        setter: F,
    ) -> InjectResult<&mut Self>
    where
        T: Service + Default,
        I: ?Sized + Interface,
        F: Service + Fn(&mut T, Vec<Svc<I>>),
    {
        let field = field.into();
        self.declare_injection::<T>(
            field,
            key.info(),
            Cardinality::Multiple,
            Box::new(MultipleInjector::<T, I, F>::new(key, setter)),
        )
    }

    /// Gets the descriptor of an implementation.
    #[must_use]
    pub fn descriptor(&self, service_info: ServiceInfo) -> Option<&Descriptor> {
        self.descriptors.get(&service_info)
    }

    /// Gets the descriptor of `T`.
    #[must_use]
    pub fn get<T: Service>(&self) -> Option<&Descriptor> {
        self.descriptor(ServiceInfo::of::<T>())
    }

    /// Checks whether an implementation has any metadata.
    #[must_use]
    pub fn contains(&self, service_info: ServiceInfo) -> bool {
        self.descriptors.contains_key(&service_info)
    }

    /// Gets the number of implementations with metadata.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Checks whether no implementation has metadata.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    fn declare_injectable<T: Service + Default>(
        &mut self,
        capability: KeyInfo,
        scope: Option<Scope>,
    ) -> InjectResult<&mut Self> {
        let descriptor = self
            .descriptors
            .entry(ServiceInfo::of::<T>())
            .or_insert_with(Descriptor::of::<T>);

        if descriptor.capability().is_some() {
            return Err(InjectError::DuplicateDeclaration {
                service_info: descriptor.service_info(),
                field: None,
            });
        }

        trace!(
            implementation = descriptor.service_info().name(),
            key = %capability,
            ?scope,
            "declared injectable"
        );
        descriptor.set_capability(capability, scope);
        Ok(self)
    }

    fn declare_injection<T: Service + Default>(
        &mut self,
        field: Field,
        key: KeyInfo,
        cardinality: Cardinality,
        injector: Box<dyn FieldInjector>,
    ) -> InjectResult<&mut Self> {
        let service_info = ServiceInfo::of::<T>();
        if field.kind() == FieldKind::Static {
            return Err(InjectError::StaticNotSupported {
                service_info,
                field: field.name(),
            });
        }

        let descriptor = self
            .descriptors
            .entry(service_info)
            .or_insert_with(Descriptor::of::<T>);

        if descriptor.injection(field.name()).is_some() {
            return Err(InjectError::DuplicateDeclaration {
                service_info,
                field: Some(field.name()),
            });
        }

        trace!(
            implementation = service_info.name(),
            field = field.name(),
            key = %key,
            ?cardinality,
            "declared injection"
        );
        descriptor.push_injection(InjectionRequest::new(
            field.name(),
            key,
            cardinality,
            injector,
        ));
        Ok(self)
    }
}

impl Debug for MetadataStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.descriptors
                    .iter()
                    .map(|(service_info, descriptor)| {
                        (service_info.name(), descriptor)
                    }),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface;

    trait Bird: Service {}
    interface!(Bird);

    #[derive(Default)]
    struct Sparrow;
    impl Bird for Sparrow {}

    #[derive(Default)]
    struct Zoo {
        bird: Option<Svc<dyn Bird>>,
        birds: Vec<Svc<dyn Bird>>,
    }

    fn set_bird(zoo: &mut Zoo, bird: Svc<dyn Bird>) {
        zoo.bird = Some(bird);
    }

    fn set_birds(zoo: &mut Zoo, birds: Vec<Svc<dyn Bird>>) {
        zoo.birds = birds;
    }

    #[test]
    fn injectable_records_capability_and_scope() {
        let bird: Key<dyn Bird> = Key::new("Bird");
        let mut metadata = MetadataStore::new();
        metadata
            .injectable_with_scope::<Sparrow, _>(bird, Scope::Transient)
            .unwrap();

        let descriptor = metadata.get::<Sparrow>().unwrap();
        assert_eq!(Some(bird.info()), descriptor.capability());
        assert_eq!(Some(Scope::Transient), descriptor.scope());
        assert_eq!(Scope::Transient, descriptor.effective_scope());
        assert!(descriptor.injections().is_empty());
    }

    #[test]
    fn scope_defaults_to_singleton() {
        let bird: Key<dyn Bird> = Key::new("Bird");
        let mut metadata = MetadataStore::new();
        metadata.injectable::<Sparrow, _>(bird).unwrap();

        let descriptor = metadata.get::<Sparrow>().unwrap();
        assert_eq!(None, descriptor.scope());
        assert_eq!(Scope::Singleton, descriptor.effective_scope());
    }

    #[test]
    fn duplicate_injectable_is_rejected() {
        let bird: Key<dyn Bird> = Key::new("Bird");
        let other: Key<dyn Bird> = Key::new("OtherBird");
        let mut metadata = MetadataStore::new();
        metadata.injectable::<Sparrow, _>(bird).unwrap();

        match metadata.injectable::<Sparrow, _>(other) {
            Err(InjectError::DuplicateDeclaration {
                service_info,
                field: None,
            }) if service_info == ServiceInfo::of::<Sparrow>() => {}
            Err(error) => Err(error).unwrap(),
            Ok(_) => panic!("capability was declared twice"),
        }

        // The first declaration is kept
        let descriptor = metadata.get::<Sparrow>().unwrap();
        assert_eq!(Some(bird.info()), descriptor.capability());
    }

    #[test]
    fn injections_keep_declaration_order() {
        let bird: Key<dyn Bird> = Key::new("Bird");
        let mut metadata = MetadataStore::new();
        metadata
            .inject_all("birds", bird, set_birds)
            .unwrap()
            .inject("bird", bird, set_bird)
            .unwrap();

        let descriptor = metadata.get::<Zoo>().unwrap();
        let fields: Vec<_> = descriptor
            .injections()
            .iter()
            .map(|injection| (injection.field(), injection.cardinality()))
            .collect();
        assert_eq!(
            vec![("birds", Cardinality::Multiple), ("bird", Cardinality::Single)],
            fields
        );
        assert_eq!(bird.info(), descriptor.injection("bird").unwrap().key());
    }

    #[test]
    fn duplicate_injection_is_rejected() {
        let bird: Key<dyn Bird> = Key::new("Bird");
        let mut metadata = MetadataStore::new();
        metadata.inject("bird", bird, set_bird).unwrap();

        match metadata.inject("bird", bird, set_bird) {
            Err(InjectError::DuplicateDeclaration {
                service_info,
                field: Some("bird"),
            }) if service_info == ServiceInfo::of::<Zoo>() => {}
            Err(error) => Err(error).unwrap(),
            Ok(_) => panic!("field injection was declared twice"),
        }

        assert_eq!(1, metadata.get::<Zoo>().unwrap().injections().len());
    }

    #[test]
    fn static_injection_is_rejected_without_metadata() {
        let bird: Key<dyn Bird> = Key::new("Bird");
        let mut metadata = MetadataStore::new();

        match metadata.inject_all(Field::new_static("BIRDS"), bird, set_birds)
        {
            Err(InjectError::StaticNotSupported { service_info, field })
                if service_info == ServiceInfo::of::<Zoo>()
                    && field == "BIRDS" => {}
            Err(error) => Err(error).unwrap(),
            Ok(_) => panic!("static field injection was accepted"),
        }

        assert!(!metadata.contains(ServiceInfo::of::<Zoo>()));
        assert!(metadata.is_empty());
    }

    #[test]
    fn injection_without_injectable_has_no_capability() {
        let bird: Key<dyn Bird> = Key::new("Bird");
        let mut metadata = MetadataStore::new();
        metadata.inject("bird", bird, set_bird).unwrap();

        let descriptor = metadata.get::<Zoo>().unwrap();
        assert_eq!(None, descriptor.capability());
        assert_eq!(1, metadata.len());
    }
}
