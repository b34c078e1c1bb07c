use crate::{
    pool::InstancePool,
    registry::{Binding, BindingRegistry},
    Descriptor, DynSvc, InjectError, InjectResult, Interface, InterfaceFor,
    Key, MetadataStore, Module, Scope, Service, ServiceInfo, Svc,
};
use std::fmt::{Debug, Formatter};
use tracing::{debug, trace, trace_span};

/// A dependency injection container. Implementations are bound to keys, then
/// instances are requested by key with [`get()`](Container::get) or
/// [`get_all()`](Container::get_all).
///
/// Instances are constructed with [`Default`], then each field injection
/// declared in the container's [`MetadataStore`] is resolved from this same
/// container and assigned, in declaration order. Singleton instances are
/// pooled and shared for the lifetime of the container. Bindings can only be
/// added, never removed.
///
/// ## Example
///
/// ```
/// use keyed_injector::{interface, Container, Key, MetadataStore, Service, Svc};
///
/// trait Greeter: Service {
///     fn greet(&self) -> String;
/// }
/// interface!(Greeter);
///
/// #[derive(Default)]
/// struct English;
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "Hello".to_string()
///     }
/// }
///
/// let greeter: Key<dyn Greeter> = Key::new("Greeter");
///
/// let mut metadata = MetadataStore::new();
/// metadata.injectable::<English, _>(greeter).unwrap();
///
/// let mut container = Container::new(metadata);
/// container.bind::<_, English>(greeter).unwrap();
///
/// let first = container.get(greeter).unwrap();
/// let second = container.get(greeter).unwrap();
/// assert_eq!("Hello", first.greet());
/// assert!(Svc::ptr_eq(&first, &second));
/// ```
pub struct Container {
    metadata: Svc<MetadataStore>,
    bindings: BindingRegistry,
    pool: InstancePool,
}

impl Container {
    /// Creates a container with no bindings that reads implementation
    /// metadata from `metadata`. Several containers can share one store.
    #[must_use]
    pub fn new(metadata: impl Into<Svc<MetadataStore>>) -> Self {
        Container {
            metadata: metadata.into(),
            bindings: BindingRegistry::default(),
            pool: InstancePool::new(),
        }
    }

    /// Gets the metadata store this container reads from.
    #[must_use]
    pub fn metadata(&self) -> &Svc<MetadataStore> {
        &self.metadata
    }

    /// Binds `T` to `key`. Implementations are resolved in the order they
    /// are bound.
    ///
    /// Fails with [`InjectError::MissingMetadata`] if the metadata store
    /// knows nothing about `T`. The container is left unchanged in that
    /// case. The key does not need to match the capability `T` declared.
    pub fn bind<I, T>(&mut self, key: Key<I>) -> InjectResult<&mut Self>
    where
        I: ?Sized + InterfaceFor<T>,
        T: Service,
    {
        let service_info = ServiceInfo::of::<T>();
        if !self.metadata.contains(service_info) {
            return Err(InjectError::MissingMetadata { service_info });
        }

        let position = self.bindings.add(key, Binding::of::<T>())?;
        debug!(
            key = key.name(),
            key_id = key.info().id(),
            implementation = service_info.name(),
            position,
            "bound implementation"
        );
        Ok(self)
    }

    /// Binds every implementation in a module, in the order they were added
    /// to it.
    ///
    /// Every implementation is checked for metadata first. If any of them
    /// has none, this fails with [`InjectError::MissingMetadata`] and nothing
    /// from the module is bound.
    pub fn add_module(&mut self, module: Module) -> InjectResult<&mut Self> {
        let bindings = module.into_bindings();
        if let Some(service_info) = bindings
            .iter()
            .map(|binding| binding.implementation())
            .find(|&service_info| !self.metadata.contains(service_info))
        {
            return Err(InjectError::MissingMetadata { service_info });
        }

        for binding in bindings {
            binding.bind(self)?;
        }

        Ok(self)
    }

    /// Gets the single implementation bound to `key`.
    ///
    /// Fails with [`InjectError::BindingNotFound`] if nothing is bound to the
    /// key, and with [`InjectError::AmbiguousBinding`] if more than one
    /// implementation is, regardless of their scopes. Errors raised while
    /// injecting the instance's fields are returned unchanged.
    pub fn get<I>(&self, key: Key<I>) -> InjectResult<Svc<I>>
    where
        I: ?Sized + Interface,
    {
        match self.bindings(key)? {
            [binding] => self.resolve(key, binding),
            bindings => {
                debug!(
                    key = key.name(),
                    key_id = key.info().id(),
                    implementations = bindings.len(),
                    "multiple bindings found"
                );
                Err(InjectError::AmbiguousBinding {
                    key: key.info(),
                    implementations: bindings.len(),
                })
            }
        }
    }

    /// Gets every implementation bound to `key`, in the order they were
    /// bound.
    ///
    /// Fails with [`InjectError::BindingNotFound`] if nothing is bound to the
    /// key. Errors raised while injecting any instance's fields are returned
    /// unchanged.
    pub fn get_all<I>(&self, key: Key<I>) -> InjectResult<Vec<Svc<I>>>
    where
        I: ?Sized + Interface,
    {
        self.bindings(key)?
            .iter()
            .map(|binding| self.resolve(key, binding))
            .collect()
    }

    /// Checks whether at least one implementation is bound to `key`.
    #[must_use]
    pub fn is_bound<I: ?Sized>(&self, key: Key<I>) -> bool {
        self.binding_count(key) > 0
    }

    /// Gets the number of implementations bound to `key`.
    #[must_use]
    pub fn binding_count<I: ?Sized>(&self, key: Key<I>) -> usize {
        self.bindings.count(key.info())
    }

    fn bindings<I>(&self, key: Key<I>) -> InjectResult<&[Binding<I>]>
    where
        I: ?Sized + Interface,
    {
        self.bindings.get(key).map_err(|error| {
            debug!(
                key = key.name(),
                key_id = key.info().id(),
                %error,
                "no binding found"
            );
            error
        })
    }

    fn resolve<I>(
        &self,
        key: Key<I>,
        binding: &Binding<I>,
    ) -> InjectResult<Svc<I>>
    where
        I: ?Sized + Interface,
    {
        let implementation = binding.implementation();
        let instance = self.instantiate(implementation)?;
        binding.upcast(instance).ok_or_else(|| {
            InjectError::InternalError(format!(
                "instance of {} bound to {} is not an instance of {}",
                implementation.name(),
                key.info(),
                std::any::type_name::<I>()
            ))
        })
    }

    /// Creates an instance of an implementation, or reuses the pooled one if
    /// it is a singleton that was resolved before.
    fn instantiate(&self, implementation: ServiceInfo) -> InjectResult<DynSvc> {
        let span =
            trace_span!("instantiate", implementation = implementation.name());
        let _entered = span.enter();

        let descriptor = self.metadata.descriptor(implementation).ok_or(
            InjectError::MissingMetadata {
                service_info: implementation,
            },
        )?;
        if descriptor.capability().is_none() {
            return Err(InjectError::NotInjectable {
                service_info: implementation,
            });
        }

        match descriptor.effective_scope() {
            Scope::Singleton => {
                if let Some(instance) = self.pool.get(implementation) {
                    trace!("reusing pooled instance");
                    return Ok(instance);
                }

                self.pool.get_or_try_init(implementation, || {
                    self.construct(descriptor)
                })
            }
            Scope::Transient => self.construct(descriptor),
        }
    }

    /// Creates a fresh instance and injects its declared fields in
    /// declaration order.
    fn construct(&self, descriptor: &Descriptor) -> InjectResult<DynSvc> {
        let mut instance = descriptor.construct();
        for injection in descriptor.injections() {
            injection.apply(&mut *instance, self)?;
        }

        debug!(
            scope = ?descriptor.effective_scope(),
            injections = descriptor.injections().len(),
            "constructed instance"
        );
        Ok(Svc::from(instance))
    }
}

impl Debug for Container {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("bindings", &self.bindings)
            .field("pooled", &self.pool)
            .field("metadata", &self.metadata.len())
            .finish()
    }
}
