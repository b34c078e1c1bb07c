use crate::{
    Container, InjectResult, InterfaceFor, Key, KeyInfo, Service, ServiceInfo,
};
use std::{
    fmt::{Debug, Formatter},
    marker::PhantomData,
};

/// A collection of bindings that can be added all at once to a
/// [`Container`]. Modules can be used to group together related
/// implementations and configure the container in pieces rather than all at
/// once.
///
/// For creating a module easily via a domain specific language, see
/// [`define_module!`].
#[derive(Default)]
pub struct Module {
    bindings: Vec<Box<dyn ModuleBinding>>,
}

impl Module {
    /// Creates an empty module.
    #[must_use]
    pub fn new() -> Self {
        Module::default()
    }

    /// Adds a binding of `T` to `key`. Nothing is checked until the module
    /// is added to a container.
    pub fn bind<I, T>(&mut self, key: Key<I>) -> &mut Self
    where
        I: ?Sized + InterfaceFor<T>,
        T: Service,
    {
        self.bindings.push(Box::new(TypedBinding::<I, T> {
            key,
            marker: PhantomData,
        }));
        self
    }

    /// Gets the number of bindings in this module.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Checks whether this module has no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub(crate) fn into_bindings(self) -> Vec<Box<dyn ModuleBinding>> {
        self.bindings
    }
}

impl Debug for Module {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.bindings.iter().map(|binding| {
                (binding.key().to_string(), binding.implementation().name())
            }))
            .finish()
    }
}

/// A deferred binding with its types erased.
pub(crate) trait ModuleBinding: Service {
    fn key(&self) -> KeyInfo;

    fn implementation(&self) -> ServiceInfo;

    fn bind(self: Box<Self>, container: &mut Container) -> InjectResult<()>;
}

struct TypedBinding<I, T>
where
    I: ?Sized,
{
    key: Key<I>,
    marker: PhantomData<fn() -> T>,
}

impl<I, T> ModuleBinding for TypedBinding<I, T>
where
    I: ?Sized + InterfaceFor<T>,
    T: Service,
{
    fn key(&self) -> KeyInfo {
        self.key.info()
    }

    fn implementation(&self) -> ServiceInfo {
        ServiceInfo::of::<T>()
    }

    fn bind(self: Box<Self>, container: &mut Container) -> InjectResult<()> {
        container.bind::<I, T>(self.key)?;
        Ok(())
    }
}

/// Defines a new module using a domain specific language. Each key is
/// followed by the implementations bound to it, in order. Keys are given as
/// local variables, and each entry may carry attributes such as `#[cfg]`.
///
/// ## Example
///
/// ```
/// use keyed_injector::{
///     define_module, interface, Container, Key, MetadataStore, Service,
/// };
///
/// trait Fooable: Service {}
/// interface!(Fooable);
///
/// #[derive(Default)]
/// struct Foo;
/// impl Fooable for Foo {}
///
/// #[derive(Default)]
/// struct Bar;
/// impl Fooable for Bar {}
///
/// #[cfg(test)]
/// #[derive(Default)]
/// struct Quux;
/// #[cfg(test)]
/// impl Fooable for Quux {}
///
/// let fooable: Key<dyn Fooable> = Key::new("Fooable");
/// let foo: Key<Foo> = Key::new("Foo");
///
/// let module = define_module! {
///     fooable => [Foo, Bar],
///     foo => [Foo],
///
///     // Bindings for the same key are merged in order. This means we can
///     // have implementations bound only in certain environments.
///     #[cfg(test)]
///     fooable => [Quux],
/// };
///
/// let mut metadata = MetadataStore::new();
/// metadata
///     .injectable::<Foo, _>(fooable)
///     .unwrap()
///     .injectable::<Bar, _>(fooable)
///     .unwrap();
///
/// let mut container = Container::new(metadata);
/// container.add_module(module).unwrap();
///
/// assert_eq!(2, container.get_all(fooable).unwrap().len());
/// assert!(container.get(foo).is_ok());
/// ```
#[macro_export]
macro_rules! define_module {
    {
        $(
            $(#[$attr:meta])*
            $key:ident => [
                $($implementation:ty),*
                $(,)?
            ]
        ),*
        $(,)?
    } => {
        {
            #[allow(unused_mut)]
            let mut module = $crate::Module::new();
            $(
                $(#[$attr])*
                {
                    $(module.bind::<_, $implementation>($key);)*
                }
            )*
            module
        }
    };
}
