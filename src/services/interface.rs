use crate::{Service, Svc};

/// Implemented for contract types that keys can be created for. Each sized
/// service type is an interface for itself, and trait objects become
/// interfaces through the [`interface!`] macro.
pub trait Interface: Service {}

impl<T: Service> Interface for T {}

/// Marker trait that indicates that a type is an interface for another type.
///
/// Each sized type is an interface for itself, and each `dyn Trait` is an
/// interface for the types that implement it. This trait should usually be
/// implemented by the [`interface!`] macro, and is primarily used to enforce
/// stronger type checking when binding implementations to keys.
pub trait InterfaceFor<S>: Interface
where
    S: Service,
{
    #[doc(hidden)]
    fn from_svc(service: Svc<S>) -> Svc<Self>;
}

impl<T: Service> InterfaceFor<T> for T {
    fn from_svc(service: Svc<T>) -> Svc<Self> {
        service
    }
}

/// Marks a trait as being an interface for every type that implements it.
/// This means keys for the trait object can have any of those types bound to
/// them.
///
/// With the "arc" feature enabled, the trait must be a subtrait of [`Send`]
/// and [`Sync`]. This is necessary to allow the service pointers to be
/// downcasted. If the "rc" feature is enabled, this is not required.
/// Additionally, instances of the trait must have a `'static` lifetime. This
/// can be done easily by making your interface a subtrait of
/// [`Service`](crate::Service).
///
/// ## Example
///
/// ```
/// use keyed_injector::{interface, Key, Service};
///
/// trait Bird: Service {
///     fn name(&self) -> &'static str;
/// }
///
/// interface!(Bird);
///
/// // Keys for `dyn Bird` can have any type implementing `Bird` bound to them
/// let bird: Key<dyn Bird> = Key::new("Bird");
/// # let _ = bird;
/// ```
#[macro_export]
macro_rules! interface {
    ($interface:path) => {
        impl $crate::Interface for dyn $interface {}

        impl<T: $interface> $crate::InterfaceFor<T> for dyn $interface {
            fn from_svc(service: $crate::Svc<T>) -> $crate::Svc<Self> {
                service
            }
        }
    };
}
