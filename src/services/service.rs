#![allow(clippy::used_underscore_binding)]

use crate::KeyInfo;
use derive_more::{Display, Error};
use downcast_rs::impl_downcast;
use std::any::{Any, TypeId};

#[cfg(feature = "rc")]
macro_rules! feature_unique {
    ({ $($common:tt)* }, { $($rc:tt)* }, { $($_arc:tt)* }) => {
        $($common)*
        $($rc)*
    };
}

#[cfg(feature = "arc")]
macro_rules! feature_unique {
    ({ $($common:tt)* }, { $($_rc:tt)* }, { $($arc:tt)* }) => {
        $($common)*
        $($arc)*
    };
}

feature_unique!(
    {
        /// A reference-counted pointer holding a service. The pointer type is
        /// determined by the feature flags passed to this crate.
        ///
        /// - **rc**: Pointer type is [`Rc<T>`](std::rc::Rc)
        /// - **arc**: Pointer type is [`Arc<T>`](std::sync::Arc) (default)
    },
    {
        pub type Svc<T> = std::rc::Rc<T>;
    },
    {
        pub type Svc<T> = std::sync::Arc<T>;
    }
);

/// A service pointer holding an instance of `dyn Service`.
pub type DynSvc = Svc<dyn Service>;

/// An owned service pointer holding an instance of `dyn Service`. Freshly
/// constructed instances live in one of these while their fields are being
/// injected.
pub type OwnedDynSvc = Box<dyn Service>;

feature_unique!(
    {
        /// Implemented automatically on types that are capable of being a
        /// service.
    },
    {
        pub trait Service: downcast_rs::Downcast {}
        impl<T: ?Sized + downcast_rs::Downcast> Service for T {}
    },
    {
        pub trait Service: downcast_rs::DowncastSync {}
        impl<T: ?Sized + downcast_rs::DowncastSync> Service for T {}
    }
);

#[cfg(feature = "arc")]
impl_downcast!(sync Service);

#[cfg(feature = "rc")]
impl_downcast!(Service);

/// A result from attempting to declare, bind, or resolve a service.
pub type InjectResult<T> = Result<T, InjectError>;

/// Type information about an implementation. The metadata store and the
/// instance pool are both keyed by this.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct ServiceInfo {
    id: TypeId,
    name: &'static str,
}

impl ServiceInfo {
    /// Creates a [`ServiceInfo`] for the given type.
    #[inline]
    #[must_use]
    pub fn of<T: ?Sized + Any>() -> Self {
        ServiceInfo {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Gets the [`TypeId`] for this service.
    #[inline]
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Gets the type name of this service.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// An error that has occurred while declaring, binding, or resolving a
/// service.
#[derive(Debug, Display, Error)]
#[non_exhaustive]
pub enum InjectError {
    /// The implementation has no entry in the metadata store.
    #[display(fmt = "no metadata found for {}", "service_info.name()")]
    MissingMetadata {
        /// The implementation that was bound or instantiated.
        service_info: ServiceInfo,
    },

    /// A capability or a field injection was declared twice on the same
    /// implementation.
    #[display(fmt = "{}", "fmt_duplicate(service_info, *field)")]
    DuplicateDeclaration {
        /// The implementation the declaration was made on.
        service_info: ServiceInfo,

        /// The field that was declared twice, or `None` if the capability
        /// was declared twice.
        field: Option<&'static str>,
    },

    /// A field injection was declared on a static field.
    #[display(
        fmt = "inject cannot be used on static field {} of {}",
        field,
        "service_info.name()"
    )]
    StaticNotSupported {
        /// The implementation the declaration was made on.
        service_info: ServiceInfo,

        /// The static field.
        field: &'static str,
    },

    /// No implementation is bound to the requested key.
    #[display(fmt = "no binding found for {}", key)]
    BindingNotFound {
        /// The key that was requested.
        key: KeyInfo,
    },

    /// A single instance was requested for a key with several bound
    /// implementations.
    #[display(
        fmt = "multiple bindings found for {} ({} implementations, did you mean to call get_all?)",
        key,
        implementations
    )]
    AmbiguousBinding {
        /// The key that was requested.
        key: KeyInfo,

        /// The number of implementations bound to the key.
        implementations: usize,
    },

    /// The implementation's metadata does not declare a capability.
    #[display(fmt = "no injectable found for {}", "service_info.name()")]
    NotInjectable {
        /// The implementation that was instantiated.
        service_info: ServiceInfo,
    },

    /// An unexpected error has occurred. This is usually caused by a bug in
    /// the library itself.
    #[display(fmt = "an unexpected error occurred (please report this): {}", _0)]
    InternalError(#[error(ignore)] String),
}

fn fmt_duplicate(service_info: &ServiceInfo, field: Option<&str>) -> String {
    match field {
        Some(field) => format!(
            "inject is already defined for field {} of {}",
            field,
            service_info.name()
        ),
        None => {
            format!("injectable is already defined for {}", service_info.name())
        }
    }
}
