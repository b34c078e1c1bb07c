use crate::{
    DynSvc, InjectError, InjectResult, Interface, InterfaceFor, Key, KeyInfo,
    Service, ServiceInfo, Svc,
};
use std::{
    collections::HashMap,
    fmt::{Debug, Formatter},
};

/// One implementation bound to a key.
pub(crate) struct Binding<I>
where
    I: ?Sized + Interface,
{
    implementation: ServiceInfo,
    upcast: fn(DynSvc) -> Option<Svc<I>>,
}

impl<I> Binding<I>
where
    I: ?Sized + Interface,
{
    pub fn of<T>() -> Self
    where
        T: Service,
        I: InterfaceFor<T>,
    {
        Binding {
            implementation: ServiceInfo::of::<T>(),
            upcast: upcast::<I, T>,
        }
    }

    pub fn implementation(&self) -> ServiceInfo {
        self.implementation
    }

    /// Converts an instance of the implementation into a service pointer to
    /// the key's contract.
    pub fn upcast(&self, instance: DynSvc) -> Option<Svc<I>> {
        (self.upcast)(instance)
    }
}

fn upcast<I, T>(instance: DynSvc) -> Option<Svc<I>>
where
    I: ?Sized + InterfaceFor<T>,
    T: Service,
{
    #[cfg(feature = "arc")]
    let instance = instance.downcast_arc::<T>().ok()?;
    #[cfg(feature = "rc")]
    let instance = instance.downcast_rc::<T>().ok()?;
    Some(I::from_svc(instance))
}

/// The implementations bound to a single key, in registration order.
pub(crate) struct BindingList<I>
where
    I: ?Sized + Interface,
{
    bindings: Vec<Binding<I>>,
}

/// Marker trait for binding lists of any contract type.
pub(crate) trait BindingListType: Service {
    fn len(&self) -> usize;

    fn implementations(&self) -> Vec<ServiceInfo>;
}

impl<I> BindingListType for BindingList<I>
where
    I: ?Sized + Interface,
{
    fn len(&self) -> usize {
        self.bindings.len()
    }

    fn implementations(&self) -> Vec<ServiceInfo> {
        self.bindings.iter().map(Binding::implementation).collect()
    }
}

#[cfg(feature = "arc")]
downcast_rs::impl_downcast!(sync BindingListType);

#[cfg(feature = "rc")]
downcast_rs::impl_downcast!(BindingListType);

/// Maps each key to the implementations bound to it. Bindings are only ever
/// appended.
#[derive(Default)]
pub(crate) struct BindingRegistry {
    bindings: HashMap<KeyInfo, Box<dyn BindingListType>>,
}

impl BindingRegistry {
    /// Appends a binding to the list for `key`, creating the list if needed.
    /// Returns the position of the new binding in the list.
    pub fn add<I>(
        &mut self,
        key: Key<I>,
        binding: Binding<I>,
    ) -> InjectResult<usize>
    where
        I: ?Sized + Interface,
    {
        let list = self.bindings.entry(key.info()).or_insert_with(|| {
            Box::new(BindingList::<I> {
                bindings: Vec::new(),
            })
        });

        let list = list.downcast_mut::<BindingList<I>>().ok_or_else(|| {
            InjectError::InternalError(format!(
                "bindings for {} hold another contract type",
                key.info()
            ))
        })?;

        list.bindings.push(binding);
        Ok(list.bindings.len() - 1)
    }

    /// Gets the bindings for `key` in registration order.
    pub fn get<I>(&self, key: Key<I>) -> InjectResult<&[Binding<I>]>
    where
        I: ?Sized + Interface,
    {
        let list = self
            .bindings
            .get(&key.info())
            .ok_or(InjectError::BindingNotFound { key: key.info() })?;

        let list = list.downcast_ref::<BindingList<I>>().ok_or_else(|| {
            InjectError::InternalError(format!(
                "bindings for {} hold another contract type",
                key.info()
            ))
        })?;

        Ok(&list.bindings)
    }

    /// Gets the number of implementations bound to a key.
    pub fn count(&self, key: KeyInfo) -> usize {
        self.bindings.get(&key).map_or(0, |list| list.len())
    }
}

impl Debug for BindingRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.bindings.iter().map(|(key, list)| {
                let implementations: Vec<_> = list
                    .implementations()
                    .iter()
                    .map(ServiceInfo::name)
                    .collect();
                (key.to_string(), implementations)
            }))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface;

    trait Shape: Service {
        fn sides(&self) -> u32;
    }
    interface!(Shape);

    struct Triangle;
    impl Shape for Triangle {
        fn sides(&self) -> u32 {
            3
        }
    }

    struct Square;
    impl Shape for Square {
        fn sides(&self) -> u32 {
            4
        }
    }

    #[test]
    fn bindings_keep_registration_order() {
        let shape: Key<dyn Shape> = Key::new("Shape");
        let mut registry = BindingRegistry::default();

        assert_eq!(0, registry.add(shape, Binding::of::<Triangle>()).unwrap());
        assert_eq!(1, registry.add(shape, Binding::of::<Square>()).unwrap());

        let implementations: Vec<_> = registry
            .get(shape)
            .unwrap()
            .iter()
            .map(Binding::implementation)
            .collect();
        assert_eq!(
            vec![ServiceInfo::of::<Triangle>(), ServiceInfo::of::<Square>()],
            implementations
        );
        assert_eq!(2, registry.count(shape.info()));
    }

    #[test]
    fn missing_key_is_not_found() {
        let shape: Key<dyn Shape> = Key::new("Shape");
        let registry = BindingRegistry::default();

        match registry.get(shape) {
            Err(InjectError::BindingNotFound { key }) if key == shape.info() => {}
            Err(error) => Err(error).unwrap(),
            Ok(_) => panic!("found bindings for an unbound key"),
        }
        assert_eq!(0, registry.count(shape.info()));
    }

    #[test]
    fn keys_with_same_name_have_separate_lists() {
        let first: Key<dyn Shape> = Key::new("Shape");
        let second: Key<dyn Shape> = Key::new("Shape");
        let mut registry = BindingRegistry::default();
        registry.add(first, Binding::of::<Triangle>()).unwrap();

        assert_eq!(1, registry.count(first.info()));
        assert_eq!(0, registry.count(second.info()));
    }

    #[test]
    fn upcast_converts_to_contract() {
        let binding = Binding::<dyn Shape>::of::<Square>();
        let instance: DynSvc = Svc::new(Square);

        let shape = binding.upcast(instance).unwrap();
        assert_eq!(4, shape.sides());
    }

    #[test]
    fn upcast_rejects_other_implementations() {
        let binding = Binding::<dyn Shape>::of::<Square>();
        let instance: DynSvc = Svc::new(Triangle);

        assert!(binding.upcast(instance).is_none());
    }
}
