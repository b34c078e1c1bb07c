use crate::{
    Container, InjectError, InjectResult, Interface, Key, KeyInfo, Service,
    ServiceInfo, Svc,
};
use std::{
    fmt::{Debug, Formatter},
    marker::PhantomData,
};

/// Whether a field is owned by each instance or shared by the whole type.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum FieldKind {
    /// The field belongs to each instance. Only instance fields can be
    /// injected.
    Instance,

    /// The field is shared by every instance of the type, like an associated
    /// static.
    Static,
}

/// A field of an implementation that an injection is declared on.
///
/// String literals convert into instance fields:
///
/// ```
/// use keyed_injector::{Field, FieldKind};
///
/// let field: Field = "birds".into();
/// assert_eq!(FieldKind::Instance, field.kind());
/// assert_eq!(FieldKind::Static, Field::new_static("COUNT").kind());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Field {
    name: &'static str,
    kind: FieldKind,
}

impl Field {
    /// Creates an instance field.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Field {
            name,
            kind: FieldKind::Instance,
        }
    }

    /// Creates a static field. Declaring an injection on it always fails.
    #[must_use]
    pub const fn new_static(name: &'static str) -> Self {
        Field {
            name,
            kind: FieldKind::Static,
        }
    }

    /// Gets the name of the field.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Gets whether the field belongs to instances or to the type.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }
}

impl From<&'static str> for Field {
    fn from(name: &'static str) -> Self {
        Field::new(name)
    }
}

/// How many implementations an injection resolves.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Cardinality {
    /// Resolves with [`Container::get()`]. Exactly one implementation must be
    /// bound to the key.
    Single,

    /// Resolves with [`Container::get_all()`]. Every bound implementation is
    /// injected in registration order.
    Multiple,
}

/// A field-level dependency declared on an implementation. It is applied each
/// time the implementation is instantiated.
pub struct InjectionRequest {
    field: &'static str,
    key: KeyInfo,
    cardinality: Cardinality,
    injector: Box<dyn FieldInjector>,
}

impl InjectionRequest {
    pub(crate) fn new(
        field: &'static str,
        key: KeyInfo,
        cardinality: Cardinality,
        injector: Box<dyn FieldInjector>,
    ) -> Self {
        InjectionRequest {
            field,
            key,
            cardinality,
            injector,
        }
    }

    /// Gets the name of the injected field.
    #[inline]
    #[must_use]
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Gets the key the field is resolved from.
    #[inline]
    #[must_use]
    pub fn key(&self) -> KeyInfo {
        self.key
    }

    /// Gets whether one or all bound implementations are injected.
    #[inline]
    #[must_use]
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Resolves the dependency and assigns it into the field of `target`.
    pub(crate) fn apply(
        &self,
        target: &mut (dyn Service + 'static),
        container: &Container,
    ) -> InjectResult<()> {
        self.injector.inject(target, container)
    }
}

impl Debug for InjectionRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InjectionRequest")
            .field("field", &self.field)
            .field("key", &self.key)
            .field("cardinality", &self.cardinality)
            .finish_non_exhaustive()
    }
}

/// Type-erased assignment of a resolved dependency into a field.
pub(crate) trait FieldInjector: Service {
    fn inject(
        &self,
        target: &mut (dyn Service + 'static),
        container: &Container,
    ) -> InjectResult<()>;
}

fn downcast_target<'a, T: Service>(
    target: &'a mut (dyn Service + 'static),
) -> InjectResult<&'a mut T> {
    target.downcast_mut::<T>().ok_or_else(|| {
        InjectError::InternalError(format!(
            "field injection for {} was applied to another type",
            ServiceInfo::of::<T>().name()
        ))
    })
}

pub(crate) struct SingleInjector<T, I, F>
where
    I: ?Sized,
{
    key: Key<I>,
    setter: F,
    marker: PhantomData<fn(&mut T)>,
}

impl<T, I, F> SingleInjector<T, I, F>
where
    I: ?Sized,
{
    pub fn new(key: Key<I>, setter: F) -> Self {
        SingleInjector {
            key,
            setter,
            marker: PhantomData,
        }
    }
}

impl<T, I, F> FieldInjector for SingleInjector<T, I, F>
where
    T: Service,
    I: ?Sized + Interface,
    F: Service + Fn(&mut T, Svc<I>),
{
    fn inject(
        &self,
        target: &mut (dyn Service + 'static),
        container: &Container,
    ) -> InjectResult<()> {
        let dependency = container.get(self.key)?;
        (self.setter)(downcast_target(target)?, dependency);
        Ok(())
    }
}

pub(crate) struct MultipleInjector<T, I, F>
where
    I: ?Sized,
{
    key: Key<I>,
    setter: F,
    marker: PhantomData<fn(&mut T)>,
}

impl<T, I, F> MultipleInjector<T, I, F>
where
    I: ?Sized,
{
    pub fn new(key: Key<I>, setter: F) -> Self {
        MultipleInjector {
            key,
            setter,
            marker: PhantomData,
        }
    }
}

impl<T, I, F> FieldInjector for MultipleInjector<T, I, F>
where
    T: Service,
    I: ?Sized + Interface,
    F: Service + Fn(&mut T, Vec<Svc<I>>),
{
    fn inject(
        &self,
        target: &mut (dyn Service + 'static),
        container: &Container,
    ) -> InjectResult<()> {
        let dependencies = container.get_all(self.key)?;
        (self.setter)(downcast_target(target)?, dependencies);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Perch {
        height: u32,
    }

    #[derive(Default)]
    struct Feeder;

    #[test]
    fn target_is_borrowed_as_its_concrete_type() {
        let mut instance: Box<dyn Service> = Box::new(Perch::default());

        let perch = downcast_target::<Perch>(&mut *instance).unwrap();
        perch.height = 3;

        let perch = instance.downcast_ref::<Perch>().unwrap();
        assert_eq!(3, perch.height);
    }

    #[test]
    fn target_of_another_type_is_internal_error() {
        let mut instance: Box<dyn Service> = Box::new(Feeder);

        match downcast_target::<Perch>(&mut *instance) {
            Err(InjectError::InternalError(_)) => {}
            Err(error) => Err(error).unwrap(),
            Ok(_) => panic!("feeder was borrowed as a perch"),
        }
    }
}
