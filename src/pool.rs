use crate::{DynSvc, InjectResult, ServiceInfo, Svc};
use std::{
    collections::HashMap,
    fmt::{Debug, Formatter},
};

pub(crate) trait PoolCellEx<T> {
    fn new(value: T) -> Self;
    fn with_inner<R, F: FnOnce(&T) -> R>(&self, f: F) -> R;
    fn with_inner_mut<R, F: FnOnce(&mut T) -> R>(&self, f: F) -> R;
}

#[cfg(feature = "rc")]
mod types {
    use super::PoolCellEx;
    use crate::DynSvc;
    use std::cell::RefCell;

    pub type PoolCell<T> = RefCell<T>;
    pub type Slot = once_cell::unsync::OnceCell<DynSvc>;

    impl<T> PoolCellEx<T> for PoolCell<T> {
        fn new(value: T) -> Self {
            RefCell::new(value)
        }

        fn with_inner<R, F: FnOnce(&T) -> R>(&self, f: F) -> R {
            f(&*self.borrow())
        }

        fn with_inner_mut<R, F: FnOnce(&mut T) -> R>(&self, f: F) -> R {
            f(&mut *self.borrow_mut())
        }
    }
}

#[cfg(feature = "arc")]
mod types {
    use super::PoolCellEx;
    use crate::DynSvc;
    use std::sync::{Mutex, PoisonError};

    pub type PoolCell<T> = Mutex<T>;
    pub type Slot = once_cell::sync::OnceCell<DynSvc>;

    impl<T> PoolCellEx<T> for PoolCell<T> {
        fn new(value: T) -> Self {
            Mutex::new(value)
        }

        fn with_inner<R, F: FnOnce(&T) -> R>(&self, f: F) -> R {
            f(&*self.lock().unwrap_or_else(PoisonError::into_inner))
        }

        fn with_inner_mut<R, F: FnOnce(&mut T) -> R>(&self, f: F) -> R {
            f(&mut *self.lock().unwrap_or_else(PoisonError::into_inner))
        }
    }
}

#[allow(clippy::wildcard_imports)]
pub(crate) use types::*;

/// Holds the instance of every singleton implementation that has been
/// resolved at least once. Instances are never removed.
///
/// Each implementation gets its own slot, initialized at most once. The map
/// of slots is only borrowed while a slot is looked up or created, and a slot
/// is initialized after that borrow ends. Resolving other implementations
/// while a slot is being initialized therefore never re-enters a held borrow,
/// and concurrent first resolutions of the same implementation wait for a
/// single initializer.
pub(crate) struct InstancePool {
    slots: PoolCell<HashMap<ServiceInfo, Svc<Slot>>>,
}

impl InstancePool {
    pub fn new() -> Self {
        InstancePool {
            slots: PoolCellEx::new(HashMap::new()),
        }
    }

    /// Gets the pooled instance of an implementation, if it has been
    /// initialized.
    pub fn get(&self, implementation: ServiceInfo) -> Option<DynSvc> {
        self.slots.with_inner(|slots| {
            slots
                .get(&implementation)
                .and_then(|slot| slot.get().cloned())
        })
    }

    /// Gets the pooled instance of an implementation, creating it with `init`
    /// if there is none yet. `init` runs at most once per implementation
    /// unless it fails, in which case the slot stays empty and the next
    /// caller runs its own `init`.
    pub fn get_or_try_init<F>(
        &self,
        implementation: ServiceInfo,
        init: F,
    ) -> InjectResult<DynSvc>
    where
        F: FnOnce() -> InjectResult<DynSvc>,
    {
        let slot = self.slots.with_inner_mut(|slots| {
            slots.entry(implementation).or_default().clone()
        });
        slot.get_or_try_init(init).cloned()
    }
}

impl Default for InstancePool {
    fn default() -> Self {
        InstancePool::new()
    }
}

impl Debug for InstancePool {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.slots.with_inner(|slots| {
            f.debug_list()
                .entries(
                    slots
                        .iter()
                        .filter(|(_, slot)| slot.get().is_some())
                        .map(|(implementation, _)| implementation.name()),
                )
                .finish()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InjectError;

    struct Foo(i32);

    fn foo(value: i32) -> InjectResult<DynSvc> {
        Ok(Svc::new(Foo(value)))
    }

    fn value_of(instance: DynSvc) -> i32 {
        #[cfg(feature = "arc")]
        let foo = instance.downcast_arc::<Foo>().ok().unwrap();
        #[cfg(feature = "rc")]
        let foo = instance.downcast_rc::<Foo>().ok().unwrap();
        foo.0
    }

    #[test]
    fn empty_pool_has_no_instances() {
        let pool = InstancePool::new();

        assert!(pool.get(ServiceInfo::of::<Foo>()).is_none());
        assert_eq!("[]", format!("{:?}", pool));
    }

    #[test]
    fn slot_is_initialized_once() {
        let pool = InstancePool::new();

        let first = pool
            .get_or_try_init(ServiceInfo::of::<Foo>(), || foo(1))
            .unwrap();
        let second = pool
            .get_or_try_init(ServiceInfo::of::<Foo>(), || {
                panic!("initialized slot was initialized again")
            })
            .unwrap();

        assert!(Svc::ptr_eq(&first, &second));
        assert_eq!(1, value_of(pool.get(ServiceInfo::of::<Foo>()).unwrap()));
    }

    #[test]
    fn failed_init_leaves_slot_empty() {
        let pool = InstancePool::new();

        let result = pool.get_or_try_init(ServiceInfo::of::<Foo>(), || {
            Err(InjectError::InternalError("construction failed".into()))
        });
        match result {
            Err(InjectError::InternalError(_)) => {}
            Err(error) => Err(error).unwrap(),
            Ok(_) => panic!("failed initializer produced an instance"),
        }
        assert!(pool.get(ServiceInfo::of::<Foo>()).is_none());

        let instance = pool
            .get_or_try_init(ServiceInfo::of::<Foo>(), || foo(2))
            .unwrap();
        assert_eq!(2, value_of(instance));
    }

    #[test]
    fn slots_can_be_initialized_while_another_is_initializing() {
        struct Bar;
        let pool = InstancePool::new();

        let outer = pool
            .get_or_try_init(ServiceInfo::of::<Foo>(), || {
                pool.get_or_try_init(ServiceInfo::of::<Bar>(), || {
                    let bar: DynSvc = Svc::new(Bar);
                    Ok(bar)
                })?;
                foo(3)
            })
            .unwrap();

        assert_eq!(3, value_of(outer));
        assert!(pool.get(ServiceInfo::of::<Bar>()).is_some());
    }

    #[cfg(feature = "arc")]
    #[test]
    fn concurrent_first_init_runs_once() {
        use std::{
            sync::atomic::{AtomicUsize, Ordering},
            thread,
            time::Duration,
        };

        let pool = InstancePool::new();
        let inits = AtomicUsize::new(0);

        let instances: Vec<_> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        pool.get_or_try_init(ServiceInfo::of::<Foo>(), || {
                            inits.fetch_add(1, Ordering::SeqCst);
                            thread::sleep(Duration::from_millis(20));
                            foo(4)
                        })
                        .unwrap()
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect()
        });

        assert_eq!(1, inits.load(Ordering::SeqCst));
        for instance in &instances {
            assert!(Svc::ptr_eq(&instances[0], instance));
        }
    }
}
