//! Keyed dependency injection.
//!
//! Implementations are bound to typed [`Key`]s on a [`Container`], then
//! requested back by key. A key names a capability, and the type it is
//! created with is the contract every implementation bound to it fulfills.
//! Because the contract is part of the key's type, binding and resolving are
//! checked against each other at compile time.
//!
//! By default, services provided by the container are thread-safe and held
//! in an [`Arc<T>`](std::sync::Arc). This can be changed by disabling default
//! features and enabling the "rc" feature, which uses
//! [`Rc<T>`](std::rc::Rc) instead:
//!
//! ```text
//! keyed_injector = {
//!     version = "*",
//!     default_features = false,
//!     features = ["rc"]
//! }
//! ```
//!
//! # Metadata
//!
//! The container never guesses how to create an implementation. Everything
//! it needs is declared ahead of time in a [`MetadataStore`]:
//!
//! - [`injectable`](MetadataStore::injectable) declares the key an
//!   implementation is injectable for, and optionally its [`Scope`].
//! - [`inject`](MetadataStore::inject) and
//!   [`inject_all`](MetadataStore::inject_all) declare fields that are filled
//!   in from the container each time the implementation is instantiated.
//!
//! Implementations are constructed through [`Default`], after which their
//! declared fields are injected in declaration order.
//!
//! # Scopes
//!
//! - Singleton: An instance is created only the first time it is requested
//!   and that single instance is reused for each future request. This is the
//!   default.
//! - Transient: An instance is created each time it is requested.
//!
//! # Example
//!
//! ```
//! use keyed_injector::{
//!     interface, Container, Key, MetadataStore, Scope, Service, Svc,
//! };
//!
//! // The contract our birds fulfill. The `Service` supertrait lets the
//! // container erase and recover the concrete type of each bird.
//! trait Bird: Service {
//!     fn song(&self) -> &'static str;
//! }
//! interface!(Bird);
//!
//! #[derive(Default)]
//! struct Sparrow;
//! impl Bird for Sparrow {
//!     fn song(&self) -> &'static str {
//!         "chirp"
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Hawk;
//! impl Bird for Hawk {
//!     fn song(&self) -> &'static str {
//!         "screech"
//!     }
//! }
//!
//! // An aviary holds every bird bound in the container
//! #[derive(Default)]
//! struct Aviary {
//!     birds: Vec<Svc<dyn Bird>>,
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bird: Key<dyn Bird> = Key::new("Bird");
//!     let aviary: Key<Aviary> = Key::new("Aviary");
//!
//!     // Declare how each implementation is created and injected
//!     let mut metadata = MetadataStore::new();
//!     metadata
//!         .injectable_with_scope::<Sparrow, _>(bird, Scope::Transient)?
//!         .injectable::<Hawk, _>(bird)?
//!         .injectable::<Aviary, _>(aviary)?
//!         .inject_all("birds", bird, |aviary: &mut Aviary, birds| {
//!             aviary.birds = birds;
//!         })?;
//!
//!     // Bind the implementations we want to use
//!     let mut container = Container::new(metadata);
//!     container
//!         .bind::<_, Sparrow>(bird)?
//!         .bind::<_, Hawk>(bird)?
//!         .bind::<_, Aviary>(aviary)?;
//!
//!     let aviary = container.get(aviary)?;
//!     let songs: Vec<_> = aviary.birds.iter().map(|bird| bird.song()).collect();
//!     assert_eq!(vec!["chirp", "screech"], songs);
//!
//!     Ok(())
//! }
//! ```
//!
//! For a longer walkthrough, see the [getting started
//! guide](crate::docs::getting_started).

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::needless_pass_by_value,
    clippy::needless_doctest_main
)]

#[cfg(not(any(feature = "arc", feature = "rc")))]
compile_error!(
    "Either the 'arc' or 'rc' feature must be enabled (but not both)."
);

#[cfg(all(feature = "arc", feature = "rc"))]
compile_error!(
    "The 'arc' and 'rc' features are mutually exclusive and cannot be enabled together."
);

mod container;
mod key;
mod metadata;
mod module;
mod pool;
mod registry;
mod services;

pub use container::*;
pub use key::*;
pub use metadata::*;
pub use module::*;
pub use services::*;

pub mod docs;
