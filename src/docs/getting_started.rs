//! # Getting started
//!
//! Let's start with a simple application that greets our users:
//!
//! ```
//! fn main() {
//!     let name = "John";
//!     println!("Hello, {}! I hope you're having a wonderful day.", name);
//! }
//! ```
//!
//! Our users want the greeting to go somewhere other than the console
//! sometimes, and we want to check the greeting in our unit tests. Let's put
//! the output behind a trait so the code writing a greeting doesn't care
//! where it ends up:
//!
//! ```
//! trait OutputWriter {
//!     fn write_output(&self, message: &str);
//! }
//!
//! struct ConsoleWriter;
//! impl OutputWriter for ConsoleWriter {
//!     fn write_output(&self, message: &str) {
//!         println!("{message}");
//!     }
//! }
//!
//! struct Greeter<W: OutputWriter> {
//!     writer: W,
//! }
//!
//! impl<W: OutputWriter> Greeter<W> {
//!     fn greet(&self, name: &str) {
//!         self.writer.write_output(&format!("Hello, {name}!"));
//!     }
//! }
//!
//! fn main() {
//!     let greeter = Greeter {
//!         writer: ConsoleWriter,
//!     };
//!     greeter.greet("John");
//! }
//! ```
//!
//! This works, but every service that writes output now needs a generic
//! parameter, and whoever creates a `Greeter` must know which writer to give
//! it. As the application grows, wiring everything together by hand gets out
//! of hand quickly. Let's have a container do it for us instead.
//!
//! ## Keys, metadata, and bindings
//!
//! Three things are needed to resolve a service from a [`Container`]:
//!
//! 1. A [`Key`] naming the capability we want. Keys are typed by the contract
//!    that implementations bound to them fulfill, usually a trait object.
//! 2. Metadata describing each implementation, declared in a
//!    [`MetadataStore`]. An implementation declares the key it is injectable
//!    for, its [`Scope`], and which of its fields the container fills in.
//! 3. Bindings on the container, which choose the implementations actually
//!    used for each key.
//!
//! ```
//! use keyed_injector::{interface, Container, Key, MetadataStore, Service, Svc};
//!
//! // `Service` lets the container erase the concrete type of each writer.
//! // With the "arc" feature it also requires `Send` and `Sync`.
//! trait OutputWriter: Service {
//!     fn write_output(&self, message: &str);
//! }
//! interface!(OutputWriter);
//!
//! #[derive(Default)]
//! struct ConsoleWriter;
//! impl OutputWriter for ConsoleWriter {
//!     fn write_output(&self, message: &str) {
//!         println!("{message}");
//!     }
//! }
//!
//! // Instances are created with `Default`, so injected fields need a
//! // placeholder until the container fills them in
//! #[derive(Default)]
//! struct Greeter {
//!     writer: Option<Svc<dyn OutputWriter>>,
//! }
//!
//! impl Greeter {
//!     fn greet(&self, name: &str) {
//!         if let Some(writer) = &self.writer {
//!             writer.write_output(&format!("Hello, {name}!"));
//!         }
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let output: Key<dyn OutputWriter> = Key::new("OutputWriter");
//!     let greeter: Key<Greeter> = Key::new("Greeter");
//!
//!     let mut metadata = MetadataStore::new();
//!     metadata
//!         .injectable::<ConsoleWriter, _>(output)?
//!         .injectable::<Greeter, _>(greeter)?
//!         .inject("writer", output, |greeter: &mut Greeter, writer| {
//!             greeter.writer = Some(writer);
//!         })?;
//!
//!     let mut container = Container::new(metadata);
//!     container
//!         .bind::<_, ConsoleWriter>(output)?
//!         .bind::<_, Greeter>(greeter)?;
//!
//!     container.get(greeter)?.greet("John");
//!     Ok(())
//! }
//! ```
//!
//! Notice that nothing about `Greeter` mentions `ConsoleWriter` anymore. The
//! container picked the writer because it was the one bound to the
//! `OutputWriter` key.
//!
//! ## Scopes
//!
//! Implementations are singletons unless they declare otherwise. The first
//! time a singleton is resolved, the container creates it and keeps it, and
//! every later request gets that same instance. Transient implementations
//! are created again for each request, and their fields are injected again
//! each time.
//!
//! ```
//! use keyed_injector::{Container, Key, MetadataStore, Scope, Svc};
//!
//! #[derive(Default)]
//! struct Config;
//!
//! #[derive(Default)]
//! struct Request;
//!
//! let config: Key<Config> = Key::new("Config");
//! let request: Key<Request> = Key::new("Request");
//!
//! let mut metadata = MetadataStore::new();
//! metadata
//!     .injectable::<Config, _>(config)
//!     .unwrap()
//!     .injectable_with_scope::<Request, _>(request, Scope::Transient)
//!     .unwrap();
//!
//! let mut container = Container::new(metadata);
//! container
//!     .bind::<_, Config>(config)
//!     .unwrap()
//!     .bind::<_, Request>(request)
//!     .unwrap();
//!
//! let first = container.get(config).unwrap();
//! let second = container.get(config).unwrap();
//! assert!(Svc::ptr_eq(&first, &second));
//!
//! let first = container.get(request).unwrap();
//! let second = container.get(request).unwrap();
//! assert!(!Svc::ptr_eq(&first, &second));
//! ```
//!
//! ## Many implementations for one key
//!
//! Any number of implementations can be bound to the same key. When a key
//! has more than one, [`Container::get()`] refuses to pick one for us and
//! fails with [`InjectError::AmbiguousBinding`]. To get all of them, in the
//! order they were bound, use [`Container::get_all()`], or declare the field
//! with [`MetadataStore::inject_all()`]:
//!
//! ```
//! use keyed_injector::{
//!     interface, Container, InjectError, Key, MetadataStore, Service, Svc,
//! };
//!
//! trait Plugin: Service {
//!     fn name(&self) -> &'static str;
//! }
//! interface!(Plugin);
//!
//! #[derive(Default)]
//! struct Spellcheck;
//! impl Plugin for Spellcheck {
//!     fn name(&self) -> &'static str {
//!         "spellcheck"
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Autosave;
//! impl Plugin for Autosave {
//!     fn name(&self) -> &'static str {
//!         "autosave"
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Editor {
//!     plugins: Vec<Svc<dyn Plugin>>,
//! }
//!
//! let plugin: Key<dyn Plugin> = Key::new("Plugin");
//! let editor: Key<Editor> = Key::new("Editor");
//!
//! let mut metadata = MetadataStore::new();
//! metadata
//!     .injectable::<Spellcheck, _>(plugin)
//!     .unwrap()
//!     .injectable::<Autosave, _>(plugin)
//!     .unwrap()
//!     .injectable::<Editor, _>(editor)
//!     .unwrap()
//!     .inject_all("plugins", plugin, |editor: &mut Editor, plugins| {
//!         editor.plugins = plugins;
//!     })
//!     .unwrap();
//!
//! let mut container = Container::new(metadata);
//! container
//!     .bind::<_, Spellcheck>(plugin)
//!     .unwrap()
//!     .bind::<_, Autosave>(plugin)
//!     .unwrap()
//!     .bind::<_, Editor>(editor)
//!     .unwrap();
//!
//! assert!(matches!(
//!     container.get(plugin),
//!     Err(InjectError::AmbiguousBinding { implementations: 2, .. })
//! ));
//!
//! let editor = container.get(editor).unwrap();
//! let names: Vec<_> = editor.plugins.iter().map(|plugin| plugin.name()).collect();
//! assert_eq!(vec!["spellcheck", "autosave"], names);
//! ```
//!
//! ## Swapping implementations in tests
//!
//! Because bindings are made on the container rather than in the services
//! themselves, our tests can bind a mock in place of the real
//! implementation. The metadata store can be shared by any number of
//! containers, so tests and the application declare everything once.
//!
//! ```
//! use keyed_injector::{
//!     define_module, interface, Container, Key, MetadataStore, Service, Svc,
//! };
//! use std::sync::Mutex;
//!
//! trait OutputWriter: Service {
//!     fn write_output(&self, message: &str);
//! }
//! interface!(OutputWriter);
//!
//! #[derive(Default)]
//! struct ConsoleWriter;
//! impl OutputWriter for ConsoleWriter {
//!     fn write_output(&self, message: &str) {
//!         println!("{message}");
//!     }
//! }
//!
//! // Our mock writer just remembers what it was asked to write
//! #[derive(Default)]
//! struct MockWriter(Mutex<Vec<String>>);
//! impl OutputWriter for MockWriter {
//!     fn write_output(&self, message: &str) {
//!         self.0.lock().unwrap().push(message.to_string());
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Greeter {
//!     writer: Option<Svc<dyn OutputWriter>>,
//! }
//!
//! impl Greeter {
//!     fn greet(&self, name: &str) {
//!         if let Some(writer) = &self.writer {
//!             writer.write_output(&format!("Hello, {name}!"));
//!         }
//!     }
//! }
//!
//! let output: Key<dyn OutputWriter> = Key::new("OutputWriter");
//! let greeter: Key<Greeter> = Key::new("Greeter");
//! let mock: Key<MockWriter> = Key::new("MockWriter");
//!
//! let mut metadata = MetadataStore::new();
//! metadata
//!     .injectable::<ConsoleWriter, _>(output)
//!     .unwrap()
//!     .injectable::<MockWriter, _>(output)
//!     .unwrap()
//!     .injectable::<Greeter, _>(greeter)
//!     .unwrap()
//!     .inject("writer", output, |greeter: &mut Greeter, writer| {
//!         greeter.writer = Some(writer);
//!     })
//!     .unwrap();
//! let metadata = Svc::new(metadata);
//!
//! // The application binds the console writer
//! let mut app = Container::new(metadata.clone());
//! app.add_module(define_module! {
//!     output => [ConsoleWriter],
//!     greeter => [Greeter],
//! })
//! .unwrap();
//!
//! // Our test binds the mock instead. It also binds the mock under its own
//! // key so we can look at what was written. Since the mock is a singleton,
//! // both keys resolve to the same instance.
//! let mut test = Container::new(metadata);
//! test.add_module(define_module! {
//!     output => [MockWriter],
//!     greeter => [Greeter],
//!     mock => [MockWriter],
//! })
//! .unwrap();
//!
//! test.get(greeter).unwrap().greet("John");
//! let written = test.get(mock).unwrap();
//! assert_eq!(vec!["Hello, John!"], *written.0.lock().unwrap());
//! ```
//!
//! ## When things go wrong
//!
//! Every failure is reported as an [`InjectError`], and nothing panics:
//!
//! - Binding an implementation with no metadata fails with
//!   [`InjectError::MissingMetadata`], and the container is left unchanged.
//! - Resolving a key with nothing bound to it fails with
//!   [`InjectError::BindingNotFound`].
//! - Resolving an implementation that only declared field injections, but
//!   never declared itself injectable, fails with
//!   [`InjectError::NotInjectable`].
//! - Errors raised while injecting a field are returned unchanged from the
//!   outermost request, and the instance being created is dropped.
//!
//! The container emits [`tracing`] events as it binds and resolves services.
//! Install a subscriber in your application to see them.
//!
//! [`Container`]: crate::Container
//! [`Container::get()`]: crate::Container::get
//! [`Container::get_all()`]: crate::Container::get_all
//! [`Key`]: crate::Key
//! [`MetadataStore`]: crate::MetadataStore
//! [`MetadataStore::inject_all()`]: crate::MetadataStore::inject_all
//! [`Scope`]: crate::Scope
//! [`InjectError`]: crate::InjectError
//! [`InjectError::AmbiguousBinding`]: crate::InjectError::AmbiguousBinding
//! [`InjectError::MissingMetadata`]: crate::InjectError::MissingMetadata
//! [`InjectError::BindingNotFound`]: crate::InjectError::BindingNotFound
//! [`InjectError::NotInjectable`]: crate::InjectError::NotInjectable
