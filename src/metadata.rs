mod descriptor;
mod injection;
mod store;

pub use descriptor::*;
pub use injection::{Cardinality, Field, FieldKind, InjectionRequest};
pub use store::*;
