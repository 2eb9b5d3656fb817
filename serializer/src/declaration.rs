//! Registrations produced away from the code that builds the registry.
//!
//! A [`Declaration`] captures one `(identifier, type, codec factory)` triple. Whatever
//! collects them (a plugin table, a configuration loader, a list assembled at startup) hands
//! them to [`crate::RegistryBuilder::declare`], which constructs each codec and registers it
//! with the usual conflict checks.

use crate::{Codec, Error, RegistryBuilder, TypeIdentifier};
use core::{
    any::{type_name, Any},
    fmt,
};

type Apply = Box<dyn FnOnce(&mut RegistryBuilder, TypeIdentifier) -> Result<(), Error> + Send>;

/// A deferred registration.
pub struct Declaration {
    id: TypeIdentifier,
    type_name: &'static str,
    apply: Apply,
}

impl Declaration {
    /// Declares that `T` is bound to `id` with the codec returned by `factory`.
    ///
    /// The factory runs when the declaration is applied.
    pub fn new<T, C, F>(id: TypeIdentifier, factory: F) -> Self
    where
        T: Any + Send + Sync,
        C: Codec<T>,
        F: FnOnce() -> C + Send + 'static,
    {
        Self {
            id,
            type_name: type_name::<T>(),
            apply: Box::new(move |builder, id| {
                builder.register::<T, C>(id, factory())?;
                Ok(())
            }),
        }
    }

    /// The declared identifier.
    pub fn id(&self) -> TypeIdentifier {
        self.id
    }

    /// The name of the declared type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn apply(self, builder: &mut RegistryBuilder) -> Result<(), Error> {
        (self.apply)(builder, self.id)
    }
}

impl fmt::Debug for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Declaration")
            .field("id", &self.id)
            .field("type_name", &self.type_name)
            .finish()
    }
}
