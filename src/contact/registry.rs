//! Registry mapping contact types to force generators.

use std::collections::HashMap;

use tracing::{debug, error};

use crate::error::{ContactError, Result};

use super::generator::ForceGenerator;
use super::types::ContactTypeId;

/// Exclusive owner of the force generators, one per contact type, plus an
/// optional default for types with no generator of their own.
///
/// Registration happens during setup. Evaluation only reads.
#[derive(Debug, Default)]
pub struct GeneratorRegistry {
    generators: HashMap<ContactTypeId, Box<dyn ForceGenerator>>,
    default: Option<Box<dyn ForceGenerator>>,
}

impl GeneratorRegistry {
    /// Empty registry without a default generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt `generator` for the contact type it declares, dropping any
    /// generator previously registered for that type.
    pub fn register(&mut self, generator: impl ForceGenerator + 'static) {
        self.register_boxed(Box::new(generator));
    }

    /// Like [`register`](Self::register) for an already boxed generator.
    pub fn register_boxed(&mut self, generator: Box<dyn ForceGenerator>) {
        let type_id = generator.contact_type_id();
        let name = generator.name();
        match self.generators.insert(type_id, generator) {
            Some(previous) => debug!(
                contact_type = %type_id,
                replaced = previous.name(),
                generator = name,
                "replaced force generator"
            ),
            None => debug!(contact_type = %type_id, generator = name, "registered force generator"),
        }
    }

    /// Adopt `generator` as the fallback for unregistered types, dropping any
    /// previous default.
    pub fn register_default(&mut self, generator: impl ForceGenerator + 'static) {
        self.register_default_boxed(Box::new(generator));
    }

    pub fn register_default_boxed(&mut self, generator: Box<dyn ForceGenerator>) {
        debug!(generator = generator.name(), "registered default force generator");
        self.default = Some(generator);
    }

    /// Generator for `type_id`, or the default generator if none is
    /// registered for that type.
    ///
    /// Fails with [`ContactError::Configuration`] when neither exists.
    pub fn lookup(&self, type_id: ContactTypeId) -> Result<&dyn ForceGenerator> {
        if let Some(generator) = self.generators.get(&type_id) {
            return Ok(generator.as_ref());
        }
        match &self.default {
            Some(generator) => Ok(generator.as_ref()),
            None => {
                error!(contact_type = %type_id, "no force generator for contact type");
                Err(ContactError::Configuration { type_id })
            }
        }
    }

    /// Whether a generator is registered specifically for `type_id`.
    pub fn has(&self, type_id: ContactTypeId) -> bool {
        self.generators.contains_key(&type_id)
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn default_generator(&self) -> Option<&dyn ForceGenerator> {
        self.default.as_deref()
    }

    /// Number of type-specific generators (the default is not counted).
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}
