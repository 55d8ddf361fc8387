use std::sync::Arc;

use crate::{
    BoxWriter, BuildContext, BuildWrapper, WrapperDescriptor, WrapperError, WrapperFactory,
    WrapperSettings,
};

/// Registry of wrapper factories installed at host startup.
///
/// Registration order is decoration order: [`WrapperRegistry::decorate_all`]
/// folds wrappers over the build's writer in the order they were registered.
#[derive(Clone, Default)]
pub struct WrapperRegistry {
    factories: Vec<Arc<dyn WrapperFactory>>,
}

impl WrapperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a factory under its descriptor id. Ids must be unique.
    pub fn register<F>(&mut self, factory: F) -> Result<(), WrapperError>
    where
        F: WrapperFactory + 'static,
    {
        let id = factory.descriptor().id;
        if self.contains(id) {
            return Err(WrapperError::DuplicateWrapper { id: id.to_string() });
        }
        self.factories.push(Arc::new(factory));
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.iter().any(|f| f.descriptor().id == id)
    }

    pub fn get(&self, id: &str) -> Option<&dyn WrapperFactory> {
        self.factories
            .iter()
            .find(|f| f.descriptor().id == id)
            .map(AsRef::as_ref)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &'static WrapperDescriptor> + '_ {
        self.factories.iter().map(|f| f.descriptor())
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Build a configured wrapper from its persisted settings fragment.
    pub fn instantiate(
        &self,
        id: &str,
        settings: Option<&toml::Value>,
    ) -> Result<Box<dyn BuildWrapper>, WrapperError> {
        let factory = self
            .get(id)
            .ok_or_else(|| WrapperError::UnknownWrapper { id: id.to_string() })?;
        factory.build(settings)
    }

    /// Decorate a build's log writer with every registered wrapper.
    ///
    /// Each wrapper is instantiated fresh for this build, its `set_up` hook
    /// runs, and the writer is threaded through `decorate_writer`. The first
    /// failure aborts setup and is returned unchanged.
    pub fn decorate_all(
        &self,
        build: &BuildContext,
        writer: BoxWriter,
        settings: &WrapperSettings,
    ) -> Result<BoxWriter, WrapperError> {
        let mut writer = writer;
        for factory in &self.factories {
            let id = factory.descriptor().id;
            let wrapper = factory.build(settings.get(id))?;
            wrapper.set_up(build)?;
            writer = wrapper.decorate_writer(build, writer)?;
        }
        Ok(writer)
    }
}
