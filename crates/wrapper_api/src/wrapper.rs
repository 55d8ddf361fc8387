use std::io::Write;

use crate::{BuildContext, WrapperDescriptor, WrapperError};

/// Writer boxed for dynamic decoration chains.
pub type BoxWriter = Box<dyn Write + Send>;

/// A build wrapper decorates the writer that receives a build's console
/// output. Decoration happens exactly once per build, before any output is
/// produced; the returned writer is owned by the host for the rest of the
/// build and dropped when the build ends.
pub trait BuildWrapper: Send + Sync {
    /// Static descriptor advertising wrapper metadata.
    fn descriptor(&self) -> &'static WrapperDescriptor;

    /// Replace or wrap the build's log writer.
    ///
    /// A failure here aborts build setup; the host does not retry.
    fn decorate_writer(
        &self,
        build: &BuildContext,
        writer: BoxWriter,
    ) -> Result<BoxWriter, WrapperError>;

    /// Hook invoked once the decorated writer is in place.
    fn set_up(&self, _build: &BuildContext) -> Result<(), WrapperError> {
        Ok(())
    }
}

impl std::fmt::Debug for dyn BuildWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildWrapper")
            .field("id", &self.descriptor().id)
            .finish()
    }
}

/// Builds a configured [`BuildWrapper`] from the host-persisted settings
/// fragment for its descriptor id. `None` means the host has no stored
/// settings and the wrapper should use its defaults.
pub trait WrapperFactory: Send + Sync {
    fn descriptor(&self) -> &'static WrapperDescriptor;

    fn build(&self, settings: Option<&toml::Value>) -> Result<Box<dyn BuildWrapper>, WrapperError>;
}
