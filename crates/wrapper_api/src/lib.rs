#![forbid(unsafe_code)]
//! Extension surface for build wrappers.
//!
//! A build wrapper gets one chance, at build setup time, to replace the
//! writer that receives the build's console output. Wrappers are advertised
//! by a static [`WrapperDescriptor`] and installed into a [`WrapperRegistry`]
//! explicitly at host startup; there is no runtime discovery.

mod context;
mod descriptor;
mod error;
mod registry;
mod settings;
mod wrapper;

pub use context::BuildContext;
pub use descriptor::WrapperDescriptor;
pub use error::WrapperError;
pub use registry::WrapperRegistry;
pub use settings::WrapperSettings;
pub use wrapper::{BoxWriter, BuildWrapper, WrapperFactory};
