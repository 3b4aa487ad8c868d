//! Module loaders used when scanning module paths.

use std::path::Path;

use lwc_core::LoadError;

use crate::module::Module;

/// Turns files found on a module path into modules.
pub trait Loader: Send {
    /// Loader name, used in log output.
    fn name(&self) -> &str;

    /// Whether this loader handles the file.
    fn can_load(&self, path: &Path) -> bool;

    /// Load the module the file describes.
    fn load(&self, path: &Path) -> Result<Box<dyn Module>, LoadError>;
}
