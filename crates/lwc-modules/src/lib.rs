//! Built-in component modules.
//!
//! | module   | classes                                   |
//! |----------|-------------------------------------------|
//! | `pytest` | `pytest.ObjectList`, `pytest.ObjectList2` |
//! | `test`   | `test.Box`, `test.DoubleBox`              |
//! | `rbtest` | `rbtest.Point`, `rbtest.Point2`           |

pub mod boxes;
pub mod loader;
pub mod objlist;
pub mod point;

pub use boxes::Geometry;
pub use loader::{BuiltinLoader, MODULE_EXTENSION};
pub use objlist::ObjectList;
pub use point::Point;

use lwc_core::RegistrationError;
use lwc_registry::{Registry, StaticModule};

/// All built-in modules.
pub fn builtin_modules() -> Result<Vec<StaticModule>, RegistrationError> {
    Ok(vec![objlist::module()?, boxes::module()?, point::module()?])
}

/// Register every built-in module. Returns the number of types registered.
pub fn register_builtins(registry: &mut Registry) -> Result<usize, RegistrationError> {
    let mut registered = 0;
    for module in builtin_modules()? {
        registered += registry.register_module(&module)?;
    }
    Ok(registered)
}
