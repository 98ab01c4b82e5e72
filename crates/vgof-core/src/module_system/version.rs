use std::any::TypeId;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

use semver::{Version, VersionReq};

use crate::kernel::application::Application;
use crate::kernel::error::Error;
use crate::module_system::error::ModuleSystemError;
use crate::module_system::traits::ModuleBox;

/// Core version a module is built against; exported by [`declare_module!`](crate::declare_module).
pub const MODULE_ABI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Whether a module built against `module_abi` may run on a `host` core.
///
/// Follows caret semantics: same major version, and for `0.x` the same minor.
pub fn is_compatible(host: &Version, module_abi: &str) -> Result<bool, semver::Error> {
    let requirement = VersionReq::parse(&format!("^{}", module_abi.trim()))?;
    Ok(requirement.matches(host))
}

/// Identity of the types that cross the library boundary, as this copy of
/// the core sees them.
///
/// Type ids depend on how each copy of the core was compiled, not only on
/// its version. Two images agree on this value iff the registry downcasts
/// and trait objects they exchange line up.
pub fn abi_fingerprint() -> u64 {
    let mut hasher = DefaultHasher::new();
    TypeId::of::<ModuleBox>().hash(&mut hasher);
    TypeId::of::<Arc<dyn Application>>().hash(&mut hasher);
    TypeId::of::<Error>().hash(&mut hasher);
    TypeId::of::<&'static dyn log::Log>().hash(&mut hasher);
    hasher.finish()
}

/// Check a module's exported core version and type fingerprint against this
/// core's own.
pub fn check_module_abi(
    module: &str,
    module_abi: &str,
    module_fingerprint: u64,
) -> Result<(), ModuleSystemError> {
    let host = Version::parse(MODULE_ABI_VERSION)
        .map_err(|e| ModuleSystemError::load_failure(module, None, e))?;
    let compatible = is_compatible(&host, module_abi)
        .map_err(|e| ModuleSystemError::load_failure(module, None, e))?;
    if !compatible {
        return Err(ModuleSystemError::IncompatibleModule {
            module: module.to_string(),
            module_abi: module_abi.to_string(),
            host_abi: MODULE_ABI_VERSION.to_string(),
        });
    }

    let host_fingerprint = abi_fingerprint();
    if module_fingerprint != host_fingerprint {
        // Same version, different build of the core.
        return Err(ModuleSystemError::IncompatibleModule {
            module: module.to_string(),
            module_abi: format!("{}+{:016x}", module_abi, module_fingerprint),
            host_abi: format!("{}+{:016x}", MODULE_ABI_VERSION, host_fingerprint),
        });
    }
    Ok(())
}
