use crate::kernel::error::Result;
use crate::service::ServiceRegistry;

/// A module as handed from a loader to the dispatch engine.
pub type ModuleBox = Box<dyn Module>;

/// Core trait that every loadable module implements.
///
/// Dependencies are not declared up front. Instead the dispatch engine asks
/// each module whether the services it needs are present, and starts it as
/// soon as they are.
pub trait Module: Send {
    /// Name used in logs and reports.
    fn name(&self) -> &str;

    /// Whether the services this module needs are installed.
    ///
    /// Must not modify the registry and must give the same answer for the
    /// same registry contents; it is asked again on every dispatch pass
    /// until it says yes.
    fn check_depend(&self, registry: &ServiceRegistry) -> bool;

    /// Initialize the module, installing any services it provides.
    ///
    /// Called at most once per dispatch. Returns `true` iff at least one
    /// service that was not there before got installed, which makes the
    /// engine re-check modules that are still waiting.
    fn start(&mut self, registry: &ServiceRegistry) -> Result<bool>;

    /// Release the module's resources (flush buffers, join threads).
    ///
    /// Only called on started modules, in reverse start order. The default
    /// does nothing.
    fn stop(&mut self, registry: &ServiceRegistry) -> Result<()> {
        let _ = registry;
        Ok(())
    }
}

/// Export a module type from a `cdylib` so [`DynamicLoader`](crate::module_system::DynamicLoader)
/// can find it.
///
/// Besides the constructor this exports the core version and type
/// fingerprint the module was built against, and a hook through which the
/// host hands over its logger. The constructed module is wrapped in a
/// [`GuardedModule`](crate::module_system::guard::GuardedModule), so its
/// panics are caught inside the module's own image.
///
/// ```ignore
/// #[derive(Default)]
/// pub struct EchoModule;
/// // impl vgof_core::Module for EchoModule { ... }
/// vgof_core::declare_module!(EchoModule, EchoModule::default);
/// ```
#[macro_export]
macro_rules! declare_module {
    ($module_type:ty, $constructor:path) => {
        #[allow(non_upper_case_globals)]
        #[unsafe(no_mangle)]
        pub static _vgof_module_abi: &str = $crate::module_system::MODULE_ABI_VERSION;

        #[unsafe(no_mangle)]
        pub extern "C" fn _vgof_module_fingerprint() -> u64 {
            $crate::module_system::version::abi_fingerprint()
        }

        #[allow(improper_ctypes_definitions)]
        #[unsafe(no_mangle)]
        pub extern "C" fn _vgof_module_logger(
            logger: &'static dyn $crate::log::Log,
            level: $crate::log::LevelFilter,
        ) {
            $crate::module_system::guard::install_logger(logger, level);
        }

        #[allow(improper_ctypes_definitions)]
        #[unsafe(no_mangle)]
        pub extern "C" fn _vgof_module_entry() -> *mut $crate::module_system::ModuleBox {
            let constructor: fn() -> $module_type = $constructor;
            match $crate::module_system::guard::construct_guarded(constructor) {
                ::std::option::Option::Some(module) => {
                    ::std::boxed::Box::into_raw(::std::boxed::Box::new(module))
                }
                ::std::option::Option::None => ::std::ptr::null_mut(),
            }
        }
    };
}
