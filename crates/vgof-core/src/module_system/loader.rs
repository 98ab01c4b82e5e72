use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};

use crate::config::KernelConfig;
use crate::kernel::fault::catch_fault;
use crate::module_system::discovery::discover_modules;
use crate::module_system::error::ModuleSystemError;
use crate::module_system::traits::{Module, ModuleBox};
use crate::module_system::version::check_module_abi;

/// Exported constructor symbol, generated by [`declare_module!`](crate::declare_module).
pub const MODULE_ENTRY_SYMBOL: &[u8] = b"_vgof_module_entry\0";

/// Exported core version symbol, generated by [`declare_module!`](crate::declare_module).
pub const MODULE_ABI_SYMBOL: &[u8] = b"_vgof_module_abi\0";

/// Exported type fingerprint function, generated by [`declare_module!`](crate::declare_module).
pub const MODULE_FINGERPRINT_SYMBOL: &[u8] = b"_vgof_module_fingerprint\0";

/// Exported logger hook, generated by [`declare_module!`](crate::declare_module).
pub const MODULE_LOGGER_SYMBOL: &[u8] = b"_vgof_module_logger\0";

#[allow(improper_ctypes_definitions)]
type ModuleEntryFn = unsafe extern "C" fn() -> *mut ModuleBox;

type ModuleFingerprintFn = unsafe extern "C" fn() -> u64;

#[allow(improper_ctypes_definitions)]
type ModuleLoggerFn = unsafe extern "C" fn(&'static dyn log::Log, log::LevelFilter);

/// Turns module names into module instances.
///
/// The kernel only talks to this trait, so the registry and dispatch logic
/// do not care whether a module came from a shared library or was linked in.
pub trait ModuleLoader {
    /// Names of every module this loader can provide.
    fn discover(&self) -> Result<Vec<String>, ModuleSystemError>;

    /// Produce the module called `name`.
    fn load(&self, name: &str) -> Result<ModuleBox, ModuleSystemError>;
}

/// Load every named module, stopping at the first failure.
pub fn load_modules<S: AsRef<str>>(
    loader: &dyn ModuleLoader,
    names: &[S],
) -> Result<Vec<ModuleBox>, ModuleSystemError> {
    if names.is_empty() {
        return Err(ModuleSystemError::BadParameter(
            "module list is empty".to_string(),
        ));
    }
    names.iter().map(|name| loader.load(name.as_ref())).collect()
}

/// Loads modules from shared libraries in one directory.
///
/// Module `name` lives in `<module_dir>/<name>.<extension>` and must export
/// the symbols generated by [`declare_module!`](crate::declare_module). The
/// module and the host have to be built by the same compiler against a
/// compatible `vgof-core`.
#[derive(Debug, Clone)]
pub struct DynamicLoader {
    module_dir: PathBuf,
    extension: String,
}

impl DynamicLoader {
    pub fn new<P: AsRef<Path>>(module_dir: P, extension: &str) -> Self {
        Self {
            module_dir: module_dir.as_ref().to_path_buf(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn from_config(config: &KernelConfig) -> Self {
        Self::new(config.module_dir(), config.module_extension())
    }

    pub fn module_dir(&self) -> &Path {
        &self.module_dir
    }

    /// Library path for module `name`.
    pub fn module_path(&self, name: &str) -> PathBuf {
        self.module_dir.join(format!("{}.{}", name, self.extension))
    }

    fn load_from_path(name: &str, lib_path: &Path) -> Result<ModuleBox, ModuleSystemError> {
        let failure = |message: String| {
            ModuleSystemError::load_failure(name, Some(lib_path.to_path_buf()), message)
        };

        let library = unsafe { Library::new(lib_path) }
            .map_err(|e| ModuleSystemError::load_failure(name, Some(lib_path.to_path_buf()), e))?;

        // Copy the version out before anything can unload the library.
        let module_abi = {
            let abi_symbol: Symbol<*const &'static str> = unsafe { library.get(MODULE_ABI_SYMBOL) }
                .map_err(|e| failure(format!("missing symbol _vgof_module_abi: {}", e)))?;
            unsafe { (**abi_symbol).to_string() }
        };
        let fingerprint: ModuleFingerprintFn = {
            let fingerprint_symbol: Symbol<ModuleFingerprintFn> =
                unsafe { library.get(MODULE_FINGERPRINT_SYMBOL) }
                    .map_err(|e| failure(format!("missing symbol _vgof_module_fingerprint: {}", e)))?;
            *fingerprint_symbol
        };
        check_module_abi(name, &module_abi, unsafe { fingerprint() })?;

        // The module has its own copy of `log`; point it at the host's logger.
        let logger: ModuleLoggerFn = {
            let logger_symbol: Symbol<ModuleLoggerFn> = unsafe { library.get(MODULE_LOGGER_SYMBOL) }
                .map_err(|e| failure(format!("missing symbol _vgof_module_logger: {}", e)))?;
            *logger_symbol
        };
        unsafe { logger(log::logger(), log::max_level()) };

        let entry: ModuleEntryFn = {
            let entry_symbol: Symbol<ModuleEntryFn> = unsafe { library.get(MODULE_ENTRY_SYMBOL) }
                .map_err(|e| failure(format!("missing symbol _vgof_module_entry: {}", e)))?;
            *entry_symbol
        };

        // Constructor panics are caught inside the module and come back as null.
        let raw = unsafe { entry() };
        if raw.is_null() {
            return Err(failure("module constructor failed".to_string()));
        }
        let module: ModuleBox = *unsafe { Box::from_raw(raw) };

        // Modules are never unloaded: services they installed may outlive
        // the module object itself.
        std::mem::forget(library);

        log::debug!("Loaded module '{}' ({}) from {}", name, module.name(), lib_path.display());
        Ok(module)
    }
}

impl ModuleLoader for DynamicLoader {
    fn discover(&self) -> Result<Vec<String>, ModuleSystemError> {
        discover_modules(&self.module_dir, &self.extension)
    }

    fn load(&self, name: &str) -> Result<ModuleBox, ModuleSystemError> {
        let lib_path = self.module_path(name);
        Self::load_from_path(name, &lib_path)
    }
}

type ModuleConstructor = Box<dyn Fn() -> ModuleBox + Send + Sync>;

/// Loader for modules linked into the host, keyed by name.
///
/// Also the loader of choice in tests.
#[derive(Default)]
pub struct StaticLoader {
    entries: Vec<(String, ModuleConstructor)>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Register a constructor for module `name`. Names must be unique.
    pub fn register<F, M>(&mut self, name: &str, constructor: F) -> Result<(), ModuleSystemError>
    where
        F: Fn() -> M + Send + Sync + 'static,
        M: Module + 'static,
    {
        if self.entries.iter().any(|(existing, _)| existing == name) {
            return Err(ModuleSystemError::BadParameter(format!(
                "module '{}' is already registered",
                name
            )));
        }
        let boxed: ModuleConstructor = Box::new(move || Box::new(constructor()) as ModuleBox);
        self.entries.push((name.to_string(), boxed));
        Ok(())
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }
}

impl ModuleLoader for StaticLoader {
    fn discover(&self) -> Result<Vec<String>, ModuleSystemError> {
        if self.entries.is_empty() {
            return Err(ModuleSystemError::NoModulesFound {
                location: "static module table".to_string(),
                extension: "*".to_string(),
            });
        }
        Ok(self.names())
    }

    fn load(&self, name: &str) -> Result<ModuleBox, ModuleSystemError> {
        let (_, constructor) = self
            .entries
            .iter()
            .find(|(existing, _)| existing == name)
            .ok_or_else(|| ModuleSystemError::load_failure(name, None, "module is not registered"))?;
        catch_fault(|| constructor())
            .map_err(|fault| ModuleSystemError::load_failure(name, None, format!("module constructor {}", fault)))
    }
}

impl std::fmt::Debug for StaticLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticLoader").field("modules", &self.names()).finish()
    }
}
