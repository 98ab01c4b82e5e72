/// Application name
pub const APP_NAME: &str = "vgof";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default module directory
pub const DEFAULT_MODULE_DIR: &str = "./modules";

/// Default module file extension (`so`, `dylib` or `dll`)
pub const DEFAULT_MODULE_EXTENSION: &str = std::env::consts::DLL_EXTENSION;
