use std::path::PathBuf;

use clap::Parser;
use vgof_core::{KernelConfig, KernelResult};

/// vgof: load modules, start them as their services appear, run the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Kernel configuration file (.json, .toml, .yaml or .yml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory scanned for module libraries
    #[arg(long, value_name = "DIR")]
    pub module_dir: Option<PathBuf>,

    /// File extension of module libraries, e.g. `so`
    #[arg(long, value_name = "EXT")]
    pub module_extension: Option<String>,

    /// Load only this module; repeat for several. Without it every module in
    /// the module directory is loaded.
    #[arg(long = "module", value_name = "NAME")]
    pub modules: Vec<String>,

    /// Designate the kernel's registry as the process-wide registry
    #[arg(long)]
    pub global: bool,

    /// Log filter, e.g. `debug` or `vgof_core=trace`. Overrides RUST_LOG.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Configuration file values, overridden by whatever was given on the
    /// command line.
    pub fn kernel_config(&self) -> KernelResult<KernelConfig> {
        let mut config = match &self.config {
            Some(path) => KernelConfig::from_file(path)?,
            None => KernelConfig::default(),
        };
        if let Some(dir) = &self.module_dir {
            config = config.with_module_dir(dir);
        }
        if let Some(extension) = &self.module_extension {
            config = config.with_module_extension(extension);
        }
        if !self.modules.is_empty() {
            config = config.with_modules(self.modules.iter().cloned());
        }
        if self.global {
            config = config.with_global_registry(true);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_overrides_defaults() {
        let args = CliArgs::parse_from([
            "vgof",
            "--module-dir",
            "mods/",
            "--module",
            "log-sink",
            "--module",
            "hello-app",
            "--global",
        ]);
        let config = args.kernel_config().unwrap();

        assert_eq!(config.module_dir(), std::path::Path::new("mods"));
        assert_eq!(
            config.modules(),
            Some(&["log-sink".to_string(), "hello-app".to_string()][..])
        );
        assert!(config.global_registry());
    }

    #[test]
    fn test_no_arguments_keeps_defaults() {
        let args = CliArgs::parse_from(["vgof"]);
        assert_eq!(args.kernel_config().unwrap(), KernelConfig::default());
    }
}
