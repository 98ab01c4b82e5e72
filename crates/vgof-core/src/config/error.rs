use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error reading configuration '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} configuration '{}': {message}", path.display())]
    Parse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unknown or unsupported configuration format for path: {}", path.display())]
    UnsupportedFormat { path: PathBuf },
}
