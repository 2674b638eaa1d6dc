use std::path::Path;

use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber: env-filtered fmt output on stderr, plus an
/// append-mode log file when one is configured. Called once from the binary;
/// library code only emits through `tracing` macros.
pub fn init(log_file: Option<&Path>) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file.and_then(split_log_path) {
        Some((directory, file_name)) => {
            let _ = std::fs::create_dir_all(&directory);
            let appender = tracing_appender::rolling::never(directory, file_name);
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr.and(appender))
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}

fn split_log_path(path: &Path) -> Option<(std::path::PathBuf, std::ffi::OsString)> {
    let file_name = path.file_name()?.to_os_string();
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    Some((directory, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_separates_directory_and_file() {
        let (dir, file) = split_log_path(Path::new("logs/seroview.log")).unwrap();
        assert_eq!(dir, std::path::PathBuf::from("logs"));
        assert_eq!(file, std::ffi::OsString::from("seroview.log"));
    }

    #[test]
    fn bare_file_name_logs_into_the_working_directory() {
        let (dir, file) = split_log_path(Path::new("seroview.log")).unwrap();
        assert_eq!(dir, std::path::PathBuf::from("."));
        assert_eq!(file, std::ffi::OsString::from("seroview.log"));
    }
}
