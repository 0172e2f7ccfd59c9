//! Logger setup.
//!
//! The terminal belongs to the viewer while it runs, so interactive
//! sessions log to a file in the temp directory. Batch runs log to
//! stderr. Both honor `RUST_LOG` and default to warnings.

use std::fs::File;
use std::io;
use std::path::PathBuf;

use env_logger::{Builder, Env, Target};

const DEFAULT_FILTER: &str = "warn";

fn builder() -> Builder {
    Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER))
}

/// Logs to stderr.
pub fn init_stderr() {
    // A second init (tests, embedding) keeps the first logger
    let _ = builder().target(Target::Stderr).try_init();
}

/// Logs to a freshly named file in the temp directory and returns its path.
pub fn init_file() -> io::Result<PathBuf> {
    let path = log_file_path();
    let file = File::create(&path)?;
    let _ = builder().target(Target::Pipe(Box::new(file))).try_init();
    Ok(path)
}

/// Random file name so concurrent sessions don't share a log.
fn log_file_path() -> PathBuf {
    std::env::temp_dir().join(format!("seqhighlight-{:08x}.log", rand::random::<u32>()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_path_shape() {
        let path = log_file_path();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("seqhighlight-"));
        assert!(name.ends_with(".log"));
        assert_eq!(name.len(), "seqhighlight-".len() + 8 + ".log".len());
        assert_eq!(path.parent().unwrap(), std::env::temp_dir());
    }
}
