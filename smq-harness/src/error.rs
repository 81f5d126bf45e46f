//! The harness's own error type. `smq-core` and `smq-sampler` have no
//! recoverable failures on their hot paths; the harness is pure I/O
//! orchestration, so this is where `thiserror` earns its keep.

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum HarnessError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
