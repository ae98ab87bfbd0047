pub mod chart;
pub mod summary;

use std::path::PathBuf;

pub use chart::CapacityChart;
pub use summary::write_summary;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("could not write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
