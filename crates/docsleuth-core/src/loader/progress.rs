/// Load progress reporting — messages sent from the loader thread to the
/// frontend via a crossbeam channel.
use super::Catalog;
use std::time::Duration;

#[derive(Debug)]
pub enum LoadProgress {
    /// Discovery finished; `files` candidates are about to be parsed.
    Discovered { files: usize },
    /// Loading finished. Ownership of the catalog moves to the receiver.
    Complete { catalog: Catalog, duration: Duration },
    /// The root could not be loaded at all.
    Failed { message: String },
}
