use std::sync::Arc;

/// Anything that contributes a dotted file extension (e.g. `tar.xz`) to an archive name.
pub trait FileExtProvider {
    fn file_ext(&self) -> Option<Arc<str>>;
}
