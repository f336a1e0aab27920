use crate::backup::file_ext::FileExtProvider;
use derive_more::Display;
use std::sync::Arc;

/// Compression applied by the archiver, selected by the `format` option.
///
/// The archiver does the actual compression; this type only knows which
/// flag selects it and what extension the resulting file carries.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, Hash)]
pub enum CompressionFormat {
    #[default]
    #[display("none")]
    None,
    #[display("gzip")]
    Gzip,
    #[display("bzip2")]
    Bzip2,
    #[display("xz")]
    Xz,
    #[display("lzip")]
    Lzip,
    #[display("lzop")]
    Lzop,
    #[display("lzma")]
    Lzma,
    #[display("zstd")]
    Zstd,
}

impl CompressionFormat {
    pub const ALL: [CompressionFormat; 8] = [
        CompressionFormat::None,
        CompressionFormat::Gzip,
        CompressionFormat::Bzip2,
        CompressionFormat::Xz,
        CompressionFormat::Lzip,
        CompressionFormat::Lzop,
        CompressionFormat::Lzma,
        CompressionFormat::Zstd,
    ];

    /// Exact keyword match, ignoring case and surrounding whitespace.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let keyword = keyword.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.to_string().eq_ignore_ascii_case(keyword))
    }

    /// Unknown keywords fall back to an uncompressed archive.
    pub fn from_config_value(raw: &str) -> Self {
        Self::from_keyword(raw).unwrap_or_else(|| {
            tracing::warn!("Unknown compression format {:?}, writing uncompressed tar", raw);
            CompressionFormat::None
        })
    }

    pub fn tar_flag(&self) -> Option<&'static str> {
        match self {
            CompressionFormat::None => None,
            CompressionFormat::Gzip => Some("--gzip"),
            CompressionFormat::Bzip2 => Some("--bzip2"),
            CompressionFormat::Xz => Some("--xz"),
            CompressionFormat::Lzip => Some("--lzip"),
            CompressionFormat::Lzop => Some("--lzop"),
            CompressionFormat::Lzma => Some("--lzma"),
            CompressionFormat::Zstd => Some("--zstd"),
        }
    }
}

impl FileExtProvider for CompressionFormat {
    fn file_ext(&self) -> Option<Arc<str>> {
        match self {
            CompressionFormat::None => None,
            CompressionFormat::Gzip => Some("gz".into()),
            CompressionFormat::Bzip2 => Some("bz2".into()),
            CompressionFormat::Xz => Some("xz".into()),
            CompressionFormat::Lzip => Some("lz".into()),
            CompressionFormat::Lzop => Some("lzo".into()),
            CompressionFormat::Lzma => Some("lzma".into()),
            CompressionFormat::Zstd => Some("zst".into()),
        }
    }
}
