//! Output file-name templates.
//!
//! The bundler substitutes `[name]`, `[id]`, `[ext]` and the hash tokens in
//! these templates when it emits files. Hash tokens carry a fixed length,
//! e.g. `[chunkhash:7]`, and are dropped entirely for unhashed builds.
//!
//! # Example
//!
//! ```
//! use packrig::assets::AssetNames;
//!
//! let names = AssetNames::new(7, true).unwrap();
//! assert_eq!(names.script(), "js/[name].[chunkhash:7].js");
//! assert_eq!(names.image(), "img/[name].[hash:7].[ext]");
//! ```

use crate::error::{PackrigError, Result};

/// Hash length used when a build target does not set one.
pub const DEFAULT_HASH_LENGTH: usize = 7;

/// Longest hash the bundler can emit.
pub const MAX_HASH_LENGTH: usize = 32;

/// Which hash the bundler should substitute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashKind {
    /// Hash of the whole compilation.
    Build,
    /// Hash of one chunk.
    Chunk,
    /// Hash of an extracted file's content.
    Content,
}

impl HashKind {
    fn token(self) -> &'static str {
        match self {
            HashKind::Build => "hash",
            HashKind::Chunk => "chunkhash",
            HashKind::Content => "contenthash",
        }
    }
}

/// Builds file-name templates for scripts, stylesheets and images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetNames {
    hash_length: usize,
    hashed: bool,
    directory: String,
}

impl AssetNames {
    /// Create templates with hashes of `hash_length` characters.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTarget` if `hash_length` is 0 or above [`MAX_HASH_LENGTH`].
    pub fn new(hash_length: usize, hashed: bool) -> Result<Self> {
        if hash_length == 0 || hash_length > MAX_HASH_LENGTH {
            return Err(PackrigError::InvalidTarget {
                message: format!(
                    "hash length must be between 1 and {}, got {}",
                    MAX_HASH_LENGTH, hash_length
                ),
            });
        }
        Ok(Self {
            hash_length,
            hashed,
            directory: String::new(),
        })
    }

    /// Prefix every template with `directory` (e.g. `static`).
    pub fn with_directory(mut self, directory: impl Into<String>) -> Self {
        self.directory = directory.into().trim_matches('/').to_string();
        self
    }

    pub fn hash_length(&self) -> usize {
        self.hash_length
    }

    pub fn is_hashed(&self) -> bool {
        self.hashed
    }

    /// Placeholder for `kind`, e.g. `[chunkhash:7]`.
    pub fn hash_token(&self, kind: HashKind) -> String {
        format!("[{}:{}]", kind.token(), self.hash_length)
    }

    /// Entry script template.
    pub fn script(&self) -> String {
        self.template("js", "[name]", HashKind::Chunk, "js")
    }

    /// Split chunk template.
    pub fn chunk(&self) -> String {
        self.template("js", "[id]", HashKind::Chunk, "js")
    }

    /// Extracted stylesheet template.
    pub fn stylesheet(&self) -> String {
        self.template("css", "[name]", HashKind::Content, "css")
    }

    /// Image template, keeping the source extension.
    pub fn image(&self) -> String {
        self.template("img", "[name]", HashKind::Build, "[ext]")
    }

    fn template(&self, kind_dir: &str, name: &str, hash: HashKind, ext: &str) -> String {
        let file = if self.hashed {
            format!("{}.{}.{}", name, self.hash_token(hash), ext)
        } else {
            format!("{}.{}", name, ext)
        };

        if self.directory.is_empty() {
            format!("{}/{}", kind_dir, file)
        } else {
            format!("{}/{}/{}", self.directory, kind_dir, file)
        }
    }
}

impl Default for AssetNames {
    fn default() -> Self {
        Self {
            hash_length: DEFAULT_HASH_LENGTH,
            hashed: true,
            directory: String::new(),
        }
    }
}
