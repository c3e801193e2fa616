use std::path::Path;

use once_cell::unsync::OnceCell;
use tracing::debug;

use codeshape_token::{CachedStream, LoadError, TokenStream};

use crate::builder::{build, BuildOptions};
use crate::decl::Declaration;
use crate::report::DeclarationReport;

/// One source file: its bytes, token stream and declaration tree.
///
/// The stream and the tree are each built at most once, on first request.
#[derive(Debug)]
pub struct SourceFile {
    name: String,
    tokens: CachedStream,
    model: OnceCell<Declaration>,
    options: BuildOptions,
}

impl SourceFile {
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        debug!(path = %path.display(), bytes = bytes.len(), "read source file");
        Ok(Self::from_bytes(path.display().to_string(), bytes))
    }

    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            tokens: CachedStream::new(bytes),
            model: OnceCell::new(),
            options: BuildOptions::default(),
        }
    }

    pub fn from_source(name: impl Into<String>, text: &str) -> Self {
        Self::from_bytes(name, text.as_bytes())
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.tokens.bytes().len()
    }

    /// Tokenize now; later calls are no-ops.
    pub fn load(&self) -> Result<(), LoadError> {
        self.tokens.load()
    }

    pub fn stream(&self) -> Result<&TokenStream, LoadError> {
        self.tokens.get()
    }

    /// The `File` declaration, built on first call.
    pub fn declarations(&self) -> Result<&Declaration, LoadError> {
        self.model
            .get_or_try_init(|| -> Result<Declaration, LoadError> {
                Ok(build(&self.name, self.stream()?, &self.options))
            })
    }

    pub fn report(&self) -> Result<DeclarationReport, LoadError> {
        let stream = self.stream()?;
        Ok(DeclarationReport::new(self.declarations()?, stream))
    }
}
