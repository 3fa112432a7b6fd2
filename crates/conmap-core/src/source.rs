//! Dictionary source locators.
//!
//! Two schemes are accepted:
//!
//! - `classpath:/dictionaries/dishes.xml` resolves against resources embedded
//!   in the program, then against the configured resource roots
//! - `file:///tmp/dictionaries/dishes.xml` names an absolute path

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use url::Url;

use crate::error::LoadError;

/// Resources bundled with the running program.
#[derive(Debug, Clone, Default)]
pub struct Classpath {
    roots: Vec<PathBuf>,
    embedded: HashMap<String, Arc<[u8]>>,
}

impl Classpath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    /// Register an in-memory resource, e.g. from `include_str!`
    pub fn embed(mut self, path: &str, content: impl AsRef<[u8]>) -> Self {
        self.embedded
            .insert(resource_name(path).to_string(), Arc::from(content.as_ref()));
        self
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn resolve(&self, path: &str) -> Option<Location> {
        let name = resource_name(path);
        if let Some(content) = self.embedded.get(name) {
            return Some(Location::Embedded(Arc::clone(content)));
        }

        self.roots
            .iter()
            .map(|root| root.join(name))
            .find(|candidate| candidate.is_file())
            .map(Location::File)
    }
}

fn resource_name(path: &str) -> &str {
    path.trim_start_matches('/')
}

#[derive(Debug, Clone)]
enum Location {
    Embedded(Arc<[u8]>),
    File(PathBuf),
}

/// A resolved, readable dictionary source.
#[derive(Debug, Clone)]
pub struct DictionarySource {
    locator: String,
    location: Location,
}

impl DictionarySource {
    /// Validate `locator` and check that it names an existing resource.
    pub fn resolve(locator: &str, classpath: &Classpath) -> Result<Self, LoadError> {
        let url = Url::parse(locator).map_err(|e| LoadError::SourceAccess {
            locator: locator.to_string(),
            reason: format!("invalid locator: {e}"),
        })?;

        let location = match url.scheme() {
            "classpath" => {
                tracing::info!("loading data resource from classpath: {}", url.path());
                classpath
                    .resolve(url.path())
                    .ok_or_else(|| LoadError::SourceAccess {
                        locator: locator.to_string(),
                        reason: "resource not found on classpath".to_string(),
                    })?
            }
            "file" => {
                tracing::info!("loading data resource via file: {}", url);
                let path = url.to_file_path().map_err(|_| LoadError::SourceAccess {
                    locator: locator.to_string(),
                    reason: "not an absolute file path".to_string(),
                })?;
                if !path.is_file() {
                    return Err(LoadError::SourceAccess {
                        locator: locator.to_string(),
                        reason: format!("no such file: {}", path.display()),
                    });
                }
                Location::File(path)
            }
            scheme => {
                return Err(LoadError::UnsupportedScheme {
                    scheme: scheme.to_string(),
                    locator: locator.to_string(),
                });
            }
        };

        Ok(Self {
            locator: locator.to_string(),
            location,
        })
    }

    /// Resolve an absolute filesystem path as a `file:` source
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let url = Url::from_file_path(path).map_err(|_| LoadError::SourceAccess {
            locator: path.display().to_string(),
            reason: "not an absolute file path".to_string(),
        })?;
        Self::resolve(url.as_str(), &Classpath::default())
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    /// Short name used in diagnostics: the last path segment of the locator
    pub fn source_id(&self) -> &str {
        self.locator
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.locator)
    }

    pub fn open(&self) -> Result<Box<dyn BufRead>, LoadError> {
        match &self.location {
            Location::Embedded(content) => Ok(Box::new(Cursor::new(Arc::clone(content)))),
            Location::File(path) => {
                let file = File::open(path)?;
                Ok(Box::new(BufReader::new(file)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    fn read_all(source: &DictionarySource) -> String {
        let mut text = String::new();
        source.open().unwrap().read_to_string(&mut text).unwrap();
        text
    }

    #[test]
    fn test_embedded_classpath_resource() {
        let classpath = Classpath::new().embed("/dictionaries/dishes.xml", "<token/>");
        let source = DictionarySource::resolve("classpath:/dictionaries/dishes.xml", &classpath).unwrap();

        assert_eq!(source.source_id(), "dishes.xml");
        assert_eq!(read_all(&source), "<token/>");
    }

    #[test]
    fn test_classpath_root_lookup() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("dictionaries")).unwrap();
        std::fs::write(dir.path().join("dictionaries/colors.xml"), "<colors/>").unwrap();

        let classpath = Classpath::new().with_root(dir.path());
        let source = DictionarySource::resolve("classpath:/dictionaries/colors.xml", &classpath).unwrap();
        assert_eq!(read_all(&source), "<colors/>");
    }

    #[test]
    fn test_missing_classpath_resource() {
        let err = DictionarySource::resolve("classpath:/missing.xml", &Classpath::new()).unwrap_err();
        assert!(matches!(err, LoadError::SourceAccess { .. }));
    }

    #[test]
    fn test_file_locator() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "<dict/>").unwrap();

        let source = DictionarySource::from_path(file.path()).unwrap();
        assert!(source.locator().starts_with("file:///"));
        assert_eq!(read_all(&source), "<dict/>");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.xml");
        let err = DictionarySource::from_path(&missing).unwrap_err();
        assert!(matches!(err, LoadError::SourceAccess { .. }));
    }

    #[test]
    fn test_other_schemes_are_rejected() {
        let err = DictionarySource::resolve("http://example.com/dict.xml", &Classpath::new()).unwrap_err();
        match err {
            LoadError::UnsupportedScheme { scheme, .. } => assert_eq!(scheme, "http"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_locator() {
        let err = DictionarySource::resolve("no scheme here", &Classpath::new()).unwrap_err();
        assert!(matches!(err, LoadError::SourceAccess { .. }));
    }
}
