//! Manifest discovery and loading.
//!
//! A manifest is found either from an explicit path or by looking for one
//! of [`MANIFEST_FILE_NAMES`] in the project root. Loading parses and
//! validates it, resolves the environment, and builds the probe registry.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::schema::Manifest;
use crate::config::validator::{validate, validate_manifest, Severity};
use crate::environment::{Environment, Value};
use crate::error::{CapcheckError, Result};
use crate::probe::checks::registry_from;
use crate::probe::ProbeRegistry;
use crate::runner::VerdictPolicy;

/// File names searched for in the project root, in order.
pub const MANIFEST_FILE_NAMES: &[&str] = &["capcheck.yml", "capcheck.yaml", ".capcheck.yml"];

/// Find a manifest in the project root.
pub fn find_manifest(project_root: &Path) -> Option<PathBuf> {
    MANIFEST_FILE_NAMES
        .iter()
        .map(|name| project_root.join(name))
        .find(|path| path.is_file())
}

/// Parse manifest text.
pub fn parse_manifest(content: &str, path: &Path) -> Result<Manifest> {
    serde_yaml::from_str(content).map_err(|e| CapcheckError::ManifestParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Read and parse a manifest file.
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    if !path.exists() {
        return Err(CapcheckError::ManifestNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path)?;
    parse_manifest(&content, path)
}

/// A manifest with its environment and registry resolved.
#[derive(Debug)]
pub struct LoadedManifest {
    pub path: PathBuf,
    pub manifest: Manifest,
    pub environment: Environment,
    pub registry: ProbeRegistry,
}

impl LoadedManifest {
    /// Load, validate and resolve a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let manifest = load_manifest(path)?;

        for finding in validate_manifest(&manifest) {
            if finding.severity == Severity::Warning {
                warn!(rule = %finding.rule, "{}", finding.message);
            }
        }
        validate(&manifest)?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let environment = resolve_environment(&manifest, base_dir, path)?;
        let registry = registry_from(&manifest.probes)?;
        debug!(
            path = %path.display(),
            probes = registry.len(),
            implemented = registry.implemented_count(),
            "loaded manifest"
        );

        Ok(Self {
            path: path.to_path_buf(),
            manifest,
            environment,
            registry,
        })
    }

    /// Verdict policy described by the manifest.
    pub fn policy(&self) -> VerdictPolicy {
        VerdictPolicy {
            mandatory: self.manifest.mandatory.clone(),
            min_success_rate: self.manifest.min_success_rate,
        }
    }

    /// Display name, falling back to the manifest file name.
    pub fn display_name(&self) -> String {
        self.manifest.name.clone().unwrap_or_else(|| {
            self.path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "capcheck".to_string())
        })
    }
}

fn resolve_environment(manifest: &Manifest, base_dir: &Path, path: &Path) -> Result<Environment> {
    if let Some(file) = &manifest.environment_file {
        return Environment::load(&base_dir.join(file));
    }
    match &manifest.environment {
        Some(inline) => Value::from_yaml(inline.clone())
            .map(Environment::new)
            .map_err(|message| CapcheckError::ManifestParseError {
                path: path.to_path_buf(),
                message,
            }),
        None => Ok(Environment::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"
name: sample host
mandatory: fs.read
min_success_rate: 50
environment:
  fs:
    read: !callable
probes:
  - name: fs.read
    aliases: [readFile]
    check:
      kind: category
      category: callable
  - name: net.fetch
"#;

    #[test]
    fn finds_manifest_by_known_names() {
        let temp = TempDir::new().unwrap();
        assert!(find_manifest(temp.path()).is_none());
        fs::write(temp.path().join(".capcheck.yml"), "probes: []").unwrap();
        assert_eq!(
            find_manifest(temp.path()),
            Some(temp.path().join(".capcheck.yml"))
        );
        fs::write(temp.path().join("capcheck.yml"), "probes: []").unwrap();
        assert_eq!(
            find_manifest(temp.path()),
            Some(temp.path().join("capcheck.yml"))
        );
    }

    #[test]
    fn loads_inline_environment_and_registry() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("capcheck.yml");
        fs::write(&path, MANIFEST).unwrap();

        let loaded = LoadedManifest::load(&path).unwrap();
        assert_eq!(loaded.display_name(), "sample host");
        assert!(loaded.environment.contains("fs.read"));
        assert_eq!(loaded.registry.len(), 2);
        assert_eq!(loaded.registry.implemented_count(), 1);
        assert_eq!(
            loaded.policy(),
            VerdictPolicy {
                mandatory: Some("fs.read".into()),
                min_success_rate: 50,
            }
        );
    }

    #[test]
    fn loads_environment_file_relative_to_manifest() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("envs")).unwrap();
        fs::write(temp.path().join("envs/host.json"), r#"{"gpu": {"count": 2}}"#).unwrap();
        let path = temp.path().join("capcheck.yml");
        fs::write(
            &path,
            "environment_file: envs/host.json\nprobes:\n  - name: gpu.count\n",
        )
        .unwrap();

        let loaded = LoadedManifest::load(&path).unwrap();
        assert!(loaded.environment.contains("gpu.count"));
        assert_eq!(loaded.display_name(), "capcheck.yml");
    }

    #[test]
    fn missing_manifest_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = LoadedManifest::load(&temp.path().join("capcheck.yml")).unwrap_err();
        assert!(matches!(err, CapcheckError::ManifestNotFound { .. }));
    }

    #[test]
    fn invalid_yaml_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("capcheck.yml");
        fs::write(&path, "probes: [").unwrap();
        let err = LoadedManifest::load(&path).unwrap_err();
        assert!(matches!(err, CapcheckError::ManifestParseError { .. }));
    }

    #[test]
    fn validation_errors_stop_loading() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("capcheck.yml");
        fs::write(&path, "mandatory: gpu\nprobes: []\n").unwrap();
        let err = LoadedManifest::load(&path).unwrap_err();
        assert!(matches!(err, CapcheckError::ManifestValidationError { .. }));
    }

    #[test]
    fn no_environment_means_empty_map() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("capcheck.yml");
        fs::write(&path, "probes:\n  - name: fs\n").unwrap();
        let loaded = LoadedManifest::load(&path).unwrap();
        assert_eq!(loaded.environment, Environment::default());
    }
}
