use crate::domain::{Config, Document, Environment};
use crate::error::ConfigError;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CONFIG_BASENAME: &str = "hoist";
pub const CONFIG_EXTENSIONS: [&str; 4] = ["json", "yaml", "yml", "toml"];

/// How to locate and prepare the configuration for one run
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit document path; searched for when absent
    pub config: Option<PathBuf>,
    /// Prefix for the names given to the container runtime
    pub prefix: String,
    /// Tag forced on every image not pinned by digest
    pub tag: Option<String>,
}

/// Candidate file names: the given one, or `hoist.{json,yaml,yml,toml}`
pub fn config_filenames(given: Option<&Path>) -> Vec<PathBuf> {
    match given {
        Some(path) => vec![path.to_path_buf()],
        None => CONFIG_EXTENSIONS
            .iter()
            .map(|ext| PathBuf::from(format!("{CONFIG_BASENAME}.{ext}")))
            .collect(),
    }
}

/// Looks for the first candidate in `start_dir`, then in each parent.
///
/// Absolute candidates are only checked where they point.
pub fn find_config(start_dir: &Path, candidates: &[PathBuf]) -> Option<PathBuf> {
    for candidate in candidates.iter().filter(|c| c.is_absolute()) {
        if candidate.is_file() {
            return Some(candidate.clone());
        }
    }

    let relative: Vec<&PathBuf> = candidates.iter().filter(|c| !c.is_absolute()).collect();
    if relative.is_empty() {
        return None;
    }

    for dir in start_dir.ancestors() {
        for candidate in &relative {
            let path = dir.join(candidate);
            if path.is_file() {
                debug!("Configuração encontrada em {:?}", path);
                return Some(path);
            }
        }
    }

    None
}

fn parse_error(path: &Path, err: impl std::fmt::Display) -> ConfigError {
    ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Parses a document, picking the format from the file extension.
pub fn parse_document(content: &str, path: &Path) -> Result<Document, ConfigError> {
    if content.trim().is_empty() {
        return Ok(Document::default());
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match extension.as_str() {
        "json" => serde_json::from_str(content).map_err(|e| parse_error(path, e)),
        "yml" | "yaml" => serde_yml::from_str(content).map_err(|e| parse_error(path, e)),
        "toml" => toml::from_str(content).map_err(|e| parse_error(path, e)),
        other => Err(parse_error(
            path,
            format!("extensão '{other}' não suportada (use json, yaml, yml ou toml)"),
        )),
    }
}

pub fn load_document(path: &Path) -> Result<Document> {
    let content = fs::read_to_string(path).with_context(|| format!("lendo {:?}", path))?;
    Ok(parse_document(&content, path)?)
}

/// Finds, parses and initializes the configuration for this run.
pub fn load_config(options: &LoadOptions, start_dir: &Path) -> Result<Config> {
    let candidates = config_filenames(options.config.as_deref());
    let Some(path) = find_config(start_dir, &candidates) else {
        let names: Vec<String> = candidates
            .iter()
            .map(|c| c.display().to_string())
            .collect();
        bail!(
            "Nenhuma configuração encontrada a partir de {:?} (procurado: {})",
            start_dir,
            names.join(", ")
        );
    };

    info!(" Usando configuração {:?}", path);
    let document = load_document(&path)?;

    let mut config = Config::new(document)
        .with_environment(Environment::process())
        .with_prefix(options.prefix.clone());
    config.initialize()?;

    if let Some(tag) = options.tag.as_deref().filter(|t| !t.is_empty()) {
        config.override_image_tag(tag);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HookEvent;

    const JSON: &str = r#"{
    "containers": {
        "apache": {
            "dockerfile": "apache",
            "image": "michaelsauter/apache",
            "run": {
                "volumes-from": ["crane_app"],
                "publish": ["80:80"],
                "link": ["crane_mysql:db", "crane_memcached:cache"],
                "detach": true
            }
        }
    },
    "groups": {
        "default": ["apache"]
    },
    "hooks": {
        "apache": {
            "post-stop": "echo apache container stopped!\n"
        },
        "default": {
            "pre-start": "echo start...",
            "post-start": "echo start done!\n"
        }
    }
}"#;

    const YAML: &str = r#"
containers:
  apache:
    dockerfile: apache
    image: michaelsauter/apache
    run:
      volumes-from: ["crane_app"]
      publish: ["80:80"]
      link: ["crane_mysql:db", "crane_memcached:cache"]
      detach: true
groups:
  default:
    - apache
hooks:
  apache:
    post-stop: echo apache container stopped!
  default:
    pre-start: echo start...
    post-start: echo start done!
"#;

    const TOML: &str = r#"
[containers.apache]
dockerfile = "apache"
image = "michaelsauter/apache"

[containers.apache.run]
volumes-from = ["crane_app"]
publish = ["80:80"]
link = ["crane_mysql:db", "crane_memcached:cache"]
detach = true

[groups]
default = ["apache"]

[hooks.apache]
post-stop = "echo apache container stopped!"

[hooks.default]
pre-start = "echo start..."
post-start = "echo start done!"
"#;

    fn assert_apache(document: &Document) {
        assert_eq!(document.containers.len(), 1);
        let apache = &document.containers["apache"];
        assert_eq!(apache.image, "michaelsauter/apache");
        assert_eq!(apache.dockerfile.as_deref(), Some("apache"));
        assert_eq!(apache.run.link.len(), 2);
        assert!(apache.run.detach);
        assert_eq!(document.groups.len(), 1);
        assert_eq!(document.hooks.len(), 2);
        assert!(document.hooks["default"].get(HookEvent::PreStart).is_some());
        assert!(document.hooks["default"].get(HookEvent::PostStart).is_some());
    }

    #[test]
    fn parses_json() {
        let document = parse_document(JSON, Path::new("hoist.json")).unwrap();
        assert_apache(&document);
    }

    #[test]
    fn parses_yaml() {
        let document = parse_document(YAML, Path::new("hoist.yml")).unwrap();
        assert_apache(&document);
    }

    #[test]
    fn parses_toml() {
        let document = parse_document(TOML, Path::new("hoist.toml")).unwrap();
        assert_apache(&document);
    }

    #[test]
    fn rejects_scalar_where_list_expected_in_json() {
        let json = r#"{"containers": {"apache": {"image": "a", "run": {"publish": "shouldbeanarray"}}}}"#;
        let err = parse_document(json, Path::new("hoist.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn rejects_scalar_where_list_expected_in_yaml() {
        let yaml = r#"
containers:
  apache:
    image: michaelsauter/apache
    run:
      publish: "shouldbeanarray"
"#;
        let err = parse_document(yaml, Path::new("hoist.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = parse_document("containers: {}", Path::new("hoist.ini")).unwrap_err();
        assert!(err.to_string().contains("não suportada"));
    }

    #[test]
    fn blank_document_is_empty() {
        let document = parse_document("  \n", Path::new("hoist.json")).unwrap();
        assert_eq!(document, Document::default());
    }

    #[test]
    fn config_filenames_defaults() {
        assert_eq!(
            config_filenames(Some(Path::new("some/file.yml"))),
            vec![PathBuf::from("some/file.yml")]
        );
        assert_eq!(
            config_filenames(None),
            vec![
                PathBuf::from("hoist.json"),
                PathBuf::from("hoist.yaml"),
                PathBuf::from("hoist.yml"),
                PathBuf::from("hoist.toml"),
            ]
        );
    }

    #[test]
    fn finds_config_in_current_and_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("hoist.yml");
        fs::write(&config_path, YAML).unwrap();
        let nested = temp_dir.path().join("sub/deeper");
        fs::create_dir_all(&nested).unwrap();

        let candidates = config_filenames(None);
        assert_eq!(
            find_config(temp_dir.path(), &candidates),
            Some(config_path.clone())
        );
        assert_eq!(find_config(&nested, &candidates), Some(config_path.clone()));

        let absolute = vec![config_path.clone()];
        assert_eq!(find_config(&nested, &absolute), Some(config_path));
    }

    #[test]
    fn missing_config_is_reported() {
        let temp_dir = tempfile::tempdir().unwrap();
        let options = LoadOptions {
            config: Some(PathBuf::from("nothing-here-hoist.json")),
            ..Default::default()
        };

        let err = load_config(&options, temp_dir.path()).unwrap_err();
        assert!(err.to_string().contains("Nenhuma configuração encontrada"));
    }
}
