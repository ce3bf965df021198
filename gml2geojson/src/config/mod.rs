//! Configuration de la conversion
//!
//! Priorité : arguments CLI > variable d'environnement > fichier JSON > défauts.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gml::CrsCode;

/// Variable d'environnement surchargeant le CRS par défaut
pub const DEFAULT_CRS_ENV: &str = "GML2GEOJSON_DEFAULT_CRS";

/// Configuration principale
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// CRS supposé quand le document n'en déclare pas (ex: "EPSG:25833")
    pub default_crs: String,

    /// Indenter le GeoJSON produit
    pub pretty: bool,

    /// Motif glob des fichiers d'entrée en mode dossier
    pub pattern: String,

    /// Chemin du rapport JSON (optionnel)
    pub report: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_crs: CrsCode::default().to_string(),
            pretty: false,
            pattern: "*.gml".to_string(),
            report: None,
        }
    }
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Fichier si fourni, sinon défauts ; puis surcharge par l'environnement
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_override(std::env::var(DEFAULT_CRS_ENV).ok()))
    }

    /// Applique la valeur de `GML2GEOJSON_DEFAULT_CRS` si présente et non vide
    pub fn with_env_override(mut self, default_crs: Option<String>) -> Self {
        if let Some(crs) = default_crs.filter(|c| !c.trim().is_empty()) {
            self.default_crs = crs;
        }
        self
    }

    /// CRS par défaut normalisé
    pub fn default_crs(&self) -> Result<CrsCode> {
        self.default_crs
            .parse()
            .with_context(|| format!("Invalid default CRS: {}", self.default_crs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.default_crs().unwrap(), CrsCode::new(25833));
        assert_eq!(config.pattern, "*.gml");
        assert!(!config.pretty);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"default_crs": "urn:ogc:def:crs:EPSG::25832", "pretty": true}}"#).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.default_crs().unwrap(), CrsCode::new(25832));
        assert!(config.pretty);
        assert_eq!(config.pattern, "*.gml");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"srid": 4326}}"#).unwrap();
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_env_override() {
        let config = Config::default().with_env_override(Some("EPSG:5972".to_string()));
        assert_eq!(config.default_crs().unwrap(), CrsCode::new(5972));

        let config = Config::default().with_env_override(Some("  ".to_string()));
        assert_eq!(config.default_crs().unwrap(), CrsCode::default());
    }

    #[test]
    fn test_invalid_default_crs() {
        let config = Config {
            default_crs: "local".to_string(),
            ..Config::default()
        };
        assert!(config.default_crs().is_err());
    }
}
