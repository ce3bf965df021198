//! Types d'erreurs pour le crate gml

use thiserror::Error;

/// Erreurs fatales pouvant survenir lors d'une conversion GML
///
/// Les absences structurelles (polygone sans `exterior`, wrapper vide, etc.) ne sont pas
/// des erreurs : elles sont absorbées et comptées comme features ignorées.
#[derive(Debug, Error)]
pub enum GmlError {
    /// Erreur d'I/O lors de la lecture du document
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document XML illisible
    #[error("Unreadable input document: {0}")]
    InputUnreadable(#[from] roxmltree::Error),

    /// Octets non décodables avec l'encodage déclaré
    #[error("Invalid {encoding} input: {reason}")]
    InvalidEncoding { encoding: String, reason: String },

    /// Texte numérique invalide dans une liste de positions
    #[error("Malformed number {token:?} in <{element}> of feature #{feature_index}")]
    MalformedNumber {
        feature_index: usize,
        element: String,
        token: String,
    },

    /// Déclaration de CRS sans code EPSG reconnaissable
    #[error("Invalid CRS declaration: {0}")]
    InvalidCrs(String),

    /// Code EPSG sans projection disponible
    #[error("Unsupported CRS EPSG:{code}")]
    UnsupportedCrs { code: u32 },

    /// Échec de la transformation d'une coordonnée
    #[error("Projection from EPSG:{code} failed: {reason}")]
    Projection { code: u32, reason: String },

    /// Échec d'écriture d'une géométrie GeoJSON
    #[error("GeoJSON geometry serialization failed: {0}")]
    Geometry(#[from] geozero::error::GeozeroError),

    /// Échec de sérialisation JSON
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl GmlError {
    /// Crée une erreur de nombre invalide avec contexte
    pub fn malformed_number(
        feature_index: usize,
        element: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self::MalformedNumber {
            feature_index,
            element: element.into(),
            token: token.into(),
        }
    }

    /// Crée une erreur d'encodage
    pub fn invalid_encoding(encoding: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEncoding {
            encoding: encoding.into(),
            reason: reason.into(),
        }
    }
}
