//! # gml
//!
//! Conversion de collections de features GML (2, 3.1, 3.2) en GeoJSON, sans schéma.
//!
//! ## Features
//!
//! - Navigation par nom local : préfixes et versions de namespace GML ignorés
//! - Résolution du CRS depuis le premier `srsName` du document, reprojection vers WGS84
//! - Géométries `geo` (Point, LineString, Polygon, MultiLineString, MultiPolygon)
//! - Attributs plats ordonnés, avec classification heuristique `typeLabel`
//! - Décodage des entrées non UTF-8 avec `encoding_rs`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gml::{convert_bytes, ConvertOptions};
//!
//! let data = std::fs::read("Basisdata_5001_Trondheim_25832_FKB-AR5_GML.gml")?;
//! let conversion = convert_bytes(&data, &ConvertOptions::default())?;
//! println!("CRS: {}", conversion.crs);
//! println!("{} features, {} ignorées", conversion.emitted(), conversion.skipped);
//!
//! let json = gml::geojson::to_string(&conversion.collection, false)?;
//! ```

pub mod crs;
pub mod encoding;
pub mod error;
pub mod geojson;
pub mod geometry;
pub mod locator;
pub mod navigator;
pub mod properties;
pub mod reproject;
pub mod types;

pub use error::GmlError;
pub use self::geojson::write_geojson;
pub use properties::PropertyMap;
pub use reproject::Projector;
pub use types::{Conversion, CrsCode, Feature, FeatureCollection};

use roxmltree::{Document, Node, ParsingOptions};
use tracing::{debug, info};

use geometry::{Extracted, GeometryExtractor};
use navigator::LocalNameIndex;

/// Namespaces portant l'attribut `gml:id`, par ordre de priorité
const GML_NAMESPACES: &[&str] = &["http://www.opengis.net/gml/3.2", "http://www.opengis.net/gml"];

/// Clé de l'identifiant injecté dans les attributs
const ID_KEY: &str = "id";

/// Options de conversion
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    /// CRS utilisé quand le document n'en déclare aucun de lisible
    pub default_crs: CrsCode,
}

impl ConvertOptions {
    pub fn with_default_crs(default_crs: CrsCode) -> Self {
        Self { default_crs }
    }
}

/// Convertit un document GML déjà parsé
///
/// Les features sans géométrie exploitable sont ignorées et comptées dans
/// [`Conversion::skipped`], jamais émises avec une géométrie nulle.
///
/// # Errors
///
/// - `GmlError::UnsupportedCrs` si le CRS résolu n'a pas de projection vers WGS84
/// - `GmlError::MalformedNumber` si une liste de positions contient un nombre invalide
pub fn convert(doc: &Document, options: &ConvertOptions) -> Result<Conversion, GmlError> {
    let crs = crs::resolve(doc, options.default_crs)?;
    let index = LocalNameIndex::build(doc);
    let located = locator::locate_features(&index, doc.root());

    let mut collection = FeatureCollection::default();
    let mut skipped = 0;

    for (feature_index, &feature) in located.iter().enumerate() {
        let extractor = GeometryExtractor::new(&index, &crs.projector, feature_index);
        let (element, geometry) = match extractor.extract(feature)? {
            Some(Extracted {
                element,
                geometry: Some(geometry),
                ..
            }) => (element, geometry),
            extracted => {
                debug!(
                    feature_index,
                    feature_type = feature.tag_name().name(),
                    kind = ?extracted.map(|e| e.kind),
                    "Feature without usable geometry skipped"
                );
                skipped += 1;
                continue;
            }
        };

        let id = feature_id(feature, feature_index);
        let mut properties = properties::extract_properties(feature, Some(element));
        properties.set_exclusive(ID_KEY, id.as_str());

        collection.features.push(Feature {
            id,
            properties,
            geometry,
        });
    }

    info!(
        crs = %crs.code,
        found = located.len(),
        emitted = collection.len(),
        skipped,
        "GML conversion completed"
    );

    Ok(Conversion {
        crs: crs.code,
        crs_declaration: crs.declaration,
        collection,
        found: located.len(),
        skipped,
    })
}

/// Parse puis convertit un document GML
///
/// # Errors
///
/// `GmlError::InputUnreadable` si le texte n'est pas du XML bien formé, plus les
/// erreurs de [`convert`].
pub fn convert_str(text: &str, options: &ConvertOptions) -> Result<Conversion, GmlError> {
    let parsing = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(text, parsing)?;
    convert(&doc, options)
}

/// Décode, parse puis convertit un document GML brut
///
/// # Errors
///
/// `GmlError::InvalidEncoding` si les octets ne respectent pas l'encodage détecté, plus
/// les erreurs de [`convert_str`].
pub fn convert_bytes(data: &[u8], options: &ConvertOptions) -> Result<Conversion, GmlError> {
    let text = encoding::decode(data)?;
    convert_str(&text, options)
}

/// Identifiant d'une feature : `gml:id` (GML 3.2 puis 3.1), sinon `feature_<index>`
fn feature_id(feature: Node, feature_index: usize) -> String {
    GML_NAMESPACES
        .iter()
        .find_map(|&ns| feature.attribute((ns, "id")))
        .map(str::to_string)
        .unwrap_or_else(|| format!("feature_{}", feature_index))
}
