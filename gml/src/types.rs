//! Types de données pour le crate gml

use std::fmt;
use std::str::FromStr;

use geo::Geometry;

use crate::properties::PropertyMap;
use crate::GmlError;

/// Code de système de coordonnées canonique (`EPSG:<n>`)
///
/// Deux codes sont égaux si et seulement si leurs codes numériques sont égaux.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CrsCode(u32);

impl CrsCode {
    /// WGS84 géographique, cible de toutes les conversions
    pub const WGS84: CrsCode = CrsCode(4326);

    pub const fn new(epsg: u32) -> Self {
        Self(epsg)
    }

    /// Code EPSG numérique
    pub const fn epsg(self) -> u32 {
        self.0
    }
}

impl Default for CrsCode {
    fn default() -> Self {
        Self(25833) // ETRS89 / UTM 33N, grille nationale norvégienne
    }
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

impl FromStr for CrsCode {
    type Err = GmlError;

    /// Accepte `EPSG:25832`, `urn:ogc:def:crs:EPSG::25832`, `25832`, etc.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::crs::epsg_from_declaration(s)
            .map(Self)
            .ok_or_else(|| GmlError::InvalidCrs(s.to_string()))
    }
}

/// Une feature convertie : identifiant, attributs et géométrie en WGS84
#[derive(Debug, Clone)]
pub struct Feature {
    /// Identifiant (gml:id ou `feature_<index>`)
    pub id: String,

    /// Attributs plats, dans l'ordre d'insertion
    pub properties: PropertyMap,

    /// Point, LineString, Polygon, MultiLineString ou MultiPolygon, en (lon, lat)
    pub geometry: Geometry,
}

/// Collection ordonnée de features, dans l'ordre de découverte du document
#[derive(Debug, Clone, Default)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// Convertit vers les types du crate `geojson`
    pub fn to_geojson(&self) -> geojson::FeatureCollection {
        let features = self
            .features
            .iter()
            .map(|feature| {
                let properties: geojson::JsonObject = feature
                    .properties
                    .iter()
                    .map(|(k, v)| (k.to_string(), geojson::JsonValue::from(v)))
                    .collect();
                geojson::Feature {
                    bbox: None,
                    geometry: Some(geojson::Geometry::new(geojson::Value::from(
                        &feature.geometry,
                    ))),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        geojson::FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

/// Résultat d'une conversion
#[derive(Debug, Clone)]
pub struct Conversion {
    /// CRS source utilisé (déclaré ou défaut)
    pub crs: CrsCode,

    /// Valeur brute du premier `srsName` du document
    pub crs_declaration: Option<String>,

    /// Features émises
    pub collection: FeatureCollection,

    /// Nombre de features localisées dans le document
    pub found: usize,

    /// Nombre de features ignorées faute de géométrie
    pub skipped: usize,
}

impl Conversion {
    /// Nombre de features émises
    pub fn emitted(&self) -> usize {
        self.collection.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;

    #[test]
    fn test_crs_code_display() {
        assert_eq!(CrsCode::new(25832).to_string(), "EPSG:25832");
        assert_eq!(CrsCode::WGS84.epsg(), 4326);
    }

    #[test]
    fn test_crs_code_from_str() {
        assert_eq!("EPSG:25832".parse::<CrsCode>().unwrap(), CrsCode::new(25832));
        assert_eq!(
            "urn:ogc:def:crs:EPSG::5972".parse::<CrsCode>().unwrap(),
            CrsCode::new(5972)
        );
        assert!("WGS84".parse::<CrsCode>().is_err());
    }

    #[test]
    fn test_to_geojson() {
        let mut properties = PropertyMap::new();
        properties.set("featureType", "Bygning");
        properties.set("id", "b1");

        let collection = FeatureCollection {
            features: vec![Feature {
                id: "b1".to_string(),
                properties,
                geometry: Geometry::Point(Point::new(10.4, 63.4)),
            }],
        };

        let fc = collection.to_geojson();
        assert_eq!(fc.features.len(), 1);
        let props = fc.features[0].properties.as_ref().unwrap();
        assert_eq!(props["featureType"], "Bygning");
        assert!(fc.features[0].geometry.is_some());
    }
}
