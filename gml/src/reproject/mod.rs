//! Projection numérique vers WGS84 (EPSG:4326), longitude en premier
//!
//! Reprojection légère en Rust pur pour les systèmes courants :
//! - Géographiques : WGS84 (EPSG:4326), ETRS89 (EPSG:4258) - identité
//! - ETRS89 / UTM 28N..38N (EPSG:25828..25838)
//! - ETRS89 / UTM 32N..36N + NN2000 (EPSG:5972..5976), altitude ignorée
//! - WGS84 / UTM (EPSG:32601..32660, 32701..32760)
//! - Lambert 93 (EPSG:2154) et coniques CC42..CC50 (EPSG:3942..3950)
//! - Web Mercator (EPSG:3857, 900913)
//!
//! Les autres codes passent par PROJ (feature `proj`, activé par défaut).

mod ellipsoid;
mod lambert;
mod mercator;
mod utm;

use geo::Coord;

use crate::types::CrsCode;
use crate::GmlError;

pub use ellipsoid::{Ellipsoid, GRS80, WGS84};
pub use lambert::LambertConic;
pub use utm::UtmZone;

/// Point en coordonnées géographiques (radians)
#[derive(Debug, Clone, Copy)]
pub struct Geographic {
    /// Longitude en radians
    pub lon: f64,
    /// Latitude en radians
    pub lat: f64,
}

impl Geographic {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Convertit en degrés (lon, lat)
    pub fn to_degrees(self) -> (f64, f64) {
        (self.lon.to_degrees(), self.lat.to_degrees())
    }
}

/// Projection inverse supportée en Rust pur
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Inverse {
    Utm(UtmZone),
    Lambert(LambertConic),
    WebMercator,
}

impl Inverse {
    /// Projection inverse associée à un code EPSG, si supportée
    pub fn for_epsg(epsg: u32) -> Option<Self> {
        let utm = |zone, south, ellipsoid| {
            Some(Self::Utm(UtmZone {
                zone,
                south,
                ellipsoid,
            }))
        };

        match epsg {
            25828..=25838 => utm(epsg - 25800, false, GRS80),
            5972..=5976 => utm(epsg - 5940, false, GRS80),
            32601..=32660 => utm(epsg - 32600, false, WGS84),
            32701..=32760 => utm(epsg - 32700, true, WGS84),
            2154 => Some(Self::Lambert(LambertConic::lambert93())),
            3942..=3950 => Some(Self::Lambert(LambertConic::conic_zone(epsg - 3900))),
            3857 | 900913 => Some(Self::WebMercator),
            _ => None,
        }
    }

    fn to_geographic(&self, x: f64, y: f64) -> Geographic {
        match self {
            Self::Utm(zone) => zone.to_geographic(x, y),
            Self::Lambert(conic) => conic.to_geographic(x, y),
            Self::WebMercator => mercator::web_mercator_to_geographic(x, y),
        }
    }
}

/// Codes géographiques traités comme WGS84 sans transformation
const GEOGRAPHIC: &[u32] = &[4326, 4258];

/// Projecteur d'un CRS source vers WGS84 (lon, lat en degrés)
pub enum Projector {
    /// Pas de reprojection (source géographique)
    Identity,
    /// Reprojection légère (pure Rust)
    Lite(Inverse),
    /// Reprojection via PROJ
    #[cfg(feature = "proj")]
    Proj { code: u32, proj: proj::Proj },
}

impl Projector {
    /// Crée un projecteur depuis `source` vers EPSG:4326
    pub fn new(source: CrsCode) -> Result<Self, GmlError> {
        let epsg = source.epsg();

        if GEOGRAPHIC.contains(&epsg) {
            return Ok(Self::Identity);
        }

        if let Some(inverse) = Inverse::for_epsg(epsg) {
            return Ok(Self::Lite(inverse));
        }

        #[cfg(feature = "proj")]
        {
            let proj = proj::Proj::new_known_crs(&source.to_string(), "EPSG:4326", None)
                .map_err(|_| GmlError::UnsupportedCrs { code: epsg })?;
            return Ok(Self::Proj { code: epsg, proj });
        }

        #[cfg(not(feature = "proj"))]
        Err(GmlError::UnsupportedCrs { code: epsg })
    }

    /// Projette (x, y) vers (longitude, latitude) en degrés
    pub fn project(&self, x: f64, y: f64) -> Result<Coord, GmlError> {
        match self {
            Self::Identity => Ok(Coord { x, y }),
            Self::Lite(inverse) => {
                let (lon, lat) = inverse.to_geographic(x, y).to_degrees();
                Ok(Coord { x: lon, y: lat })
            }
            #[cfg(feature = "proj")]
            Self::Proj { code, proj } => {
                let (lon, lat) = proj.convert((x, y)).map_err(|e| GmlError::Projection {
                    code: *code,
                    reason: e.to_string(),
                })?;
                Ok(Coord { x: lon, y: lat })
            }
        }
    }

    /// Description du backend utilisé
    pub fn description(&self) -> &'static str {
        match self {
            Self::Identity => "identity (no reprojection)",
            Self::Lite(_) => "reproject lite (pure Rust)",
            #[cfg(feature = "proj")]
            Self::Proj { .. } => "proj (PROJ library)",
        }
    }
}

impl std::fmt::Debug for Projector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identity => f.write_str("Identity"),
            Self::Lite(inverse) => f.debug_tuple("Lite").field(inverse).finish(),
            #[cfg(feature = "proj")]
            Self::Proj { code, .. } => f.debug_struct("Proj").field("code", code).finish(),
        }
    }
}
