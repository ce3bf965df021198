//! Projection conique conforme de Lambert inverse (2 parallèles standards)
//!
//! - Lambert 93 (EPSG:2154)
//! - Coniques conformes 9 zones CC42..CC50 (EPSG:3942..3950)

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use super::ellipsoid::GRS80;
use super::Geographic;

/// Paramètres d'une conique conforme sécante sur GRS80
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertConic {
    /// Longitude origine
    lon0: f64,
    /// Latitude origine
    lat0: f64,
    /// Premier parallèle standard
    lat1: f64,
    /// Deuxième parallèle standard
    lat2: f64,
    x0: f64,
    y0: f64,
}

impl LambertConic {
    /// Lambert 93 (EPSG:2154)
    pub fn lambert93() -> Self {
        Self {
            lon0: 3.0_f64.to_radians(),
            lat0: 46.5_f64.to_radians(),
            lat1: 44.0_f64.to_radians(),
            lat2: 49.0_f64.to_radians(),
            x0: 700000.0,
            y0: 6600000.0,
        }
    }

    /// Conique conforme CC`zone` (42..=50), EPSG:39`zone`
    pub fn conic_zone(zone: u32) -> Self {
        let lat = f64::from(zone);
        Self {
            lon0: 3.0_f64.to_radians(),
            lat0: lat.to_radians(),
            lat1: (lat - 0.75).to_radians(),
            lat2: (lat + 0.75).to_radians(),
            x0: 1700000.0,
            y0: f64::from(zone - 41) * 1000000.0 + 200000.0,
        }
    }

    /// Convertit des coordonnées planes vers la géographie GRS80
    pub fn to_geographic(&self, x: f64, y: f64) -> Geographic {
        let e = GRS80.e();
        let e2 = GRS80.e2();
        let a = GRS80.a;

        let n1 = grande_normale(self.lat1, a, e2);
        let n2 = grande_normale(self.lat2, a, e2);

        let iso_lat1 = isometric_latitude(self.lat1, e);
        let iso_lat2 = isometric_latitude(self.lat2, e);
        let iso_lat0 = isometric_latitude(self.lat0, e);

        // Exposant de la projection
        let n = ((n1 * self.lat1.cos()).ln() - (n2 * self.lat2.cos()).ln()) / (iso_lat2 - iso_lat1);

        let c = (n1 * self.lat1.cos() / n) * (n * iso_lat1).exp();
        let r0 = c * (-n * iso_lat0).exp();

        let dx = x - self.x0;
        let dy = y - self.y0;

        let r = (dx.powi(2) + (r0 - dy).powi(2)).sqrt();
        let r = if n < 0.0 { -r } else { r };
        let gamma = (dx / (r0 - dy)).atan();

        let iso_lat = -(r / c).ln() / n;

        Geographic::new(self.lon0 + gamma / n, latitude_from_isometric(iso_lat, e))
    }
}

/// Latitude isométrique
fn isometric_latitude(lat: f64, e: f64) -> f64 {
    let sin_lat = lat.sin();
    let term = ((1.0 - e * sin_lat) / (1.0 + e * sin_lat)).powf(e / 2.0);
    ((FRAC_PI_4 + lat / 2.0).tan() * term).ln()
}

/// Latitude depuis la latitude isométrique (itératif)
fn latitude_from_isometric(iso_lat: f64, e: f64) -> f64 {
    let mut lat = 2.0 * iso_lat.exp().atan() - FRAC_PI_2;

    for _ in 0..10 {
        let sin_lat = lat.sin();
        let term = ((1.0 + e * sin_lat) / (1.0 - e * sin_lat)).powf(e / 2.0);
        let next = 2.0 * (iso_lat.exp() * term).atan() - FRAC_PI_2;
        if (next - lat).abs() < 1e-12 {
            return next;
        }
        lat = next;
    }
    lat
}

/// Grande normale
fn grande_normale(lat: f64, a: f64, e2: f64) -> f64 {
    a / (1.0 - e2 * lat.sin().powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lambert93_paris() {
        // Tour Eiffel: 2.2945°E, 48.8584°N
        let (lon, lat) = LambertConic::lambert93()
            .to_geographic(648237.0, 6862107.0)
            .to_degrees();
        assert!((lon - 2.2945).abs() < 0.01, "lon={}", lon);
        assert!((lat - 48.8584).abs() < 0.01, "lat={}", lat);
    }

    #[test]
    fn test_conic_zone_origin() {
        // L'origine de CC46 est (3°E, 46°N)
        let (lon, lat) = LambertConic::conic_zone(46)
            .to_geographic(1700000.0, 5200000.0)
            .to_degrees();
        assert!((lon - 3.0).abs() < 1e-9, "lon={}", lon);
        assert!((lat - 46.0).abs() < 1e-9, "lat={}", lat);
    }
}
