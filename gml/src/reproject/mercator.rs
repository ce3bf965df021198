//! Web Mercator inverse (EPSG:3857, Pseudo-Mercator)

use std::f64::consts::FRAC_PI_2;

use super::ellipsoid::WGS84;
use super::Geographic;

/// Convertit Web Mercator vers coordonnées géographiques (modèle sphérique, rayon équatorial)
pub fn web_mercator_to_geographic(x: f64, y: f64) -> Geographic {
    let r = WGS84.a;
    Geographic::new(x / r, 2.0 * (y / r).exp().atan() - FRAC_PI_2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trondheim() {
        // 10.395°E, 63.430°N
        let (lon, lat) = web_mercator_to_geographic(1157166.0, 9206473.0).to_degrees();
        assert!((lon - 10.395).abs() < 0.001, "lon={}", lon);
        assert!((lat - 63.430).abs() < 0.001, "lat={}", lat);
    }

    #[test]
    fn test_origin() {
        let (lon, lat) = web_mercator_to_geographic(0.0, 0.0).to_degrees();
        assert_eq!(lon, 0.0);
        assert!(lat.abs() < 1e-12);
    }
}
