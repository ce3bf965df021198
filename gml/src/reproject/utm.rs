//! Projection UTM inverse (Universal Transverse Mercator)
//!
//! Série de Snyder, précision sub-métrique à l'intérieur d'une zone.

use super::ellipsoid::Ellipsoid;
use super::Geographic;

/// Facteur d'échelle au méridien central
const K0: f64 = 0.9996;
/// False easting
const FALSE_EASTING: f64 = 500000.0;
/// False northing de l'hémisphère sud
const FALSE_NORTHING_SOUTH: f64 = 10000000.0;

/// Zone UTM
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtmZone {
    pub zone: u32,
    pub south: bool,
    pub ellipsoid: Ellipsoid,
}

impl UtmZone {
    /// Longitude du méridien central, en radians
    fn central_meridian(&self) -> f64 {
        (f64::from(self.zone) * 6.0 - 183.0).to_radians()
    }

    /// Convertit des coordonnées UTM vers la géographie de l'ellipsoïde de la zone
    pub fn to_geographic(&self, x: f64, y: f64) -> Geographic {
        let a = self.ellipsoid.a;
        let e2 = self.ellipsoid.e2();
        let ep2 = self.ellipsoid.ep2();

        let x = x - FALSE_EASTING;
        let y = if self.south { y - FALSE_NORTHING_SOUTH } else { y };

        // Latitude de pied
        let m = y / K0;
        let mu = m / (a * (1.0 - e2 / 4.0 - 3.0 * e2.powi(2) / 64.0 - 5.0 * e2.powi(3) / 256.0));

        let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

        let sin_phi1 = phi1.sin();
        let cos_phi1 = phi1.cos();
        let tan_phi1 = phi1.tan();

        let n1 = a / (1.0 - e2 * sin_phi1.powi(2)).sqrt();
        let t1 = tan_phi1.powi(2);
        let c1 = ep2 * cos_phi1.powi(2);
        let r1 = a * (1.0 - e2) / (1.0 - e2 * sin_phi1.powi(2)).powf(1.5);
        let d = x / (n1 * K0);

        let lat = phi1
            - (n1 * tan_phi1 / r1)
                * (d.powi(2) / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1.powi(2) - 9.0 * ep2) * d.powi(4)
                        / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1.powi(2)
                        - 252.0 * ep2
                        - 3.0 * c1.powi(2))
                        * d.powi(6)
                        / 720.0);

        let lon = self.central_meridian()
            + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1.powi(2) + 8.0 * ep2 + 24.0 * t1.powi(2))
                    * d.powi(5)
                    / 120.0)
                / cos_phi1;

        Geographic::new(lon, lat)
    }
}
