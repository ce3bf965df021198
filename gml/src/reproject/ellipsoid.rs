//! Définitions des ellipsoïdes

/// Ellipsoïde de référence, défini par son demi-grand axe et son aplatissement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Demi-grand axe (rayon équatorial) en mètres
    pub a: f64,
    /// Aplatissement
    pub f: f64,
}

impl Ellipsoid {
    /// Première excentricité au carré
    pub fn e2(&self) -> f64 {
        2.0 * self.f - self.f * self.f
    }

    /// Première excentricité
    pub fn e(&self) -> f64 {
        self.e2().sqrt()
    }

    /// Deuxième excentricité au carré
    pub fn ep2(&self) -> f64 {
        self.e2() / (1.0 - self.e2())
    }
}

/// WGS84 (EPSG:4326, UTM 326xx/327xx)
pub const WGS84: Ellipsoid = Ellipsoid {
    a: 6378137.0,
    f: 1.0 / 298.257223563,
};

/// GRS80 (ETRS89, RGF93) : quasi identique à WGS84, différence < 0.1mm
pub const GRS80: Ellipsoid = Ellipsoid {
    a: 6378137.0,
    f: 1.0 / 298.257222101,
};

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wgs84_eccentricity() {
        assert_relative_eq!(WGS84.e(), 0.0818191908426215, epsilon = 1e-15);
        assert_relative_eq!(GRS80.e(), 0.0818191910428158, epsilon = 1e-15);
    }
}
