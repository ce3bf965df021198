//! # gml2geojson
//!
//! Conversion de fichiers GML (FKB, N50, WFS) en GeoJSON WGS84.
//!
//! ## Features
//!
//! - Fichier unique ou dossier complet (conversion parallèle avec rayon)
//! - Configuration JSON, surcharge par variable d'environnement
//! - Rapport de lot avec checksums blake3
//!
//! ## Usage CLI
//!
//! ```bash
//! # Un fichier
//! gml2geojson convert --input Basisdata_5001_AR5.gml --output ar5.geojson
//!
//! # Un dossier, CRS par défaut explicite
//! gml2geojson convert --input ./fkb/ --output ./geojson/ --default-crs EPSG:25832 --report report.json
//!
//! # Résumé sans écriture
//! gml2geojson inspect --input Basisdata_5001_AR5.gml
//! ```

pub mod config;
pub mod export;
pub mod report;

pub use config::Config;
pub use export::ExportOptions;
pub use report::{BatchReport, ConversionStatus, FileReport};
