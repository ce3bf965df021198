//! Rapport de conversion avec graceful degradation
//!
//! Un fichier en échec n'interrompt pas un lot : il est consigné et le statut
//! final reflète le mélange de succès et d'échecs.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

/// Statut global de la conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConversionStatus {
    /// Tous les fichiers convertis
    Success,
    /// Certains fichiers en échec
    PartialSuccess,
    /// Aucun fichier converti
    Failed,
}

/// Résultat d'un fichier converti
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Fichier GML source
    pub input: String,
    /// Fichier GeoJSON écrit (absent en mode inspect)
    pub output: Option<String>,
    /// Checksum blake3 du fichier source (hex)
    pub checksum: String,
    /// CRS source utilisé
    pub crs: String,
    /// `srsName` brut du document, absent si le CRS par défaut a servi
    pub crs_declaration: Option<String>,
    /// Features localisées
    pub found: usize,
    /// Features émises
    pub emitted: usize,
    /// Features sans géométrie exploitable
    pub skipped: usize,
}

impl FileReport {
    /// Résumé lisible d'un fichier
    pub fn summary(&self) -> String {
        let source = match &self.crs_declaration {
            Some(declaration) => format!("declared as {}", declaration),
            None => "default".to_string(),
        };
        format!(
            "{}: CRS {} ({}), {} found, {} emitted, {} skipped",
            self.input, self.crs, source, self.found, self.emitted, self.skipped
        )
    }
}

/// Échec d'un fichier
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub input: String,
    pub message: String,
}

/// Rapport complet d'un lot
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Durée de la conversion
    pub duration_secs: f64,
    /// Statut global
    pub status: ConversionStatus,

    /// Nombre de fichiers traités
    pub files_processed: usize,
    /// Nombre de fichiers en erreur
    pub files_failed: usize,
    pub features_found: usize,
    pub features_emitted: usize,
    pub features_skipped: usize,

    /// Détail par fichier, dans l'ordre des entrées
    pub files: Vec<FileReport>,
    /// Liste des échecs
    pub errors: Vec<FileFailure>,
}

impl Default for BatchReport {
    fn default() -> Self {
        Self {
            duration_secs: 0.0,
            status: ConversionStatus::Success,
            files_processed: 0,
            files_failed: 0,
            features_found: 0,
            features_emitted: 0,
            features_skipped: 0,
            files: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enregistre un fichier converti
    pub fn record_success(&mut self, file: FileReport) {
        self.files_processed += 1;
        self.features_found += file.found;
        self.features_emitted += file.emitted;
        self.features_skipped += file.skipped;
        self.files.push(file);
    }

    /// Enregistre un fichier en échec
    pub fn record_failure(&mut self, input: &str, message: &str) {
        self.files_processed += 1;
        self.files_failed += 1;
        self.errors.push(FileFailure {
            input: input.to_string(),
            message: message.to_string(),
        });
    }

    /// Définit la durée de la conversion
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Détermine le statut final
    pub fn finalize(&mut self) {
        let has_errors = !self.errors.is_empty();
        let has_success = !self.files.is_empty();

        self.status = match (has_errors, has_success) {
            (false, _) => ConversionStatus::Success,
            (true, true) => ConversionStatus::PartialSuccess,
            (true, false) => ConversionStatus::Failed,
        };
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("CONVERSION REPORT");
        println!("{}", "=".repeat(60));

        println!("\nStatus: {:?}", self.status);
        println!("Duration: {:.2}s", self.duration_secs);

        println!("\n--- SUMMARY ---");
        println!(
            "Files: {} processed, {} failed",
            self.files_processed, self.files_failed
        );
        println!(
            "Features: {} found, {} emitted, {} skipped",
            self.features_found, self.features_emitted, self.features_skipped
        );

        if !self.files.is_empty() {
            println!("\n--- BY FILE ---");
            for file in self.files.iter().take(20) {
                println!("  {}", file.summary());
            }
            if self.files.len() > 20 {
                println!("  ... and {} more", self.files.len() - 20);
            }
        }

        if !self.errors.is_empty() {
            println!("\n--- ERRORS ({}) ---", self.errors.len());
            for e in self.errors.iter().take(20) {
                println!("  [{}] {}", e.input, e.message);
            }
            if self.errors.len() > 20 {
                println!("  ... and {} more", self.errors.len() - 20);
            }
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        format!(
            "{} files: {} emitted, {} skipped, {} errors",
            self.files_processed,
            self.features_emitted,
            self.features_skipped,
            self.errors.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(input: &str, found: usize, skipped: usize) -> FileReport {
        FileReport {
            input: input.to_string(),
            output: Some(format!("{}.geojson", input)),
            checksum: "00".repeat(32),
            crs: "EPSG:25832".to_string(),
            crs_declaration: Some("urn:ogc:def:crs:EPSG::25832".to_string()),
            found,
            emitted: found - skipped,
            skipped,
        }
    }

    #[test]
    fn test_batch_report_default() {
        let report = BatchReport::default();
        assert_eq!(report.status, ConversionStatus::Success);
        assert_eq!(report.files_processed, 0);
        assert_eq!(report.features_emitted, 0);
    }

    #[test]
    fn test_record_success() {
        let mut report = BatchReport::new();
        report.record_success(file("ar5", 10, 2));
        report.record_success(file("veg", 5, 0));

        assert_eq!(report.files_processed, 2);
        assert_eq!(report.features_found, 15);
        assert_eq!(report.features_emitted, 13);
        assert_eq!(report.features_skipped, 2);
    }

    #[test]
    fn test_finalize_success() {
        let mut report = BatchReport::new();
        report.record_success(file("ar5", 1, 0));
        report.finalize();
        assert_eq!(report.status, ConversionStatus::Success);
    }

    #[test]
    fn test_finalize_partial_success() {
        let mut report = BatchReport::new();
        report.record_success(file("ar5", 1, 0));
        report.record_failure("broken.gml", "Unreadable input document");
        report.finalize();

        assert_eq!(report.status, ConversionStatus::PartialSuccess);
        assert_eq!(report.files_failed, 1);
    }

    #[test]
    fn test_finalize_failed() {
        let mut report = BatchReport::new();
        report.record_failure("broken.gml", "Unreadable input document");
        report.finalize();
        assert_eq!(report.status, ConversionStatus::Failed);
    }

    #[test]
    fn test_summary() {
        let mut report = BatchReport::new();
        report.record_success(file("ar5", 100, 4));

        let summary = report.summary();
        assert!(summary.contains("1 files"));
        assert!(summary.contains("96 emitted"));
        let line = file("ar5", 3, 1).summary();
        assert!(line.contains("EPSG:25832 (declared as urn:ogc:def:crs:EPSG::25832)"));

        let defaulted = FileReport {
            crs_declaration: None,
            ..file("veg", 1, 0)
        };
        assert!(defaulted.summary().contains("(default)"));
    }

    #[test]
    fn test_save_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        let mut report = BatchReport::new();
        report.record_success(file("ar5", 2, 1));
        report.finalize();
        report.save_to_file(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["status"], "Success");
        assert_eq!(value["files"][0]["skipped"], 1);
    }
}
