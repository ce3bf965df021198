//! Export GeoJSON : fichier unique ou dossier en parallèle

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{info, warn};

use gml::ConvertOptions;

use crate::report::{BatchReport, FileReport};

/// Options d'export
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    pub convert: ConvertOptions,
    /// Indenter le GeoJSON produit
    pub pretty: bool,
}

/// Convertit un fichier GML et écrit le GeoJSON dans `output`
pub fn convert_file(input: &Path, output: &Path, options: &ExportOptions) -> Result<FileReport> {
    let data = std::fs::read(input).with_context(|| format!("Cannot read {}", input.display()))?;
    let conversion = gml::convert_bytes(&data, &options.convert)
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(output)
        .with_context(|| format!("Failed to create file: {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    gml::write_geojson(&conversion.collection, &mut writer, options.pretty)?;
    writer.flush()?;

    info!(
        input = %input.display(),
        output = %output.display(),
        emitted = conversion.emitted(),
        "GeoJSON written"
    );

    Ok(FileReport {
        input: input.display().to_string(),
        output: Some(output.display().to_string()),
        checksum: checksum(&data),
        crs: conversion.crs.to_string(),
        crs_declaration: conversion.crs_declaration.clone(),
        found: conversion.found,
        emitted: conversion.emitted(),
        skipped: conversion.skipped,
    })
}

/// Convertit un fichier sans rien écrire
pub fn inspect_file(input: &Path, options: &ConvertOptions) -> Result<FileReport> {
    let data = std::fs::read(input).with_context(|| format!("Cannot read {}", input.display()))?;
    let conversion = gml::convert_bytes(&data, options)
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    Ok(FileReport {
        input: input.display().to_string(),
        output: None,
        checksum: checksum(&data),
        crs: conversion.crs.to_string(),
        crs_declaration: conversion.crs_declaration.clone(),
        found: conversion.found,
        emitted: conversion.emitted(),
        skipped: conversion.skipped,
    })
}

/// Convertit en parallèle tous les fichiers d'un dossier correspondant à `pattern`
///
/// Un fichier en échec est consigné dans le rapport sans interrompre le lot.
pub fn convert_directory(
    input: &Path,
    output: &Path,
    pattern: &str,
    options: &ExportOptions,
) -> Result<BatchReport> {
    let start = Instant::now();
    let inputs = collect_inputs(input, pattern)?;

    if inputs.is_empty() {
        anyhow::bail!("No files matching '{}' found in {}", pattern, input.display());
    }

    info!("Found {} files to convert", inputs.len());
    std::fs::create_dir_all(output)?;

    let results: Vec<(PathBuf, Result<FileReport>)> = inputs
        .into_par_iter()
        .map(|path| {
            let target = output_path(&path, output);
            let result = convert_file(&path, &target, options);
            (path, result)
        })
        .collect();

    let mut report = BatchReport::new();
    for (path, result) in results {
        match result {
            Ok(file) => report.record_success(file),
            Err(e) => {
                warn!("Failed to convert {}: {:#}", path.display(), e);
                report.record_failure(&path.display().to_string(), &format!("{:#}", e));
            }
        }
    }

    report.set_duration(start.elapsed());
    report.finalize();
    Ok(report)
}

/// Fichiers d'un dossier (récursivement) correspondant au motif glob, triés
pub fn collect_inputs(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if dir.is_file() {
        return Ok(vec![dir.to_path_buf()]);
    }

    let escaped = glob::Pattern::escape(&dir.display().to_string());
    let full_pattern = format!("{}/**/{}", escaped, pattern);
    let mut inputs: Vec<PathBuf> = glob::glob(&full_pattern)
        .with_context(|| format!("Invalid file pattern: {}", pattern))?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();

    inputs.sort();
    Ok(inputs)
}

/// `<dossier de sortie>/<nom du fichier sans extension>.geojson`
pub fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    output_dir.join(format!("{}.geojson", stem))
}

/// Checksum blake3 d'un contenu, en hexadécimal
pub fn checksum(data: &[u8]) -> String {
    hex::encode(blake3::hash(data).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("/data/Basisdata_5001_AR5.gml"), Path::new("/out")),
            PathBuf::from("/out/Basisdata_5001_AR5.geojson")
        );
    }

    #[test]
    fn test_checksum() {
        let digest = checksum(b"<c/>");
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, blake3::hash(b"<c/>").to_hex().as_str());
        assert_ne!(digest, checksum(b"<c />"));
    }

    #[test]
    fn test_collect_inputs_pattern() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("b.gml"), "<c/>").unwrap();
        std::fs::write(dir.path().join("sub/a.gml"), "<c/>").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        let inputs = collect_inputs(dir.path(), "*.gml").unwrap();
        assert_eq!(inputs.len(), 2);
        assert!(inputs.iter().all(|p| p.extension().unwrap() == "gml"));

        let single = dir.path().join("b.gml");
        assert_eq!(collect_inputs(&single, "*.xml").unwrap(), vec![single]);
    }
}
