//! Résolution du système de coordonnées source
//!
//! Le premier attribut `srsName` du document (ordre du document) est normalisé en code
//! EPSG. Une déclaration absente ou illisible retombe silencieusement sur le CRS par défaut :
//! on préfère produire une sortie plutôt que rejeter le document.

use once_cell::sync::Lazy;
use regex::Regex;
use roxmltree::Document;
use tracing::{debug, info, warn};

use crate::reproject::Projector;
use crate::types::CrsCode;
use crate::GmlError;

/// Nom local de l'attribut de déclaration
const DECLARATION_ATTRIBUTE: &str = "srsName";

/// Motifs d'extraction du code EPSG, par ordre de priorité
static EPSG_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        // EPSG:25832
        Regex::new(r"(?i)EPSG:(\d+)(?:[^\d.]|$)").expect("Invalid EPSG regex"),
        // urn:ogc:def:crs:EPSG::25832, .../EPSG/25832
        Regex::new(r"(?i)EPSG(?:::|/)(\d+)(?:[^\d.]|$)").expect("Invalid EPSG URN regex"),
        // .../def/crs/EPSG/0/25832, epsg.xml#25832
        Regex::new(r"(?:^|\D)(\d{4,6})$").expect("Invalid trailing code regex"),
    ]
});

/// CRS résolu et son projecteur vers WGS84
#[derive(Debug)]
pub struct ResolvedCrs {
    pub code: CrsCode,
    pub projector: Projector,
    /// Déclaration brute trouvée dans le document
    pub declaration: Option<String>,
}

/// Extrait le code EPSG d'une déclaration
///
/// Un code nul (ex: version `0` d'une URL OGC) n'est pas un match.
pub fn epsg_from_declaration(declaration: &str) -> Option<u32> {
    let declaration = declaration.trim();
    EPSG_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(declaration)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .filter(|&code| code != 0)
    })
}

/// Première déclaration de CRS du document, dans l'ordre du document
pub fn find_declaration(doc: &Document) -> Option<String> {
    doc.descendants()
        .filter(|n| n.is_element())
        .find_map(|n| {
            n.attributes()
                .find(|a| a.name() == DECLARATION_ATTRIBUTE)
                .map(|a| a.value().to_string())
        })
}

/// Résout le code CRS du document, sans jamais échouer
pub fn resolve_code(doc: &Document, default: CrsCode) -> (CrsCode, Option<String>) {
    let declaration = find_declaration(doc);

    let code = match declaration.as_deref() {
        Some(decl) => match epsg_from_declaration(decl) {
            Some(epsg) => CrsCode::new(epsg),
            None => {
                warn!(declaration = decl, default = %default, "Unrecognized CRS declaration, using default");
                default
            }
        },
        None => {
            debug!(default = %default, "No CRS declaration, using default");
            default
        }
    };

    (code, declaration)
}

/// Résout le CRS du document et instancie le projecteur vers WGS84
///
/// # Errors
///
/// `GmlError::UnsupportedCrs` si aucun projecteur ne gère le code résolu.
pub fn resolve(doc: &Document, default: CrsCode) -> Result<ResolvedCrs, GmlError> {
    let (code, declaration) = resolve_code(doc, default);
    let projector = Projector::new(code)?;
    info!(crs = %code, backend = projector.description(), "CRS resolved");

    Ok(ResolvedCrs {
        code,
        projector,
        declaration,
    })
}
