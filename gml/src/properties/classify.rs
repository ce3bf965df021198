//! Règles de classification `typeLabel`
//!
//! Heuristique floue sur les noms de champs (données SOSI/FKB norvégiennes) :
//! les règles sont évaluées dans un ordre fixe et le premier candidat gagne.
//!
//! 1. Feuille dont le nom (minuscules) est dans [`TYPE_KEYS`]
//! 2. Attribut enregistré d'un élément dont le nom contient un de [`CLASSIFYING_PARTS`]
//!
//! (1 et 2 dans l'ordre du parcours du document), puis en dernier recours :
//!
//! 3. Première propriété dont la clé contient un de [`FALLBACK_PARTS`]

use super::PropertyMap;

/// Clé de la propriété dérivée
pub const TYPE_LABEL: &str = "typeLabel";

/// Clé du nom local de l'élément feature
pub const FEATURE_TYPE: &str = "featureType";

/// Noms de feuilles porteurs d'une classification
pub const TYPE_KEYS: &[&str] = &["objekttype", "type", "arealtype", "arealbrukstype", "kode"];

/// Attributs enregistrés comme propriétés `<élément>_<attribut>`
pub const RECORDED_ATTRIBUTES: &[&str] = &["codespace", "href", "type", "kode"];

/// Fragments de noms d'éléments dont les attributs classifient la feature
pub const CLASSIFYING_PARTS: &[&str] = &["type", "kode", "kategori", "areal", "formål", "idrett"];

/// Fragments de clés pour le repli final
pub const FALLBACK_PARTS: &[&str] = &["type", "kode", "kategori", "areal", "formål"];

/// Clés dérivées, jamais candidates au repli
const DERIVED_KEYS: &[&str] = &[FEATURE_TYPE, TYPE_LABEL, "id"];

/// Règle 1 : la feuille `key` est-elle une classification ?
pub fn is_type_key(key: &str) -> bool {
    let key = key.to_lowercase();
    TYPE_KEYS.contains(&key.as_str())
}

/// L'attribut `name` doit-il être enregistré ?
pub fn is_recorded_attribute(name: &str) -> bool {
    let name = name.to_lowercase();
    RECORDED_ATTRIBUTES.contains(&name.as_str())
}

/// Règle 2 : les attributs de cet élément classifient-ils la feature ?
pub fn is_classifying_element(name: &str) -> bool {
    contains_any(name, CLASSIFYING_PARTS)
}

/// Règle 3 : première valeur dont la clé ressemble à une classification
pub fn fallback_label(properties: &PropertyMap) -> Option<&str> {
    properties
        .iter()
        .filter(|(key, _)| !DERIVED_KEYS.contains(key))
        .find(|(key, _)| contains_any(key, FALLBACK_PARTS))
        .map(|(_, value)| value)
}

fn contains_any(name: &str, parts: &[&str]) -> bool {
    let name = name.to_lowercase();
    parts.iter().any(|part| name.contains(part))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_keys_case_insensitive() {
        assert!(is_type_key("arealtype"));
        assert!(is_type_key("objektType"));
        assert!(is_type_key("KODE"));
        assert!(!is_type_key("navn"));
        assert!(!is_type_key("vegkategori"));
    }

    #[test]
    fn test_recorded_attributes() {
        assert!(is_recorded_attribute("codeSpace"));
        assert!(is_recorded_attribute("href"));
        assert!(!is_recorded_attribute("id"));
    }

    #[test]
    fn test_classifying_element() {
        assert!(is_classifying_element("Kode"));
        assert!(is_classifying_element("Arealformål"));
        assert!(is_classifying_element("AREALFORMÅL"));
        assert!(is_classifying_element("idrettsanlegg"));
        assert!(!is_classifying_element("navn"));
    }

    #[test]
    fn test_fallback_skips_derived_keys() {
        let properties: PropertyMap = [
            ("featureType", "Veglenke"),
            ("navn", "E6"),
            ("vegkategori", "E"),
            ("medium", "T"),
        ]
        .into_iter()
        .collect();
        assert_eq!(fallback_label(&properties), Some("E"));

        let properties: PropertyMap = [("featureType", "Veglenke")].into_iter().collect();
        assert_eq!(fallback_label(&properties), None);
    }
}
