//! Extraction des attributs d'une feature
//!
//! Parcourt le sous-arbre de la feature dans l'ordre du document, sous-arbre
//! géométrique exclu, et construit une map plate de chaînes :
//!
//! - `featureType` : nom local de l'élément feature, posé en premier
//! - feuilles : `nom local = texte`, collisions suffixées (`navn_2`, ...)
//! - attributs enregistrés : `<élément>_<attribut> = valeur`, premier écrivain gagnant
//! - `name` / `description` si absents
//! - `typeLabel` : voir [`classify`]

pub mod classify;
mod map;

pub use map::PropertyMap;

use roxmltree::Node;

use crate::navigator::{contains, leaf_text};
use classify::{FEATURE_TYPE, TYPE_LABEL};

/// Éléments descriptifs repris tels quels s'ils sont absents
const DESCRIPTIVE: &[&str] = &["name", "description"];

/// Construit les attributs d'une feature
///
/// `geometry` est l'élément porteur de la géométrie ; lui et son sous-arbre sont ignorés.
pub fn extract_properties(feature: Node, geometry: Option<Node>) -> PropertyMap {
    let mut properties = PropertyMap::new();
    properties.set(FEATURE_TYPE, feature.tag_name().name());

    let elements: Vec<Node> = feature
        .descendants()
        .filter(|n| n.is_element())
        .filter(|n| geometry.map_or(true, |g| !contains(g, *n)))
        .collect();

    for &element in &elements {
        let name = element.tag_name().name();

        if element != feature {
            if let Some(text) = leaf_text(element) {
                properties.insert_unique(name, text);
                if classify::is_type_key(name) {
                    properties.insert_if_absent(TYPE_LABEL, text);
                }
            }
        }

        for attribute in element.attributes() {
            if !classify::is_recorded_attribute(attribute.name()) {
                continue;
            }
            let value = attribute.value();
            properties.insert_if_absent(format!("{}_{}", name, attribute.name()), value);
            if classify::is_classifying_element(name) {
                properties.insert_if_absent(TYPE_LABEL, value);
            }
        }
    }

    for &key in DESCRIPTIVE {
        if properties.contains_key(key) {
            continue;
        }
        let text = elements
            .iter()
            .filter(|n| n.tag_name().name() == key)
            .find_map(|n| n.text().map(str::trim).filter(|t| !t.is_empty()));
        if let Some(text) = text {
            properties.set(key, text);
        }
    }

    if !properties.contains_key(TYPE_LABEL) {
        if let Some(label) = classify::fallback_label(&properties).map(str::to_string) {
            properties.set(TYPE_LABEL, label);
        }
    }

    properties
}
