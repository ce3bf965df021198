//! Localisation des features dans le document

use roxmltree::Node;

use crate::navigator::{first_element_child, LocalNameIndex};

/// Conventions d'emballage, par ordre de priorité
const WRAPPERS: &[&str] = &["featureMember", "member"];

/// Wrapper GML 3.1 contenant plusieurs features à la suite
const MULTI_WRAPPER: &str = "featureMembers";

/// Énumère les éléments feature du document, dans l'ordre des wrappers
///
/// Cherche les wrappers `featureMember`, puis à défaut `member`, puis `featureMembers`.
/// La feature d'un wrapper est son premier enfant élément ; un wrapper vide est ignoré.
pub fn locate_features<'a, 'input>(
    index: &LocalNameIndex<'a, 'input>,
    root: Node<'a, 'input>,
) -> Vec<Node<'a, 'input>> {
    for &wrapper in WRAPPERS {
        let wrappers = index.descendants(root, &[wrapper]);
        if !wrappers.is_empty() {
            return wrappers.into_iter().filter_map(first_element_child).collect();
        }
    }

    index
        .descendants(root, &[MULTI_WRAPPER])
        .into_iter()
        .flat_map(|wrapper| wrapper.children().filter(|c| c.is_element()))
        .collect()
}
