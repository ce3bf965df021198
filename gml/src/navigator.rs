//! Navigation dans le document par nom local, sans tenir compte des namespaces
//!
//! Les producteurs mélangent GML 3.1 / 3.2 et des préfixes arbitraires : toutes les
//! recherches portent uniquement sur le nom local des éléments.
//!
//! L'index est construit une seule fois par document. Les nœuds roxmltree sont
//! numérotés dans l'ordre du document (préfixe), les descendants d'un élément forment
//! donc un intervalle d'identifiants contigu qu'on retrouve par recherche dichotomique.

use std::collections::HashMap;

use roxmltree::{Document, Node};

/// Index nom local -> éléments, dans l'ordre du document
pub struct LocalNameIndex<'a, 'input> {
    by_name: HashMap<String, Vec<Node<'a, 'input>>>,
}

impl<'a, 'input> LocalNameIndex<'a, 'input> {
    /// Construit l'index en un seul parcours du document
    pub fn build(doc: &'a Document<'input>) -> Self {
        let mut by_name: HashMap<String, Vec<Node<'a, 'input>>> = HashMap::new();

        for node in doc.descendants().filter(|n| n.is_element()) {
            let name = node.tag_name().name();
            match by_name.get_mut(name) {
                Some(nodes) => nodes.push(node),
                None => {
                    by_name.insert(name.to_string(), vec![node]);
                }
            }
        }

        Self { by_name }
    }

    /// Tous les éléments du document portant ce nom local
    pub fn all(&self, name: &str) -> &[Node<'a, 'input>] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Premier descendant (strict) de `node` dont le nom local est dans `names`
    pub fn first_descendant(
        &self,
        node: Node<'a, 'input>,
        names: &[&str],
    ) -> Option<Node<'a, 'input>> {
        names
            .iter()
            .filter_map(|name| self.within(node, name).first().copied())
            .min_by_key(|n| n.id().get())
    }

    /// Tous les descendants (stricts) de `node` dont le nom local est dans `names`,
    /// dans l'ordre du document
    pub fn descendants(&self, node: Node<'a, 'input>, names: &[&str]) -> Vec<Node<'a, 'input>> {
        let mut found: Vec<Node<'a, 'input>> = names
            .iter()
            .flat_map(|name| self.within(node, name).iter().copied())
            .collect();
        if names.len() > 1 {
            found.sort_by_key(|n| n.id().get());
            found.dedup_by_key(|n| n.id().get());
        }
        found
    }

    /// Sous-tranche des éléments `name` situés strictement sous `node`
    fn within(&self, node: Node<'a, 'input>, name: &str) -> &[Node<'a, 'input>] {
        let nodes = self.all(name);
        let start = nodes.partition_point(|n| n.id().get() <= node.id().get());
        let end = match subtree_end(node) {
            Some(end) => nodes.partition_point(|n| n.id().get() < end),
            None => nodes.len(),
        };
        &nodes[start..end.max(start)]
    }
}

/// Rang du premier nœud qui suit le sous-arbre de `node`, s'il existe
fn subtree_end(node: Node) -> Option<u32> {
    node.ancestors()
        .find_map(|a| a.next_sibling())
        .map(|n| n.id().get())
}

/// Vrai si `node` est `root` ou l'un de ses descendants
pub fn contains(root: Node, node: Node) -> bool {
    if node.id().get() < root.id().get() {
        return false;
    }
    match subtree_end(root) {
        Some(end) => node.id().get() < end,
        None => true,
    }
}

/// Premier enfant de type élément (texte et commentaires ignorés)
pub fn first_element_child<'a, 'input>(node: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    node.children().find(|c| c.is_element())
}

/// Texte d'un élément feuille, nettoyé ; `None` si vide ou si l'élément a des enfants éléments
pub fn leaf_text<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    if node.children().any(|c| c.is_element()) {
        return None;
    }
    node.text().map(str::trim).filter(|t| !t.is_empty())
}
