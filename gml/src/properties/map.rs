//! Map ordonnée d'attributs avec insertion conditionnelle

use std::collections::HashMap;

/// Map clé -> valeur (chaînes), ordonnée par insertion, clés uniques
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&i| self.entries[i].1.as_str())
    }

    /// Itère dans l'ordre d'insertion
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Écrit la valeur, en écrasant sur place une valeur existante
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 = value,
            None => self.push(key, value),
        }
    }

    /// Insère seulement si la clé est absente (premier écrivain gagnant)
    ///
    /// Retourne `true` si la valeur a été insérée.
    pub fn insert_if_absent(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.index.contains_key(&key) {
            return false;
        }
        self.push(key, value.into());
        true
    }

    /// Insère sans jamais écraser : en cas de collision, une clé suffixée
    /// (`key_2`, `key_3`, ...) est créée.
    ///
    /// Une valeur déjà présente sous `key` ou l'une de ses variantes suffixées
    /// n'est pas dupliquée. Retourne la clé utilisée, ou `None` si rien n'a été inséré.
    pub fn insert_unique(&mut self, key: &str, value: &str) -> Option<String> {
        match self.get(key) {
            None => {
                self.push(key.to_string(), value.to_string());
                return Some(key.to_string());
            }
            Some(existing) if existing == value => return None,
            Some(_) => {}
        }

        let mut n = 2;
        loop {
            let candidate = format!("{}_{}", key, n);
            match self.get(&candidate) {
                None => {
                    self.push(candidate.clone(), value.to_string());
                    return Some(candidate);
                }
                Some(existing) if existing == value => return None,
                Some(_) => n += 1,
            }
        }
    }

    /// Comme [`set`](Self::set), puis supprime les variantes suffixées `key_N`
    pub fn set_exclusive(&mut self, key: &str, value: impl Into<String>) {
        self.set(key, value);
        let before = self.entries.len();
        self.entries.retain(|(k, _)| !is_suffixed_variant(k, key));
        if self.entries.len() != before {
            self.reindex();
        }
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, (k, _)) in self.entries.iter().enumerate() {
            self.index.insert(k.clone(), i);
        }
    }

    fn push(&mut self, key: String, value: String) {
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
    }
}

/// `candidate` est de la forme `key_N` (N entier >= 2)
fn is_suffixed_variant(candidate: &str, key: &str) -> bool {
    candidate
        .strip_prefix(key)
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(|n| n.parse::<u32>().ok())
        .is_some_and(|n| n >= 2)
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.set(k, v);
        }
        map
    }
}
