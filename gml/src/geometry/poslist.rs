//! Parsing des listes de positions GML (`posList`, `pos`, `coordinates`)

use crate::GmlError;

/// Contexte d'erreur : feature et élément en cours de lecture
#[derive(Debug, Clone, Copy)]
pub struct Location<'a> {
    pub feature_index: usize,
    pub element: &'a str,
}

/// Parse une liste de nombres séparés par des espaces
pub fn parse_numbers(text: &str, at: Location) -> Result<Vec<f64>, GmlError> {
    text.split_ascii_whitespace()
        .map(|token| parse_number(token, at))
        .collect()
}

/// Parse f64 avec fast-float ; `nan` et `inf` sont refusés
#[inline]
fn parse_number(token: &str, at: Location) -> Result<f64, GmlError> {
    fast_float::parse::<f64, _>(token)
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| GmlError::malformed_number(at.feature_index, at.element, token))
}

/// Dimension d'une liste plate : 3 si le nombre de valeurs est divisible par 3, sinon 2
#[inline]
pub fn dimension(count: usize) -> usize {
    if count % 3 == 0 {
        3
    } else {
        2
    }
}

/// Découpe une liste plate en paires (x, y), en ignorant z et un éventuel reste incomplet
pub fn pairs(numbers: &[f64]) -> impl Iterator<Item = (f64, f64)> + '_ {
    numbers
        .chunks_exact(dimension(numbers.len()))
        .map(|chunk| (chunk[0], chunk[1]))
}

/// Première paire (x, y) d'une position `pos`, axes supplémentaires ignorés
pub fn first_pair(text: &str, at: Location) -> Result<Option<(f64, f64)>, GmlError> {
    let mut tokens = text.split_ascii_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(x), Some(y)) => Ok(Some((parse_number(x, at)?, parse_number(y, at)?))),
        _ => Ok(None),
    }
}

/// Tuples d'un élément `coordinates` (GML 2) : `x,y[,z] x,y[,z] ...`
pub fn coordinate_tuples(text: &str, at: Location) -> Result<Vec<(f64, f64)>, GmlError> {
    let mut tuples = Vec::new();
    for tuple in text.split_ascii_whitespace() {
        let mut parts = tuple.split(',').filter(|p| !p.is_empty());
        if let (Some(x), Some(y)) = (parts.next(), parts.next()) {
            tuples.push((parse_number(x, at)?, parse_number(y, at)?));
        }
    }
    Ok(tuples)
}
