//! Extraction des géométries d'une feature
//!
//! Dispatch par nom local : la première règle dont l'élément apparaît sous la feature
//! gagne, sans repli sur les règles suivantes. Toutes les coordonnées passent par le
//! projecteur et sortent en (lon, lat).

pub mod poslist;

use geo::{Coord, Geometry, LineString, MultiLineString, MultiPolygon, Point, Polygon};
use roxmltree::Node;

use crate::navigator::LocalNameIndex;
use crate::reproject::Projector;
use crate::GmlError;

use poslist::Location;

/// Type de géométrie reconnu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    MultiSurface,
    MultiCurve,
    Point,
    LineString,
    Polygon,
    Surface,
}

/// Règles de dispatch, dans l'ordre de priorité
const DISPATCH: &[(GeometryKind, &[&str])] = &[
    (GeometryKind::MultiSurface, &["MultiSurface"]),
    (GeometryKind::MultiCurve, &["MultiCurve"]),
    (GeometryKind::Point, &["Point"]),
    (GeometryKind::LineString, &["LineString", "Curve"]),
    (GeometryKind::Polygon, &["Polygon"]),
    (GeometryKind::Surface, &["Surface"]),
];

/// Élément géométrique trouvé sous une feature
#[derive(Debug)]
pub struct Extracted<'a, 'input> {
    pub kind: GeometryKind,
    /// Élément porteur de la géométrie ; son sous-arbre est exclu des attributs
    pub element: Node<'a, 'input>,
    /// `None` si l'élément est présent mais inexploitable
    pub geometry: Option<Geometry>,
}

/// Extracteur de géométries pour une feature
pub struct GeometryExtractor<'i, 'a, 'input> {
    index: &'i LocalNameIndex<'a, 'input>,
    projector: &'i Projector,
    feature_index: usize,
}

impl<'i, 'a, 'input> GeometryExtractor<'i, 'a, 'input> {
    pub fn new(
        index: &'i LocalNameIndex<'a, 'input>,
        projector: &'i Projector,
        feature_index: usize,
    ) -> Self {
        Self {
            index,
            projector,
            feature_index,
        }
    }

    /// Extrait la géométrie d'une feature
    ///
    /// Retourne `None` si aucun élément géométrique n'est présent sous la feature.
    ///
    /// # Errors
    ///
    /// `GmlError::MalformedNumber` si une liste de positions contient un nombre invalide.
    pub fn extract(
        &self,
        feature: Node<'a, 'input>,
    ) -> Result<Option<Extracted<'a, 'input>>, GmlError> {
        for &(kind, names) in DISPATCH {
            if let Some(element) = self.index.first_descendant(feature, names) {
                let geometry = self.extract_kind(kind, element)?;
                return Ok(Some(Extracted {
                    kind,
                    element,
                    geometry,
                }));
            }
        }
        Ok(None)
    }

    fn extract_kind(
        &self,
        kind: GeometryKind,
        element: Node<'a, 'input>,
    ) -> Result<Option<Geometry>, GmlError> {
        Ok(match kind {
            GeometryKind::MultiSurface => self.multi_surface(element)?.map(Geometry::MultiPolygon),
            GeometryKind::MultiCurve => self.multi_curve(element)?.map(Geometry::MultiLineString),
            GeometryKind::Point => self.point(element)?.map(Geometry::Point),
            GeometryKind::LineString => self.line_string(element)?.map(Geometry::LineString),
            GeometryKind::Polygon => self.polygon(element)?.map(Geometry::Polygon),
            GeometryKind::Surface => self.surface(element)?.map(Geometry::Polygon),
        })
    }

    /// MultiSurface : un polygone par `Surface` membre (à défaut, par `Polygon` membre)
    fn multi_surface(&self, element: Node<'a, 'input>) -> Result<Option<MultiPolygon>, GmlError> {
        let mut polygons = Vec::new();

        let surfaces = self.index.descendants(element, &["Surface"]);
        if surfaces.is_empty() {
            for polygon in self.index.descendants(element, &["Polygon"]) {
                polygons.extend(self.polygon(polygon)?);
            }
        } else {
            for surface in surfaces {
                polygons.extend(self.surface(surface)?);
            }
        }

        Ok((!polygons.is_empty()).then(|| MultiPolygon::new(polygons)))
    }

    /// MultiCurve : une ligne par `Curve` ou `LineString` membre
    fn multi_curve(
        &self,
        element: Node<'a, 'input>,
    ) -> Result<Option<MultiLineString>, GmlError> {
        let mut lines = Vec::new();
        for member in self.index.descendants(element, &["Curve", "LineString"]) {
            lines.extend(self.line_string(member)?);
        }
        Ok((!lines.is_empty()).then(|| MultiLineString::new(lines)))
    }

    /// Point : `pos`, ou à défaut la première paire d'un `coordinates`
    fn point(&self, element: Node<'a, 'input>) -> Result<Option<Point>, GmlError> {
        if let Some(pos) = self.index.first_descendant(element, &["pos"]) {
            let pair = poslist::first_pair(pos.text().unwrap_or_default(), self.at(pos))?;
            return pair.map(|xy| self.project(xy).map(Point)).transpose();
        }

        if let Some(coordinates) = self.index.first_descendant(element, &["coordinates"]) {
            let tuples = poslist::coordinate_tuples(
                coordinates.text().unwrap_or_default(),
                self.at(coordinates),
            )?;
            return tuples
                .first()
                .map(|&xy| self.project(xy).map(Point))
                .transpose();
        }

        Ok(None)
    }

    /// LineString / Curve : au moins 2 positions
    fn line_string(&self, element: Node<'a, 'input>) -> Result<Option<LineString>, GmlError> {
        let coords = self.positions(element)?;
        if coords.len() < 2 {
            return Ok(None);
        }
        Ok(Some(LineString::new(coords)))
    }

    /// Polygon : `exterior` obligatoire, `interior` optionnels
    ///
    /// Un anneau intérieur sans `posList` exploitable est ignoré seul.
    fn polygon(&self, element: Node<'a, 'input>) -> Result<Option<Polygon>, GmlError> {
        let Some(exterior) = self.index.first_descendant(element, &["exterior"]) else {
            return Ok(None);
        };
        let Some(shell) = self.ring(exterior)? else {
            return Ok(None);
        };

        let mut holes = Vec::new();
        for interior in self.index.descendants(element, &["interior"]) {
            holes.extend(self.ring(interior)?);
        }

        Ok(Some(Polygon::new(shell, holes)))
    }

    /// Surface : polygone à un seul anneau, pris dans le premier `posList` du sous-arbre
    ///
    /// Les trous et les patchs suivants ne sont pas représentés.
    fn surface(&self, element: Node<'a, 'input>) -> Result<Option<Polygon>, GmlError> {
        Ok(self.ring(element)?.map(|shell| Polygon::new(shell, Vec::new())))
    }

    /// Anneau fermé depuis le premier `posList` sous `container`
    fn ring(&self, container: Node<'a, 'input>) -> Result<Option<LineString>, GmlError> {
        let Some(pos_list) = self.index.first_descendant(container, &["posList"]) else {
            return Ok(None);
        };

        let coords = self.pos_list(pos_list)?;
        if coords.is_empty() {
            return Ok(None);
        }
        Ok(Some(LineString::new(close_ring(coords))))
    }

    /// Positions d'une ligne : `posList`, sinon `pos` répétés, sinon `coordinates`
    fn positions(&self, element: Node<'a, 'input>) -> Result<Vec<Coord>, GmlError> {
        if let Some(pos_list) = self.index.first_descendant(element, &["posList"]) {
            return self.pos_list(pos_list);
        }

        let pos = self.index.descendants(element, &["pos"]);
        if !pos.is_empty() {
            let mut coords = Vec::with_capacity(pos.len());
            for p in pos {
                if let Some(xy) = poslist::first_pair(p.text().unwrap_or_default(), self.at(p))? {
                    coords.push(self.project(xy)?);
                }
            }
            return Ok(coords);
        }

        if let Some(coordinates) = self.index.first_descendant(element, &["coordinates"]) {
            return poslist::coordinate_tuples(
                coordinates.text().unwrap_or_default(),
                self.at(coordinates),
            )?
            .into_iter()
            .map(|xy| self.project(xy))
            .collect();
        }

        Ok(Vec::new())
    }

    /// Coordonnées projetées d'un `posList` (dimension 2 ou 3)
    fn pos_list(&self, node: Node<'a, 'input>) -> Result<Vec<Coord>, GmlError> {
        let numbers = poslist::parse_numbers(node.text().unwrap_or_default(), self.at(node))?;
        poslist::pairs(&numbers).map(|xy| self.project(xy)).collect()
    }

    #[inline]
    fn project(&self, (x, y): (f64, f64)) -> Result<Coord, GmlError> {
        self.projector.project(x, y)
    }

    fn at(&self, node: Node<'a, 'input>) -> Location<'input> {
        Location {
            feature_index: self.feature_index,
            element: node.tag_name().name(),
        }
    }
}

/// Ferme un anneau (ajoute la première coordonnée si la dernière diffère)
pub fn close_ring(mut coords: Vec<Coord>) -> Vec<Coord> {
    if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
        if first != last {
            coords.push(first);
        }
    }
    coords
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CrsCode;
    use roxmltree::Document;

    fn extract(xml: &str) -> Result<Option<(GeometryKind, Option<Geometry>)>, GmlError> {
        let doc = Document::parse(xml).unwrap();
        let index = LocalNameIndex::build(&doc);
        let projector = Projector::new(CrsCode::WGS84).unwrap();
        let extractor = GeometryExtractor::new(&index, &projector, 0);
        Ok(extractor
            .extract(doc.root_element())?
            .map(|e| (e.kind, e.geometry)))
    }

    fn geometry(xml: &str) -> Option<Geometry> {
        extract(xml).unwrap().and_then(|(_, g)| g)
    }

    #[test]
    fn test_point_pos() {
        let g = geometry("<f><Point><pos>10.0 20.0</pos></Point></f>");
        assert_eq!(g, Some(Geometry::Point(Point::new(10.0, 20.0))));
    }

    #[test]
    fn test_point_legacy_coordinates() {
        let g = geometry("<f><Point><coordinates>10.5,20.5 30,40</coordinates></Point></f>");
        assert_eq!(g, Some(Geometry::Point(Point::new(10.5, 20.5))));
    }

    #[test]
    fn test_linestring_3d_pos_list() {
        let g = geometry("<f><LineString><posList>10 20 0 11 21 0</posList></LineString></f>");
        let Some(Geometry::LineString(ls)) = g else {
            panic!("Expected LineString, got {:?}", g);
        };
        assert_eq!(ls.0, vec![Coord { x: 10.0, y: 20.0 }, Coord { x: 11.0, y: 21.0 }]);
    }

    #[test]
    fn test_curve_repeated_pos() {
        let xml = "<f><Curve><segments><LineStringSegment>\
                   <pos>1 2</pos><pos>3 4 9</pos><pos>5 6</pos>\
                   </LineStringSegment></segments></Curve></f>";
        let Some(Geometry::LineString(ls)) = geometry(xml) else {
            panic!("Expected LineString");
        };
        assert_eq!(ls.0.len(), 3);
        assert_eq!(ls.0[1], Coord { x: 3.0, y: 4.0 });
    }

    #[test]
    fn test_linestring_single_position_is_absent() {
        let result = extract("<f><LineString><posList>1 2</posList></LineString></f>").unwrap();
        assert!(matches!(result, Some((GeometryKind::LineString, None))));
    }

    #[test]
    fn test_polygon_closes_rings_and_keeps_holes() {
        let xml = "<f><Polygon>\
            <exterior><LinearRing><posList>0 0 10 0 10 10 0 10</posList></LinearRing></exterior>\
            <interior><LinearRing><posList>2 2 3 2 3 3 2 2</posList></LinearRing></interior>\
            <interior><LinearRing><posList></posList></LinearRing></interior>\
            <interior><LinearRing/></interior>\
            </Polygon></f>";
        let Some(Geometry::Polygon(polygon)) = geometry(xml) else {
            panic!("Expected Polygon");
        };
        let shell = &polygon.exterior().0;
        assert_eq!(shell.len(), 5);
        assert_eq!(shell.first(), shell.last());
        assert_eq!(polygon.interiors().len(), 1);
        assert_eq!(polygon.interiors()[0].0.len(), 4);
    }

    #[test]
    fn test_polygon_without_exterior_is_absent() {
        let xml = "<f><Polygon><interior><posList>0 0 1 0 1 1</posList></interior></Polygon></f>";
        assert!(matches!(
            extract(xml).unwrap(),
            Some((GeometryKind::Polygon, None))
        ));

        let xml = "<f><Polygon><exterior><LinearRing><posList/></LinearRing></exterior></Polygon></f>";
        assert!(matches!(
            extract(xml).unwrap(),
            Some((GeometryKind::Polygon, None))
        ));
    }

    #[test]
    fn test_surface_uses_first_pos_list_only() {
        let xml = "<f><Surface><patches><PolygonPatch>\
            <exterior><LinearRing><posList>0 0 4 0 4 4 0 0</posList></LinearRing></exterior>\
            <interior><LinearRing><posList>1 1 2 1 2 2 1 1</posList></LinearRing></interior>\
            </PolygonPatch></patches></Surface></f>";
        let Some(Geometry::Polygon(polygon)) = geometry(xml) else {
            panic!("Expected Polygon");
        };
        assert_eq!(polygon.exterior().0.len(), 4);
        assert!(polygon.interiors().is_empty());
    }

    #[test]
    fn test_multi_surface() {
        let xml = "<f><MultiSurface>\
            <surfaceMember><Surface><patches><PolygonPatch><exterior><LinearRing>\
            <posList>0 0 1 0 1 1 0 0</posList></LinearRing></exterior></PolygonPatch></patches></Surface></surfaceMember>\
            <surfaceMember><Surface><patches><PolygonPatch><exterior><LinearRing>\
            <posList/></LinearRing></exterior></PolygonPatch></patches></Surface></surfaceMember>\
            <surfaceMember><Surface><patches><PolygonPatch><exterior><LinearRing>\
            <posList>5 5 6 5 6 6 5 5</posList></LinearRing></exterior></PolygonPatch></patches></Surface></surfaceMember>\
            </MultiSurface></f>";
        let Some(Geometry::MultiPolygon(mp)) = geometry(xml) else {
            panic!("Expected MultiPolygon");
        };
        assert_eq!(mp.0.len(), 2);
        assert_eq!(mp.0[1].exterior().0.len(), 4);
    }

    #[test]
    fn test_multi_surface_of_polygons() {
        let xml = "<f><MultiSurface><surfaceMember><Polygon><exterior><LinearRing>\
            <posList>0 0 1 0 1 1 0 0</posList></LinearRing></exterior></Polygon></surfaceMember>\
            </MultiSurface></f>";
        assert!(matches!(geometry(xml), Some(Geometry::MultiPolygon(mp)) if mp.0.len() == 1));
    }

    #[test]
    fn test_empty_multi_surface_is_absent() {
        let xml = "<f><MultiSurface><surfaceMember><Surface/></surfaceMember></MultiSurface></f>";
        assert!(matches!(
            extract(xml).unwrap(),
            Some((GeometryKind::MultiSurface, None))
        ));
    }

    #[test]
    fn test_multi_curve() {
        let xml = "<f><MultiCurve>\
            <curveMember><LineString><posList>0 0 1 1</posList></LineString></curveMember>\
            <curveMember><Curve><segments><LineStringSegment><posList>2 2 3 3</posList>\
            </LineStringSegment></segments></Curve></curveMember>\
            <curveMember><LineString><posList>9 9</posList></LineString></curveMember>\
            </MultiCurve></f>";
        let Some(Geometry::MultiLineString(mls)) = geometry(xml) else {
            panic!("Expected MultiLineString");
        };
        assert_eq!(mls.0.len(), 2);
    }

    #[test]
    fn test_dispatch_priority_no_fallthrough() {
        // Le Point passe avant le Polygon, même invalide
        let xml = "<f><Point><pos>1</pos></Point><Polygon><exterior>\
                   <posList>0 0 1 0 1 1 0 0</posList></exterior></Polygon></f>";
        assert!(matches!(
            extract(xml).unwrap(),
            Some((GeometryKind::Point, None))
        ));
    }

    #[test]
    fn test_no_geometry() {
        assert!(extract("<f><navn>Veg</navn></f>").unwrap().is_none());
    }

    #[test]
    fn test_malformed_number_is_fatal() {
        let err = extract("<f><LineString><posList>1 2 x 4</posList></LineString></f>").unwrap_err();
        assert!(matches!(err, GmlError::MalformedNumber { ref element, .. } if element == "posList"));
    }

    #[test]
    fn test_close_ring() {
        let open = vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 0.0 }];
        assert_eq!(close_ring(open).len(), 3);

        let closed = vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 0.0 }];
        assert_eq!(close_ring(closed).len(), 2);

        assert!(close_ring(Vec::new()).is_empty());
    }
}
