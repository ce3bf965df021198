//! Sérialisation GeoJSON en streaming (geozero pour les géométries)
//!
//! Forme produite :
//! `{"type":"FeatureCollection","features":[{"type":"Feature","properties":{..},"geometry":{..}}]}`
//! Les propriétés sortent dans l'ordre d'insertion de la [`PropertyMap`](crate::PropertyMap).

use std::io::Write;

use geozero::geojson::GeoJsonWriter;
use geozero::GeozeroGeometry;

use crate::types::{Feature, FeatureCollection};
use crate::GmlError;

/// Écrit une collection en GeoJSON
///
/// En mode `pretty`, le document compact est relu puis réindenté par `serde_json`
/// (l'ordre des clés est conservé).
pub fn write_geojson<W: Write>(
    collection: &FeatureCollection,
    writer: &mut W,
    pretty: bool,
) -> Result<(), GmlError> {
    if !pretty {
        return write_compact(collection, writer);
    }

    let mut buffer = Vec::with_capacity(collection.len() * 256);
    write_compact(collection, &mut buffer)?;
    let value: serde_json::Value = serde_json::from_slice(&buffer)?;
    serde_json::to_writer_pretty(&mut *writer, &value)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Sérialise une collection dans une `String`
pub fn to_string(collection: &FeatureCollection, pretty: bool) -> Result<String, GmlError> {
    let mut buffer = Vec::new();
    write_geojson(collection, &mut buffer, pretty)?;
    // serde_json et geozero n'émettent que de l'UTF-8
    String::from_utf8(buffer).map_err(|e| GmlError::invalid_encoding("UTF-8", e.to_string()))
}

fn write_compact<W: Write>(collection: &FeatureCollection, writer: &mut W) -> Result<(), GmlError> {
    writer.write_all(br#"{"type":"FeatureCollection","features":["#)?;
    for (i, feature) in collection.iter().enumerate() {
        if i > 0 {
            writer.write_all(b",")?;
        }
        write_feature(writer, feature)?;
    }
    writer.write_all(b"]}")?;
    Ok(())
}

fn write_feature<W: Write>(writer: &mut W, feature: &Feature) -> Result<(), GmlError> {
    writer.write_all(br#"{"type":"Feature","properties":{"#)?;
    for (i, (key, value)) in feature.properties.iter().enumerate() {
        if i > 0 {
            writer.write_all(b",")?;
        }
        serde_json::to_writer(&mut *writer, key)?;
        writer.write_all(b":")?;
        serde_json::to_writer(&mut *writer, value)?;
    }

    writer.write_all(br#"},"geometry":"#)?;
    let mut geometry_writer = GeoJsonWriter::new(&mut *writer);
    feature.geometry.process_geom(&mut geometry_writer)?;
    writer.write_all(b"}")?;
    Ok(())
}
