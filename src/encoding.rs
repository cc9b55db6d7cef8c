// src/encoding.rs
//
// Nested coordinate lists: a point is [x, y], a ring is a list of points and a
// polygon is {"exterior": ring, "interiors": [ring, ...]}.

use std::io::{Read, Write};

use crate::error::Result;
use crate::geometry::Polygon;

pub fn to_json(polygons: &[Polygon]) -> Result<String> {
    Ok(serde_json::to_string(polygons)?)
}

pub fn to_json_pretty(polygons: &[Polygon]) -> Result<String> {
    Ok(serde_json::to_string_pretty(polygons)?)
}

pub fn from_json(text: &str) -> Result<Vec<Polygon>> {
    Ok(serde_json::from_str(text)?)
}

pub fn write_collection<W: Write>(writer: W, polygons: &[Polygon]) -> Result<()> {
    serde_json::to_writer(writer, polygons)?;
    Ok(())
}

pub fn read_collection<R: Read>(reader: R) -> Result<Vec<Polygon>> {
    Ok(serde_json::from_reader(reader)?)
}
