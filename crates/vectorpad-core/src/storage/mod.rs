//! Drawing persistence as a validated XML document.
//!
//! A file is trusted only after it parses and passes [`schema::validate`].
//! Loading is all-or-nothing at the document level; individual `Shape`
//! records with the wrong number of points are skipped.

mod codec;
mod schema;
mod tree;

pub use codec::{element_to_shape, shape_to_element};
pub use schema::{ValidationError, validate};
pub use tree::{XmlElement, parse_document, write_document};

use crate::shapes::Shape;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("XML error: {0}")]
    Xml(String),
    /// The file is malformed or breaks the schema; nothing was loaded.
    #[error("Invalid drawing file: {0}")]
    LoadValidation(String),
    /// The file was written but does not validate when read back.
    #[error("Saved file failed validation: {0}")]
    SaveValidation(String),
}

impl From<ValidationError> for StorageError {
    fn from(e: ValidationError) -> Self {
        StorageError::LoadValidation(e.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Serialize shapes, in z-order, to a drawing document.
pub fn to_xml_string<'a>(shapes: impl IntoIterator<Item = &'a Shape>) -> StorageResult<String> {
    let root = shapes
        .into_iter()
        .fold(XmlElement::new("File"), |root, shape| {
            root.with_child(shape_to_element(shape))
        });
    write_document(&root).map_err(StorageError::Xml)
}

/// Parse and validate a drawing document, returning its shapes in file order.
pub fn from_xml_str(text: &str) -> StorageResult<Vec<Shape>> {
    let root = parse_document(text).map_err(StorageError::LoadValidation)?;
    validate(&root)?;

    let mut shapes = Vec::with_capacity(root.children.len());
    for (i, element) in root.children.iter().enumerate() {
        match element_to_shape(element)? {
            Some(shape) => shapes.push(shape),
            None => log::debug!(
                "Skipping shape {} ({:?}): wrong number of points",
                i + 1,
                element.attr("Type")
            ),
        }
    }
    Ok(shapes)
}

/// Write a drawing file, then read it back and validate it.
///
/// A validation failure is reported as [`StorageError::SaveValidation`]; the
/// file stays on disk.
pub fn save_drawing<'a>(
    path: &Path,
    shapes: impl IntoIterator<Item = &'a Shape>,
) -> StorageResult<()> {
    let xml = to_xml_string(shapes)?;
    fs::write(path, xml)
        .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))?;

    let written = fs::read_to_string(path)
        .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    let check = parse_document(&written)
        .and_then(|root| validate(&root).map_err(|e| e.to_string()));
    if let Err(e) = check {
        log::warn!("Saved drawing {} does not validate: {}", path.display(), e);
        return Err(StorageError::SaveValidation(e));
    }

    log::info!("Saved drawing to {}", path.display());
    Ok(())
}

/// Read a drawing file. On any validation failure no shapes are returned.
pub fn load_drawing(path: &Path) -> StorageResult<Vec<Shape>> {
    let text = fs::read_to_string(path)
        .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    let shapes = from_xml_str(&text)?;
    log::info!("Loaded {} shapes from {}", shapes.len(), path.display());
    Ok(shapes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Brush, LinearGradient, Polyline, PolylineStyle, Quad, ShapeColor};
    use kurbo::Point;

    fn sample() -> Vec<Shape> {
        let line = Polyline::from_points(
            vec![
                Point::new(1.25, 2.5),
                Point::new(30.0, 40.125),
                Point::new(-7.0, 1e-3),
            ],
            PolylineStyle::new(Brush::solid(ShapeColor::new(10, 20, 30, 200)), 6.0),
        )
        .unwrap();

        let quad = Quad::new(
            [
                Point::new(0.1, 0.2),
                Point::new(100.3, 0.2),
                Point::new(100.3, 50.7),
                Point::new(0.1, 50.7),
            ],
            Brush::LinearGradient(LinearGradient::from_slider(
                ShapeColor::black(),
                ShapeColor::new(0, 128, 255, 255),
                65.0,
            )),
        );
        vec![line.into(), quad.into()]
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drawing.xml");
        let shapes = sample();

        save_drawing(&path, &shapes).unwrap();
        let loaded = load_drawing(&path).unwrap();

        assert_eq!(loaded.len(), shapes.len());
        for (a, b) in shapes.iter().zip(loaded.iter()) {
            assert_eq!(a.kind(), b.kind());
            assert_eq!(a.brush(), b.brush());
            assert_eq!(a.stroke_width(), b.stroke_width());
            assert_eq!(a.points().len(), b.points().len());
            for (p, q) in a.points().iter().zip(b.points()) {
                assert!((p.x - q.x).abs() < 1e-9 && (p.y - q.y).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_invalid_file_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.xml");
        fs::write(
            &path,
            r##"<File><Shape Type="Rect"><Brush Color1="#000"/><Points/></Shape><Shape Type="Oval"/></File>"##,
        )
        .unwrap();
        assert!(matches!(load_drawing(&path), Err(StorageError::LoadValidation(_))));

        fs::write(&path, "<File><Shape").unwrap();
        assert!(matches!(load_drawing(&path), Err(StorageError::LoadValidation(_))));

        assert!(matches!(
            load_drawing(&dir.path().join("missing.xml")),
            Err(StorageError::Io(_))
        ));
    }

    #[test]
    fn test_save_reports_invalid_output_and_keeps_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nan.xml");
        let quad = Quad::new(
            [
                Point::new(f64::NAN, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
                Point::new(0.0, 10.0),
            ],
            Brush::solid(ShapeColor::black()),
        );
        let shapes: Vec<Shape> = vec![quad.into()];

        let err = save_drawing(&path, &shapes).unwrap_err();
        match err {
            StorageError::SaveValidation(message) => {
                assert!(message.starts_with("/File/Shape[1]/Points/Point[1]"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(path.exists());
    }

    #[test]
    fn test_bad_point_counts_are_skipped() {
        let xml = r##"<File>
            <Shape Type="Rect"><Brush Color1="#FF000000"/>
              <Points><Point X="0" Y="0"/><Point X="1" Y="0"/><Point X="1" Y="1"/></Points></Shape>
            <Shape Type="Line" Stroke="4"><Brush Color1="#FF000000"/>
              <Points><Point X="0" Y="0"/></Points></Shape>
            <Shape Type="Line" Stroke="4"><Brush Color1="#FF00FF00"/>
              <Points><Point X="0" Y="0"/><Point X="9" Y="9"/></Points></Shape>
        </File>"##;
        let shapes = from_xml_str(xml).unwrap();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].stroke_width(), Some(4.0));
        assert_eq!(
            shapes[0].brush(),
            Brush::solid(ShapeColor::new(0, 255, 0, 255))
        );
    }

    #[test]
    fn test_empty_drawing() {
        let xml = to_xml_string(&Vec::<Shape>::new()).unwrap();
        assert!(from_xml_str(&xml).unwrap().is_empty());
    }
}
