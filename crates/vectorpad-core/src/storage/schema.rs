//! Structural rules a drawing file must satisfy before any of it is loaded.
//!
//! ```text
//! File    := Shape*
//! Shape   := @Type ("Rect" | "Line"), @Stroke (uint, Line only), Brush Points
//! Brush   := @Color1 [@Color2 @Color1pos @Color2pos]
//! Points  := Point*
//! Point   := @X @Y
//! ```
//!
//! Point counts are deliberately not checked here; a wrong count only skips
//! that one shape on load.

use super::tree::XmlElement;
use crate::shapes::ShapeColor;
use thiserror::Error;

/// A rule violation, located by element path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {message}")]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    fn new(path: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

type Check = Result<(), ValidationError>;

/// Validate a parsed drawing document.
pub fn validate(root: &XmlElement) -> Check {
    let path = "/File";
    if root.name != "File" {
        return Err(ValidationError::new(
            &format!("/{}", root.name),
            "root element must be File",
        ));
    }
    no_text(root, path)?;
    only_attributes(root, path, &[])?;

    for (i, child) in root.children.iter().enumerate() {
        let path = format!("{path}/{}[{}]", child.name, i + 1);
        if child.name != "Shape" {
            return Err(ValidationError::new(&path, "expected Shape"));
        }
        validate_shape(child, &path)?;
    }
    Ok(())
}

fn validate_shape(shape: &XmlElement, path: &str) -> Check {
    no_text(shape, path)?;
    match shape.attr("Type") {
        Some("Rect") => only_attributes(shape, path, &["Type"])?,
        Some("Line") => {
            only_attributes(shape, path, &["Type", "Stroke"])?;
            let stroke = shape
                .attr("Stroke")
                .ok_or_else(|| ValidationError::new(path, "Line requires Stroke"))?;
            if stroke.trim().parse::<u32>().is_err() {
                return Err(ValidationError::new(
                    path,
                    format!("Stroke {stroke:?} is not a non-negative integer"),
                ));
            }
        }
        Some(other) => {
            return Err(ValidationError::new(
                path,
                format!("unknown Type {other:?}"),
            ));
        }
        None => return Err(ValidationError::new(path, "missing Type")),
    }

    match shape.children.as_slice() {
        [brush, points] if brush.name == "Brush" && points.name == "Points" => {
            validate_brush(brush, &format!("{path}/Brush"))?;
            validate_points(points, &format!("{path}/Points"))
        }
        _ => Err(ValidationError::new(
            path,
            "expected exactly Brush followed by Points",
        )),
    }
}

fn validate_brush(brush: &XmlElement, path: &str) -> Check {
    no_text(brush, path)?;
    no_children(brush, path)?;
    only_attributes(brush, path, &["Color1", "Color2", "Color1pos", "Color2pos"])?;

    color(brush, "Color1", path)?
        .ok_or_else(|| ValidationError::new(path, "missing Color1"))?;

    let gradient = ["Color2", "Color1pos", "Color2pos"].map(|k| brush.attr(k).is_some());
    match gradient {
        [false, false, false] => Ok(()),
        [true, true, true] => {
            color(brush, "Color2", path)?;
            offset(brush, "Color1pos", path)?;
            offset(brush, "Color2pos", path)?;
            Ok(())
        }
        _ => Err(ValidationError::new(
            path,
            "Color2, Color1pos and Color2pos must appear together",
        )),
    }
}

fn validate_points(points: &XmlElement, path: &str) -> Check {
    no_text(points, path)?;
    only_attributes(points, path, &[])?;
    for (i, point) in points.children.iter().enumerate() {
        let path = format!("{path}/{}[{}]", point.name, i + 1);
        if point.name != "Point" {
            return Err(ValidationError::new(&path, "expected Point"));
        }
        no_text(point, &path)?;
        no_children(point, &path)?;
        only_attributes(point, &path, &["X", "Y"])?;
        number(point, "X", &path)?;
        number(point, "Y", &path)?;
    }
    Ok(())
}

fn no_text(element: &XmlElement, path: &str) -> Check {
    if element.has_text {
        return Err(ValidationError::new(path, "text content is not allowed"));
    }
    Ok(())
}

fn no_children(element: &XmlElement, path: &str) -> Check {
    match element.children.first() {
        Some(child) => Err(ValidationError::new(
            path,
            format!("unexpected child <{}>", child.name),
        )),
        None => Ok(()),
    }
}

fn only_attributes(element: &XmlElement, path: &str, allowed: &[&str]) -> Check {
    match element
        .attributes
        .iter()
        .find(|(k, _)| !allowed.contains(&k.as_str()))
    {
        Some((k, _)) => Err(ValidationError::new(
            path,
            format!("unexpected attribute {k}"),
        )),
        None => Ok(()),
    }
}

fn color(
    element: &XmlElement,
    key: &str,
    path: &str,
) -> Result<Option<ShapeColor>, ValidationError> {
    element
        .attr(key)
        .map(|v| {
            v.parse::<ShapeColor>()
                .map_err(|e| ValidationError::new(path, format!("{key}: {e}")))
        })
        .transpose()
}

fn number(element: &XmlElement, key: &str, path: &str) -> Result<f64, ValidationError> {
    let raw = element
        .attr(key)
        .ok_or_else(|| ValidationError::new(path, format!("missing {key}")))?;
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::new(path, format!("{key} {raw:?} is not a number")))
}

fn offset(element: &XmlElement, key: &str, path: &str) -> Result<f64, ValidationError> {
    let v = number(element, key, path)?;
    if !(0.0..=1.0).contains(&v) {
        return Err(ValidationError::new(
            path,
            format!("{key} {v} is outside [0, 1]"),
        ));
    }
    Ok(v)
}
