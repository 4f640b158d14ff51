//! Conversion between shapes and `Shape` elements.

use super::tree::XmlElement;
use super::{StorageError, StorageResult};
use crate::shapes::{
    Brush, GradientStop, LinearGradient, Polyline, PolylineStyle, Quad, Shape, ShapeColor,
};
use kurbo::Point;

pub(crate) const TYPE_RECT: &str = "Rect";
pub(crate) const TYPE_LINE: &str = "Line";

/// Encode one shape.
///
/// Lines store their width rounded to an integer and only the primary color
/// of their brush.
pub fn shape_to_element(shape: &Shape) -> XmlElement {
    match shape {
        Shape::Quad(q) => XmlElement::new("Shape")
            .with_attr("Type", TYPE_RECT)
            .with_child(brush_to_element(&q.style.fill))
            .with_child(points_to_element(&q.points)),
        Shape::Polyline(l) => XmlElement::new("Shape")
            .with_attr("Type", TYPE_LINE)
            .with_attr("Stroke", l.style.width.round() as u32)
            .with_child(
                XmlElement::new("Brush").with_attr("Color1", l.style.stroke.primary_color()),
            )
            .with_child(points_to_element(&l.points)),
    }
}

fn brush_to_element(brush: &Brush) -> XmlElement {
    let element = XmlElement::new("Brush");
    match brush {
        Brush::Solid(c) => element.with_attr("Color1", c),
        Brush::LinearGradient(g) => element
            .with_attr("Color1", g.start.color)
            .with_attr("Color2", g.end.color)
            .with_attr("Color1pos", g.start.offset)
            .with_attr("Color2pos", g.end.offset),
    }
}

fn points_to_element(points: &[Point]) -> XmlElement {
    points.iter().fold(XmlElement::new("Points"), |acc, p| {
        acc.with_child(
            XmlElement::new("Point")
                .with_attr("X", p.x)
                .with_attr("Y", p.y),
        )
    })
}

/// Decode one validated `Shape` element.
///
/// Returns `Ok(None)` for a record with the wrong number of points: a Rect
/// without exactly four, or a Line with fewer than two.
pub fn element_to_shape(element: &XmlElement) -> StorageResult<Option<Shape>> {
    let [brush, points] = element.children.as_slice() else {
        return Err(invalid("Shape must hold Brush and Points"));
    };
    let brush = element_to_brush(brush)?;
    let points = points
        .children
        .iter()
        .map(element_to_point)
        .collect::<StorageResult<Vec<Point>>>()?;

    match element.attr("Type") {
        Some(TYPE_RECT) => {
            let Ok(corners) = <[Point; 4]>::try_from(points) else {
                return Ok(None);
            };
            Ok(Some(Quad::new(corners, brush).into()))
        }
        Some(TYPE_LINE) => {
            let width = element
                .attr("Stroke")
                .and_then(|s| s.trim().parse::<u32>().ok())
                .ok_or_else(|| invalid("Line without a valid Stroke"))?;
            let style = PolylineStyle::new(brush, f64::from(width));
            Ok(Polyline::from_points(points, style).map(Shape::from))
        }
        other => Err(invalid(&format!("unknown shape type {other:?}"))),
    }
}

fn element_to_brush(element: &XmlElement) -> StorageResult<Brush> {
    let color1 = color_attr(element, "Color1")?;
    if element.attr("Color2").is_none() {
        return Ok(Brush::Solid(color1));
    }
    Ok(Brush::LinearGradient(LinearGradient::new(
        GradientStop {
            color: color1,
            offset: number_attr(element, "Color1pos")?,
        },
        GradientStop {
            color: color_attr(element, "Color2")?,
            offset: number_attr(element, "Color2pos")?,
        },
    )))
}

fn element_to_point(element: &XmlElement) -> StorageResult<Point> {
    Ok(Point::new(
        number_attr(element, "X")?,
        number_attr(element, "Y")?,
    ))
}

fn color_attr(element: &XmlElement, key: &str) -> StorageResult<ShapeColor> {
    element
        .attr(key)
        .ok_or_else(|| invalid(&format!("missing {key}")))?
        .parse::<ShapeColor>()
        .map_err(|e| invalid(&e.to_string()))
}

fn number_attr(element: &XmlElement, key: &str) -> StorageResult<f64> {
    element
        .attr(key)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .ok_or_else(|| invalid(&format!("missing or invalid {key}")))
}

fn invalid(message: &str) -> StorageError {
    StorageError::LoadValidation(message.to_string())
}
