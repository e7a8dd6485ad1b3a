use std::cmp::Ordering;

use geo::algorithm::euclidean_distance::EuclideanDistance;
use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::algorithm::map_coords::MapCoords;
use geo::coords_iter::CoordsIter;
use geo::{
    Coordinate, GeoFloat, Geometry, GeometryCollection, Line, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Point, Polygon, Rect,
};
use geo_clipper::Clipper;
use num_traits::ToPrimitive;

use crate::clip::ClipError;


/// Factor coordinates are scaled by before the polygon clipper rounds them to integers.
pub const CLIPPER_FACTOR: f64 = 100.0;

/// Largest absolute scaled coordinate the polygon clipper accepts.
const CLIPPER_RANGE: f64 = 4.0e18;

pub trait FromF64 {
    fn fromf64(x: &f64) -> Self;
}
impl FromF64 for f32 {
    fn fromf64(x: &f64) -> Self {
        match x.to_f32() {
            Some(f) => f,
            None => f32::MAX
        }
    }
}
impl FromF64 for f64 {
    fn fromf64(x: &f64) -> Self {
        *x
    }
}

pub trait ClipFloat: GeoFloat + std::convert::From<f32> + FromF64 {}
impl<T> ClipFloat for T where T: GeoFloat + std::convert::From<f32> + FromF64 {}

/// Intersection of a geometry with an axis aligned rectangle.
///
/// `Ok(None)` means nothing of the geometry is left inside the rectangle.
pub trait Clip<T: ClipFloat> {
    type Output;
    fn clip(&self, rect: &Rect<T>) -> Result<Option<Self::Output>, ClipError>;
}

impl<T: ClipFloat> Clip<T> for Geometry<T> {
    type Output = Geometry<T>;

    fn clip(&self, rect: &Rect<T>) -> Result<Option<Geometry<T>>, ClipError> {
        ensure_finite(self.coords_iter())?;

        Ok(match self {
            Geometry::Point(pt) => pt.clip(rect)?.map(Geometry::Point),
            Geometry::MultiPoint(mp) => mp.clip(rect)?.map(Geometry::MultiPoint),
            Geometry::Line(l) => l.clip(rect)?.map(Geometry::Line),
            Geometry::LineString(ls) => ls.clip(rect)?.map(Geometry::MultiLineString),
            Geometry::MultiLineString(mls) => mls.clip(rect)?.map(Geometry::MultiLineString),
            Geometry::Polygon(pg) => pg.clip(rect)?.map(Geometry::MultiPolygon),
            Geometry::MultiPolygon(mpg) => mpg.clip(rect)?.map(Geometry::MultiPolygon),
            Geometry::Rect(r) => r.to_polygon().clip(rect)?.map(Geometry::MultiPolygon),
            Geometry::Triangle(t) => t.to_polygon().clip(rect)?.map(Geometry::MultiPolygon),
            Geometry::GeometryCollection(gc) => gc.clip(rect)?.map(Geometry::GeometryCollection),
        })
    }
}

fn contains<T: ClipFloat>(rect: &Rect<T>, coord: &Coordinate<T>) -> bool {
    coord.x >= rect.min().x
        && coord.x <= rect.max().x
        && coord.y >= rect.min().y
        && coord.y <= rect.max().y
}

fn to_f64_pair<T: ClipFloat>(c: &Coordinate<T>) -> (f64, f64) {
    (c.x.to_f64().unwrap_or(f64::NAN), c.y.to_f64().unwrap_or(f64::NAN))
}

fn ensure_finite<T: ClipFloat>(coords: impl Iterator<Item = Coordinate<T>>) -> Result<(), ClipError> {
    for c in coords {
        let (x, y) = to_f64_pair(&c);
        if !x.is_finite() || !y.is_finite() {
            return Err(ClipError::NonFiniteCoordinate(x, y));
        }
    }
    Ok(())
}

fn ensure_clippable<T: ClipFloat>(coords: impl Iterator<Item = Coordinate<T>>) -> Result<(), ClipError> {
    for c in coords {
        let (x, y) = to_f64_pair(&c);
        if !x.is_finite() || !y.is_finite() {
            return Err(ClipError::NonFiniteCoordinate(x, y));
        }
        if (x * CLIPPER_FACTOR).abs() > CLIPPER_RANGE || (y * CLIPPER_FACTOR).abs() > CLIPPER_RANGE {
            return Err(ClipError::CoordinateOutOfRange(x, y));
        }
    }
    Ok(())
}

fn distance<T: ClipFloat>(a: &Coordinate<T>, b: &Coordinate<T>) -> T {
    Point::from(*a).euclidean_distance(&Point::from(*b))
}

/// `line`, reversed if needed to run in the same direction as `reference`
fn oriented_like<T: ClipFloat>(line: &Line<T>, reference: &Line<T>) -> Line<T> {
    if distance(&reference.start, &line.end) < distance(&reference.start, &line.start) {
        Line::new(line.end, line.start)
    } else {
        *line
    }
}

impl<T: ClipFloat> Clip<T> for Line<T> {
    type Output = Line<T>;

    fn clip(&self, rect: &Rect<T>) -> Result<Option<Self::Output>, ClipError> {
        let box_lines = rect.to_polygon().exterior().lines().collect::<Vec<Line<T>>>();
        let intersections = box_lines.into_iter().filter_map(|box_line| {
            line_intersection(box_line, *self)
        }).collect::<Vec<LineIntersection<T>>>();

        let start_contained = contains(rect, &self.start);
        let end_contained = contains(rect, &self.end);

        let (collinears, single_points): (Vec<LineIntersection<T>>, Vec<LineIntersection<T>>) = intersections.into_iter().partition(|i| {
            matches!(i, LineIntersection::Collinear { .. })
        });

        // running along an edge
        if let Some(LineIntersection::Collinear { intersection }) = collinears.first() {
            return Ok(Some(oriented_like(intersection, self)));
        }

        let mut crossings: Vec<Coordinate<T>> = single_points.into_iter().filter_map(|sp| match sp {
            LineIntersection::SinglePoint { intersection, is_proper: _ } => Some(intersection),
            _ => None,
        }).collect();
        crossings.sort_by(|a, b| {
            distance(a, &self.start).partial_cmp(&distance(b, &self.start)).unwrap_or(Ordering::Equal)
        });
        crossings.dedup();

        let entry = if start_contained { Some(self.start) } else { crossings.first().cloned() };
        let exit = if end_contained { Some(self.end) } else { crossings.last().cloned() };

        // a line touching the box from outside in one point has nothing inside
        if !start_contained && !end_contained && crossings.len() < 2 {
            return Ok(None);
        }

        Ok(match (entry, exit) {
            (Some(start), Some(end)) if start != end || self.start == self.end => Some(Line::new(start, end)),
            _ => None,
        })
    }
}

impl<T: ClipFloat> Clip<T> for LineString<T> {
    type Output = MultiLineString<T>;

    fn clip(&self, rect: &Rect<T>) -> Result<Option<Self::Output>, ClipError> {
        let mut parts: Vec<LineString<T>> = vec![];
        let mut current: Vec<Coordinate<T>> = vec![];

        for line in self.lines() {
            match line.clip(rect)? {
                Some(clipped) => {
                    if current.last() != Some(&clipped.start) {
                        finish_part(&mut parts, &mut current);
                        current.push(clipped.start);
                    }
                    current.push(clipped.end);
                }
                None => finish_part(&mut parts, &mut current),
            }
        }
        finish_part(&mut parts, &mut current);

        Ok(if parts.is_empty() { None } else { Some(MultiLineString(parts)) })
    }
}

fn finish_part<T: ClipFloat>(parts: &mut Vec<LineString<T>>, current: &mut Vec<Coordinate<T>>) {
    if current.len() >= 2 {
        parts.push(LineString(std::mem::take(current)));
    } else {
        current.clear();
    }
}

impl<T: ClipFloat> Clip<T> for MultiLineString<T> {
    type Output = MultiLineString<T>;

    fn clip(&self, rect: &Rect<T>) -> Result<Option<Self::Output>, ClipError> {
        let mut parts = vec![];
        for line_string in self.0.iter() {
            if let Some(clipped) = line_string.clip(rect)? {
                parts.extend(clipped.0);
            }
        }

        Ok(if parts.is_empty() { None } else { Some(MultiLineString(parts)) })
    }
}

impl<T: ClipFloat> Clip<T> for Point<T> {
    type Output = Point<T>;

    fn clip(&self, rect: &Rect<T>) -> Result<Option<Self::Output>, ClipError> {
        let (px, py) = self.x_y();
        let (rx1, ry1) = rect.min().x_y();
        let (rx2, ry2) = rect.max().x_y();

        if (px >= rx1) && (px <= rx2) && (py >= ry1) && (py <= ry2) {
            Ok(Some(*self))
        } else {
            Ok(None)
        }
    }
}

impl<T: ClipFloat> Clip<T> for MultiPoint<T> {
    type Output = MultiPoint<T>;

    fn clip(&self, rect: &Rect<T>) -> Result<Option<Self::Output>, ClipError> {
        let mut points = vec![];
        for point in self.0.iter() {
            if let Some(p) = point.clip(rect)? {
                points.push(p);
            }
        }

        Ok(if points.is_empty() { None } else { Some(MultiPoint(points)) })
    }
}

impl<T: ClipFloat> Clip<T> for Polygon<T> {
    type Output = MultiPolygon<T>;

    fn clip(&self, rect: &Rect<T>) -> Result<Option<Self::Output>, ClipError> {
        let rect_poly = rect.to_polygon();
        ensure_clippable(rect_poly.coords_iter())?;
        ensure_clippable(self.coords_iter())?;

        let map_f64 = |(a, b): &(T, T)| {(a.to_f64().unwrap_or(f64::NAN), b.to_f64().unwrap_or(f64::NAN))};
        let clipped = rect_poly.map_coords(map_f64).intersection(&self.map_coords(map_f64), CLIPPER_FACTOR);
        if clipped.0.is_empty() {
            Ok(None)
        } else {
            Ok(Some(clipped.map_coords(|(a, b)| {
                (T::fromf64(a), T::fromf64(b))
            })))
        }
    }
}

impl<T: ClipFloat> Clip<T> for MultiPolygon<T> {
    type Output = MultiPolygon<T>;

    fn clip(&self, rect: &Rect<T>) -> Result<Option<Self::Output>, ClipError> {
        let mut polygons = vec![];
        for polygon in self.0.iter() {
            if let Some(clipped) = polygon.clip(rect)? {
                polygons.extend(clipped.0);
            }
        }

        Ok(if polygons.is_empty() { None } else { Some(MultiPolygon(polygons)) })
    }
}

impl<T: ClipFloat> Clip<T> for GeometryCollection<T> {
    type Output = GeometryCollection<T>;

    fn clip(&self, rect: &Rect<T>) -> Result<Option<Self::Output>, ClipError> {
        let mut geometries = vec![];
        for geometry in self.0.iter() {
            if let Some(clipped) = geometry.clip(rect)? {
                geometries.push(clipped);
            }
        }

        Ok(if geometries.is_empty() { None } else { Some(GeometryCollection(geometries)) })
    }
}
