//! Geometry validity and multipart decomposition primitives
//!
//! Validity follows standard polygon rules: rings are closed and simple,
//! rings may touch at points but never cross, holes lie inside their shell
//! and are not nested inside each other. Any violation is fatal for the
//! layer being transformed; valid donut configurations pass through and
//! decompose normally.

use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Contains, Geometry, Intersects, Line, LineString, Polygon};

/// Number of parts in a geometry. Single geometries count as one part; a
/// multi geometry counts its members.
pub fn part_count(geometry: &Geometry<f64>) -> usize {
    match geometry {
        Geometry::MultiPoint(multi) => multi.0.len(),
        Geometry::MultiLineString(multi) => multi.0.len(),
        Geometry::MultiPolygon(multi) => multi.0.len(),
        Geometry::GeometryCollection(collection) => collection.0.len(),
        _ => 1,
    }
}

/// Splits a geometry into its parts. Single geometries yield themselves.
pub fn parts(geometry: &Geometry<f64>) -> Vec<Geometry<f64>> {
    match geometry {
        Geometry::MultiPoint(multi) => multi.0.iter().copied().map(Geometry::Point).collect(),
        Geometry::MultiLineString(multi) => multi
            .0
            .iter()
            .cloned()
            .map(Geometry::LineString)
            .collect(),
        Geometry::MultiPolygon(multi) => multi.0.iter().cloned().map(Geometry::Polygon).collect(),
        Geometry::GeometryCollection(collection) => collection.0.to_vec(),
        other => vec![other.clone()],
    }
}

/// Checks a geometry against polygon validity rules.
///
/// Returns the violation as a human-readable reason; the caller attaches
/// the offending feature id.
pub fn validate(geometry: &Geometry<f64>) -> Result<(), String> {
    match geometry {
        Geometry::Point(_) | Geometry::MultiPoint(_) => Ok(()),
        Geometry::LineString(line) => validate_line_string(line),
        Geometry::MultiLineString(multi) => {
            multi.0.iter().try_for_each(validate_line_string)
        }
        Geometry::Polygon(polygon) => validate_polygon(polygon),
        Geometry::MultiPolygon(multi) => multi.0.iter().try_for_each(validate_polygon),
        Geometry::GeometryCollection(collection) => collection.0.iter().try_for_each(validate),
        _ => Ok(()),
    }
}

fn validate_line_string(line: &LineString<f64>) -> Result<(), String> {
    if line.0.len() < 2 {
        return Err("line string has fewer than two points".to_string());
    }
    Ok(())
}

fn validate_polygon(polygon: &Polygon<f64>) -> Result<(), String> {
    let mut rings: Vec<&LineString<f64>> = vec![polygon.exterior()];
    rings.extend(polygon.interiors());

    for ring in &rings {
        validate_ring(ring)?;
    }

    // Rings may touch at single points but never cross or overlap.
    for i in 0..rings.len() {
        for j in (i + 1)..rings.len() {
            validate_ring_pair(rings[i], rings[j])?;
        }
    }

    let shell = Polygon::new(polygon.exterior().clone(), vec![]);
    for hole in polygon.interiors() {
        if !hole
            .points()
            .all(|point| shell.intersects(&point))
        {
            return Err("hole is not contained in its shell".to_string());
        }
    }

    // A hole lying inside another hole is not a valid donut.
    let holes: Vec<Polygon<f64>> = polygon
        .interiors()
        .iter()
        .map(|ring| Polygon::new(ring.clone(), vec![]))
        .collect();
    for (i, hole) in polygon.interiors().iter().enumerate() {
        for (j, other) in holes.iter().enumerate() {
            if i == j {
                continue;
            }
            if hole
                .points()
                .all(|point| other.contains(&point) || other.exterior().intersects(&point))
                && hole.points().any(|point| other.contains(&point))
            {
                return Err("hole is nested inside another hole".to_string());
            }
        }
    }

    Ok(())
}

fn validate_ring(ring: &LineString<f64>) -> Result<(), String> {
    if ring.0.len() < 4 {
        return Err("ring has fewer than four points".to_string());
    }
    if !ring.is_closed() {
        return Err("ring is not closed".to_string());
    }

    // Non-adjacent segments of a simple ring never meet.
    let segments: Vec<Line<f64>> = ring.lines().collect();
    let count = segments.len();
    for i in 0..count {
        for j in (i + 1)..count {
            let adjacent = j == i + 1 || (i == 0 && j == count - 1);
            if adjacent {
                continue;
            }
            if line_intersection(segments[i], segments[j]).is_some() {
                return Err("ring is self-intersecting".to_string());
            }
        }
    }

    Ok(())
}

fn validate_ring_pair(first: &LineString<f64>, second: &LineString<f64>) -> Result<(), String> {
    for a in first.lines() {
        for b in second.lines() {
            match line_intersection(a, b) {
                Some(LineIntersection::SinglePoint { is_proper: true, .. }) => {
                    return Err("rings cross each other".to_string());
                }
                Some(LineIntersection::Collinear { .. }) => {
                    return Err("rings overlap along a segment".to_string());
                }
                _ => {}
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon};

    fn square(origin: f64, size: f64) -> Polygon<f64> {
        polygon![
            (x: origin, y: origin),
            (x: origin + size, y: origin),
            (x: origin + size, y: origin + size),
            (x: origin, y: origin + size),
        ]
    }

    fn donut() -> Polygon<f64> {
        Polygon::new(
            square(0.0, 10.0).exterior().clone(),
            vec![square(4.0, 2.0).exterior().clone()],
        )
    }

    #[test]
    fn test_simple_polygon_is_valid() {
        assert!(validate(&Geometry::Polygon(square(0.0, 10.0))).is_ok());
    }

    #[test]
    fn test_valid_donut_is_valid() {
        assert!(validate(&Geometry::Polygon(donut())).is_ok());
    }

    #[test]
    fn test_hole_outside_shell_is_invalid() {
        let invalid = Polygon::new(
            square(0.0, 10.0).exterior().clone(),
            vec![square(20.0, 2.0).exterior().clone()],
        );
        let reason = validate(&Geometry::Polygon(invalid)).unwrap_err();
        assert!(reason.contains("hole"));
    }

    #[test]
    fn test_hole_crossing_shell_is_invalid() {
        // Hole extends past the shell boundary.
        let invalid = Polygon::new(
            square(0.0, 10.0).exterior().clone(),
            vec![square(8.0, 4.0).exterior().clone()],
        );
        assert!(validate(&Geometry::Polygon(invalid)).is_err());
    }

    #[test]
    fn test_self_intersecting_ring_is_invalid() {
        // Bowtie: segments cross in the middle.
        let bowtie = polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 10.0, y: 0.0),
            (x: 0.0, y: 10.0),
        ];
        let reason = validate(&Geometry::Polygon(bowtie)).unwrap_err();
        assert!(reason.contains("self-intersecting"));
    }

    #[test]
    fn test_hole_nested_in_hole_is_invalid() {
        let invalid = Polygon::new(
            square(0.0, 20.0).exterior().clone(),
            vec![
                square(2.0, 10.0).exterior().clone(),
                square(5.0, 2.0).exterior().clone(),
            ],
        );
        let reason = validate(&Geometry::Polygon(invalid)).unwrap_err();
        assert!(reason.contains("nested"));
    }

    #[test]
    fn test_multipolygon_with_invalid_member_is_invalid() {
        let bowtie = polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 10.0, y: 0.0),
            (x: 0.0, y: 10.0),
        ];
        let multi = MultiPolygon(vec![square(0.0, 5.0), bowtie]);
        assert!(validate(&Geometry::MultiPolygon(multi)).is_err());
    }

    #[test]
    fn test_part_count() {
        let multi = MultiPolygon(vec![square(0.0, 5.0), square(10.0, 5.0)]);
        assert_eq!(part_count(&Geometry::MultiPolygon(multi)), 2);
        assert_eq!(part_count(&Geometry::Polygon(square(0.0, 5.0))), 1);

        let single_member = MultiPolygon(vec![square(0.0, 5.0)]);
        assert_eq!(part_count(&Geometry::MultiPolygon(single_member)), 1);
    }

    #[test]
    fn test_parts_of_multipolygon_are_polygons() {
        let multi = Geometry::MultiPolygon(MultiPolygon(vec![square(0.0, 5.0), square(10.0, 5.0)]));
        let parts = parts(&multi);
        assert_eq!(parts.len(), 2);
        assert!(parts.iter().all(|part| matches!(part, Geometry::Polygon(_))));
    }
}
