use crate::svg::coordinate;
use geo::{Coord, Geometry, MultiLineString, Polygon};

const POINT_RADIUS: f64 = 4.5;

/// SVG path data for a geometry; polygon rings are closed with `Z`.
pub fn path_data(geometry: &Geometry<f64>) -> String {
    let mut writer = PathWriter::default();
    writer.geometry(geometry);
    writer.out
}

/// SVG path data for a set of open lines (used for the border mesh).
pub fn lines_path_data(lines: &MultiLineString<f64>) -> String {
    let mut writer = PathWriter::default();
    for line in &lines.0 {
        writer.line(&line.0, false);
    }
    writer.out
}

#[derive(Default)]
struct PathWriter {
    out: String,
}

impl PathWriter {
    fn geometry(&mut self, geometry: &Geometry<f64>) {
        match geometry {
            Geometry::Point(point) => self.point(point.0),
            Geometry::Line(line) => self.line(&[line.start, line.end], false),
            Geometry::LineString(line) => self.line(&line.0, false),
            Geometry::Polygon(polygon) => self.polygon(polygon),
            Geometry::MultiPoint(points) => points.0.iter().for_each(|point| self.point(point.0)),
            Geometry::MultiLineString(lines) => {
                lines.0.iter().for_each(|line| self.line(&line.0, false))
            }
            Geometry::MultiPolygon(polygons) => {
                polygons.0.iter().for_each(|polygon| self.polygon(polygon))
            }
            Geometry::GeometryCollection(children) => {
                children.0.iter().for_each(|child| self.geometry(child))
            }
            Geometry::Rect(rect) => self.polygon(&rect.to_polygon()),
            Geometry::Triangle(triangle) => self.polygon(&triangle.to_polygon()),
        }
    }

    fn polygon(&mut self, polygon: &Polygon<f64>) {
        for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
            self.line(open_ring(&ring.0), true);
        }
    }

    fn line(&mut self, coords: &[Coord<f64>], closed: bool) {
        let Some((first, rest)) = coords.split_first() else {
            return;
        };
        self.command('M', *first);
        for coord in rest {
            self.command('L', *coord);
        }
        if closed {
            self.out.push('Z');
        }
    }

    fn point(&mut self, center: Coord<f64>) {
        self.command('M', center);
        let r = coordinate(POINT_RADIUS);
        let d = coordinate(POINT_RADIUS * 2.0);
        self.out.push_str(&format!(
            "m0,{r}a{r},{r} 0 1,1 0,-{d}a{r},{r} 0 1,1 0,{d}z"
        ));
    }

    fn command(&mut self, command: char, coord: Coord<f64>) {
        self.out.push(command);
        self.out.push_str(&coordinate(coord.x));
        self.out.push(',');
        self.out.push_str(&coordinate(coord.y));
    }
}

/// Rings repeat their first position at the end; the duplicate is implied by `Z`.
fn open_ring(ring: &[Coord<f64>]) -> &[Coord<f64>] {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) if ring.len() > 1 && first == last => &ring[..ring.len() - 1],
        _ => ring,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, MultiPolygon, Point};

    fn square(x0: f64, y0: f64, size: f64) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                (x0, y0),
                (x0, y0 + size),
                (x0 - size, y0 + size),
                (x0 - size, y0),
                (x0, y0),
            ]),
            vec![],
        )
    }

    #[test]
    fn polygon_path_omits_closing_point() {
        let geometry = Geometry::Polygon(square(30.0, 20.0, 20.0));
        assert_eq!(path_data(&geometry), "M30,20L30,40L10,40L10,20Z");
    }

    #[test]
    fn multipolygon_writes_one_subpath_per_ring() {
        let geometry = Geometry::MultiPolygon(MultiPolygon(vec![
            square(30.0, 20.0, 20.0),
            square(90.0, 20.0, 20.0),
        ]));
        assert_eq!(
            path_data(&geometry),
            "M30,20L30,40L10,40L10,20ZM90,20L90,40L70,40L70,20Z"
        );
    }

    #[test]
    fn coordinates_are_rounded_to_three_digits() {
        let geometry = Geometry::LineString(LineString::from(vec![(0.12345, 1.0), (2.5, -0.0004)]));
        assert_eq!(path_data(&geometry), "M0.123,1L2.5,0");
    }

    #[test]
    fn points_are_drawn_as_circles() {
        let geometry = Geometry::Point(Point::new(10.0, 10.0));
        assert_eq!(
            path_data(&geometry),
            "M10,10m0,4.5a4.5,4.5 0 1,1 0,-9a4.5,4.5 0 1,1 0,9z"
        );
    }

    #[test]
    fn mesh_lines_stay_open() {
        let lines = MultiLineString(vec![
            LineString::from(vec![(30.0, 20.0), (30.0, 40.0)]),
            LineString::from(vec![(0.0, 0.0), (5.0, 0.0)]),
        ]);
        assert_eq!(lines_path_data(&lines), "M30,20L30,40M0,0L5,0");
    }
}
