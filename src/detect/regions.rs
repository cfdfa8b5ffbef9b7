use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::point::Point;
use imageproc::rect::Rect;

/// One connected foreground component: its simplified outer boundary,
/// polygon area and axis-aligned bounding box. Regions carry no identity
/// across frames.
#[derive(Debug, Clone)]
pub struct Region {
    pub boundary: Vec<Point<i32>>,
    pub area: f64,
    pub bounding_box: Rect,
}

impl Region {
    fn from_boundary(boundary: Vec<Point<i32>>) -> Option<Self> {
        let first = boundary.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &boundary {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        let area = polygon_area(&boundary);
        Some(Region {
            boundary,
            area,
            bounding_box: Rect::at(min_x, min_y)
                .of_size((max_x - min_x + 1) as u32, (max_y - min_y + 1) as u32),
        })
    }
}

/// Area bands a region can fall into. Lower bounds are inclusive and the
/// maximal satisfied band governs what gets drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Ignored,
    Tracked,
    Warning,
}

/// Classify a region area against the configured thresholds.
pub fn classify(area: f64, min_area: f64, max_area: f64) -> Band {
    if area >= max_area {
        Band::Warning
    } else if area >= min_area {
        Band::Tracked
    } else {
        Band::Ignored
    }
}

/// Extract the outer boundaries of all connected foreground components,
/// lazily. Internal (hole) boundaries are ignored. The iterator makes a
/// single pass and is rebuilt from scratch for each frame's mask.
pub fn regions(mask: &GrayImage) -> impl Iterator<Item = Region> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|contour| contour.border_type == BorderType::Outer)
        .filter_map(|contour| Region::from_boundary(simplify(&contour.points)))
}

/// Drop redundant collinear points from a closed boundary chain.
fn simplify(points: &[Point<i32>]) -> Vec<Point<i32>> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    let mut kept = Vec::new();
    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let cur = points[i];
        let next = points[(i + 1) % n];
        let cross = (cur.x - prev.x) as i64 * (next.y - cur.y) as i64
            - (cur.y - prev.y) as i64 * (next.x - cur.x) as i64;
        if cross != 0 {
            kept.push(cur);
        }
    }
    if kept.is_empty() {
        // fully collinear chain: keep the endpoints
        kept.push(points[0]);
        kept.push(points[n / 2]);
    }
    kept
}

/// Shoelace area of a closed polygon through the boundary points.
fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut doubled: i64 = 0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        doubled += a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64;
    }
    (doubled.abs() as f64) / 2.0
}
