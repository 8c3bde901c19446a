//! Pure geometry helpers for registration frame selection
//!
//! Works on raw quadrilateral candidates produced by the extractor and picks
//! the one most likely to be the printed registration frame.

/// A point in image space (pixel coordinates, real-valued)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Four corners of a quadrilateral. Once ordered, the convention is
/// top-left, top-right, bottom-right, bottom-left (clockwise).
pub type Quad = [Point; 4];

/// Order four corners as TL, TR, BR, BL.
///
/// Sorts by polar angle around the centroid, then rotates the cycle so the
/// corner with the smallest x+y comes first. The min-x+y heuristic labels
/// the top-left reliably for axis-aligned and moderately skewed frames; it
/// is not guaranteed under extreme perspective distortion.
pub fn order_corners(corners: &Quad) -> Quad {
    let cx = corners.iter().map(|p| p.x).sum::<f64>() / 4.0;
    let cy = corners.iter().map(|p| p.y).sum::<f64>() / 4.0;

    let mut pts = *corners;
    pts.sort_by(|a, b| {
        let aa = (a.y - cy).atan2(a.x - cx);
        let ab = (b.y - cy).atan2(b.x - cx);
        aa.partial_cmp(&ab).unwrap_or(std::cmp::Ordering::Equal)
    });

    // Rotate the cycle so the min x+y corner leads
    let mut start = 0;
    for (i, p) in pts.iter().enumerate() {
        if p.x + p.y < pts[start].x + pts[start].y {
            start = i;
        }
    }

    [
        pts[start],
        pts[(start + 1) % 4],
        pts[(start + 2) % 4],
        pts[(start + 3) % 4],
    ]
}

/// Score a candidate quadrilateral against the registration frame prior:
/// roughly square, roughly centered, area near (min(imgW,imgH)*0.25)^2.
/// Returns a value in (0, 1], higher is better.
pub fn score_square_candidate(candidate: &Quad, img_w: u32, img_h: u32) -> f64 {
    let [tl, tr, br, bl] = order_corners(candidate);

    let w1 = tl.distance(&tr);
    let w2 = bl.distance(&br);
    let h1 = tl.distance(&bl);
    let h2 = tr.distance(&br);
    let w = (w1 + w2) / 2.0;
    let h = (h1 + h2) / 2.0;

    let area = w * h;
    let ideal = (f64::from(img_w.min(img_h)) * 0.25).powi(2);
    let area_score = (-(area - ideal).abs() / ideal).exp();

    let cx = (tl.x + tr.x + br.x + bl.x) / 4.0;
    let cy = (tl.y + tr.y + br.y + bl.y) / 4.0;
    let dx = (cx - f64::from(img_w) / 2.0) / (f64::from(img_w) / 2.0);
    let dy = (cy - f64::from(img_h) / 2.0) / (f64::from(img_h) / 2.0);
    let center_score = (-(dx * dx + dy * dy)).exp();

    let ratio_score = (-(w / h - 1.0).abs()).exp();

    area_score * center_score * ratio_score
}

/// Pick the best-scoring candidate and return its corners in canonical
/// order, or `None` if the list is empty.
pub fn select_registration_corners(candidates: &[Quad], img_w: u32, img_h: u32) -> Option<Quad> {
    let mut best: Option<&Quad> = None;
    let mut best_score = -1.0;

    for candidate in candidates {
        let score = score_square_candidate(candidate, img_w, img_h);
        if score > best_score {
            best_score = score;
            best = Some(candidate);
        }
    }

    best.map(order_corners)
}

/// Signed shoelace area of a closed polygon, absolute value returned.
pub fn polygon_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum.abs() / 2.0
}

/// Whether a closed polygon is convex (cross products of consecutive edges
/// all share a sign; collinear edges are tolerated).
pub fn is_convex(points: &[Point]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }

    let mut sign = 0.0f64;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let c = points[(i + 2) % n];
        let cross = (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x);
        if cross.abs() < f64::EPSILON {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }

    sign != 0.0
}
