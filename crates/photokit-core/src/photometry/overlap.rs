//! Exact area of intersection between a circle centred on the origin and an
//! axis-aligned rectangle.

/// Area of the circular segment cut off by the chord between two points on
/// a circle of radius `r`.
fn area_arc(x1: f64, y1: f64, x2: f64, y2: f64, r: f64) -> f64 {
    let chord = ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt();
    let theta = 2.0 * (0.5 * chord / r).clamp(-1.0, 1.0).asin();
    0.5 * r * r * (theta - theta.sin())
}

fn area_triangle(x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) -> f64 {
    0.5 * (x1 * (y2 - y3) + x2 * (y3 - y1) + x3 * (y1 - y2)).abs()
}

fn chord(r: f64, v: f64) -> f64 {
    (r * r - v * v).max(0.0).sqrt()
}

/// Overlap for a rectangle lying entirely in the first quadrant
/// (`0 <= xmin`, `0 <= ymin`).
fn overlap_core(xmin: f64, ymin: f64, xmax: f64, ymax: f64, r: f64) -> f64 {
    let r2 = r * r;
    if xmin * xmin + ymin * ymin >= r2 {
        return 0.0;
    }
    if xmax * xmax + ymax * ymax <= r2 {
        return (xmax - xmin) * (ymax - ymin);
    }

    let lower_right_inside = xmax * xmax + ymin * ymin < r2;
    let upper_left_inside = xmin * xmin + ymax * ymax < r2;

    match (lower_right_inside, upper_left_inside) {
        (true, true) => {
            let (x1, y1) = (chord(r, ymax), ymax);
            let (x2, y2) = (xmax, chord(r, xmax));
            (xmax - xmin) * (ymax - ymin) - area_triangle(x1, y1, x2, y2, xmax, ymax)
                + area_arc(x1, y1, x2, y2, r)
        }
        (true, false) => {
            let (x1, y1) = (xmin, chord(r, xmin));
            let (x2, y2) = (xmax, chord(r, xmax));
            area_arc(x1, y1, x2, y2, r)
                + area_triangle(x1, y1, xmin, ymin, xmax, ymin)
                + area_triangle(x1, y1, x2, y2, xmax, ymin)
        }
        (false, true) => {
            let (x1, y1) = (chord(r, ymin), ymin);
            let (x2, y2) = (chord(r, ymax), ymax);
            area_arc(x1, y1, x2, y2, r)
                + area_triangle(x1, y1, xmin, ymin, xmin, ymax)
                + area_triangle(x1, y1, x2, y2, xmin, ymax)
        }
        (false, false) => {
            let (x1, y1) = (chord(r, ymin), ymin);
            let (x2, y2) = (xmin, chord(r, xmin));
            area_arc(x1, y1, x2, y2, r) + area_triangle(x1, y1, x2, y2, xmin, ymin)
        }
    }
}

/// Area of `[xmin, xmax] x [ymin, ymax]` inside the circle of radius `r`
/// centred on the origin.
///
/// Rectangles straddling an axis are split there; the pieces are mirrored
/// into the first quadrant.
pub fn circle_rect_overlap(xmin: f64, ymin: f64, xmax: f64, ymax: f64, r: f64) -> f64 {
    if r <= 0.0 || xmax <= xmin || ymax <= ymin {
        return 0.0;
    }

    if xmin < 0.0 && xmax > 0.0 {
        return circle_rect_overlap(xmin, ymin, 0.0, ymax, r)
            + circle_rect_overlap(0.0, ymin, xmax, ymax, r);
    }
    if ymin < 0.0 && ymax > 0.0 {
        return circle_rect_overlap(xmin, ymin, xmax, 0.0, r)
            + circle_rect_overlap(xmin, 0.0, xmax, ymax, r);
    }

    let (x0, x1) = if xmin >= 0.0 { (xmin, xmax) } else { (-xmax, -xmin) };
    let (y0, y1) = if ymin >= 0.0 { (ymin, ymax) } else { (-ymax, -ymin) };
    overlap_core(x0, y0, x1, y1, r)
}

/// Fraction of the unit pixel centred at `(dx, dy)` (relative to the circle
/// centre) that lies within radius `r`.
pub fn pixel_fraction(dx: f64, dy: f64, r: f64) -> f64 {
    let near_x = (dx.abs() - 0.5).max(0.0);
    let near_y = (dy.abs() - 0.5).max(0.0);
    if near_x * near_x + near_y * near_y >= r * r {
        return 0.0;
    }
    let far_x = dx.abs() + 0.5;
    let far_y = dy.abs() + 0.5;
    if far_x * far_x + far_y * far_y <= r * r {
        return 1.0;
    }
    circle_rect_overlap(dx - 0.5, dy - 0.5, dx + 0.5, dy + 0.5, r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_full_circle_inside_rect() {
        let a = circle_rect_overlap(-5.0, -5.0, 5.0, 5.0, 2.0);
        assert!((a - PI * 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_quarter_circle() {
        let a = circle_rect_overlap(0.0, 0.0, 10.0, 10.0, 3.0);
        assert!((a - PI * 9.0 / 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_rect_inside_circle() {
        assert!((circle_rect_overlap(0.1, 0.1, 0.6, 0.9, 5.0) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_disjoint() {
        assert_eq!(circle_rect_overlap(3.0, 3.0, 4.0, 4.0, 1.0), 0.0);
    }

    #[test]
    fn test_half_plane_strip() {
        // Strip x in [0, 1] through a unit circle: 2 * integral of sqrt(1 - x^2).
        let a = circle_rect_overlap(0.0, -2.0, 1.0, 2.0, 1.0);
        assert!((a - PI / 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_pixel_grid_sums_to_circle_area() {
        let r = 3.7;
        let (cx, cy) = (0.3, -0.2);
        let mut total = 0.0;
        for y in -6..=6 {
            for x in -6..=6 {
                total += pixel_fraction(x as f64 - cx, y as f64 - cy, r);
            }
        }
        assert!((total - PI * r * r).abs() < 1e-9);
    }
}
