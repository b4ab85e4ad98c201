use nalgebra::Vector3;

use super::body::Shape;

// ---------------------------------------------------------------------------
// Ray / shape intersection
// ---------------------------------------------------------------------------

/// Distance along a unit ray to the first intersection with `shape` centred
/// at `center`, or `None` if the ray misses. Origins inside a shape hit at 0.
pub fn intersect(origin: &Vector3<f64>, dir: &Vector3<f64>, shape: &Shape, center: &Vector3<f64>) -> Option<f64> {
    match shape {
        Shape::Sphere { radius } => ray_sphere(origin, dir, center, *radius),
        Shape::Cuboid { half_extents } => ray_aabb(origin, dir, &(center - half_extents), &(center + half_extents)),
    }
}

fn ray_sphere(origin: &Vector3<f64>, dir: &Vector3<f64>, center: &Vector3<f64>, radius: f64) -> Option<f64> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.norm_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t >= 0.0).then_some(t)
}

/// Slab test.
fn ray_aabb(origin: &Vector3<f64>, dir: &Vector3<f64>, min: &Vector3<f64>, max: &Vector3<f64>) -> Option<f64> {
    let mut t_near = 0.0_f64;
    let mut t_far = f64::INFINITY;
    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        if d.abs() < 1e-12 {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (min[axis] - o) * inv;
        let mut t1 = (max[axis] - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_near = t_near.max(t0);
        t_far = t_far.min(t1);
        if t_near > t_far {
            return None;
        }
    }
    Some(t_near)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_hit_distance() {
        let t = intersect(
            &Vector3::zeros(),
            &Vector3::z(),
            &Shape::Sphere { radius: 0.5 },
            &Vector3::new(0.0, 0.0, 3.0),
        );
        assert!((t.unwrap() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn sphere_behind_origin_misses() {
        let t = intersect(
            &Vector3::zeros(),
            &Vector3::z(),
            &Shape::Sphere { radius: 0.5 },
            &Vector3::new(0.0, 0.0, -3.0),
        );
        assert!(t.is_none());
    }

    #[test]
    fn box_hit_and_miss() {
        let shape = Shape::Cuboid { half_extents: Vector3::new(1.0, 1.0, 1.0) };
        let center = Vector3::new(0.0, 0.0, 5.0);
        let hit = intersect(&Vector3::zeros(), &Vector3::z(), &shape, &center);
        assert!((hit.unwrap() - 4.0).abs() < 1e-12);

        let miss = intersect(&Vector3::new(3.0, 0.0, 0.0), &Vector3::z(), &shape, &center);
        assert!(miss.is_none());
    }

    #[test]
    fn origin_inside_hits_at_zero() {
        let shape = Shape::Sphere { radius: 1.0 };
        let t = intersect(&Vector3::zeros(), &Vector3::x(), &shape, &Vector3::zeros());
        assert_eq!(t, Some(0.0));
    }
}
