use glam::Vec3;

use super::CastHit;
use crate::components::Collider;

/// Sweep a sphere against one collider placed at `center`.
///
/// The swept sphere is reduced to a ray against the collider inflated by the
/// sphere radius. For boxes the inflated shape keeps square corners, which
/// makes corner hits slightly early. That is acceptable for ground probing.
pub fn sphere_cast_collider(
    origin: Vec3,
    radius: f32,
    direction: Vec3,
    max_distance: f32,
    center: Vec3,
    collider: &Collider,
) -> Option<CastHit> {
    let dir = direction.try_normalize()?;
    if max_distance < 0.0 {
        return None;
    }

    let (t, normal) = match *collider {
        Collider::Sphere { radius: r } => {
            let t = ray_sphere_entry(origin, dir, center, r + radius)?;
            let normal = (origin + dir * t - center).try_normalize().unwrap_or(-dir);
            (t, normal)
        }
        Collider::Box { half_extents } => {
            let inflated = half_extents + Vec3::splat(radius);
            let t = ray_aabb_entry(origin, dir, center, inflated)?;
            (t, box_face_normal(origin + dir * t - center, inflated))
        }
        Collider::Plane { normal, offset } => {
            let n = normal.try_normalize()?;
            (ray_plane_entry(origin, dir, n, offset + radius)?, n)
        }
    };

    if t > max_distance {
        return None;
    }
    let hit_center = origin + dir * t;
    Some(CastHit {
        distance: t,
        point: hit_center - normal * radius,
        normal,
    })
}

/// Penetration of a sphere at `position` into a collider at `center`.
/// Returns the push-out normal and depth when they overlap.
pub(crate) fn sphere_overlap(
    position: Vec3,
    radius: f32,
    center: Vec3,
    collider: &Collider,
) -> Option<(Vec3, f32)> {
    match *collider {
        Collider::Sphere { radius: r } => {
            let diff = position - center;
            let dist = diff.length();
            let depth = r + radius - dist;
            if depth <= 0.0 {
                return None;
            }
            let normal = if dist > 1e-6 { diff / dist } else { Vec3::Y };
            Some((normal, depth))
        }
        Collider::Plane { normal, offset } => {
            let n = normal.try_normalize()?;
            let depth = radius - (position.dot(n) - offset);
            (depth > 0.0).then_some((n, depth))
        }
        Collider::Box { half_extents } => {
            let min = center - half_extents;
            let max = center + half_extents;
            let closest = position.clamp(min, max);
            let diff = position - closest;
            let dist = diff.length();
            if dist > 1e-6 {
                let depth = radius - dist;
                return (depth > 0.0).then_some((diff / dist, depth));
            }
            // Centre inside the box: leave through the nearest face.
            let local = position - center;
            let gaps = half_extents - local.abs();
            let axis = if gaps.x <= gaps.y && gaps.x <= gaps.z {
                0
            } else if gaps.y <= gaps.z {
                1
            } else {
                2
            };
            let mut normal = Vec3::ZERO;
            normal[axis] = if local[axis] >= 0.0 { 1.0 } else { -1.0 };
            Some((normal, gaps[axis] + radius))
        }
    }
}

fn ray_sphere_entry(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let c = oc.dot(oc) - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }
    let b = oc.dot(dir);
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let t = -b - discriminant.sqrt();
    (t >= 0.0).then_some(t)
}

fn ray_plane_entry(origin: Vec3, dir: Vec3, normal: Vec3, offset: f32) -> Option<f32> {
    let separation = origin.dot(normal) - offset;
    if separation <= 0.0 {
        return Some(0.0);
    }
    let approach = dir.dot(normal);
    if approach >= 0.0 {
        return None;
    }
    Some(separation / -approach)
}

fn ray_aabb_entry(origin: Vec3, dir: Vec3, center: Vec3, half: Vec3) -> Option<f32> {
    let min = center - half;
    let max = center + half;
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;

    for axis in 0..3 {
        if dir[axis].abs() < 1e-8 {
            if origin[axis] < min[axis] || origin[axis] > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / dir[axis];
        let t1 = (min[axis] - origin[axis]) * inv;
        let t2 = (max[axis] - origin[axis]) * inv;
        t_enter = t_enter.max(t1.min(t2));
        t_exit = t_exit.min(t1.max(t2));
    }

    if t_exit < t_enter.max(0.0) {
        return None;
    }
    // Ray starts inside the box.
    Some(t_enter.max(0.0))
}

fn box_face_normal(local: Vec3, half: Vec3) -> Vec3 {
    let q = local / half.max(Vec3::splat(1e-6));
    let a = q.abs();
    if a.y >= a.x && a.y >= a.z {
        Vec3::new(0.0, q.y.signum(), 0.0)
    } else if a.x >= a.z {
        Vec3::new(q.x.signum(), 0.0, 0.0)
    } else {
        Vec3::new(0.0, 0.0, q.z.signum())
    }
}
