//! Contact geometry and impulse resolution for discs and static boxes.
//!
//! Pure functions on plain structs; the ECS systems gather component data
//! into these, solve, and write the results back.
//!
//! Normal convention: a `Contact` normal points from the first shape toward
//! the second. Resolving pushes the first shape along `-n` and the second
//! along `+n`. For disc-box contacts the box is first, so the disc moves
//! along `+n`.

/// Fraction of penetration removed per position iteration.
const POSITION_CORRECTION_PERCENT: f32 = 0.8;
/// Penetration allowed without correction, keeps resting contacts stable.
const POSITION_CORRECTION_SLOP: f32 = 0.005;
/// Below this distance two centers are treated as coincident.
const COINCIDENT_EPSILON: f32 = 1e-6;

/// A circle in motion. `inv_mass == 0` makes it immovable.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Disc {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub inv_mass: f32,
}

impl Disc {
    /// Advance the position by one step of the current velocity.
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        self.x += self.vx * dt;
        self.y += self.vy * dt;
    }
}

/// A static axis-aligned box given by center and half-extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub cx: f32,
    pub cy: f32,
    pub hx: f32,
    pub hy: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub nx: f32,
    pub ny: f32,
    pub depth: f32,
}

/// Contact between a static box and a disc, normal pointing out of the box.
pub fn disc_box_contact(disc: &Disc, aabb: &Aabb) -> Option<Contact> {
    let closest_x = disc.x.clamp(aabb.cx - aabb.hx, aabb.cx + aabb.hx);
    let closest_y = disc.y.clamp(aabb.cy - aabb.hy, aabb.cy + aabb.hy);
    let dx = disc.x - closest_x;
    let dy = disc.y - closest_y;
    let dist_sq = dx * dx + dy * dy;

    if dist_sq >= disc.radius * disc.radius {
        return None;
    }

    if dist_sq > COINCIDENT_EPSILON * COINCIDENT_EPSILON {
        let dist = dist_sq.sqrt();
        return Some(Contact {
            nx: dx / dist,
            ny: dy / dist,
            depth: disc.radius - dist,
        });
    }

    // Center inside the box: leave through the nearest face.
    let local_x = disc.x - aabb.cx;
    let local_y = disc.y - aabb.cy;
    let pen_x = aabb.hx - local_x.abs();
    let pen_y = aabb.hy - local_y.abs();
    if pen_x < pen_y {
        Some(Contact {
            nx: local_x.signum(),
            ny: 0.0,
            depth: pen_x + disc.radius,
        })
    } else {
        Some(Contact {
            nx: 0.0,
            ny: local_y.signum(),
            depth: pen_y + disc.radius,
        })
    }
}

/// Contact between two discs, normal pointing from `a` to `b`.
pub fn disc_disc_contact(a: &Disc, b: &Disc) -> Option<Contact> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let dist_sq = dx * dx + dy * dy;
    let min_dist = a.radius + b.radius;

    if dist_sq >= min_dist * min_dist {
        return None;
    }

    let dist = dist_sq.sqrt();
    let (nx, ny) = if dist > COINCIDENT_EPSILON {
        (dx / dist, dy / dist)
    } else {
        (0.0, 1.0)
    };

    Some(Contact {
        nx,
        ny,
        depth: min_dist - dist,
    })
}

/// Impulse response between two discs, with Coulomb friction.
pub fn resolve_velocity(a: &mut Disc, b: &mut Disc, contact: &Contact, restitution: f32, friction: f32) {
    let inv_mass_sum = a.inv_mass + b.inv_mass;
    if inv_mass_sum <= 0.0 {
        return;
    }

    let rvx = b.vx - a.vx;
    let rvy = b.vy - a.vy;
    let vn = rvx * contact.nx + rvy * contact.ny;
    if vn >= 0.0 {
        return;
    }

    let j = -(1.0 + restitution) * vn / inv_mass_sum;
    a.vx -= contact.nx * j * a.inv_mass;
    a.vy -= contact.ny * j * a.inv_mass;
    b.vx += contact.nx * j * b.inv_mass;
    b.vy += contact.ny * j * b.inv_mass;

    if friction <= 0.0 {
        return;
    }

    let (tx, ty) = (-contact.ny, contact.nx);
    let vt = (b.vx - a.vx) * tx + (b.vy - a.vy) * ty;
    let max_friction = friction * j;
    let jt = (-vt / inv_mass_sum).clamp(-max_friction, max_friction);
    a.vx -= tx * jt * a.inv_mass;
    a.vy -= ty * jt * a.inv_mass;
    b.vx += tx * jt * b.inv_mass;
    b.vy += ty * jt * b.inv_mass;
}

/// Impulse response of a disc against a static box.
pub fn resolve_velocity_static(disc: &mut Disc, contact: &Contact, restitution: f32, friction: f32) {
    if disc.inv_mass <= 0.0 {
        return;
    }

    let vn = disc.vx * contact.nx + disc.vy * contact.ny;
    if vn >= 0.0 {
        return;
    }

    let dvn = -(1.0 + restitution) * vn;
    disc.vx += contact.nx * dvn;
    disc.vy += contact.ny * dvn;

    if friction <= 0.0 {
        return;
    }

    let (tx, ty) = (-contact.ny, contact.nx);
    let vt = disc.vx * tx + disc.vy * ty;
    let max_friction = friction * dvn;
    let dvt = (-vt).clamp(-max_friction, max_friction);
    disc.vx += tx * dvt;
    disc.vy += ty * dvt;
}

/// Split positional correction between two discs by inverse mass.
pub fn correct_position(a: &mut Disc, b: &mut Disc, contact: &Contact) {
    let inv_mass_sum = a.inv_mass + b.inv_mass;
    if inv_mass_sum <= 0.0 {
        return;
    }

    let magnitude = (contact.depth - POSITION_CORRECTION_SLOP).max(0.0) / inv_mass_sum
        * POSITION_CORRECTION_PERCENT;
    a.x -= contact.nx * magnitude * a.inv_mass;
    a.y -= contact.ny * magnitude * a.inv_mass;
    b.x += contact.nx * magnitude * b.inv_mass;
    b.y += contact.ny * magnitude * b.inv_mass;
}

/// Push a disc out of a static box.
pub fn correct_position_static(disc: &mut Disc, contact: &Contact) {
    if disc.inv_mass <= 0.0 {
        return;
    }

    let magnitude = (contact.depth - POSITION_CORRECTION_SLOP).max(0.0) * POSITION_CORRECTION_PERCENT;
    disc.x += contact.nx * magnitude;
    disc.y += contact.ny * magnitude;
}

/// Mutable references to two distinct elements, `i < j`.
#[inline]
pub fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert!(i < j, "pair_mut requires i < j");
    let (lo, hi) = items.split_at_mut(j);
    (&mut lo[i], &mut hi[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disc(x: f32, y: f32, vx: f32, vy: f32) -> Disc {
        Disc {
            x,
            y,
            vx,
            vy,
            radius: 1.0,
            inv_mass: 1.0,
        }
    }

    #[test]
    fn test_disc_disc_contact() {
        let a = disc(0.0, 0.0, 0.0, 0.0);
        let b = disc(1.5, 0.0, 0.0, 0.0);
        let c = disc_disc_contact(&a, &b).unwrap();
        assert!((c.nx - 1.0).abs() < 1e-6);
        assert!((c.depth - 0.5).abs() < 1e-6);

        let far = disc(2.5, 0.0, 0.0, 0.0);
        assert!(disc_disc_contact(&a, &far).is_none());
    }

    #[test]
    fn test_coincident_discs_get_default_normal() {
        let a = disc(1.0, 1.0, 0.0, 0.0);
        let b = disc(1.0, 1.0, 0.0, 0.0);
        let c = disc_disc_contact(&a, &b).unwrap();
        assert_eq!((c.nx, c.ny), (0.0, 1.0));
        assert!((c.depth - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_elastic_head_on_swaps_velocities() {
        let mut a = disc(0.0, 0.0, 1.0, 0.0);
        let mut b = disc(1.9, 0.0, -1.0, 0.0);
        let c = disc_disc_contact(&a, &b).unwrap();
        resolve_velocity(&mut a, &mut b, &c, 1.0, 0.0);
        assert!((a.vx + 1.0).abs() < 1e-5);
        assert!((b.vx - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_separating_discs_untouched() {
        let mut a = disc(0.0, 0.0, -1.0, 0.0);
        let mut b = disc(1.5, 0.0, 1.0, 0.0);
        let c = disc_disc_contact(&a, &b).unwrap();
        resolve_velocity(&mut a, &mut b, &c, 1.0, 0.5);
        assert_eq!(a.vx, -1.0);
        assert_eq!(b.vx, 1.0);
    }

    #[test]
    fn test_immovable_partner_keeps_velocity() {
        let mut p = disc(0.0, 0.0, 2.0, 0.0);
        let mut wall = Disc {
            inv_mass: 0.0,
            ..disc(1.8, 0.0, 0.0, 0.0)
        };
        let c = disc_disc_contact(&p, &wall).unwrap();
        resolve_velocity(&mut p, &mut wall, &c, 0.0, 0.0);
        assert!(p.vx.abs() < 1e-6);
        assert_eq!(wall.vx, 0.0);
    }

    #[test]
    fn test_disc_resting_on_box() {
        let ground = Aabb {
            cx: 0.0,
            cy: -10.0,
            hx: 200.0,
            hy: 10.0,
        };
        let mut d = disc(0.0, 0.5, 0.0, -3.0);
        let c = disc_box_contact(&d, &ground).unwrap();
        assert!((c.ny - 1.0).abs() < 1e-6);
        assert!((c.depth - 0.5).abs() < 1e-6);

        resolve_velocity_static(&mut d, &c, 0.0, 0.2);
        assert!(d.vy.abs() < 1e-6);

        correct_position_static(&mut d, &c);
        assert!(d.y > 0.5);
    }

    #[test]
    fn test_center_inside_box_exits_nearest_face() {
        let wall = Aabb {
            cx: 50.0,
            cy: 0.0,
            hx: 10.0,
            hy: 200.0,
        };
        let d = disc(42.0, 0.0, 0.0, 0.0);
        let c = disc_box_contact(&d, &wall).unwrap();
        assert_eq!((c.nx, c.ny), (-1.0, 0.0));
        assert!((c.depth - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_friction_is_clamped() {
        let floor = Aabb {
            cx: 0.0,
            cy: -1.0,
            hx: 10.0,
            hy: 1.0,
        };
        let mut d = disc(0.0, 0.9, 10.0, -1.0);
        let c = disc_box_contact(&d, &floor).unwrap();
        resolve_velocity_static(&mut d, &c, 0.0, 0.5);
        // Normal impulse removes 1.0 of vy, friction removes at most 0.5 of vx.
        assert!(d.vy.abs() < 1e-6);
        assert!((d.vx - 9.5).abs() < 1e-5);
    }

    #[test]
    fn test_position_correction_split() {
        let mut a = disc(0.0, 0.0, 0.0, 0.0);
        let mut b = disc(1.0, 0.0, 0.0, 0.0);
        let c = disc_disc_contact(&a, &b).unwrap();
        correct_position(&mut a, &mut b, &c);
        assert!(a.x < 0.0);
        assert!(b.x > 1.0);
        assert!((a.x + (b.x - 1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_pair_mut() {
        let mut values = [1, 2, 3, 4];
        let (a, b) = pair_mut(&mut values, 1, 3);
        std::mem::swap(a, b);
        assert_eq!(values, [1, 4, 3, 2]);
    }
}
