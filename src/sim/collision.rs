//! Overlap test shared by every combat rule
//!
//! One formula covers all entity pairings. The probe box (`a`) is
//! bullet-sized, 10 wide by 20 tall; the target box (`b`) is uniformly
//! 40 by 40 - even when the probe is a 40-wide ship or the target is
//! another bullet. The resulting test is asymmetric and that asymmetry is
//! load-bearing: call sites pass the attacking/moving entity first, and
//! any "corrected" symmetric AABB changes which grazing shots land.

use glam::Vec2;

use crate::consts::{BULLET_HEIGHT, BULLET_WIDTH, SHIP_SIZE};

/// True iff the probe box at `a` overlaps the target box at `b`.
///
/// Half-open bounds; positions name the top-left corner.
#[inline]
pub fn overlaps(a: Vec2, b: Vec2) -> bool {
    a.x < b.x + SHIP_SIZE
        && a.x + BULLET_WIDTH > b.x
        && a.y < b.y + SHIP_SIZE
        && a.y + BULLET_HEIGHT > b.y
}
