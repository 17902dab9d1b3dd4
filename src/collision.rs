//! Pairwise polygon collision over the live body set.
//!
//! Every edge of one body is tested against every edge of the other, with no
//! broad phase. That is O(n^2 * eA * eB) per tick, which is fine at the body
//! and edge counts this game runs (tens of each); revisit only if the entity
//! count grows by orders of magnitude.

use crate::entities::{Body, Contact};
use crate::shapes::points_to_lines;
use crate::types::lines_intersecting;

/// True iff any edge of `a` crosses any edge of `b`. Collision always treats
/// point lists as closed rings, even the ship's disjoint glyph.
pub fn bodies_colliding(a: &Body, b: &Body) -> bool {
    if a.id() == b.id() {
        return false;
    }
    let a_lines = points_to_lines(a.points(), true);
    let b_lines = points_to_lines(b.points(), true);
    a_lines
        .iter()
        .any(|la| b_lines.iter().any(|lb| lines_intersecting(*la, *lb)))
}

/// Detects every colliding unordered pair, as contact snapshots.
///
/// The full pair list is computed before any resolver runs, so resolution of
/// one pair never hides another pair found in the same tick.
pub fn colliding_pairs(bodies: &[Body]) -> Vec<(Contact, Contact)> {
    let mut pairs = Vec::new();
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            if bodies_colliding(&bodies[i], &bodies[j]) {
                pairs.push((bodies[i].contact(), bodies[j].contact()));
            }
        }
    }
    pairs
}
