//! Collision detection and response for axis-aligned rectangles
//!
//! Only vertical contacts are resolved. Side hits against platforms are
//! left alone, so horizontal velocity is never corrected on wall contact.

use super::level::{Entity, EntityKind};
use super::rect::Rect;
use super::state::PlayerState;

/// What a single platform did to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Landed on top: snapped to the surface and grounded
    Landed,
    /// Hit the underside while rising: snapped below and stopped
    Bumped,
    /// Overlapping, but neither rule applied (side or resting contact)
    Unresolved,
}

/// Resolve one platform against the player's already-integrated state.
///
/// The pre-move edge is recovered from the current `vy`, which is the
/// displacement applied this frame.
pub fn resolve_platform(player: &mut PlayerState, platform: &Rect) -> Option<Contact> {
    if !player.rect().overlaps(platform) {
        return None;
    }

    let vy = player.velocity.y;
    let h = player.size.y;
    let y = player.position.y;

    if vy > 0.0 && y + h - vy <= platform.top() {
        player.position.y = platform.top() - h;
        player.velocity.y = 0.0;
        player.grounded = true;
        Some(Contact::Landed)
    } else if vy < 0.0 && y - vy >= platform.bottom() {
        player.position.y = platform.bottom();
        player.velocity.y = 0.0;
        Some(Contact::Bumped)
    } else {
        Some(Contact::Unresolved)
    }
}

/// Clear `grounded`, then resolve every platform in level order. Later
/// platforms see the position left by earlier ones.
pub fn resolve_platforms(player: &mut PlayerState, platforms: &[Entity]) {
    player.grounded = false;
    for platform in platforms {
        resolve_platform(player, &platform.rect);
    }
}

/// Id of the first hazard overlapping `player`, in level order
pub fn first_hazard_hit(player: &Rect, hazards: &[Entity]) -> Option<u32> {
    hazards
        .iter()
        .filter(|h| h.kind.is_hazard())
        .find(|h| player.overlaps(&h.rect))
        .map(|h| h.id)
}

/// Mark every uncollected, overlapping collectible as collected.
/// Returns their ids in level order.
pub fn collect_overlapping(player: &Rect, collectibles: &mut [Entity]) -> Vec<u32> {
    let mut picked = Vec::new();
    for entity in collectibles.iter_mut() {
        if let EntityKind::Collectible { ref mut collected } = entity.kind {
            if *collected || !player.overlaps(&entity.rect) {
                continue;
            }
            *collected = true;
            picked.push(entity.id);
        }
    }
    picked
}

/// Whether the player stands in an open portal
pub fn portal_reached(player: &Rect, portal: &Entity, collected: u32, required: u32) -> bool {
    collected >= required && player.overlaps(&portal.rect)
}
