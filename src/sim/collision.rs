//! Collision detection between the ship and falling objects
//!
//! Hit boxes are axis-aligned and tested with strict inequalities, so boxes
//! that only touch along an edge do not collide. The ship's hit box is
//! deliberately narrower than its sprite.

use glam::Vec2;

use crate::consts::*;

/// Axis-aligned overlap of a ship at `ship` against an object anchored at `obj`.
///
/// The ship box spans `reach` past its position; the object box spans `extent`.
#[inline]
fn overlaps(ship: Vec2, reach: Vec2, obj: Vec2, extent: Vec2) -> bool {
    ship.y < obj.y + extent.y
        && ship.y + reach.y > obj.y
        && ship.x + reach.x > obj.x
        && ship.x < obj.x + extent.x
}

/// Check whether the ship hits an asteroid
pub fn ship_hits_obstacle(ship: Vec2, obstacle: Vec2) -> bool {
    overlaps(
        ship,
        Vec2::new(SHIP_HIT_REACH_X, SHIP_HIT_REACH_Y),
        obstacle,
        Vec2::new(OBSTACLE_HIT_WIDTH, OBSTACLE_HIT_DEPTH),
    )
}

/// Check whether the ship picks up a coin
pub fn ship_hits_coin(ship: Vec2, coin: Vec2) -> bool {
    overlaps(
        ship,
        Vec2::new(SHIP_HIT_REACH_X, SHIP_HIT_REACH_Y),
        coin,
        Vec2::new(COIN_HIT_WIDTH, COIN_HIT_DEPTH),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obstacle_overlap() {
        // Ship at the center of a 1000x2000 screen, asteroid just below-left
        assert!(ship_hits_obstacle(
            Vec2::new(500.0, 1000.0),
            Vec2::new(450.0, 1050.0)
        ));
    }

    #[test]
    fn test_obstacle_edges_are_exclusive() {
        let ship = Vec2::new(500.0, 1000.0);
        // Asteroid bottom edge level with the ship: 1000 < 900 + 100 is false
        assert!(!ship_hits_obstacle(ship, Vec2::new(450.0, 900.0)));
        // Asteroid top edge at ship.y + 100
        assert!(!ship_hits_obstacle(ship, Vec2::new(450.0, 1100.0)));
        // Asteroid left edge at ship.x + 50
        assert!(!ship_hits_obstacle(ship, Vec2::new(550.0, 1000.0)));
        // Asteroid right edge at ship.x
        assert!(!ship_hits_obstacle(ship, Vec2::new(300.0, 1000.0)));
        // One pixel inside each edge
        assert!(ship_hits_obstacle(ship, Vec2::new(450.0, 901.0)));
        assert!(ship_hits_obstacle(ship, Vec2::new(549.0, 1000.0)));
        assert!(ship_hits_obstacle(ship, Vec2::new(301.0, 1000.0)));
    }

    #[test]
    fn test_coin_box_is_narrower_than_obstacle() {
        let ship = Vec2::new(500.0, 1000.0);
        // 150 px to the left: inside an asteroid's 200 wide box, outside a coin's 100
        let left = Vec2::new(350.0, 1000.0);
        assert!(ship_hits_obstacle(ship, left));
        assert!(!ship_hits_coin(ship, left));
        assert!(ship_hits_coin(ship, Vec2::new(401.0, 1000.0)));
    }
}
