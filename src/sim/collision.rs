//! Bullet/ball collision detection
//!
//! Entities are tested as axis-aligned boxes in play-area coordinates
//! (origin at the top-left, y grows downward).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box from its top-left corner and size
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    /// Strict overlap: boxes that only share an edge do not collide
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// A resolved bullet/ball pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    pub bullet: u32,
    pub ball: u32,
}

/// Resolve one sweep over all bullet/ball pairs.
///
/// Bullets are visited in order and each takes the first ball it overlaps.
/// A ball claimed earlier in the sweep is skipped, so every id appears in at
/// most one hit.
pub fn find_hits(bullets: &[(u32, Aabb)], balls: &[(u32, Aabb)]) -> Vec<Hit> {
    let mut taken = vec![false; balls.len()];
    let mut hits = Vec::new();

    for &(bullet_id, bullet_box) in bullets {
        let found = balls
            .iter()
            .enumerate()
            .find(|(i, (_, ball_box))| !taken[*i] && bullet_box.overlaps(ball_box));

        if let Some((i, &(ball_id, _))) = found {
            taken[i] = true;
            hits.push(Hit {
                bullet: bullet_id,
                ball: ball_id,
            });
        }
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn boxed(x: f32, y: f32, w: f32, h: f32) -> Aabb {
        Aabb::from_pos_size(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_overlap_and_touching_edges() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&boxed(5.0, 5.0, 10.0, 10.0)));
        // Shared edge only
        assert!(!a.overlaps(&boxed(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&boxed(0.0, 10.0, 10.0, 10.0)));
        // Contained
        assert!(a.overlaps(&boxed(2.0, 2.0, 1.0, 1.0)));
    }

    #[test]
    fn test_one_bullet_two_balls_first_match_wins() {
        let bullets = [(1, boxed(10.0, 10.0, 5.0, 15.0))];
        let balls = [
            (7, boxed(0.0, 0.0, 40.0, 40.0)),
            (8, boxed(5.0, 5.0, 40.0, 40.0)),
        ];
        let hits = find_hits(&bullets, &balls);
        assert_eq!(hits, vec![Hit { bullet: 1, ball: 7 }]);
    }

    #[test]
    fn test_two_bullets_one_ball() {
        let bullets = [
            (1, boxed(10.0, 10.0, 5.0, 15.0)),
            (2, boxed(12.0, 12.0, 5.0, 15.0)),
        ];
        let balls = [(7, boxed(0.0, 0.0, 40.0, 40.0))];
        let hits = find_hits(&bullets, &balls);
        assert_eq!(hits, vec![Hit { bullet: 1, ball: 7 }]);
    }

    #[test]
    fn test_second_bullet_takes_next_ball() {
        let bullets = [
            (1, boxed(10.0, 10.0, 5.0, 15.0)),
            (2, boxed(12.0, 12.0, 5.0, 15.0)),
        ];
        let balls = [
            (7, boxed(0.0, 0.0, 40.0, 40.0)),
            (8, boxed(0.0, 0.0, 40.0, 40.0)),
        ];
        let hits = find_hits(&bullets, &balls);
        assert_eq!(
            hits,
            vec![Hit { bullet: 1, ball: 7 }, Hit { bullet: 2, ball: 8 }]
        );
    }

    fn arb_box() -> impl Strategy<Value = Aabb> {
        (0.0f32..400.0, 0.0f32..600.0, 1.0f32..100.0, 1.0f32..100.0)
            .prop_map(|(x, y, w, h)| boxed(x, y, w, h))
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(a in arb_box(), b in arb_box()) {
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn prop_each_entity_hit_at_most_once(
            bullets in prop::collection::vec(arb_box(), 0..12),
            balls in prop::collection::vec(arb_box(), 0..12),
        ) {
            let bullets: Vec<_> = bullets.into_iter().enumerate().map(|(i, b)| (i as u32, b)).collect();
            let balls: Vec<_> = balls.into_iter().enumerate().map(|(i, b)| (100 + i as u32, b)).collect();
            let hits = find_hits(&bullets, &balls);

            let mut bullet_ids: Vec<_> = hits.iter().map(|h| h.bullet).collect();
            let mut ball_ids: Vec<_> = hits.iter().map(|h| h.ball).collect();
            bullet_ids.dedup();
            ball_ids.sort_unstable();
            ball_ids.dedup();
            prop_assert_eq!(bullet_ids.len(), hits.len());
            prop_assert_eq!(ball_ids.len(), hits.len());
            prop_assert!(hits.len() <= bullets.len().min(balls.len()));

            for hit in &hits {
                let bullet = bullets.iter().find(|(id, _)| *id == hit.bullet).unwrap().1;
                let ball = balls.iter().find(|(id, _)| *id == hit.ball).unwrap().1;
                prop_assert!(bullet.overlaps(&ball));
            }
        }
    }
}
