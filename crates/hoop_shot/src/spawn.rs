use bevy::math::Vec2;
use strum::{Display, EnumIter, IntoEnumIterator};

/// Edge of the play area the ball enters from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumIter)]
pub enum Edge {
    #[default]
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        rng.choice(Self::iter()).unwrap_or_default()
    }

    /// Position of a `size` square resting on this edge. `along` in `[0, 1)`
    /// slides it across the free span of the edge.
    pub fn position(self, along: f32, play_area: Vec2, size: f32) -> Vec2 {
        let free = play_area - Vec2::splat(size);
        match self {
            Self::Top => Vec2::new(along * free.x, 0.0),
            Self::Right => Vec2::new(free.x, along * free.y),
            Self::Bottom => Vec2::new(along * free.x, free.y),
            Self::Left => Vec2::new(0.0, along * free.y),
        }
    }
}

/// Picks an edge uniformly, then a uniform spot along it.
pub fn spawn_position(rng: &mut fastrand::Rng, play_area: Vec2, size: f32) -> (Edge, Vec2) {
    let edge = Edge::random(rng);
    (edge, edge.position(rng.f32(), play_area, size))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAY_AREA: Vec2 = Vec2::new(360.0, 640.0);
    const SIZE: f32 = 60.0;

    fn within_bounds(position: Vec2) -> bool {
        (0.0..=PLAY_AREA.x - SIZE).contains(&position.x)
            && (0.0..=PLAY_AREA.y - SIZE).contains(&position.y)
    }

    #[test]
    fn every_edge_spawns_inside_the_play_area() {
        let mut rng = fastrand::Rng::with_seed(7);
        for edge in Edge::iter() {
            for _ in 0..200 {
                let position = edge.position(rng.f32(), PLAY_AREA, SIZE);
                assert!(within_bounds(position), "{edge} spawned out of bounds at {position}");
            }
        }
    }

    #[test]
    fn edges_pin_the_perpendicular_coordinate() {
        assert_eq!(Edge::Top.position(0.5, PLAY_AREA, SIZE), Vec2::new(150.0, 0.0), "top");
        assert_eq!(Edge::Right.position(0.5, PLAY_AREA, SIZE), Vec2::new(300.0, 290.0), "right");
        assert_eq!(Edge::Bottom.position(0.0, PLAY_AREA, SIZE), Vec2::new(0.0, 580.0), "bottom");
        assert_eq!(Edge::Left.position(0.25, PLAY_AREA, SIZE), Vec2::new(0.0, 145.0), "left");
    }

    #[test]
    fn all_edges_are_picked_about_equally() {
        let mut rng = fastrand::Rng::with_seed(42);
        let mut counts = [0_u32; 4];
        for _ in 0..4000 {
            let (edge, position) = spawn_position(&mut rng, PLAY_AREA, SIZE);
            assert!(within_bounds(position), "{edge} spawned out of bounds at {position}");
            let slot = Edge::iter().position(|candidate| candidate == edge);
            if let Some(count) = slot.and_then(|slot| counts.get_mut(slot)) {
                *count += 1;
            }
        }
        for (edge, count) in Edge::iter().zip(counts) {
            assert!((800..1200).contains(&count), "{edge} picked {count} times out of 4000");
        }
    }

    #[test]
    fn position_along_the_edge_spreads_over_the_free_span() {
        let mut rng = fastrand::Rng::with_seed(3);
        let xs: Vec<f32> = (0..1000)
            .map(|_| Edge::Top.position(rng.f32(), PLAY_AREA, SIZE).x)
            .collect();
        let low = xs.iter().filter(|&&x| x < 150.0).count();
        assert!((400..600).contains(&low), "{low} of 1000 in the left half");
        assert!(xs.iter().any(|&x| x > 280.0), "the far end is reachable");
    }
}
