use baize_engine::{EntityId, PhysicsWorld};

use crate::ball::Ball;

/// Live balls stored in a flat Vec. Order carries no meaning.
///
/// Every ball owns one body in the physics world; the registry releases that
/// body before the ball leaves the Vec.
pub struct BallRegistry {
    balls: Vec<Ball>,
}

impl BallRegistry {
    pub fn new() -> Self {
        Self {
            balls: Vec::with_capacity(32),
        }
    }

    /// Add a ball. At most one cue ball may be present.
    pub fn add(&mut self, ball: Ball) {
        debug_assert!(
            !(ball.is_cue && self.cue().is_some()),
            "second cue ball added"
        );
        self.balls.push(ball);
    }

    /// Release the body and swap-remove the ball at `index`.
    pub fn remove_at(&mut self, index: usize, physics: &mut PhysicsWorld) -> Ball {
        physics.remove_body(&self.balls[index].body);
        self.balls.swap_remove(index)
    }

    /// Visit every ball once, removing those `visit` asks for.
    ///
    /// Runs in reverse index order so a swap-remove only moves balls that were
    /// already visited. Removed balls are handed to `on_remove` together with
    /// the payload `visit` returned.
    pub fn sweep<T>(
        &mut self,
        physics: &mut PhysicsWorld,
        mut visit: impl FnMut(&Ball, &mut PhysicsWorld) -> Option<T>,
        mut on_remove: impl FnMut(Ball, T),
    ) {
        for index in (0..self.balls.len()).rev() {
            if let Some(payload) = visit(&self.balls[index], physics) {
                let ball = self.remove_at(index, physics);
                on_remove(ball, payload);
            }
        }
    }

    /// Release every body and empty the registry.
    pub fn clear(&mut self, physics: &mut PhysicsWorld) {
        for ball in self.balls.drain(..) {
            physics.remove_body(&ball.body);
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    pub fn cue(&self) -> Option<&Ball> {
        self.balls.iter().find(|b| b.is_cue)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter()
    }

    /// Balls other than the cue ball.
    pub fn object_count(&self) -> usize {
        self.balls.iter().filter(|b| !b.is_cue).count()
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }
}

impl Default for BallRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ball::BallColor;
    use baize_engine::ColliderMaterial;
    use glam::Vec2;

    fn spawn(physics: &mut PhysicsWorld, id: u32, x: f32, color: BallColor) -> Ball {
        let body = physics.create_circle(EntityId(id), Vec2::new(x, 0.0), 5.0, ColliderMaterial::default());
        Ball::object(EntityId(id), body, color)
    }

    fn filled(physics: &mut PhysicsWorld, n: u32) -> BallRegistry {
        let mut reg = BallRegistry::new();
        for i in 0..n {
            let ball = spawn(physics, i + 1, i as f32 * 20.0, BallColor::Red);
            reg.add(ball);
        }
        reg
    }

    #[test]
    fn add_get_and_cue_lookup() {
        let mut physics = PhysicsWorld::new(Vec2::ZERO);
        let mut reg = filled(&mut physics, 2);
        assert!(reg.cue().is_none());

        let body = physics.create_circle(EntityId(9), Vec2::new(-50.0, 0.0), 5.0, ColliderMaterial::default());
        reg.add(Ball::cue(EntityId(9), body));
        assert_eq!(reg.cue().map(|b| b.id), Some(EntityId(9)));
        assert_eq!(reg.get(EntityId(2)).map(|b| b.color), Some(BallColor::Red));
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.object_count(), 2);
    }

    #[test]
    fn remove_at_releases_body_first() {
        let mut physics = PhysicsWorld::new(Vec2::ZERO);
        let mut reg = filled(&mut physics, 3);
        let removed = reg.remove_at(0, &mut physics);
        assert!(!physics.contains(&removed.body));
        assert_eq!(physics.body_count(), 2);
        assert_eq!(reg.len(), 2);
        assert!(reg.get(removed.id).is_none());
    }

    #[test]
    fn sweep_visits_every_ball_once_while_removing() {
        let mut physics = PhysicsWorld::new(Vec2::ZERO);
        let mut reg = filled(&mut physics, 6);

        let mut visited = Vec::new();
        let mut removed = Vec::new();
        reg.sweep(
            &mut physics,
            |ball, _| {
                visited.push(ball.id.0);
                (ball.id.0 % 2 == 0).then_some(ball.id.0 * 10)
            },
            |ball, payload| removed.push((ball.id.0, payload)),
        );

        visited.sort_unstable();
        assert_eq!(visited, vec![1, 2, 3, 4, 5, 6]);
        removed.sort_unstable();
        assert_eq!(removed, vec![(2, 20), (4, 40), (6, 60)]);
        assert_eq!(reg.len(), 3);
        assert_eq!(physics.body_count(), 3);
        assert!(reg.iter().all(|b| b.id.0 % 2 == 1));
    }

    #[test]
    fn sweep_can_empty_the_registry() {
        let mut physics = PhysicsWorld::new(Vec2::ZERO);
        let mut reg = filled(&mut physics, 4);
        let mut count = 0;
        reg.sweep(&mut physics, |_, _| Some(()), |_, ()| count += 1);
        assert_eq!(count, 4);
        assert!(reg.is_empty());
        assert_eq!(physics.body_count(), 0);
    }

    #[test]
    fn clear_releases_every_body() {
        let mut physics = PhysicsWorld::new(Vec2::ZERO);
        let mut reg = filled(&mut physics, 5);
        reg.clear(&mut physics);
        assert!(reg.is_empty());
        assert_eq!(physics.body_count(), 0);
        reg.clear(&mut physics);
        assert!(reg.is_empty());
    }
}
