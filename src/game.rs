//! The world: the ordered body set, the bullet counter, screen wrap, and the
//! collision -> update -> draw tick.

use std::io;

use log::info;
use rand::rngs::StdRng;

use crate::audio::Audio;
use crate::collision;
use crate::entities::{Asteroid, Body, BodyId, BodyKind, Debris, Player, move_to};
use crate::rendering::Renderer;
use crate::terminal_io::Input;
use crate::types::{Point, rect};

/// A mutation requested by a body during its update. Applied by the world
/// after that body's update returns; bodies never splice the set themselves.
pub enum WorldOp {
    Spawn(Body),
    Despawn(BodyId),
}

/// Everything a body may read or request during one update call.
pub struct TickCtx<'a> {
    pub size: Point,
    pub now_ms: u64,
    pub n_bullets: usize,
    pub input: &'a dyn Input,
    pub audio: &'a mut dyn Audio,
    pub ops: &'a mut Vec<WorldOp>,
}

pub struct World {
    size: Point,
    debug: bool,
    bodies: Vec<Body>,
    // Invariant: equals the number of Bullet bodies in `bodies`. Maintained
    // on every add/remove path, never recomputed by scanning.
    n_bullets: usize,
    next_id: BodyId,
    rng: StdRng,
    renderer: Box<dyn Renderer>,
    audio: Box<dyn Audio>,
}

impl World {
    pub fn new(
        size: Point,
        debug: bool,
        renderer: Box<dyn Renderer>,
        audio: Box<dyn Audio>,
        rng: StdRng,
    ) -> Self {
        World {
            size,
            debug,
            bodies: Vec::new(),
            n_bullets: 0,
            next_id: 0,
            rng,
            renderer,
            audio,
        }
    }

    /// The opening layout: four drifting asteroids and the player at center.
    pub fn spawn_initial_scene(&mut self) {
        self.spawn_asteroid(Point::new(0.0, 75.0), 50.0);
        self.spawn_asteroid(Point::new(75.0, 75.0), 30.0);
        self.spawn_asteroid(Point::new(225.0, 75.0), 30.0);
        self.spawn_asteroid(Point::new(150.0, 225.0), 30.0);
        let center = Point::new(self.size.x / 2.0, self.size.y / 2.0);
        self.add_body(Body::Player(Player::new(center, self.debug)));
    }

    pub fn size(&self) -> Point {
        self.size
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn n_bullets(&self) -> usize {
        self.n_bullets
    }

    pub fn count_kind(&self, kind: BodyKind) -> usize {
        self.bodies.iter().filter(|b| b.kind() == kind).count()
    }

    pub fn add_body(&mut self, mut body: Body) -> BodyId {
        self.next_id += 1;
        body.set_id(self.next_id);
        if body.kind() == BodyKind::Bullet {
            self.n_bullets += 1;
        }
        let id = body.id();
        self.bodies.push(body);
        id
    }

    /// Removes a body by id. A no-op when the id is not present, so collision
    /// resolvers may remove the same body twice without harm. Side effects
    /// (explosion sound, debris successor) fire exactly once, on the actual
    /// removal.
    pub fn remove_body(&mut self, id: BodyId) {
        let Some(index) = self.bodies.iter().position(|b| b.id() == id) else {
            return;
        };
        let removed = self.bodies.remove(index);

        match &removed {
            Body::Bullet(_) => self.n_bullets -= 1,
            Body::Asteroid(a) => {
                info!("asteroid {} destroyed (radius {})", id, a.radius);
                self.audio.play_explosion();
            }
            Body::Player(player) => {
                info!("player {} destroyed", id);
                self.audio.play_explosion();
                let debris = Debris::new(player, &mut self.rng);
                self.add_body(Body::Debris(debris));
            }
            Body::Debris(_) => {}
        }
    }

    /// Spawns an asteroid with a fresh jittered outline and drift velocity.
    pub fn spawn_asteroid(&mut self, center: Point, radius: f64) -> BodyId {
        let asteroid = Asteroid::new(center, radius, &mut self.rng);
        self.add_body(Body::Asteroid(asteroid))
    }

    /// Advances the world one frame: collision pass, update pass, draw pass,
    /// always in that order.
    pub fn tick(&mut self, now_ms: u64, input: &dyn Input) -> io::Result<()> {
        // Collision pass. The full pair list is detected before any resolver
        // runs, and both sides of every pair resolve even when an earlier
        // pair already removed a participant.
        let pairs = collision::colliding_pairs(&self.bodies);
        for (a, b) in &pairs {
            a.resolve(b, self);
            b.resolve(a, self);
        }

        // Update pass. Bodies spawned during the collision pass are included
        // this frame; bodies spawned during the update pass wait until the
        // next one. Both get drawn below.
        let ids: Vec<BodyId> = self.bodies.iter().map(|b| b.id()).collect();
        for id in ids {
            let Some(index) = self.bodies.iter().position(|b| b.id() == id) else {
                continue; // removed earlier in this pass
            };
            let mut ops = Vec::new();
            {
                let mut ctx = TickCtx {
                    size: self.size,
                    now_ms,
                    n_bullets: self.n_bullets,
                    input,
                    audio: self.audio.as_mut(),
                    ops: &mut ops,
                };
                self.bodies[index].update(&mut ctx);
            }
            self.apply(ops);
        }

        // Draw pass.
        self.renderer.clear();
        for body in &self.bodies {
            body.draw(self.renderer.as_mut(), self.debug);
        }
        self.renderer.flush()
    }

    fn apply(&mut self, ops: Vec<WorldOp>) {
        for op in ops {
            match op {
                WorldOp::Spawn(body) => {
                    self.add_body(body);
                }
                WorldOp::Despawn(id) => self.remove_body(id),
            }
        }
    }
}

/// Wraps a body to the far side of the screen once its whole polygon has left
/// it and it is still heading away. The horizontal check wins; the vertical
/// one only runs when no horizontal wrap applied. Re-centering mirrors the
/// center coordinate, velocity is untouched.
pub fn wrap_if_off_screen(size: Point, center: &mut Point, points: &mut [Point], velocity: Point) {
    let screen = rect(Point::new(size.x / 2.0, size.y / 2.0), size);

    let beyond_left = points.iter().all(|p| p.x <= screen.l);
    let beyond_right = points.iter().all(|p| p.x >= screen.r);
    if (beyond_left && velocity.x < 0.0) || (beyond_right && velocity.x > 0.0) {
        move_to(center, points, Point::new(size.x - center.x, center.y));
        return;
    }

    let beyond_top = points.iter().all(|p| p.y <= screen.t);
    let beyond_bottom = points.iter().all(|p| p.y >= screen.b);
    if (beyond_top && velocity.y < 0.0) || (beyond_bottom && velocity.y > 0.0) {
        move_to(center, points, Point::new(center.x, size.y - center.y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Audio;
    use crate::constants::*;
    use crate::entities::Bullet;
    use crate::rendering::Renderer;
    use crate::terminal_io::Key;
    use crate::types::Line;
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct NullRenderer;

    impl Renderer for NullRenderer {
        fn clear(&mut self) {}
        fn stroke_line(&mut self, _line: Line, _width: f64) {}
        fn fill_rect(&mut self, _center: Point, _size: f64) {}
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct SoundCounts {
        shots: usize,
        explosions: usize,
    }

    #[derive(Clone, Default)]
    struct CountingAudio(Rc<RefCell<SoundCounts>>);

    impl Audio for CountingAudio {
        fn play_shoot(&mut self) {
            self.0.borrow_mut().shots += 1;
        }
        fn play_explosion(&mut self) {
            self.0.borrow_mut().explosions += 1;
        }
    }

    struct Held(Vec<Key>);

    impl Input for Held {
        fn is_down(&self, key: Key) -> bool {
            self.0.contains(&key)
        }
    }

    fn idle() -> Held {
        Held(Vec::new())
    }

    fn test_world(audio: CountingAudio) -> World {
        World::new(
            Point::new(WORLD_WIDTH, WORLD_HEIGHT),
            false,
            Box::new(NullRenderer),
            Box::new(audio),
            StdRng::seed_from_u64(42),
        )
    }

    /// Asteroid with a deterministic square outline so overlap in tests does
    /// not depend on shape jitter.
    fn square_asteroid(world: &mut World, center: Point, half: f64, radius: f64) -> BodyId {
        let id = world.spawn_asteroid(center, radius);
        if let Some(Body::Asteroid(a)) = world.bodies.iter_mut().find(|b| b.id() == id) {
            a.points = vec![
                Point::new(center.x - half, center.y - half),
                Point::new(center.x + half, center.y - half),
                Point::new(center.x + half, center.y + half),
                Point::new(center.x - half, center.y + half),
            ];
            a.velocity = Point::new(0.0, 0.0);
        }
        id
    }

    /// Bullet whose collision segment vertically spans `y0..y1` at `x`.
    fn piercing_bullet(x: f64, y0: f64, y1: f64) -> Body {
        let mut bullet = Bullet::new(Point::new(x, y0), Point::new(0.0, 0.0), 0.0);
        bullet.velocity = Point::new(0.0, 0.0);
        bullet.points = vec![Point::new(x, y0), Point::new(x, y1)];
        Body::Bullet(bullet)
    }

    #[test]
    fn initial_scene_is_four_asteroids_and_a_player() {
        let mut world = test_world(CountingAudio::default());
        world.spawn_initial_scene();
        assert_eq!(world.count_kind(BodyKind::Asteroid), 4);
        assert_eq!(world.count_kind(BodyKind::Player), 1);
        assert_eq!(world.n_bullets(), 0);
    }

    #[test]
    fn bullet_counter_tracks_adds_and_removes() {
        let mut world = test_world(CountingAudio::default());
        let ids: Vec<BodyId> = (0..4)
            .map(|i| world.add_body(piercing_bullet(10.0 + i as f64, 10.0, 11.0)))
            .collect();
        assert_eq!(world.n_bullets(), 4);
        world.remove_body(ids[0]);
        world.remove_body(ids[1]);
        assert_eq!(world.n_bullets(), 2);
        // Removing an absent body is a no-op and must not touch the counter.
        world.remove_body(ids[0]);
        world.remove_body(9999);
        assert_eq!(world.n_bullets(), 2);
    }

    #[test]
    fn splitting_an_asteroid_spawns_two_smaller_children() {
        let audio = CountingAudio::default();
        let mut world = test_world(audio.clone());
        let center = Point::new(100.0, 100.0);
        square_asteroid(&mut world, center, 5.0, 30.0);
        world.add_body(piercing_bullet(100.0, 80.0, 120.0));

        world.tick(0, &idle()).unwrap();

        assert_eq!(world.n_bullets(), 0);
        assert_eq!(world.count_kind(BodyKind::Asteroid), 2);
        for body in world.bodies() {
            let Body::Asteroid(a) = body else { panic!("expected asteroid") };
            assert_eq!(a.radius, 20.0);
            // Children start at the parent's center, then drift during the
            // same frame's update pass.
            assert!((a.center.x - center.x).abs() < 1.0);
            assert!((a.center.y - center.y).abs() < 1.0);
        }
        assert_eq!(audio.0.borrow().explosions, 1);
    }

    #[test]
    fn smallest_asteroids_are_destroyed_without_children() {
        let mut world = test_world(CountingAudio::default());
        square_asteroid(&mut world, Point::new(100.0, 100.0), 5.0, 10.0);
        world.add_body(piercing_bullet(100.0, 80.0, 120.0));

        world.tick(0, &idle()).unwrap();

        assert_eq!(world.count_kind(BodyKind::Asteroid), 0);
        assert_eq!(world.n_bullets(), 0);
        assert!(world.bodies().is_empty());
    }

    #[test]
    fn both_resolvers_run_on_stale_pairs() {
        // Two bullets hit the same asteroid in one tick. The second pair still
        // resolves after the first removed the asteroid, so the asteroid
        // splits twice - but the explosion plays only for the real removal.
        let audio = CountingAudio::default();
        let mut world = test_world(audio.clone());
        square_asteroid(&mut world, Point::new(100.0, 100.0), 5.0, 30.0);
        world.add_body(piercing_bullet(98.0, 80.0, 120.0));
        world.add_body(piercing_bullet(102.0, 80.0, 120.0));

        world.tick(0, &idle()).unwrap();

        assert_eq!(world.count_kind(BodyKind::Asteroid), 4);
        assert_eq!(world.n_bullets(), 0);
        assert_eq!(audio.0.borrow().explosions, 1);
    }

    #[test]
    fn player_death_spawns_debris_and_one_explosion() {
        let audio = CountingAudio::default();
        let mut world = test_world(audio.clone());
        let center = Point::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0);
        world.add_body(Body::Player(Player::new(center, false)));
        // The middle "T" stroke runs vertically through the player's center,
        // so a square ring around the center is a guaranteed hit.
        square_asteroid(&mut world, center, 5.0, 10.0);

        world.tick(0, &idle()).unwrap();

        assert_eq!(world.count_kind(BodyKind::Player), 0);
        assert_eq!(world.count_kind(BodyKind::Asteroid), 0);
        assert_eq!(world.count_kind(BodyKind::Debris), 1);
        // One for the asteroid, one for the player.
        assert_eq!(audio.0.borrow().explosions, 2);
    }

    #[test]
    fn fire_gate_limits_rate_and_live_bullets() {
        let audio = CountingAudio::default();
        let mut world = test_world(audio.clone());
        let center = Point::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0);
        world.add_body(Body::Player(Player::new(center, false)));
        let fire = Held(vec![Key::Fire]);

        world.tick(100, &fire).unwrap();
        assert_eq!(world.n_bullets(), 1);

        // 20ms later: inside the cooldown window, no second bullet.
        world.tick(120, &fire).unwrap();
        assert_eq!(world.n_bullets(), 1);

        // Past the cooldown and up to the cap.
        for now in [200, 300, 400, 500] {
            world.tick(now, &fire).unwrap();
        }
        assert_eq!(world.n_bullets(), MAX_LIVE_BULLETS);

        // Cap reached: timing no longer matters.
        world.tick(1000, &fire).unwrap();
        assert_eq!(world.n_bullets(), MAX_LIVE_BULLETS);
        assert_eq!(audio.0.borrow().shots, MAX_LIVE_BULLETS);
    }

    #[test]
    fn thrust_is_capped_below_max_speed() {
        let mut world = test_world(CountingAudio::default());
        let center = Point::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0);
        let id = world.add_body(Body::Player(Player::new(center, false)));
        let thrust = Held(vec![Key::Thrust]);

        // Far more ticks than needed to reach the cap at 0.05 per tick.
        for i in 0..200 {
            world.tick(i, &thrust).unwrap();
        }

        let Some(Body::Player(p)) = world.bodies().iter().find(|b| b.id() == id) else {
            panic!("player vanished");
        };
        let speed = crate::types::line_length(p.velocity);
        assert!(speed < SHIP_MAX_SPEED);
        assert!(speed > SHIP_MAX_SPEED - 2.0 * SHIP_THRUST);
    }

    #[test]
    fn bullets_expire_after_their_tick_budget() {
        let mut world = test_world(CountingAudio::default());
        let mut bullet = Bullet::new(Point::new(200.0, 150.0), Point::new(0.0, 0.0), 0.0);
        bullet.velocity = Point::new(0.0, 0.0);
        bullet.points = vec![Point::new(200.0, 150.0), Point::new(200.0, 150.5)];
        bullet.ticks_left = 2;
        world.add_body(Body::Bullet(bullet));

        world.tick(0, &idle()).unwrap(); // 2 -> 1
        world.tick(0, &idle()).unwrap(); // 1 -> 0
        assert_eq!(world.n_bullets(), 1);
        world.tick(0, &idle()).unwrap(); // expires
        assert_eq!(world.n_bullets(), 0);
        assert!(world.bodies().is_empty());
    }

    #[test]
    fn debris_expires_after_its_lifetime() {
        let mut world = test_world(CountingAudio::default());
        let player = Player::new(Point::new(200.0, 150.0), false);
        let mut rng = StdRng::seed_from_u64(1);
        let mut debris = Debris::new(&player, &mut rng);
        debris.lifetime = 1;
        world.add_body(Body::Debris(debris));

        world.tick(0, &idle()).unwrap(); // 1 -> 0, still animating
        assert_eq!(world.count_kind(BodyKind::Debris), 1);
        world.tick(0, &idle()).unwrap(); // gone
        assert!(world.bodies().is_empty());
    }

    #[test]
    fn wrap_mirrors_center_when_body_exits_left() {
        let size = Point::new(WORLD_WIDTH, WORLD_HEIGHT);
        let mut center = Point::new(-30.0, 50.0);
        let mut points = vec![
            Point::new(-35.0, 45.0),
            Point::new(-25.0, 45.0),
            Point::new(-25.0, 55.0),
            Point::new(-35.0, 55.0),
        ];
        wrap_if_off_screen(size, &mut center, &mut points, Point::new(-1.0, 0.0));
        assert_eq!(center, Point::new(WORLD_WIDTH + 30.0, 50.0));
        // Polygon travels with the center; y is untouched.
        assert_eq!(points[0], Point::new(WORLD_WIDTH + 25.0, 45.0));
    }

    #[test]
    fn no_wrap_while_any_point_remains_on_screen() {
        let size = Point::new(WORLD_WIDTH, WORLD_HEIGHT);
        let mut center = Point::new(-2.0, 50.0);
        let mut points = vec![Point::new(-7.0, 50.0), Point::new(3.0, 50.0)];
        let before = center;
        wrap_if_off_screen(size, &mut center, &mut points, Point::new(-1.0, 0.0));
        assert_eq!(center, before);
    }

    #[test]
    fn no_wrap_when_moving_back_toward_the_screen() {
        let size = Point::new(WORLD_WIDTH, WORLD_HEIGHT);
        let mut center = Point::new(-30.0, 50.0);
        let mut points = vec![Point::new(-35.0, 50.0), Point::new(-25.0, 50.0)];
        let before = center;
        wrap_if_off_screen(size, &mut center, &mut points, Point::new(1.0, 0.0));
        assert_eq!(center, before);
    }

    #[test]
    fn horizontal_wrap_wins_over_vertical() {
        let size = Point::new(WORLD_WIDTH, WORLD_HEIGHT);
        // Off the top-left corner, moving up-left: only x is corrected.
        let mut center = Point::new(-30.0, -40.0);
        let mut points = vec![Point::new(-35.0, -45.0), Point::new(-25.0, -35.0)];
        wrap_if_off_screen(size, &mut center, &mut points, Point::new(-1.0, -1.0));
        assert_eq!(center, Point::new(WORLD_WIDTH + 30.0, -40.0));
    }

    #[test]
    fn vertical_wrap_applies_when_horizontal_does_not() {
        let size = Point::new(WORLD_WIDTH, WORLD_HEIGHT);
        let mut center = Point::new(200.0, -40.0);
        let mut points = vec![Point::new(195.0, -45.0), Point::new(205.0, -35.0)];
        wrap_if_off_screen(size, &mut center, &mut points, Point::new(0.0, -1.0));
        assert_eq!(center, Point::new(200.0, WORLD_HEIGHT + 40.0));
    }
}
