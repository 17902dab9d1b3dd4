//! The closed set of body kinds and their per-tick behavior.
//!
//! Every body owns a center, a polygon, and a velocity; the world drives them
//! through `update` / `draw` and resolves collisions through kind-based
//! `Contact` snapshots rather than downcasting.

use crate::constants::*;
use crate::game::{TickCtx, World, WorldOp, wrap_if_off_screen};
use crate::rendering::Renderer;
use crate::shapes::{self, points_to_lines};
use crate::terminal_io::Key;
use crate::types::{Line, ORIGIN, Point, line_length, rotate, translate};
use rand::Rng;

pub type BodyId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    Asteroid,
    Player,
    Bullet,
    Debris,
}

/// Collision-relevant snapshot of a body, captured when colliding pairs are
/// detected. Resolvers run on these, so both sides of a pair still resolve
/// after an earlier pair removed a participant.
#[derive(Clone, Copy, Debug)]
pub struct Contact {
    pub id: BodyId,
    pub kind: BodyKind,
    pub center: Point,
    pub radius: f64,
}

impl Contact {
    /// Applies this side's collision response against `other`.
    ///
    /// Removals are idempotent world ops; an asteroid that was already removed
    /// by an earlier pair this pass still spawns its children, matching the
    /// original game.
    pub fn resolve(&self, other: &Contact, world: &mut World) {
        match self.kind {
            BodyKind::Asteroid
                if matches!(other.kind, BodyKind::Player | BodyKind::Bullet) =>
            {
                world.remove_body(self.id);
                world.remove_body(other.id);
                if self.radius > ASTEROID_MIN_SPLIT_RADIUS {
                    let child_radius = self.radius - ASTEROID_SPLIT_STEP;
                    world.spawn_asteroid(self.center, child_radius);
                    world.spawn_asteroid(self.center, child_radius);
                }
            }
            BodyKind::Bullet if other.kind == BodyKind::Asteroid => {
                world.remove_body(self.id);
                world.remove_body(other.id);
            }
            // Player and Debris carry no collision response; the player's
            // destruction is driven entirely from the asteroid side.
            _ => {}
        }
    }
}

pub enum Body {
    Asteroid(Asteroid),
    Player(Player),
    Bullet(Bullet),
    Debris(Debris),
}

impl Body {
    pub fn id(&self) -> BodyId {
        match self {
            Body::Asteroid(b) => b.id,
            Body::Player(b) => b.id,
            Body::Bullet(b) => b.id,
            Body::Debris(b) => b.id,
        }
    }

    pub fn set_id(&mut self, id: BodyId) {
        match self {
            Body::Asteroid(b) => b.id = id,
            Body::Player(b) => b.id = id,
            Body::Bullet(b) => b.id = id,
            Body::Debris(b) => b.id = id,
        }
    }

    pub fn kind(&self) -> BodyKind {
        match self {
            Body::Asteroid(_) => BodyKind::Asteroid,
            Body::Player(_) => BodyKind::Player,
            Body::Bullet(_) => BodyKind::Bullet,
            Body::Debris(_) => BodyKind::Debris,
        }
    }

    pub fn center(&self) -> Point {
        match self {
            Body::Asteroid(b) => b.center,
            Body::Player(b) => b.center,
            Body::Bullet(b) => b.center,
            Body::Debris(b) => b.center,
        }
    }

    /// Collision polygon. Debris exposes no points and therefore never
    /// collides with anything.
    pub fn points(&self) -> &[Point] {
        match self {
            Body::Asteroid(b) => &b.points,
            Body::Player(b) => &b.points,
            Body::Bullet(b) => &b.points,
            Body::Debris(_) => &[],
        }
    }

    pub fn contact(&self) -> Contact {
        let radius = match self {
            Body::Asteroid(b) => b.radius,
            _ => 0.0,
        };
        Contact { id: self.id(), kind: self.kind(), center: self.center(), radius }
    }

    pub fn update(&mut self, ctx: &mut TickCtx<'_>) {
        match self {
            Body::Asteroid(b) => b.update(ctx),
            Body::Player(b) => b.update(ctx),
            Body::Bullet(b) => b.update(ctx),
            Body::Debris(b) => b.update(ctx),
        }
    }

    pub fn draw(&self, renderer: &mut dyn Renderer, debug: bool) {
        match self {
            Body::Asteroid(b) => b.draw(renderer),
            Body::Player(b) => b.draw(renderer, debug),
            Body::Bullet(b) => b.draw(renderer),
            Body::Debris(b) => b.draw(renderer),
        }
    }
}

/// Re-centers a body, dragging its polygon along.
pub(crate) fn move_to(center: &mut Point, points: &mut [Point], new_center: Point) {
    let translation = crate::types::vector_to(*center, new_center);
    *center = new_center;
    for p in points.iter_mut() {
        *p = translate(*p, translation);
    }
}

// --- Asteroid ---

pub struct Asteroid {
    pub id: BodyId,
    pub center: Point,
    pub points: Vec<Point>,
    pub velocity: Point,
    pub radius: f64,
}

impl Asteroid {
    pub fn new(center: Point, radius: f64, rng: &mut impl Rng) -> Self {
        Asteroid {
            id: 0,
            center,
            points: shapes::asteroid_points(center, radius, ASTEROID_POINT_COUNT, rng),
            velocity: Point::new(rng.gen_range(0.0..1.0) - 0.5, rng.gen_range(0.0..1.0) - 0.5),
            radius,
        }
    }

    fn update(&mut self, ctx: &mut TickCtx<'_>) {
        let next = translate(self.center, self.velocity);
        move_to(&mut self.center, &mut self.points, next);
        wrap_if_off_screen(ctx.size, &mut self.center, &mut self.points, self.velocity);
    }

    fn draw(&self, renderer: &mut dyn Renderer) {
        for line in points_to_lines(&self.points, true) {
            renderer.stroke_line(line, 1.0);
        }
    }
}

// --- Player ---

pub struct Player {
    pub id: BodyId,
    pub center: Point,
    pub points: Vec<Point>,
    pub velocity: Point,
    pub angle: f64,
    pub width: f64,
    pub height: f64,
    pub line_width: f64,
    pub last_shot_ms: u64,
}

impl Player {
    pub fn new(center: Point, debug: bool) -> Self {
        let base = if debug { SHIP_DEBUG_WIDTH } else { SHIP_BASE_WIDTH };
        let glyph = shapes::ship_points(center, base);
        Player {
            id: 0,
            center,
            points: glyph.points,
            velocity: ORIGIN,
            angle: 0.0,
            width: glyph.width,
            height: glyph.height,
            line_width: glyph.line_width,
            last_shot_ms: 0,
        }
    }

    pub fn turn(&mut self, angle_delta: f64) {
        let center = self.center;
        for p in self.points.iter_mut() {
            *p = rotate(*p, center, angle_delta);
        }
        self.angle += angle_delta;
    }

    fn update(&mut self, ctx: &mut TickCtx<'_>) {
        if ctx.input.is_down(Key::Left) {
            self.turn(-SHIP_TURN_RATE);
        } else if ctx.input.is_down(Key::Right) {
            self.turn(SHIP_TURN_RATE);
        }

        if ctx.input.is_down(Key::Thrust) {
            let impulse = rotate(Point::new(0.0, -SHIP_THRUST), ORIGIN, self.angle);
            let next = translate(self.velocity, impulse);
            if line_length(next) < SHIP_MAX_SPEED {
                self.velocity = next;
            }
        }

        if ctx.input.is_down(Key::Fire)
            && ctx.now_ms - self.last_shot_ms > SHOT_COOLDOWN_MS
            && ctx.n_bullets < MAX_LIVE_BULLETS
        {
            self.last_shot_ms = ctx.now_ms;
            ctx.audio.play_shoot();
            let nose = rotate(
                Point::new(self.center.x, self.center.y - self.height / 2.0 - 1.0),
                self.center,
                self.angle,
            );
            ctx.ops.push(WorldOp::Spawn(Body::Bullet(Bullet::new(
                nose,
                self.velocity,
                self.angle,
            ))));
        }

        let next = translate(self.center, self.velocity);
        move_to(&mut self.center, &mut self.points, next);
        wrap_if_off_screen(ctx.size, &mut self.center, &mut self.points, self.velocity);
    }

    fn draw(&self, renderer: &mut dyn Renderer, debug: bool) {
        // The glyph is disjoint strokes, not a closed outline.
        for line in points_to_lines(&self.points, false) {
            renderer.stroke_line(line, self.line_width);
        }

        if debug {
            // Heading cross: one axis along the glyph, one across it.
            let across = Line::new(
                rotate(translate(self.center, Point::new(-self.width, 0.0)), self.center, self.angle),
                rotate(translate(self.center, Point::new(self.width, 0.0)), self.center, self.angle),
            );
            let along = Line::new(
                rotate(translate(self.center, Point::new(0.0, -self.height)), self.center, self.angle),
                rotate(translate(self.center, Point::new(0.0, self.height)), self.center, self.angle),
            );
            renderer.stroke_line(across, 1.0);
            renderer.stroke_line(along, 1.0);
        }
    }
}

// --- Bullet ---

pub struct Bullet {
    pub id: BodyId,
    pub center: Point,
    pub points: Vec<Point>,
    pub velocity: Point,
    pub angle: f64,
    pub ticks_left: u32,
}

impl Bullet {
    pub fn new(start: Point, ship_velocity: Point, angle: f64) -> Self {
        let velocity = translate(
            ship_velocity,
            rotate(Point::new(0.0, -BULLET_SPEED), ORIGIN, angle),
        );
        Bullet {
            id: 0,
            center: start,
            // The collision polygon is the segment the bullet sweeps this tick.
            points: vec![start, translate(start, velocity)],
            velocity,
            angle,
            ticks_left: BULLET_TICKS,
        }
    }

    fn update(&mut self, ctx: &mut TickCtx<'_>) {
        if self.ticks_left == 0 {
            ctx.ops.push(WorldOp::Despawn(self.id));
        } else {
            self.ticks_left -= 1;
        }

        // Still translates on its expiry tick, like the original.
        let next = translate(self.center, self.velocity);
        move_to(&mut self.center, &mut self.points, next);
        wrap_if_off_screen(ctx.size, &mut self.center, &mut self.points, self.velocity);
    }

    fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.fill_rect(self.center, 2.0);
    }
}

// --- Debris (the breaking-apart ship) ---

pub struct DebrisLine {
    pub line: Line,
    pub axis: Point,
    pub angle_delta: f64,
    pub velocity: Point,
    pub width: f64,
    pub width_delta: f64,
}

/// The dead player's strokes, each tumbling off on its own: a private pivot,
/// a small angular step, a fraction of the ship's velocity, and a shrinking
/// stroke width. No collision footprint.
pub struct Debris {
    pub id: BodyId,
    pub center: Point,
    pub lifetime: u32,
    pub lines: Vec<DebrisLine>,
}

impl Debris {
    pub fn new(player: &Player, rng: &mut impl Rng) -> Self {
        let lines = points_to_lines(&player.points, false)
            .into_iter()
            .map(|line| {
                let axis = Point::new(
                    line.a.x + rng.gen_range(0.0..1.0) * (line.b.x - line.a.x),
                    line.a.y + rng.gen_range(0.0..1.0) * (line.b.y - line.a.y),
                );
                DebrisLine {
                    line,
                    axis,
                    angle_delta: rng.gen_range(0.0..1.0) * 0.04 - 0.002,
                    velocity: Point::new(
                        player.velocity.x * rng.gen_range(0.0..1.0),
                        player.velocity.y * rng.gen_range(0.0..1.0),
                    ),
                    width: player.line_width,
                    width_delta: -rng.gen_range(0.0..1.0) / 20.0,
                }
            })
            .collect();

        Debris {
            id: 0,
            center: player.center,
            lifetime: DEBRIS_TICKS,
            lines,
        }
    }

    fn update(&mut self, ctx: &mut TickCtx<'_>) {
        if self.lifetime == 0 {
            ctx.ops.push(WorldOp::Despawn(self.id));
            return;
        }
        self.lifetime -= 1;

        for piece in self.lines.iter_mut() {
            piece.line.a = translate(piece.velocity, rotate(piece.line.a, piece.axis, piece.angle_delta));
            piece.line.b = translate(piece.velocity, rotate(piece.line.b, piece.axis, piece.angle_delta));
            piece.axis = translate(piece.velocity, piece.axis);
            piece.width += piece.width_delta;
        }
    }

    fn draw(&self, renderer: &mut dyn Renderer) {
        for piece in &self.lines {
            if piece.width > 0.0 {
                renderer.stroke_line(piece.line, piece.width);
            }
        }
    }
}
