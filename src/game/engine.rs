use super::{
    action::{Direction, Velocity},
    config::{ConfigError, GameConfig},
    state::{same_cell, Food, GameOverCause, Position, Segment, Snapshot},
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info};

/// Owns the board and advances it one frame at a time
///
/// The engine never fails during play: wrapping, collisions and food spawns
/// are all ordinary state transitions. Once the run is over every further
/// [`tick`](SimulationEngine::tick) returns the same frozen snapshot.
pub struct SimulationEngine {
    config: GameConfig,
    /// Head at index 0, never empty
    segments: Vec<Segment>,
    food: Food,
    pending: Velocity,
    game_over: bool,
    cause: Option<GameOverCause>,
    ticks: u64,
    food_eaten: u32,
    rng: StdRng,
}

impl SimulationEngine {
    /// Create an engine with a single resting head at the configured start cell
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let head = Segment::at_rest(config.start());
        Ok(Self::assemble(config, vec![head], Food::absent()))
    }

    /// Default configuration with the given grid side and wall policy
    pub fn initialize(grid_size: usize, hard_walls: bool) -> Result<Self, ConfigError> {
        Self::new(GameConfig::new(grid_size, hard_walls))
    }

    /// Create an engine from a prepared board
    ///
    /// The pending direction starts as the head's velocity, so a moving snake
    /// keeps moving until steered.
    pub fn from_segments(
        config: GameConfig,
        segments: Vec<Segment>,
        food: Option<Position>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        if segments.is_empty() {
            return Err(ConfigError::EmptySnake);
        }

        if let Some((index, segment)) = segments
            .iter()
            .enumerate()
            .find(|(_, segment)| !config.contains(segment.position))
        {
            return Err(ConfigError::SegmentOutOfBounds {
                index,
                x: segment.position.x,
                y: segment.position.y,
            });
        }

        let food = match food {
            Some(pos) if !config.contains(pos) => {
                return Err(ConfigError::FoodOutOfBounds { x: pos.x, y: pos.y });
            }
            Some(pos) => Food::at(pos),
            None => Food::absent(),
        };

        Ok(Self::assemble(config, segments, food))
    }

    fn assemble(config: GameConfig, segments: Vec<Segment>, food: Food) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let pending = segments
            .first()
            .map(|head| head.velocity)
            .unwrap_or_default();

        Self {
            config,
            segments,
            food,
            pending,
            game_over: false,
            cause: None,
            ticks: 0,
            food_eaten: 0,
            rng,
        }
    }

    /// Return to the starting board, keeping the random stream
    pub fn reset(&mut self) {
        self.segments = vec![Segment::at_rest(self.config.start())];
        self.food = Food::absent();
        self.pending = Velocity::ZERO;
        self.game_over = false;
        self.cause = None;
        self.ticks = 0;
        self.food_eaten = 0;
        info!(grid_size = self.config.grid_size, "Game reset");
    }

    /// Request the direction the head takes on the next tick
    ///
    /// A request that exactly reverses the head's current motion is ignored
    /// and the previous request stays in effect. Returns whether the request
    /// was taken.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        let requested = direction.velocity();
        let current = self.head().velocity;

        if requested.is_reverse_of(current) {
            debug!(?direction, "Ignored reversal request");
            return false;
        }

        self.pending = requested;
        true
    }

    /// Force the food to respawn on the next tick; only honoured in debug mode
    pub fn clear_food(&mut self) -> bool {
        if !self.config.debug {
            return false;
        }

        self.food.exists = false;
        debug!("Food cleared");
        true
    }

    /// Advance the board by one frame
    pub fn tick(&mut self) -> Snapshot {
        if self.game_over {
            return self.snapshot();
        }

        self.propagate_velocities();
        self.spawn_food();

        for segment in &mut self.segments {
            segment.step();
        }

        self.resolve_boundaries();
        self.check_self_collision();
        self.consume_food();
        self.ticks += 1;

        self.snapshot()
    }

    // Tail first, so each segment picks up its predecessor's velocity from
    // the previous tick before that predecessor is overwritten.
    fn propagate_velocities(&mut self) {
        for i in (1..self.segments.len()).rev() {
            self.segments[i].velocity = self.segments[i - 1].velocity;
        }
        self.segments[0].velocity = self.pending;
    }

    /// Place food uniformly over the whole grid; cells under the snake are allowed
    fn spawn_food(&mut self) {
        if self.food.exists {
            return;
        }

        let side = self.config.side();
        let position = Position::new(self.rng.gen_range(0..side), self.rng.gen_range(0..side));
        self.food = Food::at(position);
        debug!(x = position.x, y = position.y, "Spawned food");
    }

    /// Only the head is checked against hard walls; every segment wraps
    fn resolve_boundaries(&mut self) {
        if self.config.hard_walls && !self.config.contains(self.segments[0].position) {
            self.end_run(GameOverCause::Wall);
        }

        let side = self.config.side();
        for segment in &mut self.segments {
            segment.position = segment.position.wrapped(side);
        }
    }

    fn check_self_collision(&mut self) {
        let head = self.segments[0].position;
        if self.segments[1..]
            .iter()
            .any(|segment| same_cell(segment.position, head))
        {
            self.end_run(GameOverCause::SelfCollision);
        }
    }

    fn consume_food(&mut self) {
        if !self.food.exists || !same_cell(self.segments[0].position, self.food.position) {
            return;
        }

        self.food.exists = false;
        self.food_eaten += 1;

        if let Some(tail) = self.segments.last().copied() {
            let position = tail
                .position
                .retreated(tail.velocity)
                .wrapped(self.config.side());
            self.segments.push(Segment::at_rest(position));
        }

        debug!(length = self.segments.len(), "Food eaten");
    }

    fn end_run(&mut self, cause: GameOverCause) {
        if self.game_over {
            return;
        }

        self.game_over = true;
        self.cause = Some(cause);
        info!(
            ?cause,
            length = self.segments.len(),
            tick = self.ticks + 1,
            "Game over"
        );
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            segments: self.segments.iter().map(|segment| segment.position).collect(),
            food: self.food.position,
            food_exists: self.food.exists,
            game_over: self.game_over,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn head(&self) -> Segment {
        self.segments[0]
    }

    pub fn food(&self) -> Food {
        self.food
    }

    pub fn pending_direction(&self) -> Velocity {
        self.pending
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn game_over_cause(&self) -> Option<GameOverCause> {
        self.cause
    }

    /// Ticks simulated since the last reset, not counting frozen ones
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn food_eaten(&self) -> u32 {
        self.food_eaten
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; the head is never removed
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moving(x: i32, y: i32, direction: Direction) -> Segment {
        Segment::new(Position::new(x, y), direction.velocity())
    }

    /// Straight snake heading right with its head at (x, y)
    fn straight_right(x: i32, y: i32, length: i32) -> Vec<Segment> {
        (0..length)
            .map(|i| moving(x - i, y, Direction::Right))
            .collect()
    }

    #[test]
    fn test_initialize() {
        let engine = SimulationEngine::initialize(41, false).unwrap();

        assert_eq!(engine.len(), 1);
        assert_eq!(engine.head().position, Position::new(20, 20));
        assert_eq!(engine.head().velocity, Velocity::ZERO);
        assert!(!engine.food().exists);
        assert!(!engine.is_game_over());
        assert_eq!(engine.ticks(), 0);
    }

    #[test]
    fn test_initialize_rejects_bad_grid() {
        assert!(matches!(
            SimulationEngine::initialize(0, false),
            Err(ConfigError::GridTooSmall { .. })
        ));
    }

    #[test]
    fn test_from_segments_validation() {
        let config = GameConfig::small();

        assert_eq!(
            SimulationEngine::from_segments(config.clone(), Vec::new(), None).err(),
            Some(ConfigError::EmptySnake)
        );
        assert_eq!(
            SimulationEngine::from_segments(config.clone(), straight_right(1, 1, 3), None).err(),
            Some(ConfigError::SegmentOutOfBounds {
                index: 2,
                x: -1,
                y: 1
            })
        );
        assert_eq!(
            SimulationEngine::from_segments(
                config,
                straight_right(5, 5, 2),
                Some(Position::new(10, 0))
            )
            .err(),
            Some(ConfigError::FoodOutOfBounds { x: 10, y: 0 })
        );
    }

    #[test]
    fn test_first_tick_spawns_food() {
        let mut engine = SimulationEngine::new(GameConfig::small().with_seed(3)).unwrap();
        let snapshot = engine.tick();

        // A stationary head can only miss the food or eat it in place
        assert!(snapshot.food_exists || engine.len() == 2);
        assert!(GameConfig::small().contains(snapshot.food));
        assert_eq!(engine.ticks(), 1);
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = SimulationEngine::from_segments(
            GameConfig::small(),
            straight_right(5, 5, 1),
            Some(Position::new(0, 9)),
        )
        .unwrap();

        let snapshot = engine.tick();

        assert_eq!(snapshot.head(), Some(Position::new(6, 5)));
        assert!(!snapshot.game_over);
        assert!(snapshot.food_exists);
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = SimulationEngine::from_segments(
            GameConfig::small(),
            straight_right(5, 5, 3),
            Some(Position::new(0, 9)),
        )
        .unwrap();

        assert!(!engine.set_direction(Direction::Left));
        engine.tick();

        assert_eq!(engine.head().velocity, Direction::Right.velocity());
        assert_eq!(engine.head().position, Position::new(6, 5));
    }

    #[test]
    fn test_reversal_checked_against_head_not_pending() {
        let mut engine = SimulationEngine::from_segments(
            GameConfig::small(),
            straight_right(5, 5, 3),
            Some(Position::new(0, 9)),
        )
        .unwrap();

        // Up then Left within one frame: Left still reverses the moving head
        assert!(engine.set_direction(Direction::Up));
        assert!(!engine.set_direction(Direction::Left));
        assert_eq!(engine.pending_direction(), Direction::Up.velocity());

        engine.tick();
        assert_eq!(engine.head().velocity, Direction::Up.velocity());
        assert!(!engine.is_game_over());
    }

    #[test]
    fn test_stationary_head_accepts_any_direction() {
        let mut engine = SimulationEngine::initialize(41, false).unwrap();
        assert!(engine.set_direction(Direction::Left));
        assert!(engine.set_direction(Direction::Right));
        assert_eq!(engine.pending_direction(), Direction::Right.velocity());
    }

    #[test]
    fn test_follow_the_leader() {
        let mut engine = SimulationEngine::from_segments(
            GameConfig::small(),
            straight_right(5, 5, 3),
            Some(Position::new(0, 9)),
        )
        .unwrap();

        engine.set_direction(Direction::Down);
        let first = engine.tick();
        assert_eq!(
            first.segments,
            vec![Position::new(5, 6), Position::new(5, 5), Position::new(4, 5)]
        );

        let second = engine.tick();
        assert_eq!(
            second.segments,
            vec![Position::new(5, 7), Position::new(5, 6), Position::new(5, 5)]
        );
        for i in 1..second.segments.len() {
            assert_eq!(second.segments[i], first.segments[i - 1]);
        }
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = SimulationEngine::from_segments(
            GameConfig::small(),
            straight_right(5, 5, 2),
            Some(Position::new(6, 5)),
        )
        .unwrap();
        let initial_length = engine.len();

        let snapshot = engine.tick();

        assert!(!snapshot.food_exists);
        assert_eq!(snapshot.segments.len(), initial_length + 1);
        assert_eq!(engine.food_eaten(), 1);

        // New tail sits one cell behind the old tail, at rest
        let tail = engine.segments()[2];
        assert_eq!(tail.position, Position::new(4, 5));
        assert_eq!(tail.velocity, Velocity::ZERO);
    }

    #[test]
    fn test_grown_tail_lines_up_next_tick() {
        let mut engine = SimulationEngine::from_segments(
            GameConfig::small(),
            straight_right(5, 5, 1),
            Some(Position::new(6, 5)),
        )
        .unwrap();

        engine.tick();
        assert_eq!(
            engine.snapshot().segments,
            vec![Position::new(6, 5), Position::new(5, 5)]
        );

        let snapshot = engine.tick();
        assert_eq!(snapshot.segments[1], Position::new(6, 5));
        assert_eq!(snapshot.segments[0], Position::new(7, 5));
    }

    #[test]
    fn test_grown_tail_wraps() {
        let mut engine = SimulationEngine::from_segments(
            GameConfig::small(),
            straight_right(9, 5, 1),
            Some(Position::new(0, 5)),
        )
        .unwrap();

        let snapshot = engine.tick();

        assert_eq!(
            snapshot.segments,
            vec![Position::new(0, 5), Position::new(9, 5)]
        );
    }

    #[test]
    fn test_self_collision() {
        let mut engine = SimulationEngine::from_segments(
            GameConfig::small(),
            straight_right(5, 5, 5),
            Some(Position::new(0, 9)),
        )
        .unwrap();

        engine.set_direction(Direction::Down);
        engine.tick();
        engine.set_direction(Direction::Left);
        engine.tick();
        engine.set_direction(Direction::Up);
        let snapshot = engine.tick();

        assert!(snapshot.game_over);
        assert_eq!(snapshot.head(), Some(Position::new(4, 5)));
        assert_eq!(
            engine.game_over_cause(),
            Some(GameOverCause::SelfCollision)
        );

        let frozen = engine.tick();
        assert_eq!(frozen, snapshot);
        assert_eq!(engine.ticks(), 3);
    }

    #[test]
    fn test_hard_wall_ends_game_but_still_wraps() {
        let config = GameConfig::new(10, true);
        let mut engine = SimulationEngine::from_segments(
            config,
            straight_right(9, 5, 2),
            Some(Position::new(3, 3)),
        )
        .unwrap();

        let snapshot = engine.tick();

        assert!(snapshot.game_over);
        assert_eq!(engine.game_over_cause(), Some(GameOverCause::Wall));
        assert_eq!(
            snapshot.segments,
            vec![Position::new(0, 5), Position::new(9, 5)]
        );
    }

    #[test]
    fn test_hard_walls_do_not_check_body() {
        // The tail inherits a leftward velocity on the left edge and leaves the grid
        let config = GameConfig::new(10, true);
        let segments = vec![
            moving(0, 4, Direction::Up),
            moving(0, 5, Direction::Left),
            moving(0, 6, Direction::Left),
        ];
        let mut engine =
            SimulationEngine::from_segments(config, segments, Some(Position::new(5, 5))).unwrap();

        engine.set_direction(Direction::Right);
        let snapshot = engine.tick();

        assert!(!snapshot.game_over);
        assert_eq!(
            snapshot.segments,
            vec![Position::new(1, 4), Position::new(0, 4), Position::new(9, 6)]
        );
    }

    #[test]
    fn test_wrap_around() {
        let mut engine = SimulationEngine::from_segments(
            GameConfig::small(),
            straight_right(9, 5, 2),
            Some(Position::new(3, 3)),
        )
        .unwrap();

        let snapshot = engine.tick();

        assert!(!snapshot.game_over);
        assert_eq!(snapshot.head(), Some(Position::new(0, 5)));
        assert_eq!(snapshot.segments[1], Position::new(9, 5));
    }

    #[test]
    fn test_wrap_on_every_edge() {
        let cases = [
            (Position::new(0, 4), Direction::Left, Position::new(9, 4)),
            (Position::new(4, 0), Direction::Up, Position::new(4, 9)),
            (Position::new(4, 9), Direction::Down, Position::new(4, 0)),
            (Position::new(9, 4), Direction::Right, Position::new(0, 4)),
        ];

        for (start, direction, expected) in cases {
            let head = Segment::new(start, direction.velocity());
            let mut engine = SimulationEngine::from_segments(
                GameConfig::small(),
                vec![head],
                Some(Position::new(5, 5)),
            )
            .unwrap();

            assert_eq!(engine.tick().head(), Some(expected));
        }
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = SimulationEngine::from_segments(
            GameConfig::new(10, true),
            straight_right(9, 5, 3),
            Some(Position::new(3, 3)),
        )
        .unwrap();

        let over = engine.tick();
        assert!(over.game_over);
        let bytes = serde_json::to_vec(&over).unwrap();

        engine.set_direction(Direction::Down);
        engine.clear_food();
        for _ in 0..5 {
            let again = engine.tick();
            assert_eq!(serde_json::to_vec(&again).unwrap(), bytes);
        }
        assert_eq!(engine.ticks(), 1);
    }

    #[test]
    fn test_clear_food_requires_debug() {
        let segments = vec![Segment::at_rest(Position::new(5, 5))];

        let mut engine = SimulationEngine::from_segments(
            GameConfig::small(),
            segments.clone(),
            Some(Position::new(1, 1)),
        )
        .unwrap();
        assert!(!engine.clear_food());
        assert!(engine.food().exists);

        let config = GameConfig {
            debug: true,
            ..GameConfig::small()
        };
        let mut engine =
            SimulationEngine::from_segments(config, segments, Some(Position::new(1, 1))).unwrap();
        assert!(engine.clear_food());
        assert!(!engine.snapshot().food_exists);
    }

    #[test]
    fn test_reset() {
        let mut engine = SimulationEngine::from_segments(
            GameConfig::new(10, true),
            straight_right(9, 5, 3),
            Some(Position::new(3, 3)),
        )
        .unwrap();
        engine.tick();
        assert!(engine.is_game_over());

        engine.reset();

        assert!(!engine.is_game_over());
        assert_eq!(engine.game_over_cause(), None);
        assert_eq!(engine.len(), 1);
        assert_eq!(engine.head(), Segment::at_rest(Position::new(5, 5)));
        assert_eq!(engine.pending_direction(), Velocity::ZERO);
        assert!(!engine.food().exists);
        assert_eq!(engine.ticks(), 0);
    }

    #[test]
    fn test_seeded_food_is_deterministic() {
        let config = GameConfig::new(41, false).with_seed(1234);
        let mut a = SimulationEngine::new(config.clone()).unwrap();
        let mut b = SimulationEngine::new(config).unwrap();

        for _ in 0..3 {
            assert_eq!(a.tick(), b.tick());
            // Force a fresh spawn each frame
            a.food.exists = false;
            b.food.exists = false;
        }
    }
}
