#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for Pacboy.
//!
//! The world owns the maze, the pellet field, every actor, the ability
//! cooldowns, the particle sets and the campaign. It changes only through
//! [`apply`], which executes a single [`Command`] and appends the resulting
//! [`Event`] values. Rejected commands leave the world untouched and emit
//! nothing.

mod actors;
mod pellets;
mod respawn;

use std::{fmt, time::Duration};

use pacboy_core::{
    AbilityKind, CellCoord, Command, ConfigError, Direction, EffectSet, Event, GameConfig,
    GhostId, GhostStep, Maze, PlayState, GHOST_ROSTER, WELCOME_BANNER,
};
use pacboy_system_effects::{cell_center, spawn_burst, Bounds, BurstProfile, ParticleSet};
use pacboy_system_maze_generation::MazeGenerator;
use pacboy_system_progression::Campaign;
use pacboy_system_spawning::{place_group, select_strategic_cell};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use actors::{Ghost, Player};
use respawn::RespawnQueue;

pub use actors::Liveness;
pub use pellets::PelletField;

/// Reasons a command was ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// The command needs a running level.
    #[error("command requires a running level, world is {0:?}")]
    NotPlaying(PlayState),
    /// A level can only be started from the loading state.
    #[error("a level is already running")]
    LevelInProgress,
    /// The player's step was blocked by a wall, divider or the border.
    #[error("player cannot move {direction:?} from {from:?}")]
    PlayerBlocked {
        /// Cell the player occupies.
        from: CellCoord,
        /// Requested direction.
        direction: Direction,
    },
    /// The ability has not recharged yet.
    #[error("{kind} is recharging for another {remaining_ms} ms")]
    OnCooldown {
        /// Ability that was requested.
        kind: AbilityKind,
        /// Milliseconds until it is ready.
        remaining_ms: u64,
    },
    /// The adversary does not exist or is waiting to respawn.
    #[error("ghost {0:?} is not roaming the maze")]
    GhostUnavailable(GhostId),
    /// The adversary's step was blocked or the target was occupied.
    #[error("ghost {ghost:?} cannot move {direction:?}")]
    GhostBlocked {
        /// Adversary that tried to move.
        ghost: GhostId,
        /// Requested direction.
        direction: Direction,
    },
}

/// Represents the authoritative Pacboy world state.
pub struct World {
    banner: &'static str,
    config: GameConfig,
    generator: MazeGenerator,
    rng: Box<dyn RngCore>,
    maze: Maze,
    bounds: Bounds,
    pellets: PelletField,
    player: Player,
    ghosts: Vec<Ghost>,
    respawns: RespawnQueue,
    weapon_particles: ParticleSet,
    celebration: ParticleSet,
    defeat: ParticleSet,
    campaign: Campaign,
    play_state: PlayState,
    transition: Duration,
    epoch: u64,
    clock: Duration,
}

impl World {
    /// Creates a world in the loading state. Randomness is seeded from
    /// `config.seed` when present and from the operating system otherwise.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Creates a world in the loading state that draws from the provided
    /// random source.
    pub fn with_rng<R>(config: GameConfig, rng: R) -> Result<Self, ConfigError>
    where
        R: RngCore + 'static,
    {
        config.validate()?;
        let maze = Maze::open(config.maze.width, config.maze.height);
        let entrance = maze.entrance();
        Ok(Self {
            banner: WELCOME_BANNER,
            generator: MazeGenerator::new(config.maze.clone()),
            rng: Box::new(rng),
            bounds: Bounds::for_grid(maze.columns(), maze.rows()),
            pellets: PelletField::default(),
            player: Player::spawn(entrance),
            ghosts: Vec::new(),
            respawns: RespawnQueue::default(),
            weapon_particles: ParticleSet::new(),
            celebration: ParticleSet::new(),
            defeat: ParticleSet::new(),
            campaign: Campaign::new(config.progression.clone(), config.scoring.clone()),
            play_state: PlayState::Loading,
            transition: Duration::ZERO,
            epoch: 0,
            clock: Duration::ZERO,
            maze,
            config,
        })
    }

    fn set_play_state(&mut self, state: PlayState, out_events: &mut Vec<Event>) {
        self.play_state = state;
        out_events.push(Event::PlayStateChanged { state });
    }

    fn start_level(&mut self, out_events: &mut Vec<Event>) {
        self.epoch = self.epoch.wrapping_add(1);
        let level = self.campaign.level();
        let (maze, report) = self.generator.generate_with_report(level, &mut *self.rng);
        self.maze = maze;
        self.bounds = Bounds::for_grid(self.maze.columns(), self.maze.rows());
        self.pellets = PelletField::from_maze(&self.maze);
        let params = self.campaign.begin_level(self.pellets.remaining());

        self.player = Player::spawn(self.maze.entrance());
        let wanted = usize::try_from(params.ghost_count)
            .unwrap_or(usize::MAX)
            .min(GHOST_ROSTER.len());
        let cells = place_group(&self.maze, wanted, Some(self.player.cell), &mut *self.rng);
        if cells.len() < wanted {
            warn!(wanted, placed = cells.len(), "ghost_placement_short");
        }
        self.ghosts = cells
            .into_iter()
            .zip(GHOST_ROSTER)
            .enumerate()
            .map(|(index, (cell, identity))| {
                Ghost::new(GhostId::new(index as u32), identity, cell)
            })
            .collect();

        self.weapon_particles.clear();
        self.celebration.clear();
        self.defeat.clear();
        self.transition = Duration::ZERO;

        let ghosts = self.ghosts.len() as u32;
        info!(
            level,
            lives = params.lives,
            ghosts,
            pellets = self.pellets.remaining(),
            dividers = self.maze.divider_count(),
            exhausted = report.exhausted,
            "level_started"
        );
        self.set_play_state(PlayState::Playing, out_events);
        out_events.push(Event::LevelStarted {
            level,
            lives: params.lives,
            ghosts,
        });
    }

    fn move_player(
        &mut self,
        direction: Direction,
        out_events: &mut Vec<Event>,
    ) -> Result<(), Rejection> {
        self.require_playing()?;
        let from = self.player.cell;
        let to = self
            .maze
            .step(from, direction)
            .ok_or(Rejection::PlayerBlocked { from, direction })?;

        self.player.cell = to;
        self.player.direction = direction;
        out_events.push(Event::PlayerMoved {
            from,
            to,
            direction,
        });

        self.collect_pellet(to, out_events);
        if self.pellets.remaining() == 0 || to == self.maze.exit() {
            self.complete_level(out_events);
            return Ok(());
        }
        self.check_collision(out_events);
        Ok(())
    }

    fn use_ability(
        &mut self,
        kind: AbilityKind,
        out_events: &mut Vec<Event>,
    ) -> Result<(), Rejection> {
        self.require_playing()?;
        let remaining = self.player.cooldowns.remaining(kind);
        if !remaining.is_zero() {
            return Err(Rejection::OnCooldown {
                kind,
                remaining_ms: u64::try_from(remaining.as_millis()).unwrap_or(u64::MAX),
            });
        }

        let ability = self.config.abilities.get(kind);
        self.player.cooldowns.start(kind, ability.cooldown());

        let origin = self.player.cell;
        let direction = self.player.direction;
        let burst = spawn_burst(
            cell_center(origin),
            self.config.effects.weapon_particles..=self.config.effects.weapon_particles,
            &BurstProfile::weapon(kind, direction),
            &mut *self.rng,
        );
        self.weapon_particles.extend(burst);
        out_events.push(Event::AbilityFired {
            kind,
            origin,
            direction,
        });

        if let Some(index) = self.scan_for_ghost(origin, direction, ability.range) {
            let ghost = &mut self.ghosts[index];
            ghost.liveness = Liveness::Respawning;
            let (id, cell) = (ghost.id, ghost.cell);
            self.respawns
                .schedule(id, self.config.timing.respawn_delay(), self.epoch);
            debug!(ghost = id.get(), ?kind, "ghost_hit");
            out_events.push(Event::GhostHit {
                kind,
                ghost: id,
                cell,
            });
        }
        Ok(())
    }

    /// Walks outward from `origin` and returns the first roaming adversary
    /// found before a wall, divider or the border stops the scan.
    fn scan_for_ghost(&self, origin: CellCoord, direction: Direction, range: u32) -> Option<usize> {
        let mut cell = origin;
        for _ in 0..range {
            cell = self.maze.step(cell, direction)?;
            if let Some(index) = self.ghost_index_at(cell) {
                return Some(index);
            }
        }
        None
    }

    fn move_ghosts(
        &mut self,
        steps: Vec<GhostStep>,
        out_events: &mut Vec<Event>,
    ) -> Result<(), Rejection> {
        self.require_playing()?;
        for step in steps {
            if let Err(rejection) = self.step_ghost(step, out_events) {
                debug!(%rejection, "ghost_step_rejected");
            }
        }
        self.check_collision(out_events);
        Ok(())
    }

    fn step_ghost(&mut self, step: GhostStep, out_events: &mut Vec<Event>) -> Result<(), Rejection> {
        let index = self
            .ghosts
            .iter()
            .position(|ghost| ghost.id == step.ghost && ghost.is_alive())
            .ok_or(Rejection::GhostUnavailable(step.ghost))?;
        let from = self.ghosts[index].cell;
        let blocked = Rejection::GhostBlocked {
            ghost: step.ghost,
            direction: step.direction,
        };
        let to = self.maze.step(from, step.direction).ok_or(blocked)?;
        if self.ghost_index_at(to).is_some() {
            return Err(blocked);
        }

        let ghost = &mut self.ghosts[index];
        ghost.cell = to;
        ghost.direction = step.direction;
        out_events.push(Event::GhostAdvanced {
            ghost: step.ghost,
            from,
            to,
        });
        Ok(())
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.clock = self.clock.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        if self.play_state == PlayState::Playing {
            self.campaign.advance_clock(dt);
        }

        for kind in self.player.cooldowns.decay(dt) {
            out_events.push(Event::CooldownReady { kind });
        }

        for entry in self.respawns.advance(dt) {
            self.resolve_respawn(entry.ghost, entry.epoch, out_events);
        }

        let _ = self.weapon_particles.advance(dt, &self.bounds);
        self.advance_transition(dt, out_events);
    }

    fn resolve_respawn(&mut self, ghost: GhostId, epoch: u64, out_events: &mut Vec<Event>) {
        if epoch != self.epoch {
            debug!(ghost = ghost.get(), epoch, current = self.epoch, "stale_respawn_discarded");
            out_events.push(Event::RespawnDiscarded { ghost });
            return;
        }
        let Some(index) = self
            .ghosts
            .iter()
            .position(|candidate| candidate.id == ghost && !candidate.is_alive())
        else {
            out_events.push(Event::RespawnDiscarded { ghost });
            return;
        };

        let occupied: Vec<CellCoord> = self
            .ghosts
            .iter()
            .filter(|other| other.is_alive())
            .map(|other| other.cell)
            .collect();
        let Some(cell) =
            select_strategic_cell(&self.maze, &occupied, Some(self.player.cell), &mut *self.rng)
        else {
            warn!(ghost = ghost.get(), "respawn_deferred");
            self.respawns
                .schedule(ghost, self.config.timing.respawn_delay(), epoch);
            return;
        };

        let entry = &mut self.ghosts[index];
        entry.cell = cell;
        entry.liveness = Liveness::Alive;
        debug!(ghost = ghost.get(), column = cell.column(), row = cell.row(), "ghost_respawned");
        out_events.push(Event::GhostRespawned { ghost, cell });
    }

    fn advance_transition(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if !matches!(
            self.play_state,
            PlayState::LevelComplete | PlayState::GameOver
        ) {
            return;
        }
        self.transition = self.transition.saturating_sub(dt);
        if !self.transition.is_zero() {
            return;
        }

        if self.play_state == PlayState::GameOver {
            self.campaign.reset();
            info!("campaign_reset");
            out_events.push(Event::CampaignReset);
        }
        self.start_level(out_events);
    }

    fn animate_effects(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.celebration.advance(dt, &self.bounds) {
            out_events.push(Event::EffectsSettled {
                set: EffectSet::Celebration,
            });
        }
        if self.defeat.advance(dt, &self.bounds) {
            out_events.push(Event::EffectsSettled {
                set: EffectSet::Defeat,
            });
        }
    }

    fn collect_pellet(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        if self.pellets.collect_at(cell) {
            self.campaign.record_pellet();
            out_events.push(Event::PelletCollected {
                cell,
                remaining: self.pellets.remaining(),
            });
        }
    }

    fn check_collision(&mut self, out_events: &mut Vec<Event>) {
        if self.play_state != PlayState::Playing {
            return;
        }
        if self.ghost_index_at(self.player.cell).is_some() {
            self.lose_life(out_events);
        }
    }

    fn lose_life(&mut self, out_events: &mut Vec<Event>) {
        let remaining = self.campaign.lose_life();
        out_events.push(Event::LifeLost { remaining });
        if remaining == 0 {
            self.game_over(out_events);
            return;
        }

        let entrance = self.maze.entrance();
        self.player.respawn(entrance);
        self.collect_pellet(entrance, out_events);
    }

    fn game_over(&mut self, out_events: &mut Vec<Event>) {
        let level = self.campaign.level();
        let total_score = self.campaign.total_score();
        let count = self.config.effects.defeat_particles;
        let burst = spawn_burst(
            cell_center(self.player.cell),
            count..=count,
            &BurstProfile::defeat(),
            &mut *self.rng,
        );
        self.defeat.extend(burst);
        self.transition = self.config.timing.game_over_delay();

        info!(level, total_score, "game_over");
        self.set_play_state(PlayState::GameOver, out_events);
        out_events.push(Event::GameOver { level, total_score });
    }

    fn complete_level(&mut self, out_events: &mut Vec<Event>) {
        let summary = self.campaign.complete_level();
        let count = self.config.effects.celebration_particles;
        let burst = spawn_burst(
            cell_center(self.player.cell),
            count..=count,
            &BurstProfile::celebration(),
            &mut *self.rng,
        );
        self.celebration.extend(burst);
        self.transition = self.config.timing.level_complete_delay();

        info!(
            level = summary.level,
            level_score = summary.level_score,
            total_score = summary.total_score,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "level_completed"
        );
        self.set_play_state(PlayState::LevelComplete, out_events);
        out_events.push(Event::LevelCompleted {
            level: summary.level,
            level_score: summary.level_score,
            total_score: summary.total_score,
            average_score: summary.average_score,
        });
    }

    fn require_playing(&self) -> Result<(), Rejection> {
        if self.play_state == PlayState::Playing {
            Ok(())
        } else {
            Err(Rejection::NotPlaying(self.play_state))
        }
    }

    fn ghost_index_at(&self, cell: CellCoord) -> Option<usize> {
        self.ghosts
            .iter()
            .position(|ghost| ghost.is_alive() && ghost.cell == cell)
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("play_state", &self.play_state)
            .field("level", &self.campaign.level())
            .field("lives", &self.campaign.lives())
            .field("player", &self.player)
            .field("ghosts", &self.ghosts)
            .field("pellets", &self.pellets.remaining())
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

/// Applies the provided command to the world.
///
/// Rejected commands are logged at debug level and leave both the world and
/// `out_events` unchanged.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let outcome = match command {
        Command::BeginLevel => {
            if world.play_state == PlayState::Loading {
                world.start_level(out_events);
                Ok(())
            } else {
                Err(Rejection::LevelInProgress)
            }
        }
        Command::MovePlayer { direction } => world.move_player(direction, out_events),
        Command::UseAbility { kind } => world.use_ability(kind, out_events),
        Command::MoveGhosts { steps } => world.move_ghosts(steps, out_events),
        Command::Tick { dt } => {
            world.tick(dt, out_events);
            Ok(())
        }
        Command::AnimateEffects { dt } => {
            world.animate_effects(dt, out_events);
            Ok(())
        }
    };

    if let Err(rejection) = outcome {
        debug!(%rejection, "command_rejected");
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use pacboy_core::{
        AbilityKind, CellCoord, Direction, GameConfig, GhostId, GhostIdentity, Maze, PlayState,
    };
    use pacboy_system_effects::{Bounds, Particle, ParticleSet};

    use super::{Liveness, PelletField, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the world was built with.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Current lifecycle stage.
    #[must_use]
    pub fn play_state(world: &World) -> PlayState {
        world.play_state
    }

    /// Maze of the current level.
    #[must_use]
    pub fn maze(world: &World) -> &Maze {
        &world.maze
    }

    /// Pellets still on the board.
    #[must_use]
    pub fn pellets(world: &World) -> &PelletField {
        &world.pellets
    }

    /// Captures the player's position, facing and cooldowns.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            cell: world.player.cell,
            direction: world.player.direction,
            fire_cooldown: world.player.cooldowns.remaining(AbilityKind::Fire),
            freeze_cooldown: world.player.cooldowns.remaining(AbilityKind::Freeze),
        }
    }

    /// Remaining cooldown of an ability. Zero means ready.
    #[must_use]
    pub fn cooldown(world: &World, kind: AbilityKind) -> Duration {
        world.player.cooldowns.remaining(kind)
    }

    /// Captures every adversary of the current level, roaming or not, ordered
    /// by identifier.
    #[must_use]
    pub fn ghost_view(world: &World) -> GhostView {
        let snapshots = world
            .ghosts
            .iter()
            .map(|ghost| GhostSnapshot {
                id: ghost.id,
                identity: ghost.identity,
                cell: ghost.cell,
                direction: ghost.direction,
                liveness: ghost.liveness,
            })
            .collect();
        GhostView { snapshots }
    }

    /// Cells occupied by roaming adversaries.
    #[must_use]
    pub fn ghost_cells(world: &World) -> Vec<CellCoord> {
        world
            .ghosts
            .iter()
            .filter(|ghost| ghost.is_alive())
            .map(|ghost| ghost.cell)
            .collect()
    }

    /// Number of respawns waiting on their delay, stale ones included.
    #[must_use]
    pub fn pending_respawns(world: &World) -> usize {
        world.respawns.len()
    }

    /// Time left before the adversary returns, if it is queued for the
    /// current level.
    #[must_use]
    pub fn respawn_remaining(world: &World, ghost: GhostId) -> Option<Duration> {
        world.respawns.remaining_for(ghost, world.epoch)
    }

    /// Identifier of the current level generation. Bumped on every level start.
    #[must_use]
    pub fn epoch(world: &World) -> u64 {
        world.epoch
    }

    /// Total simulated time.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Campaign counters shown by the HUD.
    #[must_use]
    pub fn campaign(world: &World) -> CampaignSnapshot {
        let campaign = &world.campaign;
        CampaignSnapshot {
            level: campaign.level(),
            lives: campaign.lives(),
            total_score: campaign.total_score(),
            average_score: campaign.average_score(),
            completed_levels: campaign.completed_levels(),
            pellets_collected: campaign.pellets_collected(),
            total_pellets: campaign.total_pellets(),
            level_elapsed: campaign.level_elapsed(),
        }
    }

    /// Time left before a pending level transition fires.
    #[must_use]
    pub fn transition_remaining(world: &World) -> Option<Duration> {
        match world.play_state {
            PlayState::LevelComplete | PlayState::GameOver => Some(world.transition),
            PlayState::Loading | PlayState::Playing => None,
        }
    }

    /// Live weapon particles.
    #[must_use]
    pub fn weapon_particles(world: &World) -> &[Particle] {
        world.weapon_particles.particles()
    }

    /// Celebration particle set.
    #[must_use]
    pub fn celebration(world: &World) -> &ParticleSet {
        &world.celebration
    }

    /// Defeat particle set.
    #[must_use]
    pub fn defeat(world: &World) -> &ParticleSet {
        &world.defeat
    }

    /// Area particles bounce inside.
    #[must_use]
    pub fn particle_bounds(world: &World) -> Bounds {
        world.bounds
    }

    /// Player state captured for adapters.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PlayerSnapshot {
        /// Cell the player occupies.
        pub cell: CellCoord,
        /// Direction the player faces.
        pub direction: Direction,
        /// Remaining Fire Blast cooldown.
        pub fire_cooldown: Duration,
        /// Remaining Freeze Wind cooldown.
        pub freeze_cooldown: Duration,
    }

    /// Read-only snapshot describing all adversaries of the level.
    #[derive(Clone, Debug)]
    pub struct GhostView {
        snapshots: Vec<GhostSnapshot>,
    }

    impl GhostView {
        /// Wraps snapshots captured elsewhere, such as in a replay.
        #[must_use]
        pub fn from_snapshots(snapshots: Vec<GhostSnapshot>) -> Self {
            Self { snapshots }
        }

        /// Iterator over the captured snapshots in identifier order.
        pub fn iter(&self) -> impl Iterator<Item = &GhostSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        pub fn into_vec(self) -> Vec<GhostSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single adversary.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct GhostSnapshot {
        /// Identifier within the current level.
        pub id: GhostId,
        /// Name and color.
        pub identity: GhostIdentity,
        /// Last known cell.
        pub cell: CellCoord,
        /// Direction of the last step.
        pub direction: Direction,
        /// Whether the adversary is roaming.
        pub liveness: Liveness,
    }

    /// Campaign counters captured for adapters.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct CampaignSnapshot {
        /// Current level.
        pub level: u32,
        /// Lives left.
        pub lives: u32,
        /// Cumulative score.
        pub total_score: u64,
        /// Average score per cleared level.
        pub average_score: u64,
        /// Levels cleared this campaign.
        pub completed_levels: u32,
        /// Pellets collected on this level.
        pub pellets_collected: u32,
        /// Pellets the level started with.
        pub total_pellets: u32,
        /// Time spent on this level.
        pub level_elapsed: Duration,
    }
}
