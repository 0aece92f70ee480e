#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Caller-owned game session.
//!
//! A [`Session`] wires the world, the adversary movement system, the
//! scheduler and the presentation collaborators together. Time is injected
//! through [`Session::advance`]; input arrives through [`Session::try_move`]
//! and [`Session::use_ability`].

use std::time::Duration;

use anyhow::Result as AnyResult;
use pacboy_core::{
    config::{ConfigError, GameConfig},
    AbilityKind, Command, Direction, Event, PlayState,
};
use pacboy_presentation::{
    AudioSink, GhostPresentation, Hud, Muted, ParticlePresentation, PlayerPresentation, Renderer,
    Scene, UiSink,
};
use pacboy_system_ghost_movement::GhostMovement;
use pacboy_system_scheduler::{Lane, Scheduler};
use pacboy_world::{self as world, query, Liveness, World};
use tracing::{info, warn};

/// Adapters the session reports to.
pub struct Collaborators {
    /// Frame sink.
    pub renderer: Box<dyn Renderer>,
    /// Sound notifications.
    pub audio: Box<dyn AudioSink>,
    /// HUD notifications.
    pub ui: Box<dyn UiSink>,
}

impl Collaborators {
    /// Collaborators that discard everything.
    #[must_use]
    pub fn muted() -> Self {
        Self {
            renderer: Box::new(Muted),
            audio: Box::new(Muted),
            ui: Box::new(Muted),
        }
    }
}

/// A running game owned by its caller.
pub struct Session {
    world: World,
    movement: GhostMovement,
    scheduler: Scheduler,
    collaborators: Collaborators,
    unseen: Vec<Event>,
    paused: bool,
}

impl Session {
    /// Builds the world, starts level 1 and the scheduler, and presents the
    /// first frame.
    pub fn new(config: GameConfig, collaborators: Collaborators) -> Result<Self, ConfigError> {
        let movement = match config.seed {
            // Separate stream so adversary AI does not shift maze generation.
            Some(seed) => GhostMovement::seeded(seed.wrapping_add(1)),
            None => GhostMovement::from_entropy(),
        };
        let scheduler = Scheduler::from_timing(&config.timing);
        let world = World::new(config)?;

        let mut session = Self {
            world,
            movement,
            scheduler,
            collaborators,
            unseen: Vec::new(),
            paused: false,
        };
        let _ = session.run(Command::BeginLevel);
        session.scheduler.start();
        session.present();
        Ok(session)
    }

    /// Feeds elapsed wall-clock time through the scheduler and runs every
    /// tick that became due. Presents at most one frame.
    pub fn advance(&mut self, dt: Duration) {
        if self.paused {
            return;
        }

        let mut visible = false;
        for tick in self.scheduler.advance(dt) {
            let events = match tick.lane {
                Lane::GhostMovement => self.move_ghosts(),
                Lane::Weapons => {
                    let events = self.run(Command::Tick { dt: tick.elapsed });
                    visible |= !query::weapon_particles(&self.world).is_empty();
                    events
                }
                Lane::Effects => {
                    let events = self.run(Command::AnimateEffects { dt: tick.elapsed });
                    visible |= query::celebration(&self.world).is_animating()
                        || query::defeat(&self.world).is_animating();
                    events
                }
            };
            visible |= events
                .iter()
                .any(|event| !matches!(event, Event::TimeAdvanced { .. }));
        }

        if visible {
            self.present();
        }
    }

    /// Requests a one-cell move. Anything other than a unit vector along one
    /// axis is ignored. Returns whether the player moved.
    pub fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        if self.paused {
            return false;
        }
        let Some(direction) = Direction::from_delta(dx, dy) else {
            return false;
        };
        let events = self.run(Command::MovePlayer { direction });
        if events.is_empty() {
            return false;
        }
        self.present();
        true
    }

    /// Activates an ability. Returns whether it fired.
    pub fn use_ability(&mut self, kind: AbilityKind) -> bool {
        if self.paused {
            return false;
        }
        let events = self.run(Command::UseAbility { kind });
        if events.is_empty() {
            return false;
        }
        self.present();
        true
    }

    /// Halts every schedule. World state is kept as is.
    pub fn pause(&mut self) {
        if self.paused {
            return;
        }
        self.paused = true;
        self.scheduler.stop();
        info!("session_paused");
    }

    /// Restarts the schedules from the current state.
    pub fn resume(&mut self) {
        if !self.paused {
            return;
        }
        self.paused = false;
        self.scheduler.start();
        info!("session_resumed");
    }

    /// Whether the session is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Current simulation state.
    #[must_use]
    pub fn play_state(&self) -> PlayState {
        query::play_state(&self.world)
    }

    /// Read-only access to the world for adapters and tests.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Captures everything a renderer needs for the current frame.
    #[must_use]
    pub fn scene(&self) -> Scene {
        let world = &self.world;
        let player = query::player(world);
        let campaign = query::campaign(world);
        let ghosts = query::ghost_view(world)
            .iter()
            .filter(|ghost| ghost.liveness == Liveness::Alive)
            .map(|ghost| GhostPresentation {
                name: ghost.identity.name(),
                color: ghost.identity.color().into(),
                cell: ghost.cell,
                direction: ghost.direction,
            })
            .collect();
        let particles = query::weapon_particles(world)
            .iter()
            .chain(query::celebration(world).particles())
            .chain(query::defeat(world).particles())
            .map(ParticlePresentation::from)
            .collect();

        Scene {
            play_state: query::play_state(world),
            maze: query::maze(world).clone(),
            pellets: query::pellets(world).iter().collect(),
            player: PlayerPresentation {
                cell: player.cell,
                direction: player.direction,
                fire_cooldown: player.fire_cooldown,
                freeze_cooldown: player.freeze_cooldown,
            },
            ghosts,
            particles,
            hud: Hud {
                level: campaign.level,
                lives: campaign.lives,
                total_score: campaign.total_score,
                average_score: campaign.average_score,
                pellets_left: query::pellets(world).remaining(),
            },
        }
    }

    fn move_ghosts(&mut self) -> Vec<Event> {
        let mut commands = Vec::new();
        self.movement.handle(
            &self.unseen,
            &query::ghost_view(&self.world),
            query::maze(&self.world),
            &mut commands,
        );
        self.unseen.clear();

        let mut events = Vec::new();
        for command in commands {
            events.extend(self.run(command));
        }
        events
    }

    fn run(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        for event in &events {
            self.notify(event);
        }
        self.unseen.extend(events.iter().cloned());
        events
    }

    fn present(&mut self) {
        let scene = self.scene();
        report("renderer", self.collaborators.renderer.present(&scene));
    }

    fn notify(&mut self, event: &Event) {
        let message_duration = query::config(&self.world).timing.message_duration();
        let audio = &mut self.collaborators.audio;
        let ui = &mut self.collaborators.ui;
        match event {
            Event::PelletCollected { .. } => report("audio", audio.on_pellet_collected()),
            Event::AbilityFired { kind, .. } => report("audio", audio.on_ability_fired(*kind)),
            Event::GhostHit { kind, .. } => report("audio", audio.on_adversary_hit(*kind)),
            Event::LevelStarted { level, lives, .. } => {
                report("ui", ui.on_level_changed(*level));
                report("ui", ui.on_lives_changed(*lives));
            }
            Event::LevelCompleted {
                level,
                level_score,
                total_score,
                average_score,
            } => {
                report("audio", audio.on_level_complete());
                report("ui", ui.on_score_changed(*total_score, *average_score));
                let text = format!("Level {level} complete! +{level_score}");
                report("ui", ui.on_message(&text, message_duration));
            }
            Event::LifeLost { remaining } => {
                report("ui", ui.on_lives_changed(*remaining));
                let text = if *remaining == 0 {
                    "Caught! No lives left".to_owned()
                } else {
                    format!("Caught! {remaining} lives left")
                };
                report("ui", ui.on_message(&text, message_duration));
            }
            Event::GameOver { total_score, .. } => {
                report("audio", audio.on_game_over());
                let text = format!("Game over! Final score {total_score}");
                report("ui", ui.on_message(&text, message_duration));
            }
            Event::CampaignReset => report("ui", ui.on_score_changed(0, 0)),
            _ => {}
        }
    }
}

fn report(collaborator: &'static str, result: AnyResult<()>) {
    if let Err(error) = result {
        warn!(collaborator, error = %error, "collaborator_failed");
    }
}
