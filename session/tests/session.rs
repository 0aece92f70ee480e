use std::{cell::RefCell, rc::Rc, time::Duration};

use anyhow::{bail, Result as AnyResult};
use pacboy_core::{AbilityKind, CellCoord, Direction, GameConfig, PlayState};
use pacboy_presentation::{AudioSink, Renderer, Scene, UiSink};
use pacboy_session::{Collaborators, Session};
use pacboy_world::query;

#[derive(Clone, Debug, PartialEq)]
enum Note {
    Frame,
    Pellet,
    Fired(AbilityKind),
    Hit(AbilityKind),
    LevelComplete,
    GameOver,
    Score(u64, u64),
    Lives(u32),
    Level(u32),
    Message(String),
}

#[derive(Clone)]
struct Recorder {
    notes: Rc<RefCell<Vec<Note>>>,
    fail: bool,
}

impl Recorder {
    fn record(&self, note: Note) -> AnyResult<()> {
        self.notes.borrow_mut().push(note);
        if self.fail {
            bail!("sink unavailable");
        }
        Ok(())
    }
}

impl Renderer for Recorder {
    fn present(&mut self, _scene: &Scene) -> AnyResult<()> {
        self.record(Note::Frame)
    }
}

impl AudioSink for Recorder {
    fn on_pellet_collected(&mut self) -> AnyResult<()> {
        self.record(Note::Pellet)
    }

    fn on_ability_fired(&mut self, kind: AbilityKind) -> AnyResult<()> {
        self.record(Note::Fired(kind))
    }

    fn on_adversary_hit(&mut self, kind: AbilityKind) -> AnyResult<()> {
        self.record(Note::Hit(kind))
    }

    fn on_level_complete(&mut self) -> AnyResult<()> {
        self.record(Note::LevelComplete)
    }

    fn on_game_over(&mut self) -> AnyResult<()> {
        self.record(Note::GameOver)
    }
}

impl UiSink for Recorder {
    fn on_score_changed(&mut self, total: u64, average: u64) -> AnyResult<()> {
        self.record(Note::Score(total, average))
    }

    fn on_lives_changed(&mut self, lives: u32) -> AnyResult<()> {
        self.record(Note::Lives(lives))
    }

    fn on_level_changed(&mut self, level: u32) -> AnyResult<()> {
        self.record(Note::Level(level))
    }

    fn on_message(&mut self, text: &str, _duration: Duration) -> AnyResult<()> {
        self.record(Note::Message(text.to_owned()))
    }
}

fn session(seed: u64, fail: bool) -> (Session, Rc<RefCell<Vec<Note>>>) {
    let notes = Rc::new(RefCell::new(Vec::new()));
    let recorder = Recorder {
        notes: Rc::clone(&notes),
        fail,
    };
    let collaborators = Collaborators {
        renderer: Box::new(recorder.clone()),
        audio: Box::new(recorder.clone()),
        ui: Box::new(recorder),
    };
    let config = GameConfig {
        seed: Some(seed),
        ..GameConfig::default()
    };
    let session = Session::new(config, collaborators).expect("default config is valid");
    (session, notes)
}

fn count(notes: &Rc<RefCell<Vec<Note>>>, wanted: &Note) -> usize {
    notes.borrow().iter().filter(|note| *note == wanted).count()
}

/// Direction leading off the entrance onto a free walkable cell.
fn open_step(session: &Session) -> (Direction, CellCoord) {
    let world = session.world();
    let maze = query::maze(world);
    let ghosts = query::ghost_cells(world);
    [Direction::Right, Direction::Down]
        .into_iter()
        .find_map(|direction| {
            maze.step(maze.entrance(), direction)
                .filter(|cell| !ghosts.contains(cell))
                .map(|cell| (direction, cell))
        })
        .expect("the entrance always has an open neighbour")
}

#[test]
fn new_session_announces_level_one_and_presents() {
    let (session, notes) = session(1, false);

    assert_eq!(session.play_state(), PlayState::Playing);
    assert!(!session.is_paused());
    assert_eq!(count(&notes, &Note::Level(1)), 1);
    assert_eq!(count(&notes, &Note::Lives(1)), 1);
    assert_eq!(count(&notes, &Note::Frame), 1);
}

#[test]
fn non_unit_moves_are_ignored() {
    let (mut session, notes) = session(2, false);
    let before = session.scene();

    assert!(!session.try_move(1, 1));
    assert!(!session.try_move(2, 0));
    assert!(!session.try_move(0, 0));
    assert!(!session.try_move(0, -1));

    assert_eq!(session.scene(), before);
    assert_eq!(count(&notes, &Note::Frame), 1);
}

#[test]
fn moving_collects_pellet_and_notifies_audio() {
    let (mut session, notes) = session(3, false);
    let (direction, target) = open_step(&session);
    let (dx, dy) = direction.delta();
    let pellets = session.scene().hud.pellets_left;

    assert!(session.try_move(dx, dy));

    let scene = session.scene();
    assert_eq!(scene.player.cell, target);
    assert_eq!(scene.player.direction, direction);
    assert_eq!(scene.hud.pellets_left, pellets - 1);
    assert!(!scene.has_pellet(target));
    assert_eq!(count(&notes, &Note::Pellet), 1);
    assert_eq!(count(&notes, &Note::Frame), 2);
}

#[test]
fn ability_fires_once_per_cooldown() {
    let (mut session, notes) = session(4, false);

    assert!(session.use_ability(AbilityKind::Fire));
    assert!(!session.use_ability(AbilityKind::Fire));
    assert_eq!(count(&notes, &Note::Fired(AbilityKind::Fire)), 1);
    assert_eq!(
        session.scene().player.cooldown(AbilityKind::Fire),
        Duration::from_secs(5)
    );
}

#[test]
fn cooldowns_decay_with_injected_time() {
    let (mut session, _notes) = session(5, false);
    assert!(session.use_ability(AbilityKind::Freeze));

    for _ in 0..250 {
        session.advance(Duration::from_millis(16));
    }
    assert!(query::cooldown(session.world(), AbilityKind::Freeze).is_zero());
    assert!(session.use_ability(AbilityKind::Freeze) || session.play_state() != PlayState::Playing);
}

#[test]
fn pause_freezes_time_and_input() {
    let (mut session, notes) = session(6, false);
    session.pause();
    assert!(session.is_paused());
    let before = session.scene();
    let frames = count(&notes, &Note::Frame);

    session.advance(Duration::from_secs(5));
    assert!(!session.try_move(1, 0));
    assert!(!session.use_ability(AbilityKind::Fire));
    assert_eq!(session.scene(), before);
    assert_eq!(count(&notes, &Note::Frame), frames);

    session.resume();
    assert!(!session.is_paused());
    session.advance(Duration::from_millis(350));
    assert!(count(&notes, &Note::Frame) > frames);
    assert_ne!(session.scene().ghosts, before.ghosts);
}

#[test]
fn failing_collaborators_do_not_disturb_the_simulation() {
    let (mut session, notes) = session(7, true);
    let (direction, target) = open_step(&session);
    let (dx, dy) = direction.delta();

    assert!(session.try_move(dx, dy));
    assert_eq!(session.scene().player.cell, target);
    assert!(session.use_ability(AbilityKind::Freeze));
    session.advance(Duration::from_millis(400));

    assert_eq!(count(&notes, &Note::Pellet), 1);
    assert_eq!(count(&notes, &Note::Fired(AbilityKind::Freeze)), 1);
}

#[test]
fn scene_mirrors_the_world() {
    let (session, _notes) = session(8, false);
    let scene = session.scene();

    assert_eq!(scene.play_state, PlayState::Playing);
    assert_eq!(scene.hud.level, 1);
    assert_eq!(scene.hud.lives, 1);
    assert_eq!(scene.hud.pellets_left as usize, scene.pellets.len());
    assert_eq!(scene.ghosts.len(), 1);
    assert_eq!(scene.ghosts[0].name, "Clement");
    assert_eq!(scene.player.cell, scene.maze.entrance());
    assert_eq!(scene.player.direction, Direction::Right);
}
