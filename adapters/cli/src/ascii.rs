//! Terminal renderer that draws the board with box characters.

use std::{
    fmt::Write as _,
    io::{self, Write},
};

use anyhow::{Context, Result};
use pacboy_core::{AbilityKind, CellCoord, CellKind, Direction, PlayState};
use pacboy_presentation::{Renderer, Scene};

/// Prints every `every`-th presented frame to a writer.
pub(crate) struct AsciiRenderer {
    out: Box<dyn Write>,
    every: u32,
    presented: u64,
}

impl AsciiRenderer {
    pub(crate) fn stdout(every: u32) -> Self {
        Self::new(Box::new(io::stdout()), every)
    }

    fn new(out: Box<dyn Write>, every: u32) -> Self {
        Self {
            out,
            every,
            presented: 0,
        }
    }
}

impl Renderer for AsciiRenderer {
    fn present(&mut self, scene: &Scene) -> Result<()> {
        if self.every == 0 {
            return Ok(());
        }
        self.presented += 1;
        if (self.presented - 1) % u64::from(self.every) != 0 {
            return Ok(());
        }
        self.out
            .write_all(draw(scene).as_bytes())
            .context("failed to write frame")?;
        self.out.flush().context("failed to flush frame")
    }
}

/// Renders the scene as text: one character per cell with dividers drawn in
/// the gaps, followed by a status line.
pub(crate) fn draw(scene: &Scene) -> String {
    let maze = &scene.maze;
    let (columns, rows) = (maze.columns(), maze.rows());
    let mut text = String::new();

    text.push('+');
    for _ in 0..columns {
        text.push_str("-+");
    }
    text.push('\n');

    for row in 0..rows {
        text.push('|');
        for column in 0..columns {
            let cell = CellCoord::new(column, row);
            text.push(glyph(scene, cell));
            let right = CellCoord::new(column + 1, row);
            let closed = column + 1 == columns || maze.is_move_blocked(cell, right);
            text.push(if closed { '|' } else { ' ' });
        }
        text.push('\n');

        text.push('+');
        for column in 0..columns {
            let cell = CellCoord::new(column, row);
            let below = CellCoord::new(column, row + 1);
            let closed = row + 1 == rows || maze.is_move_blocked(cell, below);
            text.push(if closed { '-' } else { ' ' });
            text.push('+');
        }
        text.push('\n');
    }

    let hud = scene.hud;
    let _ = writeln!(
        text,
        "{} | level {} | lives {} | score {} (avg {}) | pellets {} | fire {} | freeze {} | particles {}",
        state_label(scene.play_state),
        hud.level,
        hud.lives,
        hud.total_score,
        hud.average_score,
        hud.pellets_left,
        cooldown_label(scene, AbilityKind::Fire),
        cooldown_label(scene, AbilityKind::Freeze),
        scene.particles.len(),
    );
    text
}

fn glyph(scene: &Scene, cell: CellCoord) -> char {
    if scene.player.cell == cell {
        return match scene.player.direction {
            Direction::Up => '^',
            Direction::Down => 'v',
            Direction::Left => '<',
            Direction::Right => '>',
        };
    }
    if let Some(ghost) = scene.ghost_at(cell) {
        return ghost.name.chars().next().unwrap_or('G');
    }
    match scene.maze.cell_kind(cell) {
        Some(CellKind::Exit) => 'E',
        Some(CellKind::Wall) => '#',
        _ if scene.has_pellet(cell) => '.',
        _ => ' ',
    }
}

fn state_label(state: PlayState) -> &'static str {
    match state {
        PlayState::Loading => "LOADING",
        PlayState::Playing => "PLAYING",
        PlayState::LevelComplete => "LEVEL COMPLETE",
        PlayState::GameOver => "GAME OVER",
    }
}

fn cooldown_label(scene: &Scene, kind: AbilityKind) -> String {
    let remaining = scene.player.cooldown(kind);
    if remaining.is_zero() {
        "ready".to_owned()
    } else {
        format!("{:.1}s", remaining.as_secs_f32())
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc, time::Duration};

    use pacboy_core::{Maze, GHOST_ROSTER};
    use pacboy_presentation::{GhostPresentation, Hud, PlayerPresentation};

    use super::*;

    fn scene() -> Scene {
        let mut maze = Maze::open(3, 2);
        let _ = maze.add_divider(
            Maze::divider_between(CellCoord::new(0, 0), CellCoord::new(1, 0))
                .expect("cells are adjacent"),
        );
        Scene {
            play_state: PlayState::Playing,
            pellets: vec![CellCoord::new(1, 0), CellCoord::new(0, 1)],
            maze,
            player: PlayerPresentation {
                cell: CellCoord::new(0, 0),
                direction: Direction::Down,
                fire_cooldown: Duration::from_millis(1_500),
                freeze_cooldown: Duration::ZERO,
            },
            ghosts: vec![GhostPresentation {
                name: GHOST_ROSTER[2].name(),
                color: GHOST_ROSTER[2].color().into(),
                cell: CellCoord::new(2, 0),
                direction: Direction::Left,
            }],
            particles: Vec::new(),
            hud: Hud {
                level: 4,
                lives: 1,
                total_score: 900,
                average_score: 300,
                pellets_left: 2,
            },
        }
    }

    #[test]
    fn board_shows_actors_dividers_and_hud() {
        let text = draw(&scene());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "+-+-+-+");
        assert_eq!(lines[1], "|v|. R|");
        assert_eq!(lines[2], "+ + + +");
        assert_eq!(lines[3], "|.   E|");
        assert_eq!(lines[4], "+-+-+-+");
        assert!(lines[5].starts_with("PLAYING | level 4 | lives 1 | score 900 (avg 300)"));
        assert!(lines[5].contains("fire 1.5s | freeze ready"));
    }

    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn only_every_nth_frame_is_printed() {
        let buffer = SharedBuffer::default();
        let mut renderer = AsciiRenderer::new(Box::new(buffer.clone()), 3);
        let scene = scene();
        for _ in 0..4 {
            renderer.present(&scene).expect("buffer accepts writes");
        }
        let printed = String::from_utf8(buffer.0.borrow().clone()).expect("utf8");
        assert_eq!(printed.matches("PLAYING").count(), 2);

        let mut silent = AsciiRenderer::new(Box::new(buffer.clone()), 0);
        silent.present(&scene).expect("nothing to write");
        let printed = String::from_utf8(buffer.0.borrow().clone()).expect("utf8");
        assert_eq!(printed.matches("PLAYING").count(), 2);
    }
}
