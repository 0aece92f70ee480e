use std::time::Duration;

use glam::Vec2;
use pacboy_core::{AbilityKind, CellCoord, Direction};
use pacboy_system_effects::{
    advance, cell_center, spawn_burst, Bounds, BurstProfile, ParticleHint, ParticleSet,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn burst_count_is_drawn_from_range() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let origin = cell_center(CellCoord::new(4, 4));
    let fixed = spawn_burst(origin, 20..=20, &BurstProfile::celebration(), &mut rng);
    assert_eq!(fixed.len(), 20);

    for _ in 0..20 {
        let ranged = spawn_burst(origin, 3..=6, &BurstProfile::defeat(), &mut rng);
        assert!((3..=6).contains(&ranged.len()));
    }

    #[allow(clippy::reversed_empty_ranges)]
    let empty = spawn_burst(origin, 5..=1, &BurstProfile::defeat(), &mut rng);
    assert!(empty.is_empty());
}

#[test]
fn weapon_burst_travels_along_facing() {
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let origin = cell_center(CellCoord::new(2, 2));
    let burst = spawn_burst(
        origin,
        8..=8,
        &BurstProfile::weapon(AbilityKind::Fire, Direction::Right),
        &mut rng,
    );

    assert_eq!(burst.len(), 8);
    for particle in &burst {
        assert_eq!(particle.position, origin);
        assert_eq!(particle.hint, ParticleHint::Flame);
        assert!(particle.velocity.x > 0.0);
        assert!(particle.velocity.x > particle.velocity.y.abs());
    }

    let frost = spawn_burst(
        origin,
        4..=4,
        &BurstProfile::weapon(AbilityKind::Freeze, Direction::Up),
        &mut rng,
    );
    for particle in &frost {
        assert_eq!(particle.hint, ParticleHint::Frost);
        assert!(particle.velocity.y < 0.0);
    }
}

#[test]
fn every_burst_eventually_settles_inside_bounds() {
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    let bounds = Bounds::for_grid(10, 16);
    let mut set = ParticleSet::new();
    set.extend(spawn_burst(
        Vec2::new(5.0, 8.0),
        30..=30,
        &BurstProfile::celebration(),
        &mut rng,
    ));

    let mut settled = false;
    for _ in 0..1_000 {
        for particle in set.particles() {
            assert!(particle.position.x >= bounds.min.x && particle.position.x <= bounds.max.x);
            assert!(particle.position.y >= bounds.min.y && particle.position.y <= bounds.max.y);
        }
        if set.advance(Duration::from_millis(16), &bounds) {
            settled = true;
            break;
        }
    }
    assert!(settled);
    assert!(set.is_empty());
}

#[test]
fn zero_step_keeps_particles() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let mut particles = spawn_burst(
        Vec2::new(1.0, 1.0),
        5..=5,
        &BurstProfile::defeat(),
        &mut rng,
    );
    advance(&mut particles, Duration::ZERO, &Bounds::for_grid(4, 4));
    assert_eq!(particles.len(), 5);
}
