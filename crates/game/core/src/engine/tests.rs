use super::*;
use crate::error::{ActionKind, SlotRef};
use crate::event::{HitSource, ProjectileId};
use crate::skills::Element;

const TICK: Duration = Duration::from_millis(10);

fn no_regen(mut def: CharacterDef) -> CharacterDef {
    def.mana_regen = 0.0;
    def
}

fn engine_with(rules: MatchRules, p1: CharacterDef, p2: CharacterDef) -> CombatEngine {
    CombatEngine::new(rules, &p1, &p2).expect("valid setup")
}

fn duel() -> CombatEngine {
    engine_with(
        MatchRules::default(),
        no_regen(CharacterDef::prodigy()),
        no_regen(CharacterDef::prodigy()),
    )
}

/// Rules where a single basic hit fills the victim's ultimate.
fn quick_ultimates() -> MatchRules {
    let mut rules = MatchRules::default();
    rules.ultimate.max_charge = 5.0;
    rules
}

fn run(engine: &mut CombatEngine, ticks: u32) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        engine.advance(TICK);
        events.extend(engine.drain_events());
    }
    events
}

// ============================================================================
// Setup
// ============================================================================

#[test]
fn default_spawns_face_each_other() {
    let engine = duel();
    assert_eq!(engine.position(CombatantId::P1), Position::new(1, 2));
    assert_eq!(engine.position(CombatantId::P2), Position::new(6, 2));
    assert_eq!(engine.facing(CombatantId::P1), LaneDirection::Rightward);
    assert_eq!(engine.facing(CombatantId::P2), LaneDirection::Leftward);
}

#[test]
fn rejects_bad_setups() {
    let mut narrow = MatchRules::default();
    narrow.grid.width = 1;
    assert!(matches!(
        CombatEngine::new(narrow, &CharacterDef::prodigy(), &CharacterDef::prodigy()),
        Err(SetupError::GridTooSmall { width: 1, .. })
    ));

    let mut enemy_half = MatchRules::default();
    enemy_half.spawn.p1 = Some(Position::new(6, 1));
    assert!(matches!(
        CombatEngine::new(enemy_half, &CharacterDef::prodigy(), &CharacterDef::prodigy()),
        Err(SetupError::SpawnNotWalkable { .. })
    ));

    let mut outside = MatchRules::default();
    outside.spawn.p2 = Some(Position::new(9, 0));
    assert!(matches!(
        CombatEngine::new(outside, &CharacterDef::prodigy(), &CharacterDef::prodigy()),
        Err(SetupError::SpawnOutOfBounds { .. })
    ));
}

#[test]
fn destination_checks_bounds_territory_and_occupant() {
    let grid = TileGrid::new(&MatchRules::default().grid);
    let check = |to: Position, blocker: Option<Position>| {
        check_destination(&grid, CombatantId::P1, Side::Left, blocker, to)
    };

    assert!(check(Position::new(2, 0), None).is_ok());
    assert!(matches!(
        check(Position::new(-1, 0), None),
        Err(CommandError::OutOfBounds { .. })
    ));
    assert!(matches!(
        check(Position::new(4, 0), None),
        Err(CommandError::NotWalkable { .. })
    ));
    assert!(matches!(
        check(Position::new(2, 0), Some(Position::new(2, 0))),
        Err(CommandError::Occupied { .. })
    ));
}

// ============================================================================
// Movement
// ============================================================================

#[test]
fn step_commits_after_step_duration() {
    let mut engine = duel();
    engine
        .request_step(CombatantId::P1, CardinalDirection::East)
        .unwrap();
    assert!(matches!(
        engine.movement_phase(CombatantId::P1),
        MovementPhase::Stepping { .. }
    ));

    let events = run(&mut engine, 20);
    assert_eq!(engine.position(CombatantId::P1), Position::new(2, 2));
    assert!(events.contains(&Event::Stepped {
        combatant: CombatantId::P1,
        from: Position::new(1, 2),
        to: Position::new(2, 2),
    }));
}

#[test]
fn cannot_step_into_enemy_territory() {
    let mut rules = MatchRules::default();
    rules.spawn.p1 = Some(Position::new(3, 2));
    let mut engine = engine_with(rules, CharacterDef::prodigy(), CharacterDef::prodigy());

    let err = engine.request_step(CombatantId::P1, CardinalDirection::East);
    assert!(matches!(err, Err(CommandError::NotWalkable { .. })));
    assert_eq!(engine.movement_phase(CombatantId::P1), MovementPhase::Idle);
}

#[test]
fn held_intent_walks_until_the_midline() {
    let mut engine = duel();
    engine.set_move_intent(CombatantId::P1, Some(CardinalDirection::East));
    run(&mut engine, 200);
    assert_eq!(engine.position(CombatantId::P1), Position::new(3, 2));
    assert_eq!(engine.heading(CombatantId::P1), CardinalDirection::East);
}

#[test]
fn step_committed_this_tick_is_where_the_projectile_finds_its_target() {
    let mut rules = MatchRules::default();
    rules.spawn.p2 = Some(Position::new(6, 1));
    let mut engine = engine_with(rules, CharacterDef::prodigy(), CharacterDef::prodigy());

    engine.fire_basic_attack(CombatantId::P1).unwrap();
    // 2.7 cells: the projectile glides inside (4, 2).
    engine.advance(Duration::from_millis(300));
    assert_eq!(engine.projectiles()[0].cell(), Position::new(4, 2));

    engine
        .request_step(CombatantId::P2, CardinalDirection::North)
        .unwrap();
    engine.drain_events();

    // The step commits and the projectile enters (6, 2) in the same tick.
    engine.advance(Duration::from_millis(210));
    let events = engine.drain_events();
    assert_eq!(engine.position(CombatantId::P2), Position::new(6, 2));
    assert_eq!(engine.health(CombatantId::P2), 190);

    let stepped = events
        .iter()
        .position(|e| matches!(e, Event::Stepped { .. }))
        .expect("step committed");
    let hit = events
        .iter()
        .position(|e| matches!(e, Event::HitLanded { .. }))
        .expect("hit landed");
    assert!(stepped < hit);
}

// ============================================================================
// Projectiles and parry
// ============================================================================

#[test]
fn basic_attack_hits_opponent_once() {
    let mut engine = duel();
    engine.fire_basic_attack(CombatantId::P1).unwrap();
    assert!(matches!(
        engine.fire_basic_attack(CombatantId::P1),
        Err(CommandError::OnCooldown {
            action: ActionKind::BasicAttack,
            ..
        })
    ));

    let events = run(&mut engine, 100);
    assert_eq!(engine.health(CombatantId::P2), 190);
    let hits = events
        .iter()
        .filter(|e| matches!(e, Event::HitLanded { .. }))
        .count();
    assert_eq!(hits, 1);
    assert!((engine.ultimate_meter(CombatantId::P1) - 3.0).abs() < 1e-4);
    assert!((engine.ultimate_meter(CombatantId::P2) - 7.0).abs() < 1e-4);
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::ProjectileRemoved { .. })));
    assert!(engine.projectiles().is_empty());
}

#[test]
fn projectile_leaving_the_grid_lingers_for_grace_period() {
    let mut rules = MatchRules::default();
    rules.spawn.p2 = Some(Position::new(6, 0));
    let mut engine = engine_with(rules, CharacterDef::prodigy(), CharacterDef::prodigy());
    engine.fire_basic_attack(CombatantId::P1).unwrap();

    // Seven cells to the far edge at 9 cells/s.
    run(&mut engine, 100);
    assert_eq!(engine.projectiles().len(), 1);
    assert!(!engine.projectiles()[0].is_in_flight());

    run(&mut engine, 160);
    assert!(engine.projectiles().is_empty());
    assert_eq!(engine.health(CombatantId::P2), 200);
}

#[test]
fn parry_deflects_projectile_back_at_its_owner() {
    let mut engine = duel();
    engine.fire_basic_attack(CombatantId::P1).unwrap();
    run(&mut engine, 40);
    engine.try_parry(CombatantId::P2).unwrap();
    assert_eq!(engine.parry_phase(CombatantId::P2), ParryPhase::Active);

    let events = run(&mut engine, 110);

    assert!(events.contains(&Event::HitParried {
        defender: CombatantId::P2,
        source: HitSource::Projectile(ProjectileId(0)),
    }));
    let deflected = events.iter().find_map(|e| match e {
        Event::ProjectileDeflected {
            owner,
            damage,
            speed,
            count,
            ..
        } => Some((*owner, *damage, *speed, *count)),
        _ => None,
    });
    assert_eq!(deflected, Some((CombatantId::P2, 20, 13.5, 1)));

    assert_eq!(engine.health(CombatantId::P2), 200);
    assert_eq!(engine.health(CombatantId::P1), 180);
    // Prepaid 2, refunded 1.
    assert_eq!(engine.mana(CombatantId::P2), Mana::from_points(4.0));
}

#[test]
fn parry_without_success_costs_full_prepay() {
    let mut engine = duel();
    engine.try_parry(CombatantId::P2).unwrap();
    assert!(matches!(
        engine.try_parry(CombatantId::P2),
        Err(CommandError::ParryUnavailable { .. })
    ));

    let events = run(&mut engine, 30);
    assert_eq!(engine.parry_phase(CombatantId::P2), ParryPhase::Cooldown);
    assert!(events.contains(&Event::ParryEnded {
        combatant: CombatantId::P2,
        deflections: 0,
    }));
    assert_eq!(engine.mana(CombatantId::P2), Mana::from_points(3.0));

    run(&mut engine, 30);
    assert_eq!(engine.parry_phase(CombatantId::P2), ParryPhase::Ready);
}

#[test]
fn regen_does_not_open_a_parry_window() {
    let mut slow = CharacterDef::prodigy();
    slow.max_mana = 3.0;
    slow.mana_regen = 1.0;
    let mut engine = engine_with(MatchRules::default(), CharacterDef::prodigy(), slow);

    engine.try_parry(CombatantId::P2).unwrap();
    assert_eq!(engine.mana(CombatantId::P2), Mana::from_points(1.0));

    // Window and cooldown are over; regen has brought 1.0 up to about 1.6.
    run(&mut engine, 60);
    assert_eq!(engine.parry_phase(CombatantId::P2), ParryPhase::Ready);
    let before = engine.mana(CombatantId::P2);
    assert!(before < Mana::from_points(2.0));
    assert!(matches!(
        engine.try_parry(CombatantId::P2),
        Err(CommandError::ParryUnavailable { .. })
    ));
    assert_eq!(engine.mana(CombatantId::P2), before);

    // Regen crosses the prepay during these ticks, but only an intent opens
    // a window.
    let events = run(&mut engine, 50);
    assert!(engine.mana(CombatantId::P2) >= Mana::from_points(2.0));
    assert_eq!(engine.parry_phase(CombatantId::P2), ParryPhase::Ready);
    assert!(!events
        .iter()
        .any(|e| matches!(e, Event::ParryStarted { .. })));

    engine.try_parry(CombatantId::P2).unwrap();
    assert_eq!(engine.parry_phase(CombatantId::P2), ParryPhase::Active);
    assert!(engine.mana(CombatantId::P2) < Mana::from_points(0.2));
}

// ============================================================================
// Skills
// ============================================================================

#[test]
fn bolt_fires_after_its_delay() {
    let mut engine = duel();
    engine
        .cast_skill(CombatantId::P1, SlotRef::Skill(0), None)
        .unwrap();
    assert_eq!(engine.mana(CombatantId::P1), Mana::from_points(3.5));

    run(&mut engine, 9);
    assert!(engine.projectiles().is_empty());
    run(&mut engine, 1);
    assert_eq!(engine.projectiles().len(), 1);
    assert_eq!(engine.projectiles()[0].damage(), 20);
}

#[test]
fn cast_rejections_change_nothing() {
    let mut engine = duel();
    assert!(matches!(
        engine.cast_skill(CombatantId::P1, SlotRef::Skill(7), None),
        Err(CommandError::EmptySlot { .. })
    ));
    assert!(matches!(
        engine.cast_skill(CombatantId::P1, SlotRef::Ultimate, None),
        Err(CommandError::UltimateNotReady { .. })
    ));
    assert_eq!(engine.mana(CombatantId::P1), Mana::from_points(5.0));

    engine
        .cast_skill(CombatantId::P1, SlotRef::Skill(0), None)
        .unwrap();
    assert!(matches!(
        engine.cast_skill(CombatantId::P1, SlotRef::Skill(1), None),
        Err(CommandError::CastLocked { .. })
    ));
    assert!(matches!(
        engine.fire_basic_attack(CombatantId::P1),
        Err(CommandError::CastLocked { .. })
    ));
    assert!(matches!(
        engine.request_step(CombatantId::P1, CardinalDirection::North),
        Err(CommandError::MovementDisabled { .. })
    ));

    run(&mut engine, 40);
    assert!(matches!(
        engine.cast_skill(CombatantId::P1, SlotRef::Skill(0), None),
        Err(CommandError::OnCooldown {
            action: ActionKind::Skill,
            ..
        })
    ));

    // 3.5 left; the dash needs 3, the bolt cooldown has not run out.
    engine
        .cast_skill(CombatantId::P1, SlotRef::Skill(2), None)
        .unwrap();
    run(&mut engine, 100);
    assert!(matches!(
        engine.cast_skill(CombatantId::P1, SlotRef::Skill(1), None),
        Err(CommandError::InsufficientMana { .. })
    ));
    assert_eq!(engine.mana(CombatantId::P1), Mana::from_points(0.5));
}

#[test]
fn pulse_damages_occupant_and_breaks_empty_cells() {
    let mut engine = duel();
    engine
        .cast_skill(CombatantId::P1, SlotRef::Skill(1), Some(Position::new(6, 2)))
        .unwrap();

    run(&mut engine, 15);
    // 20 × lerp(1.0, 1.3, 5/7) = 24.29
    assert_eq!(engine.health(CombatantId::P2), 176);
    assert_eq!(
        engine.tile(Position::new(6, 2)),
        Some(TileState::Cracked(Some(Side::Right)))
    );
    assert_eq!(
        engine.tile(Position::new(7, 2)),
        Some(TileState::Broken(Some(Side::Right)))
    );

    run(&mut engine, 150);
    assert_eq!(
        engine.tile(Position::new(6, 2)),
        Some(TileState::Owned(Side::Right))
    );
    run(&mut engine, 50);
    assert_eq!(
        engine.tile(Position::new(7, 2)),
        Some(TileState::Owned(Side::Right))
    );
}

#[test]
fn pulse_breaks_the_casters_own_cell() {
    let mut engine = duel();
    engine
        .cast_skill(CombatantId::P1, SlotRef::Skill(1), None)
        .unwrap();

    run(&mut engine, 20);
    assert_eq!(engine.health(CombatantId::P1), 200);
    for x in [1, 2] {
        assert_eq!(
            engine.tile(Position::new(x, 2)),
            Some(TileState::Broken(Some(Side::Left)))
        );
    }
}

#[test]
fn parried_pulse_spares_target_and_tile() {
    let mut engine = duel();
    engine
        .cast_skill(CombatantId::P1, SlotRef::Skill(1), Some(Position::new(6, 2)))
        .unwrap();
    engine.try_parry(CombatantId::P2).unwrap();

    let events = run(&mut engine, 20);
    assert_eq!(engine.health(CombatantId::P2), 200);
    assert_eq!(
        engine.tile(Position::new(6, 2)),
        Some(TileState::Owned(Side::Right))
    );
    assert!(events.contains(&Event::HitParried {
        defender: CombatantId::P2,
        source: HitSource::Area,
    }));
    assert_eq!(engine.mana(CombatantId::P2), Mana::from_points(4.0));
}

#[test]
fn dash_strikes_aim_column_and_returns() {
    let mut engine = duel();
    engine
        .cast_skill(CombatantId::P1, SlotRef::Skill(2), Some(Position::new(6, 2)))
        .unwrap();

    run(&mut engine, 30);
    assert_eq!(engine.position(CombatantId::P1), Position::new(5, 2));
    // Adjacent column: 10 × 1.043
    assert_eq!(engine.health(CombatantId::P2), 190);

    let events = run(&mut engine, 70);
    assert_eq!(engine.position(CombatantId::P1), Position::new(1, 2));
    assert!(events.contains(&Event::Teleported {
        combatant: CombatantId::P1,
        from: Position::new(5, 2),
        to: Position::new(1, 2),
    }));
}

#[test]
fn three_fire_hits_trigger_overload() {
    let mut engine = engine_with(
        MatchRules::default(),
        CharacterDef::prodigy(),
        no_regen(CharacterDef::arcanist()),
    );

    let mut events = Vec::new();
    for _ in 0..3 {
        engine
            .cast_skill(CombatantId::P2, SlotRef::Skill(0), None)
            .unwrap();
        events.extend(run(&mut engine, 160));
    }

    assert_eq!(engine.health(CombatantId::P1), 140);
    let overloads: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, Event::Overload { .. }))
        .collect();
    assert_eq!(
        overloads,
        vec![&Event::Overload {
            target: CombatantId::P1,
            element: Element::Fire,
        }]
    );
    assert!(engine.combatant(CombatantId::P1).elements.is_empty());
}

#[test]
fn landing_a_hit_triggers_quick_sync() {
    let mut engine = duel();
    engine.fire_basic_attack(CombatantId::P1).unwrap();
    run(&mut engine, 60);
    assert_eq!(engine.combatant(CombatantId::P1).speed_multiplier(), 1.25);
    run(&mut engine, 110);
    assert_eq!(engine.combatant(CombatantId::P1).speed_multiplier(), 1.0);
}

// ============================================================================
// Takeover
// ============================================================================

#[test]
fn takeover_claims_front_column_and_pushes_opponent_back() {
    let mut rules = quick_ultimates();
    rules.spawn.p1 = Some(Position::new(3, 1));
    rules.spawn.p2 = Some(Position::new(6, 1));
    let mut engine = engine_with(rules, CharacterDef::prodigy(), CharacterDef::prodigy());

    engine.fire_basic_attack(CombatantId::P1).unwrap();
    run(&mut engine, 50);
    engine
        .cast_skill(CombatantId::P2, SlotRef::Ultimate, None)
        .unwrap();
    let events = engine.drain_events();

    for y in 0..3 {
        assert_eq!(
            engine.tile(Position::new(3, y)),
            Some(TileState::Owned(Side::Right))
        );
    }
    assert_eq!(
        engine.tile(Position::new(3, 3)),
        Some(TileState::Owned(Side::Left))
    );
    assert_eq!(engine.position(CombatantId::P1), Position::new(2, 1));
    assert_eq!(engine.ultimate_meter(CombatantId::P2), 0.0);
    assert!(events.iter().any(|e| matches!(
        e,
        Event::TakeoverStarted {
            claimant: Side::Right,
            ..
        }
    )));
    assert!(matches!(
        engine.request_step(CombatantId::P1, CardinalDirection::East),
        Err(CommandError::NotWalkable { .. })
    ));

    let events = run(&mut engine, 500);
    assert!(events.contains(&Event::TakeoverEnded {
        claimant: Side::Right
    }));
    for y in 0..3 {
        assert_eq!(
            engine.tile(Position::new(3, y)),
            Some(TileState::Owned(Side::Left))
        );
    }
    assert!(engine.active_claim(Side::Right).is_none());
    assert!(engine.grid().takeover_mark(Position::new(3, 1)).is_none());
}

/// Both combatants trade basic hits so both ultimates are full.
fn charged_duel() -> CombatEngine {
    let mut engine = engine_with(
        quick_ultimates(),
        CharacterDef::prodigy(),
        CharacterDef::prodigy(),
    );
    engine.fire_basic_attack(CombatantId::P1).unwrap();
    engine.fire_basic_attack(CombatantId::P2).unwrap();
    run(&mut engine, 100);
    engine
}

#[test]
fn late_opposing_takeover_cancels_both() {
    let mut engine = charged_duel();
    engine
        .cast_skill(CombatantId::P1, SlotRef::Ultimate, None)
        .unwrap();
    assert_eq!(
        engine.tile(Position::new(4, 1)),
        Some(TileState::Owned(Side::Left))
    );

    run(&mut engine, 50);
    engine
        .cast_skill(CombatantId::P2, SlotRef::Ultimate, None)
        .unwrap();

    assert!(engine.pending_events().contains(&Event::TakeoverCancelled));
    assert_eq!(
        engine.tile(Position::new(4, 1)),
        Some(TileState::Owned(Side::Right))
    );
    assert_eq!(
        engine.tile(Position::new(3, 1)),
        Some(TileState::Owned(Side::Left))
    );
    assert!(engine.active_claim(Side::Left).is_none());
    assert!(engine.active_claim(Side::Right).is_none());
}

#[test]
fn near_simultaneous_takeovers_coexist() {
    let mut engine = charged_duel();
    engine
        .cast_skill(CombatantId::P1, SlotRef::Ultimate, None)
        .unwrap();
    run(&mut engine, 5);
    engine
        .cast_skill(CombatantId::P2, SlotRef::Ultimate, None)
        .unwrap();

    assert!(engine.active_claim(Side::Left).is_some());
    assert!(engine.active_claim(Side::Right).is_some());
    assert_eq!(
        engine.tile(Position::new(4, 1)),
        Some(TileState::Owned(Side::Left))
    );
    assert_eq!(
        engine.tile(Position::new(3, 1)),
        Some(TileState::Owned(Side::Right))
    );
}

// ============================================================================
// Death and respawn
// ============================================================================

#[test]
fn death_fires_once_and_blocks_intents_until_respawn() {
    let mut fragile = CharacterDef::prodigy();
    fragile.max_health = 10;
    let mut engine = engine_with(MatchRules::default(), CharacterDef::prodigy(), fragile);

    engine.fire_basic_attack(CombatantId::P1).unwrap();
    let events = run(&mut engine, 100);
    let deaths = events
        .iter()
        .filter(|e| matches!(e, Event::Died { .. }))
        .count();
    assert_eq!(deaths, 1);
    assert!(!engine.is_alive(CombatantId::P2));
    assert!(matches!(
        engine.cast_skill(CombatantId::P2, SlotRef::Skill(0), None),
        Err(CommandError::Dead { .. })
    ));
    assert!(matches!(
        engine.try_parry(CombatantId::P2),
        Err(CommandError::Dead { .. })
    ));

    engine.respawn(CombatantId::P2).unwrap();
    assert!(engine.is_alive(CombatantId::P2));
    assert_eq!(engine.health(CombatantId::P2), 10);
    assert_eq!(engine.position(CombatantId::P2), Position::new(6, 2));
}

#[test]
fn living_combatant_cannot_respawn() {
    let mut engine = duel();
    engine.fire_basic_attack(CombatantId::P1).unwrap();
    engine
        .request_step(CombatantId::P2, CardinalDirection::East)
        .unwrap();
    run(&mut engine, 100);
    assert_eq!(engine.health(CombatantId::P2), 190);
    assert_eq!(engine.position(CombatantId::P2), Position::new(7, 2));

    assert!(matches!(
        engine.respawn(CombatantId::P2),
        Err(CommandError::Alive { .. })
    ));
    assert!(engine.drain_events().is_empty());
    assert_eq!(engine.health(CombatantId::P2), 190);
    assert_eq!(engine.position(CombatantId::P2), Position::new(7, 2));
}

#[test]
fn dead_caster_continuations_are_dropped() {
    let mut rules = MatchRules::default();
    rules.spawn.p1 = Some(Position::new(3, 2));
    rules.spawn.p2 = Some(Position::new(4, 2));
    let mut fragile = CharacterDef::prodigy();
    fragile.max_health = 10;
    let mut engine = engine_with(rules, CharacterDef::prodigy(), fragile);

    engine
        .cast_skill(CombatantId::P2, SlotRef::Skill(1), None)
        .unwrap();
    engine.fire_basic_attack(CombatantId::P1).unwrap();
    assert_eq!(engine.pending_continuations(), 1);

    run(&mut engine, 10);
    assert!(!engine.is_alive(CombatantId::P2));
    assert_eq!(engine.pending_continuations(), 0);

    run(&mut engine, 20);
    assert_eq!(engine.health(CombatantId::P1), 200);
    assert_eq!(
        engine.tile(Position::new(4, 2)),
        Some(TileState::Owned(Side::Right))
    );
}
