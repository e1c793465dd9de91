//! End-to-end match sessions driven through scripted scenarios.

use std::time::Duration;

use arena_content::{ContentFactory, Intent, Roster, Scenario};
use arena_core::{
    CharacterDef, CombatantId, CommandError, Event as EngineEvent, MatchRules, SlotRef,
};
use arena_runtime::{
    Event, EventBus, MatchEvent, MatchOutcome, MatchSession, RuntimeError, ScenarioRunner, Topic,
};
use tokio::sync::broadcast::Receiver;

fn roster() -> Roster {
    let dummy = CharacterDef {
        name: "Dummy".to_string(),
        max_health: 10,
        ..CharacterDef::arcanist()
    };
    Roster::new(vec![CharacterDef::prodigy(), CharacterDef::arcanist(), dummy])
        .expect("roster should be valid")
}

fn drain(rx: &mut Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn engine_events(events: &[Event]) -> Vec<&EngineEvent> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Engine { event, .. } => Some(event),
            Event::Match(_) => None,
        })
        .collect()
}

#[test]
fn knockout_ends_match_and_freezes_session() {
    let scenario = Scenario::new("knockout", "Prodigy", "Dummy").then(
        Duration::ZERO,
        CombatantId::P1,
        Intent::BasicAttack,
    );
    let mut runner = ScenarioRunner::new(&scenario, &roster(), MatchRules::default())
        .expect("scenario should build");

    let outcome = runner.run_to_end();
    assert_eq!(
        outcome,
        MatchOutcome::Knockout {
            winner: CombatantId::P1
        }
    );
    let ended_at = runner.session().clock().elapsed();
    assert!(ended_at < Duration::from_secs(1));

    let session = runner.session_mut();
    assert_eq!(session.advance(Duration::from_secs(5)), Some(outcome));
    assert_eq!(session.clock().elapsed(), ended_at);
    assert!(matches!(
        session.apply(CombatantId::P1, Intent::BasicAttack),
        Err(RuntimeError::MatchOver)
    ));
}

#[test]
fn time_up_goes_to_the_healthier_combatant() {
    let scenario = Scenario::new("chip", "Prodigy", "Arcanist")
        .with_length(Duration::from_secs(2))
        .then(Duration::ZERO, CombatantId::P1, Intent::BasicAttack);
    let mut runner = ScenarioRunner::new(&scenario, &roster(), MatchRules::default())
        .expect("scenario should build");

    assert_eq!(
        runner.run_to_end(),
        MatchOutcome::TimeUp {
            winner: CombatantId::P1
        }
    );
    let session = runner.session();
    assert_eq!(session.clock().elapsed(), Duration::from_secs(2));
    assert_eq!(session.engine().health(CombatantId::P2), 190);
}

#[test]
fn equal_health_at_time_up_is_a_draw() {
    let mut session = MatchSession::new(
        MatchRules::default(),
        &CharacterDef::prodigy(),
        &CharacterDef::arcanist(),
        Duration::from_secs(1),
    )
    .expect("session should build");

    assert_eq!(session.advance(Duration::from_millis(600)), None);
    assert_eq!(session.advance(Duration::from_millis(600)), Some(MatchOutcome::Draw));
    assert_eq!(session.clock().elapsed(), Duration::from_secs(1));
}

#[test]
fn bus_routes_match_events_by_topic() {
    let bus = EventBus::new();
    let mut combat = bus.subscribe(Topic::Combat);
    let mut resources = bus.subscribe(Topic::Resources);
    let mut lifecycle = bus.subscribe(Topic::Match);

    let scenario = Scenario::new("knockout", "Prodigy", "Dummy").then(
        Duration::ZERO,
        CombatantId::P1,
        Intent::BasicAttack,
    );
    let mut runner = ScenarioRunner::with_bus(&scenario, &roster(), MatchRules::default(), bus)
        .expect("scenario should build");
    runner.run_to_end();

    let lifecycle = drain(&mut lifecycle);
    assert!(matches!(
        lifecycle.first(),
        Some(Event::Match(MatchEvent::Started { p1, p2, .. })) if p1 == "Prodigy" && p2 == "Dummy"
    ));
    assert!(matches!(
        lifecycle.last(),
        Some(Event::Match(MatchEvent::Ended {
            outcome: MatchOutcome::Knockout {
                winner: CombatantId::P1
            },
            ..
        }))
    ));

    let combat = drain(&mut combat);
    assert!(combat.iter().all(|event| event.topic() == Topic::Combat));
    let combat = engine_events(&combat);
    assert!(matches!(
        combat.first(),
        Some(EngineEvent::ProjectileLaunched {
            owner: CombatantId::P1,
            ..
        })
    ));
    assert!(combat.iter().any(|event| matches!(
        event,
        EngineEvent::HitLanded {
            attacker: CombatantId::P1,
            target: CombatantId::P2,
            damage: 10,
            ..
        }
    )));

    let resources = drain(&mut resources);
    assert!(engine_events(&resources).iter().any(|event| matches!(
        event,
        EngineEvent::Died {
            combatant: CombatantId::P2
        }
    )));
}

#[test]
fn engine_events_are_stamped_with_match_time() {
    let bus = EventBus::new();
    let mut combat = bus.subscribe(Topic::Combat);

    let scenario = Scenario::new("late shot", "Prodigy", "Arcanist")
        .with_length(Duration::from_secs(1))
        .then(Duration::from_millis(300), CombatantId::P1, Intent::BasicAttack);
    let mut runner = ScenarioRunner::with_bus(&scenario, &roster(), MatchRules::default(), bus)
        .expect("scenario should build");
    runner.run_to_end();

    let launched = drain(&mut combat).into_iter().find_map(|event| match event {
        Event::Engine {
            at,
            event: EngineEvent::ProjectileLaunched { .. },
        } => Some(at),
        _ => None,
    });
    assert_eq!(launched, Some(Duration::from_millis(300)));
}

#[test]
fn rejected_intents_are_counted_and_published() {
    let bus = EventBus::new();
    let mut lifecycle = bus.subscribe(Topic::Match);

    let scenario = Scenario::new("spam", "Prodigy", "Arcanist")
        .with_length(Duration::from_secs(1))
        .then(
            Duration::ZERO,
            CombatantId::P1,
            Intent::Cast {
                slot: SlotRef::Ultimate,
                aim: None,
            },
        )
        .then(
            Duration::ZERO,
            CombatantId::P1,
            Intent::Cast {
                slot: SlotRef::Skill(0),
                aim: None,
            },
        )
        .then(
            Duration::from_millis(50),
            CombatantId::P1,
            Intent::Cast {
                slot: SlotRef::Skill(0),
                aim: None,
            },
        );
    let mut runner = ScenarioRunner::with_bus(&scenario, &roster(), MatchRules::default(), bus)
        .expect("scenario should build");
    runner.run_to_end();

    assert_eq!(runner.rejected(), 2);
    assert_eq!(runner.remaining(), 0);
    let rejections = drain(&mut lifecycle)
        .into_iter()
        .filter(|event| {
            matches!(
                event,
                Event::Match(MatchEvent::IntentRejected {
                    combatant: CombatantId::P1,
                    ..
                })
            )
        })
        .count();
    assert_eq!(rejections, 2);
}

#[test]
fn respawn_is_refused_while_alive() {
    let mut session = MatchSession::new(
        MatchRules::default(),
        &CharacterDef::prodigy(),
        &CharacterDef::arcanist(),
        Duration::from_secs(10),
    )
    .expect("session should build");

    session
        .apply(CombatantId::P1, Intent::BasicAttack)
        .expect("basic attack should fire");
    for _ in 0..100 {
        session.advance(Duration::from_millis(10));
    }
    let hurt = session.engine().health(CombatantId::P2);
    assert!(hurt < 200);

    let err = session
        .apply(CombatantId::P2, Intent::Respawn)
        .expect_err("living combatant cannot respawn");
    assert!(matches!(
        err,
        RuntimeError::Command {
            combatant: CombatantId::P2,
            source: CommandError::Alive { .. },
        }
    ));
    assert_eq!(session.engine().health(CombatantId::P2), hurt);
    assert!(!session.is_over());
}

#[test]
fn unknown_character_is_reported() {
    let scenario = Scenario::new("ghost", "Prodigy", "Nobody");
    let err = ScenarioRunner::new(&scenario, &roster(), MatchRules::default())
        .err()
        .expect("missing character should fail");
    assert!(matches!(err, RuntimeError::UnknownCharacter { name } if name == "Nobody"));
}

#[test]
fn bundled_scenarios_play_to_an_outcome() {
    let factory = ContentFactory::bundled();
    let rules = factory.load_rules().expect("rules should load");
    let roster = factory.load_roster().expect("roster should load");

    for name in factory.scenario_names().expect("scenarios should list") {
        let scenario = factory.load_scenario(&name).expect("scenario should load");
        let mut runner = ScenarioRunner::new(&scenario, &roster, rules.clone())
            .expect("scenario should build");
        runner.run_to_end();

        let session = runner.session();
        assert!(session.is_over(), "{name} did not finish");
        assert!(session.clock().elapsed() <= scenario.length);
    }
}

#[tokio::test]
async fn paced_run_reaches_the_same_outcome() {
    let scenario = Scenario::new("short", "Prodigy", "Arcanist")
        .with_length(Duration::from_millis(200))
        .then(Duration::ZERO, CombatantId::P2, Intent::BasicAttack);
    let mut runner = ScenarioRunner::new(&scenario, &roster(), MatchRules::default())
        .expect("scenario should build")
        .with_step(Duration::from_millis(20));

    assert_eq!(runner.run_paced().await, MatchOutcome::Draw);
}
