//! Fight lifecycle and turn scheduling, driven through the public API.
mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use common::{
    CLUMSY, STRIKE, STUN, SUMMON, SMASH, World, active_duel, cast, duel, duel_with, life, player,
};
use fight_core::{
    AccountId, Action, ActionOutcome, Battlefield, CellId, Characteristic, EffectError, Fight,
    FightConfig, FightEnv, FightError, FightEvent, FightId, FightState, FightType, FighterSpec,
    MoveAction, OracleError, Outcome, ValidationError,
};

#[test]
fn placement_then_start() {
    let world = World::new();
    let env = world.env();
    let mut duel = duel(FightConfig::instant());
    let fight = &mut duel.fight;
    assert_eq!(fight.state(), FightState::Placement);

    let early = fight.perform(&env, Action::PassTurn { fighter: duel.red });
    assert!(matches!(early, Err(FightError::IllegalFightState { .. })));

    fight.change_place(duel.red, CellId(1)).unwrap();
    assert!(matches!(
        fight.change_place(duel.red, CellId(5)),
        Err(FightError::Validation(ValidationError::InvalidPlace(_)))
    ));
    assert!(matches!(
        fight.start_fight(false),
        Err(FightError::Validation(ValidationError::NotAllReady))
    ));

    assert!(!fight.set_ready(duel.red, true).unwrap());
    assert!(fight.set_ready(duel.blue, true).unwrap());
    fight.drain_events();
    fight.start_fight(false).unwrap();

    assert_eq!(fight.state(), FightState::Active);
    let events = fight.drain_events();
    assert_eq!(
        events[0],
        FightEvent::FightStarted {
            order: vec![duel.red, duel.blue]
        }
    );
    assert!(matches!(
        events[1],
        FightEvent::TurnStarted { fighter, .. } if fighter == duel.red
    ));
    assert_eq!(fight.current_turn().map(|turn| turn.fighter()), Some(duel.red));
}

#[test]
fn templates_without_turn_points_get_the_configured_defaults() {
    let mut config = FightConfig::new();
    config.default_action_points = 4;
    let red = FighterSpec::player(AccountId(1), "red", 100)
        .with_characteristic(Characteristic::Initiative, 100);
    let blue = FighterSpec::player(AccountId(2), "blue", 100)
        .with_characteristic(Characteristic::ActionPoints, 8);
    let mut duel = duel_with(config, red, blue);
    let fight = &mut duel.fight;

    let blue = fight.battle().fighter(duel.blue).unwrap().characteristics();
    assert_eq!(blue.get(Characteristic::ActionPoints), 8);
    assert_eq!(blue.get(Characteristic::MovementPoints), 3);

    fight.start_fight(true).unwrap();
    assert_eq!(fight.current_turn().map(|turn| turn.fighter()), Some(duel.red));
    let points = fight.battle().fighter(duel.red).unwrap().turn_points().copied().unwrap();
    assert_eq!(points.action_points(), 4);
    assert_eq!(points.movement_points(), 3);
}

#[test]
fn too_many_teams_are_rejected() {
    let mut fight = Fight::new(FightId(1), FightType::Challenge, FightConfig::new(), Battlefield::open(4, 4));
    for _ in 0..=u8::MAX {
        fight.add_team(Vec::new()).unwrap();
    }
    assert_eq!(
        fight.add_team(Vec::new()),
        Err(FightError::Validation(ValidationError::TooManyTeams))
    );
}

#[test]
fn fixed_damage_is_applied_once_on_termination() {
    let world = World::new();
    let env = world.env();
    let mut duel = active_duel(FightConfig::new());
    let fight = &mut duel.fight;

    let outcome = fight.perform(&env, cast(duel.red, STRIKE, CellId(5))).unwrap();
    let ActionOutcome::Pending { duration, .. } = outcome else {
        panic!("expected a pending cast, got {outcome:?}");
    };
    assert_eq!(duration, Duration::from_millis(500));
    assert_eq!(life(fight, duel.blue), 100);

    assert!(fight.terminate_action(&env).unwrap());
    assert_eq!(life(fight, duel.blue), 95);

    let events = fight.drain_events();
    let altered: Vec<_> = events
        .iter()
        .filter(|event| matches!(event, FightEvent::LifeAltered { .. }))
        .collect();
    assert_eq!(
        altered,
        vec![&FightEvent::LifeAltered {
            source: duel.red,
            target: duel.blue,
            delta: -5
        }]
    );
    assert!(events.iter().any(|event| matches!(event, FightEvent::ActionTerminated { .. })));

    assert!(!fight.terminate_action(&env).unwrap());
    assert_eq!(life(fight, duel.blue), 95);
}

#[test]
fn busy_turn_rejects_actions_without_side_effects() {
    let world = World::new();
    let env = world.env();
    let mut duel = active_duel(FightConfig::new());
    let fight = &mut duel.fight;

    fight.perform(&env, cast(duel.red, STRIKE, CellId(5))).unwrap();
    fight.drain_events();
    let turn = fight.current_turn().map(|turn| turn.id()).unwrap();

    let second = fight.perform(&env, cast(duel.red, STRIKE, CellId(5)));
    assert!(matches!(second, Err(FightError::ActionInProgress { turn: busy }) if busy == turn));
    let walk = fight.perform(&env, Action::Move(MoveAction::new(duel.red, vec![CellId(1)])));
    assert!(matches!(walk, Err(FightError::ActionInProgress { .. })));

    assert!(fight.drain_events().is_empty());
    let red = fight.battle().fighter(duel.red).unwrap();
    assert_eq!(red.cell(), CellId(0));
    assert_eq!(red.turn_points().map(|points| points.action_points()), Some(6));
}

#[test]
fn action_of_another_fighter_is_rejected() {
    let world = World::new();
    let env = world.env();
    let mut duel = active_duel(FightConfig::instant());

    let result = duel.fight.perform(&env, cast(duel.blue, STRIKE, CellId(0)));
    assert!(matches!(result, Err(FightError::NotYourTurn { fighter }) if fighter == duel.blue));
}

#[test]
fn failed_cast_is_applied_immediately_and_ends_the_turn() {
    let world = World::new();
    let env = world.env();
    let mut duel = active_duel(FightConfig::new());
    let fight = &mut duel.fight;

    let outcome = fight.perform(&env, cast(duel.red, CLUMSY, CellId(5))).unwrap();
    assert!(matches!(outcome, ActionOutcome::Applied { success: false, .. }));
    assert_eq!(life(fight, duel.blue), 100);

    let events = fight.drain_events();
    assert!(events.iter().any(|event| matches!(
        event,
        FightEvent::ActionStarted { success: false, .. }
    )));
    assert!(events.contains(&FightEvent::PointsUsed {
        fighter: duel.red,
        action_points: 4,
        movement_points: 0
    }));
    assert!(!events.iter().any(|event| matches!(event, FightEvent::ActionTerminated { .. })));
    assert_eq!(fight.current_turn().map(|turn| turn.fighter()), Some(duel.blue));
}

#[test]
fn movement_spends_points_and_checks_path() {
    let world = World::new();
    let env = world.env();
    let mut duel = active_duel(FightConfig::instant());
    let fight = &mut duel.fight;

    let broken = MoveAction::new(duel.red, vec![CellId(1), CellId(3)]);
    assert!(matches!(
        fight.perform(&env, Action::Move(broken)),
        Err(FightError::Validation(ValidationError::InvalidPath))
    ));
    let long = MoveAction::new(duel.red, vec![CellId(10), CellId(20), CellId(30), CellId(40)]);
    assert!(matches!(
        fight.perform(&env, Action::Move(long)),
        Err(FightError::Validation(ValidationError::NotEnoughMovementPoints { .. }))
    ));

    let walk = MoveAction::new(duel.red, vec![CellId(1), CellId(2)]);
    fight.perform(&env, Action::Move(walk)).unwrap();
    let red = fight.battle().fighter(duel.red).unwrap();
    assert_eq!(red.cell(), CellId(2));
    assert_eq!(red.turn_points().map(|points| points.movement_points()), Some(1));
}

#[test]
fn stale_turn_end_is_ignored() {
    let world = World::new();
    let env = world.env();
    let mut duel = active_duel(FightConfig::instant());
    let fight = &mut duel.fight;

    let first = fight.current_turn().map(|turn| turn.id()).unwrap();
    assert!(fight.end_turn(&env, first).unwrap());
    let second = fight.current_turn().map(|turn| turn.id()).unwrap();
    assert_ne!(first, second);

    assert!(!fight.end_turn(&env, first).unwrap());
    assert_eq!(fight.current_turn().map(|turn| turn.id()), Some(second));
    assert_eq!(fight.current_turn().map(|turn| turn.fighter()), Some(duel.blue));
}

#[test]
fn turn_end_terminates_the_pending_action_first() {
    let world = World::new();
    let env = world.env();
    let mut duel = active_duel(FightConfig::new());
    let fight = &mut duel.fight;

    fight.perform(&env, cast(duel.red, STRIKE, CellId(5))).unwrap();
    let turn = fight.current_turn().map(|turn| turn.id()).unwrap();
    assert!(fight.end_turn(&env, turn).unwrap());

    assert_eq!(life(fight, duel.blue), 95);
    let events = fight.drain_events();
    let terminated = events
        .iter()
        .position(|event| matches!(event, FightEvent::ActionTerminated { .. }))
        .unwrap();
    let ended = events
        .iter()
        .position(|event| matches!(event, FightEvent::TurnEnded { .. }))
        .unwrap();
    assert!(terminated < ended);
}

#[test]
fn termination_listeners_fire_once() {
    let world = World::new();
    let env = world.env();
    let mut duel = active_duel(FightConfig::new());
    let fight = &mut duel.fight;
    let calls = Arc::new(AtomicUsize::new(0));

    let idle = Arc::clone(&calls);
    fight.on_action_terminated(Box::new(move || {
        idle.fetch_add(1, Ordering::SeqCst);
    }));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    fight.perform(&env, cast(duel.red, STRIKE, CellId(5))).unwrap();
    let pending = Arc::clone(&calls);
    fight.on_action_terminated(Box::new(move || {
        pending.fetch_add(1, Ordering::SeqCst);
    }));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    fight.terminate_action(&env).unwrap();
    fight.terminate_action(&env).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn failed_termination_still_clears_the_turn_and_reports() {
    let world = World::new();
    let env = world.env();
    let mut duel = active_duel(FightConfig::new());
    let fight = &mut duel.fight;
    let calls = Arc::new(AtomicUsize::new(0));

    fight.perform(&env, cast(duel.red, SUMMON, CellId(2))).unwrap();
    let listener = Arc::clone(&calls);
    fight.on_action_terminated(Box::new(move || {
        listener.fetch_add(1, Ordering::SeqCst);
    }));
    fight.drain_events();

    let without_monsters: FightEnv<'_> = FightEnv::new(Some(&world.spells), None, Some(&world.rng));
    let result = fight.terminate_action(&without_monsters);
    assert_eq!(
        result,
        Err(FightError::Effect(EffectError::Oracle(OracleError::MonstersNotAvailable)))
    );

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(fight.current_turn().map(|turn| turn.is_busy()), Some(false));
    assert!(fight.battle().fighter_at(CellId(2)).is_none());
    assert!(
        fight
            .drain_events()
            .iter()
            .any(|event| matches!(event, FightEvent::ActionTerminated { fighter, .. } if *fighter == duel.red))
    );
    assert!(!fight.terminate_action(&env).unwrap());
}

#[test]
fn cancel_drops_the_pending_action() {
    let world = World::new();
    let env = world.env();
    let mut duel = active_duel(FightConfig::new());
    let fight = &mut duel.fight;
    let calls = Arc::new(AtomicUsize::new(0));

    fight.perform(&env, cast(duel.red, STRIKE, CellId(5))).unwrap();
    let listener = Arc::clone(&calls);
    fight.on_action_terminated(Box::new(move || {
        listener.fetch_add(1, Ordering::SeqCst);
    }));

    assert!(fight.cancel());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(fight.state(), FightState::Cancelled);

    assert!(!fight.terminate_action(&env).unwrap());
    assert_eq!(life(fight, duel.blue), 100);
    assert!(matches!(
        fight.perform(&env, cast(duel.red, STRIKE, CellId(5))),
        Err(FightError::IllegalFightState { .. })
    ));
    assert!(!fight.cancel());
    assert_eq!(fight.drain_events().last(), Some(&FightEvent::FightCancelled));
}

#[test]
fn killing_the_last_enemy_ends_the_fight() {
    let world = World::new();
    let env = world.env();
    let mut blue = player("blue", 10);
    blue.life = fight_core::Life::new(15);
    let mut duel = duel_with(FightConfig::instant(), player("red", 100), blue);
    duel.fight.start_fight(true).unwrap();
    let fight = &mut duel.fight;

    fight.perform(&env, cast(duel.red, SMASH, CellId(5))).unwrap();

    assert_eq!(fight.state(), FightState::Terminated);
    assert!(fight.current_turn().is_none());
    let events = fight.drain_events();
    assert!(events.contains(&FightEvent::FighterDied {
        killer: duel.red,
        victim: duel.blue
    }));
    let Some(FightEvent::FightEnded { winner, .. }) = events.last() else {
        panic!("fight did not end: {events:?}");
    };
    assert_eq!(*winner, Some(duel.red_team));

    let results = fight.results().unwrap();
    let winners: Vec<_> = results.winners().map(|result| result.fighter).collect();
    assert_eq!(winners, vec![duel.red]);
    assert!(!fight.terminate_action(&env).unwrap());
}

#[test]
fn leaving_an_active_fight_counts_as_a_loss() {
    let world = World::new();
    let env = world.env();
    let mut duel = active_duel(FightConfig::instant());
    let fight = &mut duel.fight;

    fight.leave(&env, duel.red).unwrap();

    assert_eq!(fight.state(), FightState::Terminated);
    let results = fight.results().unwrap();
    let red = results
        .fighters
        .iter()
        .find(|result| result.fighter == duel.red)
        .unwrap();
    assert_eq!(red.outcome, Outcome::Loser);
    assert!(red.fled);
}

#[test]
fn leaving_placement_cancels_a_one_team_fight() {
    let world = World::new();
    let env = world.env();
    let mut duel = duel(FightConfig::instant());

    duel.fight.leave(&env, duel.blue).unwrap();

    assert_eq!(duel.fight.state(), FightState::Cancelled);
    assert!(duel.fight.battle().fighter(duel.blue).is_none());
}

#[test]
fn skipped_turn_goes_back_to_the_caster() {
    let world = World::new();
    let env = world.env();
    let mut duel = active_duel(FightConfig::instant());
    let fight = &mut duel.fight;

    fight.perform(&env, cast(duel.red, STUN, CellId(5))).unwrap();
    fight.pass_turn(&env, duel.red).unwrap();

    let events = fight.drain_events();
    assert!(events.iter().any(|event| matches!(
        event,
        FightEvent::TurnSkipped { fighter, .. } if *fighter == duel.blue
    )));
    assert_eq!(fight.current_turn().map(|turn| turn.fighter()), Some(duel.red));
    assert!(fight.battle().fighter(duel.blue).unwrap().buffs().is_empty());
}

#[test]
fn invocation_plays_right_after_its_invoker() {
    let world = World::new();
    let env = world.env();
    let mut duel = active_duel(FightConfig::instant());
    let fight = &mut duel.fight;

    fight.perform(&env, cast(duel.red, SUMMON, CellId(2))).unwrap();
    let invocation = fight.battle().fighter_at(CellId(2)).unwrap();
    assert_eq!(
        fight.turns().fighters(),
        &[duel.red, invocation, duel.blue]
    );

    fight.pass_turn(&env, duel.red).unwrap();
    assert_eq!(fight.current_turn().map(|turn| turn.fighter()), Some(invocation));

    fight.leave(&env, duel.red).unwrap();
    assert!(fight.battle().fighter(invocation).unwrap().is_dead());
    assert_eq!(fight.state(), FightState::Terminated);
    let results = fight.results().unwrap();
    assert!(results.fighters.iter().all(|result| result.fighter != invocation));
}

#[test]
fn summon_limit_is_enforced() {
    let world = World::new();
    let env = world.env();
    let mut duel = active_duel(FightConfig::instant());
    let fight = &mut duel.fight;

    fight.perform(&env, cast(duel.red, SUMMON, CellId(2))).unwrap();
    fight.perform(&env, cast(duel.red, SUMMON, CellId(10))).unwrap();

    assert!(fight.battle().fighter_at(CellId(10)).is_none());
    assert_eq!(fight.battle().invocations_of(duel.red).len(), 1);
    let red = fight.battle().fighter(duel.red).unwrap();
    assert_eq!(red.characteristics().get(Characteristic::SummonLimit), 0);
}
