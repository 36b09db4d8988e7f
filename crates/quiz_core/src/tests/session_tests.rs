use super::*;
use rand::{rngs::StdRng, SeedableRng};
use shared::domain::Country;

fn five_country_catalog() -> Catalog {
    [("A", "X"), ("B", "Y"), ("C", "Z"), ("D", "W"), ("E", "V")]
        .into_iter()
        .map(|(name, capital)| {
            Country::new(
                name,
                format!("https://flags.test/{name}.svg"),
                vec![capital.to_string()],
            )
        })
        .collect()
}

fn session_with(rules: GameRules, seed: u64) -> QuizSession<StdRng> {
    QuizSession::new(five_country_catalog(), rules, StdRng::seed_from_u64(seed)).expect("session")
}

fn started(seed: u64) -> QuizSession<StdRng> {
    let mut session = session_with(GameRules::default(), seed);
    session.start_round().expect("first round");
    session
}

fn current(session: &QuizSession<StdRng>) -> &Round {
    session.round().expect("active round")
}

fn correct_name(session: &QuizSession<StdRng>) -> String {
    current(session).correct().name.clone()
}

fn wrong_name(session: &QuizSession<StdRng>) -> String {
    let round = current(session);
    round
        .options()
        .iter()
        .map(|opt| opt.country.name.clone())
        .find(|name| !round.is_correct(name))
        .expect("a wrong option")
}

fn select(session: &mut QuizSession<StdRng>, name: String) -> Vec<GameUpdate> {
    session
        .dispatch(GameEvent::OptionSelected { name })
        .expect("selection")
}

fn select_correct(session: &mut QuizSession<StdRng>) -> Vec<GameUpdate> {
    let name = correct_name(session);
    select(session, name)
}

fn select_wrong(session: &mut QuizSession<StdRng>) -> Vec<GameUpdate> {
    let name = wrong_name(session);
    select(session, name)
}

fn hint(session: &mut QuizSession<StdRng>, kind: HintKind) -> Vec<GameUpdate> {
    session
        .dispatch(GameEvent::HintRequested { kind })
        .expect("hint")
}

fn resolved_outcome(updates: &[GameUpdate]) -> Option<&Outcome> {
    updates.iter().find_map(|update| match update {
        GameUpdate::RoundResolved { outcome, .. } => Some(outcome),
        _ => None,
    })
}

fn capital_reveals(updates: &[GameUpdate]) -> Vec<(String, bool)> {
    updates
        .iter()
        .filter_map(|update| match update {
            GameUpdate::CapitalRevealed {
                message, hint_used, ..
            } => Some((message.clone(), *hint_used)),
            _ => None,
        })
        .collect()
}

#[test]
fn session_requires_enough_countries_for_a_round() {
    let catalog: Catalog = five_country_catalog().countries()[..3].iter().cloned().collect();
    let err = QuizSession::new(catalog, GameRules::default(), StdRng::seed_from_u64(1))
        .err()
        .expect("three countries are not enough");
    assert_eq!(
        err,
        QuizError::NotEnoughCountries {
            required: 4,
            available: 3
        }
    );
}

#[test]
fn actions_before_the_first_round_report_no_active_round() {
    let mut session = session_with(GameRules::default(), 1);
    assert_eq!(session.resolve(None), Err(QuizError::NoActiveRound));
    assert_eq!(
        session.request_hint(HintKind::Capital),
        Err(QuizError::NoActiveRound)
    );
    assert_eq!(session.tick(RoundId(1)), Ok(Vec::new()));
    assert_eq!(session.controls(), Controls::default());
}

#[test]
fn start_round_announces_round_then_timer() {
    let mut session = session_with(GameRules::default(), 2);
    let updates = session.start_round().expect("round");

    let [GameUpdate::RoundStarted { round }, GameUpdate::TimerStarted { round_id, seconds }] =
        updates.as_slice()
    else {
        panic!("unexpected updates: {updates:?}");
    };
    assert_eq!(*round_id, RoundId(1));
    assert_eq!(*seconds, 15);
    assert_eq!(round.options.len(), 4);
    assert_eq!(round.eliminate_hints_left, 3);
    assert_eq!(round.capital_hints_left, 2);
    assert_eq!(round.flag_url, current(&session).correct().flag_url);
    assert_eq!(
        round.controls,
        Controls {
            options: true,
            eliminate: true,
            capital: true,
            next: false,
        }
    );
    assert_eq!(session.timer().state(), crate::TimerState::Running);
}

#[test]
fn five_country_scenario_correct_answer_then_elimination() {
    let mut session = started(42);
    let catalog_names: Vec<String> = session
        .catalog()
        .countries()
        .iter()
        .map(|c| c.name.clone())
        .collect();
    let round = current(&session);
    assert_eq!(round.options().len(), 4);
    assert!(round
        .options()
        .iter()
        .all(|opt| catalog_names.contains(&opt.country.name)));
    assert!(round.option(&round.correct().name).is_some());

    let updates = select_correct(&mut session);
    assert_eq!(resolved_outcome(&updates), Some(&Outcome::Correct));
    assert_eq!(session.score(), 1);
    assert!(capital_reveals(&updates).is_empty());

    session
        .dispatch(GameEvent::NextRequested)
        .expect("next round");
    assert_eq!(session.hints().eliminate_left(), 3);

    let updates = hint(&mut session, HintKind::Eliminate);
    assert_eq!(session.hints().eliminate_left(), 2);
    let GameUpdate::OptionEliminated {
        name,
        eliminate_hints_left,
        ..
    } = &updates[0]
    else {
        panic!("expected elimination, got {updates:?}");
    };
    assert_eq!(*eliminate_hints_left, 2);
    let round = current(&session);
    assert!(!round.is_correct(name));
    assert_eq!(round.options().iter().filter(|o| o.eliminated).count(), 1);
    assert!(round.option(name).expect("eliminated option").eliminated);
}

#[test]
fn elimination_fires_once_per_round() {
    let mut session = started(5);
    assert_eq!(hint(&mut session, HintKind::Eliminate).len(), 2);
    assert!(hint(&mut session, HintKind::Eliminate).is_empty());
    assert_eq!(session.hints().eliminate_left(), 2);
    assert!(!session.controls().eliminate);
    assert_eq!(
        current(&session)
            .options()
            .iter()
            .filter(|o| o.eliminated)
            .count(),
        1
    );
}

#[test]
fn eliminated_option_stays_selectable() {
    let mut session = started(9);
    let updates = hint(&mut session, HintKind::Eliminate);
    let GameUpdate::OptionEliminated { name, .. } = &updates[0] else {
        panic!("expected elimination");
    };

    let updates = select(&mut session, name.clone());
    assert_eq!(
        resolved_outcome(&updates),
        Some(&Outcome::Wrong {
            selected: name.clone()
        })
    );
}

#[test]
fn exhausted_capital_budget_ignores_requests_but_still_auto_reveals() {
    let rules = GameRules {
        capital_hints: 0,
        ..GameRules::default()
    };
    let mut session = session_with(rules, 3);
    session.start_round().expect("round");
    assert!(!session.controls().capital);

    assert!(hint(&mut session, HintKind::Capital).is_empty());
    assert_eq!(session.hints().capital_left(), 0);
    assert!(!session.hints().capital_shown());

    let expected = format!(
        "Hint: the capital is {}.",
        current(&session).correct().capital()
    );
    let updates = select_wrong(&mut session);
    assert_eq!(capital_reveals(&updates), vec![(expected, false)]);
    assert_eq!(session.hints().capital_left(), 0);
}

#[test]
fn wrong_answer_reveals_correct_option_and_free_capital() {
    let mut session = started(17);
    let correct = correct_name(&session);
    let wrong = wrong_name(&session);

    let updates = select(&mut session, wrong.clone());
    let Some(GameUpdate::RoundResolved {
        outcome,
        correct_answer,
        score,
        ..
    }) = updates
        .iter()
        .find(|u| matches!(u, GameUpdate::RoundResolved { .. }))
    else {
        panic!("round not resolved: {updates:?}");
    };
    assert_eq!(*outcome, Outcome::Wrong { selected: wrong });
    assert_eq!(*correct_answer, correct);
    assert_eq!(*score, 0);

    let reveals = capital_reveals(&updates);
    assert_eq!(reveals.len(), 1);
    assert!(!reveals[0].1);
    assert_eq!(session.hints().capital_left(), 2);
}

#[test]
fn paid_capital_hint_is_not_repeated_on_wrong_answer() {
    let mut session = started(23);
    let updates = hint(&mut session, HintKind::Capital);
    assert_eq!(capital_reveals(&updates).len(), 1);
    assert!(capital_reveals(&updates)[0].0.ends_with("(hint used!)"));
    assert_eq!(session.hints().capital_left(), 1);
    assert!(hint(&mut session, HintKind::Capital).is_empty());

    let updates = select_wrong(&mut session);
    assert!(capital_reveals(&updates).is_empty());
    assert_eq!(session.hints().capital_left(), 1);
}

#[test]
fn resolution_stops_timer_first_and_leaves_only_next_enabled() {
    let mut session = started(29);
    let round_id = current(&session).id();
    session.tick(round_id).expect("tick");
    session.tick(round_id).expect("tick");

    let updates = select_correct(&mut session);
    assert_eq!(
        updates.first(),
        Some(&GameUpdate::TimerStopped {
            round_id,
            remaining: 13
        })
    );
    assert_eq!(
        updates.last(),
        Some(&GameUpdate::ControlsChanged {
            controls: Controls {
                options: false,
                eliminate: false,
                capital: false,
                next: true,
            }
        })
    );
    assert_eq!(session.timer().state(), crate::TimerState::Stopped);
}

#[test]
fn second_resolution_has_no_effect() {
    let mut session = started(31);
    let round_id = current(&session).id();
    let correct = correct_name(&session);
    select(&mut session, correct.clone());

    assert!(select(&mut session, correct.clone()).is_empty());
    assert!(session.dispatch(GameEvent::Tick { round_id }).expect("tick").is_empty());
    assert!(session
        .dispatch(GameEvent::TimerExpired { round_id })
        .expect("expiry")
        .is_empty());
    assert!(hint(&mut session, HintKind::Eliminate).is_empty());
    assert!(hint(&mut session, HintKind::Capital).is_empty());
    assert_eq!(session.score(), 1);
    assert_eq!(session.hints().capital_left(), 2);
    assert_eq!(session.hints().eliminate_left(), 3);
}

#[test]
fn timer_expiry_matches_explicit_timeout() {
    let mut ticking = started(37);
    let mut expiring = started(37);
    let round_id = current(&ticking).id();

    let mut ticked = Vec::new();
    for _ in 0..15 {
        ticked.extend(ticking.tick(round_id).expect("tick"));
    }
    let expired = expiring
        .dispatch(GameEvent::TimerExpired { round_id })
        .expect("expiry");

    assert_eq!(resolved_outcome(&ticked), Some(&Outcome::TimedOut));
    assert_eq!(resolved_outcome(&expired), resolved_outcome(&ticked));
    assert_eq!(capital_reveals(&ticked), capital_reveals(&expired));
    assert_eq!(ticking.score(), expiring.score());
    assert_eq!(ticking.controls(), expiring.controls());
    assert!(ticked.contains(&GameUpdate::TimerTicked {
        round_id,
        remaining: 0,
        progress: 0.0,
        critical: true
    }));
    assert!(ticking.tick(round_id).expect("late tick").is_empty());
}

#[test]
fn ticks_turn_critical_at_five_seconds() {
    let mut session = started(41);
    let round_id = current(&session).id();
    let mut last = Vec::new();
    for _ in 0..9 {
        last = session.tick(round_id).expect("tick");
    }
    assert_eq!(
        last,
        vec![GameUpdate::TimerTicked {
            round_id,
            remaining: 6,
            progress: 6.0 / 15.0,
            critical: false
        }]
    );
    assert_eq!(
        session.tick(round_id).expect("tick"),
        vec![GameUpdate::TimerTicked {
            round_id,
            remaining: 5,
            progress: 5.0 / 15.0,
            critical: true
        }]
    );
}

#[test]
fn stale_ticks_never_reach_the_next_round() {
    let mut session = started(43);
    let first = current(&session).id();
    select_correct(&mut session);
    session.next_round().expect("next");
    let second = current(&session).id();
    assert_ne!(first, second);

    for _ in 0..20 {
        assert!(session.tick(first).expect("stale tick").is_empty());
    }
    assert!(session
        .dispatch(GameEvent::TimerExpired { round_id: first })
        .expect("stale expiry")
        .is_empty());
    assert_eq!(session.timer().remaining(), 15);
    assert!(!current(&session).is_answered());
}

#[test]
fn unknown_selection_is_rejected_without_side_effects() {
    let mut session = started(47);
    let err = session
        .dispatch(GameEvent::OptionSelected {
            name: "Atlantis".into(),
        })
        .expect_err("not an option");
    assert_eq!(
        err,
        QuizError::UnknownOption {
            name: "Atlantis".into()
        }
    );
    assert!(!current(&session).is_answered());
    assert_eq!(session.timer().state(), crate::TimerState::Running);
}

#[test]
fn next_is_ignored_while_round_is_open() {
    let mut session = started(53);
    let round_id = current(&session).id();
    assert!(session
        .dispatch(GameEvent::NextRequested)
        .expect("next")
        .is_empty());
    assert_eq!(current(&session).id(), round_id);
}

#[test]
fn hint_latches_reset_each_round_until_budget_runs_out() {
    let mut session = started(59);
    for expected_left in [2, 1, 0] {
        assert_eq!(hint(&mut session, HintKind::Eliminate).len(), 2);
        assert_eq!(session.hints().eliminate_left(), expected_left);
        session.resolve(None).expect("timeout");
        session.next_round().expect("next");
    }

    assert!(!session.controls().eliminate);
    assert!(hint(&mut session, HintKind::Eliminate).is_empty());
    assert_eq!(session.hints().eliminate_left(), 0);
}

#[test]
fn long_session_keeps_scores_and_budgets_monotonic() {
    let mut session = started(61);
    let mut previous_score = 0;
    let mut previous_budgets = (3, 2);

    for turn in 0..300u32 {
        match turn % 5 {
            0 => {
                hint(&mut session, HintKind::Eliminate);
            }
            1 => {
                hint(&mut session, HintKind::Capital);
            }
            _ => {}
        }
        match turn % 3 {
            0 => {
                select_correct(&mut session);
            }
            1 => {
                select_wrong(&mut session);
            }
            _ => {
                session.resolve(None).expect("timeout");
            }
        }

        let round = current(&session);
        let mut names: Vec<_> = round.options().iter().map(|o| o.country.name.clone()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 4);
        assert!(round.is_answered());

        let budgets = (
            session.hints().eliminate_left(),
            session.hints().capital_left(),
        );
        assert!(session.score() >= previous_score);
        assert!(budgets.0 <= previous_budgets.0 && budgets.1 <= previous_budgets.1);
        previous_score = session.score();
        previous_budgets = budgets;

        session.next_round().expect("next");
    }

    assert_eq!(session.score(), 100);
    assert_eq!(previous_budgets, (0, 0));
}
