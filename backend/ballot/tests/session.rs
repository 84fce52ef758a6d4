use std::{cell::Cell, rc::Rc, time::Duration};

use ballot::{
    ActivityTag, BallotConfig, BallotError, BallotPhase, Camera, CameraError, CameraStream,
    Controller, Element, Key, KeyPress, KeyValueStore, MemoryStore, RecordingSink, Rejection,
    ScanStatus, Theme, Variant, VoteOutcome,
    storage::{CHOICE_KEY, FINGERPRINT_KEY, VOTED_KEY},
};
use proptest::prelude::*;

type TestController = Controller<MemoryStore, RecordingSink>;

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn quiet(variant: Variant) -> BallotConfig {
    BallotConfig {
        noise_probability: 0.0,
        ..BallotConfig::for_variant(variant)
    }
}

fn booted(config: BallotConfig, store: MemoryStore) -> TestController {
    let mut controller = Controller::new(config, store, RecordingSink::new())
        .unwrap()
        .with_seed(42);
    controller.boot();
    controller
}

fn verified(variant: Variant) -> TestController {
    let mut controller = booted(quiet(variant), MemoryStore::new());
    controller.press_fingerprint();
    controller.advance(ms(1300));
    controller
}

fn counts(controller: &TestController) -> Vec<u64> {
    controller.state().tally.iter().map(|(_, count)| count).collect()
}

struct FakeStream {
    stopped: Rc<Cell<bool>>,
}

impl CameraStream for FakeStream {
    fn label(&self) -> &str {
        "fake"
    }

    fn stop(&mut self) {
        self.stopped.set(true);
    }
}

struct FakeCamera {
    result: Result<(), CameraError>,
    stopped: Rc<Cell<bool>>,
    acquired: Rc<Cell<u32>>,
}

impl Camera for FakeCamera {
    fn acquire(&mut self) -> Result<Box<dyn CameraStream>, CameraError> {
        self.acquired.set(self.acquired.get() + 1);
        self.result.clone()?;

        Ok(Box::new(FakeStream {
            stopped: self.stopped.clone(),
        }))
    }
}

#[test]
fn test_boot_starts_idle() {
    let controller = booted(quiet(Variant::Classic), MemoryStore::new());
    let view = controller.sink().last().unwrap();

    assert_eq!(controller.phase(), BallotPhase::Idle);
    assert_eq!(view.ballot.status, "Secure channel idle");
    assert_eq!(view.auth.chip, "Locked · verify to vote");
    assert_eq!(view.activity[0].tag, ActivityTag::Boot);
    assert!(view.ballot.cards.iter().all(|card| card.visible && !card.vote_enabled));
    assert_eq!(view.results.secured, "1000 secured");
    assert_eq!(view.latency, None);
}

#[test]
fn test_unverified_vote_is_rejected() {
    let mut controller = booted(quiet(Variant::Classic), MemoryStore::new());
    let before = counts(&controller);

    let outcome = controller.click_vote("aurora").unwrap();
    assert_eq!(outcome, VoteOutcome::Rejected(Rejection::NotVerified));

    let view = controller.sink().last().unwrap();
    assert_eq!(view.ballot.status, "Need biometric unlock first");
    assert_eq!(view.activity[0].tag, ActivityTag::Deny);
    assert!(!view.modal.open);
    assert_eq!(controller.state().user.selected, None);
    assert_eq!(counts(&controller), before);
}

#[test]
fn test_fingerprint_scan() {
    let mut controller = booted(quiet(Variant::Classic), MemoryStore::new());

    controller.press_fingerprint();
    assert_eq!(controller.fingerprint_status(), ScanStatus::Scanning);
    assert_eq!(controller.activity().latest().unwrap().tag, ActivityTag::Scan);

    let entries = controller.activity().len();
    controller.press_fingerprint();
    assert_eq!(controller.activity().len(), entries);

    controller.advance(ms(1299));
    assert_eq!(controller.fingerprint_status(), ScanStatus::Scanning);

    controller.advance(ms(1));
    assert_eq!(controller.fingerprint_status(), ScanStatus::Verified);
    assert_eq!(controller.phase(), BallotPhase::Ready);
    assert_eq!(controller.vote_status(), "Secure channel ready");
    assert_eq!(controller.store().get(FINGERPRINT_KEY).as_deref(), Some("1"));

    let accepted = controller
        .activity()
        .iter()
        .filter(|entry| entry.message == "Fingerprint accepted")
        .count();
    assert_eq!(accepted, 1);

    let view = controller.sink().last().unwrap();
    assert!(view.auth.fingerprint.disabled);
    assert_eq!(view.auth.chip, "Unlocked · biometrics OK");
    assert!(view.ballot.cards.iter().all(|card| card.vote_enabled));
}

#[test]
fn test_face_scan_without_camera() {
    let mut controller = booted(quiet(Variant::Classic), MemoryStore::new());

    controller.press_face();
    assert!(!controller.view().camera_preview);
    assert_eq!(controller.activity().latest().unwrap().tag, ActivityTag::Scan);

    let entries = controller.activity().len();
    controller.press_face();
    assert_eq!(controller.activity().len(), entries);
    assert_eq!(controller.face_status(), ScanStatus::Scanning);

    controller.advance(ms(1500));
    assert_eq!(controller.face_status(), ScanStatus::Verified);
    assert!(controller.state().auth.face);
    assert!(!controller.state().auth.fingerprint);

    let accepted = controller
        .activity()
        .iter()
        .filter(|entry| entry.tag == ActivityTag::Access)
        .count();
    assert_eq!(accepted, 1);
}

#[test]
fn test_face_scan_with_camera_preview() {
    let stopped = Rc::new(Cell::new(false));
    let acquired = Rc::new(Cell::new(0));
    let camera = FakeCamera {
        result: Ok(()),
        stopped: stopped.clone(),
        acquired: acquired.clone(),
    };

    let mut controller = Controller::new(quiet(Variant::Classic), MemoryStore::new(), RecordingSink::new())
        .unwrap()
        .with_camera(Box::new(camera));
    controller.boot();

    controller.press_face();
    assert!(controller.view().camera_preview);

    let entries = controller.activity().len();
    controller.advance(ms(1000));
    controller.press_face();
    assert_eq!(controller.activity().len(), entries);
    assert_eq!(acquired.get(), 1);

    controller.advance(ms(500));
    assert_eq!(controller.face_status(), ScanStatus::Scanning);

    controller.advance(ms(700));
    assert_eq!(controller.face_status(), ScanStatus::Verified);
    assert!(stopped.get());
    assert!(!controller.view().camera_preview);
}

#[test]
fn test_denied_camera_falls_back() {
    let camera = FakeCamera {
        result: Err(CameraError::PermissionDenied),
        stopped: Rc::new(Cell::new(false)),
        acquired: Rc::new(Cell::new(0)),
    };

    let mut controller = Controller::new(quiet(Variant::Classic), MemoryStore::new(), RecordingSink::new())
        .unwrap()
        .with_camera(Box::new(camera));
    controller.boot();

    controller.press_face();
    assert!(!controller.view().camera_preview);

    controller.advance(ms(1500));
    assert_eq!(controller.face_status(), ScanStatus::Verified);
}

#[test]
fn test_vote_flow_locks_ballot() {
    let mut controller = verified(Variant::Classic);

    let outcome = controller.click_vote("orion").unwrap();
    assert_eq!(outcome, VoteOutcome::AwaitingConfirmation("orion".to_string()));
    assert_eq!(controller.phase(), BallotPhase::Selected);

    let view = controller.sink().last().unwrap();
    assert!(view.modal.open);
    assert_eq!(view.modal.candidate.as_deref(), Some("orion"));
    assert_eq!(view.ballot.status, "Ready to confirm · orion");
    assert!(view.ballot.card("orion").unwrap().selected);
    assert!(!view.ballot.card("aurora").unwrap().selected);

    let outcome = controller.confirm().unwrap();
    assert_eq!(
        outcome,
        VoteOutcome::Cast {
            candidate: "orion".to_string(),
            count: 361
        }
    );

    let view = controller.sink().last().unwrap();
    assert_eq!(controller.phase(), BallotPhase::Locked);
    assert!(!view.modal.open);
    assert_eq!(view.ballot.status, "Ballot locked · orion");
    assert!(view.ballot.cards.iter().all(|card| !card.vote_enabled));
    assert_eq!(view.activity[0].message, "Vote stored for orion");
    assert_eq!(view.results.total, 1001);

    assert_eq!(controller.store().get(VOTED_KEY).as_deref(), Some("1"));
    assert_eq!(controller.store().get(CHOICE_KEY).as_deref(), Some("orion"));
}

#[test]
fn test_only_one_vote_per_session() {
    let mut controller = verified(Variant::Classic);
    controller.click_vote("lyra").unwrap();
    controller.confirm().unwrap();
    let locked = counts(&controller);

    let outcome = controller.click_vote("aurora").unwrap();
    assert_eq!(outcome, VoteOutcome::Rejected(Rejection::AlreadyVoted));
    assert_eq!(controller.vote_status(), "Vote already locked");
    assert_eq!(controller.state().user.selected.as_deref(), Some("lyra"));

    assert_eq!(
        controller.confirm().unwrap(),
        VoteOutcome::Rejected(Rejection::NothingPending)
    );
    assert_eq!(counts(&controller), locked);
}

#[test]
fn test_cancel_and_dismiss_discard_pending() {
    let mut controller = verified(Variant::Classic);
    let before = counts(&controller);

    controller.click_vote("aurora").unwrap();
    controller.cancel();
    assert_eq!(controller.pending(), None);
    assert_eq!(controller.phase(), BallotPhase::Ready);
    assert_eq!(controller.vote_status(), "Secure channel ready");

    controller.click_vote("lyra").unwrap();
    controller.dismiss();
    assert_eq!(controller.phase(), BallotPhase::Ready);
    assert_eq!(controller.vote_status(), "Ready to confirm · lyra");

    assert_eq!(
        controller.confirm().unwrap(),
        VoteOutcome::Rejected(Rejection::NothingPending)
    );
    assert_eq!(counts(&controller), before);
    assert!(!controller.state().user.has_voted());
}

#[test]
fn test_unknown_candidate() {
    let mut controller = verified(Variant::Classic);

    assert!(matches!(
        controller.click_vote("nova"),
        Err(BallotError::UnknownCandidate(id)) if id == "nova"
    ));
    assert_eq!(controller.phase(), BallotPhase::Ready);
}

#[test]
fn test_share_labels_after_lyra_vote() {
    let mut controller = verified(Variant::Classic);
    controller.click_vote("lyra").unwrap();
    controller.confirm().unwrap();

    let view = controller.view();
    let labels: Vec<_> = view.results.rows.iter().map(|row| row.label.as_str()).collect();
    assert_eq!(labels, ["42.0%", "36.0%", "22.1%"]);
    assert_eq!(view.ballot.card("aurora").unwrap().share, "42.0%");
}

#[test]
fn test_restart_restores_ballot() {
    let mut controller = verified(Variant::Classic);
    controller.click_vote("orion").unwrap();
    controller.confirm().unwrap();
    controller.toggle_theme();

    let store = controller.into_store();
    let restored = booted(quiet(Variant::Classic), store);

    assert!(restored.state().auth.fingerprint);
    assert!(!restored.state().auth.face);
    assert!(restored.state().user.has_voted());
    assert_eq!(restored.state().user.selected.as_deref(), Some("orion"));
    assert_eq!(restored.theme(), Theme::Light);
    assert_eq!(restored.phase(), BallotPhase::Locked);

    let latest = restored.activity().latest().unwrap();
    assert_eq!(latest.tag, ActivityTag::Sync);
    assert_eq!(latest.message, "Existing ballot · orion");
}

#[test]
fn test_unknown_persisted_choice_is_dropped() {
    let mut store = MemoryStore::new();
    store.set(CHOICE_KEY, "nova").unwrap();
    store.set(VOTED_KEY, "1").unwrap();

    let controller = booted(quiet(Variant::Classic), store);
    assert_eq!(controller.state().user.selected, None);
    assert!(controller.state().user.has_voted());
    assert_eq!(controller.vote_status(), "Ballot locked · ");
    assert_eq!(controller.activity().latest().unwrap().tag, ActivityTag::Boot);

    let mut store = MemoryStore::new();
    store.set(CHOICE_KEY, "nova").unwrap();
    let extended = booted(quiet(Variant::Extended), store);
    assert_eq!(extended.state().user.selected.as_deref(), Some("nova"));
}

#[test]
fn test_search_is_debounced() {
    let mut controller = booted(quiet(Variant::Classic), MemoryStore::new());

    controller.type_query("a");
    controller.advance(ms(100));
    controller.type_query("au");
    controller.advance(ms(179));
    assert!(controller.view().ballot.cards.iter().all(|card| card.visible));

    controller.advance(ms(1));
    let visible: Vec<_> = controller
        .view()
        .ballot
        .cards
        .iter()
        .filter(|card| card.visible)
        .map(|card| card.id.clone())
        .collect();
    assert_eq!(visible, ["aurora"]);
    assert_eq!(controller.view().search.no_results, None);
}

#[test]
fn test_search_no_results_and_escape() {
    let mut controller = booted(quiet(Variant::Extended), MemoryStore::new());

    controller.type_query("ZZZ ");
    controller.submit_search();
    let view = controller.view();
    assert!(view.ballot.cards.iter().all(|card| !card.visible));
    assert_eq!(view.search.no_results.as_deref(), Some("zzz"));

    assert!(controller.press_key(KeyPress::plain(Key::Char('/'))));
    assert!(controller.search().focused);

    assert!(controller.press_key(KeyPress::plain(Key::Escape)));
    let view = controller.view();
    assert!(!view.search.focused);
    assert_eq!(view.search.query, "");
    assert_eq!(view.search.no_results, None);
    assert!(view.ballot.cards.iter().all(|card| card.visible));
}

#[test]
fn test_slash_shortcut_rules() {
    let mut controller = booted(quiet(Variant::Classic), MemoryStore::new());

    let mut chord = KeyPress::plain(Key::Char('/'));
    chord.ctrl = true;
    assert!(!controller.press_key(chord));
    assert!(!controller.search().focused);

    controller.set_search_focus(true);
    assert!(!controller.press_key(KeyPress::plain(Key::Char('/'))));
    assert!(!controller.press_key(KeyPress::plain(Key::Char('x'))));
}

#[test]
fn test_escape_cancels_pending_debounce() {
    let mut controller = booted(quiet(Variant::Classic), MemoryStore::new());

    controller.type_query("lyra");
    controller.press_key(KeyPress::plain(Key::Escape));
    controller.advance(ms(500));

    assert!(controller.view().ballot.cards.iter().all(|card| card.visible));
}

#[test]
fn test_telemetry_injects_live_votes() {
    let config = BallotConfig {
        noise_probability: 1.0,
        ..BallotConfig::for_variant(Variant::Extended)
    };
    let mut controller = booted(config, MemoryStore::new());

    controller.advance(ms(2399));
    assert_eq!(controller.state().tally.total(), 1180);

    controller.advance(ms(1));
    assert_eq!(controller.state().tally.total(), 1181);
    assert_eq!(controller.activity().latest().unwrap().tag, ActivityTag::Live);

    let latency = controller.view().latency.unwrap();
    let ms_value: u32 = latency.label.trim_end_matches(" ms").parse().unwrap();
    assert!((6..=18).contains(&ms_value));

    controller.advance(ms(2400 * 20));
    assert_eq!(controller.state().tally.total(), 1201);
    assert_eq!(controller.activity().len(), 10);
}

#[test]
fn test_telemetry_runs_after_voting() {
    let config = BallotConfig {
        noise_probability: 1.0,
        ..BallotConfig::for_variant(Variant::Classic)
    };
    let mut controller = booted(config, MemoryStore::new());
    controller.press_face();
    controller.advance(ms(1500));
    controller.click_vote("aurora").unwrap();
    controller.confirm().unwrap();

    let total = controller.state().tally.total();
    controller.advance(ms(2400));
    assert_eq!(controller.state().tally.total(), total + 1);
}

#[test]
fn test_quiet_telemetry_only_moves_latency() {
    let mut controller = booted(quiet(Variant::Classic), MemoryStore::new());

    controller.advance(ms(2400 * 3));
    assert_eq!(controller.state().tally.total(), 1000);
    assert!(controller.view().latency.is_some());
}

#[test]
fn test_shutdown_stops_timers() {
    let config = BallotConfig {
        noise_probability: 1.0,
        ..BallotConfig::for_variant(Variant::Classic)
    };
    let mut controller = booted(config, MemoryStore::new());
    controller.press_fingerprint();
    controller.shutdown();

    controller.advance(ms(10_000));
    assert_eq!(controller.state().tally.total(), 1000);
    assert_eq!(controller.next_deadline(), None);
}

#[test]
fn test_missing_required_element() {
    let sink = RecordingSink::without(&[Element::ConfirmModal]);
    let result = Controller::new(quiet(Variant::Classic), MemoryStore::new(), sink);

    assert!(matches!(
        result,
        Err(BallotError::MissingElement(Element::ConfirmModal))
    ));

    let sink = RecordingSink::without(&[Element::TurnoutMeter, Element::LatencyMeter]);
    assert!(Controller::new(quiet(Variant::Classic), MemoryStore::new(), sink).is_ok());
}

#[test]
fn test_every_change_renders() {
    let mut controller = booted(quiet(Variant::Classic), MemoryStore::new());
    let frames = controller.sink().frames().len();

    controller.toggle_theme();
    assert_eq!(controller.sink().frames().len(), frames + 1);
    assert_eq!(controller.sink().last().unwrap().theme, Theme::Light);
}

#[derive(Clone, Debug)]
enum Op {
    Fingerprint,
    Face,
    Vote(usize),
    Confirm,
    Cancel,
    Dismiss,
    Advance(u64),
}

fn op_strategy() -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(
        prop_oneof![
            Just(Op::Fingerprint),
            Just(Op::Face),
            (0usize..4).prop_map(Op::Vote),
            Just(Op::Confirm),
            Just(Op::Cancel),
            Just(Op::Dismiss),
            (0u64..5000).prop_map(Op::Advance),
        ],
        0..40,
    )
}

fn apply(controller: &mut TestController, op: &Op) {
    match op {
        Op::Fingerprint => controller.press_fingerprint(),
        Op::Face => controller.press_face(),
        Op::Vote(index) => {
            let id = controller.config().roster.candidates[*index].id.clone();
            controller.click_vote(&id).unwrap();
        }
        Op::Confirm => {
            controller.confirm().unwrap();
        }
        Op::Cancel => controller.cancel(),
        Op::Dismiss => controller.dismiss(),
        Op::Advance(millis) => controller.advance(ms(*millis)),
    }
}

proptest! {
    #[test]
    fn property_counts_only_grow(ops in op_strategy(), seed in any::<u64>()) {
        let config = BallotConfig {
            noise_probability: 1.0,
            ..BallotConfig::for_variant(Variant::Extended)
        };
        let mut controller = Controller::new(config, MemoryStore::new(), RecordingSink::new())
            .unwrap()
            .with_seed(seed);
        controller.boot();

        let seed_total = controller.state().tally.total();

        for op in &ops {
            let before = counts(&controller);
            let was_locked = controller.state().user.has_voted();
            let was_verified = controller.state().auth.is_verified();

            apply(&mut controller, op);

            let after = counts(&controller);
            prop_assert!(before.iter().zip(&after).all(|(b, a)| a >= b));
            prop_assert!(!was_locked || controller.state().user.has_voted());

            if matches!(op, Op::Confirm) && (was_locked || !was_verified) {
                prop_assert_eq!(&before, &after);
            }
        }

        let ticks = controller.now().as_millis() as u64 / 2400;
        let cast = u64::from(controller.state().user.has_voted());
        prop_assert_eq!(controller.state().tally.total(), seed_total + ticks + cast);
    }

    #[test]
    fn property_restart_round_trips(ops in op_strategy()) {
        let mut controller = booted(quiet(Variant::Extended), MemoryStore::new());
        for op in &ops {
            apply(&mut controller, op);
        }

        let auth = controller.state().auth;
        let has_voted = controller.state().user.has_voted();
        let selected = controller.state().user.selected.clone();

        let restored = booted(quiet(Variant::Extended), controller.into_store());
        prop_assert_eq!(restored.state().auth, auth);
        prop_assert_eq!(restored.state().user.has_voted(), has_voted);
        prop_assert_eq!(restored.state().user.selected.clone(), selected);
    }
}
