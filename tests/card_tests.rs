// Tests for the proposal card state machines: evasive-control placement,
// teasing message selection, and the one-way accept transition.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use valentine_card::card::{
    CardLayout, CardSession, EvasiveButton, ProposalState, TEASING_MESSAGES,
};

#[test]
fn test_relocation_stays_within_bounds() {
    let layout = CardLayout::default();
    let mut button = EvasiveButton::new(layout);
    let mut rng = StdRng::seed_from_u64(42);

    let (max_x, max_y) = layout.max_offset();

    for _ in 0..1_000 {
        let (pos, _) = button.relocate(&mut rng);

        assert!(
            pos.x >= layout.padding && pos.x <= max_x,
            "x out of bounds: {}",
            pos.x
        );
        assert!(
            pos.y >= layout.padding && pos.y <= max_y,
            "y out of bounds: {}",
            pos.y
        );
    }
}

#[test]
fn test_relocation_bounds_hold_for_other_geometries() {
    let layout = CardLayout {
        container: valentine_card::card::Size {
            width: 320.0,
            height: 640.0,
        },
        control: valentine_card::card::Size {
            width: 120.0,
            height: 40.0,
        },
        padding: 16.0,
    };
    let mut button = EvasiveButton::new(layout);
    let mut rng = StdRng::seed_from_u64(7);

    let (max_x, max_y) = layout.max_offset();

    for _ in 0..1_000 {
        let (pos, _) = button.relocate(&mut rng);
        assert!(pos.x >= layout.padding && pos.x <= max_x);
        assert!(pos.y >= layout.padding && pos.y <= max_y);
    }
}

#[test]
fn test_every_teasing_message_is_reachable() {
    let mut button = EvasiveButton::new(CardLayout::default());
    let mut rng = StdRng::seed_from_u64(1);

    let mut seen = HashSet::new();
    for _ in 0..1_000 {
        let (_, message) = button.relocate(&mut rng);
        assert!(TEASING_MESSAGES.contains(&message));
        seen.insert(message);
    }

    assert_eq!(
        seen.len(),
        TEASING_MESSAGES.len(),
        "all 8 messages should appear over 1000 relocations, saw {:?}",
        seen
    );
}

#[test]
fn test_messages_avoid_a_plain_no() {
    for message in TEASING_MESSAGES {
        assert_ne!(message.trim().to_lowercase(), "no");
    }
}

#[test]
fn test_control_is_static_before_first_interaction() {
    let layout = CardLayout::default();
    let session_a = CardSession::with_rng(layout, StdRng::seed_from_u64(5));
    let session_b = CardSession::with_rng(layout, StdRng::seed_from_u64(99));

    // Different random sources, identical mount position.
    assert_eq!(session_a.button().position(), session_b.button().position());
    assert!(!session_a.button().has_moved());
}

#[test]
fn test_tease_never_touches_the_proposal() {
    let mut session = CardSession::with_rng(CardLayout::default(), StdRng::seed_from_u64(3));

    for _ in 0..50 {
        session.tease();
    }

    assert_eq!(session.proposal().state(), ProposalState::Pending);
}

#[test]
fn test_accept_is_one_way_and_idempotent() {
    let mut session = CardSession::with_rng(CardLayout::default(), StdRng::seed_from_u64(3));

    let first = session.accept();
    assert!(first.is_some());
    assert_eq!(session.proposal().state(), ProposalState::Accepted);

    // Repeats change nothing and produce no further effects.
    assert!(session.accept().is_none());
    assert!(session.accept().is_none());
    assert_eq!(session.proposal().state(), ProposalState::Accepted);
}

#[test]
fn test_acceptance_celebration_covers_both_edges() {
    let mut session = CardSession::with_rng(CardLayout::default(), StdRng::seed_from_u64(3));

    let acceptance = session.accept().unwrap();
    let plan = acceptance.celebration;

    assert_eq!(plan.duration_ms, 3_000);
    assert!(plan.bursts.iter().any(|b| b.origin_x == 0.0));
    assert!(plan.bursts.iter().any(|b| b.origin_x == 1.0));
    assert!(plan.bursts.iter().any(|b| b.origin_x == 0.5 && b.at_ms == 0));
}
