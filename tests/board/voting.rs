use chrono::Duration;
use prajaavaani_core::{ConcernId, CoreError, GeographicLevel, UserId, VoteTransition, VoteType};

use crate::support::board;

fn counts(concern: &prajaavaani_core::Concern) -> (u64, u64, i64) {
    (concern.upvotes, concern.downvotes, concern.net_votes())
}

#[test]
fn pothole_walkthrough() {
    let (board, clock) = board();
    let c1 = board
        .submit_concern(None, None, "pothole on 5th", GeographicLevel::Pincode, "110001")
        .unwrap();
    let a = UserId::new("user-a");
    let b = UserId::new("user-b");

    clock.advance(Duration::minutes(1));
    let after = board.cast_vote(Some(&a), c1, VoteType::Upvote).unwrap();
    assert_eq!(counts(&after), (1, 0, 1));

    clock.advance(Duration::minutes(1));
    let after = board.cast_vote(Some(&b), c1, VoteType::Downvote).unwrap();
    assert_eq!(counts(&after), (1, 1, 0));

    clock.advance(Duration::minutes(1));
    let after = board.cast_vote(Some(&a), c1, VoteType::Downvote).unwrap();
    assert_eq!(counts(&after), (0, 2, -2));

    let ranked = board.list_leaderboard(GeographicLevel::Pincode, "110001").unwrap();
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].id, c1);
    assert_eq!(ranked[0].net_votes(), -2);
    assert!(board.verify_counters(c1).unwrap().is_consistent());
}

#[test]
fn recasting_the_same_vote_changes_nothing() {
    let (board, clock) = board();
    let id = board
        .submit_concern(None, None, "garbage not collected", GeographicLevel::Village, "Kothur")
        .unwrap();
    let user = UserId::new("user-a");

    let first = board.cast(Some(&user), id, VoteType::Upvote).unwrap();
    assert_eq!(first.transition, VoteTransition::Created(VoteType::Upvote));
    let vote = board.get_vote(&user, id).unwrap().unwrap();

    clock.advance(Duration::hours(1));
    let again = board.cast(Some(&user), id, VoteType::Upvote).unwrap();
    assert_eq!(again.transition, VoteTransition::NoOp(VoteType::Upvote));
    assert_eq!(again.concern, first.concern);
    assert_eq!(board.get_vote(&user, id).unwrap().unwrap(), vote);
    assert_eq!(board.votes_for_concern(id).unwrap().len(), 1);
}

#[test]
fn changing_a_vote_moves_both_counters_by_one() {
    let (board, clock) = board();
    let id = board
        .submit_concern(None, None, "park gate locked", GeographicLevel::City, "Indore")
        .unwrap();
    let user = UserId::new("user-a");
    for n in 0..3 {
        board
            .cast_vote(Some(&UserId::new(format!("other-{n}"))), id, VoteType::Upvote)
            .unwrap();
    }

    let before = board.cast_vote(Some(&user), id, VoteType::Upvote).unwrap();
    clock.advance(Duration::seconds(5));
    let changed = board.cast(Some(&user), id, VoteType::Downvote).unwrap();

    assert_eq!(
        changed.transition,
        VoteTransition::Changed {
            from: VoteType::Upvote,
            to: VoteType::Downvote
        }
    );
    assert_eq!(changed.concern.upvotes, before.upvotes - 1);
    assert_eq!(changed.concern.downvotes, before.downvotes + 1);
    assert_eq!(changed.concern.net_votes(), before.net_votes() - 2);
    assert_eq!(changed.concern.updated_at, before.updated_at + Duration::seconds(5));

    let vote = board.get_vote(&user, id).unwrap().unwrap();
    assert_eq!(vote.vote_type, VoteType::Downvote);
    assert_eq!(vote.timestamp, changed.concern.updated_at);
}

#[test]
fn voting_on_a_missing_concern_leaves_state_alone() {
    let (board, _) = board();
    let existing = board
        .submit_concern(None, None, "water logging", GeographicLevel::District, "Thane")
        .unwrap();
    let user = UserId::new("user-a");
    let missing = ConcernId::new();

    let err = board.cast_vote(Some(&user), missing, VoteType::Upvote).unwrap_err();
    assert_eq!(err, CoreError::NotFound { concern_id: missing });
    assert!(board.get_vote(&user, missing).unwrap().is_none());
    assert_eq!(board.get_concern(existing).unwrap().upvotes, 0);
    assert!(board.votes_for_concern(missing).unwrap().is_empty());
}

#[test]
fn posting_is_anonymous_but_voting_is_not() {
    let (board, _) = board();
    let id = board
        .submit_concern(None, Some("A resident".into()), "tree fallen on road", GeographicLevel::Region, "Konkan")
        .unwrap();

    let err = board.cast_vote(None, id, VoteType::Downvote).unwrap_err();
    assert_eq!(err, CoreError::IdentityRequired);
    assert_eq!(board.get_concern(id).unwrap().downvotes, 0);
}

#[test]
fn counters_track_standing_votes_of_many_users() {
    let (board, _) = board();
    let id = board
        .submit_concern(None, None, "market toilets closed", GeographicLevel::Town, "Wai")
        .unwrap();

    let script = [
        ("u1", VoteType::Upvote),
        ("u2", VoteType::Upvote),
        ("u3", VoteType::Downvote),
        ("u1", VoteType::Downvote),
        ("u4", VoteType::Upvote),
        ("u2", VoteType::Upvote),
        ("u3", VoteType::Upvote),
        ("u1", VoteType::Upvote),
    ];
    for (user, vote_type) in script {
        board.cast_vote(Some(&UserId::new(user)), id, vote_type).unwrap();
    }

    // standing: u1 up, u2 up, u3 up, u4 up
    let concern = board.get_concern(id).unwrap();
    assert_eq!(counts(&concern), (4, 0, 4));
    let check = board.verify_counters(id).unwrap();
    assert!(check.is_consistent());
    assert_eq!(check.ledger.upvotes, 4);
}

#[test]
fn every_write_path_keeps_counters_in_step_with_the_ledger() {
    let (board, clock) = board();
    let id = board
        .submit_concern(None, None, "bus stop shelter broken", GeographicLevel::Pincode, "411001")
        .unwrap();
    let a = UserId::new("user-a");
    let b = UserId::new("user-b");

    let steps: [(&UserId, &str); 6] = [
        (&a, "upvote"),
        (&a, "upvote"),
        (&b, "downvote"),
        (&a, "downvote"),
        (&b, "upvote"),
        (&a, "upvote"),
    ];
    for (n, (user, vote_type)) in steps.into_iter().enumerate() {
        clock.advance(Duration::seconds(1));
        match n % 3 {
            0 => {
                board
                    .cast_vote_raw(Some(user), &id.to_string(), vote_type)
                    .unwrap();
            }
            1 => {
                board
                    .cast(Some(user), id, vote_type.parse().unwrap())
                    .unwrap();
            }
            _ => {
                board
                    .cast_vote(Some(user), id, vote_type.parse().unwrap())
                    .unwrap();
            }
        }
        let check = board.verify_counters(id).unwrap();
        assert!(check.is_consistent(), "step {n}: {check:?}");
    }

    // a up, b up
    assert_eq!(counts(&board.get_concern(id).unwrap()), (2, 0, 2));
    let again = board.cast(Some(&a), id, VoteType::Upvote).unwrap();
    assert!(again.transition.is_noop());
    assert_eq!(counts(&again.concern), (2, 0, 2));
}
