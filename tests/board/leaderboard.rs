use chrono::Duration;
use prajaavaani_core::{BoardConfig, GeographicLevel, PageRequest, UserId, VoteType};

use crate::support::{board, board_with};

fn upvote(board: &prajaavaani_core::ConcernBoard, id: prajaavaani_core::ConcernId, voters: &[&str]) {
    for voter in voters {
        board
            .cast_vote(Some(&UserId::new(*voter)), id, VoteType::Upvote)
            .unwrap();
    }
}

#[test]
fn earlier_concern_wins_a_tie() {
    let (board, clock) = board();
    let c1 = board
        .submit_concern(None, None, "broken footpath", GeographicLevel::City, "Pune")
        .unwrap();
    clock.advance(Duration::seconds(1));
    let c2 = board
        .submit_concern(None, None, "open manhole", GeographicLevel::City, "Pune")
        .unwrap();

    upvote(&board, c2, &["a", "b"]);
    upvote(&board, c1, &["a", "b"]);

    let ranked: Vec<_> = board
        .list_leaderboard(GeographicLevel::City, "Pune")
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ranked, vec![c1, c2]);
}

#[test]
fn ranks_by_net_votes_descending() {
    let (board, clock) = board();
    let low = board
        .submit_concern(None, None, "stray cattle", GeographicLevel::State, "Goa")
        .unwrap();
    clock.advance(Duration::seconds(1));
    let high = board
        .submit_concern(None, None, "beach litter", GeographicLevel::State, "Goa")
        .unwrap();
    clock.advance(Duration::seconds(1));
    let negative = board
        .submit_concern(None, None, "loud music", GeographicLevel::State, "Goa")
        .unwrap();

    upvote(&board, high, &["a", "b", "c"]);
    upvote(&board, low, &["a"]);
    board
        .cast_vote(Some(&UserId::new("a")), negative, VoteType::Downvote)
        .unwrap();

    let ranked: Vec<_> = board
        .list_leaderboard(GeographicLevel::State, "Goa")
        .unwrap()
        .into_iter()
        .map(|c| (c.id, c.net_votes()))
        .collect();
    assert_eq!(ranked, vec![(high, 3), (low, 1), (negative, -1)]);
}

#[test]
fn same_score_and_time_falls_back_to_id() {
    let (board, _) = board();
    let ids: Vec<_> = (0..5)
        .map(|n| {
            board
                .submit_concern(None, None, &format!("issue {n}"), GeographicLevel::Village, "Kothur")
                .unwrap()
        })
        .collect();

    let ranked: Vec<_> = board
        .list_leaderboard(GeographicLevel::Village, "Kothur")
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    let mut expected = ids.clone();
    expected.sort();
    assert_eq!(ranked, expected);
}

#[test]
fn requery_without_votes_is_identical() {
    let (board, clock) = board();
    for n in 0..10 {
        let id = board
            .submit_concern(None, None, &format!("concern {n}"), GeographicLevel::Pincode, "400001")
            .unwrap();
        if n % 3 == 0 {
            upvote(&board, id, &["a"]);
        }
        if n % 4 == 0 {
            clock.advance(Duration::seconds(1));
        }
    }

    let first = board.list_leaderboard(GeographicLevel::Pincode, "400001").unwrap();
    let second = board.list_leaderboard(GeographicLevel::Pincode, "400001").unwrap();
    assert_eq!(first, second);
}

#[test]
fn leaderboard_is_a_snapshot() {
    let (board, _) = board();
    let id = board
        .submit_concern(None, None, "bridge cracks", GeographicLevel::District, "Satara")
        .unwrap();

    let before = board.list_leaderboard(GeographicLevel::District, "Satara").unwrap();
    upvote(&board, id, &["a"]);
    assert_eq!(before[0].upvotes, 0);

    let after = board.list_leaderboard(GeographicLevel::District, "Satara").unwrap();
    assert_eq!(after[0].upvotes, 1);
}

#[test]
fn buckets_do_not_leak_across_levels_or_locations() {
    let (board, _) = board();
    board
        .submit_concern(None, None, "flooding", GeographicLevel::City, "Mumbai")
        .unwrap();

    assert!(board.list_leaderboard(GeographicLevel::District, "Mumbai").unwrap().is_empty());
    assert!(board.list_leaderboard(GeographicLevel::City, "Pune").unwrap().is_empty());
    assert!(board.list_leaderboard(GeographicLevel::Country, "").unwrap().is_empty());
    assert_eq!(board.list_leaderboard(GeographicLevel::City, "Mumbai").unwrap().len(), 1);
}

#[test]
fn pages_follow_the_ranking() {
    let (board, clock) = board();
    for n in 0..45 {
        board
            .submit_concern(None, None, &format!("concern {n}"), GeographicLevel::Country, "India")
            .unwrap();
        clock.advance(Duration::seconds(1));
    }
    let ranked = board.list_leaderboard(GeographicLevel::Country, "India").unwrap();

    let first = board
        .list_leaderboard_page(GeographicLevel::Country, "India", PageRequest::default())
        .unwrap();
    assert_eq!(first.size, 20);
    assert_eq!(first.total, 45);
    assert_eq!(first.total_pages(), 3);
    assert_eq!(first.entries, ranked[..20].to_vec());

    let last = board
        .list_leaderboard_page(GeographicLevel::Country, "India", PageRequest::new(2, 0))
        .unwrap();
    assert_eq!(last.entries, ranked[40..].to_vec());

    let past_end = board
        .list_leaderboard_page(GeographicLevel::Country, "India", PageRequest::new(3, 20))
        .unwrap();
    assert!(past_end.entries.is_empty());
    assert_eq!(past_end.total, 45);
}

#[test]
fn page_size_is_clamped() {
    let config = BoardConfig {
        max_page_size: 10,
        default_page_size: 5,
        ..BoardConfig::default()
    };
    let (board, _) = board_with(config);
    for n in 0..12 {
        board
            .submit_concern(None, None, &format!("concern {n}"), GeographicLevel::Town, "Wai")
            .unwrap();
    }

    let page = board
        .list_leaderboard_page(GeographicLevel::Town, "Wai", PageRequest::new(0, 500))
        .unwrap();
    assert_eq!(page.size, 10);
    assert_eq!(page.entries.len(), 10);

    let page = board
        .list_leaderboard_page(GeographicLevel::Town, "Wai", PageRequest::new(0, 0))
        .unwrap();
    assert_eq!(page.entries.len(), 5);
}
