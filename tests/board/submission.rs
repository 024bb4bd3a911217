use prajaavaani_core::{CoreError, ErrorKind, GeographicLevel, NewConcern, UserId};

use crate::support::board;

#[test]
fn anonymous_concern_is_accepted() {
    let (board, _) = board();
    let id = board
        .submit_concern(None, None, "drain overflowing", GeographicLevel::Town, "Nashik")
        .unwrap();

    let concern = board.get_concern(id).unwrap();
    assert_eq!(concern.author_id, None);
    assert_eq!(concern.author_display_name, None);
    assert_eq!(concern.net_votes(), 0);
    assert_eq!(concern.created_at, concern.updated_at);
}

#[test]
fn display_name_and_author_are_independent() {
    let (board, _) = board();
    let named_only = board
        .submit(NewConcern::new("bus stop shelter broken", GeographicLevel::City, "Pune").display_name("Ravi"))
        .unwrap();
    let author_only = board
        .submit(NewConcern::new("no streetlights", GeographicLevel::City, "Pune").author("user-42"))
        .unwrap();

    let named_only = board.get_concern(named_only).unwrap();
    assert_eq!(named_only.author_id, None);
    assert_eq!(named_only.author_display_name.as_deref(), Some("Ravi"));

    let author_only = board.get_concern(author_only).unwrap();
    assert_eq!(author_only.author_id, Some(UserId::new("user-42")));
    assert_eq!(author_only.author_display_name, None);
}

#[test]
fn empty_text_creates_nothing() {
    let (board, _) = board();
    let err = board
        .submit_concern(Some("user-1".into()), None, "  \n ", GeographicLevel::Pincode, "110001")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(board.list_leaderboard(GeographicLevel::Pincode, "110001").unwrap().is_empty());
    assert!(board.locations(GeographicLevel::Pincode).unwrap().is_empty());
}

#[test]
fn empty_location_creates_nothing() {
    let (board, _) = board();
    let err = board
        .submit_concern(None, None, "potholes everywhere", GeographicLevel::Pincode, "")
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation { field: "location_identifier", .. }));
    assert!(board.locations(GeographicLevel::Pincode).unwrap().is_empty());
}

#[test]
fn locations_are_listed_per_level() {
    let (board, _) = board();
    for (level, location) in [
        (GeographicLevel::District, "Pune"),
        (GeographicLevel::District, "Satara"),
        (GeographicLevel::District, "Pune"),
        (GeographicLevel::State, "Maharashtra"),
    ] {
        board
            .submit_concern(None, None, "roads need repair", level, location)
            .unwrap();
    }

    assert_eq!(
        board.locations(GeographicLevel::District).unwrap(),
        vec!["Pune".to_string(), "Satara".to_string()]
    );
    assert_eq!(
        board.locations(GeographicLevel::State).unwrap(),
        vec!["Maharashtra".to_string()]
    );
    assert!(board.locations(GeographicLevel::Country).unwrap().is_empty());
}
