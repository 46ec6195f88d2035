//! Store-level tests for the follow graph and ban enforcement.
//!
//! These drive an in-memory database through the full relationship
//! lifecycle: follow/unfollow round-trips, ban cascades in both directions,
//! idempotent deletes, and the rename cascade.

use darkroom_db::{Database, StoreError};

fn store() -> Database {
    Database::open_in_memory().unwrap()
}

/// Create an identity and return its token.
fn user(db: &Database, name: &str) -> String {
    db.login(name).unwrap()
}

#[test]
fn login_mints_stable_token() {
    let db = store();
    let first = user(&db, "alice_cam");
    let second = user(&db, "alice_cam");
    assert_eq!(first, second);
    assert!(darkroom_types::validate::is_valid_token(&first));
}

#[test]
fn distinct_users_get_distinct_tokens() {
    let db = store();
    let a = user(&db, "alice_cam");
    let b = user(&db, "bob_shoots");
    assert_ne!(a, b);
}

#[test]
fn resolve_token_round_trip() {
    let db = store();
    let token = user(&db, "alice_cam");
    assert_eq!(db.resolve_token(&token).unwrap(), "alice_cam");

    let unknown = "Z".repeat(64);
    assert!(matches!(
        db.resolve_token(&unknown),
        Err(StoreError::NotFound)
    ));
}

#[test]
fn follow_appears_in_both_lists_and_unfollow_removes_it() {
    let db = store();
    user(&db, "alice_cam");
    user(&db, "bob_shoots");

    db.follow("alice_cam", "bob_shoots").unwrap();
    assert_eq!(db.list_following("alice_cam").unwrap(), vec!["bob_shoots"]);
    assert_eq!(db.list_followers("bob_shoots").unwrap(), vec!["alice_cam"]);

    db.unfollow("alice_cam", "bob_shoots").unwrap();
    assert!(db.list_following("alice_cam").unwrap().is_empty());
    assert!(db.list_followers("bob_shoots").unwrap().is_empty());
}

#[test]
fn self_follow_is_invalid() {
    let db = store();
    user(&db, "alice_cam");
    assert!(matches!(
        db.follow("alice_cam", "alice_cam"),
        Err(StoreError::InvalidArgument(_))
    ));
}

#[test]
fn follow_unknown_user_is_not_found() {
    let db = store();
    user(&db, "alice_cam");
    assert!(matches!(
        db.follow("alice_cam", "nobody_here"),
        Err(StoreError::NotFound)
    ));
}

#[test]
fn duplicate_follow_is_a_no_op() {
    let db = store();
    user(&db, "alice_cam");
    user(&db, "bob_shoots");

    db.follow("alice_cam", "bob_shoots").unwrap();
    db.follow("alice_cam", "bob_shoots").unwrap();
    assert_eq!(db.list_following("alice_cam").unwrap().len(), 1);
}

#[test]
fn ban_blocks_both_directions() {
    let db = store();
    user(&db, "alice_cam");
    user(&db, "bob_shoots");

    db.ban("alice_cam", "bob_shoots").unwrap();
    assert!(db.is_blocked("alice_cam", "bob_shoots").unwrap());
    assert!(db.is_blocked("bob_shoots", "alice_cam").unwrap());
}

#[test]
fn self_ban_is_invalid() {
    let db = store();
    user(&db, "alice_cam");
    assert!(matches!(
        db.ban("alice_cam", "alice_cam"),
        Err(StoreError::InvalidArgument(_))
    ));
}

#[test]
fn ban_severs_mutual_follows_like_and_comment_in_one_call() {
    let db = store();
    user(&db, "alice_cam");
    user(&db, "bob_shoots");

    db.follow("alice_cam", "bob_shoots").unwrap();
    db.follow("bob_shoots", "alice_cam").unwrap();

    db.insert_photo("photo-a", "alice_cam").unwrap();
    db.insert_photo("photo-b", "bob_shoots").unwrap();
    db.like_photo("photo-b", "alice_cam").unwrap();
    db.add_comment("c1", "photo-a", "bob_shoots", "great light").unwrap();

    db.ban("alice_cam", "bob_shoots").unwrap();

    assert!(db.list_following("alice_cam").unwrap().is_empty());
    assert!(db.list_following("bob_shoots").unwrap().is_empty());
    assert!(db.list_likes("photo-b").unwrap().is_empty());
    assert!(db.list_comments("photo-a").unwrap().is_empty());
}

#[test]
fn ban_cascade_leaves_third_parties_untouched() {
    let db = store();
    user(&db, "alice_cam");
    user(&db, "bob_shoots");
    user(&db, "carol_lens");

    db.follow("carol_lens", "alice_cam").unwrap();
    db.insert_photo("photo-a", "alice_cam").unwrap();
    db.like_photo("photo-a", "carol_lens").unwrap();
    db.add_comment("c1", "photo-a", "carol_lens", "nice").unwrap();

    db.ban("alice_cam", "bob_shoots").unwrap();

    assert_eq!(db.list_followers("alice_cam").unwrap(), vec!["carol_lens"]);
    assert_eq!(db.list_likes("photo-a").unwrap(), vec!["carol_lens"]);
    assert_eq!(db.list_comments("photo-a").unwrap().len(), 1);
}

#[test]
fn follow_is_rejected_while_banned_and_allowed_after_unban() {
    let db = store();
    user(&db, "alice_cam");
    user(&db, "bob_shoots");

    db.ban("alice_cam", "bob_shoots").unwrap();

    // Both directions are blocked, regardless of who initiated.
    assert!(matches!(
        db.follow("alice_cam", "bob_shoots"),
        Err(StoreError::Blocked)
    ));
    assert!(matches!(
        db.follow("bob_shoots", "alice_cam"),
        Err(StoreError::Blocked)
    ));

    db.unban("alice_cam", "bob_shoots").unwrap();
    assert!(!db.is_blocked("alice_cam", "bob_shoots").unwrap());
    db.follow("alice_cam", "bob_shoots").unwrap();
}

#[test]
fn like_and_comment_are_rejected_while_banned() {
    let db = store();
    user(&db, "alice_cam");
    user(&db, "bob_shoots");
    db.insert_photo("photo-a", "alice_cam").unwrap();

    db.ban("alice_cam", "bob_shoots").unwrap();

    assert!(matches!(
        db.like_photo("photo-a", "bob_shoots"),
        Err(StoreError::Blocked)
    ));
    assert!(matches!(
        db.add_comment("c1", "photo-a", "bob_shoots", "hello"),
        Err(StoreError::Blocked)
    ));
}

#[test]
fn unban_restores_nothing() {
    let db = store();
    user(&db, "alice_cam");
    user(&db, "bob_shoots");

    db.follow("alice_cam", "bob_shoots").unwrap();
    db.insert_photo("photo-b", "bob_shoots").unwrap();
    db.like_photo("photo-b", "alice_cam").unwrap();

    db.ban("alice_cam", "bob_shoots").unwrap();
    db.unban("alice_cam", "bob_shoots").unwrap();

    // The ban is gone but the severed rows stay gone.
    assert!(!db.is_blocked("alice_cam", "bob_shoots").unwrap());
    assert!(db.list_following("alice_cam").unwrap().is_empty());
    assert!(db.list_likes("photo-b").unwrap().is_empty());
}

#[test]
fn repeat_ban_by_same_banner_is_idempotent() {
    let db = store();
    user(&db, "alice_cam");
    user(&db, "bob_shoots");

    db.ban("alice_cam", "bob_shoots").unwrap();
    db.ban("alice_cam", "bob_shoots").unwrap();
    assert_eq!(db.list_banned("alice_cam").unwrap(), vec!["bob_shoots"]);
}

#[test]
fn unfollow_and_unban_twice_never_error() {
    let db = store();
    user(&db, "alice_cam");
    user(&db, "bob_shoots");

    db.unfollow("alice_cam", "bob_shoots").unwrap();
    db.unfollow("alice_cam", "bob_shoots").unwrap();
    db.unban("alice_cam", "bob_shoots").unwrap();
    db.unban("alice_cam", "bob_shoots").unwrap();
}

#[test]
fn rename_preserves_token_and_carries_edges() {
    let db = store();
    let token = user(&db, "alice_cam");
    user(&db, "bob_shoots");

    db.follow("bob_shoots", "alice_cam").unwrap();
    db.insert_photo("photo-a", "alice_cam").unwrap();

    db.rename_user("alice_cam", "alice_darkrm").unwrap();

    // Token is the identity: it now resolves to the new name.
    assert_eq!(db.resolve_token(&token).unwrap(), "alice_darkrm");
    assert!(!db.user_exists("alice_cam").unwrap());

    // Follow edges and posts followed the rename.
    assert_eq!(db.list_following("bob_shoots").unwrap(), vec!["alice_darkrm"]);
    assert_eq!(db.photo_author("photo-a").unwrap().unwrap(), "alice_darkrm");
}

#[test]
fn rename_to_taken_name_conflicts() {
    let db = store();
    user(&db, "alice_cam");
    user(&db, "bob_shoots");

    assert!(matches!(
        db.rename_user("alice_cam", "bob_shoots"),
        Err(StoreError::Conflict)
    ));
}

#[test]
fn rename_unknown_user_is_not_found() {
    let db = store();
    assert!(matches!(
        db.rename_user("nobody_here", "new_name_1"),
        Err(StoreError::NotFound)
    ));
}

#[test]
fn stream_shows_followed_authors_only() {
    let db = store();
    user(&db, "alice_cam");
    user(&db, "bob_shoots");
    user(&db, "carol_lens");

    db.insert_photo("photo-b", "bob_shoots").unwrap();
    db.insert_photo("photo-c", "carol_lens").unwrap();

    db.follow("alice_cam", "bob_shoots").unwrap();

    let stream = db.stream_for("alice_cam", 50).unwrap();
    assert_eq!(stream.len(), 1);
    assert_eq!(stream[0].id, "photo-b");
    assert_eq!(stream[0].author, "bob_shoots");
}

#[test]
fn like_on_missing_photo_is_not_found_and_like_is_idempotent() {
    let db = store();
    user(&db, "alice_cam");
    user(&db, "bob_shoots");

    assert!(matches!(
        db.like_photo("no-such-photo", "alice_cam"),
        Err(StoreError::NotFound)
    ));

    db.insert_photo("photo-b", "bob_shoots").unwrap();
    db.like_photo("photo-b", "alice_cam").unwrap();
    db.like_photo("photo-b", "alice_cam").unwrap();
    assert_eq!(db.list_likes("photo-b").unwrap(), vec!["alice_cam"]);

    db.unlike_photo("photo-b", "alice_cam").unwrap();
    db.unlike_photo("photo-b", "alice_cam").unwrap();
    assert!(db.list_likes("photo-b").unwrap().is_empty());
}

#[test]
fn deleting_a_photo_cascades_likes_and_comments() {
    let db = store();
    user(&db, "alice_cam");
    user(&db, "bob_shoots");

    db.insert_photo("photo-a", "alice_cam").unwrap();
    db.like_photo("photo-a", "bob_shoots").unwrap();
    db.add_comment("c1", "photo-a", "bob_shoots", "keeper").unwrap();

    db.delete_photo("photo-a").unwrap();

    assert!(db.get_photo("photo-a").unwrap().is_none());
    assert!(db.get_comment("c1").unwrap().is_none());
    assert!(matches!(
        db.delete_photo("photo-a"),
        Err(StoreError::NotFound)
    ));
}

#[test]
fn photo_counts_reflect_likes_and_comments() {
    let db = store();
    user(&db, "alice_cam");
    user(&db, "bob_shoots");
    user(&db, "carol_lens");

    db.insert_photo("photo-a", "alice_cam").unwrap();
    db.like_photo("photo-a", "bob_shoots").unwrap();
    db.like_photo("photo-a", "carol_lens").unwrap();
    db.add_comment("c1", "photo-a", "bob_shoots", "!").unwrap();

    let photo = db.get_photo("photo-a").unwrap().unwrap();
    assert_eq!(photo.likes, 2);
    assert_eq!(photo.comments, 1);
}
