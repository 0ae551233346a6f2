//! End-to-end scenarios over the service layer.
//!
//! Run with: cargo test -p integration-tests

use std::collections::HashSet;
use std::time::Duration;

use chrono::Utc;
use huddle_core::{DomainError, UserId};
use huddle_service::ServiceError;
use integration_tests::TestApp;

fn is_domain(err: &ServiceError, check: impl Fn(&DomainError) -> bool) -> bool {
    matches!(err, ServiceError::Domain(e) if check(e))
}

// ============================================================================
// Messaging basics
// ============================================================================

#[test]
fn test_send_then_list_single_message() {
    let app = TestApp::new();
    let a = app.register("Ada", "Lovelace");
    let channel = app.create_channel(&a.token, "general", true);

    let sent = app
        .messages()
        .send(&a.token, channel, "hi".into())
        .unwrap();
    assert!(sent.message_id.is_some());

    let page = app.messages().list(&a.token, channel, 0).unwrap();
    assert_eq!(page.messages.len(), 1);
    assert_eq!(page.messages[0].text, "hi");
    assert_eq!(page.start, 0);
    assert_eq!(page.end, -1);
}

#[test]
fn test_pagination_of_seventy_messages() {
    let app = TestApp::new();
    let a = app.register("Ada", "Lovelace");
    let channel = app.create_channel(&a.token, "general", true);
    for i in 0..70 {
        app.messages()
            .send(&a.token, channel, format!("msg {i}"))
            .unwrap();
    }

    let first = app.messages().list(&a.token, channel, 0).unwrap();
    assert_eq!(first.messages.len(), 50);
    assert_eq!(first.end, 50);
    assert_eq!(first.messages[0].text, "msg 69");

    let tail = app.messages().list(&a.token, channel, 60).unwrap();
    assert_eq!(tail.messages.len(), 10);
    assert_eq!(tail.end, -1);

    let err = app.messages().list(&a.token, channel, 71).unwrap_err();
    assert!(is_domain(&err, DomainError::is_invalid_argument));
}

#[test]
fn test_message_ids_unique_across_channels_and_removals() {
    let app = TestApp::new();
    let a = app.register("Ada", "Lovelace");
    let one = app.create_channel(&a.token, "one", true);
    let two = app.create_channel(&a.token, "two", true);

    let mut seen = Vec::new();
    for i in 0..6 {
        let channel = if i % 2 == 0 { one } else { two };
        let id = app
            .messages()
            .send(&a.token, channel, format!("msg {i}"))
            .unwrap()
            .message_id
            .unwrap();
        seen.push(id);
    }
    app.messages().remove(&a.token, seen[2]).unwrap();
    let after_removal = app
        .messages()
        .send(&a.token, one, "fresh".into())
        .unwrap()
        .message_id
        .unwrap();
    seen.push(after_removal);

    let mut sorted = seen.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), seen.len(), "ids must never repeat");
    assert_eq!(&sorted, &seen, "ids must be strictly increasing");
}

#[test]
fn test_reaction_round_trip_and_guards() {
    let app = TestApp::new();
    let a = app.register("Ada", "Lovelace");
    let b = app.register("Grace", "Hopper");
    let channel = app.create_channel(&a.token, "general", true);
    app.channels().join(&b.token, channel).unwrap();

    let id = app
        .messages()
        .send(&a.token, channel, "react to me".into())
        .unwrap()
        .message_id
        .unwrap();

    app.messages().react(&b.token, id, 1).unwrap();
    let err = app.messages().react(&b.token, id, 1).unwrap_err();
    assert!(is_domain(&err, |e| *e == DomainError::AlreadyReacted));

    // the reactor sees `me`, the author does not
    let page = app.messages().list(&b.token, channel, 0).unwrap();
    assert!(page.messages[0].reactions[0].me);
    let page = app.messages().list(&a.token, channel, 0).unwrap();
    assert!(!page.messages[0].reactions[0].me);
    assert_eq!(page.messages[0].reactions[0].user_ids.len(), 1);

    app.messages().unreact(&b.token, id, 1).unwrap();
    let err = app.messages().unreact(&b.token, id, 1).unwrap_err();
    assert!(is_domain(&err, |e| *e == DomainError::NotReacted));
}

// ============================================================================
// Membership invariants
// ============================================================================

#[test]
fn test_invited_member_leaves_channel_keeps_owner() {
    let app = TestApp::new();
    let a = app.register("Ada", "Lovelace");
    let b = app.register("Grace", "Hopper");
    let channel = app.create_channel(&a.token, "general", true);

    app.channels().invite(&a.token, channel, b.user_id).unwrap();
    app.channels().leave(&b.token, channel).unwrap();

    let details = app.channels().details(&a.token, channel).unwrap();
    assert_eq!(details.all_members.len(), 1);
    assert_eq!(details.owner_members.len(), 1);
    assert_eq!(details.owner_members[0].user_id, a.user_id);
}

#[test]
fn test_last_member_leaving_deletes_channel() {
    let app = TestApp::new();
    let a = app.register("Ada", "Lovelace");
    let b = app.register("Grace", "Hopper");
    let channel = app.create_channel(&a.token, "doomed", true);

    app.channels().leave(&a.token, channel).unwrap();

    let err = app.channels().join(&b.token, channel).unwrap_err();
    assert!(is_domain(&err, DomainError::is_not_found));
    assert!(app.channels().list_all(&a.token).unwrap().is_empty());
}

#[test]
fn test_owner_leaving_promotes_longest_standing_member() {
    let app = TestApp::new();
    let a = app.register("Ada", "Lovelace");
    let b = app.register("Grace", "Hopper");
    let c = app.register("Edsger", "Dijkstra");
    let channel = app.create_channel(&a.token, "general", true);
    app.channels().join(&b.token, channel).unwrap();
    app.channels().join(&c.token, channel).unwrap();

    app.channels().leave(&a.token, channel).unwrap();

    let details = app.channels().details(&b.token, channel).unwrap();
    assert_eq!(details.owner_members.len(), 1);
    assert_eq!(details.owner_members[0].user_id, b.user_id);
}

// ============================================================================
// Authorization
// ============================================================================

#[test]
fn test_global_owner_is_elevated_everywhere() {
    let app = TestApp::new();
    let first = app.register("Ada", "Lovelace"); // first user: global owner
    let b = app.register("Grace", "Hopper");
    let channel = app.create_channel(&b.token, "private", false);

    // a global owner may join a private channel and arrives as channel owner
    app.channels().join(&first.token, channel).unwrap();
    let details = app.channels().details(&first.token, channel).unwrap();
    assert!(details
        .owner_members
        .iter()
        .any(|m| m.user_id == first.user_id));

    // and may pin without holding per-channel ownership originally
    let id = app
        .messages()
        .send(&b.token, channel, "announcement".into())
        .unwrap()
        .message_id
        .unwrap();
    app.messages().pin(&first.token, id).unwrap();
}

#[test]
fn test_permission_change_grants_elevated_rights() {
    let app = TestApp::new();
    let first = app.register("Ada", "Lovelace");
    let b = app.register("Grace", "Hopper");
    let c = app.register("Edsger", "Dijkstra");
    let channel = app.create_channel(&b.token, "private", false);

    let err = app.channels().join(&c.token, channel).unwrap_err();
    assert!(is_domain(&err, DomainError::is_forbidden));

    app.admin().change_permission(&first.token, c.user_id, 1).unwrap();
    app.channels().join(&c.token, channel).unwrap();
}

#[test]
fn test_resolver_fails_closed() {
    let app = TestApp::new();
    let a = app.register("Ada", "Lovelace");

    let err = app.channels().list("never-issued").unwrap_err();
    assert!(is_domain(&err, DomainError::is_unauthorized));

    assert!(app.auth().logout(&a.token).is_success);
    let err = app.channels().list(&a.token).unwrap_err();
    assert!(is_domain(&err, DomainError::is_unauthorized));
}

// ============================================================================
// Deferred delivery
// ============================================================================

#[tokio::test]
async fn test_send_later_appears_only_after_deadline() {
    let app = TestApp::new();
    let a = app.register("Ada", "Lovelace");
    let channel = app.create_channel(&a.token, "general", true);

    let send_at = Utc::now() + chrono::Duration::seconds(2);
    let scheduled = app
        .messages()
        .send_later(&a.token, channel, "delayed hello".into(), send_at)
        .unwrap();

    let page = app.messages().list(&a.token, channel, 0).unwrap();
    assert!(page.messages.is_empty(), "nothing before the deadline");

    tokio::time::sleep(Duration::from_millis(2500)).await;

    let page = app.messages().list(&a.token, channel, 0).unwrap();
    assert_eq!(page.messages.len(), 1);
    let delivered = &page.messages[0];
    assert_eq!(delivered.message_id, scheduled.message_id);
    assert_eq!(delivered.text, "delayed hello");
    let skew = (delivered.created_at - send_at).num_milliseconds().abs();
    assert!(skew < 500, "timestamp should match the scheduled instant");
}

#[tokio::test]
async fn test_send_later_into_deleted_channel_is_silent() {
    let app = TestApp::new();
    let a = app.register("Ada", "Lovelace");
    let channel = app.create_channel(&a.token, "ephemeral", true);

    app.messages()
        .send_later(
            &a.token,
            channel,
            "ghost".into(),
            Utc::now() + chrono::Duration::seconds(1),
        )
        .unwrap();
    app.channels().leave(&a.token, channel).unwrap();

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(app.channels().list_all(&a.token).unwrap().is_empty());
    assert!(app.search().search(&a.token, "ghost").unwrap().messages.is_empty());
}

// ============================================================================
// Standups
// ============================================================================

#[tokio::test]
async fn test_standup_buffers_lines_into_one_message() {
    let app = TestApp::new();
    let a = app.register("Ada", "Lovelace");
    let b = app.register("Grace", "Hopper");
    let channel = app.create_channel(&a.token, "general", true);
    app.channels().join(&b.token, channel).unwrap();

    let started = app.standups().start(&a.token, channel, 2).unwrap();
    assert!(app.standups().active(&b.token, channel).unwrap().is_active);

    app.standups()
        .send(&b.token, channel, "shipped the fix")
        .unwrap();
    app.standups()
        .send(&b.token, channel, "starting on reviews")
        .unwrap();

    tokio::time::sleep(Duration::from_millis(2500)).await;

    assert!(!app.standups().active(&b.token, channel).unwrap().is_active);
    let page = app.messages().list(&a.token, channel, 0).unwrap();
    assert_eq!(page.messages.len(), 1, "exactly one composed message");
    let flushed = &page.messages[0];
    assert_eq!(flushed.author_id, a.user_id);
    let handle = app.users().profile(&a.token, b.user_id).unwrap().handle;
    assert_eq!(
        flushed.text,
        format!("{handle}: shipped the fix\n{handle}: starting on reviews")
    );
    assert_eq!(flushed.created_at, started.finish_at);
}

#[tokio::test]
async fn test_standup_rejects_double_start_and_outsiders() {
    let app = TestApp::new();
    let a = app.register("Ada", "Lovelace");
    let outsider = app.register("Edsger", "Dijkstra");
    let channel = app.create_channel(&a.token, "general", true);

    app.standups().start(&a.token, channel, 2).unwrap();
    let err = app.standups().start(&a.token, channel, 2).unwrap_err();
    assert!(is_domain(&err, |e| *e == DomainError::StandupAlreadyActive));

    let err = app
        .standups()
        .send(&outsider.token, channel, "let me in")
        .unwrap_err();
    assert!(is_domain(&err, DomainError::is_forbidden));
}

// ============================================================================
// Search
// ============================================================================

#[test]
fn test_search_only_reaches_own_channels() {
    let app = TestApp::new();
    let a = app.register("Ada", "Lovelace");
    let b = app.register("Grace", "Hopper");
    let mine = app.create_channel(&a.token, "mine", true);
    let theirs = app.create_channel(&b.token, "theirs", true);

    app.messages()
        .send(&a.token, mine, "quarterly report ready".into())
        .unwrap();
    app.messages()
        .send(&b.token, theirs, "quarterly numbers draft".into())
        .unwrap();

    let hits = app.search().search(&a.token, "quarterly").unwrap();
    assert_eq!(hits.messages.len(), 1);
    assert_eq!(hits.messages[0].text, "quarterly report ready");
}

// ============================================================================
// Reset
// ============================================================================

#[test]
fn test_clear_discards_all_state() {
    let app = TestApp::new();
    let a = app.register("Ada", "Lovelace");
    let channel = app.create_channel(&a.token, "general", true);
    app.messages()
        .send(&a.token, channel, "soon gone".into())
        .unwrap();

    app.ctx.clear();

    // old session is dead
    let err = app.channels().list(&a.token).unwrap_err();
    assert!(is_domain(&err, DomainError::is_unauthorized));

    // ids restart: the next registered user is user 0 and a global owner
    let fresh = app.register("Grace", "Hopper");
    assert_eq!(fresh.user_id, UserId::new(0));
    assert!(app.channels().list_all(&fresh.token).unwrap().is_empty());
}

#[tokio::test]
async fn test_pending_timer_firing_after_clear_is_harmless() {
    let app = TestApp::new();
    let a = app.register("Ada", "Lovelace");
    let channel = app.create_channel(&a.token, "general", true);
    app.messages()
        .send_later(
            &a.token,
            channel,
            "from the old world".into(),
            Utc::now() + chrono::Duration::seconds(1),
        )
        .unwrap();

    app.ctx.clear();
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let fresh = app.register("Grace", "Hopper");
    assert!(app.channels().list_all(&fresh.token).unwrap().is_empty());
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_senders_get_unique_ids() {
    let app = TestApp::new();
    let a = app.register("Ada", "Lovelace");
    let channel = app.create_channel(&a.token, "busy", true);

    let mut handles = Vec::new();
    for task in 0..8 {
        let ctx = app.ctx.clone();
        let token = a.token.clone();
        handles.push(tokio::spawn(async move {
            let messages = huddle_service::MessageService::new(&ctx);
            let mut ids = Vec::new();
            for i in 0..25 {
                let id = messages
                    .send(&token, channel, format!("task {task} msg {i}"))
                    .unwrap()
                    .message_id
                    .unwrap();
                ids.push(id);
            }
            ids
        }));
    }

    let mut all = HashSet::new();
    for handle in handles {
        for id in handle.await.unwrap() {
            assert!(all.insert(id), "message id reused under concurrency");
        }
    }
    assert_eq!(all.len(), 200);

    let page = app.messages().list(&a.token, channel, 0).unwrap();
    assert_eq!(page.messages.len(), 50);
    assert_eq!(page.end, 50);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_join_and_leave_keeps_channel_consistent() {
    let app = TestApp::new();
    let anchor = app.register("Ada", "Lovelace");
    let channel = app.create_channel(&anchor.token, "revolving", true);

    let mut handles = Vec::new();
    for last_name in ["Alpha", "Beta", "Gamma", "Delta", "Epsilon", "Zeta"] {
        let ctx = app.ctx.clone();
        let session = app.register("Churner", last_name);
        handles.push(tokio::spawn(async move {
            let channels = huddle_service::ChannelService::new(&ctx);
            for _ in 0..20 {
                channels.join(&session.token, channel).unwrap();
                channels.leave(&session.token, channel).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    // the anchor member never left, so the channel must still exist with
    // the anchor as a member and a non-empty owner set
    let details = app.channels().details(&anchor.token, channel).unwrap();
    assert!(details
        .all_members
        .iter()
        .any(|m| m.user_id == anchor.user_id));
    assert!(!details.owner_members.is_empty());
}
