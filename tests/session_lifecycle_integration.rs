//! Integration tests for the reading-session lifecycle.
//!
//! Exercises the full path from the lifecycle handler through the
//! in-memory stores: start/stop/pause/resume, the single-open-session
//! rule, book progress reconciliation on stop, and goal-window
//! aggregation.

use std::sync::Arc;

use pagekeeper::adapters::{InMemoryBookRepository, InMemorySessionRepository};
use pagekeeper::application::handlers::book::{
    GetGoalProgressHandler, SetReadingGoalCommand, SetReadingGoalHandler, UpdateProgressHandler,
};
use pagekeeper::application::handlers::session::{
    ExcludeTimeCommand, SessionLifecycleHandler, StartSessionCommand, StopSessionCommand,
};
use pagekeeper::domain::book::{Book, GoalPeriod};
use pagekeeper::domain::foundation::{
    BookId, SessionId, SessionStatus, Timestamp, UserId,
};
use pagekeeper::domain::session::{ReadingSession, SessionError};
use pagekeeper::ports::BookRepository;

// =============================================================================
// Test fixture
// =============================================================================

struct Fixture {
    books: Arc<InMemoryBookRepository>,
    sessions: Arc<InMemorySessionRepository>,
    lifecycle: Arc<SessionLifecycleHandler>,
    goal_progress: GetGoalProgressHandler,
    set_goal: SetReadingGoalHandler,
}

impl Fixture {
    fn new() -> Self {
        let books = Arc::new(InMemoryBookRepository::new());
        let sessions = Arc::new(InMemorySessionRepository::new());
        let progress = Arc::new(UpdateProgressHandler::new(books.clone()));
        let lifecycle = Arc::new(SessionLifecycleHandler::new(
            sessions.clone(),
            books.clone(),
            progress,
        ));
        let goal_progress = GetGoalProgressHandler::new(books.clone(), sessions.clone());
        let set_goal = SetReadingGoalHandler::new(books.clone());
        Self {
            books,
            sessions,
            lifecycle,
            goal_progress,
            set_goal,
        }
    }

    async fn seed_book(&self, user: &UserId, title: &str, page_count: Option<i32>) -> Book {
        let book = Book::new(BookId::new(), user.clone(), title.to_string(), page_count).unwrap();
        self.books.insert(book.clone()).await;
        book
    }

    /// Open sessions the user holds across the given books.
    async fn open_session_count(&self, user: &UserId, books: &[&Book]) -> usize {
        let mut count = 0;
        for book in books {
            count += self
                .lifecycle
                .sessions_for_book(user, book.id())
                .await
                .unwrap()
                .iter()
                .filter(|s| s.is_open())
                .count();
        }
        count
    }
}

fn reader() -> UserId {
    UserId::new("reader-1").unwrap()
}

// =============================================================================
// End-to-end flows
// =============================================================================

#[tokio::test]
async fn read_to_completion_flow() {
    let fx = Fixture::new();
    let user = reader();
    let book = fx.seed_book(&user, "The Name of the Rose", Some(200)).await;

    let session = fx
        .lifecycle
        .start(&user, StartSessionCommand { book_id: *book.id() })
        .await
        .unwrap();
    assert_eq!(session.status(), SessionStatus::Active);

    let session = fx
        .lifecycle
        .stop(
            &user,
            StopSessionCommand {
                end_time: None,
                end_page: Some(200),
            },
        )
        .await
        .unwrap();

    assert_eq!(session.status(), SessionStatus::Completed);
    assert_eq!(session.pages_read(), Some(200));

    let book = fx.books.find_owned(book.id(), &user).await.unwrap().unwrap();
    assert_eq!(book.current_page(), 200);
    assert!(book.completed());
}

#[tokio::test]
async fn switching_books_completes_previous_session() {
    let fx = Fixture::new();
    let user = reader();
    let book_a = fx.seed_book(&user, "Book A", Some(150)).await;
    let book_b = fx.seed_book(&user, "Book B", Some(150)).await;

    let first = fx
        .lifecycle
        .start(&user, StartSessionCommand { book_id: *book_a.id() })
        .await
        .unwrap();

    let second = fx
        .lifecycle
        .start(&user, StartSessionCommand { book_id: *book_b.id() })
        .await
        .unwrap();

    assert_eq!(second.status(), SessionStatus::Active);
    assert_eq!(second.book_id(), book_b.id());

    let history = fx
        .lifecycle
        .sessions_for_book(&user, book_a.id())
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    let stopped = &history[0];
    assert_eq!(stopped.id(), first.id());
    assert_eq!(stopped.status(), SessionStatus::Completed);
    assert!(stopped.end_time().is_some());
    assert_eq!(stopped.end_page(), None);
    assert_eq!(stopped.pages_read(), None);

    assert_eq!(fx.open_session_count(&user, &[&book_a, &book_b]).await, 1);
}

#[tokio::test]
async fn pause_and_resume_account_for_paused_time() {
    let fx = Fixture::new();
    let user = reader();
    let book = fx.seed_book(&user, "Slow read", None).await;

    fx.lifecycle
        .start(&user, StartSessionCommand { book_id: *book.id() })
        .await
        .unwrap();

    let paused = fx.lifecycle.pause(&user).await.unwrap();
    assert_eq!(paused.status(), SessionStatus::Paused);
    assert!(paused.paused_at().is_some());

    tokio::time::sleep(std::time::Duration::from_millis(120)).await;

    let resumed = fx.lifecycle.resume(&user).await.unwrap();
    assert_eq!(resumed.status(), SessionStatus::Active);
    assert!(resumed.paused_at().is_none());
    assert!(resumed.paused_millis() >= 100);
    assert!(resumed.paused_millis() < 5_000);
}

#[tokio::test]
async fn stop_while_paused_folds_pause_into_accumulator() {
    let fx = Fixture::new();
    let user = reader();
    let book = fx.seed_book(&user, "Half-read", Some(400)).await;

    fx.lifecycle
        .start(&user, StartSessionCommand { book_id: *book.id() })
        .await
        .unwrap();
    let paused = fx.lifecycle.pause(&user).await.unwrap();
    let paused_at = *paused.paused_at().unwrap();

    let session = fx
        .lifecycle
        .stop(
            &user,
            StopSessionCommand {
                end_time: Some(paused_at.plus_millis(7_000)),
                end_page: Some(60),
            },
        )
        .await
        .unwrap();

    assert_eq!(session.status(), SessionStatus::Completed);
    assert_eq!(session.paused_millis(), 7_000);
    assert!(session.paused_at().is_none());
    assert_eq!(session.pages_read(), Some(60));
}

#[tokio::test]
async fn exclude_time_discounts_idle_reading() {
    let fx = Fixture::new();
    let user = reader();
    let book = fx.seed_book(&user, "Distracted read", None).await;

    fx.lifecycle
        .start(&user, StartSessionCommand { book_id: *book.id() })
        .await
        .unwrap();

    let session = fx
        .lifecycle
        .exclude_time(&user, ExcludeTimeCommand { millis: 300_000 })
        .await
        .unwrap();

    assert_eq!(session.paused_millis(), 300_000);
    assert_eq!(session.status(), SessionStatus::Active);
}

// =============================================================================
// Error surfaces
// =============================================================================

#[tokio::test]
async fn pause_without_session_is_an_illegal_state() {
    let fx = Fixture::new();
    let result = fx.lifecycle.pause(&reader()).await;
    assert!(matches!(result, Err(SessionError::InvalidState(_))));
}

#[tokio::test]
async fn negative_exclude_time_is_rejected() {
    let fx = Fixture::new();
    let result = fx
        .lifecycle
        .exclude_time(&reader(), ExcludeTimeCommand { millis: -1 })
        .await;
    assert!(matches!(result, Err(SessionError::Validation { .. })));
}

#[tokio::test]
async fn stop_without_open_session_is_not_found() {
    let fx = Fixture::new();
    let result = fx
        .lifecycle
        .stop(&reader(), StopSessionCommand::default())
        .await;
    assert!(matches!(result, Err(SessionError::NoOpenSession)));
}

#[tokio::test]
async fn deleting_a_books_sessions_clears_history() {
    let fx = Fixture::new();
    let user = reader();
    let book = fx.seed_book(&user, "Returned to library", None).await;

    fx.lifecycle
        .start(&user, StartSessionCommand { book_id: *book.id() })
        .await
        .unwrap();
    fx.lifecycle
        .stop(&user, StopSessionCommand::default())
        .await
        .unwrap();

    fx.lifecycle.delete_for_book(&user, book.id()).await.unwrap();

    let history = fx
        .lifecycle
        .sessions_for_book(&user, book.id())
        .await
        .unwrap();
    assert!(history.is_empty());
}

// =============================================================================
// Goal progress
// =============================================================================

#[tokio::test]
async fn goal_progress_counts_only_the_current_window() {
    let fx = Fixture::new();
    let user = reader();
    let book = fx.seed_book(&user, "Weekly goal", Some(500)).await;

    fx.set_goal
        .handle(
            &user,
            SetReadingGoalCommand {
                book_id: *book.id(),
                period: GoalPeriod::Weekly,
                target_pages: 100,
            },
        )
        .await
        .unwrap();

    let now = Timestamp::now();
    // Ended moments ago: inside the current week.
    fx.sessions
        .insert(ReadingSession::reconstitute(
            SessionId::new(),
            user.clone(),
            *book.id(),
            SessionStatus::Completed,
            now.plus_millis(-3_600_000),
            Some(now.plus_millis(-1_000)),
            Some(30),
            Some(30),
            Some(0),
            None,
        ))
        .await;
    // Ended more than a week ago: outside any weekly window.
    fx.sessions
        .insert(ReadingSession::reconstitute(
            SessionId::new(),
            user.clone(),
            *book.id(),
            SessionStatus::Completed,
            now.plus_days(-9),
            Some(now.plus_days(-8)),
            Some(999),
            Some(999),
            Some(0),
            None,
        ))
        .await;

    let progress = fx.goal_progress.handle(&user, book.id()).await.unwrap();
    assert_eq!(progress, Some(30));
}

#[tokio::test]
async fn stopping_with_an_end_page_feeds_goal_progress() {
    let fx = Fixture::new();
    let user = reader();
    let book = fx.seed_book(&user, "Monthly goal", Some(500)).await;

    fx.set_goal
        .handle(
            &user,
            SetReadingGoalCommand {
                book_id: *book.id(),
                period: GoalPeriod::Monthly,
                target_pages: 200,
            },
        )
        .await
        .unwrap();

    fx.lifecycle
        .start(&user, StartSessionCommand { book_id: *book.id() })
        .await
        .unwrap();
    fx.lifecycle
        .stop(
            &user,
            StopSessionCommand {
                end_time: None,
                end_page: Some(40),
            },
        )
        .await
        .unwrap();

    let progress = fx.goal_progress.handle(&user, book.id()).await.unwrap();
    assert_eq!(progress, Some(40));
}

#[tokio::test]
async fn session_stopped_without_end_page_does_not_count_toward_goal() {
    let fx = Fixture::new();
    let user = reader();
    let book = fx.seed_book(&user, "Untracked stop", Some(500)).await;

    fx.set_goal
        .handle(
            &user,
            SetReadingGoalCommand {
                book_id: *book.id(),
                period: GoalPeriod::Weekly,
                target_pages: 50,
            },
        )
        .await
        .unwrap();

    fx.lifecycle
        .start(&user, StartSessionCommand { book_id: *book.id() })
        .await
        .unwrap();
    fx.lifecycle
        .stop(&user, StopSessionCommand::default())
        .await
        .unwrap();

    let progress = fx.goal_progress.handle(&user, book.id()).await.unwrap();
    assert_eq!(progress, Some(0));
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn concurrent_starts_leave_one_open_session() {
    let fx = Fixture::new();
    let user = reader();
    let book_a = fx.seed_book(&user, "Racer A", None).await;
    let book_b = fx.seed_book(&user, "Racer B", None).await;

    let (left, right) = tokio::join!(
        {
            let lifecycle = fx.lifecycle.clone();
            let user = user.clone();
            let book_id = *book_a.id();
            async move { lifecycle.start(&user, StartSessionCommand { book_id }).await }
        },
        {
            let lifecycle = fx.lifecycle.clone();
            let user = user.clone();
            let book_id = *book_b.id();
            async move { lifecycle.start(&user, StartSessionCommand { book_id }).await }
        }
    );

    left.unwrap();
    right.unwrap();

    assert_eq!(fx.open_session_count(&user, &[&book_a, &book_b]).await, 1);
}

#[tokio::test]
async fn users_do_not_interfere_with_each_other() {
    let fx = Fixture::new();
    let alice = UserId::new("alice").unwrap();
    let bob = UserId::new("bob").unwrap();
    let alices_book = fx.seed_book(&alice, "Alice's book", None).await;
    let bobs_book = fx.seed_book(&bob, "Bob's book", None).await;

    fx.lifecycle
        .start(&alice, StartSessionCommand { book_id: *alices_book.id() })
        .await
        .unwrap();
    fx.lifecycle.pause(&alice).await.unwrap();

    let bobs = fx
        .lifecycle
        .start(&bob, StartSessionCommand { book_id: *bobs_book.id() })
        .await
        .unwrap();
    assert_eq!(bobs.status(), SessionStatus::Active);

    // Alice's paused session is untouched by Bob's activity.
    let alices = fx.lifecycle.active_session(&alice).await.unwrap().unwrap();
    assert_eq!(alices.status(), SessionStatus::Paused);

    // And Bob cannot read Alice's shelf.
    let result = fx.lifecycle.sessions_for_book(&bob, alices_book.id()).await;
    assert!(matches!(result, Err(SessionError::BookNotFound(_))));
}

// =============================================================================
// Invariant property
// =============================================================================

mod invariant {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Start(usize),
        Stop,
        Pause,
        Resume,
        Exclude(i64),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..2).prop_map(Op::Start),
            Just(Op::Stop),
            Just(Op::Pause),
            Just(Op::Resume),
            (0i64..100_000).prop_map(Op::Exclude),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Whatever sequence of lifecycle calls a user issues, they never
        /// hold more than one open session.
        #[test]
        fn prop_at_most_one_open_session(ops in prop::collection::vec(op_strategy(), 1..24)) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .unwrap();

            rt.block_on(async move {
                let fx = Fixture::new();
                let user = reader();
                let books = [
                    fx.seed_book(&user, "Invariant A", Some(300)).await,
                    fx.seed_book(&user, "Invariant B", Some(300)).await,
                ];

                for op in ops {
                    // Errors are part of the protocol here; only the
                    // invariant matters.
                    let _ = match op {
                        Op::Start(i) => fx
                            .lifecycle
                            .start(&user, StartSessionCommand { book_id: *books[i].id() })
                            .await,
                        Op::Stop => {
                            fx.lifecycle.stop(&user, StopSessionCommand::default()).await
                        }
                        Op::Pause => fx.lifecycle.pause(&user).await,
                        Op::Resume => fx.lifecycle.resume(&user).await,
                        Op::Exclude(millis) => {
                            fx.lifecycle
                                .exclude_time(&user, ExcludeTimeCommand { millis })
                                .await
                        }
                    };

                    let open = fx
                        .open_session_count(&user, &[&books[0], &books[1]])
                        .await;
                    assert!(open <= 1, "found {} open sessions", open);
                }
            });
        }
    }
}
