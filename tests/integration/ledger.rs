use chrono::{Duration, Utc};
use sqlx::PgPool;

use library_lending::{models::BorrowStatus, AppError};

use crate::common::{admin, library, member, new_book};

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn test_single_copy_borrow_and_timely_return(pool: PgPool) {
    let library = library(pool);
    let admin = admin(&library).await;
    let alice = member(&library, "alice").await;
    let bob = member(&library, "bob").await;

    let book = library.add_book(&admin, new_book("The Alchemist", 1)).await.unwrap();

    library.add_to_cart(&alice, book.id).await.unwrap();
    let borrowed_at = Utc::now() - Duration::days(10);
    let receipt = library
        .services
        .ledger
        .checkout_at(alice.id, borrowed_at)
        .await
        .unwrap();

    assert_eq!(receipt.count, 1);
    assert_eq!(receipt.due_at, (borrowed_at + Duration::days(14)).date_naive());
    assert_eq!(library.book(book.id).await.unwrap().available_copies, 0);
    assert!(library.cart(&alice).await.unwrap().is_empty());

    let err = library.add_to_cart(&bob, book.id).await.unwrap_err();
    assert!(matches!(err, AppError::BookUnavailable(_)));

    let open = library.borrowed(&alice).await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].book.id, book.id);
    let record_id = open[0].record.id;

    let returned = library.return_book(&alice, record_id).await.unwrap();
    assert_eq!(returned.points, 20);
    assert!(!returned.late);

    let book = library.book(book.id).await.unwrap();
    assert_eq!(book.available_copies, 1);
    assert_eq!(library.account(alice.id).await.unwrap().points, 20);

    let record = library.services.ledger.list_history(alice.id).await.unwrap();
    assert_eq!(record.len(), 1);
    assert_eq!(record[0].status, BorrowStatus::Closed);
    assert_eq!(record[0].points_awarded, 20);
    assert!(record[0].return_at.is_some());
    assert!(library.borrowed(&alice).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn test_late_return_awards_five_points(pool: PgPool) {
    let library = library(pool);
    let admin = admin(&library).await;
    let alice = member(&library, "alice").await;
    let book = library.add_book(&admin, new_book("Sapiens", 3)).await.unwrap();

    library.add_to_cart(&alice, book.id).await.unwrap();
    let borrowed_at = Utc::now() - Duration::days(20);
    let receipt = library
        .services
        .ledger
        .checkout_at(alice.id, borrowed_at)
        .await
        .unwrap();

    let returned = library
        .services
        .ledger
        .return_book_at(alice.id, receipt.record_ids[0], borrowed_at + Duration::days(20))
        .await
        .unwrap();

    assert_eq!(returned.points, 5);
    assert!(returned.late);
    assert_eq!(library.account(alice.id).await.unwrap().points, 5);
    assert_eq!(library.book(book.id).await.unwrap().available_copies, 3);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn test_second_return_of_same_record_fails(pool: PgPool) {
    let library = library(pool);
    let admin = admin(&library).await;
    let alice = member(&library, "alice").await;
    let book = library.add_book(&admin, new_book("Clean Code", 2)).await.unwrap();

    library.add_to_cart(&alice, book.id).await.unwrap();
    let receipt = library.checkout(&alice).await.unwrap();
    let record_id = receipt.record_ids[0];
    assert_eq!(library.book(book.id).await.unwrap().available_copies, 1);

    library.return_book(&alice, record_id).await.unwrap();
    let err = library.return_book(&alice, record_id).await.unwrap_err();
    assert!(matches!(err, AppError::RecordNotFound(id) if id == record_id));

    assert_eq!(library.book(book.id).await.unwrap().available_copies, 2);
    assert_eq!(library.account(alice.id).await.unwrap().points, 20);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn test_cannot_return_another_accounts_record(pool: PgPool) {
    let library = library(pool);
    let admin = admin(&library).await;
    let alice = member(&library, "alice").await;
    let bob = member(&library, "bob").await;
    let book = library.add_book(&admin, new_book("The Little Prince", 6)).await.unwrap();

    library.add_to_cart(&alice, book.id).await.unwrap();
    let receipt = library.checkout(&alice).await.unwrap();

    let err = library.return_book(&bob, receipt.record_ids[0]).await.unwrap_err();
    assert!(matches!(err, AppError::RecordNotFound(_)));
    assert_eq!(library.book(book.id).await.unwrap().available_copies, 5);
    assert_eq!(library.account(bob.id).await.unwrap().points, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn test_checkout_empty_cart(pool: PgPool) {
    let library = library(pool);
    let alice = member(&library, "alice").await;

    let err = library.checkout(&alice).await.unwrap_err();
    assert!(matches!(err, AppError::EmptyCart));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn test_checkout_is_all_or_nothing(pool: PgPool) {
    let library = library(pool);
    let admin = admin(&library).await;
    let alice = member(&library, "alice").await;
    let bob = member(&library, "bob").await;

    let scarce = library.add_book(&admin, new_book("How to Win Friends", 1)).await.unwrap();
    let plenty = library.add_book(&admin, new_book("Sapiens", 2)).await.unwrap();

    library.add_to_cart(&alice, scarce.id).await.unwrap();
    library.add_to_cart(&alice, plenty.id).await.unwrap();

    // Bob takes the last copy after Alice staged it
    library.add_to_cart(&bob, scarce.id).await.unwrap();
    library.checkout(&bob).await.unwrap();

    let err = library.checkout(&alice).await.unwrap_err();
    assert!(matches!(err, AppError::BookUnavailable(ref title) if title == "How to Win Friends"));

    assert_eq!(library.cart(&alice).await.unwrap().len(), 2);
    assert_eq!(library.book(plenty.id).await.unwrap().available_copies, 2);
    assert_eq!(library.book(scarce.id).await.unwrap().available_copies, 0);
    assert!(library.borrowed(&alice).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn test_concurrent_checkouts_of_last_copy(pool: PgPool) {
    let library = library(pool);
    let admin = admin(&library).await;
    let alice = member(&library, "alice").await;
    let bob = member(&library, "bob").await;
    let book = library.add_book(&admin, new_book("The Alchemist", 1)).await.unwrap();

    library.add_to_cart(&alice, book.id).await.unwrap();
    library.add_to_cart(&bob, book.id).await.unwrap();

    let (a, b) = tokio::join!(library.checkout(&alice), library.checkout(&bob));

    assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
    let failure = a.err().or(b.err()).unwrap();
    assert!(matches!(failure, AppError::BookUnavailable(_)));
    assert_eq!(library.book(book.id).await.unwrap().available_copies, 0);
    assert_eq!(library.services.ledger.list_recent(None).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn test_double_submitted_checkout_consumes_entry_once(pool: PgPool) {
    let library = library(pool.clone());
    let admin = admin(&library).await;
    let alice = member(&library, "alice").await;
    let book = library.add_book(&admin, new_book("Sapiens", 3)).await.unwrap();

    library.add_to_cart(&alice, book.id).await.unwrap();

    // Hold the book row so both checkouts read the cart before either commits
    let mut blocker = pool.begin().await.unwrap();
    sqlx::query("SELECT id FROM books WHERE id = $1 FOR UPDATE")
        .bind(book.id)
        .execute(&mut *blocker)
        .await
        .unwrap();

    let first = tokio::spawn({
        let (library, alice) = (library.clone(), alice.clone());
        async move { library.checkout(&alice).await }
    });
    let second = tokio::spawn({
        let (library, alice) = (library.clone(), alice.clone());
        async move { library.checkout(&alice).await }
    });

    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    blocker.commit().await.unwrap();

    let a = first.await.unwrap();
    let b = second.await.unwrap();

    assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
    let failure = a.err().or(b.err()).unwrap();
    assert!(matches!(failure, AppError::EmptyCart));

    assert_eq!(library.borrowed(&alice).await.unwrap().len(), 1);
    assert_eq!(library.book(book.id).await.unwrap().available_copies, 2);
    assert!(library.cart(&alice).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn test_same_title_can_be_borrowed_again(pool: PgPool) {
    let library = library(pool);
    let admin = admin(&library).await;
    let alice = member(&library, "alice").await;
    let book = library.add_book(&admin, new_book("Clean Code", 4)).await.unwrap();

    for _ in 0..2 {
        library.add_to_cart(&alice, book.id).await.unwrap();
        library.checkout(&alice).await.unwrap();
    }

    assert_eq!(library.borrowed(&alice).await.unwrap().len(), 2);
    assert_eq!(library.book(book.id).await.unwrap().available_copies, 2);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn test_recent_ledger_is_newest_first(pool: PgPool) {
    let library = library(pool);
    let admin = admin(&library).await;
    let alice = member(&library, "alice").await;
    let older = library.add_book(&admin, new_book("Sapiens", 2)).await.unwrap();
    let newer = library.add_book(&admin, new_book("Clean Code", 2)).await.unwrap();

    library.add_to_cart(&alice, older.id).await.unwrap();
    library
        .services
        .ledger
        .checkout_at(alice.id, Utc::now() - Duration::days(3))
        .await
        .unwrap();
    library.add_to_cart(&alice, newer.id).await.unwrap();
    library.checkout(&alice).await.unwrap();

    let entries = library.recent_ledger(&admin, None).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].record.book_title, "Clean Code");
    assert_eq!(entries[1].record.book_title, "Sapiens");
    assert_eq!(entries[0].account.username, "alice");

    assert_eq!(library.recent_ledger(&admin, Some(1)).await.unwrap().len(), 1);

    let err = library.recent_ledger(&alice, None).await.unwrap_err();
    assert!(matches!(err, AppError::Authorization(_)));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn test_statistics_follow_the_ledger(pool: PgPool) {
    let library = library(pool);
    let admin = admin(&library).await;
    let alice = member(&library, "alice").await;
    let book = library.add_book(&admin, new_book("Sapiens", 3)).await.unwrap();
    library.add_book(&admin, new_book("Clean Code", 4)).await.unwrap();

    library.add_to_cart(&alice, book.id).await.unwrap();
    library
        .services
        .ledger
        .checkout_at(alice.id, Utc::now() - Duration::days(30))
        .await
        .unwrap();

    let stats = library.statistics(&admin).await.unwrap();
    assert_eq!(stats.total_titles, 2);
    assert_eq!(stats.total_copies, 7);
    assert_eq!(stats.available_copies, 6);
    assert_eq!(stats.borrowed_copies, 1);
    assert_eq!(stats.member_count, 1);
    assert_eq!(stats.active_borrows, 1);
    assert_eq!(stats.overdue_borrows, 1);
}
