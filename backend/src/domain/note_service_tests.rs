//! Tests for the note service.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockNoteRepository, NoteRepositoryError};
use crate::outbound::memory::InMemoryNoteStore;

fn dto(title: &str, content: &str) -> NoteDto {
    NoteDto {
        id: None,
        title: title.to_owned(),
        content: content.to_owned(),
    }
}

#[fixture]
fn service() -> NoteService<InMemoryNoteStore> {
    NoteService::new(Arc::new(InMemoryNoteStore::new()))
}

async fn stored_id(service: &NoteService<InMemoryNoteStore>, title: &str, content: &str) -> NoteId {
    service
        .create_note(dto(title, content))
        .await
        .expect("create succeeds")
        .id
        .expect("stored note has an id")
}

#[rstest]
#[tokio::test]
async fn create_persists_once_with_assigned_id(service: NoteService<InMemoryNoteStore>) {
    let created = service
        .create_note(dto("Shopping", "buy milk"))
        .await
        .expect("create succeeds");

    assert!(created.id.is_some());
    assert_eq!(service.get_all_notes().await.expect("list"), vec![created]);
}

#[rstest]
#[tokio::test]
async fn create_ignores_client_supplied_id(service: NoteService<InMemoryNoteStore>) {
    let mut request = dto("Shopping", "buy milk");
    request.id = Some(NoteId::new(500));

    let created = service.create_note(request).await.expect("create succeeds");

    assert_eq!(created.id, Some(NoteId::new(1)));
}

#[rstest]
#[case("Shopping")]
#[case("shopping")]
#[case("SHOPPING")]
#[tokio::test]
async fn duplicate_title_on_create_is_silently_skipped(
    service: NoteService<InMemoryNoteStore>,
    #[case] duplicate: &str,
) {
    stored_id(&service, "Shopping", "buy milk").await;

    let skipped = service
        .create_note(dto(duplicate, "buy eggs"))
        .await
        .expect("duplicate create is not an error");

    assert_eq!(skipped, dto(duplicate, "buy eggs"));
    assert_eq!(service.get_all_notes().await.expect("list").len(), 1);
}

#[rstest]
#[tokio::test]
async fn create_then_get_round_trips(service: NoteService<InMemoryNoteStore>) {
    let id = stored_id(&service, "Shopping", "buy milk").await;

    let fetched = service.get_note_by_id(id).await.expect("note exists");

    assert_eq!(fetched.title, "Shopping");
    assert_eq!(fetched.content, "buy milk");
}

#[rstest]
#[tokio::test]
async fn get_missing_note_names_the_id(service: NoteService<InMemoryNoteStore>) {
    let error = service
        .get_note_by_id(NoteId::new(41))
        .await
        .expect_err("missing note");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert!(error.message().contains("41"));
}

#[rstest]
#[tokio::test]
async fn get_all_lists_in_id_order(service: NoteService<InMemoryNoteStore>) {
    stored_id(&service, "Groceries", "buy milk").await;
    stored_id(&service, "Chores", "wash dishes").await;

    let titles: Vec<String> = service
        .get_all_notes()
        .await
        .expect("list")
        .into_iter()
        .map(|note| note.title)
        .collect();

    assert_eq!(titles, ["Groceries", "Chores"]);
}

#[rstest]
#[tokio::test]
async fn update_rewrites_title_and_content(service: NoteService<InMemoryNoteStore>) {
    let id = stored_id(&service, "Shopping", "buy milk").await;

    let updated = service
        .update_note(id, dto("Errands", "post office"))
        .await
        .expect("update succeeds");

    assert_eq!(updated.id, Some(id));
    assert_eq!(service.get_note_by_id(id).await.expect("note exists"), updated);
}

#[rstest]
#[tokio::test]
async fn update_missing_note_is_not_found(service: NoteService<InMemoryNoteStore>) {
    let error = service
        .update_note(NoteId::new(9), dto("Errands", "post office"))
        .await
        .expect_err("missing note");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert!(error.message().contains('9'));
}

#[rstest]
#[tokio::test]
async fn update_to_another_notes_title_conflicts(service: NoteService<InMemoryNoteStore>) {
    stored_id(&service, "Shopping", "buy milk").await;
    let other = stored_id(&service, "Errands", "post office").await;

    let error = service
        .update_note(other, dto("SHOPPING", "buy eggs"))
        .await
        .expect_err("title taken");

    assert_eq!(error.code(), ErrorCode::TitleConflict);
    assert_eq!(
        service.get_note_by_id(other).await.expect("note exists").title,
        "Errands"
    );
}

// Keeping a note's own title on update is rejected as well. This pins the
// current behaviour; if the title check starts excluding the target note,
// flip this assertion.
#[rstest]
#[tokio::test]
async fn update_keeping_own_title_conflicts(service: NoteService<InMemoryNoteStore>) {
    let id = stored_id(&service, "Shopping", "buy milk").await;

    let error = service
        .update_note(id, dto("Shopping", "buy eggs"))
        .await
        .expect_err("own title counts as taken");

    assert_eq!(error.code(), ErrorCode::TitleConflict);
}

#[rstest]
#[tokio::test]
async fn title_conflict_wins_over_missing_note(service: NoteService<InMemoryNoteStore>) {
    stored_id(&service, "Shopping", "buy milk").await;

    let error = service
        .update_note(NoteId::new(77), dto("shopping", "buy eggs"))
        .await
        .expect_err("title checked first");

    assert_eq!(error.code(), ErrorCode::TitleConflict);
}

#[rstest]
#[tokio::test]
async fn delete_removes_exactly_that_note(service: NoteService<InMemoryNoteStore>) {
    let doomed = stored_id(&service, "Shopping", "buy milk").await;
    let kept = stored_id(&service, "Errands", "post office").await;

    service.delete_note(doomed).await.expect("delete succeeds");

    let remaining: Vec<Option<NoteId>> = service
        .get_all_notes()
        .await
        .expect("list")
        .into_iter()
        .map(|note| note.id)
        .collect();
    assert_eq!(remaining, [Some(kept)]);
    let error = service.get_note_by_id(doomed).await.expect_err("deleted");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn delete_missing_note_is_not_found(service: NoteService<InMemoryNoteStore>) {
    let error = service
        .delete_note(NoteId::new(3))
        .await
        .expect_err("missing note");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert!(error.message().contains('3'));
}

/// Store over a mock repository; transactions pass straight through.
struct MockStore(MockNoteRepository);

#[async_trait]
impl NoteRepository for MockStore {
    async fn find_by_id(&self, id: NoteId) -> Result<Option<Note>, NoteRepositoryError> {
        self.0.find_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<Note>, NoteRepositoryError> {
        self.0.find_all().await
    }

    async fn save(&self, note: &Note) -> Result<Note, NoteRepositoryError> {
        self.0.save(note).await
    }

    async fn delete_by_id(&self, id: NoteId) -> Result<(), NoteRepositoryError> {
        self.0.delete_by_id(id).await
    }

    async fn exists_by_id(&self, id: NoteId) -> Result<bool, NoteRepositoryError> {
        self.0.exists_by_id(id).await
    }

    async fn exists_by_title_ignore_case(
        &self,
        title: &str,
    ) -> Result<bool, NoteRepositoryError> {
        self.0.exists_by_title_ignore_case(title).await
    }
}

#[async_trait]
impl NoteStore for MockStore {
    async fn transaction<T, F>(&self, work: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: for<'t> FnOnce(&'t dyn NoteRepository) -> BoxFuture<'t, Result<T, Error>>
            + Send
            + 'static,
    {
        let view: &dyn NoteRepository = &self.0;
        work(view).await
    }
}

fn mock_service(repo: MockNoteRepository) -> NoteService<MockStore> {
    NoteService::new(Arc::new(MockStore(repo)))
}

#[tokio::test]
async fn update_checks_title_before_loading_the_note() {
    let mut repo = MockNoteRepository::new();
    repo.expect_exists_by_title_ignore_case()
        .times(1)
        .returning(|_| Ok(true));
    repo.expect_find_by_id().times(0);
    repo.expect_save().times(0);

    let error = mock_service(repo)
        .update_note(NoteId::new(1), dto("Shopping", "buy eggs"))
        .await
        .expect_err("title taken");

    assert_eq!(error.code(), ErrorCode::TitleConflict);
}

#[tokio::test]
async fn duplicate_create_never_saves() {
    let mut repo = MockNoteRepository::new();
    repo.expect_exists_by_title_ignore_case()
        .times(1)
        .returning(|_| Ok(true));
    repo.expect_save().times(0);

    let skipped = mock_service(repo)
        .create_note(dto("Shopping", "buy milk"))
        .await
        .expect("duplicate create is not an error");

    assert!(skipped.id.is_none());
}

#[tokio::test]
async fn delete_skips_removal_when_missing() {
    let mut repo = MockNoteRepository::new();
    repo.expect_exists_by_id().times(1).returning(|_| Ok(false));
    repo.expect_delete_by_id().times(0);

    let error = mock_service(repo)
        .delete_note(NoteId::new(5))
        .await
        .expect_err("missing note");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(NoteRepositoryError::connection("pool timed out"), ErrorCode::ServiceUnavailable)]
#[case(NoteRepositoryError::query("relation missing"), ErrorCode::InternalError)]
#[tokio::test]
async fn repository_failures_map_to_domain_codes(
    #[case] failure: NoteRepositoryError,
    #[case] code: ErrorCode,
) {
    let mut repo = MockNoteRepository::new();
    repo.expect_find_all()
        .times(1)
        .return_once(move || Err(failure));

    let error = mock_service(repo)
        .get_all_notes()
        .await
        .expect_err("repository failure");

    assert_eq!(error.code(), code);
}

#[tokio::test]
async fn save_constraint_failure_is_an_invalid_request() {
    let mut repo = MockNoteRepository::new();
    repo.expect_exists_by_title_ignore_case()
        .times(1)
        .returning(|_| Ok(false));
    repo.expect_save()
        .times(1)
        .returning(|_| {
            Err(NoteRepositoryError::constraint(
                "a note with this title already exists",
            ))
        });

    let error = mock_service(repo)
        .create_note(dto("Shopping", "buy milk"))
        .await
        .expect_err("constraint violation");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}
