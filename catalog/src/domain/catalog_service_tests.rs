//! Tests for the catalog store service.

use std::sync::Arc;

use chrono::{Duration, Local, TimeZone};
use mockable::Clock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    FixtureSession, FixtureShopRepository, MockShopRepository, RecordingNotifier,
};
use crate::domain::{
    CatalogFilter, Coordinates, DateWindow, ErrorCode, Rating, SortKey, UserId,
};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

fn now_millis() -> u64 {
    u64::try_from(now().timestamp_millis()).expect("positive timestamp")
}

fn coords(longitude: f64, latitude: f64) -> Coordinates {
    Coordinates::new(longitude, latitude).expect("valid coordinates")
}

fn stored(id: u64, name: &str, date_added: DateTime<Utc>) -> CoffeeShopRecord {
    CoffeeShopRecord {
        id: ShopId::new(id),
        name: name.to_owned(),
        location: "Seattle, WA".to_owned(),
        rating: Rating::try_from(4).expect("rating"),
        review: "Solid espresso.".to_owned(),
        image: None,
        date_added,
        coordinates: Some(coords(-122.33, 47.61)),
        is_user_added: true,
    }
}

#[fixture]
fn draft() -> ShopDraft {
    ShopDraft {
        name: "Merit Coffee".to_owned(),
        location: "San Antonio, TX".to_owned(),
        rating: 5,
        review: "Bright, clean pour-overs.".to_owned(),
        image: Some("https://example.com/merit.jpg".to_owned()),
        coordinates: Some(coords(-98.49, 29.42)),
    }
}

#[fixture]
fn notifier() -> Arc<RecordingNotifier> {
    Arc::new(RecordingNotifier::default())
}

fn signed_in() -> FixtureSession {
    FixtureSession::signed_in(UserId::for_email("ada@example.com"))
}

fn repo_with(shops: Vec<CoffeeShopRecord>) -> MockShopRepository {
    let mut repo = MockShopRepository::new();
    repo.expect_load().times(1).return_once(move || shops);
    repo
}

fn make_service(
    repo: MockShopRepository,
    session: FixtureSession,
    notifier: &Arc<RecordingNotifier>,
) -> CatalogService<MockShopRepository> {
    CatalogService::new(
        Arc::new(repo),
        Arc::new(session),
        Arc::clone(notifier) as Arc<dyn Notifier>,
        Arc::new(FixtureClock { utc_now: now() }),
    )
}

#[rstest]
fn empty_store_shows_only_presets(notifier: Arc<RecordingNotifier>) {
    let service = CatalogService::new(
        Arc::new(FixtureShopRepository),
        Arc::new(FixtureSession::signed_out()),
        Arc::clone(&notifier) as Arc<dyn Notifier>,
        Arc::new(FixtureClock { utc_now: now() }),
    );

    assert!(service.user_shops().is_empty());
    assert_eq!(
        service.query("", FilterSortState::default()).summary(),
        "Showing 5 of 5 coffee shops"
    );
    assert!(notifier.take().is_empty());
}

#[rstest]
fn add_requires_a_session(draft: ShopDraft, notifier: Arc<RecordingNotifier>) {
    let mut repo = repo_with(Vec::new());
    repo.expect_save().times(0);
    let mut service = make_service(repo, FixtureSession::signed_out(), &notifier);

    let err = service.add(&draft).expect_err("add without session");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(service.len(), 5);
    assert_eq!(
        notifier.take(),
        vec![(NoticeLevel::Error, "Please log in to add coffee shops".to_owned())]
    );
}

#[rstest]
fn add_reports_field_errors_without_mutating(
    mut draft: ShopDraft,
    notifier: Arc<RecordingNotifier>,
) {
    draft.coordinates = None;
    draft.review = "  ".to_owned();
    let mut repo = repo_with(Vec::new());
    repo.expect_save().times(0);
    let mut service = make_service(repo, signed_in(), &notifier);

    let err = service.add(&draft).expect_err("invalid draft");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    let details = err.details().expect("field details");
    assert_eq!(
        details["fields"]["location"],
        "Please select a location from the suggestions"
    );
    assert_eq!(details["fields"]["review"], "Review is required");
    assert!(service.user_shops().is_empty());
}

#[rstest]
fn add_prepends_and_persists(draft: ShopDraft, notifier: Arc<RecordingNotifier>) {
    let mut repo = repo_with(Vec::new());
    repo.expect_save()
        .times(1)
        .withf(|shops| shops.len() == 1 && shops.iter().all(|shop| shop.is_user_added))
        .returning(|_| Ok(()));
    let mut service = make_service(repo, signed_in(), &notifier);

    let record = service.add(&draft).expect("add succeeds");

    assert_eq!(record.id, ShopId::new(now_millis()));
    assert_eq!(record.date_added, now());
    assert_eq!(record.image.as_deref(), Some("https://example.com/merit.jpg"));
    assert_eq!(service.shops().next().map(|shop| shop.id), Some(record.id));
    assert_eq!(service.len(), 6);
    assert_eq!(
        notifier.take(),
        vec![(NoticeLevel::Success, "Merit Coffee added successfully!".to_owned())]
    );
}

#[rstest]
fn add_keeps_ids_unique_and_dates_monotonic(draft: ShopDraft, notifier: Arc<RecordingNotifier>) {
    let future = now() + Duration::hours(1);
    let mut repo = repo_with(vec![stored(now_millis() + 10, "Future Roast", future)]);
    repo.expect_save().times(1).returning(|_| Ok(()));
    let mut service = make_service(repo, signed_in(), &notifier);

    let record = service.add(&draft).expect("add succeeds");

    assert_eq!(record.id, ShopId::new(now_millis() + 11));
    assert_eq!(record.date_added, future);
}

#[rstest]
fn add_leaves_state_untouched_when_save_fails(
    draft: ShopDraft,
    notifier: Arc<RecordingNotifier>,
) {
    let mut repo = repo_with(Vec::new());
    repo.expect_save()
        .times(1)
        .returning(|_| Err(PersistenceError::write("brewsky_cards", "disk full")));
    let mut service = make_service(repo, signed_in(), &notifier);

    let err = service.add(&draft).expect_err("save fails");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    assert!(service.user_shops().is_empty());
    assert_eq!(
        notifier.take(),
        vec![(
            NoticeLevel::Error,
            "Failed to add coffee shop. Please try again.".to_owned()
        )]
    );
}

#[rstest]
fn add_rejects_beyond_capacity(draft: ShopDraft, notifier: Arc<RecordingNotifier>) {
    let mut repo = repo_with(vec![stored(100, "Only Slot", now())]);
    repo.expect_save().times(0);
    let mut service = make_service(repo, signed_in(), &notifier).with_max_user_shops(1);

    let err = service.add(&draft).expect_err("catalog full");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.details().map(|details| details["limit"].clone()), Some(1.into()));
    assert_eq!(service.user_shops().len(), 1);
}

#[rstest]
fn load_drops_colliding_ids(notifier: Arc<RecordingNotifier>) {
    let repo = repo_with(vec![
        stored(3, "Shadows a preset", now()),
        stored(100, "First", now()),
        stored(100, "Duplicate", now()),
    ]);
    let service = make_service(repo, signed_in(), &notifier);

    let names: Vec<&str> = service.user_shops().iter().map(|shop| shop.name.as_str()).collect();
    assert_eq!(names, vec!["First"]);
    assert_eq!(
        service.get(ShopId::new(3)).map(|shop| shop.name.as_str()),
        Some("Bluestar Coffee Roasters")
    );
}

#[rstest]
fn remove_refuses_presets(notifier: Arc<RecordingNotifier>) {
    let mut repo = repo_with(Vec::new());
    repo.expect_save().times(0);
    let mut service = make_service(repo, signed_in(), &notifier);

    assert!(!service.remove(ShopId::new(1)).expect("remove preset"));
    assert_eq!(service.len(), 5);
    assert_eq!(
        notifier.take(),
        vec![(
            NoticeLevel::Warning,
            "Preset coffee shops cannot be deleted".to_owned()
        )]
    );
}

#[rstest]
fn remove_of_unknown_id_is_a_no_op(notifier: Arc<RecordingNotifier>) {
    let mut repo = repo_with(Vec::new());
    repo.expect_save().times(0);
    let mut service = make_service(repo, signed_in(), &notifier);

    assert!(!service.remove(ShopId::new(42)).expect("remove unknown"));
    assert!(notifier.take().is_empty());
}

#[rstest]
fn remove_requires_a_session(notifier: Arc<RecordingNotifier>) {
    let mut repo = repo_with(vec![stored(100, "Keep Me", now())]);
    repo.expect_save().times(0);
    let mut service = make_service(repo, FixtureSession::signed_out(), &notifier);

    let err = service.remove(ShopId::new(100)).expect_err("no session");
    assert!(err.requires_authentication());
    assert_eq!(service.user_shops().len(), 1);
}

#[rstest]
fn remove_persists_remaining_shops(notifier: Arc<RecordingNotifier>) {
    let mut repo = repo_with(vec![stored(101, "Newer", now()), stored(100, "Older", now())]);
    repo.expect_save()
        .times(1)
        .withf(|shops| shops.len() == 1 && shops.iter().all(|shop| shop.id == ShopId::new(100)))
        .returning(|_| Ok(()));
    let mut service = make_service(repo, signed_in(), &notifier);

    assert!(service.remove(ShopId::new(101)).expect("remove succeeds"));
    assert!(service.get(ShopId::new(101)).is_none());
}

#[rstest]
fn update_keeps_identity_date_and_coordinates(notifier: Arc<RecordingNotifier>) {
    let original = stored(100, "Old Name", now() - Duration::days(3));
    let mut repo = repo_with(vec![original.clone()]);
    repo.expect_save().times(1).returning(|_| Ok(()));
    let mut service = make_service(repo, signed_in(), &notifier);

    let changes = ShopChanges {
        name: Some("New Name".to_owned()),
        rating: Some(2),
        ..ShopChanges::default()
    };
    let updated = service.update(ShopId::new(100), &changes).expect("update succeeds");

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.date_added, original.date_added);
    assert_eq!(updated.coordinates, original.coordinates);
    assert_eq!(updated.rating.get(), 2);
    assert_eq!(
        service.get(ShopId::new(100)).map(|shop| shop.name.as_str()),
        Some("New Name")
    );
}

#[rstest]
#[case::preset(2, ErrorCode::InvalidRequest)]
#[case::unknown(999, ErrorCode::NotFound)]
fn update_only_touches_user_shops(
    notifier: Arc<RecordingNotifier>,
    #[case] id: u64,
    #[case] expected: ErrorCode,
) {
    let mut repo = repo_with(Vec::new());
    repo.expect_save().times(0);
    let mut service = make_service(repo, signed_in(), &notifier);

    let changes = ShopChanges {
        rating: Some(1),
        ..ShopChanges::default()
    };
    let err = service
        .update(ShopId::new(id), &changes)
        .expect_err("update refused");
    assert_eq!(err.code(), expected);
}

#[rstest]
fn markers_list_only_placed_user_shops(notifier: Arc<RecordingNotifier>) {
    let mut unplaced = stored(101, "Unplaced", now());
    unplaced.coordinates = None;
    let repo = repo_with(vec![unplaced, stored(100, "Placed", now())]);
    let service = make_service(repo, signed_in(), &notifier);

    let markers: Vec<u64> = service.markers().map(|shop| shop.id.get()).collect();
    assert_eq!(markers, vec![100]);
}

#[rstest]
fn query_uses_the_injected_clock(notifier: Arc<RecordingNotifier>) {
    let repo = repo_with(vec![stored(100, "Fresh", now() - Duration::days(1))]);
    let service = make_service(repo, signed_in(), &notifier);

    let state = FilterSortState::sorted_by(SortKey::Date)
        .with_filter(CatalogFilter::DateRange(DateWindow::Week));
    let result = service.query("", state);

    let ids: Vec<u64> = result.shops.iter().map(|shop| shop.id.get()).collect();
    assert_eq!(ids, vec![100, 5, 4, 3]);
    assert_eq!(result.total, 6);
}
