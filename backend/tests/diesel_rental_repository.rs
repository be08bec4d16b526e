//! `DieselRentalRepository` against embedded PostgreSQL.

use chrono::TimeDelta;
use rentease::domain::ports::{RentalRepository, RentalRepositoryError};
use rentease::domain::{
    CatalogueItemRef, Price, Rental, RentalId, RentalSnapshot, RentalStatus, SnapshotText, UserId,
};
use rentease::outbound::persistence::DieselRentalRepository;
use rstest::{fixture, rstest};

mod support;

use support::{PgFixture, fixture_timestamp, handle_cluster_setup_failure, provision_pg_fixture};

#[fixture]
fn pg() -> Option<PgFixture> {
    match provision_pg_fixture() {
        Ok(fixture) => Some(fixture),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn snapshot(description: Option<&str>) -> RentalSnapshot {
    RentalSnapshot {
        title: SnapshotText::new("Sony A7 III", "title").expect("title"),
        price: Price::parse("900.50").expect("price"),
        image: SnapshotText::new("a7.png", "image").expect("image"),
        location: SnapshotText::new("delhi", "location").expect("location"),
        description: description.map(|text| SnapshotText::new(text, "description").expect("text")),
    }
}

fn requested(requester: UserId, item_ref: i64, minutes_after: i64) -> Rental {
    Rental::request(
        RentalId::random(),
        requester,
        CatalogueItemRef::new(item_ref).expect("item ref"),
        snapshot(Some("Weekend shoot")),
        fixture_timestamp() + TimeDelta::minutes(minutes_after),
    )
}

#[rstest]
fn ledger_is_requester_scoped_and_newest_first(pg: Option<PgFixture>) {
    let Some(pg) = pg else {
        eprintln!("SKIP-TEST-CLUSTER: ledger_is_requester_scoped_and_newest_first skipped");
        return;
    };
    let repo = DieselRentalRepository::new(pg.pool());
    let renter = *pg.seed_user("renter").id();
    let other = *pg.seed_user("other").id();
    let first = requested(renter, 3, 0);
    let second = requested(renter, 7, 30);
    let theirs = requested(other, 3, 60);
    for rental in [&first, &second, &theirs] {
        pg.block_on(repo.insert(rental)).expect("insert");
    }

    let mine = pg.block_on(repo.list_by_requester(&renter)).expect("list");

    assert_eq!(mine, vec![second, first]);
}

#[rstest]
#[case::with_description(Some("Weekend shoot"))]
#[case::without_description(None)]
fn snapshot_and_status_survive_storage(pg: Option<PgFixture>, #[case] description: Option<&str>) {
    let Some(pg) = pg else {
        eprintln!("SKIP-TEST-CLUSTER: snapshot_and_status_survive_storage skipped");
        return;
    };
    let repo = DieselRentalRepository::new(pg.pool());
    let renter = *pg.seed_user("snapper").id();
    // No catalogue row backs the reference; it is stored as given.
    let rental = Rental::request(
        RentalId::random(),
        renter,
        CatalogueItemRef::new(9_000_000_001).expect("item ref"),
        snapshot(description),
        fixture_timestamp(),
    );
    pg.block_on(repo.insert(&rental)).expect("insert");

    let listed = pg.block_on(repo.list_by_requester(&renter)).expect("list");

    assert_eq!(listed, vec![rental]);
    assert_eq!(listed[0].status(), RentalStatus::Pending);
}

#[rstest]
fn only_the_requester_can_cancel(pg: Option<PgFixture>) {
    let Some(pg) = pg else {
        eprintln!("SKIP-TEST-CLUSTER: only_the_requester_can_cancel skipped");
        return;
    };
    let repo = DieselRentalRepository::new(pg.pool());
    let renter = *pg.seed_user("booker").id();
    let stranger = *pg.seed_user("passerby").id();
    let rental = requested(renter, 3, 0);
    pg.block_on(repo.insert(&rental)).expect("insert");

    let by_stranger = pg
        .block_on(repo.delete_owned(rental.id(), &stranger))
        .expect("stranger cancel");
    let by_renter = pg
        .block_on(repo.delete_owned(rental.id(), &renter))
        .expect("renter cancel");
    let again = pg
        .block_on(repo.delete_owned(rental.id(), &renter))
        .expect("repeat cancel");

    assert!(!by_stranger);
    assert!(by_renter);
    assert!(!again);
    assert!(
        pg.block_on(repo.list_by_requester(&renter))
            .expect("list")
            .is_empty()
    );
}

#[rstest]
fn lost_schema_is_a_query_error(pg: Option<PgFixture>) {
    let Some(pg) = pg else {
        eprintln!("SKIP-TEST-CLUSTER: lost_schema_is_a_query_error skipped");
        return;
    };
    let repo = DieselRentalRepository::new(pg.pool());
    let renter = *pg.seed_user("stranded").id();
    pg.drop_table("rentals");

    let error = pg
        .block_on(repo.insert(&requested(renter, 3, 0)))
        .expect_err("insert without a table");

    assert!(
        matches!(error, RentalRepositoryError::Query { .. }),
        "expected a query error, got {error:?}"
    );
}
