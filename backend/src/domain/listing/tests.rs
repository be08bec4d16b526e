//! Tests for listing primitives and the item aggregate.

use super::*;
use crate::domain::check_ownership;
use rstest::{fixture, rstest};

#[fixture]
fn details() -> ItemDetails {
    ItemDetails {
        title: Title::new("Cordless drill").expect("title"),
        description: Description::new("18V with two batteries").expect("description"),
        price: Price::parse("15.00").expect("price"),
        location: Location::new("hyderabad").expect("location"),
        category: Category::Tools,
        image: ImageUrl::new("https://cdn.example.com/drill.jpg").expect("image"),
    }
}

#[rstest]
#[case("")]
#[case("   ")]
fn title_rejects_blank(#[case] raw: &str) {
    assert_eq!(
        Title::new(raw).expect_err("blank"),
        ListingValidationError::Blank { field: "title" }
    );
}

#[rstest]
fn location_rejects_overlong_text() {
    let err = Location::new("x".repeat(LOCATION_MAX + 1)).expect_err("too long");
    assert_eq!(err.field(), "location");
    assert_eq!(err.code(), "too_long");
}

#[rstest]
#[case("electronics", Category::Electronics)]
#[case(" Vehicles ", Category::Vehicles)]
#[case("SPORTS", Category::Sports)]
fn category_parses_case_insensitively(#[case] raw: &str, #[case] expected: Category) {
    assert_eq!(raw.parse::<Category>().expect("known"), expected);
}

#[rstest]
fn category_rejects_unknown_values() {
    let err = "boats".parse::<Category>().expect_err("unknown");
    assert_eq!(err.code(), "invalid_category");
}

#[rstest]
#[case("not a url")]
#[case("/relative/path.png")]
#[case("ftp://example.com/file.png")]
#[case("mailto:owner@example.com")]
fn image_url_rejects_non_http_urls(#[case] raw: &str) {
    assert_eq!(
        ImageUrl::new(raw).expect_err("invalid"),
        ListingValidationError::InvalidImageUrl
    );
}

#[rstest]
fn image_url_length_is_measured_after_encoding() {
    let raw = format!("https://img.example.com/{}", "é".repeat(1500));
    assert!(raw.chars().count() < IMAGE_URL_MAX);

    let err = ImageUrl::new(&raw).expect_err("encoded form too long");

    assert_eq!(err.field(), "imageUrl");
    assert_eq!(err.code(), "too_long");
}

#[rstest]
fn encoded_image_url_revalidates_unchanged() {
    let url = ImageUrl::new("https://img.example.com/perceuse à main.jpg").expect("valid");

    let reread = ImageUrl::new(url.as_str()).expect("stored form is valid");

    assert_eq!(reread, url);
}

#[rstest]
fn new_items_are_available(details: ItemDetails) {
    let owner = UserId::random();
    let item = Item::list(ItemId::random(), owner, details, Utc::now());
    assert_eq!(item.status(), ItemStatus::Available);
    assert!(check_ownership(&owner, &item));
    assert!(!check_ownership(&UserId::random(), &item));
}

#[rstest]
fn patch_replaces_only_supplied_fields(details: ItemDetails) {
    let owner = UserId::random();
    let item = Item::list(ItemId::random(), owner, details.clone(), Utc::now());
    let patch = ItemPatch {
        price: Some(Price::parse("20").expect("price")),
        category: Some(Category::Other),
        ..ItemPatch::default()
    };

    let updated = item.patched(&patch);

    assert_eq!(updated.details().price, Price::parse("20").expect("price"));
    assert_eq!(updated.details().category, Category::Other);
    assert_eq!(updated.details().title, details.title);
    assert_eq!(updated.owner(), &owner);
    assert_eq!(updated.id(), item.id());
    assert_eq!(updated.created_at(), item.created_at());
}

#[rstest]
fn empty_patch_is_detected() {
    assert!(ItemPatch::default().is_empty());
    let patch = ItemPatch {
        title: Some(Title::new("Drill").expect("title")),
        ..ItemPatch::default()
    };
    assert!(!patch.is_empty());
}

#[rstest]
fn price_errors_map_to_price_field() {
    let error: Error = ListingValidationError::from(PriceValidationError::NotPositive).into();
    assert_eq!(
        error.details(),
        Some(&json!({"field": "price", "code": "invalid_price"}))
    );
}
