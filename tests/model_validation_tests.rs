use property_portal::{
    forms::MultipartForm,
    models::{
        AddUserRequest, Blog, CATEGORY_AFFORDABLE, CATEGORY_LUXURY, CATEGORY_TRENDING,
        CategorisedProperties, Developer, Property, Testimonial,
    },
    storage::StoredFile,
};
use uuid::Uuid;

fn upload(field: &str) -> StoredFile {
    StoredFile {
        field: field.to_string(),
        path: format!("uploads/{}-1.png", field),
        url: format!("http://localhost:3000/uploads/{}-1.png", field),
        size: 4,
    }
}

// --- Property ---

#[test]
fn property_document_is_flat() {
    let form = MultipartForm::default()
        .with_text("name", "Skyline")
        .with_text("locationAbout", "Near the river")
        .with_file("locationImage", upload("locationImage"));
    let property = Property::from_form(&form, Uuid::new_v4());

    let json = serde_json::to_value(&property).unwrap();
    assert_eq!(json["name"], "Skyline");
    assert_eq!(json["location_about"], "Near the river");
    assert_eq!(
        json["location_image"],
        "http://localhost:3000/uploads/locationImage-1.png"
    );
    assert!(json.get("details").is_none());
    assert!(json.get("media").is_none());
}

#[test]
fn uploaded_icon_and_rera_override_text() {
    let form = MultipartForm::default()
        .with_text("icon", "fa-home")
        .with_text("rera", "P52100012345")
        .with_file("rera", upload("rera"));
    let property = Property::from_form(&form, Uuid::new_v4());

    assert_eq!(property.details.icon, "fa-home");
    assert_eq!(property.details.rera, "http://localhost:3000/uploads/rera-1.png");
}

#[test]
fn indexed_inputs_fill_their_slots() {
    let form = MultipartForm::default()
        .with_text("point3", "Gym")
        .with_text("logoText1", "Bank partner")
        .with_file("logo2", upload("logo2"))
        .with_file("virtualVid9", upload("virtualVid9"))
        .with_file("pdf1", upload("pdf1"));
    let property = Property::from_form(&form, Uuid::new_v4());

    assert_eq!(property.details.points.len(), 10);
    assert_eq!(property.details.points[2], "Gym");
    assert_eq!(property.details.logo_texts[0], "Bank partner");
    assert_eq!(property.media.logos[1], "http://localhost:3000/uploads/logo2-1.png");
    assert_eq!(property.media.virtual_videos.len(), 3);
    assert_eq!(
        property.media.virtual_videos[1],
        "http://localhost:3000/uploads/virtualVid9-1.png"
    );
    assert_eq!(property.media.pdfs.len(), 4);
}

#[test]
fn update_keeps_categories_unless_submitted() {
    let mut property = Property {
        categories: vec![CATEGORY_TRENDING.to_string()],
        ..Property::default()
    };

    property.apply_update(&MultipartForm::default().with_text("price", "80 L"));
    assert_eq!(property.categories, vec![CATEGORY_TRENDING]);
    assert_eq!(property.details.price, "80 L");

    property.apply_update(&MultipartForm::default().with_text("categories", CATEGORY_AFFORDABLE));
    assert_eq!(property.categories, vec![CATEGORY_AFFORDABLE]);
}

#[test]
fn categorised_listing_appears_in_each_bucket() {
    let property = Property {
        categories: vec![CATEGORY_TRENDING.to_string(), CATEGORY_LUXURY.to_string()],
        ..Property::default()
    };
    let buckets = CategorisedProperties::from_properties(&[property]);
    assert_eq!(buckets.trending.len(), 1);
    assert_eq!(buckets.luxury.len(), 1);
    assert!(buckets.ultra.is_empty());
    assert!(buckets.premium.is_empty());
    assert!(buckets.affordable.is_empty());
}

// --- Developer ---

#[test]
fn developer_logo_prefers_upload_then_text() {
    let mut developer = Developer {
        logo: "old.png".to_string(),
        ..Developer::default()
    };

    developer.apply_update(&MultipartForm::default());
    assert_eq!(developer.logo, "old.png");

    developer.apply_update(&MultipartForm::default().with_text("logo", "kept.png"));
    assert_eq!(developer.logo, "kept.png");

    developer.apply_update(
        &MultipartForm::default()
            .with_text("logo", "kept.png")
            .with_file("logo", upload("logo")),
    );
    assert_eq!(developer.logo, "http://localhost:3000/uploads/logo-1.png");
}

// --- Blog ---

#[test]
fn blog_dates_are_optional() {
    let form = MultipartForm::default()
        .with_text("heading", "H")
        .with_text("headingOne", "H1")
        .with_text("about", "A")
        .with_text("aboutOne", "A1")
        .with_text("location", "Pune")
        .with_file("image", upload("image"))
        .with_file("imgOne", upload("imgOne"));

    let blog = Blog::from_form(&form).unwrap();
    assert_eq!(blog.dates, "");
    assert_eq!(blog.img_one, "http://localhost:3000/uploads/imgOne-1.png");
}

#[test]
fn blog_missing_second_image_is_rejected() {
    let form = MultipartForm::default()
        .with_text("heading", "H")
        .with_file("image", upload("image"));
    let err = Blog::from_form(&form).unwrap_err();
    assert_eq!(err.to_string(), "imgOne is required");
}

// --- Testimonial ---

#[test]
fn testimonial_upload_beats_existing_logo() {
    let mut test = Testimonial::default();
    test.apply_update(
        &MultipartForm::default()
            .with_text("existingLogo", "kept.png")
            .with_file("logo", upload("logo")),
    );
    assert_eq!(test.logo, "http://localhost:3000/uploads/logo-1.png");
}

// --- Leads ---

#[test]
fn lead_needs_every_field() {
    let complete = AddUserRequest {
        name: Some("Asha".to_string()),
        email: Some("asha@example.com".to_string()),
        number: Some("9820000000".to_string()),
    };
    let user = complete.clone().into_user().unwrap();
    assert_eq!(user.name, "Asha");

    let blank_number = AddUserRequest {
        number: Some("  ".to_string()),
        ..complete.clone()
    };
    assert!(blank_number.into_user().is_none());

    let missing_email = AddUserRequest {
        email: None,
        ..complete
    };
    assert!(missing_email.into_user().is_none());
}
