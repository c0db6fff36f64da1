use chrono::{TimeZone, Utc};
use tessera_core::RecordContext;
use tessera_error::{TemplateErrorKind, TesseraErrorKind};
use tessera_template::{TemplateContext, UrlTemplate};

fn ctx(primary_key: Option<&str>, filename: &str) -> TemplateContext {
    let record = RecordContext::new("ProductImage", primary_key.map(str::to_string), "File");
    TemplateContext::new(record, filename)
        .with_now(Utc.with_ymd_and_hms(2024, 3, 9, 8, 7, 6).unwrap())
}

fn template_error(err: &tessera_error::TesseraError) -> &TemplateErrorKind {
    match err.kind() {
        TesseraErrorKind::Template(e) => &e.kind,
        other => panic!("expected template error, got {other}"),
    }
}

#[test]
fn default_template_renders_record_identity() {
    let url = UrlTemplate::default()
        .render(&ctx(Some("1234567890"), "Summer Holiday.jpg"))
        .unwrap();
    assert_eq!(url, "/system/product_images/MT/IzN/DU2N/zg5MA/file/summer-holiday.jpg");
}

#[test]
fn primary_key_is_required_only_when_used() {
    let with_key = UrlTemplate::default();
    assert!(with_key.needs_primary_key());
    let err = with_key.render(&ctx(None, "a.png")).unwrap_err();
    assert!(matches!(
        template_error(&err),
        TemplateErrorKind::MissingContext { .. }
    ));

    let without_key = UrlTemplate::parse("/uploads/{class}/{filename}").unwrap();
    assert!(!without_key.needs_primary_key());
    assert_eq!(
        without_key.render(&ctx(None, "a.png")).unwrap(),
        "/uploads/product_images/a.png"
    );
}

#[test]
fn hash_tokens_use_the_pinned_time() {
    let template = UrlTemplate::parse("/{hash}/{filename_with_hash}").unwrap();
    let url = template.render(&ctx(Some("1"), "My+File.png")).unwrap();
    assert_eq!(
        url,
        "/20240309080706000000000/my-file.20240309080706000000000.png"
    );
}

#[test]
fn filename_parts() {
    let template =
        UrlTemplate::parse("{primary_key}/{basename}|{extension}|{filename}").unwrap();
    let url = template.render(&ctx(Some("7"), "notes v2.tar.gz")).unwrap();
    assert_eq!(url, "7/notes v2.tar|gz|notes v2.tar.gz");
}

#[test]
fn empty_render_is_an_error() {
    let template = UrlTemplate::parse("{extension}").unwrap();
    let err = template.render(&ctx(Some("1"), "README")).unwrap_err();
    assert_eq!(template_error(&err), &TemplateErrorKind::Empty);
}

#[test]
fn malformed_templates() {
    let err = UrlTemplate::parse("/a/{size}").unwrap_err();
    assert_eq!(err.kind, TemplateErrorKind::UnknownPlaceholder("size".to_string()));

    let err = UrlTemplate::parse("/a/column}").unwrap_err();
    assert!(matches!(err.kind, TemplateErrorKind::Parse { .. }));
}

#[test]
fn class_is_snake_cased_and_pluralised() {
    let template = UrlTemplate::parse("/{class}/{filename_slug}").unwrap();
    let render = |class: &str| {
        let record = RecordContext::new(class, None, "File");
        template
            .render(&TemplateContext::new(record, "Team Photo.jpg"))
            .unwrap()
    };

    assert_eq!(render("Person"), "/people/team-photo.jpg");
    assert_eq!(render("MediaLibrary"), "/media_libraries/team-photo.jpg");
    assert_eq!(render("SalesPerson"), "/sales_people/team-photo.jpg");
    assert_eq!(render("Box"), "/boxes/team-photo.jpg");
}
