mod common;

use common::{course, FakeApi};
use student_records_admin::models::{CourseUpdate, NewCourse};
use student_records_admin::pages::CourseCatalog;

async fn loaded(api: &FakeApi) -> CourseCatalog {
    let mut page = CourseCatalog::new();
    page.refresh(api).await.unwrap();
    page
}

#[tokio::test]
async fn create_then_refetch() {
    let api = FakeApi::new().with_courses(vec![course("IF101", "Algoritma", 3)]);
    let mut page = loaded(&api).await;

    let new_course = NewCourse {
        code: "IF303".to_string(),
        name: "Jaringan Komputer".to_string(),
        credits: 3,
    };
    page.create(&api, new_course).await.unwrap();

    assert_eq!(api.count("list_courses"), 2);
    assert_eq!(page.find("IF303").unwrap().name, "Jaringan Komputer");
    assert_eq!(page.courses().len(), 2);
}

#[tokio::test]
async fn failed_create_uses_fallback_message() {
    let api = FakeApi::new().with_courses(vec![course("IF101", "Algoritma", 3)]);
    let mut page = loaded(&api).await;
    api.fail("add_course", None);

    let new_course = NewCourse {
        code: "IF101".to_string(),
        name: "Algoritma".to_string(),
        credits: 3,
    };
    let err = page.create(&api, new_course).await.unwrap_err();

    assert_eq!(err.to_string(), "Failed to add matkul");
    assert_eq!(page.error(), Some("Failed to add matkul"));
    assert_eq!(page.courses().len(), 1);
}

#[tokio::test]
async fn update_keeps_the_code_from_edit_mode() {
    let api = FakeApi::new().with_courses(vec![
        course("IF101", "Algoritma", 3),
        course("IF202", "Basis Data", 4),
    ]);
    let mut page = loaded(&api).await;

    page.begin_edit("IF202").unwrap();
    let update = CourseUpdate {
        name: "Basis Data Lanjut".to_string(),
        credits: 2,
    };
    page.update(&api, update).await.unwrap();

    assert_eq!(api.calls().last().map(String::as_str), Some("list_courses"));
    assert!(api.calls().contains(&"update_course IF202".to_string()));
    assert_eq!(page.editing(), None);
    let updated = page.find("IF202").unwrap();
    assert_eq!(updated.name, "Basis Data Lanjut");
    assert_eq!(updated.credits, 2);
}

#[tokio::test]
async fn delete_needs_confirmation() {
    let api = FakeApi::new().with_courses(vec![course("IF101", "Algoritma", 3)]);
    let mut page = loaded(&api).await;

    page.request_delete("IF101");
    page.cancel_delete();
    assert!(!page.confirm_delete(&api).await.unwrap());
    assert_eq!(api.count("delete_course"), 0);

    page.request_delete("IF101");
    assert!(page.confirm_delete(&api).await.unwrap());
    assert_eq!(api.count("delete_course"), 1);
    assert!(page.courses().is_empty());
}

#[tokio::test]
async fn failed_delete_reports_backend_message_and_keeps_rows() {
    let api = FakeApi::new().with_courses(vec![course("IF101", "Algoritma", 3)]);
    let mut page = loaded(&api).await;
    api.fail("delete_course", Some("Matkul masih dipakai enrollment"));

    page.request_delete("IF101");
    let err = page.confirm_delete(&api).await.unwrap_err();

    assert_eq!(err.to_string(), "Matkul masih dipakai enrollment");
    assert_eq!(page.courses().len(), 1);
    assert_eq!(page.pending_delete(), None);
}
