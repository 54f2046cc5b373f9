mod common;

use common::{campus, enrollment, FakeApi};
use student_records_admin::models::{Grade, NewEnrollment};
use student_records_admin::pages::{EnrollmentManager, EnrollmentView};

async fn loaded(api: &FakeApi) -> EnrollmentManager {
    let mut page = EnrollmentManager::new();
    page.load_all(api).await.unwrap();
    page
}

#[tokio::test]
async fn joint_load_resolves_names_from_the_lists() {
    let api = campus();
    let page = loaded(&api).await;

    assert_eq!(api.count("list_enrollments"), 1);
    assert_eq!(api.count("list_students"), 1);
    assert_eq!(api.count("list_courses"), 1);
    assert_eq!(page.view(), &EnrollmentView::All);

    let rows = page.rows();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].student_name, Some("Ayu Lestari"));
    assert_eq!(rows[0].course_name, Some("Algoritma"));
    assert_eq!(rows[1].credits, Some(4));
    assert_eq!(rows[1].grade, None);
}

#[tokio::test]
async fn joint_load_failure_applies_nothing() {
    let api = campus();
    let mut page = loaded(&api).await;
    api.push_enrollment(enrollment("e4", "2102", "IF202", None));
    api.fail("list_courses", None);

    let err = page.load_all(&api).await.unwrap_err();

    assert_eq!(err.to_string(), "Failed to fetch data");
    assert_eq!(page.error(), Some("Failed to fetch data"));
    assert_eq!(page.enrollments().len(), 3);
    assert_eq!(page.courses().len(), 2);
}

#[tokio::test]
async fn selecting_a_student_fetches_only_their_enrollments() {
    let api = campus();
    let mut page = loaded(&api).await;
    let before = api.calls().len();

    page.select_student(&api, "2101").await.unwrap();

    let calls = api.calls();
    assert_eq!(&calls[before..], ["enrollments_for_student 2101".to_string()]);
    assert_eq!(page.view(), &EnrollmentView::Student("2101".to_string()));
    assert_eq!(page.selected_student().unwrap().name, "Ayu Lestari");
    assert_eq!(page.enrollments().len(), 2);
    assert!(page.enrollments().iter().all(|e| e.student_npm() == "2101"));
}

#[tokio::test]
async fn student_without_enrollments_shows_an_empty_list() {
    let api = campus().with_students(vec![
        common::student("2101", "Ayu Lestari", 3.0),
        common::student("2199", "Dewi Anggraini", 3.6),
    ]);
    let mut page = loaded(&api).await;

    page.select_student(&api, "2199").await.unwrap();

    assert!(page.enrollments().is_empty());
    assert_eq!(page.error(), None);
}

#[tokio::test]
async fn unknown_student_is_rejected_without_a_request() {
    let api = campus();
    let mut page = loaded(&api).await;

    assert!(page.select_student(&api, "9999").await.is_err());
    assert_eq!(api.count("enrollments_for_student"), 0);
    assert_eq!(page.view(), &EnrollmentView::All);
}

#[tokio::test]
async fn show_all_clears_the_selection_and_refetches_everything() {
    let api = campus();
    let mut page = loaded(&api).await;
    page.select_student(&api, "2102").await.unwrap();
    assert_eq!(page.enrollments().len(), 1);

    page.show_all(&api).await.unwrap();

    assert_eq!(page.view(), &EnrollmentView::All);
    assert!(page.selected_student().is_none());
    assert_eq!(api.count("list_enrollments"), 2);
    assert_eq!(api.count("list_students"), 2);
    assert_eq!(api.count("list_courses"), 2);
    assert_eq!(page.enrollments().len(), 3);
}

#[tokio::test]
async fn regrade_sends_back_student_and_course_unchanged() {
    let api = campus();
    let mut page = loaded(&api).await;

    page.begin_edit("e2").unwrap();
    page.update_grade(&api, Some(Grade::B)).await.unwrap();

    let updates = api.enrollment_updates();
    assert_eq!(updates.len(), 1);
    let (id, update) = &updates[0];
    assert_eq!(id, "e2");
    assert_eq!(update.npm, "2101");
    assert_eq!(update.kode_matkul, "IF202");
    assert_eq!(update.grade, Some(Grade::B));
    assert_eq!(page.editing(), None);
    assert_eq!(page.find("e2").unwrap().grade, Some(Grade::B));
}

#[tokio::test]
async fn create_requires_known_student_and_course() {
    let api = campus();
    let mut page = loaded(&api).await;

    let unknown = NewEnrollment {
        npm: "9999".to_string(),
        kode_matkul: "IF101".to_string(),
        grade: None,
    };
    assert!(page.create(&api, unknown).await.is_err());
    assert_eq!(api.count("add_enrollment"), 0);

    let valid = NewEnrollment {
        npm: "2102".to_string(),
        kode_matkul: "IF202".to_string(),
        grade: Some(Grade::A),
    };
    page.create(&api, valid).await.unwrap();
    assert_eq!(api.count("add_enrollment"), 1);
    assert_eq!(page.enrollments().len(), 4);
    assert_eq!(page.error(), None);
}

#[tokio::test]
async fn delete_in_student_view_refetches_only_that_student() {
    let api = campus();
    let mut page = loaded(&api).await;
    page.select_student(&api, "2101").await.unwrap();

    page.request_delete("e1");
    assert!(page.confirm_delete(&api).await.unwrap());

    assert_eq!(api.count("delete_enrollment"), 1);
    assert_eq!(api.count("list_enrollments"), 1);
    assert_eq!(api.count("enrollments_for_student"), 2);
    assert_eq!(page.enrollments().len(), 1);
    assert_eq!(page.enrollments()[0].id, "e2");
    assert_eq!(api.stored_enrollments().len(), 2);
}

#[tokio::test]
async fn cancelled_delete_sends_nothing() {
    let api = campus();
    let mut page = loaded(&api).await;

    page.request_delete("e3");
    page.cancel_delete();

    assert!(!page.confirm_delete(&api).await.unwrap());
    assert_eq!(api.count("delete_enrollment"), 0);
    assert_eq!(page.enrollments().len(), 3);
}

#[tokio::test]
async fn failed_student_lookup_keeps_the_all_enrollments_view() {
    let api = campus();
    let mut page = loaded(&api).await;
    api.fail("enrollments_for_student", Some("database offline"));

    let err = page.select_student(&api, "2102").await.unwrap_err();

    assert_eq!(err.to_string(), "database offline");
    assert_eq!(page.error(), Some("database offline"));
    assert_eq!(page.view(), &EnrollmentView::All);
    assert!(page.selected_student().is_none());
    assert_eq!(page.enrollments().len(), 3);
}

#[tokio::test]
async fn failed_switch_between_students_stays_on_the_previous_student() {
    let api = campus();
    let mut page = loaded(&api).await;
    page.select_student(&api, "2101").await.unwrap();
    api.fail("enrollments_for_student", None);

    assert!(page.select_student(&api, "2102").await.is_err());

    assert_eq!(page.view(), &EnrollmentView::Student("2101".to_string()));
    assert!(page.enrollments().iter().all(|e| e.student_npm() == "2101"));
}

#[tokio::test]
async fn regrade_in_student_view_refetches_only_that_student() {
    let api = campus();
    let mut page = loaded(&api).await;
    page.select_student(&api, "2101").await.unwrap();
    let before = api.calls().len();

    page.begin_edit("e2").unwrap();
    page.update_grade(&api, Some(Grade::C)).await.unwrap();

    let calls = api.calls();
    assert_eq!(
        &calls[before..],
        [
            "update_enrollment e2".to_string(),
            "enrollments_for_student 2101".to_string(),
        ]
    );
    assert_eq!(api.count("list_enrollments"), 1);
    assert_eq!(page.view(), &EnrollmentView::Student("2101".to_string()));
    assert_eq!(page.find("e2").unwrap().grade, Some(Grade::C));
}

#[tokio::test]
async fn create_in_student_view_refetches_only_that_student() {
    let api = campus();
    let mut page = loaded(&api).await;
    page.select_student(&api, "2102").await.unwrap();
    let before = api.calls().len();

    let new_enrollment = NewEnrollment {
        npm: "2102".to_string(),
        kode_matkul: "IF202".to_string(),
        grade: None,
    };
    page.create(&api, new_enrollment).await.unwrap();

    let calls = api.calls();
    assert_eq!(
        &calls[before..],
        [
            "add_enrollment 2102".to_string(),
            "enrollments_for_student 2102".to_string(),
        ]
    );
    assert_eq!(api.count("list_enrollments"), 1);
    assert_eq!(page.enrollments().len(), 2);
    assert!(page.enrollments().iter().all(|e| e.student_npm() == "2102"));
}
