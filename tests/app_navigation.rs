mod common;

use common::campus;
use crossterm::event::KeyCode;
use student_records_admin::pages::EnrollmentView;
use student_records_admin::ui::{App, Screen};

fn press<A: student_records_admin::RecordsApi>(app: &mut App<A>, keys: &[KeyCode]) -> bool {
    let mut exit = false;
    for key in keys {
        exit = app.handle_key(*key).unwrap();
    }
    exit
}

fn type_text<A: student_records_admin::RecordsApi>(app: &mut App<A>, text: &str) {
    for ch in text.chars() {
        app.handle_key(KeyCode::Char(ch)).unwrap();
    }
}

#[test]
fn every_screen_switch_refetches() {
    let api = campus();
    let mut app = App::new(api.clone()).unwrap();
    app.start();
    assert_eq!(app.screen(), Screen::Dashboard);
    assert_eq!(app.dashboard().stats().student_count, 2);
    assert_eq!(api.count("list_students"), 1);

    press(&mut app, &[KeyCode::Char('2')]);
    assert_eq!(app.screen(), Screen::Students);
    assert_eq!(api.count("list_students"), 2);

    press(&mut app, &[KeyCode::Char('3'), KeyCode::Char('2')]);
    assert_eq!(api.count("list_courses"), 2);
    assert_eq!(api.count("list_students"), 3);
    assert_eq!(app.students().students().len(), 2);
}

#[test]
fn delete_key_asks_before_sending() {
    let api = campus();
    let mut app = App::new(api.clone()).unwrap();
    press(&mut app, &[KeyCode::Char('2')]);

    press(&mut app, &[KeyCode::Char('-'), KeyCode::Char('n')]);
    assert_eq!(api.count("delete_student"), 0);
    assert_eq!(app.status(), Some("Deletion cancelled."));

    press(&mut app, &[KeyCode::Char('-'), KeyCode::Esc]);
    assert_eq!(api.count("delete_student"), 0);

    press(&mut app, &[KeyCode::Char('-'), KeyCode::Char('y')]);
    assert_eq!(api.calls().iter().filter(|c| *c == "delete_student 2101").count(), 1);
    assert_eq!(app.students().students().len(), 1);
}

#[test]
fn student_form_submits_typed_values() {
    let api = campus();
    let mut app = App::new(api.clone()).unwrap();
    press(&mut app, &[KeyCode::Char('2'), KeyCode::Char('+')]);

    type_text(&mut app, "2103");
    press(&mut app, &[KeyCode::Tab]);
    type_text(&mut app, "Citra Dewi");
    press(&mut app, &[KeyCode::Tab]);
    type_text(&mut app, "Informatika");
    press(&mut app, &[KeyCode::Tab]);
    type_text(&mut app, "3,75");
    press(&mut app, &[KeyCode::Tab]);
    type_text(&mut app, "1");
    press(&mut app, &[KeyCode::Enter]);

    assert_eq!(api.count("add_student"), 1);
    let added = app.students().find("2103").unwrap();
    assert_eq!(added.name, "Citra Dewi");
    assert_eq!(added.gpa, 3.75);
    assert_eq!(app.status(), Some("Added mahasiswa 2103."));
}

#[test]
fn invalid_form_input_sends_nothing() {
    let api = campus();
    let mut app = App::new(api.clone()).unwrap();
    press(&mut app, &[KeyCode::Char('3'), KeyCode::Char('+')]);

    type_text(&mut app, "IF999");
    press(&mut app, &[KeyCode::Enter]);

    assert_eq!(api.count("add_course"), 0);
    assert_eq!(app.status(), Some("Nama is required."));

    // The form is still open: letters go into it instead of switching screens.
    type_text(&mut app, "2");
    assert_eq!(app.screen(), Screen::Courses);
}

#[test]
fn roster_picks_the_student_view_and_back() {
    let api = campus();
    let mut app = App::new(api.clone()).unwrap();
    press(&mut app, &[KeyCode::Char('4')]);
    assert_eq!(app.enrollments().enrollments().len(), 3);

    press(
        &mut app,
        &[KeyCode::Char('s'), KeyCode::Right, KeyCode::Enter],
    );
    assert_eq!(
        app.enrollments().view(),
        &EnrollmentView::Student("2102".to_string())
    );
    assert_eq!(api.count("enrollments_for_student"), 1);
    assert_eq!(app.enrollments().enrollments().len(), 1);

    press(&mut app, &[KeyCode::Char('+'), KeyCode::Right, KeyCode::Tab]);
    press(&mut app, &[KeyCode::Char('A'), KeyCode::Enter]);
    assert_eq!(api.count("add_enrollment"), 1);
    assert_eq!(app.enrollments().enrollments().len(), 2);

    press(&mut app, &[KeyCode::Char('a')]);
    assert_eq!(app.enrollments().view(), &EnrollmentView::All);
    assert_eq!(app.enrollments().enrollments().len(), 4);
}

#[test]
fn quit_key_ends_the_loop() {
    let mut app = App::new(campus()).unwrap();
    assert!(!press(&mut app, &[KeyCode::Char('1')]));
    assert!(press(&mut app, &[KeyCode::Char('q')]));
}
