use std::mem;

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap};
use ratatui::Frame;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use crate::api::RecordsApi;
use crate::models::{grade_label, Student};
use crate::pages::{
    CourseCatalog, DashboardSummary, EnrollmentManager, EnrollmentView, StudentDirectory,
};

use super::forms::{
    ConfirmDelete, CourseField, CourseForm, EnrollmentField, EnrollmentForm, StudentField,
    StudentForm,
};
use super::helpers::{centered_rect, student_card_lines, surface_error};
use super::screens::{ListCursor, RosterGrid};

/// Navigation bar height.
const HEADER_HEIGHT: u16 = 3;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height of one card in the student roster grid.
const CARD_HEIGHT: u16 = 5;

/// Top-level pages, in navigation-bar order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Students,
    Courses,
    Enrollments,
}

impl Screen {
    pub const ALL: [Screen; 4] = [
        Screen::Dashboard,
        Screen::Students,
        Screen::Courses,
        Screen::Enrollments,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Screen::Dashboard => "Dashboard",
            Screen::Students => "Mahasiswa",
            Screen::Courses => "Mata Kuliah",
            Screen::Enrollments => "Enrollment",
        }
    }

    fn index(self) -> usize {
        Screen::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    fn offset(self, step: isize) -> Screen {
        let len = Screen::ALL.len() as isize;
        Screen::ALL[(self.index() as isize + step).rem_euclid(len) as usize]
    }
}

/// Modal state layered on top of the current screen.
enum Mode {
    Normal,
    AddingStudent(StudentForm),
    EditingStudent(StudentForm),
    AddingCourse(CourseForm),
    EditingCourse(CourseForm),
    AddingEnrollment(EnrollmentForm),
    EditingEnrollment(EnrollmentForm),
    ConfirmDelete(ConfirmDelete),
    PickingStudent(RosterGrid),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state. Every page controller lives here; the async
/// page operations are driven to completion on a current-thread runtime so
/// the terminal loop itself stays synchronous.
pub struct App<A> {
    api: A,
    runtime: Runtime,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
    dashboard: DashboardSummary,
    students: StudentDirectory,
    courses: CourseCatalog,
    enrollments: EnrollmentManager,
    student_cursor: ListCursor,
    course_cursor: ListCursor,
    enrollment_cursor: ListCursor,
}

impl<A: RecordsApi> App<A> {
    pub fn new(api: A) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to start async runtime")?;
        Ok(Self {
            api,
            runtime,
            screen: Screen::Dashboard,
            mode: Mode::Normal,
            status: None,
            dashboard: DashboardSummary::new(),
            students: StudentDirectory::new(),
            courses: CourseCatalog::new(),
            enrollments: EnrollmentManager::new(),
            student_cursor: ListCursor::default(),
            course_cursor: ListCursor::default(),
            enrollment_cursor: ListCursor::default(),
        })
    }

    /// Load the start page.
    pub fn start(&mut self) {
        self.open_screen(Screen::Dashboard);
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    pub fn dashboard(&self) -> &DashboardSummary {
        &self.dashboard
    }

    pub fn students(&self) -> &StudentDirectory {
        &self.students
    }

    pub fn courses(&self) -> &CourseCatalog {
        &self.courses
    }

    pub fn enrollments(&self) -> &EnrollmentManager {
        &self.enrollments
    }

    /// Feed one key press through the current mode. Returns `true` when the
    /// user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingStudent(form) => self.handle_student_form(code, form, false)?,
            Mode::EditingStudent(form) => self.handle_student_form(code, form, true)?,
            Mode::AddingCourse(form) => self.handle_course_form(code, form, false)?,
            Mode::EditingCourse(form) => self.handle_course_form(code, form, true)?,
            Mode::AddingEnrollment(form) => self.handle_enrollment_form(code, form, false)?,
            Mode::EditingEnrollment(form) => self.handle_enrollment_form(code, form, true)?,
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm)?,
            Mode::PickingStudent(grid) => self.handle_pick_student(code, grid)?,
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') => {
                *exit = true;
                return Ok(Mode::Normal);
            }
            KeyCode::Char(ch @ '1'..='4') => {
                let idx = ch as usize - '1' as usize;
                self.open_screen(Screen::ALL[idx]);
                return Ok(Mode::Normal);
            }
            KeyCode::Tab => {
                self.open_screen(self.screen.offset(1));
                return Ok(Mode::Normal);
            }
            KeyCode::BackTab => {
                self.open_screen(self.screen.offset(-1));
                return Ok(Mode::Normal);
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.reload_current();
                return Ok(Mode::Normal);
            }
            _ => {}
        }

        match self.screen {
            Screen::Dashboard => Ok(Mode::Normal),
            Screen::Students => self.handle_students_key(code),
            Screen::Courses => self.handle_courses_key(code),
            Screen::Enrollments => self.handle_enrollments_key(code),
        }
    }

    fn handle_students_key(&mut self, code: KeyCode) -> Result<Mode> {
        let len = self.students.students().len();
        match code {
            KeyCode::Up => self.student_cursor.move_selection(-1, len),
            KeyCode::Down => self.student_cursor.move_selection(1, len),
            KeyCode::PageUp => self.student_cursor.move_selection(-5, len),
            KeyCode::PageDown => self.student_cursor.move_selection(5, len),
            KeyCode::Home => self.student_cursor.select_first(),
            KeyCode::End => self.student_cursor.select_last(len),
            KeyCode::Char('+') => {
                self.clear_status();
                return Ok(Mode::AddingStudent(StudentForm::default()));
            }
            KeyCode::Char('e') | KeyCode::Char('E') => {
                let Some(npm) = self.current_student().map(|s| s.npm.clone()) else {
                    self.set_status("No mahasiswa selected to edit.", StatusKind::Error);
                    return Ok(Mode::Normal);
                };
                self.clear_status();
                match self.students.begin_edit(&npm).map(StudentForm::from_student) {
                    Ok(form) => return Ok(Mode::EditingStudent(form)),
                    Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
                }
            }
            KeyCode::Char('-') => {
                if let Some(student) = self.current_student().cloned() {
                    self.clear_status();
                    self.students.request_delete(&student.npm);
                    return Ok(Mode::ConfirmDelete(ConfirmDelete {
                        title: "Delete Mahasiswa",
                        prompt: format!(
                            "Are you sure you want to delete {} ({})?",
                            student.name, student.npm
                        ),
                    }));
                }
                self.set_status("No mahasiswa selected to delete.", StatusKind::Error);
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_courses_key(&mut self, code: KeyCode) -> Result<Mode> {
        let len = self.courses.courses().len();
        match code {
            KeyCode::Up => self.course_cursor.move_selection(-1, len),
            KeyCode::Down => self.course_cursor.move_selection(1, len),
            KeyCode::PageUp => self.course_cursor.move_selection(-5, len),
            KeyCode::PageDown => self.course_cursor.move_selection(5, len),
            KeyCode::Home => self.course_cursor.select_first(),
            KeyCode::End => self.course_cursor.select_last(len),
            KeyCode::Char('+') => {
                self.clear_status();
                return Ok(Mode::AddingCourse(CourseForm::default()));
            }
            KeyCode::Char('e') | KeyCode::Char('E') => {
                let Some(code) = self.current_course_code() else {
                    self.set_status("No matkul selected to edit.", StatusKind::Error);
                    return Ok(Mode::Normal);
                };
                self.clear_status();
                match self.courses.begin_edit(&code).map(CourseForm::from_course) {
                    Ok(form) => return Ok(Mode::EditingCourse(form)),
                    Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
                }
            }
            KeyCode::Char('-') => {
                if let Some(course) = self
                    .courses
                    .courses()
                    .get(self.course_cursor.selected)
                    .cloned()
                {
                    self.clear_status();
                    self.courses.request_delete(&course.code);
                    return Ok(Mode::ConfirmDelete(ConfirmDelete {
                        title: "Delete Mata Kuliah",
                        prompt: format!("Are you sure you want to delete {course}?"),
                    }));
                }
                self.set_status("No matkul selected to delete.", StatusKind::Error);
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_enrollments_key(&mut self, code: KeyCode) -> Result<Mode> {
        let len = self.enrollments.enrollments().len();
        match code {
            KeyCode::Up => self.enrollment_cursor.move_selection(-1, len),
            KeyCode::Down => self.enrollment_cursor.move_selection(1, len),
            KeyCode::PageUp => self.enrollment_cursor.move_selection(-5, len),
            KeyCode::PageDown => self.enrollment_cursor.move_selection(5, len),
            KeyCode::Home => self.enrollment_cursor.select_first(),
            KeyCode::End => self.enrollment_cursor.select_last(len),
            KeyCode::Char('s') | KeyCode::Char('S') => {
                let students = self.enrollments.students();
                if students.is_empty() {
                    self.set_status("No mahasiswa to choose from.", StatusKind::Error);
                    return Ok(Mode::Normal);
                }
                let mut grid = RosterGrid::default();
                if let Some(current) = self.enrollments.selected_student() {
                    grid.selected = students
                        .iter()
                        .position(|s| s.npm == current.npm)
                        .unwrap_or(0);
                }
                self.clear_status();
                return Ok(Mode::PickingStudent(grid));
            }
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Esc => {
                if matches!(self.enrollments.view(), EnrollmentView::Student(_)) {
                    let result = self.runtime.block_on(self.enrollments.show_all(&self.api));
                    self.enrollment_cursor.select_first();
                    self.report(result, "Showing all enrollments.");
                }
            }
            KeyCode::Char('+') => {
                self.clear_status();
                let npm = self.enrollments.selected_student().map(|s| s.npm.clone());
                return Ok(Mode::AddingEnrollment(EnrollmentForm::for_student(
                    npm.as_deref(),
                )));
            }
            KeyCode::Char('e') | KeyCode::Char('E') => {
                let Some(id) = self.current_enrollment_id() else {
                    self.set_status("No enrollment selected to edit.", StatusKind::Error);
                    return Ok(Mode::Normal);
                };
                self.clear_status();
                match self
                    .enrollments
                    .begin_edit(&id)
                    .map(EnrollmentForm::from_enrollment)
                {
                    Ok(form) => return Ok(Mode::EditingEnrollment(form)),
                    Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
                }
            }
            KeyCode::Char('-') => {
                let target = self
                    .enrollments
                    .rows()
                    .get(self.enrollment_cursor.selected)
                    .map(|row| {
                        let prompt = format!(
                            "Are you sure you want to delete the enrollment of {} in {}?",
                            row.student_name.unwrap_or(row.npm),
                            row.course_name.unwrap_or(row.course_code)
                        );
                        (row.id.to_string(), prompt)
                    });
                if let Some((id, prompt)) = target {
                    self.clear_status();
                    self.enrollments.request_delete(&id);
                    return Ok(Mode::ConfirmDelete(ConfirmDelete {
                        title: "Delete Enrollment",
                        prompt,
                    }));
                }
                self.set_status("No enrollment selected to delete.", StatusKind::Error);
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_student_form(
        &mut self,
        code: KeyCode,
        mut form: StudentForm,
        editing: bool,
    ) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                if editing {
                    self.students.cancel_edit();
                    self.set_status("Edit cancelled.", StatusKind::Info);
                } else {
                    self.set_status("Add mahasiswa cancelled.", StatusKind::Info);
                }
                keep_open = false;
            }
            KeyCode::Tab => form.toggle_field(true),
            KeyCode::BackTab => form.toggle_field(false),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_student(&form, editing) {
                Ok(message) => {
                    self.set_status(message, StatusKind::Info);
                    keep_open = false;
                }
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        Ok(match (keep_open, editing) {
            (false, _) => Mode::Normal,
            (true, true) => Mode::EditingStudent(form),
            (true, false) => Mode::AddingStudent(form),
        })
    }

    fn save_student(&mut self, form: &StudentForm, editing: bool) -> Result<String> {
        let message = if editing {
            let update = form.parse_update()?;
            self.runtime
                .block_on(self.students.update(&self.api, update))?;
            format!("Updated mahasiswa {}.", form.npm)
        } else {
            let student = form.parse_new()?;
            let npm = student.npm.clone();
            self.runtime
                .block_on(self.students.create(&self.api, student))?;
            format!("Added mahasiswa {npm}.")
        };
        let keys = self.students.students().iter().map(|s| s.npm.as_str());
        self.student_cursor.focus(keys, form.npm.trim());
        self.student_cursor
            .ensure_in_bounds(self.students.students().len());
        Ok(message)
    }

    fn handle_course_form(
        &mut self,
        code: KeyCode,
        mut form: CourseForm,
        editing: bool,
    ) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                if editing {
                    self.courses.cancel_edit();
                    self.set_status("Edit cancelled.", StatusKind::Info);
                } else {
                    self.set_status("Add matkul cancelled.", StatusKind::Info);
                }
                keep_open = false;
            }
            KeyCode::Tab => form.toggle_field(true),
            KeyCode::BackTab => form.toggle_field(false),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_course(&form, editing) {
                Ok(message) => {
                    self.set_status(message, StatusKind::Info);
                    keep_open = false;
                }
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        Ok(match (keep_open, editing) {
            (false, _) => Mode::Normal,
            (true, true) => Mode::EditingCourse(form),
            (true, false) => Mode::AddingCourse(form),
        })
    }

    fn save_course(&mut self, form: &CourseForm, editing: bool) -> Result<String> {
        let message = if editing {
            let update = form.parse_update()?;
            self.runtime
                .block_on(self.courses.update(&self.api, update))?;
            format!("Updated matkul {}.", form.code)
        } else {
            let course = form.parse_new()?;
            let code = course.code.clone();
            self.runtime
                .block_on(self.courses.create(&self.api, course))?;
            format!("Added matkul {code}.")
        };
        let keys = self.courses.courses().iter().map(|c| c.code.as_str());
        self.course_cursor.focus(keys, form.code.trim());
        self.course_cursor
            .ensure_in_bounds(self.courses.courses().len());
        Ok(message)
    }

    fn handle_enrollment_form(
        &mut self,
        code: KeyCode,
        mut form: EnrollmentForm,
        editing: bool,
    ) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                if editing {
                    self.enrollments.cancel_edit();
                    self.set_status("Edit cancelled.", StatusKind::Info);
                } else {
                    self.set_status("Add enrollment cancelled.", StatusKind::Info);
                }
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::Down => form.toggle_field(true),
            KeyCode::BackTab | KeyCode::Up => form.toggle_field(false),
            KeyCode::Left => {
                form.cycle(-1, self.enrollments.students(), self.enrollments.courses());
                form.error = None;
            }
            KeyCode::Right => {
                form.cycle(1, self.enrollments.students(), self.enrollments.courses());
                form.error = None;
            }
            KeyCode::Backspace | KeyCode::Delete => {
                if form.active == EnrollmentField::Grade {
                    form.grade = None;
                }
            }
            KeyCode::Enter => {
                let result = if editing {
                    self.runtime
                        .block_on(self.enrollments.update_grade(&self.api, form.grade))
                        .map(|_| "Enrollment updated.".to_string())
                } else {
                    match form.parse_new() {
                        Ok(enrollment) => self
                            .runtime
                            .block_on(self.enrollments.create(&self.api, enrollment))
                            .map(|_| "Enrollment added.".to_string()),
                        Err(err) => Err(err),
                    }
                };
                self.enrollment_cursor
                    .ensure_in_bounds(self.enrollments.enrollments().len());
                match result {
                    Ok(message) => {
                        self.set_status(message, StatusKind::Info);
                        keep_open = false;
                    }
                    Err(err) => {
                        let message = surface_error(&err);
                        form.error = Some(message.clone());
                        self.set_status(message, StatusKind::Error);
                    }
                }
            }
            KeyCode::Char(ch) => {
                if form.type_grade(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        Ok(match (keep_open, editing) {
            (false, _) => Mode::Normal,
            (true, true) => Mode::EditingEnrollment(form),
            (true, false) => Mode::AddingEnrollment(form),
        })
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDelete) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                match self.screen {
                    Screen::Students => self.students.cancel_delete(),
                    Screen::Courses => self.courses.cancel_delete(),
                    Screen::Enrollments => self.enrollments.cancel_delete(),
                    Screen::Dashboard => {}
                }
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                let result = match self.screen {
                    Screen::Students => self
                        .runtime
                        .block_on(self.students.confirm_delete(&self.api)),
                    Screen::Courses => self
                        .runtime
                        .block_on(self.courses.confirm_delete(&self.api)),
                    Screen::Enrollments => self
                        .runtime
                        .block_on(self.enrollments.confirm_delete(&self.api)),
                    Screen::Dashboard => Ok(false),
                };
                self.clamp_cursors();
                match result {
                    Ok(true) => self.set_status("Deleted.", StatusKind::Info),
                    Ok(false) => {}
                    Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
                }
                Ok(Mode::Normal)
            }
            _ => Ok(Mode::ConfirmDelete(confirm)),
        }
    }

    fn handle_pick_student(&mut self, code: KeyCode, mut grid: RosterGrid) -> Result<Mode> {
        let len = self.enrollments.students().len();
        match code {
            KeyCode::Esc => {
                self.set_status("Selection cancelled.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Left => grid.move_horizontal(-1, len),
            KeyCode::Right => grid.move_horizontal(1, len),
            KeyCode::Up => grid.move_vertical(-1, len),
            KeyCode::Down => grid.move_vertical(1, len),
            KeyCode::Enter => {
                let Some(student) = self.enrollments.students().get(grid.selected).cloned() else {
                    return Ok(Mode::PickingStudent(grid));
                };
                debug!(npm = %student.npm, "switching to per-student enrollments");
                let result = self
                    .runtime
                    .block_on(self.enrollments.select_student(&self.api, &student.npm));
                self.enrollment_cursor.select_first();
                self.report(result, format!("Showing enrollments of {}.", student.name));
                return Ok(Mode::Normal);
            }
            _ => {}
        }
        Ok(Mode::PickingStudent(grid))
    }

    /// Switch pages. Every visit re-fetches the page, and the enrollment page
    /// always starts in all-enrollments mode.
    fn open_screen(&mut self, screen: Screen) {
        self.screen = screen;
        let result = match screen {
            Screen::Dashboard => self.runtime.block_on(self.dashboard.refresh(&self.api)),
            Screen::Students => self.runtime.block_on(self.students.refresh(&self.api)),
            Screen::Courses => self.runtime.block_on(self.courses.refresh(&self.api)),
            Screen::Enrollments => self.runtime.block_on(self.enrollments.show_all(&self.api)),
        };
        self.clamp_cursors();
        self.report(result, "");
    }

    /// Re-fetch the current page, keeping the enrollment view as it is.
    fn reload_current(&mut self) {
        let result = match self.screen {
            Screen::Dashboard => self.runtime.block_on(self.dashboard.refresh(&self.api)),
            Screen::Students => self.runtime.block_on(self.students.refresh(&self.api)),
            Screen::Courses => self.runtime.block_on(self.courses.refresh(&self.api)),
            Screen::Enrollments => self.runtime.block_on(self.enrollments.refresh(&self.api)),
        };
        self.clamp_cursors();
        self.report(result, "Reloaded.");
    }

    /// Put the outcome of a page operation into the footer. An empty success
    /// message clears the footer.
    fn report<S: Into<String>>(&mut self, result: Result<()>, success: S) {
        match result {
            Ok(()) => {
                let text = success.into();
                if text.is_empty() {
                    self.clear_status();
                } else {
                    self.set_status(text, StatusKind::Info);
                }
            }
            Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
        }
    }

    fn clamp_cursors(&mut self) {
        self.student_cursor
            .ensure_in_bounds(self.students.students().len());
        self.course_cursor
            .ensure_in_bounds(self.courses.courses().len());
        self.enrollment_cursor
            .ensure_in_bounds(self.enrollments.enrollments().len());
    }

    fn current_student(&self) -> Option<&Student> {
        self.students.students().get(self.student_cursor.selected)
    }

    fn current_course_code(&self) -> Option<String> {
        self.courses
            .courses()
            .get(self.course_cursor.selected)
            .map(|course| course.code.clone())
    }

    fn current_enrollment_id(&self) -> Option<String> {
        self.enrollments
            .enrollments()
            .get(self.enrollment_cursor.selected)
            .map(|enrollment| enrollment.id.clone())
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_tabs(frame, chunks[0]);
        match self.screen {
            Screen::Dashboard => self.draw_dashboard(frame, chunks[1]),
            Screen::Students => self.draw_students(frame, chunks[1]),
            Screen::Courses => self.draw_courses(frame, chunks[1]),
            Screen::Enrollments => self.draw_enrollments(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::AddingStudent(form) => self.draw_student_form(frame, area, "Add Mahasiswa", form),
            Mode::EditingStudent(form) => {
                self.draw_student_form(frame, area, "Edit Mahasiswa", form)
            }
            Mode::AddingCourse(form) => self.draw_course_form(frame, area, "Add Mata Kuliah", form),
            Mode::EditingCourse(form) => {
                self.draw_course_form(frame, area, "Edit Mata Kuliah", form)
            }
            Mode::AddingEnrollment(form) => {
                self.draw_enrollment_form(frame, area, "Add Enrollment", form)
            }
            Mode::EditingEnrollment(form) => {
                self.draw_enrollment_form(frame, area, "Edit Enrollment", form)
            }
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::PickingStudent(grid) => self.draw_roster(frame, area, grid),
            Mode::Normal => {}
        }
    }

    fn draw_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = Screen::ALL
            .iter()
            .enumerate()
            .map(|(idx, screen)| Line::from(format!("{} {}", idx + 1, screen.title())))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.screen.index())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Student Management System"),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    /// Draw the page's error banner, if any, and return the space left below.
    fn draw_error_banner(&self, frame: &mut Frame, area: Rect, error: Option<&str>) -> Rect {
        let Some(error) = error else {
            return area;
        };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);
        let banner = Paragraph::new(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(banner, chunks[0]);
        chunks[1]
    }

    fn draw_dashboard(&self, frame: &mut Frame, area: Rect) {
        let area = self.draw_error_banner(frame, area, self.dashboard.error());
        let stats = self.dashboard.stats();
        let cards = [
            ("Students", stats.student_count.to_string(), "Total Registered Students"),
            ("Courses", stats.course_count.to_string(), "Available Courses"),
            ("Enrollments", stats.enrollment_count.to_string(), "Active Enrollments"),
            ("Average IPK", stats.average_gpa_display(), "Average Student IPK"),
        ];

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(0)])
            .split(area);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(25); 4])
            .split(rows[0]);

        for ((title, value, caption), column) in cards.into_iter().zip(columns.iter()) {
            let card = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    value,
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(caption, Style::default().fg(Color::Gray))),
            ])
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(title));
            frame.render_widget(card, *column);
        }
    }

    fn draw_students(&self, frame: &mut Frame, area: Rect) {
        let area = self.draw_error_banner(frame, area, self.students.error());
        let block = Block::default().borders(Borders::ALL).title("Mahasiswa List");
        let students = self.students.students();
        if students.is_empty() {
            let message = Paragraph::new("No mahasiswa yet. Press '+' to add one.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let rows = students.iter().map(|student| {
            Row::new(vec![
                student.npm.clone(),
                student.name.clone(),
                student.department.clone(),
                format!("{:.2}", student.gpa),
                student.semester.to_string(),
            ])
        });
        let table = Table::new(
            rows,
            [
                Constraint::Length(14),
                Constraint::Percentage(35),
                Constraint::Percentage(30),
                Constraint::Length(6),
                Constraint::Length(9),
            ],
        )
        .header(header_row(&["NPM", "Nama", "Jurusan", "IPK", "Semester"]))
        .block(block)
        .row_highlight_style(highlight_style())
        .highlight_symbol("> ");
        let mut state = TableState::default().with_selected(Some(self.student_cursor.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_courses(&self, frame: &mut Frame, area: Rect) {
        let area = self.draw_error_banner(frame, area, self.courses.error());
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Mata Kuliah List");
        let courses = self.courses.courses();
        if courses.is_empty() {
            let message = Paragraph::new("No matkul yet. Press '+' to add one.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let rows = courses.iter().map(|course| {
            Row::new(vec![
                course.code.clone(),
                course.name.clone(),
                course.credits.to_string(),
            ])
        });
        let table = Table::new(
            rows,
            [
                Constraint::Length(12),
                Constraint::Min(20),
                Constraint::Length(5),
            ],
        )
        .header(header_row(&["Kode", "Nama", "SKS"]))
        .block(block)
        .row_highlight_style(highlight_style())
        .highlight_symbol("> ");
        let mut state = TableState::default().with_selected(Some(self.course_cursor.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_enrollments(&self, frame: &mut Frame, area: Rect) {
        let area = self.draw_error_banner(frame, area, self.enrollments.error());
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);

        let heading = match self.enrollments.view() {
            EnrollmentView::All => Line::from(Span::styled(
                "All enrollments",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            EnrollmentView::Student(npm) => {
                let name = self
                    .enrollments
                    .selected_student()
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| npm.clone());
                Line::from(vec![
                    Span::styled(
                        format!("Enrollments of {name} ({npm})"),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  •  press "),
                    Span::styled("[a]", key_style()),
                    Span::raw(" to show all"),
                ])
            }
        };
        let header = Paragraph::new(vec![
            heading,
            Line::from(format!(
                "{} enrollments shown",
                self.enrollments.enrollments().len()
            )),
        ])
        .block(Block::default().borders(Borders::ALL).title("Enrollment"));
        frame.render_widget(header, chunks[0]);

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Enrollment List");
        let rows = self.enrollments.rows();
        if rows.is_empty() {
            let message = Paragraph::new("No enrollments. Press '+' to add one.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, chunks[1]);
            return;
        }

        let table_rows = rows.iter().map(|row| {
            Row::new(vec![
                row.student_name.unwrap_or("-").to_string(),
                row.npm.to_string(),
                row.course_name.unwrap_or("-").to_string(),
                row.course_code.to_string(),
                row.credits.map(|c| c.to_string()).unwrap_or_default(),
                grade_label(row.grade).to_string(),
                row.enrolled_at
                    .map(|at| at.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
            ])
        });
        let table = Table::new(
            table_rows,
            [
                Constraint::Percentage(22),
                Constraint::Length(12),
                Constraint::Percentage(25),
                Constraint::Length(10),
                Constraint::Length(4),
                Constraint::Length(11),
                Constraint::Length(11),
            ],
        )
        .header(header_row(&[
            "Mahasiswa", "NPM", "Matkul", "Kode", "SKS", "Nilai", "Tanggal",
        ]))
        .block(block)
        .row_highlight_style(highlight_style())
        .highlight_symbol("> ");
        let mut state =
            TableState::default().with_selected(Some(self.enrollment_cursor.selected));
        frame.render_stateful_widget(table, chunks[1], &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let keys: &[(&str, &str)] = match (&self.screen, &self.mode) {
            (_, Mode::PickingStudent(_)) => &[
                ("[←↑↓→]", "Move"),
                ("[Enter]", "Show Enrollments"),
                ("[Esc]", "Cancel"),
            ],
            (_, Mode::ConfirmDelete(_)) => &[("[y]", "Delete"), ("[n/Esc]", "Keep")],
            (_, Mode::AddingEnrollment(_)) | (_, Mode::EditingEnrollment(_)) => &[
                ("[←→]", "Choose"),
                ("[Tab]", "Next Field"),
                ("[A-E]", "Grade"),
                ("[Enter]", "Save"),
                ("[Esc]", "Cancel"),
            ],
            (_, Mode::Normal) => match self.screen {
                Screen::Dashboard => &[
                    ("[1-4]", "Pages"),
                    ("[r]", "Reload"),
                    ("[q]", "Quit"),
                ],
                Screen::Enrollments => &[
                    ("[↑↓]", "Select"),
                    ("[+]", "Add"),
                    ("[e]", "Edit Grade"),
                    ("[-]", "Delete"),
                    ("[s]", "By Mahasiswa"),
                    ("[a]", "All"),
                    ("[1-4]", "Pages"),
                    ("[q]", "Quit"),
                ],
                Screen::Students | Screen::Courses => &[
                    ("[↑↓]", "Select"),
                    ("[+]", "Add"),
                    ("[e]", "Edit"),
                    ("[-]", "Delete"),
                    ("[r]", "Reload"),
                    ("[1-4]", "Pages"),
                    ("[q]", "Quit"),
                ],
            },
            _ => &[
                ("[Tab]", "Next Field"),
                ("[Enter]", "Save"),
                ("[Esc]", "Cancel"),
            ],
        };

        let mut spans = Vec::with_capacity(keys.len() * 2);
        for (key, action) in keys {
            spans.push(Span::styled(key.to_string(), key_style()));
            spans.push(Span::raw(format!(" {action}   ")));
        }
        Line::from(spans)
    }

    fn draw_form_shell(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        mut lines: Vec<Line<'static>>,
        error: Option<&str>,
    ) -> Rect {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        lines.push(Line::from(""));
        if let Some(error) = error {
            lines.push(Line::from(Span::styled(
                error.to_string(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
        inner
    }

    fn draw_student_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &StudentForm) {
        let lines = StudentField::ORDER
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        let inner = self.draw_form_shell(frame, area, title, lines, form.error.as_deref());

        let row = StudentField::ORDER
            .iter()
            .position(|field| *field == form.active)
            .unwrap_or(0);
        let prefix = form.active.label().len() + 2;
        let column = prefix + form.value(form.active).chars().count();
        frame.set_cursor_position((inner.x + column as u16, inner.y + row as u16));
    }

    fn draw_course_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &CourseForm) {
        let lines = CourseField::ORDER
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        let inner = self.draw_form_shell(frame, area, title, lines, form.error.as_deref());

        let row = CourseField::ORDER
            .iter()
            .position(|field| *field == form.active)
            .unwrap_or(0);
        let prefix = form.active.label().len() + 2;
        let column = prefix + form.value(form.active).chars().count();
        frame.set_cursor_position((inner.x + column as u16, inner.y + row as u16));
    }

    fn draw_enrollment_form(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        form: &EnrollmentForm,
    ) {
        let lines = form.build_lines(self.enrollments.students(), self.enrollments.courses());
        self.draw_form_shell(frame, area, title, lines, form.error.as_deref());
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(confirm.title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(confirm.prompt.clone()),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_roster(&self, frame: &mut Frame, area: Rect, grid: &RosterGrid) {
        let popup_area = centered_rect(80, 70, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Select Mahasiswa")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let students = self.enrollments.students();
        let visible_rows = (inner.height / CARD_HEIGHT).max(1) as usize;
        let first_row = grid.first_visible_row(visible_rows);
        let total_rows = RosterGrid::row_count(students.len());

        let row_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(CARD_HEIGHT); visible_rows])
            .split(inner);

        for (slot, row_idx) in (first_row..total_rows).take(visible_rows).enumerate() {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![
                    Constraint::Ratio(1, RosterGrid::COLUMNS as u32);
                    RosterGrid::COLUMNS
                ])
                .split(row_areas[slot]);
            for (col_idx, column) in columns.iter().enumerate() {
                let index = row_idx * RosterGrid::COLUMNS + col_idx;
                let Some(student) = students.get(index) else {
                    break;
                };
                let selected = index == grid.selected;
                let mut card_block = Block::default().borders(Borders::ALL);
                if selected {
                    card_block = card_block.style(Style::default().fg(Color::Yellow));
                }
                let lines = student_card_lines(
                    student,
                    column.width.saturating_sub(2),
                    column.height.saturating_sub(2),
                    selected,
                );
                frame.render_widget(Paragraph::new(lines).block(card_block), *column);
            }
        }
    }
}

fn key_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn highlight_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

fn header_row(titles: &[&'static str]) -> Row<'static> {
    Row::new(titles.to_vec()).style(Style::default().add_modifier(Modifier::BOLD))
}
