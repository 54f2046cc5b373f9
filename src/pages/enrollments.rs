use std::mem;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::api::{EnrollmentsApi, RecordsApi};
use crate::models::{Course, Enrollment, EnrollmentUpdate, Grade, NewEnrollment, Student};

/// Which enrollments the page is showing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EnrollmentView {
    /// Every enrollment, fetched together with the student and course lists.
    #[default]
    All,
    /// Only the enrollments of one student, fetched through the per-student
    /// lookup.
    Student(String),
}

/// One enrollment with student and course details joined in for display.
/// Name fields are `None` when neither the backend nor the local lists know
/// the referenced entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrollmentRow<'a> {
    pub id: &'a str,
    pub npm: &'a str,
    pub student_name: Option<&'a str>,
    pub course_code: &'a str,
    pub course_name: Option<&'a str>,
    pub credits: Option<u32>,
    pub grade: Option<Grade>,
    pub enrolled_at: Option<DateTime<Utc>>,
}

/// Enrollment management page. Owns the enrollments it shows and read-only
/// copies of the student and course lists used for the selection inputs and
/// for resolving display names.
#[derive(Debug, Default)]
pub struct EnrollmentManager {
    enrollments: Vec<Enrollment>,
    students: Vec<Student>,
    courses: Vec<Course>,
    view: EnrollmentView,
    loading: bool,
    error: Option<String>,
    editing: Option<String>,
    pending_delete: Option<String>,
}

impl EnrollmentManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enrollments(&self) -> &[Enrollment] {
        &self.enrollments
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn view(&self) -> &EnrollmentView {
        &self.view
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    /// The student whose enrollments are shown in per-student mode.
    pub fn selected_student(&self) -> Option<&Student> {
        match &self.view {
            EnrollmentView::All => None,
            EnrollmentView::Student(npm) => self.students.iter().find(|s| &s.npm == npm),
        }
    }

    pub fn find(&self, id: &str) -> Option<&Enrollment> {
        self.enrollments.iter().find(|enrollment| enrollment.id == id)
    }

    /// Rows for the table, resolving names from the joined documents first and
    /// the loaded lists second.
    pub fn rows(&self) -> Vec<EnrollmentRow<'_>> {
        self.enrollments
            .iter()
            .map(|enrollment| {
                let student = enrollment.student.resolve(&self.students);
                let course = enrollment.course.resolve(&self.courses);
                EnrollmentRow {
                    id: &enrollment.id,
                    npm: enrollment.student_npm(),
                    student_name: student.map(|s| s.name.as_str()),
                    course_code: enrollment.course_code(),
                    course_name: course.map(|c| c.name.as_str()),
                    credits: course.map(|c| c.credits),
                    grade: enrollment.grade,
                    enrolled_at: enrollment.enrolled_at,
                }
            })
            .collect()
    }

    /// Fetch enrollments, students and courses as one joint operation. Either
    /// all three lists are replaced or none is.
    pub async fn load_all<A: RecordsApi>(&mut self, api: &A) -> Result<()> {
        self.loading = true;
        let result = futures::try_join!(
            api.list_enrollments(),
            api.list_students(),
            api.list_courses()
        );
        self.loading = false;
        match result {
            Ok((enrollments, students, courses)) => {
                debug!(
                    enrollments = enrollments.len(),
                    students = students.len(),
                    courses = courses.len(),
                    "enrollment page loaded"
                );
                self.enrollments = enrollments;
                self.students = students;
                self.courses = courses;
                self.error = None;
                Ok(())
            }
            Err(err) => Err(self.fail(err.user_message("Failed to fetch data"))),
        }
    }

    /// Switch to per-student mode for `npm` and fetch only that student's
    /// enrollments. If the lookup fails the previous view stays active, so
    /// the rows on screen always belong to the view they were fetched for.
    pub async fn select_student<A: EnrollmentsApi>(&mut self, api: &A, npm: &str) -> Result<()> {
        if !self.students.iter().any(|student| student.npm == npm) {
            return Err(self.fail(format!("Mahasiswa {npm} is not in the list.")));
        }
        let previous = mem::replace(&mut self.view, EnrollmentView::Student(npm.to_string()));
        self.editing = None;
        self.pending_delete = None;
        let result = self.load_student(api, npm).await;
        if result.is_err() {
            self.view = previous;
        }
        result
    }

    /// Leave per-student mode, clearing the selection and re-fetching all
    /// three lists.
    pub async fn show_all<A: RecordsApi>(&mut self, api: &A) -> Result<()> {
        self.view = EnrollmentView::All;
        self.editing = None;
        self.pending_delete = None;
        self.load_all(api).await
    }

    /// Re-fetch whatever the current view shows.
    pub async fn refresh<A: RecordsApi>(&mut self, api: &A) -> Result<()> {
        match self.view.clone() {
            EnrollmentView::All => self.load_all(api).await,
            EnrollmentView::Student(npm) => self.load_student(api, &npm).await,
        }
    }

    async fn load_student<A: EnrollmentsApi>(&mut self, api: &A, npm: &str) -> Result<()> {
        self.loading = true;
        let result = api.enrollments_for_student(npm).await;
        self.loading = false;
        match result {
            Ok(mut enrollments) => {
                enrollments.retain(|enrollment| enrollment.student_npm() == npm);
                self.enrollments = enrollments;
                self.error = None;
                Ok(())
            }
            // The lookup answers 404 for a student without enrollments.
            Err(err) if err.is_not_found() => {
                self.enrollments.clear();
                self.error = None;
                Ok(())
            }
            Err(err) => Err(self.fail(err.user_message("Failed to fetch data"))),
        }
    }

    /// Enroll a student in a course. Both must be picked from the loaded
    /// lists; otherwise no request is made.
    pub async fn create<A: RecordsApi>(&mut self, api: &A, enrollment: NewEnrollment) -> Result<()> {
        let student_known = self.students.iter().any(|s| s.npm == enrollment.npm);
        let course_known = self.courses.iter().any(|c| c.code == enrollment.kode_matkul);
        if !student_known || !course_known {
            return Err(self.fail("Select an existing mahasiswa and matkul.".to_string()));
        }
        if let Err(err) = api.add_enrollment(&enrollment).await {
            return Err(self.fail(err.user_message("Failed to add enrollment")));
        }
        info!(npm = %enrollment.npm, course = %enrollment.kode_matkul, "enrollment created");
        self.error = None;
        self.reload_after_mutation(api).await;
        Ok(())
    }

    pub fn begin_edit(&mut self, id: &str) -> Result<&Enrollment> {
        let enrollment = self
            .enrollments
            .iter()
            .find(|enrollment| enrollment.id == id)
            .ok_or_else(|| anyhow!("Enrollment {id} is not in the list."))?;
        self.editing = Some(enrollment.id.clone());
        Ok(enrollment)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Save a new grade for the enrollment in edit mode. Student and course
    /// are sent back exactly as loaded.
    pub async fn update_grade<A: RecordsApi>(&mut self, api: &A, grade: Option<Grade>) -> Result<()> {
        let id = self
            .editing
            .clone()
            .ok_or_else(|| anyhow!("No enrollment is being edited."))?;
        let update = match self.find(&id) {
            Some(enrollment) => EnrollmentUpdate::regrade(enrollment, grade),
            None => return Err(self.fail(format!("Enrollment {id} is not in the list."))),
        };
        if let Err(err) = api.update_enrollment(&id, &update).await {
            return Err(self.fail(err.user_message("Failed to update enrollment")));
        }
        info!(%id, grade = ?grade, "enrollment regraded");
        self.editing = None;
        self.error = None;
        self.reload_after_mutation(api).await;
        Ok(())
    }

    pub fn request_delete(&mut self, id: &str) {
        self.pending_delete = Some(id.to_string());
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the confirmed enrollment and refresh the current view; in
    /// per-student mode only that student's list is re-fetched.
    pub async fn confirm_delete<A: RecordsApi>(&mut self, api: &A) -> Result<bool> {
        let Some(id) = self.pending_delete.take() else {
            return Ok(false);
        };
        if let Err(err) = api.delete_enrollment(&id).await {
            return Err(self.fail(err.user_message("Failed to delete enrollment")));
        }
        info!(%id, "enrollment deleted");
        self.error = None;
        self.reload_after_mutation(api).await;
        Ok(true)
    }

    /// Re-fetch the current view after a mutation. In per-student mode this
    /// stays on the selected student's lookup.
    async fn reload_after_mutation<A: RecordsApi>(&mut self, api: &A) {
        // The mutation itself went through; a failed refresh only sets the banner.
        let _ = self.refresh(api).await;
    }

    fn fail(&mut self, message: String) -> anyhow::Error {
        self.error = Some(message.clone());
        anyhow!(message)
    }
}
