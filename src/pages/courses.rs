use anyhow::{anyhow, Result};
use tracing::info;

use crate::api::CoursesApi;
use crate::models::{Course, CourseUpdate, NewCourse};

/// Course catalog page. Same request flow as the student directory, keyed by
/// course code.
#[derive(Debug, Default)]
pub struct CourseCatalog {
    courses: Vec<Course>,
    loading: bool,
    error: Option<String>,
    editing: Option<String>,
    pending_delete: Option<String>,
}

impl CourseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
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

    pub fn find(&self, code: &str) -> Option<&Course> {
        self.courses.iter().find(|course| course.code == code)
    }

    pub async fn refresh<A: CoursesApi>(&mut self, api: &A) -> Result<()> {
        self.loading = true;
        let result = api.list_courses().await;
        self.loading = false;
        match result {
            Ok(courses) => {
                self.courses = courses;
                self.error = None;
                Ok(())
            }
            Err(err) => Err(self.fail(err.user_message("Failed to fetch matkul data"))),
        }
    }

    pub async fn create<A: CoursesApi>(&mut self, api: &A, course: NewCourse) -> Result<()> {
        if let Err(err) = api.add_course(&course).await {
            return Err(self.fail(err.user_message("Failed to add matkul")));
        }
        info!(code = %course.code, "course created");
        self.error = None;
        self.reload_after_mutation(api).await;
        Ok(())
    }

    pub fn begin_edit(&mut self, code: &str) -> Result<&Course> {
        let course = self
            .courses
            .iter()
            .find(|course| course.code == code)
            .ok_or_else(|| anyhow!("Matkul {code} is not in the list."))?;
        self.editing = Some(course.code.clone());
        Ok(course)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub async fn update<A: CoursesApi>(&mut self, api: &A, update: CourseUpdate) -> Result<()> {
        let code = self
            .editing
            .clone()
            .ok_or_else(|| anyhow!("No matkul is being edited."))?;
        if let Err(err) = api.update_course(&code, &update).await {
            return Err(self.fail(err.user_message("Failed to update matkul")));
        }
        info!(%code, "course updated");
        self.editing = None;
        self.error = None;
        self.reload_after_mutation(api).await;
        Ok(())
    }

    pub fn request_delete(&mut self, code: &str) {
        self.pending_delete = Some(code.to_string());
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub async fn confirm_delete<A: CoursesApi>(&mut self, api: &A) -> Result<bool> {
        let Some(code) = self.pending_delete.take() else {
            return Ok(false);
        };
        if let Err(err) = api.delete_course(&code).await {
            return Err(self.fail(err.user_message("Failed to delete matkul")));
        }
        info!(%code, "course deleted");
        self.error = None;
        self.reload_after_mutation(api).await;
        Ok(true)
    }

    async fn reload_after_mutation<A: CoursesApi>(&mut self, api: &A) {
        // The mutation itself went through; a failed refresh only sets the banner.
        let _ = self.refresh(api).await;
    }

    fn fail(&mut self, message: String) -> anyhow::Error {
        self.error = Some(message.clone());
        anyhow!(message)
    }
}
