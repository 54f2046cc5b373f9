use anyhow::{anyhow, Result};
use tracing::info;

use crate::api::StudentsApi;
use crate::models::{NewStudent, Student, StudentUpdate};

/// Student directory page: the loaded list plus the UI flags around it.
#[derive(Debug, Default)]
pub struct StudentDirectory {
    students: Vec<Student>,
    loading: bool,
    error: Option<String>,
    editing: Option<String>,
    pending_delete: Option<String>,
}

impl StudentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Student number currently open in the edit form.
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    pub fn find(&self, npm: &str) -> Option<&Student> {
        self.students.iter().find(|student| student.npm == npm)
    }

    /// Re-fetch the whole list. On failure the previous rows stay visible
    /// behind the error banner.
    pub async fn refresh<A: StudentsApi>(&mut self, api: &A) -> Result<()> {
        self.loading = true;
        let result = api.list_students().await;
        self.loading = false;
        match result {
            Ok(students) => {
                self.students = students;
                self.error = None;
                Ok(())
            }
            Err(err) => Err(self.fail(err.user_message("Failed to fetch mahasiswa data"))),
        }
    }

    pub async fn create<A: StudentsApi>(&mut self, api: &A, student: NewStudent) -> Result<()> {
        if let Err(err) = api.add_student(&student).await {
            return Err(self.fail(err.user_message("Failed to add mahasiswa")));
        }
        info!(npm = %student.npm, "student created");
        self.error = None;
        self.reload_after_mutation(api).await;
        Ok(())
    }

    pub fn begin_edit(&mut self, npm: &str) -> Result<&Student> {
        let student = self
            .students
            .iter()
            .find(|student| student.npm == npm)
            .ok_or_else(|| anyhow!("Mahasiswa {npm} is not in the list."))?;
        self.editing = Some(student.npm.clone());
        Ok(student)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Save the edit form. The student number is taken from edit mode and
    /// cannot be changed; a failure keeps edit mode open.
    pub async fn update<A: StudentsApi>(&mut self, api: &A, update: StudentUpdate) -> Result<()> {
        let npm = self
            .editing
            .clone()
            .ok_or_else(|| anyhow!("No mahasiswa is being edited."))?;
        if let Err(err) = api.update_student(&npm, &update).await {
            return Err(self.fail(err.user_message("Failed to update mahasiswa")));
        }
        info!(%npm, "student updated");
        self.editing = None;
        self.error = None;
        self.reload_after_mutation(api).await;
        Ok(())
    }

    /// First half of a delete: remember which student the user wants gone.
    /// Nothing is sent until [`confirm_delete`](Self::confirm_delete).
    pub fn request_delete(&mut self, npm: &str) {
        self.pending_delete = Some(npm.to_string());
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Issue the delete the user confirmed. Returns `Ok(false)` when nothing
    /// was pending.
    pub async fn confirm_delete<A: StudentsApi>(&mut self, api: &A) -> Result<bool> {
        let Some(npm) = self.pending_delete.take() else {
            return Ok(false);
        };
        if let Err(err) = api.delete_student(&npm).await {
            return Err(self.fail(err.user_message("Failed to delete mahasiswa")));
        }
        info!(%npm, "student deleted");
        self.error = None;
        self.reload_after_mutation(api).await;
        Ok(true)
    }

    async fn reload_after_mutation<A: StudentsApi>(&mut self, api: &A) {
        // The mutation itself went through; a failed refresh only sets the banner.
        let _ = self.refresh(api).await;
    }

    fn fail(&mut self, message: String) -> anyhow::Error {
        self.error = Some(message.clone());
        anyhow!(message)
    }
}
