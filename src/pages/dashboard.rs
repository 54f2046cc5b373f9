use anyhow::{anyhow, Result};

use crate::api::RecordsApi;
use crate::models::{Course, Enrollment, Student};

/// Headline numbers shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DashboardStats {
    pub student_count: usize,
    pub course_count: usize,
    pub enrollment_count: usize,
    /// Arithmetic mean of every student's GPA; zero without students.
    pub average_gpa: f64,
}

impl DashboardStats {
    pub fn from_lists(students: &[Student], courses: &[Course], enrollments: &[Enrollment]) -> Self {
        Self {
            student_count: students.len(),
            course_count: courses.len(),
            enrollment_count: enrollments.len(),
            average_gpa: average_gpa(students),
        }
    }

    /// Average GPA rounded to two decimals, e.g. `3.50`.
    pub fn average_gpa_display(&self) -> String {
        format!("{:.2}", self.average_gpa)
    }
}

pub fn average_gpa(students: &[Student]) -> f64 {
    if students.is_empty() {
        return 0.0;
    }
    students.iter().map(|student| student.gpa).sum::<f64>() / students.len() as f64
}

/// Read-only summary page.
#[derive(Debug, Default)]
pub struct DashboardSummary {
    stats: DashboardStats,
    loading: bool,
    error: Option<String>,
}

impl DashboardSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &DashboardStats {
        &self.stats
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetch all three lists together and recompute the stats. If any fetch
    /// fails the previous stats are kept untouched and only the error is set.
    pub async fn refresh<A: RecordsApi>(&mut self, api: &A) -> Result<()> {
        self.loading = true;
        let result = futures::try_join!(
            api.list_students(),
            api.list_courses(),
            api.list_enrollments()
        );
        self.loading = false;
        match result {
            Ok((students, courses, enrollments)) => {
                self.stats = DashboardStats::from_lists(&students, &courses, &enrollments);
                self.error = None;
                Ok(())
            }
            Err(err) => {
                let message = err.user_message("Failed to fetch dashboard data");
                self.error = Some(message.clone());
                Err(anyhow!(message))
            }
        }
    }
}
