//! Page controllers. Each page owns the data it fetched, re-fetches after
//! every successful mutation, and turns failures into one message string.

mod courses;
mod dashboard;
mod enrollments;
mod students;

pub use courses::CourseCatalog;
pub use dashboard::{average_gpa, DashboardStats, DashboardSummary};
pub use enrollments::{EnrollmentManager, EnrollmentRow, EnrollmentView};
pub use students::StudentDirectory;
