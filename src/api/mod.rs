//! REST access split by endpoint group, one trait per group so the page
//! controllers only ask for what they touch.

mod client;
mod courses;
mod enrollments;
mod error;
mod students;

pub use client::HttpApi;
pub use courses::CoursesApi;
pub use enrollments::EnrollmentsApi;
pub use error::{ApiError, ApiResult};
pub use students::StudentsApi;

/// Everything the terminal front-end needs from one backend.
pub trait RecordsApi: StudentsApi + CoursesApi + EnrollmentsApi {}

impl<T: StudentsApi + CoursesApi + EnrollmentsApi> RecordsApi for T {}
