use reqwest::Method;

use super::client::HttpApi;
use super::error::ApiResult;
use crate::models::{Enrollment, EnrollmentUpdate, NewEnrollment};

/// Enrollment endpoints, including the per-student lookup.
#[allow(async_fn_in_trait)]
pub trait EnrollmentsApi {
    async fn list_enrollments(&self) -> ApiResult<Vec<Enrollment>>;
    async fn enrollments_for_student(&self, npm: &str) -> ApiResult<Vec<Enrollment>>;
    async fn add_enrollment(&self, enrollment: &NewEnrollment) -> ApiResult<()>;
    async fn update_enrollment(&self, id: &str, update: &EnrollmentUpdate) -> ApiResult<()>;
    async fn delete_enrollment(&self, id: &str) -> ApiResult<()>;
}

impl EnrollmentsApi for HttpApi {
    async fn list_enrollments(&self) -> ApiResult<Vec<Enrollment>> {
        self.get_list(self.endpoint(&["api", "enrollment", "getAllEnrollments"]))
            .await
    }

    async fn enrollments_for_student(&self, npm: &str) -> ApiResult<Vec<Enrollment>> {
        self.get_list(self.endpoint(&["api", "enrollment", "getEnrollmentByNPM", npm]))
            .await
    }

    async fn add_enrollment(&self, enrollment: &NewEnrollment) -> ApiResult<()> {
        let url = self.endpoint(&["api", "enrollment", "addEnrollment"]);
        self.send(Method::POST, url, Some(enrollment)).await
    }

    async fn update_enrollment(&self, id: &str, update: &EnrollmentUpdate) -> ApiResult<()> {
        let url = self.endpoint(&["api", "enrollment", "updateEnrollment", id]);
        self.send(Method::PUT, url, Some(update)).await
    }

    async fn delete_enrollment(&self, id: &str) -> ApiResult<()> {
        let url = self.endpoint(&["api", "enrollment", "deleteEnrollment", id]);
        self.send::<()>(Method::DELETE, url, None).await
    }
}
