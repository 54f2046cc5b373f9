use reqwest::Method;

use super::client::HttpApi;
use super::error::ApiResult;
use crate::models::{Course, CourseUpdate, NewCourse};

/// Course ("matkul") endpoints.
#[allow(async_fn_in_trait)]
pub trait CoursesApi {
    async fn list_courses(&self) -> ApiResult<Vec<Course>>;
    async fn add_course(&self, course: &NewCourse) -> ApiResult<()>;
    async fn update_course(&self, code: &str, update: &CourseUpdate) -> ApiResult<()>;
    async fn delete_course(&self, code: &str) -> ApiResult<()>;
}

impl CoursesApi for HttpApi {
    async fn list_courses(&self) -> ApiResult<Vec<Course>> {
        self.get_list(self.endpoint(&["api", "matkul", "getMatkul"]))
            .await
    }

    async fn add_course(&self, course: &NewCourse) -> ApiResult<()> {
        let url = self.endpoint(&["api", "matkul", "addMatkul"]);
        self.send(Method::POST, url, Some(course)).await
    }

    async fn update_course(&self, code: &str, update: &CourseUpdate) -> ApiResult<()> {
        let url = self.endpoint(&["api", "matkul", "updateMatkul", code]);
        self.send(Method::PUT, url, Some(update)).await
    }

    async fn delete_course(&self, code: &str) -> ApiResult<()> {
        let url = self.endpoint(&["api", "matkul", "deleteMatkul", code]);
        self.send::<()>(Method::DELETE, url, None).await
    }
}
