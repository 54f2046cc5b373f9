use reqwest::Method;

use super::client::HttpApi;
use super::error::ApiResult;
use crate::models::{NewStudent, Student, StudentUpdate};

/// Student ("mahasiswa") endpoints.
#[allow(async_fn_in_trait)]
pub trait StudentsApi {
    async fn list_students(&self) -> ApiResult<Vec<Student>>;
    async fn add_student(&self, student: &NewStudent) -> ApiResult<()>;
    async fn update_student(&self, npm: &str, update: &StudentUpdate) -> ApiResult<()>;
    async fn delete_student(&self, npm: &str) -> ApiResult<()>;
}

impl StudentsApi for HttpApi {
    async fn list_students(&self) -> ApiResult<Vec<Student>> {
        self.get_list(self.endpoint(&["api", "mahasiswa", "getMahasiswa"]))
            .await
    }

    async fn add_student(&self, student: &NewStudent) -> ApiResult<()> {
        let url = self.endpoint(&["api", "mahasiswa", "addMahasiswa"]);
        self.send(Method::POST, url, Some(student)).await
    }

    async fn update_student(&self, npm: &str, update: &StudentUpdate) -> ApiResult<()> {
        let url = self.endpoint(&["api", "mahasiswa", "updateMahasiswa", npm]);
        self.send(Method::PUT, url, Some(update)).await
    }

    async fn delete_student(&self, npm: &str) -> ApiResult<()> {
        let url = self.endpoint(&["api", "mahasiswa", "deleteMahasiswa", npm]);
        self.send::<()>(Method::DELETE, url, None).await
    }
}
