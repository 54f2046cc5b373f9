#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use student_records_admin::api::{ApiError, ApiResult, CoursesApi, EnrollmentsApi, StudentsApi};
use student_records_admin::models::{
    Course, CourseUpdate, Enrollment, EnrollmentUpdate, Grade, NewCourse, NewEnrollment,
    NewStudent, Reference, Student, StudentUpdate,
};

/// In-memory backend. Clones share state, so a test can hand one copy to the
/// code under test and inspect the call log through another.
#[derive(Clone, Default)]
pub struct FakeApi {
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    students: Vec<Student>,
    courses: Vec<Course>,
    enrollments: Vec<Enrollment>,
    calls: Vec<String>,
    failures: HashMap<&'static str, Option<String>>,
    enrollment_updates: Vec<(String, EnrollmentUpdate)>,
    next_id: usize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_students(self, students: Vec<Student>) -> Self {
        self.lock().students = students;
        self
    }

    pub fn with_courses(self, courses: Vec<Course>) -> Self {
        self.lock().courses = courses;
        self
    }

    pub fn with_enrollments(self, enrollments: Vec<Enrollment>) -> Self {
        self.lock().enrollments = enrollments;
        self
    }

    /// Make every later call to `op` fail, optionally with a backend message.
    pub fn fail(&self, op: &'static str, message: Option<&str>) {
        self.lock()
            .failures
            .insert(op, message.map(str::to_string));
    }

    pub fn recover(&self, op: &'static str) {
        self.lock().failures.remove(op);
    }

    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Number of calls made to `op`, whatever the argument.
    pub fn count(&self, op: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.split(' ').next() == Some(op))
            .count()
    }

    pub fn enrollment_updates(&self) -> Vec<(String, EnrollmentUpdate)> {
        self.lock().enrollment_updates.clone()
    }

    pub fn push_enrollment(&self, enrollment: Enrollment) {
        self.lock().enrollments.push(enrollment);
    }

    pub fn stored_enrollments(&self) -> Vec<Enrollment> {
        self.lock().enrollments.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Log the call and return the injected failure, if any.
    fn begin(&self, op: &'static str, arg: &str) -> ApiResult<MutexGuard<'_, State>> {
        let mut state = self.lock();
        if arg.is_empty() {
            state.calls.push(op.to_string());
        } else {
            state.calls.push(format!("{op} {arg}"));
        }
        if let Some(message) = state.failures.get(op) {
            return Err(ApiError::Server {
                status: 500,
                message: message.clone(),
            });
        }
        Ok(state)
    }
}

fn not_found(what: &str) -> ApiError {
    ApiError::NotFound {
        message: Some(format!("{what} not found")),
    }
}

impl StudentsApi for FakeApi {
    async fn list_students(&self) -> ApiResult<Vec<Student>> {
        Ok(self.begin("list_students", "")?.students.clone())
    }

    async fn add_student(&self, student: &NewStudent) -> ApiResult<()> {
        let mut state = self.begin("add_student", &student.npm)?;
        state.students.push(Student {
            npm: student.npm.clone(),
            name: student.name.clone(),
            department: student.department.clone(),
            gpa: student.gpa,
            semester: student.semester,
        });
        Ok(())
    }

    async fn update_student(&self, npm: &str, update: &StudentUpdate) -> ApiResult<()> {
        let mut state = self.begin("update_student", npm)?;
        let student = state
            .students
            .iter_mut()
            .find(|s| s.npm == npm)
            .ok_or_else(|| not_found("Mahasiswa"))?;
        student.name = update.name.clone();
        student.department = update.department.clone();
        student.gpa = update.gpa;
        student.semester = update.semester;
        Ok(())
    }

    async fn delete_student(&self, npm: &str) -> ApiResult<()> {
        let mut state = self.begin("delete_student", npm)?;
        state.students.retain(|s| s.npm != npm);
        Ok(())
    }
}

impl CoursesApi for FakeApi {
    async fn list_courses(&self) -> ApiResult<Vec<Course>> {
        Ok(self.begin("list_courses", "")?.courses.clone())
    }

    async fn add_course(&self, course: &NewCourse) -> ApiResult<()> {
        let mut state = self.begin("add_course", &course.code)?;
        state.courses.push(Course {
            code: course.code.clone(),
            name: course.name.clone(),
            credits: course.credits,
        });
        Ok(())
    }

    async fn update_course(&self, code: &str, update: &CourseUpdate) -> ApiResult<()> {
        let mut state = self.begin("update_course", code)?;
        let course = state
            .courses
            .iter_mut()
            .find(|c| c.code == code)
            .ok_or_else(|| not_found("Matkul"))?;
        course.name = update.name.clone();
        course.credits = update.credits;
        Ok(())
    }

    async fn delete_course(&self, code: &str) -> ApiResult<()> {
        let mut state = self.begin("delete_course", code)?;
        state.courses.retain(|c| c.code != code);
        Ok(())
    }
}

impl EnrollmentsApi for FakeApi {
    async fn list_enrollments(&self) -> ApiResult<Vec<Enrollment>> {
        Ok(self.begin("list_enrollments", "")?.enrollments.clone())
    }

    async fn enrollments_for_student(&self, npm: &str) -> ApiResult<Vec<Enrollment>> {
        let state = self.begin("enrollments_for_student", npm)?;
        let found: Vec<Enrollment> = state
            .enrollments
            .iter()
            .filter(|e| e.student_npm() == npm)
            .cloned()
            .collect();
        if found.is_empty() {
            return Err(not_found("Enrollment"));
        }
        Ok(found)
    }

    async fn add_enrollment(&self, enrollment: &NewEnrollment) -> ApiResult<()> {
        let mut state = self.begin("add_enrollment", &enrollment.npm)?;
        state.next_id += 1;
        let id = format!("new-{}", state.next_id);
        state.enrollments.push(Enrollment {
            id,
            student: Reference::Id(enrollment.npm.clone()),
            course: Reference::Id(enrollment.kode_matkul.clone()),
            grade: enrollment.grade,
            enrolled_at: None,
        });
        Ok(())
    }

    async fn update_enrollment(&self, id: &str, update: &EnrollmentUpdate) -> ApiResult<()> {
        let mut state = self.begin("update_enrollment", id)?;
        state
            .enrollment_updates
            .push((id.to_string(), update.clone()));
        let enrollment = state
            .enrollments
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| not_found("Enrollment"))?;
        enrollment.grade = update.grade;
        Ok(())
    }

    async fn delete_enrollment(&self, id: &str) -> ApiResult<()> {
        let mut state = self.begin("delete_enrollment", id)?;
        state.enrollments.retain(|e| e.id != id);
        Ok(())
    }
}

pub fn student(npm: &str, name: &str, gpa: f64) -> Student {
    Student {
        npm: npm.to_string(),
        name: name.to_string(),
        department: "Informatika".to_string(),
        gpa,
        semester: 3,
    }
}

pub fn course(code: &str, name: &str, credits: u32) -> Course {
    Course {
        code: code.to_string(),
        name: name.to_string(),
        credits,
    }
}

pub fn enrollment(id: &str, npm: &str, code: &str, grade: Option<Grade>) -> Enrollment {
    Enrollment {
        id: id.to_string(),
        student: Reference::Id(npm.to_string()),
        course: Reference::Id(code.to_string()),
        grade,
        enrolled_at: None,
    }
}

/// Two students, two courses, three enrollments.
pub fn campus() -> FakeApi {
    FakeApi::new()
        .with_students(vec![
            student("2101", "Ayu Lestari", 3.0),
            student("2102", "Budi Santoso", 4.0),
        ])
        .with_courses(vec![
            course("IF101", "Algoritma", 3),
            course("IF202", "Basis Data", 4),
        ])
        .with_enrollments(vec![
            enrollment("e1", "2101", "IF101", Some(Grade::A)),
            enrollment("e2", "2101", "IF202", None),
            enrollment("e3", "2102", "IF101", Some(Grade::B)),
        ])
}
