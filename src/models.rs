//! Domain models that mirror the JSON documents served by the student-records
//! backend. The types stay light-weight data holders so the page controllers
//! and the terminal front-end can focus on presentation and request flow. Wire
//! names follow the backend (`npm`, `nama`, `IPK`, ...) while the Rust fields
//! use descriptive English names.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Lowest accepted cumulative GPA.
pub const GPA_MIN: f64 = 0.0;
/// Highest accepted cumulative GPA.
pub const GPA_MAX: f64 = 4.0;
/// Valid semester numbers.
pub const SEMESTER_RANGE: std::ops::RangeInclusive<u32> = 1..=14;
/// Valid credit (SKS) weights for a course.
pub const CREDITS_RANGE: std::ops::RangeInclusive<u32> = 1..=6;

/// Anything that is addressed by a natural key on the backend.
pub trait Keyed {
    fn key(&self) -> &str;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// A student ("Mahasiswa"). The `npm` is the unique student number and never
/// changes after creation; every other field can be edited.
pub struct Student {
    /// Student number, used as the path id for update/delete.
    pub npm: String,
    #[serde(rename = "nama", default)]
    pub name: String,
    #[serde(rename = "jurusan", default)]
    pub department: String,
    /// Cumulative GPA (IPK) on the 0.0–4.0 scale.
    #[serde(rename = "IPK", default)]
    pub gpa: f64,
    #[serde(default)]
    pub semester: u32,
}

impl Keyed for Student {
    fn key(&self) -> &str {
        &self.npm
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.npm)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// A course ("Matkul"), addressed by its immutable course code.
pub struct Course {
    #[serde(rename = "kode")]
    pub code: String,
    #[serde(rename = "nama", default)]
    pub name: String,
    /// Credit-hour weight (SKS).
    #[serde(rename = "sks", default)]
    pub credits: u32,
}

impl Keyed for Course {
    fn key(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code, self.name)
    }
}

/// Letter grade attached to an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
}

impl Grade {
    pub const ALL: [Grade; 5] = [Grade::A, Grade::B, Grade::C, Grade::D, Grade::E];

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Grade::A),
            "B" => Ok(Grade::B),
            "C" => Ok(Grade::C),
            "D" => Ok(Grade::D),
            "E" => Ok(Grade::E),
            other => Err(format!("unknown grade {other:?}")),
        }
    }
}

/// Text shown wherever an enrollment has no grade yet.
pub fn grade_label(grade: Option<Grade>) -> &'static str {
    grade.map(Grade::as_str).unwrap_or("Not graded")
}

/// A reference from an enrollment to another entity. Depending on the
/// endpoint the backend either embeds the joined document or only sends the
/// raw identifier, so both shapes are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference<T> {
    Joined(T),
    Id(String),
}

impl<T: Keyed> Reference<T> {
    /// The natural key regardless of whether the document was joined.
    pub fn key(&self) -> &str {
        match self {
            Reference::Joined(item) => item.key(),
            Reference::Id(id) => id,
        }
    }

    pub fn joined(&self) -> Option<&T> {
        match self {
            Reference::Joined(item) => Some(item),
            Reference::Id(_) => None,
        }
    }

    /// Resolve the referenced entity, preferring the backend's joined copy and
    /// falling back to a lookup in a locally loaded list.
    pub fn resolve<'a>(&'a self, local: &'a [T]) -> Option<&'a T> {
        self.joined()
            .or_else(|| local.iter().find(|item| item.key() == self.key()))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
/// The relation binding one student to one course. Student and course are
/// fixed once created; only the grade is editable.
pub struct Enrollment {
    /// System-generated identifier.
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "npm")]
    pub student: Reference<Student>,
    #[serde(rename = "kode_matkul")]
    pub course: Reference<Course>,
    #[serde(rename = "nilai", default, deserialize_with = "deserialize_grade")]
    pub grade: Option<Grade>,
    #[serde(rename = "tanggal_enrollment", default)]
    pub enrolled_at: Option<DateTime<Utc>>,
}

impl Enrollment {
    pub fn student_npm(&self) -> &str {
        self.student.key()
    }

    pub fn course_code(&self) -> &str {
        self.course.key()
    }
}

/// `nilai` may be missing, `null`, or an empty string when ungraded.
fn deserialize_grade<'de, D>(deserializer: D) -> Result<Option<Grade>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Body for `POST /api/mahasiswa/addMahasiswa`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewStudent {
    pub npm: String,
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "jurusan")]
    pub department: String,
    #[serde(rename = "IPK")]
    pub gpa: f64,
    pub semester: u32,
}

/// Body for `PUT /api/mahasiswa/updateMahasiswa/{npm}`; the id travels in the
/// path only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentUpdate {
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "jurusan")]
    pub department: String,
    #[serde(rename = "IPK")]
    pub gpa: f64,
    pub semester: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCourse {
    #[serde(rename = "kode")]
    pub code: String,
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "sks")]
    pub credits: u32,
}

/// Update body for a course. Uses the same `nama` key as creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseUpdate {
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "sks")]
    pub credits: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEnrollment {
    pub npm: String,
    pub kode_matkul: String,
    #[serde(rename = "nilai", skip_serializing_if = "Option::is_none")]
    pub grade: Option<Grade>,
}

/// Update body for an enrollment. The student and course keys are echoed back
/// unchanged; `nilai: null` clears the grade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrollmentUpdate {
    pub npm: String,
    pub kode_matkul: String,
    #[serde(rename = "nilai")]
    pub grade: Option<Grade>,
}

impl EnrollmentUpdate {
    /// Build an update that only changes the grade of `enrollment`.
    pub fn regrade(enrollment: &Enrollment, grade: Option<Grade>) -> Self {
        Self {
            npm: enrollment.student_npm().to_string(),
            kode_matkul: enrollment.course_code().to_string(),
            grade,
        }
    }
}
