use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{
    Course, CourseUpdate, Enrollment, Grade, NewCourse, NewEnrollment, NewStudent, Student,
    StudentUpdate, CREDITS_RANGE, GPA_MAX, GPA_MIN, SEMESTER_RANGE,
};

/// Render one `Label: value` form line. Locked fields are shown but dimmed.
fn field_line(
    field_name: &str,
    value: &str,
    placeholder: &str,
    is_active: bool,
    locked: bool,
) -> Line<'static> {
    let display = if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    };

    let style = if locked {
        Style::default().fg(Color::DarkGray)
    } else if is_active {
        Style::default().fg(Color::Yellow)
    } else if value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    let mut spans = vec![
        Span::raw(format!("{field_name}: ")),
        Span::styled(display, style),
    ];
    if locked {
        spans.push(Span::styled(
            "  (locked)",
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

fn required<'a>(value: &'a str, message: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(anyhow!("{message}"))
    } else {
        Ok(trimmed)
    }
}

/// Fields of the student form, in tab order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum StudentField {
    #[default]
    Npm,
    Name,
    Department,
    Gpa,
    Semester,
}

impl StudentField {
    pub(crate) const ORDER: [StudentField; 5] = [
        StudentField::Npm,
        StudentField::Name,
        StudentField::Department,
        StudentField::Gpa,
        StudentField::Semester,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            StudentField::Npm => "NPM",
            StudentField::Name => "Nama",
            StudentField::Department => "Jurusan",
            StudentField::Gpa => "IPK",
            StudentField::Semester => "Semester",
        }
    }
}

/// Buffer behind the add/edit student dialog.
#[derive(Default, Clone, Debug)]
pub(crate) struct StudentForm {
    pub(crate) npm: String,
    pub(crate) name: String,
    pub(crate) department: String,
    pub(crate) gpa: String,
    pub(crate) semester: String,
    pub(crate) active: StudentField,
    /// Set in edit mode: the student number cannot change.
    pub(crate) npm_locked: bool,
    pub(crate) error: Option<String>,
}

impl StudentForm {
    pub(crate) fn from_student(student: &Student) -> Self {
        Self {
            npm: student.npm.clone(),
            name: student.name.clone(),
            department: student.department.clone(),
            gpa: student.gpa.to_string(),
            semester: student.semester.to_string(),
            active: StudentField::Name,
            npm_locked: true,
            error: None,
        }
    }

    pub(crate) fn toggle_field(&mut self, forward: bool) {
        let order = &StudentField::ORDER;
        let mut idx = order.iter().position(|f| *f == self.active).unwrap_or(0);
        loop {
            idx = if forward {
                (idx + 1) % order.len()
            } else {
                (idx + order.len() - 1) % order.len()
            };
            if !(self.npm_locked && order[idx] == StudentField::Npm) {
                break;
            }
        }
        self.active = order[idx];
    }

    fn value_mut(&mut self, field: StudentField) -> &mut String {
        match field {
            StudentField::Npm => &mut self.npm,
            StudentField::Name => &mut self.name,
            StudentField::Department => &mut self.department,
            StudentField::Gpa => &mut self.gpa,
            StudentField::Semester => &mut self.semester,
        }
    }

    pub(crate) fn value(&self, field: StudentField) -> &str {
        match field {
            StudentField::Npm => &self.npm,
            StudentField::Name => &self.name,
            StudentField::Department => &self.department,
            StudentField::Gpa => &self.gpa,
            StudentField::Semester => &self.semester,
        }
    }

    /// Append a character to the active field. Numeric fields only take
    /// digits (and one decimal point for the GPA).
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        let accepted = match self.active {
            StudentField::Npm => !self.npm_locked && !ch.is_whitespace(),
            StudentField::Name | StudentField::Department => true,
            StudentField::Gpa => {
                ch.is_ascii_digit() || (matches!(ch, '.' | ',') && !self.gpa.contains('.'))
            }
            StudentField::Semester => ch.is_ascii_digit(),
        };
        if accepted {
            let ch = if ch == ',' { '.' } else { ch };
            self.value_mut(self.active).push(ch);
        }
        accepted
    }

    pub(crate) fn backspace(&mut self) {
        if self.npm_locked && self.active == StudentField::Npm {
            return;
        }
        self.value_mut(self.active).pop();
    }

    fn parse_common(&self) -> Result<(String, String, f64, u32)> {
        let name = required(&self.name, "Nama is required.")?;
        let department = required(&self.department, "Jurusan is required.")?;
        let gpa: f64 = required(&self.gpa, "IPK is required.")?
            .parse()
            .map_err(|_| anyhow!("IPK must be a number."))?;
        if !(GPA_MIN..=GPA_MAX).contains(&gpa) {
            return Err(anyhow!("IPK must be between {GPA_MIN:.1} and {GPA_MAX:.1}."));
        }
        let semester: u32 = required(&self.semester, "Semester is required.")?
            .parse()
            .map_err(|_| anyhow!("Semester must be a whole number."))?;
        if !SEMESTER_RANGE.contains(&semester) {
            return Err(anyhow!(
                "Semester must be between {} and {}.",
                SEMESTER_RANGE.start(),
                SEMESTER_RANGE.end()
            ));
        }
        Ok((name.to_string(), department.to_string(), gpa, semester))
    }

    pub(crate) fn parse_new(&self) -> Result<NewStudent> {
        let npm = required(&self.npm, "NPM is required.")?.to_string();
        let (name, department, gpa, semester) = self.parse_common()?;
        Ok(NewStudent {
            npm,
            name,
            department,
            gpa,
            semester,
        })
    }

    pub(crate) fn parse_update(&self) -> Result<StudentUpdate> {
        let (name, department, gpa, semester) = self.parse_common()?;
        Ok(StudentUpdate {
            name,
            department,
            gpa,
            semester,
        })
    }

    pub(crate) fn build_line(&self, field: StudentField) -> Line<'static> {
        field_line(
            field.label(),
            self.value(field),
            "<required>",
            self.active == field,
            self.npm_locked && field == StudentField::Npm,
        )
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum CourseField {
    #[default]
    Code,
    Name,
    Credits,
}

impl CourseField {
    pub(crate) const ORDER: [CourseField; 3] =
        [CourseField::Code, CourseField::Name, CourseField::Credits];

    pub(crate) fn label(self) -> &'static str {
        match self {
            CourseField::Code => "Kode",
            CourseField::Name => "Nama",
            CourseField::Credits => "SKS",
        }
    }
}

/// Buffer behind the add/edit course dialog.
#[derive(Default, Clone, Debug)]
pub(crate) struct CourseForm {
    pub(crate) code: String,
    pub(crate) name: String,
    pub(crate) credits: String,
    pub(crate) active: CourseField,
    pub(crate) code_locked: bool,
    pub(crate) error: Option<String>,
}

impl CourseForm {
    pub(crate) fn from_course(course: &Course) -> Self {
        Self {
            code: course.code.clone(),
            name: course.name.clone(),
            credits: course.credits.to_string(),
            active: CourseField::Name,
            code_locked: true,
            error: None,
        }
    }

    pub(crate) fn toggle_field(&mut self, forward: bool) {
        self.active = match (self.active, forward) {
            (CourseField::Code, true) => CourseField::Name,
            (CourseField::Name, true) => CourseField::Credits,
            (CourseField::Credits, true) => CourseField::Code,
            (CourseField::Code, false) => CourseField::Credits,
            (CourseField::Name, false) => CourseField::Code,
            (CourseField::Credits, false) => CourseField::Name,
        };
        if self.code_locked && self.active == CourseField::Code {
            self.toggle_field(forward);
        }
    }

    pub(crate) fn value(&self, field: CourseField) -> &str {
        match field {
            CourseField::Code => &self.code,
            CourseField::Name => &self.name,
            CourseField::Credits => &self.credits,
        }
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            CourseField::Code if !self.code_locked && !ch.is_whitespace() => self.code.push(ch),
            CourseField::Name => self.name.push(ch),
            CourseField::Credits if ch.is_ascii_digit() => self.credits.push(ch),
            _ => return false,
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            CourseField::Code => {
                if !self.code_locked {
                    self.code.pop();
                }
            }
            CourseField::Name => {
                self.name.pop();
            }
            CourseField::Credits => {
                self.credits.pop();
            }
        }
    }

    fn parse_common(&self) -> Result<(String, u32)> {
        let name = required(&self.name, "Nama is required.")?;
        let credits: u32 = required(&self.credits, "SKS is required.")?
            .parse()
            .map_err(|_| anyhow!("SKS must be a whole number."))?;
        if !CREDITS_RANGE.contains(&credits) {
            return Err(anyhow!(
                "SKS must be between {} and {}.",
                CREDITS_RANGE.start(),
                CREDITS_RANGE.end()
            ));
        }
        Ok((name.to_string(), credits))
    }

    pub(crate) fn parse_new(&self) -> Result<NewCourse> {
        let code = required(&self.code, "Kode is required.")?.to_string();
        let (name, credits) = self.parse_common()?;
        Ok(NewCourse {
            code,
            name,
            credits,
        })
    }

    pub(crate) fn parse_update(&self) -> Result<CourseUpdate> {
        let (name, credits) = self.parse_common()?;
        Ok(CourseUpdate { name, credits })
    }

    pub(crate) fn build_line(&self, field: CourseField) -> Line<'static> {
        field_line(
            field.label(),
            self.value(field),
            "<required>",
            self.active == field,
            self.code_locked && field == CourseField::Code,
        )
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum EnrollmentField {
    #[default]
    Student,
    Course,
    Grade,
}

/// Buffer behind the enrollment dialog. Student and course are picked from
/// the loaded lists with Left/Right instead of typed.
#[derive(Default, Clone, Debug)]
pub(crate) struct EnrollmentForm {
    pub(crate) npm: Option<String>,
    pub(crate) course_code: Option<String>,
    pub(crate) grade: Option<Grade>,
    pub(crate) active: EnrollmentField,
    /// Edit mode: only the grade may change.
    pub(crate) locked: bool,
    pub(crate) error: Option<String>,
}

/// Step through `keys` starting from `current`, wrapping at both ends.
fn cycle_key<'a>(keys: &[&'a str], current: Option<&str>, step: isize) -> Option<&'a str> {
    if keys.is_empty() {
        return None;
    }
    let len = keys.len() as isize;
    let next = match current.and_then(|c| keys.iter().position(|k| *k == c)) {
        Some(pos) => (pos as isize + step).rem_euclid(len),
        None if step >= 0 => 0,
        None => len - 1,
    };
    Some(keys[next as usize])
}

impl EnrollmentForm {
    /// New enrollment, optionally preselecting a student.
    pub(crate) fn for_student(npm: Option<&str>) -> Self {
        Self {
            npm: npm.map(str::to_string),
            active: if npm.is_some() {
                EnrollmentField::Course
            } else {
                EnrollmentField::Student
            },
            ..Self::default()
        }
    }

    pub(crate) fn from_enrollment(enrollment: &Enrollment) -> Self {
        Self {
            npm: Some(enrollment.student_npm().to_string()),
            course_code: Some(enrollment.course_code().to_string()),
            grade: enrollment.grade,
            active: EnrollmentField::Grade,
            locked: true,
            error: None,
        }
    }

    pub(crate) fn toggle_field(&mut self, forward: bool) {
        if self.locked {
            self.active = EnrollmentField::Grade;
            return;
        }
        self.active = match (self.active, forward) {
            (EnrollmentField::Student, true) => EnrollmentField::Course,
            (EnrollmentField::Course, true) => EnrollmentField::Grade,
            (EnrollmentField::Grade, true) => EnrollmentField::Student,
            (EnrollmentField::Student, false) => EnrollmentField::Grade,
            (EnrollmentField::Course, false) => EnrollmentField::Student,
            (EnrollmentField::Grade, false) => EnrollmentField::Course,
        };
    }

    /// Move the active selection by `step` through its options.
    pub(crate) fn cycle(&mut self, step: isize, students: &[Student], courses: &[Course]) {
        match self.active {
            EnrollmentField::Student if !self.locked => {
                let keys: Vec<&str> = students.iter().map(|s| s.npm.as_str()).collect();
                self.npm = cycle_key(&keys, self.npm.as_deref(), step).map(str::to_string);
            }
            EnrollmentField::Course if !self.locked => {
                let keys: Vec<&str> = courses.iter().map(|c| c.code.as_str()).collect();
                self.course_code =
                    cycle_key(&keys, self.course_code.as_deref(), step).map(str::to_string);
            }
            EnrollmentField::Grade => {
                let options: Vec<Option<Grade>> = std::iter::once(None)
                    .chain(Grade::ALL.into_iter().map(Some))
                    .collect();
                let pos = options.iter().position(|g| *g == self.grade).unwrap_or(0) as isize;
                let next = (pos + step).rem_euclid(options.len() as isize) as usize;
                self.grade = options[next];
            }
            _ => {}
        }
    }

    /// Accept a typed grade letter, or space/backspace to clear it.
    pub(crate) fn type_grade(&mut self, ch: char) -> bool {
        if self.active != EnrollmentField::Grade {
            return false;
        }
        if ch == ' ' {
            self.grade = None;
            return true;
        }
        match ch.to_string().parse::<Grade>() {
            Ok(grade) => {
                self.grade = Some(grade);
                true
            }
            Err(_) => false,
        }
    }

    pub(crate) fn parse_new(&self) -> Result<NewEnrollment> {
        let npm = self
            .npm
            .clone()
            .ok_or_else(|| anyhow!("Select a mahasiswa."))?;
        let kode_matkul = self
            .course_code
            .clone()
            .ok_or_else(|| anyhow!("Select a matkul."))?;
        Ok(NewEnrollment {
            npm,
            kode_matkul,
            grade: self.grade,
        })
    }

    pub(crate) fn build_lines(&self, students: &[Student], courses: &[Course]) -> Vec<Line<'static>> {
        let student_text = self
            .npm
            .as_deref()
            .map(|npm| match students.iter().find(|s| s.npm == npm) {
                Some(student) => student.to_string(),
                None => npm.to_string(),
            })
            .unwrap_or_default();
        let course_text = self
            .course_code
            .as_deref()
            .map(|code| match courses.iter().find(|c| c.code == code) {
                Some(course) => format!("{course} ({} SKS)", course.credits),
                None => code.to_string(),
            })
            .unwrap_or_default();
        let grade_text = self.grade.map(|g| g.to_string()).unwrap_or_default();

        vec![
            field_line(
                "Mahasiswa",
                &student_text,
                "<select with ←/→>",
                self.active == EnrollmentField::Student,
                self.locked,
            ),
            field_line(
                "Matkul",
                &course_text,
                "<select with ←/→>",
                self.active == EnrollmentField::Course,
                self.locked,
            ),
            field_line(
                "Nilai",
                &grade_text,
                "<not graded>",
                self.active == EnrollmentField::Grade,
                false,
            ),
        ]
    }
}

/// Confirmation dialog shown before any delete. The page controller holds the
/// pending id; this only carries the text.
#[derive(Clone, Debug)]
pub(crate) struct ConfirmDelete {
    pub(crate) title: &'static str,
    pub(crate) prompt: String,
}
