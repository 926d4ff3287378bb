//! 表单校验
//!
//! 表单输入在界面中都是字符串。这里把它们校验并转换为类型化的请求体，
//! 以及从已有记录预填编辑表单（密码总是留空）。

use crate::protocol::{
    BranchRequest, ChangePasswordRequest, CourseRequest, StudentRequest, TeacherRequest,
};
use crate::{ApiError, Branch, Course, Student, Teacher};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct FormError {
    pub field: &'static str,
    pub reason: String,
}

impl FormError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

pub type FormResult<T> = Result<T, FormError>;

/// 表单模式：创建或编辑指定 id 的记录
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Create,
    Edit(i64),
}

impl FormMode {
    pub fn is_edit(&self) -> bool {
        matches!(self, FormMode::Edit(_))
    }
}

fn required(field: &'static str, value: &str) -> FormResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FormError::new(field, "is required"));
    }
    Ok(value.to_string())
}

fn parse_id(field: &'static str, value: &str) -> FormResult<i64> {
    required(field, value)?
        .parse::<i64>()
        .map_err(|_| FormError::new(field, "must be selected"))
}

fn email(value: &str) -> FormResult<String> {
    let value = required("email", value)?;
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(value),
        _ => Err(FormError::new("email", "is not a valid email address")),
    }
}

/// 仅在创建时要求密码，编辑时总是省略
fn password_for(mode: FormMode, value: &str) -> FormResult<Option<String>> {
    match mode {
        FormMode::Edit(_) => Ok(None),
        FormMode::Create if value.is_empty() => Err(FormError::new("password", "is required")),
        FormMode::Create => Ok(Some(value.to_string())),
    }
}

// =========================================================
// Branch
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BranchForm {
    pub name: String,
}

impl BranchForm {
    pub fn from_branch(branch: &Branch) -> Self {
        Self {
            name: branch.name.clone(),
        }
    }

    pub fn validate(&self) -> FormResult<BranchRequest> {
        Ok(BranchRequest {
            name: required("name", &self.name)?,
        })
    }
}

// =========================================================
// Course
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CourseForm {
    pub course_name: String,
    pub course_code: String,
    pub credits: String,
}

impl CourseForm {
    pub fn from_course(course: &Course) -> Self {
        Self {
            course_name: course.course_name.clone(),
            course_code: course.course_code.clone(),
            credits: course.credits.to_string(),
        }
    }

    pub fn validate(&self) -> FormResult<CourseRequest> {
        let credits = required("credits", &self.credits)?
            .parse::<i32>()
            .ok()
            .filter(|c| *c > 0)
            .ok_or_else(|| FormError::new("credits", "must be a positive whole number"))?;

        Ok(CourseRequest {
            course_name: required("courseName", &self.course_name)?,
            course_code: required("courseCode", &self.course_code)?,
            credits,
        })
    }
}

// =========================================================
// Student
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StudentForm {
    pub usn: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub year: String,
    pub section: String,
    pub branch_id: String,
}

impl StudentForm {
    pub fn from_student(student: &Student) -> Self {
        Self {
            usn: student.usn.clone(),
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone().unwrap_or_default(),
            email: student.email.clone(),
            password: String::new(),
            year: student.year.to_string(),
            section: student.section.clone(),
            branch_id: student.branch.id.to_string(),
        }
    }

    pub fn validate(&self, mode: FormMode) -> FormResult<StudentRequest> {
        let year = required("year", &self.year)?
            .parse::<i32>()
            .ok()
            .filter(|y| (1..=4).contains(y))
            .ok_or_else(|| FormError::new("year", "must be between 1 and 4"))?;

        Ok(StudentRequest {
            usn: required("usn", &self.usn)?,
            first_name: required("firstName", &self.first_name)?,
            last_name: self.last_name.trim().to_string(),
            email: email(&self.email)?,
            password: password_for(mode, &self.password)?,
            year,
            section: required("section", &self.section)?,
            branch_id: parse_id("branchId", &self.branch_id)?,
        })
    }
}

// =========================================================
// Teacher
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TeacherForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub branch_id: String,
}

impl TeacherForm {
    pub fn from_teacher(teacher: &Teacher) -> Self {
        Self {
            first_name: teacher.first_name.clone(),
            last_name: teacher.last_name.clone().unwrap_or_default(),
            email: teacher.email.clone(),
            password: String::new(),
            branch_id: teacher.branch.id.to_string(),
        }
    }

    pub fn validate(&self, mode: FormMode) -> FormResult<TeacherRequest> {
        Ok(TeacherRequest {
            first_name: required("firstName", &self.first_name)?,
            last_name: self.last_name.trim().to_string(),
            email: email(&self.email)?,
            password: password_for(mode, &self.password)?,
            branch_id: parse_id("branchId", &self.branch_id)?,
        })
    }
}

// =========================================================
// Change password
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangePasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirmation_password: String,
}

impl ChangePasswordForm {
    pub fn validate(&self) -> FormResult<ChangePasswordRequest> {
        if self.current_password.is_empty() {
            return Err(FormError::new("currentPassword", "is required"));
        }
        if self.new_password.is_empty() {
            return Err(FormError::new("newPassword", "is required"));
        }
        if self.new_password != self.confirmation_password {
            return Err(FormError::new("confirmationPassword", "does not match"));
        }
        if self.new_password == self.current_password {
            return Err(FormError::new(
                "newPassword",
                "must differ from the current password",
            ));
        }
        Ok(ChangePasswordRequest {
            current_password: self.current_password.clone(),
            new_password: self.new_password.clone(),
            confirmation_password: self.confirmation_password.clone(),
        })
    }

    /// 修改密码失败时应在表单内展示的提示
    ///
    /// 当前密码错误时服务端可能返回 400、403 或 500。会话仍有效时
    /// 403 只说明密码不对，不应注销；返回 `None` 的错误交给全局处理。
    pub fn failure_message(err: &ApiError, session_expired: bool) -> Option<String> {
        match err {
            ApiError::Unauthorized if !session_expired => Some(WRONG_PASSWORD.to_string()),
            ApiError::Status { status: 400, .. } => Some(err.user_message()),
            ApiError::Status { status: 500, .. } => Some(WRONG_PASSWORD.to_string()),
            _ => None,
        }
    }
}

const WRONG_PASSWORD: &str = "Current password is incorrect";

#[cfg(test)]
mod tests {
    use super::*;

    fn student_form() -> StudentForm {
        StudentForm {
            usn: " 1RV21CS001 ".to_string(),
            first_name: "Asha".to_string(),
            last_name: "".to_string(),
            email: "asha@sgm.com".to_string(),
            password: "secret".to_string(),
            year: "2".to_string(),
            section: "B".to_string(),
            branch_id: "3".to_string(),
        }
    }

    #[test]
    fn test_branch_name_required() {
        let form = BranchForm {
            name: "   ".to_string(),
        };
        assert_eq!(form.validate().unwrap_err().field, "name");
        let form = BranchForm {
            name: " CSE ".to_string(),
        };
        assert_eq!(form.validate().unwrap().name, "CSE");
    }

    #[test]
    fn test_course_credits_must_be_positive() {
        let mut form = CourseForm {
            course_name: "Java".to_string(),
            course_code: "CS101".to_string(),
            credits: "0".to_string(),
        };
        assert_eq!(form.validate().unwrap_err().field, "credits");
        form.credits = "four".to_string();
        assert_eq!(form.validate().unwrap_err().field, "credits");
        form.credits = "4".to_string();
        assert_eq!(form.validate().unwrap().credits, 4);
    }

    #[test]
    fn test_student_create_requires_password() {
        let mut form = student_form();
        let req = form.validate(FormMode::Create).unwrap();
        assert_eq!(req.usn, "1RV21CS001");
        assert_eq!(req.password.as_deref(), Some("secret"));
        assert_eq!(req.branch_id, 3);
        assert_eq!(req.year, 2);

        form.password.clear();
        assert_eq!(
            form.validate(FormMode::Create).unwrap_err(),
            FormError::new("password", "is required")
        );
    }

    #[test]
    fn test_student_edit_omits_password() {
        let form = student_form();
        let req = form.validate(FormMode::Edit(7)).unwrap();
        assert_eq!(req.password, None);
    }

    #[test]
    fn test_student_field_errors() {
        let mut form = student_form();
        form.year = "5".to_string();
        assert_eq!(form.validate(FormMode::Create).unwrap_err().field, "year");

        let mut form = student_form();
        form.branch_id = String::new();
        assert_eq!(form.validate(FormMode::Create).unwrap_err().field, "branchId");

        let mut form = student_form();
        form.email = "not-an-email".to_string();
        assert_eq!(form.validate(FormMode::Create).unwrap_err().field, "email");
    }

    #[test]
    fn test_prefill_from_records_leaves_password_blank() {
        let branch = Branch {
            id: 3,
            name: "CSE".to_string(),
        };
        let teacher = Teacher {
            id: 1,
            first_name: "Meera".to_string(),
            last_name: None,
            email: "meera@sgm.com".to_string(),
            branch: branch.clone(),
        };
        let form = TeacherForm::from_teacher(&teacher);
        assert_eq!(form.branch_id, "3");
        assert!(form.password.is_empty());
        assert_eq!(form.validate(FormMode::Edit(1)).unwrap().password, None);
        assert!(form.validate(FormMode::Create).is_err());

        let student = Student {
            id: 9,
            usn: "1RV21CS009".to_string(),
            first_name: "Kiran".to_string(),
            last_name: Some("N".to_string()),
            email: "kiran@sgm.com".to_string(),
            year: 3,
            section: "C".to_string(),
            branch,
            courses: Vec::new(),
        };
        let form = StudentForm::from_student(&student);
        assert_eq!(form.year, "3");
        assert_eq!(form.last_name, "N");
        assert!(form.password.is_empty());
    }

    #[test]
    fn test_change_password_rules() {
        let mut form = ChangePasswordForm {
            current_password: "old".to_string(),
            new_password: "new-pass".to_string(),
            confirmation_password: "new-pas".to_string(),
        };
        assert_eq!(form.validate().unwrap_err().field, "confirmationPassword");

        form.confirmation_password = "new-pass".to_string();
        assert!(form.validate().is_ok());

        form.new_password = "old".to_string();
        form.confirmation_password = "old".to_string();
        assert_eq!(form.validate().unwrap_err().field, "newPassword");
    }

    #[test]
    fn test_form_error_display() {
        let err = FormError::new("year", "must be between 1 and 4");
        assert_eq!(err.to_string(), "year: must be between 1 and 4");
    }

    #[test]
    fn test_change_password_failures_stay_on_the_form() {
        let forbidden = ApiError::Unauthorized;
        assert_eq!(
            ChangePasswordForm::failure_message(&forbidden, false).as_deref(),
            Some("Current password is incorrect")
        );
        assert_eq!(ChangePasswordForm::failure_message(&forbidden, true), None);

        let bad_request = ApiError::Status {
            status: 400,
            message: "Passwords are not the same".to_string(),
        };
        assert_eq!(
            ChangePasswordForm::failure_message(&bad_request, false).as_deref(),
            Some("Passwords are not the same")
        );

        let server_error = ApiError::Status {
            status: 500,
            message: "Internal Server Error".to_string(),
        };
        assert!(ChangePasswordForm::failure_message(&server_error, false).is_some());

        let offline = ApiError::Network("connection refused".to_string());
        assert_eq!(ChangePasswordForm::failure_message(&offline, false), None);
    }
}
