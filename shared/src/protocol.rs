//! Typed endpoint definitions.
//!
//! Every REST endpoint is a request type implementing [`ApiRequest`]. The
//! request value itself is the JSON body for methods that carry one; path
//! parameters are marked `#[serde(skip)]` so they never leak into the body.

use crate::{AttendanceRecord, Branch, Course, GradeResponse, LoginResponse, Student, Teacher};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether requests with this method send the serialized request as body.
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// The URL path relative to the API base, always starting with `/`.
    fn path(&self) -> String;
}

/// Declares a body-less request without path parameters.
macro_rules! unit_request {
    ($(#[$meta:meta])* $name:ident, $method:ident, $path:literal, $resp:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Serialize)]
        pub struct $name;

        impl ApiRequest for $name {
            type Response = $resp;
            const METHOD: HttpMethod = HttpMethod::$method;
            fn path(&self) -> String {
                $path.to_string()
            }
        }
    };
}

/// Declares a request whose only field is the `id` path parameter.
macro_rules! id_request {
    ($(#[$meta:meta])* $name:ident, $method:ident, $prefix:literal, $resp:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Serialize)]
        pub struct $name {
            #[serde(skip)]
            pub id: i64,
        }

        impl ApiRequest for $name {
            type Response = $resp;
            const METHOD: HttpMethod = HttpMethod::$method;
            fn path(&self) -> String {
                format!("{}/{}", $prefix, self.id)
            }
        }
    };
}

// =========================================================
// Auth
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/auth/login".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirmation_password: String,
}

impl ApiRequest for ChangePasswordRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Patch;
    fn path(&self) -> String {
        "/users/change-password".to_string()
    }
}

// =========================================================
// Branches
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchRequest {
    pub name: String,
}

unit_request!(ListBranches, Get, "/branches", Vec<Branch>);
id_request!(GetBranch, Get, "/branches", Branch);
id_request!(DeleteBranch, Delete, "/branches", ());

#[derive(Debug, Clone, Serialize)]
pub struct CreateBranch(pub BranchRequest);

impl ApiRequest for CreateBranch {
    type Response = Branch;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/branches".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateBranch {
    #[serde(skip)]
    pub id: i64,
    #[serde(flatten)]
    pub body: BranchRequest,
}

impl ApiRequest for UpdateBranch {
    type Response = Branch;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/branches/{}", self.id)
    }
}

// =========================================================
// Courses
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRequest {
    pub course_name: String,
    pub course_code: String,
    pub credits: i32,
}

unit_request!(ListCourses, Get, "/courses", Vec<Course>);
id_request!(GetCourse, Get, "/courses", Course);
id_request!(DeleteCourse, Delete, "/courses", ());

#[derive(Debug, Clone, Serialize)]
pub struct CreateCourse(pub CourseRequest);

impl ApiRequest for CreateCourse {
    type Response = Course;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/courses".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateCourse {
    #[serde(skip)]
    pub id: i64,
    #[serde(flatten)]
    pub body: CourseRequest,
}

impl ApiRequest for UpdateCourse {
    type Response = Course;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/courses/{}", self.id)
    }
}

// =========================================================
// Students
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRequest {
    pub usn: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// 仅在创建时发送，更新时省略
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub year: i32,
    pub section: String,
    pub branch_id: i64,
}

unit_request!(ListStudents, Get, "/students", Vec<Student>);
id_request!(GetStudent, Get, "/students", Student);
id_request!(DeleteStudent, Delete, "/students", ());

/// Courses the student is currently enrolled in.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ListEnrolledCourses {
    #[serde(skip)]
    pub student_id: i64,
}

impl ApiRequest for ListEnrolledCourses {
    type Response = Vec<Course>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/students/{}/courses", self.student_id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateStudent(pub StudentRequest);

impl ApiRequest for CreateStudent {
    type Response = Student;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/students".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateStudent {
    #[serde(skip)]
    pub id: i64,
    #[serde(flatten)]
    pub body: StudentRequest,
}

impl ApiRequest for UpdateStudent {
    type Response = Student;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/students/{}", self.id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchStudents {
    #[serde(skip)]
    pub query: String,
}

impl ApiRequest for SearchStudents {
    type Response = Vec<Student>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/students/search?query={}", urlencoding::encode(self.query.trim()))
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct EnrollStudent {
    #[serde(skip)]
    pub student_id: i64,
    #[serde(skip)]
    pub course_id: i64,
}

impl ApiRequest for EnrollStudent {
    type Response = Student;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        format!("/students/{}/courses/{}", self.student_id, self.course_id)
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct UnenrollStudent {
    #[serde(skip)]
    pub student_id: i64,
    #[serde(skip)]
    pub course_id: i64,
}

impl ApiRequest for UnenrollStudent {
    type Response = Student;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/students/{}/courses/{}", self.student_id, self.course_id)
    }
}

// =========================================================
// Teachers
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub branch_id: i64,
}

unit_request!(ListTeachers, Get, "/teachers", Vec<Teacher>);
id_request!(GetTeacher, Get, "/teachers", Teacher);
id_request!(DeleteTeacher, Delete, "/teachers", ());

#[derive(Debug, Clone, Serialize)]
pub struct CreateTeacher(pub TeacherRequest);

impl ApiRequest for CreateTeacher {
    type Response = Teacher;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/teachers".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateTeacher {
    #[serde(skip)]
    pub id: i64,
    #[serde(flatten)]
    pub body: TeacherRequest,
}

impl ApiRequest for UpdateTeacher {
    type Response = Teacher;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/teachers/{}", self.id)
    }
}

// =========================================================
// Attendance
// =========================================================

#[derive(Debug, Clone, Serialize)]
pub struct MarkAttendance(pub AttendanceRecord);

impl ApiRequest for MarkAttendance {
    type Response = AttendanceRecord;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/attendance".to_string()
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ListAttendance {
    #[serde(skip)]
    pub student_id: i64,
    #[serde(skip)]
    pub course_id: i64,
}

impl ApiRequest for ListAttendance {
    type Response = Vec<AttendanceRecord>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!(
            "/attendance/student/{}/course/{}",
            self.student_id, self.course_id
        )
    }
}

// =========================================================
// Grades
// =========================================================

/// Identifies one grade sheet: student × course × semester.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeKey {
    pub student_id: i64,
    pub course_id: i64,
    pub semester: i32,
}

impl GradeKey {
    fn path(&self) -> String {
        format!(
            "/grades/student/{}/course/{}/semester/{}",
            self.student_id, self.course_id, self.semester
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct GetGrades {
    #[serde(skip)]
    pub key: GradeKey,
}

impl ApiRequest for GetGrades {
    type Response = GradeResponse;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        self.key.path()
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct GetFinalGrade {
    #[serde(skip)]
    pub key: GradeKey,
}

impl ApiRequest for GetFinalGrade {
    type Response = GradeResponse;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("{}/final", self.key.path())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GradeRequest {
    pub mse1: Option<f64>,
    pub mse2: Option<f64>,
    pub task1: Option<f64>,
    pub task2: Option<f64>,
    pub task3: Option<f64>,
    pub record_marks: Option<f64>,
    pub conduction_marks: Option<f64>,
    pub mse_lab: Option<f64>,
    pub see_score: Option<f64>,
    pub semester: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveGrades {
    #[serde(skip)]
    pub key: GradeKey,
    #[serde(flatten)]
    pub body: GradeRequest,
}

impl ApiRequest for SaveGrades {
    type Response = GradeResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        self.key.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_parameters_are_not_serialized() {
        let req = UpdateBranch {
            id: 4,
            body: BranchRequest {
                name: "Mechanical".to_string(),
            },
        };
        assert_eq!(req.path(), "/branches/4");
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({ "name": "Mechanical" }));
    }

    #[test]
    fn test_student_update_omits_password() {
        let body = StudentRequest {
            usn: "1RV21CS001".to_string(),
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            email: "asha@sgm.com".to_string(),
            password: None,
            year: 2,
            section: "B".to_string(),
            branch_id: 1,
        };
        let value = serde_json::to_value(UpdateStudent { id: 7, body }).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["branchId"], json!(1));
        assert_eq!(value["firstName"], json!("Asha"));
    }

    #[test]
    fn test_search_query_is_percent_encoded() {
        let req = SearchStudents {
            query: " asha rao ".to_string(),
        };
        assert_eq!(req.path(), "/students/search?query=asha%20rao");
    }

    #[test]
    fn test_grade_paths() {
        let key = GradeKey {
            student_id: 1,
            course_id: 2,
            semester: 3,
        };
        assert_eq!(GetGrades { key }.path(), "/grades/student/1/course/2/semester/3");
        assert_eq!(
            GetFinalGrade { key }.path(),
            "/grades/student/1/course/2/semester/3/final"
        );
        let save = SaveGrades {
            key,
            body: GradeRequest {
                mse1: Some(12.5),
                semester: Some(3),
                ..Default::default()
            },
        };
        let value = serde_json::to_value(&save).unwrap();
        assert_eq!(value["mse1"], json!(12.5));
        assert_eq!(value["mseLab"], json!(null));
        assert_eq!(value["semester"], json!(3));
    }

    #[test]
    fn test_enrollment_paths() {
        let enroll = EnrollStudent {
            student_id: 5,
            course_id: 9,
        };
        assert_eq!(enroll.path(), "/students/5/courses/9");
        assert_eq!(EnrollStudent::METHOD, HttpMethod::Post);
        assert_eq!(UnenrollStudent::METHOD, HttpMethod::Delete);
        assert_eq!(
            ListEnrolledCourses { student_id: 5 }.path(),
            "/students/5/courses"
        );
    }

    #[test]
    fn test_body_methods() {
        assert!(HttpMethod::Post.has_body());
        assert!(HttpMethod::Patch.has_body());
        assert!(!HttpMethod::Get.has_body());
        assert!(!HttpMethod::Delete.has_body());
    }
}
