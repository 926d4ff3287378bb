use serde::{Deserialize, Deserializer, Serialize};

pub mod client;
pub mod config;
pub mod error;
pub mod forms;
pub mod grades;
pub mod navigation;
pub mod protocol;
pub mod records;
pub mod route;
pub mod session;

pub use error::{ApiError, ApiResult};

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// LocalStorage 中保存 Bearer Token 的键
pub const STORAGE_TOKEN_KEY: &str = "token";
/// LocalStorage 中保存后端地址覆盖值的键
pub const STORAGE_API_URL_KEY: &str = "grade_manager_api_url";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================
//
// 所有记录均由服务端定义，按原样消费（camelCase JSON）。

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub course_name: String,
    pub course_code: String,
    pub credits: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub usn: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    pub email: String,
    pub year: i32,
    pub section: String,
    pub branch: Branch,
    #[serde(default)]
    pub courses: Vec<Course>,
}

impl Student {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, self.last_name.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    pub email: String,
    pub branch: Branch,
}

impl Teacher {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, self.last_name.as_deref())
    }
}

fn full_name(first: &str, last: Option<&str>) -> String {
    match last {
        Some(last) if !last.trim().is_empty() => format!("{} {}", first, last),
        _ => first.to_string(),
    }
}

/// 出勤状态
///
/// 服务端以自由字符串存储：解码时不区分大小写，
/// 无法识别的取值解码为 `Unknown`，不影响同一列表中的其它记录。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    #[default]
    Present,
    Absent,
    Unknown,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "PRESENT",
            AttendanceStatus::Absent => "ABSENT",
            AttendanceStatus::Unknown => "UNKNOWN",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Unknown => "Unknown",
        }
    }

    /// 只识别可登记的两种状态
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PRESENT" => Some(AttendanceStatus::Present),
            "ABSENT" => Some(AttendanceStatus::Absent),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for AttendanceStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .and_then(AttendanceStatus::parse)
            .unwrap_or(AttendanceStatus::Unknown))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub student_id: i64,
    pub course_id: i64,
    pub date: chrono::NaiveDate,
    pub status: AttendanceStatus,
}

/// 单门课程的成绩（服务端响应）
///
/// 所有分数都可以为空，`ia_total` / `reduced_ia_total` 由服务端计算。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GradeResponse {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub student_id: Option<i64>,
    #[serde(default)]
    pub course_id: Option<i64>,
    pub mse1: Option<f64>,
    pub mse2: Option<f64>,
    pub task1: Option<f64>,
    pub task2: Option<f64>,
    pub task3: Option<f64>,
    pub record_marks: Option<f64>,
    pub conduction_marks: Option<f64>,
    pub mse_lab: Option<f64>,
    #[serde(default)]
    pub see_score: Option<f64>,
    #[serde(default)]
    pub semester: Option<i32>,
    #[serde(default)]
    pub ia_total: f64,
    #[serde(default)]
    pub reduced_ia_total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// 服务端错误响应体（Spring 默认格式或自定义 message）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// 提取最有意义的错误信息
    pub fn into_message(self) -> Option<String> {
        self.message
            .filter(|m| !m.trim().is_empty())
            .or(self.error.filter(|e| !e.trim().is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_student_decodes_server_shape() {
        let value = json!({
            "id": 7,
            "usn": "1RV21CS001",
            "firstName": "Asha",
            "lastName": null,
            "email": "asha@sgm.com",
            "year": 2,
            "section": "B",
            "branch": { "id": 1, "name": "Computer Science" },
            "courses": [
                { "id": 3, "courseName": "Java", "courseCode": "CS101", "credits": 4 }
            ]
        });

        let student: Student = serde_json::from_value(value).unwrap();
        assert_eq!(student.full_name(), "Asha");
        assert_eq!(student.branch.name, "Computer Science");
        assert_eq!(student.courses[0].course_code, "CS101");
    }

    #[test]
    fn test_attendance_record_wire_format() {
        let record = AttendanceRecord {
            student_id: 1,
            course_id: 2,
            date: chrono::NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            status: AttendanceStatus::Absent,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({ "studentId": 1, "courseId": 2, "date": "2025-09-01", "status": "ABSENT" })
        );
    }

    #[test]
    fn test_attendance_status_decodes_leniently() {
        let list: Vec<AttendanceRecord> = serde_json::from_value(json!([
            { "studentId": 1, "courseId": 2, "date": "2025-09-01", "status": "PRESENT" },
            { "studentId": 1, "courseId": 2, "date": "2025-09-02", "status": "Present" },
            { "studentId": 1, "courseId": 2, "date": "2025-09-03", "status": " absent " },
            { "studentId": 1, "courseId": 2, "date": "2025-09-04", "status": "late" },
            { "studentId": 1, "courseId": 2, "date": "2025-09-05", "status": null }
        ]))
        .unwrap();

        let statuses: Vec<_> = list.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                AttendanceStatus::Present,
                AttendanceStatus::Present,
                AttendanceStatus::Absent,
                AttendanceStatus::Unknown,
                AttendanceStatus::Unknown,
            ]
        );
        assert_eq!(AttendanceStatus::parse("unknown"), None);
    }

    #[test]
    fn test_error_body_prefers_message() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error":"Not Found","message":"Branch not found with id: 9"}"#)
                .unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Branch not found with id: 9"));

        let body: ErrorBody = serde_json::from_str(r#"{"error":"Forbidden","message":""}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Forbidden"));
    }
}
