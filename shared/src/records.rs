//! 本地列表同步
//!
//! 页面在每次成功响应后用这些函数修补内存中的列表，
//! 保证列表与服务端最后一次成功响应一致。

use crate::{AttendanceRecord, AttendanceStatus, Branch, Course, Student, Teacher};
use std::collections::HashSet;

/// 拥有服务端主键的记录
pub trait Keyed {
    fn id(&self) -> i64;
}

impl Keyed for Branch {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Keyed for Course {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Keyed for Student {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Keyed for Teacher {
    fn id(&self) -> i64 {
        self.id
    }
}

/// 替换同 id 的记录，不存在则追加到末尾
pub fn upsert<T: Keyed>(list: &mut Vec<T>, item: T) {
    match list.iter_mut().find(|existing| existing.id() == item.id()) {
        Some(slot) => *slot = item,
        None => list.push(item),
    }
}

/// 删除指定 id 的记录，返回是否删除了记录
pub fn remove_by_id<T: Keyed>(list: &mut Vec<T>, id: i64) -> bool {
    let before = list.len();
    list.retain(|item| item.id() != id);
    list.len() != before
}

/// 登记出勤后修补列表
///
/// 服务端按 (学生, 课程, 日期) 覆盖已有记录，这里同样替换同一天的记录。
pub fn upsert_attendance(list: &mut Vec<AttendanceRecord>, record: AttendanceRecord) {
    match list.iter_mut().find(|existing| {
        existing.student_id == record.student_id
            && existing.course_id == record.course_id
            && existing.date == record.date
    }) {
        Some(slot) => *slot = record,
        None => list.push(record),
    }
}

/// 学生尚未选修的课程，保持课程目录顺序
pub fn available_courses(all: &[Course], enrolled: &[Course]) -> Vec<Course> {
    let enrolled_ids: HashSet<i64> = enrolled.iter().map(|c| c.id).collect();
    all.iter()
        .filter(|course| !enrolled_ids.contains(&course.id))
        .cloned()
        .collect()
}

/// 按姓名或 USN 进行不区分大小写的子串匹配
pub fn search_matches(student: &Student, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return false;
    }
    [
        student.first_name.to_lowercase(),
        student.last_name.clone().unwrap_or_default().to_lowercase(),
        student.full_name().to_lowercase(),
        student.usn.to_lowercase(),
    ]
    .iter()
    .any(|field| field.contains(&query))
}

/// 出勤率（百分比），没有记录时返回 `None`
pub fn attendance_percentage(records: &[AttendanceRecord]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    let present = records
        .iter()
        .filter(|r| r.status == AttendanceStatus::Present)
        .count();
    Some(present as f64 * 100.0 / records.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn branch(id: i64, name: &str) -> Branch {
        Branch {
            id,
            name: name.to_string(),
        }
    }

    fn course(id: i64, code: &str) -> Course {
        Course {
            id,
            course_name: format!("Course {}", code),
            course_code: code.to_string(),
            credits: 4,
        }
    }

    fn student(first: &str, last: Option<&str>, usn: &str) -> Student {
        Student {
            id: 1,
            usn: usn.to_string(),
            first_name: first.to_string(),
            last_name: last.map(str::to_string),
            email: "s@sgm.com".to_string(),
            year: 1,
            section: "A".to_string(),
            branch: branch(1, "CSE"),
            courses: Vec::new(),
        }
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut list = vec![branch(1, "CSE"), branch(2, "ECE")];
        upsert(&mut list, branch(1, "Computer Science"));
        assert_eq!(list, vec![branch(1, "Computer Science"), branch(2, "ECE")]);
    }

    #[test]
    fn test_upsert_appends_new() {
        let mut list = vec![branch(1, "CSE")];
        upsert(&mut list, branch(5, "Civil"));
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].name, "Civil");
    }

    #[test]
    fn test_remove_by_id() {
        let mut list = vec![branch(1, "CSE"), branch(2, "ECE")];
        assert!(remove_by_id(&mut list, 1));
        assert!(!remove_by_id(&mut list, 1));
        assert_eq!(list, vec![branch(2, "ECE")]);
    }

    #[test]
    fn test_available_courses_excludes_enrolled() {
        let all = vec![course(1, "CS101"), course(2, "CS102"), course(3, "CS103")];
        let enrolled = vec![course(2, "CS102")];
        let available = available_courses(&all, &enrolled);
        let codes: Vec<_> = available.iter().map(|c| c.course_code.as_str()).collect();
        assert_eq!(codes, vec!["CS101", "CS103"]);
        assert!(available_courses(&all, &all).is_empty());
    }

    #[test]
    fn test_search_matches_name_and_usn() {
        let s = student("Asha", Some("Rao"), "1RV21CS001");
        assert!(search_matches(&s, "asha"));
        assert!(search_matches(&s, "RAO"));
        assert!(search_matches(&s, "asha rao"));
        assert!(search_matches(&s, "cs001"));
        assert!(!search_matches(&s, "ravi"));
        assert!(!search_matches(&s, "   "));

        let no_last = student("Ravi", None, "1RV21ME002");
        assert!(search_matches(&no_last, "ravi"));
    }

    #[test]
    fn test_attendance_percentage() {
        let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let record = |status| AttendanceRecord {
            student_id: 1,
            course_id: 1,
            date,
            status,
        };
        assert_eq!(attendance_percentage(&[]), None);
        let records = vec![
            record(AttendanceStatus::Present),
            record(AttendanceStatus::Present),
            record(AttendanceStatus::Present),
            record(AttendanceStatus::Absent),
        ];
        assert_eq!(attendance_percentage(&records), Some(75.0));
    }

    #[test]
    fn test_remarking_a_date_replaces_the_record() {
        let day = |d| NaiveDate::from_ymd_opt(2025, 9, d).unwrap();
        let record = |date, status| AttendanceRecord {
            student_id: 1,
            course_id: 2,
            date,
            status,
        };
        let mut list = vec![record(day(1), AttendanceStatus::Absent)];

        upsert_attendance(&mut list, record(day(1), AttendanceStatus::Present));
        assert_eq!(list, vec![record(day(1), AttendanceStatus::Present)]);
        assert_eq!(attendance_percentage(&list), Some(100.0));

        upsert_attendance(&mut list, record(day(2), AttendanceStatus::Absent));
        assert_eq!(list.len(), 2);
        assert_eq!(attendance_percentage(&list), Some(50.0));
    }
}
