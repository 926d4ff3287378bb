//! 成绩录入
//!
//! `GradeSheet` 是成绩弹窗的可编辑状态。内部评估（IA）的计算与服务端一致，
//! 仅用于录入时的实时预览，保存后以服务端返回值为准。

use crate::protocol::GradeRequest;
use crate::{ApiResult, GradeResponse};
use chrono::{Datelike, NaiveDate};
use thiserror::Error;

/// 理论部分满分（MSE1 + MSE2 + 三个 Task）
const THEORY_MAX: f64 = 50.0;
/// 理论部分折算后的分值
const THEORY_WEIGHT: f64 = 30.0;
/// 实验部分满分（记录 + 操作 + 实验 MSE）
const LAB_MAX: f64 = 50.0;
const LAB_WEIGHT: f64 = 20.0;

/// 根据年级与当前日期推算学期
///
/// 8 月（含）之后为奇数学期：`year * 2 - 1`，否则为 `year * 2`。
pub fn semester_for(year: i32, today: NaiveDate) -> i32 {
    let is_odd_semester = today.month() >= 8;
    year * 2 - if is_odd_semester { 1 } else { 0 }
}

/// 期末总分：折算 IA + SEE / 2
pub fn final_score(reduced_ia_total: f64, see_score: Option<f64>) -> f64 {
    reduced_ia_total + see_score.unwrap_or(0.0) / 2.0
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GradeFieldError {
    #[error("unknown grade field `{0}`")]
    UnknownField(String),
    #[error("`{field}` must be a number, got `{value}`")]
    NotANumber { field: &'static str, value: String },
}

/// 成绩表单字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeField {
    Mse1,
    Mse2,
    Task1,
    Task2,
    Task3,
    RecordMarks,
    ConductionMarks,
    MseLab,
}

impl GradeField {
    pub const THEORY: [GradeField; 2] = [GradeField::Mse1, GradeField::Mse2];
    pub const TASKS: [GradeField; 3] = [GradeField::Task1, GradeField::Task2, GradeField::Task3];
    pub const LAB: [GradeField; 3] = [
        GradeField::RecordMarks,
        GradeField::ConductionMarks,
        GradeField::MseLab,
    ];

    /// JSON 字段名，同时用作表单 input 的 name
    pub fn name(&self) -> &'static str {
        match self {
            GradeField::Mse1 => "mse1",
            GradeField::Mse2 => "mse2",
            GradeField::Task1 => "task1",
            GradeField::Task2 => "task2",
            GradeField::Task3 => "task3",
            GradeField::RecordMarks => "recordMarks",
            GradeField::ConductionMarks => "conductionMarks",
            GradeField::MseLab => "mseLab",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GradeField::Mse1 => "MSE-1",
            GradeField::Mse2 => "MSE-2",
            GradeField::Task1 => "Task 1",
            GradeField::Task2 => "Task 2",
            GradeField::Task3 => "Task 3",
            GradeField::RecordMarks => "Record Marks",
            GradeField::ConductionMarks => "Conduction Marks",
            GradeField::MseLab => "MSE (Lab)",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::THEORY
            .iter()
            .chain(Self::TASKS.iter())
            .chain(Self::LAB.iter())
            .copied()
            .find(|f| f.name() == name)
    }
}

/// 内部评估汇总
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InternalAssessment {
    pub theory_total: f64,
    pub lab_total: f64,
    pub ia_total: f64,
    pub reduced_ia_total: f64,
}

/// 可编辑的成绩表
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GradeSheet {
    pub mse1: Option<f64>,
    pub mse2: Option<f64>,
    pub task1: Option<f64>,
    pub task2: Option<f64>,
    pub task3: Option<f64>,
    pub record_marks: Option<f64>,
    pub conduction_marks: Option<f64>,
    pub mse_lab: Option<f64>,
    /// 期末（SEE）成绩：不在表单中编辑，但保存时必须原样回传
    pub see_score: Option<f64>,
}

impl GradeSheet {
    pub fn get(&self, field: GradeField) -> Option<f64> {
        match field {
            GradeField::Mse1 => self.mse1,
            GradeField::Mse2 => self.mse2,
            GradeField::Task1 => self.task1,
            GradeField::Task2 => self.task2,
            GradeField::Task3 => self.task3,
            GradeField::RecordMarks => self.record_marks,
            GradeField::ConductionMarks => self.conduction_marks,
            GradeField::MseLab => self.mse_lab,
        }
    }

    fn slot(&mut self, field: GradeField) -> &mut Option<f64> {
        match field {
            GradeField::Mse1 => &mut self.mse1,
            GradeField::Mse2 => &mut self.mse2,
            GradeField::Task1 => &mut self.task1,
            GradeField::Task2 => &mut self.task2,
            GradeField::Task3 => &mut self.task3,
            GradeField::RecordMarks => &mut self.record_marks,
            GradeField::ConductionMarks => &mut self.conduction_marks,
            GradeField::MseLab => &mut self.mse_lab,
        }
    }

    /// 从表单输入更新字段：空输入清除分数
    pub fn set_field(&mut self, name: &str, raw: &str) -> Result<(), GradeFieldError> {
        let field =
            GradeField::from_name(name).ok_or_else(|| GradeFieldError::UnknownField(name.to_string()))?;
        let raw = raw.trim();
        let value = if raw.is_empty() {
            None
        } else {
            let parsed = raw.parse::<f64>().map_err(|_| GradeFieldError::NotANumber {
                field: field.name(),
                value: raw.to_string(),
            })?;
            if !parsed.is_finite() {
                return Err(GradeFieldError::NotANumber {
                    field: field.name(),
                    value: raw.to_string(),
                });
            }
            Some(parsed)
        };
        *self.slot(field) = value;
        Ok(())
    }

    /// 表单 input 的显示值
    pub fn display(&self, field: GradeField) -> String {
        self.get(field).map(|v| v.to_string()).unwrap_or_default()
    }

    pub fn internal_assessment(&self) -> InternalAssessment {
        let v = |x: Option<f64>| x.unwrap_or(0.0);
        let theory_total =
            v(self.mse1) + v(self.mse2) + v(self.task1) + v(self.task2) + v(self.task3);
        let lab_total = v(self.record_marks) + v(self.conduction_marks) + v(self.mse_lab);

        let scaled_theory = theory_total / THEORY_MAX * THEORY_WEIGHT;
        let scaled_lab = lab_total / LAB_MAX * LAB_WEIGHT;

        InternalAssessment {
            theory_total,
            lab_total,
            ia_total: theory_total + lab_total,
            reduced_ia_total: (scaled_theory + scaled_lab).round(),
        }
    }

    pub fn to_request(&self, semester: i32) -> GradeRequest {
        GradeRequest {
            mse1: self.mse1,
            mse2: self.mse2,
            task1: self.task1,
            task2: self.task2,
            task3: self.task3,
            record_marks: self.record_marks,
            conduction_marks: self.conduction_marks,
            mse_lab: self.mse_lab,
            see_score: self.see_score,
            semester: Some(semester),
        }
    }
}

/// 由成绩查询结果得到可编辑的成绩表
///
/// 404 表示本学期尚无成绩，从空表开始；其它失败原样返回，此时不可保存。
pub fn sheet_from_lookup(res: ApiResult<GradeResponse>) -> ApiResult<GradeSheet> {
    match res {
        Ok(res) => Ok(GradeSheet::from(&res)),
        Err(e) if e.is_not_found() => Ok(GradeSheet::default()),
        Err(e) => Err(e),
    }
}

impl From<&GradeResponse> for GradeSheet {
    fn from(res: &GradeResponse) -> Self {
        Self {
            mse1: res.mse1,
            mse2: res.mse2,
            task1: res.task1,
            task2: res.task2,
            task3: res.task3,
            record_marks: res.record_marks,
            conduction_marks: res.conduction_marks,
            mse_lab: res.mse_lab,
            see_score: res.see_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ApiError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_semester_switches_in_august() {
        assert_eq!(semester_for(2, date(2025, 7, 31)), 4);
        assert_eq!(semester_for(2, date(2025, 8, 1)), 3);
        assert_eq!(semester_for(1, date(2025, 12, 15)), 1);
        assert_eq!(semester_for(1, date(2026, 1, 5)), 2);
    }

    #[test]
    fn test_internal_assessment_full_marks() {
        let sheet = GradeSheet {
            mse1: Some(20.0),
            mse2: Some(20.0),
            task1: Some(10.0 / 3.0),
            task2: Some(10.0 / 3.0),
            task3: Some(10.0 / 3.0),
            record_marks: Some(20.0),
            conduction_marks: Some(10.0),
            mse_lab: Some(20.0),
            see_score: None,
        };
        let ia = sheet.internal_assessment();
        assert!((ia.theory_total - 50.0).abs() < 1e-9);
        assert_eq!(ia.lab_total, 50.0);
        assert_eq!(ia.reduced_ia_total, 50.0);
    }

    #[test]
    fn test_internal_assessment_missing_marks_count_as_zero() {
        let sheet = GradeSheet {
            mse1: Some(15.0),
            mse2: Some(10.0),
            ..Default::default()
        };
        let ia = sheet.internal_assessment();
        assert_eq!(ia.theory_total, 25.0);
        assert_eq!(ia.lab_total, 0.0);
        assert_eq!(ia.ia_total, 25.0);
        // 25 / 50 * 30 = 15
        assert_eq!(ia.reduced_ia_total, 15.0);

        assert_eq!(GradeSheet::default().internal_assessment().reduced_ia_total, 0.0);
    }

    #[test]
    fn test_reduced_total_is_rounded() {
        let sheet = GradeSheet {
            mse1: Some(11.0),
            record_marks: Some(7.0),
            ..Default::default()
        };
        // 11/50*30 = 6.6, 7/50*20 = 2.8, sum 9.4 -> 9
        assert_eq!(sheet.internal_assessment().reduced_ia_total, 9.0);
    }

    #[test]
    fn test_set_field_parses_and_clears() {
        let mut sheet = GradeSheet::default();
        sheet.set_field("mse1", "17.5").unwrap();
        sheet.set_field("mseLab", " 8 ").unwrap();
        assert_eq!(sheet.mse1, Some(17.5));
        assert_eq!(sheet.mse_lab, Some(8.0));
        assert_eq!(sheet.display(GradeField::Mse1), "17.5");

        sheet.set_field("mse1", "").unwrap();
        assert_eq!(sheet.mse1, None);
        assert_eq!(sheet.display(GradeField::Mse1), "");
    }

    #[test]
    fn test_set_field_rejects_bad_input() {
        let mut sheet = GradeSheet::default();
        assert_eq!(
            sheet.set_field("seeScore", "10"),
            Err(GradeFieldError::UnknownField("seeScore".to_string()))
        );
        assert!(matches!(
            sheet.set_field("task2", "ten"),
            Err(GradeFieldError::NotANumber { field: "task2", .. })
        ));
        assert!(sheet.set_field("task2", "NaN").is_err());
        assert_eq!(sheet.task2, None);
    }

    #[test]
    fn test_request_and_response_conversion() {
        let res = GradeResponse {
            mse1: Some(12.0),
            conduction_marks: Some(9.5),
            ia_total: 21.5,
            ..Default::default()
        };
        let sheet = GradeSheet::from(&res);
        assert_eq!(sheet.mse1, Some(12.0));
        assert_eq!(sheet.conduction_marks, Some(9.5));

        let req = sheet.to_request(3);
        assert_eq!(req.semester, Some(3));
        assert_eq!(req.mse1, Some(12.0));
        assert_eq!(req.see_score, None);
    }

    #[test]
    fn test_saving_marks_keeps_recorded_see_score() {
        let res = GradeResponse {
            mse1: Some(14.0),
            see_score: Some(72.0),
            ..Default::default()
        };
        let mut sheet = GradeSheet::from(&res);
        sheet.set_field("mse2", "16").unwrap();

        let req = sheet.to_request(3);
        assert_eq!(req.see_score, Some(72.0));
        assert_eq!(req.mse2, Some(16.0));
        // SEE 不参与 IA
        assert_eq!(sheet.internal_assessment().theory_total, 30.0);
    }

    #[test]
    fn test_lookup_only_treats_not_found_as_empty() {
        let found = sheet_from_lookup(Ok(GradeResponse {
            mse1: Some(9.0),
            see_score: Some(60.0),
            ..Default::default()
        }))
        .unwrap();
        assert_eq!(found.mse1, Some(9.0));
        assert_eq!(found.see_score, Some(60.0));

        let missing = sheet_from_lookup(Err(ApiError::Status {
            status: 404,
            message: "Grades not found".to_string(),
        }));
        assert_eq!(missing, Ok(GradeSheet::default()));

        let failed = sheet_from_lookup(Err(ApiError::Status {
            status: 500,
            message: "Internal Server Error".to_string(),
        }));
        assert!(matches!(failed, Err(ApiError::Status { status: 500, .. })));
        assert!(sheet_from_lookup(Err(ApiError::Network("offline".to_string()))).is_err());
    }

    #[test]
    fn test_final_score() {
        assert_eq!(final_score(40.0, Some(80.0)), 80.0);
        assert_eq!(final_score(40.0, None), 40.0);
    }

    #[test]
    fn test_field_names_roundtrip() {
        for field in GradeField::THEORY
            .iter()
            .chain(GradeField::TASKS.iter())
            .chain(GradeField::LAB.iter())
        {
            assert_eq!(GradeField::from_name(field.name()), Some(*field));
        }
    }
}
