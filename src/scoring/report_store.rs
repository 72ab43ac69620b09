use serde::{Deserialize, Serialize};

use crate::api::models::Report;

pub const MAX_STORED_REPORTS: usize = 10;

/// 最近发布的举报，新的在前，超出容量丢弃最旧的
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportStore {
    reports: Vec<Report>,
}

impl ReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从持久化数据恢复，顺带截断到容量上限
    pub fn from_reports(mut reports: Vec<Report>) -> Self {
        reports.truncate(MAX_STORED_REPORTS);
        Self { reports }
    }

    /// 同 id 的旧记录会被替换，不会重复出现
    pub fn push_front(&mut self, report: Report) {
        self.reports.retain(|r| r.id != report.id);
        self.reports.insert(0, report);
        self.reports.truncate(MAX_STORED_REPORTS);
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn latest(&self) -> Option<&Report> {
        self.reports.first()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}
