//! Report export for the PDF and persistence collaborators.

use serde::{Deserialize, Serialize};

use crate::models::ComprehensiveFertilityResult;

/// Version of the exported document layout.
pub const REPORT_FORMAT_VERSION: u32 = 1;

/// Report metadata. The only non-deterministic part of an export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportMetadata {
    pub format_version: u32,
    /// Random report identifier
    pub report_id: String,
    /// RFC 3339 export timestamp
    pub exported_at: String,
    pub engine_version: String,
    /// Links the report to its input without storing the profile
    pub profile_fingerprint: String,
}

/// One evaluation packaged for rendering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportExport {
    pub metadata: ReportMetadata,
    /// Cumulative probability, precomputed for the renderer
    pub annual_probability: f64,
    pub result: ComprehensiveFertilityResult,
}

impl ReportExport {
    pub fn from_result(result: ComprehensiveFertilityResult) -> Self {
        Self {
            metadata: ReportMetadata {
                format_version: REPORT_FORMAT_VERSION,
                report_id: uuid::Uuid::new_v4().to_string(),
                exported_at: chrono::Utc::now().to_rfc3339(),
                engine_version: result.engine_version.clone(),
                profile_fingerprint: result.profile_fingerprint.clone(),
            },
            annual_probability: result.annual_probability(),
            result,
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Recommendations as CSV, one row per recommendation in rank order.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();
        csv.push_str(RECOMMENDATION_CSV_HEADER);
        push_recommendation_rows(&mut csv, self);
        csv
    }
}

/// Several reports exported together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchReportExport {
    pub exported_at: String,
    pub reports: Vec<ReportExport>,
    pub total_recommendations: usize,
}

impl BatchReportExport {
    pub fn from_results(results: Vec<ComprehensiveFertilityResult>) -> Self {
        let reports: Vec<ReportExport> = results.into_iter().map(ReportExport::from_result).collect();
        let total_recommendations = reports.iter().map(|r| r.result.recommendations.len()).sum();
        Self {
            exported_at: chrono::Utc::now().to_rfc3339(),
            reports,
            total_recommendations,
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Recommendations from every report as one CSV table.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();
        csv.push_str(RECOMMENDATION_CSV_HEADER);
        for report in &self.reports {
            push_recommendation_rows(&mut csv, report);
        }
        csv
    }
}

const RECOMMENDATION_CSV_HEADER: &str =
    "report_id,rank,recommendation_id,title,priority,category,evidence,citations\n";

fn push_recommendation_rows(csv: &mut String, report: &ReportExport) {
    for (rank, rec) in report.result.recommendations.iter().enumerate() {
        csv.push_str(&format!(
            "{},{},{},{},{:?},{:?},{:?},{}\n",
            escape_csv(&report.metadata.report_id),
            rank + 1,
            escape_csv(&rec.id),
            escape_csv(&rec.title),
            rec.priority,
            rec.category,
            rec.evidence,
            escape_csv(&rec.citations.join("; ")),
        ));
    }
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FertilityEngine;
    use crate::models::ClinicalProfile;

    fn make_result() -> ComprehensiveFertilityResult {
        let mut profile = ClinicalProfile::new(36.0);
        profile.bmi = Some(31.0);
        FertilityEngine::default().evaluate(&profile).unwrap()
    }

    #[test]
    fn test_report_metadata() {
        let result = make_result();
        let fingerprint = result.profile_fingerprint.clone();
        let report = ReportExport::from_result(result);

        assert_eq!(report.metadata.format_version, REPORT_FORMAT_VERSION);
        assert_eq!(report.metadata.profile_fingerprint, fingerprint);
        assert!(uuid::Uuid::parse_str(&report.metadata.report_id).is_ok());
        assert!(chrono::DateTime::parse_from_rfc3339(&report.metadata.exported_at).is_ok());
        assert!((report.annual_probability - report.result.annual_probability()).abs() < 1e-12);
    }

    #[test]
    fn test_report_ids_are_unique() {
        let a = ReportExport::from_result(make_result());
        let b = ReportExport::from_result(make_result());
        assert_ne!(a.metadata.report_id, b.metadata.report_id);
        assert_eq!(a.result, b.result);
    }

    #[test]
    fn test_json_round_trip() {
        let report = ReportExport::from_result(make_result());
        let json = report.to_json().unwrap();
        assert!(json.contains("\"format_version\": 1"));
        let parsed: ReportExport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.metadata, report.metadata);
    }

    #[test]
    fn test_csv_rows() {
        let report = ReportExport::from_result(make_result());
        let csv = report.to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert!(lines[0].starts_with("report_id,rank"));
        assert_eq!(lines.len(), report.result.recommendations.len() + 1);
        assert!(lines[1].contains(",1,"));
    }

    #[test]
    fn test_batch_export() {
        let batch = BatchReportExport::from_results(vec![make_result(), make_result()]);
        assert_eq!(batch.reports.len(), 2);
        assert_eq!(
            batch.total_recommendations,
            batch.reports[0].result.recommendations.len() * 2
        );
        let csv = batch.to_csv();
        assert_eq!(csv.lines().count(), batch.total_recommendations + 1);
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("a, b"), "\"a, b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
