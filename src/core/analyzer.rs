use log::{error, info};

use crate::api::models::ViolationVerdict;
use crate::core::gemini::{parser, prompts, GeminiClient, GeminiError, InlineImage};

/// 违停分析
///
/// 总是返回一个判定；远程失败时返回 [`ViolationVerdict::system_failure`]。
pub trait ViolationAnalyzer: Send + Sync {
    fn analyze(&self, redacted_jpeg: &[u8], language: &str) -> ViolationVerdict;
}

pub struct GeminiViolationAnalyzer {
    client: GeminiClient,
    model: String,
}

impl GeminiViolationAnalyzer {
    pub fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    fn try_analyze(
        &self,
        redacted_jpeg: &[u8],
        language: &str,
    ) -> Result<ViolationVerdict, GeminiError> {
        let response = self.client.generate_json(
            &self.model,
            &InlineImage::jpeg(redacted_jpeg),
            &prompts::analysis_prompt(language),
            prompts::analysis_schema(),
        )?;
        let verdict: ViolationVerdict = parser::parse_json_payload(&response)?;
        Ok(verdict.normalized())
    }
}

impl ViolationAnalyzer for GeminiViolationAnalyzer {
    fn analyze(&self, redacted_jpeg: &[u8], language: &str) -> ViolationVerdict {
        match self.try_analyze(redacted_jpeg, language) {
            Ok(verdict) => {
                info!(
                    "🧾 Verdict: vehicle={} points={} confidence={} reason={:?}",
                    verdict.is_vehicle, verdict.points, verdict.confidence, verdict.rejection_reason
                );
                verdict
            }
            Err(e) => {
                error!("❌ Violation analysis failed: {}", e);
                ViolationVerdict::system_failure()
            }
        }
    }
}
