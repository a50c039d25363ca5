//! Advice requests: prompt assembly and the external text-generation service.

pub mod client;
pub mod prompt;

use tracing::debug;

use crate::errors::Result;

pub use client::{AdviceService, ChatCompletionClient};
pub use prompt::{
    AdvicePrompt, FilingStatus, IncomeSource, InvestmentGoal, InvestmentProfile, RiskTolerance,
    TaxCredit, TaxProfile,
};

/// Builds the prompt for `inputs` and hands it to `service`, returning the raw answer.
pub fn request_advice(service: &dyn AdviceService, inputs: &dyn AdvicePrompt) -> Result<String> {
    let prompt = inputs.build_prompt();
    debug!(chars = prompt.len(), "built advice prompt");
    service.generate(&prompt)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::errors::CashFlowError;

    #[derive(Default)]
    struct RecordingService {
        prompts: RefCell<Vec<String>>,
        fail: bool,
    }

    impl AdviceService for RecordingService {
        fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.borrow_mut().push(prompt.to_string());
            if self.fail {
                Err(CashFlowError::service("quota exceeded"))
            } else {
                Ok(format!("echo: {prompt}"))
            }
        }
    }

    #[test]
    fn prompt_is_delegated_once() {
        let service = RecordingService::default();
        let profile = InvestmentProfile {
            horizon_years: 10,
            ..InvestmentProfile::default()
        };
        let answer = request_advice(&service, &profile).unwrap();
        assert_eq!(service.prompts.borrow().len(), 1);
        assert_eq!(answer, format!("echo: {}", profile.build_prompt()));
    }

    #[test]
    fn service_failure_is_surfaced_without_retry() {
        let service = RecordingService {
            fail: true,
            ..RecordingService::default()
        };
        let err = request_advice(&service, &TaxProfile::default()).unwrap_err();
        assert_eq!(err.to_string(), "Advice service failed: quota exceeded");
        assert_eq!(service.prompts.borrow().len(), 1);
    }
}
