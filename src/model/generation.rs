//! Generation flow state
//!
//! `Idle -> Submitting -> (Success | Failure) -> Idle`. The flow owns what the
//! result pane shows: the loading indicator, the last result and the last
//! error.

use crate::error::GenerationError;
use std::time::{Duration, Instant};

/// A validated prompt ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
}

impl GenerationRequest {
    /// Validate a prompt. The prompt is kept as typed; trimming only decides
    /// whether it is empty.
    pub fn new(prompt: &str) -> Result<Self, GenerationError> {
        if prompt.trim().is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }
        Ok(Self {
            prompt: prompt.to_string(),
        })
    }

    /// Form fields sent to the backend
    pub fn form_fields(&self) -> [(&'static str, &str); 1] {
        [("prompt", self.prompt.as_str())]
    }
}

/// A successful generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub image_url: String,
    pub prompt: String,
}

/// Identifies one submission so late completions can be discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting {
        ticket: Ticket,
        prompt: String,
        started_at: Instant,
    },
}

#[derive(Debug)]
pub struct GenerationFlow {
    phase: Phase,
    next_ticket: u64,
    /// Last successful result
    pub result: Option<GenerationResult>,
    /// Last error message
    pub error: Option<String>,
}

impl Default for GenerationFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationFlow {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            next_ticket: 0,
            result: None,
            error: None,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Whether the loading indicator is shown
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Submitting { .. })
    }

    /// Time spent waiting on the current submission
    pub fn elapsed(&self) -> Option<Duration> {
        match &self.phase {
            Phase::Submitting { started_at, .. } => Some(started_at.elapsed()),
            Phase::Idle => None,
        }
    }

    /// Try to enter `Submitting`.
    ///
    /// An in-flight submission rejects the new one and is left untouched.
    /// An empty prompt leaves the flow idle and shows the validation error.
    /// Otherwise the previous result and error are cleared.
    pub fn submit(&mut self, prompt: &str) -> Result<(Ticket, GenerationRequest), GenerationError> {
        if self.is_loading() {
            return Err(GenerationError::InFlight);
        }

        let request = match GenerationRequest::new(prompt) {
            Ok(request) => request,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e);
            }
        };

        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;

        self.result = None;
        self.error = None;
        self.phase = Phase::Submitting {
            ticket,
            prompt: request.prompt.clone(),
            started_at: Instant::now(),
        };

        Ok((ticket, request))
    }

    /// Finish the submission identified by `ticket`.
    ///
    /// Returns the result on success. Completions for any other ticket are
    /// ignored and return `None`. The flow is idle afterwards either way.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<String, GenerationError>,
    ) -> Option<GenerationResult> {
        let prompt = match &self.phase {
            Phase::Submitting {
                ticket: current,
                prompt,
                ..
            } if *current == ticket => prompt.clone(),
            _ => return None,
        };

        self.phase = Phase::Idle;

        match outcome {
            Ok(image_url) => {
                let result = GenerationResult { image_url, prompt };
                self.result = Some(result.clone());
                Some(result)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_rejects_blank_prompts() {
        for prompt in ["", " ", "\t\n  "] {
            assert_eq!(GenerationRequest::new(prompt), Err(GenerationError::EmptyPrompt));
        }
    }

    #[test]
    fn test_request_keeps_prompt_as_typed() {
        let request = GenerationRequest::new("  a red fox ").unwrap();
        assert_eq!(request.prompt, "  a red fox ");
        assert_eq!(request.form_fields(), [("prompt", "  a red fox ")]);
    }

    #[test]
    fn test_empty_submit_stays_idle_with_error() {
        let mut flow = GenerationFlow::new();
        assert_eq!(flow.submit("   ").unwrap_err(), GenerationError::EmptyPrompt);
        assert!(!flow.is_loading());
        assert_eq!(
            flow.error.as_deref(),
            Some("Please enter a prompt for the image generation")
        );
    }

    #[test]
    fn test_submit_clears_previous_result_and_error() {
        let mut flow = GenerationFlow::new();
        flow.error = Some("old error".into());
        flow.result = Some(GenerationResult {
            image_url: "/old.png".into(),
            prompt: "old".into(),
        });

        flow.submit("a new prompt").unwrap();
        assert!(flow.is_loading());
        assert!(flow.error.is_none());
        assert!(flow.result.is_none());
    }

    #[test]
    fn test_second_submit_is_rejected_while_in_flight() {
        let mut flow = GenerationFlow::new();
        let (ticket, _) = flow.submit("first").unwrap();
        assert_eq!(flow.submit("second").unwrap_err(), GenerationError::InFlight);

        // The running submission is untouched
        match flow.phase() {
            Phase::Submitting { ticket: t, prompt, .. } => {
                assert_eq!(*t, ticket);
                assert_eq!(prompt, "first");
            }
            Phase::Idle => panic!("flow should still be submitting"),
        }
    }

    #[test]
    fn test_success_returns_to_idle_with_result() {
        let mut flow = GenerationFlow::new();
        let (ticket, _) = flow.submit("a red fox").unwrap();
        let result = flow.complete(ticket, Ok("/static/images/fox.png".into()));

        let expected = GenerationResult {
            image_url: "/static/images/fox.png".into(),
            prompt: "a red fox".into(),
        };
        assert_eq!(result, Some(expected.clone()));
        assert_eq!(flow.result, Some(expected));
        assert!(!flow.is_loading());
        assert!(flow.error.is_none());
    }

    #[test]
    fn test_failure_returns_to_idle_with_error() {
        let mut flow = GenerationFlow::new();
        let (ticket, _) = flow.submit("a red fox").unwrap();
        let result = flow.complete(ticket, Err(GenerationError::Request("Model overloaded".into())));

        assert!(result.is_none());
        assert!(!flow.is_loading());
        assert_eq!(flow.error.as_deref(), Some("Model overloaded"));
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut flow = GenerationFlow::new();
        let (first, _) = flow.submit("first").unwrap();
        flow.complete(first, Err(GenerationError::Request("boom".into())));
        let (_second, _) = flow.submit("second").unwrap();

        assert!(flow.complete(first, Ok("/late.png".into())).is_none());
        assert!(flow.is_loading());
        assert!(flow.result.is_none());
    }
}
