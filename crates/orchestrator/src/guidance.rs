//! Synthesized guidance texts for the recovery paths.
//!
//! Every failure mode still produces a useful, user-facing answer.
//! Wording stays apologetic-but-actionable: say what went wrong in
//! plain terms and what the user can do next.

/// Tip appended to low-confidence fallback responses.
pub const REPHRASE_TIP: &str =
    "Tip: mentioning a specific AWS service or instance type helps me route \
     your question to the right specialist.";

/// No enabled capabilities exist; nothing can be invoked.
pub fn system_unavailable() -> String {
    "The routing system has no handlers available right now, so I can't \
     process your request. Please try again shortly."
        .to_string()
}

/// A concrete handler was chosen but failed or timed out.
pub fn handler_failure(handler_id: &str) -> String {
    let specific = match handler_id {
        "cost" => {
            "In the meantime, the AWS Pricing Calculator \
             (https://calculator.aws) gives exact figures for any service."
        }
        _ => "You can retry, or rephrase the question and I'll route it again.",
    };
    format!(
        "I ran into a problem while handling your request with the \
         {handler_id} specialist. {specific}"
    )
}

/// The fallback handler itself could not be invoked.
pub fn fallback_failure() -> String {
    "I couldn't process your request right now. Please try again, or \
     rephrase your question."
        .to_string()
}
