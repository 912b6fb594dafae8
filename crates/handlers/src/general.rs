//! Catch-all conversational handler.

use async_trait::async_trait;

use switchboard_core::capability::Capability;
use switchboard_core::error::HandlerError;
use switchboard_core::handler::{ContextualQuery, Handler, HandlerOutput};
use switchboard_core::intent::Confidence;

/// The default handler: answers anything the specialists decline, with
/// general guidance and examples of queries that route well.
#[derive(Debug, Default)]
pub struct GeneralHandler;

impl GeneralHandler {
    pub fn new() -> Self {
        Self
    }

    /// Broad, low-priority capability. The low threshold means it is
    /// eligible for almost anything; the low priority means any
    /// specialist that also qualifies wins.
    pub fn capability() -> Capability {
        Capability::new("general", 0.1)
            .with_keywords(["help", "explain", "what", "how", "aws"])
            .with_priority(1)
    }
}

#[async_trait]
impl Handler for GeneralHandler {
    fn id(&self) -> &str {
        "general"
    }

    async fn invoke(&self, query: &ContextualQuery) -> Result<HandlerOutput, HandlerError> {
        let content = format!(
            "I can help with AWS architecture and cost questions. You asked: \
             \"{}\"\n\n\
             For the most useful answers, try questions like:\n\
             - \"How much does a t3.micro cost per month?\"\n\
             - \"Estimate the monthly cost of an m5.large plus a NAT gateway\"\n\
             - \"What is the price of RDS db.t3.small?\"",
            query.current
        );
        Ok(HandlerOutput::text(content).with_confidence(Confidence::Low))
    }
}
