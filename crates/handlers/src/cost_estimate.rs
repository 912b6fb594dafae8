//! Knowledge-base AWS cost estimation.
//!
//! Answers "how much does X cost" queries from a static table of
//! ballpark monthly prices. The figures are deliberately coarse; every
//! response carries a note pointing at the AWS Pricing Calculator for
//! real numbers. No live pricing API is consulted.

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use switchboard_core::capability::Capability;
use switchboard_core::error::HandlerError;
use switchboard_core::handler::{ContextualQuery, Handler, HandlerOutput};
use switchboard_core::intent::Confidence;

/// One knowledge-base line item.
struct PriceEntry {
    /// Substring that identifies the service in a query.
    needle: &'static str,
    /// Human-readable label for the response.
    label: &'static str,
    /// Ballpark monthly price in USD, `None` for usage-based items.
    monthly_usd: Option<f64>,
    /// Usage-based pricing note when `monthly_usd` is `None`.
    usage_note: Option<&'static str>,
}

/// Longest needles first so `db.t3.micro` is never misread as the
/// EC2 `t3.micro`.
const PRICE_TABLE: &[PriceEntry] = &[
    PriceEntry {
        needle: "db.t3.micro",
        label: "RDS db.t3.micro",
        monthly_usd: Some(12.0),
        usage_note: None,
    },
    PriceEntry {
        needle: "db.t3.small",
        label: "RDS db.t3.small",
        monthly_usd: Some(25.0),
        usage_note: None,
    },
    PriceEntry {
        needle: "db.t3.medium",
        label: "RDS db.t3.medium",
        monthly_usd: Some(50.0),
        usage_note: None,
    },
    PriceEntry {
        needle: "t3.micro",
        label: "EC2 t3.micro",
        monthly_usd: Some(7.5),
        usage_note: None,
    },
    PriceEntry {
        needle: "t3.small",
        label: "EC2 t3.small",
        monthly_usd: Some(15.0),
        usage_note: None,
    },
    PriceEntry {
        needle: "t3.medium",
        label: "EC2 t3.medium",
        monthly_usd: Some(30.0),
        usage_note: None,
    },
    PriceEntry {
        needle: "m5.large",
        label: "EC2 m5.large",
        monthly_usd: Some(70.0),
        usage_note: None,
    },
    PriceEntry {
        needle: "nat gateway",
        label: "NAT gateway",
        monthly_usd: Some(45.0),
        usage_note: None,
    },
    PriceEntry {
        needle: "load balancer",
        label: "Application Load Balancer",
        monthly_usd: Some(22.0),
        usage_note: None,
    },
    PriceEntry {
        needle: "alb",
        label: "Application Load Balancer",
        monthly_usd: Some(22.0),
        usage_note: None,
    },
    PriceEntry {
        needle: "s3",
        label: "S3 storage",
        monthly_usd: None,
        usage_note: Some("$0.023/GB-month (standard tier)"),
    },
];

const VERIFY_NOTE: &str =
    "These are knowledge-base estimates; verify exact figures with the AWS Pricing Calculator.";

/// Estimates monthly AWS costs from the built-in table.
#[derive(Debug, Default)]
pub struct CostEstimateHandler;

impl CostEstimateHandler {
    pub fn new() -> Self {
        Self
    }

    /// The capability this handler should be registered under.
    pub fn capability() -> Capability {
        Capability::new("cost", 0.5)
            .with_keywords(["cost", "price", "pricing", "budget", "estimate", "monthly"])
            .with_phrases(["how much", "cost of", "price of", "cost estimate"])
            .with_domain_signals([
                "ec2", "rds", "s3", "lambda", "nat", "alb", "vpc", "instance", "database",
            ])
            .with_action_signals(["cost", "price", "pricing", "estimate", "budget", "much"])
            .with_priority(5)
    }
}

#[async_trait]
impl Handler for CostEstimateHandler {
    fn id(&self) -> &str {
        "cost"
    }

    async fn invoke(&self, query: &ContextualQuery) -> Result<HandlerOutput, HandlerError> {
        // Follow-ups like "what about a larger instance?" name the
        // service only in the prior context, so scan the full render.
        let haystack = query.render().to_lowercase();

        let mut scrubbed = haystack.clone();
        let mut lines = Vec::new();
        let mut facts = serde_json::Map::new();
        let mut total = 0.0_f64;
        let mut priced_items = 0usize;

        for entry in PRICE_TABLE {
            if !scrubbed.contains(entry.needle) {
                continue;
            }
            // Consume the match so shorter needles cannot re-match
            // inside it.
            scrubbed = scrubbed.replace(entry.needle, " ");

            match entry.monthly_usd {
                Some(price) => {
                    lines.push(format!("- {}: ~${price:.2}/month", entry.label));
                    facts.insert(format!("price.{}", entry.needle), json!(price));
                    total += price;
                    priced_items += 1;
                }
                None => {
                    let note = entry.usage_note.unwrap_or("usage-based");
                    lines.push(format!("- {}: {note}", entry.label));
                    facts.insert(format!("price.{}", entry.needle), json!(note));
                }
            }
        }

        debug!(identified = lines.len(), "Cost estimation lookup");

        let content = if lines.is_empty() {
            format!(
                "I could not match a specific service in your question, but here are \
                 common ballpark monthly prices:\n\
                 - EC2 t3.micro: ~$7.50/month\n\
                 - EC2 t3.small: ~$15.00/month\n\
                 - RDS db.t3.micro: ~$12.00/month\n\
                 - NAT gateway: ~$45.00/month\n\
                 - S3 storage: $0.023/GB-month\n\n\
                 Mention a specific instance type or service for an itemized estimate. \
                 {VERIFY_NOTE}"
            )
        } else {
            let mut body = String::from("Estimated monthly costs:\n");
            body.push_str(&lines.join("\n"));
            if priced_items > 0 {
                body.push_str(&format!("\n\nEstimated monthly total: ~${total:.2}"));
            }
            body.push_str(&format!("\n\n{VERIFY_NOTE}"));
            body
        };

        if priced_items > 0 {
            facts.insert("estimated_monthly_total".into(), json!(total));
        }

        let mut output = HandlerOutput::text(content).with_confidence(Confidence::Medium);
        for (key, value) in facts {
            output = output.with_fact(key, value);
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn itemizes_a_named_instance() {
        let handler = CostEstimateHandler::new();
        let query = ContextualQuery::bare("how much does a t3.micro cost per month?");
        let output = handler.invoke(&query).await.unwrap();

        assert!(output.content.contains("EC2 t3.micro: ~$7.50/month"));
        assert!(output.content.contains("Estimated monthly total: ~$7.50"));
        assert!(output.content.contains("Pricing Calculator"));
        assert_eq!(output.facts["price.t3.micro"], json!(7.5));
        assert_eq!(output.facts["estimated_monthly_total"], json!(7.5));
        assert_eq!(output.confidence, Some(Confidence::Medium));
    }

    #[tokio::test]
    async fn rds_instance_is_not_mistaken_for_ec2() {
        let handler = CostEstimateHandler::new();
        let query = ContextualQuery::bare("what does a db.t3.micro run me monthly?");
        let output = handler.invoke(&query).await.unwrap();

        assert!(output.content.contains("RDS db.t3.micro: ~$12.00/month"));
        assert!(!output.content.contains("EC2 t3.micro"));
        assert_eq!(output.facts["estimated_monthly_total"], json!(12.0));
    }

    #[tokio::test]
    async fn sums_multiple_services() {
        let handler = CostEstimateHandler::new();
        let query =
            ContextualQuery::bare("price for an m5.large plus a nat gateway and an alb please");
        let output = handler.invoke(&query).await.unwrap();

        // 70 + 45 + 22
        assert_eq!(output.facts["estimated_monthly_total"], json!(137.0));
    }

    #[tokio::test]
    async fn usage_based_items_are_listed_but_not_totaled() {
        let handler = CostEstimateHandler::new();
        let query = ContextualQuery::bare("estimate s3 and a t3.small");
        let output = handler.invoke(&query).await.unwrap();

        assert!(output.content.contains("S3 storage: $0.023/GB-month"));
        assert_eq!(output.facts["estimated_monthly_total"], json!(15.0));
    }

    #[tokio::test]
    async fn follow_up_resolves_service_from_prior_context() {
        let handler = CostEstimateHandler::new();
        let query = ContextualQuery::with_context(
            "user: how much is a t3.micro\nassistant: EC2 t3.micro: ~$7.50/month",
            "and with a nat gateway?",
        );
        let output = handler.invoke(&query).await.unwrap();

        assert!(output.content.contains("NAT gateway"));
        assert!(output.content.contains("EC2 t3.micro"));
    }

    #[tokio::test]
    async fn unknown_service_gets_overview() {
        let handler = CostEstimateHandler::new();
        let query = ContextualQuery::bare("what would dynamodb cost?");
        let output = handler.invoke(&query).await.unwrap();

        assert!(output.content.contains("common ballpark monthly prices"));
        assert!(!output.facts.contains_key("estimated_monthly_total"));
    }

    #[test]
    fn capability_is_valid() {
        assert!(CostEstimateHandler::capability().validate().is_ok());
    }
}
