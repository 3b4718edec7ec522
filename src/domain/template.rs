//! Boilerplate email bodies for the three draft categories.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::client::Client;
use crate::domain::types::TypeConstraintError;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TemplateType {
    Discovery,
    Chase,
    Letter,
}

/// Advisor details appended to every rendered template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub sender_name: String,
    pub sender_title: String,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct RenderedTemplate {
    pub subject: String,
    pub body: String,
    pub attachments: Vec<String>,
}

impl TemplateType {
    pub const fn as_str(self) -> &'static str {
        match self {
            TemplateType::Discovery => "discovery",
            TemplateType::Chase => "chase",
            TemplateType::Letter => "letter",
        }
    }

    /// Files sent alongside the template.
    pub fn attachments(self) -> Vec<String> {
        let names: &[&str] = match self {
            TemplateType::Discovery => &["Document_Checklist.pdf", "Privacy_Notice.pdf"],
            TemplateType::Chase => &[],
            TemplateType::Letter => &["Letter_of_Recommendation.pdf", "Product_Illustrations.pdf"],
        };
        names.iter().map(|name| name.to_string()).collect()
    }

    pub fn render(self, client: &Client, signature: &Signature) -> RenderedTemplate {
        let first_name = client
            .full_name
            .split_whitespace()
            .next()
            .unwrap_or(client.full_name.as_str());
        let products = bullet_list(client.products.iter().map(String::as_str));
        let sign_off = format!(
            "Kind regards,\n{}\n{}",
            signature.sender_name, signature.sender_title
        );

        match self {
            TemplateType::Discovery => RenderedTemplate {
                subject: format!("Follow-up from your Discovery Call - {}", client.full_name),
                body: format!(
                    "Dear {first_name},\n\n\
                     Thank you for taking the time to speak with us during your discovery call. \
                     It was great to learn more about your financial goals.\n\n\
                     Based on our conversation, I've identified the following areas we can help you with:\n\
                     {products}\n\n\
                     Next Steps:\n\
                     1. Please complete your CashCalc fact find (link in separate email)\n\
                     2. Complete the risk profiler questionnaire\n\
                     3. Gather the required documents\n\n\
                     If you have any questions, please don't hesitate to reach out.\n\n\
                     {sign_off}"
                ),
                attachments: self.attachments(),
            },
            TemplateType::Chase => {
                let mut outstanding = Vec::new();
                if !client.cashcalc_complete {
                    outstanding.push("CashCalc fact find completion".to_string());
                }
                if !client.typeform_complete {
                    outstanding.push("Risk profiler questionnaire".to_string());
                }
                if client.docs_outstanding() {
                    outstanding.push(format!(
                        "Outstanding documents ({} remaining)",
                        client.outstanding_docs()
                    ));
                }
                let outstanding = bullet_list(outstanding.iter().map(String::as_str));
                RenderedTemplate {
                    subject: format!("Reminder: Outstanding Items - {}", client.full_name),
                    body: format!(
                        "Dear {first_name},\n\n\
                         I hope this email finds you well. I wanted to follow up regarding your \
                         financial planning application.\n\n\
                         We're still waiting for the following items:\n\
                         {outstanding}\n\n\
                         Once we receive these items, we can proceed to the next stage of your application.\n\n\
                         Please let me know if you need any assistance or have any questions.\n\n\
                         {sign_off}"
                    ),
                    attachments: self.attachments(),
                }
            }
            TemplateType::Letter => RenderedTemplate {
                subject: format!("Your Letter of Recommendation - {}", client.full_name),
                body: format!(
                    "Dear {first_name},\n\n\
                     Please find attached your Letter of Recommendation outlining our proposed solutions for:\n\
                     {products}\n\n\
                     Please review the document carefully and let me know if you have any questions.\n\n\
                     Once you're happy to proceed, please sign the attached document using Adobe Sign \
                     (link will be sent separately).\n\n\
                     {sign_off}"
                ),
                attachments: self.attachments(),
            },
        }
    }
}

fn bullet_list<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items
        .map(|item| format!("• {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Upper-cases the first character, e.g. `discovery` -> `Discovery`.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Display for TemplateType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TemplateType {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "discovery" => Ok(TemplateType::Discovery),
            "chase" => Ok(TemplateType::Chase),
            "letter" => Ok(TemplateType::Letter),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown template type `{other}`"
            ))),
        }
    }
}
