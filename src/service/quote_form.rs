use crate::model::quote::{BudgetRange, QuoteField, QuoteRequest};
use tracing::debug;

/// Reference used when no field contributes a fragment to the smart ID.
pub const FALLBACK_SMART_ID: &str = "COT";

const GREETING: &str = "Hola, quisiera solicitar una cotización.";

/// Client-held state of the quote form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteForm {
    request: QuoteRequest,
}

impl QuoteForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_request(request: QuoteRequest) -> Self {
        Self { request }
    }

    pub fn request(&self) -> &QuoteRequest {
        &self.request
    }

    /// Sets a field from raw input. Budget accepts its key or label; anything
    /// else clears it.
    pub fn update(&mut self, field: QuoteField, value: impl Into<String>) {
        let value = value.into();
        debug!(field = ?field, "Updating quote form field");
        match field {
            QuoteField::ProjectType => self.request.project_type = value,
            QuoteField::Area => self.request.area = value,
            QuoteField::District => self.request.district = value,
            QuoteField::FinishLevel => self.request.finish_level = value,
            QuoteField::Budget => self.request.budget = BudgetRange::parse(&value),
            QuoteField::Name => self.request.name = value,
            QuoteField::Contact => self.request.contact = value,
            QuoteField::Notes => self.request.notes = value,
        }
    }

    pub fn set_budget(&mut self, budget: Option<BudgetRange>) {
        self.request.budget = budget;
    }

    pub fn reset(&mut self) {
        self.request = QuoteRequest::default();
    }

    pub fn missing_required(&self) -> Vec<QuoteField> {
        QuoteField::ALL
            .into_iter()
            .filter(|f| f.is_required() && self.request.value(*f).is_none())
            .collect()
    }

    /// Submit is enabled iff every required field is non-blank.
    pub fn can_submit(&self) -> bool {
        self.missing_required().is_empty()
    }

    /// `Label: value` for every populated field, in display order.
    pub fn summary_lines(&self) -> Vec<String> {
        QuoteField::ALL
            .into_iter()
            .filter_map(|f| self.request.value(f).map(|v| format!("{}: {}", f.label(), v)))
            .collect()
    }

    /// Human-readable reference built from truncated field fragments.
    /// Not unique.
    pub fn smart_id(&self) -> String {
        let fragment = |field: QuoteField| -> Option<String> {
            let value = self.request.value(field)?;
            let head: String = value
                .chars()
                .filter(|c| c.is_alphanumeric())
                .take(3)
                .flat_map(char::to_uppercase)
                .collect();
            (!head.is_empty()).then_some(head)
        };

        let area = self
            .request
            .area_value()
            .map(|a| (a.trunc() as u64).to_string());

        let parts: Vec<String> = [
            fragment(QuoteField::ProjectType),
            area,
            fragment(QuoteField::District),
            fragment(QuoteField::Name),
        ]
        .into_iter()
        .flatten()
        .collect();

        if parts.is_empty() {
            FALLBACK_SMART_ID.to_string()
        } else {
            parts.join("-")
        }
    }

    /// Full message sent through the messaging deep link.
    pub fn message(&self, ticket_number: u64) -> String {
        let mut out = String::new();
        out.push_str(GREETING);
        out.push('\n');
        out.push_str(&format!(
            "Ticket N° {} · Ref. {}",
            format_ticket(ticket_number),
            self.smart_id()
        ));
        out.push_str("\n\n");
        out.push_str(&self.summary_lines().join("\n"));
        out
    }
}

pub fn format_ticket(ticket_number: u64) -> String {
    format!("{:04}", ticket_number)
}

/// `https://wa.me/<digits>?text=<encoded>`; non-digits are dropped from the number.
pub fn whatsapp_link(base_url: &str, number: &str, text: &str) -> String {
    let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
    format!(
        "{}/{}?text={}",
        base_url.trim_end_matches('/'),
        digits,
        urlencoding::encode(text)
    )
}
