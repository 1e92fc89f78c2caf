use serde::{Deserialize, Serialize};
use validator::Validate;

/// Investment ranges offered by the quote form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetRange {
    #[serde(rename = "up-to-10k")]
    UpTo10k,
    #[serde(rename = "10k-25k")]
    From10kTo25k,
    #[serde(rename = "25k-50k")]
    From25kTo50k,
    #[serde(rename = "50k-100k")]
    From50kTo100k,
    #[serde(rename = "over-100k")]
    Over100k,
}

impl BudgetRange {
    pub const ALL: [BudgetRange; 5] = [
        BudgetRange::UpTo10k,
        BudgetRange::From10kTo25k,
        BudgetRange::From25kTo50k,
        BudgetRange::From50kTo100k,
        BudgetRange::Over100k,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            BudgetRange::UpTo10k => "up-to-10k",
            BudgetRange::From10kTo25k => "10k-25k",
            BudgetRange::From25kTo50k => "25k-50k",
            BudgetRange::From50kTo100k => "50k-100k",
            BudgetRange::Over100k => "over-100k",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BudgetRange::UpTo10k => "Hasta S/ 10,000",
            BudgetRange::From10kTo25k => "S/ 10,000 - S/ 25,000",
            BudgetRange::From25kTo50k => "S/ 25,000 - S/ 50,000",
            BudgetRange::From50kTo100k => "S/ 50,000 - S/ 100,000",
            BudgetRange::Over100k => "Más de S/ 100,000",
        }
    }

    /// Accepts either the wire key or the display label.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|b| b.key().eq_ignore_ascii_case(value) || b.label() == value)
    }
}

/// Fields of the quote form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuoteField {
    ProjectType,
    Area,
    District,
    FinishLevel,
    Budget,
    Name,
    Contact,
    Notes,
}

impl QuoteField {
    pub const ALL: [QuoteField; 8] = [
        QuoteField::ProjectType,
        QuoteField::Area,
        QuoteField::District,
        QuoteField::FinishLevel,
        QuoteField::Budget,
        QuoteField::Name,
        QuoteField::Contact,
        QuoteField::Notes,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            QuoteField::ProjectType => "Tipo de proyecto",
            QuoteField::Area => "Área",
            QuoteField::District => "Distrito",
            QuoteField::FinishLevel => "Nivel de acabado",
            QuoteField::Budget => "Rango de inversión",
            QuoteField::Name => "Nombre",
            QuoteField::Contact => "Contacto",
            QuoteField::Notes => "Notas",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(
            self,
            QuoteField::ProjectType | QuoteField::Area | QuoteField::District | QuoteField::Name
        )
    }
}

/// A prospective client's project intake, as held by the quote form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteRequest {
    #[validate(length(max = 100))]
    pub project_type: String,

    #[validate(length(max = 30))]
    #[serde(deserialize_with = "deserialize_area")]
    pub area: String,

    #[validate(length(max = 100))]
    pub district: String,

    #[validate(length(max = 100))]
    pub finish_level: String,

    #[serde(deserialize_with = "deserialize_budget")]
    pub budget: Option<BudgetRange>,

    #[validate(length(max = 100))]
    pub name: String,

    #[validate(length(max = 100))]
    pub contact: String,

    #[validate(length(max = 2000))]
    pub notes: String,
}

/// Blank or unknown budget strings read as "not chosen" instead of failing the form.
fn deserialize_budget<'de, D>(deserializer: D) -> Result<Option<BudgetRange>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(BudgetRange::parse))
}

/// The area input is numeric on some forms and free text on others.
fn deserialize_area<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Area {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Area>::deserialize(deserializer)? {
        Some(Area::Text(s)) => s,
        Some(Area::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

impl QuoteRequest {
    /// Display value of a field, `None` when the field is blank.
    pub fn value(&self, field: QuoteField) -> Option<&str> {
        let raw = match field {
            QuoteField::ProjectType => self.project_type.as_str(),
            QuoteField::Area => self.area.as_str(),
            QuoteField::District => self.district.as_str(),
            QuoteField::FinishLevel => self.finish_level.as_str(),
            QuoteField::Budget => return self.budget.map(|b| b.label()),
            QuoteField::Name => self.name.as_str(),
            QuoteField::Contact => self.contact.as_str(),
            QuoteField::Notes => self.notes.as_str(),
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }

    /// Leading number of the free-unit area, e.g. `"40 m2"` -> `40.0`.
    ///
    /// A comma followed by exactly three digits groups thousands
    /// (`"1,200"` -> `1200.0`); a lone comma with fewer digits after it is a
    /// decimal comma (`"12,5"` -> `12.5`).
    pub fn area_value(&self) -> Option<f64> {
        let run: String = self
            .area
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
            .collect();

        let groups: Vec<&str> = run.split(',').collect();
        let thousands = groups.len() > 1
            && groups[1..].iter().enumerate().all(|(i, g)| {
                let digits = g.split('.').next().unwrap_or("");
                let is_last = i == groups.len() - 2;
                digits.len() == 3 && (is_last || !g.contains('.'))
            });

        let number = if thousands {
            run.replace(',', "")
        } else if groups.len() == 2 && !run.contains('.') {
            run.replace(',', ".")
        } else {
            run
        };
        number.parse().ok()
    }
}
