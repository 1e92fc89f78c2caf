use estudio_backend::model::quote::{BudgetRange, QuoteField};
use estudio_backend::service::quote_form::QuoteForm;

fn example_form() -> QuoteForm {
    let mut form = QuoteForm::new();
    form.update(QuoteField::ProjectType, "Azotea");
    form.update(QuoteField::Area, "40");
    form.update(QuoteField::District, "Miraflores");
    form.update(QuoteField::Name, "Ana");
    form
}

fn labeled_lines(message: &str) -> Vec<&str> {
    message.lines().filter(|l| l.contains(": ")).collect()
}

#[cfg(test)]
mod gating_tests {
    use super::*;

    const REQUIRED: [QuoteField; 4] = [
        QuoteField::ProjectType,
        QuoteField::Area,
        QuoteField::District,
        QuoteField::Name,
    ];

    #[test]
    fn test_submit_enabled_iff_all_required_present() {
        // Every subset of the required fields
        for mask in 0u8..16 {
            let mut form = QuoteForm::new();
            form.update(QuoteField::Notes, "irrelevante");
            for (i, field) in REQUIRED.iter().enumerate() {
                if mask & (1 << i) != 0 {
                    form.update(*field, "x");
                }
            }
            assert_eq!(form.can_submit(), mask == 0b1111, "mask {:04b}", mask);
            assert_eq!(form.missing_required().len(), 4 - mask.count_ones() as usize);
        }
    }

    #[test]
    fn test_whitespace_counts_as_empty() {
        let mut form = example_form();
        form.update(QuoteField::Name, "   ");
        assert!(!form.can_submit());
        assert_eq!(form.missing_required(), vec![QuoteField::Name]);
    }

    #[test]
    fn test_optional_fields_do_not_gate() {
        let form = example_form();
        assert!(form.can_submit());
        assert!(form.request().budget.is_none());
    }
}

#[cfg(test)]
mod message_tests {
    use super::*;

    #[test]
    fn test_example_message_has_four_labeled_lines() {
        let message = example_form().message(1);
        let lines = labeled_lines(&message);

        assert_eq!(
            lines,
            vec![
                "Tipo de proyecto: Azotea",
                "Área: 40",
                "Distrito: Miraflores",
                "Nombre: Ana",
            ]
        );
        assert!(!message.contains("Rango de inversión"));
        assert!(!message.contains("Notas"));
    }

    #[test]
    fn test_header_carries_ticket_and_smart_id() {
        let message = example_form().message(42);
        assert!(message.contains("Ticket N° 0042 · Ref. AZO-40-MIR-ANA"));
    }

    #[test]
    fn test_all_fields_in_fixed_order() {
        let mut form = QuoteForm::new();
        // Filled in reverse on purpose
        form.update(QuoteField::Notes, "Con jardinera");
        form.update(QuoteField::Contact, "+51 999 888 777");
        form.update(QuoteField::Name, "Luis");
        form.set_budget(Some(BudgetRange::From25kTo50k));
        form.update(QuoteField::FinishLevel, "Premium");
        form.update(QuoteField::District, "Barranco");
        form.update(QuoteField::Area, "85 m2");
        form.update(QuoteField::ProjectType, "Terraza");

        assert_eq!(
            form.summary_lines(),
            vec![
                "Tipo de proyecto: Terraza",
                "Área: 85 m2",
                "Distrito: Barranco",
                "Nivel de acabado: Premium",
                "Rango de inversión: S/ 25,000 - S/ 50,000",
                "Nombre: Luis",
                "Contacto: +51 999 888 777",
                "Notas: Con jardinera",
            ]
        );
    }

    #[test]
    fn test_thousands_separator_in_area_keeps_smart_id_fragment() {
        let mut form = example_form();
        form.update(QuoteField::Area, "1,200 m2");
        assert_eq!(form.smart_id(), "AZO-1200-MIR-ANA");
        assert!(form.summary_lines().contains(&"Área: 1,200 m2".to_string()));
    }

    #[test]
    fn test_values_are_trimmed() {
        let mut form = example_form();
        form.update(QuoteField::District, "  Surco  ");
        assert!(form.summary_lines().contains(&"Distrito: Surco".to_string()));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut form = example_form();
        form.set_budget(Some(BudgetRange::Over100k));
        form.reset();
        assert_eq!(form, QuoteForm::new());
        assert!(form.summary_lines().is_empty());
    }
}
