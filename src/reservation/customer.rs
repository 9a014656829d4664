use serde::Serialize;
use tracing::warn;

use crate::models::CustomerOption;

pub const PHONE_NOT_PROVIDED: &str = "Not provided";

/// Contents of the customer details panel
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CustomerDetails {
    pub visible: bool,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// Customer dropdown and the details panel it drives
#[derive(Debug, Clone, Default)]
pub struct CustomerPicker {
    options: Vec<CustomerOption>,
}

impl CustomerPicker {
    pub fn new(options: Vec<CustomerOption>) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &[CustomerOption] {
        &self.options
    }

    /// Details for the chosen option; the blank option hides the panel
    pub fn select(&self, selected_id: &str) -> CustomerDetails {
        if selected_id.is_empty() {
            return CustomerDetails::default();
        }
        let Some(option) = self.options.iter().find(|o| o.id == selected_id) else {
            warn!("No customer option with id '{}'", selected_id);
            return CustomerDetails::default();
        };
        CustomerDetails {
            visible: true,
            name: option.name.clone(),
            email: option.email.clone(),
            phone: option
                .phone
                .clone()
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| PHONE_NOT_PROVIDED.to_string()),
            address: option.address.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picker() -> CustomerPicker {
        CustomerPicker::new(vec![
            CustomerOption {
                id: "1".to_string(),
                name: "Aino Virtanen".to_string(),
                email: "aino@example.fi".to_string(),
                phone: Some("+358401234567".to_string()),
                address: "Rantatie 1".to_string(),
            },
            CustomerOption {
                id: "2".to_string(),
                name: "Eero Korhonen".to_string(),
                email: "eero@example.fi".to_string(),
                phone: Some(String::new()),
                address: "Kuusikuja 4".to_string(),
            },
        ])
    }

    #[test]
    fn selecting_customer_shows_details() {
        let details = picker().select("1");
        assert!(details.visible);
        assert_eq!(details.name, "Aino Virtanen");
        assert_eq!(details.phone, "+358401234567");
    }

    #[test]
    fn missing_phone_is_not_provided() {
        assert_eq!(picker().select("2").phone, PHONE_NOT_PROVIDED);
    }

    #[test]
    fn blank_or_unknown_selection_hides_panel() {
        assert!(!picker().select("").visible);
        assert!(!picker().select("99").visible);
    }
}
