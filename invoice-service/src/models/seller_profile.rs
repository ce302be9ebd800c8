//! Seller profile: the issuing party's branding and banking details.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Currency labels offered in the invoice form.
pub const CURRENCIES: [&str; 5] = ["ریال", "تومان", "دلار", "یورو", "پوند"];

/// Flat key/value configuration read on every document render and passed
/// by parameter; never ambient state. Initialized once with defaults and
/// mutated only through the settings-save operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerProfile {
    pub company_name: String,
    pub company_address: String,
    pub company_phone: String,
    pub logo_url: String,
    pub signature_url: String,
    pub bank_card: String,
    pub bank_account: String,
    pub bank_name: String,
    pub account_holder: String,
    pub sheba_number: String,
    pub default_currency: String,
}

impl SellerProfile {
    /// Defaults seeded on first start.
    pub fn defaults() -> Self {
        Self {
            company_name: "شرکت کارا خدمات پوراطمینان".to_string(),
            company_address:
                "مازندران _شهرستان نوشهر _ بلوار شهید عمادالدین کریمی_ پاساژ علاءالدین_ واحد ۴۲۹"
                    .to_string(),
            company_phone: "09368182353".to_string(),
            logo_url: String::new(),
            signature_url: String::new(),
            bank_card: "5892101262602341".to_string(),
            bank_account: "892301738209".to_string(),
            bank_name: "سپه".to_string(),
            account_holder: "احمد پوراطمینان".to_string(),
            sheba_number: "IR680150000000892301738209".to_string(),
            default_currency: "ریال".to_string(),
        }
    }

    pub fn from_map(values: &HashMap<String, String>) -> Self {
        let mut profile = Self::defaults();
        profile.apply(values);
        profile
    }

    /// Apply known keys from `values`; unknown keys are ignored.
    pub fn apply(&mut self, values: &HashMap<String, String>) {
        for (key, value) in values {
            match key.as_str() {
                "company_name" => self.company_name = value.clone(),
                "company_address" => self.company_address = value.clone(),
                "company_phone" => self.company_phone = value.clone(),
                "logo_url" => self.logo_url = value.clone(),
                "signature_url" => self.signature_url = value.clone(),
                "bank_card" => self.bank_card = value.clone(),
                "bank_account" => self.bank_account = value.clone(),
                "bank_name" => self.bank_name = value.clone(),
                "account_holder" => self.account_holder = value.clone(),
                "sheba_number" => self.sheba_number = value.clone(),
                "default_currency" => self.default_currency = value.clone(),
                _ => {}
            }
        }
    }

    pub fn to_map(&self) -> HashMap<String, String> {
        HashMap::from([
            ("company_name".to_string(), self.company_name.clone()),
            ("company_address".to_string(), self.company_address.clone()),
            ("company_phone".to_string(), self.company_phone.clone()),
            ("logo_url".to_string(), self.logo_url.clone()),
            ("signature_url".to_string(), self.signature_url.clone()),
            ("bank_card".to_string(), self.bank_card.clone()),
            ("bank_account".to_string(), self.bank_account.clone()),
            ("bank_name".to_string(), self.bank_name.clone()),
            ("account_holder".to_string(), self.account_holder.clone()),
            ("sheba_number".to_string(), self.sheba_number.clone()),
            (
                "default_currency".to_string(),
                self.default_currency.clone(),
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip_through_map() {
        let profile = SellerProfile::defaults();
        let rebuilt = SellerProfile::from_map(&profile.to_map());
        assert_eq!(rebuilt.company_name, profile.company_name);
        assert_eq!(rebuilt.sheba_number, profile.sheba_number);
        assert_eq!(rebuilt.default_currency, "ریال");
    }

    #[test]
    fn test_apply_ignores_unknown_keys() {
        let mut profile = SellerProfile::defaults();
        let original_name = profile.company_name.clone();
        profile.apply(&HashMap::from([
            ("bank_name".to_string(), "ملت".to_string()),
            ("favourite_color".to_string(), "red".to_string()),
        ]));
        assert_eq!(profile.bank_name, "ملت");
        assert_eq!(profile.company_name, original_name);
    }
}
