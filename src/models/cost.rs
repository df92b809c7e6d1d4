use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostPart {
    pub id: Uuid,
    /// e.g. "Induction Fee", "Final Fee", "Provider Fee".
    #[serde(rename = "type")]
    pub cost_type: String,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub paid_at: Option<DateTime<Utc>>,
}

impl CostPart {
    pub fn unpaid(cost_type: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            cost_type: cost_type.into(),
            amount,
            status: PaymentStatus::Unpaid,
            paid_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSettings {
    pub kit_polo_shirt: Decimal,
    pub kit_jacket: Decimal,
    pub kit_hi_vis: Decimal,
    pub kit_tablet: Decimal,
    pub kit_lanyard: Decimal,
    pub kit_dash_cam: Decimal,
    /// Replacement if missing.
    pub kit_trade_plates: Decimal,
    /// Replacement if missing.
    pub kit_fuel_card: Decimal,

    // Charges raised on termination
    pub kit_trade_plates_damaged: Decimal,
    pub kit_aa_card: Decimal,
    pub kit_uniform: Decimal,
    pub insurance: Decimal,

    // Recurring
    pub kit_fuel_card_weekly: Decimal,
    pub kit_trade_plates_yearly: Decimal,

    // Provider fees
    pub tpj_induction_fee: Decimal,
    pub tpj_final_fee: Decimal,
}

impl Default for CostSettings {
    fn default() -> Self {
        let gbp = |pounds: i64| Decimal::new(pounds, 0);
        Self {
            kit_polo_shirt: gbp(15),
            kit_jacket: gbp(40),
            kit_hi_vis: gbp(10),
            kit_tablet: gbp(150),
            kit_lanyard: gbp(25),
            kit_dash_cam: gbp(155),
            kit_trade_plates: gbp(180),
            kit_fuel_card: gbp(50),
            kit_trade_plates_damaged: gbp(30),
            kit_aa_card: gbp(50),
            kit_uniform: gbp(120),
            insurance: gbp(100),
            kit_fuel_card_weekly: gbp(25),
            kit_trade_plates_yearly: gbp(2000),
            tpj_induction_fee: gbp(150),
            tpj_final_fee: gbp(150),
        }
    }
}
