use serde::{Deserialize, Serialize};

use crate::models::validation::is_blank;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seller {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractorType {
    Customer,
    Other(i32),
}

impl ContractorType {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => ContractorType::Customer,
            other => ContractorType::Other(other),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contractor {
    pub id: i64,
    pub contractor_type: ContractorType,
    pub seller_id: i64,
    pub name: String,
    pub full_name: String,
    pub email: String,
    pub mobile: String,
}

impl Contractor {
    pub fn is_customer_of(&self, reseller_id: i64) -> bool {
        self.contractor_type == ContractorType::Customer && self.seller_id == reseller_id
    }

    pub fn display_name(&self) -> &str {
        if is_blank(&self.full_name) {
            &self.name
        } else {
            &self.full_name
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub full_name: String,
}
