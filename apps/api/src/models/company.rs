use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmployeeRange {
    pub from: u32,
    pub to: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub company_name: String,
    pub description: String,
    pub industry: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_employees: Option<EmployeeRange>,
    pub company_email: String,
    /// bcrypt hash.
    pub password: String,
    /// Owning HR user; the only identity allowed to mutate or delete.
    pub company_hr: ObjectId,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Company {
    pub fn public(&self) -> PublicCompany {
        PublicCompany {
            id: self.id,
            company_name: self.company_name.clone(),
            company_email: self.company_email.clone(),
            description: self.description.clone(),
            industry: self.industry.clone(),
            address: self.address.clone(),
            number_of_employees: self.number_of_employees,
            company_hr: self.company_hr,
        }
    }
}

/// Response shape for company data; never exposes the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicCompany {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub company_name: String,
    pub company_email: String,
    pub description: String,
    pub industry: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_employees: Option<EmployeeRange>,
    pub company_hr: ObjectId,
}
