use serde::Deserialize;

use crate::errors::AppError;
use crate::models::company::EmployeeRange;
use crate::validation::{check_email, check_length, check_password};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCompanyRequest {
    pub company_name: String,
    pub description: String,
    pub industry: String,
    pub address: String,
    #[serde(default)]
    pub number_of_employees: Option<EmployeeRange>,
    pub company_email: String,
    pub password: String,
    pub re_password: String,
}

impl AddCompanyRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        check_length("companyName", &self.company_name, 1, 50)?;
        check_length("description", &self.description, 1, 500)?;
        check_length("industry", &self.industry, 1, 100)?;
        check_length("address", &self.address, 1, 100)?;
        check_email("companyEmail", &self.company_email)?;
        check_password("password", &self.password)?;
        if self.password != self.re_password {
            return Err(AppError::Validation(
                "rePassword does not match password".to_string(),
            ));
        }
        check_employee_range(self.number_of_employees.as_ref())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyRequest {
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub number_of_employees: Option<EmployeeRange>,
    pub company_email: Option<String>,
    pub password: Option<String>,
}

impl UpdateCompanyRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.company_name {
            check_length("companyName", name, 1, 50)?;
        }
        if let Some(description) = &self.description {
            check_length("description", description, 1, 500)?;
        }
        if let Some(industry) = &self.industry {
            check_length("industry", industry, 1, 100)?;
        }
        if let Some(address) = &self.address {
            check_length("address", address, 1, 100)?;
        }
        if let Some(email) = &self.company_email {
            check_email("companyEmail", email)?;
        }
        if let Some(password) = &self.password {
            check_password("password", password)?;
        }
        check_employee_range(self.number_of_employees.as_ref())
    }
}

fn check_employee_range(range: Option<&EmployeeRange>) -> Result<(), AppError> {
    match range {
        Some(range) if range.from > range.to => Err(AppError::Validation(
            "numberOfEmployees.from must not exceed numberOfEmployees.to".to_string(),
        )),
        _ => Ok(()),
    }
}

#[derive(Debug, Deserialize)]
pub struct CompanyNameQuery {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_request() -> AddCompanyRequest {
        AddCompanyRequest {
            company_name: "Acme".to_string(),
            description: "Rockets and anvils".to_string(),
            industry: "Manufacturing".to_string(),
            address: "1 Desert Road".to_string(),
            number_of_employees: Some(EmployeeRange { from: 10, to: 50 }),
            company_email: "hr@acme.test".to_string(),
            password: "Abcdefgh1".to_string(),
            re_password: "Abcdefgh1".to_string(),
        }
    }

    #[test]
    fn test_add_accepts_valid_request() {
        assert!(add_request().validate().is_ok());
    }

    #[test]
    fn test_add_rejects_inverted_employee_range() {
        let mut req = add_request();
        req.number_of_employees = Some(EmployeeRange { from: 50, to: 10 });
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_add_rejects_overlong_name() {
        let mut req = add_request();
        req.company_name = "x".repeat(51);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_allows_empty_body() {
        assert!(UpdateCompanyRequest::default().validate().is_ok());
    }
}
