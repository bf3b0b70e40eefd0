use serde::Deserialize;

use crate::errors::AppError;
use crate::models::job::{JobLocation, SeniorityLevel, WorkingTime};
use crate::validation::{check_length, check_object_id};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddJobRequest {
    pub job_title: String,
    pub job_location: JobLocation,
    pub working_time: WorkingTime,
    pub seniority_level: SeniorityLevel,
    pub job_description: String,
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub company_id: String,
}

impl AddJobRequest {
    pub fn validate(&self) -> Result<mongodb::bson::oid::ObjectId, AppError> {
        check_length("jobTitle", &self.job_title, 1, 50)?;
        check_length("jobDescription", &self.job_description, 1, 500)?;
        check_skills("technicalSkills", &self.technical_skills)?;
        check_skills("softSkills", &self.soft_skills)?;
        check_object_id("companyId", &self.company_id)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    pub job_title: Option<String>,
    pub job_location: Option<JobLocation>,
    pub working_time: Option<WorkingTime>,
    pub seniority_level: Option<SeniorityLevel>,
    pub job_description: Option<String>,
    pub technical_skills: Option<Vec<String>>,
    pub soft_skills: Option<Vec<String>>,
}

impl UpdateJobRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(title) = &self.job_title {
            check_length("jobTitle", title, 1, 50)?;
        }
        if let Some(description) = &self.job_description {
            check_length("jobDescription", description, 1, 500)?;
        }
        if let Some(skills) = &self.technical_skills {
            check_skills("technicalSkills", skills)?;
        }
        if let Some(skills) = &self.soft_skills {
            check_skills("softSkills", skills)?;
        }
        Ok(())
    }
}

fn check_skills(field: &str, skills: &[String]) -> Result<(), AppError> {
    if skills.is_empty() || skills.iter().any(|s| s.trim().is_empty()) {
        return Err(AppError::Validation(format!(
            "{field} must be a non-empty list of non-empty entries"
        )));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyNameQuery {
    pub company_name: String,
}
