//! Excel export: a company's applications for one calendar day, one row per
//! application, flattened from the job/user documents they reference.

use std::collections::HashMap;

use mongodb::bson::oid::ObjectId;
use rust_xlsxwriter::Workbook;

use crate::errors::AppError;
use crate::models::application::Application;
use crate::models::job::Job;
use crate::models::user::User;

pub const EXPORT_HEADERS: [&str; 6] = [
    "JobTitle",
    "ApplicantName",
    "TechnicalSkills",
    "SoftSkills",
    "ResumeLink",
    "DateApplied",
];

pub const WORKSHEET_NAME: &str = "Applications";

#[derive(Debug, PartialEq)]
pub struct ExportRow {
    pub job_title: String,
    pub applicant_name: String,
    pub technical_skills: String,
    pub soft_skills: String,
    pub resume_link: String,
    pub date_applied: String,
}

pub fn flatten_rows(
    applications: &[Application],
    jobs_by_id: &HashMap<ObjectId, &Job>,
    users_by_id: &HashMap<ObjectId, &User>,
) -> Vec<ExportRow> {
    applications
        .iter()
        .map(|application| ExportRow {
            job_title: jobs_by_id
                .get(&application.job_id)
                .map(|j| j.job_title.clone())
                .unwrap_or_default(),
            applicant_name: users_by_id
                .get(&application.user_id)
                .map(|u| u.username.clone())
                .unwrap_or_default(),
            technical_skills: application.user_technical_skills.join(", "),
            soft_skills: application.user_soft_skills.join(", "),
            resume_link: application.resume.clone(),
            date_applied: application
                .created_at
                .to_chrono()
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        })
        .collect()
}

/// Builds the spreadsheet in memory and returns the `.xlsx` bytes.
pub fn build_workbook(rows: &[ExportRow]) -> Result<Vec<u8>, AppError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(WORKSHEET_NAME)
        .map_err(|e| AppError::Export(e.to_string()))?;

    for (col, header) in EXPORT_HEADERS.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| AppError::Export(e.to_string()))?;
    }
    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        let cells = [
            &row.job_title,
            &row.applicant_name,
            &row.technical_skills,
            &row.soft_skills,
            &row.resume_link,
            &row.date_applied,
        ];
        for (col, cell) in cells.iter().enumerate() {
            worksheet
                .write_string(r, col as u16, cell.as_str())
                .map_err(|e| AppError::Export(e.to_string()))?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| AppError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::{JobLocation, SeniorityLevel, WorkingTime};
    use crate::models::user::{AccountStatus, Role};
    use mongodb::bson::DateTime;

    fn fixture() -> (Application, Job, User) {
        let job_id = ObjectId::new();
        let user_id = ObjectId::new();
        let now = DateTime::now();
        let application = Application {
            id: Some(ObjectId::new()),
            job_id,
            user_id,
            user_technical_skills: vec!["rust".to_string(), "mongodb".to_string()],
            user_soft_skills: vec!["teamwork".to_string()],
            resume: "https://files.test/resumes/abc_cv.pdf".to_string(),
            created_at: now,
            updated_at: now,
        };
        let job = Job {
            id: Some(job_id),
            job_title: "Backend Engineer".to_string(),
            company_name: "Acme".to_string(),
            job_location: JobLocation::Remote,
            working_time: WorkingTime::FullTime,
            seniority_level: SeniorityLevel::Senior,
            job_description: "desc".to_string(),
            technical_skills: vec!["rust".to_string()],
            soft_skills: vec!["teamwork".to_string()],
            company_id: ObjectId::new(),
            added_by: ObjectId::new(),
            created_at: now,
            updated_at: now,
        };
        let user = User {
            id: Some(user_id),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            username: "JaneDoe".to_string(),
            email: "jane@example.com".to_string(),
            password: "hash".to_string(),
            recovery_email: None,
            password_changed_at: None,
            date_of_birth: now,
            mobile_number: "01012345678".to_string(),
            role: Role::User,
            status: AccountStatus::Offline,
            reset_otp: None,
            reset_otp_expiration: None,
            created_at: now,
            updated_at: now,
        };
        (application, job, user)
    }

    #[test]
    fn test_flatten_joins_skills_and_resolves_references() {
        let (application, job, user) = fixture();
        let jobs_by_id = HashMap::from([(application.job_id, &job)]);
        let users_by_id = HashMap::from([(application.user_id, &user)]);

        let rows = flatten_rows(std::slice::from_ref(&application), &jobs_by_id, &users_by_id);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].job_title, "Backend Engineer");
        assert_eq!(rows[0].applicant_name, "JaneDoe");
        assert_eq!(rows[0].technical_skills, "rust, mongodb");
        assert_eq!(rows[0].soft_skills, "teamwork");
        assert_eq!(rows[0].resume_link, "https://files.test/resumes/abc_cv.pdf");
    }

    #[test]
    fn test_flatten_tolerates_dangling_references() {
        let (application, _, _) = fixture();
        let rows = flatten_rows(
            std::slice::from_ref(&application),
            &HashMap::new(),
            &HashMap::new(),
        );
        assert_eq!(rows[0].job_title, "");
        assert_eq!(rows[0].applicant_name, "");
    }

    #[test]
    fn test_build_workbook_produces_xlsx_bytes() {
        let (application, job, user) = fixture();
        let jobs_by_id = HashMap::from([(application.job_id, &job)]);
        let users_by_id = HashMap::from([(application.user_id, &user)]);
        let rows = flatten_rows(std::slice::from_ref(&application), &jobs_by_id, &users_by_id);

        let bytes = build_workbook(&rows).unwrap();
        // xlsx files are zip archives: PK magic.
        assert_eq!(&bytes[..2], b"PK");
    }
}
