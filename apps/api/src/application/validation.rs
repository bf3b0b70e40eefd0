use axum::extract::Multipart;
use bytes::Bytes;

use crate::errors::AppError;

pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug)]
pub struct ResumeFile {
    pub filename: String,
    pub bytes: Bytes,
}

/// Raw multipart form for application create/update. Field presence rules
/// differ between the two, so checks live in `require_*`/`validate` methods.
#[derive(Debug, Default)]
pub struct ApplicationForm {
    pub job_id: Option<String>,
    pub user_technical_skills: Option<Vec<String>>,
    pub user_soft_skills: Option<Vec<String>>,
    pub resume: Option<ResumeFile>,
}

impl ApplicationForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = ApplicationForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
        {
            match field.name().unwrap_or_default() {
                "jobId" => {
                    form.job_id = Some(read_text(field).await?);
                }
                "userTechnicalSkills" => {
                    form.user_technical_skills = Some(split_skills(&read_text(field).await?));
                }
                "userSoftSkills" => {
                    form.user_soft_skills = Some(split_skills(&read_text(field).await?));
                }
                "resume" => {
                    let filename = field.file_name().unwrap_or("resume.pdf").to_string();
                    let content_type = field.content_type().unwrap_or_default().to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(format!("failed to read resume: {e}")))?;
                    check_resume(&filename, &content_type, bytes.len())?;
                    form.resume = Some(ResumeFile { filename, bytes });
                }
                other => {
                    return Err(AppError::Validation(format!("unexpected field '{other}'")));
                }
            }
        }

        Ok(form)
    }

    /// Create: every field is mandatory.
    pub fn require_complete(&self) -> Result<(), AppError> {
        if self.job_id.is_none() {
            return Err(AppError::Validation("jobId is required".to_string()));
        }
        self.check_skill_lists()?;
        if self.user_technical_skills.is_none() || self.user_soft_skills.is_none() {
            return Err(AppError::Validation(
                "userTechnicalSkills and userSoftSkills are required".to_string(),
            ));
        }
        if self.resume.is_none() {
            return Err(AppError::Validation(
                "Please upload a resume file".to_string(),
            ));
        }
        Ok(())
    }

    /// Update: fields are optional but must be valid when present.
    pub fn check_partial(&self) -> Result<(), AppError> {
        self.check_skill_lists()
    }

    fn check_skill_lists(&self) -> Result<(), AppError> {
        for (field, skills) in [
            ("userTechnicalSkills", &self.user_technical_skills),
            ("userSoftSkills", &self.user_soft_skills),
        ] {
            if let Some(skills) = skills {
                if skills.is_empty() {
                    return Err(AppError::Validation(format!(
                        "{field} must list at least one skill"
                    )));
                }
            }
        }
        Ok(())
    }
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart field: {e}")))
}

fn split_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resumes are PDF-only and capped at 5 MiB.
fn check_resume(filename: &str, content_type: &str, size: usize) -> Result<(), AppError> {
    if content_type != "application/pdf" && !filename.to_lowercase().ends_with(".pdf") {
        return Err(AppError::Validation(
            "resume must be a PDF file".to_string(),
        ));
    }
    if size == 0 {
        return Err(AppError::Validation("resume file is empty".to_string()));
    }
    if size > MAX_RESUME_BYTES {
        return Err(AppError::Validation(
            "resume must not exceed 5 MiB".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_skills_trims_and_drops_blanks() {
        assert_eq!(
            split_skills("rust, mongodb ,, aws "),
            vec!["rust", "mongodb", "aws"]
        );
        assert!(split_skills(" , ").is_empty());
    }

    #[test]
    fn test_resume_must_be_pdf() {
        assert!(check_resume("cv.pdf", "application/pdf", 1024).is_ok());
        // Filename fallback when the client omits the content type.
        assert!(check_resume("cv.PDF", "", 1024).is_ok());
        assert!(check_resume("cv.docx", "application/msword", 1024).is_err());
    }

    #[test]
    fn test_resume_size_limits() {
        assert!(check_resume("cv.pdf", "application/pdf", 0).is_err());
        assert!(check_resume("cv.pdf", "application/pdf", MAX_RESUME_BYTES).is_ok());
        assert!(check_resume("cv.pdf", "application/pdf", MAX_RESUME_BYTES + 1).is_err());
    }

    #[test]
    fn test_complete_form_requires_resume() {
        let form = ApplicationForm {
            job_id: Some("507f1f77bcf86cd799439011".to_string()),
            user_technical_skills: Some(vec!["rust".to_string()]),
            user_soft_skills: Some(vec!["teamwork".to_string()]),
            resume: None,
        };
        assert!(form.require_complete().is_err());
    }

    #[test]
    fn test_partial_form_allows_missing_fields() {
        assert!(ApplicationForm::default().check_partial().is_ok());
    }
}
