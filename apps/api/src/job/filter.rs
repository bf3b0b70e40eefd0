//! Job search filter: optional predicates composed into one MongoDB query
//! document. All present predicates apply together (AND).

use mongodb::bson::{doc, Document};
use serde::Deserialize;

use crate::models::job::{JobLocation, SeniorityLevel, WorkingTime};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobFilter {
    pub working_time: Option<WorkingTime>,
    pub job_location: Option<JobLocation>,
    pub seniority_level: Option<SeniorityLevel>,
    /// Case-insensitive substring match on the title.
    pub job_title: Option<String>,
    /// Comma-separated list; a job matches only when it lists every skill.
    pub technical_skills: Option<String>,
}

impl JobFilter {
    pub fn to_query(&self) -> Document {
        let mut query = doc! {};
        if let Some(time) = self.working_time {
            query.insert("workingTime", time.as_str());
        }
        if let Some(location) = self.job_location {
            query.insert("jobLocation", location.as_str());
        }
        if let Some(level) = self.seniority_level {
            query.insert("seniorityLevel", level.as_str());
        }
        if let Some(title) = self.job_title.as_deref().filter(|t| !t.trim().is_empty()) {
            query.insert(
                "jobTitle",
                doc! { "$regex": escape_regex(title.trim()), "$options": "i" },
            );
        }
        if let Some(skills) = &self.technical_skills {
            let skills: Vec<&str> = skills
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            if !skills.is_empty() {
                query.insert("technicalSkills", doc! { "$all": skills });
            }
        }
        query
    }
}

/// Escapes regex metacharacters so user input only ever matches literally.
fn escape_regex(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if ".^$*+?()[]{}|\\".contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;

    #[test]
    fn test_empty_filter_matches_everything() {
        assert_eq!(JobFilter::default().to_query(), doc! {});
    }

    #[test]
    fn test_seniority_filter_targets_only_that_level() {
        let filter = JobFilter {
            seniority_level: Some(SeniorityLevel::Senior),
            ..Default::default()
        };
        assert_eq!(filter.to_query(), doc! { "seniorityLevel": "Senior" });
    }

    #[test]
    fn test_combined_filters_are_conjunctive() {
        let filter = JobFilter {
            working_time: Some(WorkingTime::FullTime),
            job_location: Some(JobLocation::Remote),
            seniority_level: Some(SeniorityLevel::MidLevel),
            ..Default::default()
        };
        let query = filter.to_query();
        // One top-level document, every predicate a separate key: Mongo ANDs them.
        assert_eq!(query.len(), 3);
        assert_eq!(query.get_str("workingTime").unwrap(), "full-time");
        assert_eq!(query.get_str("jobLocation").unwrap(), "remote");
        assert_eq!(query.get_str("seniorityLevel").unwrap(), "Mid-Level");
    }

    #[test]
    fn test_title_is_case_insensitive_substring() {
        let filter = JobFilter {
            job_title: Some("backend".to_string()),
            ..Default::default()
        };
        let query = filter.to_query();
        let title = query.get_document("jobTitle").unwrap();
        assert_eq!(title.get_str("$regex").unwrap(), "backend");
        assert_eq!(title.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn test_title_regex_metacharacters_are_literal() {
        let filter = JobFilter {
            job_title: Some("C++ (senior)".to_string()),
            ..Default::default()
        };
        let query = filter.to_query();
        assert_eq!(
            query.get_document("jobTitle").unwrap().get_str("$regex").unwrap(),
            "C\\+\\+ \\(senior\\)"
        );
    }

    #[test]
    fn test_skills_require_all_listed() {
        let filter = JobFilter {
            technical_skills: Some("rust, mongodb , aws".to_string()),
            ..Default::default()
        };
        let query = filter.to_query();
        let all = query
            .get_document("technicalSkills")
            .unwrap()
            .get_array("$all")
            .unwrap();
        let skills: Vec<&str> = all.iter().filter_map(Bson::as_str).collect();
        assert_eq!(skills, vec!["rust", "mongodb", "aws"]);
    }

    #[test]
    fn test_blank_title_and_skills_are_ignored() {
        let filter = JobFilter {
            job_title: Some("   ".to_string()),
            technical_skills: Some(" , ,".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.to_query(), doc! {});
    }
}
