use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobLocation {
    Onsite,
    Remote,
    Hybrid,
}

impl JobLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobLocation::Onsite => "onsite",
            JobLocation::Remote => "remote",
            JobLocation::Hybrid => "hybrid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkingTime {
    #[serde(rename = "part-time")]
    PartTime,
    #[serde(rename = "full-time")]
    FullTime,
}

impl WorkingTime {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkingTime::PartTime => "part-time",
            WorkingTime::FullTime => "full-time",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeniorityLevel {
    Junior,
    #[serde(rename = "Mid-Level")]
    MidLevel,
    Senior,
    #[serde(rename = "Team-Lead")]
    TeamLead,
    #[serde(rename = "CTO")]
    Cto,
}

impl SeniorityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeniorityLevel::Junior => "Junior",
            SeniorityLevel::MidLevel => "Mid-Level",
            SeniorityLevel::Senior => "Senior",
            SeniorityLevel::TeamLead => "Team-Lead",
            SeniorityLevel::Cto => "CTO",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub job_title: String,
    pub company_name: String,
    pub job_location: JobLocation,
    pub working_time: WorkingTime,
    pub seniority_level: SeniorityLevel,
    pub job_description: String,
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub company_id: ObjectId,
    /// Creator; the only identity allowed to mutate or delete the job.
    pub added_by: ObjectId,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enums_serialize_to_wire_names() {
        assert_eq!(serde_json::to_string(&JobLocation::Onsite).unwrap(), "\"onsite\"");
        assert_eq!(
            serde_json::to_string(&WorkingTime::PartTime).unwrap(),
            "\"part-time\""
        );
        assert_eq!(
            serde_json::to_string(&SeniorityLevel::MidLevel).unwrap(),
            "\"Mid-Level\""
        );
        assert_eq!(serde_json::to_string(&SeniorityLevel::Cto).unwrap(), "\"CTO\"");
    }

    #[test]
    fn test_enums_deserialize_from_wire_names() {
        let loc: JobLocation = serde_json::from_str("\"hybrid\"").unwrap();
        assert_eq!(loc, JobLocation::Hybrid);
        let level: SeniorityLevel = serde_json::from_str("\"Team-Lead\"").unwrap();
        assert_eq!(level, SeniorityLevel::TeamLead);
    }
}
