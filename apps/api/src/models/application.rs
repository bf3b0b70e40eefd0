use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub job_id: ObjectId,
    pub user_id: ObjectId,
    /// Skill snapshots taken at application time, not live references.
    pub user_technical_skills: Vec<String>,
    pub user_soft_skills: Vec<String>,
    /// Durable URL of the uploaded resume in object storage.
    pub resume: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}
