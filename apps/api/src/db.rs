use anyhow::Result;
use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use tracing::info;

use crate::models::application::Application;
use crate::models::company::Company;
use crate::models::job::Job;
use crate::models::user::User;

/// Handle over the MongoDB database with typed collection accessors.
#[derive(Clone)]
pub struct Db {
    inner: Database,
}

impl Db {
    pub async fn connect(uri: &str, database: &str) -> Result<Self> {
        info!("Connecting to MongoDB...");

        let client = Client::with_uri_str(uri).await?;
        let inner = client.database(database);

        // Fail fast on bad credentials/host instead of at the first query.
        inner.run_command(doc! { "ping": 1 }, None).await?;
        info!("MongoDB connection established (database: {database})");

        Ok(Db { inner })
    }

    pub fn users(&self) -> Collection<User> {
        self.inner.collection("users")
    }

    pub fn companies(&self) -> Collection<Company> {
        self.inner.collection("companies")
    }

    pub fn jobs(&self) -> Collection<Job> {
        self.inner.collection("jobs")
    }

    pub fn applications(&self) -> Collection<Application> {
        self.inner.collection("applications")
    }

    /// Creates the unique indexes backing the data-model invariants.
    /// Idempotent; safe to run on every startup.
    pub async fn ensure_indexes(&self) -> Result<()> {
        for field in ["username", "email", "mobileNumber"] {
            self.users().create_index(unique_index(field), None).await?;
        }
        for field in ["companyName", "companyEmail"] {
            self.companies()
                .create_index(unique_index(field), None)
                .await?;
        }
        self.jobs()
            .create_index(plain_index("companyId"), None)
            .await?;
        self.applications()
            .create_index(plain_index("jobId"), None)
            .await?;
        self.applications()
            .create_index(plain_index("userId"), None)
            .await?;

        info!("MongoDB indexes ensured");
        Ok(())
    }
}

/// True when an insert/update hit a unique index (Mongo error code 11000).
/// Lets handlers map races the pre-insert lookup missed to 409 instead of 500.
pub fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    matches!(
        e.kind.as_ref(),
        mongodb::error::ErrorKind::Write(mongodb::error::WriteFailure::WriteError(we))
            if we.code == 11000
    )
}

fn unique_index(field: &str) -> IndexModel {
    IndexModel::builder()
        .keys(doc! { field: 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

fn plain_index(field: &str) -> IndexModel {
    IndexModel::builder().keys(doc! { field: 1 }).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;
    use mongodb::bson::DateTime;

    use crate::models::company::Company;

    async fn test_db() -> Db {
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        Db::connect(&uri, "jobboard_test").await.unwrap()
    }

    fn sample_company(name: &str, email: &str) -> Company {
        let now = DateTime::now();
        Company {
            id: Some(ObjectId::new()),
            company_name: name.to_string(),
            description: "Builds things".to_string(),
            industry: "Software".to_string(),
            address: "1 Main St".to_string(),
            number_of_employees: None,
            company_email: email.to_string(),
            password: "hash".to_string(),
            company_hr: ObjectId::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    #[ignore = "needs a running MongoDB (set MONGODB_URI)"]
    async fn test_duplicate_company_name_never_creates_a_second_record() {
        let db = test_db().await;
        db.ensure_indexes().await.unwrap();

        let suffix = ObjectId::new().to_hex();
        let name = format!("Acme-{suffix}");
        let first = sample_company(&name, &format!("hr-{suffix}@acme.test"));
        db.companies().insert_one(&first, None).await.unwrap();

        // Same name, different email: the companyName index must reject it.
        let second = sample_company(&name, &format!("hr2-{suffix}@acme.test"));
        let err = db.companies().insert_one(&second, None).await.unwrap_err();
        assert!(is_duplicate_key(&err));

        let count = db
            .companies()
            .count_documents(doc! { "companyName": &name }, None)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    #[ignore = "needs a running MongoDB (set MONGODB_URI)"]
    async fn test_duplicate_company_email_never_creates_a_second_record() {
        let db = test_db().await;
        db.ensure_indexes().await.unwrap();

        let suffix = ObjectId::new().to_hex();
        let email = format!("hr-{suffix}@acme.test");
        let first = sample_company(&format!("Acme-{suffix}"), &email);
        db.companies().insert_one(&first, None).await.unwrap();

        let second = sample_company(&format!("Globex-{suffix}"), &email);
        let err = db.companies().insert_one(&second, None).await.unwrap_err();
        assert!(is_duplicate_key(&err));

        let count = db
            .companies()
            .count_documents(doc! { "companyEmail": &email }, None)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
