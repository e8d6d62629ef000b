//! Job application and candidate records consumed by the upload portal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A candidate's application to a job posting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub candidate_id: i64,
    pub job_id: i64,

    /// Human facing reference, e.g. `BW-2024-0012`
    pub reference_number: Option<String>,

    /// Title of the job posting, if it still exists
    pub job_title: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Application {
    /// Reference shown to candidates, falling back to the numeric id
    pub fn display_reference(&self) -> String {
        self.reference_number
            .clone()
            .filter(|reference| !reference.trim().is_empty())
            .unwrap_or_else(|| self.id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
}

impl Candidate {
    /// Address on file, ignoring blank values
    pub fn contact_email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}
