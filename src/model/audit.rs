use std::fmt;

/// Severity of an audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditLevel {
    Info,
    Warning,
    Error,
}

/// What part of the system an audit record is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditCategory {
    Scheduler,
    Queue,
    Role,
    Exception,
    Admin,
    System,
}

impl AuditLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl AuditCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduler => "scheduler",
            Self::Queue => "queue",
            Self::Role => "role",
            Self::Exception => "exception",
            Self::Admin => "admin",
            Self::System => "system",
        }
    }
}

impl fmt::Display for AuditLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AuditCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for writing one audit record.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateAuditLogParam {
    pub level: AuditLevel,
    pub category: AuditCategory,
    pub message: String,
    pub context: serde_json::Value,
}

/// Audit record read back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditLogEntry {
    pub id: i32,
    pub level: String,
    pub category: String,
    pub message: String,
    pub context: serde_json::Value,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl AuditLogEntry {
    /// Converts an entity model to a domain model at the repository boundary.
    ///
    /// A context column that is not valid JSON is surfaced as a JSON string.
    pub fn from_entity(entity: entity::audit_log::Model) -> Self {
        let context = serde_json::from_str(&entity.context)
            .unwrap_or(serde_json::Value::String(entity.context));

        Self {
            id: entity.id,
            level: entity.level,
            category: entity.category,
            message: entity.message,
            context,
            created_at: entity.created_at,
        }
    }
}
