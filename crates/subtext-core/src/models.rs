use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// On-disk shape of a rule. The database file is a JSON object keyed by
/// trigger, so the trigger itself lives outside this record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RuleRecord {
    pub text: String,
    pub usage_count: u64,
    pub last_used: Option<String>,
    pub created_at: String,
}

/// A replacement rule as held in memory: the trigger the user types and the
/// text it expands to, plus usage statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEntry {
    pub trigger: String,
    pub text: String,
    pub usage_count: u64,
    pub last_used: Option<String>,
    pub created_at: String,
}

impl RuleEntry {
    pub fn new(trigger: String, text: String) -> Self {
        Self {
            trigger,
            text,
            usage_count: 0,
            last_used: None,
            created_at: Local::now().to_rfc3339(),
        }
    }

    pub fn from_record(trigger: String, record: RuleRecord) -> Self {
        Self {
            trigger,
            text: record.text,
            usage_count: record.usage_count,
            last_used: record.last_used,
            created_at: record.created_at,
        }
    }

    pub fn to_record(&self) -> RuleRecord {
        RuleRecord {
            text: self.text.clone(),
            usage_count: self.usage_count,
            last_used: self.last_used.clone(),
            created_at: self.created_at.clone(),
        }
    }

    /// Mark one successful expansion of this rule.
    pub fn record_use(&mut self) {
        self.usage_count += 1;
        self.last_used = Some(Local::now().to_rfc3339());
    }

    /// Short single-line preview of the replacement text for tabular output:
    /// first line, at most 20 characters, with an ellipsis when anything was
    /// cut off.
    pub fn preview(&self) -> String {
        let first_line = self.text.split('\n').next().unwrap_or("");
        let mut preview: String = first_line.chars().take(20).collect();
        if self.text.chars().count() > 20 || self.text.contains('\n') {
            preview.push_str("...");
        }
        preview
    }

    /// Date part of the last-used timestamp, or "Never".
    pub fn last_used_date(&self) -> String {
        match &self.last_used {
            Some(ts) => ts.split('T').next().unwrap_or(ts).to_string(),
            None => "Never".to_string(),
        }
    }

    /// Last-used timestamp formatted for the stats view.
    pub fn last_used_display(&self) -> Option<String> {
        self.last_used_instant()
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
    }

    /// Parsed last-used time, for recency ordering.
    pub fn last_used_instant(&self) -> Option<DateTime<Local>> {
        self.last_used.as_deref().and_then(|ts| {
            DateTime::parse_from_rfc3339(ts)
                .map(|dt| dt.with_timezone(&Local))
                .ok()
        })
    }
}
