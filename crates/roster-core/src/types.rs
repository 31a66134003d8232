use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, RosterError};

/// One cell of a roster: what `name` does on `date` for `team`.
///
/// The store keeps at most one entry per `(date, name, team)`. Generation
/// output from the webhook uses capitalised keys (`Date`, `Name`, ...), so
/// both spellings are accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    #[serde(alias = "Date")]
    pub date: NaiveDate,
    #[serde(alias = "Name")]
    pub name: String,
    /// Free-form status: a time range like `09:00 - 18:00` or a short code
    /// such as `PL`, `WO`, `SL`, `WFH`, `OH`.
    #[serde(alias = "Status")]
    pub status: String,
    #[serde(alias = "Team")]
    pub team: String,
}

impl RosterEntry {
    pub fn new(
        date: NaiveDate,
        name: impl Into<String>,
        status: impl Into<String>,
        team: impl Into<String>,
    ) -> Self {
        Self {
            date,
            name: name.into(),
            status: status.into(),
            team: team.into(),
        }
    }
}

/// A team and its ordered member list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Store-assigned identifier. Hosted stores may return it as a number.
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
    /// Per-team generation prompt; `None` means the webhook default applies.
    #[serde(default)]
    pub custom_prompt: Option<String>,
}

/// Payload for creating a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTeam {
    pub name: String,
    pub members: Vec<String>,
    #[serde(default)]
    pub custom_prompt: Option<String>,
}

impl NewTeam {
    /// Build a team from the settings form: one member per line.
    ///
    /// Lines are trimmed and blank lines dropped. An empty prompt is stored
    /// as `None`.
    pub fn from_form(name: &str, members_text: &str, prompt: Option<&str>) -> Result<Self> {
        let name = name.trim();
        let members = parse_members(members_text);
        if name.is_empty() {
            return Err(RosterError::InvalidInput("team name is required".into()));
        }
        if members.is_empty() {
            return Err(RosterError::InvalidInput(
                "team needs at least one member".into(),
            ));
        }
        Ok(Self {
            name: name.to_string(),
            members,
            custom_prompt: normalize_prompt(prompt),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(RosterError::InvalidInput("team name is required".into()));
        }
        if self.members.iter().all(|m| m.trim().is_empty()) {
            return Err(RosterError::InvalidInput(
                "team needs at least one member".into(),
            ));
        }
        Ok(())
    }
}

/// Partial update of a team. Absent fields are left untouched.
///
/// `custom_prompt` distinguishes "not sent" (`None`) from "cleared"
/// (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<String>>,
    #[serde(
        default,
        alias = "customPrompt",
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_prompt: Option<Option<String>>,
}

impl TeamUpdate {
    pub fn validate(&self) -> Result<()> {
        if matches!(&self.name, Some(n) if n.trim().is_empty()) {
            return Err(RosterError::InvalidInput("team name cannot be empty".into()));
        }
        if matches!(&self.members, Some(m) if m.iter().all(|x| x.trim().is_empty())) {
            return Err(RosterError::InvalidInput(
                "team needs at least one member".into(),
            ));
        }
        Ok(())
    }

    /// Apply the update to an in-memory team.
    pub fn apply(&self, team: &mut Team) {
        if let Some(name) = &self.name {
            team.name = name.trim().to_string();
        }
        if let Some(members) = &self.members {
            team.members = clean_members(members);
        }
        if let Some(prompt) = &self.custom_prompt {
            team.custom_prompt = normalize_prompt(prompt.as_deref());
        }
    }
}

/// Split newline-separated member text into trimmed, non-empty names.
pub fn parse_members(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
        .collect()
}

pub fn clean_members(members: &[String]) -> Vec<String> {
    members
        .iter()
        .map(|m| m.trim())
        .filter(|m| !m.is_empty())
        .map(String::from)
        .collect()
}

pub fn normalize_prompt(prompt: Option<&str>) -> Option<String> {
    prompt
        .filter(|p| !p.trim().is_empty())
        .map(String::from)
}

fn id_as_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

fn double_option<'de, D>(deserializer: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_accepts_capitalised_keys() {
        let json = r#"{"Date":"2026-02-01","Name":"Manoj","Status":"PL","Team":"Enterprise-VAS"}"#;
        let entry: RosterEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.name, "Manoj");
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());

        let out = serde_json::to_string(&entry).unwrap();
        assert!(out.contains(r#""date":"2026-02-01""#));
    }

    #[test]
    fn team_id_may_be_numeric() {
        let json = r#"{"id":7,"name":"Ops","members":["A","B"],"custom_prompt":null}"#;
        let team: Team = serde_json::from_str(json).unwrap();
        assert_eq!(team.id, "7");
        assert!(team.custom_prompt.is_none());
    }

    #[test]
    fn form_members_are_trimmed_and_blank_lines_dropped() {
        let team = NewTeam::from_form(" Ops ", "Ayush S\n\n  Manoj  \n", Some("   ")).unwrap();
        assert_eq!(team.name, "Ops");
        assert_eq!(team.members, vec!["Ayush S", "Manoj"]);
        assert!(team.custom_prompt.is_none());
    }

    #[test]
    fn form_requires_name_and_members() {
        assert!(NewTeam::from_form("", "A", None).is_err());
        assert!(NewTeam::from_form("Ops", " \n ", None).is_err());
    }

    #[test]
    fn update_distinguishes_cleared_prompt_from_absent() {
        let absent: TeamUpdate = serde_json::from_str(r#"{"name":"Ops"}"#).unwrap();
        assert_eq!(absent.custom_prompt, None);

        let cleared: TeamUpdate = serde_json::from_str(r#"{"custom_prompt":null}"#).unwrap();
        assert_eq!(cleared.custom_prompt, Some(None));

        let mut team = Team {
            id: "1".into(),
            name: "Ops".into(),
            members: vec!["A".into()],
            custom_prompt: Some("old".into()),
        };
        absent.apply(&mut team);
        assert_eq!(team.custom_prompt.as_deref(), Some("old"));
        cleared.apply(&mut team);
        assert!(team.custom_prompt.is_none());
    }
}
