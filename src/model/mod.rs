use serde::{Deserialize, Serialize};

/// Stable identifier assigned to a participant when its upload row is
/// enriched (`p0`, `p1`, ...). It only depends on the row position.
pub type ParticipantId = String;

/// Builds the stable team code for the zero-based team index (`TEAM 1` for 0).
pub fn team_code(index: usize) -> String {
    format!("TEAM {}", index + 1)
}

/// Where a participant landed after an assignment run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Stable team code, e.g. `TEAM 3`.
    pub team_code: String,
    /// Display name of the team at the time of placement.
    pub team_display: String,
    /// Whether the participant leads the team.
    pub is_leader: bool,
}

/// A participant row augmented with the fields derived by the enricher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub uid: ParticipantId,
    pub full_name: String,
    pub email: String,
    /// Language cell exactly as uploaded (trimmed).
    pub language_raw: String,
    /// Academic level cell exactly as uploaded (trimmed).
    pub academic_level_raw: String,
    /// Skills cell exactly as uploaded (trimmed).
    pub skills_raw: String,
    /// Tokenized, upper-cased skills.
    pub skills: Vec<String>,
    /// Language shown in reports; `Non precise` when the cell was empty.
    pub language_label: String,
    pub language_fr: bool,
    pub language_en: bool,
    pub is_dev: bool,
    pub is_marketing: bool,
    /// Upper-cased academic level; `NC` when the cell was empty.
    pub academic_level: String,
    /// Score in `0..=5` derived from the academic level.
    pub academic_score: u8,
    pub email_sent: bool,
    pub placement: Option<Placement>,
}

impl Participant {
    pub fn team_code(&self) -> Option<&str> {
        self.placement.as_ref().map(|p| p.team_code.as_str())
    }

    pub fn team_display(&self) -> Option<&str> {
        self.placement.as_ref().map(|p| p.team_display.as_str())
    }

    pub fn is_leader(&self) -> bool {
        self.placement.as_ref().is_some_and(|p| p.is_leader)
    }

    /// Returns the record without any team placement.
    pub fn unplaced(self) -> Self {
        Self {
            placement: None,
            ..self
        }
    }

    /// Returns the record carrying the given placement.
    pub fn placed(self, placement: Placement) -> Self {
        Self {
            placement: Some(placement),
            ..self
        }
    }

    /// Returns the record with its confirmation flag set to `sent`.
    pub fn with_email_sent(self, sent: bool) -> Self {
        Self {
            email_sent: sent,
            ..self
        }
    }
}

/// Person supervising a team.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Mentor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl Mentor {
    /// Formats the mentor as `name (email)`, or just the name when there is
    /// no address.
    pub fn line(&self) -> String {
        if self.email.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.email)
        }
    }

    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.email.is_empty()
    }
}

/// A team produced by the assigner or rebuilt from existing placements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Stable key, `TEAM 1` .. `TEAM n`.
    pub code: String,
    /// Custom name when one was provided, the code otherwise.
    pub display_name: String,
    pub mentor: Option<Mentor>,
    /// Members in pick order.
    pub members: Vec<Participant>,
    /// Index into `members` of the team leader.
    pub leader: Option<usize>,
}

impl Team {
    pub fn new(code: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            display_name: display_name.into(),
            mentor: None,
            members: Vec::new(),
            leader: None,
        }
    }

    pub fn leader(&self) -> Option<&Participant> {
        self.leader.and_then(|idx| self.members.get(idx))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Result of one assignment run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Every input participant, in input order, with its placement applied.
    pub participants: Vec<Participant>,
    /// Teams in creation order.
    pub teams: Vec<Team>,
}

impl Assignment {
    /// Participants left without a team.
    pub fn unassigned(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.placement.is_none())
    }
}
