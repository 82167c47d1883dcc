//! Team profiles (display names, mentors) managed outside assignment runs.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assign::{display_name_for, pick_leader};
use crate::model::{Assignment, Mentor, Participant, Placement, Team, team_code};

/// Mentor name recorded when a mentor is attached without a name.
pub const DEFAULT_MENTOR_NAME: &str = "Encadrant";

/// Metadata attached to a team code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamProfile {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub mentor: Option<Mentor>,
}

/// Team code → profile map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamRoster {
    teams: BTreeMap<String, TeamProfile>,
}

impl TeamRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(&self, code: &str) -> Option<&TeamProfile> {
        self.teams.get(code)
    }

    /// Renames a team and returns the resulting display name. A blank name
    /// keeps the current display name, or the code when there is none.
    pub fn rename(&mut self, code: &str, custom_name: &str) -> &str {
        let profile = self.teams.entry(code.to_string()).or_default();
        let custom_name = custom_name.trim();
        if !custom_name.is_empty() {
            profile.display_name = custom_name.to_string();
        } else if profile.display_name.is_empty() {
            profile.display_name = code.to_string();
        }
        debug!(team = code, display_name = %profile.display_name, "team renamed");
        &profile.display_name
    }

    /// Attaches a mentor to a team, replacing any previous one.
    pub fn set_mentor(&mut self, code: &str, name: &str, email: &str) {
        let name = name.trim();
        let mentor = Mentor {
            name: if name.is_empty() {
                DEFAULT_MENTOR_NAME.to_string()
            } else {
                name.to_string()
            },
            email: email.trim().to_string(),
        };
        debug!(team = code, mentor = %mentor.line(), "mentor assigned");
        self.teams.entry(code.to_string()).or_default().mentor = Some(mentor);
    }

    /// Custom display names to hand to the assigner.
    pub fn display_names(&self) -> HashMap<String, String> {
        self.teams
            .iter()
            .filter(|(_, profile)| !profile.display_name.trim().is_empty())
            .map(|(code, profile)| (code.clone(), profile.display_name.clone()))
            .collect()
    }

    fn mentor_for(&self, code: &str) -> Option<Mentor> {
        self.teams
            .get(code)
            .and_then(|profile| profile.mentor.clone())
            .filter(|mentor| !mentor.is_blank())
    }

    /// Copies the roster's mentors onto freshly assigned teams.
    pub fn apply(&self, teams: Vec<Team>) -> Vec<Team> {
        teams
            .into_iter()
            .map(|team| Team {
                mentor: self.mentor_for(&team.code),
                ..team
            })
            .collect()
    }

    /// Rebuilds `TEAM 1`..`TEAM max_teams` from participants that already
    /// carry a placement, for instance after confirmation emails went out.
    ///
    /// Every team is returned, including empty ones. Leaders are recomputed
    /// and display names refreshed from the roster. Placements pointing at a
    /// team beyond `max_teams` are dropped.
    pub fn regroup(&self, participants: Vec<Participant>, max_teams: usize) -> Assignment {
        let names = self.display_names();
        let mut teams: Vec<Team> = (0..max_teams)
            .map(|idx| {
                let code = team_code(idx);
                let mut team = Team::new(code.clone(), display_name_for(&code, &names));
                team.mentor = self.mentor_for(&code);
                team
            })
            .collect();

        let mut member_slots: Vec<Vec<usize>> = vec![Vec::new(); teams.len()];
        for (idx, person) in participants.iter().enumerate() {
            if let Some(slot) = person
                .team_code()
                .and_then(|code| teams.iter().position(|team| team.code == code))
            {
                member_slots[slot].push(idx);
            }
        }

        let mut placements: Vec<Option<Placement>> = vec![None; participants.len()];
        for (team, slots) in teams.iter_mut().zip(&member_slots) {
            team.leader = pick_leader(slots.iter().map(|&idx| &participants[idx]));
            for (pos, &idx) in slots.iter().enumerate() {
                placements[idx] = Some(Placement {
                    team_code: team.code.clone(),
                    team_display: team.display_name.clone(),
                    is_leader: team.leader == Some(pos),
                });
            }
        }

        let participants: Vec<Participant> = participants
            .into_iter()
            .zip(placements)
            .map(|(person, placement)| Participant {
                placement,
                ..person
            })
            .collect();

        for (team, slots) in teams.iter_mut().zip(&member_slots) {
            team.members = slots.iter().map(|&idx| participants[idx].clone()).collect();
        }

        Assignment {
            participants,
            teams,
        }
    }
}
