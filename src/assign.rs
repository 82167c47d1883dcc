//! Greedy team assignment with soft constraints.
//!
//! The pool is shuffled once, then teams are filled one after the other. Each
//! team first tries to secure a developer, a marketing profile, an English
//! speaker and a French speaker (in that order, each only when no member
//! already covers it), then takes whoever is next in the pool.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::model::{Assignment, Participant, Placement, Team, team_code};

pub const DEFAULT_MAX_TEAMS: usize = 10;
pub const DEFAULT_TEAM_SIZE: usize = 5;

/// Capacity limits of an assignment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentConfig {
    #[serde(default = "default_max_teams")]
    pub max_teams: usize,
    #[serde(default = "default_team_size")]
    pub team_size: usize,
}

fn default_max_teams() -> usize {
    DEFAULT_MAX_TEAMS
}

fn default_team_size() -> usize {
    DEFAULT_TEAM_SIZE
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            max_teams: DEFAULT_MAX_TEAMS,
            team_size: DEFAULT_TEAM_SIZE,
        }
    }
}

type Predicate = fn(&Participant) -> bool;

/// Profiles every team tries to include, in priority order.
const SOFT_CONSTRAINTS: [Predicate; 4] = [is_dev, is_marketing, speaks_english, speaks_french];

fn is_dev(p: &Participant) -> bool {
    p.is_dev
}

fn is_marketing(p: &Participant) -> bool {
    p.is_marketing
}

fn speaks_english(p: &Participant) -> bool {
    p.language_en
}

fn speaks_french(p: &Participant) -> bool {
    p.language_fr
}

/// Assigns participants with a generator seeded from `seed`, or from the OS
/// when no seed is given.
pub fn assign_teams_seeded(
    participants: Vec<Participant>,
    config: &AssignmentConfig,
    team_names: &HashMap<String, String>,
    seed: Option<u64>,
) -> Assignment {
    let mut rng = match seed {
        Some(seed_value) => StdRng::seed_from_u64(seed_value),
        None => StdRng::from_os_rng(),
    };
    assign_teams(participants, config, team_names, &mut rng)
}

/// Distributes `participants` into at most `config.max_teams` teams of at most
/// `config.team_size` members.
///
/// Existing placements are discarded. The returned participants keep the
/// input order; participants that did not fit stay unplaced. `team_names`
/// maps team codes to custom display names.
pub fn assign_teams<R: Rng + ?Sized>(
    participants: Vec<Participant>,
    config: &AssignmentConfig,
    team_names: &HashMap<String, String>,
    rng: &mut R,
) -> Assignment {
    let participants: Vec<Participant> =
        participants.into_iter().map(Participant::unplaced).collect();

    let mut pool: Vec<usize> = (0..participants.len()).collect();
    pool.shuffle(rng);

    let mut drafts: Vec<TeamDraft> = Vec::new();
    if config.team_size > 0 {
        while drafts.len() < config.max_teams && !pool.is_empty() {
            let code = team_code(drafts.len());
            let display_name = display_name_for(&code, team_names);
            let members = fill_team(&participants, &mut pool, config.team_size);
            let leader = pick_leader(members.iter().map(|&idx| &participants[idx]));
            debug!(team = %code, size = members.len(), ?leader, "team filled");
            drafts.push(TeamDraft {
                code,
                display_name,
                members,
                leader,
            });
        }
    }

    let mut placements: Vec<Option<Placement>> = vec![None; participants.len()];
    for draft in &drafts {
        for (pos, &idx) in draft.members.iter().enumerate() {
            placements[idx] = Some(Placement {
                team_code: draft.code.clone(),
                team_display: draft.display_name.clone(),
                is_leader: draft.leader == Some(pos),
            });
        }
    }

    let participants: Vec<Participant> = participants
        .into_iter()
        .zip(placements)
        .map(|(person, placement)| match placement {
            Some(placement) => person.placed(placement),
            None => person,
        })
        .collect();

    let teams: Vec<Team> = drafts
        .into_iter()
        .map(|draft| Team {
            members: draft
                .members
                .iter()
                .map(|&idx| participants[idx].clone())
                .collect(),
            leader: draft.leader,
            mentor: None,
            code: draft.code,
            display_name: draft.display_name,
        })
        .collect();

    let assignment = Assignment {
        participants,
        teams,
    };
    info!(
        teams = assignment.teams.len(),
        unassigned = assignment.unassigned().count(),
        "assignment complete"
    );
    assignment
}

/// Index of the first member holding the highest academic score.
pub fn pick_leader<'a>(members: impl IntoIterator<Item = &'a Participant>) -> Option<usize> {
    let mut best: Option<(usize, u8)> = None;
    for (pos, member) in members.into_iter().enumerate() {
        match best {
            Some((_, score)) if member.academic_score <= score => {}
            _ => best = Some((pos, member.academic_score)),
        }
    }
    best.map(|(pos, _)| pos)
}

pub(crate) fn display_name_for(code: &str, team_names: &HashMap<String, String>) -> String {
    team_names
        .get(code)
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .unwrap_or(code)
        .to_string()
}

struct TeamDraft {
    code: String,
    display_name: String,
    members: Vec<usize>,
    leader: Option<usize>,
}

fn fill_team(participants: &[Participant], pool: &mut Vec<usize>, capacity: usize) -> Vec<usize> {
    let mut members: Vec<usize> = Vec::with_capacity(capacity);

    for predicate in SOFT_CONSTRAINTS {
        if members.len() >= capacity {
            break;
        }
        if members.iter().any(|&idx| predicate(&participants[idx])) {
            continue;
        }
        if let Some(pos) = pool.iter().position(|&idx| predicate(&participants[idx])) {
            members.push(pool.remove(pos));
        }
    }

    let take = (capacity - members.len()).min(pool.len());
    members.extend(pool.drain(..take));
    members
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::enrich::enrich_row;

    fn person(idx: usize, score: u8) -> Participant {
        let mut record = enrich_row(idx, &Default::default());
        record.full_name = format!("Person {idx}");
        record.academic_score = score;
        record
    }

    fn no_names() -> HashMap<String, String> {
        HashMap::new()
    }

    #[test]
    fn twelve_participants_make_three_teams() {
        let people: Vec<Participant> = (0..12).map(|i| person(i, 0)).collect();
        let assignment =
            assign_teams_seeded(people, &AssignmentConfig::default(), &no_names(), Some(7));

        let sizes: Vec<usize> = assignment.teams.iter().map(Team::len).collect();
        assert_eq!(sizes, vec![5, 5, 2]);
        assert_eq!(assignment.unassigned().count(), 0);
        let codes: Vec<&str> = assignment.teams.iter().map(|t| t.code.as_str()).collect();
        assert_eq!(codes, vec!["TEAM 1", "TEAM 2", "TEAM 3"]);
    }

    #[test]
    fn overflow_stays_unassigned() {
        let people: Vec<Participant> = (0..57).map(|i| person(i, (i % 6) as u8)).collect();
        let assignment =
            assign_teams_seeded(people, &AssignmentConfig::default(), &no_names(), Some(1));

        assert_eq!(assignment.teams.len(), 10);
        assert!(assignment.teams.iter().all(|t| t.len() == 5));
        assert_eq!(assignment.unassigned().count(), 7);
        assert_eq!(assignment.participants.len(), 57);
    }

    #[test]
    fn members_are_unique_and_leaders_have_top_score() {
        let people: Vec<Participant> = (0..23).map(|i| person(i, (i * 7 % 6) as u8)).collect();
        let config = AssignmentConfig {
            max_teams: 4,
            team_size: 4,
        };
        let assignment = assign_teams_seeded(people, &config, &no_names(), Some(99));

        let mut seen = HashSet::new();
        for team in &assignment.teams {
            assert!(team.len() <= 4);
            for member in &team.members {
                assert!(seen.insert(member.uid.clone()), "duplicate {}", member.uid);
                assert_eq!(member.team_code(), Some(team.code.as_str()));
            }
            let leader = team.leader().expect("non-empty team has a leader");
            assert!(team.members.iter().all(|m| m.academic_score <= leader.academic_score));
            assert_eq!(team.members.iter().filter(|m| m.is_leader()).count(), 1);
        }
        assert_eq!(seen.len(), 16);
    }

    #[test]
    fn leader_is_highest_score_with_first_wins_ties() {
        let members = vec![person(0, 1), person(1, 3), person(2, 2)];
        assert_eq!(pick_leader(&members), Some(1));

        let tied = vec![person(0, 2), person(1, 4), person(2, 4)];
        assert_eq!(pick_leader(&tied), Some(1));

        assert_eq!(pick_leader(&Vec::<Participant>::new()), None);
    }

    #[test]
    fn soft_constraints_are_picked_first() {
        let mut people: Vec<Participant> = (0..10).map(|i| person(i, 0)).collect();
        people[3].is_dev = true;
        people[8].is_marketing = true;
        let config = AssignmentConfig {
            max_teams: 2,
            team_size: 5,
        };
        let assignment = assign_teams_seeded(people, &config, &no_names(), Some(3));

        let first = &assignment.teams[0];
        assert!(first.members[0].is_dev);
        assert!(first.members[1].is_marketing);
    }

    #[test]
    fn language_picks_follow_profile_picks() {
        for seed in 0..20 {
            let mut people: Vec<Participant> = (0..8).map(|i| person(i, 0)).collect();
            people[4].language_en = true;
            people[6].language_fr = true;
            let config = AssignmentConfig {
                max_teams: 1,
                team_size: 5,
            };
            let assignment = assign_teams_seeded(people, &config, &no_names(), Some(seed));

            let first = &assignment.teams[0];
            assert_eq!(first.members[0].uid, "p4");
            assert_eq!(first.members[1].uid, "p6");
        }
    }

    #[test]
    fn covered_profiles_are_not_picked_twice() {
        for seed in 0..20 {
            let mut people: Vec<Participant> = (0..10).map(|i| person(i, 0)).collect();
            people[2].is_dev = true;
            people[2].is_marketing = true;
            people[2].language_en = true;
            people[5].is_marketing = true;
            people[6].language_en = true;
            people[7].language_fr = true;
            let config = AssignmentConfig {
                max_teams: 2,
                team_size: 5,
            };
            let assignment = assign_teams_seeded(people, &config, &no_names(), Some(seed));

            let first = &assignment.teams[0];
            assert_eq!(first.members[0].uid, "p2");
            assert_eq!(first.members[1].uid, "p7");
        }
    }

    #[test]
    fn small_teams_stop_picking_at_capacity() {
        for seed in 0..20 {
            let mut people: Vec<Participant> = (0..3).map(|i| person(i, 0)).collect();
            people[1].is_dev = true;
            people[1].language_en = true;
            people[2].language_fr = true;
            let config = AssignmentConfig {
                max_teams: 10,
                team_size: 1,
            };
            let assignment = assign_teams_seeded(people, &config, &no_names(), Some(seed));

            let sizes: Vec<usize> = assignment.teams.iter().map(Team::len).collect();
            assert_eq!(sizes, vec![1, 1, 1]);
            let uids: Vec<&str> = assignment
                .teams
                .iter()
                .map(|t| t.members[0].uid.as_str())
                .collect();
            assert_eq!(uids, vec!["p1", "p2", "p0"]);
        }
    }

    #[test]
    fn same_seed_reproduces_the_assignment() {
        let people: Vec<Participant> = (0..17).map(|i| person(i, (i % 5) as u8)).collect();
        let config = AssignmentConfig::default();
        let lhs = assign_teams_seeded(people.clone(), &config, &no_names(), Some(42));
        let rhs = assign_teams_seeded(people, &config, &no_names(), Some(42));
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn empty_input_and_zero_capacity_produce_no_teams() {
        let assignment =
            assign_teams_seeded(Vec::new(), &AssignmentConfig::default(), &no_names(), Some(0));
        assert!(assignment.teams.is_empty());

        let config = AssignmentConfig {
            max_teams: 10,
            team_size: 0,
        };
        let people: Vec<Participant> = (0..3).map(|i| person(i, 0)).collect();
        let assignment = assign_teams_seeded(people, &config, &no_names(), Some(0));
        assert!(assignment.teams.is_empty());
        assert_eq!(assignment.unassigned().count(), 3);
    }

    #[test]
    fn custom_names_override_codes() {
        let people: Vec<Participant> = (0..6).map(|i| person(i, 0)).collect();
        let mut names = HashMap::new();
        names.insert("TEAM 2".to_string(), "Rockets".to_string());
        names.insert("TEAM 1".to_string(), "   ".to_string());
        let assignment =
            assign_teams_seeded(people, &AssignmentConfig::default(), &names, Some(5));

        assert_eq!(assignment.teams[0].display_name, "TEAM 1");
        assert_eq!(assignment.teams[1].display_name, "Rockets");
        assert_eq!(assignment.teams[1].members[0].team_display(), Some("Rockets"));
    }

    #[test]
    fn previous_placements_are_reset() {
        let people: Vec<Participant> = (0..3)
            .map(|i| {
                person(i, 0).placed(Placement {
                    team_code: "TEAM 9".into(),
                    team_display: "Old".into(),
                    is_leader: true,
                })
            })
            .collect();
        let config = AssignmentConfig {
            max_teams: 1,
            team_size: 2,
        };
        let assignment = assign_teams_seeded(people, &config, &no_names(), Some(11));

        assert_eq!(assignment.unassigned().count(), 1);
        assert!(
            assignment
                .participants
                .iter()
                .filter_map(Participant::team_code)
                .all(|code| code == "TEAM 1")
        );
    }
}
