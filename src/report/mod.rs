//! Builds the report document: a `General` sheet listing every participant
//! and one sheet per team with workshop score columns.

pub mod cells;
pub mod labels;

use tracing::debug;

pub use cells::{Cell, CellValue, ComputedCell, ReportDocument, ReportSheet};
pub use labels::ReportLabels;

use crate::enrich::{
    COL_EMAIL, COL_FULL_NAME, COL_LANGUAGE, COL_LEVEL, COL_SKILLS, USEFUL_COLUMNS,
};
use crate::model::{Participant, Team};

/// Number of workshop score columns on each team sheet.
pub const WORKSHOP_COUNT: u16 = 8;
/// Decimals kept by the computed total.
pub const TOTAL_DECIMALS: u8 = 2;

/// Zero-based row of the member header on team sheets.
const TEAM_HEADER_ROW: u32 = 3;
/// Zero-based column of the first workshop score.
const FIRST_WORKSHOP_COL: u16 = 6;

/// Builds the report for `participants` and `teams`.
///
/// `columns` selects the upload columns shown on the `General` sheet; an
/// empty slice shows every recognised column.
pub fn build_report(
    participants: &[Participant],
    teams: &[Team],
    columns: &[String],
    labels: &ReportLabels,
) -> ReportDocument {
    let columns: Vec<String> = if columns.is_empty() {
        USEFUL_COLUMNS.iter().map(|col| col.to_string()).collect()
    } else {
        columns.to_vec()
    };

    let mut sheets = Vec::with_capacity(teams.len() + 1);
    sheets.push(general_sheet(participants, &columns, labels));
    sheets.extend(teams.iter().map(|team| team_sheet(team, labels)));
    debug!(sheet_count = sheets.len(), "report constructed");

    ReportDocument { sheets }
}

fn general_sheet(
    participants: &[Participant],
    columns: &[String],
    labels: &ReportLabels,
) -> ReportSheet {
    let mut sheet = ReportSheet::new(labels.general_sheet);

    let mut header: Vec<Cell> = columns
        .iter()
        .map(|col| Cell::header(col.as_str()))
        .collect();
    header.push(Cell::header(labels.team_column));
    header.push(Cell::header(labels.role_column));
    header.push(Cell::header(labels.email_sent_column));
    sheet.push_row(header);

    for person in participants {
        let mut row: Vec<Cell> = columns
            .iter()
            .map(|col| Cell::text(column_value(person, col)))
            .collect();
        row.push(Cell::text(person.team_display().unwrap_or(labels.unassigned)));
        row.push(Cell::text(labels.role(person.is_leader())));
        row.push(Cell::text(labels.yes_no(person.email_sent)));
        sheet.push_row(row);
    }

    sheet
}

/// Value shown for an upload column on the `General` sheet.
fn column_value<'a>(person: &'a Participant, column: &str) -> &'a str {
    match column {
        COL_FULL_NAME => &person.full_name,
        COL_EMAIL => &person.email,
        COL_LANGUAGE => &person.language_label,
        COL_LEVEL => &person.academic_level,
        COL_SKILLS => &person.skills_raw,
        _ => "",
    }
}

fn team_sheet(team: &Team, labels: &ReportLabels) -> ReportSheet {
    let mut sheet = ReportSheet::new(team.code.as_str());

    sheet.push_row(vec![
        Cell::text(labels.team_name),
        Cell::text(team.display_name.as_str()),
    ]);
    let mentor = team
        .mentor
        .as_ref()
        .filter(|mentor| !mentor.is_blank())
        .map(|mentor| mentor.line())
        .unwrap_or_else(|| labels.no_mentor.to_string());
    sheet.push_row(vec![Cell::text(labels.mentor), Cell::text(mentor)]);
    sheet.push_row(Vec::new());

    let mut header: Vec<Cell> = labels
        .member_columns
        .iter()
        .map(|label| Cell::header(*label))
        .collect();
    header.extend(
        (1..=WORKSHOP_COUNT)
            .map(|idx| Cell::header(format!("{} {idx}", labels.workshop_prefix))),
    );
    header.push(Cell::header(labels.total));
    sheet.push_row(header);

    for (offset, member) in team.members.iter().enumerate() {
        let row_idx = TEAM_HEADER_ROW + 1 + offset as u32;
        let skills = if member.skills.is_empty() {
            member.skills_raw.clone()
        } else {
            member.skills.join(", ")
        };
        let is_leader = team.leader == Some(offset);

        let mut row = vec![
            Cell::text(member.full_name.as_str()),
            Cell::text(member.email.as_str()),
            Cell::text(member.language_label.as_str()),
            Cell::text(member.academic_level.as_str()),
            Cell::text(skills),
            Cell::text(labels.role(is_leader)),
        ];
        row.extend((0..WORKSHOP_COUNT).map(|_| Cell::empty()));
        row.push(Cell::computed(ComputedCell::RoundedAverage {
            row: row_idx,
            first_col: FIRST_WORKSHOP_COL,
            last_col: FIRST_WORKSHOP_COL + WORKSHOP_COUNT - 1,
            decimals: TOTAL_DECIMALS,
        }));
        sheet.push_row(row);
    }

    sheet
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::assign::{AssignmentConfig, assign_teams_seeded};
    use crate::enrich::{RawRow, enrich_row};
    use crate::model::Mentor;

    fn people(count: usize) -> Vec<Participant> {
        (0..count)
            .map(|idx| {
                let mut row = RawRow::new();
                row.insert(COL_FULL_NAME.into(), format!("Person {idx}"));
                row.insert(COL_EMAIL.into(), format!("p{idx}@example.com"));
                row.insert(COL_SKILLS.into(), "Storytelling; SEO".into());
                enrich_row(idx, &row)
            })
            .collect()
    }

    fn text(cell: &Cell) -> &str {
        match &cell.value {
            CellValue::Text(value) => value,
            _ => "",
        }
    }

    #[test]
    fn general_sheet_lists_every_participant() {
        let config = AssignmentConfig {
            max_teams: 1,
            team_size: 2,
        };
        let assignment = assign_teams_seeded(people(3), &config, &HashMap::new(), Some(4));
        let columns = vec![COL_FULL_NAME.to_string(), COL_EMAIL.to_string()];
        let report = build_report(
            &assignment.participants,
            &assignment.teams,
            &columns,
            &ReportLabels::default(),
        );

        let general = report.sheet("General").expect("general sheet");
        let header: Vec<&str> = general.rows[0].iter().map(text).collect();
        assert_eq!(
            header,
            vec![COL_FULL_NAME, COL_EMAIL, "Team", "Role", "Email sent"]
        );
        assert!(general.rows[0].iter().all(|cell| cell.bold));
        assert_eq!(general.rows.len(), 4);

        let teams: Vec<&str> = general.rows[1..].iter().map(|row| text(&row[2])).collect();
        assert_eq!(teams.iter().filter(|t| **t == "TEAM 1").count(), 2);
        assert_eq!(teams.iter().filter(|t| **t == "unassigned").count(), 1);
        let roles: Vec<&str> = general.rows[1..].iter().map(|row| text(&row[3])).collect();
        assert_eq!(roles.iter().filter(|r| **r == "leader").count(), 1);
        assert!(general.rows[1..].iter().all(|row| text(&row[4]) == "no"));
    }

    #[test]
    fn team_sheet_layout() {
        let mut team = Team::new("TEAM 1", "Rockets");
        team.members = people(2);
        team.leader = Some(1);
        team.mentor = Some(Mentor {
            name: "Marie".into(),
            email: "marie@example.com".into(),
        });

        let report = build_report(&[], &[team], &[], &ReportLabels::default());
        let sheet = report.sheet("TEAM 1").expect("team sheet");

        assert_eq!(text(&sheet.rows[0][0]), "Team name");
        assert_eq!(text(&sheet.rows[0][1]), "Rockets");
        assert_eq!(text(&sheet.rows[1][1]), "Marie (marie@example.com)");
        assert!(sheet.rows[2].is_empty());

        let header = &sheet.rows[3];
        assert_eq!(header.len(), 15);
        assert_eq!(text(&header[6]), "Workshop 1");
        assert_eq!(text(&header[13]), "Workshop 8");
        assert_eq!(text(&header[14]), "Total");

        let first = &sheet.rows[4];
        assert_eq!(text(&first[4]), "STORYTELLING, SEO");
        assert_eq!(text(&first[5]), "member");
        assert_eq!(text(&sheet.rows[5][5]), "leader");
        match &first[14].value {
            CellValue::Computed(total) => assert_eq!(
                total.formula(),
                "=IF(COUNT(G5:N5)=0,\"\",ROUND(AVERAGE(G5:N5),2))"
            ),
            other => panic!("expected computed total, got {other:?}"),
        }
        assert_eq!(sheet.plain_rows()[4][14], "");
    }

    #[test]
    fn team_without_mentor_is_marked_unassigned() {
        let team = Team::new("TEAM 3", "TEAM 3");
        let report = build_report(&[], &[team], &[], &ReportLabels::french());
        let sheet = report.sheet("TEAM 3").expect("team sheet");
        assert_eq!(text(&sheet.rows[1][0]), "Encadrant");
        assert_eq!(text(&sheet.rows[1][1]), "Non assigne");
        assert_eq!(text(&sheet.rows[3][14]), "Total (/20)");

        let general = report.sheet("General").expect("general sheet");
        assert_eq!(general.rows.len(), 1);
        assert_eq!(general.rows[0].len(), USEFUL_COLUMNS.len() + 3);
    }
}
