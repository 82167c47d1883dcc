//! Header and value labels of the report, in English or French.

/// Every label written into the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportLabels {
    pub general_sheet: &'static str,
    pub team_column: &'static str,
    pub role_column: &'static str,
    pub email_sent_column: &'static str,
    pub unassigned: &'static str,
    pub leader: &'static str,
    pub member: &'static str,
    pub yes: &'static str,
    pub no: &'static str,
    pub team_name: &'static str,
    pub mentor: &'static str,
    pub no_mentor: &'static str,
    /// Full name, email, language, level, skills, role.
    pub member_columns: [&'static str; 6],
    /// Workshop columns are labelled `{prefix} 1` .. `{prefix} 8`.
    pub workshop_prefix: &'static str,
    pub total: &'static str,
}

impl Default for ReportLabels {
    fn default() -> Self {
        Self {
            general_sheet: "General",
            team_column: "Team",
            role_column: "Role",
            email_sent_column: "Email sent",
            unassigned: "unassigned",
            leader: "leader",
            member: "member",
            yes: "yes",
            no: "no",
            team_name: "Team name",
            mentor: "Mentor",
            no_mentor: "unassigned",
            member_columns: ["Full name", "Email", "Language", "Level", "Skills", "Role"],
            workshop_prefix: "Workshop",
            total: "Total",
        }
    }
}

impl ReportLabels {
    /// Labels used by the French-speaking organisers.
    pub fn french() -> Self {
        Self {
            general_sheet: "General",
            team_column: "Team",
            role_column: "Role",
            email_sent_column: "Email envoye",
            unassigned: "Non assigne",
            leader: "Chef d'equipe",
            member: "Membre",
            yes: "Oui",
            no: "Non",
            team_name: "Nom de l'equipe / Team name:",
            mentor: "Encadrant",
            no_mentor: "Non assigne",
            member_columns: ["Nom complet", "Email", "Langue", "Niveau", "Competences", "Role"],
            workshop_prefix: "Atelier",
            total: "Total (/20)",
        }
    }

    pub fn role(&self, is_leader: bool) -> &'static str {
        if is_leader { self.leader } else { self.member }
    }

    pub fn yes_no(&self, flag: bool) -> &'static str {
        if flag { self.yes } else { self.no }
    }
}
