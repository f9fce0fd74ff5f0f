use tracing::warn;
use uuid::Uuid;

use super::{GuestGroup, GuestRow};
use crate::config::ConfigError;
use crate::models::{EmailAddress, Guest, Party, RsvpStage};

/// Maps inviter names from the spreadsheet to the address invitations are
/// sent from.
///
/// Entries keep their configured order. The fallback entry is used when a
/// party's inviter cannot be resolved.
#[derive(Debug, Clone)]
pub struct InviterDirectory {
    entries: Vec<(String, EmailAddress)>,
    fallback: usize,
}

impl InviterDirectory {
    pub fn new(entries: Vec<(String, EmailAddress)>) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::NoInviters);
        }
        Ok(Self {
            entries,
            fallback: 0,
        })
    }

    pub fn with_default(mut self, name: &str) -> Result<Self, ConfigError> {
        self.fallback = self
            .entries
            .iter()
            .position(|(entry, _)| entry == name)
            .ok_or_else(|| ConfigError::UnknownDefaultInviter(name.to_string()))?;
        Ok(self)
    }

    pub fn lookup(&self, name: &str) -> Option<&EmailAddress> {
        let name = name.trim();
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, address)| address)
    }

    pub fn fallback(&self) -> (&str, &EmailAddress) {
        let (name, address) = &self.entries[self.fallback];
        (name, address)
    }

    /// Pick the inviter for a party from the names on its rows.
    ///
    /// Anything other than exactly one known name is logged; the first-seen
    /// known name wins, then the directory fallback.
    pub fn resolve(&self, title: &str, rows: &[GuestRow]) -> EmailAddress {
        let mut names: Vec<&str> = Vec::new();
        for row in rows {
            let name = row.inviter.trim();
            if !names.contains(&name) {
                names.push(name);
            }
        }

        if names.len() != 1 {
            warn!(title, inviters = ?names, "Party does not have exactly one inviter");
        }

        for name in &names {
            match self.lookup(name) {
                Some(address) => return address.clone(),
                None => warn!(title, inviter = %name, "Unknown inviter"),
            }
        }

        let (name, address) = self.fallback();
        warn!(title, inviter = %name, "No known inviter, using fallback");
        address.clone()
    }
}

/// Builds `Party` records from grouped guest rows.
pub struct PartyBuilder<'a> {
    directory: &'a InviterDirectory,
}

impl<'a> PartyBuilder<'a> {
    pub fn new(directory: &'a InviterDirectory) -> Self {
        Self { directory }
    }

    /// Lazily build one party per group, with fresh party and guest ids.
    pub fn build(&self, groups: Vec<GuestGroup>) -> impl Iterator<Item = Party> + '_ {
        groups.into_iter().map(move |group| self.build_party(group))
    }

    pub fn build_party(&self, group: GuestGroup) -> Party {
        let inviter = self.directory.resolve(&group.title, &group.rows);
        let local = group.rows.iter().any(|row| row.local);

        Party {
            id: new_id(),
            title: group.title,
            local,
            guests: group.rows.into_iter().map(build_guest).collect(),
            inviter,
            rsvp_stage: RsvpStage::NotInvited,
        }
    }
}

fn build_guest(row: GuestRow) -> Guest {
    Guest {
        id: new_id(),
        first_name: row.first_name,
        last_name: row.last_name,
        email: row.email,
        attending: None,
        rideshare: None,
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::import::read_guest_groups;

    fn directory() -> InviterDirectory {
        InviterDirectory::new(vec![
            ("Jesse".to_string(), EmailAddress::new("jesse", "example.com")),
            ("Jenny".to_string(), EmailAddress::new("jenny", "example.com")),
        ])
        .unwrap()
    }

    fn row(first: &str, local: bool, inviter: &str) -> GuestRow {
        GuestRow {
            first_name: first.to_string(),
            last_name: "Smith".to_string(),
            email: None,
            local,
            inviter: inviter.to_string(),
        }
    }

    fn group(title: &str, rows: Vec<GuestRow>) -> GuestGroup {
        GuestGroup {
            title: title.to_string(),
            rows,
        }
    }

    #[test]
    fn test_empty_directory_is_rejected() {
        assert!(matches!(
            InviterDirectory::new(vec![]),
            Err(ConfigError::NoInviters)
        ));
    }

    #[test]
    fn test_with_default_requires_known_name() {
        assert!(directory().with_default("Jenny").is_ok());
        assert!(matches!(
            directory().with_default("Nobody"),
            Err(ConfigError::UnknownDefaultInviter(_))
        ));
    }

    #[test]
    fn test_resolve_single_inviter() {
        let rows = vec![row("Ann", false, "Jenny"), row("Bob", false, "Jenny")];
        assert_eq!(
            directory().resolve("Smith", &rows),
            EmailAddress::new("jenny", "example.com")
        );
    }

    #[test]
    fn test_resolve_ambiguous_uses_first_seen() {
        let rows = vec![row("Ann", false, "Jenny"), row("Bob", false, "Jesse")];
        assert_eq!(
            directory().resolve("Smith", &rows),
            EmailAddress::new("jenny", "example.com")
        );
    }

    #[test]
    fn test_resolve_skips_unknown_names() {
        let rows = vec![row("Ann", false, "Grandma"), row("Bob", false, "Jesse")];
        assert_eq!(
            directory().resolve("Smith", &rows),
            EmailAddress::new("jesse", "example.com")
        );
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let rows = vec![row("Ann", false, "")];
        assert_eq!(
            directory().resolve("Smith", &rows),
            EmailAddress::new("jesse", "example.com")
        );

        let directory = directory().with_default("Jenny").unwrap();
        assert_eq!(
            directory.resolve("Smith", &rows),
            EmailAddress::new("jenny", "example.com")
        );
    }

    #[test]
    fn test_build_party_derives_local_and_guests() {
        let directory = directory();
        let party = PartyBuilder::new(&directory).build_party(group(
            "Smith Family",
            vec![row("Ann", false, "Jesse"), row("Bob", true, "Jesse")],
        ));

        assert_eq!(party.title, "Smith Family");
        assert!(party.local);
        assert_eq!(party.guests.len(), 2);
        assert_eq!(party.rsvp_stage, RsvpStage::NotInvited);
        assert_eq!(party.inviter, EmailAddress::new("jesse", "example.com"));
        assert!(party.guests.iter().all(|g| g.attending.is_none() && g.rideshare.is_none()));
    }

    #[test]
    fn test_local_false_when_no_row_is_local() {
        let directory = directory();
        let party = PartyBuilder::new(&directory)
            .build_party(group("Jones", vec![row("Tom", false, "Jenny")]));
        assert!(!party.local);
    }

    #[test]
    fn test_ids_are_unique_across_parties() {
        let directory = directory();
        let groups = vec![
            group("A", vec![row("Ann", false, "Jesse"), row("Al", false, "Jesse")]),
            group("B", vec![row("Bea", false, "Jenny")]),
            group("C", vec![row("Cy", false, "Jenny"), row("Cal", true, "Jenny")]),
        ];
        let parties: Vec<Party> = PartyBuilder::new(&directory).build(groups).collect();
        assert_eq!(parties.len(), 3);

        let mut ids = HashSet::new();
        for party in &parties {
            assert!(ids.insert(party.id.clone()));
            for guest in &party.guests {
                assert!(ids.insert(guest.id.clone()));
            }
        }
        assert_eq!(ids.len(), 3 + 5);
    }

    #[test]
    fn test_smith_family_scenario() {
        let csv = "Title,Email,First,Last,Local,Inviter,Warning\n\
                   Smith Family,ann@example.com,Ann,Smith,True,Jesse,\n\
                   Smith Family,,Bob,Smith,false,Jesse,\n";
        let groups = read_guest_groups(csv.as_bytes()).unwrap();
        let directory = directory();
        let parties: Vec<Party> = PartyBuilder::new(&directory).build(groups).collect();

        assert_eq!(parties.len(), 1);
        assert!(parties[0].local);
        assert_eq!(parties[0].guests.len(), 2);
        assert_eq!(parties[0].guests[1].email, None);
    }
}
