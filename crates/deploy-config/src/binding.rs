use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// An IAM-style grant of one role to a list of members (`group:x`, `user:x`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub role: String,
    #[serde(default)]
    pub members: Vec<String>,
}

impl Binding {
    pub fn new(role: impl Into<String>, members: impl IntoIterator<Item = String>) -> Self {
        Self {
            role: role.into(),
            members: members.into_iter().collect(),
        }
    }
}

/// Collapse `bindings` into one binding per role.
///
/// Roles keep the order in which they were first seen. Members of a role are
/// de-duplicated and sorted so the output does not depend on how the input
/// members were ordered. Role names are not validated.
pub fn merge_bindings<I>(bindings: I) -> Vec<Binding>
where
    I: IntoIterator<Item = Binding>,
{
    let mut roles: Vec<String> = Vec::new();
    let mut members_by_role: HashMap<String, BTreeSet<String>> = HashMap::new();

    for binding in bindings {
        if !members_by_role.contains_key(&binding.role) {
            roles.push(binding.role.clone());
        }
        members_by_role
            .entry(binding.role)
            .or_default()
            .extend(binding.members);
    }

    roles
        .into_iter()
        .map(|role| {
            let members = members_by_role.remove(&role).unwrap_or_default();
            Binding {
                role,
                members: members.into_iter().collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(role: &str, members: &[&str]) -> Binding {
        Binding::new(role, members.iter().map(|m| m.to_string()))
    }

    #[test]
    fn merges_duplicate_roles_in_first_seen_order() {
        let merged = merge_bindings(vec![
            b("roles/b", &["group:z@x.com"]),
            b("roles/a", &["user:y@x.com"]),
            b("roles/b", &["group:a@x.com", "group:z@x.com"]),
        ]);

        assert_eq!(
            merged,
            vec![
                b("roles/b", &["group:a@x.com", "group:z@x.com"]),
                b("roles/a", &["user:y@x.com"]),
            ]
        );
    }

    #[test]
    fn merge_is_idempotent() {
        let input = vec![
            b("roles/viewer", &["group:c@x.com", "group:a@x.com"]),
            b("roles/admin", &["group:o@x.com"]),
            b("roles/viewer", &["group:a@x.com", "group:b@x.com"]),
        ];
        let once = merge_bindings(input);
        let twice = merge_bindings(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn member_order_does_not_change_output() {
        let forward = merge_bindings(vec![
            b("roles/viewer", &["group:a@x.com", "group:b@x.com"]),
            b("roles/viewer", &["group:c@x.com"]),
            b("roles/admin", &["group:o@x.com"]),
        ]);
        let shuffled = merge_bindings(vec![
            b("roles/viewer", &["group:c@x.com", "group:b@x.com"]),
            b("roles/admin", &["group:o@x.com"]),
            b("roles/viewer", &["group:a@x.com"]),
        ]);
        assert_eq!(forward, shuffled);
    }

    #[test]
    fn unknown_roles_pass_through() {
        let merged = merge_bindings(vec![b("not-a-real-role", &[])]);
        assert_eq!(merged, vec![b("not-a-real-role", &[])]);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(merge_bindings(Vec::new()).is_empty());
    }
}
