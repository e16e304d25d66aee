use serde_json::Value;
use tracing::debug;

use super::odata::{display_name_filter, encode_path_segment};
use super::M365Client;
use crate::error::{CommandError, Result};

/// Narrow lookup results down to exactly one item.
///
/// No match fails with `not_found`; several matches fail listing their ids.
pub fn single_match(items: Vec<Value>, kind: &str, name: &str, not_found: &str) -> Result<Value> {
    let mut items = items;
    match items.len() {
        0 => Err(CommandError::not_found(not_found)),
        1 => Ok(items.remove(0)),
        _ => {
            let ids: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("id").and_then(Value::as_str))
                .collect();
            Err(CommandError::not_found(format!(
                "Multiple {} with name '{}' found. Found: {}.",
                kind,
                name,
                ids.join(", ")
            )))
        }
    }
}

/// The `id` property of a Graph item
pub fn item_id(item: &Value) -> Result<String> {
    item.get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| CommandError::Remote("Response item has no id".to_string()))
}

fn is_team(group: &Value) -> bool {
    group
        .get("resourceProvisioningOptions")
        .and_then(Value::as_array)
        .is_some_and(|opts| opts.iter().any(|o| o.as_str() == Some("Team")))
}

pub fn team_lookup_url(client: &M365Client, name: &str) -> String {
    client.graph(&format!("groups?{}", display_name_filter(name)))
}

pub fn channel_lookup_url(client: &M365Client, team_id: &str, name: &str) -> String {
    client.graph(&format!(
        "teams/{}/channels?{}",
        team_id,
        display_name_filter(name)
    ))
}

pub fn tab_lookup_url(client: &M365Client, team_id: &str, channel_id: &str, name: &str) -> String {
    client.graph(&format!(
        "teams/{}/channels/{}/tabs?{}",
        team_id,
        encode_path_segment(channel_id),
        display_name_filter(name)
    ))
}

pub fn todo_list_lookup_url(client: &M365Client, name: &str) -> String {
    client.graph(&format!("me/todo/lists?{}", display_name_filter(name)))
}

impl M365Client {
    /// Resolve a Microsoft Teams team by display name
    pub async fn team_id_by_name(&self, name: &str) -> Result<String> {
        let groups = self.get_all(&team_lookup_url(self, name)).await?;
        let teams: Vec<Value> = groups.into_iter().filter(is_team).collect();
        let team = single_match(
            teams,
            "teams",
            name,
            "The specified team does not exist in the Microsoft Teams",
        )?;
        let id = item_id(&team)?;
        debug!("Resolved team '{}' to {}", name, id);
        Ok(id)
    }

    /// Resolve a channel of a team by display name
    pub async fn channel_id_by_name(&self, team_id: &str, name: &str) -> Result<String> {
        let channels = self
            .get_all(&channel_lookup_url(self, team_id, name))
            .await?;
        let channel = single_match(
            channels,
            "channels",
            name,
            "The specified channel does not exist in the Microsoft Teams team",
        )?;
        let id = item_id(&channel)?;
        debug!("Resolved channel '{}' to {}", name, id);
        Ok(id)
    }

    /// Resolve a tab of a channel by display name
    pub async fn tab_id_by_name(&self, team_id: &str, channel_id: &str, name: &str) -> Result<String> {
        let tabs = self
            .get_all(&tab_lookup_url(self, team_id, channel_id, name))
            .await?;
        let tab = single_match(
            tabs,
            "tabs",
            name,
            "The specified tab does not exist in the Microsoft Teams team channel",
        )?;
        let id = item_id(&tab)?;
        debug!("Resolved tab '{}' to {}", name, id);
        Ok(id)
    }

    /// Resolve one of the signed-in user's To Do lists by display name
    pub async fn todo_list_id_by_name(&self, name: &str) -> Result<String> {
        let lists = self.get_all(&todo_list_lookup_url(self, name)).await?;
        let list = single_match(
            lists,
            "task lists",
            name,
            "The specified task list does not exist",
        )?;
        let id = item_id(&list)?;
        debug!("Resolved task list '{}' to {}", name, id);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> M365Client {
        M365Client::with_token("https://graph.microsoft.com", "token").unwrap()
    }

    #[test]
    fn test_single_match() {
        let item = single_match(vec![json!({"id": "a"})], "teams", "x", "missing").unwrap();
        assert_eq!(item_id(&item).unwrap(), "a");
    }

    #[test]
    fn test_single_match_none() {
        let err = single_match(vec![], "teams", "x", "missing").unwrap_err();
        assert!(matches!(err, CommandError::NotFound(_)));
        assert_eq!(err.to_string(), "missing");
    }

    #[test]
    fn test_single_match_many() {
        let err = single_match(
            vec![json!({"id": "a"}), json!({"id": "b"})],
            "teams",
            "Team Name",
            "missing",
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Multiple teams with name 'Team Name' found. Found: a, b."
        );
    }

    #[test]
    fn test_is_team() {
        assert!(is_team(&json!({"resourceProvisioningOptions": ["Team"]})));
        assert!(!is_team(&json!({"resourceProvisioningOptions": []})));
        assert!(!is_team(&json!({})));
    }

    #[test]
    fn test_lookup_urls() {
        let client = client();
        assert_eq!(
            team_lookup_url(&client, "Team Name"),
            "https://graph.microsoft.com/v1.0/groups?$filter=displayName eq 'Team%20Name'"
        );
        assert_eq!(
            channel_lookup_url(&client, "00000000-0000-0000-0000-000000000000", "Channel Name"),
            "https://graph.microsoft.com/v1.0/teams/00000000-0000-0000-0000-000000000000/channels?$filter=displayName eq 'Channel%20Name'"
        );
        assert_eq!(
            tab_lookup_url(
                &client,
                "00000000-0000-0000-0000-000000000000",
                "19:00000000-0000-0000-0000-000000000000",
                "Tab Name"
            ),
            "https://graph.microsoft.com/v1.0/teams/00000000-0000-0000-0000-000000000000/channels/19%3A00000000-0000-0000-0000-000000000000/tabs?$filter=displayName eq 'Tab%20Name'"
        );
        assert_eq!(
            todo_list_lookup_url(&client, "Tasks List"),
            "https://graph.microsoft.com/v1.0/me/todo/lists?$filter=displayName eq 'Tasks%20List'"
        );
    }
}
