//! Collaborators behind the users resource: the command source and the read side

use crate::constants::{HEAD_OFFICE_ID, HEAD_OFFICE_NAME, USER_ENTITY};
use async_trait::async_trait;
use common::CommandProcessingResult;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::sync::Mutex;
use thiserror::Error;
use tracing::info;
use uploader::enrich::parse_object;

/// A user as exchanged with the read side: a JSON object
pub type UserData = Map<String, Value>;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("User {0} not found")]
    NotFound(u64),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("User directory unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    Create,
    Update,
    Delete,
}

/// A write request for the command-processing collaborator
#[derive(Debug, Clone)]
pub struct CommandWrapper {
    pub action: CommandAction,
    pub entity_name: &'static str,
    pub entity_id: Option<u64>,
    pub json: Option<String>,
}

impl CommandWrapper {
    pub fn create_user(json: String) -> Self {
        Self {
            action: CommandAction::Create,
            entity_name: USER_ENTITY,
            entity_id: None,
            json: Some(json),
        }
    }

    pub fn update_user(user_id: u64, json: String) -> Self {
        Self {
            action: CommandAction::Update,
            entity_name: USER_ENTITY,
            entity_id: Some(user_id),
            json: Some(json),
        }
    }

    pub fn delete_user(user_id: u64) -> Self {
        Self {
            action: CommandAction::Delete,
            entity_name: USER_ENTITY,
            entity_id: Some(user_id),
            json: None,
        }
    }
}

/// Accepts write commands and reports what was changed
#[async_trait]
pub trait CommandSource: Send + Sync {
    async fn log_command_source(
        &self,
        command: CommandWrapper,
    ) -> Result<CommandProcessingResult, DirectoryError>;
}

/// Read side of the users resource
#[async_trait]
pub trait UserReadService: Send + Sync {
    async fn retrieve_all_users(&self) -> Result<Vec<UserData>, DirectoryError>;

    async fn retrieve_user(&self, user_id: u64) -> Result<UserData, DirectoryError>;

    /// Defaults and option lists for a new user
    async fn retrieve_new_user_details(&self) -> Result<UserData, DirectoryError>;

    async fn retrieve_offices_for_dropdown(&self) -> Result<Vec<Value>, DirectoryError>;
}

struct DirectoryState {
    next_id: u64,
    users: BTreeMap<u64, UserData>,
}

/// Process-local user directory
pub struct InMemoryUserDirectory {
    state: Mutex<DirectoryState>,
}

impl Default for InMemoryUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(DirectoryState {
                next_id: 1,
                users: BTreeMap::new(),
            }),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, DirectoryState>, DirectoryError> {
        self.state
            .lock()
            .map_err(|_| DirectoryError::Unavailable("lock poisoned".to_string()))
    }

    fn offices() -> Vec<Value> {
        vec![json!({ "id": HEAD_OFFICE_ID, "name": HEAD_OFFICE_NAME })]
    }

    /// Stored user plus its id and resolved office name
    fn to_user_data(id: u64, stored: &UserData) -> UserData {
        let mut user = Map::new();
        user.insert("id".to_string(), json!(id));
        for (key, value) in stored {
            user.insert(key.clone(), value.clone());
        }
        if stored.get("officeId").and_then(Value::as_u64) == Some(HEAD_OFFICE_ID) {
            user.insert("officeName".to_string(), json!(HEAD_OFFICE_NAME));
        }
        user
    }

    fn parse_command_json(command: &CommandWrapper) -> Result<UserData, DirectoryError> {
        let json = command
            .json
            .as_deref()
            .ok_or_else(|| DirectoryError::Validation("command has no JSON body".to_string()))?;
        let mut data = parse_object(json).map_err(|e| DirectoryError::Validation(e.to_string()))?;
        data.remove("id");
        Ok(data)
    }

    fn validate_username(data: &UserData, required: bool) -> Result<(), DirectoryError> {
        match data.get("username") {
            Some(Value::String(name)) if !name.trim().is_empty() => Ok(()),
            None if !required => Ok(()),
            _ => Err(DirectoryError::Validation(
                "username must be a non-empty string".to_string(),
            )),
        }
    }

    fn create(&self, command: &CommandWrapper) -> Result<CommandProcessingResult, DirectoryError> {
        let data = Self::parse_command_json(command)?;
        Self::validate_username(&data, true)?;

        let mut state = self.lock()?;
        let id = state.next_id;
        state.next_id += 1;
        let office_id = data.get("officeId").and_then(Value::as_u64);
        state.users.insert(id, data);

        info!(user_id = id, "Created user");
        Ok(CommandProcessingResult {
            resource_id: Some(id),
            office_id,
            changes: None,
        })
    }

    fn update(
        &self,
        user_id: u64,
        command: &CommandWrapper,
    ) -> Result<CommandProcessingResult, DirectoryError> {
        let changes = Self::parse_command_json(command)?;
        Self::validate_username(&changes, false)?;

        let mut state = self.lock()?;
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or(DirectoryError::NotFound(user_id))?;
        for (key, value) in &changes {
            user.insert(key.clone(), value.clone());
        }
        let office_id = user.get("officeId").and_then(Value::as_u64);

        info!(user_id, changed = changes.len(), "Updated user");
        Ok(CommandProcessingResult {
            resource_id: Some(user_id),
            office_id,
            changes: Some(changes),
        })
    }

    fn delete(&self, user_id: u64) -> Result<CommandProcessingResult, DirectoryError> {
        let removed = self
            .lock()?
            .users
            .remove(&user_id)
            .ok_or(DirectoryError::NotFound(user_id))?;

        info!(user_id, "Deleted user");
        Ok(CommandProcessingResult {
            resource_id: Some(user_id),
            office_id: removed.get("officeId").and_then(Value::as_u64),
            changes: None,
        })
    }
}

#[async_trait]
impl CommandSource for InMemoryUserDirectory {
    async fn log_command_source(
        &self,
        command: CommandWrapper,
    ) -> Result<CommandProcessingResult, DirectoryError> {
        info!(
            action = ?command.action,
            entity = command.entity_name,
            entity_id = ?command.entity_id,
            "Processing command"
        );
        match (command.action, command.entity_id) {
            (CommandAction::Create, _) => self.create(&command),
            (CommandAction::Update, Some(id)) => self.update(id, &command),
            (CommandAction::Delete, Some(id)) => self.delete(id),
            (_, None) => Err(DirectoryError::Validation(
                "command requires an entity id".to_string(),
            )),
        }
    }
}

#[async_trait]
impl UserReadService for InMemoryUserDirectory {
    async fn retrieve_all_users(&self) -> Result<Vec<UserData>, DirectoryError> {
        let state = self.lock()?;
        Ok(state
            .users
            .iter()
            .map(|(id, stored)| Self::to_user_data(*id, stored))
            .collect())
    }

    async fn retrieve_user(&self, user_id: u64) -> Result<UserData, DirectoryError> {
        let state = self.lock()?;
        state
            .users
            .get(&user_id)
            .map(|stored| Self::to_user_data(user_id, stored))
            .ok_or(DirectoryError::NotFound(user_id))
    }

    async fn retrieve_new_user_details(&self) -> Result<UserData, DirectoryError> {
        let mut template = Map::new();
        template.insert("allowedOffices".to_string(), Value::Array(Self::offices()));
        template.insert("availableRoles".to_string(), Value::Array(Vec::new()));
        Ok(template)
    }

    async fn retrieve_offices_for_dropdown(&self) -> Result<Vec<Value>, DirectoryError> {
        Ok(Self::offices())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn create(directory: &InMemoryUserDirectory, json: &str) -> u64 {
        directory
            .log_command_source(CommandWrapper::create_user(json.to_string()))
            .await
            .unwrap()
            .resource_id
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_retrieve() {
        let directory = InMemoryUserDirectory::new();
        let first = create(&directory, r#"{"username":"bob","officeId":1}"#).await;
        let second = create(&directory, r#"{"id":99,"username":"alice"}"#).await;
        assert_eq!((first, second), (1, 2));

        let bob = directory.retrieve_user(first).await.unwrap();
        assert_eq!(bob["id"], 1);
        assert_eq!(bob["username"], "bob");
        assert_eq!(bob["officeName"], HEAD_OFFICE_NAME);

        let all = directory.retrieve_all_users().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1]["id"], 2);
        assert!(all[1].get("officeName").is_none());
    }

    #[tokio::test]
    async fn test_create_requires_username() {
        let directory = InMemoryUserDirectory::new();
        for payload in [r#"{"firstname":"Bob"}"#, r#"{"username":""}"#, "[]", "{"] {
            let result = directory
                .log_command_source(CommandWrapper::create_user(payload.to_string()))
                .await;
            assert!(matches!(result, Err(DirectoryError::Validation(_))), "{}", payload);
        }
        assert!(directory.retrieve_all_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_reports_changes() {
        let directory = InMemoryUserDirectory::new();
        let id = create(&directory, r#"{"username":"bob","email":"bob@example.com"}"#).await;

        let result = directory
            .log_command_source(CommandWrapper::update_user(id, r#"{"email":"b@example.com"}"#.to_string()))
            .await
            .unwrap();
        let changes = result.changes.unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes["email"], "b@example.com");

        let bob = directory.retrieve_user(id).await.unwrap();
        assert_eq!(bob["email"], "b@example.com");
        assert_eq!(bob["username"], "bob");
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_user() {
        let directory = InMemoryUserDirectory::new();
        let update = directory
            .log_command_source(CommandWrapper::update_user(5, "{}".to_string()))
            .await;
        assert!(matches!(update, Err(DirectoryError::NotFound(5))));

        let delete = directory
            .log_command_source(CommandWrapper::delete_user(5))
            .await;
        assert!(matches!(delete, Err(DirectoryError::NotFound(5))));
    }

    #[tokio::test]
    async fn test_delete() {
        let directory = InMemoryUserDirectory::new();
        let id = create(&directory, r#"{"username":"bob","officeId":1}"#).await;

        let result = directory
            .log_command_source(CommandWrapper::delete_user(id))
            .await
            .unwrap();
        assert_eq!(result.resource_id, Some(id));
        assert_eq!(result.office_id, Some(1));
        assert!(matches!(
            directory.retrieve_user(id).await,
            Err(DirectoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_template() {
        let directory = InMemoryUserDirectory::new();
        let template = directory.retrieve_new_user_details().await.unwrap();
        assert_eq!(template["allowedOffices"][0]["name"], HEAD_OFFICE_NAME);
        assert_eq!(template["availableRoles"], json!([]));
    }
}
