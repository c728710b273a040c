//! Query parameters shared by the read endpoints

use crate::constants::RESPONSE_DATA_PARAMETERS;
use crate::directory::UserData;
use serde::Deserialize;

/// `?fields=a,b&template=true`
#[derive(Debug, Default, Deserialize)]
pub struct ApiRequestParameters {
    pub fields: Option<String>,
    #[serde(default)]
    pub template: bool,
}

impl ApiRequestParameters {
    /// Requested field names, if any were given
    pub fn requested_fields(&self) -> Option<Vec<&str>> {
        self.fields.as_deref().map(|fields| {
            fields
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .collect()
        })
    }

    /// Keep only exposable keys, narrowed to the requested fields
    pub fn project(&self, user: &UserData) -> UserData {
        let requested = self.requested_fields();
        user.iter()
            .filter(|(key, _)| RESPONSE_DATA_PARAMETERS.contains(&key.as_str()))
            .filter(|(key, _)| {
                requested
                    .as_ref()
                    .map_or(true, |fields| fields.contains(&key.as_str()))
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user() -> UserData {
        json!({
            "id": 1,
            "username": "bob",
            "email": "bob@example.com",
            "password": "hunter2",
            "photoOfIndividual": "http://x/p.jpg"
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[test]
    fn test_hides_unlisted_keys() {
        let projected = ApiRequestParameters::default().project(&user());
        assert_eq!(projected.len(), 4);
        assert!(projected.get("password").is_none());
    }

    #[test]
    fn test_fields_narrow_projection() {
        let params = ApiRequestParameters {
            fields: Some("id, username,,password,unknown".to_string()),
            template: false,
        };
        let projected = params.project(&user());
        assert_eq!(
            serde_json::to_string(&projected).unwrap(),
            r#"{"id":1,"username":"bob"}"#
        );
    }
}
