use serde::{Deserialize, Serialize};

// --- Check Point management API types ---

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub user: String,
    pub password: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub domain: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub sid: String,
    #[serde(default, rename = "api-server-version")]
    pub api_server_version: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ShowObjectRequest {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HostObject {
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "ipv4-address")]
    pub ipv4_address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AddHostRequest {
    pub name: String,
    #[serde(rename = "ip-address")]
    pub ip_address: String,
    pub color: String,
    pub comments: String,
}

#[derive(Debug, Serialize)]
pub struct GroupMembers {
    pub add: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SetGroupRequest {
    pub name: String,
    pub members: GroupMembers,
}

#[derive(Debug, Serialize)]
pub struct InstallPolicyRequest {
    #[serde(rename = "policy-package")]
    pub policy_package: String,
    pub targets: Vec<String>,
}

/// Response of asynchronous commands such as publish and install-policy
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskResponse {
    #[serde(default, rename = "task-id")]
    pub task_id: Option<String>,
}

/// Error body returned on non-200 responses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Outcome of a completed block sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockOutcome {
    /// A new host object was created (false when it already existed)
    pub created: bool,
    pub publish_task: Option<String>,
    pub install_task: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_host_wire_names() {
        let req = AddHostRequest {
            name: "8.8.8.8".to_string(),
            ip_address: "8.8.8.8".to_string(),
            color: "red".to_string(),
            comments: "Automatically added malicious IP".to_string(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["ip-address"], "8.8.8.8");
        assert_eq!(json["color"], "red");
    }

    #[test]
    fn test_set_group_shape() {
        let req = SetGroupRequest {
            name: "Malicious_IPs".to_string(),
            members: GroupMembers {
                add: vec!["8.8.8.8".to_string()],
            },
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Malicious_IPs", "members": {"add": ["8.8.8.8"]}}));
    }

    #[test]
    fn test_login_omits_empty_domain() {
        let req = LoginRequest {
            user: "api-admin".to_string(),
            password: "pw".to_string(),
            domain: String::new(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("domain").is_none());
    }
}
