use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Account returned by a successful sign-up or sign-in call.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfo {
    #[serde(rename = "localId")]
    pub uid: String,
    pub email: String,
    #[serde(rename = "idToken")]
    pub id_token: String,
}

/// Profile record written to the remote store when an account is created.
/// Keys stay camelCase to match profiles written by earlier versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_name: String,
    pub email: String,
    pub created_at: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AccountInfo>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<AccountInfo>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn write_profile(&self, uid: &str, profile: &UserProfile) -> Result<()>;
}

// RestIdentityProvider implementation for IdentityProvider
//
// Targets an Identity-Toolkit-style REST surface keyed by an API key:
// `accounts:signUp` and `accounts:signInWithPassword`, both taking
// email/password and returning the account id plus a token.
pub struct RestIdentityProvider {
    base_url: String,
    api_key: String,
}

impl RestIdentityProvider {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        RestIdentityProvider {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    async fn account_call(&self, endpoint: &str, email: &str, password: &str) -> Result<AccountInfo> {
        let url = format!("{}/v1/accounts:{}?key={}", self.base_url, endpoint, self.api_key);
        debug!("Calling identity service: accounts:{endpoint}");

        let client = reqwest::Client::builder().user_agent("fxlog/1.0").build()?;
        let response = client
            .post(&url)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }))
            .send()
            .await
            .map_err(|e| anyhow!("Identity request error: {e}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("{}", friendly_identity_error(status, &body)));
        }

        let account = response
            .json::<AccountInfo>()
            .await
            .map_err(|e| anyhow!("Failed to parse identity response: {e}"))?;
        Ok(account)
    }
}

/// Maps the service's error payload (`{"error": {"message": "..."}}`) to a
/// message fit for a human.
fn friendly_identity_error(status: reqwest::StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ErrorDetail,
    }
    #[derive(Deserialize)]
    struct ErrorDetail {
        message: String,
    }

    let code = serde_json::from_str::<ErrorBody>(body)
        .map(|e| e.error.message)
        .unwrap_or_default();

    match code.as_str() {
        "EMAIL_EXISTS" => "An account with this email already exists".to_string(),
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            "Incorrect email or password".to_string()
        }
        "TOO_MANY_ATTEMPTS_TRY_LATER" => {
            "Too many attempts, please try again later".to_string()
        }
        "" => format!("Identity service error: {status}"),
        other => format!("Identity service error: {other}"),
    }
}

// RestProfileStore implementation for ProfileStore
pub struct RestProfileStore {
    base_url: String,
}

impl RestProfileStore {
    pub fn new(base_url: &str) -> Self {
        RestProfileStore {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ProfileStore for RestProfileStore {
    async fn write_profile(&self, uid: &str, profile: &UserProfile) -> Result<()> {
        let url = format!("{}/users/{}.json", self.base_url, uid);
        debug!("Writing profile record for {uid}");

        let client = reqwest::Client::builder().user_agent("fxlog/1.0").build()?;
        let response = client
            .put(&url)
            .json(profile)
            .send()
            .await
            .map_err(|e| anyhow!("Profile store request error: {e}"))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Profile store error: {} for user: {}",
                response.status(),
                uid
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for RestIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AccountInfo> {
        self.account_call("signUp", email, password).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AccountInfo> {
        self.account_call("signInWithPassword", email, password).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json_string, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ACCOUNT_RESPONSE: &str = r#"{
        "localId": "uid-123",
        "email": "user@example.com",
        "idToken": "token-abc"
    }"#;

    #[tokio::test]
    async fn test_sign_up_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/accounts:signUp"))
            .and(query_param("key", "k"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ACCOUNT_RESPONSE))
            .mount(&mock_server)
            .await;

        let provider = RestIdentityProvider::new(&mock_server.uri(), "k");
        let account = provider.sign_up("user@example.com", "pass1!word").await.unwrap();
        assert_eq!(account.uid, "uid-123");
        assert_eq!(account.email, "user@example.com");
        assert_eq!(account.id_token, "token-abc");
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password_maps_to_friendly_message() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/accounts:signInWithPassword"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_string(r#"{"error": {"message": "INVALID_LOGIN_CREDENTIALS"}}"#),
            )
            .mount(&mock_server)
            .await;

        let provider = RestIdentityProvider::new(&mock_server.uri(), "k");
        let result = provider.sign_in("user@example.com", "wrong1!").await;
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().to_string(), "Incorrect email or password");
    }

    #[tokio::test]
    async fn test_sign_up_email_exists() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/accounts:signUp"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_string(r#"{"error": {"message": "EMAIL_EXISTS"}}"#),
            )
            .mount(&mock_server)
            .await;

        let provider = RestIdentityProvider::new(&mock_server.uri(), "k");
        let result = provider.sign_up("user@example.com", "pass1!word").await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "An account with this email already exists"
        );
    }

    #[tokio::test]
    async fn test_profile_write_puts_camel_case_record() {
        let mock_server = MockServer::start().await;
        let profile = UserProfile {
            user_name: "asad".to_string(),
            email: "user@example.com".to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
        };

        Mock::given(method("PUT"))
            .and(path("/users/uid-123.json"))
            .and(body_json_string(
                r#"{"userName":"asad","email":"user@example.com","createdAt":"2024-01-01T00:00:00Z"}"#,
            ))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let store = RestProfileStore::new(&mock_server.uri());
        store.write_profile("uid-123", &profile).await.unwrap();
    }

    #[tokio::test]
    async fn test_profile_write_error_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/users/uid-123.json"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let store = RestProfileStore::new(&mock_server.uri());
        let profile = UserProfile {
            user_name: "asad".to_string(),
            email: "user@example.com".to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
        };
        let result = store.write_profile("uid-123", &profile).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("401"));
    }
}
