//! IAM token sessions
//!
//! A session is a domain-scoped IAM token; logging out revokes it.

use crate::bss::{ApiErrorBody, BssSession, FeeRecordPage};
use crate::credential::HuaweiCredential;
use crate::error::{HuaweiError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use f2c_cloud::{Connector, HttpClientConfig, VendorSession};
use reqwest::{Request, StatusCode};
use serde::{Deserialize, Serialize};

const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";
const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

#[derive(Serialize)]
struct TokenRequest<'a> {
    auth: Auth<'a>,
}

#[derive(Serialize)]
struct Auth<'a> {
    identity: Identity<'a>,
    scope: Scope<'a>,
}

#[derive(Serialize)]
struct Identity<'a> {
    methods: [&'a str; 1],
    password: PasswordIdentity<'a>,
}

#[derive(Serialize)]
struct PasswordIdentity<'a> {
    user: User<'a>,
}

#[derive(Serialize)]
struct User<'a> {
    name: &'a str,
    password: &'a str,
    domain: Domain<'a>,
}

#[derive(Serialize)]
struct Scope<'a> {
    domain: Domain<'a>,
}

#[derive(Serialize)]
struct Domain<'a> {
    name: &'a str,
}

impl<'a> TokenRequest<'a> {
    fn password(credential: &'a HuaweiCredential) -> Self {
        let domain = || Domain {
            name: &credential.domain_name,
        };
        Self {
            auth: Auth {
                identity: Identity {
                    methods: ["password"],
                    password: PasswordIdentity {
                        user: User {
                            name: &credential.user_name,
                            password: &credential.password,
                            domain: domain(),
                        },
                    },
                },
                scope: Scope { domain: domain() },
            },
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    token: TokenBody,
}

#[derive(Deserialize)]
struct TokenBody {
    expires_at: DateTime<Utc>,
}

const TOKENS_PATH: &str = "/v3/auth/tokens";
const FEE_RECORDS_PATH: &str = "/v2/bills/customer-bills/res-fee-records";

/// API error from a non-success status and its body
fn decode_api_error(status: StatusCode, body: &str) -> HuaweiError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(error) if !error.error_code.is_empty() => HuaweiError::ApiError(error.to_string()),
        _ => HuaweiError::ApiError(format!("HTTP {}: {}", status, body)),
    }
}

async fn api_error(response: reqwest::Response) -> HuaweiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    decode_api_error(status, &body)
}

/// Issues IAM tokens
pub struct IamConnector {
    client: reqwest::Client,
}

impl IamConnector {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &HttpClientConfig) -> f2c_cloud::Result<Self> {
        Ok(Self::new(config.build_client()?))
    }

    fn token_request(&self, credential: &HuaweiCredential) -> Result<Request> {
        let url = format!("{}{}", credential.iam_endpoint, TOKENS_PATH);
        Ok(self
            .client
            .post(&url)
            .json(&TokenRequest::password(credential))
            .build()?)
    }

    async fn issue_token(&self, credential: &HuaweiCredential) -> Result<IamSession> {
        let request = self.token_request(credential)?;
        let response = self.client.execute(request).await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(HuaweiError::AuthenticationFailed(format!(
                "{} for user {} in domain {}",
                status, credential.user_name, credential.domain_name
            )));
        }

        let token = response
            .headers()
            .get(SUBJECT_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or(HuaweiError::MissingToken)?;
        let body: TokenResponse = response.json().await?;

        tracing::debug!(
            domain = %credential.domain_name,
            expires_at = %body.token.expires_at,
            "Issued IAM token"
        );

        Ok(IamSession {
            client: self.client.clone(),
            token,
            expires_at: body.token.expires_at,
            iam_endpoint: credential.iam_endpoint.clone(),
            bss_endpoint: credential.bss_endpoint.clone(),
        })
    }
}

#[async_trait]
impl Connector for IamConnector {
    type Credential = HuaweiCredential;
    type Session = IamSession;

    async fn connect(&self, credential: &HuaweiCredential) -> f2c_cloud::Result<IamSession> {
        Ok(self.issue_token(credential).await?)
    }
}

/// Domain-scoped IAM token
pub struct IamSession {
    client: reqwest::Client,
    token: String,
    expires_at: DateTime<Utc>,
    iam_endpoint: String,
    bss_endpoint: String,
}

impl IamSession {
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    fn revoke_request(&self) -> Result<Request> {
        let url = format!("{}{}", self.iam_endpoint, TOKENS_PATH);
        Ok(self
            .client
            .delete(&url)
            .header(AUTH_TOKEN_HEADER, self.token.as_str())
            .header(SUBJECT_TOKEN_HEADER, self.token.as_str())
            .build()?)
    }

    async fn revoke(&self) -> Result<()> {
        let response = self.client.execute(self.revoke_request()?).await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(())
    }

    fn fee_records_request(&self, cycle: &str, offset: u32, limit: u32) -> Result<Request> {
        let url = format!("{}{}", self.bss_endpoint, FEE_RECORDS_PATH);
        let offset = offset.to_string();
        let limit = limit.to_string();
        Ok(self
            .client
            .get(&url)
            .header(AUTH_TOKEN_HEADER, self.token.as_str())
            .query(&[
                ("bill_cycle", cycle),
                ("offset", offset.as_str()),
                ("limit", limit.as_str()),
            ])
            .build()?)
    }

    async fn fee_records(&self, cycle: &str, offset: u32, limit: u32) -> Result<FeeRecordPage> {
        let request = self.fee_records_request(cycle, offset, limit)?;
        let response = self.client.execute(request).await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl VendorSession for IamSession {
    fn endpoint(&self) -> &str {
        &self.iam_endpoint
    }

    fn is_valid(&self) -> bool {
        Utc::now() < self.expires_at
    }

    async fn logout(&self) -> f2c_cloud::Result<()> {
        Ok(self.revoke().await?)
    }
}

#[async_trait]
impl BssSession for IamSession {
    async fn list_fee_records(
        &self,
        cycle: &str,
        offset: u32,
        limit: u32,
    ) -> Result<FeeRecordPage> {
        self.fee_records(cycle, offset, limit).await
    }
}
