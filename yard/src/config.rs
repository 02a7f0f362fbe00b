/// Connection settings for the upstream yard-management deployment.
///
/// Built once at process start and handed to [`crate::YardClient`];
/// nothing in this struct is read from ambient state after construction.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub auth_host: String,
    pub api_host: String,
    pub username_base: String,
    pub password: String,
    pub client_id: String,
    pub client_secret: String,
    /// Escape hatch for deployments fronted by a self-signed certificate.
    /// Leave off unless the upstream genuinely cannot present a valid chain.
    pub accept_invalid_certs: bool,
}

const DEFAULT_USERNAME_BASE: &str = "sdtadmin@";
const DEFAULT_CLIENT_ID: &str = "omnicomponent.1.0.0";

impl UpstreamConfig {
    /// Create a configuration with the stock username base and client id.
    pub fn new(
        auth_host: impl Into<String>,
        api_host: impl Into<String>,
        password: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            auth_host: auth_host.into(),
            api_host: api_host.into(),
            username_base: DEFAULT_USERNAME_BASE.to_string(),
            password: password.into(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            client_secret: client_secret.into(),
            accept_invalid_certs: false,
        }
    }

    pub fn with_username_base(mut self, base: impl Into<String>) -> Self {
        self.username_base = base.into();
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}
