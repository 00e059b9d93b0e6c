use crate::domain::value_objects::BucketName;

/// Connection settings for one bucket. Set once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketConfig {
    pub name: BucketName,
    pub region: String,
    /// Static credentials; the default provider chain is used when absent
    pub credentials: Option<Credentials>,
}

impl BucketConfig {
    pub fn new(name: BucketName, region: impl Into<String>) -> Self {
        Self {
            name,
            region: region.into(),
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }
}

/// Access key pair
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .finish()
    }
}

/// Canned ACL applied when a bucket is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BucketAcl {
    Private,
    #[default]
    PublicRead,
}

impl BucketAcl {
    pub fn as_str(&self) -> &'static str {
        match self {
            BucketAcl::Private => "private",
            BucketAcl::PublicRead => "public-read",
        }
    }
}

impl std::str::FromStr for BucketAcl {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "private" => Ok(BucketAcl::Private),
            "public-read" => Ok(BucketAcl::PublicRead),
            other => Err(format!(
                "unknown bucket ACL '{}' (expected 'private' or 'public-read')",
                other
            )),
        }
    }
}

impl std::fmt::Display for BucketAcl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
