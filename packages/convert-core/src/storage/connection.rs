use crate::constants::CONNECTION_ENV;
use crate::errors::ConfigError;

/// ストレージ接続設定
///
/// 接続文字列は `Key=Value` を `;` で区切った形式:
/// `Endpoint=https://storage.example.com;ClientId=...;ClientSecret=...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub endpoint: String,
    pub credentials: Option<Credentials>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

// シークレットをログに出さない
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

impl ConnectionConfig {
    /// 環境変数 STORAGE_CONNECTION から接続設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var(CONNECTION_ENV).map_err(|_| ConfigError::MissingVar(CONNECTION_ENV))?;
        Self::parse(&raw)
    }

    /// 接続文字列をパースする
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let mut endpoint = None;
        let mut client_id = None;
        let mut client_secret = None;

        for segment in raw.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, value) = segment
                .split_once('=')
                .ok_or_else(|| ConfigError::Malformed(segment.to_string()))?;
            let value = value.trim().to_string();

            match key.trim().to_ascii_lowercase().as_str() {
                "endpoint" => endpoint = Some(value),
                "clientid" => client_id = Some(value),
                "clientsecret" => client_secret = Some(value),
                // 未知のキーは無視する
                _ => {}
            }
        }

        let endpoint = endpoint
            .filter(|e| !e.is_empty())
            .ok_or(ConfigError::MissingKey("Endpoint"))?;

        let credentials = match (client_id, client_secret) {
            (Some(client_id), Some(client_secret)) => Some(Credentials {
                client_id,
                client_secret,
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::MissingKey("ClientSecret")),
            (None, Some(_)) => return Err(ConfigError::MissingKey("ClientId")),
        };

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            credentials,
        })
    }
}
