use crate::error::ConfigError;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub jwt: JwtSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    /// Adds the `Secure` attribute to session cookies
    pub secure_cookies: bool,
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub uri: String,
    pub database_name: String,
}

/// JWT authentication settings
///
/// Access and refresh tokens are signed with separate secrets.
#[derive(serde::Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub refresh_secret: String,
    pub access_token_expiry: i64,   // seconds (900 = 15 minutes)
    pub refresh_token_expiry: i64,  // seconds (604800 = 7 days)
    pub issuer: String,
}

impl Settings {
    /// Reject settings the server cannot safely start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.jwt.validate()?;
        self.database.validate()
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }
}

impl DatabaseSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let uri = self.uri.trim();
        if uri.is_empty() {
            return Err(ConfigError::MissingRequired("MONGODB_URI".to_string()));
        }
        if !uri.starts_with("mongodb://") && !uri.starts_with("mongodb+srv://") {
            return Err(ConfigError::InvalidValue(
                "MONGODB_URI must use the mongodb:// or mongodb+srv:// scheme".to_string(),
            ));
        }
        if self.database_name.trim().is_empty() {
            return Err(ConfigError::MissingRequired("MONGODB_DATABASE".to_string()));
        }
        Ok(())
    }
}

impl JwtSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::MissingRequired("JWT_SECRET".to_string()));
        }
        if self.refresh_secret.is_empty() {
            return Err(ConfigError::MissingRequired("JWT_REFRESH_SECRET".to_string()));
        }
        if self.secret == self.refresh_secret {
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET and JWT_REFRESH_SECRET must differ".to_string(),
            ));
        }
        if self.access_token_expiry <= 0 || self.refresh_token_expiry <= 0 {
            return Err(ConfigError::InvalidValue(
                "token expiry must be a positive number of seconds".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load settings from defaults, the optional `configuration` file and
/// the process environment, in increasing order of precedence.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let settings = config::Config::builder()
        .set_default("application.host", "0.0.0.0")?
        .set_default("application.port", 4000)?
        .set_default("application.secure_cookies", true)?
        .set_default("database.uri", "")?
        .set_default("database.database_name", "sprintboard")?
        .set_default("jwt.secret", "")?
        .set_default("jwt.refresh_secret", "")?
        .set_default("jwt.access_token_expiry", 900)?
        .set_default("jwt.refresh_token_expiry", 604_800)?
        .set_default("jwt.issuer", "sprintboard")?
        .add_source(config::File::with_name("configuration").required(false))
        .set_override_option("application.port", env("PORT"))?
        .set_override_option("database.uri", env("MONGODB_URI"))?
        .set_override_option("database.database_name", env("MONGODB_DATABASE"))?
        .set_override_option("jwt.secret", env("JWT_SECRET"))?
        .set_override_option("jwt.refresh_secret", env("JWT_REFRESH_SECRET"))?
        .build()?;
    settings.try_deserialize::<Settings>()
}

fn env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
