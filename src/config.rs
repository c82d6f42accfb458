use crate::error::{config_error, env_error, AppResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default location of the pricing file
pub const DEFAULT_PRICING_PATH: &str = "config/pricing.toml";

/// Default fare of a ride with a company driver
pub const DEFAULT_DRIVER_FARE: f64 = 10.0;
/// Default fare of a taxi ride
pub const DEFAULT_TAXI_FARE: f64 = 15.0;

/// Default fares applied when a booking does not carry one
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    #[serde(rename = "PRIX_COURSE_CHAUFFEUR", default = "default_driver_fare")]
    pub driver_fare: f64,
    #[serde(rename = "PRIX_COURSE_TAXI", default = "default_taxi_fare")]
    pub taxi_fare: f64,
}

fn default_driver_fare() -> f64 {
    DEFAULT_DRIVER_FARE
}

fn default_taxi_fare() -> f64 {
    DEFAULT_TAXI_FARE
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            driver_fare: DEFAULT_DRIVER_FARE,
            taxi_fare: DEFAULT_TAXI_FARE,
        }
    }
}

impl Pricing {
    pub fn validate(&self) -> AppResult<()> {
        let valid = |fare: f64| fare.is_finite() && fare >= 0.0;
        if !valid(self.driver_fare) || !valid(self.taxi_fare) {
            return Err(config_error("Fares must be finite and not negative"));
        }
        Ok(())
    }
}

/// Main configuration structure for the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Secret used to sign session tokens
    pub jwt_secret: String,
    /// Session lifetime in minutes
    pub token_expiration_minutes: i64,
    /// Account created on first start when no user exists
    pub admin_username: String,
    pub admin_password: String,
    pub redis_url: String,
    pub bind_address: String,
    pub port: u16,
    pub pricing_path: PathBuf,
    pub pricing: Pricing,
}

impl Config {
    /// Load configuration from environment and the pricing file
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Required environment variables
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| env_error("JWT_SECRET"))?;

        let token_expiration_minutes = match env::var("TOKEN_EXPIRATION_MINUTES") {
            Ok(value) => value
                .parse::<i64>()
                .map_err(|_| env_error("Invalid TOKEN_EXPIRATION_MINUTES format"))?,
            Err(_) => 60 * 24,
        };

        let port = match env::var("PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|_| env_error("Invalid PORT format"))?,
            Err(_) => 3000,
        };

        let admin_username = env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let admin_password = env::var("ADMIN_PASSWORD").map_err(|_| env_error("ADMIN_PASSWORD"))?;
        let redis_url =
            env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
        let bind_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string());
        let pricing_path = env::var("PRICING_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_PRICING_PATH));

        let pricing = load_pricing(&pricing_path);

        Ok(Config {
            jwt_secret,
            token_expiration_minutes,
            admin_username,
            admin_password,
            redis_url,
            bind_address,
            port,
            pricing_path,
            pricing,
        })
    }

    /// Replace the fares and write them back to the pricing file
    pub fn set_pricing(&mut self, pricing: Pricing) -> AppResult<()> {
        pricing.validate()?;
        self.pricing = pricing;
        self.save_pricing()
    }

    /// Save pricing to file
    fn save_pricing(&self) -> AppResult<()> {
        if let Some(dir) = self.pricing_path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let toml_str = toml::to_string(&self.pricing)?;
        fs::write(&self.pricing_path, toml_str)?;

        Ok(())
    }
}

/// Read the pricing file, falling back to defaults when it is missing or
/// unreadable
pub fn load_pricing(path: &Path) -> Pricing {
    let Ok(content) = fs::read_to_string(path) else {
        return Pricing::default();
    };

    match toml::from_str::<Pricing>(&content) {
        Ok(pricing) if pricing.validate().is_ok() => pricing,
        Ok(_) => {
            warn!("Invalid fare in {}, using defaults", path.display());
            Pricing::default()
        }
        Err(e) => {
            warn!("Invalid pricing file {}: {}", path.display(), e);
            Pricing::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_partial_file() {
        let pricing: Pricing = toml::from_str("PRIX_COURSE_TAXI = 22.5").unwrap();
        assert_eq!(pricing.taxi_fare, 22.5);
        assert_eq!(pricing.driver_fare, DEFAULT_DRIVER_FARE);
    }

    #[test]
    fn test_nan_fare_is_rejected() {
        let pricing: Pricing = toml::from_str("PRIX_COURSE_CHAUFFEUR = nan").unwrap();
        assert!(pricing.validate().is_err());
    }

    #[test]
    fn test_missing_pricing_file_uses_defaults() {
        let pricing = load_pricing(Path::new("does/not/exist.toml"));
        assert_eq!(pricing, Pricing::default());
    }

    #[test]
    fn test_pricing_round_trip_through_file() {
        let path = env::temp_dir().join(format!("navette-pricing-{}.toml", uuid::Uuid::new_v4()));
        let mut config = Config {
            jwt_secret: "secret".to_string(),
            token_expiration_minutes: 60,
            admin_username: "admin".to_string(),
            admin_password: "admin".to_string(),
            redis_url: String::new(),
            bind_address: "127.0.0.1".to_string(),
            port: 3000,
            pricing_path: path.clone(),
            pricing: Pricing::default(),
        };

        let pricing = Pricing {
            driver_fare: 12.0,
            taxi_fare: 30.0,
        };
        config.set_pricing(pricing).unwrap();
        assert_eq!(load_pricing(&path), pricing);

        assert!(config
            .set_pricing(Pricing {
                driver_fare: -1.0,
                taxi_fare: 30.0,
            })
            .is_err());
        assert!(config
            .set_pricing(Pricing {
                driver_fare: 10.0,
                taxi_fare: f64::NAN,
            })
            .is_err());
        assert_eq!(config.pricing, pricing);

        let _ = fs::remove_file(path);
    }
}
