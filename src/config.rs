// src/config.rs
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_maxage: i64,
    pub port: u16,
    // Chat assistant (Groq) configuration
    pub groq_api_key: String,
    pub groq_model: String,
}

impl Config {
    pub fn init() -> Config {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set");

        // Session horizon in minutes; default 8 hours
        let jwt_maxage = std::env::var("JWT_MAXAGE")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(480);

        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8000);

        let groq_api_key = std::env::var("GROQ_API_KEY").unwrap_or_else(|_| "".to_string());
        let groq_model =
            std::env::var("GROQ_MODEL").unwrap_or_else(|_| "llama-3.3-70b-versatile".to_string());

        Config {
            database_url,
            jwt_secret,
            jwt_maxage,
            port,
            groq_api_key,
            groq_model,
        }
    }
}
