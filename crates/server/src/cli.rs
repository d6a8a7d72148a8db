use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[clap(name = "yojuro server")]
pub struct Cli {
    #[clap(long, env, default_value = "yojuro.sqlite")]
    pub sqlite_connection_string: String,
    #[clap(long, env, default_value = "8080")]
    pub port: u16,
    #[clap(long, env, default_value = "127.0.0.1")]
    pub bind_addr: String,
    #[clap(long, env, default_value = "false")]
    pub secure_sessions: bool,
    #[arg(long, env, default_value = "http://localhost:8080")]
    pub cors_origin: String,
    #[arg(long, env, default_value = "30")]
    pub session_expiry_days: i64,
    /// How often expired sessions are removed from the store
    #[arg(long, env, default_value = "60")]
    pub session_sweep_seconds: u64,
    /// Largest accepted request body
    #[arg(long, env, default_value = "65536")]
    pub body_limit_bytes: usize,

    /// Deletes the database before starting the main program for debug purposes
    #[arg(long, env, default_value = "false")]
    pub debug_delete_database: bool,
}

impl Cli {
    /// Defaults with a different database, used by tests and tools that drive
    /// the router without a command line
    pub fn with_database<S: Into<String>>(sqlite_connection_string: S) -> Self {
        Self {
            sqlite_connection_string: sqlite_connection_string.into(),
            port: 0,
            bind_addr: "127.0.0.1".to_owned(),
            secure_sessions: false,
            cors_origin: "http://localhost:8080".to_owned(),
            session_expiry_days: 30,
            session_sweep_seconds: 60,
            body_limit_bytes: 65536,
            debug_delete_database: false,
        }
    }
}
