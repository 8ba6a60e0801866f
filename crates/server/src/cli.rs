use clap::Parser;
use shared::api::TRAINEE_HEADER;

#[derive(Debug, Clone, Parser)]
#[clap(name = "journal server")]
pub struct Cli {
    #[clap(long, env, default_value = "journal.sqlite")]
    pub sqlite_connection_string: String,
    #[clap(long, env, default_value = "8080")]
    pub port: u16,
    #[clap(long, env, default_value = "127.0.0.1")]
    pub bind_addr: String,
    /// Header the authenticating proxy puts the trainee's username in
    #[clap(long, env, default_value = TRAINEE_HEADER)]
    pub trainee_header: String,

    /// Deletes the database before starting the main program for debug purposes
    #[arg(long, env, default_value = "false")]
    pub debug_delete_database: bool,
}
