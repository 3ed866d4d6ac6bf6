use clap::{Args, Subcommand};

use crate::cli::{initializer, ClientOptions};
use crate::client::Client;
use crate::config::Initializer;
use crate::search::{IndexState, IndexStatus};
use crate::Result;

/// Inspect and synchronize configured indexes
#[derive(Args, Debug)]
pub struct IndexCommand {
    #[command(subcommand)]
    pub command: IndexSubcommand,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSubcommand {
    /// Compare every configured index with the live one
    Status,
    /// Create missing indexes and recreate changed ones
    Sync,
}

impl IndexCommand {
    pub async fn run(self, options: ClientOptions) -> Result<()> {
        let initializer = initializer(options).await?;
        let client = initializer.connect().await?;
        for line in self.execute(&initializer, client).await? {
            println!("{}", line);
        }
        Ok(())
    }

    pub async fn execute<C: Client>(
        &self,
        initializer: &Initializer,
        mut client: C,
    ) -> Result<Vec<String>> {
        let lines = match self.command {
            IndexSubcommand::Status => initializer
                .index_states(&mut client)
                .await?
                .into_iter()
                .map(|(name, state)| format!("{} {}", name, state_label(state)))
                .collect(),
            IndexSubcommand::Sync => initializer
                .sync_indexes(&mut client)
                .await?
                .into_iter()
                .map(|(name, status)| format!("{} {}", name, status_label(status)))
                .collect(),
        };
        Ok(lines)
    }
}

fn state_label(state: IndexState) -> &'static str {
    match state {
        IndexState::Absent => "absent",
        IndexState::Unchanged => "up to date",
        IndexState::Changed => "changed",
    }
}

fn status_label(status: IndexStatus) -> &'static str {
    match status {
        IndexStatus::Created => "created",
        IndexStatus::Reused => "reused",
        IndexStatus::Recreated => "recreated",
    }
}
