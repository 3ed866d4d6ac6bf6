use clap::{ArgAction, Args};

use crate::cli::{initializer, ClientOptions};
use crate::client::{Client, SetOptions};
use crate::store::StringStore;
use crate::Result;

/// Set value
#[derive(Args, Debug)]
pub struct SetCommand {
    /// Key prefix of the store
    #[arg(long, default_value = "")]
    pub prefix: String,
    /// Expire after seconds
    #[arg(long)]
    pub ex: Option<u64>,
    /// Only set when the key does not exist yet
    #[arg(long, action = ArgAction::SetTrue)]
    pub nx: bool,
    /// Id
    #[arg(value_name = "ID")]
    pub id: String,
    /// Value
    #[arg(value_name = "VALUE")]
    pub value: String,
}

impl SetCommand {
    pub async fn run(self, options: ClientOptions) -> Result<()> {
        let client = initializer(options).await?.connect().await?;
        println!("{}", self.execute(client).await?);
        Ok(())
    }

    pub async fn execute<C: Client>(&self, client: C) -> Result<String> {
        let mut store = StringStore::<C>::new(client, self.prefix.as_str());

        let mut options = SetOptions::default();
        if let Some(seconds) = self.ex {
            options = options.expire_in_seconds(seconds);
        }
        if self.nx {
            options = options.if_absent();
        }

        Ok(if store.set_with(&self.id, &self.value, options).await? {
            "OK".to_owned()
        } else {
            "Not Set".to_owned()
        })
    }
}
