use clap::Args;

use crate::cli::{initializer, ClientOptions};
use crate::client::Client;
use crate::store::StringStore;
use crate::Result;

/// Get value
#[derive(Args, Debug)]
pub struct GetCommand {
    /// Key prefix of the store
    #[arg(long, default_value = "")]
    pub prefix: String,
    /// Id
    #[arg(value_name = "ID")]
    pub id: String,
}

impl GetCommand {
    pub async fn run(self, options: ClientOptions) -> Result<()> {
        let client = initializer(options).await?.connect().await?;
        println!("{}", self.execute(client).await?);
        Ok(())
    }

    pub async fn execute<C: Client>(&self, client: C) -> Result<String> {
        let mut store = StringStore::<C>::new(client, self.prefix.as_str());

        Ok(match store.get(&self.id).await? {
            Some(value) => value,
            None => "Not Found".to_owned(),
        })
    }
}
