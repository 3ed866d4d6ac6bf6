use clap::Args;

use crate::cli::{initializer, ClientOptions};
use crate::client::Client;
use crate::store::StringStore;
use crate::Result;

/// Delete value
#[derive(Args, Debug)]
pub struct DeleteCommand {
    /// Key prefix of the store
    #[arg(long, default_value = "")]
    pub prefix: String,
    /// Id
    #[arg(value_name = "ID")]
    pub id: String,
}

impl DeleteCommand {
    pub async fn run(self, options: ClientOptions) -> Result<()> {
        let client = initializer(options).await?.connect().await?;
        println!("{}", self.execute(client).await?);
        Ok(())
    }

    pub async fn execute<C: Client>(&self, client: C) -> Result<String> {
        let mut store = StringStore::<C>::new(client, self.prefix.as_str());

        Ok(if store.delete(&self.id).await? {
            "OK".to_owned()
        } else {
            "Not Found".to_owned()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{get::GetCommand, set::SetCommand};
    use crate::client::MemoryClient;

    #[test]
    fn set_get_delete() {
        tokio_test::block_on(async move {
            let client = MemoryClient::new();
            let set = SetCommand {
                prefix: "user:".to_owned(),
                ex: None,
                nx: true,
                id: "1".to_owned(),
                value: "alice".to_owned(),
            };
            let get = GetCommand {
                prefix: "user:".to_owned(),
                id: "1".to_owned(),
            };
            let delete = DeleteCommand {
                prefix: "user:".to_owned(),
                id: "1".to_owned(),
            };

            assert_eq!(set.execute(client.clone()).await.unwrap(), "OK");
            assert_eq!(set.execute(client.clone()).await.unwrap(), "Not Set");
            assert_eq!(get.execute(client.clone()).await.unwrap(), "alice");
            assert_eq!(delete.execute(client.clone()).await.unwrap(), "OK");
            assert_eq!(delete.execute(client.clone()).await.unwrap(), "Not Found");
            assert_eq!(get.execute(client).await.unwrap(), "Not Found");
        })
    }
}
