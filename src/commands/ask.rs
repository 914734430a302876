use clap::Args;

use diary::{ApiClient, Config};

/// Ask a question about your past entries
#[derive(Args)]
pub struct AskCommand {
    /// The question
    pub query: String,
}

impl AskCommand {
    pub async fn run(
        &self,
        api: &ApiClient,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err("Please enter a query".into());
        }

        let answer = api.ask(config.user_id.value, query).await?;
        println!("{}", answer);
        Ok(())
    }
}
