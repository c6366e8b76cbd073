//! Signing-request management against the local store

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use clap::Subcommand;
use quill_signing::RequestSource;
use quill_types::{RequestId, SigningRequest};
use uuid::Uuid;

use super::load_template;
use crate::store::FileSigningStore;

/// Request subcommands
#[derive(Subcommand, Debug)]
pub enum RequestCommands {
    /// Create a pending signing request from a template
    Create {
        /// Document template file
        #[arg(short, long)]
        template: PathBuf,

        /// Treat the template file as raw HTML instead of a data: resource
        #[arg(long)]
        html: bool,

        /// Request id (a random UUID when omitted)
        #[arg(long)]
        id: Option<String>,

        /// Title shown to the signer
        #[arg(long, default_value = "")]
        title: String,

        /// Expire the request after this many days
        #[arg(long)]
        expires_in_days: Option<i64>,
    },

    /// List requests in the store
    List,

    /// Show one request
    Show {
        /// Request id
        id: String,
    },
}

/// Execute a request command
pub async fn execute(command: RequestCommands, store: &FileSigningStore) -> Result<()> {
    match command {
        RequestCommands::Create {
            template,
            html,
            id,
            title,
            expires_in_days,
        } => {
            let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());
            let mut request = SigningRequest::pending(id, load_template(&template, html)?);
            request.title = title;
            request.expires_at = expires_in_days.map(expiry_after).transpose()?;

            let id = request.id.clone();
            store.put_request(request).await?;
            println!("{}", id);
            Ok(())
        }

        RequestCommands::List => {
            for request in store.list_requests().await? {
                println!(
                    "{:<38} {:<8} {}",
                    request.id.as_str(),
                    request.status.to_string(),
                    request.title
                );
            }
            Ok(())
        }

        RequestCommands::Show { id } => {
            let request = store.fetch_request(&RequestId::new(id)).await?;
            println!("{}", serde_json::to_string_pretty(&request)?);
            Ok(())
        }
    }
}

fn expiry_after(days: i64) -> Result<DateTime<Utc>> {
    Duration::try_days(days)
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .ok_or_else(|| anyhow!("Expiry of {} days is out of range", days))
}
