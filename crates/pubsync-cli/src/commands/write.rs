//! save, publish and withdraw

use super::{print_json, Env};
use clap::Args;
use pubsync_core::errors::Result;
use pubsync_core::ContentItem;
use serde::Serialize;

#[derive(Debug, Args)]
pub struct SaveArgs {
    /// Existing item id; omit to create
    #[arg(long)]
    pub id: Option<i64>,

    #[arg(long)]
    pub author: i64,

    #[arg(long)]
    pub title: String,

    #[arg(long, default_value = "")]
    pub body: String,
}

impl SaveArgs {
    fn item(&self) -> ContentItem {
        ContentItem::new(self.author, self.title.clone(), self.body.clone())
            .with_id(self.id.unwrap_or(0))
    }
}

#[derive(Debug, Args)]
pub struct WithdrawArgs {
    #[arg(long)]
    pub id: i64,

    #[arg(long)]
    pub author: i64,
}

#[derive(Serialize)]
struct Written {
    id: i64,
    status: &'static str,
}

pub fn save(env: &Env, args: SaveArgs) -> Result<()> {
    let id = env.service().save(&env.context(), &args.item())?;
    print_json(&Written {
        id,
        status: "unpublished",
    })
}

pub fn publish(env: &Env, args: SaveArgs) -> Result<()> {
    let id = env.service().publish(&env.context(), &args.item())?;
    print_json(&Written {
        id,
        status: "published",
    })
}

pub fn withdraw(env: &Env, args: WithdrawArgs) -> Result<()> {
    env.service()
        .withdraw(&env.context(), args.author, args.id)?;
    print_json(&Written {
        id: args.id,
        status: "private",
    })
}
